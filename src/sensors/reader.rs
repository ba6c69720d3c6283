use crate::device::SensorDevice;
use crate::error::DeviceError;
use crate::types::{SensorSnapshot, Vector3};
use crate::utils::round_to;

/// Decimal places kept for motion readings.
pub const MOTION_DECIMALS: u32 = 3;
/// Decimal places kept for temperature and humidity.
pub const ENVIRONMENT_DECIMALS: u32 = 4;

/// Normalises raw device queries. Never retries; the first failing
/// sub-read is returned to the caller.
pub struct SensorReader<D: SensorDevice> {
    device: D,
}

impl<D: SensorDevice> SensorReader<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    /// Acceleration, orientation and angular velocity in one pass.
    pub fn read(&mut self) -> Result<SensorSnapshot, DeviceError> {
        let acceleration = self.read_acceleration()?;

        let orientation = self.device.orientation()?;
        if !orientation.is_finite() {
            return Err(DeviceError::UnexpectedValue {
                sensor: "orientation",
                value: format!("{:?}", orientation),
            });
        }

        let angular_velocity = self.device.gyroscope_raw()?;
        check_vector("gyroscope", &angular_velocity)?;

        Ok(SensorSnapshot {
            acceleration,
            orientation: orientation.rounded(MOTION_DECIMALS),
            angular_velocity: angular_velocity.rounded(MOTION_DECIMALS),
        })
    }

    /// Fresh accelerometer query; two calls may observe different values.
    pub fn read_acceleration(&mut self) -> Result<Vector3, DeviceError> {
        let acc = self.device.accelerometer_raw()?;
        check_vector("accelerometer", &acc)?;
        Ok(acc.rounded(MOTION_DECIMALS))
    }

    /// Temperature and humidity.
    pub fn read_environment(&mut self) -> Result<(f64, f64), DeviceError> {
        let temperature = check_scalar("temperature", self.device.temperature()?)?;
        let humidity = check_scalar("humidity", self.device.humidity()?)?;
        Ok((
            round_to(temperature, ENVIRONMENT_DECIMALS),
            round_to(humidity, ENVIRONMENT_DECIMALS),
        ))
    }

    pub fn motion_detected(&mut self) -> Result<bool, DeviceError> {
        self.device.motion_detected()
    }
}

fn check_vector(sensor: &'static str, v: &Vector3) -> Result<(), DeviceError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(DeviceError::UnexpectedValue {
            sensor,
            value: v.to_string(),
        })
    }
}

fn check_scalar(sensor: &'static str, value: f64) -> Result<f64, DeviceError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DeviceError::UnexpectedValue {
            sensor,
            value: value.to_string(),
        })
    }
}
