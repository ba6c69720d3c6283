use std::time::Duration;

use image::RgbImage;
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

use super::{Frame, PixelDisplay, Rgb, SensorDevice, MATRIX_SIZE};
use crate::config::SimulationConfig;
use crate::error::{DeviceError, DisplayError};
use crate::mission::Clock;
use crate::types::{Orientation, Vector3};

/// 模拟传感器板：在没有硬件的主机上产生带噪声的读数
pub struct SimulatedSensors {
    rng: StdRng,
    fault_rate: f64,
    motion_probability: f64,
    vibration_amplitude: f64,
    gravity: Vector3,
    yaw: f64,
}

impl SimulatedSensors {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            rng: config.sensor_rng(),
            fault_rate: config.fault_rate,
            motion_probability: config.motion_probability,
            vibration_amplitude: config.vibration_amplitude,
            // microgravity: small residual on every axis
            gravity: Vector3::new(0.012, -0.004, 0.021),
            yaw: 0.0,
        }
    }

    fn check_fault(&mut self, sensor: &'static str) -> Result<(), DeviceError> {
        if self.fault_rate > 0.0 && self.rng.random_bool(self.fault_rate) {
            return Err(DeviceError::ReadFailed {
                sensor,
                reason: "I2C transfer timed out".to_string(),
            });
        }
        Ok(())
    }

    fn jitter(&mut self, amplitude: f64) -> f64 {
        if amplitude <= 0.0 {
            return 0.0;
        }
        self.rng.random_range(-amplitude..amplitude)
    }
}

impl SensorDevice for SimulatedSensors {
    fn accelerometer_raw(&mut self) -> Result<Vector3, DeviceError> {
        self.check_fault("accelerometer")?;
        let amp = self.vibration_amplitude;
        Ok(Vector3::new(
            self.gravity.x + self.jitter(amp),
            self.gravity.y + self.jitter(amp),
            self.gravity.z + self.jitter(amp),
        ))
    }

    fn gyroscope_raw(&mut self) -> Result<Vector3, DeviceError> {
        self.check_fault("gyroscope")?;
        Ok(Vector3::new(self.jitter(0.002), self.jitter(0.002), 0.0011 + self.jitter(0.002)))
    }

    fn orientation(&mut self) -> Result<Orientation, DeviceError> {
        self.check_fault("orientation")?;
        // slow station rotation, one turn per orbit
        self.yaw = (self.yaw + 0.13) % 360.0;
        let pitch = (self.jitter(0.5) + 360.0) % 360.0;
        let roll = (self.jitter(0.5) + 360.0) % 360.0;
        Ok(Orientation::new(self.yaw, pitch, roll))
    }

    fn temperature(&mut self) -> Result<f64, DeviceError> {
        self.check_fault("temperature")?;
        Ok(26.4 + self.jitter(0.3))
    }

    fn humidity(&mut self) -> Result<f64, DeviceError> {
        self.check_fault("humidity")?;
        Ok(41.0 + self.jitter(1.0))
    }

    fn motion_detected(&mut self) -> Result<bool, DeviceError> {
        self.check_fault("motion")?;
        Ok(self.motion_probability > 0.0 && self.rng.random_bool(self.motion_probability))
    }
}

/// 模拟 LED 矩阵：帧缓冲保存在 RgbImage 中，滚动文字时在注入的时钟上阻塞
pub struct SimulatedDisplay<C: Clock> {
    frame: RgbImage,
    clock: C,
}

impl<C: Clock> SimulatedDisplay<C> {
    pub fn new(clock: C) -> Self {
        Self {
            frame: RgbImage::new(MATRIX_SIZE, MATRIX_SIZE),
            clock,
        }
    }

    #[cfg(test)]
    pub fn frame(&self) -> &RgbImage {
        &self.frame
    }
}

/// The matrix font only has glyphs for printable ASCII.
fn has_glyph(c: char) -> bool {
    c == ' ' || c.is_ascii_graphic()
}

/// Time a message takes to scroll fully across the matrix.
pub fn scroll_duration(text: &str, scroll_speed: f64) -> Duration {
    // 每个字符 8 列，外加一屏的空白
    let columns = text.chars().count() as f64 * MATRIX_SIZE as f64 + MATRIX_SIZE as f64;
    Duration::try_from_secs_f64(columns * scroll_speed).unwrap_or_default()
}

impl<C: Clock> PixelDisplay for SimulatedDisplay<C> {
    fn set_pixel(&mut self, x: u32, y: u32, colour: Rgb) -> Result<(), DisplayError> {
        if x >= MATRIX_SIZE || y >= MATRIX_SIZE {
            return Err(DisplayError::OutOfBounds { x, y });
        }
        self.frame.put_pixel(x, y, colour);
        Ok(())
    }

    fn set_pixels(&mut self, pixels: &Frame) -> Result<(), DisplayError> {
        for (i, colour) in pixels.iter().enumerate() {
            let i = i as u32;
            self.frame.put_pixel(i % MATRIX_SIZE, i / MATRIX_SIZE, *colour);
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        for pixel in self.frame.pixels_mut() {
            *pixel = image::Rgb([0, 0, 0]);
        }
        Ok(())
    }

    fn show_message(&mut self, text: &str, scroll_speed: f64, colour: Rgb) -> Result<(), DisplayError> {
        if let Some(c) = text.chars().find(|c| !has_glyph(*c)) {
            return Err(DisplayError::WriteFailed(format!("no glyph for {:?}", c)));
        }

        let duration = scroll_duration(text, scroll_speed);
        debug!("Scrolling {:?} in {:?} over {:?}", text, colour.0, duration);
        self.clock.sleep(duration);
        // 滚动结束后矩阵为空
        self.clear()
    }
}
