//! Scripted devices for tests.

use std::collections::VecDeque;

use super::{Frame, PixelDisplay, Rgb, SensorDevice, MATRIX_SIZE};
use crate::error::{DeviceError, DisplayError};
use crate::types::{Orientation, Vector3};

/// Sensor board that replays queued accelerometer values and can be told to
/// fail specific calls.
#[derive(Debug, Default)]
pub struct ScriptedSensors {
    pub accelerations: VecDeque<Result<Vector3, DeviceError>>,
    pub motions: VecDeque<bool>,
    pub temperature_faults: VecDeque<bool>,
    pub fallback_acceleration: Vector3,
    pub orientation: Orientation,
    pub gyroscope: Vector3,
    pub temperature: f64,
    pub humidity: f64,
    pub accelerometer_calls: usize,
}

impl ScriptedSensors {
    pub fn new() -> Self {
        Self {
            orientation: Orientation::new(120.12345, 2.5, 359.9996),
            gyroscope: Vector3::new(0.00049, -0.0012, 0.0101),
            temperature: 26.123456,
            humidity: 40.987654,
            ..Default::default()
        }
    }

    pub fn queue_acceleration(&mut self, x: f64, y: f64, z: f64) {
        self.accelerations.push_back(Ok(Vector3::new(x, y, z)));
    }

    pub fn queue_acceleration_fault(&mut self) {
        self.accelerations.push_back(Err(DeviceError::ReadFailed {
            sensor: "accelerometer",
            reason: "scripted fault".to_string(),
        }));
    }
}

impl SensorDevice for ScriptedSensors {
    fn accelerometer_raw(&mut self) -> Result<Vector3, DeviceError> {
        self.accelerometer_calls += 1;
        self.accelerations
            .pop_front()
            .unwrap_or(Ok(self.fallback_acceleration))
    }

    fn gyroscope_raw(&mut self) -> Result<Vector3, DeviceError> {
        Ok(self.gyroscope)
    }

    fn orientation(&mut self) -> Result<Orientation, DeviceError> {
        Ok(self.orientation)
    }

    fn temperature(&mut self) -> Result<f64, DeviceError> {
        if self.temperature_faults.pop_front().unwrap_or(false) {
            return Err(DeviceError::ReadFailed {
                sensor: "temperature",
                reason: "scripted fault".to_string(),
            });
        }
        Ok(self.temperature)
    }

    fn humidity(&mut self) -> Result<f64, DeviceError> {
        Ok(self.humidity)
    }

    fn motion_detected(&mut self) -> Result<bool, DeviceError> {
        Ok(self.motions.pop_front().unwrap_or(false))
    }
}

/// Display operations recorded by [`RecordingDisplay`].
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    Pixel(u32, u32, [u8; 3]),
    Image([u8; 3]),
    Clear,
    Message(String, f64, [u8; 3]),
}

#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub calls: Vec<DisplayCall>,
    pub fail_messages: bool,
}

impl RecordingDisplay {
    pub fn messages(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DisplayCall::Message(text, _, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl PixelDisplay for RecordingDisplay {
    fn set_pixel(&mut self, x: u32, y: u32, colour: Rgb) -> Result<(), DisplayError> {
        if x >= MATRIX_SIZE || y >= MATRIX_SIZE {
            return Err(DisplayError::OutOfBounds { x, y });
        }
        self.calls.push(DisplayCall::Pixel(x, y, colour.0));
        Ok(())
    }

    fn set_pixels(&mut self, pixels: &Frame) -> Result<(), DisplayError> {
        // 记录左上角像素即可区分图案
        self.calls.push(DisplayCall::Image(pixels[0].0));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.calls.push(DisplayCall::Clear);
        Ok(())
    }

    fn show_message(&mut self, text: &str, scroll_speed: f64, colour: Rgb) -> Result<(), DisplayError> {
        if self.fail_messages {
            return Err(DisplayError::WriteFailed("scripted fault".to_string()));
        }
        self.calls
            .push(DisplayCall::Message(text.to_string(), scroll_speed, colour.0));
        Ok(())
    }
}
