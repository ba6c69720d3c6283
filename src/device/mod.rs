//! Hardware capabilities consumed by the mission.
//!
//! The board is split into two injected capabilities, one for the sensors and
//! one for the LED matrix, so that either can be replaced by a simulated or
//! scripted implementation.

pub mod simulated;
#[cfg(test)]
pub mod scripted;

use crate::error::{DeviceError, DisplayError};
use crate::types::{Orientation, Vector3};

pub use simulated::{SimulatedDisplay, SimulatedSensors};

/// LED matrix edge length in pixels.
pub const MATRIX_SIZE: u32 = 8;
pub const MATRIX_PIXELS: usize = (MATRIX_SIZE * MATRIX_SIZE) as usize;

pub type Rgb = image::Rgb<u8>;
pub type Frame = [Rgb; MATRIX_PIXELS];

/// Raw sensor queries. Every call hits the device; nothing is cached.
pub trait SensorDevice {
    /// Acceleration in g.
    fn accelerometer_raw(&mut self) -> Result<Vector3, DeviceError>;
    /// Angular velocity in rad/s.
    fn gyroscope_raw(&mut self) -> Result<Vector3, DeviceError>;
    /// Yaw, pitch, roll in degrees.
    fn orientation(&mut self) -> Result<Orientation, DeviceError>;
    fn temperature(&mut self) -> Result<f64, DeviceError>;
    fn humidity(&mut self) -> Result<f64, DeviceError>;
    /// PIR motion sensor state.
    fn motion_detected(&mut self) -> Result<bool, DeviceError>;
}

/// 8x8 RGB LED matrix.
pub trait PixelDisplay {
    fn set_pixel(&mut self, x: u32, y: u32, colour: Rgb) -> Result<(), DisplayError>;
    fn set_pixels(&mut self, pixels: &Frame) -> Result<(), DisplayError>;
    fn clear(&mut self) -> Result<(), DisplayError>;
    /// Scroll `text` across the matrix. Blocks until the text has left the display.
    fn show_message(&mut self, text: &str, scroll_speed: f64, colour: Rgb) -> Result<(), DisplayError>;
}

impl<T: SensorDevice + ?Sized> SensorDevice for &mut T {
    fn accelerometer_raw(&mut self) -> Result<Vector3, DeviceError> {
        (**self).accelerometer_raw()
    }

    fn gyroscope_raw(&mut self) -> Result<Vector3, DeviceError> {
        (**self).gyroscope_raw()
    }

    fn orientation(&mut self) -> Result<Orientation, DeviceError> {
        (**self).orientation()
    }

    fn temperature(&mut self) -> Result<f64, DeviceError> {
        (**self).temperature()
    }

    fn humidity(&mut self) -> Result<f64, DeviceError> {
        (**self).humidity()
    }

    fn motion_detected(&mut self) -> Result<bool, DeviceError> {
        (**self).motion_detected()
    }
}

impl<T: PixelDisplay + ?Sized> PixelDisplay for &mut T {
    fn set_pixel(&mut self, x: u32, y: u32, colour: Rgb) -> Result<(), DisplayError> {
        (**self).set_pixel(x, y, colour)
    }

    fn set_pixels(&mut self, pixels: &Frame) -> Result<(), DisplayError> {
        (**self).set_pixels(pixels)
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear()
    }

    fn show_message(&mut self, text: &str, scroll_speed: f64, colour: Rgb) -> Result<(), DisplayError> {
        (**self).show_message(text, scroll_speed, colour)
    }
}
