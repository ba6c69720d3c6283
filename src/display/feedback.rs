use image::Rgb;
use rand::Rng;

use super::images::{ASTRONAUT, FLAG};
use crate::config::DisplayConfig;
use crate::device::{PixelDisplay, MATRIX_SIZE};
use crate::error::DisplayError;
use crate::mission::Clock;
use crate::types::DeviationEvent;

/// LED 矩阵显示状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Idle,
    MotionDetected,
    AnomalyAlert,
}

/// Drives the LED matrix. Every operation returns to `Idle` when it ends,
/// whether or not the display accepted the writes.
pub struct VisualFeedback<D: PixelDisplay, C: Clock, R: Rng> {
    display: D,
    clock: C,
    rng: R,
    config: DisplayConfig,
    state: DisplayState,
}

impl<D: PixelDisplay, C: Clock, R: Rng> VisualFeedback<D, C, R> {
    pub fn new(display: D, clock: C, rng: R, config: DisplayConfig) -> Self {
        Self {
            display,
            clock,
            rng,
            config,
            state: DisplayState::Idle,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Start-up screen: flag, then the start message.
    pub fn splash(&mut self) -> Result<(), DisplayError> {
        self.display.set_pixels(&FLAG)?;
        self.clock.sleep(self.config.splash_hold());
        self.display.show_message(
            &self.config.splash_message,
            self.config.splash_scroll_speed,
            Rgb(self.config.splash_colour),
        )
    }

    /// Liveness indicator: one random cell in a random colour.
    pub fn heartbeat(&mut self) -> Result<(), DisplayError> {
        let x = self.rng.random_range(0..MATRIX_SIZE);
        let y = self.rng.random_range(0..MATRIX_SIZE);
        let colour = Rgb([
            self.rng.random_range(10..=155),
            self.rng.random_range(10..=155),
            self.rng.random_range(10..=155),
        ]);
        self.display.set_pixel(x, y, colour)
    }

    /// Show the astronaut for the configured hold time, then clear.
    pub fn show_motion(&mut self) -> Result<(), DisplayError> {
        self.state = DisplayState::MotionDetected;
        let result = self.render_motion();
        self.state = DisplayState::Idle;
        result
    }

    /// Scroll the alert text. Blocks until the message has finished.
    pub fn show_alert(&mut self, event: &DeviationEvent) -> Result<(), DisplayError> {
        if event.is_empty() {
            return Ok(());
        }
        self.state = DisplayState::AnomalyAlert;
        let result = self.render_alert();
        self.state = DisplayState::Idle;
        result
    }

    fn render_motion(&mut self) -> Result<(), DisplayError> {
        self.display.set_pixels(&ASTRONAUT)?;
        self.clock.sleep(self.config.motion_hold());
        self.display.clear()
    }

    fn render_alert(&mut self) -> Result<(), DisplayError> {
        self.display.clear()?;
        self.display.show_message(
            &self.config.alert_message,
            self.config.alert_scroll_speed,
            Rgb(self.config.alert_colour),
        )
    }
}
