use chrono::{DateTime, Local};

use super::{GroundTrack, Orientation, Vector3};

/// One complete read of the motion sensors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    pub acceleration: Vector3,
    pub orientation: Orientation,
    pub angular_velocity: Vector3,
}

/// A single telemetry row. Built once per iteration and written once.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub sequence: u64,
    pub timestamp: DateTime<Local>,
    pub location: GroundTrack,
    pub temperature: f64,
    pub humidity: f64,
    pub snapshot: SensorSnapshot,
}

impl Sample {
    pub fn new(
        sequence: u64,
        timestamp: DateTime<Local>,
        location: GroundTrack,
        temperature: f64,
        humidity: f64,
        snapshot: SensorSnapshot,
    ) -> Self {
        Self {
            sequence,
            timestamp,
            location,
            temperature,
            humidity,
            snapshot,
        }
    }

    /// Row fields in log column order.
    pub fn to_record(&self) -> [String; 14] {
        let acc = self.snapshot.acceleration;
        let ori = self.snapshot.orientation;
        let gyro = self.snapshot.angular_velocity;
        [
            self.sequence.to_string(),
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            self.location.to_string(),
            self.temperature.to_string(),
            self.humidity.to_string(),
            acc.x.to_string(),
            acc.y.to_string(),
            acc.z.to_string(),
            ori.yaw.to_string(),
            ori.pitch.to_string(),
            ori.roll.to_string(),
            gyro.x.to_string(),
            gyro.y.to_string(),
            gyro.z.to_string(),
        ]
    }
}
