use std::fs::{self, File};
use std::path::Path;

use csv::Writer;
use log::info;

use crate::error::TelemetryLogError;
use crate::types::Sample;

/// Column header written once at mission start.
pub const HEADER: [&str; 14] = [
    "Counter",
    "Date/time",
    "Location",
    "Temperature",
    "Humidity",
    "acc_x",
    "acc_y",
    "acc_z",
    "yaw",
    "pitch",
    "roll",
    "gyro_x",
    "gyro_y",
    "gyro_z",
];

/// Append-only CSV telemetry store. Each row is flushed before `append`
/// returns so that an externally killed process loses at most the row in
/// flight.
pub struct TelemetryLog {
    writer: Writer<File>,
    rows_written: u64,
}

impl TelemetryLog {
    /// Create (or truncate) the file at `path` and write the header.
    pub fn initialize<P: AsRef<Path>>(path: P) -> Result<Self, TelemetryLogError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let mut writer = Writer::from_path(path)?;
        writer.write_record(HEADER)?;
        writer.flush()?;

        info!("Telemetry log initialized at: {}", path.display());

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Write one sample row and flush it.
    pub fn append(&mut self, sample: &Sample) -> Result<(), TelemetryLogError> {
        self.writer.write_record(sample.to_record())?;
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}
