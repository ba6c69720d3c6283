use thiserror::Error;

/// Sensor board read failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeviceError {
    #[error("{sensor} read failed: {reason}")]
    ReadFailed { sensor: &'static str, reason: String },

    #[error("{sensor} returned an unexpected value: {value}")]
    UnexpectedValue { sensor: &'static str, value: String },
}

/// LED matrix failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DisplayError {
    #[error("Pixel ({x}, {y}) is outside the matrix")]
    OutOfBounds { x: u32, y: u32 },

    #[error("Display write failed: {0}")]
    WriteFailed(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PositionError {
    #[error("Ground track unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum TelemetryLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Anything that can abort a single mission iteration
#[derive(Error, Debug)]
pub enum MissionError {
    #[error(transparent)]
    Sensor(#[from] DeviceError),

    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error(transparent)]
    Position(#[from] PositionError),

    #[error(transparent)]
    Log(#[from] TelemetryLogError),
}

impl MissionError {
    /// Category tag written to the diagnostic log.
    pub fn category(&self) -> &'static str {
        match self {
            MissionError::Sensor(_) => "SensorFault",
            MissionError::Display(_) => "DisplayFault",
            MissionError::Position(_) => "PositionFault",
            MissionError::Log(_) => "LogWriteFault",
        }
    }
}

pub type MissionResult<T> = Result<T, MissionError>;
