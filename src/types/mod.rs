pub mod data_point;
pub mod events;
pub mod results;
pub mod sample;

pub use data_point::{GroundTrack, Orientation, Vector3};
pub use events::{Axis, AxisSet, DeviationEvent};
pub use results::{IterationOutcome, MissionState, MissionSummary};
pub use sample::{Sample, SensorSnapshot};
