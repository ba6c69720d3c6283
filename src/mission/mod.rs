pub mod clock;
pub mod mission_loop;

pub use clock::{Clock, SystemClock};
pub use mission_loop::MissionLoop;
