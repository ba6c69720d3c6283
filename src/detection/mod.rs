pub mod baseline;

pub use baseline::BaselineTracker;
