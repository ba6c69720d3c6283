pub mod feedback;
pub mod images;

pub use feedback::VisualFeedback;
