//! Configuration progress for voice tools.

mod state;
mod tracker;

pub use state::ProgressState;
pub use tracker::ProgressTracker;
