//! Logging setup and in-memory signal tracking.

mod logging;
mod tracker;

pub use logging::setup_logging;
pub use tracker::{SignalTracker, TrackedSignal, TrackerSummary};
