//! Data models for the dashboard
//!
//! The history loader produces these, and the dashboard and notifier consume them.

pub mod observation;
pub mod summary;

// Re-export commonly used types for convenience
pub use observation::{ChartPoint, History, Observation};
pub use summary::Summary;
