pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod monitor;
pub mod pipeline;
pub mod render;
pub mod system;

pub use error::{Error, Result};
pub use monitor::Monitor;
pub use pipeline::{Query, SortField, Thresholds, detect_anomalies, filter, sort};
pub use system::{Snapshot, acquire, annotate};
