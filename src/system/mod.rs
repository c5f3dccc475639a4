pub mod collector;
pub mod platform;
pub mod process;
pub mod relationship;
pub mod snapshot;
pub mod source;

pub use collector::Collector;
pub use process::{ProcessRecord, ProcessSample};
pub use relationship::{ParentMap, annotate, annotate_with};
pub use snapshot::Snapshot;
pub use source::{ProcessReadError, ProcessTable, acquire};
