use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that reach the calling shell.
///
/// Per-process read failures are not part of this enum: they are absorbed
/// inside [`crate::system::source::acquire`] and never surface.
#[derive(Debug, Error)]
pub enum Error {
    #[error("process table unavailable: {0}")]
    SourceUnavailable(String),

    #[error("cannot read config {}: {source}", path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {}: {message}", path.display())]
    ConfigMalformed { path: PathBuf, message: String },

    #[error("invalid sort field `{0}`; valid options: pid, name, cpu_percent, memory_percent")]
    InvalidSortField(String),

    #[error("invalid {name} {value}: must be within 0..=100")]
    InvalidThreshold { name: &'static str, value: f64 },
}
