use thiserror::Error;
use tracing::{debug, trace};

use super::process::{ProcessRecord, ProcessSample};
use super::relationship::ParentMap;
use super::snapshot::Snapshot;
use crate::error::Result;

/// Why a single process could not be read.
///
/// Never escapes [`acquire`]; the affected process is left out of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessReadError {
    #[error("process {0} exited before it could be read")]
    Vanished(u32),
    #[error("access to process {0} denied")]
    AccessDenied(u32),
}

/// OS capability the pipeline consumes.
///
/// `enumerate` and `parent_pids` are independent reads of live OS state and
/// may disagree slightly; callers treat that skew as normal.
pub trait ProcessTable {
    /// Lists the pids currently live. Fails only when the table cannot be
    /// enumerated at all.
    fn enumerate(&mut self) -> Result<Vec<u32>>;

    /// Reads one process from the most recent enumeration.
    fn sample(&self, pid: u32) -> std::result::Result<ProcessSample, ProcessReadError>;

    /// Reads the OS-wide pid to parent-pid mapping.
    fn parent_pids(&mut self) -> Result<ParentMap>;
}

/// Captures a fresh snapshot.
///
/// Pid 0, processes with an empty name, and processes that vanish or deny
/// access between listing and reading are skipped.
pub fn acquire<T: ProcessTable + ?Sized>(table: &mut T) -> Result<Snapshot> {
    let _span = tracing::debug_span!("source.acquire").entered();

    let pids = table.enumerate()?;
    let listed = pids.len();
    let mut processes = Vec::with_capacity(listed);

    for pid in pids {
        if pid == 0 {
            continue;
        }
        let sample = match table.sample(pid) {
            Ok(sample) => sample,
            Err(err) => {
                trace!(pid, %err, "skipping unreadable process");
                continue;
            }
        };
        if sample.name.is_empty() {
            trace!(pid, "skipping process without a name");
            continue;
        }
        processes.push(ProcessRecord::from(sample));
    }

    debug!(listed, kept = processes.len(), "snapshot acquired");
    Ok(Snapshot::new(processes))
}
