use std::time::Duration;

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, ThreadKind};
use tracing::{debug, warn};

use super::platform;
use super::process::{ProcessSample, memory_share};
use super::relationship::ParentMap;
use super::source::{ProcessReadError, ProcessTable};
use crate::error::{Error, Result};

/// `sysinfo`-backed [`ProcessTable`].
///
/// CPU usage is averaged over the time since this collector's previous
/// refresh, so a collector kept across polls reports per-interval figures
/// while a fresh one may report 0 for every process on its first sample.
pub struct Collector {
    sys: System,
}

/// How long to wait after [`Collector::new`] before the first sample carries
/// meaningful CPU figures.
pub const WARMUP: Duration = sysinfo::MINIMUM_CPU_UPDATE_INTERVAL;

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );
        Collector { sys }
    }

    fn cached_parents(&self) -> ParentMap {
        self.sys
            .processes()
            .iter()
            .filter_map(|(pid, process)| Some((pid.as_u32(), process.parent()?.as_u32())))
            .collect()
    }
}

impl ProcessTable for Collector {
    fn enumerate(&mut self) -> Result<Vec<u32>> {
        let _span = tracing::debug_span!("collector.enumerate").entered();

        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(Error::SourceUnavailable(format!(
                "process enumeration is not supported on {}",
                std::env::consts::OS
            )));
        }

        self.sys.refresh_memory();
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );

        // Userland tasks show up as processes on Linux; they belong to their process.
        let mut pids: Vec<u32> = self
            .sys
            .processes()
            .iter()
            .filter(|(_, process)| !matches!(process.thread_kind(), Some(ThreadKind::Userland)))
            .map(|(pid, _)| pid.as_u32())
            .collect();
        if pids.is_empty() {
            return Err(Error::SourceUnavailable(
                "enumeration returned no processes".to_string(),
            ));
        }
        pids.sort_unstable();
        debug!(count = pids.len(), "process table refreshed");
        Ok(pids)
    }

    fn sample(&self, pid: u32) -> std::result::Result<ProcessSample, ProcessReadError> {
        let process = self
            .sys
            .process(Pid::from_u32(pid))
            .ok_or(ProcessReadError::Vanished(pid))?;

        Ok(ProcessSample {
            pid,
            name: process.name().to_string_lossy().to_string(),
            cpu_percent: f64::from(process.cpu_usage()).max(0.0),
            memory_percent: memory_share(process.memory(), self.sys.total_memory()),
        })
    }

    fn parent_pids(&mut self) -> Result<ParentMap> {
        match platform::parent_pids() {
            Some(parents) => Ok(parents),
            None => {
                if self.sys.processes().is_empty() {
                    warn!("parent lookup before any enumeration; table is empty");
                }
                Ok(self.cached_parents())
            }
        }
    }
}
