use serde::Serialize;

/// Raw per-process reading returned by a [`ProcessTable`](super::source::ProcessTable).
///
/// CPU and memory come from the same refresh, so they describe the same instant.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

/// One entry of a [`Snapshot`](super::snapshot::Snapshot).
///
/// `is_child` stays `None` until the snapshot has been annotated and is
/// left out of the serialized form while absent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_child: Option<bool>,
}

impl ProcessRecord {
    pub fn new(pid: u32, name: impl Into<String>, cpu_percent: f64, memory_percent: f64) -> Self {
        ProcessRecord {
            pid,
            name: name.into(),
            cpu_percent,
            memory_percent,
            is_child: None,
        }
    }

    pub fn is_annotated(&self) -> bool {
        self.is_child.is_some()
    }
}

impl From<ProcessSample> for ProcessRecord {
    fn from(sample: ProcessSample) -> Self {
        ProcessRecord {
            pid: sample.pid,
            name: sample.name,
            cpu_percent: sample.cpu_percent,
            memory_percent: sample.memory_percent,
            is_child: None,
        }
    }
}

/// Share of physical memory in percent, clamped to `0..=100`.
///
/// Returns 0 when the total is unknown.
pub fn memory_share(resident_bytes: u64, total_bytes: u64) -> f64 {
    if total_bytes == 0 {
        return 0.0;
    }
    (resident_bytes as f64 / total_bytes as f64 * 100.0).clamp(0.0, 100.0)
}
