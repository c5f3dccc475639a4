//! Pure transforms over a [`Snapshot`].
//!
//! Each transform is independent of the others and of the order in which a
//! caller applies them. [`Query`] is the one composition every shell uses:
//! filter, then sort, then anomaly detection.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::system::process::ProcessRecord;
use crate::system::snapshot::Snapshot;

pub const DEFAULT_CPU_THRESHOLD: f64 = 80.0;
pub const DEFAULT_MEM_THRESHOLD: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Pid,
    Name,
    CpuPercent,
    MemoryPercent,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Pid,
        SortField::Name,
        SortField::CpuPercent,
        SortField::MemoryPercent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Pid => "pid",
            SortField::Name => "name",
            SortField::CpuPercent => "cpu_percent",
            SortField::MemoryPercent => "memory_percent",
        }
    }

    fn compare(self, a: &ProcessRecord, b: &ProcessRecord) -> Ordering {
        match self {
            SortField::Pid => a.pid.cmp(&b.pid),
            SortField::Name => a.name.cmp(&b.name),
            SortField::CpuPercent => a.cpu_percent.total_cmp(&b.cpu_percent),
            SortField::MemoryPercent => a.memory_percent.total_cmp(&b.memory_percent),
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::InvalidSortField(s.to_string()))
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anomaly thresholds, validated into `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    cpu: f64,
    mem: f64,
}

impl Thresholds {
    pub fn new(cpu: f64, mem: f64) -> Result<Self> {
        Ok(Thresholds {
            cpu: check_threshold("cpu_threshold", cpu)?,
            mem: check_threshold("mem_threshold", mem)?,
        })
    }

    pub fn cpu(&self) -> f64 {
        self.cpu
    }

    pub fn mem(&self) -> f64 {
        self.mem
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            cpu: DEFAULT_CPU_THRESHOLD,
            mem: DEFAULT_MEM_THRESHOLD,
        }
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidThreshold { name, value })
    }
}

/// Keeps records whose name contains `keyword`, ignoring case.
///
/// An empty keyword matches everything.
pub fn filter(snapshot: Snapshot, keyword: &str) -> Snapshot {
    let needle = keyword.to_lowercase();
    snapshot
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}

/// Stable sort by `field`; ties keep their prior relative order in both
/// directions.
pub fn sort(mut snapshot: Snapshot, field: SortField, descending: bool) -> Snapshot {
    snapshot.processes.sort_by(|a, b| {
        let ord = field.compare(a, b);
        if descending { ord.reverse() } else { ord }
    });
    snapshot
}

/// Keeps records at or above either threshold.
pub fn detect_anomalies(snapshot: Snapshot, cpu_threshold: f64, mem_threshold: f64) -> Snapshot {
    snapshot
        .into_iter()
        .filter(|p| p.cpu_percent >= cpu_threshold || p.memory_percent >= mem_threshold)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub descending: bool,
}

/// Declarative transform selection. `None` disables a stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<String>,
    pub sort: Option<SortSpec>,
    pub anomalies: Option<Thresholds>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, keyword: impl Into<String>) -> Self {
        self.filter = Some(keyword.into());
        self
    }

    pub fn with_sort(mut self, field: SortField, descending: bool) -> Self {
        self.sort = Some(SortSpec { field, descending });
        self
    }

    pub fn with_anomalies(mut self, thresholds: Thresholds) -> Self {
        self.anomalies = Some(thresholds);
        self
    }

    pub fn apply(&self, mut snapshot: Snapshot) -> Snapshot {
        if let Some(keyword) = &self.filter {
            snapshot = filter(snapshot, keyword);
        }
        if let Some(spec) = self.sort {
            snapshot = sort(snapshot, spec.field, spec.descending);
        }
        if let Some(thresholds) = self.anomalies {
            snapshot = detect_anomalies(snapshot, thresholds.cpu(), thresholds.mem());
        }
        snapshot
    }
}
