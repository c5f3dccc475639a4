use std::collections::HashSet;

use serde::Serialize;

use super::process::ProcessRecord;

/// Ordered records captured at approximately one instant.
///
/// Built fresh by every acquisition and never shared between callers.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub processes: Vec<ProcessRecord>,
}

impl Snapshot {
    pub fn new(processes: Vec<ProcessRecord>) -> Self {
        Snapshot { processes }
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessRecord> {
        self.processes.iter()
    }

    pub fn pids(&self) -> HashSet<u32> {
        self.processes.iter().map(|p| p.pid).collect()
    }

    pub fn get(&self, pid: u32) -> Option<&ProcessRecord> {
        self.processes.iter().find(|p| p.pid == pid)
    }

    /// True once every record carries an `is_child` flag.
    pub fn is_annotated(&self) -> bool {
        self.processes.iter().all(ProcessRecord::is_annotated)
    }
}

impl From<Vec<ProcessRecord>> for Snapshot {
    fn from(processes: Vec<ProcessRecord>) -> Self {
        Snapshot { processes }
    }
}

impl FromIterator<ProcessRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = ProcessRecord>>(iter: I) -> Self {
        Snapshot {
            processes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Snapshot {
    type Item = ProcessRecord;
    type IntoIter = std::vec::IntoIter<ProcessRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.processes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a ProcessRecord;
    type IntoIter = std::slice::Iter<'a, ProcessRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.processes.iter()
    }
}
