use std::collections::HashMap;

use tracing::debug;

use super::snapshot::Snapshot;
use super::source::ProcessTable;
use crate::error::Result;

/// OS-wide pid to parent-pid mapping.
///
/// Usually broader than any one snapshot. Pids with no known parent are absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParentMap {
    parents: HashMap<u32, u32>,
}

impl ParentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pid: u32, ppid: u32) {
        self.parents.insert(pid, ppid);
    }

    pub fn parent_of(&self, pid: u32) -> Option<u32> {
        self.parents.get(&pid).copied()
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl FromIterator<(u32, u32)> for ParentMap {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        ParentMap {
            parents: iter.into_iter().collect(),
        }
    }
}

impl From<HashMap<u32, u32>> for ParentMap {
    fn from(parents: HashMap<u32, u32>) -> Self {
        ParentMap { parents }
    }
}

/// Reads the parent mapping through `table` and flags every record.
pub fn annotate<T: ProcessTable + ?Sized>(snapshot: Snapshot, table: &mut T) -> Result<Snapshot> {
    let _span = tracing::debug_span!("relationship.annotate").entered();
    let parents = table.parent_pids()?;
    Ok(annotate_with(snapshot, &parents))
}

/// Sets `is_child` on every record: true iff its parent is known and is
/// itself part of the snapshot.
pub fn annotate_with(mut snapshot: Snapshot, parents: &ParentMap) -> Snapshot {
    let members = snapshot.pids();
    let mut children = 0usize;

    for process in &mut snapshot.processes {
        let is_child = parents
            .parent_of(process.pid)
            .is_some_and(|ppid| members.contains(&ppid));
        children += usize::from(is_child);
        process.is_child = Some(is_child);
    }

    debug!(total = snapshot.len(), children, "snapshot annotated");
    snapshot
}
