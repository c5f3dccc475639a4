//! Acquisition and annotation against a scripted process table that
//! changes between reads.

use std::collections::HashMap;

use procsnap::error::{Error, Result};
use procsnap::monitor::Monitor;
use procsnap::pipeline::{Query, SortField};
use procsnap::system::process::ProcessSample;
use procsnap::system::relationship::ParentMap;
use procsnap::system::source::{ProcessReadError, ProcessTable, acquire};
use procsnap::system::annotate;

/// Lists `listed`, but only `live` can still be read afterwards; the parent
/// table is read from `parents` at annotation time.
#[derive(Default)]
struct ScriptedTable {
    listed: Vec<u32>,
    live: HashMap<u32, ProcessSample>,
    parents: HashMap<u32, u32>,
    enumerations: usize,
    unavailable: bool,
}

impl ScriptedTable {
    fn with(mut self, pid: u32, name: &str, ppid: Option<u32>) -> Self {
        self.listed.push(pid);
        self.live.insert(
            pid,
            ProcessSample {
                pid,
                name: name.to_string(),
                cpu_percent: 1.0,
                memory_percent: 1.0,
            },
        );
        if let Some(ppid) = ppid {
            self.parents.insert(pid, ppid);
        }
        self
    }

    fn exit(&mut self, pid: u32) {
        self.live.remove(&pid);
        self.parents.remove(&pid);
    }
}

impl ProcessTable for ScriptedTable {
    fn enumerate(&mut self) -> Result<Vec<u32>> {
        if self.unavailable {
            return Err(Error::SourceUnavailable("permission denied".into()));
        }
        self.enumerations += 1;
        Ok(self.listed.clone())
    }

    fn sample(&self, pid: u32) -> std::result::Result<ProcessSample, ProcessReadError> {
        self.live.get(&pid).cloned().ok_or(ProcessReadError::Vanished(pid))
    }

    fn parent_pids(&mut self) -> Result<ParentMap> {
        Ok(self.parents.clone().into())
    }
}

fn pids(snapshot: &procsnap::Snapshot) -> Vec<u32> {
    snapshot.iter().map(|p| p.pid).collect()
}

#[test]
fn process_exiting_after_listing_is_dropped_silently() {
    let mut table = ScriptedTable::default()
        .with(1, "init", None)
        .with(2, "shell", Some(1))
        .with(3, "short-lived", Some(2));
    table.exit(3);

    let snapshot = acquire(&mut table).expect("a vanished process must not fail the call");
    assert_eq!(pids(&snapshot), vec![1, 2]);
}

#[test]
fn documented_annotation_example() {
    let mut table = ScriptedTable::default()
        .with(1, "a", None)
        .with(2, "b", Some(1))
        .with(3, "c", Some(99));

    let snapshot = acquire(&mut table).unwrap();
    let annotated = annotate(snapshot, &mut table).unwrap();
    let flags: Vec<Option<bool>> = annotated.iter().map(|p| p.is_child).collect();
    assert_eq!(flags, vec![Some(false), Some(true), Some(false)]);
}

#[test]
fn parent_lost_between_reads_yields_not_child() {
    let mut table = ScriptedTable::default()
        .with(10, "parent", None)
        .with(11, "child", Some(10));

    let snapshot = acquire(&mut table).unwrap();
    // Child exits after the snapshot but before the parent table is read.
    table.exit(11);
    let annotated = annotate(snapshot, &mut table).unwrap();

    assert_eq!(annotated.len(), 2);
    assert_eq!(annotated.get(11).and_then(|p| p.is_child), Some(false));
}

#[test]
fn parent_outside_snapshot_is_not_a_parent() {
    // Pid 50 is known to the OS-wide parent table but was never listed.
    let mut table = ScriptedTable::default().with(51, "orphaned", Some(50));
    table.parents.insert(50, 1);

    let snapshot = acquire(&mut table).unwrap();
    let annotated = annotate(snapshot, &mut table).unwrap();
    assert_eq!(annotated.get(51).and_then(|p| p.is_child), Some(false));
}

#[test]
fn monitor_reacquires_on_every_call() {
    let table = ScriptedTable::default()
        .with(5, "beta", None)
        .with(4, "alpha", Some(5));
    let mut monitor = Monitor::new(table);
    let query = Query::new().with_sort(SortField::Name, false);

    let first = monitor.snapshot(&query).unwrap();
    let second = monitor.snapshot(&query).unwrap();

    assert_eq!(pids(&first), vec![4, 5]);
    assert_eq!(first, second);
    assert_eq!(monitor.table().enumerations, 2);
}

#[test]
fn enumeration_failure_reaches_the_caller() {
    let table = ScriptedTable {
        unavailable: true,
        ..ScriptedTable::default()
    };
    let mut monitor = Monitor::new(table);
    let err = monitor.snapshot(&Query::new()).unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable(_)));
    assert!(err.to_string().contains("permission denied"));
}
