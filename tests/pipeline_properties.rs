use std::collections::HashSet;

use proptest::prelude::*;
use procsnap::pipeline::{SortField, detect_anomalies, filter, sort};
use procsnap::system::process::ProcessRecord;
use procsnap::system::relationship::{ParentMap, annotate_with};
use procsnap::system::snapshot::Snapshot;

fn record_strategy(pid: u32) -> impl Strategy<Value = ProcessRecord> {
    ("[a-zA-Z_-]{0,10}", 0.0f64..400.0, 0.0f64..100.0)
        .prop_map(move |(name, cpu, mem)| ProcessRecord::new(pid, name, cpu, mem))
}

fn snapshot_strategy() -> impl Strategy<Value = Snapshot> {
    prop::collection::hash_set(1u32..5_000, 0..40)
        .prop_flat_map(|pids| {
            let records: Vec<_> = pids.into_iter().map(record_strategy).collect();
            records
        })
        .prop_map(Snapshot::new)
}

/// Single-core CPU readings: capped at 100, with many records sitting exactly on it.
fn capped_snapshot_strategy() -> impl Strategy<Value = Snapshot> {
    snapshot_strategy().prop_map(|snapshot| {
        snapshot
            .into_iter()
            .map(|mut p| {
                p.cpu_percent = p.cpu_percent.min(100.0);
                p
            })
            .collect()
    })
}

fn field_strategy() -> impl Strategy<Value = SortField> {
    prop::sample::select(SortField::ALL.to_vec())
}

fn pids(snapshot: &Snapshot) -> Vec<u32> {
    snapshot.iter().map(|p| p.pid).collect()
}

proptest! {
    #[test]
    fn annotate_flags_every_record(
        snapshot in snapshot_strategy(),
        edges in prop::collection::vec((1u32..5_000, 1u32..5_000), 0..60),
    ) {
        let parents: ParentMap = edges.into_iter().collect();
        let annotated = annotate_with(snapshot.clone(), &parents);

        prop_assert_eq!(pids(&annotated), pids(&snapshot));
        let members: HashSet<u32> = snapshot.pids();
        for process in &annotated {
            let expected = parents
                .parent_of(process.pid)
                .is_some_and(|ppid| members.contains(&ppid));
            prop_assert_eq!(process.is_child, Some(expected));
        }
    }

    #[test]
    fn empty_filter_is_identity(snapshot in snapshot_strategy()) {
        prop_assert_eq!(filter(snapshot.clone(), ""), snapshot);
    }

    #[test]
    fn filter_keeps_matching_records_in_order(
        snapshot in snapshot_strategy(),
        keyword in "[a-zA-Z]{1,3}",
    ) {
        let needle = keyword.to_lowercase();
        let expected: Vec<u32> = snapshot
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .map(|p| p.pid)
            .collect();
        prop_assert_eq!(pids(&filter(snapshot, &keyword)), expected);
    }

    #[test]
    fn sort_is_a_permutation(snapshot in snapshot_strategy(), field in field_strategy(), desc in any::<bool>()) {
        let mut before = pids(&snapshot);
        let mut after = pids(&sort(snapshot, field, desc));
        before.sort_unstable();
        after.sort_unstable();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn sort_is_idempotent(snapshot in snapshot_strategy(), field in field_strategy(), desc in any::<bool>()) {
        let once = sort(snapshot, field, desc);
        let twice = sort(once.clone(), field, desc);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn descending_reverses_ascending_on_unique_keys(snapshot in snapshot_strategy()) {
        let ascending = sort(snapshot, SortField::Pid, false);
        let mut descending = pids(&sort(ascending.clone(), SortField::Pid, true));
        descending.reverse();
        prop_assert_eq!(descending, pids(&ascending));
    }

    #[test]
    fn sorted_output_is_ordered(snapshot in snapshot_strategy()) {
        let sorted = sort(snapshot, SortField::CpuPercent, true);
        for pair in sorted.processes.windows(2) {
            prop_assert!(pair[0].cpu_percent >= pair[1].cpu_percent);
        }
    }

    #[test]
    fn anomalies_match_inclusive_or(
        snapshot in snapshot_strategy(),
        cpu in 0.0f64..=100.0,
        mem in 0.0f64..=100.0,
    ) {
        let expected: Vec<u32> = snapshot
            .iter()
            .filter(|p| p.cpu_percent >= cpu || p.memory_percent >= mem)
            .map(|p| p.pid)
            .collect();
        prop_assert_eq!(pids(&detect_anomalies(snapshot, cpu, mem)), expected);
    }

    #[test]
    fn anomaly_threshold_extremes(snapshot in snapshot_strategy()) {
        prop_assert!(detect_anomalies(snapshot.clone(), 101.0, 101.0).iter().all(|p| p.cpu_percent >= 101.0));
        prop_assert_eq!(detect_anomalies(snapshot.clone(), 0.0, 0.0), snapshot);
    }

    #[test]
    fn thresholds_above_100_flag_nothing_when_cpu_is_capped(snapshot in capped_snapshot_strategy()) {
        prop_assert!(detect_anomalies(snapshot.clone(), 101.0, 101.0).is_empty());
        prop_assert_eq!(
            detect_anomalies(snapshot.clone(), 100.0, 101.0).len(),
            snapshot.iter().filter(|p| p.cpu_percent >= 100.0).count()
        );
    }

    #[test]
    fn filter_and_sort_commute(
        snapshot in snapshot_strategy(),
        keyword in "[a-z]{0,2}",
        field in field_strategy(),
        desc in any::<bool>(),
    ) {
        let filter_first = sort(filter(snapshot.clone(), &keyword), field, desc);
        let sort_first = filter(sort(snapshot, field, desc), &keyword);
        prop_assert_eq!(filter_first, sort_first);
    }
}
