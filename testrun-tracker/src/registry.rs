//! Run registry
//!
//! Holds the latest known status of every tracked run. Entries are created
//! by the launcher (seeded as Queued) and updated only through the
//! transition policy. The engine never deletes entries; a consumer may.
//!
//! Runs live in a sharded `DashMap`, so a merge only locks the shard holding
//! its run and updates for different runs do not contend. Consumers observe
//! changes either by pulling snapshots or by subscribing to `RegistryEvent`s.

use std::collections::HashMap;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use testrun_core::domain::run::{Run, RunId, StatusCode, StatusRecord, TrackedRun};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::policy::{self, MergeVerdict};

const EVENT_CAPACITY: usize = 256;

/// Change notification emitted by the registry
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    /// A launched run was seeded
    Inserted(RunId),
    /// A run's record changed
    Updated { run_id: RunId, record: StatusRecord },
    /// A consumer removed a run
    Removed(RunId),
}

/// Thread-safe store of tracked runs
pub struct RunRegistry {
    runs: DashMap<RunId, TrackedRun>,
    events: broadcast::Sender<RegistryEvent>,
}

impl RunRegistry {
    pub fn new() -> Self {
        let (events, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self {
            runs: DashMap::new(),
            events,
        }
    }

    /// Seeds a freshly launched run as Queued at checkpoint 0
    ///
    /// Returns `false` and leaves the existing entry untouched when the id is
    /// already tracked.
    pub fn insert(&self, run: Run) -> bool {
        let run_id = run.run_id.clone();

        match self.runs.entry(run_id.clone()) {
            Entry::Occupied(_) => return false,
            Entry::Vacant(slot) => {
                slot.insert(TrackedRun {
                    run,
                    record: StatusRecord::queued(),
                    last_known: StatusCode::Queued,
                    updated_at: Utc::now(),
                });
            }
        }

        self.notify(RegistryEvent::Inserted(run_id));
        true
    }

    /// Merges an incoming record through the transition policy
    ///
    /// Returns `None` when the run is not tracked (never launched here, or
    /// removed by the consumer), otherwise the policy's verdict.
    pub fn merge(&self, run_id: &RunId, incoming: StatusRecord) -> Option<MergeVerdict> {
        let (verdict, changed) = {
            let mut entry = self.runs.get_mut(run_id)?;
            let verdict = policy::evaluate(&entry.record, entry.last_known, &incoming);

            if !verdict.is_applied() {
                (verdict, None)
            } else if entry.record == incoming {
                // Same report seen twice, nothing to announce
                (verdict, None)
            } else {
                if let StatusCode::Unknown(code) = incoming.status {
                    if entry.record.status != incoming.status {
                        warn!(run_id = %run_id, code, "Gateway reported an unrecognised status code");
                    }
                }
                entry.last_known = policy::high_water(entry.last_known, incoming.status);
                entry.record = incoming.clone();
                entry.updated_at = Utc::now();
                (verdict, Some(incoming))
            }
        };

        match changed {
            Some(record) => {
                debug!(
                    run_id = %run_id,
                    status = %record.status,
                    checkpoint = record.checkpoint,
                    "Run status updated"
                );
                self.notify(RegistryEvent::Updated {
                    run_id: run_id.clone(),
                    record,
                });
            }
            None if !verdict.is_applied() => {
                debug!(run_id = %run_id, ?verdict, "Dropped status update");
            }
            None => {}
        }

        Some(verdict)
    }

    /// Returns a copy of one tracked run
    pub fn get(&self, run_id: &RunId) -> Option<TrackedRun> {
        self.runs.get(run_id).map(|entry| entry.value().clone())
    }

    /// Point-in-time copy of every run's status
    pub fn snapshot(&self) -> HashMap<RunId, StatusRecord> {
        self.runs
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().record.clone()))
            .collect()
    }

    /// All tracked runs, oldest launch first
    pub fn runs(&self) -> Vec<TrackedRun> {
        let mut runs: Vec<TrackedRun> = self.runs.iter().map(|entry| entry.value().clone()).collect();
        runs.sort_by(|a, b| {
            a.run
                .launched_at
                .cmp(&b.run.launched_at)
                .then_with(|| a.run.run_id.cmp(&b.run.run_id))
        });
        runs
    }

    /// Ids of every run that still needs polling
    pub fn pending(&self) -> Vec<RunId> {
        self.runs
            .iter()
            .filter(|entry| !entry.value().record.is_terminal())
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Removes a run on the consumer's behalf
    pub fn remove(&self, run_id: &RunId) -> Option<TrackedRun> {
        let removed = self.runs.remove(run_id).map(|(_, run)| run);
        if removed.is_some() {
            self.notify(RegistryEvent::Removed(run_id.clone()));
        }
        removed
    }

    /// Subscribes to change notifications
    ///
    /// Slow subscribers may observe `RecvError::Lagged` and should resync
    /// from `snapshot()`.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    fn notify(&self, event: RegistryEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl Default for RunRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn run(id: &str) -> Run {
        Run {
            run_id: RunId::from(id),
            suite_id: "S1".to_string(),
            project_name: "P1".to_string(),
            launched_at: Utc::now(),
        }
    }

    #[test]
    fn test_insert_seeds_queued_record() {
        let registry = RunRegistry::new();
        assert!(registry.insert(run("r-1")));

        let snapshot = registry.snapshot();
        let record = &snapshot[&RunId::from("r-1")];
        assert_eq!(record.status, StatusCode::Queued);
        assert_eq!(record.checkpoint, 0);
    }

    #[test]
    fn test_insert_duplicate_keeps_existing() {
        let registry = RunRegistry::new();
        registry.insert(run("r-1"));
        registry.merge(&RunId::from("r-1"), StatusRecord::new(StatusCode::Running, 1));

        assert!(!registry.insert(run("r-1")));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(&RunId::from("r-1")).unwrap().record.status,
            StatusCode::Running
        );
    }

    #[test]
    fn test_merge_unknown_run_is_ignored() {
        let registry = RunRegistry::new();
        let verdict = registry.merge(&RunId::from("ghost"), StatusRecord::new(StatusCode::Done, 1));

        assert!(verdict.is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_stale_merge_leaves_record() {
        let registry = RunRegistry::new();
        let id = RunId::from("r-1");
        registry.insert(run("r-1"));
        registry.merge(&id, StatusRecord::new(StatusCode::Running, 2));

        let verdict = registry.merge(&id, StatusRecord::new(StatusCode::Running, 1));

        assert_eq!(verdict, Some(MergeVerdict::Stale));
        assert_eq!(registry.get(&id).unwrap().record.checkpoint, 2);
    }

    #[test]
    fn test_pending_excludes_terminal_runs() {
        let registry = RunRegistry::new();
        registry.insert(run("r-1"));
        registry.insert(run("r-2"));
        registry.insert(run("r-3"));
        registry.merge(&RunId::from("r-2"), StatusRecord::new(StatusCode::Done, 1));
        registry.merge(&RunId::from("r-3"), StatusRecord::new(StatusCode::Unknown(7), 1));

        let mut pending = registry.pending();
        pending.sort();

        assert_eq!(pending, vec![RunId::from("r-1"), RunId::from("r-3")]);
    }

    #[test]
    fn test_events_are_broadcast() {
        let registry = RunRegistry::new();
        let mut rx = registry.subscribe();
        let id = RunId::from("r-1");

        registry.insert(run("r-1"));
        registry.merge(&id, StatusRecord::new(StatusCode::Running, 1));
        // Duplicate report: applied but unchanged, no event
        registry.merge(&id, StatusRecord::new(StatusCode::Running, 1));
        // Stale report: dropped, no event
        registry.merge(&id, StatusRecord::new(StatusCode::Queued, 0));
        registry.remove(&id);

        assert_eq!(rx.try_recv().unwrap(), RegistryEvent::Inserted(id.clone()));
        assert_eq!(
            rx.try_recv().unwrap(),
            RegistryEvent::Updated {
                run_id: id.clone(),
                record: StatusRecord::new(StatusCode::Running, 1),
            }
        );
        assert_eq!(rx.try_recv().unwrap(), RegistryEvent::Removed(id));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unknown_code_does_not_open_a_path_backwards() {
        let registry = RunRegistry::new();
        let id = RunId::from("r-1");
        registry.insert(run("r-1"));

        registry.merge(&id, StatusRecord::new(StatusCode::Running, 1));
        let via_unknown = registry.merge(&id, StatusRecord::new(StatusCode::Unknown(9), 2));
        let back = registry.merge(&id, StatusRecord::new(StatusCode::Queued, 3));

        assert_eq!(via_unknown, Some(MergeVerdict::Applied));
        assert_eq!(back, Some(MergeVerdict::Regression));

        let tracked = registry.get(&id).unwrap();
        assert_eq!(tracked.record, StatusRecord::new(StatusCode::Unknown(9), 2));
        assert_eq!(tracked.last_known, StatusCode::Running);

        // Moving forward again is still accepted
        registry.merge(&id, StatusRecord::new(StatusCode::Done, 4));
        assert_eq!(registry.get(&id).unwrap().record.status, StatusCode::Done);
    }

    #[test]
    fn test_remove_then_merge_is_noop() {
        let registry = RunRegistry::new();
        let id = RunId::from("r-1");
        registry.insert(run("r-1"));

        assert!(registry.remove(&id).is_some());
        assert!(registry.merge(&id, StatusRecord::new(StatusCode::Running, 1)).is_none());
        assert!(registry.get(&id).is_none());
    }

    #[test]
    fn test_concurrent_merges_for_one_run_keep_highest_checkpoint() {
        let registry = Arc::new(RunRegistry::new());
        let id = RunId::from("r-1");
        registry.insert(run("r-1"));

        let handles: Vec<_> = (1..=16u64)
            .map(|checkpoint| {
                let registry = Arc::clone(&registry);
                let id = id.clone();
                std::thread::spawn(move || {
                    registry.merge(&id, StatusRecord::new(StatusCode::Running, checkpoint));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.get(&id).unwrap().record.checkpoint, 16);
    }

    #[test]
    fn test_runs_ordered_by_launch() {
        let registry = RunRegistry::new();
        let mut first = run("b");
        first.launched_at = Utc::now() - chrono::Duration::seconds(10);
        registry.insert(first);
        registry.insert(run("a"));

        let ids: Vec<_> = registry.runs().into_iter().map(|r| r.run.run_id).collect();
        assert_eq!(ids, vec![RunId::from("b"), RunId::from("a")]);
    }
}
