//! Canonical progress store with write-through persistence.
//!
//! The store is the exclusive owner of the mutable [`GameProgress`]
//! record. Mutations are staged on a clone and swapped in whole, so a
//! panicking mutator can never expose a half-updated record, and every
//! commit writes the JSON blob through to storage before anyone is
//! notified. Persistence failures leave the in-memory record
//! authoritative for the session; the next successful save reconciles.

use std::sync::{Arc, RwLock};

use progress_core::GameProgress;

use crate::storage::KeyValueStore;

/// Storage key of the persisted progress blob.
pub const SAVE_KEY: &str = "game_progress";

/// Owner of the canonical record.
pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
    record: RwLock<Option<GameProgress>>,
}

impl ProgressStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            record: RwLock::new(None),
        }
    }

    /// Loads a persisted record if one exists (regardless of `name`, so a
    /// returning player continues), otherwise creates a fresh one. Always
    /// persists and replaces any previous in-memory record.
    pub fn initialize(&self, name: &str) -> GameProgress {
        let progress = match self.load_saved() {
            Some(saved) => {
                tracing::info!(
                    target: "engine::store",
                    player = %saved.player_name,
                    missions = saved.completed_missions.len(),
                    "resuming saved progress"
                );
                saved
            }
            None => {
                tracing::info!(target: "engine::store", player = name, "starting fresh progress");
                GameProgress::new(name)
            }
        };

        match self.record.write() {
            Ok(mut slot) => *slot = Some(progress.clone()),
            Err(_) => {
                tracing::error!(target: "engine::store", "record lock poisoned during initialize");
            }
        }
        self.persist(&progress);
        progress
    }

    /// Immutable snapshot of the current record, `None` before
    /// initialization.
    pub fn snapshot(&self) -> Option<GameProgress> {
        match self.record.read() {
            Ok(slot) => slot.clone(),
            Err(_) => {
                tracing::error!(target: "engine::store", "record lock poisoned during snapshot");
                None
            }
        }
    }

    /// Applies `mutate` to a staged clone, commits it whole, persists,
    /// and returns the committed snapshot. `None` when no record exists.
    ///
    /// The mutator runs on the staged clone with no lock held: a
    /// panicking mutator unwinds before the swap, leaving the previous
    /// record in place and the lock unpoisoned.
    pub fn commit<F>(&self, mutate: F) -> Option<GameProgress>
    where
        F: FnOnce(&mut GameProgress),
    {
        let mut staged = self.snapshot()?;
        mutate(&mut staged);

        match self.record.write() {
            Ok(mut slot) => *slot = Some(staged.clone()),
            Err(_) => {
                tracing::error!(target: "engine::store", "record lock poisoned during commit");
                return None;
            }
        }

        self.persist(&staged);
        Some(staged)
    }

    fn load_saved(&self) -> Option<GameProgress> {
        let blob = match self.kv.get(SAVE_KEY) {
            Ok(blob) => blob?,
            Err(error) => {
                tracing::warn!(target: "engine::store", %error, "failed to read saved progress");
                return None;
            }
        };

        match serde_json::from_str::<GameProgress>(&blob) {
            Ok(progress) => Some(progress),
            Err(error) => {
                // Corrupted save: fall back to a fresh record rather than
                // refusing to start.
                tracing::warn!(target: "engine::store", %error, "saved progress is corrupt, discarding");
                None
            }
        }
    }

    fn persist(&self, progress: &GameProgress) {
        let blob = match serde_json::to_string(progress) {
            Ok(blob) => blob,
            Err(error) => {
                tracing::warn!(target: "engine::store", %error, "failed to serialize progress");
                return;
            }
        };

        if let Err(error) = self.kv.set(SAVE_KEY, &blob) {
            tracing::warn!(
                target: "engine::store",
                %error,
                "failed to persist progress; in-memory state remains authoritative"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use progress_core::{AuditKind, MissionId, QuizSession};

    fn store() -> (Arc<InMemoryStore>, ProgressStore) {
        let kv = Arc::new(InMemoryStore::new());
        let store = ProgressStore::new(kv.clone());
        (kv, store)
    }

    #[test]
    fn initialize_creates_and_persists_fresh_record() {
        let (kv, store) = store();
        let progress = store.initialize("Ana");

        assert_eq!(progress.player_name, "Ana");
        assert_eq!(progress.level, 1);
        assert!(kv.get(SAVE_KEY).unwrap().is_some());
    }

    #[test]
    fn initialize_prefers_saved_record_over_name() {
        let (kv, store) = store();
        store.initialize("Ana");
        store.commit(|p| p.coins = 40).unwrap();

        let resumed = ProgressStore::new(kv);
        let progress = resumed.initialize("Bruno");
        assert_eq!(progress.player_name, "Ana");
        assert_eq!(progress.coins, 40);
    }

    #[test]
    fn commit_before_initialize_is_a_no_op() {
        let (_kv, store) = store();
        assert!(store.commit(|p| p.coins = 1).is_none());
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn round_trip_drops_active_quiz() {
        let (kv, store) = store();
        store.initialize("Ana");
        store
            .commit(|p| {
                p.coins = 10;
                p.push_audit(AuditKind::CoinGrant, 10, 1_000);
                p.active_quiz = Some(QuizSession {
                    mission_id: MissionId(1),
                    started_at_ms: 1_000,
                });
            })
            .unwrap();

        let reloaded = ProgressStore::new(kv);
        let progress = reloaded.initialize("ignored");
        assert_eq!(progress.coins, 10);
        assert_eq!(progress.audit_trail.len(), 1);
        assert!(progress.active_quiz.is_none());
    }

    #[test]
    fn panicking_mutator_leaves_the_store_usable() {
        let (_kv, store) = store();
        store.initialize("Ana");

        let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store.commit(|_| panic!("mutator bug"));
        }));
        assert!(unwound.is_err());

        // The previous record is still there and commits keep working.
        let progress = store.snapshot().expect("record survives the unwind");
        assert_eq!(progress.player_name, "Ana");
        assert_eq!(progress.coins, 0);

        assert!(store.commit(|p| p.coins = 7).is_some());
        assert_eq!(store.snapshot().unwrap().coins, 7);
    }

    #[test]
    fn corrupt_blob_falls_back_to_fresh() {
        let (kv, _) = store();
        kv.set(SAVE_KEY, "{not json").unwrap();

        let store = ProgressStore::new(kv);
        let progress = store.initialize("Ana");
        assert_eq!(progress.player_name, "Ana");
        assert!(progress.completed_missions.is_empty());
    }
}
