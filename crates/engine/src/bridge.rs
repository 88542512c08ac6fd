//! One-way state mirror into the world registry.

use std::sync::Arc;

use progress_core::GameProgress;

use crate::registry::{RegistryView, WorldRegistry};

/// Projects the canonical record into the rendering-layer registry.
///
/// Mirroring happens after every mutation; because all engine operations
/// run to completion on one logical thread, the mirror is consistent the
/// moment a mutation returns. [`SyncBridge::reconcile`] is the defensive
/// periodic pass for the case where external code wrote to the registry
/// directly.
pub struct SyncBridge {
    registry: Arc<WorldRegistry>,
}

impl SyncBridge {
    pub fn new(registry: Arc<WorldRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> Arc<WorldRegistry> {
        Arc::clone(&self.registry)
    }

    /// Full re-copy of the mirrored fields from the canonical record.
    pub fn mirror(&self, progress: &GameProgress) {
        self.registry.overwrite(Self::project(progress));
        tracing::trace!(
            target: "engine::bridge",
            coins = progress.coins,
            level = progress.level,
            "mirrored progress into world registry"
        );
    }

    /// Compares a mirrored probe field (coins) against canonical state and
    /// re-mirrors everything on mismatch. Returns true if a re-mirror
    /// happened.
    pub fn reconcile(&self, progress: &GameProgress) -> bool {
        if self.registry.coins() == progress.coins {
            return false;
        }

        tracing::warn!(
            target: "engine::bridge",
            mirrored = self.registry.coins(),
            canonical = progress.coins,
            "world registry diverged from canonical progress, re-mirroring"
        );
        self.mirror(progress);
        true
    }

    fn project(progress: &GameProgress) -> RegistryView {
        RegistryView {
            player_name: progress.player_name.clone(),
            coins: progress.coins,
            badges: progress.badges.clone(),
            completed_missions: progress.completed_missions.iter().copied().collect(),
            total_score: progress.total_score,
            level: progress.level,
        }
    }
}
