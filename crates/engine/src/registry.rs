//! Rendering-layer world registry.
//!
//! The scene/world code reads this registry directly to decide which
//! mission markers are locked, unlocked, or completed; it never calls back
//! into the facade, which keeps presentation and progression free of a
//! circular dependency. The registry is strictly derived state: the
//! [`crate::SyncBridge`] overwrites it after every mutation and reconciles
//! it on the periodic tick.

use std::sync::RwLock;

use progress_core::MissionId;

/// The mirrored fields, as one copyable view.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistryView {
    pub player_name: String,
    pub coins: u64,
    pub badges: Vec<String>,
    pub completed_missions: Vec<MissionId>,
    pub total_score: u64,
    pub level: u8,
}

impl Default for RegistryView {
    /// Pre-mirror view: a fresh record always starts at level 1.
    fn default() -> Self {
        Self {
            player_name: String::new(),
            coins: 0,
            badges: Vec::new(),
            completed_missions: Vec::new(),
            total_score: 0,
            level: 1,
        }
    }
}

/// Externally readable mirror of the canonical progress.
///
/// Write access exists because the registry lives outside the engine's
/// ownership: any code holding it can overwrite the view, and the bridge's
/// reconciliation is what detects and repairs such divergence.
pub struct WorldRegistry {
    view: RwLock<RegistryView>,
}

impl WorldRegistry {
    pub fn new() -> Self {
        Self {
            view: RwLock::new(RegistryView::default()),
        }
    }

    /// Full copy of the current view.
    pub fn view(&self) -> RegistryView {
        self.view
            .read()
            .map(|view| view.clone())
            .unwrap_or_default()
    }

    /// Replaces the whole view. Divergence repair is always a full
    /// re-copy, never a field-level merge.
    pub fn overwrite(&self, view: RegistryView) {
        match self.view.write() {
            Ok(mut slot) => *slot = view,
            Err(_) => {
                tracing::error!(target: "engine::registry", "registry lock poisoned");
            }
        }
    }

    pub fn coins(&self) -> u64 {
        self.view.read().map(|view| view.coins).unwrap_or(0)
    }

    pub fn level(&self) -> u8 {
        self.view.read().map(|view| view.level).unwrap_or(1)
    }

    /// Used by world code to render mission markers.
    pub fn is_mission_completed(&self, id: MissionId) -> bool {
        self.view
            .read()
            .map(|view| view.completed_missions.contains(&id))
            .unwrap_or(false)
    }
}

impl Default for WorldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_registry_reports_level_one() {
        let registry = WorldRegistry::new();
        assert_eq!(registry.level(), 1);
        assert_eq!(registry.view().level, 1);
    }

    #[test]
    fn overwrite_replaces_everything() {
        let registry = WorldRegistry::new();
        registry.overwrite(RegistryView {
            player_name: "Ana".into(),
            coins: 50,
            badges: vec!["Order of Operations".into()],
            completed_missions: vec![MissionId(1)],
            total_score: 130,
            level: 1,
        });

        assert_eq!(registry.coins(), 50);
        assert!(registry.is_mission_completed(MissionId(1)));
        assert!(!registry.is_mission_completed(MissionId(2)));

        registry.overwrite(RegistryView::default());
        assert_eq!(registry.coins(), 0);
        assert!(!registry.is_mission_completed(MissionId(1)));
    }
}
