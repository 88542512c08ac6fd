//! The public progression facade.
//!
//! [`GameStateManager`] is the single entry point for UI and world code:
//! it owns the store, notifier, and bridge, and consults the pure rules
//! from `progress-core`. Every mutation follows the same path: stage and
//! commit (which persists), then notify subscribers, then mirror into the
//! world registry.
//!
//! Expected control-flow outcomes (locked mission, wrong answer, stale
//! submission, duplicate item) are plain return values, never errors.

use std::sync::{Arc, Mutex};

use progress_core::{
    AuditKind, GameProgress, MissionId, PlayerStats, QuizSession, SpeedRule, achievements,
    missions, scoring, sentinel,
};
use progress_content::MissionCatalog;

use crate::bridge::SyncBridge;
use crate::clock::{Clock, SystemClock};
use crate::notifier::{ChangeNotifier, SubscriberId};
use crate::registry::WorldRegistry;
use crate::storage::{InMemoryStore, KeyValueStore};
use crate::store::ProgressStore;

/// Graded outcome of one quiz submission.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QuizResult {
    pub is_correct: bool,
    pub time_spent_secs: f64,
    pub time_bonus: u64,
}

/// What [`GameStateManager::submit_quiz_answer`] hands back.
///
/// `updated` is true only when the submission completed a mission and the
/// record changed; a wrong answer, a stale submission, or a re-submission
/// for an already-completed mission all leave it false.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SubmitOutcome {
    pub result: QuizResult,
    pub updated: bool,
}

/// The progression engine's single public entry point.
///
/// Construct one instance at application start (see [`builder`]) and pass
/// it by reference to every consumer. All operations are synchronous and
/// run to completion; no locks are exposed to callers.
///
/// [`builder`]: GameStateManager::builder
pub struct GameStateManager {
    store: ProgressStore,
    notifier: ChangeNotifier,
    bridge: SyncBridge,
    clock: Arc<dyn Clock>,
    catalog: MissionCatalog,
    speed_rules: Vec<SpeedRule>,
    last_tick_ms: Mutex<Option<i64>>,
}

impl GameStateManager {
    /// Starts building an engine around the given content catalog.
    pub fn builder(catalog: MissionCatalog) -> GameStateManagerBuilder {
        GameStateManagerBuilder::new(catalog)
    }

    /// Loads a persisted record if one exists (regardless of `name`, to
    /// support "continue"), otherwise creates a fresh one. Always persists
    /// and replaces any previous in-memory record.
    pub fn initialize_game(&self, name: &str) -> GameProgress {
        let progress = self.store.initialize(name);
        if let Ok(mut last) = self.last_tick_ms.lock() {
            *last = Some(self.clock.now_ms());
        }
        self.after_mutation(&progress);
        progress
    }

    /// Opens a quiz session for `id`.
    ///
    /// Fails when the mission is already completed, inaccessible, or has
    /// no content. Starting a new quiz silently discards any previous
    /// session: there is only ever one in-flight quiz.
    pub fn start_quiz(&self, id: MissionId) -> bool {
        let Some(progress) = self.store.snapshot() else {
            return false;
        };

        if progress.completed_missions.contains(&id)
            || !missions::is_accessible(id, &progress.completed_missions)
        {
            tracing::debug!(target: "engine::facade", %id, "quiz refused: locked or completed");
            return false;
        }
        if self.catalog.get(id).is_none() {
            tracing::warn!(target: "engine::facade", %id, "quiz refused: no content");
            return false;
        }

        let started_at_ms = self.clock.now_ms();
        let committed = self.store.commit(|p| {
            p.active_quiz = Some(QuizSession {
                mission_id: id,
                started_at_ms,
            });
        });
        match committed {
            Some(progress) => {
                self.after_mutation(&progress);
                true
            }
            None => false,
        }
    }

    /// Grades a submission against the active quiz session.
    ///
    /// A submission that does not match the current session is stale and
    /// is rejected without touching state; this is what keeps a leftover
    /// UI callback from retroactively granting a reward. Elapsed time is
    /// real wall-clock time since [`Self::start_quiz`].
    pub fn submit_quiz_answer(&self, id: MissionId, selected_answer: usize) -> SubmitOutcome {
        let Some(progress) = self.store.snapshot() else {
            return SubmitOutcome::default();
        };

        let Some(session) = progress.active_quiz else {
            tracing::debug!(target: "engine::facade", %id, "stale submission: no active quiz");
            return SubmitOutcome::default();
        };
        if session.mission_id != id {
            tracing::debug!(
                target: "engine::facade",
                submitted = %id,
                active = %session.mission_id,
                "stale submission: mission mismatch"
            );
            return SubmitOutcome::default();
        }

        let Some(spec) = self.catalog.get(id) else {
            // start_quiz refuses content-less missions, so the catalog
            // changed underneath a live session. Drop it as stale.
            tracing::warn!(target: "engine::facade", %id, "active quiz lost its content");
            return SubmitOutcome::default();
        };

        let now = self.clock.now_ms();
        let seconds_elapsed = (now - session.started_at_ms) as f64 / 1_000.0;
        let correct = selected_answer == spec.quiz.correct_answer;
        let award = scoring::score(
            correct,
            seconds_elapsed,
            spec.quiz.time_limit_secs,
            spec.base_points,
            spec.base_coins,
        );

        let already_completed = progress.completed_missions.contains(&id);
        let completes_mission = correct && !already_completed;
        let badge = spec.title.clone();

        let committed = self.store.commit(|p| {
            p.push_audit(
                if correct {
                    AuditKind::AttemptCorrect
                } else {
                    AuditKind::AttemptIncorrect
                },
                0,
                now,
            );

            if completes_mission {
                p.completed_missions.insert(id);
                p.badges.push(badge.clone());
                p.coins += award.coins;
                p.total_score += award.points;
                p.push_audit(AuditKind::MissionComplete, u64::from(id.0), now);
                p.push_audit(AuditKind::CoinGrant, award.coins, now);
                p.push_audit(AuditKind::ScoreGrant, award.points, now);
                p.recompute_level();
            }

            p.active_quiz = None;
        });

        let Some(progress) = committed else {
            return SubmitOutcome::default();
        };
        self.after_mutation(&progress);

        if completes_mission {
            tracing::info!(
                target: "engine::facade",
                %id,
                points = award.points,
                coins = award.coins,
                level = progress.level,
                "mission completed"
            );
        }

        SubmitOutcome {
            result: QuizResult {
                is_correct: correct,
                time_spent_secs: seconds_elapsed,
                time_bonus: award.time_bonus,
            },
            updated: completes_mission,
        }
    }

    /// True if the mission is reachable given current completions.
    pub fn can_access_mission(&self, id: MissionId) -> bool {
        self.store
            .snapshot()
            .map(|p| missions::is_accessible(id, &p.completed_missions))
            .unwrap_or(false)
    }

    pub fn is_mission_completed(&self, id: MissionId) -> bool {
        self.store
            .snapshot()
            .map(|p| p.completed_missions.contains(&id))
            .unwrap_or(false)
    }

    /// Accessible, not-yet-completed missions in ascending order.
    pub fn get_available_missions(&self) -> Vec<MissionId> {
        self.store
            .snapshot()
            .map(|p| missions::available_missions(&p.completed_missions))
            .unwrap_or_default()
    }

    /// Picks up a world collectible. Idempotent: a second pickup of the
    /// same item id is a no-op returning false.
    pub fn collect_item(&self, item_id: &str, coin_value: u64, point_value: u64) -> bool {
        let Some(progress) = self.store.snapshot() else {
            return false;
        };
        if progress.collected_items.contains(item_id) {
            return false;
        }

        let now = self.clock.now_ms();
        let item = item_id.to_owned();
        let committed = self.store.commit(|p| {
            p.collected_items.insert(item.clone());
            p.coins += coin_value;
            p.total_score += point_value;
            p.push_audit(AuditKind::CoinGrant, coin_value, now);
            p.push_audit(AuditKind::ScoreGrant, point_value, now);
        });
        match committed {
            Some(progress) => {
                self.after_mutation(&progress);
                true
            }
            None => false,
        }
    }

    /// Adjusts the wallet. Negative amounts are external spends (shop);
    /// they clamp at zero and the ledger records the amount actually
    /// applied, so the audit trail stays exact.
    pub fn add_coins(&self, amount: i64, reason: &str) {
        let now = self.clock.now_ms();
        let committed = self.store.commit(|p| {
            if amount >= 0 {
                p.coins += amount as u64;
                p.push_audit(AuditKind::CoinGrant, amount as u64, now);
            } else {
                let applied = p.coins.min(amount.unsigned_abs());
                p.coins -= applied;
                p.push_audit(AuditKind::CoinSpend, applied, now);
            }
        });
        if let Some(progress) = committed {
            tracing::debug!(
                target: "engine::facade",
                amount,
                reason,
                coins = progress.coins,
                "coin adjustment"
            );
            self.after_mutation(&progress);
        }
    }

    /// Records the duration of a fast correct answer.
    pub fn record_speed_challenge(&self, seconds: f64) {
        let committed = self.store.commit(|p| {
            p.speed_challenge_history.push(seconds);
        });
        if let Some(progress) = committed {
            self.after_mutation(&progress);
        }
    }

    /// Achievement ids the current speed history satisfies.
    pub fn check_speed_achievements(&self) -> Vec<String> {
        self.store
            .snapshot()
            .map(|p| achievements::unlocked(&p.speed_challenge_history, &self.speed_rules))
            .unwrap_or_default()
    }

    /// Accrues play time. Non-positive amounts are ignored.
    pub fn update_playtime(&self, minutes: f64) {
        if minutes <= 0.0 {
            return;
        }
        let committed = self.store.commit(|p| {
            p.playtime_minutes += minutes;
        });
        if let Some(progress) = committed {
            self.after_mutation(&progress);
        }
    }

    /// Immutable snapshot of the canonical record.
    pub fn get_progress(&self) -> Option<GameProgress> {
        self.store.snapshot()
    }

    /// Derived statistics (accuracy and friends).
    pub fn get_player_stats(&self) -> Option<PlayerStats> {
        self.store.snapshot().map(|p| PlayerStats::derive(&p))
    }

    /// Runs the sentinel over the in-memory record. Violations are logged
    /// as warnings and reported as `false`; recovery policy belongs to the
    /// embedding application.
    pub fn validate_current_state(&self) -> bool {
        let Some(progress) = self.store.snapshot() else {
            return true;
        };
        let violations = sentinel::check(&progress);
        for violation in &violations {
            tracing::warn!(target: "engine::sentinel", %violation, "progress invariant violated");
        }
        violations.is_empty()
    }

    /// Registers a subscriber; it receives an immutable snapshot after
    /// every mutation, in registration order.
    pub fn subscribe(
        &self,
        callback: impl Fn(&GameProgress) + Send + Sync + 'static,
    ) -> SubscriberId {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// The registry the rendering layer reads.
    pub fn registry(&self) -> Arc<WorldRegistry> {
        self.bridge.registry()
    }

    /// One periodic tick: playtime accrual since the previous tick, a
    /// sentinel pass, and defensive registry reconciliation. Driven by
    /// [`crate::TickWorker`] in production, called directly in tests.
    pub fn tick(&self) {
        let now = self.clock.now_ms();
        let previous = match self.last_tick_ms.lock() {
            Ok(mut last) => last.replace(now),
            Err(_) => None,
        };

        if let Some(previous) = previous {
            let minutes = (now - previous) as f64 / 60_000.0;
            self.update_playtime(minutes);
        }

        self.validate_current_state();
        if let Some(progress) = self.store.snapshot() {
            self.bridge.reconcile(&progress);
        }
    }

    fn after_mutation(&self, committed: &GameProgress) {
        // State is already persisted by the commit; subscribers and the
        // mirror only ever see the committed snapshot.
        self.notifier.notify(committed);
        self.bridge.mirror(committed);
    }
}

/// Builder wiring the engine's collaborators; everything but the catalog
/// has a production default.
pub struct GameStateManagerBuilder {
    catalog: MissionCatalog,
    storage: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    registry: Option<Arc<WorldRegistry>>,
    speed_rules: Option<Vec<SpeedRule>>,
}

impl GameStateManagerBuilder {
    fn new(catalog: MissionCatalog) -> Self {
        Self {
            catalog,
            storage: None,
            clock: None,
            registry: None,
            speed_rules: None,
        }
    }

    /// Durable storage backend (defaults to an in-memory store).
    pub fn storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Timestamp source (defaults to the system clock).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// World registry to mirror into (defaults to a fresh one).
    pub fn registry(mut self, registry: Arc<WorldRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Speed-achievement thresholds (defaults to the shipped rules).
    pub fn speed_rules(mut self, rules: Vec<SpeedRule>) -> Self {
        self.speed_rules = Some(rules);
        self
    }

    pub fn build(self) -> GameStateManager {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(InMemoryStore::new()));
        let registry = self.registry.unwrap_or_default();

        GameStateManager {
            store: ProgressStore::new(storage),
            notifier: ChangeNotifier::new(),
            bridge: SyncBridge::new(registry),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            catalog: self.catalog,
            speed_rules: self.speed_rules.unwrap_or_else(achievements::default_rules),
            last_tick_ms: Mutex::new(None),
        }
    }
}
