//! Canonical progression record and its supporting types.
//!
//! [`GameProgress`] is the single source of truth for a player's
//! advancement. The engine crate holds the only mutable instance; every
//! value that crosses the engine boundary (subscriber callbacks, registry
//! mirror, read operations) is a clone, so external code can never corrupt
//! internal state by reference.

use std::collections::BTreeSet;
use std::fmt;

/// Identifier of a single quiz mission, valid in `1..=50`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MissionId(pub u8);

impl MissionId {
    /// First mission of the curriculum.
    pub const FIRST: Self = Self(1);

    /// Last mission of the curriculum.
    pub const LAST: Self = Self(crate::missions::MISSION_COUNT);

    /// Returns true if the id lies inside the curriculum range.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST.0 && self.0 <= Self::LAST.0
    }

    /// Tier this mission belongs to (`1..=5`), `0` for an out-of-range
    /// id.
    #[inline]
    pub const fn tier(self) -> u8 {
        if !self.is_valid() {
            return 0;
        }
        (self.0 - 1) / crate::missions::MISSIONS_PER_TIER + 1
    }

    /// Returns true if this mission opens its tier.
    #[inline]
    pub const fn is_tier_start(self) -> bool {
        self.is_valid() && (self.0 - 1) % crate::missions::MISSIONS_PER_TIER == 0
    }

    /// The mission that must be completed immediately before this one,
    /// `None` for a tier-opening or out-of-range mission.
    pub const fn predecessor(self) -> Option<Self> {
        if !self.is_valid() || self.is_tier_start() {
            None
        } else {
            Some(Self(self.0 - 1))
        }
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mission {}", self.0)
    }
}

/// The single in-flight quiz session.
///
/// Tracks the authoritative start timestamp so elapsed time is computed
/// from wall clock at submission, independent of any UI countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizSession {
    pub mission_id: MissionId,
    pub started_at_ms: i64,
}

/// Kind of an append-only audit event.
///
/// The audit trail is internal bookkeeping consumed by the sentinel to
/// re-derive summary fields; it is never mirrored to the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuditKind {
    /// Coins granted (mission reward, collectible, external grant).
    CoinGrant,
    /// Coins removed (shop spend routed through the facade).
    CoinSpend,
    /// Score points granted.
    ScoreGrant,
    /// A mission entered the completed set.
    MissionComplete,
    /// A quiz submission was graded correct.
    AttemptCorrect,
    /// A quiz submission was graded incorrect.
    AttemptIncorrect,
}

/// One append-only audit event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuditEntry {
    pub kind: AuditKind,
    pub amount: u64,
    pub timestamp_ms: i64,
}

/// Canonical progression record, one per local player.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameProgress {
    /// Set once at creation, immutable thereafter.
    pub player_name: String,

    /// Derived from completed tiers (`1..=5`), never set by callers.
    pub level: u8,

    /// Wallet balance. Only grows through rewards/collectibles and only
    /// shrinks through spends routed via the facade, so the audit trail
    /// stays complete.
    pub coins: u64,

    /// Monotonically non-decreasing sum of awarded points.
    pub total_score: u64,

    /// Append-only set of completed mission ids.
    pub completed_missions: BTreeSet<MissionId>,

    /// One badge per completed mission, in completion order.
    pub badges: Vec<String>,

    /// Deduplicated set of collected world items.
    pub collected_items: BTreeSet<String>,

    /// At most one outstanding quiz session. Transient: intentionally not
    /// persisted, so a reload drops any in-flight quiz.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub active_quiz: Option<QuizSession>,

    /// Accrued play time, fed by the periodic tick.
    pub playtime_minutes: f64,

    /// Durations (seconds) of fast correct answers, in recording order.
    pub speed_challenge_history: Vec<f64>,

    /// Append-only event log backing the validation sentinel.
    #[cfg_attr(feature = "serde", serde(default))]
    pub audit_trail: Vec<AuditEntry>,
}

impl GameProgress {
    /// Creates a fresh record for a new player.
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            level: 1,
            coins: 0,
            total_score: 0,
            completed_missions: BTreeSet::new(),
            badges: Vec::new(),
            collected_items: BTreeSet::new(),
            active_quiz: None,
            playtime_minutes: 0.0,
            speed_challenge_history: Vec::new(),
            audit_trail: Vec::new(),
        }
    }

    /// Appends an audit event.
    pub fn push_audit(&mut self, kind: AuditKind, amount: u64, timestamp_ms: i64) {
        self.audit_trail.push(AuditEntry {
            kind,
            amount,
            timestamp_ms,
        });
    }

    /// Re-derives `level` from the completed set.
    pub fn recompute_level(&mut self) {
        self.level = crate::missions::level_for(&self.completed_missions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mission_id_tier_boundaries() {
        assert_eq!(MissionId(1).tier(), 1);
        assert_eq!(MissionId(10).tier(), 1);
        assert_eq!(MissionId(11).tier(), 2);
        assert_eq!(MissionId(50).tier(), 5);
        assert!(MissionId(1).is_tier_start());
        assert!(MissionId(41).is_tier_start());
        assert!(!MissionId(42).is_tier_start());
    }

    #[test]
    fn predecessor_stops_at_tier_start() {
        assert_eq!(MissionId(12).predecessor(), Some(MissionId(11)));
        assert_eq!(MissionId(11).predecessor(), None);
        assert_eq!(MissionId(1).predecessor(), None);
    }

    #[test]
    fn out_of_range_ids_degrade_without_panicking() {
        assert_eq!(MissionId(0).tier(), 0);
        assert!(!MissionId(0).is_tier_start());
        assert_eq!(MissionId(0).predecessor(), None);

        assert_eq!(MissionId(51).tier(), 0);
        assert!(!MissionId(51).is_tier_start());
        assert_eq!(MissionId(51).predecessor(), None);
    }

    #[test]
    fn fresh_record_defaults() {
        let progress = GameProgress::new("Ana");
        assert_eq!(progress.level, 1);
        assert_eq!(progress.coins, 0);
        assert!(progress.completed_missions.is_empty());
        assert!(progress.badges.is_empty());
        assert!(progress.active_quiz.is_none());
    }
}
