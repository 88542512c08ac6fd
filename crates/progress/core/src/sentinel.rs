//! Tamper-validation sentinel.
//!
//! Re-derives the summary fields of a [`GameProgress`] from its append-only
//! audit trail and structural fields, and reports every divergence. The
//! persisted blob is plain JSON on the player's device, so an edited save
//! (or direct mutation of a leaked reference) shows up here as a mismatch
//! between stored summaries and the re-derived values.
//!
//! Detection only: callers treat violations as a signal, never a reason to
//! crash or roll back.

use std::collections::BTreeSet;

use crate::missions;
use crate::state::{AuditKind, GameProgress, MissionId};

/// A single failed invariant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("completed set contains out-of-range {id}")]
    MissionOutOfRange { id: MissionId },

    #[error("badge count {badges} does not match completed mission count {missions}")]
    BadgeCountMismatch { badges: usize, missions: usize },

    #[error("stored level {stored} does not match derived level {derived}")]
    LevelMismatch { stored: u8, derived: u8 },

    #[error("stored coins {stored} do not match audited balance {derived}")]
    CoinLedgerMismatch { stored: u64, derived: i64 },

    #[error("stored score {stored} does not match audited total {derived}")]
    ScoreLedgerMismatch { stored: u64, derived: u64 },

    #[error("{missions} completed missions but {recorded} completion audit entries")]
    CompletionLedgerMismatch { recorded: usize, missions: usize },

    #[error("active quiz references already-completed {id}")]
    ActiveQuizAlreadyCompleted { id: MissionId },
}

/// Checks every invariant and returns the full list of violations.
///
/// Works on the in-memory record only; it deliberately does not re-read
/// storage. An empty result means the record is self-consistent.
pub fn check(progress: &GameProgress) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    check_structure(progress, &mut violations);
    check_ledger(progress, &mut violations);

    violations
}

fn check_structure(progress: &GameProgress, out: &mut Vec<InvariantViolation>) {
    for &id in &progress.completed_missions {
        if !id.is_valid() {
            out.push(InvariantViolation::MissionOutOfRange { id });
        }
    }

    let missions = progress.completed_missions.len();
    let badges = progress.badges.len();
    if badges != missions {
        out.push(InvariantViolation::BadgeCountMismatch { badges, missions });
    }

    let derived = derived_level(&progress.completed_missions);
    if progress.level != derived {
        out.push(InvariantViolation::LevelMismatch {
            stored: progress.level,
            derived,
        });
    }

    if let Some(session) = progress.active_quiz
        && progress.completed_missions.contains(&session.mission_id)
    {
        out.push(InvariantViolation::ActiveQuizAlreadyCompleted {
            id: session.mission_id,
        });
    }
}

fn check_ledger(progress: &GameProgress, out: &mut Vec<InvariantViolation>) {
    let mut coin_balance: i64 = 0;
    let mut score_total: u64 = 0;
    let mut completions: usize = 0;

    for entry in &progress.audit_trail {
        match entry.kind {
            AuditKind::CoinGrant => coin_balance += entry.amount as i64,
            AuditKind::CoinSpend => coin_balance -= entry.amount as i64,
            AuditKind::ScoreGrant => score_total += entry.amount,
            AuditKind::MissionComplete => completions += 1,
            AuditKind::AttemptCorrect | AuditKind::AttemptIncorrect => {}
        }
    }

    if coin_balance != progress.coins as i64 {
        out.push(InvariantViolation::CoinLedgerMismatch {
            stored: progress.coins,
            derived: coin_balance,
        });
    }

    if score_total != progress.total_score {
        out.push(InvariantViolation::ScoreLedgerMismatch {
            stored: progress.total_score,
            derived: score_total,
        });
    }

    let missions = progress.completed_missions.len();
    if completions != missions {
        out.push(InvariantViolation::CompletionLedgerMismatch {
            recorded: completions,
            missions,
        });
    }
}

fn derived_level(completed: &BTreeSet<MissionId>) -> u8 {
    // Out-of-range ids never form a full tier, so they cannot skew the
    // derived level; they are reported separately.
    missions::level_for(completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::QuizSession;

    fn consistent_progress() -> GameProgress {
        let mut progress = GameProgress::new("Ana");
        progress.completed_missions.insert(MissionId(1));
        progress.badges.push("Order of Operations".into());
        progress.coins = 20;
        progress.total_score = 130;
        progress.push_audit(AuditKind::AttemptCorrect, 0, 1_000);
        progress.push_audit(AuditKind::MissionComplete, 1, 1_000);
        progress.push_audit(AuditKind::CoinGrant, 20, 1_000);
        progress.push_audit(AuditKind::ScoreGrant, 130, 1_000);
        progress
    }

    #[test]
    fn consistent_record_passes() {
        assert!(check(&consistent_progress()).is_empty());
    }

    #[test]
    fn inflated_coins_are_detected() {
        let mut progress = consistent_progress();
        progress.coins = 9_999;
        let violations = check(&progress);
        assert!(violations.iter().any(|v| matches!(
            v,
            InvariantViolation::CoinLedgerMismatch { stored: 9_999, .. }
        )));
    }

    #[test]
    fn unaudited_completion_is_detected() {
        let mut progress = consistent_progress();
        progress.completed_missions.insert(MissionId(2));
        let violations = check(&progress);
        assert!(violations
            .iter()
            .any(|v| matches!(v, InvariantViolation::BadgeCountMismatch { .. })));
        assert!(violations
            .iter()
            .any(|v| matches!(v, InvariantViolation::CompletionLedgerMismatch { .. })));
    }

    #[test]
    fn forged_level_is_detected() {
        let mut progress = consistent_progress();
        progress.level = 5;
        assert!(check(&progress).iter().any(|v| matches!(
            v,
            InvariantViolation::LevelMismatch {
                stored: 5,
                derived: 1
            }
        )));
    }

    #[test]
    fn out_of_range_completion_is_detected() {
        let mut progress = consistent_progress();
        progress.completed_missions.insert(MissionId(77));
        progress.badges.push("???".into());
        progress.push_audit(AuditKind::MissionComplete, 77, 2_000);
        assert!(check(&progress).iter().any(|v| matches!(
            v,
            InvariantViolation::MissionOutOfRange { id: MissionId(77) }
        )));
    }

    #[test]
    fn active_quiz_for_completed_mission_is_detected() {
        let mut progress = consistent_progress();
        progress.active_quiz = Some(QuizSession {
            mission_id: MissionId(1),
            started_at_ms: 5_000,
        });
        assert!(check(&progress).iter().any(|v| matches!(
            v,
            InvariantViolation::ActiveQuizAlreadyCompleted { id: MissionId(1) }
        )));
    }

    #[test]
    fn overspent_ledger_is_detected() {
        let mut progress = consistent_progress();
        progress.push_audit(AuditKind::CoinSpend, 50, 2_000);
        // Stored coins still 20: spend entry without a matching deduction.
        assert!(check(&progress).iter().any(|v| matches!(
            v,
            InvariantViolation::CoinLedgerMismatch { derived: -30, .. }
        )));
    }
}
