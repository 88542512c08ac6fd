//! Derived player statistics.

use crate::state::{AuditKind, GameProgress};

/// Read-only summary derived from a [`GameProgress`] snapshot.
///
/// Accuracy comes from the attempt entries of the audit trail; nothing in
/// here is stored, so it can never drift from the canonical record.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerStats {
    /// Correct attempts over total attempts, `0.0` with no attempts.
    pub accuracy: f64,
    pub attempts: u32,
    pub correct_answers: u32,
    pub level: u8,
    pub coins: u64,
    pub total_score: u64,
    pub missions_completed: usize,
    pub badges_earned: usize,
    pub playtime_minutes: f64,
}

impl PlayerStats {
    /// Derives stats from the given record.
    pub fn derive(progress: &GameProgress) -> Self {
        let mut attempts = 0u32;
        let mut correct = 0u32;
        for entry in &progress.audit_trail {
            match entry.kind {
                AuditKind::AttemptCorrect => {
                    attempts += 1;
                    correct += 1;
                }
                AuditKind::AttemptIncorrect => attempts += 1,
                _ => {}
            }
        }

        let accuracy = if attempts == 0 {
            0.0
        } else {
            f64::from(correct) / f64::from(attempts)
        };

        Self {
            accuracy,
            attempts,
            correct_answers: correct,
            level: progress.level,
            coins: progress.coins,
            total_score: progress.total_score,
            missions_completed: progress.completed_missions.len(),
            badges_earned: progress.badges.len(),
            playtime_minutes: progress.playtime_minutes,
        }
    }
}
