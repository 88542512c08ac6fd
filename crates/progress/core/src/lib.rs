//! Deterministic progression rules and canonical state types.
//!
//! `progress-core` defines the 50-mission curriculum rules (mission graph,
//! scoring, invariant checks, speed achievements) and the canonical
//! [`GameProgress`] record. Everything here is pure and side-effect free:
//! no clocks, no I/O, no logging. The engine crate owns the mutable record
//! and consults these functions; presentation layers only ever see clones.
pub mod achievements;
pub mod missions;
pub mod scoring;
pub mod sentinel;
pub mod state;
pub mod stats;

pub use achievements::SpeedRule;
pub use missions::{MISSION_COUNT, MISSIONS_PER_TIER, TIER_COUNT};
pub use scoring::Award;
pub use sentinel::InvariantViolation;
pub use state::{AuditEntry, AuditKind, GameProgress, MissionId, QuizSession};
pub use stats::PlayerStats;
