//! Award computation for quiz submissions.
//!
//! Pure functions over a submission's correctness and timing. Per-mission
//! base coin/point values come from the content table; the only universal
//! constants are the completion bonus and the fixed time-bonus buckets.

/// Points granted on top of a mission's base points for any correct answer.
pub const COMPLETION_BONUS: u64 = 100;

/// What a submission earns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Award {
    pub points: u64,
    pub coins: u64,
    pub time_bonus: u64,
}

/// Bonus points for answering with `remaining_secs` left on the clock.
///
/// Bucket thresholds are fixed design constants, not configurable.
pub fn time_bonus(remaining_secs: f64) -> u64 {
    if remaining_secs >= 50.0 {
        30
    } else if remaining_secs >= 40.0 {
        20
    } else if remaining_secs >= 30.0 {
        10
    } else {
        0
    }
}

/// Computes the award for a graded submission.
pub fn score(
    correct: bool,
    seconds_elapsed: f64,
    time_limit_secs: f64,
    base_points: u64,
    base_coins: u64,
) -> Award {
    if !correct {
        return Award::default();
    }

    let bonus = time_bonus(time_limit_secs - seconds_elapsed);
    Award {
        points: base_points + COMPLETION_BONUS + bonus,
        coins: base_coins,
        time_bonus: bonus,
    }
}
