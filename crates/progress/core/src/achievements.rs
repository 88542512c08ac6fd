//! Speed-challenge achievements.
//!
//! Thresholds are a content concern: the engine is constructed with a rule
//! set (or [`default_rules`]) and evaluates it purely over the recorded
//! speed-challenge history.

/// One unlockable speed achievement.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedRule {
    /// Stable achievement identifier handed back to the caller.
    pub id: String,
    /// An answer counts toward this rule when it took at most this long.
    pub max_seconds: f64,
    /// Number of qualifying answers needed to unlock.
    pub required: usize,
}

impl SpeedRule {
    pub fn new(id: impl Into<String>, max_seconds: f64, required: usize) -> Self {
        Self {
            id: id.into(),
            max_seconds,
            required,
        }
    }
}

/// The shipped rule set.
pub fn default_rules() -> Vec<SpeedRule> {
    vec![
        SpeedRule::new("quick-thinker", 10.0, 1),
        SpeedRule::new("rapid-solver", 10.0, 5),
        SpeedRule::new("lightning-mind", 5.0, 10),
    ]
}

/// Ids of every rule the history currently satisfies, in rule order.
pub fn unlocked(history: &[f64], rules: &[SpeedRule]) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| {
            let qualifying = history
                .iter()
                .filter(|&&seconds| seconds <= rule.max_seconds)
                .count();
            qualifying >= rule.required
        })
        .map(|rule| rule.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_unlocks_nothing() {
        assert!(unlocked(&[], &default_rules()).is_empty());
    }

    #[test]
    fn single_fast_answer_unlocks_first_tier() {
        let ids = unlocked(&[8.0], &default_rules());
        assert_eq!(ids, vec!["quick-thinker"]);
    }

    #[test]
    fn slow_answers_do_not_qualify() {
        assert!(unlocked(&[11.0, 12.0, 30.0], &default_rules()).is_empty());
    }

    #[test]
    fn counts_accumulate_across_rules() {
        let history = [9.0, 8.5, 4.0, 7.0, 6.0];
        let ids = unlocked(&history, &default_rules());
        assert_eq!(ids, vec!["quick-thinker", "rapid-solver"]);
    }

    #[test]
    fn custom_rules_override_defaults() {
        let rules = vec![SpeedRule::new("blitz", 3.0, 2)];
        assert!(unlocked(&[2.0, 2.5], &rules).contains(&"blitz".to_string()));
        assert!(unlocked(&[2.0, 4.0], &rules).is_empty());
    }
}
