//! Mission dependency graph for the 5-tier curriculum.
//!
//! Pure and stateless: the engine consults these functions, nothing here
//! mutates state. Accessibility is strictly sequential within a tier, so
//! gaps in the completed set are impossible by construction.

use std::collections::BTreeSet;

use crate::state::MissionId;

/// Number of curriculum tiers.
pub const TIER_COUNT: u8 = 5;

/// Missions per tier.
pub const MISSIONS_PER_TIER: u8 = 10;

/// Total mission count.
pub const MISSION_COUNT: u8 = TIER_COUNT * MISSIONS_PER_TIER;

/// Returns true if `id` can currently be attempted.
///
/// A tier-opening mission is accessible when it opens tier 1 or the whole
/// previous tier is complete; any other mission is accessible when its
/// predecessor is complete. Already-completed missions stay accessible
/// (idempotent re-entry; the facade short-circuits them before quiz flow).
pub fn is_accessible(id: MissionId, completed: &BTreeSet<MissionId>) -> bool {
    if !id.is_valid() {
        return false;
    }
    match id.predecessor() {
        Some(prev) => completed.contains(&prev),
        None => id.tier() == 1 || is_tier_complete(id.tier() - 1, completed),
    }
}

/// Returns true if every mission of `tier` is in the completed set.
pub fn is_tier_complete(tier: u8, completed: &BTreeSet<MissionId>) -> bool {
    if tier == 0 || tier > TIER_COUNT {
        return false;
    }
    tier_span(tier).all(|id| completed.contains(&id))
}

/// Number of fully completed tiers.
pub fn completed_tiers(completed: &BTreeSet<MissionId>) -> u8 {
    (1..=TIER_COUNT)
        .filter(|&tier| is_tier_complete(tier, completed))
        .count() as u8
}

/// Derived player level: one plus the fully completed tier count, capped
/// at [`TIER_COUNT`].
pub fn level_for(completed: &BTreeSet<MissionId>) -> u8 {
    (1 + completed_tiers(completed)).min(TIER_COUNT)
}

/// Missions that are accessible and not yet completed, ascending.
pub fn available_missions(completed: &BTreeSet<MissionId>) -> Vec<MissionId> {
    (1..=MISSION_COUNT)
        .map(MissionId)
        .filter(|id| !completed.contains(id) && is_accessible(*id, completed))
        .collect()
}

/// Iterator over the ids of `tier`.
fn tier_span(tier: u8) -> impl Iterator<Item = MissionId> {
    let first = MISSIONS_PER_TIER * (tier - 1) + 1;
    (first..first + MISSIONS_PER_TIER).map(MissionId)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(ids: impl IntoIterator<Item = u8>) -> BTreeSet<MissionId> {
        ids.into_iter().map(MissionId).collect()
    }

    #[test]
    fn first_mission_always_accessible() {
        assert!(is_accessible(MissionId(1), &completed([])));
    }

    #[test]
    fn within_tier_gating_is_sequential() {
        let done = completed([1, 2]);
        assert!(is_accessible(MissionId(3), &done));
        assert!(!is_accessible(MissionId(4), &done));
    }

    #[test]
    fn tier_opening_requires_full_previous_tier() {
        let nine = completed(1..=9);
        assert!(!is_accessible(MissionId(11), &nine));

        let ten = completed(1..=10);
        assert!(is_accessible(MissionId(11), &ten));
    }

    #[test]
    fn completed_missions_remain_accessible() {
        let done = completed([1, 2, 3]);
        assert!(is_accessible(MissionId(2), &done));
    }

    #[test]
    fn out_of_range_ids_are_inaccessible() {
        assert!(!is_accessible(MissionId(0), &completed([])));
        assert!(!is_accessible(MissionId(51), &completed(1..=50)));
    }

    #[test]
    fn level_increments_per_completed_tier() {
        assert_eq!(level_for(&completed([])), 1);
        assert_eq!(level_for(&completed(1..=9)), 1);
        assert_eq!(level_for(&completed(1..=10)), 2);
        assert_eq!(level_for(&completed(1..=20)), 3);
        assert_eq!(level_for(&completed(1..=50)), 5);
    }

    #[test]
    fn level_caps_at_five() {
        assert_eq!(level_for(&completed(1..=50)), TIER_COUNT);
    }

    #[test]
    fn available_lists_only_the_frontier() {
        assert_eq!(available_missions(&completed([])), vec![MissionId(1)]);
        assert_eq!(available_missions(&completed([1, 2])), vec![MissionId(3)]);
        assert_eq!(
            available_missions(&completed(1..=10)),
            vec![MissionId(11)]
        );
        assert!(available_missions(&completed(1..=50)).is_empty());
    }
}
