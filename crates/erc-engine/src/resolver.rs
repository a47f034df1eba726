use crate::{
    catalog::Ladder,
    feasibility::is_affordable,
    types::{Holdings, RewardDefinition},
};

/// Largest quantity in `[0, reward.acquisition_limit]` that is affordable.
///
/// Affordability is monotone non-increasing in quantity (costs scale linearly,
/// holdings are fixed), so the feasible quantities form a prefix `[1, m]` and
/// a binary search over the limit finds `m` in O(log limit) evaluations.
pub fn max_affordable(ladder: &Ladder, holdings: &Holdings, reward: &RewardDefinition) -> i64 {
    let limit = reward.acquisition_limit;
    if limit <= 0 || !is_affordable(ladder, 1, holdings, reward) {
        return 0;
    }
    if is_affordable(ladder, limit, holdings, reward) {
        return limit;
    }

    // Invariant: lo is affordable, hi + 1 is not.
    let (mut lo, mut hi) = (1_i64, limit - 1);
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if is_affordable(ladder, mid, holdings, reward) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}
