use crate::education::{EducationLevel, WorkforceDemand};

/// Even four-way split used when a building class has no known distribution.
pub const UNIFORM_RATIOS: [i32; 5] = [100, 25, 25, 25, 25];

/// Splits `total_jobs` across the four education tiers by `ratios`
/// (`[base, share0, share1, share2, share3]`), truncating each share.
///
/// The parts usually sum to less than `total_jobs`; the caller owns the
/// shortfall. An empty or malformed ratio row, including one with a
/// non-positive base, yields an empty result.
pub fn distribute(total_jobs: i32, ratios: &[i32]) -> Vec<i32> {
    if ratios.len() < EducationLevel::COUNT + 1 || ratios[0] <= 0 {
        return Vec::new();
    }
    let base = i64::from(ratios[0]);
    ratios[1..=EducationLevel::COUNT]
        .iter()
        .map(|&share| (i64::from(total_jobs) * i64::from(share) / base) as i32)
        .collect()
}

/// Full per-tier job counts for `total_jobs`.
///
/// Falls back to `UNIFORM_RATIOS` when `ratios` gives no distribution, and
/// adds the whole truncation shortfall to the uneducated tier.
pub fn workplace_distribution_of(total_jobs: i32, ratios: &[i32]) -> WorkforceDemand {
    let mut split = distribute(total_jobs, ratios);
    if split.is_empty() {
        split = distribute(total_jobs, &UNIFORM_RATIOS);
    }

    let mut demand = WorkforceDemand::ZERO;
    for (tier, jobs) in demand.0.iter_mut().zip(&split) {
        *tier = *jobs;
    }
    let leftover = total_jobs - demand.total();
    demand[EducationLevel::Uneducated] += leftover;
    demand
}
