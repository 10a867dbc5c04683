use crate::buildings::PloppedBuilding;
use crate::citizen_units::{PoolAccess, UnitCursor, UnitFlags};
use crate::config::{
    MAX_UNIT_LIST_HOPS, PROMOTION_ROLL_RANGE, PROMOTION_THRESHOLD, PROMOTION_TIER_BIAS,
};
use crate::education::{EducationLevel, WorkforceDemand};
use crate::sim_rng::Randomizer;

use super::types::PromotionOutcome;

/// One promotion roll for a worker at `tier`. Higher tiers are less likely
/// to be promoted.
pub fn promotion_roll(rng: &mut dyn Randomizer, tier: EducationLevel) -> bool {
    let roll = rng.int32(PROMOTION_ROLL_RANGE) as i32;
    roll - tier.index() as i32 * PROMOTION_TIER_BIAS > PROMOTION_THRESHOLD
}

/// Moves the building's workforce toward `demand`.
///
/// Each worker at a tier with surplus demand is either promoted into a
/// deficit one tier up or let go. Workers at the top tier are never touched.
/// Does nothing, crime and garbage reset included, when `demand` is already
/// zero.
pub fn promote_workers(
    building: &mut PloppedBuilding,
    pool: &mut dyn PoolAccess,
    rng: &mut dyn Randomizer,
    demand: &mut WorkforceDemand,
) -> PromotionOutcome {
    let mut outcome = PromotionOutcome::default();
    if demand.is_zero() {
        return outcome;
    }
    outcome.ran = true;
    building.crime_buffer = 0;
    building.garbage_buffer = 0;

    let mut cursor = UnitCursor::new(building.citizen_units, MAX_UNIT_LIST_HOPS);
    while let Some(id) = cursor.advance(&*pool) {
        let Some(unit) = pool.unit(id) else {
            break;
        };
        if !unit.flags.contains(UnitFlags::WORK) {
            continue;
        }
        let (flags, citizens) = (unit.flags, unit.citizens);

        for (slot, citizen) in citizens.iter().enumerate() {
            let Some(citizen) = *citizen else {
                continue;
            };
            let Some(tier) = pool.citizen(citizen).map(|c| c.education) else {
                continue;
            };
            if tier.is_max() || !demand.has_surplus(tier) {
                continue;
            }

            let promote_to = tier
                .next()
                .filter(|&up| demand.has_deficit(up) && promotion_roll(rng, tier));
            match promote_to {
                Some(up) => {
                    if let Some(person) = pool.citizen_mut(citizen) {
                        person.education = up;
                    }
                    demand[tier] += 1;
                    demand[up] -= 1;
                    outcome.promoted += 1;
                }
                None => {
                    if let Some(person) = pool.citizen_mut(citizen) {
                        person.detach(flags);
                    }
                    if let Some(unit) = pool.unit_mut(id) {
                        unit.citizens[slot] = None;
                    }
                    demand[tier] += 1;
                    outcome.evicted += 1;
                }
            }
        }
    }

    outcome.truncated = cursor.truncated();
    outcome
}
