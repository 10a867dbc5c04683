use crate::citizen_units::{unlink_and_release, PoolAccess, UnitCursor, UnitFlags, UnitId};
use crate::config::MAX_UNIT_LIST_HOPS;

use super::types::TrimOutcome;

/// Keeps the first `keep_units` work units on the list and strips the rest:
/// their workers lose this workplace and each gives its job back to the
/// demand at its tier.
pub fn remove_worker_building(
    pool: &mut dyn PoolAccess,
    head: &mut Option<UnitId>,
    keep_units: u32,
) -> TrimOutcome {
    trim_role(pool, head, UnitFlags::WORK, keep_units)
}

/// Keeps the first `keep_units` home units and moves every other household
/// out.
pub fn remove_household(
    pool: &mut dyn PoolAccess,
    head: &mut Option<UnitId>,
    keep_units: u32,
) -> TrimOutcome {
    trim_role(pool, head, UnitFlags::HOME, keep_units)
}

/// Keep-then-evict pass over the units carrying `role`.
///
/// An evicted unit that carries no other role is unlinked and released.
/// One that also serves another role only loses `role`; its occupants keep
/// their slots for the remaining role.
fn trim_role(
    pool: &mut dyn PoolAccess,
    head: &mut Option<UnitId>,
    role: UnitFlags,
    keep_units: u32,
) -> TrimOutcome {
    let mut outcome = TrimOutcome::default();
    let mut keep = keep_units;
    let mut previous: Option<UnitId> = None;
    let mut cursor = UnitCursor::new(*head, MAX_UNIT_LIST_HOPS);

    while let Some(id) = cursor.advance(&*pool) {
        let Some(unit) = pool.unit(id) else {
            break;
        };
        let (flags, citizens) = (unit.flags, unit.citizens);
        if !flags.contains(role) {
            previous = Some(id);
            continue;
        }
        if keep > 0 {
            keep -= 1;
            outcome.kept += 1;
            previous = Some(id);
            continue;
        }

        for citizen in citizens.into_iter().flatten() {
            let Some(person) = pool.citizen_mut(citizen) else {
                continue;
            };
            person.detach(role);
            if role.contains(UnitFlags::WORK) {
                outcome.freed_demand[person.education] += 1;
            }
            outcome.evicted += 1;
        }

        let mut remaining = flags;
        remaining.remove(role);
        if remaining.is_empty() {
            unlink_and_release(pool, head, previous, id);
            outcome.released += 1;
        } else {
            if let Some(unit) = pool.unit_mut(id) {
                unit.flags = remaining;
            }
            outcome.roles_dropped += 1;
            previous = Some(id);
        }
    }

    outcome.truncated = cursor.truncated();
    outcome
}
