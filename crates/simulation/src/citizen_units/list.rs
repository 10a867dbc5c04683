//! Walking and splicing a building's singly linked unit list.
//!
//! Every walk is bounded by a hop ceiling. A cyclic or runaway list stops
//! the walk and marks it truncated instead of looping forever. A link to a
//! unit that is no longer live also ends the walk as truncated.

use super::pool::PoolAccess;
use super::types::{CitizenUnit, UnitFlags, UnitId};

// ---------------------------------------------------------------------------
// Bounded cursor
// ---------------------------------------------------------------------------

/// Forward cursor over a unit list.
///
/// `advance` reads a unit's `next` link before handing the unit out, so the
/// caller may unlink and release the returned unit without losing its place.
#[derive(Debug, Clone)]
pub struct UnitCursor {
    next: Option<UnitId>,
    hops: u32,
    ceiling: u32,
    truncated: bool,
}

impl UnitCursor {
    pub fn new(head: Option<UnitId>, ceiling: u32) -> Self {
        Self {
            next: head,
            hops: 0,
            ceiling,
            truncated: false,
        }
    }

    pub fn advance(&mut self, pool: &dyn PoolAccess) -> Option<UnitId> {
        let id = self.next?;
        if self.hops >= self.ceiling {
            self.truncated = true;
            self.next = None;
            return None;
        }
        let Some(unit) = pool.unit(id) else {
            self.truncated = true;
            self.next = None;
            return None;
        };
        self.hops += 1;
        self.next = unit.next;
        Some(id)
    }

    /// Units handed out so far.
    pub fn hops(&self) -> u32 {
        self.hops
    }

    /// The walk stopped on the hop ceiling or a dead link.
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

/// Result of walking a list end to end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitWalk {
    pub units: Vec<UnitId>,
    pub truncated: bool,
}

pub fn walk_units(pool: &dyn PoolAccess, head: Option<UnitId>, ceiling: u32) -> UnitWalk {
    let mut cursor = UnitCursor::new(head, ceiling);
    let mut units = Vec::new();
    while let Some(id) = cursor.advance(pool) {
        units.push(id);
    }
    UnitWalk {
        units,
        truncated: cursor.truncated(),
    }
}

/// Number of reachable units carrying every role in `role`.
pub fn count_units(pool: &dyn PoolAccess, head: Option<UnitId>, role: UnitFlags, ceiling: u32) -> usize {
    walk_units(pool, head, ceiling)
        .units
        .into_iter()
        .filter(|&id| pool.unit(id).is_some_and(|u| u.flags.contains(role)))
        .count()
}

// ---------------------------------------------------------------------------
// Splicing
// ---------------------------------------------------------------------------

/// Links `chain` after the last unit of the list rooted at `head`, or makes
/// it the head of an empty list.
///
/// Returns `false` without linking when the list has no reachable tail
/// (cyclic or corrupted).
pub fn append_chain(
    pool: &mut dyn PoolAccess,
    head: &mut Option<UnitId>,
    chain: UnitId,
    ceiling: u32,
) -> bool {
    if head.is_none() {
        *head = Some(chain);
        return true;
    }
    let walk = walk_units(&*pool, *head, ceiling);
    if walk.truncated {
        return false;
    }
    match walk.units.last().and_then(|&tail| pool.unit_mut(tail)) {
        Some(tail) => {
            tail.next = Some(chain);
            true
        }
        None => false,
    }
}

/// Splices `id` out of the list and releases it to the pool.
///
/// `previous` is the unit linking to `id`, or `None` when `id` is the head.
pub fn unlink_and_release(
    pool: &mut dyn PoolAccess,
    head: &mut Option<UnitId>,
    previous: Option<UnitId>,
    id: UnitId,
) {
    let next = pool.unit(id).and_then(|u| u.next);
    match previous {
        Some(prev) => {
            if let Some(unit) = pool.unit_mut(prev) {
                unit.next = next;
            }
        }
        None => *head = next,
    }
    if let Some(unit) = pool.unit_mut(id) {
        *unit = CitizenUnit::default();
    }
    pool.release_unit(id);
}

/// Detaches every occupant of the list rooted at `head` from the unit's roles
/// and releases every unit. Returns the number of units released.
pub fn release_chain(pool: &mut dyn PoolAccess, head: &mut Option<UnitId>, ceiling: u32) -> u32 {
    let mut released = 0;
    let mut cursor = UnitCursor::new(*head, ceiling);
    while let Some(id) = cursor.advance(&*pool) {
        let Some(unit) = pool.unit(id) else {
            break;
        };
        let (flags, citizens) = (unit.flags, unit.citizens);
        for citizen in citizens.into_iter().flatten() {
            if let Some(person) = pool.citizen_mut(citizen) {
                person.detach(flags);
            }
        }
        if let Some(unit) = pool.unit_mut(id) {
            *unit = CitizenUnit::default();
        }
        pool.release_unit(id);
        released += 1;
    }
    *head = None;
    released
}
