use crate::citizen_units::{PoolAccess, UnitCursor, UnitFlags, UnitId, Wealth};
use crate::config::{MAX_UNIT_LIST_HOPS, UNIT_CAPACITY};
use crate::education::WorkforceDemand;

use super::types::ReconcileTargets;

/// Remaining counts after subtracting what a unit list already provides.
///
/// `home` and `work` go negative when the list holds more than the target;
/// `visit` and `student` are clamped at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ScanTally {
    pub home: i32,
    pub work: i32,
    pub visit: i32,
    pub student: i32,
    /// Minus one per occupied work slot, at the occupant's tier.
    pub demand: WorkforceDemand,
    pub truncated: bool,
}

/// Walks the list once, tallying occupancy against `targets` and re-tagging
/// every home unit with `wealth`.
pub(crate) fn scan_units(
    pool: &mut dyn PoolAccess,
    head: Option<UnitId>,
    targets: &ReconcileTargets,
    wealth: Wealth,
) -> ScanTally {
    let block = UNIT_CAPACITY as i32;
    let mut tally = ScanTally {
        home: targets.home,
        work: targets.work,
        visit: targets.visit,
        student: targets.student,
        ..Default::default()
    };

    let mut cursor = UnitCursor::new(head, MAX_UNIT_LIST_HOPS);
    while let Some(id) = cursor.advance(&*pool) {
        let Some(unit) = pool.unit_mut(id) else {
            break;
        };
        let flags = unit.flags;
        if flags.contains(UnitFlags::HOME) {
            unit.wealth = wealth;
            tally.home -= 1;
        }
        if flags.contains(UnitFlags::VISIT) {
            tally.visit -= block;
        }
        if flags.contains(UnitFlags::STUDENT) {
            tally.student -= block;
        }
        if flags.contains(UnitFlags::WORK) {
            tally.work -= block;
            let citizens = unit.citizens;
            for citizen in citizens.into_iter().flatten() {
                if let Some(person) = pool.citizen(citizen) {
                    tally.demand[person.education] -= 1;
                }
            }
        }
    }

    tally.visit = tally.visit.max(0);
    tally.student = tally.student.max(0);
    tally.truncated = cursor.truncated();
    tally
}
