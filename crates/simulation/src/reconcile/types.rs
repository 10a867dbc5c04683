use bevy::prelude::*;
use serde::Serialize;

use crate::citizen_units::{PoolAccess, UnitRequest};
use crate::config::RECONCILE_INTERVAL_TICKS;
use crate::education::WorkforceDemand;
use crate::sim_rng::Randomizer;
use crate::transfer_offers::TransferOffers;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Occupancy a building should end up with.
///
/// `home` counts households (one unit each); `work`, `visit` and `student`
/// count citizens and are rounded up to whole units of five.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileTargets {
    pub home: i32,
    pub work: i32,
    pub visit: i32,
    pub student: i32,
}

impl ReconcileTargets {
    pub fn new(home: i32, work: i32, visit: i32, student: i32) -> Self {
        Self {
            home,
            work,
            visit,
            student,
        }
    }
}

/// Everything outside the building a reconciliation pass reads or writes.
pub struct Collaborators<'a> {
    pub pool: &'a mut dyn PoolAccess,
    pub offers: &'a mut dyn TransferOffers,
    pub rng: &'a mut dyn Randomizer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePhase {
    Scanning,
    Trimming,
    Expanding,
    Rebalancing,
    Done,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of trimming one role from a unit list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimOutcome {
    pub kept: u32,
    pub released: u32,
    /// Units that lost the trimmed role but stay on the list for another.
    pub roles_dropped: u32,
    pub evicted: u32,
    /// Demand handed back by evicted workers, per education tier.
    pub freed_demand: WorkforceDemand,
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromotionOutcome {
    /// False when demand was already balanced and nothing was walked.
    pub ran: bool,
    pub promoted: u32,
    pub evicted: u32,
    pub truncated: bool,
}

/// What one reconciliation pass did to a building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Abandoned or burned-down; nothing was touched.
    pub skipped: bool,
    /// A walk hit the hop ceiling or a dead link.
    pub list_truncated: bool,
    pub units_created: u32,
    pub units_released: u32,
    pub roles_dropped: u32,
    pub households_evicted: u32,
    pub workers_evicted: u32,
    pub promoted: u32,
    pub rebalance_evicted: u32,
    pub batch_requested: Option<UnitRequest>,
    pub allocation_failed: bool,
    pub rebalanced: bool,
    /// Signed per-tier demand left after rebalancing; positive means
    /// vacancies.
    pub demand: WorkforceDemand,
}

impl ReconcileReport {
    /// True when the pass changed no unit and no citizen.
    pub fn is_noop(&self) -> bool {
        self.units_created == 0
            && self.units_released == 0
            && self.roles_dropped == 0
            && self.households_evicted == 0
            && self.workers_evicted == 0
            && self.promoted == 0
            && self.rebalance_evicted == 0
            && self.batch_requested.is_none()
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// How often every plopped building is reconciled, in fixed ticks.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ReconcileSchedule {
    pub interval: u64,
}

impl Default for ReconcileSchedule {
    fn default() -> Self {
        Self {
            interval: RECONCILE_INTERVAL_TICKS,
        }
    }
}

impl ReconcileSchedule {
    pub fn is_due(&self, tick: u64) -> bool {
        self.interval > 0 && tick.is_multiple_of(self.interval)
    }
}

/// Running totals across every reconciliation pass.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub buildings_reconciled: u64,
    pub buildings_skipped: u64,
    pub units_created: u64,
    pub units_released: u64,
    pub households_evicted: u64,
    pub workers_evicted: u64,
    pub promotions: u64,
    pub corrupt_lists: u64,
    pub allocation_failures: u64,
    pub demolished: u64,
}

impl ReconcileStats {
    pub fn record(&mut self, report: &ReconcileReport) {
        if report.skipped {
            self.buildings_skipped += 1;
            return;
        }
        self.buildings_reconciled += 1;
        self.units_created += u64::from(report.units_created);
        self.units_released += u64::from(report.units_released);
        self.households_evicted += u64::from(report.households_evicted);
        self.workers_evicted +=
            u64::from(report.workers_evicted) + u64::from(report.rebalance_evicted);
        self.promotions += u64::from(report.promoted);
        self.corrupt_lists += u64::from(report.list_truncated);
        self.allocation_failures += u64::from(report.allocation_failed);
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Reconcile a building on the next tick regardless of schedule, re-reading
/// its RICO settings.
#[derive(Event, Debug, Clone, Copy)]
pub struct ApplyRicoSettings {
    pub building: Entity,
}

/// Evict everyone from a plopped building, return its units to the pool and
/// despawn it.
#[derive(Event, Debug, Clone, Copy)]
pub struct DemolishPlopped {
    pub building: Entity,
}
