use bevy::prelude::*;

use crate::buildings::PloppedBuilding;
use crate::citizen_units::{append_chain, blocks, release_chain, UnitRequest};
use crate::config::MAX_UNIT_LIST_HOPS;
use crate::education::WorkforceDemand;
use crate::rico::WorkplaceCounter;
use crate::transfer_offers::{TransferOffer, TransferReason};

use super::promote::promote_workers;
use super::scan::{scan_units, ScanTally};
use super::trim::{remove_household, remove_worker_building};
use super::types::{Collaborators, ReconcilePhase, ReconcileReport, ReconcileTargets};

/// Brings a building's unit list in line with `targets` and rebalances its
/// workforce against the jobs `workplaces` reports for its current level.
///
/// Phases run strictly in order: scan the list, trim surplus work and home
/// units, create one batch of units for any shortfall, then promote or let
/// go workers until the per-tier demand is met as far as the list allows.
/// Abandoned and burned-down buildings are skipped untouched. A list whose
/// walk hits the hop ceiling is neither trimmed nor extended; only its
/// reachable workers are rebalanced.
pub fn reconcile(
    entity: Entity,
    building: &mut PloppedBuilding,
    targets: ReconcileTargets,
    workplaces: &mut dyn WorkplaceCounter,
    deps: &mut Collaborators,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();
    if !building.can_reconcile() {
        report.skipped = true;
        return report;
    }

    let mut phase = ReconcilePhase::Scanning;
    let mut tally = ScanTally::default();
    let mut demand = WorkforceDemand::ZERO;

    loop {
        phase = match phase {
            ReconcilePhase::Scanning => {
                tally = scan_units(
                    deps.pool,
                    building.citizen_units,
                    &targets,
                    building.wealth(),
                );
                if tally.truncated {
                    report.list_truncated = true;
                    error!(
                        "Unit list of building {:?} ('{}') is corrupt: walk stopped after {} hops or at a dead link",
                        entity, building.name, MAX_UNIT_LIST_HOPS
                    );
                }

                for reason in TransferReason::WORKERS {
                    deps.offers
                        .remove_incoming_offer(reason, TransferOffer::for_building(entity));
                }
                demand = tally.demand;
                demand += workplaces.calculate_workplace_count(
                    building.level,
                    deps.rng,
                    building.width,
                    building.length,
                );
                // A corrupt list is never spliced; only its workforce is
                // rebalanced.
                if tally.truncated {
                    ReconcilePhase::Rebalancing
                } else {
                    ReconcilePhase::Trimming
                }
            }
            ReconcilePhase::Trimming => {
                if tally.work < 0 {
                    let keep = blocks(targets.work.max(0) as u32);
                    let outcome =
                        remove_worker_building(deps.pool, &mut building.citizen_units, keep);
                    report.units_released += outcome.released;
                    report.roles_dropped += outcome.roles_dropped;
                    report.workers_evicted += outcome.evicted;
                    report.list_truncated |= outcome.truncated;
                    demand += outcome.freed_demand;
                }
                if tally.home < 0 {
                    let keep = targets.home.max(0) as u32;
                    let outcome = remove_household(deps.pool, &mut building.citizen_units, keep);
                    report.units_released += outcome.released;
                    report.roles_dropped += outcome.roles_dropped;
                    report.households_evicted += outcome.evicted;
                    report.list_truncated |= outcome.truncated;
                }
                ReconcilePhase::Expanding
            }
            ReconcilePhase::Expanding => {
                let request = UnitRequest {
                    homes: tally.home.max(0) as u32,
                    workers: tally.work.max(0) as u32,
                    visitors: tally.visit as u32,
                    students: tally.student as u32,
                    wealth: building.wealth(),
                };
                if !request.is_empty() {
                    report.batch_requested = Some(request);
                    expand(entity, building, request, deps, &mut report);
                }
                ReconcilePhase::Rebalancing
            }
            ReconcilePhase::Rebalancing => {
                let outcome = promote_workers(building, deps.pool, deps.rng, &mut demand);
                report.rebalanced = outcome.ran;
                report.promoted = outcome.promoted;
                report.rebalance_evicted = outcome.evicted;
                report.list_truncated |= outcome.truncated;
                ReconcilePhase::Done
            }
            ReconcilePhase::Done => break,
        };
    }

    report.demand = demand;
    report
}

/// Creates `request` in one batch and links it onto the building's list.
fn expand(
    entity: Entity,
    building: &mut PloppedBuilding,
    request: UnitRequest,
    deps: &mut Collaborators,
    report: &mut ReconcileReport,
) {
    let Some(chain) = deps.pool.create_units(entity, request) else {
        report.allocation_failed = true;
        warn!(
            "Citizen unit pool exhausted: building {:?} ('{}') is {} units short",
            entity,
            building.name,
            request.unit_count()
        );
        return;
    };

    if append_chain(
        deps.pool,
        &mut building.citizen_units,
        chain,
        MAX_UNIT_LIST_HOPS,
    ) {
        report.units_created = request.unit_count();
    } else {
        // The tail could not be reached; hand the new units straight back.
        let mut orphan = Some(chain);
        release_chain(deps.pool, &mut orphan, MAX_UNIT_LIST_HOPS);
        report.list_truncated = true;
        error!(
            "Could not reach the tail of building {:?} ('{}'); released {} new units",
            entity,
            building.name,
            request.unit_count()
        );
    }
}
