use std::collections::HashSet;

use bevy::prelude::*;

use crate::buildings::PloppedBuilding;
use crate::citizen_units::{release_chain, CitizenManager};
use crate::config::MAX_UNIT_LIST_HOPS;
use crate::rico::{CachedWorkplaceCount, RicoRegistry, RicoWorkplaceCount, WorkplaceCache};
use crate::sim_rng::SimRng;
use crate::transfer_offers::{
    post_worker_offers, TransferOfferBoard, TransferOffer, TransferOffers, TransferReason,
};
use crate::TickCounter;

use super::engine::reconcile;
use super::types::{
    ApplyRicoSettings, Collaborators, DemolishPlopped, ReconcileSchedule, ReconcileStats,
};

// ---------------------------------------------------------------------------
// System: reconcile_plopped_buildings
// Runs on the schedule interval for every building, and on the next tick for
// buildings whose settings were re-applied or whose level changed.
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
pub fn reconcile_plopped_buildings(
    tick: Res<TickCounter>,
    schedule: Res<ReconcileSchedule>,
    registry: Res<RicoRegistry>,
    mut apply: EventReader<ApplyRicoSettings>,
    mut cache: ResMut<WorkplaceCache>,
    mut pool: ResMut<CitizenManager>,
    mut offers: ResMut<TransferOfferBoard>,
    mut rng: ResMut<SimRng>,
    mut stats: ResMut<ReconcileStats>,
    mut buildings: Query<(Entity, &mut PloppedBuilding)>,
) {
    let applied: HashSet<Entity> = apply.read().map(|ev| ev.building).collect();
    let due = schedule.is_due(tick.0);

    for (entity, mut building) in &mut buildings {
        let forced = applied.contains(&entity);
        if !(due || forced || building.needs_level_reconcile()) {
            continue;
        }
        let Some(settings) = registry.get(&building.name) else {
            warn!(
                "Plopped building {:?} has no RICO settings named '{}'",
                entity, building.name
            );
            building.reconciled_level = Some(building.level);
            stats.buildings_skipped += 1;
            continue;
        };
        if forced {
            cache.invalidate(&settings.name);
        }

        let mut workplaces =
            CachedWorkplaceCount::new(&mut cache, &settings.name, RicoWorkplaceCount::new(settings));
        let mut deps = Collaborators {
            pool: &mut *pool,
            offers: &mut *offers,
            rng: &mut *rng,
        };
        let report = reconcile(
            entity,
            &mut building,
            settings.targets(),
            &mut workplaces,
            &mut deps,
        );
        building.reconciled_level = Some(building.level);

        if !report.skipped {
            post_worker_offers(&mut *offers, entity, &report.demand);
            if !report.is_noop() {
                debug!(
                    "Reconciled '{}' ({:?}): +{} / -{} units, {} promoted, {} workers and {} households evicted",
                    building.name,
                    entity,
                    report.units_created,
                    report.units_released,
                    report.promoted,
                    report.workers_evicted + report.rebalance_evicted,
                    report.households_evicted
                );
            }
        }
        stats.record(&report);
    }
}

// ---------------------------------------------------------------------------
// System: demolish_plopped_buildings
// ---------------------------------------------------------------------------

pub fn demolish_plopped_buildings(
    mut commands: Commands,
    mut events: EventReader<DemolishPlopped>,
    mut pool: ResMut<CitizenManager>,
    mut offers: ResMut<TransferOfferBoard>,
    mut stats: ResMut<ReconcileStats>,
    mut buildings: Query<&mut PloppedBuilding>,
) {
    let mut handled = HashSet::new();
    for ev in events.read() {
        if !handled.insert(ev.building) {
            continue;
        }
        let Ok(mut building) = buildings.get_mut(ev.building) else {
            warn!("DemolishPlopped: {:?} is not a plopped building", ev.building);
            continue;
        };

        let released = release_chain(&mut *pool, &mut building.citizen_units, MAX_UNIT_LIST_HOPS);
        for reason in TransferReason::WORKERS {
            offers.remove_incoming_offer(reason, TransferOffer::for_building(ev.building));
        }
        stats.units_released += u64::from(released);
        stats.demolished += 1;
        info!(
            "Demolished '{}' ({:?}), returned {} citizen units",
            building.name, ev.building, released
        );
        commands.entity(ev.building).despawn();
    }
}
