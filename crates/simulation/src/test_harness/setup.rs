//! Builder and action methods for `TestTown`.

use bevy::prelude::*;

use crate::buildings::PloppedBuilding;
use crate::citizen_units::{walk_units, Citizen, CitizenId, CitizenManager, PoolAccess, UnitFlags};
use crate::config::MAX_UNIT_LIST_HOPS;
use crate::education::EducationLevel;
use crate::reconcile::{ApplyRicoSettings, DemolishPlopped, ReconcileSchedule};
use crate::rico::{RicoRegistry, RicoSettings};
use crate::sim_rng::SimRng;

use super::TestTown;

impl TestTown {
    // -----------------------------------------------------------------------
    // Builder methods
    // -----------------------------------------------------------------------

    /// Register RICO settings for a building asset.
    pub fn with_rico(mut self, settings: RicoSettings) -> Self {
        self.app
            .world_mut()
            .resource_mut::<RicoRegistry>()
            .insert(settings);
        self
    }

    /// Replace the shared pools with smaller ones (slot 0 of each is
    /// reserved).
    pub fn with_pool_capacity(mut self, units: u32, citizens: u32) -> Self {
        self.app
            .world_mut()
            .insert_resource(CitizenManager::with_capacity(units, citizens));
        self
    }

    pub fn with_reconcile_interval(mut self, ticks: u64) -> Self {
        self.app
            .world_mut()
            .insert_resource(ReconcileSchedule { interval: ticks });
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.app
            .world_mut()
            .insert_resource(SimRng::from_seed_u64(seed));
        self
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Spawn a plopped building for registered settings `name`.
    pub fn plop(&mut self, name: &str) -> Entity {
        let world = self.app.world_mut();
        let building = {
            let registry = world.resource::<RicoRegistry>();
            let settings = registry
                .get(name)
                .unwrap_or_else(|| panic!("no RICO settings named '{name}'"));
            PloppedBuilding::from_settings(settings)
        };
        world.spawn(building).id()
    }

    /// Replace a building's settings, as the settings panel would, and ask
    /// for the building to be reconciled on the next tick.
    pub fn apply_settings(&mut self, building: Entity, settings: RicoSettings) {
        let world = self.app.world_mut();
        world.resource_mut::<RicoRegistry>().insert(settings);
        world.send_event(ApplyRicoSettings { building });
    }

    pub fn demolish(&mut self, building: Entity) {
        self.app
            .world_mut()
            .send_event(DemolishPlopped { building });
    }

    pub fn set_level(&mut self, building: Entity, level: u8) -> bool {
        self.app
            .world_mut()
            .get_mut::<PloppedBuilding>(building)
            .is_some_and(|mut b| b.set_level(level))
    }

    /// Seat one citizen per entry of `tiers` in the building's `role`
    /// units, filling units in list order. Stops early when every unit is
    /// full.
    pub fn move_in(
        &mut self,
        building: Entity,
        role: UnitFlags,
        tiers: &[EducationLevel],
    ) -> Vec<CitizenId> {
        let world = self.app.world_mut();
        let head = world
            .get::<PloppedBuilding>(building)
            .and_then(|b| b.citizen_units);
        let mut pool = world.resource_mut::<CitizenManager>();
        let units: Vec<_> = walk_units(&*pool, head, MAX_UNIT_LIST_HOPS)
            .units
            .into_iter()
            .filter(|&id| pool.unit(id).is_some_and(|u| u.flags.contains(role)))
            .collect();

        let mut seated = Vec::new();
        for &tier in tiers {
            let free = units
                .iter()
                .copied()
                .find(|&id| pool.unit(id).is_some_and(|u| u.free_slot().is_some()));
            let Some(unit) = free else {
                break;
            };
            let Some(citizen) = pool.spawn_citizen(Citizen::with_education(tier)) else {
                break;
            };
            pool.place_citizen(unit, citizen);
            seated.push(citizen);
        }
        seated
    }
}
