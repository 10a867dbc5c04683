//! Tick and query methods for `TestTown`.

use bevy::prelude::*;

use crate::buildings::PloppedBuilding;
use crate::citizen_units::{count_units, CitizenManager, UnitFlags};
use crate::config::MAX_UNIT_LIST_HOPS;
use crate::pool_hash::building_fingerprint;
use crate::reconcile::ReconcileStats;
use crate::transfer_offers::TransferOfferBoard;
use crate::TickCounter;

use super::TestTown;

impl TestTown {
    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Run `n` fixed simulation ticks.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    /// Run ticks until the next scheduled reconciliation has happened.
    pub fn tick_until_reconciled(&mut self) {
        let interval = self
            .resource::<crate::reconcile::ReconcileSchedule>()
            .interval
            .max(1);
        let now = self.tick_count();
        let remaining = interval - now % interval;
        self.tick(remaining as u32);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Access the ECS world mutably (needed for queries in Bevy).
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    /// Get an arbitrary resource.
    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn tick_count(&self) -> u64 {
        self.resource::<TickCounter>().0
    }

    pub fn pool(&self) -> &CitizenManager {
        self.resource::<CitizenManager>()
    }

    pub fn stats(&self) -> &ReconcileStats {
        self.resource::<ReconcileStats>()
    }

    pub fn offers(&self) -> &TransferOfferBoard {
        self.resource::<TransferOfferBoard>()
    }

    /// The building's component, or `None` once it has been despawned.
    pub fn building(&self, entity: Entity) -> Option<&PloppedBuilding> {
        self.app.world().get::<PloppedBuilding>(entity)
    }

    /// Number of reachable units on the building's list carrying `role`.
    pub fn units(&self, entity: Entity, role: UnitFlags) -> usize {
        let head = self.building(entity).and_then(|b| b.citizen_units);
        count_units(self.pool(), head, role, MAX_UNIT_LIST_HOPS)
    }

    pub fn fingerprint(&self, entity: Entity) -> u64 {
        let head = self.building(entity).and_then(|b| b.citizen_units);
        building_fingerprint(self.pool(), head)
    }
}
