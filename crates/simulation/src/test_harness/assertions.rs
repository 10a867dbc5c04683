//! Assertion helpers for `TestTown` integration tests.

use bevy::prelude::*;

use crate::citizen_units::UnitFlags;

use super::TestTown;

impl TestTown {
    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    /// Assert the building holds exactly the given number of units per role.
    pub fn assert_units(
        &self,
        entity: Entity,
        homes: usize,
        work: usize,
        visit: usize,
        student: usize,
    ) {
        let actual = [
            self.units(entity, UnitFlags::HOME),
            self.units(entity, UnitFlags::WORK),
            self.units(entity, UnitFlags::VISIT),
            self.units(entity, UnitFlags::STUDENT),
        ];
        assert_eq!(
            actual,
            [homes, work, visit, student],
            "Expected home/work/visit/student units {:?} for {entity:?}, got {actual:?}",
            [homes, work, visit, student]
        );
    }

    /// Assert the shared pool has exactly `expected` units handed out.
    pub fn assert_pool_in_use(&self, expected: usize) {
        let in_use = self.pool().units_in_use();
        assert_eq!(
            in_use, expected,
            "Expected {expected} citizen units in use, got {in_use}"
        );
    }

    pub fn assert_despawned(&self, entity: Entity) {
        assert!(
            self.building(entity).is_none(),
            "Expected {entity:?} to be despawned"
        );
    }
}
