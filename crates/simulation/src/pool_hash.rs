//! Deterministic fingerprint of a building's citizen units.
//!
//! Hashes, in list order, every reachable unit (id, roles, slots, wealth)
//! and the education and back-references of each seated citizen. Two passes
//! that leave a building untouched leave its fingerprint unchanged, which
//! makes it a cheap check for replays and no-op reconciliation.

use std::hash::{Hash, Hasher};

use bevy::prelude::*;

use crate::citizen_units::{walk_units, PoolAccess, UnitId};
use crate::config::MAX_UNIT_LIST_HOPS;

// ---------------------------------------------------------------------------
// FNV-1a hasher (deterministic, no random seed)
// ---------------------------------------------------------------------------

struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001B3;

    fn new() -> Self {
        Self {
            state: Self::FNV_OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u64;
            self.state = self.state.wrapping_mul(Self::FNV_PRIME);
        }
    }
}

fn hash_building(building: Option<Entity>, hasher: &mut Fnv1aHasher) {
    building.map(Entity::to_bits).hash(hasher);
}

/// Fingerprint of the list rooted at `head` and the citizens seated on it.
pub fn building_fingerprint(pool: &dyn PoolAccess, head: Option<UnitId>) -> u64 {
    let mut hasher = Fnv1aHasher::new();
    let walk = walk_units(pool, head, MAX_UNIT_LIST_HOPS);
    walk.truncated.hash(&mut hasher);

    for id in walk.units {
        let Some(unit) = pool.unit(id) else {
            continue;
        };
        id.raw().hash(&mut hasher);
        unit.flags.bits().hash(&mut hasher);
        unit.wealth.hash(&mut hasher);
        hash_building(unit.building, &mut hasher);
        for slot in unit.citizens {
            slot.map(|c| c.raw()).hash(&mut hasher);
            let Some(citizen) = slot.and_then(|c| pool.citizen(c)) else {
                continue;
            };
            citizen.education.index().hash(&mut hasher);
            hash_building(citizen.home_building, &mut hasher);
            hash_building(citizen.work_building, &mut hasher);
        }
    }

    hasher.finish()
}
