//! Built-in RICO settings and population used when no settings file is
//! given, or the given one cannot be read.

use bevy::prelude::*;

use simulation::buildings::PloppedBuilding;
use simulation::citizen_units::{walk_units, Citizen, CitizenManager, PoolAccess, UnitFlags};
use simulation::config::MAX_UNIT_LIST_HOPS;
use simulation::education::EducationLevel;

pub const DEMO_RICO: &str = r#"[
    {
        "name": "Harbour Lofts",
        "service": "Residential",
        "sub_service": "ResidentialHigh",
        "level": 3,
        "homes": 24,
        "visitors": 10,
        "growable": true
    },
    {
        "name": "Circuit Works",
        "service": "Industrial",
        "sub_service": "Generic",
        "level": 2,
        "workers": 60,
        "growable": true
    },
    {
        "name": "Research Campus",
        "service": "Office",
        "sub_service": "HighTech",
        "workers": 45,
        "students": 20
    },
    {
        "name": "Boardwalk Arcade",
        "service": "Commercial",
        "sub_service": "CommercialLeisure",
        "workers": 18,
        "visitors": 40
    },
    {
        "name": "Riverside Farm",
        "service": "Extractor",
        "sub_service": "Farming",
        "workers": 20,
        "width": 8,
        "length": 8
    }
]"#;

/// Seats citizens in every plopped building: residents fill their homes,
/// and each work unit takes five workers with education cycling through the
/// tiers, so the next reconciliation has something to rebalance.
pub fn move_in_citizens(world: &mut World) -> usize {
    let heads: Vec<_> = world
        .query::<&PloppedBuilding>()
        .iter(world)
        .map(|b| b.citizen_units)
        .collect();

    let mut pool = world.resource_mut::<CitizenManager>();
    let mut seated = 0;
    let mut next_tier = EducationLevel::ALL.iter().copied().cycle();
    for head in heads {
        let units = walk_units(&*pool, head, MAX_UNIT_LIST_HOPS).units;
        for unit in units {
            let flags = pool.unit(unit).map(|u| u.flags).unwrap_or_default();
            if !flags.contains(UnitFlags::HOME) && !flags.contains(UnitFlags::WORK) {
                continue;
            }
            while pool.unit(unit).is_some_and(|u| u.free_slot().is_some()) {
                let education = match next_tier.next() {
                    Some(tier) if flags.contains(UnitFlags::WORK) => tier,
                    _ => EducationLevel::Uneducated,
                };
                let Some(citizen) = pool.spawn_citizen(Citizen::with_education(education)) else {
                    return seated;
                };
                pool.place_citizen(unit, citizen);
                seated += 1;
            }
        }
    }
    seated
}
