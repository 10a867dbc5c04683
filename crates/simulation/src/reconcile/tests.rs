use bevy::prelude::Entity;

use crate::buildings::{BuildingFlags, PloppedBuilding};
use crate::citizen_units::{
    count_units, walk_units, Citizen, CitizenId, CitizenManager, CitizenUnit, PoolAccess,
    UnitFlags, UnitId, UnitRequest, Wealth,
};
use crate::config::MAX_UNIT_LIST_HOPS;
use crate::education::{EducationLevel, WorkforceDemand};
use crate::pool_hash::building_fingerprint;
use crate::rico::WorkplaceCounter;
use crate::sim_rng::{Randomizer, ScriptedRolls};
use crate::transfer_offers::{TransferOffer, TransferOfferBoard, TransferOffers, TransferReason};

use super::*;

use EducationLevel::{Educated, HighlyEducated, Uneducated, WellEducated};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Reports the same jobs at every level.
struct FixedJobs(WorkforceDemand);

impl WorkplaceCounter for FixedJobs {
    fn calculate_workplace_count(
        &mut self,
        _level: u8,
        _rng: &mut dyn Randomizer,
        _width: u8,
        _length: u8,
    ) -> WorkforceDemand {
        self.0
    }
}

/// Forwards to a real pool and counts batch allocations.
struct CountingPool<'a> {
    inner: &'a mut CitizenManager,
    create_calls: u32,
}

impl PoolAccess for CountingPool<'_> {
    fn unit(&self, id: UnitId) -> Option<&CitizenUnit> {
        self.inner.unit(id)
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut CitizenUnit> {
        self.inner.unit_mut(id)
    }

    fn citizen(&self, id: CitizenId) -> Option<&Citizen> {
        self.inner.citizen(id)
    }

    fn citizen_mut(&mut self, id: CitizenId) -> Option<&mut Citizen> {
        self.inner.citizen_mut(id)
    }

    fn create_units(&mut self, building: Entity, request: UnitRequest) -> Option<UnitId> {
        self.create_calls += 1;
        self.inner.create_units(building, request)
    }

    fn release_unit(&mut self, id: UnitId) {
        self.inner.release_unit(id);
    }
}

struct Town {
    pool: CitizenManager,
    offers: TransferOfferBoard,
    rng: ScriptedRolls,
    entity: Entity,
    building: PloppedBuilding,
}

impl Town {
    fn new() -> Self {
        Self::with_pool(CitizenManager::with_capacity(256, 256))
    }

    fn with_pool(pool: CitizenManager) -> Self {
        Self {
            pool,
            offers: TransferOfferBoard::default(),
            rng: ScriptedRolls::new([99]),
            entity: Entity::from_raw(11),
            building: PloppedBuilding::new("Test Block", 1, 4, 4),
        }
    }

    fn run(&mut self, targets: ReconcileTargets, jobs: WorkforceDemand) -> ReconcileReport {
        let mut deps = Collaborators {
            pool: &mut self.pool,
            offers: &mut self.offers,
            rng: &mut self.rng,
        };
        reconcile(
            self.entity,
            &mut self.building,
            targets,
            &mut FixedJobs(jobs),
            &mut deps,
        )
    }

    fn head(&self) -> Option<UnitId> {
        self.building.citizen_units
    }

    fn units(&self, role: UnitFlags) -> usize {
        count_units(&self.pool, self.head(), role, MAX_UNIT_LIST_HOPS)
    }

    fn units_with(&self, role: UnitFlags) -> Vec<UnitId> {
        walk_units(&self.pool, self.head(), MAX_UNIT_LIST_HOPS)
            .units
            .into_iter()
            .filter(|&id| self.pool.unit(id).is_some_and(|u| u.flags.contains(role)))
            .collect()
    }

    /// Seats one citizen per entry in the first role unit with room.
    fn seat(&mut self, role: UnitFlags, tiers: &[EducationLevel]) -> Vec<CitizenId> {
        let units = self.units_with(role);
        let mut seated = Vec::new();
        for &tier in tiers {
            let citizen = self
                .pool
                .spawn_citizen(Citizen::with_education(tier))
                .unwrap();
            let unit = units
                .iter()
                .copied()
                .find(|&u| self.pool.unit(u).unwrap().free_slot().is_some())
                .unwrap();
            self.pool.place_citizen(unit, citizen).unwrap();
            seated.push(citizen);
        }
        seated
    }

    fn citizen(&self, id: CitizenId) -> &Citizen {
        self.pool.citizen(id).unwrap()
    }

    fn fingerprint(&self) -> u64 {
        building_fingerprint(&self.pool, self.head())
    }
}

fn targets(home: i32, work: i32, visit: i32, student: i32) -> ReconcileTargets {
    ReconcileTargets::new(home, work, visit, student)
}

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

#[test]
fn test_empty_building_gets_one_batch() {
    let mut pool = CitizenManager::with_capacity(256, 256);
    let mut counting = CountingPool {
        inner: &mut pool,
        create_calls: 0,
    };
    let mut offers = TransferOfferBoard::default();
    let mut rng = ScriptedRolls::default();
    let mut building = PloppedBuilding::new("Harbour Lofts", 2, 4, 4);
    let entity = Entity::from_raw(1);

    let report = {
        let mut deps = Collaborators {
            pool: &mut counting,
            offers: &mut offers,
            rng: &mut rng,
        };
        reconcile(
            entity,
            &mut building,
            targets(10, 25, 5, 0),
            &mut FixedJobs(WorkforceDemand::ZERO),
            &mut deps,
        )
    };

    assert_eq!(counting.create_calls, 1);
    assert_eq!(report.units_created, 16);
    assert_eq!(
        report.batch_requested,
        Some(UnitRequest {
            homes: 10,
            workers: 25,
            visitors: 5,
            students: 0,
            wealth: Wealth::Low,
        })
    );
    assert_eq!(report.workers_evicted + report.households_evicted, 0);
    assert_eq!(report.units_released, 0);

    let head = building.citizen_units;
    assert_eq!(count_units(&pool, head, UnitFlags::HOME, MAX_UNIT_LIST_HOPS), 10);
    assert_eq!(count_units(&pool, head, UnitFlags::WORK, MAX_UNIT_LIST_HOPS), 5);
    assert_eq!(count_units(&pool, head, UnitFlags::VISIT, MAX_UNIT_LIST_HOPS), 1);
    assert_eq!(count_units(&pool, head, UnitFlags::STUDENT, MAX_UNIT_LIST_HOPS), 0);
    assert_eq!(pool.units_in_use(), 16);
}

#[test]
fn test_shortfall_is_appended_after_existing_units() {
    let mut town = Town::new();
    town.run(targets(2, 0, 0, 0), WorkforceDemand::ZERO);
    let homes = town.units_with(UnitFlags::HOME);

    let report = town.run(targets(2, 5, 0, 0), WorkforceDemand::ZERO);
    assert_eq!(report.units_created, 1);

    let walk = walk_units(&town.pool, town.head(), MAX_UNIT_LIST_HOPS);
    assert_eq!(&walk.units[..2], &homes[..]);
    let last = town.pool.unit(walk.units[2]).unwrap();
    assert_eq!(last.flags, UnitFlags::WORK);
}

#[test]
fn test_exhausted_pool_leaves_list_untouched() {
    let mut town = Town::with_pool(CitizenManager::with_capacity(5, 16));
    let report = town.run(targets(10, 0, 0, 0), WorkforceDemand::ZERO);

    assert!(report.allocation_failed);
    assert_eq!(report.units_created, 0);
    assert!(town.head().is_none());
    assert_eq!(town.pool.units_in_use(), 0);
}

#[test]
fn test_visit_and_student_surplus_is_left_alone() {
    let mut town = Town::new();
    town.run(targets(0, 0, 10, 10), WorkforceDemand::ZERO);
    assert_eq!(town.units(UnitFlags::VISIT), 2);
    assert_eq!(town.units(UnitFlags::STUDENT), 2);

    let report = town.run(targets(0, 0, 0, 0), WorkforceDemand::ZERO);
    assert!(report.is_noop());
    assert_eq!(town.units(UnitFlags::VISIT), 2);
    assert_eq!(town.units(UnitFlags::STUDENT), 2);
}

// ---------------------------------------------------------------------------
// Idempotence and preconditions
// ---------------------------------------------------------------------------

#[test]
fn test_second_pass_with_same_targets_is_noop() {
    let mut town = Town::new();
    let goal = targets(4, 10, 5, 5);
    town.run(goal, WorkforceDemand::ZERO);
    town.seat(UnitFlags::WORK, &[Uneducated; 6]);
    town.seat(UnitFlags::WORK, &[Educated; 4]);
    let jobs = WorkforceDemand::new(6, 4, 0, 0);

    let first = town.run(goal, jobs);
    assert!(first.is_noop());
    assert!(first.demand.is_zero());

    let before = town.fingerprint();
    let second = town.run(goal, jobs);
    assert!(second.is_noop());
    assert!(!second.rebalanced);
    assert_eq!(town.fingerprint(), before);
}

#[test]
fn test_abandoned_building_is_skipped() {
    let mut town = Town::new();
    town.building.flags.insert(BuildingFlags::ABANDONED);
    town.offers.add_incoming_offer(
        TransferReason::Worker(Uneducated),
        TransferOffer {
            building: town.entity,
            amount: 3,
        },
    );

    let report = town.run(targets(5, 5, 0, 0), WorkforceDemand::new(5, 0, 0, 0));
    assert!(report.skipped);
    assert!(town.head().is_none());
    assert_eq!(town.offers.incoming_for(town.entity).len(), 1);
}

#[test]
fn test_burned_down_building_is_skipped() {
    let mut town = Town::new();
    town.run(targets(2, 0, 0, 0), WorkforceDemand::ZERO);
    let before = town.fingerprint();
    town.building.flags.insert(BuildingFlags::BURNED_DOWN);

    let report = town.run(targets(0, 0, 0, 0), WorkforceDemand::ZERO);
    assert!(report.skipped);
    assert_eq!(town.fingerprint(), before);
}

// ---------------------------------------------------------------------------
// Trimming
// ---------------------------------------------------------------------------

#[test]
fn test_remove_worker_building_keeps_first_units() {
    let mut town = Town::new();
    town.run(targets(0, 20, 0, 0), WorkforceDemand::ZERO);
    let seated = town.seat(UnitFlags::WORK, &[Educated; 20]);
    let work_units = town.units_with(UnitFlags::WORK);

    let mut head = town.building.citizen_units;
    let outcome = remove_worker_building(&mut town.pool, &mut head, 2);
    town.building.citizen_units = head;

    assert_eq!(outcome.kept, 2);
    assert_eq!(outcome.released, 2);
    assert_eq!(outcome.evicted, 10);
    assert_eq!(outcome.freed_demand, WorkforceDemand::new(0, 10, 0, 0));
    assert_eq!(town.units_with(UnitFlags::WORK), work_units[..2].to_vec());

    for (i, &citizen) in seated.iter().enumerate() {
        let employed = town.citizen(citizen).work_building.is_some();
        assert_eq!(employed, i < 10, "citizen {i}");
    }
}

#[test]
fn test_trimming_can_release_the_head() {
    let mut town = Town::new();
    town.run(targets(0, 10, 0, 0), WorkforceDemand::ZERO);
    let mut head = town.building.citizen_units;

    let outcome = remove_worker_building(&mut town.pool, &mut head, 0);
    assert_eq!(outcome.released, 2);
    assert!(head.is_none());
    assert_eq!(town.pool.units_in_use(), 0);
}

#[test]
fn test_lower_work_target_releases_units_and_returns_demand() {
    let mut town = Town::new();
    town.run(targets(0, 20, 0, 0), WorkforceDemand::ZERO);
    town.seat(UnitFlags::WORK, &[Uneducated; 20]);

    let report = town.run(targets(0, 7, 0, 0), WorkforceDemand::new(7, 0, 0, 0));
    assert_eq!(report.units_released, 2);
    assert_eq!(report.workers_evicted, 10);
    assert_eq!(town.units(UnitFlags::WORK), 2);
    // 7 jobs, 10 workers left: three let go at the surplus tier.
    assert_eq!(report.rebalance_evicted, 3);
    assert!(report.demand.is_zero());
}

#[test]
fn test_lower_home_target_moves_households_out() {
    let mut town = Town::new();
    town.run(targets(6, 0, 0, 0), WorkforceDemand::ZERO);
    let residents = town.seat(UnitFlags::HOME, &[Uneducated; 30]);

    let report = town.run(targets(2, 0, 0, 0), WorkforceDemand::ZERO);
    assert_eq!(report.units_released, 4);
    assert_eq!(report.households_evicted, 20);
    assert_eq!(town.units(UnitFlags::HOME), 2);

    let housed = residents
        .iter()
        .filter(|&&c| town.citizen(c).home_building == Some(town.entity))
        .count();
    assert_eq!(housed, 10);
}

#[test]
fn test_multi_role_unit_only_loses_trimmed_role() {
    let mut town = Town::new();
    town.run(targets(1, 0, 0, 0), WorkforceDemand::ZERO);
    let unit = town.head().unwrap();
    town.pool.unit_mut(unit).unwrap().flags = UnitFlags::HOME | UnitFlags::WORK;
    let people = town.seat(UnitFlags::WORK, &[Educated, Educated]);

    let mut head = town.building.citizen_units;
    let outcome = remove_worker_building(&mut town.pool, &mut head, 0);

    assert_eq!(outcome.released, 0);
    assert_eq!(outcome.roles_dropped, 1);
    assert_eq!(outcome.evicted, 2);
    assert_eq!(head, Some(unit));
    let record = town.pool.unit(unit).unwrap();
    assert_eq!(record.flags, UnitFlags::HOME);
    assert_eq!(record.occupant_count(), 2);
    for citizen in people {
        assert!(town.citizen(citizen).work_building.is_none());
        assert_eq!(town.citizen(citizen).home_building, Some(town.entity));
    }
}

// ---------------------------------------------------------------------------
// Corrupt lists
// ---------------------------------------------------------------------------

#[test]
fn test_cyclic_list_terminates_without_splicing() {
    let mut town = Town::new();
    town.run(targets(3, 0, 0, 0), WorkforceDemand::ZERO);
    let units = town.units_with(UnitFlags::HOME);
    town.pool.unit_mut(units[2]).unwrap().next = Some(units[0]);

    let report = town.run(targets(1, 10, 0, 0), WorkforceDemand::ZERO);
    assert!(report.list_truncated);
    assert_eq!(report.units_released, 0);
    assert_eq!(report.units_created, 0);
    assert_eq!(town.pool.units_in_use(), 3);
}

#[test]
fn test_dead_link_is_reported() {
    let mut town = Town::new();
    town.run(targets(2, 0, 0, 0), WorkforceDemand::ZERO);
    let units = town.units_with(UnitFlags::HOME);
    town.pool.release_unit(units[1]);

    let report = town.run(targets(2, 0, 0, 0), WorkforceDemand::ZERO);
    assert!(report.list_truncated);
}

// ---------------------------------------------------------------------------
// Rebalancing
// ---------------------------------------------------------------------------

#[test]
fn test_promotion_odds_fall_with_tier() {
    let promotions: Vec<usize> = [Uneducated, Educated, WellEducated]
        .into_iter()
        .map(|tier| {
            (0..100u32)
                .filter(|&roll| promotion_roll(&mut ScriptedRolls::new([roll]), tier))
                .count()
        })
        .collect();
    assert_eq!(promotions, vec![49, 34, 19]);
}

#[test]
fn test_surplus_workers_promoted_or_let_go_by_roll() {
    let mut town = Town::new();
    town.run(targets(0, 5, 0, 0), WorkforceDemand::ZERO);
    let workers = town.seat(UnitFlags::WORK, &[Uneducated; 5]);
    town.rng = ScriptedRolls::new([99, 0, 99, 0, 99]);

    let report = town.run(targets(0, 5, 0, 0), WorkforceDemand::new(0, 5, 0, 0));
    assert_eq!(report.promoted, 3);
    assert_eq!(report.rebalance_evicted, 2);
    assert_eq!(report.demand, WorkforceDemand::new(0, 2, 0, 0));
    assert_eq!(town.rng.consumed(), 5);

    let promoted = workers
        .iter()
        .filter(|&&c| town.citizen(c).education == Educated)
        .count();
    assert_eq!(promoted, 3);
    let unit = town.units_with(UnitFlags::WORK)[0];
    assert_eq!(town.pool.unit(unit).unwrap().occupant_count(), 3);
    assert!(town.citizen(workers[1]).work_building.is_none());
}

#[test]
fn test_surplus_without_deficit_above_is_let_go() {
    let mut town = Town::new();
    town.run(targets(0, 5, 0, 0), WorkforceDemand::ZERO);
    town.seat(UnitFlags::WORK, &[Uneducated; 5]);

    let report = town.run(targets(0, 5, 0, 0), WorkforceDemand::new(2, 0, 0, 0));
    assert_eq!(report.rebalance_evicted, 3);
    assert_eq!(report.promoted, 0);
    assert_eq!(town.rng.consumed(), 0);
    assert!(report.demand.is_zero());
}

#[test]
fn test_top_tier_workers_are_never_touched() {
    let mut town = Town::new();
    town.run(targets(0, 5, 0, 0), WorkforceDemand::ZERO);
    let experts = town.seat(UnitFlags::WORK, &[HighlyEducated; 5]);

    let report = town.run(targets(0, 5, 0, 0), WorkforceDemand::new(5, 0, 0, 0));
    assert!(report.rebalanced);
    assert_eq!(report.promoted + report.rebalance_evicted, 0);
    assert_eq!(report.demand, WorkforceDemand::new(5, 0, 0, -5));
    for citizen in experts {
        assert_eq!(town.citizen(citizen).education, HighlyEducated);
        assert_eq!(town.citizen(citizen).work_building, Some(town.entity));
    }
}

#[test]
fn test_crime_and_garbage_reset_only_when_rebalancing() {
    let mut town = Town::new();
    town.run(targets(0, 5, 0, 0), WorkforceDemand::ZERO);
    town.seat(UnitFlags::WORK, &[Uneducated; 5]);

    town.building.crime_buffer = 40;
    town.building.garbage_buffer = 12;
    let balanced = town.run(targets(0, 5, 0, 0), WorkforceDemand::new(5, 0, 0, 0));
    assert!(!balanced.rebalanced);
    assert_eq!(town.building.crime_buffer, 40);
    assert_eq!(town.building.garbage_buffer, 12);

    let hiring = town.run(targets(0, 5, 0, 0), WorkforceDemand::new(6, 0, 0, 0));
    assert!(hiring.rebalanced);
    assert_eq!(town.building.crime_buffer, 0);
    assert_eq!(town.building.garbage_buffer, 0);
}

// ---------------------------------------------------------------------------
// Side effects
// ---------------------------------------------------------------------------

#[test]
fn test_stale_offers_are_withdrawn() {
    let mut town = Town::new();
    let other = Entity::from_raw(99);
    for reason in TransferReason::WORKERS {
        for building in [town.entity, other] {
            town.offers
                .add_incoming_offer(reason, TransferOffer { building, amount: 1 });
        }
    }

    town.run(targets(0, 0, 0, 0), WorkforceDemand::ZERO);
    assert!(town.offers.incoming_for(town.entity).is_empty());
    assert_eq!(town.offers.incoming_for(other).len(), 4);
}

#[test]
fn test_home_units_follow_building_wealth() {
    let mut town = Town::new();
    town.run(targets(3, 5, 0, 0), WorkforceDemand::ZERO);
    town.building.level = 5;

    let report = town.run(targets(3, 5, 0, 0), WorkforceDemand::ZERO);
    assert!(report.is_noop());
    for unit in town.units_with(UnitFlags::HOME) {
        assert_eq!(town.pool.unit(unit).unwrap().wealth, Wealth::High);
    }
    let work = town.units_with(UnitFlags::WORK)[0];
    assert_eq!(town.pool.unit(work).unwrap().wealth, Wealth::Low);
}

#[test]
fn test_stats_accumulate_reports() {
    let mut stats = ReconcileStats::default();
    stats.record(&ReconcileReport {
        units_created: 4,
        workers_evicted: 2,
        rebalance_evicted: 1,
        promoted: 3,
        list_truncated: true,
        ..Default::default()
    });
    stats.record(&ReconcileReport {
        skipped: true,
        ..Default::default()
    });

    assert_eq!(stats.buildings_reconciled, 1);
    assert_eq!(stats.buildings_skipped, 1);
    assert_eq!(stats.units_created, 4);
    assert_eq!(stats.workers_evicted, 3);
    assert_eq!(stats.promotions, 3);
    assert_eq!(stats.corrupt_lists, 1);
}

#[test]
fn test_schedule_due_on_interval() {
    let schedule = ReconcileSchedule { interval: 4 };
    assert!(schedule.is_due(0));
    assert!(!schedule.is_due(3));
    assert!(schedule.is_due(8));
    assert!(!ReconcileSchedule { interval: 0 }.is_due(8));
}
