use bevy::prelude::*;

use crate::config::{CITIZEN_POOL_SIZE, CITIZEN_UNIT_POOL_SIZE};

use super::types::{Citizen, CitizenId, CitizenUnit, UnitFlags, UnitId, UnitRequest};

// ---------------------------------------------------------------------------
// Pool access trait
// ---------------------------------------------------------------------------

/// The reconciliation engine's view of the shared citizen-unit and citizen
/// pools. The engine never allocates records itself: it reads and writes
/// fields of records it holds ids for, batch-creates units, and releases
/// units it has unlinked.
pub trait PoolAccess {
    fn unit(&self, id: UnitId) -> Option<&CitizenUnit>;
    fn unit_mut(&mut self, id: UnitId) -> Option<&mut CitizenUnit>;
    fn citizen(&self, id: CitizenId) -> Option<&Citizen>;
    fn citizen_mut(&mut self, id: CitizenId) -> Option<&mut Citizen>;

    /// Creates every unit in `request` for `building`, chained in
    /// `UnitRequest::roles` order, and returns the head of the new chain.
    ///
    /// Allocation is all-or-nothing: `None` means the pool could not hold
    /// the whole batch (or the batch was empty) and nothing was allocated.
    fn create_units(&mut self, building: Entity, request: UnitRequest) -> Option<UnitId>;

    /// Returns a unit's slot to the pool. Releasing a free slot is a no-op.
    /// The caller unlinks the unit from its list first.
    fn release_unit(&mut self, id: UnitId);
}

// ---------------------------------------------------------------------------
// Fixed-capacity arena
// ---------------------------------------------------------------------------

/// Slot arena with a free list. Slot 0 is reserved and never live; slots are
/// materialised lazily up to `capacity`.
#[derive(Debug)]
struct Arena<T> {
    slots: Vec<T>,
    live: Vec<bool>,
    free: Vec<u32>,
    capacity: u32,
}

impl<T: Default> Arena<T> {
    fn new(capacity: u32) -> Self {
        Self {
            slots: vec![T::default()],
            live: vec![false],
            free: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    fn available(&self) -> usize {
        self.free.len() + (self.capacity as usize - self.slots.len())
    }

    fn in_use(&self) -> usize {
        self.slots.len() - 1 - self.free.len()
    }

    fn alloc(&mut self) -> Option<u32> {
        if let Some(index) = self.free.pop() {
            self.live[index as usize] = true;
            return Some(index);
        }
        if self.slots.len() >= self.capacity as usize {
            return None;
        }
        let index = self.slots.len() as u32;
        self.slots.push(T::default());
        self.live.push(true);
        Some(index)
    }

    fn release(&mut self, index: u32) -> bool {
        let i = index as usize;
        if i == 0 || !self.live.get(i).copied().unwrap_or(false) {
            return false;
        }
        self.slots[i] = T::default();
        self.live[i] = false;
        self.free.push(index);
        true
    }

    fn get(&self, index: u32) -> Option<&T> {
        let i = index as usize;
        if self.live.get(i).copied().unwrap_or(false) {
            self.slots.get(i)
        } else {
            None
        }
    }

    fn get_mut(&mut self, index: u32) -> Option<&mut T> {
        let i = index as usize;
        if self.live.get(i).copied().unwrap_or(false) {
            self.slots.get_mut(i)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// CitizenManager resource
// ---------------------------------------------------------------------------

/// Process-wide owner of the citizen-unit and citizen pools.
///
/// Systems reach it through `ResMut<CitizenManager>`, which gives the
/// exclusive access a reconciliation pass assumes.
#[derive(Resource, Debug)]
pub struct CitizenManager {
    units: Arena<CitizenUnit>,
    citizens: Arena<Citizen>,
}

impl Default for CitizenManager {
    fn default() -> Self {
        Self::with_capacity(CITIZEN_UNIT_POOL_SIZE, CITIZEN_POOL_SIZE)
    }
}

impl CitizenManager {
    /// Pools holding at most `units - 1` units and `citizens - 1` citizens
    /// (slot 0 of each is reserved).
    pub fn with_capacity(units: u32, citizens: u32) -> Self {
        Self {
            units: Arena::new(units),
            citizens: Arena::new(citizens),
        }
    }

    pub fn units_in_use(&self) -> usize {
        self.units.in_use()
    }

    pub fn units_available(&self) -> usize {
        self.units.available()
    }

    pub fn citizens_in_use(&self) -> usize {
        self.citizens.in_use()
    }

    pub fn spawn_citizen(&mut self, citizen: Citizen) -> Option<CitizenId> {
        let id = CitizenId::new(self.citizens.alloc()?)?;
        if let Some(slot) = self.citizens.get_mut(id.raw()) {
            *slot = citizen;
        }
        Some(id)
    }

    pub fn despawn_citizen(&mut self, id: CitizenId) -> bool {
        self.citizens.release(id.raw())
    }

    /// Seats `citizen` in `unit`'s first free slot and points the citizen's
    /// back-references for the unit's roles at the unit's building.
    /// Returns the slot used, or `None` when the unit is full or missing.
    pub fn place_citizen(&mut self, unit: UnitId, citizen: CitizenId) -> Option<usize> {
        let record = self.units.get_mut(unit.raw())?;
        let slot = record.free_slot()?;
        let (flags, building) = (record.flags, record.building);
        let person = self.citizens.get_mut(citizen.raw())?;
        if flags.contains(UnitFlags::HOME) {
            person.home_building = building;
        }
        if flags.contains(UnitFlags::WORK) {
            person.work_building = building;
        }
        if let Some(record) = self.units.get_mut(unit.raw()) {
            record.citizens[slot] = Some(citizen);
        }
        Some(slot)
    }
}

impl PoolAccess for CitizenManager {
    fn unit(&self, id: UnitId) -> Option<&CitizenUnit> {
        self.units.get(id.raw())
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut CitizenUnit> {
        self.units.get_mut(id.raw())
    }

    fn citizen(&self, id: CitizenId) -> Option<&Citizen> {
        self.citizens.get(id.raw())
    }

    fn citizen_mut(&mut self, id: CitizenId) -> Option<&mut Citizen> {
        self.citizens.get_mut(id.raw())
    }

    fn create_units(&mut self, building: Entity, request: UnitRequest) -> Option<UnitId> {
        let needed = request.unit_count() as usize;
        if needed == 0 || self.units.available() < needed {
            return None;
        }

        let mut first: Option<UnitId> = None;
        let mut previous: Option<UnitId> = None;
        for flags in request.roles() {
            let id = UnitId::new(self.units.alloc()?)?;
            if let Some(unit) = self.units.get_mut(id.raw()) {
                unit.flags = flags;
                unit.building = Some(building);
                if flags.contains(UnitFlags::HOME) {
                    unit.wealth = request.wealth;
                }
            }
            match previous {
                Some(prev) => {
                    if let Some(unit) = self.units.get_mut(prev.raw()) {
                        unit.next = Some(id);
                    }
                }
                None => first = Some(id),
            }
            previous = Some(id);
        }
        first
    }

    fn release_unit(&mut self, id: UnitId) {
        self.units.release(id.raw());
    }
}
