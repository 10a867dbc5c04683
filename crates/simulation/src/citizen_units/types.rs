use std::num::NonZeroU32;
use std::ops::BitOr;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::UNIT_CAPACITY;
use crate::education::EducationLevel;

// ---------------------------------------------------------------------------
// Pool indices
// ---------------------------------------------------------------------------

/// Index of a citizen unit in the unit pool.
///
/// Pool slot 0 is the reserved "empty / end of list" sentinel and is never
/// handed out, so it cannot be represented: `Option<UnitId>` stands in for
/// a nullable index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(NonZeroU32);

impl UnitId {
    /// Wraps a raw pool index. Index 0 yields `None`.
    pub fn new(index: u32) -> Option<Self> {
        NonZeroU32::new(index).map(Self)
    }

    pub fn raw(self) -> u32 {
        self.0.get()
    }

    pub fn index(self) -> usize {
        self.0.get() as usize
    }
}

/// Index of a citizen in the citizen pool. Slot 0 is reserved, as for units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CitizenId(NonZeroU32);

impl CitizenId {
    pub fn new(index: u32) -> Option<Self> {
        NonZeroU32::new(index).map(Self)
    }

    pub fn raw(self) -> u32 {
        self.0.get()
    }

    pub fn index(self) -> usize {
        self.0.get() as usize
    }
}

// ---------------------------------------------------------------------------
// Unit roles
// ---------------------------------------------------------------------------

/// Role bitset of a citizen unit. A unit may carry several roles at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitFlags(u8);

impl UnitFlags {
    pub const NONE: UnitFlags = UnitFlags(0);
    pub const HOME: UnitFlags = UnitFlags(1);
    pub const WORK: UnitFlags = UnitFlags(1 << 1);
    pub const VISIT: UnitFlags = UnitFlags(1 << 2);
    pub const STUDENT: UnitFlags = UnitFlags(1 << 3);

    pub fn bits(self) -> u8 {
        self.0
    }

    /// True when every role in `other` is set on `self`.
    pub fn contains(self, other: UnitFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: UnitFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: UnitFlags) {
        self.0 &= !other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for UnitFlags {
    type Output = UnitFlags;

    fn bitor(self, rhs: UnitFlags) -> UnitFlags {
        UnitFlags(self.0 | rhs.0)
    }
}

/// Wealth tag carried by home units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wealth {
    #[default]
    Low,
    Medium,
    High,
}

// ---------------------------------------------------------------------------
// Pool records
// ---------------------------------------------------------------------------

/// One node of a building's unit list: up to five citizens assigned to the
/// building in the unit's roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitizenUnit {
    pub flags: UnitFlags,
    pub citizens: [Option<CitizenId>; UNIT_CAPACITY],
    pub next: Option<UnitId>,
    pub building: Option<Entity>,
    pub wealth: Wealth,
}

impl CitizenUnit {
    /// Occupied slots as `(slot, citizen)` pairs.
    pub fn occupants(&self) -> impl Iterator<Item = (usize, CitizenId)> + '_ {
        self.citizens
            .iter()
            .enumerate()
            .filter_map(|(slot, c)| c.map(|id| (slot, id)))
    }

    pub fn occupant_count(&self) -> usize {
        self.citizens.iter().flatten().count()
    }

    pub fn free_slot(&self) -> Option<usize> {
        self.citizens.iter().position(Option::is_none)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Citizen {
    pub education: EducationLevel,
    pub home_building: Option<Entity>,
    pub work_building: Option<Entity>,
}

impl Citizen {
    pub fn with_education(education: EducationLevel) -> Self {
        Self {
            education,
            ..Default::default()
        }
    }

    /// Clears the back-reference matching `role`. Visitors and students
    /// carry no back-reference.
    pub fn detach(&mut self, role: UnitFlags) {
        if role.contains(UnitFlags::HOME) {
            self.home_building = None;
        }
        if role.contains(UnitFlags::WORK) {
            self.work_building = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Allocation requests
// ---------------------------------------------------------------------------

/// Units needed to seat `count` citizens in blocks of `UNIT_CAPACITY`.
pub fn blocks(count: u32) -> u32 {
    count.div_ceil(UNIT_CAPACITY as u32)
}

/// A batch of units to create for one building in a single pool call.
///
/// `homes` counts households (one unit each); the other roles count
/// citizens and are rounded up to whole units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitRequest {
    pub homes: u32,
    pub workers: u32,
    pub visitors: u32,
    pub students: u32,
    /// Wealth tag for the new home units.
    pub wealth: Wealth,
}

impl UnitRequest {
    pub fn unit_count(&self) -> u32 {
        self.homes + blocks(self.workers) + blocks(self.visitors) + blocks(self.students)
    }

    pub fn is_empty(&self) -> bool {
        self.unit_count() == 0
    }

    /// Roles of the units to create, in list order: homes, work, visit,
    /// student. Every unit carries exactly one role.
    pub fn roles(&self) -> impl Iterator<Item = UnitFlags> {
        let repeat = |flags: UnitFlags, n: u32| std::iter::repeat_n(flags, n as usize);
        repeat(UnitFlags::HOME, self.homes)
            .chain(repeat(UnitFlags::WORK, blocks(self.workers)))
            .chain(repeat(UnitFlags::VISIT, blocks(self.visitors)))
            .chain(repeat(UnitFlags::STUDENT, blocks(self.students)))
    }
}
