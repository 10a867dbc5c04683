use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::citizen_units::{UnitId, Wealth};
use crate::rico::RicoSettings;

/// Lifecycle flags that take a building out of reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingFlags(u8);

impl BuildingFlags {
    pub const NONE: BuildingFlags = BuildingFlags(0);
    pub const ABANDONED: BuildingFlags = BuildingFlags(1);
    pub const BURNED_DOWN: BuildingFlags = BuildingFlags(1 << 1);

    pub fn contains(self, other: BuildingFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: BuildingFlags) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: BuildingFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: BuildingFlags) {
        self.0 &= !other.0;
    }
}

/// A building placed directly by the player whose household and job counts
/// come from its RICO settings rather than from procedural growth.
#[derive(Component, Debug, Clone)]
pub struct PloppedBuilding {
    /// Key into `RicoRegistry`.
    pub name: String,
    pub level: u8,
    pub flags: BuildingFlags,
    /// Head of this building's citizen-unit list.
    pub citizen_units: Option<UnitId>,
    pub width: u8,
    pub length: u8,
    pub crime_buffer: u16,
    pub garbage_buffer: u16,
    /// Still takes part in procedural level-ups.
    pub growable: bool,
    /// Level the unit list was last reconciled at. A mismatch with `level`
    /// queues the building for reconciliation on the next tick.
    pub reconciled_level: Option<u8>,
}

impl PloppedBuilding {
    pub fn new(name: impl Into<String>, level: u8, width: u8, length: u8) -> Self {
        Self {
            name: name.into(),
            level,
            flags: BuildingFlags::NONE,
            citizen_units: None,
            width,
            length,
            crime_buffer: 0,
            garbage_buffer: 0,
            growable: false,
            reconciled_level: None,
        }
    }

    pub fn from_settings(settings: &RicoSettings) -> Self {
        Self {
            growable: settings.growable,
            ..Self::new(
                settings.name.clone(),
                settings.level,
                settings.width,
                settings.length,
            )
        }
    }

    /// Moves a growable building to `level`. Ploppable-only buildings keep
    /// the level they were placed at.
    pub fn set_level(&mut self, level: u8) -> bool {
        if !self.growable || level == 0 {
            return false;
        }
        self.level = level;
        true
    }

    /// Abandoned and burned-down buildings are left alone.
    pub fn can_reconcile(&self) -> bool {
        !self
            .flags
            .intersects(BuildingFlags::ABANDONED | BuildingFlags::BURNED_DOWN)
    }

    pub fn wealth(&self) -> Wealth {
        wealth_for_level(self.level)
    }

    pub fn needs_level_reconcile(&self) -> bool {
        self.reconciled_level != Some(self.level)
    }
}

impl std::ops::BitOr for BuildingFlags {
    type Output = BuildingFlags;

    fn bitor(self, rhs: BuildingFlags) -> BuildingFlags {
        BuildingFlags(self.0 | rhs.0)
    }
}

/// Wealth tag for the households of a building at `level`.
pub fn wealth_for_level(level: u8) -> Wealth {
    match level {
        0..=2 => Wealth::Low,
        3..=4 => Wealth::Medium,
        _ => Wealth::High,
    }
}
