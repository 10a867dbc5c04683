use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::education::EducationLevel;
use crate::reconcile::ReconcileTargets;
use crate::workplace_distribution::{Service, SubService};

fn default_level() -> u8 {
    1
}

fn default_footprint() -> u8 {
    4
}

fn default_true() -> bool {
    true
}

/// RICO settings for one building asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RicoSettings {
    pub name: String,
    pub service: Service,
    #[serde(default)]
    pub sub_service: SubService,
    #[serde(default = "default_level")]
    pub level: u8,
    /// Households.
    #[serde(default)]
    pub homes: u32,
    /// Total jobs, split across tiers with the workplace tables unless
    /// `workplaces` is given.
    #[serde(default)]
    pub workers: u32,
    /// Explicit jobs per education tier, lowest first.
    #[serde(default)]
    pub workplaces: Option<[i32; EducationLevel::COUNT]>,
    #[serde(default)]
    pub visitors: u32,
    #[serde(default)]
    pub students: u32,
    #[serde(default = "default_true")]
    pub ploppable: bool,
    #[serde(default)]
    pub growable: bool,
    #[serde(default = "default_footprint")]
    pub width: u8,
    #[serde(default = "default_footprint")]
    pub length: u8,
}

impl RicoSettings {
    pub fn new(name: impl Into<String>, service: Service, sub_service: SubService) -> Self {
        Self {
            name: name.into(),
            service,
            sub_service,
            level: default_level(),
            homes: 0,
            workers: 0,
            workplaces: None,
            visitors: 0,
            students: 0,
            ploppable: true,
            growable: false,
            width: default_footprint(),
            length: default_footprint(),
        }
    }

    /// Total jobs: the explicit per-tier breakdown when present, otherwise
    /// `workers`. Saturates at `u32::MAX`.
    pub fn total_workers(&self) -> u32 {
        match self.workplaces {
            Some(tiers) => tiers
                .iter()
                .map(|&v| v.max(0) as u32)
                .fold(0u32, u32::saturating_add),
            None => self.workers,
        }
    }

    /// Occupancy targets handed to the reconciliation engine.
    pub fn targets(&self) -> ReconcileTargets {
        let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        ReconcileTargets {
            home: clamp(self.homes),
            work: clamp(self.total_workers()),
            visit: clamp(self.visitors),
            student: clamp(self.students),
        }
    }
}

/// RICO settings for every known building asset, keyed by name.
#[derive(Resource, Debug, Default, Clone)]
pub struct RicoRegistry {
    settings: HashMap<String, RicoSettings>,
}

impl RicoRegistry {
    pub fn from_settings(settings: impl IntoIterator<Item = RicoSettings>) -> Self {
        let mut registry = Self::default();
        for entry in settings {
            registry.insert(entry);
        }
        registry
    }

    /// Parses a JSON array of settings and adds every entry, replacing
    /// entries with the same name. Returns the number of entries read.
    pub fn load_json(&mut self, json: &str) -> Result<usize, serde_json::Error> {
        let entries: Vec<RicoSettings> = serde_json::from_str(json)?;
        let count = entries.len();
        for entry in entries {
            self.insert(entry);
        }
        Ok(count)
    }

    pub fn insert(&mut self, settings: RicoSettings) -> Option<RicoSettings> {
        self.settings.insert(settings.name.clone(), settings)
    }

    pub fn get(&self, name: &str) -> Option<&RicoSettings> {
        self.settings.get(name)
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Settings sorted by name, for deterministic iteration.
    pub fn sorted(&self) -> Vec<&RicoSettings> {
        let mut entries: Vec<&RicoSettings> = self.settings.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}
