use std::collections::HashMap;

use bevy::prelude::*;

use crate::education::WorkforceDemand;
use crate::sim_rng::Randomizer;
use crate::workplace_distribution::{workplace_distribution_of, workplace_ratios};

use super::RicoSettings;

/// Per-tier job counts a building offers at a given level and footprint.
pub trait WorkplaceCounter {
    fn calculate_workplace_count(
        &mut self,
        level: u8,
        rng: &mut dyn Randomizer,
        width: u8,
        length: u8,
    ) -> WorkforceDemand;
}

/// Job counts from a building's RICO settings: the explicit per-tier
/// breakdown when set, otherwise the total split by the workplace table for
/// the building's class at the requested level.
pub struct RicoWorkplaceCount<'a> {
    settings: &'a RicoSettings,
}

impl<'a> RicoWorkplaceCount<'a> {
    pub fn new(settings: &'a RicoSettings) -> Self {
        Self { settings }
    }
}

impl WorkplaceCounter for RicoWorkplaceCount<'_> {
    fn calculate_workplace_count(
        &mut self,
        level: u8,
        _rng: &mut dyn Randomizer,
        _width: u8,
        _length: u8,
    ) -> WorkforceDemand {
        if let Some(tiers) = self.settings.workplaces {
            return WorkforceDemand(tiers.map(|v| v.max(0)));
        }
        let total = i32::try_from(self.settings.workers).unwrap_or(i32::MAX);
        match workplace_ratios(self.settings.service, self.settings.sub_service, level) {
            Some(ratios) => workplace_distribution_of(total, &ratios),
            None => workplace_distribution_of(total, &[]),
        }
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Memoised job counts keyed by (building name, level).
#[derive(Resource, Debug, Default)]
pub struct WorkplaceCache {
    entries: HashMap<(String, u8), WorkforceDemand>,
}

impl WorkplaceCache {
    pub fn get(&self, name: &str, level: u8) -> Option<WorkforceDemand> {
        self.entries.get(&(name.to_string(), level)).copied()
    }

    pub fn insert(&mut self, name: &str, level: u8, demand: WorkforceDemand) {
        self.entries.insert((name.to_string(), level), demand);
    }

    /// Drops every level cached for `name`.
    pub fn invalidate(&mut self, name: &str) {
        self.entries.retain(|(cached, _), _| cached != name);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Wraps another counter and serves repeat queries for the same building
/// and level from a `WorkplaceCache`.
pub struct CachedWorkplaceCount<'a, C> {
    cache: &'a mut WorkplaceCache,
    name: &'a str,
    inner: C,
}

impl<'a, C: WorkplaceCounter> CachedWorkplaceCount<'a, C> {
    pub fn new(cache: &'a mut WorkplaceCache, name: &'a str, inner: C) -> Self {
        Self { cache, name, inner }
    }
}

impl<C: WorkplaceCounter> WorkplaceCounter for CachedWorkplaceCount<'_, C> {
    fn calculate_workplace_count(
        &mut self,
        level: u8,
        rng: &mut dyn Randomizer,
        width: u8,
        length: u8,
    ) -> WorkforceDemand {
        if let Some(demand) = self.cache.get(self.name, level) {
            return demand;
        }
        let demand = self
            .inner
            .calculate_workplace_count(level, rng, width, length);
        self.cache.insert(self.name, level, demand);
        demand
    }
}
