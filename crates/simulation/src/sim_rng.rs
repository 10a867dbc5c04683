//! Deterministic simulation RNG resource.
//!
//! Wraps `ChaCha8Rng` for cross-platform deterministic randomness.
//! Simulation code never draws from `rand::thread_rng()`: everything that
//! rolls dice takes a `&mut dyn Randomizer`, which `SimRng` implements, so
//! identical seeds produce identical simulation output.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
const DEFAULT_SEED: u64 = 42;

// ---------------------------------------------------------------------------
// Randomizer
// ---------------------------------------------------------------------------

/// Source of uniformly distributed integers for simulation decisions.
pub trait Randomizer {
    /// Returns an integer in `[0, range)`. A `range` of 0 always yields 0.
    fn int32(&mut self, range: u32) -> u32;
}

impl Randomizer for ChaCha8Rng {
    fn int32(&mut self, range: u32) -> u32 {
        if range == 0 {
            return 0;
        }
        self.gen_range(0..range)
    }
}

/// Replays a fixed sequence of rolls, wrapping around when exhausted.
///
/// Each roll is reduced modulo the requested range, so a script of values
/// below the range is returned verbatim.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    rolls: Vec<u32>,
    cursor: usize,
}

impl ScriptedRolls {
    pub fn new(rolls: impl Into<Vec<u32>>) -> Self {
        Self {
            rolls: rolls.into(),
            cursor: 0,
        }
    }

    /// Number of rolls handed out so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl Randomizer for ScriptedRolls {
    fn int32(&mut self, range: u32) -> u32 {
        if self.rolls.is_empty() || range == 0 {
            self.cursor += 1;
            return 0;
        }
        let roll = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        roll % range
    }
}

// ---------------------------------------------------------------------------
// SimRng resource
// ---------------------------------------------------------------------------

/// Deterministic RNG resource for all simulation randomness.
#[derive(Resource)]
pub struct SimRng(pub ChaCha8Rng);

impl Default for SimRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl SimRng {
    /// Create a new `SimRng` seeded from the given `u64` value.
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Randomizer for SimRng {
    fn int32(&mut self, range: u32) -> u32 {
        self.0.int32(range)
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct SimRngPlugin;

impl Plugin for SimRngPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimRng>();
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
