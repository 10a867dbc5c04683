//! Deterministic simulation ordering via `SystemSet` phases.
//!
//! ```text
//! PreSim  →  Simulation  →  PostSim
//! ```
//!
//! * **PreSim** – Tick counter and other per-tick setup the simulation reads.
//! * **Simulation** – Demolition of plopped buildings, then reconciliation
//!   of the survivors' citizen units.
//! * **PostSim** – Read-only aggregation and reporting.
//!
//! Every system in `FixedUpdate` belongs to one of these sets.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Configured as a chain: `PreSim` → `Simulation` → `PostSim`.
/// Plugins use `.in_set(SimulationSet::X)` when registering their systems
/// and add `.after()` / `.before()` constraints within a phase as needed.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    PreSim,
    Simulation,
    PostSim,
}
