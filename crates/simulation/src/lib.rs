use bevy::prelude::*;

pub mod buildings;
pub mod citizen_units;
pub mod config;
pub mod education;
pub mod pool_hash;
pub mod reconcile;
pub mod rico;
pub mod sim_rng;
pub mod simulation_sets;
pub mod transfer_offers;
pub mod workplace_distribution;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use simulation_sets::SimulationSet;

// ---------------------------------------------------------------------------
// Core resources
// ---------------------------------------------------------------------------

/// Global tick counter incremented each FixedUpdate, used for throttling simulation systems.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::PreSim,
                SimulationSet::Simulation,
                SimulationSet::PostSim,
            )
                .chain(),
        )
        .init_resource::<TickCounter>()
        .add_systems(FixedUpdate, advance_tick.in_set(SimulationSet::PreSim));

        app.add_plugins((sim_rng::SimRngPlugin, reconcile::ReconcilePlugin));
    }
}

pub fn advance_tick(mut tick: ResMut<TickCounter>) {
    tick.0 = tick.0.wrapping_add(1);
}
