//! # TestTown: headless integration test harness
//!
//! Provides a fluent builder that wraps `bevy::app::App` + `SimulationPlugin`
//! for running integration tests without a window or renderer.

mod assertions;
mod queries;
mod setup;

use bevy::app::App;
use bevy::prelude::*;

use crate::SimulationPlugin;

/// A headless Bevy App wrapping `SimulationPlugin` for integration testing.
///
/// Use builder methods to register RICO settings and plop buildings, then
/// call `tick()` to advance the simulation and query/assert on the resulting
/// ECS state.
pub struct TestTown {
    app: App,
}

impl TestTown {
    /// Create an empty town: no RICO settings, no buildings, default pools.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin);

        // Run one update so Startup systems execute.
        app.update();

        Self { app }
    }
}

impl Default for TestTown {
    fn default() -> Self {
        Self::new()
    }
}
