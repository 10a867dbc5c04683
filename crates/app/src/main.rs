//! Headless driver: plops every ploppable building from a RICO settings
//! file, moves citizens in and runs the simulation for a number of fixed
//! ticks, then prints the reconciliation totals as JSON.
//!
//! Usage: `ploppable [settings.json] [ticks]`. A lone numeric argument is
//! read as the tick count.

mod demo;

use bevy::log::LogPlugin;
use bevy::prelude::*;

use simulation::buildings::PloppedBuilding;
use simulation::citizen_units::{walk_units, CitizenManager};
use simulation::config::{MAX_UNIT_LIST_HOPS, RECONCILE_INTERVAL_TICKS};
use simulation::reconcile::ReconcileStats;
use simulation::rico::RicoRegistry;
use simulation::transfer_offers::{TransferOfferBoard, TransferReason};

const DEFAULT_TICKS: u64 = RECONCILE_INTERVAL_TICKS * 4;

fn load_registry(path: Option<&str>) -> RicoRegistry {
    let mut registry = RicoRegistry::default();
    if let Some(path) = path {
        match std::fs::read_to_string(path) {
            Ok(json) => match registry.load_json(&json) {
                Ok(count) => {
                    info!("Loaded {} RICO settings from {}", count, path);
                    return registry;
                }
                Err(err) => warn!("Invalid RICO settings in {}: {}", path, err),
            },
            Err(err) => warn!("Could not read {}: {}", path, err),
        }
        warn!("Falling back to the built-in demo settings");
    }
    match registry.load_json(demo::DEMO_RICO) {
        Ok(count) => info!("Loaded {} built-in RICO settings", count),
        Err(err) => error!("Built-in RICO settings are invalid: {}", err),
    }
    registry
}

/// Settings path and tick count from the command line.
#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    settings: Option<String>,
    ticks: u64,
}

fn parse_args(args: &[String]) -> RunArgs {
    let parse_ticks = |arg: &String| arg.parse::<u64>().ok();
    match args {
        [] => RunArgs {
            settings: None,
            ticks: DEFAULT_TICKS,
        },
        [only] => match parse_ticks(only) {
            Some(ticks) => RunArgs {
                settings: None,
                ticks,
            },
            None => RunArgs {
                settings: Some(only.clone()),
                ticks: DEFAULT_TICKS,
            },
        },
        [path, ticks, ..] => {
            let parsed = parse_ticks(ticks);
            if parsed.is_none() {
                warn!("Ignoring tick count '{}', running {} ticks", ticks, DEFAULT_TICKS);
            }
            RunArgs {
                settings: Some(path.clone()),
                ticks: parsed.unwrap_or(DEFAULT_TICKS),
            }
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let RunArgs { settings, ticks } = parse_args(&args);

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()))
        .add_plugins(simulation::SimulationPlugin);
    app.update();

    let registry = load_registry(settings.as_deref());
    let plopped: Vec<PloppedBuilding> = registry
        .sorted()
        .into_iter()
        .filter(|settings| settings.ploppable)
        .map(PloppedBuilding::from_settings)
        .collect();
    app.insert_resource(registry);

    let world = app.world_mut();
    for building in plopped {
        let entity = world.spawn(building).id();
        debug!("Plopped {:?}", entity);
    }

    // First tick gives every building its units; then people move in.
    world.run_schedule(FixedUpdate);
    let seated = demo::move_in_citizens(world);
    info!("{} citizens moved in", seated);

    for _ in 1..ticks {
        world.run_schedule(FixedUpdate);
    }

    let mut buildings = world.query::<(Entity, &PloppedBuilding)>();
    let world: &World = world;
    let offers = world.resource::<TransferOfferBoard>();
    let pool = world.resource::<CitizenManager>();
    for (entity, building) in buildings.iter(world) {
        let vacancies: Vec<i32> = TransferReason::WORKERS
            .into_iter()
            .map(|reason| {
                offers
                    .incoming(reason)
                    .iter()
                    .filter(|o| o.building == entity)
                    .map(|o| o.amount)
                    .sum()
            })
            .collect();
        let units = walk_units(pool, building.citizen_units, MAX_UNIT_LIST_HOPS)
            .units
            .len();
        info!(
            "{} (level {}): {} units, vacancies per tier {:?}",
            building.name, building.level, units, vacancies
        );
    }

    let stats = world.resource::<ReconcileStats>();
    match serde_json::to_string_pretty(stats) {
        Ok(json) => println!("{json}"),
        Err(err) => error!("Could not serialise reconcile stats: {}", err),
    }
}
