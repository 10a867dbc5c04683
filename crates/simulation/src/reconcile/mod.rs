//! Citizen-unit reconciliation for plopped buildings.
//!
//! A pass walks a building's unit list, trims units beyond its RICO targets,
//! creates one batch of units for any shortfall and then rebalances the
//! workforce across education tiers against the building's job counts.

mod engine;
mod plugin;
mod promote;
mod scan;
mod systems;
mod trim;
mod types;

#[cfg(test)]
mod tests;

pub use engine::reconcile;
pub use plugin::ReconcilePlugin;
pub use promote::{promote_workers, promotion_roll};
pub use systems::{demolish_plopped_buildings, reconcile_plopped_buildings};
pub use trim::{remove_household, remove_worker_building};
pub use types::{
    ApplyRicoSettings, Collaborators, DemolishPlopped, PromotionOutcome, ReconcilePhase,
    ReconcileReport, ReconcileSchedule, ReconcileStats, ReconcileTargets, TrimOutcome,
};
