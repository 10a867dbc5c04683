//! Apportioning a building's jobs across the four education tiers.

mod distributor;
mod tables;

pub use distributor::{distribute, workplace_distribution_of, UNIFORM_RATIOS};
pub use tables::{workplace_ratios, Service, SubService};
