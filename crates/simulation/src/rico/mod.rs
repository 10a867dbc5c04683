//! RICO (Residential / Industrial / Commercial / Office) settings: the
//! per-building household and job counts that override procedural growth.

mod settings;
mod workplaces;

pub use settings::{RicoRegistry, RicoSettings};
pub use workplaces::{CachedWorkplaceCount, RicoWorkplaceCount, WorkplaceCache, WorkplaceCounter};
