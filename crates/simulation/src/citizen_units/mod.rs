//! Citizen-unit and citizen pools.
//!
//! Each building owns a singly linked list of citizen units rooted at its
//! `citizen_units` field. Units live in a fixed-capacity pool shared by
//! every building and are addressed by index; slot 0 is reserved as the
//! end-of-list sentinel.

mod list;
mod pool;
mod types;


pub use list::{
    append_chain, count_units, release_chain, unlink_and_release, walk_units, UnitCursor,
    UnitWalk,
};
pub use pool::{CitizenManager, PoolAccess};
pub use types::{
    blocks, Citizen, CitizenId, CitizenUnit, UnitFlags, UnitId, UnitRequest, Wealth,
};
