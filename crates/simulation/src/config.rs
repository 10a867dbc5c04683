/// Citizens held by one citizen unit. Work, visit and student capacity is
/// always allocated in blocks of this size.
pub const UNIT_CAPACITY: usize = 5;

/// Size of the citizen-unit pool, slot 0 included.
pub const CITIZEN_UNIT_POOL_SIZE: u32 = 524_288;

/// Size of the citizen pool, slot 0 included.
pub const CITIZEN_POOL_SIZE: u32 = 1_048_576;

/// Maximum hops taken when walking one building's unit list. A walk that
/// reaches it is aborted: the list is cyclic or corrupted.
pub const MAX_UNIT_LIST_HOPS: u32 = CITIZEN_UNIT_POOL_SIZE;

/// Ticks between periodic reconciliations of every plopped building.
pub const RECONCILE_INTERVAL_TICKS: u64 = 256;

/// Promotion rolls are drawn from `[0, PROMOTION_ROLL_RANGE)`.
pub const PROMOTION_ROLL_RANGE: u32 = 100;

/// A biased roll strictly above this value promotes the worker.
pub const PROMOTION_THRESHOLD: i32 = 50;

/// Subtracted from the promotion roll once per education tier.
pub const PROMOTION_TIER_BIAS: i32 = 15;
