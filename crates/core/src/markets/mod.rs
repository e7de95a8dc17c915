pub mod directory;
pub mod stats;

/// Index-family prefix of the statistics namespace; only directory entries
/// under it are navigable.
pub const DEFAULT_STATS_INDEX_PREFIX: &str = "stats_stocks_eod";
