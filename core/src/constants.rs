//! Constants module - defaults shared by the generator, the suites and the config layer

// =============================================================================
// Data generation
// =============================================================================

/// Seed used when `ROWBENCH_SEED` is not set.
pub const DEFAULT_SEED: u64 = 72481;

/// Characters a generated `TabularRecord::string` is drawn from.
pub const STRING_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
/// Length of a generated string; characters never repeat within one value.
pub const STRING_LEN: usize = 7;

/// Distribution of `TabularRecord::int`.
pub const INT_MEAN: f64 = 10_000.0;
pub const INT_STDDEV: f64 = 100.0;

// =============================================================================
// Export suite
// =============================================================================

pub const DEFAULT_MAX_ROWS: i64 = 100_000;
/// Number of linspace points between 0 and the maximum; the 0 point is dropped.
pub const DEFAULT_SIZE_POINTS: usize = 10;
pub const DEFAULT_REPETITIONS: u32 = 10;

/// Prefix of the artifact each codec writes (`out.<name>`).
pub const ARTIFACT_PREFIX: &str = "out";

// =============================================================================
// Lookup suite
// =============================================================================

pub const DEFAULT_LOOKUP_SIZE: i64 = 2_000;

/// Records with `prop2` strictly below this bound are selected.
pub const PROP2_BOUND: i64 = 200 * 200;

// Phase names as they appear in result rows.
pub const PHASE_CREATION: &str = "creation";
pub const PHASE_READ: &str = "read";
pub const PHASE_FILTER: &str = "filter";
pub const PHASE_CONSTRUCTION_FILTER: &str = "construction+filter";
