//! Run configuration, read from the environment (and an optional `.env`).

use crate::clock::ClockKind;
use crate::error::{BenchError, BenchResult};
use crate::populate::checked_count;
use bench_core::constants::{
    DEFAULT_LOOKUP_SIZE, DEFAULT_MAX_ROWS, DEFAULT_REPETITIONS, DEFAULT_SEED, DEFAULT_SIZE_POINTS,
};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_SEED: &str = "ROWBENCH_SEED";
pub const ENV_MAX_ROWS: &str = "ROWBENCH_MAX_ROWS";
pub const ENV_SIZE_POINTS: &str = "ROWBENCH_SIZE_POINTS";
pub const ENV_REPETITIONS: &str = "ROWBENCH_REPETITIONS";
pub const ENV_LOOKUP_SIZE: &str = "ROWBENCH_LOOKUP_SIZE";
pub const ENV_OUT_DIR: &str = "ROWBENCH_OUT_DIR";
pub const ENV_RESULTS_DIR: &str = "ROWBENCH_RESULTS_DIR";
pub const ENV_CLOCK: &str = "ROWBENCH_CLOCK";
pub const ENV_LOG_LEVEL: &str = "ROWBENCH_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "ROWBENCH_LOG_FILE";

#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub seed: u64,
    /// Largest row count of the export suite.
    pub max_rows: usize,
    pub size_points: usize,
    /// Back-to-back invocations per export/import measurement.
    pub repetitions: u32,
    /// Dataset length of the lookup suite.
    pub lookup_size: usize,
    /// Where codec artifacts are written; reused across iterations.
    pub out_dir: PathBuf,
    /// If set, result tables are dumped here as JSON.
    pub results_dir: Option<PathBuf>,
    pub clock: ClockKind,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            max_rows: DEFAULT_MAX_ROWS as usize,
            size_points: DEFAULT_SIZE_POINTS,
            repetitions: DEFAULT_REPETITIONS,
            lookup_size: DEFAULT_LOOKUP_SIZE as usize,
            out_dir: PathBuf::from("."),
            results_dir: None,
            clock: ClockKind::Process,
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl BenchConfig {
    /// Load `.env` if present, then read every `ROWBENCH_*` variable.
    pub fn from_env() -> BenchResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(BenchError::invalid(format!("unreadable .env file: {e}")));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; unset keys keep their
    /// defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> BenchResult<Self> {
        let mut config = Self::default();

        if let Some(seed) = parse(&get, ENV_SEED)? {
            config.seed = seed;
        }
        if let Some(rows) = parse(&get, ENV_MAX_ROWS)? {
            config.max_rows = checked_count(rows)?;
        }
        if let Some(points) = parse(&get, ENV_SIZE_POINTS)? {
            config.size_points = points;
        }
        if let Some(reps) = parse(&get, ENV_REPETITIONS)? {
            config.repetitions = reps;
        }
        if let Some(size) = parse(&get, ENV_LOOKUP_SIZE)? {
            config.lookup_size = checked_count(size)?;
        }
        if let Some(dir) = get(ENV_OUT_DIR) {
            config.out_dir = PathBuf::from(dir);
        }
        config.results_dir = get(ENV_RESULTS_DIR).map(PathBuf::from);
        if let Some(clock) = get(ENV_CLOCK) {
            config.clock = ClockKind::parse(&clock).ok_or_else(|| {
                BenchError::invalid(format!("{ENV_CLOCK}: unknown clock '{clock}'"))
            })?;
        }
        if let Some(level) = parse(&get, ENV_LOG_LEVEL)? {
            config.log_level = level;
        }
        config.log_file = get(ENV_LOG_FILE).map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.repetitions == 0 {
            return Err(BenchError::invalid(format!("{ENV_REPETITIONS} must be >= 1")));
        }
        if self.size_points < 2 {
            return Err(BenchError::invalid(format!("{ENV_SIZE_POINTS} must be >= 2")));
        }
        Ok(())
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> BenchResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| BenchError::invalid(format!("{key}='{raw}': {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = BenchConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, BenchConfig::default());
        assert_eq!(config.seed, 72481);
        assert_eq!(config.max_rows, 100_000);
        assert_eq!(config.repetitions, 10);
        assert_eq!(config.lookup_size, 2_000);
    }

    #[test]
    fn overrides_are_applied() {
        let config = BenchConfig::from_lookup(lookup(&[
            (ENV_SEED, "7"),
            (ENV_MAX_ROWS, "900"),
            (ENV_REPETITIONS, "3"),
            (ENV_CLOCK, "wall"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_RESULTS_DIR, "/tmp/results"),
        ]))
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_rows, 900);
        assert_eq!(config.repetitions, 3);
        assert_eq!(config.clock, ClockKind::Wall);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.results_dir, Some(PathBuf::from("/tmp/results")));
    }

    #[test]
    fn rejects_invalid_values() {
        for pairs in [
            [(ENV_MAX_ROWS, "-5")],
            [(ENV_REPETITIONS, "0")],
            [(ENV_SEED, "abc")],
            [(ENV_CLOCK, "sundial")],
            [(ENV_SIZE_POINTS, "1")],
        ] {
            let err = BenchConfig::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(
                matches!(err, BenchError::InvalidArgument(_)),
                "{pairs:?} gave {err}"
            );
        }
    }

    #[test]
    fn parse_error_names_the_variable() {
        let err = BenchConfig::from_lookup(lookup(&[(ENV_LOOKUP_SIZE, "lots")])).unwrap_err();
        assert!(err.to_string().contains(ENV_LOOKUP_SIZE));
    }
}
