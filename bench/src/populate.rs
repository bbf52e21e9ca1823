//! Data population: seeded synthetic datasets for both suites.
//!
//! The generator never touches a process-wide RNG; callers own the `StdRng`
//! so that a run is reproducible from its seed alone.

use crate::error::{BenchError, BenchResult};
use bench_core::constants::{INT_MEAN, INT_STDDEV, STRING_ALPHABET, STRING_LEN};
use bench_core::types::{AttrRecord, TabularRecord};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Validate a requested record count.
///
/// This is the only way generation can fail: a negative count.
pub fn checked_count(count: i64) -> BenchResult<usize> {
    usize::try_from(count)
        .map_err(|_| BenchError::invalid(format!("record count must be >= 0, got {count}")))
}

/// Rows for the export/import suite.
pub fn generate_tabular(count: usize, rng: &mut StdRng) -> Vec<TabularRecord> {
    let gauss = Normal::new(INT_MEAN, INT_STDDEV).expect("INT_STDDEV is positive and finite");

    (0..count)
        .map(|i| TabularRecord {
            id: i as u64,
            float: rng.gen::<f64>(),
            int: gauss.sample(rng) as i64,
            string: random_string(rng),
        })
        .collect()
}

/// Records for the lookup suite, shuffled so that insertion order does not
/// follow any attribute.
pub fn generate_attr(count: usize, rng: &mut StdRng) -> Vec<AttrRecord> {
    let mut data: Vec<AttrRecord> = (0..count as u64).map(AttrRecord::from_index).collect();
    data.shuffle(rng);
    data
}

/// `STRING_LEN` distinct characters drawn from `STRING_ALPHABET`.
fn random_string(rng: &mut StdRng) -> String {
    STRING_ALPHABET
        .choose_multiple(rng, STRING_LEN)
        .map(|&b| b as char)
        .collect()
}
