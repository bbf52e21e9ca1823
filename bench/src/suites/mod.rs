//! The two benchmark suites: file encodings and attribute filtering.

pub mod export;
pub mod lookup;

use crate::error::{BenchError, BenchResult};

/// Reject size points the dataset cannot provide.
fn check_sizes(sizes: &[usize], available: usize) -> BenchResult<()> {
    match sizes.iter().copied().max() {
        Some(max) if max > available => Err(BenchError::invalid(format!(
            "size point {max} exceeds dataset length {available}"
        ))),
        _ => Ok(()),
    }
}
