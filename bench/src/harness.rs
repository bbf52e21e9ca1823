//! Measurement core: the timed repetition loop and the size/operation sweep.

use crate::aggregate::{Aggregator, Measurement, ResultRow};
use crate::clock::Clock;
use crate::error::{BenchError, BenchResult};
use crate::registry::{OperationDescriptor, Registry};
use anyhow::Context;
use std::hint::black_box;
use std::path::Path;
use std::time::Duration;

/// Run `action(input)` `repetitions` times back to back and return the
/// total elapsed time on `clock`.
///
/// The first failing invocation aborts the loop and its error is returned
/// unchanged.
pub fn measure<I, T, F>(
    clock: &dyn Clock,
    mut action: F,
    input: &I,
    repetitions: u32,
) -> BenchResult<Duration>
where
    I: ?Sized,
    F: FnMut(&I) -> anyhow::Result<T>,
{
    if repetitions == 0 {
        return Err(BenchError::invalid("repetitions must be >= 1"));
    }

    let start = clock.now();
    for _ in 0..repetitions {
        black_box(action(black_box(input))?);
    }
    Ok(clock.now().saturating_sub(start))
}

/// Drive `step` over every (size, operation) pair, size-major and
/// operation-minor, appending one row per pair.
///
/// `sizes` must be strictly ascending. The first error stops the sweep;
/// rows recorded before it stay in `aggregator`.
pub fn sweep<A, F>(
    sizes: &[usize],
    registry: &Registry<A>,
    aggregator: &mut Aggregator,
    mut step: F,
) -> BenchResult<()>
where
    A: ?Sized,
    F: FnMut(usize, &OperationDescriptor<A>) -> BenchResult<Measurement>,
{
    if let Some(pair) = sizes.windows(2).find(|w| w[0] >= w[1]) {
        return Err(BenchError::invalid(format!(
            "size points must be strictly ascending, found {} before {}",
            pair[0], pair[1]
        )));
    }

    for &size in sizes {
        log::debug!("size point {size}");
        for op in registry.iter() {
            let measurement = step(size, op)?;
            log::trace!("{} @ {size}: {measurement:?}", op.name());
            aggregator.push(ResultRow::new(op.name(), size, measurement));
        }
    }

    Ok(())
}

/// Byte size of an artifact left behind by an operation.
pub fn probe_size(path: &Path) -> anyhow::Result<u64> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("cannot probe size of {}", path.display()))?;
    Ok(meta.len())
}

/// `points` evenly spaced sizes from 0 to `max` inclusive, with 0 dropped.
///
/// Values are floored like an integer linspace; repeats that appear when
/// `max` is smaller than the number of points are collapsed.
pub fn even_size_points(max: usize, points: usize) -> BenchResult<Vec<usize>> {
    if points < 2 {
        return Err(BenchError::invalid(format!(
            "need at least 2 size points, got {points}"
        )));
    }

    let steps = (points - 1) as u128;
    let mut sizes: Vec<usize> = (1..points)
        .map(|i| (i as u128 * max as u128 / steps) as usize)
        .filter(|&s| s > 0)
        .collect();
    sizes.dedup();
    Ok(sizes)
}

/// Every size from 1 up to but excluding `max`.
pub fn dynamic_size_points(max: usize) -> Vec<usize> {
    (1..max).collect()
}
