//! Lookup suite: time every filtering strategy on the attribute dataset,
//! once at full size and then across every prefix length.

use crate::aggregate::{Aggregator, Measurement};
use crate::clock::Clock;
use crate::error::BenchResult;
use crate::harness::sweep;
use crate::registry::{OperationDescriptor, Registry};
use crate::strategies::{
    ColumnarFrame, FilterStrategy, FrozenIndexFilter, IteratorFilter, LoopFilter,
    SortedIndexFilter,
};
use bench_core::constants::{PHASE_CONSTRUCTION_FILTER, PHASE_FILTER};
use bench_core::types::AttrRecord;

fn strategy(
    name: &str,
    strategy: impl FilterStrategy + 'static,
) -> OperationDescriptor<dyn FilterStrategy> {
    let action: Box<dyn FilterStrategy> = Box::new(strategy);
    OperationDescriptor::new(name, action)
}

/// Strategies in report order.
pub fn registry() -> BenchResult<Registry<dyn FilterStrategy>> {
    Registry::new(vec![
        strategy("iterator_filter", IteratorFilter::default()),
        strategy("loop_filter", LoopFilter::default()),
        strategy("columnar_frame", ColumnarFrame::default()),
        strategy("sorted_index", SortedIndexFilter::default()),
        strategy("frozen_index", FrozenIndexFilter::default()),
    ])
}

/// One measurement per strategy over the whole dataset.
pub fn run_single_shot(
    clock: &dyn Clock,
    registry: &Registry<dyn FilterStrategy>,
    data: &[AttrRecord],
    aggregator: &mut Aggregator,
) -> BenchResult<()> {
    log::info!("lookup suite: single shot over {} records", data.len());
    run(clock, registry, data, &[data.len()], aggregator)
}

/// One measurement per strategy and prefix length in `sizes`.
pub fn run_dynamic(
    clock: &dyn Clock,
    registry: &Registry<dyn FilterStrategy>,
    data: &[AttrRecord],
    sizes: &[usize],
    aggregator: &mut Aggregator,
) -> BenchResult<()> {
    log::info!(
        "lookup suite: {} strategies x {} prefix lengths",
        registry.len(),
        sizes.len()
    );
    run(clock, registry, data, sizes, aggregator)
}

fn run(
    clock: &dyn Clock,
    registry: &Registry<dyn FilterStrategy>,
    data: &[AttrRecord],
    sizes: &[usize],
    aggregator: &mut Aggregator,
) -> BenchResult<()> {
    super::check_sizes(sizes, data.len())?;

    // (size, hits) reported by the first strategy at the current size.
    let mut reference: Option<(usize, usize)> = None;

    sweep(sizes, registry, aggregator, |size, op| {
        let timings = op.action().construct_and_filter(clock, &data[..size])?;

        match reference {
            Some((at, hits)) if at == size && hits != timings.hits => log::warn!(
                "{} selected {} records at size {size}, expected {hits}",
                op.name(),
                timings.hits
            ),
            Some((at, _)) if at == size => {}
            _ => reference = Some((size, timings.hits)),
        }
        log::debug!(
            "  {:<16} size {:>6}  filter {:>10}ns  construction+filter {:>10}ns",
            op.name(),
            size,
            timings.filter.as_nanos(),
            timings.construction_and_filter.as_nanos()
        );

        Ok(Measurement::new()
            .with_phase(PHASE_FILTER, timings.filter)
            .with_phase(PHASE_CONSTRUCTION_FILTER, timings.construction_and_filter))
    })
}
