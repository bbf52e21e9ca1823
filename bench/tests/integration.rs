//! Integration tests: drive the harness end to end and run both suites at
//! small sizes.

use anyhow::bail;
use rowbench::aggregate::{Aggregator, Measurement};
use rowbench::clock::{ProcessClock, WallClock};
use rowbench::harness::{even_size_points, measure, probe_size, sweep};
use rowbench::populate::{generate_attr, generate_tabular, seeded_rng};
use rowbench::registry::{OperationDescriptor, Registry};
use rowbench::suites::export::{self, artifact_path, ExportSettings};
use rowbench::suites::lookup;
use rowbench::BenchError;
use std::cell::Cell;
use std::path::Path;

type Action = dyn Fn(usize) -> anyhow::Result<usize>;

fn op(
    name: &str,
    f: impl Fn(usize) -> anyhow::Result<usize> + 'static,
) -> OperationDescriptor<Action> {
    let action: Box<Action> = Box::new(f);
    OperationDescriptor::new(name, action)
}

fn timed_step(size: usize, op: &OperationDescriptor<Action>) -> Result<Measurement, BenchError> {
    let clock = ProcessClock::new();
    let d = measure(&clock, |x: &usize| (op.action())(*x), &size, 3)?;
    Ok(Measurement::new().with_phase("total", d))
}

// ── Harness scenarios ───────────────────────────────────────────────

#[test]
fn single_operation_over_two_sizes() {
    let registry = Registry::new(vec![op("double", |x| Ok(x * 2))]).unwrap();
    let mut agg = Aggregator::new();
    sweep(&[1, 2], &registry, &mut agg, timed_step).unwrap();

    let table = agg.finish();
    assert_eq!(table.len(), 2);
    let sizes: Vec<usize> = table.iter().map(|r| r.size()).collect();
    assert_eq!(sizes, [1, 2]);
    for row in &table {
        assert_eq!(row.operation(), "double");
        assert!(row.phase("total").is_some());
    }
}

#[test]
fn rows_are_size_major_operation_minor() {
    let registry = Registry::new(vec![
        op("a", |x| Ok(x)),
        op("b", |x| Ok(x + 1)),
        op("c", |x| Ok(x + 2)),
    ])
    .unwrap();
    let sizes = [2, 4, 8, 16];
    let mut agg = Aggregator::new();
    sweep(&sizes, &registry, &mut agg, timed_step).unwrap();

    let table = agg.finish();
    assert_eq!(table.len(), sizes.len() * registry.len());
    let order: Vec<(usize, &str)> = table.iter().map(|r| (r.size(), r.operation())).collect();
    let expected: Vec<(usize, &str)> = sizes
        .iter()
        .flat_map(|&s| ["a", "b", "c"].into_iter().map(move |n| (s, n)))
        .collect();
    assert_eq!(order, expected);
}

#[test]
fn failing_operation_aborts_the_run() {
    let registry = Registry::new(vec![
        op("works", |x| Ok(x)),
        op("broken", |_| bail!("broken operation exploded")),
    ])
    .unwrap();
    let mut agg = Aggregator::new();
    let calls = Cell::new(0);
    let err = sweep(&[1, 2, 3], &registry, &mut agg, |size, op| {
        calls.set(calls.get() + 1);
        timed_step(size, op)
    })
    .unwrap_err();

    assert_eq!(err.to_string(), "broken operation exploded");
    assert_eq!(calls.get(), 2, "nothing may run after the failure");
    let table = agg.finish();
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].operation(), "works");
}

#[test]
fn failing_operation_first_records_nothing() {
    let registry = Registry::new(vec![
        op("broken", |_| bail!("no such file: out.broken")),
        op("works", |x| Ok(x)),
    ])
    .unwrap();
    let mut agg = Aggregator::new();
    let err = sweep(&[1, 2], &registry, &mut agg, timed_step).unwrap_err();
    assert!(matches!(err, BenchError::Operation(_)));
    assert_eq!(err.to_string(), "no such file: out.broken");
    assert!(agg.is_empty());
}

#[test]
fn duplicate_registry_is_rejected_before_measuring() {
    let calls = Cell::new(0);
    let result = Registry::new(vec![
        op("double", |x| Ok(x * 2)),
        op("double", |x| Ok(x + x)),
    ])
    .and_then(|registry| {
        let mut agg = Aggregator::new();
        sweep(&[1], &registry, &mut agg, |size, op| {
            calls.set(calls.get() + 1);
            timed_step(size, op)
        })
    });
    assert!(matches!(result, Err(BenchError::Configuration(_))));
    assert_eq!(calls.get(), 0);
}

#[test]
fn size_probe_passes_through_exact_length() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.blob");

    let registry = Registry::new(vec![op("blob", |n| Ok(n))]).unwrap();
    let mut agg = Aggregator::new();
    sweep(&[1024], &registry, &mut agg, |size, _| {
        std::fs::write(&path, vec![0u8; size]).map_err(anyhow::Error::from)?;
        Ok(Measurement::new().with_file_size(probe_size(&path)?))
    })
    .unwrap();

    let table = agg.finish();
    assert_eq!(table.rows()[0].file_size_bytes(), Some(1024));
}

#[test]
fn probe_of_missing_artifact_fails() {
    let err = probe_size(Path::new("/nonexistent/out.json")).unwrap_err();
    assert!(format!("{err:#}").contains("out.json"));
}

// ── Suites ──────────────────────────────────────────────────────────

#[test]
fn export_suite_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let data = generate_tabular(300, &mut seeded_rng(72481));
    let registry = export::registry().unwrap();
    let settings = ExportSettings {
        sizes: even_size_points(data.len(), 4).unwrap(),
        repetitions: 2,
        out_dir: dir.path().to_path_buf(),
    };
    let mut agg = Aggregator::new();
    export::run(&WallClock::new(), &registry, &data, &settings, &mut agg).unwrap();

    let table = agg.finish();
    assert_eq!(table.len(), 3 * registry.len());
    for name in registry.names() {
        let rows: Vec<_> = table.for_operation(name).collect();
        assert_eq!(rows.iter().map(|r| r.size()).collect::<Vec<_>>(), [100, 200, 300]);
        assert!(rows.iter().all(|r| r.phase("creation").is_some() && r.phase("read").is_some()));
        let sizes: Vec<u64> = rows.iter().map(|r| r.file_size_bytes().unwrap()).collect();
        assert!(sizes.windows(2).all(|w| w[0] < w[1]), "{name}: {sizes:?}");

        // The artifact left behind is the one from the last size point.
        let on_disk = std::fs::metadata(artifact_path(dir.path(), name)).unwrap().len();
        assert_eq!(Some(on_disk), rows.last().unwrap().file_size_bytes());
    }
}

#[test]
fn export_suite_surfaces_io_failure() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let data = generate_tabular(10, &mut seeded_rng(1));
    let settings = ExportSettings {
        sizes: vec![5, 10],
        repetitions: 1,
        out_dir: missing,
    };
    let mut agg = Aggregator::new();
    let err = export::run(
        &WallClock::new(),
        &export::registry().unwrap(),
        &data,
        &settings,
        &mut agg,
    )
    .unwrap_err();
    assert!(err.to_string().contains("out.json"), "{err}");
    assert!(agg.is_empty());
}

#[test]
fn lookup_dynamic_covers_every_prefix() {
    let data = generate_attr(40, &mut seeded_rng(72481));
    let registry = lookup::registry().unwrap();
    let sizes: Vec<usize> = (1..data.len()).collect();
    let mut agg = Aggregator::new();
    lookup::run_dynamic(&ProcessClock::new(), &registry, &data, &sizes, &mut agg).unwrap();

    let table = agg.finish();
    assert_eq!(table.len(), sizes.len() * registry.len());
    assert_eq!(table.rows()[0].size(), 1);
    assert_eq!(table.rows().last().unwrap().size(), 39);
    assert_eq!(table.rows().last().unwrap().operation(), "frozen_index");
}
