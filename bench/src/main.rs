//! Benchmark runner that prints the formatted reports.
//!
//! Settings come from `ROWBENCH_*` environment variables (or a `.env` file),
//! see `config.rs`. The first argument selects the suite:
//!
//!   cargo run --release                # both suites
//!   cargo run --release -- export
//!   ROWBENCH_MAX_ROWS=20000 cargo run --release -- export

use rowbench::aggregate::{Aggregator, ResultTable};
use rowbench::clock::Clock;
use rowbench::config::BenchConfig;
use rowbench::harness::{dynamic_size_points, even_size_points};
use rowbench::populate::{generate_attr, generate_tabular, seeded_rng};
use rowbench::report;
use rowbench::suites::export::{self, ExportSettings};
use rowbench::suites::lookup;
use rowbench::{BenchError, BenchResult};
use std::env;
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Suite {
    Export,
    Lookup,
    All,
}

impl Suite {
    fn parse(arg: Option<&str>) -> BenchResult<Self> {
        match arg {
            None | Some("all") => Ok(Self::All),
            Some("export") => Ok(Self::Export),
            Some("lookup") => Ok(Self::Lookup),
            Some(other) => Err(BenchError::invalid(format!(
                "unknown suite '{other}', expected export, lookup or all"
            ))),
        }
    }
}

fn dump(config: &BenchConfig, file_name: &str, table: &ResultTable) -> BenchResult<()> {
    if let Some(dir) = &config.results_dir {
        report::write_json(table, &dir.join(file_name))?;
    }
    Ok(())
}

fn run_export(config: &BenchConfig, clock: &dyn Clock) -> BenchResult<()> {
    // Registry problems must surface before the dataset is even generated.
    let registry = export::registry()?;

    log::info!("generating {} tabular rows (seed {})", config.max_rows, config.seed);
    let data = generate_tabular(config.max_rows, &mut seeded_rng(config.seed));

    let settings = ExportSettings {
        sizes: even_size_points(config.max_rows, config.size_points)?,
        repetitions: config.repetitions,
        out_dir: config.out_dir.clone(),
    };
    let mut aggregator = Aggregator::new();
    export::run(clock, &registry, &data, &settings, &mut aggregator)?;
    let table = aggregator.finish();

    report::print_export_report(&table);
    dump(config, "export.json", &table)
}

fn run_lookup(config: &BenchConfig, clock: &dyn Clock) -> BenchResult<()> {
    let registry = lookup::registry()?;

    log::info!("generating {} attribute records (seed {})", config.lookup_size, config.seed);
    let data = generate_attr(config.lookup_size, &mut seeded_rng(config.seed));

    let mut single = Aggregator::new();
    lookup::run_single_shot(clock, &registry, &data, &mut single)?;
    let single = single.finish();
    report::print_lookup_report(&single);
    dump(config, "lookup_single.json", &single)?;

    let mut dynamic = Aggregator::new();
    let sizes = dynamic_size_points(data.len());
    lookup::run_dynamic(clock, &registry, &data, &sizes, &mut dynamic)?;
    let dynamic = dynamic.finish();
    report::print_dynamic_summary(&dynamic);
    dump(config, "lookup_dynamic.json", &dynamic)
}

fn run(suite: Suite, config: &BenchConfig) -> BenchResult<()> {
    let clock = config.clock.build();
    log::info!("timing with {:?} clock", config.clock);

    if matches!(suite, Suite::Export | Suite::All) {
        run_export(config, clock.as_ref())?;
    }
    if matches!(suite, Suite::Lookup | Suite::All) {
        run_lookup(config, clock.as_ref())?;
    }
    Ok(())
}

fn main() {
    let config = BenchConfig::from_env().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    bench_core::initialize_logger(config.log_level, config.log_file.as_deref()).unwrap_or_else(
        |e| {
            eprintln!("Failed to initialize logger: {e:#}. Exiting.");
            process::exit(1);
        },
    );

    let arg = env::args().nth(1);
    let result = Suite::parse(arg.as_deref()).and_then(|suite| run(suite, &config));
    if let Err(e) = result {
        log::error!("{e:#}");
        process::exit(1);
    }
}
