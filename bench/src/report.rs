//! Report module: prints result tables and hands them to external tooling.
//!
//! Chart rendering lives outside this crate; [`write_json`] produces the
//! file a plotting script consumes.

use crate::aggregate::{ResultRow, ResultTable};
use anyhow::{Context, Result};
use bench_core::constants::{PHASE_CONSTRUCTION_FILTER, PHASE_CREATION, PHASE_FILTER, PHASE_READ};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

fn ns(row: &ResultRow, phase: &str) -> u128 {
    row.phase(phase).map(|d| d.as_nanos()).unwrap_or_default()
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(80));
    println!("  {title}");
    println!("{}", "=".repeat(80));
}

/// Print the export suite table: one line per (rows, codec).
pub fn print_export_report(table: &ResultTable) {
    banner("File size and IO time by encoding");
    println!(
        "  {:>10} {:<10} {:>16} {:>16} {:>14}",
        "Rows", "Format", "Creation (ns)", "Read (ns)", "Size (bytes)"
    );
    println!("  {}", "-".repeat(70));
    for row in table {
        println!(
            "  {:>10} {:<10} {:>16} {:>16} {:>14}",
            row.size(),
            row.operation(),
            ns(row, PHASE_CREATION),
            ns(row, PHASE_READ),
            row.file_size_bytes().unwrap_or_default()
        );
    }
    println!();
}

/// Print the single-shot lookup table in milliseconds.
pub fn print_lookup_report(table: &ResultTable) {
    banner("Filtering time by strategy (single try)");
    println!(
        "  {:<18} {:>10} {:>14} {:>24}",
        "Strategy", "Size", "Filter (ms)", "Construction+filter (ms)"
    );
    println!("  {}", "-".repeat(70));
    for row in table {
        println!(
            "  {:<18} {:>10} {:>14.4} {:>24.4}",
            row.operation(),
            row.size(),
            row.phase(PHASE_FILTER).map(ms).unwrap_or_default(),
            row.phase(PHASE_CONSTRUCTION_FILTER).map(ms).unwrap_or_default()
        );
    }
    println!();
}

/// min / mean / max of one phase across a strategy's rows, in ms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSummary {
    pub min_ms: f64,
    pub mean_ms: f64,
    pub max_ms: f64,
}

pub fn summarize<'a>(
    rows: impl Iterator<Item = &'a ResultRow>,
    phase: &str,
) -> Option<PhaseSummary> {
    let values: Vec<f64> = rows.filter_map(|r| r.phase(phase)).map(ms).collect();
    if values.is_empty() {
        return None;
    }
    let min_ms = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_ms = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean_ms = values.iter().sum::<f64>() / values.len() as f64;
    Some(PhaseSummary {
        min_ms,
        mean_ms,
        max_ms,
    })
}

/// Print a per-strategy summary of a dynamic-size run.
pub fn print_dynamic_summary(table: &ResultTable) {
    banner("Filtering time across data sizes");
    println!(
        "  {:<18} {:<22} {:>10} {:>10} {:>10}",
        "Strategy", "Phase", "Min (ms)", "Mean (ms)", "Max (ms)"
    );
    println!("  {}", "-".repeat(74));
    for name in table.operations() {
        for phase in [PHASE_FILTER, PHASE_CONSTRUCTION_FILTER] {
            if let Some(s) = summarize(table.for_operation(name), phase) {
                println!(
                    "  {:<18} {:<22} {:>10.4} {:>10.4} {:>10.4}",
                    name, phase, s.min_ms, s.mean_ms, s.max_ms
                );
            }
        }
    }
    println!();
}

/// Serialize `table` as JSON for the presentation layer.
pub fn write_json(table: &ResultTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    let file =
        fs::File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, table)?;
    w.flush()
        .with_context(|| format!("cannot flush {}", path.display()))?;
    log::info!("wrote {} rows to {}", table.len(), path.display());
    Ok(())
}
