//! Export/import suite: write and read back a growing prefix of the
//! tabular dataset with every registered codec.
//!
//! Per (size, codec) the row holds the total time of `repetitions` exports
//! (`creation`), the resulting file size and the total time of
//! `repetitions` imports (`read`).

use crate::aggregate::{Aggregator, Measurement};
use crate::clock::Clock;
use crate::codec::{BincodeCodec, Codec, CsvCodec, GzipJsonCodec, JsonCodec, MsgPackCodec};
use crate::error::BenchResult;
use crate::harness::{measure, probe_size, sweep};
use crate::registry::{OperationDescriptor, Registry};
use bench_core::constants::{ARTIFACT_PREFIX, PHASE_CREATION, PHASE_READ};
use bench_core::types::TabularRecord;
use std::path::{Path, PathBuf};

fn codec(name: &str, codec: impl Codec + 'static) -> OperationDescriptor<dyn Codec> {
    let action: Box<dyn Codec> = Box::new(codec);
    OperationDescriptor::new(name, action)
}

/// Codecs in report order.
pub fn registry() -> BenchResult<Registry<dyn Codec>> {
    Registry::new(vec![
        codec("json", JsonCodec::default()),
        codec("csv", CsvCodec::default()),
        codec("bincode", BincodeCodec::default()),
        codec("msgpack", MsgPackCodec::default()),
        codec("json_gz", GzipJsonCodec::default()),
    ])
}

/// Fixed artifact location for a codec; overwritten on every iteration.
pub fn artifact_path(out_dir: &Path, name: &str) -> PathBuf {
    out_dir.join(format!("{ARTIFACT_PREFIX}.{name}"))
}

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub sizes: Vec<usize>,
    pub repetitions: u32,
    pub out_dir: PathBuf,
}

pub fn run(
    clock: &dyn Clock,
    registry: &Registry<dyn Codec>,
    data: &[TabularRecord],
    settings: &ExportSettings,
    aggregator: &mut Aggregator,
) -> BenchResult<()> {
    super::check_sizes(&settings.sizes, data.len())?;
    log::info!(
        "export suite: {} codecs x {} size points, {} repetitions each",
        registry.len(),
        settings.sizes.len(),
        settings.repetitions
    );

    sweep(&settings.sizes, registry, aggregator, |size, op| {
        let codec = op.action();
        let rows = &data[..size];
        let path = artifact_path(&settings.out_dir, op.name());

        let creation = measure(
            clock,
            |rows: &[TabularRecord]| codec.export(rows, &path),
            rows,
            settings.repetitions,
        )?;
        let file_size = probe_size(&path)?;
        let read = measure(
            clock,
            |path: &Path| codec.import(path),
            path.as_path(),
            settings.repetitions,
        )?;

        log::info!(
            "  {:>8} rows  {:<8} write {:>12}ns  read {:>12}ns  {:>10} bytes",
            size,
            op.name(),
            creation.as_nanos(),
            read.as_nanos(),
            file_size
        );

        Ok(Measurement::new()
            .with_phase(PHASE_CREATION, creation)
            .with_phase(PHASE_READ, read)
            .with_file_size(file_size))
    })
}
