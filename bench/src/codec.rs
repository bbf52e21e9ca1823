//! File encodings exercised by the export/import suite.
//!
//! Each implementation carries its own options and writes exactly one file
//! per export. Failures are reported with the artifact path attached.

use anyhow::{Context, Result};
use bench_core::types::TabularRecord;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// An encoding under test: an export action paired with the import action
/// that reads its artifact back.
pub trait Codec {
    fn export(&self, rows: &[TabularRecord], path: &Path) -> Result<()>;

    fn import(&self, path: &Path) -> Result<Vec<TabularRecord>>;
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    Ok(BufReader::new(file))
}

// ── JSON ─────────────────────────────────────────────────────────────

/// Array of objects, the `orient="records"` layout.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    pub pretty: bool,
}

impl Codec for JsonCodec {
    fn export(&self, rows: &[TabularRecord], path: &Path) -> Result<()> {
        let mut w = create(path)?;
        if self.pretty {
            serde_json::to_writer_pretty(&mut w, rows)?;
        } else {
            serde_json::to_writer(&mut w, rows)?;
        }
        w.flush()
            .with_context(|| format!("cannot flush {}", path.display()))
    }

    fn import(&self, path: &Path) -> Result<Vec<TabularRecord>> {
        serde_json::from_reader(open(path)?)
            .with_context(|| format!("malformed JSON in {}", path.display()))
    }
}

// ── CSV ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CsvCodec {
    pub delimiter: u8,
}

impl Default for CsvCodec {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl Codec for CsvCodec {
    fn export(&self, rows: &[TabularRecord], path: &Path) -> Result<()> {
        let mut w = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        for row in rows {
            w.serialize(row)?;
        }
        w.flush()
            .with_context(|| format!("cannot flush {}", path.display()))
    }

    fn import(&self, path: &Path) -> Result<Vec<TabularRecord>> {
        let mut r = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_path(path)
            .with_context(|| format!("cannot open {}", path.display()))?;
        r.deserialize()
            .collect::<Result<Vec<TabularRecord>, _>>()
            .with_context(|| format!("malformed CSV in {}", path.display()))
    }
}

// ── bincode ──────────────────────────────────────────────────────────

/// Length-prefixed binary rows; `fixed_int` trades size for decode speed.
#[derive(Debug, Clone, Default)]
pub struct BincodeCodec {
    pub fixed_int: bool,
}

impl Codec for BincodeCodec {
    fn export(&self, rows: &[TabularRecord], path: &Path) -> Result<()> {
        let mut w = create(path)?;
        let config = bincode::config::standard();
        if self.fixed_int {
            bincode::encode_into_std_write(rows, &mut w, config.with_fixed_int_encoding())?;
        } else {
            bincode::encode_into_std_write(rows, &mut w, config)?;
        }
        w.flush()
            .with_context(|| format!("cannot flush {}", path.display()))
    }

    fn import(&self, path: &Path) -> Result<Vec<TabularRecord>> {
        let mut r = open(path)?;
        let config = bincode::config::standard();
        let rows: Result<Vec<TabularRecord>, _> = if self.fixed_int {
            bincode::decode_from_std_read(&mut r, config.with_fixed_int_encoding())
        } else {
            bincode::decode_from_std_read(&mut r, config)
        };
        rows.with_context(|| format!("malformed bincode in {}", path.display()))
    }
}

// ── MessagePack ──────────────────────────────────────────────────────

/// `named` writes each row as a map keyed by column name, otherwise rows
/// are positional arrays.
#[derive(Debug, Clone, Default)]
pub struct MsgPackCodec {
    pub named: bool,
}

impl Codec for MsgPackCodec {
    fn export(&self, rows: &[TabularRecord], path: &Path) -> Result<()> {
        let mut w = create(path)?;
        if self.named {
            rmp_serde::encode::write_named(&mut w, rows)?;
        } else {
            rmp_serde::encode::write(&mut w, rows)?;
        }
        w.flush()
            .with_context(|| format!("cannot flush {}", path.display()))
    }

    fn import(&self, path: &Path) -> Result<Vec<TabularRecord>> {
        rmp_serde::decode::from_read(open(path)?)
            .with_context(|| format!("malformed MessagePack in {}", path.display()))
    }
}

// ── gzip-compressed JSON ─────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GzipJsonCodec {
    pub level: u32,
}

impl Default for GzipJsonCodec {
    fn default() -> Self {
        Self { level: 6 }
    }
}

impl Codec for GzipJsonCodec {
    fn export(&self, rows: &[TabularRecord], path: &Path) -> Result<()> {
        let mut encoder = GzEncoder::new(create(path)?, Compression::new(self.level));
        serde_json::to_writer(&mut encoder, rows)?;
        encoder
            .finish()
            .and_then(|mut w| w.flush())
            .with_context(|| format!("cannot finish gzip stream {}", path.display()))
    }

    fn import(&self, path: &Path) -> Result<Vec<TabularRecord>> {
        serde_json::from_reader(GzDecoder::new(open(path)?))
            .with_context(|| format!("malformed gzip JSON in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::populate::{generate_tabular, seeded_rng};

    fn all_codecs() -> Vec<(&'static str, Box<dyn Codec>)> {
        vec![
            ("json", Box::new(JsonCodec::default())),
            ("json_pretty", Box::new(JsonCodec { pretty: true })),
            ("csv", Box::new(CsvCodec::default())),
            ("tsv", Box::new(CsvCodec { delimiter: b'\t' })),
            ("bincode", Box::new(BincodeCodec::default())),
            ("bincode_fixed", Box::new(BincodeCodec { fixed_int: true })),
            ("msgpack", Box::new(MsgPackCodec::default())),
            ("msgpack_named", Box::new(MsgPackCodec { named: true })),
            ("json_gz", Box::new(GzipJsonCodec::default())),
        ]
    }

    #[test]
    fn every_codec_reads_back_what_it_wrote() {
        let dir = tempfile::tempdir().unwrap();
        let rows = generate_tabular(64, &mut seeded_rng(9));
        for (name, codec) in all_codecs() {
            let path = dir.path().join(format!("out.{name}"));
            codec.export(&rows, &path).unwrap();
            let back = codec.import(&path).unwrap();
            assert_eq!(back, rows, "{name} changed the data");
        }
    }

    #[test]
    fn empty_dataset_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        for (name, codec) in all_codecs() {
            let path = dir.path().join(format!("empty.{name}"));
            codec.export(&[], &path).unwrap();
            assert!(codec.import(&path).unwrap().is_empty(), "{name}");
        }
    }

    #[test]
    fn fixed_int_bincode_is_larger() {
        let dir = tempfile::tempdir().unwrap();
        let rows = generate_tabular(32, &mut seeded_rng(3));
        let var = dir.path().join("var.bin");
        let fixed = dir.path().join("fixed.bin");
        BincodeCodec::default().export(&rows, &var).unwrap();
        BincodeCodec { fixed_int: true }.export(&rows, &fixed).unwrap();
        let len = |p: &Path| std::fs::metadata(p).unwrap().len();
        assert!(len(&fixed) > len(&var));
    }

    #[test]
    fn missing_artifact_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let err = CsvCodec::default().import(&path).unwrap_err();
        assert!(format!("{err:#}").contains("out.csv"), "{err:#}");
    }
}
