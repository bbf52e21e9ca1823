//! Result rows and the append-only table they are collected into.
//!
//! The aggregator computes nothing; statistics are left to whoever consumes
//! the finished [`ResultTable`].

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Duration of one named phase of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub name: &'static str,
    pub duration: Duration,
}

/// Everything measured for one (size, operation) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measurement {
    phases: Vec<Phase>,
    file_size_bytes: Option<u64>,
}

impl Measurement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_phase(mut self, name: &'static str, duration: Duration) -> Self {
        self.phases.push(Phase { name, duration });
        self
    }

    pub fn with_file_size(mut self, bytes: u64) -> Self {
        self.file_size_bytes = Some(bytes);
        self
    }
}

/// One immutable measurement outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    operation: String,
    size: usize,
    phases: Vec<Phase>,
    file_size_bytes: Option<u64>,
}

impl ResultRow {
    pub fn new(operation: impl Into<String>, size: usize, measurement: Measurement) -> Self {
        Self {
            operation: operation.into(),
            size,
            phases: measurement.phases,
            file_size_bytes: measurement.file_size_bytes,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn phase(&self, name: &str) -> Option<Duration> {
        self.phases
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.duration)
    }

    pub fn file_size_bytes(&self) -> Option<u64> {
        self.file_size_bytes
    }
}

fn nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

// Flattened as {"operation", "size", "<phase>_ns"..., "file_size_bytes"} so
// that a dataframe library can load the table without reshaping.
impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("operation", &self.operation)?;
        map.serialize_entry("size", &self.size)?;
        for phase in &self.phases {
            map.serialize_entry(&format!("{}_ns", phase.name), &nanos(phase.duration))?;
        }
        if let Some(bytes) = self.file_size_bytes {
            map.serialize_entry("file_size_bytes", &bytes)?;
        }
        map.end()
    }
}

#[derive(Debug, Default)]
pub struct Aggregator {
    rows: Vec<ResultRow>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn finish(self) -> ResultTable {
        ResultTable { rows: self.rows }
    }
}

/// Completed, read-only result table in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRow> {
        self.rows.iter()
    }

    pub fn for_operation<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ResultRow> + 'a {
        self.rows.iter().filter(move |r| r.operation == name)
    }

    /// Operation names in the order they first appear.
    pub fn operations(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !names.contains(&row.operation()) {
                names.push(row.operation());
            }
        }
        names
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a ResultRow;
    type IntoIter = std::slice::Iter<'a, ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl Serialize for ResultTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ResultTable", 1)?;
        s.serialize_field("rows", &self.rows)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(op: &str, size: usize, ns: u64) -> ResultRow {
        ResultRow::new(
            op,
            size,
            Measurement::new().with_phase("read", Duration::from_nanos(ns)),
        )
    }

    #[test]
    fn finish_preserves_insertion_order() {
        let mut agg = Aggregator::new();
        agg.push(row("csv", 10, 5));
        agg.push(row("json", 10, 7));
        agg.push(row("csv", 20, 9));
        agg.push(row("csv", 20, 9));
        let table = agg.finish();

        assert_eq!(table.len(), 4, "duplicates must not be collapsed");
        assert_eq!(table.operations(), ["csv", "json"]);
        let csv_sizes: Vec<usize> = table.for_operation("csv").map(|r| r.size()).collect();
        assert_eq!(csv_sizes, [10, 20, 20]);
    }

    #[test]
    fn phase_lookup_by_name() {
        let r = ResultRow::new(
            "json_gz",
            3,
            Measurement::new()
                .with_phase("creation", Duration::from_micros(2))
                .with_phase("read", Duration::from_micros(1))
                .with_file_size(512),
        );
        assert_eq!(r.phase("creation"), Some(Duration::from_micros(2)));
        assert_eq!(r.phase("filter"), None);
        assert_eq!(r.file_size_bytes(), Some(512));
    }

    #[test]
    fn serializes_flat_rows() {
        let mut agg = Aggregator::new();
        agg.push(ResultRow::new(
            "bincode",
            100,
            Measurement::new()
                .with_phase("creation", Duration::from_nanos(1500))
                .with_file_size(2048),
        ));
        let json = serde_json::to_value(agg.finish()).unwrap();
        let first = &json["rows"][0];
        assert_eq!(first["operation"], "bincode");
        assert_eq!(first["size"], 100);
        assert_eq!(first["creation_ns"], 1500);
        assert_eq!(first["file_size_bytes"], 2048);
    }
}
