//! In-memory filtering strategies compared by the lookup suite.
//!
//! Every strategy answers the same `attr < bound` query. Strategies that
//! need a helper structure build it first; the reported timings separate the
//! query itself from query plus construction.

use crate::clock::Clock;
use anyhow::{ensure, Result};
use bench_core::constants::PROP2_BOUND;
use bench_core::types::{Attr, AttrRecord};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hint::black_box;
use std::time::Duration;

/// Select records whose `attr` is strictly below `bound`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LessThan {
    pub attr: Attr,
    pub bound: f64,
}

impl LessThan {
    pub fn matches(&self, record: &AttrRecord) -> bool {
        record.value(self.attr) < self.bound
    }
}

impl Default for LessThan {
    fn default() -> Self {
        Self {
            attr: Attr::Prop2,
            bound: PROP2_BOUND as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterTimings {
    /// The query alone.
    pub filter: Duration,
    /// Construction of the helper structure plus the query.
    pub construction_and_filter: Duration,
    /// Number of records selected.
    pub hits: usize,
}

pub trait FilterStrategy {
    fn construct_and_filter(&self, clock: &dyn Clock, input: &[AttrRecord])
        -> Result<FilterTimings>;
}

fn two_phase<'a, S>(
    clock: &dyn Clock,
    input: &'a [AttrRecord],
    construct: impl FnOnce(&'a [AttrRecord]) -> S,
    filter: impl FnOnce(&S) -> Result<usize>,
) -> Result<FilterTimings> {
    let full_start = clock.now();
    let structure = black_box(construct(input));
    let start = clock.now();
    let hits = black_box(filter(&structure)?);
    let end = clock.now();
    Ok(FilterTimings {
        filter: end.saturating_sub(start),
        construction_and_filter: end.saturating_sub(full_start),
        hits,
    })
}

// ── Plain scans ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct IteratorFilter {
    pub query: LessThan,
}

impl FilterStrategy for IteratorFilter {
    fn construct_and_filter(
        &self,
        clock: &dyn Clock,
        input: &[AttrRecord],
    ) -> Result<FilterTimings> {
        two_phase(
            clock,
            input,
            |records| records,
            |records| {
                let hits: Vec<&AttrRecord> =
                    records.iter().filter(|r| self.query.matches(r)).collect();
                Ok(hits.len())
            },
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoopFilter {
    pub query: LessThan,
}

impl FilterStrategy for LoopFilter {
    fn construct_and_filter(
        &self,
        clock: &dyn Clock,
        input: &[AttrRecord],
    ) -> Result<FilterTimings> {
        two_phase(
            clock,
            input,
            |records| records,
            |records| {
                let mut hits = Vec::new();
                for record in records.iter() {
                    if self.query.matches(record) {
                        hits.push(record);
                    }
                }
                Ok(hits.len())
            },
        )
    }
}

// ── Columnar frame ───────────────────────────────────────────────────

/// Column-per-attribute copy of a record slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrFrame {
    pub prop1: Vec<i64>,
    pub prop2: Vec<i64>,
    pub prop3: Vec<f64>,
}

impl AttrFrame {
    pub fn from_records(records: &[AttrRecord]) -> Self {
        let mut frame = Self {
            prop1: Vec::with_capacity(records.len()),
            prop2: Vec::with_capacity(records.len()),
            prop3: Vec::with_capacity(records.len()),
        };
        for r in records {
            frame.prop1.push(r.prop1);
            frame.prop2.push(r.prop2);
            frame.prop3.push(r.prop3);
        }
        frame
    }

    pub fn len(&self) -> usize {
        self.prop1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prop1.is_empty()
    }

    pub fn column(&self, attr: Attr) -> Vec<f64> {
        match attr {
            Attr::Prop1 => self.prop1.iter().map(|&v| v as f64).collect(),
            Attr::Prop2 => self.prop2.iter().map(|&v| v as f64).collect(),
            Attr::Prop3 => self.prop3.clone(),
        }
    }

    pub fn mask(&self, query: &LessThan) -> Vec<bool> {
        self.column(query.attr)
            .into_iter()
            .map(|v| v < query.bound)
            .collect()
    }

    /// New frame holding the rows where `mask` is set.
    pub fn select(&self, mask: &[bool]) -> Result<Self> {
        ensure!(
            mask.len() == self.len(),
            "mask length {} does not match frame length {}",
            mask.len(),
            self.len()
        );
        let pick = |col: &[i64]| -> Vec<i64> {
            col.iter()
                .zip(mask)
                .filter_map(|(&v, &keep)| keep.then_some(v))
                .collect()
        };
        Ok(Self {
            prop1: pick(&self.prop1),
            prop2: pick(&self.prop2),
            prop3: self
                .prop3
                .iter()
                .zip(mask)
                .filter_map(|(&v, &keep)| keep.then_some(v))
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ColumnarFrame {
    pub query: LessThan,
}

impl FilterStrategy for ColumnarFrame {
    fn construct_and_filter(
        &self,
        clock: &dyn Clock,
        input: &[AttrRecord],
    ) -> Result<FilterTimings> {
        two_phase(clock, input, AttrFrame::from_records, |frame| {
            Ok(frame.select(&frame.mask(&self.query))?.len())
        })
    }
}

// ── Attribute indexes ────────────────────────────────────────────────

/// Totally ordered `f64` so attribute values can key ordered containers.
#[derive(Debug, Clone, Copy)]
struct FloatKey(f64);

impl PartialEq for FloatKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatKey {}

impl PartialOrd for FloatKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn slot(attr: Attr) -> usize {
    match attr {
        Attr::Prop1 => 0,
        Attr::Prop2 => 1,
        Attr::Prop3 => 2,
    }
}

/// Mutable index over every attribute: value → positions in the source slice.
pub struct SortedIndex<'a> {
    records: &'a [AttrRecord],
    by_attr: [BTreeMap<FloatKey, Vec<usize>>; 3],
}

impl<'a> SortedIndex<'a> {
    pub fn build(records: &'a [AttrRecord]) -> Self {
        let mut index = Self {
            records,
            by_attr: Default::default(),
        };
        for pos in 0..records.len() {
            index.insert(pos);
        }
        index
    }

    fn insert(&mut self, pos: usize) {
        let record = &self.records[pos];
        for attr in Attr::ALL {
            self.by_attr[slot(attr)]
                .entry(FloatKey(record.value(attr)))
                .or_default()
                .push(pos);
        }
    }

    pub fn less_than(&self, query: &LessThan) -> Vec<&'a AttrRecord> {
        let records = self.records;
        self.by_attr[slot(query.attr)]
            .range(..FloatKey(query.bound))
            .flat_map(|(_, positions)| positions.iter().map(move |&p| &records[p]))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SortedIndexFilter {
    pub query: LessThan,
}

impl FilterStrategy for SortedIndexFilter {
    fn construct_and_filter(
        &self,
        clock: &dyn Clock,
        input: &[AttrRecord],
    ) -> Result<FilterTimings> {
        two_phase(clock, input, SortedIndex::build, |index| {
            Ok(index.less_than(&self.query).len())
        })
    }
}

/// Immutable index: one array of (value, position) pairs per attribute,
/// sorted by value and searched by bisection.
pub struct FrozenIndex<'a> {
    records: &'a [AttrRecord],
    by_attr: [Vec<(FloatKey, u32)>; 3],
}

impl<'a> FrozenIndex<'a> {
    pub fn build(records: &'a [AttrRecord]) -> Self {
        let by_attr = Attr::ALL.map(|attr| {
            let mut column: Vec<(FloatKey, u32)> = records
                .iter()
                .enumerate()
                .map(|(pos, r)| (FloatKey(r.value(attr)), pos as u32))
                .collect();
            column.sort_unstable();
            column
        });
        Self { records, by_attr }
    }

    pub fn less_than(&self, query: &LessThan) -> Vec<&'a AttrRecord> {
        let column = &self.by_attr[slot(query.attr)];
        let bound = FloatKey(query.bound);
        let end = column.partition_point(|(key, _)| *key < bound);
        let records = self.records;
        column[..end]
            .iter()
            .map(|&(_, pos)| &records[pos as usize])
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrozenIndexFilter {
    pub query: LessThan,
}

impl FilterStrategy for FrozenIndexFilter {
    fn construct_and_filter(
        &self,
        clock: &dyn Clock,
        input: &[AttrRecord],
    ) -> Result<FilterTimings> {
        two_phase(clock, input, FrozenIndex::build, |index| {
            Ok(index.less_than(&self.query).len())
        })
    }
}
