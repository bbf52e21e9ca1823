//! Encoding and Filtering Benchmarks
//!
//! Two suites share one measurement core:
//! - **export**: serialization and deserialization time plus on-disk size of
//!   a tabular dataset for several file encodings, as row count grows
//! - **lookup**: cost of selecting records by attribute value with several
//!   in-memory filtering and indexing strategies, at full size and across
//!   every prefix length
//!
//! The harness (`harness`, `registry`, `aggregate`) times opaque operations
//! and produces an ordered result table; `report` prints it and writes it out
//! for charting.
//!
//! Run benchmarks: `cargo run --release -- [export|lookup|all]`
//! Run tests: `cargo test`

pub mod aggregate;
pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod harness;
pub mod populate;
pub mod registry;
pub mod report;
pub mod strategies;
pub mod suites;

pub use error::{BenchError, BenchResult};
