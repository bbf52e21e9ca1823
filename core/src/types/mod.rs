//! Record types produced by the generators and consumed by the operations under test

mod attr;
mod tabular;

pub use attr::{Attr, AttrRecord};
pub use tabular::TabularRecord;
