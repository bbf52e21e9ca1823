//! Static, ordered lists of named operations under test.
//!
//! Each descriptor holds its action directly; there is no lookup by
//! name at measurement time. Adding an operation means appending one
//! descriptor to the list a suite builds.

use crate::error::{BenchError, BenchResult};
use std::collections::HashSet;

pub struct OperationDescriptor<A: ?Sized> {
    name: String,
    action: Box<A>,
}

impl<A: ?Sized> OperationDescriptor<A> {
    pub fn new(name: impl Into<String>, action: Box<A>) -> Self {
        Self {
            name: name.into(),
            action,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action(&self) -> &A {
        &self.action
    }
}

pub struct Registry<A: ?Sized> {
    operations: Vec<OperationDescriptor<A>>,
}

impl<A: ?Sized> Registry<A> {
    /// Validate and freeze a list of descriptors.
    ///
    /// Fails on an empty list or on the first repeated name.
    pub fn new(operations: Vec<OperationDescriptor<A>>) -> BenchResult<Self> {
        if operations.is_empty() {
            return Err(BenchError::invalid("registry must contain at least one operation"));
        }

        let mut seen = HashSet::with_capacity(operations.len());
        for op in &operations {
            if !seen.insert(op.name()) {
                return Err(BenchError::Configuration(format!(
                    "duplicate operation name '{}'",
                    op.name()
                )));
            }
        }

        Ok(Self { operations })
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor<A>> {
        self.operations.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&OperationDescriptor<A>> {
        self.operations.iter().find(|op| op.name() == name)
    }
}
