//! Ordered collection of parsed records of one device kind.

use crate::models::{DeviceKind, Specification};

/// Append-only, submission-ordered batch of specifications
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate<T: Specification> {
    records: Vec<T>,
}

impl<T: Specification> Default for Aggregate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Specification> Aggregate<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn kind(&self) -> DeviceKind {
        T::KIND
    }

    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Declared display column order for this kind
    pub fn column_order(&self) -> &'static [&'static str] {
        T::column_order()
    }

    /// Declared columns carried by at least one record, in declared order
    pub fn present_columns(&self) -> Vec<&'static str> {
        T::column_order()
            .iter()
            .copied()
            .filter(|column| self.records.iter().any(|r| r.value(column).is_some()))
            .collect()
    }
}

impl<T: Specification> Extend<T> for Aggregate<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl<T: Specification> FromIterator<T> for Aggregate<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
