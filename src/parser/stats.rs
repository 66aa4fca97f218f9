//! Parsing statistics and result structures for batch processing
//!
//! This module provides types for tracking how many raw inputs became records
//! and why the rest were rejected.

use crate::aggregate::Aggregate;
use crate::error::PvsystError;
use crate::models::Specification;
use serde::{Deserialize, Serialize};

/// Batch parsing result with the ordered aggregate and statistics
#[derive(Debug)]
pub struct BatchResult<T: Specification> {
    /// Successfully parsed records in submission order
    pub aggregate: Aggregate<T>,

    /// Counts for the batch
    pub stats: ParseStats,

    /// One entry per rejected input, in submission order
    pub failures: Vec<RecordFailure>,
}

impl<T: Specification> BatchResult<T> {
    pub fn record_count(&self) -> usize {
        self.aggregate.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Diagnostic for one rejected input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFailure {
    /// Zero-based position of the input in the submitted batch
    pub index: usize,

    /// Field that failed, when the failure is field-specific
    pub field: Option<String>,

    /// Human-readable cause
    pub reason: String,
}

impl RecordFailure {
    pub fn from_error(index: usize, error: &PvsystError) -> Self {
        let field = match error {
            PvsystError::MalformedField { field, .. } | PvsystError::MissingField { field } => {
                Some(field.to_string())
            }
            _ => None,
        };

        Self {
            index,
            field,
            reason: error.to_string(),
        }
    }
}

/// Simple parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Non-blank inputs submitted for parsing
    pub total_records: usize,

    /// Inputs that became records
    pub records_parsed: usize,

    /// Inputs rejected as a whole
    pub records_skipped: usize,

    /// Blank inputs ignored before parsing
    pub blank_inputs: usize,

    /// Failure messages for reporting
    pub errors: Vec<String>,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / self.total_records as f64) * 100.0
        }
    }

    /// True when every submitted input became a record
    pub fn all_parsed(&self) -> bool {
        self.records_skipped == 0
    }
}
