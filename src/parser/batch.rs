//! Batch parsing of raw export lines into an ordered aggregate
//!
//! Every input is parsed on its own; a rejected input is reported and
//! skipped without affecting the others. The concurrent path stamps each
//! input with its index before dispatch and merges by index afterwards, so
//! both paths yield the same aggregate.

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task;
use tracing::{debug, info, warn};

use super::record_parser::RecordParser;
use super::stats::{BatchResult, ParseStats, RecordFailure};
use crate::aggregate::Aggregate;
use crate::config::ParserConfig;
use crate::error::{PvsystError, Result};
use crate::models::Specification;

/// Parses batches of raw lines of one device kind
#[derive(Debug, Clone, Default)]
pub struct BatchParser {
    parser: RecordParser,
    show_progress: bool,
}

impl BatchParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            parser: RecordParser::new(config),
            show_progress: false,
        }
    }

    /// Show a progress bar on the concurrent path
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn record_parser(&self) -> &RecordParser {
        &self.parser
    }

    /// Parse inputs one after another
    pub fn parse_batch<T, I, S>(&self, lines: I) -> BatchResult<T>
    where
        T: Specification,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collector = BatchCollector::new();
        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let outcome = if is_blank(line) {
                None
            } else {
                Some(self.parser.parse::<T>(line))
            };
            collector.record(index, outcome);
        }
        collector.finish()
    }

    /// Parse inputs on the blocking pool, at most `max_concurrent_records` at a time
    pub async fn parse_batch_concurrent<T: Specification>(
        &self,
        lines: Vec<String>,
    ) -> BatchResult<T> {
        let concurrent_limit = self.parser.config().max_concurrent_records.max(1);
        debug!(
            "Parsing {} {} inputs with concurrency {}",
            lines.len(),
            T::KIND,
            concurrent_limit
        );

        let pb = if self.show_progress {
            let pb = ProgressBar::new(lines.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb.set_message(format!("Parsing {} records", T::KIND));
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut outcomes: Vec<(usize, Option<Result<T>>)> = stream::iter(lines.into_iter().enumerate())
            .map(|(index, line)| {
                let parser = self.parser.clone();
                let pb = pb.clone();
                async move {
                    if is_blank(&line) {
                        pb.inc(1);
                        return (index, None);
                    }

                    let outcome = task::spawn_blocking(move || parser.parse::<T>(&line))
                        .await
                        .unwrap_or_else(|e| {
                            Err(PvsystError::TaskFailed {
                                index,
                                reason: e.to_string(),
                            })
                        });
                    pb.inc(1);
                    (index, Some(outcome))
                }
            })
            .buffer_unordered(concurrent_limit)
            .collect()
            .await;

        pb.finish_and_clear();

        outcomes.sort_by_key(|(index, _)| *index);

        let mut collector = BatchCollector::new();
        for (index, outcome) in outcomes {
            collector.record(index, outcome);
        }
        collector.finish()
    }
}

/// Empty inputs stand for unused slots and are not records
///
/// Whitespace-only inputs count as blank too. The original form tool only
/// skipped truly empty text and parsed `"   "` into an all-default record;
/// a file of lines has no use for such records.
fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Folds per-input outcomes, in index order, into a batch result
struct BatchCollector<T: Specification> {
    aggregate: Aggregate<T>,
    stats: ParseStats,
    failures: Vec<RecordFailure>,
}

impl<T: Specification> BatchCollector<T> {
    fn new() -> Self {
        Self {
            aggregate: Aggregate::new(),
            stats: ParseStats::new(),
            failures: Vec::new(),
        }
    }

    fn record(&mut self, index: usize, outcome: Option<Result<T>>) {
        match outcome {
            None => self.stats.blank_inputs += 1,
            Some(Ok(record)) => {
                self.stats.total_records += 1;
                self.stats.records_parsed += 1;
                self.aggregate.push(record);
            }
            Some(Err(e)) => {
                self.stats.total_records += 1;
                self.stats.records_skipped += 1;
                warn!("Skipping {} record {}: {}", T::KIND, index + 1, e);
                let failure = RecordFailure::from_error(index, &e);
                self.stats
                    .errors
                    .push(format!("{} {}: {}", T::KIND, index + 1, failure.reason));
                self.failures.push(failure);
            }
        }
    }

    fn finish(self) -> BatchResult<T> {
        info!(
            "Parsed {} of {} {} records ({} skipped)",
            self.stats.records_parsed,
            self.stats.total_records,
            T::KIND,
            self.stats.records_skipped
        );

        BatchResult {
            aggregate: self.aggregate,
            stats: self.stats,
            failures: self.failures,
        }
    }
}
