//! Tests for ordered sequential and concurrent batch parsing

use super::super::batch::BatchParser;
use super::{line_with, sample_inverter_line, sample_panel_line};
use crate::config::ParserConfig;
use crate::models::{InverterSpecification, PanelSpecification};
use crate::schema::columns::NOMINAL_AC_POWER_KW;

fn inverter_models(records: &[InverterSpecification]) -> Vec<&str> {
    records.iter().map(|r| r.model.as_str()).collect()
}

fn inverter_batch_with_failure() -> Vec<String> {
    vec![
        sample_inverter_line("A", "50"),
        line_with(14, &[(1, "SMA"), (2, "B"), (7, "N/A"), (13, "50")]),
        sample_inverter_line("C", "60Hz"),
    ]
}

#[test]
fn test_failed_record_is_excluded_in_order() {
    let result = BatchParser::default()
        .parse_batch::<InverterSpecification, _, _>(inverter_batch_with_failure());

    assert_eq!(inverter_models(result.aggregate.records()), vec!["A", "C"]);
    assert_eq!(result.stats.total_records, 3);
    assert_eq!(result.stats.records_parsed, 2);
    assert_eq!(result.stats.records_skipped, 1);
    assert_eq!(result.stats.errors.len(), 1);
    assert!(result.has_failures());

    let failure = &result.failures[0];
    assert_eq!(failure.index, 1);
    assert_eq!(failure.field.as_deref(), Some(NOMINAL_AC_POWER_KW));
    assert!(failure.reason.contains("N/A"));
}

#[test]
fn test_blank_inputs_are_skipped() {
    let lines = vec![
        String::new(),
        sample_panel_line("A", "350", "1700", "1000"),
        "   ".to_string(),
    ];
    let result = BatchParser::default().parse_batch::<PanelSpecification, _, _>(&lines);

    assert_eq!(result.record_count(), 1);
    assert_eq!(result.stats.blank_inputs, 2);
    assert_eq!(result.stats.total_records, 1);
    assert!(result.stats.all_parsed());
}

#[test]
fn test_empty_batch() {
    let result = BatchParser::default().parse_batch::<PanelSpecification, _, _>(Vec::<String>::new());

    assert!(result.aggregate.is_empty());
    assert_eq!(result.stats.total_records, 0);
    assert!(!result.has_failures());
}

#[tokio::test]
async fn test_concurrent_batch_matches_sequential() {
    let lines: Vec<String> = (0..60)
        .map(|i| {
            let model = format!("M{:02}", i);
            if i % 7 == 3 {
                line_with(8, &[(2, model.as_str()), (7, "N/A")])
            } else {
                sample_panel_line(&model, &format!("{}", 300 + i), "1700", "1000")
            }
        })
        .collect();

    let parser = BatchParser::new(ParserConfig::default().with_max_concurrent_records(4));
    let sequential = parser.parse_batch::<PanelSpecification, _, _>(&lines);
    let concurrent = parser
        .parse_batch_concurrent::<PanelSpecification>(lines)
        .await;

    assert_eq!(concurrent.aggregate, sequential.aggregate);
    assert_eq!(concurrent.stats, sequential.stats);
    assert_eq!(concurrent.failures, sequential.failures);
    assert_eq!(concurrent.stats.records_skipped, 9);

    let failed: Vec<usize> = concurrent.failures.iter().map(|f| f.index).collect();
    assert_eq!(failed, vec![3, 10, 17, 24, 31, 38, 45, 52, 59]);
}

#[tokio::test]
async fn test_concurrent_batch_counts_blank_inputs() {
    let lines = vec![
        sample_inverter_line("A", "50"),
        String::new(),
        sample_inverter_line("B", "50/60"),
    ];
    let result = BatchParser::default()
        .parse_batch_concurrent::<InverterSpecification>(lines)
        .await;

    assert_eq!(inverter_models(result.aggregate.records()), vec!["A", "B"]);
    assert_eq!(result.stats.blank_inputs, 1);
}
