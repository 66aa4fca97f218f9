//! Tests for token splitting and per-type coercion

use super::super::field_parsers::{
    extract_field, extract_fields, get_token, parse_float, parse_integer, split_record,
};
use super::line_with;
use crate::config::{CoercionPolicy, ParserConfig};
use crate::error::PvsystError;
use crate::models::FieldValue;
use crate::schema::{FieldSpec, INVERTER_SCHEMA, PANEL_SCHEMA, TrimPolicy, columns::*};

#[test]
fn test_split_record_keeps_whitespace_and_empty_tokens() {
    assert_eq!(split_record("a; b ;;c;"), vec!["a", " b ", "", "c", ""]);
    assert_eq!(split_record(""), vec![""]);
}

#[test]
fn test_get_token_applies_trim_policy() {
    let tokens = split_record("0;  Acme  ");

    let trimmed = FieldSpec::string(MANUFACTURER, 1);
    assert_eq!(get_token(&tokens, &trimmed), Some("Acme"));

    let kept = FieldSpec {
        trim: TrimPolicy::Keep,
        ..FieldSpec::string(MANUFACTURER, 1)
    };
    assert_eq!(get_token(&tokens, &kept), Some("  Acme  "));

    assert_eq!(get_token(&tokens, &FieldSpec::string(MODEL, 2)), None);
}

#[test]
fn test_parse_integer_requires_plain_digits() {
    assert_eq!(parse_integer("72"), Some(72));
    assert_eq!(parse_integer(" 60 "), Some(60));
    assert_eq!(parse_integer("6.0"), None);
    assert_eq!(parse_integer("-3"), None);
    assert_eq!(parse_integer("+3"), None);
    assert_eq!(parse_integer("72 cells"), None);
    assert_eq!(parse_integer("99999999999"), Some(99_999_999_999));
    assert_eq!(parse_integer("18446744073709551616"), None);
    assert_eq!(parse_integer(""), None);
}

#[test]
fn test_parse_float() {
    assert_eq!(parse_float("350"), Some(350.0));
    assert_eq!(parse_float(" -0.37 "), Some(-0.37));
    assert_eq!(parse_float("1e3"), Some(1000.0));
    assert_eq!(parse_float("N/A"), None);
    assert_eq!(parse_float("1,5"), None);
}

#[test]
fn test_out_of_range_fields_resolve_to_defaults() {
    let tokens = split_record("0");
    let config = ParserConfig::default();

    for spec in PANEL_SCHEMA.fields {
        let value = extract_field(&tokens, spec, &config).unwrap();
        assert_eq!(value, spec.default.to_value(), "field {}", spec.name);
    }
}

#[test]
fn test_blank_numeric_token_resolves_to_default() {
    let line = line_with(8, &[(7, "   ")]);
    let tokens = split_record(&line);
    let spec = FieldSpec::float(NOMINAL_POWER_W, 7);

    let value = extract_field(&tokens, &spec, &ParserConfig::default()).unwrap();
    assert_eq!(value, FieldValue::Float(0.0));
}

#[test]
fn test_string_field_is_trimmed() {
    let line = line_with(13, &[(12, "  Mono  ")]);
    let tokens = split_record(&line);
    let spec = FieldSpec::string(PHASE, 12);

    let value = extract_field(&tokens, &spec, &ParserConfig::default()).unwrap();
    assert_eq!(value, FieldValue::Text("Mono".to_string()));
}

#[test]
fn test_strict_float_rejects_text() {
    let line = line_with(8, &[(7, "N/A")]);
    let tokens = split_record(&line);
    let spec = FieldSpec::float(NOMINAL_POWER_W, 7);

    let error = extract_field(&tokens, &spec, &ParserConfig::default()).unwrap_err();
    match error {
        PvsystError::MalformedField {
            field,
            position,
            value,
            expected,
        } => {
            assert_eq!(field, NOMINAL_POWER_W);
            assert_eq!(position, 7);
            assert_eq!(value, "N/A");
            assert_eq!(expected, "float");
        }
        other => panic!("expected MalformedField, got {:?}", other),
    }
}

#[test]
fn test_lenient_float_falls_back_to_default() {
    let line = line_with(8, &[(7, "N/A")]);
    let tokens = split_record(&line);
    let spec = FieldSpec::float(NOMINAL_POWER_W, 7);
    let config = ParserConfig::default().with_float_policy(CoercionPolicy::Lenient);

    let value = extract_field(&tokens, &spec, &config).unwrap();
    assert_eq!(value, FieldValue::Float(0.0));
}

#[test]
fn test_integer_policy() {
    let line = line_with(13, &[(12, "72a")]);
    let tokens = split_record(&line);
    let spec = FieldSpec::integer(CELLS_IN_SERIES, 12);

    let lenient = extract_field(&tokens, &spec, &ParserConfig::default()).unwrap();
    assert_eq!(lenient, FieldValue::Integer(0));

    let strict = ParserConfig::default().with_integer_policy(CoercionPolicy::Strict);
    assert!(matches!(
        extract_field(&tokens, &spec, &strict),
        Err(PvsystError::MalformedField { position: 12, .. })
    ));
}

#[test]
fn test_large_cell_count_is_kept() {
    let line = line_with(13, &[(12, "99999999999")]);
    let tokens = split_record(&line);
    let spec = FieldSpec::integer(CELLS_IN_SERIES, 12);
    let strict = ParserConfig::default().with_integer_policy(CoercionPolicy::Strict);

    let value = extract_field(&tokens, &spec, &strict).unwrap();
    assert_eq!(value, FieldValue::Integer(99_999_999_999));
}

#[test]
fn test_integer_overflow_has_its_own_diagnostic() {
    let line = line_with(13, &[(12, "18446744073709551616")]);
    let tokens = split_record(&line);
    let spec = FieldSpec::integer(CELLS_IN_SERIES, 12);
    let strict = ParserConfig::default().with_integer_policy(CoercionPolicy::Strict);

    let error = extract_field(&tokens, &spec, &strict).unwrap_err();
    assert!(matches!(
        error,
        PvsystError::MalformedField {
            expected: "integer no larger than u64::MAX",
            ..
        }
    ));

    // Non-digit content keeps the plain type name
    let line = line_with(13, &[(12, "72a")]);
    let tokens = split_record(&line);
    assert!(matches!(
        extract_field(&tokens, &spec, &strict),
        Err(PvsystError::MalformedField {
            expected: "integer",
            ..
        })
    ));
}

#[test]
fn test_frequency_policy() {
    let line = line_with(14, &[(13, "variable")]);
    let tokens = split_record(&line);
    let spec = FieldSpec::frequency(FREQUENCY_HZ, 13);

    let lenient = extract_field(&tokens, &spec, &ParserConfig::default()).unwrap();
    assert_eq!(lenient, FieldValue::Float(0.0));

    let strict = ParserConfig::default().with_frequency_policy(CoercionPolicy::Strict);
    assert!(matches!(
        extract_field(&tokens, &spec, &strict),
        Err(PvsystError::MalformedField {
            expected: "frequency",
            ..
        })
    ));
}

#[test]
fn test_extract_fields_covers_whole_schema() {
    let tokens = split_record("");
    let fields = extract_fields(&tokens, &INVERTER_SCHEMA, &ParserConfig::default()).unwrap();

    assert_eq!(fields.len(), INVERTER_SCHEMA.fields.len());
    assert_eq!(fields.get(PHASE), Some(&FieldValue::Text(String::new())));
    assert_eq!(fields.get(FREQUENCY_HZ), Some(&FieldValue::Float(0.0)));
}
