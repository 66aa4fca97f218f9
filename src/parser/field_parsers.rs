//! Field parsing utilities for PVsyst component records
//!
//! This module splits a raw export line into tokens and resolves each
//! [`FieldSpec`] to a typed value, applying the default-on-absence rule and the
//! configured [`CoercionPolicy`] for malformed content.

use tracing::debug;

use super::derivation::try_normalize_frequency;
use crate::config::{CoercionPolicy, ParserConfig};
use crate::constants::FIELD_DELIMITER;
use crate::error::{PvsystError, Result};
use crate::models::{ExtractedFields, FieldValue};
use crate::schema::{FieldSchema, FieldSpec, SemanticType, TrimPolicy};

/// Split a raw line into its zero-indexed tokens without trimming
pub fn split_record(raw: &str) -> Vec<&str> {
    raw.split(FIELD_DELIMITER).collect()
}

/// Token at the field's position with its trim policy applied, `None` if out of range
pub fn get_token<'a>(tokens: &[&'a str], spec: &FieldSpec) -> Option<&'a str> {
    tokens.get(spec.position).map(|token| match spec.trim {
        TrimPolicy::Trim => token.trim(),
        TrimPolicy::Keep => *token,
    })
}

/// Parse a float token
pub fn parse_float(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok()
}

/// Parse an integer token, accepted only when every character is an ASCII digit
pub fn parse_integer(token: &str) -> Option<u64> {
    let token = token.trim();
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse::<u64>().ok()
}

/// Resolve one field from the token sequence
pub fn extract_field(
    tokens: &[&str],
    spec: &FieldSpec,
    config: &ParserConfig,
) -> Result<FieldValue> {
    let Some(token) = get_token(tokens, spec) else {
        return Ok(spec.default.to_value());
    };

    // Empty strings are already their own default
    if spec.semantic_type != SemanticType::String && token.trim().is_empty() {
        return Ok(spec.default.to_value());
    }

    let coerced = match spec.semantic_type {
        SemanticType::String => return Ok(FieldValue::Text(token.to_string())),
        SemanticType::Float => parse_float(token).map(FieldValue::Float),
        SemanticType::Integer => parse_integer(token).map(FieldValue::Integer),
        SemanticType::Frequency => try_normalize_frequency(token).map(FieldValue::Float),
    };

    match coerced {
        Some(value) => Ok(value),
        None => match config.policy_for(spec.semantic_type) {
            CoercionPolicy::Strict => Err(PvsystError::MalformedField {
                field: spec.name,
                position: spec.position,
                value: token.to_string(),
                expected: expected_description(spec, token),
            }),
            CoercionPolicy::Lenient => {
                debug!(
                    "Falling back to default for {} = '{}' (not a valid {})",
                    spec.name, token, spec.semantic_type
                );
                Ok(spec.default.to_value())
            }
        },
    }
}

/// What a rejected token should have been, for the failure diagnostic
fn expected_description(spec: &FieldSpec, token: &str) -> &'static str {
    let token = token.trim();
    match spec.semantic_type {
        SemanticType::Integer if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) => {
            "integer no larger than u64::MAX"
        }
        other => other.as_str(),
    }
}

/// Resolve every field of a schema, stopping at the first strict failure
pub fn extract_fields(
    tokens: &[&str],
    schema: &FieldSchema,
    config: &ParserConfig,
) -> Result<ExtractedFields> {
    let mut fields = ExtractedFields::new();
    for spec in schema.fields {
        let value = extract_field(tokens, spec, config)?;
        fields.insert(spec.name, value);
    }
    Ok(fields)
}
