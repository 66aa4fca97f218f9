//! Conversion from an aggregate of specifications to a polars DataFrame
//!
//! Columns follow the declared display order of the device kind; a declared
//! column that no record carries is left out of the frame.

use crate::aggregate::Aggregate;
use crate::error::{PvsystError, Result};
use crate::models::{FieldValue, Specification};
use crate::parser::derivation::round_to;
use crate::schema::display_precision;

use polars::prelude::{Column, DataFrame};
use tracing::debug;

/// Build one DataFrame column per present display column
pub fn aggregate_to_dataframe<T: Specification>(aggregate: &Aggregate<T>) -> Result<DataFrame> {
    let column_names = aggregate.present_columns();
    debug!(
        "Converting {} {} records to a DataFrame with {} columns",
        aggregate.len(),
        aggregate.kind(),
        column_names.len()
    );

    let columns = column_names
        .into_iter()
        .map(|name| create_column(name, aggregate.records()))
        .collect::<Result<Vec<_>>>()?;

    Ok(DataFrame::new(columns)?)
}

/// Create a typed column; the first present value decides the dtype
fn create_column<T: Specification>(name: &'static str, records: &[T]) -> Result<Column> {
    let values: Vec<Option<FieldValue>> = records.iter().map(|r| r.value(name)).collect();

    let column = match values.iter().flatten().next() {
        Some(FieldValue::Float(_)) => {
            let floats = values
                .into_iter()
                .map(|value| match value {
                    Some(FieldValue::Float(v)) => Ok(Some(display_value(name, v))),
                    Some(FieldValue::Integer(v)) => Ok(Some(v as f64)),
                    Some(FieldValue::Text(_)) => Err(mixed_types(name)),
                    None => Ok(None),
                })
                .collect::<Result<Vec<Option<f64>>>>()?;
            Column::new(name.into(), floats)
        }
        Some(FieldValue::Integer(_)) => {
            let integers = values
                .into_iter()
                .map(|value| match value {
                    Some(FieldValue::Integer(v)) => Ok(Some(v)),
                    Some(_) => Err(mixed_types(name)),
                    None => Ok(None),
                })
                .collect::<Result<Vec<Option<u64>>>>()?;
            Column::new(name.into(), integers)
        }
        // Text, or a column with no values at all
        _ => {
            let strings: Vec<Option<String>> = values
                .into_iter()
                .map(|value| value.map(|v| v.to_string()))
                .collect();
            Column::new(name.into(), strings)
        }
    };

    Ok(column)
}

/// Float as shown in the consolidated table, with the column's fixed precision
pub fn display_value(column: &str, value: f64) -> f64 {
    match display_precision(column) {
        Some(decimals) => round_to(value, decimals),
        None => value,
    }
}

fn mixed_types(name: &str) -> PvsystError {
    PvsystError::configuration(format!("Column {} mixes value types across records", name))
}
