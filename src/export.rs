//! Reconstructs the presentation-style JSON document from a built filing.
//!
//! Structural inverse of [`crate::transform`]: the five financial-position
//! groups collapse back under one parent key, the two notes groups under
//! theirs, and leaf keys come out in lowerCamel via the same key table the
//! transformer consults.

use crate::error::{MappingError, Result};
use crate::keys::{presentation_name, snake_to_camel};
use crate::schema::Filing;
use serde_json::{Map, Value};

/// Recursively rewrites every key of a JSON tree to lowerCamel.
fn camelize(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| (snake_to_camel(key), camelize(val)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(camelize).collect()),
        other => other.clone(),
    }
}

fn take_section(canonical: &Map<String, Value>, name: &str) -> Result<Value> {
    let section = canonical
        .get(name)
        .ok_or_else(|| MappingError::Integrity(format!("serialized filing lacks '{}'", name)))?;
    Ok(camelize(section))
}

fn presentation_key(canonical: &str) -> Result<String> {
    presentation_name(canonical)
        .map(str::to_string)
        .ok_or_else(|| MappingError::Integrity(format!("no presentation name for '{}'", canonical)))
}

/// Walks a valid filing and emits the nested presentation document expected
/// by downstream consumers. Total over any valid [`Filing`].
pub fn export_filing(filing: &Filing) -> Result<Value> {
    let canonical = serde_json::to_value(filing)?;
    let canonical = canonical
        .as_object()
        .ok_or_else(|| MappingError::Integrity("filing did not serialize to an object".to_string()))?;

    let mut out = Map::new();
    for section in ["filing_information", "directors_statement", "audit_report"] {
        out.insert(presentation_key(section)?, take_section(canonical, section)?);
    }

    let position = canonical
        .get("statement_of_financial_position")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            MappingError::Integrity("serialized filing lacks 'statement_of_financial_position'".to_string())
        })?;
    let mut position_out = Map::new();
    for group in [
        "current_assets",
        "noncurrent_assets",
        "current_liabilities",
        "noncurrent_liabilities",
        "equity",
    ] {
        position_out.insert(presentation_key(group)?, take_section(position, group)?);
    }
    for total in ["total_assets", "total_liabilities"] {
        position_out.insert(presentation_key(total)?, take_section(position, total)?);
    }
    out.insert(
        presentation_key("statement_of_financial_position")?,
        Value::Object(position_out),
    );

    out.insert(
        presentation_key("income_statement")?,
        take_section(canonical, "income_statement")?,
    );

    let notes = canonical
        .get("notes")
        .and_then(Value::as_object)
        .ok_or_else(|| MappingError::Integrity("serialized filing lacks 'notes'".to_string()))?;
    let mut notes_out = Map::new();
    for group in ["trade_and_other_receivables", "trade_and_other_payables"] {
        notes_out.insert(presentation_key(group)?, take_section(notes, group)?);
    }
    out.insert(presentation_key("notes")?, Value::Object(notes_out));

    Ok(Value::Object(out))
}
