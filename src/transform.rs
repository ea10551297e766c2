//! Restructures presentation-style JSON into the canonical nested document.

use crate::keys::{camel_to_snake, canonical_name, presentation_name};
use crate::normalizer::normalize_filing_information;
use log::warn;
use serde_json::{Map, Value};

/// Canonical names of the seven top-level sections; their presentation
/// spellings come from the shared key table.
const TOP_LEVEL_SECTIONS: &[&str] = &[
    "filing_information",
    "directors_statement",
    "audit_report",
    "statement_of_financial_position",
    "income_statement",
    "notes",
];

/// Recursively rewrites every key of a JSON tree to snake_case. Non-object
/// values pass through unchanged.
fn transform_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| (camel_to_snake(key), transform_keys(val)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(transform_keys).collect()),
        other => other.clone(),
    }
}

/// Looks a section up under its presentation name (from the shared key
/// table) or its canonical name. Missing or non-object sections default to
/// an empty map.
fn section_object(map: &Map<String, Value>, canonical: &str) -> Value {
    let presentation = presentation_name(canonical).unwrap_or(canonical);
    map.get(presentation)
        .or_else(|| map.get(canonical))
        .filter(|value| value.is_object())
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()))
}

/// Picks the first present key among the accepted spellings of a statement
/// total, defaulting to 0.
fn total_field(section: &Value, spellings: &[&str]) -> Value {
    for key in spellings {
        if let Some(value) = section.get(*key) {
            return value.clone();
        }
    }
    Value::from(0)
}

/// Transforms a presentation-style document into the canonical nested shape.
///
/// Pure over its return value: missing sections default to empty maps, keys
/// are rewritten to snake_case, and the filing-information alias table is
/// applied. Top-level sections that are not part of the canonical layout are
/// dropped from the result and reported on the warning channel.
pub fn transform_document(input: &Value) -> Value {
    let empty = Map::new();
    let map = input.as_object().unwrap_or(&empty);

    for key in map.keys() {
        let canonical = canonical_name(key).unwrap_or(key.as_str());
        if !TOP_LEVEL_SECTIONS.contains(&canonical) {
            warn!("Dropping unrecognized top-level section '{}'", key);
        }
    }

    let mut out = Map::new();

    let filing_information = transform_keys(&section_object(map, "filing_information"));
    let filing_information = match filing_information {
        Value::Object(section) => Value::Object(normalize_filing_information(&section)),
        other => other,
    };
    out.insert("filing_information".to_string(), filing_information);

    out.insert(
        "directors_statement".to_string(),
        transform_keys(&section_object(map, "directors_statement")),
    );
    out.insert(
        "audit_report".to_string(),
        transform_keys(&section_object(map, "audit_report")),
    );

    let position = section_object(map, "statement_of_financial_position");
    let position_map = position.as_object().cloned().unwrap_or_default();
    let mut canonical_position = Map::new();
    for canonical in [
        "current_assets",
        "noncurrent_assets",
        "current_liabilities",
        "noncurrent_liabilities",
        "equity",
    ] {
        canonical_position.insert(
            canonical.to_string(),
            transform_keys(&section_object(&position_map, canonical)),
        );
    }
    canonical_position.insert(
        "total_assets".to_string(),
        total_field(&position, &["Assets", "TotalAssets", "totalAssets", "total_assets"]),
    );
    canonical_position.insert(
        "total_liabilities".to_string(),
        total_field(
            &position,
            &["Liabilities", "TotalLiabilities", "totalLiabilities", "total_liabilities"],
        ),
    );
    out.insert(
        "statement_of_financial_position".to_string(),
        Value::Object(canonical_position),
    );

    out.insert(
        "income_statement".to_string(),
        transform_keys(&section_object(map, "income_statement")),
    );

    let notes = section_object(map, "notes");
    let notes_map = notes.as_object().cloned().unwrap_or_default();
    let mut canonical_notes = Map::new();
    for canonical in ["trade_and_other_receivables", "trade_and_other_payables"] {
        canonical_notes.insert(
            canonical.to_string(),
            transform_keys(&section_object(&notes_map, canonical)),
        );
    }
    out.insert("notes".to_string(), Value::Object(canonical_notes));

    Value::Object(out)
}
