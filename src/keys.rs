//! Key-casing rules shared by import and export.
//!
//! The transformer and the exporter both consult [`SECTION_KEYS`], so the
//! section nesting round-trips by construction. Leaf keys use the
//! camelCase/snake_case conversion pair below; `snake_to_camel` inverts
//! `camel_to_snake` for any lowerCamel key.

use once_cell::sync::Lazy;
use regex::Regex;

/// Presentation-style section key paired with its canonical name.
///
/// Covers the seven top-level sections, the five financial-position children,
/// the two notes children, and the two statement-level totals (which also
/// appear under their legacy spellings `Assets` / `Liabilities` on import).
pub const SECTION_KEYS: &[(&str, &str)] = &[
    ("filingInformation", "filing_information"),
    ("directorsStatement", "directors_statement"),
    ("auditReport", "audit_report"),
    ("statementOfFinancialPosition", "statement_of_financial_position"),
    ("currentAssets", "current_assets"),
    ("nonCurrentAssets", "noncurrent_assets"),
    ("currentLiabilities", "current_liabilities"),
    ("nonCurrentLiabilities", "noncurrent_liabilities"),
    ("equity", "equity"),
    ("incomeStatement", "income_statement"),
    ("notes", "notes"),
    ("tradeAndOtherReceivables", "trade_and_other_receivables"),
    ("tradeAndOtherPayables", "trade_and_other_payables"),
    ("totalAssets", "total_assets"),
    ("totalLiabilities", "total_liabilities"),
];

pub fn presentation_name(canonical: &str) -> Option<&'static str> {
    SECTION_KEYS
        .iter()
        .find(|(_, c)| *c == canonical)
        .map(|(p, _)| *p)
}

pub fn canonical_name(presentation: &str) -> Option<&'static str> {
    SECTION_KEYS
        .iter()
        .find(|(p, _)| *p == presentation)
        .map(|(_, c)| *c)
}

static CAMEL_BOUNDARY_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").unwrap());
static CAMEL_BOUNDARY_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

/// Converts a camelCase or PascalCase key to snake_case.
///
/// Segmentation rule: a separator goes before an uppercase letter that follows
/// a lowercase letter or digit, and before a multi-uppercase run followed by a
/// lowercase letter (so `TypeOfXBRLFiling` becomes `type_of_xbrl_filing`).
/// Keys already in snake_case pass through unchanged.
pub fn camel_to_snake(key: &str) -> String {
    let pass1 = CAMEL_BOUNDARY_WORD.replace_all(key, "${1}_${2}");
    CAMEL_BOUNDARY_TAIL
        .replace_all(&pass1, "${1}_${2}")
        .to_lowercase()
}

/// Converts a snake_case key to lowerCamel, the inverse of [`camel_to_snake`]
/// for keys that started as lowerCamel.
pub fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, part) in key.split('_').filter(|p| !p.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(part);
        } else {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}
