//! Table-driven renaming of legacy field names to canonical ones.

use crate::keys::camel_to_snake;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Legacy long-form FilingInformation names and their canonical short names.
const FILING_INFORMATION_FIELD_ALIASES: &[(&str, &str)] = &[
    (
        "WhetherTheFinancialStatementsArePreparedOnGoingConcernBasis",
        "is_going_concern",
    ),
    (
        "WhetherThereAreAnyChangesToComparativeAmounts",
        "has_comparative_changes",
    ),
    ("DescriptionOfPresentationCurrency", "presentation_currency"),
    ("DescriptionOfFunctionalCurrency", "functional_currency"),
    ("TypeOfXBRLFiling", "xbrl_filing_type"),
    ("TypeOfStatementOfFinancialPosition", "financial_position_type"),
    (
        "TypeOfAccountingStandardUsedToPrepareFinancialStatements",
        "accounting_standard",
    ),
    (
        "NatureOfFinancialStatementsCompanyLevelOrConsolidated",
        "financial_statement_type",
    ),
    (
        "DateOfAuthorisationForIssueOfFinancialStatements",
        "authorisation_date",
    ),
    // The case-conversion rule puts no separator before a digit run, so the
    // camel spellings of this flag land on `has_more_than50_employees`; the
    // alias table is what carries it back to the canonical name.
    ("HasMoreThan50Employees", "has_more_than_50_employees"),
];

/// A rename table mapping external aliases to canonical field names.
///
/// Each alias is registered both in its original spelling and in its
/// snake_case conversion, so normalization gives the same result whether it
/// runs before or after case conversion. Canonical names are never alias
/// keys, which makes [`AliasTable::normalize`] idempotent.
pub struct AliasTable {
    aliases: HashMap<String, &'static str>,
}

impl AliasTable {
    pub fn new(pairs: &[(&'static str, &'static str)]) -> Self {
        let mut aliases = HashMap::new();
        for (alias, canonical) in pairs {
            aliases.insert((*alias).to_string(), *canonical);
            aliases.insert(camel_to_snake(alias), *canonical);
        }
        Self { aliases }
    }

    pub fn canonical<'a>(&'a self, key: &'a str) -> &'a str {
        self.aliases.get(key).copied().unwrap_or(key)
    }

    /// Renames every aliased key in `section` to its canonical name. Keys with
    /// no alias entry pass through unchanged; values are untouched. Never
    /// fails and never drops a key.
    pub fn normalize(&self, section: &Map<String, Value>) -> Map<String, Value> {
        section
            .iter()
            .map(|(key, value)| (self.canonical(key).to_string(), value.clone()))
            .collect()
    }
}

static FILING_INFORMATION_ALIASES: Lazy<AliasTable> =
    Lazy::new(|| AliasTable::new(FILING_INFORMATION_FIELD_ALIASES));

/// Renames legacy FilingInformation field names to canonical ones.
pub fn normalize_filing_information(section: &Map<String, Value>) -> Map<String, Value> {
    FILING_INFORMATION_ALIASES.normalize(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_renames_legacy_keys_and_keeps_others() {
        let section = as_map(json!({
            "TypeOfXBRLFiling": "Full",
            "DescriptionOfPresentationCurrency": "SGD",
            "company_name": "ACME Pte Ltd",
        }));

        let normalized = normalize_filing_information(&section);
        assert_eq!(normalized["xbrl_filing_type"], "Full");
        assert_eq!(normalized["presentation_currency"], "SGD");
        assert_eq!(normalized["company_name"], "ACME Pte Ltd");
        assert!(!normalized.contains_key("TypeOfXBRLFiling"));
    }

    #[test]
    fn test_snake_case_spelling_of_alias_is_recognized() {
        let section = as_map(json!({
            "type_of_xbrl_filing": "Partial",
        }));

        let normalized = normalize_filing_information(&section);
        assert_eq!(normalized["xbrl_filing_type"], "Partial");
    }

    #[test]
    fn test_employee_flag_reaches_canonical_name_despite_digit_run() {
        // camel_to_snake("hasMoreThan50Employees") yields
        // "has_more_than50_employees"; the alias entry repairs it.
        let section = as_map(json!({
            "has_more_than50_employees": true,
        }));

        let normalized = normalize_filing_information(&section);
        assert_eq!(normalized["has_more_than_50_employees"], true);
        assert!(!normalized.contains_key("has_more_than50_employees"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let section = as_map(json!({
            "TypeOfStatementOfFinancialPosition": "Classified",
            "unique_entity_number": "201912345A",
            "SomeUnmappedKey": 1,
        }));

        let once = normalize_filing_information(&section);
        let twice = normalize_filing_information(&once);
        assert_eq!(once, twice);
    }
}
