//! Builds the typed [`Filing`] aggregate from a canonical document.
//!
//! Construction runs in dependency order: filing information first, then the
//! directors statement and audit report, the five financial-position groups,
//! the statement of financial position, the income statement, the two notes
//! groups, and finally the aggregate itself. Any failure aborts the whole
//! build; no partial record escapes.

use crate::error::{MappingError, Result};
use crate::schema::{
    AuditReport, CurrentAssets, CurrentLiabilities, DirectorsStatement, Equity, Filing,
    FilingInformation, IncomeStatement, NonCurrentAssets, NonCurrentLiabilities, Notes,
    StatementOfFinancialPosition, TradeAndOtherReceivables,
};
use crate::validation::{choice_set, is_valid_currency_code, is_valid_uen, parse_iso_date};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

fn deserialize_section<T: DeserializeOwned>(name: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|err| MappingError::TypeMismatch {
        section: name.to_string(),
        details: err.to_string(),
    })
}

fn optional_section<T: DeserializeOwned>(root: &Map<String, Value>, name: &str) -> Result<T> {
    let value = root
        .get(name)
        .filter(|value| value.is_object())
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    deserialize_section(name, value)
}

fn required_child(parent: &Map<String, Value>, parent_name: &str, name: &str) -> Result<Value> {
    parent
        .get(name)
        .filter(|value| value.is_object())
        .cloned()
        .ok_or_else(|| {
            MappingError::Integrity(format!("'{}' is missing from {}", name, parent_name))
        })
}

fn total_from(parent: &Map<String, Value>, name: &str) -> Result<f64> {
    match parent.get(name) {
        None | Some(Value::Null) => Ok(0.0),
        Some(value) => value.as_f64().ok_or_else(|| MappingError::TypeMismatch {
            section: "statement_of_financial_position".to_string(),
            details: format!("'{}' must be a number, got {}", name, value),
        }),
    }
}

/// Rejects malformed dates, UEN, currency codes, and out-of-set choice values
/// before any section is constructed. Empty strings mean "not provided" and
/// are left to the completeness check in validation.
fn check_filing_information_formats(info: &FilingInformation) -> Result<()> {
    let dates = [
        ("current_period_start", &info.current_period_start),
        ("current_period_end", &info.current_period_end),
        ("prior_period_start", &info.prior_period_start),
        ("authorisation_date", &info.authorisation_date),
    ];
    for (field, value) in dates {
        if !value.is_empty() && parse_iso_date(value).is_none() {
            return Err(MappingError::InvalidDate {
                field: field.to_string(),
                value: value.clone(),
            });
        }
    }

    if !info.unique_entity_number.is_empty() && !is_valid_uen(&info.unique_entity_number) {
        return Err(MappingError::InvalidUen(info.unique_entity_number.clone()));
    }

    let currencies = [
        ("presentation_currency", &info.presentation_currency),
        ("functional_currency", &info.functional_currency),
    ];
    for (field, value) in currencies {
        if !value.is_empty() && !is_valid_currency_code(value) {
            return Err(MappingError::InvalidCurrencyCode {
                field: field.to_string(),
                value: value.clone(),
            });
        }
    }

    let choices = [
        ("xbrl_filing_type", &info.xbrl_filing_type),
        ("financial_statement_type", &info.financial_statement_type),
        ("accounting_standard", &info.accounting_standard),
        ("financial_position_type", &info.financial_position_type),
        ("rounding_level", &info.rounding_level),
        ("xbrl_preparation_method", &info.xbrl_preparation_method),
    ];
    for (field, value) in choices {
        check_choice(field, value)?;
    }

    Ok(())
}

fn check_choice(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    match choice_set(field) {
        Some(allowed) if !allowed.contains(&value) => Err(MappingError::InvalidChoice {
            field: field.to_string(),
            value: value.to_string(),
            allowed,
        }),
        _ => Ok(()),
    }
}

/// Builds a fully wired [`Filing`] from a canonical document.
///
/// Fails with an integrity error when the filing-information section, the
/// statement of financial position, or any of its five child groups is
/// absent, and with a format error when a field's value does not match its
/// semantic type. Sections not named here default to empty objects.
pub fn build_filing(doc: &Value) -> Result<Filing> {
    let root = doc.as_object().ok_or_else(|| {
        MappingError::Integrity("canonical document must be a JSON object".to_string())
    })?;

    let filing_information: FilingInformation = deserialize_section(
        "filing_information",
        required_child(root, "the document", "filing_information")?,
    )?;
    check_filing_information_formats(&filing_information)?;

    let directors_statement: DirectorsStatement = optional_section(root, "directors_statement")?;
    let audit_report: AuditReport = optional_section(root, "audit_report")?;
    check_choice("audit_opinion", &audit_report.audit_opinion)?;

    let position_value = required_child(root, "the document", "statement_of_financial_position")?;
    let position = position_value
        .as_object()
        .cloned()
        .unwrap_or_default();

    let current_assets: CurrentAssets = deserialize_section(
        "current_assets",
        required_child(&position, "statement_of_financial_position", "current_assets")?,
    )?;
    let noncurrent_assets: NonCurrentAssets = deserialize_section(
        "noncurrent_assets",
        required_child(&position, "statement_of_financial_position", "noncurrent_assets")?,
    )?;
    let current_liabilities: CurrentLiabilities = deserialize_section(
        "current_liabilities",
        required_child(&position, "statement_of_financial_position", "current_liabilities")?,
    )?;
    let noncurrent_liabilities: NonCurrentLiabilities = deserialize_section(
        "noncurrent_liabilities",
        required_child(&position, "statement_of_financial_position", "noncurrent_liabilities")?,
    )?;
    let equity: Equity = deserialize_section(
        "equity",
        required_child(&position, "statement_of_financial_position", "equity")?,
    )?;

    let statement_of_financial_position = StatementOfFinancialPosition {
        total_assets: total_from(&position, "total_assets")?,
        total_liabilities: total_from(&position, "total_liabilities")?,
        current_assets,
        noncurrent_assets,
        current_liabilities,
        noncurrent_liabilities,
        equity,
    };

    let income_statement: IncomeStatement = optional_section(root, "income_statement")?;

    let notes_map = root
        .get("notes")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let trade_and_other_receivables: TradeAndOtherReceivables =
        optional_section(&notes_map, "trade_and_other_receivables")?;
    let trade_and_other_payables: TradeAndOtherReceivables =
        optional_section(&notes_map, "trade_and_other_payables")?;
    let notes = Notes {
        trade_and_other_receivables,
        trade_and_other_payables,
    };

    Ok(Filing {
        filing_information,
        directors_statement,
        audit_report,
        statement_of_financial_position,
        income_statement,
        notes,
    })
}

fn apply_patch<T>(target: &mut T, name: &str, patch: &Map<String, Value>) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let mut value = serde_json::to_value(&*target)?;
    let fields = value.as_object_mut().ok_or_else(|| {
        MappingError::Integrity(format!("section '{}' is not an object", name))
    })?;
    for (key, patch_value) in patch {
        fields.insert(key.clone(), patch_value.clone());
    }
    *target = deserialize_section(name, value)?;
    Ok(())
}

/// Applies a field-level patch to one addressed child section of an existing
/// filing, leaving every other section untouched. Fails with
/// [`MappingError::SectionNotFound`] when the name addresses no section of the
/// aggregate. Unknown keys in the patch are dropped, and patched
/// filing-information or audit-report values go through the same format gate
/// as a fresh build.
pub fn patch_section(filing: &mut Filing, section: &str, patch: &Map<String, Value>) -> Result<()> {
    // Dotted paths address nested children, e.g.
    // "statement_of_financial_position.current_assets". The parent segment
    // must match the aggregate layout.
    let name = match section.split_once('.') {
        None => section,
        Some((parent, child)) => {
            let valid = match parent {
                "statement_of_financial_position" => matches!(
                    child,
                    "current_assets"
                        | "noncurrent_assets"
                        | "current_liabilities"
                        | "noncurrent_liabilities"
                        | "equity"
                ),
                "notes" => matches!(
                    child,
                    "trade_and_other_receivables" | "trade_and_other_payables"
                ),
                _ => false,
            };
            if !valid {
                return Err(MappingError::SectionNotFound(section.to_string()));
            }
            child
        }
    };

    match name {
        "filing_information" => {
            // Patch a candidate first so a failed format check leaves the
            // filing untouched.
            let mut candidate = filing.filing_information.clone();
            apply_patch(&mut candidate, name, patch)?;
            check_filing_information_formats(&candidate)?;
            filing.filing_information = candidate;
            Ok(())
        }
        "directors_statement" => apply_patch(&mut filing.directors_statement, name, patch),
        "audit_report" => {
            let mut candidate = filing.audit_report.clone();
            apply_patch(&mut candidate, name, patch)?;
            check_choice("audit_opinion", &candidate.audit_opinion)?;
            filing.audit_report = candidate;
            Ok(())
        }
        "statement_of_financial_position" => {
            apply_patch(&mut filing.statement_of_financial_position, name, patch)
        }
        "current_assets" => apply_patch(
            &mut filing.statement_of_financial_position.current_assets,
            name,
            patch,
        ),
        "noncurrent_assets" => apply_patch(
            &mut filing.statement_of_financial_position.noncurrent_assets,
            name,
            patch,
        ),
        "current_liabilities" => apply_patch(
            &mut filing.statement_of_financial_position.current_liabilities,
            name,
            patch,
        ),
        "noncurrent_liabilities" => apply_patch(
            &mut filing.statement_of_financial_position.noncurrent_liabilities,
            name,
            patch,
        ),
        "equity" => apply_patch(&mut filing.statement_of_financial_position.equity, name, patch),
        "income_statement" => apply_patch(&mut filing.income_statement, name, patch),
        "trade_and_other_receivables" => apply_patch(
            &mut filing.notes.trade_and_other_receivables,
            name,
            patch,
        ),
        "trade_and_other_payables" => apply_patch(
            &mut filing.notes.trade_and_other_payables,
            name,
            patch,
        ),
        _ => Err(MappingError::SectionNotFound(section.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn canonical_doc() -> Value {
        json!({
            "filing_information": {
                "company_name": "ACME Pte Ltd",
                "unique_entity_number": "201912345A",
                "current_period_start": "2022-01-01",
                "current_period_end": "2022-12-31",
                "xbrl_filing_type": "Full",
                "financial_statement_type": "Company",
                "accounting_standard": "IFRS",
                "authorisation_date": "2023-03-15",
                "financial_position_type": "Classified",
                "presentation_currency": "SGD",
            },
            "directors_statement": {
                "directors_opinion_true_fair_view": true,
                "reasonable_grounds_company_debts": true,
            },
            "audit_report": {"audit_opinion": "Unqualified"},
            "statement_of_financial_position": {
                "current_assets": {"cash_and_bank_balances": 150000.0, "total_current_assets": 150000.0},
                "noncurrent_assets": {},
                "current_liabilities": {},
                "noncurrent_liabilities": {},
                "equity": {"share_capital": 100000.0, "total_equity": 100000.0},
                "total_assets": 150000.0,
                "total_liabilities": 50000.0,
            },
            "income_statement": {"revenue": 1000000.0},
            "notes": {
                "trade_and_other_receivables": {"unbilled_receivables": 5000.0},
                "trade_and_other_payables": {},
            },
        })
    }

    #[test]
    fn test_build_wires_every_section() {
        let filing = build_filing(&canonical_doc()).unwrap();
        assert_eq!(filing.filing_information.company_name, "ACME Pte Ltd");
        assert!(filing.directors_statement.directors_opinion_true_fair_view);
        assert_eq!(filing.audit_report.audit_opinion, "Unqualified");
        assert_eq!(
            filing
                .statement_of_financial_position
                .current_assets
                .cash_and_bank_balances,
            150000.0
        );
        assert_eq!(filing.statement_of_financial_position.total_assets, 150000.0);
        assert_eq!(filing.income_statement.revenue, 1000000.0);
        assert_eq!(filing.notes.trade_and_other_receivables.unbilled_receivables, 5000.0);
    }

    #[test]
    fn test_missing_position_child_is_an_integrity_error() {
        let mut doc = canonical_doc();
        doc["statement_of_financial_position"]
            .as_object_mut()
            .unwrap()
            .remove("equity");

        match build_filing(&doc) {
            Err(MappingError::Integrity(message)) => assert!(message.contains("equity")),
            other => panic!("expected integrity error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_date_is_rejected_before_construction() {
        let mut doc = canonical_doc();
        doc["filing_information"]["authorisation_date"] = json!("15/03/2023");
        assert!(matches!(
            build_filing(&doc),
            Err(MappingError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_choice_outside_closed_set_is_rejected() {
        let mut doc = canonical_doc();
        doc["filing_information"]["accounting_standard"] = json!("GAAP");
        assert!(matches!(
            build_filing(&doc),
            Err(MappingError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn test_boolean_field_holding_a_string_is_rejected() {
        let mut doc = canonical_doc();
        doc["directors_statement"]["directors_opinion_true_fair_view"] = json!("yes");
        assert!(matches!(
            build_filing(&doc),
            Err(MappingError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_patch_updates_only_the_addressed_section() {
        let mut filing = build_filing(&canonical_doc()).unwrap();
        let before = filing.clone();

        let patch = json!({"inventories": 45000.0}).as_object().cloned().unwrap();
        patch_section(&mut filing, "current_assets", &patch).unwrap();

        assert_eq!(
            filing.statement_of_financial_position.current_assets.inventories,
            45000.0
        );
        assert_eq!(
            filing
                .statement_of_financial_position
                .current_assets
                .cash_and_bank_balances,
            150000.0
        );
        assert_eq!(filing.income_statement, before.income_statement);
        assert_eq!(filing.notes, before.notes);
    }

    #[test]
    fn test_patch_unknown_section_is_not_found() {
        let mut filing = build_filing(&canonical_doc()).unwrap();
        let patch = Map::new();
        assert!(matches!(
            patch_section(&mut filing, "cash_flow_statement", &patch),
            Err(MappingError::SectionNotFound(_))
        ));
    }

    #[test]
    fn test_patch_enforces_format_rules() {
        let mut filing = build_filing(&canonical_doc()).unwrap();
        let patch = json!({"unique_entity_number": "BAD"}).as_object().cloned().unwrap();
        assert!(matches!(
            patch_section(&mut filing, "filing_information", &patch),
            Err(MappingError::InvalidUen(_))
        ));
        // The failed patch left the section untouched.
        assert_eq!(filing.filing_information.unique_entity_number, "201912345A");
    }

    #[test]
    fn test_patch_by_dotted_path() {
        let mut filing = build_filing(&canonical_doc()).unwrap();
        let patch = json!({"total_equity": 120000.0}).as_object().cloned().unwrap();
        patch_section(
            &mut filing,
            "statement_of_financial_position.equity",
            &patch,
        )
        .unwrap();
        assert_eq!(filing.statement_of_financial_position.equity.total_equity, 120000.0);
    }

    #[test]
    fn test_patch_rejects_mismatched_dotted_paths() {
        let mut filing = build_filing(&canonical_doc()).unwrap();
        let patch = json!({"total_equity": 120000.0}).as_object().cloned().unwrap();

        for path in [
            "foo.equity",
            "notes.equity",
            "statement_of_financial_position.trade_and_other_payables",
            "statement_of_financial_position.equity.total_equity",
        ] {
            assert!(
                matches!(
                    patch_section(&mut filing, path, &patch),
                    Err(MappingError::SectionNotFound(_))
                ),
                "path '{}' should not resolve",
                path
            );
        }
        // Nothing was applied along the way.
        assert_eq!(filing.statement_of_financial_position.equity.total_equity, 100000.0);
    }
}
