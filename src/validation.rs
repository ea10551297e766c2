//! Consistency checks over a canonical document or a built filing.
//!
//! Business-rule violations are collected into a [`ValidationReport`], never
//! raised: one validation pass reports every problem it finds. Only numeric
//! fields that cannot be coerced surface as a `calculation_error` entry, and
//! even those do not abort the remaining checks.

use crate::error::Result;
use crate::schema::{
    AccountingStandard, AuditOpinion, Filing, FilingType, FinancialPositionType, PreparationMethod,
    RoundingLevel, StatementType,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Absolute tolerance for all equality checks, in currency units.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

static UEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{9}[A-Z]$").unwrap());
static CURRENCY_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());

pub fn is_valid_uen(value: &str) -> bool {
    UEN_PATTERN.is_match(value)
}

pub fn is_valid_currency_code(value: &str) -> bool {
    CURRENCY_PATTERN.is_match(value)
}

pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// The closed set a string-backed choice field must belong to when non-empty.
pub fn choice_set(field: &str) -> Option<&'static [&'static str]> {
    match field {
        "xbrl_filing_type" => Some(FilingType::VARIANTS),
        "financial_statement_type" => Some(StatementType::VARIANTS),
        "accounting_standard" => Some(AccountingStandard::VARIANTS),
        "financial_position_type" => Some(FinancialPositionType::VARIANTS),
        "rounding_level" => Some(RoundingLevel::VARIANTS),
        "xbrl_preparation_method" => Some(PreparationMethod::VARIANTS),
        "audit_opinion" => Some(AuditOpinion::VARIANTS),
        _ => None,
    }
}

/// Errors for one section: either a single message (the section itself is
/// missing) or a map of field/check names to messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionErrors {
    Message(String),
    Fields(BTreeMap<String, String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: BTreeMap<String, SectionErrors>,
}

impl ValidationReport {
    fn from_errors(errors: BTreeMap<String, SectionErrors>) -> Self {
        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// The message recorded for one field or check of one section, if any.
    pub fn field_error(&self, section: &str, field: &str) -> Option<&str> {
        match self.errors.get(section)? {
            SectionErrors::Fields(fields) => fields.get(field).map(String::as_str),
            SectionErrors::Message(_) => None,
        }
    }
}

pub struct Validator {
    tolerance: f64,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_TOLERANCE)
    }

    /// A validator with a non-default tolerance, for currencies or rounding
    /// levels where 0.01 is too strict or too loose.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Runs the full check battery over a canonical document. All checks run
    /// even when earlier ones fail; the report aggregates every violation
    /// found in a single pass.
    pub fn validate_document(&self, doc: &Value) -> ValidationReport {
        let mut errors = BTreeMap::new();

        match doc.get("filing_information").and_then(Value::as_object) {
            Some(section) => {
                let section_errors = self.validate_filing_information(section);
                if !section_errors.is_empty() {
                    errors.insert(
                        "filing_information".to_string(),
                        SectionErrors::Fields(section_errors),
                    );
                }
            }
            None => {
                errors.insert(
                    "filing_information".to_string(),
                    SectionErrors::Message("Filing information is required".to_string()),
                );
            }
        }

        match doc
            .get("statement_of_financial_position")
            .and_then(Value::as_object)
        {
            Some(section) => {
                let section_errors = self.validate_financial_position(section);
                if !section_errors.is_empty() {
                    errors.insert(
                        "statement_of_financial_position".to_string(),
                        SectionErrors::Fields(section_errors),
                    );
                }
            }
            None => {
                errors.insert(
                    "statement_of_financial_position".to_string(),
                    SectionErrors::Message(
                        "Statement of financial position is required".to_string(),
                    ),
                );
            }
        }

        ValidationReport::from_errors(errors)
    }

    /// Validates an already-built filing, for validate-only requests on
    /// persisted records.
    pub fn validate_filing(&self, filing: &Filing) -> Result<ValidationReport> {
        let doc = serde_json::to_value(filing)?;
        Ok(self.validate_document(&doc))
    }

    fn validate_filing_information(&self, data: &Map<String, Value>) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();

        const REQUIRED_FIELDS: &[&str] = &[
            "company_name",
            "unique_entity_number",
            "current_period_start",
            "current_period_end",
            "xbrl_filing_type",
            "financial_statement_type",
            "accounting_standard",
            "authorisation_date",
            "financial_position_type",
        ];

        for field in REQUIRED_FIELDS {
            let present = match data.get(*field) {
                Some(Value::String(s)) => !s.is_empty(),
                Some(Value::Null) | None => false,
                Some(_) => true,
            };
            if !present {
                errors.insert((*field).to_string(), format!("{} is required", field));
            }
        }

        if let Some(Value::String(uen)) = data.get("unique_entity_number") {
            if !uen.is_empty() && !is_valid_uen(uen) {
                errors.insert(
                    "unique_entity_number".to_string(),
                    "UEN must be 9 digits followed by 1 uppercase letter".to_string(),
                );
            }
        }

        for field in ["presentation_currency", "functional_currency"] {
            if let Some(Value::String(code)) = data.get(field) {
                if !code.is_empty() && !is_valid_currency_code(code) {
                    errors.insert(
                        field.to_string(),
                        "Currency code must be 3 uppercase letters (ISO 4217)".to_string(),
                    );
                }
            }
        }

        if let (Some(Value::String(start)), Some(Value::String(end))) = (
            data.get("current_period_start"),
            data.get("current_period_end"),
        ) {
            if !start.is_empty() && !end.is_empty() {
                match (parse_iso_date(start), parse_iso_date(end)) {
                    (Some(start_date), Some(end_date)) => {
                        // ISO 8601 sorts lexicographically, so the string and
                        // date comparisons agree.
                        if start_date > end_date {
                            errors.insert(
                                "current_period_end".to_string(),
                                "Current period end date must be after start date".to_string(),
                            );
                        }
                    }
                    _ => {
                        errors.insert(
                            "current_period_dates".to_string(),
                            "Invalid date format. Use YYYY-MM-DD format.".to_string(),
                        );
                    }
                }
            }
        }

        errors
    }

    fn validate_financial_position(&self, data: &Map<String, Value>) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();
        let mut calculation_errors = Vec::new();

        const GROUPS: &[(&str, &str, &str)] = &[
            (
                "current_assets",
                "total_current_assets",
                "Current assets total doesn't match sum of components",
            ),
            (
                "noncurrent_assets",
                "total_noncurrent_assets",
                "Non-current assets total doesn't match sum of components",
            ),
            (
                "current_liabilities",
                "total_current_liabilities",
                "Current liabilities total doesn't match sum of components",
            ),
            (
                "noncurrent_liabilities",
                "total_noncurrent_liabilities",
                "Non-current liabilities total doesn't match sum of components",
            ),
        ];

        for (group, total_key, message) in GROUPS {
            let Some(section) = data.get(*group).and_then(Value::as_object) else {
                continue;
            };

            match sum_components(section, total_key) {
                Ok(calculated) => {
                    let declared = match section.get(*total_key) {
                        Some(value) => match coerce_number(value) {
                            Ok(total) => total.unwrap_or(0.0),
                            Err(detail) => {
                                calculation_errors.push(format!("{} in {}", detail, group));
                                continue;
                            }
                        },
                        None => 0.0,
                    };
                    if (calculated - declared).abs() > self.tolerance {
                        errors.insert(format!("{}_total", group), (*message).to_string());
                    }
                }
                Err(detail) => {
                    calculation_errors.push(format!("{} in {}", detail, group));
                }
            }
        }

        // Balance-sheet equation over the statement-level totals.
        let totals = (
            data.get("total_assets"),
            data.get("total_liabilities"),
            data.get("equity")
                .and_then(Value::as_object)
                .and_then(|equity| equity.get("total_equity")),
        );
        if let (Some(assets), Some(liabilities), Some(equity)) = totals {
            match (
                coerce_number(assets),
                coerce_number(liabilities),
                coerce_number(equity),
            ) {
                (Ok(Some(assets)), Ok(Some(liabilities)), Ok(Some(equity))) => {
                    if (assets - (liabilities + equity)).abs() > self.tolerance {
                        errors.insert(
                            "balance_sheet_equation".to_string(),
                            "Total assets must equal total liabilities plus equity".to_string(),
                        );
                    }
                }
                (a, l, e) => {
                    for outcome in [a, l, e] {
                        if let Err(detail) = outcome {
                            calculation_errors
                                .push(format!("{} in balance sheet totals", detail));
                        }
                    }
                }
            }
        }

        if !calculation_errors.is_empty() {
            errors.insert(
                "calculation_error".to_string(),
                format!("Error in financial calculations: {}", calculation_errors.join("; ")),
            );
        }

        errors
    }
}

/// Sums every non-total numeric component of a line-item group. Null values
/// are skipped; anything else non-numeric is a coercion failure.
fn sum_components(section: &Map<String, Value>, total_key: &str) -> std::result::Result<f64, String> {
    let mut sum = 0.0;
    for (key, value) in section {
        if key == total_key {
            continue;
        }
        match coerce_number(value) {
            Ok(Some(number)) => sum += number,
            Ok(None) => {}
            Err(detail) => return Err(detail),
        }
    }
    Ok(sum)
}

fn coerce_number(value: &Value) -> std::result::Result<Option<f64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("value {} is not representable as a number", number)),
        other => Err(format!("value {} is not a number", other)),
    }
}
