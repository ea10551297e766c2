//! The canonical filing model.
//!
//! A [`Filing`] is the aggregate root: it owns every section outright, so the
//! whole record is constructed and dropped as one tree. Closed-set fields
//! (filing type, accounting standard, audit opinion, ...) are stored as the
//! validated strings the taxonomy uses; the choice enums below define the
//! closed sets the builder enforces.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl $name {
            pub const VARIANTS: &'static [&'static str] = &[$($label),+];

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($label => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }
    };
}

choice_enum!(
    /// Scope of the XBRL filing.
    FilingType { Full => "Full", Partial => "Partial" }
);

choice_enum!(
    /// Whether the statements are company-level or consolidated.
    StatementType { Company => "Company", Consolidated => "Consolidated" }
);

choice_enum!(
    /// Accounting standard used to prepare the statements.
    AccountingStandard {
        Sfrs => "SFRS",
        SfrsForSe => "SFRS for SE",
        Ifrs => "IFRS",
        Other => "Other",
    }
);

choice_enum!(
    /// Presentation basis of the statement of financial position.
    FinancialPositionType {
        Classified => "Classified",
        LiquidityBased => "Liquidity-based",
    }
);

choice_enum!(
    /// Rounding applied to reported amounts.
    RoundingLevel {
        Thousands => "Thousands",
        Millions => "Millions",
        Units => "Units",
    }
);

choice_enum!(
    /// How the XBRL file was produced.
    PreparationMethod {
        Automated => "Automated",
        Manual => "Manual",
        Hybrid => "Hybrid",
    }
);

choice_enum!(
    /// Type of opinion in the independent auditor's report.
    AuditOpinion {
        Unqualified => "Unqualified",
        Qualified => "Qualified",
        Adverse => "Adverse",
        Disclaimer => "Disclaimer",
    }
);

/// Entity identity and filing metadata. Every other section is parented to
/// this one; dates are ISO 8601 strings and closed-set fields hold one of the
/// choice-enum labels (empty means not provided).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FilingInformation {
    pub company_name: String,
    /// Unique Entity Number: 9 digits followed by 1 uppercase letter.
    pub unique_entity_number: String,
    pub current_period_start: String,
    pub current_period_end: String,
    pub prior_period_start: String,
    pub xbrl_filing_type: String,
    pub financial_statement_type: String,
    pub accounting_standard: String,
    pub authorisation_date: String,
    pub financial_position_type: String,
    pub is_going_concern: bool,
    pub has_comparative_changes: bool,
    pub presentation_currency: String,
    pub functional_currency: String,
    pub rounding_level: String,
    pub entity_operations_description: String,
    pub principal_place_of_business: String,
    pub has_more_than_50_employees: bool,
    pub parent_entity_name: String,
    pub ultimate_parent_name: String,
    pub taxonomy_version: String,
    pub xbrl_software: String,
    pub xbrl_preparation_method: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DirectorsStatement {
    pub directors_opinion_true_fair_view: bool,
    pub reasonable_grounds_company_debts: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AuditReport {
    pub audit_opinion: String,
    pub auditing_standards: String,
    pub material_uncertainty_going_concern: bool,
    pub proper_accounting_records: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CurrentAssets {
    pub cash_and_bank_balances: f64,
    pub trade_and_other_receivables: f64,
    pub current_finance_lease_receivables: f64,
    pub current_derivative_financial_assets: f64,
    pub current_financial_assets_at_fair_value: f64,
    pub other_current_financial_assets: f64,
    pub development_properties: f64,
    pub inventories: f64,
    pub other_current_nonfinancial_assets: f64,
    pub held_for_sale_assets: f64,
    pub total_current_assets: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NonCurrentAssets {
    pub trade_and_other_receivables: f64,
    pub noncurrent_finance_lease_receivables: f64,
    pub noncurrent_derivative_financial_assets: f64,
    pub noncurrent_financial_assets_at_fair_value: f64,
    pub other_noncurrent_financial_assets: f64,
    pub property_plant_equipment: f64,
    pub investment_properties: f64,
    pub goodwill: f64,
    pub intangible_assets: f64,
    pub investments_in_entities: f64,
    pub deferred_tax_assets: f64,
    pub other_noncurrent_nonfinancial_assets: f64,
    pub total_noncurrent_assets: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CurrentLiabilities {
    pub trade_and_other_payables: f64,
    pub current_loans_and_borrowings: f64,
    pub current_financial_liabilities_at_fair_value: f64,
    pub current_finance_lease_liabilities: f64,
    pub other_current_financial_liabilities: f64,
    pub current_income_tax_liabilities: f64,
    pub current_provisions: f64,
    pub other_current_nonfinancial_liabilities: f64,
    pub liabilities_held_for_sale: f64,
    pub total_current_liabilities: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NonCurrentLiabilities {
    pub trade_and_other_payables: f64,
    pub noncurrent_loans_and_borrowings: f64,
    pub noncurrent_financial_liabilities_at_fair_value: f64,
    pub noncurrent_finance_lease_liabilities: f64,
    pub other_noncurrent_financial_liabilities: f64,
    pub deferred_tax_liabilities: f64,
    pub noncurrent_provisions: f64,
    pub other_noncurrent_nonfinancial_liabilities: f64,
    pub total_noncurrent_liabilities: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Equity {
    pub share_capital: f64,
    pub treasury_shares: f64,
    pub accumulated_profits_losses: f64,
    pub other_reserves: f64,
    pub noncontrolling_interests: f64,
    pub total_equity: f64,
}

/// Statement of financial position: two statement-level totals plus the five
/// line-item groups.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StatementOfFinancialPosition {
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub current_assets: CurrentAssets,
    pub noncurrent_assets: NonCurrentAssets,
    pub current_liabilities: CurrentLiabilities,
    pub noncurrent_liabilities: NonCurrentLiabilities,
    pub equity: Equity,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IncomeStatement {
    pub revenue: f64,
    pub other_income: f64,
    pub employee_expenses: f64,
    pub depreciation_expense: f64,
    pub amortisation_expense: f64,
    pub repairs_and_maintenance_expense: f64,
    pub sales_and_marketing_expense: f64,
    pub other_expenses_by_nature: f64,
    pub other_gains_losses: f64,
    pub finance_costs: f64,
    pub share_of_profit_loss_of_associates_and_joint_ventures_accounted_for_using_equity_method: f64,
    pub profit_loss_before_taxation: f64,
    pub tax_expense_benefit_continuing_operations: f64,
    pub profit_loss_from_discontinued_operations: f64,
    pub profit_loss: f64,
    pub profit_loss_attributable_to_owners_of_company: f64,
    pub profit_loss_attributable_to_noncontrolling_interests: f64,
}

/// Receivables breakdown note. The payables note shares this shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TradeAndOtherReceivables {
    pub receivables_from_third_parties: f64,
    pub receivables_from_related_parties: f64,
    pub unbilled_receivables: f64,
    pub other_receivables: f64,
    pub total_trade_and_other_receivables: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Notes {
    pub trade_and_other_receivables: TradeAndOtherReceivables,
    pub trade_and_other_payables: TradeAndOtherReceivables,
}

/// The filing aggregate. Owns every section; dropping it is the cascade
/// delete of the whole record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Filing {
    pub filing_information: FilingInformation,
    pub directors_statement: DirectorsStatement,
    pub audit_report: AuditReport,
    pub statement_of_financial_position: StatementOfFinancialPosition,
    pub income_statement: IncomeStatement,
    pub notes: Notes,
}

impl Filing {
    /// A fully populated canonical record with zero/empty defaults, used by
    /// callers to discover the expected shape. Date fields carry the
    /// `YYYY-MM-DD` placeholder; the template is a shape reference, not a
    /// buildable filing.
    pub fn template() -> Filing {
        Filing {
            filing_information: FilingInformation {
                current_period_start: "YYYY-MM-DD".to_string(),
                current_period_end: "YYYY-MM-DD".to_string(),
                prior_period_start: "YYYY-MM-DD".to_string(),
                authorisation_date: "YYYY-MM-DD".to_string(),
                is_going_concern: true,
                taxonomy_version: "2022.2".to_string(),
                ..FilingInformation::default()
            },
            directors_statement: DirectorsStatement {
                directors_opinion_true_fair_view: true,
                reasonable_grounds_company_debts: true,
            },
            audit_report: AuditReport {
                proper_accounting_records: true,
                ..AuditReport::default()
            },
            ..Filing::default()
        }
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Filing)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_enum_round_trip() {
        assert_eq!(AccountingStandard::parse("SFRS for SE"), Some(AccountingStandard::SfrsForSe));
        assert_eq!(AccountingStandard::SfrsForSe.as_str(), "SFRS for SE");
        assert_eq!(FinancialPositionType::parse("Liquidity-based"), Some(FinancialPositionType::LiquidityBased));
        assert_eq!(AuditOpinion::parse("Unmodified"), None);
    }

    #[test]
    fn test_template_has_every_section() {
        let template = Filing::template();
        let value = serde_json::to_value(&template).unwrap();
        for section in [
            "filing_information",
            "directors_statement",
            "audit_report",
            "statement_of_financial_position",
            "income_statement",
            "notes",
        ] {
            assert!(value.get(section).is_some(), "missing {}", section);
        }
        assert_eq!(value["filing_information"]["current_period_start"], "YYYY-MM-DD");
        assert_eq!(value["statement_of_financial_position"]["current_assets"]["total_current_assets"], 0.0);
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = Filing::schema_as_json().unwrap();
        assert!(schema_json.contains("unique_entity_number"));
        assert!(schema_json.contains("statement_of_financial_position"));
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let partial: CurrentAssets =
            serde_json::from_value(serde_json::json!({"cash_and_bank_balances": 150000.0})).unwrap();
        assert_eq!(partial.cash_and_bank_balances, 150000.0);
        assert_eq!(partial.total_current_assets, 0.0);
    }
}
