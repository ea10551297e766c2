//! # XBRL Filing Mapper
//!
//! A library for normalizing heterogeneous, semi-structured financial-statement
//! JSON into a canonical, internally consistent filing representation suitable
//! for regulatory XBRL work, and for serializing that representation back to
//! the original presentation shape.
//!
//! ## Core Concepts
//!
//! - **Key Normalizer**: table-driven rename of legacy/long-form field names
//!   to canonical ones
//! - **Schema Transformer**: presentation-style nesting and camelCase keys in,
//!   canonical snake_case document out
//! - **Record Builder**: constructs the typed [`Filing`] aggregate in
//!   dependency order, all-or-nothing
//! - **Consistency Validator**: component-sum and balance-sheet-equation
//!   checks collected into a [`ValidationReport`], never raised
//! - **Export Serializer**: the structural inverse of the transformer
//!
//! ## Example
//!
//! ```rust,ignore
//! use xbrl_filing_mapper::FilingMapper;
//! use serde_json::json;
//!
//! let input = json!({
//!     "filingInformation": {
//!         "CompanyName": "ACME Pte Ltd",
//!         "UniqueEntityNumber": "201912345A",
//!         // ...
//!     },
//!     "statementOfFinancialPosition": { /* ... */ },
//! });
//!
//! let outcome = FilingMapper::import_document(&input)?;
//! assert!(outcome.report.valid);
//! let exported = FilingMapper::export(&outcome.filing)?;
//! ```

pub mod builder;
pub mod error;
pub mod export;
pub mod keys;
pub mod normalizer;
pub mod schema;
pub mod store;
pub mod transform;
pub mod validation;

pub use builder::{build_filing, patch_section};
pub use error::{MappingError, Result};
pub use export::export_filing;
pub use keys::{camel_to_snake, snake_to_camel};
pub use normalizer::{normalize_filing_information, AliasTable};
pub use schema::*;
pub use store::{FilingStore, MemoryStore};
pub use transform::transform_document;
pub use validation::{SectionErrors, ValidationReport, Validator, DEFAULT_TOLERANCE};

use log::{debug, info};
use serde_json::Value;

/// Result of importing one document: the built aggregate plus the consistency
/// report. Build failures abort the import; business-rule violations land in
/// the report and the caller decides whether to proceed.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub filing: Filing,
    pub report: ValidationReport,
}

pub struct FilingMapper;

impl FilingMapper {
    /// Runs the full import pipeline: transform to the canonical shape,
    /// validate, then build the typed aggregate.
    pub fn import_document(input: &Value) -> Result<ImportOutcome> {
        let doc = transform_document(input);
        let report = Validator::new().validate_document(&doc);
        if !report.valid {
            debug!(
                "Document has {} section(s) with consistency violations",
                report.errors.len()
            );
        }

        let filing = build_filing(&doc)?;
        info!(
            "Imported filing for entity '{}' (UEN {})",
            filing.filing_information.company_name,
            filing.filing_information.unique_entity_number
        );

        Ok(ImportOutcome { filing, report })
    }

    /// Validates a document without building anything, for validate-only
    /// requests.
    pub fn validate_document(input: &Value) -> ValidationReport {
        let doc = transform_document(input);
        Validator::new().validate_document(&doc)
    }

    /// Serializes a filing back to the presentation shape.
    pub fn export(filing: &Filing) -> Result<Value> {
        export_filing(filing)
    }

    /// The fixed canonical template with every field present and zero-valued
    /// defaults, for shape discovery.
    pub fn template() -> Filing {
        Filing::template()
    }
}

pub fn import_filing_document(input: &Value) -> Result<ImportOutcome> {
    FilingMapper::import_document(input)
}
