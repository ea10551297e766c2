use thiserror::Error;

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Invalid date in '{field}': '{value}' (expected ISO 8601, YYYY-MM-DD)")]
    InvalidDate { field: String, value: String },

    #[error("Invalid currency code in '{field}': '{value}' (expected 3 uppercase letters, ISO 4217)")]
    InvalidCurrencyCode { field: String, value: String },

    #[error("Invalid UEN '{0}': must be 9 digits followed by 1 uppercase letter")]
    InvalidUen(String),

    #[error("Invalid value in section '{section}': {details}")]
    TypeMismatch { section: String, details: String },

    #[error("Invalid value for '{field}': '{value}' is not one of {allowed:?}")]
    InvalidChoice {
        field: String,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("Cannot establish filing structure: {0}")]
    Integrity(String),

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Filing not found for UEN: {0}")]
    FilingNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MappingError>;
