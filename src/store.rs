//! The persistence collaborator boundary.
//!
//! The core hands a fully built [`Filing`] tree across this seam in one call,
//! which is the per-filing atomicity contract: a store implementation either
//! keeps the whole aggregate or none of it. Dropping the aggregate is the
//! cascade delete. Serializing concurrent updates to the same filing is the
//! store's responsibility, not the core's.

use crate::error::{MappingError, Result};
use crate::schema::Filing;
use log::info;
use std::collections::HashMap;

/// Storage for filing aggregates, keyed by unique entity number.
pub trait FilingStore {
    /// Persists a filing and returns its key. The filing must carry a UEN.
    fn create_filing(&mut self, filing: Filing) -> Result<String>;

    fn get_filing(&self, uen: &str) -> Result<Filing>;

    /// Removes a filing and everything parented to it.
    fn delete_filing(&mut self, uen: &str) -> Result<()>;
}

/// In-memory store used by tests and examples.
#[derive(Debug, Default)]
pub struct MemoryStore {
    filings: HashMap<String, Filing>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.filings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filings.is_empty()
    }
}

impl FilingStore for MemoryStore {
    fn create_filing(&mut self, filing: Filing) -> Result<String> {
        let uen = filing.filing_information.unique_entity_number.clone();
        if uen.is_empty() {
            return Err(MappingError::Integrity(
                "a filing must carry a unique entity number before it can be stored".to_string(),
            ));
        }
        info!("Storing filing for UEN {}", uen);
        self.filings.insert(uen.clone(), filing);
        Ok(uen)
    }

    fn get_filing(&self, uen: &str) -> Result<Filing> {
        self.filings
            .get(uen)
            .cloned()
            .ok_or_else(|| MappingError::FilingNotFound(uen.to_string()))
    }

    fn delete_filing(&mut self, uen: &str) -> Result<()> {
        match self.filings.remove(uen) {
            Some(_) => {
                info!("Deleted filing for UEN {}", uen);
                Ok(())
            }
            None => Err(MappingError::FilingNotFound(uen.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filing_with_uen(uen: &str) -> Filing {
        let mut filing = Filing::default();
        filing.filing_information.unique_entity_number = uen.to_string();
        filing
    }

    #[test]
    fn test_create_get_delete_round_trip() {
        let mut store = MemoryStore::new();
        let uen = store.create_filing(filing_with_uen("201912345A")).unwrap();
        assert_eq!(uen, "201912345A");

        let fetched = store.get_filing("201912345A").unwrap();
        assert_eq!(fetched.filing_information.unique_entity_number, "201912345A");

        store.delete_filing("201912345A").unwrap();
        assert!(store.is_empty());
        assert!(matches!(
            store.get_filing("201912345A"),
            Err(MappingError::FilingNotFound(_))
        ));
    }

    #[test]
    fn test_filing_without_uen_is_rejected() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.create_filing(Filing::default()),
            Err(MappingError::Integrity(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_unknown_uen_is_not_found() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.delete_filing("300012345Z"),
            Err(MappingError::FilingNotFound(_))
        ));
    }
}
