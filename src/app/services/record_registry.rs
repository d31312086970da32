//! Provider record registry
//!
//! The single authoritative map from record identifier to committed record
//! for one provider instance. Insertion never overwrites: committing a
//! duplicate identifier is an error, and identifier 0 is reserved as
//! "no record". Records are shared behind `Arc` so the shared-location
//! join can associate one record with arbitrarily many prefixes.

use crate::app::models::GeoRecord;
use crate::constants::RESERVED_RECORD_ID;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Record registry providing O(1) record lookups by identifier
#[derive(Debug, Default)]
pub struct RecordRegistry {
    records: HashMap<u32, Arc<GeoRecord>>,
}

impl RecordRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Commit a finished record, returning the shared handle
    ///
    /// Fails if the identifier is 0 or already present.
    pub fn commit(&mut self, record: GeoRecord) -> Result<Arc<GeoRecord>> {
        if record.id == RESERVED_RECORD_ID {
            return Err(Error::ReservedRecordId);
        }

        match self.records.entry(record.id) {
            std::collections::hash_map::Entry::Vacant(entry) => {
                let shared = Arc::new(record);
                entry.insert(Arc::clone(&shared));
                Ok(shared)
            }
            std::collections::hash_map::Entry::Occupied(entry) => Err(Error::DuplicateRecordId {
                id: *entry.key(),
            }),
        }
    }

    /// Look up a committed record by identifier
    pub fn get(&self, id: u32) -> Option<Arc<GeoRecord>> {
        self.records.get(&id).map(Arc::clone)
    }

    /// Number of committed records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all committed records
    pub fn iter(&self) -> impl Iterator<Item = &Arc<GeoRecord>> {
        self.records.values()
    }

    /// Release all committed records
    ///
    /// Safe to call repeatedly; a cleared registry stays empty.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::ProviderKind;

    fn record(id: u32) -> GeoRecord {
        GeoRecord::new(id, ProviderKind::Maxmind).unwrap()
    }

    #[test]
    fn test_commit_and_lookup() {
        let mut registry = RecordRegistry::new();
        registry.commit(record(1)).unwrap();
        registry.commit(record(2)).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(1).unwrap().id, 1);
        assert!(registry.get(3).is_none());
    }

    #[test]
    fn test_duplicate_identifier_is_rejected() {
        let mut registry = RecordRegistry::new();
        registry.commit(record(7)).unwrap();

        assert!(matches!(
            registry.commit(record(7)),
            Err(Error::DuplicateRecordId { id: 7 })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reserved_identifier_is_rejected() {
        let mut registry = RecordRegistry::new();
        let mut bad = record(1);
        bad.id = 0;

        assert!(matches!(
            registry.commit(bad),
            Err(Error::ReservedRecordId)
        ));
    }

    #[test]
    fn test_shared_handle_points_at_committed_record() {
        let mut registry = RecordRegistry::new();
        let handle = registry.commit(record(9)).unwrap();
        let looked_up = registry.get(9).unwrap();

        assert!(Arc::ptr_eq(&handle, &looked_up));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut registry = RecordRegistry::new();
        registry.commit(record(1)).unwrap();

        registry.clear();
        assert!(registry.is_empty());

        // Clearing again has no effect
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.get(1).is_none());
    }
}
