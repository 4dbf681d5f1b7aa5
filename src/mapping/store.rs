//! Concurrency-safe short path table.
//!
//! # Responsibilities
//! - Hold the authoritative short path → destination table
//! - Apply upsert/delete semantics for incoming records
//! - Serve lookups to concurrent HTTP dispatchers
//!
//! # Design Decisions
//! - Single writer (the ingest drain task), many readers
//! - `parking_lot::RwLock` so readers never block each other
//! - Lookups clone the destination under the read guard; no torn reads

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::mapping::record::MappingRecord;
use crate::observability::metrics;

/// What an upsert did to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A new key was added.
    Inserted,
    /// An existing key now points somewhere else.
    Overwritten { previous: String },
    /// The key already held this destination.
    Unchanged,
    /// The key was deleted.
    Removed,
    /// Delete for a key that was not present.
    Absent,
}

/// Shared handle to the mapping table.
///
/// Cloning is cheap; every clone sees the same table.
#[derive(Debug, Clone, Default)]
pub struct MappingStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MappingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a record to the table.
    ///
    /// Only the ingest drain task calls this outside of tests, which keeps
    /// writes totally ordered.
    pub(crate) fn upsert(&self, record: &MappingRecord) -> Applied {
        let short_path = record.short_path();
        let destination = record.destination();

        let (applied, size) = {
            let mut table = self.inner.write();
            let applied = if record.is_delete() {
                match table.remove(short_path) {
                    Some(_) => Applied::Removed,
                    None => Applied::Absent,
                }
            } else {
                match table.get_mut(short_path) {
                    None => {
                        table.insert(short_path.to_string(), destination.to_string());
                        Applied::Inserted
                    }
                    Some(existing) if existing != destination => {
                        let previous = std::mem::replace(existing, destination.to_string());
                        Applied::Overwritten { previous }
                    }
                    Some(_) => Applied::Unchanged,
                }
            };
            (applied, table.len())
        };

        match &applied {
            Applied::Inserted => {
                tracing::info!(short_path = %short_path, destination = %destination, "New mapping");
                metrics::record_mapping_change("inserted");
            }
            Applied::Overwritten { previous } => {
                tracing::warn!(
                    short_path = %short_path,
                    previous = %previous,
                    destination = %destination,
                    "Overwriting existing mapping"
                );
                metrics::record_mapping_change("overwritten");
            }
            Applied::Removed => {
                tracing::info!(short_path = %short_path, "Removed mapping");
                metrics::record_mapping_change("removed");
            }
            Applied::Unchanged | Applied::Absent => {}
        }
        metrics::record_mapping_count(size);

        applied
    }

    /// Look up the destination for `path`.
    pub fn lookup(&self, path: &str) -> Option<String> {
        self.inner.read().get(path).cloned()
    }

    /// Number of mappings currently held.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
