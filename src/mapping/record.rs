//! The unit exchanged between producers and the store.

use std::fmt;

/// An immutable short path → destination association.
///
/// An empty `destination` asks the store to delete `short_path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingRecord {
    short_path: String,
    destination: String,
}

impl MappingRecord {
    /// Create a record. A missing leading `/` on the short path is added.
    pub fn new(short_path: impl Into<String>, destination: impl Into<String>) -> Self {
        let mut short_path = short_path.into();
        if !short_path.starts_with('/') {
            short_path.insert(0, '/');
        }
        Self {
            short_path,
            destination: destination.into(),
        }
    }

    /// Create a record that removes `short_path` from the store.
    pub fn delete(short_path: impl Into<String>) -> Self {
        Self::new(short_path, String::new())
    }

    pub fn short_path(&self) -> &str {
        &self.short_path
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// True if this record is the delete sentinel.
    pub fn is_delete(&self) -> bool {
        self.destination.is_empty()
    }
}

impl fmt::Display for MappingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_delete() {
            write!(f, "{} => (delete)", self.short_path)
        } else {
            write!(f, "{} => {}", self.short_path, self.destination)
        }
    }
}
