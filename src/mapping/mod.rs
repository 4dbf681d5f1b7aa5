//! Dynamic mapping index.
//!
//! # Data Flow
//! ```text
//! Producers (static site watcher, jekyll site, tests, ...)
//!     → MappingSender::send (fire-and-forget, per-producer FIFO)
//!     → ingest.rs (unbounded mpsc, single drain task)
//!     → store.rs (upsert under write lock)
//!
//! Readers:
//!     http dispatcher → MappingStore::lookup (read lock)
//! ```
//!
//! # Design Decisions
//! - Exactly one task mutates the table; everything else only reads
//! - Empty destination is the delete sentinel
//! - Conflicting upserts: last write wins, logged as a warning
//! - Nothing is persisted; producers replay their state on every start

pub mod ingest;
pub mod record;
pub mod store;

pub use ingest::{IngestError, MappingReceiver, MappingSender};
pub use record::MappingRecord;
pub use store::{Applied, MappingStore};
