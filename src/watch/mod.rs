//! Filesystem watch producer.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     walkdir over watch root
//!     → add directory watch as each directory is entered
//!     → scan::scan_file for every document
//!     → MappingSender
//!
//! Steady state:
//!     notify callback → unbounded channel → event.rs (WatchEvent)
//!     → Create/Write: rescan path (file or subtree)
//!     → Rename of a directory: add watch
//!     → Remove: ignored
//! ```
//!
//! # Design Decisions
//! - One long-lived task per watch root, independent of the HTTP listener
//! - Watcher errors are logged; the loop keeps going
//! - No delete records are derived from filesystem removals

pub mod event;
pub mod producer;

pub use event::{WatchEvent, WatchKind};
pub use producer::{ScanStats, SiteWatcher, WatchSet};
