//! Handlers attached to the server.
//!
//! # Data Flow
//! ```text
//! Server::add_handler(handler)
//!     → handler.register(router)   (stateless routes, e.g. prefix redirects)
//!     → handler.mappings(sender)   (records for the mapping store)
//!
//! RedirectHandler    → routes only
//! StaticSiteHandler  → spawns a SiteWatcher (live stream of records)
//! JekyllHandler      → sends one batch of records parsed at startup
//! ```
//!
//! # Design Decisions
//! - Construction validates everything a handler needs; failures are
//!   configuration errors and stop startup
//! - After construction, handlers only log; they never fail the server

pub mod jekyll;
pub mod redirect;
pub mod static_site;

use std::path::PathBuf;

use axum::Router;

use crate::mapping::{IngestError, MappingSender};

pub use jekyll::{JekyllError, JekyllHandler};
pub use redirect::RedirectHandler;
pub use static_site::StaticSiteHandler;

/// Errors raised while constructing or attaching a handler.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("invalid redirect prefix {0:?}")]
    InvalidPrefix(String),

    #[error("invalid redirect destination {destination:?}: {source}")]
    InvalidDestination {
        destination: String,
        #[source]
        source: url::ParseError,
    },

    #[error("cannot open {path}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("specified base path {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Jekyll(#[from] JekyllError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// A component that serves short URLs.
///
/// A handler may claim routes of its own, contribute records to the
/// mapping store, or both.
pub trait Handler: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Add any stateless routes this handler serves.
    fn register(&self, router: Router) -> Router {
        router
    }

    /// Start producing mapping records.
    ///
    /// Called once, when the handler is attached. Long-lived producers
    /// spawn their own task and keep `mappings` for the life of the process.
    fn mappings(&self, mappings: MappingSender) -> Result<(), HandlerError> {
        let _ = mappings;
        Ok(())
    }
}
