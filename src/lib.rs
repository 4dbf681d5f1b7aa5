//! Personal short URL server.
//!
//! Short paths are kept in an in-memory [`MappingStore`]. Producers feed it
//! through a [`MappingSender`]: static HTML sites are scanned for
//! `rel="shortlink"` / `rel="canonical"` pairs and watched for changes, and
//! Jekyll sites contribute short URLs from post front matter. Any request
//! path not claimed by a handler route is redirected from the store.

// Core subsystems
pub mod config;
pub mod handler;
pub mod http;
pub mod mapping;

// Producers
pub mod scan;
pub mod watch;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use handler::{Handler, HandlerError};
pub use http::Server;
pub use lifecycle::Shutdown;
pub use mapping::{MappingRecord, MappingSender, MappingStore};
