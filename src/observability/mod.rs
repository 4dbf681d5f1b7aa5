//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (redirect counters, mapping store gauge)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event, never formatted strings
//! - Request ID flows through the HTTP trace span
//! - Metric calls are no-ops until a recorder is installed, so library
//!   code and tests record unconditionally

pub mod logging;
pub mod metrics;
