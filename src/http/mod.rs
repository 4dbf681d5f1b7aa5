//! HTTP surface of the server.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum router, request ID, tracing, timeout)
//!     → handler routes (e.g. prefix redirects)
//!     → dispatch.rs (fallback: mapping store lookup)
//!     → 301 Location / 404
//! ```

pub mod dispatch;
pub mod request;
pub mod server;

pub use dispatch::{dispatch, permanent_redirect};
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::Server;
