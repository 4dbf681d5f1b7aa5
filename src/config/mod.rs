//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → CLI flags and PORT override applied in main
//!     → lifecycle::startup builds handlers from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    JekyllSiteConfig, ListenerConfig, ObservabilityConfig, RedirectConfig, ServerConfig, StaticSiteConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
