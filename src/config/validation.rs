//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect conflicting redirect prefixes
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Filesystem checks (does the root exist?) happen when handlers are
//!   built, not here

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ServerConfig;
use crate::handler::redirect::is_routable_prefix;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

/// A single semantic problem in the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `redirects[0].prefix`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed config.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::new("listener.bind_address", "must not be empty"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let obs = &config.observability;
    if !LOG_LEVELS.contains(&obs.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level {:?}", obs.log_level),
        ));
    }
    if !LOG_FORMATS.contains(&obs.log_format.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("unknown format {:?}, expected pretty or json", obs.log_format),
        ));
    }
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address {:?}", obs.metrics_address),
        ));
    }

    let mut prefixes = HashSet::new();
    for (i, redirect) in config.redirects.iter().enumerate() {
        let prefix = redirect.prefix.trim_matches('/');
        if prefix.is_empty() {
            errors.push(ValidationError::new(
                format!("redirects[{i}].prefix"),
                "must not be empty",
            ));
        } else if !is_routable_prefix(prefix) {
            errors.push(ValidationError::new(
                format!("redirects[{i}].prefix"),
                format!("prefix {prefix:?} uses route syntax ({{, }}, or a segment starting with : or *)"),
            ));
        } else if !prefixes.insert(prefix) {
            errors.push(ValidationError::new(
                format!("redirects[{i}].prefix"),
                format!("duplicate prefix {prefix:?}"),
            ));
        }

        if let Err(e) = check_destination(&redirect.destination) {
            errors.push(ValidationError::new(
                format!("redirects[{i}].destination"),
                format!("invalid destination {:?}: {e}", redirect.destination),
            ));
        }
    }

    for (i, site) in config.static_sites.iter().enumerate() {
        if site.root.trim().is_empty() {
            errors.push(ValidationError::new(format!("static_sites[{i}].root"), "must not be empty"));
        }
        if site.extensions.is_empty() {
            errors.push(ValidationError::new(
                format!("static_sites[{i}].extensions"),
                "must list at least one extension",
            ));
        }
    }

    for (i, site) in config.jekyll_sites.iter().enumerate() {
        if site.path.trim().is_empty() {
            errors.push(ValidationError::new(format!("jekyll_sites[{i}].path"), "must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_destination(destination: &str) -> Result<(), url::ParseError> {
    match Url::parse(destination) {
        Ok(_) => Ok(()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse("http://redirect.invalid/")?.join(destination).map(|_| ())
        }
        Err(e) => Err(e),
    }
}
