//! Prefix redirect handler.
//!
//! Redirects every request under `/{prefix}` to a destination base URL:
//!
//! ```text
//! prefix = "x", destination = "http://example/"
//!
//!     /x          =>  http://example/
//!     /x/         =>  http://example/
//!     /x/a/b?c=d  =>  http://example/a/b?c=d
//!     /x123       =>  not handled
//! ```

use std::sync::Arc;

use axum::http::Uri;
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use url::{Position, Url};

use crate::handler::{Handler, HandlerError};
use crate::http::dispatch::permanent_redirect;

/// Base for destinations given as paths; stripped again on output.
const RELATIVE_BASE: &str = "http://redirect.invalid/";

/// Redirects a path prefix to a destination base URL.
#[derive(Debug, Clone)]
pub struct RedirectHandler {
    prefix: String,
    destination: Url,
    relative: bool,
}

impl RedirectHandler {
    /// Create a handler for `prefix` (slashes are trimmed) that redirects to
    /// `destination`, either an absolute URL or a path. An empty destination
    /// redirects to `/`.
    pub fn new(prefix: &str, destination: &str) -> Result<Self, HandlerError> {
        let prefix = prefix.trim_matches('/');
        if !is_routable_prefix(prefix) {
            return Err(HandlerError::InvalidPrefix(prefix.to_string()));
        }

        let invalid = |source| HandlerError::InvalidDestination {
            destination: destination.to_string(),
            source,
        };
        let (destination, relative) = match Url::parse(destination) {
            Ok(url) => (url, false),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(RELATIVE_BASE).map_err(invalid)?;
                (base.join(destination).map_err(invalid)?, true)
            }
            Err(e) => return Err(invalid(e)),
        };

        Ok(Self {
            prefix: prefix.to_string(),
            destination,
            relative,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The destination as it will appear in `Location` headers.
    pub fn destination(&self) -> &str {
        self.render(&self.destination)
    }

    /// Compute the redirect target for a request path and query.
    pub fn resolve(&self, path: &str, query: Option<&str>) -> String {
        let rest = path.strip_prefix('/').unwrap_or(path);
        let rest = rest.strip_prefix(self.prefix.as_str()).unwrap_or(rest);
        let rest = rest.strip_prefix('/').unwrap_or(rest);

        // "./" keeps a first segment like "a:b" from parsing as a scheme
        let mut reference = if rest.is_empty() {
            String::new()
        } else {
            format!("./{rest}")
        };
        if let Some(query) = query {
            reference.push('?');
            reference.push_str(query);
        }

        if reference.is_empty() {
            return self.destination().to_string();
        }
        match self.destination.join(&reference) {
            Ok(url) => self.render(&url).to_string(),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Failed to resolve redirect, using destination");
                self.destination().to_string()
            }
        }
    }

    fn render<'a>(&self, url: &'a Url) -> &'a str {
        if self.relative {
            &url[Position::BeforePath..]
        } else {
            url.as_str()
        }
    }

    fn respond(&self, uri: &Uri) -> Response {
        permanent_redirect(&self.resolve(uri.path(), uri.query()))
    }
}

/// True if `prefix` (slashes already trimmed) can be used as a literal
/// route. Braces and segments starting with `:` or `*` are route syntax.
pub fn is_routable_prefix(prefix: &str) -> bool {
    !prefix.contains(['{', '}'])
        && prefix
            .split('/')
            .all(|segment| !segment.starts_with([':', '*']))
}

impl Handler for RedirectHandler {
    fn name(&self) -> &str {
        "redirect"
    }

    fn register(&self, router: Router) -> Router {
        tracing::info!(prefix = %self.prefix, destination = %self.destination(), "New redirect handler");

        let this = Arc::new(self.clone());
        let handler = move |uri: Uri| {
            let this = Arc::clone(&this);
            async move { this.respond(&uri) }
        };

        if self.prefix.is_empty() {
            return router
                .route("/", any(handler.clone()))
                .route("/{*rest}", any(handler));
        }

        let base = format!("/{}", self.prefix);
        router
            .route(&base, any(handler.clone()))
            .route(&format!("{base}/"), any(handler.clone()))
            .route(&format!("{base}/{{*rest}}"), any(handler))
    }
}
