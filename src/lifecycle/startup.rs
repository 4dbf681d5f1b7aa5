//! Startup orchestration.
//!
//! # Responsibilities
//! - Build every handler the config names
//! - Create the server and attach the handlers in config order
//!
//! # Design Decisions
//! - Fail fast: all handlers are constructed before the server exists, so
//!   a bad site path never leaves producers half started
//! - Redirects are attached first so their routes are in place before any
//!   producer starts filling the store

use crate::config::ServerConfig;
use crate::handler::{Handler, HandlerError, JekyllHandler, RedirectHandler, StaticSiteHandler};
use crate::http::Server;

/// Construct the handlers described by `config`.
pub fn build_handlers(config: &ServerConfig) -> Result<Vec<Box<dyn Handler>>, HandlerError> {
    let mut handlers: Vec<Box<dyn Handler>> = Vec::new();

    for redirect in &config.redirects {
        handlers.push(Box::new(RedirectHandler::new(&redirect.prefix, &redirect.destination)?));
    }
    for site in &config.static_sites {
        handlers.push(Box::new(StaticSiteHandler::with_extensions(
            &site.root,
            site.extensions.clone(),
        )?));
    }
    for site in &config.jekyll_sites {
        handlers.push(Box::new(JekyllHandler::new(&site.path)?));
    }

    Ok(handlers)
}

/// Build a server with every configured handler attached.
///
/// Must be called within a tokio runtime.
pub fn build_server(config: &ServerConfig) -> Result<Server, HandlerError> {
    let handlers = build_handlers(config)?;

    let mut server = Server::new(config.clone());
    for handler in &handlers {
        server.add_handler(handler.as_ref())?;
    }

    tracing::info!(
        redirects = config.redirects.len(),
        static_sites = config.static_sites.len(),
        jekyll_sites = config.jekyll_sites.len(),
        "Handlers attached"
    );
    Ok(server)
}
