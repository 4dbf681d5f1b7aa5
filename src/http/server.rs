//! HTTP server setup.
//!
//! # Responsibilities
//! - Own the mapping store and the ingestion channel
//! - Attach handlers: their routes and their mapping producers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on a listener until shutdown
//!
//! # Design Decisions
//! - One store per server; nothing is global, so tests can run many
//!   servers in one process
//! - The server holds a sender for its whole life, so the drain task
//!   never sees the channel close while serving
//! - Handler routes are matched before the dispatcher fallback

use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler::{Handler, HandlerError};
use crate::http::dispatch::dispatch;
use crate::http::request::MakeRequestUuid;
use crate::mapping::{ingest, MappingSender, MappingStore};

/// The short URL server.
pub struct Server {
    config: ServerConfig,
    routes: Router,
    store: MappingStore,
    mappings: MappingSender,
}

impl Server {
    /// Create a server with an empty mapping store.
    ///
    /// Spawns the task that applies mapping records, so this must be
    /// called within a tokio runtime.
    pub fn new(config: ServerConfig) -> Self {
        let store = MappingStore::new();
        let (mappings, receiver) = ingest::channel();
        tokio::spawn(receiver.drain(store.clone()));

        Self {
            config,
            routes: Router::new(),
            store,
            mappings,
        }
    }

    /// Attach a handler: add its routes and start its mapping producer.
    pub fn add_handler(&mut self, handler: &dyn Handler) -> Result<(), HandlerError> {
        tracing::debug!(handler = handler.name(), "Adding handler");
        let routes = std::mem::take(&mut self.routes);
        self.routes = handler.register(routes);
        handler.mappings(self.mappings.clone())
    }

    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    /// A sender for records from outside any handler.
    pub fn mapping_sender(&self) -> MappingSender {
        self.mappings.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router with all middleware layers.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        let dispatcher = Router::new().fallback(dispatch).with_state(self.store.clone());
        let timeout = Duration::from_secs(self.config.timeouts.request_secs);

        self.routes
            .clone()
            .fallback_service(dispatcher)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(timeout)),
            )
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, mappings = self.store.len(), "HTTP server starting");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
