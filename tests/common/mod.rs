//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use shortlink_server::config::ServerConfig;
use shortlink_server::{MappingSender, MappingStore, Server, Shutdown};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: MappingStore,
    pub mappings: MappingSender,
    shutdown: Shutdown,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Stop the server and wait for it to exit.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let result = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not shut down");
        result.unwrap().unwrap();
    }
}

/// Config suitable for tests: ephemeral port, defaults elsewhere.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config
}

/// Serve `server` on 127.0.0.1 with an OS-assigned port.
pub async fn start(server: Server) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let store = server.store().clone();
    let mappings = server.mapping_sender();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer {
        addr,
        store,
        mappings,
        shutdown,
        handle,
    }
}

/// HTTP client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// Poll `check` until it yields a value or five seconds pass.
pub async fn wait_for<T, F, Fut>(mut check: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for _ in 0..250 {
        if let Some(value) = check().await {
            return Some(value);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    None
}

/// Location header of a response, if any.
pub fn location(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string())
}

/// An HTML page declaring `short` as a shortlink for `canonical`.
pub fn page(short: &str, canonical: &str) -> String {
    format!(
        r#"<html><head><link rel="shortlink" href="{short}"><link rel="canonical" href="{canonical}"></head><body></body></html>"#
    )
}
