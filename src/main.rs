//! shortlink-server
//!
//! A personal short URL server built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!   static site ──► watch ──► scan ──┐
//!   (HTML files)                     │ MappingRecord
//!                                    ▼
//!   jekyll site ──► front matter ──► ingest channel ──► drain task ──► MappingStore
//!                                                                        │ lookup
//!   Client ──► http server ──► handler routes (prefix redirects)         │
//!                          └──► dispatcher (fallback) ◄──────────────────┘
//!                                    │
//!                                    ▼
//!                            301 Location / 404
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use shortlink_server::config::{self, RedirectConfig, ServerConfig, StaticSiteConfig};
use shortlink_server::lifecycle::{self, Shutdown};
use shortlink_server::observability;

#[derive(Parser, Debug)]
#[command(name = "shortlink-server", version)]
#[command(about = "Serve short URLs found in your own sites", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the config and PORT.
    #[arg(short, long)]
    addr: Option<String>,

    /// Directory of HTML files to scan and watch. May be repeated.
    #[arg(long = "static-root", value_name = "DIR")]
    static_roots: Vec<String>,

    /// Prefix redirect as PREFIX=DEST. May be repeated.
    #[arg(long = "redirect", value_name = "PREFIX=DEST", value_parser = parse_redirect)]
    redirects: Vec<RedirectConfig>,
}

fn parse_redirect(value: &str) -> Result<RedirectConfig, String> {
    let (prefix, destination) = value
        .split_once('=')
        .ok_or_else(|| format!("expected PREFIX=DEST, got {value:?}"))?;
    Ok(RedirectConfig {
        prefix: prefix.to_string(),
        destination: destination.to_string(),
    })
}

/// Merge the config file, `PORT` and command line flags.
///
/// The file is only parsed here; validation runs once on the merged result
/// so flags can fill in what the file leaves out.
fn resolve_config(cli: Cli, port: Option<String>) -> Result<ServerConfig, config::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(config::ConfigError::Io)?;
            config::parse_config(&content)?
        }
        None => ServerConfig::default(),
    };

    if let Some(port) = port {
        config.listener.bind_address = format!("localhost:{port}");
    }
    if let Some(addr) = cli.addr {
        config.listener.bind_address = addr;
    }
    config.redirects.extend(cli.redirects);
    config
        .static_sites
        .extend(cli.static_roots.into_iter().map(StaticSiteConfig::new));

    config::validate_config(&config).map_err(config::ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(Cli::parse(), std::env::var("PORT").ok())?;

    observability::logging::init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "shortlink-server starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        redirects = config.redirects.len(),
        static_sites = config.static_sites.len(),
        jekyll_sites = config.jekyll_sites.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        observability::metrics::init_metrics(addr)?;
    }

    let server = lifecycle::build_server(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signals = tokio::spawn(lifecycle::wait_for_signal(shutdown.clone()));

    server.run(listener, shutdown.subscribe()).await?;
    signals.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_redirect() {
        let redirect = parse_redirect("w=/wiki/").unwrap();
        assert_eq!(redirect.prefix, "w");
        assert_eq!(redirect.destination, "/wiki/");

        let redirect = parse_redirect("x=http://example/?a=b").unwrap();
        assert_eq!(redirect.destination, "http://example/?a=b");

        assert!(parse_redirect("nope").is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "shortlink-server",
            "--addr",
            "127.0.0.1:9000",
            "--static-root",
            "/a",
            "--static-root",
            "/b",
            "--redirect",
            "w=/wiki/",
        ])
        .unwrap();

        assert_eq!(cli.addr.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(cli.static_roots, vec!["/a", "/b"]);
        assert_eq!(cli.redirects.len(), 1);
    }

    fn cli_with_file(contents: &str, args: &[&str]) -> (tempfile::NamedTempFile, Cli) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, contents.as_bytes()).unwrap();
        let path = file.path().to_string_lossy().into_owned();
        let mut argv = vec!["shortlink-server", "--config", path.as_str()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        (file, cli)
    }

    #[test]
    fn test_flags_complete_config_file() {
        let (_file, cli) = cli_with_file("[listener]\nbind_address = \"\"\n", &["--addr", "127.0.0.1:9000"]);
        let config = resolve_config(cli, None).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");

        let (_file, cli) = cli_with_file("[listener]\nbind_address = \"\"\n", &[]);
        let config = resolve_config(cli, Some("8081".to_string())).unwrap();
        assert_eq!(config.listener.bind_address, "localhost:8081");
    }

    #[test]
    fn test_merged_config_validated_once() {
        let (_file, cli) = cli_with_file("[timeouts]\nrequest_secs = 0\n", &["--redirect", "w=/wiki/"]);
        match resolve_config(cli, None) {
            Err(config::ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "timeouts.request_secs");
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }
}
