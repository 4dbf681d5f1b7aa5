//! Jekyll site handler.
//!
//! Reads the posts of a Jekyll site once at startup and maps each declared
//! short URL to the post's permalink.
//!
//! # Data Flow
//! ```text
//! _config.yml ──► permalink template, source dir
//! _posts/*    ──► Page (front matter) ──► short URLs + permalink
//!                                              │
//!                                              ▼
//!                                   MappingRecord batch ──► MappingSender
//! ```

pub mod base60;
pub mod page;
pub mod site;

use std::path::PathBuf;

use crate::handler::{Handler, HandlerError};
use crate::mapping::{MappingRecord, MappingSender};

pub use page::Page;
pub use site::Site;

/// Errors reading a Jekyll site.
#[derive(Debug, thiserror::Error)]
pub enum JekyllError {
    #[error("cannot read site config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid site config {path}: {source}")]
    ConfigYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("front matter is not terminated")]
    UnterminatedFrontMatter,

    #[error("invalid front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Serves short URLs declared in the front matter of Jekyll posts.
#[derive(Debug, Clone)]
pub struct JekyllHandler {
    site: Site,
    records: Vec<MappingRecord>,
}

impl JekyllHandler {
    /// Open the site whose `_config.yml` lives in `path`.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, HandlerError> {
        let site = Site::open(path)?;
        let records = site.mappings();
        Ok(Self { site, records })
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn records(&self) -> &[MappingRecord] {
        &self.records
    }
}

impl Handler for JekyllHandler {
    fn name(&self) -> &str {
        "jekyll"
    }

    fn mappings(&self, mappings: MappingSender) -> Result<(), HandlerError> {
        tracing::info!(
            site = %self.site.base().display(),
            posts = self.site.posts().len(),
            mappings = self.records.len(),
            "Jekyll handler added"
        );
        for record in &self.records {
            tracing::debug!(mapping = %record, "Jekyll short URL");
        }
        mappings.send_all(self.records.iter().cloned())?;
        Ok(())
    }
}
