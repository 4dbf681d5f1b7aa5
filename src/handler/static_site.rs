//! Static HTML site handler.
//!
//! Files are searched for `rel="shortlink"` and `rel="canonical"` links.
//! When both are found, a mapping is registered for the pair. The site is
//! watched, so edits are picked up without a restart.

use std::path::{Path, PathBuf};

use crate::handler::{Handler, HandlerError};
use crate::mapping::MappingSender;
use crate::watch::SiteWatcher;

/// File extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["html", "htm"];

/// Serves short URLs found in a directory of HTML files.
#[derive(Debug, Clone)]
pub struct StaticSiteHandler {
    root: PathBuf,
    extensions: Vec<String>,
}

impl StaticSiteHandler {
    /// Create a handler for the HTML files below `root`.
    ///
    /// Fails if `root` does not exist or is not a directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, HandlerError> {
        let extensions = DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect();
        Self::with_extensions(root, extensions)
    }

    /// Like [`StaticSiteHandler::new`], scanning the given file extensions.
    pub fn with_extensions(root: impl Into<PathBuf>, extensions: Vec<String>) -> Result<Self, HandlerError> {
        let root = root.into();
        let metadata = std::fs::metadata(&root).map_err(|source| HandlerError::Root {
            path: root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(HandlerError::NotADirectory(root));
        }

        Ok(Self { root, extensions })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Handler for StaticSiteHandler {
    fn name(&self) -> &str {
        "static"
    }

    fn mappings(&self, mappings: MappingSender) -> Result<(), HandlerError> {
        tracing::info!(root = %self.root.display(), extensions = ?self.extensions, "Static site handler added");
        SiteWatcher::new(self.root.clone(), self.extensions.clone(), mappings).spawn();
        Ok(())
    }
}
