//! Jekyll site layout and configuration.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::handler::jekyll::page::Page;
use crate::handler::jekyll::JekyllError;
use crate::mapping::MappingRecord;

pub const CONFIG_FILE: &str = "_config.yml";
pub const POSTS_DIR: &str = "_posts";

/// A Jekyll site rooted at the directory holding `_config.yml`.
#[derive(Debug, Clone)]
pub struct Site {
    base: PathBuf,
    config: Mapping,
    posts: Vec<Page>,
}

impl Site {
    /// Read the site configuration and load all posts.
    pub fn open(base: impl Into<PathBuf>) -> Result<Self, JekyllError> {
        let base = base.into();
        let config = parse_config(&base.join(CONFIG_FILE))?;
        let mut site = Self {
            base,
            config,
            posts: Vec::new(),
        };
        site.posts = site.load_posts();
        Ok(site)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn posts(&self) -> &[Page] {
        &self.posts
    }

    fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }

    /// The template used to build post permalinks, with Jekyll's built-in
    /// styles expanded.
    pub fn permalink_template(&self) -> String {
        match self.config_str("permalink").unwrap_or("") {
            "" | "date" => "/:year/:month/:day/:title.html".to_string(),
            "pretty" => "/:year/:month/:day/:title/".to_string(),
            "none" => "/:title.html".to_string(),
            custom => custom.to_string(),
        }
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.base.join(self.config_str("source").unwrap_or("")).join(POSTS_DIR)
    }

    /// Load every post file. Unreadable posts are logged and skipped.
    fn load_posts(&self) -> Vec<Page> {
        let dir = self.posts_dir();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "No posts directory");
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
            .map(|entry| entry.path())
            .collect();
        paths.sort();

        paths
            .iter()
            .filter_map(|path| match Page::open(path) {
                Ok(page) => Some(page),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping post");
                    None
                }
            })
            .collect()
    }

    /// Records for every short URL declared by a post.
    pub fn mappings(&self) -> Vec<MappingRecord> {
        let template = self.permalink_template();
        let mut records = Vec::new();

        for post in &self.posts {
            let short_urls = match post.short_urls() {
                Ok(urls) => urls,
                Err(e) => {
                    tracing::warn!(post = %post.name(), error = %e, "Invalid short URLs");
                    continue;
                }
            };
            if short_urls.is_empty() {
                continue;
            }

            let Some(permalink) = post.permalink(&template) else {
                tracing::warn!(post = %post.name(), "Post has no date or permalink");
                continue;
            };

            records.extend(
                short_urls
                    .iter()
                    .filter(|url| !url.is_empty())
                    .map(|url| MappingRecord::new(url.as_str(), permalink.as_str())),
            );
        }

        records
    }
}

fn parse_config(path: &Path) -> Result<Mapping, JekyllError> {
    let content = std::fs::read_to_string(path).map_err(|source| JekyllError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let value: Value = serde_yaml::from_str(&content).map_err(|source| JekyllError::ConfigYaml {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(JekyllError::InvalidField {
            field: CONFIG_FILE,
            value: format!("{other:?}"),
        }),
    }
}
