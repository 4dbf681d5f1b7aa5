//! Static site watch producer.
//!
//! # Responsibilities
//! - Walk the watch root and emit records for every HTML document
//! - Register a watch on every directory the walk enters
//! - Re-scan changed files and subtrees as events arrive
//!
//! # Design Decisions
//! - Directory watches are added as the walk enters each directory, before
//!   its files are read, so a write right after the initial scan is seen
//! - Walks run on the blocking pool; the watcher is moved in and out
//! - Remove and rename never produce delete records; a removed document's
//!   mappings stay until something overwrites them
//! - Symlinked documents are followed; symlinked directories are not walked

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use walkdir::WalkDir;

use crate::mapping::MappingSender;
use crate::scan::scan_file;
use crate::watch::event::{WatchEvent, WatchKind};

/// Counters for one walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub documents: usize,
    pub records: usize,
    pub directories: usize,
}

/// The set of directories under watch.
///
/// Wraps an optional watcher so scanning still works when the platform
/// watcher could not be created.
pub struct WatchSet {
    watcher: Option<RecommendedWatcher>,
}

impl WatchSet {
    /// A set that records nothing. Walks still emit records.
    pub fn disabled() -> Self {
        Self { watcher: None }
    }

    fn new(watcher: RecommendedWatcher) -> Self {
        Self { watcher: Some(watcher) }
    }

    /// Watch a single directory (non-recursively).
    fn add(&mut self, dir: &Path) {
        let Some(watcher) = self.watcher.as_mut() else {
            return;
        };
        if let Err(e) = watcher.watch(dir, RecursiveMode::NonRecursive) {
            tracing::error!(path = %dir.display(), error = %e, "Failed to watch directory");
        } else {
            tracing::trace!(path = %dir.display(), "Watching directory");
        }
    }

    fn is_enabled(&self) -> bool {
        self.watcher.is_some()
    }
}

/// Walks and scans documents below a root.
struct DocumentScanner {
    extensions: Vec<String>,
    mappings: MappingSender,
}

impl DocumentScanner {
    fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    /// Scan `path`, which may be a single file or a directory tree.
    fn scan_path(&self, path: &Path, watches: &mut WatchSet) -> ScanStats {
        let mut stats = ScanStats::default();

        for entry in WalkDir::new(path) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Error walking directory");
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                watches.add(entry.path());
                stats.directories += 1;
                continue;
            }
            // symlinks are read through; a dangling one fails in scan_file
            if !(file_type.is_file() || file_type.is_symlink()) || !self.is_document(entry.path()) {
                continue;
            }

            let records = match scan_file(entry.path()) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(file = %entry.path().display(), error = %e, "Skipping unreadable document");
                    continue;
                }
            };
            stats.documents += 1;

            for record in records {
                tracing::debug!(file = %entry.path().display(), mapping = %record, "Found shortlink");
                if let Err(e) = self.mappings.send(record) {
                    tracing::error!(error = %e, "Mapping store is gone, stopping scan");
                    return stats;
                }
                stats.records += 1;
            }
        }

        stats
    }
}

/// Long-lived producer for one static site.
pub struct SiteWatcher {
    root: PathBuf,
    scanner: Arc<DocumentScanner>,
}

impl SiteWatcher {
    /// Create a producer for `root`, scanning files whose extension is in
    /// `extensions` (case-insensitive).
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>, mappings: MappingSender) -> Self {
        Self {
            root: root.into(),
            scanner: Arc::new(DocumentScanner { extensions, mappings }),
        }
    }

    /// Run the producer on its own task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Initial scan, then watch for changes for as long as the watcher lives.
    pub async fn run(self) {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<notify::Event>>();

        let watches = match notify::recommended_watcher(move |res| {
            let _ = event_tx.send(res);
        }) {
            Ok(watcher) => WatchSet::new(watcher),
            Err(e) => {
                tracing::error!(root = %self.root.display(), error = %e, "Failed to create file watcher");
                WatchSet::disabled()
            }
        };

        let Some((mut watches, stats)) = self.scan_blocking(self.root.clone(), watches).await else {
            return;
        };
        tracing::info!(
            root = %self.root.display(),
            documents = stats.documents,
            mappings = stats.records,
            directories = stats.directories,
            "Initial scan complete"
        );

        if !watches.is_enabled() {
            tracing::warn!(root = %self.root.display(), "Not watching for changes");
            return;
        }

        while let Some(result) = event_rx.recv().await {
            let event = match result {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!(root = %self.root.display(), error = %e, "Watch error");
                    continue;
                }
            };

            for change in WatchEvent::from_notify(event) {
                watches = match self.handle(change, watches).await {
                    Some(watches) => watches,
                    None => return,
                };
            }
        }
    }

    /// Apply one event. Returns the watch set, or `None` if the blocking
    /// scan task died and the watcher with it.
    async fn handle(&self, change: WatchEvent, mut watches: WatchSet) -> Option<WatchSet> {
        let WatchEvent { path, kind } = change;

        match kind {
            WatchKind::Remove => {
                tracing::trace!(path = %path.display(), "Ignoring removal");
                Some(watches)
            }
            WatchKind::Rename => {
                if tokio::fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false) {
                    watches.add(&path);
                }
                Some(watches)
            }
            WatchKind::Create | WatchKind::Write => {
                let metadata = match tokio::fs::metadata(&path).await {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Error reading file stats");
                        return Some(watches);
                    }
                };
                if metadata.is_file() && !self.scanner.is_document(&path) {
                    return Some(watches);
                }

                tracing::debug!(path = %path.display(), kind = ?kind, "Rescanning");
                let (watches, stats) = self.scan_blocking(path, watches).await?;
                tracing::debug!(documents = stats.documents, mappings = stats.records, "Rescan complete");
                Some(watches)
            }
        }
    }

    async fn scan_blocking(&self, path: PathBuf, mut watches: WatchSet) -> Option<(WatchSet, ScanStats)> {
        let scanner = Arc::clone(&self.scanner);
        let task = tokio::task::spawn_blocking(move || {
            let stats = scanner.scan_path(&path, &mut watches);
            (watches, stats)
        });

        match task.await {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::error!(root = %self.root.display(), error = %e, "Scan task failed, watcher stopped");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{ingest, MappingStore};
    use std::fs;

    fn scanner(mappings: MappingSender) -> DocumentScanner {
        DocumentScanner {
            extensions: vec!["html".into(), "htm".into()],
            mappings,
        }
    }

    fn page(short: &str, canonical: &str) -> String {
        format!(r#"<html><head><link rel="shortlink" href="{short}"><link rel="canonical" href="{canonical}"></head></html>"#)
    }

    #[test]
    fn test_is_document() {
        let (tx, _rx) = ingest::channel();
        let scanner = scanner(tx);
        assert!(scanner.is_document(Path::new("/a/index.html")));
        assert!(scanner.is_document(Path::new("/a/INDEX.HTM")));
        assert!(!scanner.is_document(Path::new("/a/style.css")));
        assert!(!scanner.is_document(Path::new("/a/html")));
    }

    #[tokio::test]
    async fn test_scan_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("2014/05")).unwrap();
        fs::write(dir.path().join("index.html"), page("/s", "/")).unwrap();
        fs::write(dir.path().join("2014/05/test.html"), page("/b/1f", "/2014/05/test.html")).unwrap();
        fs::write(dir.path().join("2014/notes.txt"), page("/t", "/nope")).unwrap();
        fs::write(dir.path().join("2014/plain.html"), "<p>no links</p>").unwrap();

        let store = MappingStore::new();
        let (tx, rx) = ingest::channel();
        let stats = scanner(tx).scan_path(dir.path(), &mut WatchSet::disabled());

        assert_eq!(stats.documents, 3);
        assert_eq!(stats.records, 2);
        assert_eq!(stats.directories, 3);

        rx.drain(store.clone()).await;
        assert_eq!(store.lookup("/s").as_deref(), Some("/"));
        assert_eq!(store.lookup("/b/1f").as_deref(), Some("/2014/05/test.html"));
        assert_eq!(store.lookup("/t"), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_document_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.html"), page("/s", "/p")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.html"), dir.path().join("broken.html")).unwrap();

        let (tx, rx) = ingest::channel();
        let stats = scanner(tx).scan_path(dir.path(), &mut WatchSet::disabled());
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.records, 1);

        let store = MappingStore::new();
        rx.drain(store.clone()).await;
        assert_eq!(store.lookup("/s").as_deref(), Some("/p"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_document_is_scanned() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let target = outside.path().join("real.html");
        fs::write(&target, page("/l", "/linked")).unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("link.html")).unwrap();

        let (tx, rx) = ingest::channel();
        let stats = scanner(tx).scan_path(dir.path(), &mut WatchSet::disabled());
        assert_eq!(stats.documents, 1);

        let store = MappingStore::new();
        rx.drain(store.clone()).await;
        assert_eq!(store.lookup("/l").as_deref(), Some("/linked"));
    }

    #[tokio::test]
    async fn test_scan_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.html");
        fs::write(&file, page("/s", "/p")).unwrap();
        fs::write(dir.path().join("b.html"), page("/other", "/q")).unwrap();

        let (tx, rx) = ingest::channel();
        let stats = scanner(tx).scan_path(&file, &mut WatchSet::disabled());
        assert_eq!(stats.documents, 1);

        let store = MappingStore::new();
        rx.drain(store.clone()).await;
        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup("/s").as_deref(), Some("/p"));
    }

    #[tokio::test]
    async fn test_run_scans_before_watching() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.html"), page("/s", "/p1")).unwrap();

        let store = MappingStore::new();
        let (tx, rx) = ingest::channel();
        tokio::spawn(rx.drain(store.clone()));
        let handle = SiteWatcher::new(dir.path(), vec!["html".into()], tx).spawn();

        let mut found = None;
        for _ in 0..100 {
            found = store.lookup("/s");
            if found.is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert_eq!(found.as_deref(), Some("/p1"));
        assert!(!handle.is_finished());
        handle.abort();
    }
}
