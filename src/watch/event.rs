//! Filesystem events as seen by the watch producer.

use std::path::PathBuf;

use notify::event::{EventKind, ModifyKind, RenameMode};

/// Kind of change reported for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchKind {
    Create,
    Write,
    Remove,
    Rename,
}

/// A single path-level filesystem change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub kind: WatchKind,
}

impl WatchEvent {
    /// Split a notify event into one `WatchEvent` per path.
    ///
    /// Access and metadata-only events carry no content change and yield
    /// nothing. The destination of a rename is reported as a create, since
    /// editors save by renaming a temporary file over the target.
    pub fn from_notify(event: notify::Event) -> Vec<WatchEvent> {
        let kind = match event.kind {
            EventKind::Create(_) => WatchKind::Create,
            EventKind::Remove(_) => WatchKind::Remove,
            EventKind::Modify(ModifyKind::Metadata(_)) => return Vec::new(),
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => WatchKind::Create,
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => return Self::rename_both(event.paths),
            EventKind::Modify(ModifyKind::Name(_)) => WatchKind::Rename,
            EventKind::Modify(_) => WatchKind::Write,
            EventKind::Access(_) | EventKind::Any | EventKind::Other => return Vec::new(),
        };

        event
            .paths
            .into_iter()
            .map(|path| WatchEvent { path, kind })
            .collect()
    }

    /// A paired rename lists the old path first and the new path last. The
    /// new path is content arriving in the tree, so it counts as a create.
    fn rename_both(paths: Vec<PathBuf>) -> Vec<WatchEvent> {
        let last = paths.len().saturating_sub(1);
        paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| WatchEvent {
                path,
                kind: if i == last { WatchKind::Create } else { WatchKind::Rename },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind};

    fn make_event(paths: Vec<&str>, kind: EventKind) -> notify::Event {
        notify::Event {
            kind,
            paths: paths.into_iter().map(PathBuf::from).collect(),
            attrs: Default::default(),
        }
    }

    #[test]
    fn test_create_and_write() {
        let events = WatchEvent::from_notify(make_event(vec!["/site/a.html"], EventKind::Create(CreateKind::File)));
        assert_eq!(events, vec![WatchEvent { path: "/site/a.html".into(), kind: WatchKind::Create }]);

        let events = WatchEvent::from_notify(make_event(
            vec!["/site/a.html"],
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
        ));
        assert_eq!(events[0].kind, WatchKind::Write);
    }

    #[test]
    fn test_remove() {
        let events = WatchEvent::from_notify(make_event(vec!["/site/a.html"], EventKind::Remove(RemoveKind::File)));
        assert_eq!(events[0].kind, WatchKind::Remove);
    }

    #[test]
    fn test_noise_ignored() {
        assert!(WatchEvent::from_notify(make_event(
            vec!["/site/a.html"],
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)),
        ))
        .is_empty());
        assert!(WatchEvent::from_notify(make_event(vec!["/site/a.html"], EventKind::Access(AccessKind::Any))).is_empty());
    }

    #[test]
    fn test_rename_both_ends() {
        let events = WatchEvent::from_notify(make_event(
            vec!["/site/old", "/site/new"],
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
        ));
        assert_eq!(
            events,
            vec![
                WatchEvent { path: "/site/old".into(), kind: WatchKind::Rename },
                WatchEvent { path: "/site/new".into(), kind: WatchKind::Create },
            ]
        );
    }

    #[test]
    fn test_rename_single_end() {
        let events = WatchEvent::from_notify(make_event(
            vec!["/site/new"],
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
        ));
        assert_eq!(events, vec![WatchEvent { path: "/site/new".into(), kind: WatchKind::Create }]);

        let events = WatchEvent::from_notify(make_event(
            vec!["/site/old"],
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
        ));
        assert_eq!(events, vec![WatchEvent { path: "/site/old".into(), kind: WatchKind::Rename }]);
    }
}
