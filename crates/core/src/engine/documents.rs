//! Per-document snapshot registry
//!
//! Each open document has at most one live snapshot. Updates replace it
//! wholesale; readers hold an `Arc` to whichever snapshot was current when
//! they asked, so a replacement never changes what they see.

use crate::fold::{fold_directive_for_line, FoldDirective};
use crate::models::DocumentSnapshot;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Identifier chosen by the host (buffer number, URI, path)
pub type DocumentId = String;

#[derive(Debug)]
struct Entry {
    version: u64,
    snapshot: Arc<DocumentSnapshot>,
}

/// Mapping from document to its current snapshot
#[derive(Debug, Default)]
pub struct DocumentStore {
    entries: HashMap<DocumentId, Entry>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a snapshot built from `version` of the document.
    ///
    /// Returns `false` and keeps the current snapshot when `version` is
    /// older than the one already stored, so a slow re-parse cannot
    /// overwrite a newer result.
    pub fn replace(&mut self, id: &str, version: u64, snapshot: DocumentSnapshot) -> bool {
        if let Some(current) = self.entries.get(id) {
            if version < current.version {
                debug!(document = id, version, current = current.version, "dropped stale snapshot");
                return false;
            }
        }

        self.entries.insert(
            id.to_string(),
            Entry {
                version,
                snapshot: Arc::new(snapshot),
            },
        );
        true
    }

    /// Current snapshot for a document
    pub fn get(&self, id: &str) -> Option<Arc<DocumentSnapshot>> {
        self.entries.get(id).map(|e| Arc::clone(&e.snapshot))
    }

    pub fn version(&self, id: &str) -> Option<u64> {
        self.entries.get(id).map(|e| e.version)
    }

    /// Forget a document; returns whether it was open
    pub fn close(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Fold directive for a line, `NoFold` for unknown documents
    pub fn fold_directive(&self, id: &str, line: usize) -> FoldDirective {
        self.entries
            .get(id)
            .map_or(FoldDirective::NoFold, |e| {
                fold_directive_for_line(line, &e.snapshot)
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Region;

    fn snapshot_with(region: Region) -> DocumentSnapshot {
        DocumentSnapshot {
            regions: vec![region],
            errors: vec![],
        }
    }

    #[test]
    fn test_replace_and_get() {
        let mut store = DocumentStore::new();
        assert!(store.replace("a.py", 1, snapshot_with(Region::new(1, 4, 1))));

        let snap = store.get("a.py").unwrap();
        assert_eq!(snap.regions[0].end_line, 4);
        assert_eq!(store.version("a.py"), Some(1));
        assert_eq!(store.fold_directive("a.py", 1), FoldDirective::StartsAt(1));
    }

    #[test]
    fn test_readers_keep_old_snapshot() {
        let mut store = DocumentStore::new();
        store.replace("a.py", 1, snapshot_with(Region::new(1, 4, 1)));
        let before = store.get("a.py").unwrap();

        store.replace("a.py", 2, snapshot_with(Region::new(2, 9, 1)));

        assert_eq!(before.regions[0].end_line, 4);
        assert_eq!(store.get("a.py").unwrap().regions[0].end_line, 9);
    }

    #[test]
    fn test_stale_version_is_ignored() {
        let mut store = DocumentStore::new();
        store.replace("a.py", 5, snapshot_with(Region::new(1, 4, 1)));

        assert!(!store.replace("a.py", 3, snapshot_with(Region::new(2, 9, 1))));
        assert_eq!(store.get("a.py").unwrap().regions[0].end_line, 4);

        // Same version replaces, as a re-parse of unchanged text does
        assert!(store.replace("a.py", 5, DocumentSnapshot::default()));
    }

    #[test]
    fn test_close() {
        let mut store = DocumentStore::new();
        store.replace("a.py", 1, DocumentSnapshot::default());
        assert_eq!(store.len(), 1);

        assert!(store.close("a.py"));
        assert!(!store.close("a.py"));
        assert!(store.is_empty());
        assert_eq!(store.fold_directive("a.py", 1), FoldDirective::NoFold);
    }
}
