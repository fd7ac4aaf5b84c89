//! In-memory expiration index.
//!
//! The index catalogs (identifier, expiry) pairs for live pastes. The
//! filesystem is authoritative; the index is rebuilt from a full tree walk
//! at startup and appended to on every paste save. A single coarse
//! reader/writer lock guards the whole sequence — correctness relies on
//! short critical sections, not on parallelism within the structure.

use camino::Utf8Path;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use sealbin_core::error::SealbinError;
use sealbin_core::id::ItemId;
use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::store::{ItemStore, DISCUSSION_SUFFIX};
use crate::StoreResult;

/// One live paste known to the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Paste identifier
    pub id: ItemId,
    /// Paste expiration date
    pub expire: DateTime<Utc>,
}

/// In-memory catalog of live pastes and their expiration dates
#[derive(Debug, Default)]
pub struct ExpirationIndex {
    entries: RwLock<Vec<IndexEntry>>,
}

impl ExpirationIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entry. Called exactly once per successful paste save.
    pub fn append(&self, id: ItemId, expire: DateTime<Utc>) {
        self.entries.write().push(IndexEntry { id, expire });
    }

    /// Number of indexed pastes
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when no paste is indexed
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of the current entries, in index order
    pub fn entries(&self) -> Vec<IndexEntry> {
        self.entries.read().clone()
    }

    /// Rebuild the index from a full walk of the storage tree.
    ///
    /// Identifiers are reconstructed by accumulating shard path segments
    /// below the root rather than read back from file contents. Discussion
    /// subtrees (directories with the `_` suffix) are skipped. Unreadable or
    /// corrupt entries are logged and skipped, so a single bad legacy file
    /// cannot keep the service from starting; a listing failure on the tree
    /// itself is fatal. Returns the number of indexed pastes.
    pub fn rebuild(&self, store: &ItemStore) -> StoreResult<usize> {
        info!(root = %store.root(), "build paste index");

        let mut fresh = Vec::new();
        let walk = WalkDir::new(store.root())
            .into_iter()
            .filter_entry(|e| !is_discussion_dir(e));

        for entry in walk {
            let entry = entry.map_err(|e| {
                let message = format!("Failed to walk storage tree under {}", store.root());
                match e.into_io_error() {
                    Some(io) => SealbinError::io(message, io),
                    None => SealbinError::io(
                        message,
                        std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop"),
                    ),
                }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(id) = reconstruct_id(store.root(), &entry) else {
                warn!(path = %entry.path().display(), "skip stray file in storage tree");
                continue;
            };

            match store.load_paste(&id) {
                Ok(paste) => fresh.push(IndexEntry {
                    id,
                    expire: paste.expire,
                }),
                Err(e) => warn!(%id, error = %e, "skip unreadable paste during index rebuild"),
            }
        }

        let count = fresh.len();
        *self.entries.write() = fresh;
        info!(entries = count, "paste index built");
        Ok(count)
    }

    /// Delete expired pastes according to index data.
    ///
    /// Under the write lock, sorts the sequence ascending by expiry so the
    /// expired set becomes a contiguous prefix, deletes the backing files
    /// for that prefix, then drops the prefix in one operation. Per-entry
    /// load or delete failures are logged and the entry is dropped
    /// regardless; an orphaned file, if any, is picked up again only on the
    /// next full rebuild. Returns the number of entries removed.
    ///
    /// Post-condition: the index is sorted ascending by expiry. Appends
    /// between sweeps may unsort it again.
    pub fn sweep_expired(&self, store: &ItemStore, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write();
        entries.sort_by_key(|e| e.expire);

        let expired = entries.iter().take_while(|e| e.expire < now).count();

        for entry in &entries[..expired] {
            match store.load_paste(&entry.id) {
                Ok(paste) => {
                    info!(id = %entry.id, expire = %entry.expire, "delete expired paste");
                    if let Err(e) = store.delete_paste(&paste.id, paste.discussion) {
                        error!(id = %entry.id, error = %e, "cannot delete expired paste");
                    }
                }
                Err(e) => warn!(
                    id = %entry.id,
                    error = %e,
                    "expired paste cannot be loaded, maybe already deleted"
                ),
            }
        }

        entries.drain(..expired);
        expired
    }
}

fn is_discussion_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_string_lossy()
            .ends_with(DISCUSSION_SUFFIX)
}

/// Reconstruct a paste identifier from the shard path segments below `root`.
fn reconstruct_id(root: &Utf8Path, entry: &DirEntry) -> Option<ItemId> {
    let rel = entry.path().strip_prefix(root.as_std_path()).ok()?;
    let joined: String = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    ItemId::parse(&joined).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use chrono::Duration;
    use sealbin_core::types::{Comment, Paste, PasteOptions};
    use tempfile::tempdir;

    fn test_store(dir: &tempfile::TempDir) -> ItemStore {
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        ItemStore::new(root, 2).unwrap()
    }

    fn paste_expiring_at(data: &str, expire: DateTime<Utc>) -> Paste {
        let mut paste = Paste::new(data.to_string(), PasteOptions::default(), 0);
        paste.expire = expire;
        paste
    }

    #[test]
    fn test_append_and_len() {
        let index = ExpirationIndex::new();
        assert!(index.is_empty());

        index.append(
            ItemId::parse("d9441ab2ce8126457ecd").unwrap(),
            Utc::now(),
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_rebuild_reconstructs_ids_from_shards() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        let index = ExpirationIndex::new();

        let one = paste_expiring_at("Awesome paste", Utc::now() + Duration::hours(1));
        let two = paste_expiring_at("1337", Utc::now() + Duration::hours(2));
        store.save_paste(&one).unwrap();
        store.save_paste(&two).unwrap();

        let count = index.rebuild(&store).unwrap();
        assert_eq!(count, 2);

        let mut ids: Vec<String> = index
            .entries()
            .into_iter()
            .map(|e| e.id.to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["77ba9cd915c8e359d973", "d9441ab2ce8126457ecd"]);
    }

    #[test]
    fn test_rebuild_skips_discussion_subtrees() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        let index = ExpirationIndex::new();

        let mut paste = paste_expiring_at("discussed paste", Utc::now() + Duration::hours(1));
        paste.discussion = true;
        store.save_paste(&paste).unwrap();

        let comment = Comment::new("a comment".to_string(), "alice".to_string(), None);
        store.save_comment(&paste, &comment).unwrap();

        // Only the paste is indexed, not the comment file
        assert_eq!(index.rebuild(&store).unwrap(), 1);
        assert_eq!(index.entries()[0].id, paste.id);
    }

    #[test]
    fn test_rebuild_skips_corrupt_entries() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        let index = ExpirationIndex::new();

        let good = paste_expiring_at("Awesome paste", Utc::now() + Duration::hours(1));
        let bad = paste_expiring_at("1337", Utc::now() + Duration::hours(1));
        store.save_paste(&good).unwrap();
        store.save_paste(&bad).unwrap();

        let bad_path = store.paste_path(&bad.id).unwrap();
        std::fs::write(&bad_path, b"{ truncated").unwrap();

        // One corrupt legacy file must not prevent startup
        assert_eq!(index.rebuild(&store).unwrap(), 1);
        assert_eq!(index.entries()[0].id, good.id);
    }

    #[test]
    fn test_sweep_removes_exactly_the_expired_prefix() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        let index = ExpirationIndex::new();
        let now = Utc::now();

        let old = paste_expiring_at("ten seconds ago", now - Duration::seconds(10));
        let older = paste_expiring_at("five seconds ago", now - Duration::seconds(5));
        let live = paste_expiring_at("far future", now + Duration::seconds(100));

        // Append out of expiry order on purpose
        for paste in [&live, &old, &older] {
            store.save_paste(paste).unwrap();
            index.append(paste.id.clone(), paste.expire);
        }

        let removed = index.sweep_expired(&store, now);
        assert_eq!(removed, 2);

        // Expired files are gone, the live one is untouched
        assert!(store.load_paste(&old.id).unwrap_err().is_not_found());
        assert!(store.load_paste(&older.id).unwrap_err().is_not_found());
        assert!(store.load_paste(&live.id).is_ok());

        let entries = index.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, live.id);
    }

    #[test]
    fn test_sweep_leaves_index_sorted() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        let index = ExpirationIndex::new();
        let now = Utc::now();

        for (data, offset) in [("c", 300), ("a", 100), ("b", 200)] {
            let paste = paste_expiring_at(data, now + Duration::seconds(offset));
            store.save_paste(&paste).unwrap();
            index.append(paste.id.clone(), paste.expire);
        }

        index.sweep_expired(&store, now);

        let entries = index.entries();
        assert!(entries.windows(2).all(|w| w[0].expire <= w[1].expire));
    }

    #[test]
    fn test_sweep_tolerates_already_deleted_files() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        let index = ExpirationIndex::new();
        let now = Utc::now();

        // Indexed but never saved, as if deleted by a concurrent read
        let ghost = paste_expiring_at("ghost", now - Duration::seconds(1));
        index.append(ghost.id.clone(), ghost.expire);

        // The entry is dropped anyway
        assert_eq!(index.sweep_expired(&store, now), 1);
        assert!(index.is_empty());
    }

    #[test]
    fn test_sweep_on_clean_index_is_cheap_noop() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        let index = ExpirationIndex::new();

        assert_eq!(index.sweep_expired(&store, Utc::now()), 0);
    }
}
