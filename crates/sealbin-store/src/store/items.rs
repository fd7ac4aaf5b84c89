//! Save, load, and delete operations for pastes and comments.

use camino::{Utf8Path, Utf8PathBuf};
use sealbin_core::error::SealbinError;
use sealbin_core::id::{ItemId, ID_LEN};
use sealbin_core::types::{Comment, Paste};
use std::fs;
use std::io::ErrorKind;
use tracing::{debug, info};

use super::layout;
use crate::StoreResult;

/// Filesystem persistence for pastes and comments.
///
/// Writes are not atomic: a crash mid-write can leave a corrupt file, an
/// accepted risk given the target media. Two concurrent saves of identical
/// content race to the same path and the later write silently wins; the
/// identifier-content binding means the payload is unchanged by the race.
#[derive(Debug, Clone)]
pub struct ItemStore {
    root: Utf8PathBuf,
    depth: usize,
}

impl ItemStore {
    /// Open a store rooted at `root`, creating the root directory if needed.
    ///
    /// Fails fast on the shard-depth invariant so a misconfigured depth is a
    /// startup error rather than a per-request one.
    pub fn new<P: AsRef<Utf8Path>>(root: P, depth: usize) -> StoreResult<Self> {
        if 2 * depth >= ID_LEN {
            return Err(SealbinError::DepthTooLarge { depth, id_len: ID_LEN });
        }

        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .map_err(|e| SealbinError::io(format!("Failed to create storage root {root}"), e))?;

        Ok(Self { root, depth })
    }

    /// The storage root
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// The configured shard depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Storage path of a paste
    pub fn paste_path(&self, id: &ItemId) -> StoreResult<Utf8PathBuf> {
        let path = layout::resolve(&self.root, id, self.depth)?;
        debug!(%id, %path, "resolved paste storage path");
        Ok(path)
    }

    /// Discussion subtree root of a paste
    pub fn discussion_path(&self, id: &ItemId) -> StoreResult<Utf8PathBuf> {
        layout::discussion_path(&self.root, id, self.depth)
    }

    /// Save a paste to disk.
    pub fn save_paste(&self, paste: &Paste) -> StoreResult<()> {
        info!(id = %paste.id, "save paste");

        let path = self.paste_path(&paste.id)?;
        ensure_parent(&path)?;

        let body = serde_json::to_vec(paste).map_err(|e| SealbinError::Corrupt {
            id: paste.id.to_string(),
            message: format!("serialization failed: {e}"),
        })?;

        fs::write(&path, body)
            .map_err(|e| SealbinError::io(format!("Failed to write paste file {path}"), e))
    }

    /// Load a paste from disk.
    ///
    /// Does not load comments; see [`ItemStore::load_comments`].
    pub fn load_paste(&self, id: &ItemId) -> StoreResult<Paste> {
        debug!(%id, "load paste");

        let path = self.paste_path(id)?;
        let data = fs::read(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                SealbinError::not_found(id)
            } else {
                SealbinError::io(format!("Failed to read paste file {path}"), e)
            }
        })?;

        serde_json::from_slice(&data).map_err(|e| SealbinError::Corrupt {
            id: id.to_string(),
            message: e.to_string(),
        })
    }

    /// Delete a paste from disk.
    ///
    /// When `discussion` is set, the paste's discussion subtree is removed
    /// recursively as well. An already-gone paste file surfaces as an IO
    /// error; callers treat that as a non-fatal sign of a concurrent or
    /// prior deletion, not data loss.
    pub fn delete_paste(&self, id: &ItemId, discussion: bool) -> StoreResult<()> {
        info!(%id, "delete paste");

        let path = self.paste_path(id)?;
        fs::remove_file(&path)
            .map_err(|e| SealbinError::io(format!("Failed to remove paste file {path}"), e))?;

        if discussion {
            let dir = self.discussion_path(id)?;
            if let Err(e) = fs::remove_dir_all(&dir) {
                // A paste with discussion enabled but no comments yet has no
                // subtree on disk.
                if e.kind() != ErrorKind::NotFound {
                    return Err(SealbinError::io(
                        format!("Failed to remove discussion folder {dir}"),
                        e,
                    ));
                }
            }
        }

        Ok(())
    }

    /// Save a comment into a paste's discussion subtree.
    pub fn save_comment(&self, paste: &Paste, comment: &Comment) -> StoreResult<()> {
        info!(id = %comment.id, paste = %paste.id, "save comment");

        let path = self.comment_path(&paste.id, &comment.id)?;
        ensure_parent(&path)?;

        let body = serde_json::to_vec(comment).map_err(|e| SealbinError::Corrupt {
            id: comment.id.to_string(),
            message: format!("serialization failed: {e}"),
        })?;

        fs::write(&path, body)
            .map_err(|e| SealbinError::io(format!("Failed to write comment file {path}"), e))
    }

    /// Load one comment of a paste.
    pub fn load_comment(&self, paste_id: &ItemId, comment_id: &ItemId) -> StoreResult<Comment> {
        debug!(id = %comment_id, paste = %paste_id, "load comment");

        let path = self.comment_path(paste_id, comment_id)?;
        let data = fs::read(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                SealbinError::not_found(comment_id)
            } else {
                SealbinError::io(format!("Failed to read comment file {path}"), e)
            }
        })?;

        serde_json::from_slice(&data).map_err(|e| SealbinError::Corrupt {
            id: comment_id.to_string(),
            message: e.to_string(),
        })
    }

    /// Load every comment of a paste, sorted by post date ascending.
    ///
    /// A paste whose discussion subtree does not exist yet simply has no
    /// comments. The first comment that fails to load aborts the listing.
    pub fn load_comments(&self, paste: &Paste) -> StoreResult<Vec<Comment>> {
        info!(paste = %paste.id, "load comments");

        let dir = self.discussion_path(&paste.id)?;
        let pattern = format!("{dir}/*");
        let matches = glob::glob(&pattern).map_err(|e| {
            SealbinError::io(
                format!("Failed to list discussion folder {dir}"),
                std::io::Error::new(ErrorKind::InvalidInput, e.to_string()),
            )
        })?;

        let mut comments = Vec::new();
        for entry in matches {
            let path = entry.map_err(|e| {
                SealbinError::io(format!("Failed to list discussion folder {dir}"), e.into_error())
            })?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let comment_id = ItemId::parse(&name)?;
            comments.push(self.load_comment(&paste.id, &comment_id)?);
        }

        comments.sort_by_key(|c| c.postdate);
        Ok(comments)
    }

    fn comment_path(&self, paste_id: &ItemId, comment_id: &ItemId) -> StoreResult<Utf8PathBuf> {
        let mut path = self.discussion_path(paste_id)?;
        path.push(comment_id.as_str());
        Ok(path)
    }
}

/// Create the parent directory chain of a path if it is not there yet.
fn ensure_parent(path: &Utf8Path) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| SealbinError::io(format!("Failed to create directory {parent}"), e))?;
    }
    Ok(())
}
