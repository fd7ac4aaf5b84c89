//! Sharded on-disk layout.

use camino::{Utf8Path, Utf8PathBuf};
use sealbin_core::error::SealbinError;
use sealbin_core::id::{ItemId, ID_LEN};

use crate::StoreResult;

/// Directory-name suffix marking a paste's discussion subtree.
///
/// The suffix doubles as the signal the index rebuild walk uses to avoid
/// descending into discussion subtrees as if they were shard directories.
pub const DISCUSSION_SUFFIX: &str = "_";

/// Resolve the storage path of an item under `root`.
///
/// The identifier is split into `depth` two-character shard segments
/// followed by the remainder: with depth 2, `d9441ab2ce8126457ecd` maps to
/// `root/d9/44/1ab2ce8126457ecd`. Sharding bounds the number of files per
/// directory on large corpora.
///
/// Fails with a configuration error when `2 * depth` would consume the
/// whole identifier and leave no file-name remainder.
pub fn resolve(root: &Utf8Path, id: &ItemId, depth: usize) -> StoreResult<Utf8PathBuf> {
    if 2 * depth >= ID_LEN {
        return Err(SealbinError::DepthTooLarge { depth, id_len: ID_LEN });
    }

    let hex = id.as_str();
    let mut path = root.to_path_buf();
    for i in 0..depth {
        path.push(&hex[2 * i..2 * (i + 1)]);
    }
    path.push(&hex[2 * depth..]);
    Ok(path)
}

/// Resolve the discussion subtree root for a paste.
pub fn discussion_path(root: &Utf8Path, id: &ItemId, depth: usize) -> StoreResult<Utf8PathBuf> {
    let path = resolve(root, id, depth)?;
    Ok(Utf8PathBuf::from(format!("{path}{DISCUSSION_SUFFIX}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ItemId {
        ItemId::parse(s).unwrap()
    }

    #[test]
    fn test_resolve_depth_2() {
        let root = Utf8Path::new("/path/to/dir");
        let cases = [
            ("d9441ab2ce8126457ecd", "/path/to/dir/d9/44/1ab2ce8126457ecd"),
            ("77ba9cd915c8e359d973", "/path/to/dir/77/ba/9cd915c8e359d973"),
            ("da39a3ee5e6b4b0d3255", "/path/to/dir/da/39/a3ee5e6b4b0d3255"),
        ];

        for (hex, expected) in cases {
            assert_eq!(resolve(root, &id(hex), 2).unwrap(), expected);
        }
    }

    #[test]
    fn test_resolve_depth_5() {
        let root = Utf8Path::new("/path/to/dir");
        let cases = [
            ("d9441ab2ce8126457ecd", "/path/to/dir/d9/44/1a/b2/ce/8126457ecd"),
            ("77ba9cd915c8e359d973", "/path/to/dir/77/ba/9c/d9/15/c8e359d973"),
            ("da39a3ee5e6b4b0d3255", "/path/to/dir/da/39/a3/ee/5e/6b4b0d3255"),
        ];

        for (hex, expected) in cases {
            assert_eq!(resolve(root, &id(hex), 5).unwrap(), expected);
        }
    }

    #[test]
    fn test_discussion_path_appends_suffix() {
        let root = Utf8Path::new("/path/to/dir");
        let paste = id("d9441ab2ce8126457ecd");
        assert_eq!(
            discussion_path(root, &paste, 2).unwrap(),
            "/path/to/dir/d9/44/1ab2ce8126457ecd_"
        );
    }

    #[test]
    fn test_resolve_depth_0() {
        let root = Utf8Path::new("/data");
        assert_eq!(
            resolve(root, &id("d9441ab2ce8126457ecd"), 0).unwrap(),
            "/data/d9441ab2ce8126457ecd"
        );
    }

    #[test]
    fn test_depth_too_large() {
        let root = Utf8Path::new("/path/to/dir");
        let paste = id("d9441ab2ce8126457ecd");

        // 2 * 10 == 20 leaves no remainder
        assert!(matches!(
            resolve(root, &paste, 10),
            Err(SealbinError::DepthTooLarge { .. })
        ));
        assert!(matches!(
            resolve(root, &paste, 11),
            Err(SealbinError::DepthTooLarge { .. })
        ));
        // Depth 9 still leaves a two-character remainder
        assert!(resolve(root, &paste, 9).is_ok());
    }
}
