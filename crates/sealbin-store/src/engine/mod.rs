//! The storage engine facade handed to request handlers.
//!
//! Owns the item store, the expiration index, and the antiflood cache, and
//! applies the read-side expiry and burn-after-read effects. The engine is
//! cheap to clone; clones share the same index and cache.

use chrono::Utc;
use sealbin_config::Config;
use sealbin_core::error::SealbinError;
use sealbin_core::id::ItemId;
use sealbin_core::token;
use sealbin_core::types::{Comment, Paste, PasteOptions};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::antiflood::AntifloodCache;
use crate::index::ExpirationIndex;
use crate::store::ItemStore;
use crate::StoreResult;

/// The Sealbin storage engine
#[derive(Debug, Clone)]
pub struct Engine {
    store: ItemStore,
    index: Arc<ExpirationIndex>,
    antiflood: Arc<AntifloodCache>,
    secret: Vec<u8>,
}

impl Engine {
    /// Open the engine from configuration: create the storage root, rebuild
    /// the expiration index from a full tree walk, start with an empty
    /// antiflood cache.
    pub fn open(config: &Config) -> StoreResult<Self> {
        let store = ItemStore::new(&config.root, config.depth)?;
        let index = Arc::new(ExpirationIndex::new());
        index.rebuild(&store)?;

        Ok(Self {
            store,
            index,
            antiflood: Arc::new(AntifloodCache::new(Duration::from_secs(
                config.flood_threshold,
            ))),
            secret: config.secret.clone().into_bytes(),
        })
    }

    /// The underlying item store
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// The expiration index
    pub fn index(&self) -> &ExpirationIndex {
        &self.index
    }

    /// Create a paste and return it with its delete token.
    ///
    /// Persists the paste, then registers it in the expiration index. The
    /// two steps are not atomic: a crash in between leaves an on-disk paste
    /// unknown to the index until the next rebuild at restart.
    pub fn create_paste(
        &self,
        data: String,
        options: PasteOptions,
        expire_secs: i64,
    ) -> StoreResult<(Paste, String)> {
        let paste = Paste::new(data, options, expire_secs);
        self.store.save_paste(&paste)?;
        self.index.append(paste.id.clone(), paste.expire);

        let token = token::issue(paste.data.as_bytes(), &self.secret);
        Ok((paste, token))
    }

    /// Attach a comment to a paste, optionally as a reply.
    ///
    /// The paste must exist and have discussion enabled; a reply's parent
    /// comment must exist at write time. Nothing beyond that existence check
    /// validates the reply tree.
    pub fn create_comment(
        &self,
        paste_id: &ItemId,
        data: String,
        author: String,
        highlight: bool,
        parent: Option<&ItemId>,
    ) -> StoreResult<Comment> {
        let paste = self.store.load_paste(paste_id)?;
        if !paste.discussion {
            return Err(SealbinError::CommentsDisabled {
                id: paste_id.to_string(),
            });
        }

        if let Some(parent_id) = parent {
            self.store.load_comment(paste_id, parent_id)?;
        }

        let mut comment = Comment::new(data, author, parent.cloned());
        comment.highlight = highlight;
        self.store.save_comment(&paste, &comment)?;
        Ok(comment)
    }

    /// Read a paste, applying expiry and burn-after-read effects.
    ///
    /// An expired paste is deleted on the spot and reported as NotFound. A
    /// burn paste is deleted after this read but still returned, with its
    /// `burn` flag telling the view layer why it will not be there again.
    /// When discussion is enabled the comments are loaded into the paste.
    pub fn get_paste(&self, id: &ItemId) -> StoreResult<Paste> {
        let mut paste = self.store.load_paste(id)?;

        if paste.has_expired() {
            info!(%id, expire = %paste.expire, "paste has expired, delete");
            if let Err(e) = self.store.delete_paste(id, paste.discussion) {
                error!(%id, error = %e, "cannot delete expired paste");
            }
            return Err(SealbinError::not_found(id));
        }

        if paste.burn {
            info!(%id, "burn paste after reading");
            if let Err(e) = self.store.delete_paste(id, paste.discussion) {
                error!(%id, error = %e, "cannot burn paste");
            }
        }

        if paste.discussion {
            paste.comments = self.store.load_comments(&paste)?;
        }

        Ok(paste)
    }

    /// Delete a paste, gated on its delete token.
    ///
    /// A malformed token is an `InvalidToken` caller error; a well-formed
    /// but wrong token is a `WrongToken` refusal.
    pub fn delete_paste(&self, id: &ItemId, token: &str) -> StoreResult<()> {
        let paste = self.store.load_paste(id)?;

        if !token::validate(paste.data.as_bytes(), token, &self.secret)? {
            return Err(SealbinError::WrongToken { id: id.to_string() });
        }

        self.store.delete_paste(id, paste.discussion)
    }

    /// Recompute the delete token of a paste.
    pub fn delete_token(&self, paste: &Paste) -> String {
        token::issue(paste.data.as_bytes(), &self.secret)
    }

    /// Check whether a client is posting too fast.
    pub fn is_throttled(&self, client: &str) -> bool {
        self.antiflood.is_throttled(client)
    }

    /// Record an accepted post from a client.
    pub fn touch(&self, client: &str) {
        self.antiflood.touch(client)
    }

    /// Run one reaper pass: sweep expired pastes and compact the antiflood
    /// cache. Returns the number of index entries removed.
    pub fn sweep_once(&self) -> usize {
        let removed = self.index.sweep_expired(&self.store, Utc::now());
        let evicted = self.antiflood.evict_stale();
        if removed > 0 || evicted > 0 {
            info!(removed, evicted, "sweep pass");
        }
        removed
    }
}
