//! Periodic background reaper.
//!
//! A single long-lived task fires on a fixed interval and runs one sweep per
//! tick. No overlap protection is needed: the sweep is lock-guarded and
//! idempotent, and re-sweeping a clean index is a cheap sort over zero
//! expired entries. No backoff, no jitter.

use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

use crate::engine::Engine;

/// Spawn the reaper on the current tokio runtime.
///
/// Each tick sweeps expired pastes and compacts the antiflood cache. The
/// returned handle can be aborted to stop the reaper; there is no graceful
/// shutdown to coordinate because a sweep is run-to-completion and the next
/// restart rebuilds the index anyway.
pub fn spawn(engine: Engine, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "start reaper");

    tokio::spawn(async move {
        let mut tick = tokio::time::interval(interval);
        // The first tick of a tokio interval completes immediately; consume
        // it so the first sweep happens one full interval after startup.
        tick.tick().await;

        loop {
            tick.tick().await;
            engine.sweep_once();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use sealbin_config::Config;
    use sealbin_core::types::PasteOptions;
    use tempfile::tempdir;

    fn test_engine(dir: &tempfile::TempDir) -> Engine {
        let config = Config {
            root: Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap(),
            depth: 2,
            secret: "secret".to_string(),
            ..Config::default()
        };
        Engine::open(&config).unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reaper_removes_expired_pastes() {
        let dir = tempdir().unwrap();
        let engine = test_engine(&dir);

        let (expired, _) = engine
            .create_paste("doomed".to_string(), PasteOptions::default(), -1)
            .unwrap();
        let (live, _) = engine
            .create_paste("alive".to_string(), PasteOptions::default(), 3600)
            .unwrap();
        assert_eq!(engine.index().len(), 2);

        let handle = spawn(engine.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(80)).await;
        handle.abort();

        assert_eq!(engine.index().len(), 1);
        assert!(engine
            .store()
            .load_paste(&expired.id)
            .unwrap_err()
            .is_not_found());
        assert!(engine.store().load_paste(&live.id).is_ok());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reaper_idles_on_clean_index() {
        let dir = tempdir().unwrap();
        let engine = test_engine(&dir);

        let handle = spawn(engine.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        assert!(engine.index().is_empty());
    }
}
