//! Command handlers.

use anyhow::{bail, Context, Result};
use camino::Utf8PathBuf;
use sealbin_config::Config;
use sealbin_core::id::ItemId;
use sealbin_core::types::PasteOptions;
use sealbin_store::{reaper, Engine};
use std::io::Read;
use std::time::Duration;
use tracing::info;

#[allow(clippy::too_many_arguments)]
pub fn post(
    engine: &Engine,
    file: Option<Utf8PathBuf>,
    burn: bool,
    highlight: bool,
    discussion: bool,
    expire: i64,
    client: Option<String>,
) -> Result<()> {
    if let Some(client) = &client {
        if engine.is_throttled(client) {
            bail!("please wait before posting again");
        }
    }

    let data = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read payload file {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let options = PasteOptions {
        burn,
        highlight,
        discussion,
    };
    let (paste, token) = engine.create_paste(data, options, expire)?;

    if let Some(client) = &client {
        engine.touch(client);
    }

    println!("id:     {}", paste.id);
    println!("expire: {}", paste.expire);
    println!("delete: {token}");
    Ok(())
}

pub fn show(engine: &Engine, id: &str) -> Result<()> {
    let id = ItemId::parse(id)?;
    let paste = engine.get_paste(&id)?;

    println!("id:         {}", paste.id);
    println!("postdate:   {}", paste.postdate);
    println!("expire:     {}", paste.expire);
    println!("burn:       {}", paste.burn);
    println!("discussion: {}", paste.discussion);
    println!("{}", paste.data);

    for comment in &paste.comments {
        println!("--- {} ({} at {})", comment.id, comment.author, comment.postdate);
        println!("{}", comment.data);
    }
    Ok(())
}

pub fn delete(engine: &Engine, id: &str, token: &str) -> Result<()> {
    let id = ItemId::parse(id)?;
    engine.delete_paste(&id, token)?;
    println!("deleted {id}");
    Ok(())
}

pub fn sweep(engine: &Engine) -> Result<()> {
    let removed = engine.sweep_once();
    println!("removed {removed} expired pastes");
    Ok(())
}

pub fn reap(engine: Engine, config: &Config) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("failed to create async runtime")?;

    rt.block_on(async {
        let handle = reaper::spawn(engine, Duration::from_secs(config.reap_interval));
        tokio::signal::ctrl_c().await?;
        info!("interrupted, stop reaper");
        handle.abort();
        Ok(())
    })
}

pub fn index(engine: &Engine) -> Result<()> {
    let entries = engine.index().entries();
    for (i, entry) in entries.iter().enumerate() {
        println!("#{i} {} expires {}", entry.id, entry.expire);
    }
    println!("{} entries", entries.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_engine(dir: &tempfile::TempDir) -> Engine {
        let config = Config {
            root: Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap(),
            secret: "secret".to_string(),
            ..Config::default()
        };
        Engine::open(&config).unwrap()
    }

    #[test]
    fn test_post_show_delete_flow() {
        let dir = tempdir().unwrap();
        let engine = test_engine(&dir);

        let payload = dir.path().join("payload.txt");
        std::fs::write(&payload, "opaque blob").unwrap();
        let payload = Utf8PathBuf::from_path_buf(payload).unwrap();

        post(&engine, Some(payload), false, false, false, 3600, None).unwrap();
        assert_eq!(engine.index().len(), 1);

        let id = engine.index().entries()[0].id.clone();
        show(&engine, id.as_str()).unwrap();

        let paste = engine.get_paste(&id).unwrap();
        let token = engine.delete_token(&paste);
        delete(&engine, id.as_str(), &token).unwrap();
        assert!(engine.get_paste(&id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_post_respects_flood_gate() {
        let dir = tempdir().unwrap();
        let engine = test_engine(&dir);

        let payload = dir.path().join("payload.txt");
        std::fs::write(&payload, "first").unwrap();
        let payload = Utf8PathBuf::from_path_buf(payload).unwrap();

        let client = Some("203.0.113.7".to_string());
        post(&engine, Some(payload.clone()), false, false, false, 3600, client.clone()).unwrap();

        std::fs::write(payload.as_std_path(), "second").unwrap();
        assert!(post(&engine, Some(payload), false, false, false, 3600, client).is_err());
    }

    #[test]
    fn test_sweep_command() {
        let dir = tempdir().unwrap();
        let engine = test_engine(&dir);

        engine
            .create_paste("expired".to_string(), PasteOptions::default(), -1)
            .unwrap();
        sweep(&engine).unwrap();
        assert!(engine.index().is_empty());
    }
}
