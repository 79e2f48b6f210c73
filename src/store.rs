// src/store.rs
// Whole-document persistence for the live and archive feeds.
//
// A missing document is a cold start and loads as the empty default. A
// document that exists but fails to parse is an error: overwriting it would
// silently discard history. Saves go through a temp file + rename so no
// reader observes a half-written document.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::{ArchiveFeed, LiveFeed};

pub const LIVE_DOC: &str = "live.json";
pub const ARCHIVE_DOC: &str = "archive.json";

pub struct FeedStore {
    dir: PathBuf,
}

impl FeedStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load_live(&self) -> Result<LiveFeed> {
        self.load_or_default(LIVE_DOC)
    }

    pub fn load_archive(&self) -> Result<ArchiveFeed> {
        self.load_or_default(ARCHIVE_DOC)
    }

    pub fn save_live(&self, live: &LiveFeed) -> Result<()> {
        self.save_atomic(LIVE_DOC, live)
    }

    pub fn save_archive(&self, archive: &ArchiveFeed) -> Result<()> {
        self.save_atomic(ARCHIVE_DOC, archive)
    }

    fn doc_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.doc_path(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading {} from {}", name, path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("{name} exists but is not parsable; refusing to reset it"))
    }

    fn save_atomic<T: Serialize>(&self, name: &str, doc: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating data dir {}", self.dir.display()))?;
        let path = self.doc_path(name);
        let tmp = self.doc_path(&format!("{name}.tmp"));

        let json = serde_json::to_string_pretty(doc)
            .with_context(|| format!("serializing {name}"))?;
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        // rename within the same directory so the swap is atomic enough
        fs::rename(&tmp, &path)
            .with_context(|| format!("replacing {} with fresh {name}", path.display()))?;
        Ok(())
    }
}
