// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_SOURCES_PATH: &str = "NEWSROLL_SOURCES_PATH";
pub const ENV_DATA_DIR: &str = "NEWSROLL_DATA_DIR";

/// Feed endpoints for one section, plus the sports keyword list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionSources {
    #[serde(default)]
    pub rss: Vec<String>,
    #[serde(default)]
    pub keywords_injury: Vec<String>,
}

/// The sources document: which endpoints feed which section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub general: SectionSources,
    #[serde(default)]
    pub sports: SectionSources,
    #[serde(default)]
    pub light: SectionSources,
}

/// Load the sources document from an explicit path. TOML or JSON by
/// extension, with a content-sniff fallback either way.
pub fn load_sources_from(path: &Path) -> Result<SourcesConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
        .with_context(|| format!("parsing sources from {}", path.display()))
}

/// Load the sources document using env var + fallbacks:
/// 1) $NEWSROLL_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
///
/// Unlike optional config, a missing sources document is fatal: the run
/// cannot know which endpoints to query.
pub fn load_sources_default() -> Result<SourcesConfig> {
    if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        }
        return Err(anyhow!("{ENV_SOURCES_PATH} points to non-existent path"));
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Err(anyhow!(
        "no sources document found (set {ENV_SOURCES_PATH} or provide config/sources.toml)"
    ))
}

/// Data directory holding live.json and archive.json.
pub fn data_dir_default() -> PathBuf {
    std::env::var(ENV_DATA_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<SourcesConfig> {
    if hint_ext == "json" || s.trim_start().starts_with('{') {
        if let Ok(v) = serde_json::from_str::<SourcesConfig>(s) {
            return Ok(normalize_sources(v));
        }
    }
    if let Ok(v) = toml::from_str::<SourcesConfig>(s) {
        return Ok(normalize_sources(v));
    }
    if let Ok(v) = serde_json::from_str::<SourcesConfig>(s) {
        return Ok(normalize_sources(v));
    }
    Err(anyhow!("unsupported sources format"))
}

fn normalize_sources(mut cfg: SourcesConfig) -> SourcesConfig {
    for sec in [&mut cfg.general, &mut cfg.sports, &mut cfg.light] {
        sec.rss = clean_list(std::mem::take(&mut sec.rss));
        sec.keywords_injury = sec
            .keywords_injury
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
    }
    cfg
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && !out.iter().any(|o: &String| o == t) {
            out.push(t.to_string());
        }
    }
    out
}

/// All tunable knobs, injected into components instead of module globals.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Live window cap.
    pub live_max: usize,
    /// Archive cap; items past it are permanently discarded.
    pub archive_max: usize,
    /// Trailing recency window for the general section.
    pub recency_window: chrono::Duration,
    /// Per-endpoint entry caps.
    pub general_entry_cap: usize,
    pub sports_entry_cap: usize,
    pub light_entry_cap: usize,
    /// Selection bounds after pooling.
    pub sports_pick_limit: usize,
    pub light_pick_limit: usize,
    /// Title hard cap in characters.
    pub title_cap: usize,
    /// Per-request fetch timeout.
    pub fetch_timeout: Duration,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            live_max: 40,
            archive_max: 300,
            recency_window: chrono::Duration::hours(24),
            general_entry_cap: 30,
            sports_entry_cap: 50,
            light_entry_cap: 20,
            sports_pick_limit: 8,
            light_pick_limit: 10,
            title_cap: 140,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}
