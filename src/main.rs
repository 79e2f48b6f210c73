//! Newsroll — Batch Feed Builder
//! One invocation fetches every configured RSS endpoint, classifies the new
//! entries, folds them into the rolling live window, retires the overflow
//! into the capped archive, and writes both documents back.
//!
//! Exit code is non-zero when the sources document cannot be loaded or a
//! document fails to persist; endpoint failures only degrade that endpoint.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsroll::{config, pipeline, BuildConfig, FeedStore, HttpFeedSource, StockImageResolver};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newsroll=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let sources = config::load_sources_default().context("loading sources document")?;
    let cfg = BuildConfig::default();

    let source = Arc::new(HttpFeedSource::new(cfg.fetch_timeout)?);
    let resolver = StockImageResolver::new();
    let store = FeedStore::new(config::data_dir_default());

    pipeline::run_once(&cfg, &sources, source, &resolver, &store).await?;
    Ok(())
}
