// src/pipeline.rs
// One full run: fetch all endpoints (concurrently), classify per section,
// merge into the live/archive documents, persist.
//
// Two runs must not execute concurrently against the same data directory;
// scheduling them apart (cron, run-lock) is the operator's concern, not the
// pipeline's.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::classify::{policies_from, Classifier, SectionPolicy};
use crate::config::{BuildConfig, SourcesConfig};
use crate::fetch::{FeedSource, RawEntry};
use crate::images::ImageResolver;
use crate::merge::{merge_live_archive, RetentionCaps};
use crate::model::Section;
use crate::store::FeedStore;

/// Counters for the run's closing log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub fetched: usize,
    pub admitted: usize,
    pub live_len: usize,
    pub archive_len: usize,
}

fn section_endpoints<'a>(
    sources: &'a SourcesConfig,
    section: Section,
) -> &'a [String] {
    match section {
        Section::General => &sources.general.rss,
        Section::Sports => &sources.sports.rss,
        Section::Light => &sources.light.rss,
    }
}

/// Fetch every configured endpoint concurrently. Each task owns its own
/// collector; results are reassembled in configuration order afterwards so
/// a run is deterministic for a fixed set of feed bodies. An endpoint that
/// errors out degrades to zero entries with a warning.
async fn fetch_all(
    source: Arc<dyn FeedSource>,
    jobs: Vec<(usize, Section, String, usize)>,
) -> Vec<(usize, Section, Vec<RawEntry>)> {
    let mut set = JoinSet::new();
    for (idx, section, url, cap) in jobs {
        let source = Arc::clone(&source);
        set.spawn(async move {
            match source.fetch_entries(&url, cap).await {
                Ok(entries) => {
                    info!(
                        section = section.prefix(),
                        endpoint = %url,
                        entries = entries.len(),
                        "endpoint fetched"
                    );
                    (idx, section, entries)
                }
                Err(e) => {
                    warn!(
                        section = section.prefix(),
                        endpoint = %url,
                        error = ?e,
                        "endpoint failed; continuing with zero entries"
                    );
                    (idx, section, Vec::new())
                }
            }
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(res) => results.push(res),
            Err(e) => warn!(error = ?e, "fetch task panicked; dropping its endpoint"),
        }
    }
    results.sort_by_key(|(idx, _, _)| *idx);
    results
}

/// Execute one pipeline run end to end.
pub async fn run_once(
    cfg: &BuildConfig,
    sources: &SourcesConfig,
    source: Arc<dyn FeedSource>,
    resolver: &dyn ImageResolver,
    store: &FeedStore,
) -> Result<RunSummary> {
    let live = store.load_live()?;
    let archive = store.load_archive()?;

    let seen: HashSet<String> = live
        .items
        .iter()
        .chain(archive.items.iter())
        .map(|i| i.id.clone())
        .collect();

    let policies = policies_from(cfg, sources.sports.keywords_injury.clone());

    // one job per (section, endpoint), in configuration order
    let mut jobs = Vec::new();
    for policy in &policies {
        for url in section_endpoints(sources, policy.section()) {
            jobs.push((jobs.len(), policy.section(), url.clone(), policy.entry_cap()));
        }
    }
    let fetched = fetch_all(source, jobs).await;
    let fetched_total: usize = fetched.iter().map(|(_, _, entries)| entries.len()).sum();

    let now = Utc::now();
    let mut classifier = Classifier::new(seen, resolver, cfg);
    let mut new_items = Vec::new();
    for policy in &policies {
        let pool: Vec<RawEntry> = fetched
            .iter()
            .filter(|(_, section, _)| *section == policy.section())
            .flat_map(|(_, _, entries)| entries.iter().cloned())
            .collect();
        let pool_len = pool.len();
        let selected = policy.select(pool, now);
        let admitted = classifier.admit(policy.section(), selected, now);
        info!(
            section = policy.section().prefix(),
            pooled = pool_len,
            admitted = admitted.len(),
            "section classified"
        );
        new_items.extend(admitted);
    }

    let caps = RetentionCaps {
        live_max: cfg.live_max,
        archive_max: cfg.archive_max,
    };
    let admitted_total = new_items.len();
    let (live_out, archive_out) = merge_live_archive(live, archive, new_items, now, caps);

    store.save_live(&live_out)?;
    store.save_archive(&archive_out)?;

    let summary = RunSummary {
        fetched: fetched_total,
        admitted: admitted_total,
        live_len: live_out.items.len(),
        archive_len: archive_out.items.len(),
    };
    info!(
        fetched = summary.fetched,
        new_items = summary.admitted,
        live = summary.live_len,
        archive = summary.archive_len,
        "run complete"
    );
    Ok(summary)
}
