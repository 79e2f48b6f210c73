// src/classify.rs
// Section policies decide WHICH entries to take; the shared admit pipeline
// (link check → fingerprint → dedupe → build) turns them into Items.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::config::BuildConfig;
use crate::fetch::RawEntry;
use crate::fingerprint::make_id;
use crate::images::{publisher_image, ImageResolver};
use crate::model::{Item, Section};
use crate::normalize::{clip_chars, clip_dek, normalize_text};

pub const CATEGORY_WORLD: &str = "WORLD";
pub const CATEGORY_INJURY: &str = "INJURY";
pub const CATEGORY_BASKETBALL: &str = "BASKETBALL";
pub const CATEGORY_SPORTS: &str = "SPORTS";
pub const CATEGORY_WEIRD: &str = "WEIRD";

/// An entry a policy picked, tagged with the category its rule implies.
#[derive(Debug, Clone)]
pub struct Selected {
    pub entry: RawEntry,
    pub category: &'static str,
}

/// One selection strategy per section. Policies only rank and filter; they
/// never mint ids or touch seen-state.
pub trait SectionPolicy: Send + Sync {
    fn section(&self) -> Section;
    /// Per-endpoint fetch bound for this section.
    fn entry_cap(&self) -> usize;
    fn select(&self, pool: Vec<RawEntry>, now: DateTime<Utc>) -> Vec<Selected>;
}

/// GENERAL: everything inside the trailing recency window, category WORLD.
pub struct GeneralPolicy {
    pub recency_window: chrono::Duration,
    pub entry_cap: usize,
}

impl SectionPolicy for GeneralPolicy {
    fn section(&self) -> Section {
        Section::General
    }

    fn entry_cap(&self) -> usize {
        self.entry_cap
    }

    fn select(&self, pool: Vec<RawEntry>, now: DateTime<Utc>) -> Vec<Selected> {
        let cutoff = now - self.recency_window;
        pool.into_iter()
            .filter(|e| e.published_at_or(now) >= cutoff)
            .map(|entry| Selected {
                entry,
                category: CATEGORY_WORLD,
            })
            .collect()
    }
}

/// SPORTS: injury keywords first; if nothing matches, fall back to an
/// NBA/basketball topic match. With no keyword list configured at all,
/// the top of the pool is taken under the generic SPORTS tag.
pub struct SportsPolicy {
    /// Lowercased substrings, matched against normalized title+summary.
    pub injury_keywords: Vec<String>,
    pub pick_limit: usize,
    pub entry_cap: usize,
}

impl SportsPolicy {
    fn haystack(entry: &RawEntry) -> String {
        let title = normalize_text(entry.title.as_deref().unwrap_or_default());
        let summary = normalize_text(entry.summary.as_deref().unwrap_or_default());
        format!("{title} {summary}").to_lowercase()
    }

    fn is_injury(&self, entry: &RawEntry) -> bool {
        let text = Self::haystack(entry);
        self.injury_keywords.iter().any(|k| text.contains(k))
    }
}

impl SectionPolicy for SportsPolicy {
    fn section(&self) -> Section {
        Section::Sports
    }

    fn entry_cap(&self) -> usize {
        self.entry_cap
    }

    fn select(&self, pool: Vec<RawEntry>, _now: DateTime<Utc>) -> Vec<Selected> {
        if self.injury_keywords.is_empty() {
            return pool
                .into_iter()
                .take(self.pick_limit)
                .map(|entry| Selected {
                    entry,
                    category: CATEGORY_SPORTS,
                })
                .collect();
        }

        let injuries: Vec<&RawEntry> = pool.iter().filter(|e| self.is_injury(e)).collect();
        if !injuries.is_empty() {
            return injuries
                .into_iter()
                .take(self.pick_limit)
                .cloned()
                .map(|entry| Selected {
                    entry,
                    category: CATEGORY_INJURY,
                })
                .collect();
        }

        pool.into_iter()
            .filter(|e| {
                let text = Self::haystack(e);
                text.contains("nba") || text.contains("basketball")
            })
            .take(self.pick_limit)
            .map(|entry| Selected {
                entry,
                category: CATEGORY_BASKETBALL,
            })
            .collect()
    }
}

/// LIGHT: evergreen content, no recency filter, just a bound.
pub struct LightPolicy {
    pub pick_limit: usize,
    pub entry_cap: usize,
}

impl SectionPolicy for LightPolicy {
    fn section(&self) -> Section {
        Section::Light
    }

    fn entry_cap(&self) -> usize {
        self.entry_cap
    }

    fn select(&self, pool: Vec<RawEntry>, _now: DateTime<Utc>) -> Vec<Selected> {
        pool.into_iter()
            .take(self.pick_limit)
            .map(|entry| Selected {
                entry,
                category: CATEGORY_WEIRD,
            })
            .collect()
    }
}

/// Build the three policies from configuration.
pub fn policies_from(
    cfg: &BuildConfig,
    injury_keywords: Vec<String>,
) -> Vec<Box<dyn SectionPolicy>> {
    vec![
        Box::new(GeneralPolicy {
            recency_window: cfg.recency_window,
            entry_cap: cfg.general_entry_cap,
        }),
        Box::new(SportsPolicy {
            injury_keywords,
            pick_limit: cfg.sports_pick_limit,
            entry_cap: cfg.sports_entry_cap,
        }),
        Box::new(LightPolicy {
            pick_limit: cfg.light_pick_limit,
            entry_cap: cfg.light_entry_cap,
        }),
    ]
}

/// Shared admit pipeline. Holds the accumulated id set so repeated runs
/// (and overlapping endpoints) stay idempotent.
pub struct Classifier<'a> {
    seen: HashSet<String>,
    resolver: &'a dyn ImageResolver,
    title_cap: usize,
}

impl<'a> Classifier<'a> {
    pub fn new(seen: HashSet<String>, resolver: &'a dyn ImageResolver, cfg: &BuildConfig) -> Self {
        Self {
            seen,
            resolver,
            title_cap: cfg.title_cap,
        }
    }

    /// Turn selected entries into Items. Entries without a source link are
    /// dropped before any id is minted; entries whose fingerprint is already
    /// known are dropped silently.
    pub fn admit(
        &mut self,
        section: Section,
        selected: Vec<Selected>,
        now: DateTime<Utc>,
    ) -> Vec<Item> {
        let mut out = Vec::with_capacity(selected.len());
        for sel in selected {
            let Some(url) = sel
                .entry
                .link
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
            else {
                continue;
            };
            let url = url.to_string();

            let id = make_id(section.prefix(), &url);
            if !self.seen.insert(id.clone()) {
                continue;
            }

            let published_at = sel.entry.published_at_or(now);
            let title = clip_chars(
                &normalize_text(sel.entry.title.as_deref().unwrap_or_default()),
                self.title_cap,
            );
            let summary = normalize_text(sel.entry.summary.as_deref().unwrap_or_default());

            let teaser_src = if summary.is_empty() { &title } else { &summary };
            let dek = clip_dek(teaser_src, section.dek_cap());
            let body = format!("{title}\n\n{teaser_src}\n\nSource: {url}");

            let image = match sel.entry.media_url.clone() {
                Some(media) => publisher_image(media),
                None => self.resolver.resolve(section, sel.category, &title, &id),
            };

            out.push(Item {
                id,
                section,
                section_label: section.label().to_string(),
                kind: section.kind().to_string(),
                category: sel.category.to_string(),
                title,
                dek,
                body,
                author: section.author().to_string(),
                published_at,
                source_url: url,
                image: image.url,
                image_credit: image.credit,
            });
        }
        out
    }

    /// The accumulated id set, for callers that run multiple sections.
    pub fn into_seen(self) -> HashSet<String> {
        self.seen
    }
}
