// src/images.rs
// Image selection seam. The pipeline only needs "give me a URL and a
// credit"; how a resolver picks is its own concern.

use sha2::{Digest, Sha256};

use crate::model::Section;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub url: String,
    pub credit: String,
}

/// Must always produce a non-empty URL and credit. Determinism is not
/// required by the contract; the stock resolver happens to be deterministic
/// per seed, which keeps tests stable.
pub trait ImageResolver: Send + Sync {
    fn resolve(&self, section: Section, category: &str, title: &str, seed: &str) -> ResolvedImage;
}

const CREDIT_STOCK: &str = "Photo via Unsplash (free to use)";
pub const CREDIT_PUBLISHER: &str = "Image via original publisher";

/// A publisher-supplied image short-circuits resolution entirely.
pub fn publisher_image(url: String) -> ResolvedImage {
    ResolvedImage {
        url,
        credit: CREDIT_PUBLISHER.to_string(),
    }
}

type IntentRow = (&'static str, &'static [&'static str]);

// Keyword → stock query intents per section. "default" rows apply when no
// keyword matches the title.
const GENERAL_INTENTS: &[IntentRow] = &[
    ("election", &["election polling station", "ballot voting"]),
    ("war", &["military briefing room", "international news press"]),
    ("default", &["world news press", "journalism newsroom"]),
];

const SPORTS_INTENTS: &[IntentRow] = &[
    (
        "nba",
        &[
            "nba basketball game",
            "basketball arena crowd",
            "nba players action",
        ],
    ),
    ("trade", &["basketball press conference", "sports interview"]),
    ("default", &["basketball game action", "sports stadium crowd"]),
];

const LIGHT_INTENTS: &[IntentRow] = &[(
    "default",
    &["funny street sign", "unexpected moment", "public sign humor"],
)];

/// Stock-photo resolver: keyword intent tables keyed by section, query
/// variant picked by a hash of the seed.
#[derive(Debug, Default)]
pub struct StockImageResolver;

impl StockImageResolver {
    pub fn new() -> Self {
        Self
    }

    fn intents(section: Section) -> &'static [IntentRow] {
        match section {
            Section::General => GENERAL_INTENTS,
            Section::Sports => SPORTS_INTENTS,
            Section::Light => LIGHT_INTENTS,
        }
    }

    fn pick_query(section: Section, title: &str, seed: &str) -> &'static str {
        let title_l = title.to_lowercase();
        let rows = Self::intents(section);
        let queries = rows
            .iter()
            .find(|(key, _)| *key != "default" && title_l.contains(key))
            .or_else(|| rows.iter().find(|(key, _)| *key == "default"))
            .map(|(_, queries)| *queries)
            .unwrap_or(&["news"]);

        let digest = Sha256::digest(seed.as_bytes());
        queries[digest[0] as usize % queries.len()]
    }
}

impl ImageResolver for StockImageResolver {
    fn resolve(&self, section: Section, _category: &str, title: &str, seed: &str) -> ResolvedImage {
        let query = Self::pick_query(section, title, seed).replace(' ', ",");
        ResolvedImage {
            url: format!("https://source.unsplash.com/1600x900/?{query}&sig={seed}"),
            credit: CREDIT_STOCK.to_string(),
        }
    }
}
