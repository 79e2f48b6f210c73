// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod classify;
pub mod config;
pub mod fetch;
pub mod fingerprint;
pub mod images;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod store;

// ---- Re-exports for the common path ----
pub use crate::config::{BuildConfig, SourcesConfig};
pub use crate::fetch::{FeedSource, FixtureFeedSource, HttpFeedSource, RawEntry};
pub use crate::images::{ImageResolver, ResolvedImage, StockImageResolver};
pub use crate::merge::{merge_live_archive, RetentionCaps};
pub use crate::model::{ArchiveFeed, Item, LiveFeed, Section};
pub use crate::pipeline::{run_once, RunSummary};
pub use crate::store::FeedStore;
