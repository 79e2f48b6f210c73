//! # Merge-Retention Engine
//! Pure, testable logic that folds a batch of new items into the live
//! window and retires the overflow into the capped archive. No I/O.
//!
//! The archive truncation in step 5 is the system's only silent-data-loss
//! point: items past the cap are gone for good. Bounded history is the
//! product policy, not a complete log.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::model::{ArchiveFeed, Item, LiveFeed};

/// Caps for one merge. Split out of `BuildConfig` so the engine stays
/// independent of fetch/classify knobs.
#[derive(Debug, Clone, Copy)]
pub struct RetentionCaps {
    pub live_max: usize,
    pub archive_max: usize,
}

/// One merge pass:
/// 1. concatenate current live items with the new batch,
/// 2. stable-sort descending by publish time (ties keep batch order),
/// 3. split at the live cap; the tail is overflow,
/// 4. append overflow to the archive, skipping ids already there,
/// 5. stable-sort the archive descending and truncate to its cap,
/// 6. stamp the live window with the merge instant.
pub fn merge_live_archive(
    live: LiveFeed,
    archive: ArchiveFeed,
    new_items: Vec<Item>,
    now: DateTime<Utc>,
    caps: RetentionCaps,
) -> (LiveFeed, ArchiveFeed) {
    let mut all_live = live.items;
    all_live.extend(new_items);
    all_live.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    let overflow = if all_live.len() > caps.live_max {
        all_live.split_off(caps.live_max)
    } else {
        Vec::new()
    };

    let mut arch_items = archive.items;
    let mut arch_seen: HashSet<&str> = arch_items.iter().map(|i| i.id.as_str()).collect();
    let mut incoming = Vec::with_capacity(overflow.len());
    for it in overflow {
        if arch_seen.contains(it.id.as_str()) {
            continue;
        }
        incoming.push(it);
    }
    drop(arch_seen);
    arch_items.extend(incoming);
    arch_items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    arch_items.truncate(caps.archive_max);

    (
        LiveFeed {
            generated_at: Some(now),
            items: all_live,
        },
        ArchiveFeed { items: arch_items },
    )
}
