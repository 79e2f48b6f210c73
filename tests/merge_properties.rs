// tests/merge_properties.rs
// Retention invariants under larger, repeated merges.

use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use newsroll::{merge_live_archive, ArchiveFeed, Item, LiveFeed, RetentionCaps, Section};

fn item(id: &str, minutes_ago: i64) -> Item {
    let base = Utc.with_ymd_and_hms(2025, 8, 27, 12, 0, 0).unwrap();
    Item {
        id: id.to_string(),
        section: Section::General,
        section_label: "Latest".into(),
        kind: "REAL".into(),
        category: "WORLD".into(),
        title: format!("title {id}"),
        dek: "dek".into(),
        body: "body".into(),
        author: "Newsroll Desk".into(),
        published_at: base - chrono::Duration::minutes(minutes_ago),
        source_url: format!("https://example.test/{id}"),
        image: "https://img.example.test/x.jpg".into(),
        image_credit: "credit".into(),
    }
}

fn caps() -> RetentionCaps {
    RetentionCaps {
        live_max: 40,
        archive_max: 300,
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 27, 12, 30, 0).unwrap()
}

fn assert_invariants(live: &LiveFeed, archive: &ArchiveFeed) {
    assert!(live.items.len() <= 40);
    assert!(archive.items.len() <= 300);
    for w in live.items.windows(2) {
        assert!(w[0].published_at >= w[1].published_at);
    }
    for w in archive.items.windows(2) {
        assert!(w[0].published_at >= w[1].published_at);
    }
    let live_ids: HashSet<&str> = live.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(live_ids.len(), live.items.len());
    let arch_ids: HashSet<&str> = archive.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(arch_ids.len(), archive.items.len());
    assert!(live_ids.is_disjoint(&arch_ids));
}

#[test]
fn one_oversized_batch_respects_every_cap() {
    let batch: Vec<Item> = (0..500).map(|i| item(&format!("b{i}"), i)).collect();
    let (live, archive) =
        merge_live_archive(LiveFeed::default(), ArchiveFeed::default(), batch, now(), caps());

    assert_eq!(live.items.len(), 40);
    assert_eq!(archive.items.len(), 300);
    assert_invariants(&live, &archive);

    // the newest 40 stayed live, the next 300 were archived, the rest fell off
    assert!(live.items.iter().any(|i| i.id == "b0"));
    assert!(archive.items.iter().any(|i| i.id == "b40"));
    assert!(archive.items.iter().any(|i| i.id == "b339"));
    assert!(!archive.items.iter().any(|i| i.id == "b340"));
}

#[test]
fn repeated_merges_keep_invariants_as_history_accumulates() {
    let mut live = LiveFeed::default();
    let mut archive = ArchiveFeed::default();

    // 20 runs of 30 items each, every run newer than the last
    for run in 0..20 {
        let batch: Vec<Item> = (0..30)
            .map(|i| item(&format!("r{run}i{i}"), 10_000 - run * 100 - i))
            .collect();
        let (l, a) = merge_live_archive(live, archive, batch, now(), caps());
        assert_invariants(&l, &a);
        live = l;
        archive = a;
    }

    // 600 items total passed through; the archive long since hit its cap
    assert_eq!(live.items.len(), 40);
    assert_eq!(archive.items.len(), 300);
    // the freshest batch is fully live
    for i in 0..30 {
        assert!(live.items.iter().any(|it| it.id == format!("r19i{i}")));
    }
}

#[test]
fn surviving_ids_are_never_lost_outside_truncation() {
    let live_in = LiveFeed {
        generated_at: None,
        items: (0..10).map(|i| item(&format!("l{i}"), 50 + i)).collect(),
    };
    let archive_in = ArchiveFeed {
        items: (0..10).map(|i| item(&format!("a{i}"), 500 + i)).collect(),
    };
    let before: HashSet<String> = live_in
        .items
        .iter()
        .chain(archive_in.items.iter())
        .map(|i| i.id.clone())
        .collect();

    let batch: Vec<Item> = (0..5).map(|i| item(&format!("n{i}"), i)).collect();
    let (live, archive) = merge_live_archive(live_in, archive_in, batch, now(), caps());

    // nothing truncated here, so every prior id must survive somewhere
    let after: HashSet<String> = live
        .items
        .iter()
        .chain(archive.items.iter())
        .map(|i| i.id.clone())
        .collect();
    assert!(before.is_subset(&after));
    assert_invariants(&live, &archive);
}
