// src/model.rs
// Wire shapes for the live and archive documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level content bucket. Serialized uppercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "GENERAL")]
    General,
    #[serde(rename = "SPORTS")]
    Sports,
    #[serde(rename = "LIGHT")]
    Light,
}

impl Section {
    /// Fingerprint prefix; also the id namespace per section.
    pub fn prefix(self) -> &'static str {
        match self {
            Section::General => "general",
            Section::Sports => "sports",
            Section::Light => "light",
        }
    }

    /// Human-facing label carried on the wire for the front-end.
    pub fn label(self) -> &'static str {
        match self {
            Section::General => "Latest",
            Section::Sports => "Sports",
            Section::Light => "Not-So-Serious",
        }
    }

    /// REAL vs MEME pill on the front-end.
    pub fn kind(self) -> &'static str {
        match self {
            Section::Light => "MEME",
            _ => "REAL",
        }
    }

    pub fn author(self) -> &'static str {
        match self {
            Section::General => "Newsroll Desk",
            Section::Sports => "Newsroll Sports Desk",
            Section::Light => "Meme Bureau",
        }
    }

    /// Teaser length cap in characters. Light content runs shorter.
    pub fn dek_cap(self) -> usize {
        match self {
            Section::Light => 120,
            _ => 160,
        }
    }
}

/// A single published story. Immutable once built; a re-run re-derives
/// rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub section: Section,
    pub section_label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub title: String,
    pub dek: String,
    pub body: String,
    pub author: String,
    #[serde(with = "iso_seconds")]
    pub published_at: DateTime<Utc>,
    pub source_url: String,
    pub image: String,
    pub image_credit: String,
}

/// The rolling live window: at most `live_max` newest items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFeed {
    #[serde(default, with = "iso_seconds_opt")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Historical overflow, capped and lossy at the tail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiveFeed {
    #[serde(default)]
    pub items: Vec<Item>,
}

/// ISO-8601 with second precision and explicit offset, e.g.
/// `2025-08-27T10:15:00+00:00`.
pub mod iso_seconds {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, false))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Same format for the optional `generatedAt` stamp. An empty string is
/// accepted as absent so cold-start documents from older builds load.
pub mod iso_seconds_opt {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, false)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        match s.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_item() -> Item {
        Item {
            id: "general_abc123def456".into(),
            section: Section::General,
            section_label: Section::General.label().into(),
            kind: Section::General.kind().into(),
            category: "WORLD".into(),
            title: "Title".into(),
            dek: "Dek".into(),
            body: "Body".into(),
            author: Section::General.author().into(),
            published_at: Utc.with_ymd_and_hms(2025, 8, 27, 10, 15, 0).unwrap(),
            source_url: "https://example.test/a".into(),
            image: "https://img.example.test/a.jpg".into(),
            image_credit: "Image via original publisher".into(),
        }
    }

    #[test]
    fn item_round_trips_with_second_precision_timestamps() {
        let item = sample_item();
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains(r#""publishedAt":"2025-08-27T10:15:00+00:00""#));
        assert!(json.contains(r#""type":"REAL""#));
        assert!(json.contains(r#""sectionLabel":"Latest""#));
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn live_feed_accepts_empty_generated_at() {
        let doc = r#"{"generatedAt":"","items":[]}"#;
        let live: LiveFeed = serde_json::from_str(doc).unwrap();
        assert!(live.generated_at.is_none());
        assert!(live.items.is_empty());
    }

    #[test]
    fn section_wire_names_are_uppercase() {
        assert_eq!(serde_json::to_string(&Section::Light).unwrap(), r#""LIGHT""#);
        let s: Section = serde_json::from_str(r#""SPORTS""#).unwrap();
        assert_eq!(s, Section::Sports);
    }
}
