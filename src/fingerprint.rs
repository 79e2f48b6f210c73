// src/fingerprint.rs
// Stable content identifiers for dedupe across runs.

use sha2::{Digest, Sha256};

/// Hex digits of the digest kept in the id. Short enough to read in a
/// document, long enough that collisions are not a practical concern.
const ID_HEX_LEN: usize = 12;

/// Deterministic id for a (section prefix, source URL) pair, e.g.
/// `general_9f86d081884c`. Re-ingesting the same URL in the same section
/// always mints the same id.
pub fn make_id(prefix: &str, url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut hex = String::with_capacity(ID_HEX_LEN);
    for byte in digest.iter().take(ID_HEX_LEN / 2) {
        use std::fmt::Write;
        let _ = write!(hex, "{byte:02x}");
    }
    format!("{prefix}_{hex}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_id() {
        let a = make_id("sports", "https://example.test/story");
        let b = make_id("sports", "https://example.test/story");
        assert_eq!(a, b);
    }

    #[test]
    fn prefix_and_url_both_discriminate() {
        let base = make_id("general", "https://example.test/story");
        assert_ne!(base, make_id("sports", "https://example.test/story"));
        assert_ne!(base, make_id("general", "https://example.test/other"));
    }

    #[test]
    fn id_shape_is_prefix_underscore_12_hex() {
        let id = make_id("light", "https://example.test/x");
        let (prefix, hex) = id.split_once('_').unwrap();
        assert_eq!(prefix, "light");
        assert_eq!(hex.len(), 12);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
