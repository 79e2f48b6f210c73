// src/normalize.rs
// Total text cleanup used everywhere downstream of the fetch boundary.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Strip markup, decode entities, collapse whitespace.
/// Total: empty or tag-only input yields an empty string, never an error.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Collapse whitespace
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Hard character cap, no marker. Used for titles.
pub fn clip_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max).collect()
}

/// Teaser clip: cut at the last word boundary inside `max` chars and append
/// an ellipsis. Input shorter than `max` passes through untouched.
pub fn clip_dek(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max).collect();
    let cut = match head.rfind(' ') {
        Some(pos) if pos > 0 => &head[..pos],
        _ => head.as_str(),
    };
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_decodes_entities() {
        let s = "<p>Fed &amp; markets&nbsp;&mdash; <b>update</b></p>";
        assert_eq!(normalize_text(s), "Fed & markets — update");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize_text("  a\n\t b   c  "), "a b c");
    }

    #[test]
    fn is_total_on_degenerate_input() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("<br/><br/>"), "");
    }

    #[test]
    fn dek_clips_at_word_boundary_with_marker() {
        let s = "one two three four five";
        let out = clip_dek(s, 12);
        assert_eq!(out, "one two…");
    }

    #[test]
    fn dek_passes_short_input_through() {
        assert_eq!(clip_dek("short", 120), "short");
    }

    #[test]
    fn title_cap_is_a_hard_cut() {
        assert_eq!(clip_chars("abcdef", 4), "abcd");
        assert_eq!(clip_chars("abc", 4), "abc");
    }
}
