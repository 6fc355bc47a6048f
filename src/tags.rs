//! Name/tag codec for theme names
//!
//! Categories are encoded directly in a theme's name as bracket groups,
//! e.g. `"[Roleplay] [Dark] Midnight"`. Everything here is a pure function
//! over name strings; nothing touches the store.

/// Synthetic category for themes whose name carries no bracket group.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Characters the host rejects in theme names, stripped by [`sanitize_tag`].
const ILLEGAL_TAG_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Tags extracted from a theme name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTags {
    /// Tags in the order they appear in the name. Never empty: an untagged
    /// name yields the single synthetic [`UNCATEGORIZED`] entry.
    pub tags: Vec<String>,

    /// True when no non-empty bracket group was found.
    pub is_untagged: bool,
}

/// Result of sanitizing a user-supplied tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedTag {
    /// The tag with illegal characters removed and ends trimmed.
    pub tag: String,

    /// True when sanitization changed the input. Callers must surface a
    /// warning in that case, and abort entirely if `tag` came out empty.
    pub altered: bool,
}

/// Scan `name` for non-overlapping `[...]` groups.
///
/// Returns the byte span of each group (including brackets) together with
/// the trimmed inner text. Lazy matching: each `[` pairs with the nearest
/// following `]`.
fn bracket_groups(name: &str) -> Vec<(usize, usize, &str)> {
    let mut groups = Vec::new();
    let mut rest = 0;
    while let Some(open) = name[rest..].find('[') {
        let open = rest + open;
        let Some(close) = name[open + 1..].find(']') else {
            break;
        };
        let close = open + 1 + close;
        groups.push((open, close + 1, name[open + 1..close].trim()));
        rest = close + 1;
    }
    groups
}

/// Extract all category tags from a theme name.
///
/// Empty groups (`[]`, `[  ]`) are ignored. A name with zero non-empty
/// groups belongs to the implicit [`UNCATEGORIZED`] category.
pub fn extract_tags(name: &str) -> ExtractedTags {
    let tags: Vec<String> = bracket_groups(name)
        .iter()
        .filter(|(_, _, inner)| !inner.is_empty())
        .map(|(_, _, inner)| inner.to_string())
        .collect();

    if tags.is_empty() {
        ExtractedTags {
            tags: vec![UNCATEGORIZED.to_string()],
            is_untagged: true,
        }
    } else {
        ExtractedTags {
            tags,
            is_untagged: false,
        }
    }
}

/// Remove every bracket group from `name` and trim the ends.
fn strip_all_groups(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut cursor = 0;
    for (start, end, _) in bracket_groups(name) {
        out.push_str(&name[cursor..start]);
        cursor = end;
    }
    out.push_str(&name[cursor..]);
    out.trim().to_string()
}

/// Human-facing name with all bracket groups removed.
///
/// Falls back to the raw name when stripping would leave nothing, so a
/// theme named `"[A]"` still renders as something clickable.
pub fn display_name(name: &str) -> String {
    let stripped = strip_all_groups(name);
    if stripped.is_empty() {
        name.to_string()
    } else {
        stripped
    }
}

/// Prepend `[tag] ` to the name.
///
/// Deliberately does not deduplicate: adding the same tag twice produces
/// two bracket groups (`"[A] [A] X"`). Long-standing behavior, kept as is.
pub fn add_tag(name: &str, tag: &str) -> String {
    format!("[{tag}] {name}")
}

/// Remove the first literal `[tag]` occurrence (exact, case-sensitive).
///
/// Returns the name unchanged when the tag is not present.
pub fn remove_tag(name: &str, tag: &str) -> String {
    let needle = format!("[{tag}]");
    match name.find(&needle) {
        Some(pos) => {
            let mut out = String::with_capacity(name.len());
            out.push_str(&name[..pos]);
            out.push_str(&name[pos + needle.len()..]);
            out.trim().to_string()
        }
        None => name.to_string(),
    }
}

/// Re-home a theme under a single category.
///
/// Strips ALL existing bracket groups first, so a move is never additive:
/// the theme loses its prior categories. Idempotent.
pub fn move_to_tag(name: &str, tag: &str) -> String {
    let base = strip_all_groups(name);
    format!("[{tag}] {base}").trim().to_string()
}

/// Strip characters the host's naming scheme rejects and trim the ends.
pub fn sanitize_tag(raw: &str) -> SanitizedTag {
    let cleaned: String = raw
        .chars()
        .filter(|c| !ILLEGAL_TAG_CHARS.contains(c))
        .collect();
    let cleaned = cleaned.trim().to_string();
    SanitizedTag {
        altered: cleaned != raw,
        tag: cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_tag() {
        let extracted = extract_tags("[Roleplay] Midnight");
        assert_eq!(extracted.tags, vec!["Roleplay"]);
        assert!(!extracted.is_untagged);
    }

    #[test]
    fn test_extract_multiple_tags_in_order() {
        let extracted = extract_tags("[Roleplay] [Dark] Midnight");
        assert_eq!(extracted.tags, vec!["Roleplay", "Dark"]);
    }

    #[test]
    fn test_extract_trims_inner_whitespace() {
        let extracted = extract_tags("[  Dark  ] Midnight");
        assert_eq!(extracted.tags, vec!["Dark"]);
    }

    #[test]
    fn test_extract_ignores_empty_groups() {
        let extracted = extract_tags("[] [ ] Midnight");
        assert_eq!(extracted.tags, vec![UNCATEGORIZED]);
        assert!(extracted.is_untagged);
    }

    #[test]
    fn test_extract_untagged() {
        let extracted = extract_tags("Midnight");
        assert_eq!(extracted.tags, vec![UNCATEGORIZED]);
        assert!(extracted.is_untagged);
    }

    #[test]
    fn test_extract_unclosed_bracket_is_untagged() {
        let extracted = extract_tags("Mid[night");
        assert!(extracted.is_untagged);
    }

    #[test]
    fn test_extract_duplicate_tags_kept() {
        // Duplicate groups stay in the tag list; membership dedup happens
        // in the category index, not here.
        let extracted = extract_tags("[A] [A] X");
        assert_eq!(extracted.tags, vec!["A", "A"]);
    }

    #[test]
    fn test_display_name_strips_groups() {
        assert_eq!(display_name("[Roleplay] [Dark] Midnight"), "Midnight");
    }

    #[test]
    fn test_display_name_falls_back_to_raw() {
        assert_eq!(display_name("[OnlyTag]"), "[OnlyTag]");
        assert_eq!(display_name("[A] [B]"), "[A] [B]");
    }

    #[test]
    fn test_display_name_plain() {
        assert_eq!(display_name("Midnight"), "Midnight");
    }

    #[test]
    fn test_add_tag() {
        assert_eq!(add_tag("X", "A"), "[A] X");
    }

    #[test]
    fn test_add_tag_never_deduplicates() {
        let once = add_tag("X", "A");
        let twice = add_tag(&once, "A");
        assert_eq!(twice, "[A] [A] X");
    }

    #[test]
    fn test_remove_tag_roundtrip() {
        let name = "Midnight";
        assert_eq!(remove_tag(&add_tag(name, "Dark"), "Dark"), name);
    }

    #[test]
    fn test_remove_tag_first_occurrence_only() {
        assert_eq!(remove_tag("[A] [A] X", "A"), "[A] X");
    }

    #[test]
    fn test_remove_tag_absent_returns_unchanged() {
        assert_eq!(remove_tag("  [A] X ", "B"), "  [A] X ");
    }

    #[test]
    fn test_remove_tag_case_sensitive() {
        assert_eq!(remove_tag("[dark] X", "Dark"), "[dark] X");
    }

    #[test]
    fn test_move_to_tag_replaces_all_tags() {
        assert_eq!(move_to_tag("[A] [B] X", "C"), "[C] X");
    }

    #[test]
    fn test_move_to_tag_idempotent() {
        let moved = move_to_tag("[A] X", "C");
        assert_eq!(move_to_tag(&moved, "C"), moved);
    }

    #[test]
    fn test_move_to_tag_on_tag_only_name() {
        assert_eq!(move_to_tag("[A]", "C"), "[C]");
    }

    #[test]
    fn test_sanitize_tag_clean_input() {
        let s = sanitize_tag("Dark");
        assert_eq!(s.tag, "Dark");
        assert!(!s.altered);
    }

    #[test]
    fn test_sanitize_tag_strips_illegal_chars() {
        let s = sanitize_tag("Da/rk:*?");
        assert_eq!(s.tag, "Dark");
        assert!(s.altered);
    }

    #[test]
    fn test_sanitize_tag_can_empty_out() {
        let s = sanitize_tag("\\/:*");
        assert!(s.tag.is_empty());
        assert!(s.altered);
    }
}
