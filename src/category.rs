//! Category index
//!
//! Derives the virtual folder tree from the authoritative theme-name list
//! plus the locally persisted ordering, favorites and collapse state. Pure
//! data transformation; the engine rebuilds this after every mutation.

use std::collections::{BTreeSet, HashSet};

use crate::tags::{self, UNCATEGORIZED};

/// The special, locally-tracked pseudo-category. Always rendered first and
/// kept visible even when empty so it stays a stable drop target.
pub const FAVORITES: &str = "Favorites";

/// One theme as it appears inside a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeView {
    /// Full stored name, bracket groups included. The unique key.
    pub name: String,

    /// Name with bracket groups stripped, for display.
    pub display: String,

    /// Tags as extracted from the name, duplicates preserved so the shell
    /// can render the theme's own chips faithfully.
    pub tags: Vec<String>,

    /// Whether the theme is in the local favorites set.
    pub is_favorite: bool,
}

/// One rendered folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub tag: String,
    pub themes: Vec<ThemeView>,
    pub is_collapsed: bool,
    /// True for Favorites and Uncategorized.
    pub is_special: bool,
}

/// Case-insensitive ordering for tags the persisted order has not seen yet.
///
/// The host sorts with a locale collator; this crate approximates it with a
/// lowercase comparison and a raw tiebreak, which is deterministic and
/// stable for tag strings.
pub fn tag_cmp(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn parse_themes(theme_names: &[String], favorites: &BTreeSet<String>) -> Vec<ThemeView> {
    theme_names
        .iter()
        .filter(|name| !name.is_empty())
        .map(|name| {
            let extracted = tags::extract_tags(name);
            ThemeView {
                name: name.clone(),
                display: tags::display_name(name),
                tags: extracted.tags,
                is_favorite: favorites.contains(name),
            }
        })
        .collect()
}

/// Themes carrying `tag`, in authoritative list order, each at most once.
///
/// Membership is de-duplicated: a theme named `"[A] [A] X"` appears a
/// single time in category A.
fn members_of<'a>(parsed: &'a [ThemeView], tag: &str) -> Vec<&'a ThemeView> {
    parsed
        .iter()
        .filter(|theme| theme.tags.iter().any(|t| t == tag))
        .collect()
}

/// Build the ordered folder tree.
///
/// Ordering: Favorites first; non-special tags by their position in
/// `order`, with tags the order has never seen appended in [`tag_cmp`]
/// order; Uncategorized last when non-empty. Theme order within a category
/// follows `theme_names` (no alphabetical re-sort). Empty non-special
/// categories are omitted; Favorites always renders, Uncategorized only
/// when it has members. Stale `order` entries are harmless dead weight.
pub fn build(
    theme_names: &[String],
    favorites: &BTreeSet<String>,
    order: &[String],
    collapsed: &BTreeSet<String>,
) -> Vec<CategoryView> {
    let parsed = parse_themes(theme_names, favorites);

    // Live tags, excluding the specials handled explicitly below.
    let mut live: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for theme in &parsed {
        for tag in &theme.tags {
            if tag != UNCATEGORIZED && tag != FAVORITES && seen.insert(tag) {
                live.push(tag.clone());
            }
        }
    }

    let known: HashSet<&String> = order.iter().collect();
    let mut ordered: Vec<String> = order
        .iter()
        .filter(|tag| live.iter().any(|t| t == *tag))
        .cloned()
        .collect();
    let mut newcomers: Vec<String> = live
        .into_iter()
        .filter(|tag| !known.contains(tag))
        .collect();
    newcomers.sort_by(|a, b| tag_cmp(a, b));
    ordered.extend(newcomers);

    let mut out = Vec::with_capacity(ordered.len() + 2);

    let favorite_themes: Vec<ThemeView> = parsed
        .iter()
        .filter(|theme| theme.is_favorite)
        .cloned()
        .collect();
    out.push(CategoryView {
        tag: FAVORITES.to_string(),
        themes: favorite_themes,
        is_collapsed: collapsed.contains(FAVORITES),
        is_special: true,
    });

    for tag in ordered {
        let themes: Vec<ThemeView> = members_of(&parsed, &tag)
            .into_iter()
            .cloned()
            .collect();
        if themes.is_empty() {
            continue;
        }
        out.push(CategoryView {
            is_collapsed: collapsed.contains(&tag),
            is_special: false,
            tag,
            themes,
        });
    }

    let untagged: Vec<ThemeView> = members_of(&parsed, UNCATEGORIZED)
        .into_iter()
        .cloned()
        .collect();
    if !untagged.is_empty() {
        out.push(CategoryView {
            tag: UNCATEGORIZED.to_string(),
            themes: untagged,
            is_collapsed: collapsed.contains(UNCATEGORIZED),
            is_special: true,
        });
    }

    out
}
