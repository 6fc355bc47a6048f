//! Locally persisted bindings
//!
//! Four independent key spaces, each its own JSON file under the data
//! directory: favorites, theme-to-background bindings, category display
//! order and the collapsed-folder set. They live client-side with a
//! lifecycle independent from the remote theme store.
//!
//! Each logical mutation rewrites the affected file all-or-nothing (temp
//! file + rename). Missing or corrupted files load as empty collections,
//! never as errors: local state is always reconstructible.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::category::tag_cmp;

/// File names, one per key space.
pub const FAVORITES_FILE: &str = "favorites.json";
pub const BACKGROUNDS_FILE: &str = "backgrounds.json";
pub const ORDER_FILE: &str = "category_order.json";
pub const COLLAPSED_FILE: &str = "collapsed.json";

/// Persistent key-value maps owned by this crate.
#[derive(Debug)]
pub struct BindingStore {
    dir: PathBuf,
    favorites: BTreeSet<String>,
    backgrounds: BTreeMap<String, String>,
    order: Vec<String>,
    collapsed: BTreeSet<String>,
}

fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let Ok(content) = fs::read_to_string(path) else {
        return T::default();
    };
    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(err) => {
            crate::debug::log_bindings(&format!(
                "ignoring corrupt {}: {err}",
                path.display()
            ));
            T::default()
        }
    }
}

fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

impl BindingStore {
    /// Open (and create if needed) the binding store under `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        Ok(Self {
            favorites: load_or_default(&dir.join(FAVORITES_FILE)),
            backgrounds: load_or_default(&dir.join(BACKGROUNDS_FILE)),
            order: load_or_default(&dir.join(ORDER_FILE)),
            collapsed: load_or_default(&dir.join(COLLAPSED_FILE)),
            dir: dir.to_path_buf(),
        })
    }

    // --- favorites ---

    pub fn favorites(&self) -> &BTreeSet<String> {
        &self.favorites
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.contains(name)
    }

    /// Add or remove a favorite. Returns the new state.
    pub fn toggle_favorite(&mut self, name: &str) -> Result<bool> {
        let now_favorite = if self.favorites.remove(name) {
            false
        } else {
            self.favorites.insert(name.to_string());
            true
        };
        write_atomic(&self.dir.join(FAVORITES_FILE), &self.favorites)?;
        Ok(now_favorite)
    }

    // --- background bindings ---

    pub fn background_of(&self, name: &str) -> Option<&str> {
        self.backgrounds.get(name).map(String::as_str)
    }

    pub fn bind_background(&mut self, name: &str, background: &str) -> Result<()> {
        self.backgrounds
            .insert(name.to_string(), background.to_string());
        write_atomic(&self.dir.join(BACKGROUNDS_FILE), &self.backgrounds)
    }

    pub fn unbind_background(&mut self, name: &str) -> Result<()> {
        if self.backgrounds.remove(name).is_some() {
            write_atomic(&self.dir.join(BACKGROUNDS_FILE), &self.backgrounds)?;
        }
        Ok(())
    }

    // --- category order ---

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn set_order(&mut self, order: Vec<String>) -> Result<()> {
        self.order = order;
        write_atomic(&self.dir.join(ORDER_FILE), &self.order)
    }

    /// Record tags seen in the live theme set: unseen tags are appended in
    /// [`tag_cmp`] order after everything already known. Stale entries are
    /// left in place.
    pub fn note_tags(&mut self, live_tags: &[String]) -> Result<()> {
        let mut newcomers: Vec<String> = live_tags
            .iter()
            .filter(|tag| !self.order.contains(tag))
            .cloned()
            .collect();
        if newcomers.is_empty() {
            return Ok(());
        }
        newcomers.sort_by(|a, b| tag_cmp(a, b));
        newcomers.dedup();
        self.order.extend(newcomers);
        write_atomic(&self.dir.join(ORDER_FILE), &self.order)
    }

    // --- collapsed folders ---

    pub fn collapsed(&self) -> &BTreeSet<String> {
        &self.collapsed
    }

    pub fn set_collapsed(&mut self, tag: &str, collapsed: bool) -> Result<()> {
        let changed = if collapsed {
            self.collapsed.insert(tag.to_string())
        } else {
            self.collapsed.remove(tag)
        };
        if changed {
            write_atomic(&self.dir.join(COLLAPSED_FILE), &self.collapsed)?;
        }
        Ok(())
    }

    // --- rename/delete migration ---

    /// Move every binding from `old_name` to `new_name`.
    ///
    /// Called once the remote save under the new name has succeeded, so the
    /// bindings follow the name the user now sees.
    pub fn migrate_theme(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        if self.favorites.remove(old_name) {
            self.favorites.insert(new_name.to_string());
            write_atomic(&self.dir.join(FAVORITES_FILE), &self.favorites)?;
        }
        if let Some(background) = self.backgrounds.remove(old_name) {
            self.backgrounds.insert(new_name.to_string(), background);
            write_atomic(&self.dir.join(BACKGROUNDS_FILE), &self.backgrounds)?;
        }
        Ok(())
    }

    /// Drop every binding for a deleted theme.
    pub fn remove_theme(&mut self, name: &str) -> Result<()> {
        if self.favorites.remove(name) {
            write_atomic(&self.dir.join(FAVORITES_FILE), &self.favorites)?;
        }
        if self.backgrounds.remove(name).is_some() {
            write_atomic(&self.dir.join(BACKGROUNDS_FILE), &self.backgrounds)?;
        }
        Ok(())
    }
}
