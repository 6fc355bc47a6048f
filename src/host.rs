//! Host selection surface model
//!
//! Mirrors the host's ordered list of theme entries with one entry marked
//! active. The engine patches it incrementally after self-initiated
//! mutations and replaces it wholesale when the host reports an external
//! change; both paths key entries by name, so a rename observed twice
//! cannot leave duplicates.

/// One `(value, label)` pair on the host surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectEntry {
    pub value: String,
    pub label: String,
}

impl SelectEntry {
    pub fn named(name: &str) -> Self {
        Self {
            value: name.to_string(),
            label: name.to_string(),
        }
    }
}

/// Local mirror of the host's theme selector.
#[derive(Debug, Clone, Default)]
pub struct HostSelect {
    entries: Vec<SelectEntry>,
    active: Option<usize>,
}

impl HostSelect {
    /// Build the mirror from an ordered name list, nothing active yet.
    pub fn from_names(names: &[String]) -> Self {
        Self {
            entries: names.iter().map(|n| SelectEntry::named(n)).collect(),
            active: None,
        }
    }

    /// All known names in surface order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.value.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.value == name)
    }

    /// The currently active theme name, if any.
    pub fn active_name(&self) -> Option<&str> {
        self.active.map(|i| self.entries[i].value.as_str())
    }

    /// Mark `name` active. Returns false when the name is unknown.
    pub fn set_active(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|e| e.value == name) {
            Some(index) => {
                self.active = Some(index);
                true
            }
            None => false,
        }
    }

    /// Append a new entry, skipping names already present.
    pub fn apply_add(&mut self, name: &str) {
        if !self.contains(name) {
            self.entries.push(SelectEntry::named(name));
        }
    }

    /// Remove an entry by name. The active marker follows its entry.
    pub fn apply_delete(&mut self, name: &str) {
        let Some(index) = self.entries.iter().position(|e| e.value == name) else {
            return;
        };
        self.entries.remove(index);
        self.active = match self.active {
            Some(a) if a == index => None,
            Some(a) if a > index => Some(a - 1),
            other => other,
        };
    }

    /// Rename an entry in place, keeping position and active state.
    pub fn apply_rename(&mut self, old_name: &str, new_name: &str) {
        // Drop a pre-existing entry under the new name first so a rename
        // that was also observed externally cannot duplicate.
        if old_name != new_name && self.contains(new_name) {
            self.apply_delete(new_name);
        }
        if let Some(entry) = self.entries.iter_mut().find(|e| e.value == old_name) {
            entry.value = new_name.to_string();
            entry.label = new_name.to_string();
        }
    }

    /// Replace the whole surface from an authoritative name list.
    ///
    /// The active marker survives when its name is still present.
    pub fn replace_all(&mut self, names: &[String]) {
        let active_name = self.active_name().map(str::to_string);
        self.entries = names.iter().map(|n| SelectEntry::named(n)).collect();
        self.active = active_name
            .and_then(|name| self.entries.iter().position(|e| e.value == name));
    }

    /// Whether `names` differs from the mirrored surface (order included).
    pub fn differs_from(&self, names: &[String]) -> bool {
        self.entries.len() != names.len()
            || self
                .entries
                .iter()
                .zip(names.iter())
                .any(|(entry, name)| &entry.value != name)
    }

    /// Pick a still-valid active entry after the active theme vanished:
    /// `preferred` when present, else the first remaining entry.
    ///
    /// Returns the chosen name so the caller can notify the host.
    pub fn fallback_active(&mut self, preferred: &str) -> Option<String> {
        if self.set_active(preferred) {
            return Some(preferred.to_string());
        }
        let first = self.entries.first().map(|e| e.value.clone())?;
        self.set_active(&first);
        Some(first)
    }
}
