//! Batch-mode selection state
//!
//! The shell owns one of these while batch editing is active and passes it
//! by reference into engine calls. Selections keep insertion order because
//! batch mutations are applied, and tallied, in exactly that order.

/// An ordered, duplicate-free selection of names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for name in names {
            selection.insert(name.into());
        }
        selection
    }

    /// Add a name; duplicates are ignored. Returns true when added.
    pub fn insert(&mut self, name: String) -> bool {
        if self.items.contains(&name) {
            false
        } else {
            self.items.push(name);
            true
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        match self.items.iter().position(|n| n == name) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.items
    }

    /// Cleared after every batch operation, success or failure.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Everything the shell tracks while batch-edit mode is on.
#[derive(Debug, Clone, Default)]
pub struct BatchSession {
    pub themes: Selection,
    pub folders: Selection,
}

impl BatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaving batch mode drops both selections.
    pub fn exit(&mut self) {
        self.themes.clear();
        self.folders.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut selection = Selection::new();
        selection.insert("C".to_string());
        selection.insert("A".to_string());
        selection.insert("B".to_string());
        assert_eq!(selection.names(), &["C", "A", "B"]);
    }

    #[test]
    fn test_duplicates_ignored() {
        let mut selection = Selection::new();
        assert!(selection.insert("A".to_string()));
        assert!(!selection.insert("A".to_string()));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut selection = Selection::from_names(["A", "B", "C"]);
        assert!(selection.remove("B"));
        assert!(!selection.remove("B"));
        assert_eq!(selection.names(), &["A", "C"]);
    }

    #[test]
    fn test_session_exit_clears_both() {
        let mut session = BatchSession::new();
        session.themes.insert("X".to_string());
        session.folders.insert("A".to_string());
        session.exit();
        assert!(session.themes.is_empty());
        assert!(session.folders.is_empty());
    }
}
