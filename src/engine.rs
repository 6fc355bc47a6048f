//! Sync engine
//!
//! Executes one logical user intent as one or more theme-store mutations
//! while keeping the local bindings and the host selection mirror
//! consistent. The remote store is the sole authority: every operation
//! re-derives the state it depends on instead of trusting an earlier
//! snapshot, because the host (or another browser tab) can mutate the
//! store out-of-band at any time.
//!
//! Batch operations apply per-item mutations in selection order, isolate
//! per-item errors at the item boundary and report an ordered tally where
//! `succeeded + failed + skipped` always equals the selection size.

use std::collections::BTreeSet;
use std::rc::Rc;

use rand::Rng;

use crate::api::{Theme, ThemeStore};
use crate::bindings::BindingStore;
use crate::category::{self, CategoryView};
use crate::debug;
use crate::error::SyncError;
use crate::host::HostSelect;
use crate::session::Selection;
use crate::tags;

/// How the engine reconciles the host mirror after a mutation.
///
/// Both strategies converge to the same visible state; which one feels
/// better depends on the host, so it is configuration rather than a fixed
/// behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadPolicy {
    /// Refetch the full theme list and rebuild the mirror from scratch.
    #[default]
    FullRebuild,
    /// Keep the incrementally patched mirror; refetch only on external
    /// change signals.
    IncrementalPatch,
}

/// Sink for busy indication and non-fatal warnings.
///
/// Long operations hold the busy state from start to completion; release is
/// guaranteed on every exit path, including errors.
pub trait Notifier {
    fn busy_begin(&self) {}
    fn busy_end(&self) {}
    fn warn(&self, _message: &str) {}
}

/// Default sink that swallows everything.
pub struct SilentNotifier;

impl Notifier for SilentNotifier {}

/// Holds the busy state for a scope; released on drop.
struct BusyGuard {
    notifier: Rc<dyn Notifier>,
}

impl BusyGuard {
    fn hold(notifier: Rc<dyn Notifier>) -> Self {
        notifier.busy_begin();
        Self { notifier }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.notifier.busy_end();
    }
}

/// Ordered tally of a batch operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Per-item failure/skip notes, in the order the items were processed.
    pub messages: Vec<String>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }

    /// One-line summary for the concluding notification.
    pub fn describe(&self) -> String {
        let mut text = format!("Batch complete: {} succeeded", self.succeeded);
        if self.failed > 0 {
            text.push_str(&format!(", {} failed", self.failed));
        }
        if self.skipped > 0 {
            text.push_str(&format!(", {} skipped", self.skipped));
        }
        text.push('.');
        text
    }

    fn record(&mut self, item: &str, result: Result<(), SyncError>) {
        match result {
            Ok(()) => self.succeeded += 1,
            Err(err) if err.is_skip() => {
                self.skipped += 1;
                self.messages.push(format!("{item}: {err}"));
            }
            Err(err) => {
                self.failed += 1;
                self.messages.push(format!("{item}: {err}"));
            }
        }
    }
}

/// A batch tag edit applied to each selected theme independently.
#[derive(Debug, Clone)]
pub enum TagOp {
    /// Prepend a bracket group. Never deduplicated.
    Add(String),
    /// Remove the first literal occurrence.
    Remove(String),
    /// Replace all bracket groups with a single one.
    MoveTo(String),
}

impl TagOp {
    fn apply(&self, name: &str) -> String {
        match self {
            TagOp::Add(tag) => tags::add_tag(name, tag),
            TagOp::Remove(tag) => tags::remove_tag(name, tag),
            TagOp::MoveTo(tag) => tags::move_to_tag(name, tag),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TagOp::Add(_) => "add-tag",
            TagOp::Remove(_) => "remove-tag",
            TagOp::MoveTo(_) => "move-to-tag",
        }
    }
}

/// What a single batch retag item did.
enum RetagOutcome {
    Renamed,
    /// The op left the name as it was (e.g. removing an absent tag).
    Unchanged,
}

/// Result of deleting a single theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Whether the deleted theme was the active selection.
    pub was_active: bool,
    /// The replacement the host was switched to, when a fallback happened.
    pub new_active: Option<String>,
}

/// The core coordinator between the remote store, the host mirror and the
/// local bindings.
pub struct SyncEngine<S: ThemeStore> {
    store: S,
    bindings: BindingStore,
    host: HostSelect,
    policy: ReloadPolicy,
    /// Name preferred when the active theme is deleted ("Azure" by default).
    fallback_theme: String,
    notifier: Rc<dyn Notifier>,
    /// Latched after any completed mutation until the shell acknowledges;
    /// the host page may need a reload for every change to fully apply.
    refresh_needed: bool,
    /// Categories the shell should leave expanded after the next rebuild.
    reopen: BTreeSet<String>,
}

impl<S: ThemeStore> SyncEngine<S> {
    pub fn new(store: S, bindings: BindingStore, fallback_theme: &str, policy: ReloadPolicy) -> Self {
        Self {
            store,
            bindings,
            host: HostSelect::default(),
            policy,
            fallback_theme: fallback_theme.to_string(),
            notifier: Rc::new(SilentNotifier),
            refresh_needed: false,
            reopen: BTreeSet::new(),
        }
    }

    pub fn set_notifier(&mut self, notifier: Rc<dyn Notifier>) {
        self.notifier = notifier;
    }

    pub fn host(&self) -> &HostSelect {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut HostSelect {
        &mut self.host
    }

    pub fn bindings(&self) -> &BindingStore {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut BindingStore {
        &mut self.bindings
    }

    pub fn refresh_needed(&self) -> bool {
        self.refresh_needed
    }

    pub fn acknowledge_refresh(&mut self) {
        self.refresh_needed = false;
    }

    /// Categories touched by the last batch, for the shell to re-expand.
    /// Draining resets the set.
    pub fn take_reopen_categories(&mut self) -> BTreeSet<String> {
        std::mem::take(&mut self.reopen)
    }

    /// Refetch the authoritative list and rebuild the host mirror.
    pub fn sync(&mut self) -> Result<(), SyncError> {
        let themes = self.store.list()?;
        let names: Vec<String> = themes.into_iter().map(|t| t.name).collect();
        self.host.replace_all(&names);
        self.note_live_tags(&names);
        Ok(())
    }

    /// Authoritative state changed out-of-band (the host saved a theme of
    /// its own, another tab renamed one). Rebuild the mirror wholesale.
    ///
    /// Replacing by name makes this idempotent with self-initiated patches:
    /// a rename observed both ways cannot leave a duplicate entry.
    pub fn on_external_change(&mut self, names: &[String]) {
        if self.host.differs_from(names) {
            debug::log_sync("external", &format!("{} entries", names.len()));
            self.host.replace_all(names);
            self.note_live_tags(names);
        }
    }

    /// Current folder tree, derived from the host mirror and the bindings.
    pub fn view(&mut self) -> Vec<CategoryView> {
        let names = self.host.names();
        self.note_live_tags(&names);
        category::build(
            &names,
            self.bindings.favorites(),
            self.bindings.order(),
            self.bindings.collapsed(),
        )
    }

    /// Pick a uniformly random theme and make it active.
    pub fn random_theme(&mut self) -> Option<String> {
        let names = self.host.names();
        if names.is_empty() {
            return None;
        }
        let pick = names[rand::rng().random_range(0..names.len())].clone();
        self.host.set_active(&pick);
        Some(pick)
    }

    /// Rename one theme, migrating its bindings.
    ///
    /// Re-fetches the authoritative list first: the name may have been
    /// taken, or the theme removed, since the caller last looked.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), SyncError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(SyncError::InvalidInput("new name is empty".to_string()));
        }
        if new_name == old_name {
            return Err(SyncError::InvalidInput(
                "new name is identical to the old one".to_string(),
            ));
        }

        let _busy = BusyGuard::hold(Rc::clone(&self.notifier));
        let themes = self.store.list()?;
        let theme = themes
            .iter()
            .find(|t| t.name == old_name)
            .ok_or_else(|| SyncError::NotFound(old_name.to_string()))?
            .clone();

        if themes.iter().any(|t| t.name == new_name && t.name != old_name) {
            return Err(SyncError::NameConflict(new_name.to_string()));
        }

        self.rename_fetched(&theme, new_name)?;
        self.after_mutation();
        Ok(())
    }

    /// Rename a theme already fetched from the store. The store has no
    /// atomic rename, so this is save-under-new-name then delete-old-name.
    ///
    /// Bindings move as soon as the save succeeds: from that point the new
    /// name is the one the user sees, even if deleting the old copy fails.
    fn rename_fetched(&mut self, theme: &Theme, new_name: &str) -> Result<(), SyncError> {
        debug::log_sync("rename", &format!("{} -> {}", theme.name, new_name));
        self.store.save(&theme.renamed(new_name))?;

        if let Err(err) = self.bindings.migrate_theme(&theme.name, new_name) {
            self.report_bookkeeping_failure("binding migration", &err);
        }
        self.host.apply_rename(&theme.name, new_name);

        match self.store.delete(&theme.name) {
            Ok(()) => Ok(()),
            // Already gone is fine: someone else cleaned up the old copy.
            Err(SyncError::NotFound(_)) => Ok(()),
            Err(err) => Err(SyncError::RenameLeftDuplicate {
                old: theme.name.clone(),
                new: new_name.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    /// Delete one theme, falling back to a still-valid active selection.
    pub fn delete(&mut self, name: &str) -> Result<DeleteOutcome, SyncError> {
        let _busy = BusyGuard::hold(Rc::clone(&self.notifier));
        let outcome = self.delete_one(name)?;
        self.after_mutation();
        Ok(outcome)
    }

    fn delete_one(&mut self, name: &str) -> Result<DeleteOutcome, SyncError> {
        debug::log_sync("delete", name);
        let was_active = self.host.active_name() == Some(name);

        match self.store.delete(name) {
            Ok(()) => {}
            // Already gone server-side; finish the local cleanup anyway.
            Err(SyncError::NotFound(_)) => {}
            Err(err) => return Err(err),
        }

        if let Err(err) = self.bindings.remove_theme(name) {
            self.report_bookkeeping_failure("binding removal", &err);
        }
        self.host.apply_delete(name);

        let new_active = if was_active {
            let fallback = self.fallback_theme.clone();
            self.host.fallback_active(&fallback)
        } else {
            None
        };

        Ok(DeleteOutcome {
            was_active,
            new_active,
        })
    }

    /// Apply one tag edit to every selected theme independently.
    ///
    /// The authoritative list is fetched once at batch start; collision
    /// checks run against that snapshot updated with the batch's own
    /// renames, so two items mapping to the same target name resolve as one
    /// success and one [`SyncError::NameConflict`] skip.
    pub fn batch_retag(
        &mut self,
        selection: &mut Selection,
        op: &TagOp,
    ) -> Result<BatchSummary, SyncError> {
        if selection.is_empty() {
            return Err(SyncError::InvalidInput("no themes selected".to_string()));
        }
        let op = self.sanitized_op(op)?;

        let _busy = BusyGuard::hold(Rc::clone(&self.notifier));
        debug::log_sync(op.label(), &format!("{} selected", selection.len()));

        let snapshot = self.store.list()?;
        let mut live_names: Vec<String> = snapshot.iter().map(|t| t.name.clone()).collect();
        let mut summary = BatchSummary::default();

        for old_name in selection.names().to_vec() {
            match self.retag_one(&snapshot, &mut live_names, &old_name, &op) {
                // Name unchanged: nothing to do, counted as a skip.
                Ok(RetagOutcome::Unchanged) => summary.skipped += 1,
                other => summary.record(&old_name, other.map(|_| ())),
            }
        }

        selection.clear();
        drop(_busy);
        self.after_mutation();
        Ok(summary)
    }

    fn retag_one(
        &mut self,
        snapshot: &[Theme],
        live_names: &mut Vec<String>,
        old_name: &str,
        op: &TagOp,
    ) -> Result<RetagOutcome, SyncError> {
        let theme = snapshot
            .iter()
            .find(|t| t.name == old_name)
            .ok_or_else(|| SyncError::NotFound(old_name.to_string()))?;

        let new_name = op.apply(old_name);
        if new_name == old_name {
            return Ok(RetagOutcome::Unchanged);
        }
        if live_names.iter().any(|n| n == &new_name) {
            return Err(SyncError::NameConflict(new_name));
        }

        self.rename_fetched(theme, &new_name)?;
        if let Some(slot) = live_names.iter_mut().find(|n| n.as_str() == old_name) {
            *slot = new_name.clone();
        }
        for tag in tags::extract_tags(&new_name).tags {
            self.reopen.insert(tag);
        }
        Ok(RetagOutcome::Renamed)
    }

    /// Remove the selected tags from every theme carrying them, without
    /// deleting any theme. Each selected tag is stripped exactly once per
    /// theme; themes left with no bracket groups become Uncategorized
    /// implicitly.
    pub fn dissolve_folders(
        &mut self,
        folders: &mut Selection,
    ) -> Result<BatchSummary, SyncError> {
        if folders.is_empty() {
            return Err(SyncError::InvalidInput("no folders selected".to_string()));
        }

        let _busy = BusyGuard::hold(Rc::clone(&self.notifier));
        debug::log_sync("dissolve", &format!("{} folders", folders.len()));

        let snapshot = self.store.list()?;
        let mut live_names: Vec<String> = snapshot.iter().map(|t| t.name.clone()).collect();
        let mut summary = BatchSummary::default();

        let selected = folders.names().to_vec();
        for folder in &selected {
            self.reopen.insert(folder.clone());
        }

        for theme in &snapshot {
            let theme_tags = tags::extract_tags(&theme.name).tags;
            let carried: Vec<&String> = selected
                .iter()
                .filter(|folder| theme_tags.contains(*folder))
                .collect();
            if carried.is_empty() {
                continue;
            }

            let mut new_name = theme.name.clone();
            for folder in carried {
                new_name = tags::remove_tag(&new_name, folder);
            }

            let result = if live_names.iter().any(|n| n == &new_name) {
                Err(SyncError::NameConflict(new_name.clone()))
            } else {
                self.rename_fetched(theme, &new_name).inspect(|()| {
                    if let Some(slot) =
                        live_names.iter_mut().find(|n| n.as_str() == theme.name)
                    {
                        *slot = new_name.clone();
                    }
                })
            };
            summary.record(&theme.name, result);
        }

        folders.clear();
        drop(_busy);
        self.after_mutation();
        Ok(summary)
    }

    /// Delete every selected theme sequentially.
    ///
    /// The active-theme fallback is evaluated per item at deletion time:
    /// an earlier item's fallback may itself be deleted later in the batch.
    pub fn batch_delete(&mut self, selection: &mut Selection) -> Result<BatchSummary, SyncError> {
        if selection.is_empty() {
            return Err(SyncError::InvalidInput("no themes selected".to_string()));
        }

        let _busy = BusyGuard::hold(Rc::clone(&self.notifier));
        debug::log_sync("batch-delete", &format!("{} selected", selection.len()));

        let mut summary = BatchSummary::default();
        for name in selection.names().to_vec() {
            for tag in tags::extract_tags(&name).tags {
                self.reopen.insert(tag);
            }
            let result = self.delete_one(&name).map(|_| ());
            summary.record(&name, result);
        }

        selection.clear();
        drop(_busy);
        self.after_mutation();
        Ok(summary)
    }

    /// Import theme files, each a standalone JSON object.
    ///
    /// A blob missing a `name` or the payload marker field is rejected as a
    /// per-file failure; valid blobs upsert (overwriting a same-named
    /// theme is the documented import behavior).
    pub fn import_themes(&mut self, files: &[(String, String)]) -> Result<BatchSummary, SyncError> {
        if files.is_empty() {
            return Err(SyncError::InvalidInput("no files given".to_string()));
        }

        let _busy = BusyGuard::hold(Rc::clone(&self.notifier));
        debug::log_sync("import", &format!("{} files", files.len()));

        let mut summary = BatchSummary::default();
        for (file_name, content) in files {
            let result = self.import_one(content);
            summary.record(file_name, result);
        }

        drop(_busy);
        self.after_mutation();
        Ok(summary)
    }

    fn import_one(&mut self, content: &str) -> Result<(), SyncError> {
        let theme: Theme = serde_json::from_str(content)
            .map_err(|err| SyncError::InvalidInput(format!("not a theme JSON object: {err}")))?;
        if theme.name.trim().is_empty() {
            return Err(SyncError::InvalidInput("theme has no name".to_string()));
        }
        if !theme.has_marker() {
            return Err(SyncError::InvalidInput(format!(
                "missing required field \"{}\"",
                crate::api::THEME_MARKER_FIELD
            )));
        }
        self.store.save(&theme)?;
        self.host.apply_add(&theme.name);
        Ok(())
    }

    /// Validate and sanitize the user-entered tag inside an op.
    fn sanitized_op(&self, op: &TagOp) -> Result<TagOp, SyncError> {
        let sanitize = |raw: &str| -> Result<String, SyncError> {
            let cleaned = tags::sanitize_tag(raw);
            if cleaned.tag.is_empty() {
                return Err(SyncError::InvalidInput(format!(
                    "tag \"{raw}\" is empty after removing illegal characters"
                )));
            }
            if cleaned.altered {
                self.notifier.warn(&format!(
                    "tag contained illegal characters; using \"{}\"",
                    cleaned.tag
                ));
            }
            Ok(cleaned.tag)
        };

        Ok(match op {
            TagOp::Add(tag) => TagOp::Add(sanitize(tag)?),
            TagOp::MoveTo(tag) => TagOp::MoveTo(sanitize(tag)?),
            // Removal matches an existing tag literally; no sanitization.
            TagOp::Remove(tag) => TagOp::Remove(tag.clone()),
        })
    }

    /// Post-mutation reconciliation per the configured policy.
    fn after_mutation(&mut self) {
        self.refresh_needed = true;
        if self.policy == ReloadPolicy::FullRebuild {
            if let Err(err) = self.sync() {
                // The mutation itself already succeeded; a failed reload
                // only leaves the mirror stale until the next sync.
                self.notifier
                    .warn(&format!("reload after mutation failed: {err}"));
                debug::log_sync("reload", &err.to_string());
            }
        }
    }

    fn note_live_tags(&mut self, names: &[String]) {
        let mut live: Vec<String> = Vec::new();
        for name in names {
            let extracted = tags::extract_tags(name);
            if !extracted.is_untagged {
                live.extend(extracted.tags);
            }
        }
        if let Err(err) = self.bindings.note_tags(&live) {
            self.report_bookkeeping_failure("category order update", &err);
        }
    }

    /// Local bookkeeping failed after the remote mutation already
    /// succeeded. Must be surfaced, never hidden.
    fn report_bookkeeping_failure(&self, what: &str, err: &anyhow::Error) {
        debug::log_bindings(&format!("{what} failed: {err:#}"));
        self.notifier.warn(&format!("{what} failed: {err:#}"));
    }
}
