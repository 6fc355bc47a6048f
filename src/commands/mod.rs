//! Command implementations

pub mod import;
pub mod init;
pub mod tag;
pub mod theme;
pub mod tree;

pub use import::run_import;
pub use init::run_init;
pub use tag::{run_dissolve, run_tag};
pub use theme::{run_bg, run_delete, run_fav, run_random, run_rename};
pub use tree::run_tree;

use anyhow::{Context, Result};
use std::rc::Rc;

use crate::api::HttpStore;
use crate::bindings::BindingStore;
use crate::config::Config;
use crate::engine::{BatchSummary, Notifier, SyncEngine};

/// Notifier that forwards warnings to stderr. Busy state is meaningless
/// for a one-shot CLI invocation.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn warn(&self, message: &str) {
        eprintln!("⚠️  {message}");
    }
}

/// Build an engine against the configured host and sync the mirror.
pub(crate) fn open_engine(config: &Config) -> Result<SyncEngine<HttpStore>> {
    let store = HttpStore::new(&config.base_url, config.token());
    let bindings = BindingStore::open(&config.data_dir)
        .context("Failed to open the local binding store")?;

    let mut engine = SyncEngine::new(
        store,
        bindings,
        &config.fallback_theme,
        config.reload_policy,
    );
    engine.set_notifier(Rc::new(ConsoleNotifier));
    engine
        .sync()
        .with_context(|| format!("Failed to fetch themes from {}", config.base_url))?;
    Ok(engine)
}

/// Print a batch tally plus its per-item notes.
pub(crate) fn print_summary(summary: &BatchSummary) {
    for message in &summary.messages {
        println!("   {message}");
    }
    println!("{}", summary.describe());
}

/// Remind the user that the host UI shows stale state until reloaded.
pub(crate) fn print_refresh_hint<S: crate::api::ThemeStore>(engine: &SyncEngine<S>) {
    if engine.refresh_needed() {
        println!("ℹ️  Reload the host page to see the changes.");
    }
}
