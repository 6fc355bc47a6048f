//! Import command implementation

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::config::Config;

use super::{open_engine, print_refresh_hint, print_summary};

/// Run the import command: upsert each JSON file as a theme.
///
/// Unreadable files abort before anything is sent; invalid theme blobs
/// are per-file failures inside the batch.
pub fn run_import(config: &Config, files: &[PathBuf]) -> Result<()> {
    let mut payloads = Vec::with_capacity(files.len());
    for path in files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        payloads.push((path.display().to_string(), content));
    }

    let mut engine = open_engine(config)?;
    let summary = engine.import_themes(&payloads)?;

    print_summary(&summary);
    print_refresh_hint(&engine);
    Ok(())
}
