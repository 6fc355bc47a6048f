//! Tag and dissolve command implementations

use anyhow::Result;

use crate::cli::TagAction;
use crate::config::Config;
use crate::engine::TagOp;
use crate::session::Selection;

use super::{open_engine, print_refresh_hint, print_summary};

/// Run the tag command: apply one tag edit to every selected theme.
pub fn run_tag(config: &Config, action: &TagAction) -> Result<()> {
    let (op, themes) = match action {
        TagAction::Add { tag, themes } => (TagOp::Add(tag.clone()), themes),
        TagAction::Remove { tag, themes } => (TagOp::Remove(tag.clone()), themes),
        TagAction::Move { tag, themes } => (TagOp::MoveTo(tag.clone()), themes),
    };

    let mut engine = open_engine(config)?;
    let mut selection = Selection::from_names(themes.iter().cloned());
    let summary = engine.batch_retag(&mut selection, &op)?;

    print_summary(&summary);
    print_refresh_hint(&engine);
    Ok(())
}

/// Run the dissolve command: strip each folder's tag from every theme
/// carrying it. No theme is deleted.
pub fn run_dissolve(config: &Config, folders: &[String]) -> Result<()> {
    let mut engine = open_engine(config)?;
    let mut selection = Selection::from_names(folders.iter().cloned());
    let summary = engine.dissolve_folders(&mut selection)?;

    print_summary(&summary);
    print_refresh_hint(&engine);
    Ok(())
}
