//! Single-theme commands: rename, delete, favorites, background
//! bindings and the random picker.

use anyhow::Result;

use crate::config::Config;
use crate::session::Selection;

use super::{open_engine, print_refresh_hint, print_summary};

/// Run the rename command
pub fn run_rename(config: &Config, old: &str, new: &str) -> Result<()> {
    let mut engine = open_engine(config)?;
    engine.rename(old, new)?;
    println!("✅ Renamed \"{old}\" to \"{new}\"");
    print_refresh_hint(&engine);
    Ok(())
}

/// Run the delete command. A single name reports the active-theme
/// fallback; several names run as a batch with a tally.
pub fn run_delete(config: &Config, names: &[String]) -> Result<()> {
    let mut engine = open_engine(config)?;

    if let [name] = names {
        let outcome = engine.delete(name)?;
        println!("✅ Deleted \"{name}\"");
        if let Some(new_active) = outcome.new_active {
            println!("   Active theme switched to \"{new_active}\"");
        }
    } else {
        let mut selection = Selection::from_names(names.iter().cloned());
        let summary = engine.batch_delete(&mut selection)?;
        print_summary(&summary);
    }

    print_refresh_hint(&engine);
    Ok(())
}

/// Run the fav command: toggle the local favorite mark.
pub fn run_fav(config: &Config, name: &str) -> Result<()> {
    let mut engine = open_engine(config)?;
    if !engine.host().contains(name) {
        anyhow::bail!("No theme named \"{name}\" on the host");
    }

    if engine.bindings_mut().toggle_favorite(name)? {
        println!("⭐ \"{name}\" added to Favorites");
    } else {
        println!("✅ \"{name}\" removed from Favorites");
    }
    Ok(())
}

/// Run the bg command: bind a theme to a background, or clear the binding.
pub fn run_bg(config: &Config, background: &str, theme: Option<&str>) -> Result<()> {
    let mut engine = open_engine(config)?;

    match theme {
        Some(theme) => {
            if !engine.host().contains(theme) {
                anyhow::bail!("No theme named \"{theme}\" on the host");
            }
            engine.bindings_mut().bind_background(theme, background)?;
            println!("✅ \"{theme}\" now loads with background \"{background}\"");
        }
        None => {
            let bound: Vec<String> = engine
                .host()
                .names()
                .into_iter()
                .filter(|name| engine.bindings().background_of(name) == Some(background))
                .collect();
            if bound.is_empty() {
                println!("No theme is bound to background \"{background}\"");
                return Ok(());
            }
            for name in &bound {
                engine.bindings_mut().unbind_background(name)?;
                println!("✅ Cleared binding of \"{name}\" to \"{background}\"");
            }
        }
    }
    Ok(())
}

/// Run the random command: pick and activate a uniformly random theme.
pub fn run_random(config: &Config) -> Result<()> {
    let mut engine = open_engine(config)?;
    match engine.random_theme() {
        Some(pick) => println!("🎲 Switched to \"{pick}\""),
        None => println!("No themes to pick from."),
    }
    Ok(())
}
