//! Tree command implementation

use anyhow::Result;

use crate::config::Config;

use super::open_engine;

/// Run the tree command: print the folder tree derived from the live
/// theme list and the local bindings.
pub fn run_tree(config: &Config) -> Result<()> {
    let mut engine = open_engine(config)?;
    let tree = engine.view();

    if tree.iter().all(|category| category.themes.is_empty()) {
        println!("No themes found on {}.", config.base_url);
        return Ok(());
    }

    for category in &tree {
        let icon = if category.is_special { "⭐" } else { "📁" };
        let collapsed = if category.is_collapsed { " (collapsed)" } else { "" };
        println!("{} {} ({}){}", icon, category.tag, category.themes.len(), collapsed);

        for theme in &category.themes {
            let star = if theme.is_favorite { " ★" } else { "" };
            if theme.display == theme.name {
                println!("   • {}{}", theme.display, star);
            } else {
                println!("   • {}{}  [{}]", theme.display, star, theme.name);
            }
        }
    }

    Ok(())
}
