use anyhow::Result;
use clap::Parser;

use themetree::cli::{Cli, Commands};
use themetree::commands;
use themetree::config::Config;
use themetree::debug;

fn main() -> Result<()> {
    debug::init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init { force } => commands::run_init(force),
        Commands::Tree => commands::run_tree(&config),
        Commands::Rename { old, new } => commands::run_rename(&config, &old, &new),
        Commands::Delete { names } => commands::run_delete(&config, &names),
        Commands::Tag { action } => commands::run_tag(&config, &action),
        Commands::Dissolve { folders } => commands::run_dissolve(&config, &folders),
        Commands::Import { files } => commands::run_import(&config, &files),
        Commands::Fav { name } => commands::run_fav(&config, &name),
        Commands::Bg { background, theme } => {
            commands::run_bg(&config, &background, theme.as_deref())
        }
        Commands::Random => commands::run_random(&config),
    }
}
