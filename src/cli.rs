//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "themetree")]
#[command(author, version, about = "Organize SillyTavern theme presets into tag-based virtual folders")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize themetree in the current directory
    Init {
        /// Force overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the folder tree derived from the live theme list
    Tree,
    /// Rename a theme, migrating favorites and background bindings
    Rename {
        /// Current theme name (bracket groups included)
        old: String,
        /// New theme name
        new: String,
    },
    /// Delete one or more themes
    Delete {
        /// Theme names to delete
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Edit the bracket tags of the selected themes
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },
    /// Dissolve folders: strip their tag from every theme carrying it
    Dissolve {
        /// Folder (tag) names to dissolve
        #[arg(required = true)]
        folders: Vec<String>,
    },
    /// Import theme JSON files into the store
    Import {
        /// Paths to theme JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Toggle a theme's favorite mark
    Fav {
        /// Theme name
        name: String,
    },
    /// Bind a theme to a background, or clear the binding
    Bg {
        /// Background file name
        background: String,
        /// Theme to bind; omit to clear an existing binding
        theme: Option<String>,
    },
    /// Switch to a uniformly random theme
    Random,
}

#[derive(Subcommand)]
pub enum TagAction {
    /// Prepend [TAG] to each selected theme (never deduplicated)
    Add {
        /// Tag to add
        tag: String,
        /// Theme names to retag
        #[arg(required = true)]
        themes: Vec<String>,
    },
    /// Remove the first literal [TAG] occurrence from each selected theme
    Remove {
        /// Tag to remove (matched literally)
        tag: String,
        /// Theme names to retag
        #[arg(required = true)]
        themes: Vec<String>,
    },
    /// Replace all bracket groups with a single [TAG]
    Move {
        /// Destination tag
        tag: String,
        /// Theme names to move
        #[arg(required = true)]
        themes: Vec<String>,
    },
}
