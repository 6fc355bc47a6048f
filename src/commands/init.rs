//! Init command implementation

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::api::{HttpStore, ThemeStore};
use crate::config::{Config, TOKEN_ENV_VAR};

/// Run the init command
pub fn run_init(force: bool) -> Result<()> {
    println!("🚀 Initializing themetree...\n");

    // 1. Create .themetree.toml config if not exists
    let config_path = PathBuf::from(".themetree.toml");
    if !config_path.exists() || force {
        Config::generate_default(&config_path)?;
        println!("✅ Created configuration: .themetree.toml");
    } else {
        println!("📄 Configuration file already exists (use --force to overwrite)");
    }

    let config = Config::load()?;

    // 2. Create the data directory for favorites and bindings
    if !config.data_dir.exists() {
        fs::create_dir_all(&config.data_dir)?;
        println!("✅ Created data directory: {}", config.data_dir.display());
    } else {
        println!("📁 Data directory already exists: {}", config.data_dir.display());
    }

    println!("\n---\n");

    // 3. Check token
    match config.token() {
        Some(_) => println!("🔑 Session token: ✅ Found"),
        None => {
            println!("🔑 Session token: ⚠️  Not set");
            println!("   Set {TOKEN_ENV_VAR} or the `token` key in .themetree.toml");
            println!("   if the host requires a CSRF token.");
        }
    }

    // 4. Probe the host
    print!("🌐 Host {}: ", config.base_url);
    let store = HttpStore::new(&config.base_url, config.token());
    match store.list() {
        Ok(themes) => println!("✅ Reachable ({} themes)", themes.len()),
        Err(err) => {
            println!("⚠️  Not reachable");
            println!("   {err}");
        }
    }

    println!("\n🎉 themetree initialization complete!");
    println!("\nNext steps:");
    println!("  1. 'themetree tree' to see your themes grouped by [tag]");
    println!("  2. 'themetree tag add <tag> <theme>...' to file themes into folders");
    println!("  3. 'themetree fav <theme>' to pin favorites");

    Ok(())
}
