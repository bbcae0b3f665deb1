//! `agentdist init`: write a default config file.

use super::CliResult;
use agentdist_config::AppConfig;

pub fn run() -> CliResult {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("Config already exists at: {}", config_path.display());
        println!("Edit it manually or delete it and re-run init.");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("Created {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Add your API key to the file (or set AGENTDIST_API_KEY)");
    println!("  2. Point [catalog] base_url at your agent registry");
    println!("  3. Run: agentdist ask \"Book a flight to Paris\"");

    Ok(())
}
