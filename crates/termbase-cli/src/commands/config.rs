use anyhow::Result;
use termbase_migrate::{config, Config};

/// Show the current effective configuration.
pub fn show_config(config: &Config) {
    println!("Current Configuration");
    println!("=====================\n");

    let config_path = config::config_file_path();
    println!("Config file: {}", config_path.display());
    let exists = config_path.exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  database_path: {}", config.database_path.display());
    println!("  data_dir: {}", config.data_dir.display());
    println!("  commit_author_name: {}", config.commit_author_name);
    println!("  commit_author_email: {}", config.commit_author_email);
    println!("  log_level: {}", config.log_level);

    println!("\nPriority: CLI args > ENV vars (TERMBASE_*) > Config file > Defaults");
}

/// Show the config file path.
pub fn show_path() {
    println!("{}", config::config_file_path().display());
}

/// Show example configuration.
pub fn show_example() {
    print!("{}", config::example_config());
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure termbase.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
