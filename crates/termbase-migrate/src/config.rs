use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::vcs::CommitAuthor;

/// Configuration for termbase.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (TERMBASE_* prefix)
/// 3. Config file (~/.config/termbase/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: TERMBASE_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/termbase/termbase.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Data directory; component repositories live under `<data_dir>/vcs`.
    ///
    /// Can be set via:
    /// - CLI: termbase migrate --data-dir /srv/data
    /// - ENV: TERMBASE_DATA_DIR
    /// - Config: data_dir = "/srv/data"
    /// - Default: ~/.local/share/termbase/data
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Author name of the migration commits.
    #[serde(default = "default_author_name")]
    pub commit_author_name: String,

    /// Author email of the migration commits.
    #[serde(default = "default_author_email")]
    pub commit_author_email: String,

    /// Log filter used when RUST_LOG is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            data_dir: default_data_dir(),
            commit_author_name: default_author_name(),
            commit_author_email: default_author_email(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/termbase/config.toml
    /// Reads environment variables with TERMBASE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("termbase");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Apply CLI overrides on top of the loaded configuration.
    #[must_use]
    pub fn with_overrides(mut self, db_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> Self {
        if let Some(db_path) = db_path {
            self.database_path = db_path;
        }
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }
        self
    }

    #[must_use]
    pub fn commit_author(&self) -> CommitAuthor {
        CommitAuthor {
            name: self.commit_author_name.clone(),
            email: self.commit_author_email.clone(),
        }
    }
}

fn data_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("termbase")
}

/// Returns: ~/.local/share/termbase/termbase.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    data_root().join("termbase.db")
}

fn default_data_dir() -> PathBuf {
    data_root().join("data")
}

fn default_author_name() -> String {
    "Termbase".to_string()
}

fn default_author_email() -> String {
    "noreply@termbase.invalid".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/termbase/config.toml
/// - macOS: ~/Library/Application Support/termbase/config.toml
/// - Windows: %APPDATA%\termbase\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("termbase")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Termbase Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (TERMBASE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the SQLite database holding projects, glossaries and components
#
# Can also be set via:
# - CLI: termbase --db /custom/path.db migrate
# - Environment: TERMBASE_DATABASE_PATH=/custom/path.db
#database_path = "/path/to/custom/termbase.db"

# Data directory; glossary repositories are created in <data_dir>/vcs
#
# Can also be set via:
# - CLI: termbase migrate --data-dir /srv/termbase
# - Environment: TERMBASE_DATA_DIR=/srv/termbase
#data_dir = "/srv/termbase"

# Identity used for the commits that store migrated glossaries
commit_author_name = "Termbase"
commit_author_email = "noreply@termbase.invalid"

# Log filter used when RUST_LOG is not set
log_level = "info"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.database_path.as_os_str().is_empty());
        assert!(config.data_dir.ends_with("data"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(
            Some(PathBuf::from("/tmp/test.db")),
            Some(PathBuf::from("/srv/data")),
        );
        assert_eq!(config.database_path, PathBuf::from("/tmp/test.db"));
        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));

        let untouched = Config::default().with_overrides(None, None);
        assert_eq!(untouched.data_dir, Config::default().data_dir);
    }

    #[test]
    fn test_commit_author() {
        let author = Config::default().commit_author();
        assert_eq!(author.name, "Termbase");
        assert_eq!(author.email, "noreply@termbase.invalid");
    }
}
