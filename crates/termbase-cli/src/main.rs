use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use termbase_migrate::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "termbase", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/termbase/termbase.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Convert legacy glossaries into glossary components
    ///
    /// Every glossary of every project becomes a component backed by TBX
    /// files in a local git repository under <data-dir>/vcs:
    ///
    /// - One translation per language with terms, plus a read-only source translation
    /// - One unit per term, linked to its source unit
    /// - Term history is pointed at the new units
    /// - One commit per component, only when files were written
    ///
    /// The run happens once: it is recorded in the database and later
    /// invocations do nothing unless --force is given. Database changes are
    /// rolled back if the run fails.
    Migrate {
        /// Run again even if the migration is already recorded
        #[arg(long)]
        force: bool,

        /// Directory holding the component repositories
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Show glossary and component counts
    Status {
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = match &cli.command {
        Commands::Migrate { data_dir, .. } => data_dir.clone(),
        _ => None,
    };
    let config = Config::load()?.with_overrides(cli.db, data_dir);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Migrate { force, .. } => {
            commands::run_migrate(&config, force)?;
        }
        Commands::Status { json } => {
            commands::show_status(&config, json)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config),
            ConfigAction::Path => commands::config::show_path(),
            ConfigAction::Example => commands::config::show_example(),
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
