use anyhow::{Context, Result};
use std::io::Write;
use termbase_core::schema::Database;
use termbase_migrate::{Config, GitBackend, GlossaryMigration};

pub fn run_migrate(config: &Config, force: bool) -> Result<()> {
    // Ensure database directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open database {}",
            config.database_path.display()
        )
    })?;

    let backend = GitBackend::new(config.commit_author());
    let migration = GlossaryMigration::new(&db, backend, &config.data_dir);

    let mut stdout = std::io::stdout().lock();
    let summary = migration
        .apply(&mut stdout, force)
        .context("Glossary migration failed")?;

    match summary {
        Some(summary) => {
            writeln!(stdout, "\n✓ Migrated {} projects", summary.projects)?;
            writeln!(stdout, "  Components created: {}", summary.components)?;
            writeln!(stdout, "  Translations created: {}", summary.translations)?;
            writeln!(stdout, "  Units created: {}", summary.units)?;
            writeln!(stdout, "  History entries updated: {}", summary.changes)?;
            writeln!(stdout, "  Commits: {}", summary.commits)?;
            writeln!(stdout, "  Repositories: {}", config.data_dir.join("vcs").display())?;
        }
        None => {
            writeln!(stdout, "Glossaries were already migrated.")?;
            writeln!(stdout, "\n  Run `termbase migrate --force` to run again")?;
        }
    }

    Ok(())
}
