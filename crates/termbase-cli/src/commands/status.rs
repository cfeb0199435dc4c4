use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use termbase_core::schema::{Database, GlossaryStatistics};
use termbase_migrate::{Config, MIGRATION_NAME};

#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    database: &'a Path,
    migrated: bool,
    #[serde(flatten)]
    statistics: GlossaryStatistics,
}

pub fn show_status(config: &Config, json: bool) -> Result<()> {
    let db_path = &config.database_path;
    if !db_path.exists() {
        anyhow::bail!(
            "Database does not exist: {}\n\nPass --db or set database_path in the config file.",
            db_path.display()
        );
    }

    let db = Database::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let report = StatusReport {
        database: db_path,
        migrated: db.is_data_migration_applied(MIGRATION_NAME)?,
        statistics: db.glossary_statistics()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let stats = &report.statistics;
    println!("\n📊 Termbase Status\n");
    println!("  Database: {}", db_path.display());
    println!("  Projects: {}", stats.projects);
    println!("  Legacy glossaries: {}", stats.legacy_glossaries);
    println!("  Legacy terms: {}", stats.legacy_terms);
    println!("  Glossary components: {}", stats.glossary_components);
    println!("  Glossary units: {}", stats.glossary_units);
    println!(
        "  Migration {}: {}",
        MIGRATION_NAME,
        if report.migrated { "applied" } else { "pending" }
    );

    if !report.migrated && stats.legacy_glossaries > 0 {
        println!("\n  Run `termbase migrate` to convert the glossaries");
    }

    Ok(())
}
