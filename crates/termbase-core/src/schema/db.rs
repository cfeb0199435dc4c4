use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{
    Change, Component, ComponentId, Glossary, GlossaryId, Language, LanguageId, NewChange,
    NewComponent, NewTranslation, NewUnit, Plural, Project, ProjectId, Term, TermId, Translation,
    TranslationId, Unit, UnitId, UnitState, DEFAULT_PLURAL_SOURCE,
};

use super::migrations::MIGRATIONS;

/// A database connection with typed access to projects, glossaries and components.
///
/// Every write is an explicit statement with a fixed column list; partial
/// updates get their own method instead of a generic "save".
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

/// Row counts reported by `termbase status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GlossaryStatistics {
    pub projects: i64,
    pub legacy_glossaries: i64,
    pub legacy_terms: i64,
    pub glossary_components: i64,
    pub glossary_units: i64,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a transaction. The transaction is rolled back when `f` fails.
    pub fn in_transaction<T, E>(
        &self,
        f: impl FnOnce(&Self) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<Error>,
    {
        let tx = self.conn.unchecked_transaction().map_err(Error::from)?;
        let value = f(self)?;
        tx.commit().map_err(Error::from)?;
        Ok(value)
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.pragma_update(None, "foreign_keys", true)?;

        // Create migrations table if it doesn't exist
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }

    /// Whether a one-shot data migration has already been recorded.
    pub fn is_data_migration_applied(&self, name: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM data_migrations WHERE name = ?1",
                [name],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Record a one-shot data migration as applied.
    pub fn record_data_migration(&self, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO data_migrations (name, applied_at)
             VALUES (?1, datetime('now'))",
            [name],
        )?;
        Ok(())
    }

    /// Counts of legacy and migrated glossary rows.
    pub fn glossary_statistics(&self) -> Result<GlossaryStatistics> {
        let count = |sql: &str| -> Result<i64> {
            Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
        };
        Ok(GlossaryStatistics {
            projects: count("SELECT COUNT(*) FROM projects")?,
            legacy_glossaries: count("SELECT COUNT(*) FROM glossaries")?,
            legacy_terms: count("SELECT COUNT(*) FROM terms")?,
            glossary_components: count("SELECT COUNT(*) FROM components WHERE is_glossary = 1")?,
            glossary_units: count(
                "SELECT COUNT(*) FROM units u
                 JOIN translations t ON t.id = u.translation_id
                 JOIN components c ON c.id = t.component_id
                 WHERE c.is_glossary = 1",
            )?,
        })
    }
}

fn conversion_error(
    column: usize,
    ty: Type,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, ty, Box::new(err))
}

// Language and plural CRUD
impl Database {
    /// Insert a language.
    pub fn insert_language(&self, code: &str, name: &str) -> Result<Language> {
        self.conn.execute(
            "INSERT INTO languages (code, name) VALUES (?1, ?2)",
            rusqlite::params![code, name],
        )?;
        Ok(Language {
            id: LanguageId::new(self.conn.last_insert_rowid()),
            code: code.to_string(),
            name: name.to_string(),
        })
    }

    /// Insert a plural rule for a language.
    pub fn insert_plural(
        &self,
        language_id: LanguageId,
        source: i64,
        number: i64,
        formula: &str,
    ) -> Result<Plural> {
        self.conn.execute(
            "INSERT INTO plurals (language_id, source, number, formula) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![language_id, source, number, formula],
        )?;
        Ok(Plural {
            id: self.conn.last_insert_rowid().into(),
            language_id,
            source,
            number,
            formula: formula.to_string(),
        })
    }

    /// Get a language by id.
    pub fn get_language(&self, id: LanguageId) -> Result<Language> {
        self.conn
            .query_row(
                "SELECT id, code, name FROM languages WHERE id = ?1",
                [id],
                |row| self.row_to_language(row),
            )
            .optional()?
            .ok_or_else(|| Error::not_found("language", id))
    }

    /// The default plural rule of a language, if it has one.
    pub fn default_plural(&self, language_id: LanguageId) -> Result<Option<Plural>> {
        let plural = self
            .conn
            .query_row(
                "SELECT id, language_id, source, number, formula
                 FROM plurals
                 WHERE language_id = ?1 AND source = ?2
                 ORDER BY id
                 LIMIT 1",
                rusqlite::params![language_id, DEFAULT_PLURAL_SOURCE],
                |row| {
                    Ok(Plural {
                        id: row.get(0)?,
                        language_id: row.get(1)?,
                        source: row.get(2)?,
                        number: row.get(3)?,
                        formula: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(plural)
    }

    /// Languages having at least one term in the glossary, ordered by code.
    pub fn languages_with_terms(&self, glossary_id: GlossaryId) -> Result<Vec<Language>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT l.id, l.code, l.name
             FROM languages l
             JOIN terms t ON t.language_id = l.id
             WHERE t.glossary_id = ?1
             ORDER BY l.code",
        )?;

        let languages = stmt
            .query_map([glossary_id], |row| self.row_to_language(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(languages)
    }

    fn row_to_language(&self, row: &rusqlite::Row) -> rusqlite::Result<Language> {
        Ok(Language {
            id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
        })
    }
}

// Project CRUD
impl Database {
    /// Insert a project.
    pub fn insert_project(&self, name: &str, slug: &str) -> Result<Project> {
        self.conn.execute(
            "INSERT INTO projects (name, slug) VALUES (?1, ?2)",
            rusqlite::params![name, slug],
        )?;
        Ok(Project {
            id: ProjectId::new(self.conn.last_insert_rowid()),
            name: name.to_string(),
            slug: slug.to_string(),
        })
    }

    /// List all projects in id order.
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, slug FROM projects ORDER BY id")?;

        let projects = stmt
            .query_map([], |row| {
                Ok(Project {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    slug: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(projects)
    }
}

// Legacy glossary CRUD
impl Database {
    /// Insert a legacy glossary.
    pub fn insert_glossary(
        &self,
        project_id: ProjectId,
        name: &str,
        color: &str,
        source_language_id: LanguageId,
    ) -> Result<Glossary> {
        self.conn.execute(
            "INSERT INTO glossaries (project_id, name, color, source_language_id)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![project_id, name, color, source_language_id],
        )?;
        Ok(Glossary {
            id: GlossaryId::new(self.conn.last_insert_rowid()),
            project_id,
            name: name.to_string(),
            color: color.to_string(),
            source_language_id,
        })
    }

    /// List the glossaries of a project in id order.
    pub fn list_glossaries(&self, project_id: ProjectId) -> Result<Vec<Glossary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, name, color, source_language_id
             FROM glossaries
             WHERE project_id = ?1
             ORDER BY id",
        )?;

        let glossaries = stmt
            .query_map([project_id], |row| {
                Ok(Glossary {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    name: row.get(2)?,
                    color: row.get(3)?,
                    source_language_id: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(glossaries)
    }

    /// Share a glossary with another project.
    pub fn link_glossary(&self, glossary_id: GlossaryId, project_id: ProjectId) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO glossary_links (glossary_id, project_id) VALUES (?1, ?2)",
            rusqlite::params![glossary_id, project_id],
        )?;
        Ok(())
    }

    /// Projects a glossary is shared with.
    pub fn glossary_links(&self, glossary_id: GlossaryId) -> Result<Vec<ProjectId>> {
        let mut stmt = self.conn.prepare(
            "SELECT project_id FROM glossary_links WHERE glossary_id = ?1 ORDER BY project_id",
        )?;
        let links = stmt
            .query_map([glossary_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(links)
    }

    /// Insert a legacy term.
    pub fn insert_term(
        &self,
        glossary_id: GlossaryId,
        language_id: LanguageId,
        source: &str,
        target: &str,
    ) -> Result<Term> {
        self.conn.execute(
            "INSERT INTO terms (glossary_id, language_id, source, target) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![glossary_id, language_id, source, target],
        )?;
        Ok(Term {
            id: TermId::new(self.conn.last_insert_rowid()),
            glossary_id,
            language_id,
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    /// Terms of a glossary in one language, in stored order.
    pub fn list_terms(
        &self,
        glossary_id: GlossaryId,
        language_id: LanguageId,
    ) -> Result<Vec<Term>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, glossary_id, language_id, source, target
             FROM terms
             WHERE glossary_id = ?1 AND language_id = ?2
             ORDER BY id",
        )?;

        let terms = stmt
            .query_map(rusqlite::params![glossary_id, language_id], |row| {
                Ok(Term {
                    id: row.get(0)?,
                    glossary_id: row.get(1)?,
                    language_id: row.get(2)?,
                    source: row.get(3)?,
                    target: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(terms)
    }
}

// Component CRUD
impl Database {
    /// Create a component.
    pub fn create_component(&self, new: &NewComponent) -> Result<Component> {
        self.conn.execute(
            "INSERT INTO components (
                project_id, name, slug, is_glossary, glossary_name, glossary_color,
                allow_translation_propagation, manage_units, file_format, filemask,
                vcs, repo, branch, source_language_id, license
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            rusqlite::params![
                new.project_id,
                new.name,
                new.slug,
                new.is_glossary,
                new.glossary_name,
                new.glossary_color,
                new.allow_translation_propagation,
                new.manage_units,
                new.file_format,
                new.filemask,
                new.vcs,
                new.repo,
                new.branch,
                new.source_language_id,
                new.license,
            ],
        )?;
        Ok(Component {
            id: ComponentId::new(self.conn.last_insert_rowid()),
            project_id: new.project_id,
            name: new.name.clone(),
            slug: new.slug.clone(),
            is_glossary: new.is_glossary,
            glossary_name: new.glossary_name.clone(),
            glossary_color: new.glossary_color.clone(),
            allow_translation_propagation: new.allow_translation_propagation,
            manage_units: new.manage_units,
            file_format: new.file_format.clone(),
            filemask: new.filemask.clone(),
            vcs: new.vcs.clone(),
            repo: new.repo.clone(),
            branch: new.branch.clone(),
            source_language_id: new.source_language_id,
            license: new.license.clone(),
        })
    }

    /// List the components of a project in id order.
    pub fn list_components(&self, project_id: ProjectId) -> Result<Vec<Component>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, name, slug, is_glossary, glossary_name, glossary_color,
                    allow_translation_propagation, manage_units, file_format, filemask,
                    vcs, repo, branch, source_language_id, license
             FROM components
             WHERE project_id = ?1
             ORDER BY id",
        )?;

        let components = stmt
            .query_map([project_id], |row| {
                Ok(Component {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    name: row.get(2)?,
                    slug: row.get(3)?,
                    is_glossary: row.get(4)?,
                    glossary_name: row.get(5)?,
                    glossary_color: row.get(6)?,
                    allow_translation_propagation: row.get(7)?,
                    manage_units: row.get(8)?,
                    file_format: row.get(9)?,
                    filemask: row.get(10)?,
                    vcs: row.get(11)?,
                    repo: row.get(12)?,
                    branch: row.get(13)?,
                    source_language_id: row.get(14)?,
                    license: row.get(15)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(components)
    }

    /// Slugs already used by components of a project.
    pub fn component_slugs(&self, project_id: ProjectId) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT slug FROM components WHERE project_id = ?1")?;
        let slugs = stmt
            .query_map([project_id], |row| row.get(0))?
            .collect::<rusqlite::Result<HashSet<_>>>()?;
        Ok(slugs)
    }

    /// The first non-empty license among a project's components.
    pub fn project_license(&self, project_id: ProjectId) -> Result<Option<String>> {
        let license = self
            .conn
            .query_row(
                "SELECT license FROM components
                 WHERE project_id = ?1 AND license != ''
                 ORDER BY id
                 LIMIT 1",
                [project_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(license)
    }

    /// Replace the set of projects a component is shared with.
    pub fn set_component_links(
        &self,
        component_id: ComponentId,
        projects: &[ProjectId],
    ) -> Result<()> {
        self.conn.execute(
            "DELETE FROM component_links WHERE component_id = ?1",
            [component_id],
        )?;
        let mut stmt = self.conn.prepare(
            "INSERT INTO component_links (component_id, project_id) VALUES (?1, ?2)",
        )?;
        for project_id in projects {
            stmt.execute(rusqlite::params![component_id, project_id])?;
        }
        Ok(())
    }

    /// Projects a component is shared with.
    pub fn component_links(&self, component_id: ComponentId) -> Result<Vec<ProjectId>> {
        let mut stmt = self.conn.prepare(
            "SELECT project_id FROM component_links WHERE component_id = ?1 ORDER BY project_id",
        )?;
        let links = stmt
            .query_map([component_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(links)
    }
}

// Translation CRUD
impl Database {
    /// Create a translation.
    pub fn create_translation(&self, new: &NewTranslation) -> Result<Translation> {
        self.conn.execute(
            "INSERT INTO translations (
                component_id, language_id, plural_id, filename, language_code, check_flags
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                new.component_id,
                new.language_id,
                new.plural_id,
                new.filename,
                new.language_code,
                new.check_flags,
            ],
        )?;
        Ok(Translation {
            id: TranslationId::new(self.conn.last_insert_rowid()),
            component_id: new.component_id,
            language_id: new.language_id,
            plural_id: new.plural_id,
            filename: new.filename.clone(),
            language_code: new.language_code.clone(),
            check_flags: new.check_flags.clone(),
            revision: String::new(),
        })
    }

    /// Update only the revision of a translation.
    pub fn update_translation_revision(&self, id: TranslationId, revision: &str) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE translations SET revision = ?2 WHERE id = ?1",
            rusqlite::params![id, revision],
        )?;
        if updated == 0 {
            return Err(Error::not_found("translation", id));
        }
        Ok(())
    }

    /// List the translations of a component in id order.
    pub fn list_translations(&self, component_id: ComponentId) -> Result<Vec<Translation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, component_id, language_id, plural_id, filename, language_code,
                    check_flags, revision
             FROM translations
             WHERE component_id = ?1
             ORDER BY id",
        )?;

        let translations = stmt
            .query_map([component_id], |row| {
                Ok(Translation {
                    id: row.get(0)?,
                    component_id: row.get(1)?,
                    language_id: row.get(2)?,
                    plural_id: row.get(3)?,
                    filename: row.get(4)?,
                    language_code: row.get(5)?,
                    check_flags: row.get(6)?,
                    revision: row.get(7)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(translations)
    }
}

// Unit CRUD
impl Database {
    /// Create a unit.
    pub fn create_unit(&self, new: &NewUnit) -> Result<Unit> {
        self.conn.execute(
            "INSERT INTO units (
                translation_id, id_hash, context, source, target, state,
                position, num_words, source_unit_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                new.translation_id,
                new.id_hash,
                new.context,
                new.source,
                new.target,
                new.state.as_i64(),
                new.position,
                new.num_words,
                new.source_unit_id,
            ],
        )?;
        Ok(Unit {
            id: UnitId::new(self.conn.last_insert_rowid()),
            translation_id: new.translation_id,
            id_hash: new.id_hash,
            context: new.context.clone(),
            source: new.source.clone(),
            target: new.target.clone(),
            state: new.state,
            position: new.position,
            num_words: new.num_words,
            source_unit_id: new.source_unit_id,
        })
    }

    /// Update only the source unit reference of a unit.
    pub fn update_unit_source_unit(&self, id: UnitId, source_unit_id: UnitId) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE units SET source_unit_id = ?2 WHERE id = ?1",
            rusqlite::params![id, source_unit_id],
        )?;
        if updated == 0 {
            return Err(Error::not_found("unit", id));
        }
        Ok(())
    }

    /// Update only the target of a unit; the state is left alone.
    pub fn update_unit_target(&self, id: UnitId, target: &str) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE units SET target = ?2 WHERE id = ?1",
            rusqlite::params![id, target],
        )?;
        if updated == 0 {
            return Err(Error::not_found("unit", id));
        }
        Ok(())
    }

    /// List the units of a translation by position.
    pub fn list_units(&self, translation_id: TranslationId) -> Result<Vec<Unit>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, translation_id, id_hash, context, source, target, state,
                    position, num_words, source_unit_id
             FROM units
             WHERE translation_id = ?1
             ORDER BY position, id",
        )?;

        let units = stmt
            .query_map([translation_id], |row| self.row_to_unit(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(units)
    }

    fn row_to_unit(&self, row: &rusqlite::Row) -> rusqlite::Result<Unit> {
        let state: i64 = row.get(6)?;
        let state = UnitState::from_i64(state).map_err(|e| conversion_error(6, Type::Integer, e))?;

        Ok(Unit {
            id: row.get(0)?,
            translation_id: row.get(1)?,
            id_hash: row.get(2)?,
            context: row.get(3)?,
            source: row.get(4)?,
            target: row.get(5)?,
            state,
            position: row.get(7)?,
            num_words: row.get(8)?,
            source_unit_id: row.get(9)?,
        })
    }
}

// Change history CRUD
impl Database {
    /// Record a history entry against a legacy term.
    pub fn insert_change(&self, new: &NewChange) -> Result<Change> {
        self.conn.execute(
            "INSERT INTO changes (term_id, language_id, project_id, action, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                new.term_id,
                new.language_id,
                new.project_id,
                new.action,
                new.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(Change {
            id: self.conn.last_insert_rowid().into(),
            term_id: Some(new.term_id),
            unit_id: None,
            translation_id: None,
            component_id: None,
            language_id: Some(new.language_id),
            project_id: Some(new.project_id),
            action: new.action.clone(),
            timestamp: new.timestamp,
        })
    }

    /// Point every history entry of a term at its unit, translation and component.
    ///
    /// Language and project are left as recorded. Returns the number of entries updated.
    pub fn repoint_term_changes(
        &self,
        term_id: TermId,
        unit_id: UnitId,
        translation_id: TranslationId,
        component_id: ComponentId,
    ) -> Result<usize> {
        let updated = self.conn.execute(
            "UPDATE changes SET unit_id = ?2, translation_id = ?3, component_id = ?4
             WHERE term_id = ?1",
            rusqlite::params![term_id, unit_id, translation_id, component_id],
        )?;
        Ok(updated)
    }

    /// History entries of a term, oldest first.
    pub fn list_term_changes(&self, term_id: TermId) -> Result<Vec<Change>> {
        use chrono::DateTime;

        let mut stmt = self.conn.prepare(
            "SELECT id, term_id, unit_id, translation_id, component_id, language_id,
                    project_id, action, timestamp
             FROM changes
             WHERE term_id = ?1
             ORDER BY id",
        )?;

        let changes = stmt
            .query_map([term_id], |row| {
                let timestamp: String = row.get(8)?;
                let timestamp = DateTime::parse_from_rfc3339(&timestamp)
                    .map_err(|e| conversion_error(8, Type::Text, e))?;
                Ok(Change {
                    id: row.get(0)?,
                    term_id: row.get(1)?,
                    unit_id: row.get(2)?,
                    translation_id: row.get(3)?,
                    component_id: row.get(4)?,
                    language_id: row.get(5)?,
                    project_id: row.get(6)?,
                    action: row.get(7)?,
                    timestamp: timestamp.into(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (Database, Project, Language) {
        let db = Database::open_in_memory().unwrap();
        let project = db.insert_project("Acme", "acme").unwrap();
        let english = db.insert_language("en", "English").unwrap();
        db.insert_plural(english.id, DEFAULT_PLURAL_SOURCE, 2, "n != 1")
            .unwrap();
        (db, project, english)
    }

    #[test]
    fn test_database_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_reopen_does_not_reapply_migrations() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("termbase.db");

        let db = Database::open(&path).unwrap();
        db.insert_project("Acme", "acme").unwrap();
        drop(db);

        let db = Database::open(&path).unwrap();
        assert_eq!(db.list_projects().unwrap().len(), 1);
    }

    #[test]
    fn test_data_migration_marker() {
        let db = Database::open_in_memory().unwrap();
        assert!(!db.is_data_migration_applied("migrate_glossaries").unwrap());

        db.record_data_migration("migrate_glossaries").unwrap();
        db.record_data_migration("migrate_glossaries").unwrap();

        assert!(db.is_data_migration_applied("migrate_glossaries").unwrap());
    }

    #[test]
    fn test_default_plural_ignores_other_sources() {
        let (db, _, english) = seeded();
        let czech = db.insert_language("cs", "Czech").unwrap();
        db.insert_plural(czech.id, 1, 3, "custom").unwrap();
        let default = db
            .insert_plural(czech.id, DEFAULT_PLURAL_SOURCE, 3, "n==1 ? 0 : 1")
            .unwrap();

        assert_eq!(db.default_plural(czech.id).unwrap(), Some(default));
        assert!(db.default_plural(english.id).unwrap().is_some());

        let german = db.insert_language("de", "German").unwrap();
        assert_eq!(db.default_plural(german.id).unwrap(), None);
    }

    #[test]
    fn test_get_missing_language() {
        let db = Database::open_in_memory().unwrap();
        let err = db.get_language(LanguageId::new(404)).unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "language", .. }));
    }

    #[test]
    fn test_languages_with_terms_are_distinct_and_ordered() {
        let (db, project, english) = seeded();
        let french = db.insert_language("fr", "French").unwrap();
        let czech = db.insert_language("cs", "Czech").unwrap();
        db.insert_language("de", "German").unwrap();
        let glossary = db
            .insert_glossary(project.id, "Terms", "silver", english.id)
            .unwrap();

        db.insert_term(glossary.id, french.id, "cat", "chat").unwrap();
        db.insert_term(glossary.id, french.id, "dog", "chien").unwrap();
        db.insert_term(glossary.id, czech.id, "cat", "kočka").unwrap();

        let codes: Vec<String> = db
            .languages_with_terms(glossary.id)
            .unwrap()
            .into_iter()
            .map(|l| l.code)
            .collect();
        assert_eq!(codes, vec!["cs", "fr"]);
    }

    #[test]
    fn test_terms_keep_stored_order() {
        let (db, project, english) = seeded();
        let glossary = db
            .insert_glossary(project.id, "Terms", "", english.id)
            .unwrap();
        for source in ["zebra", "apple", "mango"] {
            db.insert_term(glossary.id, english.id, source, source).unwrap();
        }

        let sources: Vec<String> = db
            .list_terms(glossary.id, english.id)
            .unwrap()
            .into_iter()
            .map(|t| t.source)
            .collect();
        assert_eq!(sources, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_project_license_skips_empty() {
        let (db, project, english) = seeded();
        assert_eq!(db.project_license(project.id).unwrap(), None);

        db.create_component(&NewComponent::regular(project.id, "Docs", "docs", english.id))
            .unwrap();
        db.create_component(
            &NewComponent::regular(project.id, "App", "app", english.id).with_license("GPL-3.0"),
        )
        .unwrap();
        db.create_component(
            &NewComponent::regular(project.id, "Web", "web", english.id).with_license("MIT"),
        )
        .unwrap();

        assert_eq!(
            db.project_license(project.id).unwrap(),
            Some("GPL-3.0".to_string())
        );
    }

    #[test]
    fn test_component_slug_unique_per_project() {
        let (db, project, english) = seeded();
        let other = db.insert_project("Other", "other").unwrap();

        db.create_component(&NewComponent::regular(project.id, "Docs", "docs", english.id))
            .unwrap();
        db.create_component(&NewComponent::regular(other.id, "Docs", "docs", english.id))
            .unwrap();
        let duplicate =
            db.create_component(&NewComponent::regular(project.id, "Docs 2", "docs", english.id));

        assert!(matches!(duplicate, Err(Error::Database(_))));
        assert_eq!(
            db.component_slugs(project.id).unwrap(),
            HashSet::from(["docs".to_string()])
        );
    }

    #[test]
    fn test_component_round_trip() {
        let (db, project, english) = seeded();
        let glossary = db
            .insert_glossary(project.id, "Terms", "navy", english.id)
            .unwrap();
        let created = db
            .create_component(&NewComponent::glossary(&glossary, "Glossary", "glossary", ""))
            .unwrap();

        let components = db.list_components(project.id).unwrap();
        assert_eq!(components, vec![created]);
    }

    #[test]
    fn test_component_links_replace_previous_set() {
        let (db, project, english) = seeded();
        let a = db.insert_project("A", "a").unwrap();
        let b = db.insert_project("B", "b").unwrap();
        let component = db
            .create_component(&NewComponent::regular(project.id, "Docs", "docs", english.id))
            .unwrap();

        db.set_component_links(component.id, &[a.id, b.id]).unwrap();
        db.set_component_links(component.id, &[b.id]).unwrap();

        assert_eq!(db.component_links(component.id).unwrap(), vec![b.id]);
    }

    #[test]
    fn test_unit_partial_updates() {
        let (db, project, english) = seeded();
        let plural = db.default_plural(english.id).unwrap().unwrap();
        let component = db
            .create_component(&NewComponent::regular(project.id, "Docs", "docs", english.id))
            .unwrap();
        let translation = db
            .create_translation(&NewTranslation {
                component_id: component.id,
                language_id: english.id,
                plural_id: plural.id,
                filename: String::new(),
                language_code: "en".to_string(),
                check_flags: "read-only".to_string(),
            })
            .unwrap();
        let unit = db
            .create_unit(&NewUnit {
                translation_id: translation.id,
                id_hash: 17,
                context: String::new(),
                source: "cat".to_string(),
                target: "cat".to_string(),
                state: UnitState::ReadOnly,
                position: 0,
                num_words: 1,
                source_unit_id: None,
            })
            .unwrap();

        db.update_unit_source_unit(unit.id, unit.id).unwrap();
        db.update_unit_target(unit.id, "Cat").unwrap();
        db.update_translation_revision(translation.id, "abc123").unwrap();

        let stored = &db.list_units(translation.id).unwrap()[0];
        assert_eq!(stored.source_unit_id, Some(unit.id));
        assert_eq!(stored.target, "Cat");
        assert_eq!(stored.state, UnitState::ReadOnly);
        assert_eq!(
            db.list_translations(component.id).unwrap()[0].revision,
            "abc123"
        );
        assert!(db.update_unit_target(UnitId::new(999), "x").is_err());
    }

    #[test]
    fn test_repoint_term_changes() {
        let (db, project, english) = seeded();
        let glossary = db
            .insert_glossary(project.id, "Terms", "", english.id)
            .unwrap();
        let term = db.insert_term(glossary.id, english.id, "cat", "cat").unwrap();
        let other = db.insert_term(glossary.id, english.id, "dog", "dog").unwrap();
        db.insert_change(&NewChange::for_term(&term, project.id, "new")).unwrap();
        db.insert_change(&NewChange::for_term(&term, project.id, "edit")).unwrap();
        db.insert_change(&NewChange::for_term(&other, project.id, "new")).unwrap();

        let plural = db.default_plural(english.id).unwrap().unwrap();
        let component = db
            .create_component(&NewComponent::glossary(&glossary, "Glossary", "glossary", ""))
            .unwrap();
        let translation = db
            .create_translation(&NewTranslation {
                component_id: component.id,
                language_id: english.id,
                plural_id: plural.id,
                filename: String::new(),
                language_code: "en".to_string(),
                check_flags: String::new(),
            })
            .unwrap();
        let unit = db
            .create_unit(&NewUnit {
                translation_id: translation.id,
                id_hash: 1,
                context: String::new(),
                source: "cat".to_string(),
                target: "cat".to_string(),
                state: UnitState::ReadOnly,
                position: 0,
                num_words: 1,
                source_unit_id: None,
            })
            .unwrap();

        let updated = db
            .repoint_term_changes(term.id, unit.id, translation.id, component.id)
            .unwrap();
        assert_eq!(updated, 2);

        for change in db.list_term_changes(term.id).unwrap() {
            assert_eq!(change.unit_id, Some(unit.id));
            assert_eq!(change.translation_id, Some(translation.id));
            assert_eq!(change.component_id, Some(component.id));
            assert_eq!(change.language_id, Some(english.id));
            assert_eq!(change.project_id, Some(project.id));
        }
        assert_eq!(db.list_term_changes(other.id).unwrap()[0].unit_id, None);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();

        let result: Result<()> = db.in_transaction(|db| {
            db.insert_project("Acme", "acme")?;
            Err(Error::InvalidData("abort".to_string()))
        });

        assert!(result.is_err());
        assert!(db.list_projects().unwrap().is_empty());

        db.in_transaction(|db| db.insert_project("Acme", "acme").map(|_| ()))
            .unwrap();
        assert_eq!(db.list_projects().unwrap().len(), 1);
    }

    #[test]
    fn test_glossary_statistics() {
        let (db, project, english) = seeded();
        let glossary = db
            .insert_glossary(project.id, "Terms", "", english.id)
            .unwrap();
        db.insert_term(glossary.id, english.id, "cat", "cat").unwrap();
        db.create_component(&NewComponent::glossary(&glossary, "Glossary", "glossary", ""))
            .unwrap();

        let stats = db.glossary_statistics().unwrap();
        assert_eq!(stats.projects, 1);
        assert_eq!(stats.legacy_glossaries, 1);
        assert_eq!(stats.legacy_terms, 1);
        assert_eq!(stats.glossary_components, 1);
        assert_eq!(stats.glossary_units, 0);
    }
}
