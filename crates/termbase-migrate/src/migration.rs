//! Conversion of legacy glossaries into TBX-backed glossary components.
//!
//! Every glossary of every project becomes one component with its own
//! local repository. Each language with terms gets a translation and a
//! `<code>.tbx` file; each term becomes a unit linked to a read-only unit
//! of the source translation. The legacy rows are only read.

use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use termbase_core::model::{
    Component, Glossary, Language, NewComponent, NewTranslation, NewUnit, Plural, Project,
    Translation, Unit, UnitState,
};
use termbase_core::schema::Database;
use termbase_core::text::{calculate_hash, valid_chars_only, word_count};

use crate::error::{MigrateError, MigrateResult};
use crate::naming::{ComponentNamer, ContextCounter};
use crate::tbx::TbxStore;
use crate::vcs::{Repository, RepositoryBackend};

/// Name under which a completed run is recorded.
pub const MIGRATION_NAME: &str = "migrate_glossaries";

/// Message of the commit storing a migrated glossary.
pub const COMMIT_MESSAGE: &str = "Migrate glossary content";

const SOURCE_CHECK_FLAGS: &str = "read-only";

/// What a run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
    pub projects: usize,
    pub components: usize,
    pub translations: usize,
    pub units: usize,
    pub changes: usize,
    pub commits: usize,
}

/// Repository location of a component: `<data_dir>/vcs/<project>/<component>`.
#[must_use]
pub fn repository_path(data_dir: &Path, project_slug: &str, component_slug: &str) -> PathBuf {
    data_dir.join("vcs").join(project_slug).join(component_slug)
}

/// The glossary migration.
#[derive(Debug)]
pub struct GlossaryMigration<'db, B> {
    db: &'db Database,
    backend: B,
    data_dir: PathBuf,
}

/// State shared by all languages of one glossary.
struct GlossaryScope<'a, R> {
    glossary: &'a Glossary,
    component: &'a Component,
    source_language: &'a Language,
    source_translation: &'a Translation,
    repo: &'a R,
    repo_path: &'a Path,
}

impl<'db, B: RepositoryBackend> GlossaryMigration<'db, B> {
    #[must_use]
    pub fn new(db: &'db Database, backend: B, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            backend,
            data_dir: data_dir.into(),
        }
    }

    /// Run the migration once: skipped when already recorded unless `force`.
    ///
    /// Database work happens in one transaction that is rolled back on any
    /// error. Returns `None` when the run was skipped.
    pub fn apply(
        &self,
        out: &mut impl Write,
        force: bool,
    ) -> MigrateResult<Option<MigrationSummary>> {
        if !force && self.db.is_data_migration_applied(MIGRATION_NAME)? {
            log::info!("Migration {} already applied, skipping", MIGRATION_NAME);
            return Ok(None);
        }

        let summary = self.db.in_transaction(|db| {
            let summary = self.run(out)?;
            db.record_data_migration(MIGRATION_NAME)?;
            Ok::<_, MigrateError>(summary)
        })?;

        Ok(Some(summary))
    }

    /// Migrate the glossaries of every project, writing progress to `out`.
    pub fn run(&self, out: &mut impl Write) -> MigrateResult<MigrationSummary> {
        let projects = self.db.list_projects()?;
        let total = projects.len();
        let mut summary = MigrationSummary::default();

        for (processed, project) in projects.iter().enumerate() {
            let percent = 100 * processed / total;
            writeln!(
                out,
                "Migrating glossaries {}% [{}/{}]...{}",
                percent, processed, total, project.name
            )?;
            self.migrate_project(project, &mut summary)?;
            summary.projects += 1;
        }

        writeln!(out, "Migrating glossaries completed [{}/{}]", total, total)?;
        log::info!(
            "Created {} components, {} translations and {} units",
            summary.components,
            summary.translations,
            summary.units
        );

        Ok(summary)
    }

    fn migrate_project(
        &self,
        project: &Project,
        summary: &mut MigrationSummary,
    ) -> MigrateResult<()> {
        let mut namer = ComponentNamer::new(self.db.component_slugs(project.id)?);
        let license = self.db.project_license(project.id)?.unwrap_or_default();
        let glossaries = self.db.list_glossaries(project.id)?;
        let single = glossaries.len() == 1;

        log::debug!(
            "Project {} has {} glossaries",
            project.slug,
            glossaries.len()
        );

        for glossary in &glossaries {
            let (name, slug) = namer.claim(&glossary.name, single);
            self.migrate_glossary(project, glossary, &name, &slug, &license, summary)?;
        }

        Ok(())
    }

    fn migrate_glossary(
        &self,
        project: &Project,
        glossary: &Glossary,
        name: &str,
        slug: &str,
        license: &str,
        summary: &mut MigrationSummary,
    ) -> MigrateResult<()> {
        let component = self
            .db
            .create_component(&NewComponent::glossary(glossary, name, slug, license))?;
        summary.components += 1;
        log::info!("Created component {}/{}", project.slug, component.slug);

        let repo_path = repository_path(&self.data_dir, &project.slug, &component.slug);
        let repo = self.backend.init_empty(&repo_path)?;

        let links = self.db.glossary_links(glossary.id)?;
        self.db.set_component_links(component.id, &links)?;

        let source_language = self.db.get_language(glossary.source_language_id)?;
        let source_plural = self.default_plural(&source_language)?;
        let source_translation = self.db.create_translation(&NewTranslation {
            component_id: component.id,
            language_id: source_language.id,
            plural_id: source_plural.id,
            filename: String::new(),
            language_code: source_language.code.clone(),
            check_flags: SOURCE_CHECK_FLAGS.to_string(),
        })?;
        summary.translations += 1;

        let scope = GlossaryScope {
            glossary,
            component: &component,
            source_language: &source_language,
            source_translation: &source_translation,
            repo: &repo,
            repo_path: &repo_path,
        };

        let mut source_units = HashMap::new();
        for language in self.db.languages_with_terms(glossary.id)? {
            self.migrate_language(&scope, &language, &mut source_units, summary)?;
        }

        let _lock = repo.lock()?;
        repo.stage(&repo_path)?;
        if repo.needs_commit()? {
            repo.commit(COMMIT_MESSAGE)?;
            summary.commits += 1;
        } else {
            log::info!("Nothing to commit in {}", repo_path.display());
        }

        Ok(())
    }

    fn migrate_language<R: Repository>(
        &self,
        scope: &GlossaryScope<'_, R>,
        language: &Language,
        source_units: &mut HashMap<i64, Unit>,
        summary: &mut MigrationSummary,
    ) -> MigrateResult<()> {
        let base_filename = format!("{}.tbx", language.code);
        let filename = scope.repo_path.join(&base_filename);
        let is_source = language.id == scope.source_translation.language_id;

        let translation = if is_source {
            scope.source_translation.clone()
        } else {
            let plural = self.default_plural(language)?;
            summary.translations += 1;
            self.db.create_translation(&NewTranslation {
                component_id: scope.component.id,
                language_id: language.id,
                plural_id: plural.id,
                filename: base_filename,
                language_code: language.code.clone(),
                check_flags: String::new(),
            })?
        };

        TbxStore::create_new_file(&filename, &scope.source_language.code, &language.code)?;
        let mut store = TbxStore::open(&filename, &language.code)?;
        let mut contexts = ContextCounter::new();

        let terms = self.db.list_terms(scope.glossary.id, language.id)?;
        for (position, term) in terms.iter().enumerate() {
            let position = position as i64;
            let source = valid_chars_only(&term.source);
            let target = valid_chars_only(&term.target);
            let context = contexts.next_context(&source);
            let id_hash = calculate_hash(&[&source, &context]);

            let source_unit = match source_units.entry(id_hash) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    summary.units += 1;
                    entry.insert(self.create_source_unit(
                        scope.source_translation,
                        id_hash,
                        &context,
                        &source,
                        position,
                    )?)
                }
            };

            store.new_unit(&context, &source, &target);

            let unit_id = if is_source {
                self.db.update_unit_target(source_unit.id, &target)?;
                source_unit.target.clone_from(&target);
                source_unit.id
            } else {
                summary.units += 1;
                self.db
                    .create_unit(&NewUnit {
                        translation_id: translation.id,
                        id_hash,
                        context,
                        num_words: word_count(&source),
                        source,
                        target,
                        state: UnitState::Translated,
                        position,
                        source_unit_id: Some(source_unit.id),
                    })?
                    .id
            };

            summary.changes += self.db.repoint_term_changes(
                term.id,
                unit_id,
                translation.id,
                scope.component.id,
            )?;
        }

        store.save()?;
        log::debug!("Wrote {} terms to {}", terms.len(), filename.display());

        let revision = scope.repo.object_hash(&filename)?;
        self.db.update_translation_revision(translation.id, &revision)?;

        Ok(())
    }

    /// Create a read-only unit in the source translation pointing at itself.
    fn create_source_unit(
        &self,
        source_translation: &Translation,
        id_hash: i64,
        context: &str,
        source: &str,
        position: i64,
    ) -> MigrateResult<Unit> {
        let mut unit = self.db.create_unit(&NewUnit {
            translation_id: source_translation.id,
            id_hash,
            context: context.to_string(),
            source: source.to_string(),
            target: source.to_string(),
            state: UnitState::ReadOnly,
            position,
            num_words: word_count(source),
            source_unit_id: None,
        })?;
        self.db.update_unit_source_unit(unit.id, unit.id)?;
        unit.source_unit_id = Some(unit.id);
        Ok(unit)
    }

    fn default_plural(&self, language: &Language) -> MigrateResult<Plural> {
        self.db
            .default_plural(language.id)?
            .ok_or_else(|| MigrateError::MissingPlural {
                language: language.code.clone(),
            })
    }
}
