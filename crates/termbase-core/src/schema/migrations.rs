/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- Languages and their plural rules
CREATE TABLE IF NOT EXISTS languages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS plurals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    language_id INTEGER NOT NULL REFERENCES languages(id),
    source INTEGER NOT NULL DEFAULT 0,
    number INTEGER NOT NULL DEFAULT 2,
    formula TEXT NOT NULL DEFAULT 'n != 1'
);

CREATE INDEX IF NOT EXISTS idx_plurals_language_source ON plurals(language_id, source);

-- Projects
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE
);

-- Legacy glossaries (flat term lists attached to a project)
CREATE TABLE IF NOT EXISTS glossaries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES projects(id),
    name TEXT NOT NULL,
    color TEXT NOT NULL DEFAULT '',
    source_language_id INTEGER NOT NULL REFERENCES languages(id)
);

CREATE INDEX IF NOT EXISTS idx_glossaries_project_id ON glossaries(project_id);

-- Projects a legacy glossary is shared with
CREATE TABLE IF NOT EXISTS glossary_links (
    glossary_id INTEGER NOT NULL REFERENCES glossaries(id),
    project_id INTEGER NOT NULL REFERENCES projects(id),
    PRIMARY KEY (glossary_id, project_id)
);

CREATE TABLE IF NOT EXISTS terms (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    glossary_id INTEGER NOT NULL REFERENCES glossaries(id),
    language_id INTEGER NOT NULL REFERENCES languages(id),
    source TEXT NOT NULL,
    target TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_terms_glossary_language ON terms(glossary_id, language_id);

-- Components
CREATE TABLE IF NOT EXISTS components (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES projects(id),
    name TEXT NOT NULL,
    slug TEXT NOT NULL,
    is_glossary INTEGER NOT NULL DEFAULT 0,
    glossary_name TEXT NOT NULL DEFAULT '',
    glossary_color TEXT NOT NULL DEFAULT '',
    allow_translation_propagation INTEGER NOT NULL DEFAULT 1,
    manage_units INTEGER NOT NULL DEFAULT 0,
    file_format TEXT NOT NULL,
    filemask TEXT NOT NULL,
    vcs TEXT NOT NULL,
    repo TEXT NOT NULL DEFAULT '',
    branch TEXT NOT NULL DEFAULT '',
    source_language_id INTEGER NOT NULL REFERENCES languages(id),
    license TEXT NOT NULL DEFAULT '',
    UNIQUE (project_id, slug)
);

CREATE TABLE IF NOT EXISTS component_links (
    component_id INTEGER NOT NULL REFERENCES components(id),
    project_id INTEGER NOT NULL REFERENCES projects(id),
    PRIMARY KEY (component_id, project_id)
);

-- Translations (one language of a component)
CREATE TABLE IF NOT EXISTS translations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    component_id INTEGER NOT NULL REFERENCES components(id),
    language_id INTEGER NOT NULL REFERENCES languages(id),
    plural_id INTEGER NOT NULL REFERENCES plurals(id),
    filename TEXT NOT NULL DEFAULT '',
    language_code TEXT NOT NULL,
    check_flags TEXT NOT NULL DEFAULT '',
    revision TEXT NOT NULL DEFAULT '',
    UNIQUE (component_id, language_id)
);

-- Units
CREATE TABLE IF NOT EXISTS units (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    translation_id INTEGER NOT NULL REFERENCES translations(id),
    id_hash INTEGER NOT NULL,
    context TEXT NOT NULL DEFAULT '',
    source TEXT NOT NULL,
    target TEXT NOT NULL DEFAULT '',
    state INTEGER NOT NULL,
    position INTEGER NOT NULL,
    num_words INTEGER NOT NULL,
    source_unit_id INTEGER REFERENCES units(id),
    UNIQUE (translation_id, id_hash)
);

CREATE INDEX IF NOT EXISTS idx_units_source_unit_id ON units(source_unit_id);

-- Change history
CREATE TABLE IF NOT EXISTS changes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    term_id INTEGER REFERENCES terms(id),
    unit_id INTEGER REFERENCES units(id),
    translation_id INTEGER REFERENCES translations(id),
    component_id INTEGER REFERENCES components(id),
    language_id INTEGER REFERENCES languages(id),
    project_id INTEGER REFERENCES projects(id),
    action TEXT NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_changes_term_id ON changes(term_id);
"#;

const MIGRATION_002: &str = r#"
-- One-shot data migrations that already ran
CREATE TABLE IF NOT EXISTS data_migrations (
    name TEXT PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: MIGRATION_001,
    },
    Migration {
        version: 2,
        name: "data_migrations",
        sql: MIGRATION_002,
    },
];
