//! Glossary migration for termbase.
//!
//! Converts every legacy glossary into a glossary component backed by TBX
//! files in a local git repository, with units linked to read-only source
//! units and term history pointed at the new units.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod migration;
pub mod naming;
pub mod tbx;
pub mod vcs;

pub use config::Config;
pub use error::{MigrateError, MigrateResult};
pub use migration::{
    repository_path, GlossaryMigration, MigrationSummary, COMMIT_MESSAGE, MIGRATION_NAME,
};
pub use tbx::{TbxEntry, TbxStore};
pub use vcs::{CommitAuthor, GitBackend, GitRepository, Repository, RepositoryBackend};
