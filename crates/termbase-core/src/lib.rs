//! Core domain model for termbase.
//!
//! This crate defines the project/glossary/component data model, the
//! SQLite schema and its typed data-access layer, and the text helpers
//! (sanitizing, slugs, unit identity hashes) shared by the migration.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod schema;
pub mod text;

pub use error::{Error, Result};
