pub mod db;
pub mod migrations;

pub use db::{Database, GlossaryStatistics};
pub use migrations::{Migration, MIGRATIONS};
