pub mod component;
pub mod glossary;
pub mod ids;
pub mod language;
pub mod project;
pub mod translation;
pub mod unit;

pub use component::{Component, NewComponent};
pub use glossary::{Change, Glossary, NewChange, Term};
pub use ids::{
    ChangeId, ComponentId, GlossaryId, LanguageId, PluralId, ProjectId, TermId, TranslationId,
    UnitId,
};
pub use language::{Language, Plural, DEFAULT_PLURAL_SOURCE};
pub use project::Project;
pub use translation::{NewTranslation, Translation};
pub use unit::{NewUnit, Unit, UnitState};
