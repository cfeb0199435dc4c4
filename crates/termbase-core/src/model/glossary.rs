use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{
    ChangeId, ComponentId, GlossaryId, LanguageId, ProjectId, TermId, TranslationId, UnitId,
};

/// A legacy glossary: a flat list of terms attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glossary {
    pub id: GlossaryId,
    pub project_id: ProjectId,
    pub name: String,
    /// Display color, e.g. `silver`.
    pub color: String,
    pub source_language_id: LanguageId,
}

/// A legacy glossary term in one target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub glossary_id: GlossaryId,
    pub language_id: LanguageId,
    pub source: String,
    pub target: String,
}

/// A history entry.
///
/// Entries recorded against legacy terms only carry `term_id` (plus
/// language and project); the unit, translation and component references
/// are filled in once the term has been turned into a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub id: ChangeId,
    pub term_id: Option<TermId>,
    pub unit_id: Option<UnitId>,
    pub translation_id: Option<TranslationId>,
    pub component_id: Option<ComponentId>,
    pub language_id: Option<LanguageId>,
    pub project_id: Option<ProjectId>,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

/// Fields for recording a history entry against a legacy term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChange {
    pub term_id: TermId,
    pub language_id: LanguageId,
    pub project_id: ProjectId,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

impl NewChange {
    #[must_use]
    pub fn for_term(term: &Term, project_id: ProjectId, action: impl Into<String>) -> Self {
        Self {
            term_id: term.id,
            language_id: term.language_id,
            project_id,
            action: action.into(),
            timestamp: Utc::now(),
        }
    }
}
