use serde::{Deserialize, Serialize};

use crate::model::ids::{ComponentId, LanguageId, PluralId, TranslationId};

/// One language of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub id: TranslationId,
    pub component_id: ComponentId,
    pub language_id: LanguageId,
    pub plural_id: PluralId,
    /// File name relative to the repository; empty for the source translation.
    pub filename: String,
    pub language_code: String,
    pub check_flags: String,
    /// Hash of the file content the rows were loaded from.
    pub revision: String,
}

/// Fields for creating a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTranslation {
    pub component_id: ComponentId,
    pub language_id: LanguageId,
    pub plural_id: PluralId,
    pub filename: String,
    pub language_code: String,
    pub check_flags: String,
}
