use serde::{Deserialize, Serialize};

use crate::model::ids::{LanguageId, PluralId};

/// Plural source marking the built-in default rule of a language.
pub const DEFAULT_PLURAL_SOURCE: i64 = 0;

/// A language known to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language {
    pub id: LanguageId,
    /// Language code such as `en` or `pt_BR`.
    pub code: String,
    pub name: String,
}

/// A plural rule attached to a language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plural {
    pub id: PluralId,
    pub language_id: LanguageId,
    /// Where the rule comes from; [`DEFAULT_PLURAL_SOURCE`] is the default one.
    pub source: i64,
    /// Number of plural forms.
    pub number: i64,
    pub formula: String,
}
