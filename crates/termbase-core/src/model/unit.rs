use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ids::{TranslationId, UnitId};

/// Translation state of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitState {
    Empty,
    Fuzzy,
    Translated,
    Approved,
    ReadOnly,
}

impl UnitState {
    /// Numeric value stored in the database.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Empty => 0,
            Self::Fuzzy => 10,
            Self::Translated => 20,
            Self::Approved => 30,
            Self::ReadOnly => 100,
        }
    }

    pub fn from_i64(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Self::Empty),
            10 => Ok(Self::Fuzzy),
            20 => Ok(Self::Translated),
            30 => Ok(Self::Approved),
            100 => Ok(Self::ReadOnly),
            other => Err(Error::InvalidData(format!("unknown unit state {other}"))),
        }
    }
}

/// A single translatable string in one translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub translation_id: TranslationId,
    /// Identity of the string inside its component, see [`crate::text::calculate_hash`].
    pub id_hash: i64,
    pub context: String,
    pub source: String,
    pub target: String,
    pub state: UnitState,
    pub position: i64,
    pub num_words: i64,
    /// The matching unit of the source translation. Source units point at themselves.
    pub source_unit_id: Option<UnitId>,
}

/// Fields for creating a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUnit {
    pub translation_id: TranslationId,
    pub id_hash: i64,
    pub context: String,
    pub source: String,
    pub target: String,
    pub state: UnitState,
    pub position: i64,
    pub num_words: i64,
    pub source_unit_id: Option<UnitId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_values() {
        assert_eq!(UnitState::Translated.as_i64(), 20);
        assert_eq!(UnitState::ReadOnly.as_i64(), 100);
    }

    #[test]
    fn test_state_from_stored_value() {
        for state in [
            UnitState::Empty,
            UnitState::Fuzzy,
            UnitState::Translated,
            UnitState::Approved,
            UnitState::ReadOnly,
        ] {
            assert_eq!(UnitState::from_i64(state.as_i64()).unwrap(), state);
        }
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        assert!(UnitState::from_i64(15).is_err());
    }
}
