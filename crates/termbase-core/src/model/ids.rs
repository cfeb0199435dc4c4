use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.0))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map(Self)
            }
        }
    };
}

define_id!(ProjectId, "Row id of a project.");
define_id!(LanguageId, "Row id of a language.");
define_id!(PluralId, "Row id of a plural rule.");
define_id!(GlossaryId, "Row id of a legacy glossary.");
define_id!(TermId, "Row id of a legacy glossary term.");
define_id!(ComponentId, "Row id of a component.");
define_id!(TranslationId, "Row id of a translation.");
define_id!(UnitId, "Row id of a translation unit.");
define_id!(ChangeId, "Row id of a change history entry.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trips_raw_value() {
        let id = UnitId::new(42);
        assert_eq!(id.get(), 42);
        assert_eq!(UnitId::from(42), id);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(ProjectId::new(7).to_string(), "7");
    }

    #[test]
    fn test_id_serializes_as_plain_integer() {
        let json = serde_json::to_string(&ComponentId::new(3)).unwrap();
        assert_eq!(json, "3");
    }

    #[test]
    fn test_id_sql_round_trip() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let id: TermId = conn
            .query_row("SELECT ?1", [TermId::new(99)], |row| row.get(0))
            .unwrap();
        assert_eq!(id, TermId::new(99));
    }
}
