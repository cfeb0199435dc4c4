use serde::{Deserialize, Serialize};

use crate::model::ids::ProjectId;

/// A translation project. Owns legacy glossaries and components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// URL-safe identifier, unique across projects.
    pub slug: String,
}
