use serde::{Deserialize, Serialize};

use crate::model::glossary::Glossary;
use crate::model::ids::{ComponentId, LanguageId, ProjectId};

/// File format identifier of TBX-backed components.
pub const TBX_FILE_FORMAT: &str = "tbx";

/// A translatable content container inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub project_id: ProjectId,
    pub name: String,
    /// Unique within the project.
    pub slug: String,
    pub is_glossary: bool,
    pub glossary_name: String,
    pub glossary_color: String,
    pub allow_translation_propagation: bool,
    pub manage_units: bool,
    pub file_format: String,
    pub filemask: String,
    pub vcs: String,
    pub repo: String,
    pub branch: String,
    pub source_language_id: LanguageId,
    pub license: String,
}

/// Fields for creating a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComponent {
    pub project_id: ProjectId,
    pub name: String,
    pub slug: String,
    pub is_glossary: bool,
    pub glossary_name: String,
    pub glossary_color: String,
    pub allow_translation_propagation: bool,
    pub manage_units: bool,
    pub file_format: String,
    pub filemask: String,
    pub vcs: String,
    pub repo: String,
    pub branch: String,
    pub source_language_id: LanguageId,
    pub license: String,
}

impl NewComponent {
    /// A glossary component stored as TBX files in a local repository.
    #[must_use]
    pub fn glossary(
        glossary: &Glossary,
        name: impl Into<String>,
        slug: impl Into<String>,
        license: impl Into<String>,
    ) -> Self {
        Self {
            project_id: glossary.project_id,
            name: name.into(),
            slug: slug.into(),
            is_glossary: true,
            glossary_name: glossary.name.clone(),
            glossary_color: glossary.color.clone(),
            allow_translation_propagation: false,
            manage_units: true,
            file_format: TBX_FILE_FORMAT.to_string(),
            filemask: "*.tbx".to_string(),
            vcs: "local".to_string(),
            repo: "local:".to_string(),
            branch: "main".to_string(),
            source_language_id: glossary.source_language_id,
            license: license.into(),
        }
    }

    /// A regular (non-glossary) component; used when seeding projects.
    #[must_use]
    pub fn regular(
        project_id: ProjectId,
        name: impl Into<String>,
        slug: impl Into<String>,
        source_language_id: LanguageId,
    ) -> Self {
        Self {
            project_id,
            name: name.into(),
            slug: slug.into(),
            is_glossary: false,
            glossary_name: String::new(),
            glossary_color: String::new(),
            allow_translation_propagation: true,
            manage_units: false,
            file_format: "po".to_string(),
            filemask: "*.po".to_string(),
            vcs: "git".to_string(),
            repo: String::new(),
            branch: "main".to_string(),
            source_language_id,
            license: String::new(),
        }
    }

    #[must_use]
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::GlossaryId;

    #[test]
    fn test_glossary_component_attributes() {
        let glossary = Glossary {
            id: GlossaryId::new(1),
            project_id: ProjectId::new(2),
            name: "Terms".to_string(),
            color: "navy".to_string(),
            source_language_id: LanguageId::new(3),
        };

        let component = NewComponent::glossary(&glossary, "Glossary", "glossary", "MIT");

        assert!(component.is_glossary);
        assert!(!component.allow_translation_propagation);
        assert!(component.manage_units);
        assert_eq!(component.glossary_name, "Terms");
        assert_eq!(component.glossary_color, "navy");
        assert_eq!(component.file_format, "tbx");
        assert_eq!(component.filemask, "*.tbx");
        assert_eq!(component.vcs, "local");
        assert_eq!(component.repo, "local:");
        assert_eq!(component.branch, "main");
        assert_eq!(component.source_language_id, LanguageId::new(3));
        assert_eq!(component.project_id, ProjectId::new(2));
        assert_eq!(component.license, "MIT");
    }
}
