//! Component names and slugs for migrated glossaries, plus the context
//! scheme that keeps repeated source strings apart.

use std::collections::{HashMap, HashSet};

use termbase_core::text::slugify;

/// Hands out component names and slugs that are unique within one project.
#[derive(Debug, Default)]
pub struct ComponentNamer {
    taken: HashSet<String>,
}

impl ComponentNamer {
    /// Start from the slugs the project already uses.
    #[must_use]
    pub fn new(taken: HashSet<String>) -> Self {
        Self { taken }
    }

    /// Claim a name and slug for a glossary.
    ///
    /// A project with a single glossary gets the plain `Glossary` name.
    /// Clashing slugs get ` - n` / `-n` appended to the name and slug.
    pub fn claim(&mut self, glossary_name: &str, single: bool) -> (String, String) {
        let (base_name, base_slug) = if single {
            ("Glossary".to_string(), "glossary".to_string())
        } else {
            (
                format!("Glossary: {glossary_name}"),
                format!("glossary-{}", slugify(glossary_name)),
            )
        };

        let mut name = base_name.clone();
        let mut slug = base_slug.clone();
        let mut attempts = 0;
        while self.taken.contains(&slug) {
            attempts += 1;
            name = format!("{base_name} - {attempts}");
            slug = format!("{base_slug}-{attempts}");
        }

        self.taken.insert(slug.clone());
        (name, slug)
    }
}

/// Counts source strings within one translation to derive unit contexts.
///
/// The first occurrence of a source gets an empty context; the n-th one
/// (n >= 2) gets `n`.
#[derive(Debug, Default)]
pub struct ContextCounter {
    seen: HashMap<String, usize>,
}

impl ContextCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more occurrence of `source` and return its context.
    pub fn next_context(&mut self, source: &str) -> String {
        let count = self.seen.entry(source.to_string()).or_insert(0);
        *count += 1;
        if *count > 1 {
            count.to_string()
        } else {
            String::new()
        }
    }
}
