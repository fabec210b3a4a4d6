use crate::error::SynonymError;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;

/// Lookup from ingredient names to the canonical name of their synonym group.
///
/// Built from groups of interchangeable names, e.g.
/// `[["Hackfleisch", "Gehacktes", "Faschiertes"]]`. The first name of each
/// group is its canonical form. Lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymTable {
    canonical: HashMap<String, String>,
}

impl SynonymTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from synonym groups. A name listed in several groups
    /// keeps the group it appeared in first.
    pub fn from_groups<G, S>(groups: G) -> Self
    where
        G: IntoIterator,
        G::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = SynonymTable::new();
        for group in groups {
            table.add_group(group);
        }
        table
    }

    pub fn add_group<S: AsRef<str>>(&mut self, group: impl IntoIterator<Item = S>) {
        let mut names = group
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty());

        let Some(canonical) = names.next() else {
            return;
        };
        for name in std::iter::once(canonical.clone()).chain(names) {
            self.canonical
                .entry(name.to_lowercase())
                .or_insert_with(|| canonical.clone());
        }
    }

    /// Canonical name for `name`, matched case-insensitively.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.canonical
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    /// Canonical name for `name`, or `name` itself when it has no synonyms.
    pub fn canonicalize<'a>(&'a self, name: &'a str) -> &'a str {
        self.lookup(name).unwrap_or(name)
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// Parse a JSON array of string arrays.
    pub fn from_json(json: &str) -> Result<Self, SynonymError> {
        let groups: Vec<Vec<String>> = serde_json::from_str(json)?;
        Ok(Self::from_groups(groups))
    }

    /// Read a synonym file. A missing file yields an empty table.
    pub async fn load(path: &Path) -> Result<Self, SynonymError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let table = Self::from_json(&content)?;
                debug!("Loaded synonyms from {}", path.display());
                Ok(table)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No synonym file at {}", path.display());
                Ok(Self::new())
            }
            Err(e) => {
                warn!("Failed to read synonym file {}: {}", path.display(), e);
                Err(SynonymError::Io(e))
            }
        }
    }
}
