use crate::error::LoadError;
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// File extension of recipe documents
pub const RECIPE_EXTENSION: &str = "cook";

/// Source of recipe markup, looked up by recipe id.
#[async_trait]
pub trait RecipeLoader: Send + Sync {
    /// Load the markup of recipe `id`. A missing recipe must be reported as
    /// [`LoadError::NotFound`].
    async fn load(&self, id: &str) -> Result<String, LoadError>;
}

/// Normalise a recipe id or reference: trims, drops leading `./` and a
/// trailing `.cook`.
pub fn normalize_id(id: &str) -> &str {
    let mut id = id.trim();
    while let Some(rest) = id.strip_prefix("./") {
        id = rest;
    }
    id.strip_suffix(".cook").unwrap_or(id)
}

/// Loads `<root>/<id>.cook` files.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryLoader { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of recipe `id`, refusing ids that would leave the root directory.
    pub fn path_for(&self, id: &str) -> Result<PathBuf, LoadError> {
        let id = normalize_id(id);
        let relative = Path::new(id);
        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if id.is_empty() || !contained {
            return Err(LoadError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(format!("{id}.{RECIPE_EXTENSION}")))
    }

    /// Ids of all recipes directly inside the root, sorted.
    pub async fn list(&self) -> Result<Vec<String>, LoadError> {
        let io_error = |source| LoadError::Io {
            id: self.root.display().to_string(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(io_error)?;
        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECIPE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl RecipeLoader for DirectoryLoader {
    async fn load(&self, id: &str) -> Result<String, LoadError> {
        let path = self.path_for(id)?;
        debug!("Reading recipe {} from {}", id, path.display());

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LoadError::NotFound(normalize_id(id).to_string()))
            }
            Err(source) => Err(LoadError::Io {
                id: id.to_string(),
                source,
            }),
        }
    }
}

/// Keeps recipe markup in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    recipes: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl AsRef<str>, markup: impl Into<String>) {
        self.recipes
            .insert(normalize_id(id.as_ref()).to_string(), markup.into());
    }

    pub fn with_recipe(mut self, id: impl AsRef<str>, markup: impl Into<String>) -> Self {
        self.insert(id, markup);
        self
    }
}

#[async_trait]
impl RecipeLoader for MemoryLoader {
    async fn load(&self, id: &str) -> Result<String, LoadError> {
        let id = normalize_id(id);
        self.recipes
            .get(id)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("./Hollandaise"), "Hollandaise");
        assert_eq!(normalize_id(" Hollandaise.cook "), "Hollandaise");
        assert_eq!(normalize_id("././Teig/Mürbeteig"), "Teig/Mürbeteig");
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let loader = DirectoryLoader::new("/rezepte");
        assert!(matches!(
            loader.path_for("../geheim"),
            Err(LoadError::InvalidId(_))
        ));
        assert!(matches!(loader.path_for("/etc/passwd"), Err(LoadError::InvalidId(_))));
        assert!(matches!(loader.path_for(""), Err(LoadError::InvalidId(_))));
        assert_eq!(
            loader.path_for("./Teig/Mürbeteig").unwrap(),
            PathBuf::from("/rezepte/Teig/Mürbeteig.cook")
        );
    }

    #[tokio::test]
    async fn test_directory_loader_reads_and_lists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Chili.cook"), "@Bohnen{400%g}").unwrap();
        std::fs::write(dir.path().join("Gyoza.cook"), "@Kohl{200%g}").unwrap();
        std::fs::write(dir.path().join("synonyme.json"), "[]").unwrap();

        let loader = DirectoryLoader::new(dir.path());
        assert_eq!(loader.load("Chili").await.unwrap(), "@Bohnen{400%g}");
        assert!(matches!(
            loader.load("Fehlt").await,
            Err(LoadError::NotFound(id)) if id == "Fehlt"
        ));
        assert_eq!(loader.list().await.unwrap(), vec!["Chili", "Gyoza"]);
    }

    #[tokio::test]
    async fn test_memory_loader() {
        let loader = MemoryLoader::new().with_recipe("./A", "@Mehl");
        assert_eq!(loader.load("A").await.unwrap(), "@Mehl");
        assert!(loader.load("B").await.is_err());
    }
}
