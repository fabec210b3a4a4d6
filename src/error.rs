use thiserror::Error;

/// Errors reported by a [`RecipeLoader`](crate::loader::RecipeLoader)
#[derive(Error, Debug)]
pub enum LoadError {
    /// No recipe exists under this id
    #[error("recipe not found: {0}")]
    NotFound(String),

    /// The id cannot name a recipe (empty, absolute or escaping the root)
    #[error("invalid recipe id: {0}")]
    InvalidId(String),

    /// Reading the recipe failed
    #[error("failed to read recipe {id}: {source}")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort a shopping list request
#[derive(Error, Debug)]
pub enum ShoppingListError {
    /// A requested (top-level) recipe does not exist
    #[error("recipe not found: {0}")]
    RecipeNotFound(String),

    /// A requested recipe exists but could not be loaded
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),
}

/// Errors reading a synonym table
#[derive(Error, Debug)]
pub enum SynonymError {
    #[error("Failed to read synonym file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a JSON array of string arrays
    #[error("Invalid synonym file: {0}")]
    Json(#[from] serde_json::Error),
}
