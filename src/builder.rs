use std::path::PathBuf;
use std::sync::Arc;

use crate::loader::{DirectoryLoader, RecipeLoader};
use crate::shopping_list::{aggregate, AggregatedIngredient, ShoppingListRequest};
use crate::synonyms::SynonymTable;
use crate::ShoppingListError;

/// Builder for configuring and executing a shopping list request
#[derive(Default)]
pub struct ShoppingListBuilder {
    loader: Option<Arc<dyn RecipeLoader>>,
    requests: Vec<ShoppingListRequest>,
    synonyms: Option<SynonymTable>,
}

impl std::fmt::Debug for ShoppingListBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShoppingListBuilder")
            .field("loader", &self.loader.as_ref().map(|_| "dyn RecipeLoader"))
            .field("requests", &self.requests)
            .field("synonyms", &self.synonyms)
            .finish()
    }
}

impl ShoppingListBuilder {
    /// Set the loader used to fetch recipe markup
    ///
    /// # Example
    /// ```
    /// use kochbuch::{MemoryLoader, ShoppingList};
    ///
    /// let builder = ShoppingList::builder()
    ///     .loader(MemoryLoader::new().with_recipe("Chili", "@Bohnen{400%g}"));
    /// ```
    pub fn loader(mut self, loader: impl RecipeLoader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Load recipes from `<dir>/<id>.cook` files
    ///
    /// # Example
    /// ```
    /// use kochbuch::ShoppingList;
    ///
    /// let builder = ShoppingList::builder().recipes_dir("./rezepte");
    /// ```
    pub fn recipes_dir(self, dir: impl Into<PathBuf>) -> Self {
        self.loader(DirectoryLoader::new(dir))
    }

    /// Add a recipe at its declared servings
    pub fn recipe(mut self, id: impl Into<String>) -> Self {
        self.requests.push(ShoppingListRequest::new(id));
        self
    }

    /// Add a recipe scaled to `servings`
    ///
    /// # Example
    /// ```
    /// use kochbuch::ShoppingList;
    ///
    /// let builder = ShoppingList::builder()
    ///     .recipes_dir("./rezepte")
    ///     .recipe_for("Chili", 6.0);
    /// ```
    pub fn recipe_for(mut self, id: impl Into<String>, servings: f64) -> Self {
        self.requests
            .push(ShoppingListRequest::with_servings(id, servings));
        self
    }

    /// Add prepared requests
    pub fn requests(mut self, requests: impl IntoIterator<Item = ShoppingListRequest>) -> Self {
        self.requests.extend(requests);
        self
    }

    /// Merge ingredients through a synonym table
    pub fn synonyms(mut self, synonyms: SynonymTable) -> Self {
        self.synonyms = Some(synonyms);
        self
    }

    /// Build the shopping list
    ///
    /// # Errors
    /// Returns `ShoppingListError` if:
    /// - No loader or no recipe was specified
    /// - A requested recipe does not exist or cannot be read
    ///
    /// # Example
    /// ```no_run
    /// # use kochbuch::ShoppingList;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let list = ShoppingList::builder()
    ///     .recipes_dir("./rezepte")
    ///     .recipe("Chili")
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<Vec<AggregatedIngredient>, ShoppingListError> {
        let loader = self.loader.ok_or_else(|| {
            ShoppingListError::BuilderError(
                "No recipe source specified. Use .loader() or .recipes_dir()".to_string(),
            )
        })?;

        if self.requests.is_empty() {
            return Err(ShoppingListError::BuilderError(
                "No recipes requested. Use .recipe() or .recipe_for()".to_string(),
            ));
        }

        aggregate(loader.as_ref(), &self.requests, self.synonyms.as_ref()).await
    }
}

/// Main entry point for the builder API
pub struct ShoppingList;

impl ShoppingList {
    /// Creates a new builder for a shopping list
    ///
    /// # Example
    /// ```
    /// use kochbuch::ShoppingList;
    ///
    /// let builder = ShoppingList::builder();
    /// ```
    pub fn builder() -> ShoppingListBuilder {
        ShoppingListBuilder::default()
    }
}
