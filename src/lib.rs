//! Recipe markup compiler and shopping list aggregation.
//!
//! Recipes are plain text with inline markup for ingredients (`@Mehl{500%g}`),
//! equipment (`#Topf`), timers (`~{10%Minuten}`), comments, sections, notes
//! and references to other recipes (`@./Hollandaise{150%g}`).
//!
//! ```
//! let recipe = kochbuch::parse(">> servings: 2\n\n@Mehl{500%g} verrühren.");
//! assert_eq!(recipe.metadata.get("servings"), Some("2"));
//! assert_eq!(kochbuch::serialize(&recipe), ">> servings: 2\n\n@Mehl{500%g} verrühren.");
//! ```

pub mod builder;
pub mod collation;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod parser;
pub mod scale;
pub mod serializer;
pub mod shopping_list;
pub mod synonyms;
pub mod tokenizer;

pub use builder::{ShoppingList, ShoppingListBuilder};
pub use config::{load_config, Settings};
pub use error::{LoadError, ShoppingListError, SynonymError};
pub use loader::{normalize_id, DirectoryLoader, MemoryLoader, RecipeLoader};
pub use model::{Ingredient, Metadata, Recipe, RecipeRef, Section, Step, Timer, Token};
pub use parser::{classify_line, parse, LineKind};
pub use scale::scale_amount;
pub use serializer::{serialize, serialize_step, serialize_token};
pub use shopping_list::{aggregate, AggregatedEntry, AggregatedIngredient, ShoppingListRequest};
pub use synonyms::SynonymTable;
pub use tokenizer::{tokenize, TokenizedLine};
