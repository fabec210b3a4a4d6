//! Shopping list aggregation across recipes and their recipe references.

use crate::collation::compare_german;
use crate::error::{LoadError, ShoppingListError};
use crate::loader::{normalize_id, RecipeLoader};
use crate::model::{Recipe, Token};
use crate::parser::parse;
use crate::scale::{base_servings, scale_amount};
use crate::synonyms::SynonymTable;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;

/// One recipe to shop for, optionally scaled to a number of servings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListRequest {
    pub id: String,
    #[serde(default)]
    pub target_servings: Option<f64>,
}

impl ShoppingListRequest {
    pub fn new(id: impl Into<String>) -> Self {
        ShoppingListRequest {
            id: id.into(),
            target_servings: None,
        }
    }

    pub fn with_servings(id: impl Into<String>, servings: f64) -> Self {
        ShoppingListRequest {
            id: id.into(),
            target_servings: Some(servings),
        }
    }
}

/// One occurrence of an ingredient in one recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedEntry {
    pub amount: String,
    pub unit: String,
    pub preparation: String,
    /// Id of the recipe whose text contains the ingredient
    pub source_recipe_id: String,
}

/// All occurrences of one (canonical) ingredient. Amounts are not summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedIngredient {
    pub name: String,
    pub entries: Vec<AggregatedEntry>,
}

/// An ingredient after scaling, before grouping.
#[derive(Debug, Clone)]
struct Collected {
    name: String,
    entry: AggregatedEntry,
}

type CollectFuture<'a> = Pin<Box<dyn Future<Output = Vec<Collected>> + Send + 'a>>;

/// Ingredients of `recipe`, with referenced recipes spliced in at the
/// position of their reference.
fn walk<'a, L: RecipeLoader + ?Sized>(
    loader: &'a L,
    recipe: Recipe,
    id: String,
    scale: f64,
    visited: &'a mut HashSet<String>,
) -> CollectFuture<'a> {
    Box::pin(async move {
        let mut collected = Vec::new();
        let tokens = recipe
            .sections
            .into_iter()
            .flat_map(|section| section.steps)
            .flat_map(|step| step.tokens);

        for token in tokens {
            match token {
                Token::Ingredient(ingredient) => {
                    let amount = if ingredient.fixed {
                        ingredient.amount
                    } else {
                        scale_amount(&ingredient.amount, scale)
                    };
                    collected.push(Collected {
                        name: ingredient.name,
                        entry: AggregatedEntry {
                            amount,
                            unit: ingredient.unit,
                            preparation: ingredient.preparation,
                            source_recipe_id: id.clone(),
                        },
                    });
                }
                Token::RecipeRef(reference) => {
                    let target = normalize_id(&reference.reference).to_string();
                    collected.extend(collect(loader, target, scale, &mut *visited).await);
                }
                _ => {}
            }
        }
        collected
    })
}

/// Ingredients of a referenced recipe. Already visited and unloadable
/// recipes contribute nothing.
fn collect<'a, L: RecipeLoader + ?Sized>(
    loader: &'a L,
    id: String,
    scale: f64,
    visited: &'a mut HashSet<String>,
) -> CollectFuture<'a> {
    Box::pin(async move {
        if !visited.insert(id.clone()) {
            debug!("Skipping already visited recipe '{}'", id);
            return Vec::new();
        }

        match loader.load(&id).await {
            Ok(markup) => walk(loader, parse(&markup), id, scale, visited).await,
            Err(LoadError::NotFound(_)) => {
                warn!("Referenced recipe '{}' not found, ignoring it", id);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to load referenced recipe '{}': {}", id, e);
                Vec::new()
            }
        }
    })
}

/// Group collected ingredients by canonical name and sort them.
fn group(collected: Vec<Collected>, synonyms: Option<&SynonymTable>) -> Vec<AggregatedIngredient> {
    let mut groups: Vec<AggregatedIngredient> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for Collected { name, entry } in collected {
        let canonical = match synonyms {
            Some(table) => table.canonicalize(&name).to_string(),
            None => name,
        };
        let key = canonical.to_lowercase();

        match index.get(&key) {
            Some(&position) => groups[position].entries.push(entry),
            None => {
                index.insert(key, groups.len());
                groups.push(AggregatedIngredient {
                    name: canonical,
                    entries: vec![entry],
                });
            }
        }
    }

    groups.sort_by(|a, b| compare_german(&a.name, &b.name));
    groups
}

/// Build a shopping list for `requests`.
///
/// Each requested recipe is scaled by `target_servings / servings` (its own
/// declared servings, default 1); without a target the scale is 1. The scale
/// carries through recipe references, fixed amounts are never scaled.
/// Ingredients are grouped case-insensitively by their canonical name and the
/// groups sorted in German dictionary order.
///
/// A requested recipe that cannot be found fails the whole request. Missing
/// referenced recipes and reference cycles are skipped silently.
pub async fn aggregate<L: RecipeLoader + ?Sized>(
    loader: &L,
    requests: &[ShoppingListRequest],
    synonyms: Option<&SynonymTable>,
) -> Result<Vec<AggregatedIngredient>, ShoppingListError> {
    let mut collected = Vec::new();

    for request in requests {
        let id = normalize_id(&request.id).to_string();
        let markup = loader.load(&id).await.map_err(|e| match e {
            LoadError::NotFound(_) => ShoppingListError::RecipeNotFound(request.id.clone()),
            other => ShoppingListError::Load(other),
        })?;
        let recipe = parse(&markup);

        let scale = match request.target_servings {
            Some(target) => target / base_servings(&recipe),
            None => 1.0,
        };
        debug!("Collecting ingredients of '{}' with scale {}", id, scale);

        let mut visited = HashSet::from([id.clone()]);
        collected.extend(walk(loader, recipe, id, scale, &mut visited).await);
    }

    let list = group(collected, synonyms);
    info!(
        "Aggregated {} ingredients from {} recipes",
        list.len(),
        requests.len()
    );
    Ok(list)
}
