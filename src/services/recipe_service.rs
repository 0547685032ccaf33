//! Recipe Catalog - menu item to ingredient requirements lookup
//!
//! The deduction engine resolves recipes through [`RecipeCatalog`]; the
//! bundled [`MemoryRecipeCatalog`] keeps them in a concurrent map so
//! order-time lookups never block each other. A menu item that is not
//! registered simply resolves to an empty requirement list: untracked
//! items are normal, not an error.

use crate::db::models::{IngredientRequirement, Recipe};
use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

/// Catalog lookup failure (backend unreachable, decode error, ...)
#[derive(Debug, Error)]
#[error("Recipe lookup failed: {0}")]
pub struct CatalogError(pub String);

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Menu/recipe lookup seam
#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    /// Ingredient requirements for one menu item; empty when the item
    /// does not participate in inventory tracking.
    async fn ingredients_for(&self, menu_item_id: &str)
        -> CatalogResult<Vec<IngredientRequirement>>;
}

/// In-memory recipe catalog
#[derive(Default)]
pub struct MemoryRecipeCatalog {
    recipes: DashMap<String, Recipe>,
}

impl MemoryRecipeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a menu item's recipe
    pub fn insert(&self, recipe: Recipe) {
        self.recipes.insert(recipe.menu_item_id.clone(), recipe);
    }

    /// Detach a menu item from inventory tracking
    pub fn remove(&self, menu_item_id: &str) -> Option<Recipe> {
        self.recipes.remove(menu_item_id).map(|(_, recipe)| recipe)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[async_trait]
impl RecipeCatalog for MemoryRecipeCatalog {
    async fn ingredients_for(
        &self,
        menu_item_id: &str,
    ) -> CatalogResult<Vec<IngredientRequirement>> {
        Ok(self
            .recipes
            .get(menu_item_id)
            .map(|recipe| recipe.ingredients.clone())
            .unwrap_or_default())
    }
}
