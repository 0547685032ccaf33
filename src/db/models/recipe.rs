//! Recipe Model
//!
//! Links a menu item to the stocked ingredients it consumes. The
//! requirement's unit is independent of the ingredient's storage unit;
//! the two only have to resolve to the same base-unit family at
//! deduction time.

use serde::{Deserialize, Serialize};

/// One ingredient requirement of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientRequirement {
    pub ingredient_id: String,
    pub ingredient_name: String,
    /// Amount consumed per single ordered unit of the menu item
    pub quantity: f64,
    /// Recipe unit string (kg, gm, ltr, ml, pieces, ...)
    pub unit: String,
}

/// Recipe: a menu item and its ingredient requirements
///
/// A menu item without a recipe simply does not participate in
/// inventory tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub menu_item_id: String,
    pub menu_item_name: String,
    pub ingredients: Vec<IngredientRequirement>,
}
