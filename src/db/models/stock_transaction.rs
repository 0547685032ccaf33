//! Stock Transaction Model
//!
//! Immutable, append-only records of every stock mutation. Replaying an
//! item's transactions in order reproduces its current stock level.

use serde::{Deserialize, Serialize};

/// Kind of stock mutation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Automatic deduction driven by an order's recipes
    OrderDeduction,
    /// Operator-initiated stock correction
    ManualAdjustment,
}

/// One ledger entry
///
/// `quantity_deducted` is the signed delta in the base unit (negative for
/// restocking adjustments). `previous_stock` / `new_stock` are in the
/// item's storage unit so the chain can be verified against the item as
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockTransaction {
    pub id: String,
    pub item_id: String,
    pub item_name: String,
    pub transaction_type: TransactionType,
    /// Base-unit amount removed from stock
    pub quantity_deducted: f64,
    /// Base unit the deduction was computed in (gm, ml, pieces, ...)
    pub unit: String,
    /// Stock before the mutation, storage unit
    pub previous_stock: f64,
    /// Stock after the mutation, storage unit
    pub new_stock: f64,
    pub storage_unit: String,
    /// Originating order, when the mutation came from the engine
    pub order_id: Option<String>,
    /// Menu item whose recipe triggered the deduction
    pub menu_item: Option<String>,
    /// Required quantity as written in the recipe, scaled by order quantity
    pub recipe_quantity: Option<f64>,
    pub recipe_unit: Option<String>,
    /// Unix millis
    pub transaction_date: i64,
    pub created_by: String,
}

/// Query filter for transaction history
#[derive(Debug, Clone)]
pub struct TransactionQuery {
    pub order_id: Option<String>,
    /// Case-insensitive substring match on the item name
    pub item_name: Option<String>,
    /// Newest-first result cap; clamped to the configured maximum
    pub limit: usize,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            order_id: None,
            item_name: None,
            limit: 50,
        }
    }
}
