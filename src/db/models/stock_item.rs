//! Stock Item Model

use serde::{Deserialize, Serialize};

/// Lifecycle status of a stock item
///
/// Items are never physically removed: deletion flips the status to
/// `Inactive` so historical transactions keep a valid reference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Active,
    Inactive,
}

impl ItemStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ItemStatus::Active)
    }
}

/// Stock item (ingredient) entity
///
/// `current_stock` and `reorder_level` are denominated in `unit`
/// (the storage unit, e.g. "kg"), not in the base unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockItem {
    pub id: String,
    pub name: String,
    /// Free-text grouping, display only
    #[serde(default)]
    pub category: String,
    /// Storage unit string (kg, gm, ltr, ml, pieces, ...)
    pub unit: String,
    /// Quantity on hand, in storage unit
    pub current_stock: f64,
    /// Low-stock threshold, same unit as `current_stock`
    #[serde(default)]
    pub reorder_level: f64,
    /// Currency per storage unit
    #[serde(default)]
    pub unit_cost: f64,
    pub supplier: Option<String>,
    pub supplier_contact: Option<String>,
    #[serde(default = "default_status")]
    pub status: ItemStatus,
    /// Unix millis
    pub created_at: i64,
    /// Unix millis
    pub last_updated: i64,
}

fn default_status() -> ItemStatus {
    ItemStatus::Active
}

/// Create stock item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockItemCreate {
    pub name: String,
    pub category: Option<String>,
    pub unit: String,
    pub current_stock: Option<f64>,
    pub reorder_level: Option<f64>,
    pub unit_cost: Option<f64>,
    pub supplier: Option<String>,
    pub supplier_contact: Option<String>,
}

/// Update stock item payload (partial)
///
/// A `current_stock` change through this path is a manual adjustment
/// and is recorded in the transaction log like any other mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub current_stock: Option<f64>,
    pub reorder_level: Option<f64>,
    pub unit_cost: Option<f64>,
    pub supplier: Option<String>,
    pub supplier_contact: Option<String>,
    pub status: Option<ItemStatus>,
}

/// Stock item projection with display fields resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockItemView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub current_stock: f64,
    /// Smart-formatted stock ("700 gm" instead of "0.7 kg")
    pub current_stock_display: String,
    pub reorder_level: f64,
    pub unit_cost: f64,
    pub supplier: Option<String>,
    pub supplier_contact: Option<String>,
    pub status: ItemStatus,
    /// current_stock × unit_cost, 2 decimals
    pub inventory_value: f64,
    pub last_updated: i64,
    pub created_at: i64,
}

/// Query filter for stock item listings
#[derive(Debug, Clone)]
pub struct ItemFilter {
    /// `None` returns every lifecycle state
    pub status: Option<ItemStatus>,
    pub category: Option<String>,
    /// Keep only items at or below their reorder level
    pub low_stock_only: bool,
}

impl Default for ItemFilter {
    fn default() -> Self {
        Self {
            status: Some(ItemStatus::Active),
            category: None,
            low_stock_only: false,
        }
    }
}

/// Low-stock urgency classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    Warning,
}

/// One entry of the low-stock report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub id: String,
    pub name: String,
    pub category: String,
    pub current_stock: f64,
    pub current_stock_display: String,
    pub reorder_level: f64,
    pub unit: String,
    pub urgency: Urgency,
    /// max(0, reorder_level - current_stock), storage unit
    pub needed: f64,
    pub supplier: Option<String>,
    pub supplier_contact: Option<String>,
}

/// Low-stock report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockReport {
    pub low_stock_items: Vec<LowStockAlert>,
    pub count: usize,
    pub critical_count: usize,
}

/// Aggregate figures for the inventory dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_items: usize,
    pub low_stock_items: usize,
    pub total_inventory_value: f64,
    /// Transactions appended within the last 24 hours
    pub recent_transactions: usize,
}
