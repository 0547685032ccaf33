//! Persisted entities and their create/update payloads

pub mod recipe;
pub mod stock_item;
pub mod stock_transaction;

pub use recipe::{IngredientRequirement, Recipe};
pub use stock_item::{
    DashboardStats, ItemFilter, ItemStatus, LowStockAlert, LowStockReport, StockItem,
    StockItemCreate, StockItemUpdate, StockItemView, Urgency,
};
pub use stock_transaction::{StockTransaction, TransactionQuery, TransactionType};
