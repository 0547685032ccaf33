//! Pantry - restaurant inventory auto-deduction engine
//!
//! When an order is placed, every line item's recipe is resolved into
//! ingredient requirements, requirements and on-hand stock are
//! normalized to a canonical base unit per measurement family, and each
//! ingredient is atomically checked and decremented with an append-only
//! transaction record. Stock problems never block the order: they are
//! collected into a structured report the caller surfaces as warnings.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # configuration
//! ├── db/            # entity models
//! ├── inventory/     # units, ledger, storage, engine, report
//! ├── services/      # recipe catalog
//! └── utils/         # logging
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pantry::{DeductionEngine, MemoryLedger, MemoryRecipeCatalog, OrderDescriptor, OrderLine};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), pantry::EngineError> {
//! let ledger = Arc::new(MemoryLedger::new());
//! let catalog = Arc::new(MemoryRecipeCatalog::new());
//! let engine = DeductionEngine::new(ledger, catalog);
//!
//! let report = engine
//!     .deduct_for_order(&OrderDescriptor {
//!         order_id: "order-42".into(),
//!         items: vec![OrderLine {
//!             menu_item_id: "item-garlic-bread".into(),
//!             menu_item_name: "Garlic Bread".into(),
//!             quantity: 2,
//!         }],
//!     })
//!     .await?;
//! println!("{:?}", report.status);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod db;
pub mod inventory;
pub mod services;
pub mod utils;

// Re-export public surface
pub use crate::core::InventoryConfig;
pub use db::models::{
    DashboardStats, IngredientRequirement, ItemFilter, ItemStatus, LowStockAlert, LowStockReport,
    Recipe, StockItem, StockItemCreate, StockItemUpdate, StockItemView, StockTransaction,
    TransactionQuery, TransactionType, Urgency,
};
pub use inventory::{
    AppliedDeduction, BaseUnit, DeductedItem, DeductionContext, DeductionEngine, DeductionReport,
    DeductionRequest, DeductionStatus, EngineError, LedgerError, LedgerResult, MemoryLedger,
    OrderDescriptor, OrderLine, StockLedger, StockStorage, StorageError, StorageResult,
};
pub use services::{CatalogError, CatalogResult, MemoryRecipeCatalog, RecipeCatalog};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
