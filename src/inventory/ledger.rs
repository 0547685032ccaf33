//! Stock ledger seam
//!
//! The deduction engine talks to stock persistence through the
//! [`StockLedger`] trait. Business outcomes (missing ingredient, unit
//! mismatch, insufficient stock) are modeled as error variants so a
//! caller can partition them from real storage failures, but none of
//! them is fatal to the order being processed.

use crate::db::models::{StockItem, StockTransaction};
use crate::inventory::storage::StorageError;
use crate::inventory::units::BaseUnit;
use async_trait::async_trait;
use thiserror::Error;

/// Ledger error types
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient stock: need {required} {unit}, have {available} {unit}")]
    InsufficientStock {
        required: f64,
        available: f64,
        unit: BaseUnit,
    },

    #[error("Unit mismatch: inventory tracks {have}, recipe calls for {want}")]
    UnitMismatch { have: BaseUnit, want: BaseUnit },

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl LedgerError {
    /// Storage-layer failures need operational alerting; everything else
    /// is an expected business outcome.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, LedgerError::Storage(_))
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// One requested deduction, expressed in the base unit
#[derive(Debug, Clone)]
pub struct DeductionRequest {
    pub ingredient_id: String,
    /// Amount to remove, already normalized to `unit`
    pub quantity: f64,
    /// Base unit the requirement normalized to; must match the family
    /// the ingredient's stock normalizes to
    pub unit: BaseUnit,
    /// Audit context copied onto the transaction record
    pub context: DeductionContext,
}

/// Audit fields for the transaction written alongside a deduction
#[derive(Debug, Clone)]
pub struct DeductionContext {
    pub order_id: String,
    pub menu_item: String,
    /// Requirement as written in the recipe, scaled by order quantity
    pub recipe_quantity: f64,
    pub recipe_unit: String,
    pub actor: String,
}

/// Outcome of a successful compare-and-deduct
#[derive(Debug, Clone)]
pub struct AppliedDeduction {
    pub ingredient_id: String,
    pub ingredient_name: String,
    /// Amount removed, base unit
    pub deducted: f64,
    pub base_unit: BaseUnit,
    /// Stock before, storage unit
    pub previous_stock: f64,
    /// Stock after, storage unit
    pub new_stock: f64,
    pub storage_unit: String,
    pub transaction_id: String,
}

/// Stock persistence seam
///
/// # Atomicity
///
/// `compare_and_deduct` must be atomic per ingredient: the sufficiency
/// check, the decremented write, and the appended transaction commit as
/// one unit, or none of them do. Two concurrent calls against the same
/// ingredient must never both succeed when stock only covers one.
/// Calls against different ingredients are independent.
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Fetch one stock item; inactive (soft-deleted) items resolve to
    /// `NotFound`.
    async fn get(&self, ingredient_id: &str) -> LedgerResult<StockItem>;

    /// Atomically check sufficiency, decrement stock, and append the
    /// transaction record.
    async fn compare_and_deduct(
        &self,
        request: DeductionRequest,
    ) -> LedgerResult<AppliedDeduction>;

    /// Append a transaction outside the deduction path (manual
    /// adjustments). Only storage failures are rejected.
    async fn record_transaction(&self, entry: StockTransaction) -> LedgerResult<()>;

    /// Whether an order's deduction already ran against this ledger.
    async fn is_order_processed(&self, order_id: &str) -> LedgerResult<bool>;

    /// Remember an order so a repeated deduction call becomes a no-op.
    async fn mark_order_processed(&self, order_id: &str) -> LedgerResult<()>;
}
