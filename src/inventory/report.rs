//! Deduction report types
//!
//! The structured outcome of one order's inventory deduction. Failures
//! are carried as human-readable reason strings; stock problems are
//! data in this report, never errors raised at the caller.

use serde::{Deserialize, Serialize};

/// Overall outcome of a deduction run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeductionStatus {
    /// Every touched ingredient was deducted
    Success,
    /// At least one ingredient failed; the rest were still deducted
    PartialSuccess,
}

/// One successfully deducted ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductedItem {
    pub ingredient: String,
    /// Amount removed, base unit
    pub deducted: f64,
    pub deducted_unit: String,
    /// Smart-formatted amount in the item's storage framing
    pub deducted_display: String,
    /// Stock after deduction, storage unit
    pub remaining: f64,
    pub remaining_unit: String,
    pub remaining_display: String,
    /// The requirement as the recipe expressed it, e.g. "400 gm"
    pub recipe_requested: String,
}

/// Per-order deduction outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionReport {
    pub order_id: String,
    pub deducted_items: Vec<DeductedItem>,
    /// Human-readable reasons, one per failed ingredient
    pub failed_items: Vec<String>,
    pub transactions_logged: usize,
    pub status: DeductionStatus,
}

impl DeductionReport {
    pub fn is_success(&self) -> bool {
        self.status == DeductionStatus::Success
    }
}
