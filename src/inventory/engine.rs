//! Deduction engine - per-order inventory deduction
//!
//! Orchestrates, for one placed order, the deduction of every recipe
//! ingredient across all line items:
//!
//! ```text
//! deduct_for_order(order)
//!     ├─ 1. Idempotency check (order already deducted → empty report)
//!     ├─ 2. Resolve each line item's recipe (untracked items skipped)
//!     ├─ 3. Scale requirements by ordered quantity
//!     ├─ 4. Normalize requirement to its base unit
//!     ├─ 5. compare_and_deduct against the ledger (atomic per ingredient)
//!     ├─ 6. Collect outcome: deducted item or failure reason
//!     └─ 7. Aggregate into DeductionReport
//! ```
//!
//! # Failure policy
//!
//! Order creation must never be blocked by inventory bookkeeping. Every
//! per-ingredient problem (missing ingredient, unit mismatch, thin
//! stock, even a storage outage) becomes a `failed_items` entry and the
//! loop moves on. The only error this engine returns is a structurally
//! invalid order descriptor, which is a caller bug rather than a
//! runtime condition.

use crate::inventory::ledger::{DeductionContext, DeductionRequest, LedgerError, StockLedger};
use crate::inventory::report::{DeductedItem, DeductionReport, DeductionStatus};
use crate::inventory::units;
use crate::services::RecipeCatalog;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

/// Contract-violation errors; business outcomes never surface here
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid order: {0}")]
    InvalidOrder(String),
}

/// One ordered menu item, as supplied by order creation
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub menu_item_id: String,
    pub menu_item_name: String,
    /// Positive count of this item on the order
    pub quantity: u32,
}

/// Input to [`DeductionEngine::deduct_for_order`]
#[derive(Debug, Clone)]
pub struct OrderDescriptor {
    pub order_id: String,
    pub items: Vec<OrderLine>,
}

/// Per-order deduction orchestrator
pub struct DeductionEngine {
    ledger: Arc<dyn StockLedger>,
    catalog: Arc<dyn RecipeCatalog>,
    /// Actor recorded on engine-written transactions
    actor: String,
}

impl DeductionEngine {
    pub fn new(ledger: Arc<dyn StockLedger>, catalog: Arc<dyn RecipeCatalog>) -> Self {
        Self {
            ledger,
            catalog,
            actor: "system".to_string(),
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// Run the deduction for one order
    ///
    /// Returns `Err` only for a malformed descriptor; stock problems are
    /// reported inside the returned [`DeductionReport`].
    pub async fn deduct_for_order(
        &self,
        order: &OrderDescriptor,
    ) -> Result<DeductionReport, EngineError> {
        if order.order_id.trim().is_empty() {
            return Err(EngineError::InvalidOrder("missing order_id".into()));
        }
        if order.items.is_empty() {
            return Err(EngineError::InvalidOrder("order has no line items".into()));
        }
        if let Some(line) = order.items.iter().find(|line| line.quantity == 0) {
            return Err(EngineError::InvalidOrder(format!(
                "quantity must be positive for '{}'",
                line.menu_item_name
            )));
        }

        let mut report = DeductionReport {
            order_id: order.order_id.clone(),
            deducted_items: Vec::new(),
            failed_items: Vec::new(),
            transactions_logged: 0,
            status: DeductionStatus::Success,
        };

        // A replayed order must not deduct twice
        match self.ledger.is_order_processed(&order.order_id).await {
            Ok(true) => {
                tracing::info!(order_id = %order.order_id, "Order already deducted, skipping");
                return Ok(report);
            }
            Ok(false) => {}
            Err(e) => {
                // Treat an unreadable marker as unprocessed; double
                // bookkeeping is preferable to silently skipping stock
                tracing::error!(order_id = %order.order_id, error = %e, "Idempotency check failed");
            }
        }

        for line in &order.items {
            let ingredients = match self.catalog.ingredients_for(&line.menu_item_id).await {
                Ok(list) => list,
                Err(e) => {
                    tracing::error!(
                        menu_item = %line.menu_item_name,
                        error = %e,
                        "Recipe lookup failed"
                    );
                    report
                        .failed_items
                        .push(format!("{}: Recipe lookup failed", line.menu_item_name));
                    continue;
                }
            };
            if ingredients.is_empty() {
                tracing::warn!(menu_item = %line.menu_item_name, "No ingredients found");
                continue;
            }

            for requirement in &ingredients {
                let required_quantity = units::to_f64(
                    units::to_decimal(requirement.quantity) * Decimal::from(line.quantity),
                );
                let (required_base, want_unit) =
                    units::normalize(required_quantity, &requirement.unit);

                let request = DeductionRequest {
                    ingredient_id: requirement.ingredient_id.clone(),
                    quantity: required_base,
                    unit: want_unit,
                    context: DeductionContext {
                        order_id: order.order_id.clone(),
                        menu_item: line.menu_item_name.clone(),
                        recipe_quantity: required_quantity,
                        recipe_unit: requirement.unit.clone(),
                        actor: self.actor.clone(),
                    },
                };

                match self.ledger.compare_and_deduct(request).await {
                    Ok(applied) => {
                        let deducted_in_storage = units::denormalize(
                            applied.deducted,
                            &applied.base_unit,
                            &applied.storage_unit,
                        );
                        tracing::info!(
                            ingredient = %applied.ingredient_name,
                            deducted = applied.deducted,
                            unit = %applied.base_unit,
                            remaining = applied.new_stock,
                            storage_unit = %applied.storage_unit,
                            order_id = %order.order_id,
                            "Deducted stock"
                        );
                        report.deducted_items.push(DeductedItem {
                            ingredient: applied.ingredient_name,
                            deducted: applied.deducted,
                            deducted_unit: applied.base_unit.to_string(),
                            deducted_display: units::format_quantity(
                                deducted_in_storage,
                                &applied.storage_unit,
                            ),
                            remaining: applied.new_stock,
                            remaining_unit: applied.storage_unit.clone(),
                            remaining_display: units::format_quantity(
                                applied.new_stock,
                                &applied.storage_unit,
                            ),
                            recipe_requested: format!(
                                "{} {}",
                                units::fmt_quantity(required_quantity),
                                requirement.unit
                            ),
                        });
                        report.transactions_logged += 1;
                    }
                    Err(e) => {
                        let reason = failure_reason(&requirement.ingredient_name, &e);
                        if e.is_persistence_failure() {
                            tracing::error!(
                                ingredient = %requirement.ingredient_name,
                                order_id = %order.order_id,
                                error = %e,
                                "Deduction hit a storage failure"
                            );
                        } else {
                            tracing::warn!(
                                ingredient = %requirement.ingredient_name,
                                order_id = %order.order_id,
                                reason = %reason,
                                "Deduction failed"
                            );
                        }
                        report.failed_items.push(reason);
                    }
                }
            }
        }

        if !report.failed_items.is_empty() {
            report.status = DeductionStatus::PartialSuccess;
        }
        if report.transactions_logged > 0
            && let Err(e) = self.ledger.mark_order_processed(&order.order_id).await
        {
            tracing::error!(order_id = %order.order_id, error = %e, "Failed to mark order processed");
        }

        Ok(report)
    }
}

/// Human-readable per-ingredient failure reason
fn failure_reason(ingredient_name: &str, error: &LedgerError) -> String {
    match error {
        LedgerError::NotFound(_) => format!("{}: Not found in inventory", ingredient_name),
        LedgerError::UnitMismatch { have, want } => format!(
            "{}: Unit mismatch (inventory: {}, recipe: {})",
            ingredient_name, have, want
        ),
        LedgerError::InsufficientStock {
            required,
            available,
            unit,
        } => format!(
            "{}: Insufficient stock (need {} {}, have {} {})",
            ingredient_name,
            units::fmt_quantity(*required),
            unit,
            units::fmt_quantity(*available),
            unit
        ),
        other => format!("{}: {}", ingredient_name, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{
        IngredientRequirement, ItemStatus, Recipe, StockItem, StockTransaction, TransactionType,
    };
    use crate::inventory::ledger::{AppliedDeduction, LedgerResult};
    use crate::inventory::memory::MemoryLedger;
    use crate::inventory::storage::StorageError;
    use crate::services::MemoryRecipeCatalog;
    use async_trait::async_trait;

    fn stock_item(id: &str, name: &str, unit: &str, stock: f64) -> StockItem {
        StockItem {
            id: id.to_string(),
            name: name.to_string(),
            category: "Test".to_string(),
            unit: unit.to_string(),
            current_stock: stock,
            reorder_level: 0.0,
            unit_cost: 0.0,
            supplier: None,
            supplier_contact: None,
            status: ItemStatus::Active,
            created_at: 0,
            last_updated: 0,
        }
    }

    fn requirement(id: &str, name: &str, quantity: f64, unit: &str) -> IngredientRequirement {
        IngredientRequirement {
            ingredient_id: id.to_string(),
            ingredient_name: name.to_string(),
            quantity,
            unit: unit.to_string(),
        }
    }

    fn order(order_id: &str, items: &[(&str, &str, u32)]) -> OrderDescriptor {
        OrderDescriptor {
            order_id: order_id.to_string(),
            items: items
                .iter()
                .map(|(id, name, qty)| OrderLine {
                    menu_item_id: id.to_string(),
                    menu_item_name: name.to_string(),
                    quantity: *qty,
                })
                .collect(),
        }
    }

    fn engine_with(
        ledger: Arc<MemoryLedger>,
        catalog: Arc<MemoryRecipeCatalog>,
    ) -> DeductionEngine {
        DeductionEngine::new(ledger, catalog)
    }

    #[tokio::test]
    async fn test_single_item_scenario() {
        // Two garlic breads at 200 gm butter each, butter stocked at 1.1 kg
        let ledger = Arc::new(MemoryLedger::new());
        ledger.insert(stock_item("ing-butter", "Butter", "kg", 1.1));
        let catalog = Arc::new(MemoryRecipeCatalog::new());
        catalog.insert(Recipe {
            menu_item_id: "item-a".to_string(),
            menu_item_name: "Garlic Bread".to_string(),
            ingredients: vec![requirement("ing-butter", "Butter", 200.0, "gm")],
        });

        let engine = engine_with(ledger.clone(), catalog);
        let report = engine
            .deduct_for_order(&order("order-1", &[("item-a", "Garlic Bread", 2)]))
            .await
            .unwrap();

        assert_eq!(report.status, DeductionStatus::Success);
        assert_eq!(report.transactions_logged, 1);
        assert!(report.failed_items.is_empty());

        let item = &report.deducted_items[0];
        assert_eq!(item.ingredient, "Butter");
        assert_eq!(item.deducted, 400.0);
        assert_eq!(item.deducted_unit, "gm");
        assert_eq!(item.deducted_display, "400 gm");
        assert_eq!(item.remaining, 0.7);
        assert_eq!(item.remaining_unit, "kg");
        assert_eq!(item.remaining_display, "700 gm");
        assert_eq!(item.recipe_requested, "400 gm");

        assert_eq!(ledger.item("ing-butter").unwrap().current_stock, 0.7);
    }

    #[tokio::test]
    async fn test_untracked_item_skipped_silently() {
        let ledger = Arc::new(MemoryLedger::new());
        ledger.insert(stock_item("ing-butter", "Butter", "kg", 1.0));
        let catalog = Arc::new(MemoryRecipeCatalog::new());
        catalog.insert(Recipe {
            menu_item_id: "item-a".to_string(),
            menu_item_name: "Garlic Bread".to_string(),
            ingredients: vec![requirement("ing-butter", "Butter", 100.0, "gm")],
        });

        let engine = engine_with(ledger.clone(), catalog);
        let report = engine
            .deduct_for_order(&order(
                "order-1",
                &[("item-untracked", "Coffee", 3), ("item-a", "Garlic Bread", 1)],
            ))
            .await
            .unwrap();

        // The untracked coffee contributes nothing either way
        assert_eq!(report.status, DeductionStatus::Success);
        assert_eq!(report.deducted_items.len(), 1);
        assert!(report.failed_items.is_empty());
    }

    #[tokio::test]
    async fn test_partial_failure_does_not_abort_order() {
        let ledger = Arc::new(MemoryLedger::new());
        ledger.insert(stock_item("ing-butter", "Butter", "kg", 1.1));
        ledger.insert(stock_item("ing-eggs", "Eggs", "pieces", 3.0));
        ledger.insert(stock_item("ing-milk", "Milk", "ltr", 5.0));
        let catalog = Arc::new(MemoryRecipeCatalog::new());
        catalog.insert(Recipe {
            menu_item_id: "item-cake".to_string(),
            menu_item_name: "Cake".to_string(),
            ingredients: vec![
                requirement("ing-butter", "Butter", 200.0, "gm"),
                // Needs 12, only 3 on hand
                requirement("ing-eggs", "Eggs", 6.0, "pieces"),
                // Recipe family disagrees with the ltr stock
                requirement("ing-milk", "Milk", 100.0, "gm"),
                requirement("ing-vanilla", "Vanilla", 5.0, "ml"),
            ],
        });

        let engine = engine_with(ledger.clone(), catalog);
        let report = engine
            .deduct_for_order(&order("order-2", &[("item-cake", "Cake", 2)]))
            .await
            .unwrap();

        assert_eq!(report.status, DeductionStatus::PartialSuccess);
        assert_eq!(report.deducted_items.len(), 1);
        assert_eq!(report.transactions_logged, 1);
        assert_eq!(report.failed_items.len(), 3);
        assert!(
            report.failed_items[0]
                .contains("Eggs: Insufficient stock (need 12 pieces, have 3 pieces)"),
            "{:?}",
            report.failed_items
        );
        assert!(report.failed_items[1].contains("Milk: Unit mismatch"));
        assert!(report.failed_items[2].contains("Vanilla: Not found in inventory"));

        // The butter deduction before the failures still happened
        assert_eq!(ledger.item("ing-butter").unwrap().current_stock, 0.7);
        // Failed ingredients kept their stock
        assert_eq!(ledger.item("ing-eggs").unwrap().current_stock, 3.0);
        assert_eq!(ledger.item("ing-milk").unwrap().current_stock, 5.0);
    }

    #[tokio::test]
    async fn test_invalid_descriptor_rejected() {
        let engine = engine_with(
            Arc::new(MemoryLedger::new()),
            Arc::new(MemoryRecipeCatalog::new()),
        );

        let err = engine
            .deduct_for_order(&order("", &[("item-a", "Garlic Bread", 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidOrder(_)));

        let err = engine
            .deduct_for_order(&order("order-1", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidOrder(_)));

        let err = engine
            .deduct_for_order(&order("order-1", &[("item-a", "Garlic Bread", 0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidOrder(_)));
    }

    #[tokio::test]
    async fn test_repeated_order_is_skipped() {
        let ledger = Arc::new(MemoryLedger::new());
        ledger.insert(stock_item("ing-butter", "Butter", "kg", 1.0));
        let catalog = Arc::new(MemoryRecipeCatalog::new());
        catalog.insert(Recipe {
            menu_item_id: "item-a".to_string(),
            menu_item_name: "Garlic Bread".to_string(),
            ingredients: vec![requirement("ing-butter", "Butter", 100.0, "gm")],
        });

        let engine = engine_with(ledger.clone(), catalog);
        let descriptor = order("order-1", &[("item-a", "Garlic Bread", 1)]);

        let first = engine.deduct_for_order(&descriptor).await.unwrap();
        assert_eq!(first.transactions_logged, 1);

        let second = engine.deduct_for_order(&descriptor).await.unwrap();
        assert_eq!(second.transactions_logged, 0);
        assert!(second.deducted_items.is_empty());
        assert_eq!(ledger.item("ing-butter").unwrap().current_stock, 0.9);
    }

    /// Ledger double whose every operation fails like a backend outage
    struct FailingLedger;

    #[async_trait]
    impl crate::inventory::ledger::StockLedger for FailingLedger {
        async fn get(&self, _: &str) -> LedgerResult<StockItem> {
            Err(StorageError::Unavailable("connection timed out".into()).into())
        }
        async fn compare_and_deduct(
            &self,
            _: crate::inventory::ledger::DeductionRequest,
        ) -> LedgerResult<AppliedDeduction> {
            Err(StorageError::Unavailable("connection timed out".into()).into())
        }
        async fn record_transaction(&self, _: StockTransaction) -> LedgerResult<()> {
            Err(StorageError::Unavailable("connection timed out".into()).into())
        }
        async fn is_order_processed(&self, _: &str) -> LedgerResult<bool> {
            Err(StorageError::Unavailable("connection timed out".into()).into())
        }
        async fn mark_order_processed(&self, _: &str) -> LedgerResult<()> {
            Err(StorageError::Unavailable("connection timed out".into()).into())
        }
    }

    #[tokio::test]
    async fn test_storage_outage_reported_not_raised() {
        let catalog = Arc::new(MemoryRecipeCatalog::new());
        catalog.insert(Recipe {
            menu_item_id: "item-a".to_string(),
            menu_item_name: "Garlic Bread".to_string(),
            ingredients: vec![requirement("ing-butter", "Butter", 100.0, "gm")],
        });

        let engine = DeductionEngine::new(Arc::new(FailingLedger), catalog);
        let report = engine
            .deduct_for_order(&order("order-1", &[("item-a", "Garlic Bread", 1)]))
            .await
            .unwrap();

        assert_eq!(report.status, DeductionStatus::PartialSuccess);
        assert_eq!(report.transactions_logged, 0);
        assert_eq!(report.failed_items.len(), 1);
        assert!(report.failed_items[0].starts_with("Butter:"));
    }

    #[tokio::test]
    async fn test_report_serializes_snake_case_status() {
        let ledger = Arc::new(MemoryLedger::new());
        let catalog = Arc::new(MemoryRecipeCatalog::new());
        catalog.insert(Recipe {
            menu_item_id: "item-a".to_string(),
            menu_item_name: "Garlic Bread".to_string(),
            ingredients: vec![requirement("ing-missing", "Butter", 100.0, "gm")],
        });

        let engine = engine_with(ledger, catalog);
        let report = engine
            .deduct_for_order(&order("order-1", &[("item-a", "Garlic Bread", 1)]))
            .await
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "partial_success");
        assert_eq!(json["transactions_logged"], 0);
    }
}
