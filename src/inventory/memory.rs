//! In-memory stock ledger
//!
//! Lock-based [`StockLedger`] for tests and embedders that do not want a
//! data directory. The whole check-and-write of a deduction happens
//! under one write lock, giving the same no-double-spend guarantee as
//! the redb backend's single-writer transaction.

use crate::db::models::{StockItem, StockTransaction, TransactionType};
use crate::inventory::ledger::{
    AppliedDeduction, DeductionRequest, LedgerError, LedgerResult, StockLedger,
};
use crate::inventory::units;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct MemoryState {
    items: HashMap<String, StockItem>,
    transactions: Vec<StockTransaction>,
    processed_orders: HashSet<String>,
}

/// Stock ledger held entirely in memory
#[derive(Default)]
pub struct MemoryLedger {
    state: RwLock<MemoryState>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item (test/bootstrap helper)
    pub fn insert(&self, item: StockItem) {
        self.state.write().items.insert(item.id.clone(), item);
    }

    /// Snapshot of one item's current state
    pub fn item(&self, id: &str) -> Option<StockItem> {
        self.state.read().items.get(id).cloned()
    }

    /// Snapshot of the transaction log, oldest first
    pub fn transactions(&self) -> Vec<StockTransaction> {
        self.state.read().transactions.clone()
    }
}

#[async_trait]
impl StockLedger for MemoryLedger {
    async fn get(&self, ingredient_id: &str) -> LedgerResult<StockItem> {
        self.state
            .read()
            .items
            .get(ingredient_id)
            .filter(|item| item.status.is_active())
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(ingredient_id.to_string()))
    }

    async fn compare_and_deduct(
        &self,
        request: DeductionRequest,
    ) -> LedgerResult<AppliedDeduction> {
        let mut state = self.state.write();
        let item = state
            .items
            .get_mut(&request.ingredient_id)
            .filter(|item| item.status.is_active())
            .ok_or_else(|| LedgerError::NotFound(request.ingredient_id.clone()))?;

        let (stock_base, have_unit) = units::normalize(item.current_stock, &item.unit);
        if have_unit != request.unit {
            return Err(LedgerError::UnitMismatch {
                have: have_unit,
                want: request.unit,
            });
        }
        if stock_base < request.quantity {
            return Err(LedgerError::InsufficientStock {
                required: request.quantity,
                available: stock_base,
                unit: have_unit,
            });
        }

        let new_base =
            units::to_f64(units::to_decimal(stock_base) - units::to_decimal(request.quantity));
        let new_storage = units::denormalize(new_base, &have_unit, &item.unit);
        let previous_stock = item.current_stock;
        item.current_stock = new_storage;
        item.last_updated = chrono::Utc::now().timestamp_millis();

        let ctx = &request.context;
        let entry = StockTransaction {
            id: uuid::Uuid::new_v4().to_string(),
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            transaction_type: TransactionType::OrderDeduction,
            quantity_deducted: request.quantity,
            unit: have_unit.to_string(),
            previous_stock,
            new_stock: new_storage,
            storage_unit: item.unit.clone(),
            order_id: Some(ctx.order_id.clone()),
            menu_item: Some(ctx.menu_item.clone()),
            recipe_quantity: Some(ctx.recipe_quantity),
            recipe_unit: Some(ctx.recipe_unit.clone()),
            transaction_date: chrono::Utc::now().timestamp_millis(),
            created_by: ctx.actor.clone(),
        };

        let applied = AppliedDeduction {
            ingredient_id: item.id.clone(),
            ingredient_name: item.name.clone(),
            deducted: request.quantity,
            base_unit: have_unit,
            previous_stock,
            new_stock: new_storage,
            storage_unit: item.unit.clone(),
            transaction_id: entry.id.clone(),
        };
        state.transactions.push(entry);
        Ok(applied)
    }

    async fn record_transaction(&self, entry: StockTransaction) -> LedgerResult<()> {
        self.state.write().transactions.push(entry);
        Ok(())
    }

    async fn is_order_processed(&self, order_id: &str) -> LedgerResult<bool> {
        Ok(self.state.read().processed_orders.contains(order_id))
    }

    async fn mark_order_processed(&self, order_id: &str) -> LedgerResult<()> {
        self.state
            .write()
            .processed_orders
            .insert(order_id.to_string());
        Ok(())
    }
}
