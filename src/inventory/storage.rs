//! redb-based stock storage
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `stock_items` | `item_id` | `StockItem` | Current stock state |
//! | `stock_transactions` | `(item_id, sequence)` | `StockTransaction` | Append-only ledger |
//! | `processed_orders` | `order_id` | `()` | Per-order idempotency |
//! | `sequence_counter` | `()` | `u64` | Global transaction sequence |
//!
//! # Durability and atomicity
//!
//! redb commits are durable as soon as `commit()` returns (copy-on-write
//! with atomic pointer swap), and write transactions are single-writer.
//! `compare_and_deduct` therefore runs its read-check-write-append cycle
//! inside one write transaction: two concurrent deductions against the
//! same ingredient serialize, and stock can never be double-spent or go
//! negative. A failed check drops the transaction without committing,
//! leaving stock untouched.

use crate::core::InventoryConfig;
use crate::db::models::{
    DashboardStats, ItemFilter, ItemStatus, LowStockAlert, LowStockReport, StockItem,
    StockItemCreate, StockItemUpdate, StockItemView, StockTransaction, TransactionQuery,
    TransactionType, Urgency,
};
use crate::inventory::ledger::{
    AppliedDeduction, DeductionRequest, LedgerError, LedgerResult, StockLedger,
};
use crate::inventory::units;
use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Stock state: key = item_id, value = JSON-serialized StockItem
const ITEMS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("stock_items");

/// Append-only ledger: key = (item_id, sequence), value = JSON-serialized StockTransaction
const TRANSACTIONS_TABLE: TableDefinition<(&str, u64), &[u8]> =
    TableDefinition::new("stock_transactions");

/// Orders whose deduction already ran: key = order_id, value = empty
const PROCESSED_ORDERS_TABLE: TableDefinition<&str, ()> = TableDefinition::new("processed_orders");

/// Sequence counter: key = "seq", value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const SEQUENCE_KEY: &str = "seq";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[inline]
fn require_finite(value: f64, field_name: &str) -> LedgerResult<()> {
    if !value.is_finite() {
        return Err(LedgerError::Validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

#[inline]
fn require_non_negative(value: f64, field_name: &str) -> LedgerResult<()> {
    require_finite(value, field_name)?;
    if value < 0.0 {
        return Err(LedgerError::Validation(format!(
            "{} must be non-negative, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Stock storage backed by redb
#[derive(Clone)]
pub struct StockStorage {
    db: Arc<Database>,
    /// stock ≤ reorder × ratio classifies as critical
    critical_ratio: f64,
    /// Hard cap on transaction query limits
    query_cap: usize,
    /// Actor recorded on system-generated transactions
    default_actor: String,
}

impl StockStorage {
    /// Open or create the database at the given path with default settings
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::open_with_config(path, &InventoryConfig::default())
    }

    /// Open or create the database at the given path
    pub fn open_with_config(path: impl AsRef<Path>, config: &InventoryConfig) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::initialize(db, config)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::initialize(db, &InventoryConfig::default())
    }

    fn initialize(db: Database, config: &InventoryConfig) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ITEMS_TABLE)?;
            let _ = write_txn.open_table(TRANSACTIONS_TABLE)?;
            let _ = write_txn.open_table(PROCESSED_ORDERS_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(SEQUENCE_KEY)?.is_none() {
                seq_table.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self {
            db: Arc::new(db),
            critical_ratio: config.low_stock_critical_ratio,
            query_cap: config.transaction_query_cap,
            default_actor: config.default_actor.clone(),
        })
    }

    // ========== Transaction-scoped primitives ==========

    fn get_item_txn(&self, txn: &WriteTransaction, id: &str) -> StorageResult<Option<StockItem>> {
        let table = txn.open_table(ITEMS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn put_item_txn(&self, txn: &WriteTransaction, item: &StockItem) -> StorageResult<()> {
        let mut table = txn.open_table(ITEMS_TABLE)?;
        let value = serde_json::to_vec(item)?;
        table.insert(item.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Increment and return the global transaction sequence
    fn increment_sequence(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table.get(SEQUENCE_KEY)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(SEQUENCE_KEY, next)?;
        Ok(next)
    }

    fn append_transaction_txn(
        &self,
        txn: &WriteTransaction,
        sequence: u64,
        entry: &StockTransaction,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(TRANSACTIONS_TABLE)?;
        let key = (entry.item_id.as_str(), sequence);
        let value = serde_json::to_vec(entry)?;
        table.insert(key, value.as_slice())?;
        Ok(())
    }

    // ========== Item CRUD ==========

    /// Create a new stock item
    ///
    /// Names are unique case-insensitively within the active set; the
    /// initial stock is rounded to 2 decimals before persisting.
    pub fn create_item(&self, data: StockItemCreate) -> LedgerResult<StockItem> {
        if data.name.trim().is_empty() {
            return Err(LedgerError::Validation("name cannot be empty".into()));
        }
        if data.unit.trim().is_empty() {
            return Err(LedgerError::Validation("unit cannot be empty".into()));
        }
        let current_stock = data.current_stock.unwrap_or(0.0);
        let reorder_level = data.reorder_level.unwrap_or(0.0);
        let unit_cost = data.unit_cost.unwrap_or(0.0);
        require_non_negative(current_stock, "current_stock")?;
        require_non_negative(reorder_level, "reorder_level")?;
        require_non_negative(unit_cost, "unit_cost")?;

        let name = data.name.trim().to_string();
        let now = now_millis();
        let item = StockItem {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            category: data.category.unwrap_or_default(),
            unit: data.unit.trim().to_string(),
            current_stock: units::round_quantity(current_stock),
            reorder_level: units::round_quantity(reorder_level),
            unit_cost,
            supplier: data.supplier,
            supplier_contact: data.supplier_contact,
            status: ItemStatus::Active,
            created_at: now,
            last_updated: now,
        };

        // Uniqueness check and insert share the write transaction, so two
        // concurrent creates cannot both claim the same name
        let txn = self.db.begin_write().map_err(StorageError::from)?;
        {
            let mut table = txn.open_table(ITEMS_TABLE).map_err(StorageError::from)?;
            for result in table.iter().map_err(StorageError::from)? {
                let (_key, value) = result.map_err(StorageError::from)?;
                let existing: StockItem =
                    serde_json::from_slice(value.value()).map_err(StorageError::from)?;
                if existing.status.is_active() && existing.name.eq_ignore_ascii_case(&item.name) {
                    return Err(LedgerError::Duplicate(format!(
                        "stock item '{}' already exists",
                        existing.name
                    )));
                }
            }
            let value = serde_json::to_vec(&item).map_err(StorageError::from)?;
            table
                .insert(item.id.as_str(), value.as_slice())
                .map_err(StorageError::from)?;
        }
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(item = %item.name, unit = %item.unit, "Created stock item");
        Ok(item)
    }

    /// Find one item by id, regardless of lifecycle status
    pub fn find_item(&self, id: &str) -> LedgerResult<Option<StockItem>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn
            .open_table(ITEMS_TABLE)
            .map_err(StorageError::from)?;
        match table.get(id).map_err(StorageError::from)? {
            Some(value) => {
                let item = serde_json::from_slice(value.value()).map_err(StorageError::from)?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    fn scan_items(&self) -> LedgerResult<Vec<StockItem>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn
            .open_table(ITEMS_TABLE)
            .map_err(StorageError::from)?;
        let mut items = Vec::new();
        for result in table.iter().map_err(StorageError::from)? {
            let (_key, value) = result.map_err(StorageError::from)?;
            let item: StockItem =
                serde_json::from_slice(value.value()).map_err(StorageError::from)?;
            items.push(item);
        }
        Ok(items)
    }

    /// List items with display fields resolved
    pub fn find_items(&self, filter: &ItemFilter) -> LedgerResult<Vec<StockItemView>> {
        let mut items: Vec<StockItem> = self
            .scan_items()?
            .into_iter()
            .filter(|item| filter.status.is_none_or(|s| item.status == s))
            .filter(|item| {
                filter
                    .category
                    .as_deref()
                    .is_none_or(|c| item.category.eq_ignore_ascii_case(c))
            })
            .filter(|item| !filter.low_stock_only || item.current_stock <= item.reorder_level)
            .collect();
        items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(items.into_iter().map(item_view).collect())
    }

    /// Partial update; a stock change through this path is logged as a
    /// manual adjustment
    pub fn update_item(&self, id: &str, data: StockItemUpdate) -> LedgerResult<StockItem> {
        if let Some(stock) = data.current_stock {
            require_non_negative(stock, "current_stock")?;
        }
        if let Some(level) = data.reorder_level {
            require_non_negative(level, "reorder_level")?;
        }
        if let Some(cost) = data.unit_cost {
            require_non_negative(cost, "unit_cost")?;
        }

        let txn = self.db.begin_write().map_err(StorageError::from)?;
        let mut item = self
            .get_item_txn(&txn, id)?
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;

        let previous_stock = item.current_stock;
        if let Some(name) = data.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = data.category {
            item.category = category;
        }
        if let Some(unit) = data.unit {
            item.unit = unit.trim().to_string();
        }
        if let Some(stock) = data.current_stock {
            item.current_stock = units::round_quantity(stock);
        }
        if let Some(level) = data.reorder_level {
            item.reorder_level = units::round_quantity(level);
        }
        if let Some(cost) = data.unit_cost {
            item.unit_cost = cost;
        }
        if let Some(supplier) = data.supplier {
            item.supplier = Some(supplier);
        }
        if let Some(contact) = data.supplier_contact {
            item.supplier_contact = Some(contact);
        }
        if let Some(status) = data.status {
            item.status = status;
        }
        item.last_updated = now_millis();

        self.put_item_txn(&txn, &item)?;
        if !units::quantity_eq(previous_stock, item.current_stock) {
            let entry = adjustment_entry(&item, previous_stock, &self.default_actor);
            let seq = self.increment_sequence(&txn)?;
            self.append_transaction_txn(&txn, seq, &entry)?;
        }
        txn.commit().map_err(StorageError::from)?;

        Ok(item)
    }

    /// Soft delete: flips the status to inactive, preserving the item and
    /// its transaction history
    pub fn delete_item(&self, id: &str) -> LedgerResult<bool> {
        let txn = self.db.begin_write().map_err(StorageError::from)?;
        let Some(mut item) = self.get_item_txn(&txn, id)? else {
            return Ok(false);
        };
        item.status = ItemStatus::Inactive;
        item.last_updated = now_millis();
        self.put_item_txn(&txn, &item)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(item = %item.name, "Soft-deleted stock item");
        Ok(true)
    }

    /// Set an item's stock level directly, logging the adjustment
    pub fn adjust_stock(&self, id: &str, new_quantity: f64, actor: &str) -> LedgerResult<StockItem> {
        require_non_negative(new_quantity, "new_quantity")?;

        let txn = self.db.begin_write().map_err(StorageError::from)?;
        let mut item = self
            .get_item_txn(&txn, id)?
            .filter(|i| i.status.is_active())
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;

        let previous_stock = item.current_stock;
        item.current_stock = units::round_quantity(new_quantity);
        item.last_updated = now_millis();

        self.put_item_txn(&txn, &item)?;
        let entry = adjustment_entry(&item, previous_stock, actor);
        let seq = self.increment_sequence(&txn)?;
        self.append_transaction_txn(&txn, seq, &entry)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            item = %item.name,
            previous = previous_stock,
            new = item.current_stock,
            actor = %actor,
            "Manual stock adjustment"
        );
        Ok(item)
    }

    // ========== Reports ==========

    /// Active items at or below their reorder level
    pub fn low_stock_alerts(&self) -> LedgerResult<LowStockReport> {
        let mut alerts = Vec::new();
        let mut critical_count = 0;

        for item in self.scan_items()? {
            if !item.status.is_active() || item.current_stock > item.reorder_level {
                continue;
            }
            let urgency = if item.current_stock <= item.reorder_level * self.critical_ratio {
                critical_count += 1;
                Urgency::Critical
            } else {
                Urgency::Warning
            };
            let needed = units::round_quantity((item.reorder_level - item.current_stock).max(0.0));
            alerts.push(LowStockAlert {
                id: item.id,
                name: item.name,
                category: item.category,
                current_stock: item.current_stock,
                current_stock_display: units::format_quantity(item.current_stock, &item.unit),
                reorder_level: item.reorder_level,
                unit: item.unit,
                urgency,
                needed,
                supplier: item.supplier,
                supplier_contact: item.supplier_contact,
            });
        }

        Ok(LowStockReport {
            count: alerts.len(),
            critical_count,
            low_stock_items: alerts,
        })
    }

    /// Transaction history, newest first
    pub fn find_transactions(
        &self,
        query: &TransactionQuery,
    ) -> LedgerResult<Vec<StockTransaction>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn
            .open_table(TRANSACTIONS_TABLE)
            .map_err(StorageError::from)?;

        let name_needle = query.item_name.as_ref().map(|n| n.to_lowercase());
        let mut matches = Vec::new();
        for result in table.iter().map_err(StorageError::from)? {
            let (_key, value) = result.map_err(StorageError::from)?;
            let entry: StockTransaction =
                serde_json::from_slice(value.value()).map_err(StorageError::from)?;
            if let Some(order_id) = &query.order_id
                && entry.order_id.as_deref() != Some(order_id.as_str())
            {
                continue;
            }
            if let Some(needle) = &name_needle
                && !entry.item_name.to_lowercase().contains(needle)
            {
                continue;
            }
            matches.push(entry);
        }

        matches.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        matches.truncate(query.limit.min(self.query_cap));
        Ok(matches)
    }

    /// Aggregate dashboard figures over the active set
    pub fn dashboard_stats(&self) -> LedgerResult<DashboardStats> {
        let mut total_items = 0;
        let mut low_stock_items = 0;
        let mut total_value = rust_decimal::Decimal::ZERO;

        for item in self.scan_items()? {
            if !item.status.is_active() {
                continue;
            }
            total_items += 1;
            if item.current_stock <= item.reorder_level {
                low_stock_items += 1;
            }
            total_value += units::to_decimal(item.current_stock) * units::to_decimal(item.unit_cost);
        }

        let cutoff = now_millis() - 24 * 60 * 60 * 1000;
        let mut recent_transactions = 0;
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn
            .open_table(TRANSACTIONS_TABLE)
            .map_err(StorageError::from)?;
        for result in table.iter().map_err(StorageError::from)? {
            let (_key, value) = result.map_err(StorageError::from)?;
            let entry: StockTransaction =
                serde_json::from_slice(value.value()).map_err(StorageError::from)?;
            if entry.transaction_date >= cutoff {
                recent_transactions += 1;
            }
        }

        Ok(DashboardStats {
            total_items,
            low_stock_items,
            total_inventory_value: units::to_f64(total_value),
            recent_transactions,
        })
    }

    /// All transactions for one item, oldest first
    pub fn transactions_for_item(&self, item_id: &str) -> LedgerResult<Vec<StockTransaction>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn
            .open_table(TRANSACTIONS_TABLE)
            .map_err(StorageError::from)?;

        let mut entries = Vec::new();
        let range_start = (item_id, 0u64);
        let range_end = (item_id, u64::MAX);
        for result in table.range(range_start..=range_end).map_err(StorageError::from)? {
            let (_key, value) = result.map_err(StorageError::from)?;
            let entry: StockTransaction =
                serde_json::from_slice(value.value()).map_err(StorageError::from)?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Replay an item's transactions and confirm they reproduce its
    /// current stock: each entry's `previous_stock` must equal its
    /// predecessor's `new_stock`, and the last `new_stock` must equal the
    /// stock on record. Hops that change the storage unit are skipped for
    /// continuity (the amounts are not directly comparable).
    pub fn verify_transaction_chain(&self, item_id: &str) -> LedgerResult<bool> {
        let Some(item) = self.find_item(item_id)? else {
            return Err(LedgerError::NotFound(item_id.to_string()));
        };
        let entries = self.transactions_for_item(item_id)?;
        let Some(last) = entries.last() else {
            return Ok(true);
        };

        for pair in entries.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.storage_unit == next.storage_unit
                && !units::quantity_eq(prev.new_stock, next.previous_stock)
            {
                tracing::warn!(
                    item = %item.name,
                    expected = prev.new_stock,
                    recorded = next.previous_stock,
                    "Transaction chain discontinuity"
                );
                return Ok(false);
            }
        }

        if last.storage_unit == item.unit && !units::quantity_eq(last.new_stock, item.current_stock)
        {
            tracing::warn!(
                item = %item.name,
                replayed = last.new_stock,
                current = item.current_stock,
                "Transaction chain does not reproduce current stock"
            );
            return Ok(false);
        }
        Ok(true)
    }
}

/// Build the manual-adjustment ledger entry for a stock change
fn adjustment_entry(item: &StockItem, previous_stock: f64, actor: &str) -> StockTransaction {
    let (previous_base, base_unit) = units::normalize(previous_stock, &item.unit);
    let (new_base, _) = units::normalize(item.current_stock, &item.unit);
    let delta =
        units::to_f64(units::to_decimal(previous_base) - units::to_decimal(new_base));
    StockTransaction {
        id: uuid::Uuid::new_v4().to_string(),
        item_id: item.id.clone(),
        item_name: item.name.clone(),
        transaction_type: TransactionType::ManualAdjustment,
        quantity_deducted: delta,
        unit: base_unit.to_string(),
        previous_stock,
        new_stock: item.current_stock,
        storage_unit: item.unit.clone(),
        order_id: None,
        menu_item: None,
        recipe_quantity: None,
        recipe_unit: None,
        transaction_date: now_millis(),
        created_by: actor.to_string(),
    }
}

fn item_view(item: StockItem) -> StockItemView {
    let inventory_value =
        units::to_f64(units::to_decimal(item.current_stock) * units::to_decimal(item.unit_cost));
    StockItemView {
        current_stock_display: units::format_quantity(item.current_stock, &item.unit),
        inventory_value,
        id: item.id,
        name: item.name,
        category: item.category,
        unit: item.unit,
        current_stock: item.current_stock,
        reorder_level: item.reorder_level,
        unit_cost: item.unit_cost,
        supplier: item.supplier,
        supplier_contact: item.supplier_contact,
        status: item.status,
        last_updated: item.last_updated,
        created_at: item.created_at,
    }
}

#[async_trait]
impl StockLedger for StockStorage {
    async fn get(&self, ingredient_id: &str) -> LedgerResult<StockItem> {
        self.find_item(ingredient_id)?
            .filter(|item| item.status.is_active())
            .ok_or_else(|| LedgerError::NotFound(ingredient_id.to_string()))
    }

    async fn compare_and_deduct(
        &self,
        request: DeductionRequest,
    ) -> LedgerResult<AppliedDeduction> {
        require_finite(request.quantity, "quantity")?;
        if request.quantity < 0.0 {
            return Err(LedgerError::Validation(format!(
                "deduction quantity must be non-negative, got {}",
                request.quantity
            )));
        }

        let txn = self.db.begin_write().map_err(StorageError::from)?;
        let mut item = self
            .get_item_txn(&txn, &request.ingredient_id)?
            .filter(|i| i.status.is_active())
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
        item.last_updated = now_millis();
        self.put_item_txn(&txn, &item)?;

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
            transaction_date: now_millis(),
            created_by: ctx.actor.clone(),
        };
        let seq = self.increment_sequence(&txn)?;
        self.append_transaction_txn(&txn, seq, &entry)?;
        txn.commit().map_err(StorageError::from)?;

        Ok(AppliedDeduction {
            ingredient_id: item.id,
            ingredient_name: item.name,
            deducted: request.quantity,
            base_unit: have_unit,
            previous_stock,
            new_stock: new_storage,
            storage_unit: item.unit,
            transaction_id: entry.id,
        })
    }

    async fn record_transaction(&self, entry: StockTransaction) -> LedgerResult<()> {
        let txn = self.db.begin_write().map_err(StorageError::from)?;
        let seq = self.increment_sequence(&txn)?;
        self.append_transaction_txn(&txn, seq, &entry)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(())
    }

    async fn is_order_processed(&self, order_id: &str) -> LedgerResult<bool> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn
            .open_table(PROCESSED_ORDERS_TABLE)
            .map_err(StorageError::from)?;
        Ok(table.get(order_id).map_err(StorageError::from)?.is_some())
    }

    async fn mark_order_processed(&self, order_id: &str) -> LedgerResult<()> {
        let txn = self.db.begin_write().map_err(StorageError::from)?;
        {
            let mut table = txn
                .open_table(PROCESSED_ORDERS_TABLE)
                .map_err(StorageError::from)?;
            table.insert(order_id, ()).map_err(StorageError::from)?;
        }
        txn.commit().map_err(StorageError::from)?;
        Ok(())
    }
}
