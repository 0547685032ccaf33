//! Engine configuration
//!
//! All settings can be overridden through environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | PANTRY_WORK_DIR | /var/lib/pantry | Data directory for the stock database |
//! | PANTRY_ACTOR | system | Actor recorded on engine-written transactions |
//! | PANTRY_CRITICAL_RATIO | 0.5 | stock ≤ reorder × ratio counts as critical |
//! | PANTRY_TXN_QUERY_CAP | 500 | Hard cap on transaction query limits |

use std::path::PathBuf;

/// Inventory engine configuration
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Directory holding the stock database file
    pub work_dir: String,
    /// Actor recorded on system-generated transactions
    pub default_actor: String,
    /// Low-stock urgency threshold as a fraction of the reorder level
    pub low_stock_critical_ratio: f64,
    /// Maximum rows a transaction query may return
    pub transaction_query_cap: usize,
}

impl InventoryConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            work_dir: std::env::var("PANTRY_WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/pantry".into()),
            default_actor: std::env::var("PANTRY_ACTOR").unwrap_or_else(|_| "system".into()),
            low_stock_critical_ratio: std::env::var("PANTRY_CRITICAL_RATIO")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.5),
            transaction_query_cap: std::env::var("PANTRY_TXN_QUERY_CAP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
        }
    }

    /// Path of the stock database file inside `work_dir`
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("stock.redb")
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            work_dir: "/var/lib/pantry".into(),
            default_actor: "system".into(),
            low_stock_critical_ratio: 0.5,
            transaction_query_cap: 500,
        }
    }
}
