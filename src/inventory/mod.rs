//! Inventory deduction core
//!
//! - **units**: canonical base-unit conversion with controlled rounding
//! - **ledger**: the stock persistence seam and its error taxonomy
//! - **storage**: redb-backed ledger (durable, single-writer atomic)
//! - **memory**: lock-based in-memory ledger
//! - **engine**: per-order deduction orchestration
//! - **report**: structured per-order outcome
//!
//! # Data Flow
//!
//! ```text
//! OrderDescriptor → DeductionEngine → compare_and_deduct → StockLedger
//!        │                 │                                   │
//!   recipe lookup     normalize to                    item write + ledger
//!   (RecipeCatalog)    base units                     append (one commit)
//!        │                 │
//!        └────────→ DeductionReport (success / partial_success)
//! ```

pub mod engine;
pub mod ledger;
pub mod memory;
pub mod report;
pub mod storage;
pub mod units;

pub use engine::{DeductionEngine, EngineError, OrderDescriptor, OrderLine};
pub use ledger::{
    AppliedDeduction, DeductionContext, DeductionRequest, LedgerError, LedgerResult, StockLedger,
};
pub use memory::MemoryLedger;
pub use report::{DeductedItem, DeductionReport, DeductionStatus};
pub use storage::{StockStorage, StorageError, StorageResult};
pub use units::BaseUnit;
