//! Read-only access to the calculation log
//!
//! Reports load everything they need through `LedgerStore` up front and
//! aggregate in memory. The store never writes.

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{DateWindow, IntakeHeader, IntakeSheet, PackingTypeDef, StockRecord};

use crate::error::AppResult;

mod memory;
mod postgres;

pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

/// Filters pushed down to the store to keep the loaded set small.
///
/// The engine applies its own scope filter afterwards, so a store may
/// return more than asked for but never less.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Latest production date to load
    pub cutoff: Option<NaiveDate>,
    pub supplier_id: Option<i32>,
    pub packing_master_id: Option<i32>,
}

impl RecordQuery {
    pub fn up_to(cutoff: Option<NaiveDate>) -> Self {
        Self {
            cutoff,
            ..Self::default()
        }
    }

    pub fn with_supplier(mut self, supplier_id: Option<i32>) -> Self {
        self.supplier_id = supplier_id;
        self
    }

    pub fn with_packing_master(mut self, packing_master_id: Option<i32>) -> Self {
        self.packing_master_id = packing_master_id;
        self
    }

    /// Whether a record satisfies every pushed-down filter
    pub fn matches(&self, record: &StockRecord) -> bool {
        self.cutoff
            .map_or(true, |cutoff| record.calculation.production_date <= cutoff)
            && self
                .supplier_id
                .map_or(true, |id| record.supplier_id == Some(id))
            && self
                .packing_master_id
                .map_or(true, |id| record.calculation.packing_master_id == id)
    }
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Slab-size definitions, for one packing master or the whole catalog
    async fn packing_types(&self, packing_master_id: Option<i32>) -> AppResult<Vec<PackingTypeDef>>;

    /// Joined calculation records matching `query`
    async fn stock_records(&self, query: &RecordQuery) -> AppResult<Vec<StockRecord>>;

    /// Active intake headers dated inside `window`, oldest first
    async fn intake_headers(&self, window: DateWindow) -> AppResult<Vec<IntakeHeader>>;

    /// One intake with its product lines and active calculation rows; `None` if unknown
    async fn intake_sheet(&self, header_id: i32) -> AppResult<Option<IntakeSheet>>;

    /// Connectivity check
    async fn ping(&self) -> AppResult<()>;
}
