//! Ledger store backed by an in-memory snapshot

use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use shared::{DateWindow, IntakeHeader, IntakeSheet, Ledger, PackingTypeDef, StockRecord};

use super::{LedgerStore, RecordQuery};
use crate::error::{AppError, AppResult};

/// Serves reports from a `Ledger` snapshot, joined once at construction
#[derive(Debug, Clone)]
pub struct MemoryLedgerStore {
    ledger: Arc<Ledger>,
    packing_types: Arc<Vec<PackingTypeDef>>,
    records: Arc<Vec<StockRecord>>,
}

impl MemoryLedgerStore {
    pub fn new(ledger: &Ledger) -> AppResult<Self> {
        let records = ledger.records()?;
        tracing::debug!(records = records.len(), "Loaded ledger snapshot");

        Ok(Self {
            ledger: Arc::new(ledger.clone()),
            packing_types: Arc::new(ledger.packing_types_for(None)),
            records: Arc::new(records),
        })
    }

    /// Load a JSON-serialized `Ledger`
    pub async fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::StoreUnavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let ledger: Ledger = serde_json::from_str(&raw).map_err(|e| {
            AppError::StoreUnavailable(format!("invalid snapshot {}: {}", path.display(), e))
        })?;
        Self::new(&ledger)
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn packing_types(&self, packing_master_id: Option<i32>) -> AppResult<Vec<PackingTypeDef>> {
        Ok(self
            .packing_types
            .iter()
            .filter(|def| packing_master_id.map_or(true, |id| def.packing_master_id == id))
            .cloned()
            .collect())
    }

    async fn stock_records(&self, query: &RecordQuery) -> AppResult<Vec<StockRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect())
    }

    async fn intake_headers(&self, window: DateWindow) -> AppResult<Vec<IntakeHeader>> {
        Ok(self.ledger.intake_headers(window))
    }

    async fn intake_sheet(&self, header_id: i32) -> AppResult<Option<IntakeSheet>> {
        Ok(self.ledger.intake_sheet(header_id)?)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
