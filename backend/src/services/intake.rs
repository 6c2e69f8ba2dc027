//! Raw material intake service

use std::sync::Arc;

use shared::{intake_overview, DateWindow, IntakeHeader, IntakeOverview};

use crate::error::{AppError, AppResult};
use crate::store::LedgerStore;

#[derive(Clone)]
pub struct IntakeService {
    store: Arc<dyn LedgerStore>,
}

impl IntakeService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    pub async fn intake_list(&self, window: DateWindow) -> AppResult<Vec<IntakeHeader>> {
        self.store.intake_headers(window).await
    }

    /// Production drawn from one intake against its declared weight
    pub async fn intake_overview(&self, header_id: i32) -> AppResult<IntakeOverview> {
        let sheet = self
            .store
            .intake_sheet(header_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Intake {}", header_id)))?;

        Ok(intake_overview(sheet))
    }
}
