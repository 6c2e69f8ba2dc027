//! Stock report service
//!
//! Loads records and packing metadata from the store once per request and
//! runs them through the shared aggregation engine.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use shared::{
    CalculationMode, DateWindow, PackingCatalog, RegisterType, ScopeFilter, StockEngine,
    StockGroupView, StockSummaryLine,
};

use super::export::{build_workbook, Workbook};
use crate::config::ReportConfig;
use crate::error::AppResult;
use crate::store::{LedgerStore, RecordQuery};

/// Drill-down request for one product or virtual category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemDetailRequest {
    pub item_id: i32,
    pub reference_date: NaiveDate,
    pub supplier_id: Option<i32>,
    pub calculation_mode: Option<CalculationMode>,
    pub packing_master_id: Option<i32>,
}

impl ItemDetailRequest {
    pub fn new(item_id: i32, reference_date: NaiveDate) -> Self {
        Self {
            item_id,
            reference_date,
            supplier_id: None,
            calculation_mode: None,
            packing_master_id: None,
        }
    }

    fn scope(&self) -> ScopeFilter {
        ScopeFilter::product(self.item_id)
            .with_supplier(self.supplier_id)
            .with_calculation_mode(self.calculation_mode)
            .with_packing_master(self.packing_master_id)
    }
}

#[derive(Clone)]
pub struct StockService {
    store: Arc<dyn LedgerStore>,
    report: ReportConfig,
}

impl StockService {
    pub fn new(store: Arc<dyn LedgerStore>, report: ReportConfig) -> Self {
        Self { store, report }
    }

    /// Resolve packing layouts once for this request
    async fn engine(&self, packing_master_id: Option<i32>) -> AppResult<StockEngine> {
        let definitions = self.store.packing_types(packing_master_id).await?;
        let catalog = PackingCatalog::resolve(definitions);
        tracing::debug!(packing_masters = catalog.len(), "Resolved packing catalog");
        Ok(StockEngine::new(catalog))
    }

    /// Scope of the summary views: intake register only
    fn summary_scope(&self) -> ScopeFilter {
        ScopeFilter::overall()
            .with_register_type(RegisterType::from_id(self.report.intake_register_id))
    }

    pub async fn overall_summary(&self, as_on: NaiveDate) -> AppResult<Vec<StockSummaryLine>> {
        let engine = self.engine(None).await?;
        let records = self
            .store
            .stock_records(&RecordQuery::up_to(Some(as_on)))
            .await?;

        Ok(engine.summary(&records, &self.summary_scope(), as_on))
    }

    pub async fn supplier_summary(
        &self,
        supplier_id: i32,
        as_on: NaiveDate,
    ) -> AppResult<Vec<StockSummaryLine>> {
        let engine = self.engine(None).await?;
        let query = RecordQuery::up_to(Some(as_on)).with_supplier(Some(supplier_id));
        let records = self.store.stock_records(&query).await?;

        let scope = self.summary_scope().with_supplier(Some(supplier_id));
        Ok(engine.summary(&records, &scope, as_on))
    }

    pub async fn item_detail(&self, request: &ItemDetailRequest) -> AppResult<Vec<StockGroupView>> {
        let engine = self.engine(request.packing_master_id).await?;
        let query = RecordQuery::up_to(Some(request.reference_date))
            .with_supplier(request.supplier_id)
            .with_packing_master(request.packing_master_id);
        let records = self.store.stock_records(&query).await?;

        Ok(engine.item_detail(&records, &request.scope(), request.reference_date))
    }

    /// Apply the configured lookback when only the end of the window is given
    pub fn resolve_window(&self, window: DateWindow) -> DateWindow {
        match (window.from, window.to, self.report.default_lookback_days) {
            (None, Some(to), Some(days)) => {
                DateWindow::new(to.checked_sub_days(Days::new(u64::from(days))), Some(to))
            }
            _ => window,
        }
    }

    pub async fn period_report(&self, window: DateWindow) -> AppResult<Vec<StockGroupView>> {
        let window = self.resolve_window(window);
        let engine = self.engine(None).await?;
        let records = self.store.stock_records(&RecordQuery::up_to(window.to)).await?;

        Ok(engine.period_report(&records, &ScopeFilter::unfiltered(), window))
    }

    /// Period report arranged as a workbook titled with the window end (or `today`)
    pub async fn period_workbook(&self, window: DateWindow, today: NaiveDate) -> AppResult<Workbook> {
        let as_on = window.to.unwrap_or(today);
        let groups = self.period_report(window).await?;
        Ok(build_workbook(&groups, as_on))
    }
}
