//! Stock report handlers
//!
//! Unparsable dates and filters fall back to their defaults instead of
//! failing the request. Store failures come back as an unsuccessful
//! envelope with no data.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use shared::{
    display_date, parse_optional_date, parse_report_date, CalculationMode, DateWindow,
    ReportEnvelope, StockGroupView, StockSummaryLine,
};

use crate::error::AppResult;
use crate::services::stock::ItemDetailRequest;
use crate::services::StockService;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsOnQuery {
    pub as_on_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailQuery {
    pub as_on_date: Option<String>,
    pub calculation_mode: Option<String>,
    pub packing_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl PeriodQuery {
    pub(crate) fn window(&self) -> DateWindow {
        DateWindow::new(
            parse_optional_date(self.from_date.as_deref()),
            parse_optional_date(self.to_date.as_deref()),
        )
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_id(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|value| value.trim().parse().ok())
}

/// Wrap a service result; errors are logged here and never reach the client as a status code
pub(crate) fn envelope<T>(result: AppResult<Vec<T>>, reference: Option<NaiveDate>) -> Json<ReportEnvelope<T>> {
    let envelope = match result {
        Ok(data) => ReportEnvelope::ok(data),
        Err(err) => {
            tracing::error!(code = err.code(), "Report request failed: {}", err);
            ReportEnvelope::failed(err.public_message())
        }
    };

    Json(match reference {
        Some(date) => envelope.with_reference_date(display_date(date)),
        None => envelope,
    })
}

fn stock_service(state: &AppState) -> StockService {
    StockService::new(state.store.clone(), state.config.report.clone())
}

/// Overall stock summary as on a date
pub async fn get_stock_summary(
    State(state): State<AppState>,
    Query(query): Query<AsOnQuery>,
) -> Json<ReportEnvelope<StockSummaryLine>> {
    let as_on = parse_report_date(query.as_on_date.as_deref(), today());
    let result = stock_service(&state).overall_summary(as_on).await;
    envelope(result, Some(as_on))
}

/// Stock received from one supplier
pub async fn get_supplier_summary(
    State(state): State<AppState>,
    Path(supplier_id): Path<i32>,
    Query(query): Query<AsOnQuery>,
) -> Json<ReportEnvelope<StockSummaryLine>> {
    let as_on = parse_report_date(query.as_on_date.as_deref(), today());
    let result = stock_service(&state)
        .supplier_summary(supplier_id, as_on)
        .await;
    envelope(result, Some(as_on))
}

/// Drill-down into one product, or `-1`/`-2` for Broken/Others
pub async fn get_item_detail(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
    Query(query): Query<ItemDetailQuery>,
) -> Json<ReportEnvelope<StockGroupView>> {
    let reference = parse_report_date(query.as_on_date.as_deref(), today());
    let request = ItemDetailRequest {
        calculation_mode: parse_id(query.calculation_mode.as_deref()).map(CalculationMode::from_code),
        packing_master_id: parse_id(query.packing_id.as_deref()),
        ..ItemDetailRequest::new(item_id, reference)
    };

    let result = stock_service(&state).item_detail(&request).await;
    envelope(result, Some(reference))
}

/// Drill-down into one product, narrowed to one supplier
pub async fn get_supplier_item_detail(
    State(state): State<AppState>,
    Path((supplier_id, item_id)): Path<(i32, i32)>,
    Query(query): Query<AsOnQuery>,
) -> Json<ReportEnvelope<StockGroupView>> {
    let reference = parse_report_date(query.as_on_date.as_deref(), today());
    let request = ItemDetailRequest {
        supplier_id: Some(supplier_id),
        ..ItemDetailRequest::new(item_id, reference)
    };

    let result = stock_service(&state).item_detail(&request).await;
    envelope(result, Some(reference))
}

/// Opening/production/total report over a date window
pub async fn get_period_report(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Json<ReportEnvelope<StockGroupView>> {
    let window = query.window();
    let result = stock_service(&state).period_report(window).await;
    envelope(result, window.to)
}

/// Period report workbook as CSV
pub async fn export_period_report(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<impl IntoResponse> {
    let today = today();
    let window = query.window();
    let workbook = stock_service(&state).period_workbook(window, today).await?;
    let csv = workbook.to_csv()?;

    let filename = format!(
        "attachment; filename=\"StockViewReport_{}.csv\"",
        window.to.unwrap_or(today).format("%Y%m%d")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        csv,
    ))
}
