//! Raw material intake handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use shared::{IntakeHeader, IntakeOverview, ReportEnvelope};

use super::stock::{envelope, PeriodQuery};
use crate::services::IntakeService;
use crate::AppState;

/// Intakes received between `fromDate` and `toDate`
pub async fn get_intake_list(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Json<ReportEnvelope<IntakeHeader>> {
    let window = query.window();
    let result = IntakeService::new(state.store.clone())
        .intake_list(window)
        .await;
    envelope(result, window.to)
}

/// Production drawn from one intake; the overview is the single data item
pub async fn get_intake_overview(
    State(state): State<AppState>,
    Path(intake_id): Path<i32>,
) -> Json<ReportEnvelope<IntakeOverview>> {
    let result = IntakeService::new(state.store.clone())
        .intake_overview(intake_id)
        .await
        .map(|overview| vec![overview]);
    envelope(result, None)
}
