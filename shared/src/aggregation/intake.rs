//! Production drawn from one raw material intake

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::dedup::select_representatives;
use crate::models::{CalculationRecord, IntakeOverview, IntakeProductionRow, IntakeSheet};

#[derive(Default)]
struct DayTotals {
    kgs: Decimal,
    counts: Decimal,
    factory_kgs: Decimal,
}

/// Per-day, per-detail-line production with a running balance from `client_weight`.
///
/// Weights and counts are copied onto every slab row of a pair, so each day is
/// reduced to one representative row per pair before summing.
pub fn production_rows(
    client_weight: Decimal,
    calculations: &[CalculationRecord],
) -> Vec<IntakeProductionRow> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&CalculationRecord>> = BTreeMap::new();
    for calc in calculations.iter().filter(|calc| calc.active) {
        by_day.entry(calc.production_date).or_default().push(calc);
    }

    let mut balance = client_weight;
    let mut rows = Vec::new();
    for (production_date, day) in by_day {
        let mut per_line: BTreeMap<i32, DayTotals> = BTreeMap::new();
        for calc in select_representatives(day.iter().copied()) {
            let totals = per_line.entry(calc.detail_line_id).or_default();
            totals.kgs += calc.unit_weight;
            totals.counts += calc.yield_counts;
            totals.factory_kgs += calc.factory_weight;
        }

        for (detail_line_id, totals) in per_line {
            balance -= totals.factory_kgs;
            rows.push(IntakeProductionRow {
                production_date,
                detail_line_id,
                total_kgs: totals.kgs,
                total_counts: totals.counts,
                factory_kgs: totals.factory_kgs,
                balance,
            });
        }
    }

    rows
}

pub fn intake_overview(sheet: IntakeSheet) -> IntakeOverview {
    let production = production_rows(sheet.header.client_weight, &sheet.calculations);
    debug!(
        intake = sheet.header.id,
        rows = production.len(),
        "Built intake overview"
    );

    IntakeOverview {
        header: sheet.header,
        products: sheet.products,
        production,
    }
}
