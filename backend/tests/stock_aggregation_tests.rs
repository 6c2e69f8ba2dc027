//! Stock aggregation tests
//!
//! Properties of the aggregation pipeline:
//! - Broken/others totals count each (detail line, packing master) pair once
//! - Bucket rows add up to the total row, per column
//! - Cases are floored per column
//! - Zero-stock groups are never emitted

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    cases, cases_per_column, select_representatives, CalculationMode, CalculationRecord,
    DateWindow, PackingCatalog, PackingTypeDef, RecordNames, RegisterType, RowKind, ScopeFilter,
    StockEngine, StockRecord,
};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn catalog() -> PackingCatalog {
    PackingCatalog::resolve(vec![
        PackingTypeDef::new(1, 11, 1, "U-5"),
        PackingTypeDef::new(1, 12, 2, "U-6"),
        PackingTypeDef::new(1, 13, 3, "U-7"),
        PackingTypeDef::new(1, 19, 9, "BKN"),
        PackingTypeDef::new(1, 20, 10, "Others"),
    ])
}

fn stock_record(
    row_id: i32,
    detail_line_id: i32,
    slab_size_id: i32,
    slab_quantity: Decimal,
    production_date: NaiveDate,
) -> StockRecord {
    StockRecord {
        calculation: CalculationRecord {
            row_id,
            detail_line_id,
            packing_master_id: 1,
            slab_size_id,
            slab_quantity,
            broken_quantity: Decimal::ZERO,
            others_quantity: Decimal::ZERO,
            unit_weight: dec("2"),
            yield_counts: Decimal::ZERO,
            factory_weight: Decimal::ZERO,
            pack_size: 6,
            grade_id: 0,
            colour_id: 0,
            received_type_id: 0,
            supplier_name: None,
            calculation_mode: CalculationMode::Packing,
            production_date,
            active: true,
        },
        product_id: 1,
        product_name: "Vannamei".to_string(),
        supplier_id: None,
        register_type: RegisterType::Intake,
        names: RecordNames {
            packing: "Block".to_string(),
            ..RecordNames::default()
        },
    }
}

/// All slab rows of one pair, with the broken weight copied onto each
fn denormalized_pair(detail_line_id: i32, rows: usize, broken: Decimal) -> Vec<StockRecord> {
    (0..rows)
        .map(|i| {
            let mut record = stock_record(
                detail_line_id * 100 + i as i32,
                detail_line_id,
                i as i32,
                Decimal::ZERO,
                base_date(),
            );
            record.calculation.broken_quantity = broken;
            record
        })
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// 1, 5 and 17 slab rows of one pair all yield the same broken total
    #[test]
    fn test_broken_total_independent_of_row_count() {
        for rows in [1, 5, 17] {
            let records = denormalized_pair(1, rows, dec("4.5"));
            let total: Decimal = select_representatives(&records)
                .iter()
                .map(|r| r.calculation.broken_quantity)
                .sum();
            assert_eq!(total, dec("4.5"), "{} rows", rows);
        }
    }

    /// Column totals [10, 5] with pack size 6 give 1 case, not 2
    #[test]
    fn test_per_column_case_flooring() {
        let per_column: Decimal = cases_per_column(&[dec("10"), dec("5")], 6).iter().sum();
        assert_eq!(per_column, dec("1"));
        assert_ne!(per_column, cases(dec("15"), 6));
    }

    #[test]
    fn test_case_floor_clamp() {
        assert_eq!(cases(dec("5"), 6), Decimal::ZERO);
        assert_eq!(cases(dec("6"), 6), dec("1"));
    }

    #[test]
    fn test_broken_detail_reports_zero_cases() {
        let mut records = denormalized_pair(1, 3, dec("60"));
        records.extend(denormalized_pair(2, 2, dec("18")));
        let engine = StockEngine::new(catalog());

        let groups = engine.item_detail(&records, &ScopeFilter::product(-1), base_date());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].row(RowKind::Total).unwrap().total, dec("78"));
        assert_eq!(groups[0].row(RowKind::Cases).unwrap().total, Decimal::ZERO);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// (day offset, column, quantity) observations
fn observations_strategy() -> impl Strategy<Value = Vec<(u64, usize, Decimal)>> {
    prop::collection::vec((0u64..30, 0usize..3, quantity_strategy()), 0..40)
}

fn build_records(observations: &[(u64, usize, Decimal)]) -> Vec<StockRecord> {
    let slab_ids = [11, 12, 13];
    observations
        .iter()
        .enumerate()
        .map(|(i, (offset, column, quantity))| {
            stock_record(
                i as i32 + 1,
                i as i32 + 1,
                slab_ids[*column],
                *quantity,
                base_date() + Days::new(*offset),
            )
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The deduplicated broken total is the shared value, once per pair
    #[test]
    fn prop_denormalized_values_counted_once(
        pairs in prop::collection::vec((1usize..18, quantity_strategy()), 1..6)
    ) {
        let mut records = Vec::new();
        let mut expected = Decimal::ZERO;
        for (i, (rows, broken)) in pairs.iter().enumerate() {
            records.extend(denormalized_pair(i as i32 + 1, *rows, *broken));
            expected += *broken;
        }

        let picked = select_representatives(&records);
        prop_assert_eq!(picked.len(), pairs.len());
        let total: Decimal = picked.iter().map(|r| r.calculation.broken_quantity).sum();
        prop_assert_eq!(total, expected);

        let again = select_representatives(picked.iter().copied());
        prop_assert_eq!(again, picked);
    }

    /// Up-to-previous plus selected day equals total, per column
    #[test]
    fn prop_single_date_buckets_add_up(
        observations in observations_strategy(),
        reference_offset in 0u64..30
    ) {
        let records = build_records(&observations);
        let engine = StockEngine::new(catalog());
        let reference = base_date() + Days::new(reference_offset);

        for group in engine.item_detail(&records, &ScopeFilter::product(1), reference) {
            let earlier = &group.row(RowKind::UpToPrevious).unwrap().values;
            let current = &group.row(RowKind::SelectedDay).unwrap().values;
            let total = group.row(RowKind::Total).unwrap();
            prop_assert_eq!(earlier.len(), group.column_headers.len());
            for col in 0..total.values.len() {
                prop_assert_eq!(earlier[col] + current[col], total.values[col]);
            }
            prop_assert_eq!(total.total, total.values.iter().sum::<Decimal>());
            prop_assert!(total.total > Decimal::ZERO);

            let cases_row = group.row(RowKind::Cases).unwrap();
            prop_assert_eq!(&cases_row.values, &cases_per_column(&total.values, group.pack_size));
        }
    }

    /// Opening plus production equals total, per column, and stock after the window is ignored
    #[test]
    fn prop_range_buckets_add_up(
        observations in observations_strategy(),
        from_offset in 0u64..15,
        length in 0u64..15
    ) {
        let records = build_records(&observations);
        let engine = StockEngine::new(catalog());
        let from = base_date() + Days::new(from_offset);
        let to = from + Days::new(length);

        let groups = engine.period_report(
            &records,
            &ScopeFilter::unfiltered(),
            DateWindow::new(Some(from), Some(to)),
        );

        let mut reported = Decimal::ZERO;
        for group in &groups {
            let opening = &group.row(RowKind::Opening).unwrap().values;
            let production = &group.row(RowKind::Production).unwrap().values;
            let total = group.row(RowKind::Total).unwrap();
            for col in 0..total.values.len() {
                prop_assert_eq!(opening[col] + production[col], total.values[col]);
            }
            prop_assert!(group.row(RowKind::Cases).is_none());
            reported += total.total;
        }

        let expected: Decimal = records
            .iter()
            .filter(|r| r.calculation.production_date <= to)
            .map(|r| r.calculation.slab_quantity)
            .sum();
        prop_assert_eq!(reported, expected);
    }

    /// Summing floored columns never reports more cases than flooring the sum
    #[test]
    fn prop_per_column_cases_never_exceed_combined(
        totals in prop::collection::vec(quantity_strategy(), 1..6),
        pack_size in 0i32..12
    ) {
        let per_column: Decimal = cases_per_column(&totals, pack_size).iter().sum();
        let combined = cases(totals.iter().sum(), pack_size);
        prop_assert!(per_column <= combined);
        prop_assert!(per_column >= Decimal::ZERO);
    }
}
