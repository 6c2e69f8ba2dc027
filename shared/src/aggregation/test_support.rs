use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{CalculationMode, CalculationRecord, RecordNames, RegisterType, StockRecord};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[derive(Debug, Clone)]
pub struct RecordSpec {
    pub row_id: i32,
    pub detail_line_id: i32,
    pub packing_master_id: i32,
    pub slab_size_id: i32,
    pub slab: Decimal,
    pub broken: Decimal,
    pub others: Decimal,
    pub unit_weight: Decimal,
    pub yield_counts: Decimal,
    pub factory_weight: Decimal,
    pub pack_size: i32,
    pub grade_id: i32,
    pub supplier: Option<&'static str>,
    pub supplier_id: Option<i32>,
    pub mode: CalculationMode,
    pub date: NaiveDate,
    pub active: bool,
    pub product_id: i32,
    pub product_name: &'static str,
    pub packing: &'static str,
    pub grade: Option<&'static str>,
    pub register: RegisterType,
}

impl Default for RecordSpec {
    fn default() -> Self {
        Self {
            row_id: 1,
            detail_line_id: 1,
            packing_master_id: 1,
            slab_size_id: 1,
            slab: Decimal::ZERO,
            broken: Decimal::ZERO,
            others: Decimal::ZERO,
            unit_weight: Decimal::from(2),
            yield_counts: Decimal::ZERO,
            factory_weight: Decimal::ZERO,
            pack_size: 0,
            grade_id: 0,
            supplier: None,
            supplier_id: None,
            mode: CalculationMode::Packing,
            date: date(2024, 1, 1),
            active: true,
            product_id: 1,
            product_name: "P1",
            packing: "M1",
            grade: None,
            register: RegisterType::Intake,
        }
    }
}

pub fn record(fields: RecordSpec) -> StockRecord {
    StockRecord {
        calculation: CalculationRecord {
            row_id: fields.row_id,
            detail_line_id: fields.detail_line_id,
            packing_master_id: fields.packing_master_id,
            slab_size_id: fields.slab_size_id,
            slab_quantity: fields.slab,
            broken_quantity: fields.broken,
            others_quantity: fields.others,
            unit_weight: fields.unit_weight,
            yield_counts: fields.yield_counts,
            factory_weight: fields.factory_weight,
            pack_size: fields.pack_size,
            grade_id: fields.grade_id,
            colour_id: 0,
            received_type_id: 0,
            supplier_name: fields.supplier.map(str::to_string),
            calculation_mode: fields.mode,
            production_date: fields.date,
            active: fields.active,
        },
        product_id: fields.product_id,
        product_name: fields.product_name.to_string(),
        supplier_id: fields.supplier_id,
        register_type: fields.register,
        names: RecordNames {
            packing: fields.packing.to_string(),
            grade: fields.grade.map(str::to_string),
            colour: None,
            received_type: None,
        },
    }
}
