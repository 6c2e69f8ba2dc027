//! Ledger fixture shared by the service and router tests
//!
//! Two intake deliveries of Vannamei (suppliers 7 and 8) plus grade-weight
//! Tiger from supplier 8, and an opening-stock Tiger lot packed as IQF.
//! Intake 1 declares 40 kg and intake 2 declares 25 kg.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{
    CalculationMode, CalculationRecord, DateWindow, DetailLine, IntakeHeader, IntakeSheet, Ledger,
    PackingMaster, PackingTypeDef, Product, RegisterType, StockRecord, TransactionHeader,
};

use crate::config::{Config, DatabaseConfig, ReportConfig, ServerConfig};
use crate::error::{AppError, AppResult};
use crate::store::{LedgerStore, MemoryLedgerStore, RecordQuery};
use crate::AppState;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn header(id: i32, on: NaiveDate, supplier: Option<(i32, &str)>, register_type: RegisterType) -> TransactionHeader {
    TransactionHeader {
        id,
        transaction_date: on,
        supplier_reference: supplier.map(|(id, _)| id),
        supplier_name: supplier.map(|(_, name)| name.to_string()),
        supplier_code: supplier.map(|(id, _)| format!("S{id:03}")),
        transaction_no: Some(format!("IN-{id:03}")),
        vehicle_no: None,
        client_weight: Decimal::ZERO,
        register_type,
        active: true,
    }
}

fn detail(id: i32, header_id: i32, product_id: i32, boxes: i32) -> DetailLine {
    DetailLine {
        id,
        header_id,
        product_id,
        material_group_id: 1,
        boxes,
        counts_per_kg: Decimal::from(30),
        grade_id: 0,
        colour_id: 0,
        received_type_id: 0,
    }
}

struct Calc {
    row_id: i32,
    detail_line_id: i32,
    packing_master_id: i32,
    slab_size_id: i32,
    slab: i64,
    broken: i64,
    others: i64,
    unit_weight: i64,
    yield_counts: i64,
    factory_weight: i64,
    pack_size: i32,
    mode: CalculationMode,
    on: NaiveDate,
}

impl From<Calc> for CalculationRecord {
    fn from(c: Calc) -> Self {
        CalculationRecord {
            row_id: c.row_id,
            detail_line_id: c.detail_line_id,
            packing_master_id: c.packing_master_id,
            slab_size_id: c.slab_size_id,
            slab_quantity: Decimal::from(c.slab),
            broken_quantity: Decimal::from(c.broken),
            others_quantity: Decimal::from(c.others),
            unit_weight: Decimal::from(c.unit_weight),
            yield_counts: Decimal::from(c.yield_counts),
            factory_weight: Decimal::from(c.factory_weight),
            pack_size: c.pack_size,
            grade_id: 0,
            colour_id: 0,
            received_type_id: 0,
            supplier_name: None,
            calculation_mode: c.mode,
            production_date: c.on,
            active: true,
        }
    }
}

pub fn sample_ledger() -> Ledger {
    let packing = CalculationMode::Packing;
    let calc = |row_id, detail_line_id, packing_master_id, slab_size_id, slab, broken, others, on| Calc {
        row_id,
        detail_line_id,
        packing_master_id,
        slab_size_id,
        slab,
        broken,
        others,
        unit_weight: 2,
        yield_counts: 0,
        factory_weight: 0,
        pack_size: 6,
        mode: packing,
        on,
    };

    // Yield counts and factory weight are copied onto every row of a pair, like broken/others
    let yielded = |c: Calc, yield_counts, factory_weight| Calc {
        yield_counts,
        factory_weight,
        ..c
    };

    let calculations = vec![
        // Supplier 7, Vannamei: header row plus two slabs, broken copied onto each
        yielded(calc(1, 1, 1, 0, 0, 3, 0, date(2024, 1, 2)), 300, 20),
        yielded(calc(2, 1, 1, 11, 12, 3, 0, date(2024, 1, 2)), 300, 20),
        yielded(calc(3, 1, 1, 12, 6, 3, 0, date(2024, 1, 2)), 300, 20),
        // Supplier 8, Vannamei: others copied onto both slab rows
        yielded(calc(4, 2, 1, 11, 10, 0, 8, date(2024, 1, 5)), 120, 9),
        yielded(calc(5, 2, 1, 12, 0, 0, 8, date(2024, 1, 5)), 120, 9),
        // Opening stock, Tiger in IQF
        Calc {
            unit_weight: 1,
            pack_size: 3,
            ..calc(6, 3, 2, 21, 9, 0, 0, date(2024, 1, 3))
        },
        // Supplier 8, Tiger captured by grade weight without a pack size
        Calc {
            pack_size: 0,
            mode: CalculationMode::GradeWeight,
            yield_counts: 50,
            factory_weight: 5,
            ..calc(7, 4, 1, 11, 6, 0, 0, date(2024, 1, 5))
        },
    ];

    Ledger {
        calculations: calculations.into_iter().map(CalculationRecord::from).collect(),
        detail_lines: vec![
            detail(1, 1, 1, 4),
            detail(2, 2, 1, 3),
            detail(3, 3, 2, 1),
            detail(4, 2, 2, 2),
        ],
        headers: vec![
            TransactionHeader {
                client_weight: Decimal::from(40),
                ..header(1, date(2024, 1, 2), Some((7, "Sea Harvest")), RegisterType::Intake)
            },
            TransactionHeader {
                client_weight: Decimal::from(25),
                vehicle_no: Some("TN-22".to_string()),
                ..header(2, date(2024, 1, 5), Some((8, "Blue Bay")), RegisterType::Intake)
            },
            header(3, date(2024, 1, 3), None, RegisterType::Opening),
        ],
        products: vec![
            Product {
                id: 1,
                name: "Vannamei".to_string(),
                active: true,
            },
            Product {
                id: 2,
                name: "Tiger".to_string(),
                active: true,
            },
        ],
        packing_masters: vec![
            PackingMaster {
                id: 1,
                description: "Block".to_string(),
                active: true,
            },
            PackingMaster {
                id: 2,
                description: "IQF".to_string(),
                active: true,
            },
        ],
        packing_types: vec![
            PackingTypeDef::new(1, 11, 1, "U-5"),
            PackingTypeDef::new(1, 12, 2, "U-6"),
            PackingTypeDef::new(1, 19, 9, "BKN"),
            PackingTypeDef::new(2, 21, 1, "16/20"),
        ],
        grades: BTreeMap::new(),
        material_groups: BTreeMap::from([(1, "Raw Shrimp".to_string())]),
        ..Ledger::default()
    }
}

/// Store whose every call fails as if the database were down
pub struct FailingStore;

#[async_trait]
impl LedgerStore for FailingStore {
    async fn packing_types(&self, _: Option<i32>) -> AppResult<Vec<PackingTypeDef>> {
        Err(AppError::StoreUnavailable("connection refused".to_string()))
    }

    async fn stock_records(&self, _: &RecordQuery) -> AppResult<Vec<StockRecord>> {
        Err(AppError::StoreUnavailable("connection refused".to_string()))
    }

    async fn intake_headers(&self, _: DateWindow) -> AppResult<Vec<IntakeHeader>> {
        Err(AppError::StoreUnavailable("connection refused".to_string()))
    }

    async fn intake_sheet(&self, _: i32) -> AppResult<Option<IntakeSheet>> {
        Err(AppError::StoreUnavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> AppResult<()> {
        Err(AppError::StoreUnavailable("connection refused".to_string()))
    }
}

pub fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://localhost/stock_ledger_test".to_string(),
            max_connections: 1,
            min_connections: 1,
            snapshot_path: None,
        },
        report: ReportConfig::default(),
    }
}

pub fn sample_state() -> AppState {
    AppState {
        store: Arc::new(MemoryLedgerStore::new(&sample_ledger()).unwrap()),
        config: Arc::new(test_config()),
    }
}

pub fn failing_state() -> AppState {
    AppState {
        store: Arc::new(FailingStore),
        config: Arc::new(test_config()),
    }
}
