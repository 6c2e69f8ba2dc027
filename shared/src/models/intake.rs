//! Raw material intake models
//!
//! An intake is a transaction header in the intake register. The overview
//! follows one intake through production, drawing down the weight the
//! supplier declared.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CalculationRecord, TransactionHeader};

/// One intake with its received box count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeHeader {
    pub id: i32,
    pub transaction_no: Option<String>,
    pub transaction_date: NaiveDate,
    pub supplier_name: String,
    pub supplier_code: String,
    pub vehicle_no: String,
    pub client_weight: Decimal,
    /// Boxes over every detail line of the intake
    pub boxes: i64,
}

impl IntakeHeader {
    pub fn from_transaction(header: &TransactionHeader, boxes: i64) -> Self {
        Self {
            id: header.id,
            transaction_no: header.transaction_no.clone(),
            transaction_date: header.transaction_date,
            supplier_name: header.supplier_name.clone().unwrap_or_default(),
            supplier_code: header.supplier_code.clone().unwrap_or_default(),
            vehicle_no: header.vehicle_no.clone().unwrap_or_default(),
            client_weight: header.client_weight,
            boxes,
        }
    }
}

/// A product line received on the intake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeProduct {
    /// Material group description
    pub product_type: String,
    pub product_name: String,
    pub boxes: i32,
    pub counts_per_kg: Decimal,
}

/// Everything the store knows about one intake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeSheet {
    pub header: IntakeHeader,
    pub products: Vec<IntakeProduct>,
    /// Active calculation rows with a production date
    pub calculations: Vec<CalculationRecord>,
}

/// Production of one detail line on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeProductionRow {
    pub production_date: NaiveDate,
    pub detail_line_id: i32,
    pub total_kgs: Decimal,
    pub total_counts: Decimal,
    pub factory_kgs: Decimal,
    /// Client weight less every factory weight up to and including this row
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeOverview {
    pub header: IntakeHeader,
    pub products: Vec<IntakeProduct>,
    pub production: Vec<IntakeProductionRow>,
}
