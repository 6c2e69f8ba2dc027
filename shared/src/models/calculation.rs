//! Calculation log models
//!
//! One `CalculationRecord` is written per slab size of a (detail line, packing master)
//! pair. Broken and others weights are copied onto every slab row of the pair.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Slab size id marking the header row of a (detail line, packing master) pair
pub const HEADER_SLAB_SIZE_ID: i32 = 0;

/// How the quantities of a calculation were captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    #[default]
    Packing,
    GradeWeight,
}

impl CalculationMode {
    /// Normalize a stored mode code. `2` is grade weight, anything else
    /// (including the legacy `0`) is packing.
    pub fn from_code(code: i32) -> Self {
        if code == 2 {
            CalculationMode::GradeWeight
        } else {
            CalculationMode::Packing
        }
    }
}

/// Register a transaction header was recorded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterType {
    Intake,
    Opening,
    Issued,
    Production,
}

impl RegisterType {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(RegisterType::Intake),
            2 => Some(RegisterType::Opening),
            3 => Some(RegisterType::Issued),
            4 => Some(RegisterType::Production),
            _ => None,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            RegisterType::Intake => 1,
            RegisterType::Opening => 2,
            RegisterType::Issued => 3,
            RegisterType::Production => 4,
        }
    }
}

/// One row of the calculation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    /// Surrogate row id, only used to break ties deterministically
    pub row_id: i32,
    pub detail_line_id: i32,
    pub packing_master_id: i32,
    /// `0` for the header row of the pair
    pub slab_size_id: i32,
    pub slab_quantity: Decimal,
    /// Denormalized across all slab rows of the pair
    pub broken_quantity: Decimal,
    /// Denormalized across all slab rows of the pair
    pub others_quantity: Decimal,
    pub unit_weight: Decimal,
    /// Yield counts of the pair, copied onto every slab row
    #[serde(default)]
    pub yield_counts: Decimal,
    /// Factory weight of the pair, copied onto every slab row
    #[serde(default)]
    pub factory_weight: Decimal,
    /// Boxes per pack; `0` on legacy rows
    pub pack_size: i32,
    pub grade_id: i32,
    pub colour_id: i32,
    pub received_type_id: i32,
    pub supplier_name: Option<String>,
    pub calculation_mode: CalculationMode,
    pub production_date: NaiveDate,
    pub active: bool,
}

impl CalculationRecord {
    /// Key shared by every slab row of one logical calculation
    pub fn pair_key(&self) -> (i32, i32) {
        (self.detail_line_id, self.packing_master_id)
    }

    pub fn is_header(&self) -> bool {
        self.slab_size_id == HEADER_SLAB_SIZE_ID
    }

    /// Whether the row is a slab observation for normal aggregation
    pub fn is_slab_observation(&self) -> bool {
        !self.is_header() && self.slab_quantity > Decimal::ZERO
    }
}

/// Links a transaction header to a product and its grading attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailLine {
    pub id: i32,
    pub header_id: i32,
    pub product_id: i32,
    pub material_group_id: i32,
    /// Boxes received on the line
    #[serde(default)]
    pub boxes: i32,
    #[serde(default)]
    pub counts_per_kg: Decimal,
    pub grade_id: i32,
    pub colour_id: i32,
    pub received_type_id: i32,
}

/// A dated intake/opening/issued/production event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionHeader {
    pub id: i32,
    pub transaction_date: NaiveDate,
    /// Supplier id for intake transactions
    pub supplier_reference: Option<i32>,
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub supplier_code: Option<String>,
    #[serde(default)]
    pub transaction_no: Option<String>,
    #[serde(default)]
    pub vehicle_no: Option<String>,
    /// Weight declared by the supplier at intake
    #[serde(default)]
    pub client_weight: Decimal,
    pub register_type: RegisterType,
    pub active: bool,
}

/// Display names resolved from master data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordNames {
    pub packing: String,
    pub grade: Option<String>,
    pub colour: Option<String>,
    pub received_type: Option<String>,
}

/// Calculation row joined with its detail line, header and master-data names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub calculation: CalculationRecord,
    pub product_id: i32,
    pub product_name: String,
    pub supplier_id: Option<i32>,
    pub register_type: RegisterType,
    pub names: RecordNames,
}

impl AsRef<CalculationRecord> for CalculationRecord {
    fn as_ref(&self) -> &CalculationRecord {
        self
    }
}

impl AsRef<CalculationRecord> for StockRecord {
    fn as_ref(&self) -> &CalculationRecord {
        &self.calculation
    }
}
