//! Report output shapes consumed by the UI and the exporter

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CalculationMode;

/// Kind of a row in a stock group table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    UpToPrevious,
    SelectedDay,
    Opening,
    Production,
    Total,
    Cases,
}

/// One labelled row; `values` is aligned 1:1 with the group's column headers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRow {
    pub row_type: String,
    pub kind: RowKind,
    pub values: Vec<Decimal>,
    pub total: Decimal,
}

impl StockRow {
    pub fn new(kind: RowKind, row_type: impl Into<String>, values: Vec<Decimal>) -> Self {
        let total = values.iter().sum();
        Self {
            row_type: row_type.into(),
            kind,
            values,
            total,
        }
    }
}

/// A stock group with its date-bucketed table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockGroupView {
    /// Real product id, or `-1`/`-2` for the virtual Broken/Others categories
    pub product_id: i32,
    pub packing_master_id: i32,
    pub label: String,
    /// Heading the group is listed under (packing description in period reports)
    pub section: String,
    /// Product name the group belongs to
    pub variety: String,
    /// `None` for the virtual categories
    pub calculation_mode: Option<CalculationMode>,
    pub unit_weight: Decimal,
    pub pack_size: i32,
    pub column_headers: Vec<String>,
    pub rows: Vec<StockRow>,
}

impl StockGroupView {
    pub fn row(&self, kind: RowKind) -> Option<&StockRow> {
        self.rows.iter().find(|row| row.kind == kind)
    }
}

/// Per-product line of the overall and per-supplier stock views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSummaryLine {
    pub product_id: i32,
    pub product_name: String,
    /// `None` for the virtual categories
    pub calculation_mode: Option<CalculationMode>,
    pub total_quantity: Decimal,
    pub cases: Decimal,
}

/// Response wrapper: either a complete result or an explicit error with no data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEnvelope<T> {
    pub success: bool,
    pub data: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<String>,
}

impl<T> ReportEnvelope<T> {
    pub fn ok(data: Vec<T>) -> Self {
        Self {
            success: true,
            data,
            error: None,
            reference_date: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            error: Some(error.into()),
            reference_date: None,
        }
    }

    pub fn with_reference_date(mut self, date: impl Into<String>) -> Self {
        self.reference_date = Some(date.into());
        self
    }
}
