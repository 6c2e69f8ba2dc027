//! In-memory ledger snapshot
//!
//! Holds the raw tables behind the calculation log and joins them into
//! `StockRecord`s the same way the database view does.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    CalculationRecord, DetailLine, IntakeHeader, IntakeProduct, IntakeSheet, PackingMaster,
    PackingTypeDef, RecordNames, RegisterType, StockRecord, TransactionHeader,
};
use crate::aggregation::VirtualCategory;
use crate::types::DateWindow;

/// A product (material) master entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub active: bool,
}

/// Referential gaps found while joining the ledger tables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("calculation row {row_id} references unknown detail line {detail_line_id}")]
    MissingDetailLine { row_id: i32, detail_line_id: i32 },

    #[error("detail line {detail_line_id} references unknown header {header_id}")]
    MissingHeader { detail_line_id: i32, header_id: i32 },

    #[error("detail line {detail_line_id} references unknown product {product_id}")]
    MissingProduct { detail_line_id: i32, product_id: i32 },

    #[error("calculation row {row_id} references unknown packing master {packing_master_id}")]
    MissingPackingMaster { row_id: i32, packing_master_id: i32 },

    #[error("product id {product_id} is reserved for a virtual stock category")]
    ReservedProductId { product_id: i32 },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    pub calculations: Vec<CalculationRecord>,
    pub detail_lines: Vec<DetailLine>,
    pub headers: Vec<TransactionHeader>,
    pub products: Vec<Product>,
    pub packing_masters: Vec<PackingMaster>,
    pub packing_types: Vec<PackingTypeDef>,
    pub grades: BTreeMap<i32, String>,
    pub colours: BTreeMap<i32, String>,
    pub received_types: BTreeMap<i32, String>,
    #[serde(default)]
    pub material_groups: BTreeMap<i32, String>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Packing type definitions, optionally narrowed to one packing master
    pub fn packing_types_for(&self, packing_master_id: Option<i32>) -> Vec<PackingTypeDef> {
        self.packing_types
            .iter()
            .filter(|def| packing_master_id.map_or(true, |id| def.packing_master_id == id))
            .cloned()
            .collect()
    }

    /// Join every calculation row with its detail line, header, product and names.
    ///
    /// A record is active only when its row, header, packing master and product are all active.
    /// Products may not use the ids of the virtual Broken/Others categories.
    pub fn records(&self) -> Result<Vec<StockRecord>, LedgerError> {
        if let Some(product) = self
            .products
            .iter()
            .find(|p| VirtualCategory::from_product_id(p.id).is_some())
        {
            return Err(LedgerError::ReservedProductId {
                product_id: product.id,
            });
        }

        let details: HashMap<i32, &DetailLine> =
            self.detail_lines.iter().map(|d| (d.id, d)).collect();
        let headers: HashMap<i32, &TransactionHeader> =
            self.headers.iter().map(|h| (h.id, h)).collect();
        let products: HashMap<i32, &Product> = self.products.iter().map(|p| (p.id, p)).collect();
        let masters: HashMap<i32, &PackingMaster> =
            self.packing_masters.iter().map(|m| (m.id, m)).collect();

        self.calculations
            .iter()
            .map(|calc| {
                let detail = details.get(&calc.detail_line_id).ok_or(
                    LedgerError::MissingDetailLine {
                        row_id: calc.row_id,
                        detail_line_id: calc.detail_line_id,
                    },
                )?;
                let header = headers
                    .get(&detail.header_id)
                    .ok_or(LedgerError::MissingHeader {
                        detail_line_id: detail.id,
                        header_id: detail.header_id,
                    })?;
                let product = products
                    .get(&detail.product_id)
                    .ok_or(LedgerError::MissingProduct {
                        detail_line_id: detail.id,
                        product_id: detail.product_id,
                    })?;
                let master = masters.get(&calc.packing_master_id).ok_or(
                    LedgerError::MissingPackingMaster {
                        row_id: calc.row_id,
                        packing_master_id: calc.packing_master_id,
                    },
                )?;

                let mut calculation = calc.clone();
                calculation.active = calc.active && header.active && master.active && product.active;
                if calculation.supplier_name.is_none() {
                    calculation.supplier_name = header.supplier_name.clone();
                }

                Ok(StockRecord {
                    names: RecordNames {
                        packing: master.description.clone(),
                        grade: self.grades.get(&calc.grade_id).cloned(),
                        colour: self.colours.get(&calc.colour_id).cloned(),
                        received_type: self.received_types.get(&calc.received_type_id).cloned(),
                    },
                    calculation,
                    product_id: product.id,
                    product_name: product.name.clone(),
                    supplier_id: header.supplier_reference,
                    register_type: header.register_type,
                })
            })
            .collect()
    }

    fn intake_boxes(&self, header_id: i32) -> i64 {
        self.detail_lines
            .iter()
            .filter(|line| line.header_id == header_id)
            .map(|line| i64::from(line.boxes))
            .sum()
    }

    /// Active intake headers dated inside `window`, oldest first
    pub fn intake_headers(&self, window: DateWindow) -> Vec<IntakeHeader> {
        let mut headers: Vec<&TransactionHeader> = self
            .headers
            .iter()
            .filter(|h| {
                h.register_type == RegisterType::Intake
                    && h.active
                    && window.contains(h.transaction_date)
            })
            .collect();
        headers.sort_by_key(|h| (h.transaction_date, h.id));

        headers
            .into_iter()
            .map(|h| IntakeHeader::from_transaction(h, self.intake_boxes(h.id)))
            .collect()
    }

    /// Header, product lines and active calculation rows of one intake
    pub fn intake_sheet(&self, header_id: i32) -> Result<Option<IntakeSheet>, LedgerError> {
        let Some(header) = self
            .headers
            .iter()
            .find(|h| h.id == header_id && h.register_type == RegisterType::Intake)
        else {
            return Ok(None);
        };

        let products: HashMap<i32, &Product> = self.products.iter().map(|p| (p.id, p)).collect();
        let lines: Vec<&DetailLine> = self
            .detail_lines
            .iter()
            .filter(|line| line.header_id == header_id)
            .collect();

        let mut intake_products = lines
            .iter()
            .map(|line| {
                let product = products
                    .get(&line.product_id)
                    .ok_or(LedgerError::MissingProduct {
                        detail_line_id: line.id,
                        product_id: line.product_id,
                    })?;
                Ok(IntakeProduct {
                    product_type: self
                        .material_groups
                        .get(&line.material_group_id)
                        .cloned()
                        .unwrap_or_default(),
                    product_name: product.name.clone(),
                    boxes: line.boxes,
                    counts_per_kg: line.counts_per_kg,
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;
        intake_products.sort_by(|a, b| {
            a.product_type
                .cmp(&b.product_type)
                .then_with(|| a.product_name.cmp(&b.product_name))
        });

        let line_ids: HashSet<i32> = lines.iter().map(|line| line.id).collect();
        let calculations = self
            .calculations
            .iter()
            .filter(|calc| calc.active && line_ids.contains(&calc.detail_line_id))
            .cloned()
            .collect();

        Ok(Some(IntakeSheet {
            header: IntakeHeader::from_transaction(header, self.intake_boxes(header_id)),
            products: intake_products,
            calculations,
        }))
    }
}
