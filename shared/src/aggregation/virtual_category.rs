//! Synthetic Broken and Others groups
//!
//! Broken and others weights are denormalized across the slab rows of a
//! pair, so every builder here works on deduplicated representatives.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::buckets::{cases_row, BucketMode, Buckets};
use super::cases::{cases, DEFAULT_PACK_SIZE};
use super::dedup::select_representatives;
use super::grouping::{group_records, GroupKey, LabelLead};
use crate::models::{StockGroupView, StockRecord, StockSummaryLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VirtualCategory {
    Broken,
    Others,
}

impl VirtualCategory {
    pub const ALL: [VirtualCategory; 2] = [VirtualCategory::Broken, VirtualCategory::Others];

    /// Reserved product id. Ledgers holding a real product with this id are
    /// rejected when joined and skipped by the database store.
    pub fn product_id(&self) -> i32 {
        match self {
            VirtualCategory::Broken => -1,
            VirtualCategory::Others => -2,
        }
    }

    pub fn from_product_id(product_id: i32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.product_id() == product_id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            VirtualCategory::Broken => "BKN (Broken)",
            VirtualCategory::Others => "Others(Peeled)",
        }
    }

    pub fn column_header(&self) -> &'static str {
        match self {
            VirtualCategory::Broken => "BKN (KG)",
            VirtualCategory::Others => "Others(Peeled) (KG)",
        }
    }

    pub fn quantity(&self, record: &StockRecord) -> Decimal {
        match self {
            VirtualCategory::Broken => record.calculation.broken_quantity,
            VirtualCategory::Others => record.calculation.others_quantity,
        }
    }

    /// Broken stock is tracked by weight only
    pub fn cases(&self, quantity: Decimal) -> Decimal {
        match self {
            VirtualCategory::Broken => Decimal::ZERO,
            VirtualCategory::Others => cases(quantity, DEFAULT_PACK_SIZE),
        }
    }

    fn view(&self, label: String, variety: String, buckets: Buckets, mode: &BucketMode) -> StockGroupView {
        let total = buckets.total();
        let mut rows = buckets.into_rows(mode);
        if mode.has_cases_row() {
            rows.push(cases_row(total.iter().map(|q| self.cases(*q)).collect()));
        }

        StockGroupView {
            product_id: self.product_id(),
            packing_master_id: 0,
            label,
            section: self.name().to_string(),
            variety,
            calculation_mode: None,
            unit_weight: Decimal::ZERO,
            pack_size: 0,
            column_headers: vec![self.column_header().to_string()],
            rows,
        }
    }
}

/// Representatives carrying a positive quantity for `category`
fn contributing<'a>(records: &[&'a StockRecord], category: VirtualCategory) -> Vec<&'a StockRecord> {
    select_representatives(records.iter().copied())
        .into_iter()
        .filter(|record| category.quantity(record) > Decimal::ZERO)
        .collect()
}

fn bucket(records: &[&StockRecord], category: VirtualCategory, mode: &BucketMode) -> Buckets {
    Buckets::accumulate(records.iter().copied(), 1, mode, |record: &StockRecord| {
        Some((record.calculation.production_date, 0, category.quantity(record)))
    })
}

/// One group per category over all products, omitted when empty
pub fn global_groups(records: &[&StockRecord], mode: &BucketMode) -> Vec<StockGroupView> {
    VirtualCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let members = contributing(records, category);
            let buckets = bucket(&members, category, mode);
            if buckets.is_zero() {
                return None;
            }
            debug!(category = category.name(), pairs = members.len(), "Built virtual group");
            Some(category.view(
                category.name().to_string(),
                category.name().to_string(),
                buckets,
                mode,
            ))
        })
        .collect()
}

/// Groups of one category split per product, for the drill-down
pub fn per_product_groups(
    records: &[&StockRecord],
    category: VirtualCategory,
    mode: &BucketMode,
) -> Vec<StockGroupView> {
    let members = contributing(records, category);

    group_records(members, |record| GroupKey::for_virtual(record, category.product_id()))
        .into_iter()
        .filter_map(|group| {
            let buckets = bucket(&group.members, category, mode);
            if buckets.is_zero() {
                return None;
            }
            let mut view = category.view(
                group.label(LabelLead::PackingDescription),
                group.product_name().to_string(),
                buckets,
                mode,
            );
            view.packing_master_id = group.key.packing_master_id;
            view.unit_weight = group.key.unit_weight;
            view.pack_size = group.pack_size();
            Some(view)
        })
        .collect()
}

/// Summary lines for both categories, omitted when empty
pub fn summary_lines(records: &[&StockRecord]) -> Vec<StockSummaryLine> {
    VirtualCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let total: Decimal = contributing(records, category)
                .iter()
                .map(|record| category.quantity(record))
                .sum();
            if total.is_zero() {
                return None;
            }
            Some(StockSummaryLine {
                product_id: category.product_id(),
                product_name: category.name().to_string(),
                calculation_mode: None,
                total_quantity: total,
                cases: category.cases(total),
            })
        })
        .collect()
}
