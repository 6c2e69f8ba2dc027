//! Composite group keys and display labels

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::cases::DEFAULT_PACK_SIZE;
use crate::models::{CalculationMode, StockRecord};

/// Identity of a stock group.
///
/// Field order is the order groups are listed in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub packing_master_id: i32,
    pub unit_weight: Decimal,
    pub grade_id: i32,
    pub colour_id: i32,
    pub received_type_id: i32,
    pub product_id: i32,
    /// Only set for the per-product virtual categories
    pub product_name: Option<String>,
    pub supplier_name: Option<String>,
    pub calculation_mode: CalculationMode,
}

impl GroupKey {
    /// Key of a normal group, one per physical product
    pub fn for_product(record: &StockRecord) -> Self {
        let calc = &record.calculation;
        Self {
            packing_master_id: calc.packing_master_id,
            unit_weight: calc.unit_weight.normalize(),
            grade_id: calc.grade_id,
            colour_id: calc.colour_id,
            received_type_id: calc.received_type_id,
            product_id: record.product_id,
            product_name: None,
            supplier_name: non_empty(calc.supplier_name.as_deref()).map(str::to_string),
            calculation_mode: calc.calculation_mode,
        }
    }

    /// Key of a virtual Broken/Others group, split per product name
    pub fn for_virtual(record: &StockRecord, virtual_product_id: i32) -> Self {
        let calc = &record.calculation;
        Self {
            packing_master_id: calc.packing_master_id,
            unit_weight: calc.unit_weight.normalize(),
            grade_id: calc.grade_id,
            colour_id: calc.colour_id,
            received_type_id: calc.received_type_id,
            product_id: virtual_product_id,
            product_name: Some(record.product_name.clone()),
            supplier_name: None,
            calculation_mode: CalculationMode::default(),
        }
    }
}

/// What a label starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelLead {
    PackingDescription,
    ProductName,
}

/// Records sharing one `GroupKey`
#[derive(Debug, Clone)]
pub struct StockGroup<'a> {
    pub key: GroupKey,
    pub members: Vec<&'a StockRecord>,
}

impl<'a> StockGroup<'a> {
    /// Largest pack size seen in the group, or the legacy default
    pub fn pack_size(&self) -> i32 {
        self.members
            .iter()
            .map(|record| record.calculation.pack_size)
            .max()
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PACK_SIZE)
    }

    fn first(&self) -> Option<&'a StockRecord> {
        self.members.first().copied()
    }

    pub fn packing_description(&self) -> &'a str {
        self.first().map_or("", |record| record.names.packing.as_str())
    }

    pub fn product_name(&self) -> &'a str {
        self.first().map_or("", |record| record.product_name.as_str())
    }

    pub fn label(&self, lead: LabelLead) -> String {
        let lead_text = match lead {
            LabelLead::PackingDescription => self.packing_description(),
            LabelLead::ProductName => self.product_name(),
        };
        let names = self.first().map(|record| &record.names);

        compose_label(
            lead_text,
            self.pack_size(),
            self.key.unit_weight,
            [
                self.key.product_name.as_deref(),
                names.and_then(|n| n.grade.as_deref()),
                names.and_then(|n| n.colour.as_deref()),
                names.and_then(|n| n.received_type.as_deref()),
                self.key.supplier_name.as_deref(),
            ],
        )
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Unit weight with at most two decimals and no trailing zeros
pub fn format_unit_weight(weight: Decimal) -> String {
    weight.round_dp(2).normalize().to_string()
}

/// `<lead> <packSize> x <unitWeight> - <qualifier>...`, skipping empty parts
pub fn compose_label<'s>(
    lead: &str,
    pack_size: i32,
    unit_weight: Decimal,
    qualifiers: impl IntoIterator<Item = Option<&'s str>>,
) -> String {
    let mut label = lead.trim().to_string();

    if unit_weight > Decimal::ZERO {
        if !label.is_empty() {
            label.push(' ');
        }
        label.push_str(&format!("{} x {}", pack_size, format_unit_weight(unit_weight)));
    }

    for qualifier in qualifiers.into_iter().filter_map(non_empty) {
        label.push_str(" - ");
        label.push_str(qualifier.trim());
    }

    label
}

/// Partition records by key, in key order
pub fn group_records<'a, I, F>(records: I, key_of: F) -> Vec<StockGroup<'a>>
where
    I: IntoIterator<Item = &'a StockRecord>,
    F: Fn(&StockRecord) -> GroupKey,
{
    let mut groups: BTreeMap<GroupKey, Vec<&'a StockRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(key_of(record)).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(key, members)| StockGroup { key, members })
        .collect()
}
