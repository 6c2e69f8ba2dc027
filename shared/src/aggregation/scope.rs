//! Scope filters narrowing the record set of a report

use chrono::NaiveDate;

use super::virtual_category::VirtualCategory;
use crate::models::{CalculationMode, RegisterType, StockRecord};

/// Narrows the records an aggregation run sees.
///
/// Product and calculation-mode filters only apply to normal groups; the
/// virtual Broken/Others categories honour the remaining filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeFilter {
    pub supplier_id: Option<i32>,
    pub product_id: Option<i32>,
    pub packing_master_id: Option<i32>,
    pub calculation_mode: Option<CalculationMode>,
    pub register_type: Option<RegisterType>,
}

impl ScopeFilter {
    /// Every record, no narrowing
    pub fn unfiltered() -> Self {
        Self::default()
    }

    /// Overall stock view: intake register only
    pub fn overall() -> Self {
        Self::default().with_register_type(Some(RegisterType::Intake))
    }

    /// Stock received from one supplier
    pub fn supplier(supplier_id: i32) -> Self {
        Self::overall().with_supplier(Some(supplier_id))
    }

    /// Drill-down into one product, or into a virtual category for `-1`/`-2`
    pub fn product(product_id: i32) -> Self {
        Self {
            product_id: Some(product_id),
            ..Self::default()
        }
    }

    pub fn with_supplier(mut self, supplier_id: Option<i32>) -> Self {
        self.supplier_id = supplier_id;
        self
    }

    pub fn with_packing_master(mut self, packing_master_id: Option<i32>) -> Self {
        self.packing_master_id = packing_master_id;
        self
    }

    pub fn with_calculation_mode(mut self, mode: Option<CalculationMode>) -> Self {
        self.calculation_mode = mode;
        self
    }

    pub fn with_register_type(mut self, register_type: Option<RegisterType>) -> Self {
        self.register_type = register_type;
        self
    }

    /// Virtual category addressed by the product filter, if any
    pub fn virtual_category(&self) -> Option<VirtualCategory> {
        self.product_id.and_then(VirtualCategory::from_product_id)
    }

    /// Filters shared by normal and virtual groups
    pub fn admits_shared(&self, record: &StockRecord, cutoff: Option<NaiveDate>) -> bool {
        record.calculation.active
            && cutoff.map_or(true, |cutoff| record.calculation.production_date <= cutoff)
            && self
                .supplier_id
                .map_or(true, |id| record.supplier_id == Some(id))
            && self
                .packing_master_id
                .map_or(true, |id| record.calculation.packing_master_id == id)
            && self
                .register_type
                .map_or(true, |register| record.register_type == register)
    }

    /// Shared filters plus the product and calculation-mode filters
    pub fn admits_product(&self, record: &StockRecord, cutoff: Option<NaiveDate>) -> bool {
        self.admits_shared(record, cutoff)
            && self.product_id.map_or(true, |id| record.product_id == id)
            && self
                .calculation_mode
                .map_or(true, |mode| record.calculation.calculation_mode == mode)
    }
}
