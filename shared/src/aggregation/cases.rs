//! Case (box) counts derived from slab quantities

use rust_decimal::Decimal;

/// Pack size used when no record of a group reports one
pub const DEFAULT_PACK_SIZE: i32 = 6;

pub fn effective_pack_size(pack_size: i32) -> i32 {
    if pack_size > 0 {
        pack_size
    } else {
        DEFAULT_PACK_SIZE
    }
}

/// Whole cases in `quantity`; anything below one case reports as zero
pub fn cases(quantity: Decimal, pack_size: i32) -> Decimal {
    let boxes = (quantity / Decimal::from(effective_pack_size(pack_size))).floor();
    if boxes >= Decimal::ONE {
        boxes
    } else {
        Decimal::ZERO
    }
}

/// Cases for each column total, floored per column
pub fn cases_per_column(column_totals: &[Decimal], pack_size: i32) -> Vec<Decimal> {
    column_totals
        .iter()
        .map(|total| cases(*total, pack_size))
        .collect()
}
