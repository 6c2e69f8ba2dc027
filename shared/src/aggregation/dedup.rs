//! Representative-row selection for denormalized pair values
//!
//! Broken, others, yield counts and factory weight are copied onto every
//! slab row of a (detail line, packing master) pair.

use std::collections::BTreeMap;

use crate::models::CalculationRecord;

/// Preference order inside a pair: header row first, then smallest slab size, then row id
fn preference(calc: &CalculationRecord) -> (bool, i32, i32) {
    (!calc.is_header(), calc.slab_size_id, calc.row_id)
}

/// Pick one record per (detail line, packing master) pair.
///
/// This is a selection, not a merge: denormalized values are identical across
/// the pair, so summing the representatives counts each calculation once.
/// Applying it to its own output returns the same records.
pub fn select_representatives<'a, T, I>(records: I) -> Vec<&'a T>
where
    T: AsRef<CalculationRecord> + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut chosen: BTreeMap<(i32, i32), &'a T> = BTreeMap::new();

    for record in records {
        let calc = record.as_ref();
        chosen
            .entry(calc.pair_key())
            .and_modify(|current| {
                if preference(calc) < preference((*current).as_ref()) {
                    *current = record;
                }
            })
            .or_insert(record);
    }

    chosen.into_values().collect()
}
