//! Stock position aggregation
//!
//! Pure functions and value types; nothing here performs I/O.

pub mod buckets;
pub mod cases;
pub mod dedup;
pub mod engine;
pub mod grouping;
pub mod intake;
pub mod packing;
pub mod scope;
pub mod virtual_category;

#[cfg(test)]
pub(crate) mod test_support;

pub use buckets::{BucketMode, Buckets, CASES_ROW_LABEL};
pub use cases::{cases, cases_per_column, effective_pack_size, DEFAULT_PACK_SIZE};
pub use dedup::select_representatives;
pub use engine::{section_name, StockEngine, GRADE_WEIGHT_SUFFIX, UNKNOWN_SECTION};
pub use grouping::{compose_label, format_unit_weight, group_records, GroupKey, LabelLead, StockGroup};
pub use intake::{intake_overview, production_rows};
pub use packing::{PackingCatalog, PackingLayout};
pub use scope::ScopeFilter;
pub use virtual_category::VirtualCategory;
