//! Packing master and slab-size column definitions

use serde::{Deserialize, Serialize};

/// Description fragments that mark a slab size as broken/others material
pub const SPECIAL_CATEGORY_LEXICON: [&str; 4] = ["BKN", "BROKEN", "OTHERS", "OTHER"];

/// Whether a slab-size description belongs to the broken/others lexicon
pub fn is_special_description(description: &str) -> bool {
    let upper = description.trim().to_uppercase();
    SPECIAL_CATEGORY_LEXICON
        .iter()
        .any(|fragment| upper.contains(fragment))
}

/// A packing configuration (e.g. "IQF", "Block")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingMaster {
    pub id: i32,
    pub description: String,
    pub active: bool,
}

/// One slab-size column of a packing master
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingTypeDef {
    pub packing_master_id: i32,
    pub slab_size_id: i32,
    pub code: i32,
    pub description: String,
    pub is_special_category: bool,
}

impl PackingTypeDef {
    /// Build a column definition, classifying it from its description
    pub fn new(packing_master_id: i32, slab_size_id: i32, code: i32, description: impl Into<String>) -> Self {
        let description = description.into();
        let is_special_category = is_special_description(&description);
        Self {
            packing_master_id,
            slab_size_id,
            code,
            description,
            is_special_category,
        }
    }
}
