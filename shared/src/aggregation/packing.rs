//! Packing metadata resolution
//!
//! Turns the flat list of slab-size definitions into one ordered column
//! layout per packing master. Broken/others sizes never become columns.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::PackingTypeDef;

/// Ordered slab-size columns of one packing master
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackingLayout {
    pub packing_master_id: i32,
    /// Normal slab sizes ordered by code
    pub normal_columns: Vec<PackingTypeDef>,
    /// Slab size ids classified as broken/others
    pub special_category_ids: BTreeSet<i32>,
}

impl PackingLayout {
    pub fn width(&self) -> usize {
        self.normal_columns.len()
    }

    pub fn headers(&self) -> Vec<String> {
        self.normal_columns
            .iter()
            .map(|column| column.description.clone())
            .collect()
    }

    /// Position of a slab size among the normal columns
    pub fn column_index(&self, slab_size_id: i32) -> Option<usize> {
        self.normal_columns
            .iter()
            .position(|column| column.slab_size_id == slab_size_id)
    }
}

/// Column layouts for every packing master, resolved once per request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackingCatalog {
    layouts: BTreeMap<i32, PackingLayout>,
}

impl PackingCatalog {
    pub fn resolve(definitions: impl IntoIterator<Item = PackingTypeDef>) -> Self {
        let mut layouts: BTreeMap<i32, PackingLayout> = BTreeMap::new();

        for definition in definitions {
            let layout = layouts
                .entry(definition.packing_master_id)
                .or_insert_with(|| PackingLayout {
                    packing_master_id: definition.packing_master_id,
                    ..PackingLayout::default()
                });

            if definition.is_special_category {
                layout.special_category_ids.insert(definition.slab_size_id);
            } else {
                layout.normal_columns.push(definition);
            }
        }

        for layout in layouts.values_mut() {
            layout
                .normal_columns
                .sort_by_key(|column| (column.code, column.slab_size_id));
        }

        Self { layouts }
    }

    pub fn layout(&self, packing_master_id: i32) -> Option<&PackingLayout> {
        self.layouts.get(&packing_master_id)
    }

    /// Layout with at least one normal column; groups without one are skipped
    pub fn usable_layout(&self, packing_master_id: i32) -> Option<&PackingLayout> {
        self.layout(packing_master_id)
            .filter(|layout| !layout.normal_columns.is_empty())
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}
