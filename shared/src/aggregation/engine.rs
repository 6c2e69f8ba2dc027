//! The stock aggregation pipeline
//!
//! Every report runs the same steps over records already loaded for the
//! request:
//!
//! 1. scope filtering (cutoff, active flag, supplier/product/packing/mode/register)
//! 2. grouping of slab observations by `GroupKey`
//! 3. date bucketing against the packing master's column layout
//! 4. case counts per column
//! 5. virtual Broken/Others groups from deduplicated records
//!
//! Only the scope, the bucket mode and the label lead differ between reports.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::buckets::{cases_row, BucketMode, Buckets};
use super::cases::cases_per_column;
use super::grouping::{group_records, GroupKey, LabelLead, StockGroup};
use super::packing::PackingCatalog;
use super::scope::ScopeFilter;
use super::virtual_category;
use crate::models::{CalculationMode, RowKind, StockGroupView, StockRecord, StockSummaryLine};
use crate::types::DateWindow;

/// Suffix appended to names of grade-weight products and sections
pub const GRADE_WEIGHT_SUFFIX: &str = " (Grade Weight)";

/// Section heading used when a packing master has no description
pub const UNKNOWN_SECTION: &str = "Unknown";

pub fn section_name(packing_description: &str, mode: CalculationMode) -> String {
    let base = match packing_description.trim() {
        "" => UNKNOWN_SECTION,
        description => description,
    };
    match mode {
        CalculationMode::GradeWeight => format!("{base}{GRADE_WEIGHT_SUFFIX}"),
        CalculationMode::Packing => base.to_string(),
    }
}

/// Stateless aggregation engine bound to one resolved packing catalog
#[derive(Debug, Clone, Default)]
pub struct StockEngine {
    catalog: PackingCatalog,
}

impl StockEngine {
    pub fn new(catalog: PackingCatalog) -> Self {
        Self { catalog }
    }

    /// Drill-down for one product (or one virtual category) on a reference date
    pub fn item_detail(
        &self,
        records: &[StockRecord],
        scope: &ScopeFilter,
        reference: NaiveDate,
    ) -> Vec<StockGroupView> {
        let mode = BucketMode::SingleDate { reference };

        if let Some(category) = scope.virtual_category() {
            let admitted: Vec<&StockRecord> = records
                .iter()
                .filter(|record| scope.admits_shared(record, mode.cutoff()))
                .collect();
            let groups = virtual_category::per_product_groups(&admitted, category, &mode);
            debug!(
                category = category.name(),
                groups = groups.len(),
                "Built virtual drill-down"
            );
            return groups;
        }

        self.normal_groups(records, scope, &mode, LabelLead::PackingDescription)
    }

    /// Opening/production/total per group over a date window.
    ///
    /// Normal groups are ordered by section then label, followed by the
    /// global Broken and Others groups.
    pub fn period_report(
        &self,
        records: &[StockRecord],
        scope: &ScopeFilter,
        window: DateWindow,
    ) -> Vec<StockGroupView> {
        let mode = BucketMode::Range(window);

        let mut groups = self.normal_groups(records, scope, &mode, LabelLead::ProductName);
        groups.sort_by(|a, b| a.section.cmp(&b.section).then_with(|| a.label.cmp(&b.label)));

        let admitted: Vec<&StockRecord> = records
            .iter()
            .filter(|record| scope.admits_shared(record, mode.cutoff()))
            .collect();
        groups.extend(virtual_category::global_groups(&admitted, &mode));

        debug!(groups = groups.len(), ?window, "Built period report");
        groups
    }

    /// Stock and cases per product and calculation mode as on a date
    pub fn summary(
        &self,
        records: &[StockRecord],
        scope: &ScopeFilter,
        as_on: NaiveDate,
    ) -> Vec<StockSummaryLine> {
        let mode = BucketMode::SingleDate { reference: as_on };
        let groups = self.normal_groups(records, scope, &mode, LabelLead::PackingDescription);

        let mut lines: BTreeMap<(String, i32, CalculationMode), (Decimal, Decimal)> =
            BTreeMap::new();
        for group in &groups {
            let calculation_mode = group.calculation_mode.unwrap_or_default();
            let entry = lines
                .entry((group.variety.clone(), group.product_id, calculation_mode))
                .or_default();
            entry.0 += group.row(RowKind::Total).map_or(Decimal::ZERO, |row| row.total);
            entry.1 += group.row(RowKind::Cases).map_or(Decimal::ZERO, |row| row.total);
        }

        let mut summary: Vec<StockSummaryLine> = lines
            .into_iter()
            .map(|((name, product_id, calculation_mode), (total_quantity, cases))| {
                let product_name = match calculation_mode {
                    CalculationMode::GradeWeight => format!("{name}{GRADE_WEIGHT_SUFFIX}"),
                    CalculationMode::Packing => name,
                };
                StockSummaryLine {
                    product_id,
                    product_name,
                    calculation_mode: Some(calculation_mode),
                    total_quantity,
                    cases,
                }
            })
            .collect();

        let admitted: Vec<&StockRecord> = records
            .iter()
            .filter(|record| scope.admits_shared(record, mode.cutoff()))
            .collect();
        summary.extend(virtual_category::summary_lines(&admitted));

        debug!(lines = summary.len(), %as_on, "Built stock summary");
        summary
    }

    fn normal_groups(
        &self,
        records: &[StockRecord],
        scope: &ScopeFilter,
        mode: &BucketMode,
        lead: LabelLead,
    ) -> Vec<StockGroupView> {
        let cutoff = mode.cutoff();
        let observations = records.iter().filter(|record| {
            record.calculation.is_slab_observation() && scope.admits_product(record, cutoff)
        });

        let groups = group_records(observations, GroupKey::for_product);
        debug!(groups = groups.len(), "Grouped slab observations");

        let mut views = Vec::with_capacity(groups.len());
        let mut skipped_masters = BTreeSet::new();
        for group in &groups {
            if self.catalog.usable_layout(group.key.packing_master_id).is_none() {
                skipped_masters.insert(group.key.packing_master_id);
                continue;
            }
            if let Some(view) = self.build_group(group, mode, lead) {
                views.push(view);
            }
        }

        for packing_master_id in skipped_masters {
            warn!(packing_master_id, "No slab columns for packing master, skipping its groups");
        }

        views
    }

    /// Bucketed view of one group; `None` when it has no columns or no stock
    fn build_group(
        &self,
        group: &StockGroup<'_>,
        mode: &BucketMode,
        lead: LabelLead,
    ) -> Option<StockGroupView> {
        let layout = self.catalog.usable_layout(group.key.packing_master_id)?;

        let buckets = Buckets::accumulate(
            group.members.iter().copied(),
            layout.width(),
            mode,
            |record: &StockRecord| {
                layout
                    .column_index(record.calculation.slab_size_id)
                    .map(|column| {
                        (
                            record.calculation.production_date,
                            column,
                            record.calculation.slab_quantity,
                        )
                    })
            },
        );
        if buckets.is_zero() {
            return None;
        }

        let pack_size = group.pack_size();
        let total = buckets.total();
        let mut rows = buckets.into_rows(mode);
        if mode.has_cases_row() {
            rows.push(cases_row(cases_per_column(&total, pack_size)));
        }

        Some(StockGroupView {
            product_id: group.key.product_id,
            packing_master_id: group.key.packing_master_id,
            label: group.label(lead),
            section: section_name(group.packing_description(), group.key.calculation_mode),
            variety: group.product_name().to_string(),
            calculation_mode: Some(group.key.calculation_mode),
            unit_weight: group.key.unit_weight,
            pack_size,
            column_headers: layout.headers(),
            rows,
        })
    }
}
