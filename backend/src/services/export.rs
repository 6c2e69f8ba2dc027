//! Period report workbook
//!
//! Arranges period-report groups into an `Overall` sheet plus one sheet per
//! section, then flattens the workbook to CSV with one leading column naming
//! the sheet.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{display_date, RowKind, StockGroupView};

use crate::error::{AppError, AppResult};

pub const OVERALL_SHEET: &str = "Overall";
const MAX_SHEET_NAME_LEN: usize = 31;

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// Sheet names cannot contain `/ \ ? * [ ]` and are capped at 31 characters
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .filter(|c| !matches!(c, '?' | '*' | '[' | ']'))
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .take(MAX_SHEET_NAME_LEN)
        .collect();

    if cleaned.is_empty() {
        "Unknown".to_string()
    } else {
        cleaned
    }
}

fn cell(value: Decimal) -> String {
    value.normalize().to_string()
}

fn value_row(label: impl Into<String>, values: &[Decimal], total: Decimal) -> Vec<String> {
    let mut row = Vec::with_capacity(values.len() + 2);
    row.push(label.into());
    row.extend(values.iter().map(|v| cell(*v)));
    row.push(cell(total));
    row
}

/// Running per-column totals of a block
#[derive(Default)]
struct Totals {
    values: Vec<Decimal>,
    total: Decimal,
}

impl Totals {
    fn add(&mut self, values: &[Decimal], total: Decimal) {
        if self.values.len() < values.len() {
            self.values.resize(values.len(), Decimal::ZERO);
        }
        for (sum, value) in self.values.iter_mut().zip(values) {
            *sum += value;
        }
        self.total += total;
    }
}

/// Rows for the groups of one packing master within a section
fn write_block(rows: &mut Vec<Vec<String>>, groups: &[&StockGroupView]) {
    let Some(first) = groups.first() else {
        return;
    };

    let mut header = vec!["PARTICULARS".to_string()];
    header.extend(first.column_headers.iter().cloned());
    header.push("TOTAL NO. OF SLABS".to_string());
    rows.push(header);

    let mut by_variety: BTreeMap<&str, Vec<&StockGroupView>> = BTreeMap::new();
    for group in groups {
        by_variety.entry(group.variety.as_str()).or_default().push(group);
    }

    let mut overall = Totals::default();
    let mut item_number = 1;
    for (variety, items) in by_variety {
        let mut variety_totals = Totals::default();

        for item in items {
            rows.push(vec![format!("{}. {}", item_number, item.label)]);
            for (kind, label) in [
                (RowKind::Opening, "OPENING STOCK"),
                (RowKind::Production, "PRODUCTION"),
                (RowKind::Total, "TOTAL"),
            ] {
                if let Some(row) = item.row(kind) {
                    rows.push(value_row(label, &row.values, row.total));
                }
            }
            if let Some(total) = item.row(RowKind::Total) {
                variety_totals.add(&total.values, total.total);
                overall.add(&total.values, total.total);
            }
            rows.push(Vec::new());
            item_number += 1;
        }

        rows.push(value_row(
            format!("{} TOTAL", variety.to_uppercase()),
            &variety_totals.values,
            variety_totals.total,
        ));
        rows.push(Vec::new());
    }

    rows.push(value_row("OVERALL TOTAL", &overall.values, overall.total));
    rows.push(Vec::new());
}

/// Groups keyed by section, then by packing master so headers stay aligned
fn sections(groups: &[StockGroupView]) -> BTreeMap<&str, BTreeMap<i32, Vec<&StockGroupView>>> {
    let mut sections: BTreeMap<&str, BTreeMap<i32, Vec<&StockGroupView>>> = BTreeMap::new();
    for group in groups {
        sections
            .entry(group.section.as_str())
            .or_default()
            .entry(group.packing_master_id)
            .or_default()
            .push(group);
    }
    sections
}

fn title(as_on: NaiveDate) -> Vec<String> {
    vec![format!("STOCK AS ON {}", display_date(as_on))]
}

pub fn build_workbook(groups: &[StockGroupView], as_on: NaiveDate) -> Workbook {
    if groups.is_empty() {
        return Workbook::default();
    }
    let sections = sections(groups);

    let mut overall = vec![title(as_on), Vec::new()];
    for (section, blocks) in &sections {
        for block in blocks.values() {
            overall.push(vec![format!("=== {} ===", section)]);
            write_block(&mut overall, block);
        }
    }

    let mut sheets = vec![Sheet {
        name: OVERALL_SHEET.to_string(),
        rows: overall,
    }];

    for (section, blocks) in &sections {
        let mut rows = vec![title(as_on), Vec::new()];
        for block in blocks.values() {
            write_block(&mut rows, block);
        }
        sheets.push(Sheet {
            name: sanitize_sheet_name(section),
            rows,
        });
    }

    Workbook { sheets }
}

impl Workbook {
    /// Flatten every sheet into one CSV document
    pub fn to_csv(&self) -> AppResult<String> {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(vec![]);

        for sheet in &self.sheets {
            for row in &sheet.rows {
                let record = std::iter::once(sheet.name.as_str()).chain(row.iter().map(String::as_str));
                wtr.write_record(record)
                    .map_err(|e| AppError::Export(format!("CSV serialization error: {}", e)))?;
            }
        }

        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Export(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Export(format!("UTF-8 conversion error: {}", e)))
    }
}
