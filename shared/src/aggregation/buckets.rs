//! Date-bucketed per-column sums

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{RowKind, StockRow};
use crate::types::{display_date, DateWindow};

/// Label of the derived cases row
pub const CASES_ROW_LABEL: &str = "NO OF CASES";

/// How records are split into date buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketMode {
    /// Up to the day before `reference`, then `reference` itself
    SingleDate { reference: NaiveDate },
    /// Opening before the window, production inside it
    Range(DateWindow),
}

impl BucketMode {
    /// Latest production date that still contributes, if any
    pub fn cutoff(&self) -> Option<NaiveDate> {
        match self {
            BucketMode::SingleDate { reference } => Some(*reference),
            BucketMode::Range(window) => window.to,
        }
    }

    /// Index of the bucket a production date falls into
    fn bucket_of(&self, date: NaiveDate) -> Option<usize> {
        match self {
            BucketMode::SingleDate { reference } => {
                if date < *reference {
                    Some(0)
                } else if date == *reference {
                    Some(1)
                } else {
                    None
                }
            }
            BucketMode::Range(window) => {
                if window.is_opening(date) {
                    Some(0)
                } else if window.is_production(date) {
                    Some(1)
                } else {
                    None
                }
            }
        }
    }

    fn row_labels(&self) -> [(RowKind, String); 3] {
        match self {
            BucketMode::SingleDate { reference } => {
                let previous = reference.pred_opt().unwrap_or(*reference);
                [
                    (RowKind::UpToPrevious, format!("Up to {}", display_date(previous))),
                    (RowKind::SelectedDay, display_date(*reference)),
                    (RowKind::Total, "TOTAL".to_string()),
                ]
            }
            BucketMode::Range(_) => [
                (RowKind::Opening, "Opening".to_string()),
                (RowKind::Production, "Production".to_string()),
                (RowKind::Total, "Total".to_string()),
            ],
        }
    }

    pub fn has_cases_row(&self) -> bool {
        matches!(self, BucketMode::SingleDate { .. })
    }
}

/// Per-column sums of the two date buckets of one group
#[derive(Debug, Clone, PartialEq)]
pub struct Buckets {
    pub earlier: Vec<Decimal>,
    pub current: Vec<Decimal>,
}

impl Buckets {
    pub fn zeroed(width: usize) -> Self {
        Self {
            earlier: vec![Decimal::ZERO; width],
            current: vec![Decimal::ZERO; width],
        }
    }

    /// Accumulate items into buckets.
    ///
    /// `place` yields the production date, column index and quantity of an
    /// item, or `None` when the item does not map to a column. Each column is
    /// summed on its own.
    pub fn accumulate<'t, T, I, F>(items: I, width: usize, mode: &BucketMode, place: F) -> Self
    where
        T: 't,
        I: IntoIterator<Item = &'t T>,
        F: Fn(&T) -> Option<(NaiveDate, usize, Decimal)>,
    {
        let mut buckets = Self::zeroed(width);

        for item in items {
            let Some((date, column, quantity)) = place(item) else {
                continue;
            };
            if column >= width {
                continue;
            }
            match mode.bucket_of(date) {
                Some(0) => buckets.earlier[column] += quantity,
                Some(_) => buckets.current[column] += quantity,
                None => {}
            }
        }

        buckets
    }

    pub fn total(&self) -> Vec<Decimal> {
        self.earlier
            .iter()
            .zip(&self.current)
            .map(|(earlier, current)| earlier + current)
            .collect()
    }

    /// No stock in any bucket or column
    pub fn is_zero(&self) -> bool {
        self.earlier
            .iter()
            .chain(&self.current)
            .all(|value| value.is_zero())
            && self.total().iter().all(|value| value.is_zero())
    }

    /// The three bucket rows in display order
    pub fn into_rows(self, mode: &BucketMode) -> Vec<StockRow> {
        let total = self.total();
        let [earlier, current, sum] = mode.row_labels();
        vec![
            StockRow::new(earlier.0, earlier.1, self.earlier),
            StockRow::new(current.0, current.1, self.current),
            StockRow::new(sum.0, sum.1, total),
        ]
    }
}

pub fn cases_row(values: Vec<Decimal>) -> StockRow {
    StockRow::new(RowKind::Cases, CASES_ROW_LABEL, values)
}
