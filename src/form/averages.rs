//! Row and column averaging for the monthly consumption grid.
//!
//! Cells are raw strings. A missing or empty cell counts as numeric zero
//! and is included in the mean; a cell that fails to parse (or parses to
//! NaN) is excluded from both the numerator and the denominator. All
//! averages are formatted with exactly two fraction digits; an empty
//! included set yields `"0.00"`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{ConsumptionGrid, Month, YearColumn};

/// Parses one raw cell under the grid's inclusion policy.
///
/// Returns `Some(value)` for cells that participate in an average and
/// `None` for excluded ones. Missing and empty cells are coerced to zero;
/// an untouched cell means no consumption, not unknown consumption.
fn parse_cell(cell: Option<&str>) -> Option<f64> {
    let raw = cell.unwrap_or("").trim();
    if raw.is_empty() {
        return Some(0.0);
    }
    raw.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Formats an average with exactly two fraction digits.
///
/// Uses the standard formatter, so halfway values round to even. The
/// tie-break only matters at exact decimal midpoints and is applied
/// consistently everywhere.
fn format_average(value: f64) -> String {
    format!("{value:.2}")
}

/// Mean of the included cells, `"0.00"` when none are included.
fn average<'a>(cells: impl IntoIterator<Item = Option<&'a str>>) -> String {
    let mut sum = 0.0;
    let mut count = 0u32;
    for value in cells.into_iter().filter_map(parse_cell) {
        sum += value;
        count += 1;
    }
    if count == 0 {
        return "0.00".to_string();
    }
    format_average(sum / f64::from(count))
}

/// Average across the three year cells of a single month row.
pub fn row_average(year1: Option<&str>, year2: Option<&str>, year3: Option<&str>) -> String {
    average([year1, year2, year3])
}

/// Average down one year column across the twelve month rows.
pub fn column_average<'a>(cells: impl IntoIterator<Item = Option<&'a str>>) -> String {
    average(cells)
}

/// Derived averages for one consumption grid.
///
/// Pure function of the grid snapshot: recomputing on unchanged input
/// yields identical output, and nothing here is persisted independently
/// of the source cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridAverages {
    /// Per-month averages, January first, two fraction digits each.
    pub rows: [String; 12],
    /// Average over the twelve rows of the first year column.
    pub year1: String,
    /// Average over the twelve rows of the second year column.
    pub year2: String,
    /// Average over the twelve rows of the third year column.
    pub year3: String,
}

impl GridAverages {
    /// Recomputes every row and column average from the grid snapshot.
    pub fn from_grid(grid: &ConsumptionGrid) -> Self {
        let rows = Month::ALL
            .map(|m| grid.row(m))
            .map(|e| row_average(e.year1.as_deref(), e.year2.as_deref(), e.year3.as_deref()));

        let column = |col: YearColumn| column_average(grid.monthly.iter().map(|e| e.cell(col)));

        Self {
            rows,
            year1: column(YearColumn::Year1),
            year2: column(YearColumn::Year2),
            year3: column(YearColumn::Year3),
        }
    }

    /// The column average for the given year column.
    pub fn column(&self, column: YearColumn) -> &str {
        match column {
            YearColumn::Year1 => &self.year1,
            YearColumn::Year2 => &self.year2,
            YearColumn::Year3 => &self.year3,
        }
    }
}

impl fmt::Display for GridAverages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Consumption Averages ---")?;
        for (month, avg) in Month::ALL.iter().zip(&self.rows) {
            writeln!(f, "{:<10} {:>10}", month.label(), avg)?;
        }
        write!(
            f,
            "Yearly     {:>10} {:>10} {:>10}",
            self.year1, self.year2, self.year3
        )
    }
}
