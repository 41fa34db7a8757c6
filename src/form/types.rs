//! Core grid types: months, year columns, carriers, and the consumption grid.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit labels offered for monthly consumption entries.
pub const UNIT_OPTIONS: &[&str] = &[
    "kWh/month",
    "m3/month",
    "J/month",
    "kcal/month",
    "kg/month",
    "lb/month",
    "tonnes/month",
    "gallon/month",
    "litre/month",
];

/// Calendar month, in fixed January-to-December order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All twelve months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Zero-based position within the calendar year.
    pub fn index(self) -> usize {
        Month::ALL.iter().position(|&m| m == self).unwrap_or(0)
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the three year columns tracked per grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearColumn {
    Year1,
    Year2,
    Year3,
}

impl YearColumn {
    /// All three columns in order.
    pub const ALL: [YearColumn; 3] = [YearColumn::Year1, YearColumn::Year2, YearColumn::Year3];

    /// Field key used in serialized payloads and error paths.
    pub fn key(self) -> &'static str {
        match self {
            YearColumn::Year1 => "year1",
            YearColumn::Year2 => "year2",
            YearColumn::Year3 => "year3",
        }
    }
}

/// Energy carrier tracked independently by the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Carrier {
    Electricity,
    NaturalGas,
    Diesel,
    Other,
}

impl Carrier {
    /// All four carriers in survey order.
    pub const ALL: [Carrier; 4] = [
        Carrier::Electricity,
        Carrier::NaturalGas,
        Carrier::Diesel,
        Carrier::Other,
    ];

    /// Snake-case key used in field paths and CLI arguments.
    pub fn key(self) -> &'static str {
        match self {
            Carrier::Electricity => "electricity",
            Carrier::NaturalGas => "natural_gas",
            Carrier::Diesel => "diesel",
            Carrier::Other => "other",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Carrier::Electricity => "Electricity",
            Carrier::NaturalGas => "Natural gas",
            Carrier::Diesel => "Diesel",
            Carrier::Other => "Other",
        }
    }

    /// Parses a CLI-style key (`electricity`, `natural_gas`, ...).
    pub fn from_key(key: &str) -> Option<Carrier> {
        Carrier::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the consumption grid: a month and up to three yearly cells.
///
/// Cells are kept as raw strings exactly as entered; parsing happens in
/// the averaging engine, which tolerates missing and malformed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyEntry {
    /// Calendar month this row belongs to.
    #[serde(default)]
    pub month: Month,
    /// Raw cell value for the first tracked year.
    #[serde(default)]
    pub year1: Option<String>,
    /// Raw cell value for the second tracked year.
    #[serde(default)]
    pub year2: Option<String>,
    /// Raw cell value for the third tracked year.
    #[serde(default)]
    pub year3: Option<String>,
}

impl Default for Month {
    fn default() -> Self {
        Month::January
    }
}

impl MonthlyEntry {
    /// Returns the raw cell for the given year column, if any.
    pub fn cell(&self, column: YearColumn) -> Option<&str> {
        match column {
            YearColumn::Year1 => self.year1.as_deref(),
            YearColumn::Year2 => self.year2.as_deref(),
            YearColumn::Year3 => self.year3.as_deref(),
        }
    }

    /// Mutable access to the raw cell for the given year column.
    pub fn cell_mut(&mut self, column: YearColumn) -> &mut Option<String> {
        match column {
            YearColumn::Year1 => &mut self.year1,
            YearColumn::Year2 => &mut self.year2,
            YearColumn::Year3 => &mut self.year3,
        }
    }
}

/// The 12-row by 3-year consumption matrix for one energy carrier.
///
/// Always holds exactly twelve rows; [`ConsumptionGrid::empty`] builds
/// them in calendar order and editing never adds or removes rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionGrid {
    /// Measurement unit for all cells; one of [`UNIT_OPTIONS`] when set.
    #[serde(default)]
    pub unit: Option<String>,
    /// The twelve monthly rows, January first.
    pub monthly: [MonthlyEntry; 12],
}

impl ConsumptionGrid {
    /// Builds an all-empty grid with rows in calendar order.
    pub fn empty() -> Self {
        Self {
            unit: None,
            monthly: Month::ALL.map(|month| MonthlyEntry {
                month,
                year1: None,
                year2: None,
                year3: None,
            }),
        }
    }

    /// Returns the row for the given month.
    pub fn row(&self, month: Month) -> &MonthlyEntry {
        &self.monthly[month.index()]
    }

    /// Mutable access to the row for the given month.
    pub fn row_mut(&mut self, month: Month) -> &mut MonthlyEntry {
        &mut self.monthly[month.index()]
    }

    /// True when the twelve rows list the calendar months in order.
    ///
    /// Deserialized grids can arrive in any row order; validation uses
    /// this to reject non-canonical layouts.
    pub fn in_calendar_order(&self) -> bool {
        self.monthly.iter().map(|e| e.month).eq(Month::ALL)
    }
}

impl Default for ConsumptionGrid {
    fn default() -> Self {
        Self::empty()
    }
}
