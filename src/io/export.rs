//! CSV export for a consumption grid and its derived averages.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::form::averages::GridAverages;
use crate::form::types::ConsumptionGrid;

/// Column header for grid CSV export.
const HEADER: &str = "month,year1,year2,year3,row_average";

/// Exports one consumption grid to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_grid_csv(grid: &ConsumptionGrid, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_grid_csv(grid, buf)
}

/// Writes one consumption grid as CSV to any writer.
///
/// Emits a header row, the twelve month rows with their row averages,
/// and a final `yearly_average` row carrying the three column averages.
/// Averages are recomputed from the grid snapshot, so the exported file
/// is always internally consistent. Output is deterministic for
/// identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_grid_csv(grid: &ConsumptionGrid, writer: impl Write) -> io::Result<()> {
    let averages = GridAverages::from_grid(grid);
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(','))?;

    // Month rows
    for (entry, row_avg) in grid.monthly.iter().zip(&averages.rows) {
        wtr.write_record(&[
            entry.month.label(),
            entry.year1.as_deref().unwrap_or(""),
            entry.year2.as_deref().unwrap_or(""),
            entry.year3.as_deref().unwrap_or(""),
            row_avg.as_str(),
        ])?;
    }

    // Column averages
    wtr.write_record(&[
        "yearly_average",
        averages.year1.as_str(),
        averages.year2.as_str(),
        averages.year3.as_str(),
        "",
    ])?;

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::types::{Month, YearColumn};

    fn make_grid() -> ConsumptionGrid {
        let mut grid = ConsumptionGrid::empty();
        grid.unit = Some("kWh/month".to_string());
        for month in Month::ALL {
            grid.row_mut(month).year1 = Some("10".to_string());
            grid.row_mut(month).year2 = Some("20".to_string());
        }
        grid
    }

    #[test]
    fn header_and_row_count() {
        let mut buf = Vec::new();
        write_grid_csv(&make_grid(), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        assert_eq!(lines.first().copied(), Some(HEADER));
        // 1 header + 12 months + 1 yearly row
        assert_eq!(lines.len(), 14);
    }

    #[test]
    fn averages_row_matches_engine() {
        let mut buf = Vec::new();
        write_grid_csv(&make_grid(), &mut buf).ok();
        let output = String::from_utf8(buf).unwrap_or_default();
        let last = output.lines().last().unwrap_or("");
        assert_eq!(last, "yearly_average,10.00,20.00,0.00,");
    }

    #[test]
    fn missing_cells_export_as_empty_fields() {
        let mut grid = make_grid();
        grid.row_mut(Month::January).year1 = None;
        let mut buf = Vec::new();
        write_grid_csv(&grid, &mut buf).ok();
        let output = String::from_utf8(buf).unwrap_or_default();
        let january = output.lines().nth(1).unwrap_or("");
        // (0 + 20 + 0) / 3 for the row average
        assert_eq!(january, "January,,20,,6.67");
    }

    #[test]
    fn deterministic_output() {
        let grid = make_grid();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_grid_csv(&grid, &mut buf1).ok();
        write_grid_csv(&grid, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn round_trip_parseable() {
        let mut buf = Vec::new();
        write_grid_csv(&make_grid(), &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let mut rows = 0;
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            assert_eq!(rec.map(|r| r.len()), Some(5));
            rows += 1;
        }
        assert_eq!(rows, 13);
    }

    #[test]
    fn yearly_row_tracks_edits() {
        let mut grid = make_grid();
        *grid.row_mut(Month::December).cell_mut(YearColumn::Year3) = Some("120".to_string());
        let mut buf = Vec::new();
        write_grid_csv(&grid, &mut buf).ok();
        let output = String::from_utf8(buf).unwrap_or_default();
        let last = output.lines().last().unwrap_or("");
        assert_eq!(last, "yearly_average,10.00,20.00,10.00,");
    }
}
