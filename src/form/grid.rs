//! Reactive wrapper around a consumption grid.
//!
//! Cell mutation entry points recompute the derived averages
//! synchronously and invoke registered observers directly, with no event
//! loop in between. Each `WatchedGrid` is owned by a single session;
//! there is no concurrent writer.

use super::averages::GridAverages;
use super::types::{ConsumptionGrid, Month, YearColumn};

type Observer = Box<dyn FnMut(&GridAverages)>;

/// A consumption grid plus its always-current derived averages.
pub struct WatchedGrid {
    grid: ConsumptionGrid,
    averages: GridAverages,
    observers: Vec<Observer>,
}

impl WatchedGrid {
    /// Wraps a grid, computing the initial averages immediately.
    pub fn new(grid: ConsumptionGrid) -> Self {
        let averages = GridAverages::from_grid(&grid);
        Self {
            grid,
            averages,
            observers: Vec::new(),
        }
    }

    /// Registers an observer invoked after every mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(&GridAverages) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Writes one cell and recomputes the averages.
    ///
    /// The raw string is stored as-is; malformed input is tolerated and
    /// handled by the averaging rules rather than rejected here.
    pub fn set_cell(&mut self, month: Month, column: YearColumn, value: &str) {
        *self.grid.row_mut(month).cell_mut(column) = Some(value.to_string());
        self.refresh();
    }

    /// Clears one cell back to the untouched state and recomputes.
    pub fn clear_cell(&mut self, month: Month, column: YearColumn) {
        *self.grid.row_mut(month).cell_mut(column) = None;
        self.refresh();
    }

    /// Sets the grid's measurement unit. Does not affect the averages.
    pub fn set_unit(&mut self, unit: &str) {
        self.grid.unit = Some(unit.to_string());
    }

    /// Current grid snapshot.
    pub fn grid(&self) -> &ConsumptionGrid {
        &self.grid
    }

    /// Current derived averages.
    pub fn averages(&self) -> &GridAverages {
        &self.averages
    }

    /// Consumes the wrapper, returning the underlying grid.
    pub fn into_grid(self) -> ConsumptionGrid {
        self.grid
    }

    fn refresh(&mut self) {
        self.averages = GridAverages::from_grid(&self.grid);
        let averages = &self.averages;
        for observer in &mut self.observers {
            observer(averages);
        }
    }
}
