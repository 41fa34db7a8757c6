//! Monthly consumption grid and its derived averages.

pub mod averages;
/// Reactive grid wrapper that recomputes averages on every edit.
pub mod grid;
pub mod types;

// Re-export the main types for convenience
pub use averages::GridAverages;
pub use grid::WatchedGrid;
pub use types::Carrier;
pub use types::ConsumptionGrid;
pub use types::Month;
pub use types::MonthlyEntry;
pub use types::YearColumn;
