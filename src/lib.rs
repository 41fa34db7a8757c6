//! Five-section energy audit report: survey data model, consumption
//! averaging, location catalog lookups, and the submission flow.

#[cfg(feature = "api")]
pub mod api;
pub mod catalog;
/// Consumption grid, averaging engine, and reactive grid wrapper.
pub mod form;
pub mod io;
pub mod report;
/// Survey section definitions and validation.
pub mod sections;
