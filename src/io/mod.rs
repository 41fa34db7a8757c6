//! File export for consumption data.

pub mod export;
