//! The five survey sections of the audit report.

/// Section C: baseline consumption analysis and indicators.
pub mod baseline_analysis;
/// Section A: building characterization.
pub mod building_profile;
/// Section B: energy carriers, costs, and monthly consumption.
pub mod energy_sources;
/// Section E: implemented measures with supporting evidence.
pub mod implemented_measures;
/// Section D: identified saving opportunities.
pub mod savings_opportunities;

use std::fmt;

use serde::{Deserialize, Serialize};

// Re-export the main types for convenience
pub use baseline_analysis::BaselineAnalysis;
pub use building_profile::BuildingProfile;
pub use energy_sources::EnergySources;
pub use implemented_measures::ImplementedMeasures;
pub use savings_opportunities::SavingsOpportunities;

/// Identifier of one report section, in fixed submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    BuildingProfile,
    EnergySources,
    BaselineAnalysis,
    SavingsOpportunities,
    ImplementedMeasures,
}

impl SectionId {
    /// All sections in submission order.
    pub const ALL: [SectionId; 5] = [
        SectionId::BuildingProfile,
        SectionId::EnergySources,
        SectionId::BaselineAnalysis,
        SectionId::SavingsOpportunities,
        SectionId::ImplementedMeasures,
    ];

    /// The section that follows this one, or `None` after the last.
    pub fn next(self) -> Option<SectionId> {
        let i = SectionId::ALL.iter().position(|&s| s == self)?;
        SectionId::ALL.get(i + 1).copied()
    }

    /// Snake-case key used for storage and field paths.
    pub fn key(self) -> &'static str {
        match self {
            SectionId::BuildingProfile => "building_profile",
            SectionId::EnergySources => "energy_sources",
            SectionId::BaselineAnalysis => "baseline_analysis",
            SectionId::SavingsOpportunities => "savings_opportunities",
            SectionId::ImplementedMeasures => "implemented_measures",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            SectionId::BuildingProfile => "Section A — Building characterization",
            SectionId::EnergySources => "Section B — Energy sources and consumption",
            SectionId::BaselineAnalysis => "Section C — Baseline analysis",
            SectionId::SavingsOpportunities => "Section D — Saving opportunities",
            SectionId::ImplementedMeasures => "Section E — Implemented measures",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Two-state answer used by the conditional questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

/// Validation failure with a dotted field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted field path (e.g., `"energy_sources.other_specification"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error: {} — {}", self.field, self.message)
    }
}

/// Contract implemented by every survey section.
pub trait Section {
    /// Which report section this payload belongs to.
    fn id(&self) -> SectionId;

    /// Checks all field constraints; empty result means valid.
    fn validate(&self) -> Vec<ValidationError>;
}

/// One submitted section payload, tagged by section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "section", content = "data", rename_all = "snake_case")]
pub enum SectionRecord {
    BuildingProfile(BuildingProfile),
    EnergySources(EnergySources),
    BaselineAnalysis(BaselineAnalysis),
    SavingsOpportunities(SavingsOpportunities),
    ImplementedMeasures(ImplementedMeasures),
}

impl SectionRecord {
    /// The section this record belongs to.
    pub fn id(&self) -> SectionId {
        match self {
            SectionRecord::BuildingProfile(_) => SectionId::BuildingProfile,
            SectionRecord::EnergySources(_) => SectionId::EnergySources,
            SectionRecord::BaselineAnalysis(_) => SectionId::BaselineAnalysis,
            SectionRecord::SavingsOpportunities(_) => SectionId::SavingsOpportunities,
            SectionRecord::ImplementedMeasures(_) => SectionId::ImplementedMeasures,
        }
    }

    /// Validates the wrapped payload.
    pub fn validate(&self) -> Vec<ValidationError> {
        match self {
            SectionRecord::BuildingProfile(s) => s.validate(),
            SectionRecord::EnergySources(s) => s.validate(),
            SectionRecord::BaselineAnalysis(s) => s.validate(),
            SectionRecord::SavingsOpportunities(s) => s.validate(),
            SectionRecord::ImplementedMeasures(s) => s.validate(),
        }
    }
}

/// Pushes an error when a required field is blank.
pub(crate) fn require(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(field, "is required"));
    }
}

/// Pushes an error when a present, non-empty value contains non-digits.
pub(crate) fn digits_only(errors: &mut Vec<ValidationError>, field: &str, value: Option<&str>) {
    if let Some(v) = value {
        let v = v.trim();
        if !v.is_empty() && !v.chars().all(|c| c.is_ascii_digit()) {
            errors.push(ValidationError::new(field, "must contain only digits"));
        }
    }
}

/// Pushes an error when a present, non-empty value is not a number.
pub(crate) fn numeric(errors: &mut Vec<ValidationError>, field: &str, value: Option<&str>) {
    if let Some(v) = value {
        let v = v.trim();
        if !v.is_empty() && v.parse::<f64>().is_err() {
            errors.push(ValidationError::new(field, "must be numeric"));
        }
    }
}

/// Pushes an error when a present, non-empty value is outside `options`.
pub(crate) fn one_of(
    errors: &mut Vec<ValidationError>,
    field: &str,
    value: Option<&str>,
    options: &[&str],
) {
    if let Some(v) = value {
        if !v.trim().is_empty() && !options.contains(&v) {
            errors.push(ValidationError::new(
                field,
                format!("must be one of: {}", options.join(", ")),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_order_is_a_through_e() {
        assert_eq!(
            SectionId::BuildingProfile.next(),
            Some(SectionId::EnergySources)
        );
        assert_eq!(
            SectionId::SavingsOpportunities.next(),
            Some(SectionId::ImplementedMeasures)
        );
        assert_eq!(SectionId::ImplementedMeasures.next(), None);
    }

    #[test]
    fn yes_no_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&YesNo::Yes).unwrap(), "\"yes\"");
        let no: YesNo = serde_json::from_str("\"no\"").unwrap();
        assert_eq!(no, YesNo::No);
    }

    #[test]
    fn digits_only_accepts_empty_and_missing() {
        let mut errors = Vec::new();
        digits_only(&mut errors, "f", None);
        digits_only(&mut errors, "f", Some(""));
        digits_only(&mut errors, "f", Some("0420"));
        assert!(errors.is_empty());

        digits_only(&mut errors, "f", Some("12a"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn numeric_accepts_decimals() {
        let mut errors = Vec::new();
        numeric(&mut errors, "f", Some("3.14"));
        numeric(&mut errors, "f", Some("-2"));
        assert!(errors.is_empty());

        numeric(&mut errors, "f", Some("three"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn record_id_matches_payload() {
        let record = SectionRecord::BuildingProfile(BuildingProfile::default());
        assert_eq!(record.id(), SectionId::BuildingProfile);
    }
}
