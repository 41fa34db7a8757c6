//! Section E: measures already implemented, with supporting evidence.

use serde::{Deserialize, Serialize};

use super::savings_opportunities::{SavingOpportunity, validate_opportunity};
use super::{Section, SectionId, ValidationError};

/// One implemented measure: the shared opportunity shape plus evidence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImplementedMeasure {
    /// The measure itself, in the section D shape.
    pub measure: SavingOpportunity,
    /// Location of uploaded supporting evidence, when provided.
    pub evidence_url: Option<String>,
}

/// Section E payload: the list of implemented measures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImplementedMeasures {
    pub measures: Vec<ImplementedMeasure>,
}

impl Section for ImplementedMeasures {
    fn id(&self) -> SectionId {
        SectionId::ImplementedMeasures
    }

    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (i, implemented) in self.measures.iter().enumerate() {
            let prefix = format!("measures[{i}]");
            validate_opportunity(&mut errors, &prefix, &implemented.measure);

            if let Some(url) = implemented.evidence_url.as_deref() {
                if url.trim().is_empty() {
                    errors.push(ValidationError::new(
                        format!("{prefix}.evidence_url"),
                        "must not be blank when present",
                    ));
                }
            }
        }
        errors
    }
}
