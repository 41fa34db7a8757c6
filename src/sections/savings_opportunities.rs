//! Section D: identified energy saving opportunities.

use serde::{Deserialize, Serialize};

use super::{Section, SectionId, ValidationError, YesNo, numeric, one_of, require};
use crate::form::types::UNIT_OPTIONS;

/// Measure categories offered by the form.
pub const MEASURE_TYPES: &[&str] = &[
    "Good operational practices",
    "Passive measures",
    "Technology retrofit",
    "Fuel substitution",
    "Renewable energy sources",
    "Other",
];

/// Financing mechanisms offered by the form.
pub const FINANCING_TYPES: &[&str] = &[
    "Own resources",
    "Public credit operations",
    "Service contracts",
    "Public-private partnerships",
    "Energy performance contract",
    "Other",
];

/// Estimated savings of one measure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatedSavings {
    pub value: Option<String>,
    /// Unit of the savings value, one of the grid units when set.
    pub unit: Option<String>,
    /// Savings as a percentage of baseline consumption.
    pub percentage: Option<String>,
}

/// Implementation cost and financing answers for one measure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostAndFinancing {
    pub implementation_cost: Option<String>,
    pub has_financing: Option<YesNo>,
    /// Mechanism, one of [`FINANCING_TYPES`]; required when financed.
    pub financing_mechanism: Option<String>,
}

/// One saving opportunity, identified or implemented.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SavingOpportunity {
    /// Measure category, one of [`MEASURE_TYPES`] when set.
    pub measure_type: Option<String>,
    /// What "Other" stands for; required for that category.
    pub other_specification: Option<String>,
    pub description: Option<String>,
    pub estimated_savings: EstimatedSavings,
    pub cost_and_financing: CostAndFinancing,
}

/// Validates one opportunity under the given field-path prefix.
///
/// Shared between sections D and E, which collect the same measure shape.
pub(crate) fn validate_opportunity(
    errors: &mut Vec<ValidationError>,
    prefix: &str,
    opportunity: &SavingOpportunity,
) {
    one_of(
        errors,
        &format!("{prefix}.measure_type"),
        opportunity.measure_type.as_deref(),
        MEASURE_TYPES,
    );
    if opportunity.measure_type.as_deref() == Some("Other") {
        let spec = opportunity.other_specification.as_deref().unwrap_or("");
        require(errors, &format!("{prefix}.other_specification"), spec);
    }

    let savings = &opportunity.estimated_savings;
    numeric(
        errors,
        &format!("{prefix}.estimated_savings.value"),
        savings.value.as_deref(),
    );
    numeric(
        errors,
        &format!("{prefix}.estimated_savings.percentage"),
        savings.percentage.as_deref(),
    );
    one_of(
        errors,
        &format!("{prefix}.estimated_savings.unit"),
        savings.unit.as_deref(),
        UNIT_OPTIONS,
    );

    let financing = &opportunity.cost_and_financing;
    numeric(
        errors,
        &format!("{prefix}.cost_and_financing.implementation_cost"),
        financing.implementation_cost.as_deref(),
    );
    if financing.has_financing == Some(YesNo::Yes) {
        let mechanism = financing.financing_mechanism.as_deref().unwrap_or("");
        require(
            errors,
            &format!("{prefix}.cost_and_financing.financing_mechanism"),
            mechanism,
        );
    }
    one_of(
        errors,
        &format!("{prefix}.cost_and_financing.financing_mechanism"),
        financing.financing_mechanism.as_deref(),
        FINANCING_TYPES,
    );
}

/// Section D payload: the list of identified opportunities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SavingsOpportunities {
    pub opportunities: Vec<SavingOpportunity>,
}

impl Section for SavingsOpportunities {
    fn id(&self) -> SectionId {
        SectionId::SavingsOpportunities
    }

    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (i, opportunity) in self.opportunities.iter().enumerate() {
            validate_opportunity(&mut errors, &format!("opportunities[{i}]"), opportunity);
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opportunity() -> SavingOpportunity {
        SavingOpportunity {
            measure_type: Some("Passive measures".to_string()),
            description: Some("Window film on the west facade".to_string()),
            estimated_savings: EstimatedSavings {
                value: Some("350".to_string()),
                unit: Some("kWh/month".to_string()),
                percentage: Some("4".to_string()),
            },
            cost_and_financing: CostAndFinancing {
                implementation_cost: Some("12000".to_string()),
                has_financing: Some(YesNo::Yes),
                financing_mechanism: Some("Own resources".to_string()),
            },
            ..SavingOpportunity::default()
        }
    }

    #[test]
    fn empty_list_is_valid() {
        assert!(SavingsOpportunities::default().validate().is_empty());
    }

    #[test]
    fn well_formed_opportunity_is_valid() {
        let section = SavingsOpportunities {
            opportunities: vec![opportunity()],
        };
        let errors = section.validate();
        assert!(errors.is_empty(), "expected valid: {errors:?}");
    }

    #[test]
    fn other_measure_requires_specification() {
        let mut o = opportunity();
        o.measure_type = Some("Other".to_string());
        o.other_specification = None;
        let section = SavingsOpportunities {
            opportunities: vec![o],
        };
        let errors = section.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "opportunities[0].other_specification")
        );
    }

    #[test]
    fn financing_yes_requires_mechanism() {
        let mut o = opportunity();
        o.cost_and_financing.financing_mechanism = None;
        let section = SavingsOpportunities {
            opportunities: vec![o],
        };
        let errors = section.validate();
        assert!(errors.iter().any(|e| {
            e.field == "opportunities[0].cost_and_financing.financing_mechanism"
        }));
    }

    #[test]
    fn errors_carry_list_position() {
        let mut bad = opportunity();
        bad.measure_type = Some("Guesswork".to_string());
        let section = SavingsOpportunities {
            opportunities: vec![opportunity(), bad],
        };
        let errors = section.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "opportunities[1].measure_type");
    }
}
