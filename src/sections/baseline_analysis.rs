//! Section C: baseline consumption models and energy performance indicators.

use serde::{Deserialize, Serialize};

use super::energy_sources::CarrierSet;
use super::{Section, SectionId, ValidationError, numeric, one_of, require};
use crate::form::types::{Carrier, UNIT_OPTIONS};

/// Which baseline model types were used for the analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelKinds {
    /// Absolute-value baseline.
    pub absolute_value: bool,
    /// Ratio-of-values baseline.
    pub ratio: bool,
    /// Statistical-model baseline.
    pub statistical: bool,
}

impl ModelKinds {
    pub fn any(&self) -> bool {
        self.absolute_value || self.ratio || self.statistical
    }
}

/// One value per energy carrier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerCarrier<T> {
    pub electricity: T,
    pub natural_gas: T,
    pub diesel: T,
    pub other: T,
}

impl<T> PerCarrier<T> {
    /// The entry for the given carrier.
    pub fn get(&self, carrier: Carrier) -> &T {
        match carrier {
            Carrier::Electricity => &self.electricity,
            Carrier::NaturalGas => &self.natural_gas,
            Carrier::Diesel => &self.diesel,
            Carrier::Other => &self.other,
        }
    }
}

/// Absolute-value baseline entry for one carrier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AbsoluteEntry {
    /// Carrier specification, used by the "other" slot only.
    pub specification: Option<String>,
    pub monthly_consumption: Option<String>,
    pub unit: Option<String>,
    pub std_deviation: Option<String>,
}

/// Ratio-of-values baseline entry for one carrier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RatioEntry {
    pub specification: Option<String>,
    pub monthly_consumption: Option<String>,
    pub unit: Option<String>,
    /// Denominator variable of the ratio.
    pub ratio_variable: Option<String>,
    pub other_specification: Option<String>,
    pub std_deviation: Option<String>,
}

/// Statistical-model baseline entry for one carrier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatisticalEntry {
    pub specification: Option<String>,
    pub monthly_consumption: Option<String>,
    pub unit: Option<String>,
    /// Explanatory variables of the model.
    pub model_variables: Option<String>,
    pub other_variables: Option<String>,
    pub max_value: Option<String>,
    pub min_value: Option<String>,
    pub mean_value: Option<String>,
    pub std_deviation: Option<String>,
    pub p_value: Option<String>,
    pub r_squared: Option<String>,
}

/// Per-area / per-worker indicator pair for one energy family.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorPair {
    pub per_area: Option<String>,
    pub per_area_unit: Option<String>,
    pub per_worker: Option<String>,
    pub per_worker_unit: Option<String>,
}

/// Free-form indicator defined by the auditor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomIndicator {
    pub name: Option<String>,
    pub value: Option<String>,
    pub unit: Option<String>,
}

/// Energy performance indicators block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Indicators {
    pub total_energy: IndicatorPair,
    pub electricity: IndicatorPair,
    pub hydrocarbons: IndicatorPair,
    pub renewables: IndicatorPair,
    pub custom: Vec<CustomIndicator>,
}

/// Section C payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineAnalysis {
    /// Baseline period the models refer to.
    pub base_period: String,
    /// Carriers covered by the analysis.
    pub carriers: CarrierSet,
    /// Model types applied.
    pub models: ModelKinds,
    pub absolute_value: PerCarrier<AbsoluteEntry>,
    pub ratio: PerCarrier<RatioEntry>,
    pub statistical: PerCarrier<StatisticalEntry>,
    pub indicators: Indicators,
}

impl Section for BaselineAnalysis {
    fn id(&self) -> SectionId {
        SectionId::BaselineAnalysis
    }

    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        require(&mut errors, "base_period", &self.base_period);
        if !self.models.any() {
            errors.push(ValidationError::new(
                "models",
                "at least one model type must be selected",
            ));
        }

        for carrier in Carrier::ALL {
            let key = carrier.key();

            let a = self.absolute_value.get(carrier);
            numeric(
                &mut errors,
                &format!("absolute_value.{key}.monthly_consumption"),
                a.monthly_consumption.as_deref(),
            );
            numeric(
                &mut errors,
                &format!("absolute_value.{key}.std_deviation"),
                a.std_deviation.as_deref(),
            );
            one_of(
                &mut errors,
                &format!("absolute_value.{key}.unit"),
                a.unit.as_deref(),
                UNIT_OPTIONS,
            );

            let r = self.ratio.get(carrier);
            numeric(
                &mut errors,
                &format!("ratio.{key}.monthly_consumption"),
                r.monthly_consumption.as_deref(),
            );
            numeric(
                &mut errors,
                &format!("ratio.{key}.std_deviation"),
                r.std_deviation.as_deref(),
            );

            let s = self.statistical.get(carrier);
            for (field, value) in [
                ("monthly_consumption", &s.monthly_consumption),
                ("max_value", &s.max_value),
                ("min_value", &s.min_value),
                ("mean_value", &s.mean_value),
                ("std_deviation", &s.std_deviation),
                ("p_value", &s.p_value),
                ("r_squared", &s.r_squared),
            ] {
                numeric(
                    &mut errors,
                    &format!("statistical.{key}.{field}"),
                    value.as_deref(),
                );
            }
        }

        for (name, pair) in [
            ("total_energy", &self.indicators.total_energy),
            ("electricity", &self.indicators.electricity),
            ("hydrocarbons", &self.indicators.hydrocarbons),
            ("renewables", &self.indicators.renewables),
        ] {
            numeric(
                &mut errors,
                &format!("indicators.{name}.per_area"),
                pair.per_area.as_deref(),
            );
            numeric(
                &mut errors,
                &format!("indicators.{name}.per_worker"),
                pair.per_worker.as_deref(),
            );
        }

        for (i, custom) in self.indicators.custom.iter().enumerate() {
            numeric(
                &mut errors,
                &format!("indicators.custom[{i}].value"),
                custom.value.as_deref(),
            );
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> BaselineAnalysis {
        BaselineAnalysis {
            base_period: "2023".to_string(),
            models: ModelKinds {
                absolute_value: true,
                ..ModelKinds::default()
            },
            ..BaselineAnalysis::default()
        }
    }

    #[test]
    fn base_period_and_model_required() {
        let errors = BaselineAnalysis::default().validate();
        assert!(errors.iter().any(|e| e.field == "base_period"));
        assert!(errors.iter().any(|e| e.field == "models"));

        assert!(filled().validate().is_empty());
    }

    #[test]
    fn statistical_fields_must_be_numeric() {
        let mut section = filled();
        section.statistical.electricity.p_value = Some("significant".to_string());
        section.statistical.electricity.r_squared = Some("0.93".to_string());
        let errors = section.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "statistical.electricity.p_value")
        );
        assert!(
            !errors
                .iter()
                .any(|e| e.field == "statistical.electricity.r_squared")
        );
    }

    #[test]
    fn indicator_values_must_be_numeric() {
        let mut section = filled();
        section.indicators.total_energy.per_area = Some("1.8".to_string());
        section.indicators.renewables.per_worker = Some("n/a".to_string());
        let errors = section.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "indicators.renewables.per_worker");
    }

    #[test]
    fn custom_indicators_checked_by_position() {
        let mut section = filled();
        section.indicators.custom = vec![
            CustomIndicator {
                name: Some("per bed".to_string()),
                value: Some("0.4".to_string()),
                unit: Some("kWh/bed".to_string()),
            },
            CustomIndicator {
                value: Some("??".to_string()),
                ..CustomIndicator::default()
            },
        ];
        let errors = section.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "indicators.custom[1].value");
    }
}
