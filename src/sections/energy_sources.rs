//! Section B: energy carriers, annual costs, and monthly consumption grids.

use serde::{Deserialize, Serialize};

use super::{Section, SectionId, ValidationError, digits_only, one_of, require};
use crate::form::types::{Carrier, ConsumptionGrid, UNIT_OPTIONS};

/// Which energy carriers the entity consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarrierSet {
    pub electricity: bool,
    pub natural_gas: bool,
    pub diesel: bool,
    pub other: bool,
}

impl CarrierSet {
    /// True when the given carrier is checked.
    pub fn contains(&self, carrier: Carrier) -> bool {
        match carrier {
            Carrier::Electricity => self.electricity,
            Carrier::NaturalGas => self.natural_gas,
            Carrier::Diesel => self.diesel,
            Carrier::Other => self.other,
        }
    }

    /// Checked carriers in survey order.
    pub fn selected(&self) -> impl Iterator<Item = Carrier> + '_ {
        Carrier::ALL.into_iter().filter(|&c| self.contains(c))
    }

    /// True when at least one carrier is checked.
    pub fn any(&self) -> bool {
        Carrier::ALL.into_iter().any(|c| self.contains(c))
    }
}

/// Annual cost cells for the three tracked years.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostYears {
    pub year1: Option<String>,
    pub year2: Option<String>,
    pub year3: Option<String>,
}

/// Section B payload: carriers, per-carrier costs, and consumption grids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergySources {
    /// Carrier checkboxes.
    pub carriers: CarrierSet,
    /// What "other" stands for; required when that carrier is checked.
    pub other_specification: Option<String>,
    pub electricity_costs: CostYears,
    pub natural_gas_costs: CostYears,
    pub diesel_costs: CostYears,
    pub other_costs: CostYears,
    pub electricity_consumption: ConsumptionGrid,
    pub natural_gas_consumption: ConsumptionGrid,
    pub diesel_consumption: ConsumptionGrid,
    pub other_consumption: ConsumptionGrid,
}

impl EnergySources {
    /// Annual costs for the given carrier.
    pub fn costs(&self, carrier: Carrier) -> &CostYears {
        match carrier {
            Carrier::Electricity => &self.electricity_costs,
            Carrier::NaturalGas => &self.natural_gas_costs,
            Carrier::Diesel => &self.diesel_costs,
            Carrier::Other => &self.other_costs,
        }
    }

    /// Consumption grid for the given carrier.
    pub fn consumption(&self, carrier: Carrier) -> &ConsumptionGrid {
        match carrier {
            Carrier::Electricity => &self.electricity_consumption,
            Carrier::NaturalGas => &self.natural_gas_consumption,
            Carrier::Diesel => &self.diesel_consumption,
            Carrier::Other => &self.other_consumption,
        }
    }

    /// Mutable consumption grid for the given carrier.
    pub fn consumption_mut(&mut self, carrier: Carrier) -> &mut ConsumptionGrid {
        match carrier {
            Carrier::Electricity => &mut self.electricity_consumption,
            Carrier::NaturalGas => &mut self.natural_gas_consumption,
            Carrier::Diesel => &mut self.diesel_consumption,
            Carrier::Other => &mut self.other_consumption,
        }
    }
}

impl Section for EnergySources {
    fn id(&self) -> SectionId {
        SectionId::EnergySources
    }

    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.carriers.other {
            let spec = self.other_specification.as_deref().unwrap_or("");
            require(&mut errors, "other_specification", spec);
        }

        for carrier in Carrier::ALL {
            let key = carrier.key();
            let costs = self.costs(carrier);
            for (year, value) in [
                ("year1", &costs.year1),
                ("year2", &costs.year2),
                ("year3", &costs.year3),
            ] {
                digits_only(&mut errors, &format!("{key}_costs.{year}"), value.as_deref());
            }

            let grid = self.consumption(carrier);
            let prefix = format!("{key}_consumption");
            validate_grid(&mut errors, &prefix, grid);
        }

        errors
    }
}

/// Grid-level constraints: canonical row order, known unit, digit cells.
fn validate_grid(errors: &mut Vec<ValidationError>, prefix: &str, grid: &ConsumptionGrid) {
    if !grid.in_calendar_order() {
        errors.push(ValidationError::new(
            format!("{prefix}.monthly"),
            "must list the 12 calendar months in order",
        ));
    }

    one_of(
        errors,
        &format!("{prefix}.unit"),
        grid.unit.as_deref(),
        UNIT_OPTIONS,
    );

    for (i, entry) in grid.monthly.iter().enumerate() {
        for (year, value) in [
            ("year1", &entry.year1),
            ("year2", &entry.year2),
            ("year3", &entry.year3),
        ] {
            digits_only(
                errors,
                &format!("{prefix}.monthly[{i}].{year}"),
                value.as_deref(),
            );
        }
    }
}
