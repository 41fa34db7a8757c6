//! Report assembly, the record store boundary, and the submission flow.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::form::types::{Carrier, Month};
use crate::sections::building_profile::BuildingProfile;
use crate::sections::energy_sources::EnergySources;
use crate::sections::savings_opportunities::{
    CostAndFinancing, EstimatedSavings, SavingOpportunity,
};
use crate::sections::{
    BaselineAnalysis, ImplementedMeasures, SavingsOpportunities, SectionId, SectionRecord,
    ValidationError, YesNo,
    baseline_analysis::ModelKinds,
    energy_sources::CarrierSet,
    implemented_measures::ImplementedMeasure,
};

/// A complete or partially filled audit report.
///
/// Every section is optional until it has been submitted; the flow in
/// [`ReportFlow`] fills them in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditReport {
    pub building_profile: Option<BuildingProfile>,
    pub energy_sources: Option<EnergySources>,
    pub baseline_analysis: Option<BaselineAnalysis>,
    pub savings_opportunities: Option<SavingsOpportunities>,
    pub implemented_measures: Option<ImplementedMeasures>,
}

/// Report loading error.
#[derive(Debug)]
pub struct ReportError {
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "report error: {}", self.message)
    }
}

impl AuditReport {
    /// Parses a report from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a `ReportError` if the file cannot be read or the JSON is
    /// invalid.
    pub fn from_json_file(path: &Path) -> Result<Self, ReportError> {
        let content = fs::read_to_string(path).map_err(|e| ReportError {
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_json_str(&content)
    }

    /// Parses a report from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a `ReportError` if the JSON is invalid.
    pub fn from_json_str(s: &str) -> Result<Self, ReportError> {
        serde_json::from_str(s).map_err(|e| ReportError {
            message: e.to_string(),
        })
    }

    /// Present sections as submission records, in section order.
    pub fn sections(&self) -> Vec<SectionRecord> {
        let mut records = Vec::new();
        if let Some(s) = &self.building_profile {
            records.push(SectionRecord::BuildingProfile(s.clone()));
        }
        if let Some(s) = &self.energy_sources {
            records.push(SectionRecord::EnergySources(s.clone()));
        }
        if let Some(s) = &self.baseline_analysis {
            records.push(SectionRecord::BaselineAnalysis(s.clone()));
        }
        if let Some(s) = &self.savings_opportunities {
            records.push(SectionRecord::SavingsOpportunities(s.clone()));
        }
        if let Some(s) = &self.implemented_measures {
            records.push(SectionRecord::ImplementedMeasures(s.clone()));
        }
        records
    }

    /// Validates every present section, prefixing field paths with the
    /// section key.
    pub fn validate_all(&self) -> Vec<ValidationError> {
        self.sections()
            .iter()
            .flat_map(|record| {
                let key = record.id().key();
                record
                    .validate()
                    .into_iter()
                    .map(move |e| ValidationError::new(format!("{key}.{}", e.field), e.message))
            })
            .collect()
    }

    /// Built-in fully filled example report.
    ///
    /// Location values match the demo catalog so the sample passes both
    /// validation and catalog lookups.
    pub fn sample() -> Self {
        let building_profile = BuildingProfile {
            department: "Antioquia".to_string(),
            city: "Medellín".to_string(),
            subsector: "Health".to_string(),
            entity_name: "Hospital San Rafael".to_string(),
            address: "Calle 10 # 43-12".to_string(),
            start_time: "06:00".to_string(),
            end_time: "20:00".to_string(),
            occupation_days: "7".to_string(),
            workers: "240".to_string(),
            patients: Some("380".to_string()),
            visitors: Some("150".to_string()),
            students: None,
            activities: Some("Outpatient care, surgery, and laboratory services".to_string()),
            construction_year: Some("1998".to_string()),
            total_area: Some("12500".to_string()),
            usable_area: Some("9800".to_string()),
            building_tenure: Some("Owned".to_string()),
            pays_utilities: YesNo::Yes,
            responsible_entity: None,
        };

        let mut energy_sources = EnergySources {
            carriers: CarrierSet {
                electricity: true,
                natural_gas: true,
                ..CarrierSet::default()
            },
            ..EnergySources::default()
        };
        energy_sources.electricity_costs.year1 = Some("38200".to_string());
        energy_sources.electricity_costs.year2 = Some("40150".to_string());
        energy_sources.electricity_costs.year3 = Some("41600".to_string());
        energy_sources.natural_gas_costs.year1 = Some("9100".to_string());

        let grid = energy_sources.consumption_mut(Carrier::Electricity);
        grid.unit = Some("kWh/month".to_string());
        for month in Month::ALL {
            let base = 10_000 + 150 * month.index() as u32;
            let row = grid.row_mut(month);
            row.year1 = Some(base.to_string());
            row.year2 = Some((base + 400).to_string());
            row.year3 = Some((base + 800).to_string());
        }
        let gas = energy_sources.consumption_mut(Carrier::NaturalGas);
        gas.unit = Some("m3/month".to_string());
        for month in Month::ALL {
            gas.row_mut(month).year1 = Some((800 + 20 * month.index() as u32).to_string());
        }

        let baseline_analysis = BaselineAnalysis {
            base_period: "2023".to_string(),
            carriers: CarrierSet {
                electricity: true,
                natural_gas: true,
                ..CarrierSet::default()
            },
            models: ModelKinds {
                absolute_value: true,
                ..ModelKinds::default()
            },
            ..BaselineAnalysis::default()
        };

        let opportunity = SavingOpportunity {
            measure_type: Some("Technology retrofit".to_string()),
            description: Some("Replace chillers with variable-speed units".to_string()),
            estimated_savings: EstimatedSavings {
                value: Some("2600".to_string()),
                unit: Some("kWh/month".to_string()),
                percentage: Some("8".to_string()),
            },
            cost_and_financing: CostAndFinancing {
                implementation_cost: Some("185000".to_string()),
                has_financing: Some(YesNo::Yes),
                financing_mechanism: Some("Energy performance contract".to_string()),
            },
            ..SavingOpportunity::default()
        };

        let implemented = ImplementedMeasure {
            measure: SavingOpportunity {
                measure_type: Some("Good operational practices".to_string()),
                description: Some("Night setback on air handling units".to_string()),
                estimated_savings: EstimatedSavings {
                    value: Some("900".to_string()),
                    unit: Some("kWh/month".to_string()),
                    percentage: Some("3".to_string()),
                },
                ..SavingOpportunity::default()
            },
            evidence_url: Some("https://evidence.example/ahu-schedule.pdf".to_string()),
        };

        Self {
            building_profile: Some(building_profile),
            energy_sources: Some(energy_sources),
            baseline_analysis: Some(baseline_analysis),
            savings_opportunities: Some(SavingsOpportunities {
                opportunities: vec![opportunity],
            }),
            implemented_measures: Some(ImplementedMeasures {
                measures: vec![implemented],
            }),
        }
    }
}

/// Store rejection.
#[derive(Debug)]
pub struct StoreError {
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store error: {}", self.message)
    }
}

/// Opaque "submit record" collaborator persisting section payloads.
pub trait RecordStore {
    /// Persists one section record, replacing any earlier submission for
    /// the same section.
    fn submit(&mut self, record: SectionRecord) -> Result<(), StoreError>;

    /// The latest record submitted for a section, if any.
    fn fetch(&self, id: SectionId) -> Option<&SectionRecord>;
}

/// In-memory store keeping the latest record per section.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<SectionId, SectionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles the stored records back into a report.
    pub fn report(&self) -> AuditReport {
        let mut report = AuditReport::default();
        for record in self.records.values() {
            match record.clone() {
                SectionRecord::BuildingProfile(s) => report.building_profile = Some(s),
                SectionRecord::EnergySources(s) => report.energy_sources = Some(s),
                SectionRecord::BaselineAnalysis(s) => report.baseline_analysis = Some(s),
                SectionRecord::SavingsOpportunities(s) => report.savings_opportunities = Some(s),
                SectionRecord::ImplementedMeasures(s) => report.implemented_measures = Some(s),
            }
        }
        report
    }
}

impl RecordStore for MemoryStore {
    fn submit(&mut self, record: SectionRecord) -> Result<(), StoreError> {
        self.records.insert(record.id(), record);
        Ok(())
    }

    fn fetch(&self, id: SectionId) -> Option<&SectionRecord> {
        self.records.get(&id)
    }
}

/// Where the flow stands after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    /// Waiting for the given section.
    InProgress(SectionId),
    /// All five sections submitted.
    Complete,
}

/// Submission rejection.
#[derive(Debug)]
pub enum SubmitError {
    /// The payload failed section validation.
    Validation {
        section: SectionId,
        errors: Vec<ValidationError>,
    },
    /// The record does not match the section currently expected.
    OutOfOrder {
        /// Expected section, `None` once the report is complete.
        expected: Option<SectionId>,
        got: SectionId,
    },
    /// The store rejected the record.
    Store(StoreError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Validation { section, errors } => {
                write!(f, "{} failed validation ({} error(s))", section, errors.len())
            }
            SubmitError::OutOfOrder { expected, got } => match expected {
                Some(expected) => write!(f, "expected {expected}, got {got}"),
                None => write!(f, "report is already complete, got {got}"),
            },
            SubmitError::Store(e) => write!(f, "{e}"),
        }
    }
}

/// "Navigate to next step" collaborator: fixed A→E submission order.
///
/// Every accepted section is validated, persisted through the store, and
/// then the flow advances. All five sections persist; none are
/// navigation-only.
#[derive(Debug, Clone, Copy)]
pub struct ReportFlow {
    state: FlowState,
}

impl ReportFlow {
    /// A fresh flow expecting section A.
    pub fn new() -> Self {
        Self {
            state: FlowState::InProgress(SectionId::BuildingProfile),
        }
    }

    /// The section currently expected, `None` once complete.
    pub fn current(&self) -> Option<SectionId> {
        match self.state {
            FlowState::InProgress(id) => Some(id),
            FlowState::Complete => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == FlowState::Complete
    }

    /// Validates, persists, and advances past one section.
    ///
    /// # Errors
    ///
    /// Rejects records submitted out of order, payloads failing section
    /// validation, and store failures. The flow does not advance on any
    /// rejection.
    pub fn submit(
        &mut self,
        store: &mut dyn RecordStore,
        record: SectionRecord,
    ) -> Result<FlowState, SubmitError> {
        let got = record.id();
        match self.current() {
            Some(expected) if expected == got => {}
            expected => return Err(SubmitError::OutOfOrder { expected, got }),
        }

        let errors = record.validate();
        if !errors.is_empty() {
            return Err(SubmitError::Validation {
                section: got,
                errors,
            });
        }

        store.submit(record).map_err(SubmitError::Store)?;

        self.state = match got.next() {
            Some(next) => FlowState::InProgress(next),
            None => FlowState::Complete,
        };
        Ok(self.state)
    }
}

impl Default for ReportFlow {
    fn default() -> Self {
        Self::new()
    }
}
