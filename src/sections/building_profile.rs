//! Section A: characterization of the audited building.

use serde::{Deserialize, Serialize};

use super::{Section, SectionId, ValidationError, YesNo, digits_only, one_of, require};

/// Building tenure options offered by the form.
pub const TENURE_OPTIONS: &[&str] = &[
    "Owned",
    "Leased",
    "Loaned for use",
    "Usufruct",
    "Other",
];

/// Section A payload: location, occupancy, and building characteristics.
///
/// Numeric fields are kept as raw strings, as entered; constraints are
/// applied in [`BuildingProfile::validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildingProfile {
    /// Department the building is located in (catalog value).
    pub department: String,
    /// City within the department (catalog value).
    pub city: String,
    /// Subsector the entity belongs to (catalog value).
    pub subsector: String,
    /// Name of the audited entity (catalog value).
    pub entity_name: String,
    /// Street address.
    pub address: String,
    /// Daily occupancy start, `HH:MM`.
    pub start_time: String,
    /// Daily occupancy end, `HH:MM`.
    pub end_time: String,
    /// Days of occupation/operation per week.
    pub occupation_days: String,
    /// Number of workers.
    pub workers: String,
    /// Number of patients, where applicable.
    pub patients: Option<String>,
    /// Number of visitors, where applicable.
    pub visitors: Option<String>,
    /// Number of students, where applicable.
    pub students: Option<String>,
    /// Free-form description of the activities carried out.
    pub activities: Option<String>,
    /// Year of construction.
    pub construction_year: Option<String>,
    /// Total built area in square meters.
    pub total_area: Option<String>,
    /// Occupied usable area in square meters.
    pub usable_area: Option<String>,
    /// Building tenure, one of [`TENURE_OPTIONS`] when set.
    pub building_tenure: Option<String>,
    /// Whether the entity itself pays the utility bills.
    pub pays_utilities: YesNo,
    /// Entity in charge of payment when [`Self::pays_utilities`] is `No`.
    pub responsible_entity: Option<String>,
}

impl Section for BuildingProfile {
    fn id(&self) -> SectionId {
        SectionId::BuildingProfile
    }

    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        require(&mut errors, "department", &self.department);
        require(&mut errors, "city", &self.city);
        require(&mut errors, "subsector", &self.subsector);
        require(&mut errors, "entity_name", &self.entity_name);
        require(&mut errors, "address", &self.address);
        require(&mut errors, "start_time", &self.start_time);
        require(&mut errors, "end_time", &self.end_time);
        require(&mut errors, "occupation_days", &self.occupation_days);
        require(&mut errors, "workers", &self.workers);

        for (field, value) in [
            ("start_time", &self.start_time),
            ("end_time", &self.end_time),
        ] {
            if !value.trim().is_empty() && !looks_like_time(value) {
                errors.push(ValidationError::new(field, "must be in HH:MM format"));
            }
        }

        digits_only(&mut errors, "occupation_days", Some(&self.occupation_days));
        digits_only(&mut errors, "workers", Some(&self.workers));
        digits_only(&mut errors, "patients", self.patients.as_deref());
        digits_only(&mut errors, "visitors", self.visitors.as_deref());
        digits_only(&mut errors, "students", self.students.as_deref());
        digits_only(
            &mut errors,
            "construction_year",
            self.construction_year.as_deref(),
        );
        digits_only(&mut errors, "total_area", self.total_area.as_deref());
        digits_only(&mut errors, "usable_area", self.usable_area.as_deref());

        one_of(
            &mut errors,
            "building_tenure",
            self.building_tenure.as_deref(),
            TENURE_OPTIONS,
        );

        if self.pays_utilities == YesNo::No {
            let responsible = self.responsible_entity.as_deref().unwrap_or("");
            require(&mut errors, "responsible_entity", responsible);
        }

        errors
    }
}

/// `HH:MM`, 24-hour clock.
fn looks_like_time(value: &str) -> bool {
    let Some((hours, minutes)) = value.trim().split_once(':') else {
        return false;
    };
    let valid = |part: &str, max: u32| {
        part.len() == 2
            && part.chars().all(|c| c.is_ascii_digit())
            && part.parse::<u32>().is_ok_and(|v| v < max)
    };
    valid(hours, 24) && valid(minutes, 60)
}
