//! Location catalog backing the cascading section A selectors.
//!
//! Lookups narrow department, then city, then subsector, then entity,
//! each list deduplicated and sorted alphabetically. The catalog is a
//! flat list of rows loaded from TOML, with a built-in demo dataset.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One catalog row: a registered entity and where it sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    pub department: String,
    pub city: String,
    pub subsector: String,
    pub entity: String,
}

/// Catalog loading or content error.
#[derive(Debug)]
pub struct CatalogError {
    /// Offending field or source (e.g. `"entries[3].city"`).
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "catalog error: {} — {}", self.field, self.message)
    }
}

/// Flat location catalog with cascading lookup queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocationCatalog {
    pub entries: Vec<CatalogEntry>,
}

impl LocationCatalog {
    /// Built-in demo dataset, used when no catalog file is given.
    pub fn demo() -> Self {
        let rows = [
            ("Cundinamarca", "Bogotá", "Health", "Hospital San Rafael"),
            ("Cundinamarca", "Bogotá", "Education", "Colegio Distrital Norte"),
            ("Cundinamarca", "Bogotá", "Administration", "Secretaría de Hacienda"),
            ("Antioquia", "Medellín", "Health", "Hospital San Rafael"),
            ("Antioquia", "Medellín", "Health", "Clínica del Norte"),
            ("Antioquia", "Medellín", "Education", "Institución Educativa La Paz"),
            ("Valle del Cauca", "Cali", "Administration", "Alcaldía Municipal"),
            ("Valle del Cauca", "Cali", "Health", "Hospital Departamental"),
        ];
        Self {
            entries: rows
                .into_iter()
                .map(|(department, city, subsector, entity)| CatalogEntry {
                    department: department.to_string(),
                    city: city.to_string(),
                    subsector: subsector.to_string(),
                    entity: entity.to_string(),
                })
                .collect(),
        }
    }

    /// Parses a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|e| CatalogError {
            field: "catalog".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a catalog from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the TOML is invalid or contains
    /// unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        toml::from_str(s).map_err(|e| CatalogError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Flags rows with blank fields.
    pub fn validate(&self) -> Vec<CatalogError> {
        let mut errors = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            for (name, value) in [
                ("department", &entry.department),
                ("city", &entry.city),
                ("subsector", &entry.subsector),
                ("entity", &entry.entity),
            ] {
                if value.trim().is_empty() {
                    errors.push(CatalogError {
                        field: format!("entries[{i}].{name}"),
                        message: "must not be blank".to_string(),
                    });
                }
            }
        }
        errors
    }

    /// All departments, unique and sorted.
    pub fn departments(&self) -> Vec<String> {
        unique_sorted(self.entries.iter().map(|e| &e.department))
    }

    /// Cities within one department, unique and sorted.
    pub fn cities(&self, department: &str) -> Vec<String> {
        unique_sorted(
            self.entries
                .iter()
                .filter(|e| e.department == department)
                .map(|e| &e.city),
        )
    }

    /// Subsectors present in one city, unique and sorted.
    pub fn subsectors(&self, department: &str, city: &str) -> Vec<String> {
        unique_sorted(
            self.entries
                .iter()
                .filter(|e| e.department == department && e.city == city)
                .map(|e| &e.subsector),
        )
    }

    /// Entities registered under one subsector, unique and sorted.
    pub fn entities(&self, department: &str, city: &str, subsector: &str) -> Vec<String> {
        unique_sorted(
            self.entries
                .iter()
                .filter(|e| {
                    e.department == department && e.city == city && e.subsector == subsector
                })
                .map(|e| &e.entity),
        )
    }
}

fn unique_sorted<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let set: BTreeSet<&String> = values.collect();
    set.into_iter().cloned().collect()
}
