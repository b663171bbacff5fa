//! # Settings
//!
//! Caller-supplied knobs for exporting and reporting. Both structs are
//! serializable so a front end can persist them next to a material file.

use serde::{Deserialize, Serialize};

use crate::errors::MistResult;
use crate::material::MaterialInformation;
use crate::report::ReportSection;

/// Export options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Temperature at which temperature-dependent properties are evaluated.
    /// `None` uses the material's solidus/eutectic temperature.
    #[serde(default)]
    pub reference_temperature: Option<f64>,

    /// Initial temperature for heat-source models (3DThesis `T_0`)
    #[serde(default)]
    pub initial_temperature: Option<f64>,
}

impl ExportSettings {
    /// The reference temperature to use for `material`.
    ///
    /// # Errors
    ///
    /// Without an override, fails the way
    /// [`MaterialInformation::reference_temperature`] does.
    pub fn reference_temperature_for(&self, material: &MaterialInformation) -> MistResult<f64> {
        match self.reference_temperature {
            Some(temperature) => Ok(temperature),
            None => material.reference_temperature(),
        }
    }
}

/// Report options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Sections to include; rendered in canonical order regardless of order here
    pub sections: Vec<ReportSection>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            sections: vec![ReportSection::Properties],
        }
    }
}

impl ReportSettings {
    pub fn all_sections() -> Self {
        ReportSettings {
            sections: ReportSection::ALL.to_vec(),
        }
    }
}
