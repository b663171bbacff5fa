//! # Simulation Input Exporters
//!
//! Each exporter derives the numbers a simulation code needs from a
//! [`MaterialInformation`] and writes them in that code's input syntax.
//!
//! ## Formats
//!
//! - [`adamantine`]: phase-change heat conduction (`materials { ... }` blocks)
//! - [`additive_foam`]: CFD transport properties plus a liquid-fraction path
//! - [`three_d_thesis`]: semi-analytical heat source `Constants { ... }`
//! - [`exaca`]: cellular-automaton interface response function (JSON)
//!
//! Temperature-dependent properties are evaluated at a single reference
//! temperature, by convention the record's solidus/eutectic temperature. All
//! numeric values are resolved through [`Property::numeric_value_at`]; a
//! missing or non-numeric property is an export error, never a default.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mist_core::export::{write_export, ExportFormat};
//! use mist_core::loader::load_file;
//! use mist_core::settings::ExportSettings;
//! use std::path::Path;
//!
//! let material = load_file(Path::new("SS316L.json"))?;
//! let written = write_export(&material, ExportFormat::Exaca, &ExportSettings::default(), Path::new("."))?;
//! println!("wrote {:?}", written);
//! # Ok::<(), mist_core::errors::MistError>(())
//! ```

pub mod adamantine;
pub mod additive_foam;
pub mod exaca;
pub mod three_d_thesis;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::MistResult;
use crate::material::MaterialInformation;
use crate::property::Property;
use crate::schema::ThermophysicalProperty;
use crate::settings::ExportSettings;

/// Supported simulation input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Adamantine,
    AdditiveFoam,
    ThreeDThesis,
    Exaca,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Adamantine,
        ExportFormat::AdditiveFoam,
        ExportFormat::ThreeDThesis,
        ExportFormat::Exaca,
    ];

    /// Name of the target code, used in error messages and logs
    pub fn code_name(&self) -> &'static str {
        match self {
            ExportFormat::Adamantine => "adamantine",
            ExportFormat::AdditiveFoam => "AdditiveFOAM",
            ExportFormat::ThreeDThesis => "3DThesis",
            ExportFormat::Exaca => "ExaCA",
        }
    }

    /// File names written by [`write_export`], one per artifact
    pub fn default_file_names(&self) -> &'static [&'static str] {
        match self {
            ExportFormat::Adamantine => &["adamantine_material.info"],
            ExportFormat::AdditiveFoam => &[
                additive_foam::TRANSPORT_FILE_NAME,
                additive_foam::THERMO_PATH_FILE_NAME,
            ],
            ExportFormat::ThreeDThesis => &["3dthesis_material.txt"],
            ExportFormat::Exaca => &["exaca_material_file.json"],
        }
    }
}

/// Render every artifact of `format` as `(file name, contents)` pairs.
pub fn render_export(
    material: &MaterialInformation,
    format: ExportFormat,
    settings: &ExportSettings,
) -> MistResult<Vec<(&'static str, String)>> {
    let reference_temperature = settings.reference_temperature_for(material)?;
    debug!(
        material = %material.name(),
        format = format.code_name(),
        reference_temperature,
        "exporting material"
    );

    let contents = match format {
        ExportFormat::Adamantine => vec![adamantine::render(material, reference_temperature)?],
        ExportFormat::AdditiveFoam => vec![
            additive_foam::render_transport_properties(material, reference_temperature)?,
            additive_foam::render_thermo_path(material, reference_temperature)?,
        ],
        ExportFormat::ThreeDThesis => vec![three_d_thesis::render(
            material,
            reference_temperature,
            settings.initial_temperature,
        )?],
        ExportFormat::Exaca => vec![exaca::render(material, reference_temperature)?],
    };

    Ok(format.default_file_names().iter().copied().zip(contents).collect())
}

/// Render `format` and write each artifact into `output_dir` under its default name.
///
/// Returns the paths written. Nothing is written if rendering fails.
pub fn write_export(
    material: &MaterialInformation,
    format: ExportFormat,
    settings: &ExportSettings,
    output_dir: &Path,
) -> MistResult<Vec<PathBuf>> {
    let artifacts = render_export(material, format, settings)?;

    let mut written = Vec::with_capacity(artifacts.len());
    for (file_name, contents) in artifacts {
        let path = output_dir.join(file_name);
        crate::file_io::write_atomic(&path, contents.as_bytes())?;
        written.push(path);
    }
    Ok(written)
}

/// A required property evaluated at the reference temperature.
pub(crate) fn resolve(
    material: &MaterialInformation,
    key: ThermophysicalProperty,
    format: ExportFormat,
    reference_temperature: f64,
) -> MistResult<f64> {
    require(material, key, format)?.numeric_value_at(reference_temperature)
}

pub(crate) fn require(
    material: &MaterialInformation,
    key: ThermophysicalProperty,
    format: ExportFormat,
) -> MistResult<&Property> {
    material.require(key, format.code_name())
}

/// Numbers as the downstream codes expect them: integral values keep a
/// trailing `.0` (`7955.0`), everything else uses the shortest round-trip form.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MistError;
    use crate::material::MaterialBuilder;
    use std::env::temp_dir;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7955.0), "7955.0");
        assert_eq!(format_number(-1.0), "-1.0");
        assert_eq!(format_number(686.5), "686.5");
        assert_eq!(format_number(1.9e-5), "0.000019");
    }

    #[test]
    fn test_render_export_names_artifacts() {
        let material = test_support::steel();
        for format in ExportFormat::ALL {
            let artifacts = render_export(&material, format, &ExportSettings::default()).unwrap();
            let names: Vec<&str> = artifacts.iter().map(|(name, _)| *name).collect();
            assert_eq!(names, format.default_file_names());
            assert!(artifacts.iter().all(|(_, contents)| !contents.is_empty()));
        }
    }

    #[test]
    fn test_export_requires_reference_temperature() {
        let material = MaterialBuilder::new("Empty", "").build();
        let err = render_export(&material, ExportFormat::Adamantine, &ExportSettings::default()).unwrap_err();
        assert!(matches!(err, MistError::MissingProperty { ref property, .. } if property == "solidus_eutectic_temperature"));
    }

    #[test]
    fn test_write_export_to_directory() {
        let dir = temp_dir().join("mist_export_test_additive_foam");
        std::fs::create_dir_all(&dir).unwrap();

        let material = test_support::steel();
        let written = write_export(&material, ExportFormat::AdditiveFoam, &ExportSettings::default(), &dir).unwrap();
        assert_eq!(written.len(), 2);
        for path in &written {
            assert!(path.exists());
        }

        let _ = std::fs::remove_dir_all(&dir);
    }
}
