//! 3DThesis heat-source constants.

use std::path::Path;

use super::{format_number, resolve, ExportFormat};
use crate::errors::MistResult;
use crate::file_io::write_atomic;
use crate::material::MaterialInformation;
use crate::schema::ThermophysicalProperty as T;

const FORMAT: ExportFormat = ExportFormat::ThreeDThesis;

/// Written for `T_0` when the caller has no initial temperature
const UNKNOWN_INITIAL_TEMPERATURE: &str = "-1";

/// Render the `Constants` block.
///
/// `initial_temperature` is written as `T_0`; without one the placeholder
/// `-1` is written for the downstream workflow to fill in.
pub fn render(
    material: &MaterialInformation,
    reference_temperature: f64,
    initial_temperature: Option<f64>,
) -> MistResult<String> {
    let value = |key: T| resolve(material, key, FORMAT, reference_temperature).map(format_number);

    let initial = initial_temperature
        .map(format_number)
        .unwrap_or_else(|| UNKNOWN_INITIAL_TEMPERATURE.to_string());

    Ok(format!(
        "Constants\n{{\n\tT_0 {}\n\tT_L {}\n\tk {}\n\tc {}\n\tp {}\n}}\n",
        initial,
        value(T::LiquidusTemperature)?,
        value(T::ThermalConductivitySolid)?,
        value(T::SpecificHeatSolid)?,
        value(T::Density)?,
    ))
}

/// Render and write to `path`.
pub fn write(
    material: &MaterialInformation,
    reference_temperature: f64,
    initial_temperature: Option<f64>,
    path: &Path,
) -> MistResult<()> {
    write_atomic(path, render(material, reference_temperature, initial_temperature)?.as_bytes())
}
