//! adamantine material block.
//!
//! adamantine reads temperature-dependent properties as polynomials; here each
//! property is collapsed to its value at the reference temperature and written
//! as a constant.

use std::path::Path;

use super::{format_number, resolve, ExportFormat};
use crate::errors::MistResult;
use crate::file_io::write_atomic;
use crate::material::MaterialInformation;
use crate::schema::ThermophysicalProperty as T;

const FORMAT: ExportFormat = ExportFormat::Adamantine;

/// Render the `materials` input block.
pub fn render(material: &MaterialInformation, reference_temperature: f64) -> MistResult<String> {
    let value = |key: T| resolve(material, key, FORMAT, reference_temperature).map(format_number);

    let density = value(T::Density)?;
    let emissivity = value(T::Emissivity)?;
    let solid = phase_block("solid", &density, &value(T::SpecificHeatSolid)?, &value(T::ThermalConductivitySolid)?, &emissivity);
    let liquid = phase_block("liquid", &density, &value(T::SpecificHeatLiquid)?, &value(T::ThermalConductivityLiquid)?, &emissivity);

    Ok(format!(
        "materials\n{{\n\tn_material 1\n\tproperty_format polynomial\n\tmaterial_0\n\t{{\n{solid}{liquid}\t\tsolidus {solidus} ;\n\t\tliquidus {liquidus} ;\n\t\tlatent_heat {latent_heat} ;\n\t}}\n}}\n",
        solidus = value(T::SolidusEutecticTemperature)?,
        liquidus = value(T::LiquidusTemperature)?,
        latent_heat = value(T::LatentHeatFusion)?,
    ))
}

/// Render and write to `path`.
pub fn write(material: &MaterialInformation, reference_temperature: f64, path: &Path) -> MistResult<()> {
    write_atomic(path, render(material, reference_temperature)?.as_bytes())
}

fn phase_block(phase: &str, density: &str, specific_heat: &str, conductivity: &str, emissivity: &str) -> String {
    format!(
        "\t\t{phase}\n\t\t{{\n\
         \t\t\tdensity {density} ;\n\
         \t\t\tspecific_heat {specific_heat} ;\n\
         \t\t\tthermal_conductivity_x {conductivity} ;\n\
         \t\t\tthermal_conductivity_z {conductivity} ;\n\
         \t\t\temissivity {emissivity} ;\n\
         \t\t}}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MistError;
    use crate::export::test_support::steel;
    use crate::material::MaterialBuilder;
    use crate::property::Property;

    #[test]
    fn test_render_blocks() {
        let content = render(&steel(), 1658.0).unwrap();

        assert!(content.starts_with("materials\n{\n\tn_material 1\n"));
        assert!(content.contains("\t\tsolid\n\t\t{\n\t\t\tdensity 7955.0 ;\n"));
        assert!(content.contains("\t\tliquid\n\t\t{\n\t\t\tdensity 7955.0 ;\n\t\t\tspecific_heat 775.0 ;\n"));
        assert!(content.contains("\t\t\tthermal_conductivity_x 30.0 ;\n\t\t\tthermal_conductivity_z 30.0 ;\n"));
        assert!(content.contains("solidus 1658.0 ;"));
        assert!(content.contains("liquidus 1730.0 ;"));
        assert!(content.contains("latent_heat 260000.0 ;"));
        assert_eq!(content.matches('{').count(), content.matches('}').count());
    }

    #[test]
    fn test_polynomials_evaluated_at_reference() {
        let content = render(&steel(), 1730.0).unwrap();
        let line = content
            .lines()
            .find(|line| line.trim_start().starts_with("specific_heat"))
            .unwrap();
        let value: f64 = line.split_whitespace().nth(1).unwrap().parse().unwrap();
        assert!((value - 686.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_property_is_an_error() {
        let material = MaterialBuilder::new("Partial", "")
            .property(T::Density, Property::scalar("density", 7955.0))
            .build();
        let err = render(&material, 1658.0).unwrap_err();
        assert_eq!(err, MistError::missing_property("emissivity", "adamantine"));
    }

    #[test]
    fn test_unset_property_is_an_error() {
        let material = MaterialBuilder::new("Partial", "")
            .property(T::Density, Property::unset("density"))
            .build();
        let err = render(&material, 1658.0).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FOR_NUMERIC_EVALUATION");
    }
}
