//! AdditiveFOAM `transportProperties` and `thermoPath`.
//!
//! Conductivity and specific heat are written as up to three polynomial
//! coefficients per phase; the powder phase reuses the solid values.

use std::path::Path;

use tracing::warn;

use super::{format_number, require, resolve, ExportFormat};
use crate::errors::{MistError, MistResult};
use crate::file_io::write_atomic;
use crate::material::MaterialInformation;
use crate::property::PropertyValue;
use crate::schema::ThermophysicalProperty as T;

const FORMAT: ExportFormat = ExportFormat::AdditiveFoam;

pub const TRANSPORT_FILE_NAME: &str = "transportProperties";
pub const THERMO_PATH_FILE_NAME: &str = "thermoPath";

/// Coefficients per `kappa`/`Cp` entry
const COEFFICIENT_COUNT: usize = 3;

const HEADER: &str = "\
/*---------------------------------------------------------------------------
     AdditiveFOAM template input file (compatible with 1.0, OpenFOAM 10)

                      Created with Mist
  ---------------------------------------------------------------------------*/
FoamFile
{
    version     2.0;
    format      ascii;
    class       dictionary;
    object      transportProperties;
}

// * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * //

";

const FOOTER: &str = "// ************************************************************************* //\n";

/// Render the `transportProperties` dictionary.
pub fn render_transport_properties(material: &MaterialInformation, reference_temperature: f64) -> MistResult<String> {
    let mut content = String::from(HEADER);

    let phases = [
        ("solid", T::ThermalConductivitySolid, T::SpecificHeatSolid),
        ("liquid", T::ThermalConductivityLiquid, T::SpecificHeatLiquid),
        ("powder", T::ThermalConductivitySolid, T::SpecificHeatSolid),
    ];
    for (phase, conductivity, specific_heat) in phases {
        content.push_str(&format!("{}\n{{\n", phase));
        content.push_str(&coefficient_line(material, "kappa", conductivity)?);
        content.push_str(&coefficient_line(material, "Cp", specific_heat)?);
        content.push_str("}\n\n");
    }

    let value = |key: T| resolve(material, key, FORMAT, reference_temperature);
    content.push_str(&format!("rho     [1 -3 0 0 0 0 0]    {};\n", format_number(value(T::Density)?)));
    content.push_str(&format!("mu      [1 -1 -1  0 0 0 0]  {};\n", format_number(value(T::DynamicViscosity)?)));
    content.push_str(&format!("beta    [0 0 0 -1 0 0 0]    {};\n", format_number(value(T::ThermalExpansion)?)));
    content.push_str("DAS     [0 1 0 0 0 0 0]     10e-6;\n");
    content.push_str(&format!("Lf      [0  2 -2  0 0 0 0]  {};\n\n", scientific(value(T::LatentHeatFusion)?)));
    content.push_str(FOOTER);

    Ok(content)
}

/// Render the two-point liquid-fraction path: fully solid at the eutectic
/// temperature, fully liquid at the liquidus.
pub fn render_thermo_path(material: &MaterialInformation, reference_temperature: f64) -> MistResult<String> {
    let eutectic = resolve(material, T::SolidusEutecticTemperature, FORMAT, reference_temperature)?;
    let liquidus = resolve(material, T::LiquidusTemperature, FORMAT, reference_temperature)?;
    Ok(format!("(\n{:.4}\t 1.0000 \n{:.4}\t 0.0000\n)\n", eutectic, liquidus))
}

/// Write both files.
pub fn write(
    material: &MaterialInformation,
    reference_temperature: f64,
    transport_path: &Path,
    thermo_path: &Path,
) -> MistResult<()> {
    let transport = render_transport_properties(material, reference_temperature)?;
    let thermo = render_thermo_path(material, reference_temperature)?;
    write_atomic(transport_path, transport.as_bytes())?;
    write_atomic(thermo_path, thermo.as_bytes())
}

/// `\tkappa\t(c0\tc1\tc2);`
///
/// Polynomial coefficients are taken in term order, truncated or padded with
/// `0.0` to three. A scalar becomes `(v 0.0 0.0)`.
fn coefficient_line(material: &MaterialInformation, variable: &str, key: T) -> MistResult<String> {
    let property = require(material, key, FORMAT)?;

    let coefficients: Vec<String> = match property.value() {
        PropertyValue::LaurentPolynomial(terms) => {
            if terms.len() > COEFFICIENT_COUNT {
                warn!(
                    property = key.key(),
                    terms = terms.len(),
                    "AdditiveFOAM keeps only the first {} coefficients",
                    COEFFICIENT_COUNT
                );
            }
            terms
                .iter()
                .map(|term| format_number(term.coefficient))
                .chain(std::iter::repeat_with(|| "0.0".to_string()))
                .take(COEFFICIENT_COUNT)
                .collect()
        }
        PropertyValue::Scalar(value) => {
            warn!(property = key.key(), "converting scalar into polynomial");
            vec![format_number(*value), "0.0".to_string(), "0.0".to_string()]
        }
        PropertyValue::Unset => {
            return Err(MistError::UnsupportedForNumericEvaluation {
                property: property.name().to_string(),
                found: property.value().kind().to_string(),
            })
        }
        PropertyValue::Table(table) => match *table {},
    };

    Ok(format!("\t{}\t({});\n", variable, coefficients.join("\t")))
}

/// Two-decimal scientific notation with a signed two-digit exponent: `2.60e+05`
fn scientific(value: f64) -> String {
    let formatted = format!("{:.2e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::steel;
    use crate::material::MaterialBuilder;
    use crate::property::Property;

    #[test]
    fn test_scientific() {
        assert_eq!(scientific(260000.0), "2.60e+05");
        assert_eq!(scientific(0.0065), "6.50e-03");
        assert_eq!(scientific(1.0), "1.00e+00");
    }

    #[test]
    fn test_transport_properties_blocks() {
        let content = render_transport_properties(&steel(), 1658.0).unwrap();

        assert!(content.starts_with("/*----"));
        assert!(content.contains("object      transportProperties;"));
        assert!(content.contains("solid\n{\n\tkappa\t(9.248\t0.01571\t0.0);\n\tCp\t(600.0\t0.05\t0.0);\n}\n"));
        assert!(content.contains("liquid\n{\n\tkappa\t(30.0\t0.0\t0.0);\n\tCp\t(775.0\t0.0\t0.0);\n}\n"));
        assert!(content.contains("powder\n{\n\tkappa\t(9.248\t0.01571\t0.0);\n\tCp\t(600.0\t0.05\t0.0);\n}\n"));
        assert!(content.contains("rho     [1 -3 0 0 0 0 0]    7955.0;\n"));
        assert!(content.contains("mu      [1 -1 -1  0 0 0 0]  0.0065;\n"));
        assert!(content.contains("DAS     [0 1 0 0 0 0 0]     10e-6;\n"));
        assert!(content.contains("Lf      [0  2 -2  0 0 0 0]  2.60e+05;\n"));
        assert!(content.trim_end().ends_with("//"));
    }

    #[test]
    fn test_coefficients_truncated_to_three() {
        let material = MaterialBuilder::new("Quartic", "")
            .property(
                T::SpecificHeatSolid,
                Property::laurent("specific_heat_solid", vec![(1.0, 0), (2.0, 1), (3.0, 2), (4.0, 3)]),
            )
            .build();
        let line = coefficient_line(&material, "Cp", T::SpecificHeatSolid).unwrap();
        assert_eq!(line, "\tCp\t(1.0\t2.0\t3.0);\n");
    }

    #[test]
    fn test_coefficients_taken_in_term_order() {
        let material = MaterialBuilder::new("Reordered", "")
            .property(
                T::SpecificHeatSolid,
                Property::laurent("specific_heat_solid", vec![(0.05, 1), (600.0, 0)]),
            )
            .build();
        let line = coefficient_line(&material, "Cp", T::SpecificHeatSolid).unwrap();
        assert_eq!(line, "\tCp\t(0.05\t600.0\t0.0);\n");
    }

    #[test]
    fn test_unset_coefficients_rejected() {
        let material = MaterialBuilder::new("Unset", "")
            .property(T::SpecificHeatSolid, Property::unset("specific_heat_solid"))
            .build();
        let err = coefficient_line(&material, "Cp", T::SpecificHeatSolid).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FOR_NUMERIC_EVALUATION");
    }

    #[test]
    fn test_thermo_path() {
        let content = render_thermo_path(&steel(), 1658.0).unwrap();
        assert_eq!(content, "(\n1658.0000\t 1.0000 \n1730.0000\t 0.0000\n)\n");
    }

    #[test]
    fn test_missing_liquid_conductivity() {
        let material = MaterialBuilder::new("Partial", "")
            .property(T::ThermalConductivitySolid, Property::scalar("thermal_conductivity_solid", 20.0))
            .property(T::SpecificHeatSolid, Property::scalar("specific_heat_solid", 500.0))
            .build();
        let err = render_transport_properties(&material, 1658.0).unwrap_err();
        assert_eq!(err, MistError::missing_property("thermal_conductivity_liquid", "AdditiveFOAM"));
    }
}
