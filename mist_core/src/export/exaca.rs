//! ExaCA material file.
//!
//! ExaCA takes the freezing range and the interface response function as a
//! cubic or quadratic polynomial in undercooling, with coefficients keyed
//! `A`..`D` from highest to lowest power.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use super::{require, resolve, ExportFormat};
use crate::errors::{MistError, MistResult};
use crate::file_io::write_atomic;
use crate::material::MaterialInformation;
use crate::schema::ThermophysicalProperty as T;

const FORMAT: ExportFormat = ExportFormat::Exaca;

/// Coefficient names, highest power first
const COEFFICIENT_NAMES: [&str; 4] = ["A", "B", "C", "D"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExacaMaterial {
    pub freezing_range: f64,
    pub function: &'static str,
    pub coefficients: BTreeMap<&'static str, f64>,
}

/// Build the ExaCA record.
///
/// # Errors
///
/// - `MissingProperty` if the IRF or a temperature is absent
/// - `WrongVariant` if the IRF is not a Laurent polynomial
/// - `InvalidPolynomialDegree` unless the IRF has exactly 4 terms with exponents
///   3..=0 (cubic) or exactly 3 terms with exponents 2..=0 (quadratic)
pub fn build(material: &MaterialInformation, reference_temperature: f64) -> MistResult<ExacaMaterial> {
    let liquidus = resolve(material, T::LiquidusTemperature, FORMAT, reference_temperature)?;
    let solidus = resolve(material, T::SolidusEutecticTemperature, FORMAT, reference_temperature)?;

    let irf = require(material, T::InterfaceResponseFunction, FORMAT)?;
    let terms = irf.coefficients()?;

    let (function, degree) = match terms.len() {
        4 => ("cubic", 3),
        3 => ("quadratic", 2),
        count => {
            return Err(MistError::invalid_polynomial(
                irf.name(),
                FORMAT.code_name(),
                format!("expected 3 or 4 terms, found {}", count),
            ))
        }
    };

    let mut coefficients = BTreeMap::new();
    for (name, exponent) in COEFFICIENT_NAMES.iter().zip((0..=degree).rev()) {
        let term = terms
            .iter()
            .find(|term| term.exponent == exponent)
            .ok_or_else(|| {
                MistError::invalid_polynomial(
                    irf.name(),
                    FORMAT.code_name(),
                    format!("{} polynomial has no term with exponent {}", function, exponent),
                )
            })?;
        coefficients.insert(*name, term.coefficient);
    }

    Ok(ExacaMaterial {
        freezing_range: liquidus - solidus,
        function,
        coefficients,
    })
}

/// Render as JSON with four-space indentation.
pub fn render(material: &MaterialInformation, reference_temperature: f64) -> MistResult<String> {
    let record = build(material, reference_temperature)?;

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    record
        .serialize(&mut serializer)
        .map_err(|e| MistError::SerializationError {
            reason: format!("Failed to serialize ExaCA material: {}", e),
        })?;

    String::from_utf8(buffer).map_err(|e| MistError::SerializationError {
        reason: format!("ExaCA output is not UTF-8: {}", e),
    })
}

/// Render and write to `path`.
pub fn write(material: &MaterialInformation, reference_temperature: f64, path: &Path) -> MistResult<()> {
    write_atomic(path, render(material, reference_temperature)?.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::steel;
    use crate::material::MaterialBuilder;
    use crate::property::Property;

    fn with_irf(irf: Property) -> MaterialInformation {
        MaterialBuilder::new("IRF", "")
            .property(T::LiquidusTemperature, Property::scalar("liquidus_temperature", 1730.0))
            .property(T::SolidusEutecticTemperature, Property::scalar("solidus_eutectic_temperature", 1658.0))
            .property(T::InterfaceResponseFunction, irf)
            .build()
    }

    #[test]
    fn test_cubic_mapping() {
        let record = build(&steel(), 1658.0).unwrap();
        assert_eq!(record.function, "cubic");
        assert!((record.freezing_range - 72.0).abs() < 1e-9);
        assert_eq!(record.coefficients["A"], 1.0e-6);
        assert_eq!(record.coefficients["B"], 2.0e-4);
        assert_eq!(record.coefficients["C"], 3.0e-3);
        assert_eq!(record.coefficients["D"], 0.0);
    }

    #[test]
    fn test_mapping_independent_of_term_order() {
        let material = with_irf(Property::laurent(
            "interface_response_function",
            vec![(4.0, 0), (3.0, 1), (2.0, 2), (1.0, 3)],
        ));
        let record = build(&material, 1658.0).unwrap();
        let ordered: Vec<(&str, f64)> = record.coefficients.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(ordered, vec![("A", 1.0), ("B", 2.0), ("C", 3.0), ("D", 4.0)]);
    }

    #[test]
    fn test_quadratic_mapping() {
        let material = with_irf(Property::laurent(
            "interface_response_function",
            vec![(5.0, 2), (6.0, 1), (7.0, 0)],
        ));
        let record = build(&material, 1658.0).unwrap();
        assert_eq!(record.function, "quadratic");
        assert_eq!(record.coefficients.len(), 3);
        assert_eq!(record.coefficients["A"], 5.0);
        assert_eq!(record.coefficients["C"], 7.0);
        assert!(!record.coefficients.contains_key("D"));
    }

    #[test]
    fn test_two_terms_rejected() {
        let material = with_irf(Property::laurent("interface_response_function", vec![(1.0, 1), (2.0, 0)]));
        let err = build(&material, 1658.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_POLYNOMIAL_DEGREE");
    }

    #[test]
    fn test_gap_in_exponents_rejected() {
        let material = with_irf(Property::laurent(
            "interface_response_function",
            vec![(1.0, 4), (2.0, 2), (3.0, 1), (4.0, 0)],
        ));
        let err = build(&material, 1658.0).unwrap_err();
        assert!(matches!(err, MistError::InvalidPolynomialDegree { ref reason, .. } if reason.contains("exponent 3")));
    }

    #[test]
    fn test_scalar_irf_rejected() {
        let material = with_irf(Property::scalar("interface_response_function", 1.0));
        let err = build(&material, 1658.0).unwrap_err();
        assert_eq!(err.error_code(), "WRONG_VARIANT");
    }

    #[test]
    fn test_render_json() {
        let json = render(&steel(), 1658.0).unwrap();
        assert!(json.contains("\n    \"freezing_range\": 72.0,"));
        assert!(json.contains("\"function\": \"cubic\""));
        assert!(json.contains("\n        \"A\": "));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["coefficients"]["D"], 0.0);
    }
}
