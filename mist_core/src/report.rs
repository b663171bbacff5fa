//! # Material Report
//!
//! Turns a [`MaterialInformation`] into property tables with numbered
//! citations, then emits Markdown (and, through [`crate::pdf`], PDF).
//!
//! ## Citation Numbering
//!
//! References are numbered in order of first use. Rows are visited in the
//! canonical vocabulary order; a row whose reference string exactly matches an
//! earlier one reuses that number, a new string gets the next number, and a
//! row without a reference is cited as `-`.
//!
//! ## Example
//!
//! ```rust
//! use mist_core::material::MaterialBuilder;
//! use mist_core::property::Property;
//! use mist_core::report::{render, ReportSection};
//! use mist_core::schema::ThermophysicalProperty;
//!
//! let material = MaterialBuilder::new("SS316L", "")
//!     .property(
//!         ThermophysicalProperty::Density,
//!         Property::scalar("density", 7955.0).with_unit("kg/m^3").with_reference("Kim 1975"),
//!     )
//!     .build();
//!
//! let markdown = render(&material, &[ReportSection::Properties]);
//! assert!(markdown.contains("| density | 7955 | $kg/m^3$ | [1] |"));
//! assert!(markdown.contains("[1] Kim 1975"));
//! ```

use serde::{Deserialize, Serialize};

use crate::material::MaterialInformation;
use crate::phase::PhaseEntry;
use crate::property::{LaurentTerm, Property, PropertyValue};

/// Symbol used for a polynomial's variable when the document gives none
const DEFAULT_VARIABLE_SYMBOL: &str = "x";

/// Placeholder for any absent cell
pub const MISSING: &str = "-";

/// Magnitudes outside `[1e-4, 1e16)` switch to exponent form
const PLAIN_RANGE: std::ops::Range<f64> = 1e-4..1e16;

/// A number as it appears in a report cell: `7955`, `0.05`, `1.2e-15`
pub fn format_value(value: f64) -> String {
    if value == 0.0 || PLAIN_RANGE.contains(&value.abs()) {
        value.to_string()
    } else {
        format!("{:e}", value)
    }
}

/// Report sections, in the order they appear in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    Composition,
    Properties,
    Phases,
    Solidification,
}

impl ReportSection {
    pub const ALL: [ReportSection; 4] = [
        ReportSection::Composition,
        ReportSection::Properties,
        ReportSection::Phases,
        ReportSection::Solidification,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ReportSection::Composition => "composition",
            ReportSection::Properties => "properties",
            ReportSection::Phases => "phases",
            ReportSection::Solidification => "solidification",
        }
    }
}

/// Distinct reference strings in order of first use.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceList {
    references: Vec<String>,
}

impl ReferenceList {
    pub fn new() -> Self {
        ReferenceList::default()
    }

    /// Citation number (1-based) for `reference`, registering it on first use.
    ///
    /// Matching is exact string equality. Returns `None` when there is no reference.
    pub fn cite(&mut self, reference: Option<&str>) -> Option<usize> {
        let reference = reference?;
        match self.references.iter().position(|known| known == reference) {
            Some(index) => Some(index + 1),
            None => {
                self.references.push(reference.to_string());
                Some(self.references.len())
            }
        }
    }

    /// `(number, reference)` pairs in citation order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.references
            .iter()
            .enumerate()
            .map(|(index, reference)| (index + 1, reference.as_str()))
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

/// Renderable value of a table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Missing,
    Number(f64),
    Polynomial { terms: Vec<LaurentTerm>, symbol: String },
}

impl CellValue {
    fn from_property(property: &Property) -> Self {
        match property.value() {
            PropertyValue::Scalar(value) => CellValue::Number(*value),
            PropertyValue::LaurentPolynomial(terms) => CellValue::Polynomial {
                terms: terms.clone(),
                symbol: property
                    .dependent_variable()
                    .print_symbol
                    .clone()
                    .unwrap_or_else(|| DEFAULT_VARIABLE_SYMBOL.to_string()),
            },
            PropertyValue::Unset => CellValue::Missing,
            PropertyValue::Table(table) => match *table {},
        }
    }

    /// Markdown/LaTeX rendering, e.g. `600 + 0.05 $T$ + 2e-5 $T^{2}$`
    pub fn to_markdown(&self) -> String {
        match self {
            CellValue::Missing => MISSING.to_string(),
            CellValue::Number(value) => format_value(*value),
            CellValue::Polynomial { terms, symbol } => {
                let mut text = String::new();
                for term in terms {
                    match term.exponent {
                        0 => text.push_str(&format!("{} + ", format_value(term.coefficient))),
                        1 => text.push_str(&format!("{} ${}$ + ", format_value(term.coefficient), symbol)),
                        exponent => text.push_str(&format!(
                            "{} ${}^{{{}}}$ + ",
                            format_value(term.coefficient),
                            symbol,
                            exponent
                        )),
                    }
                }
                text.trim_end_matches(" + ").to_string()
            }
        }
    }
}

/// One row of a report table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub label: String,
    pub value: CellValue,
    pub unit: Option<String>,
    /// 1-based citation number
    pub citation: Option<usize>,
}

impl ReportRow {
    fn from_property(label: impl Into<String>, property: &Property, references: &mut ReferenceList) -> Self {
        ReportRow {
            label: label.into(),
            value: CellValue::from_property(property),
            unit: property.unit().map(str::to_string),
            citation: references.cite(property.reference()),
        }
    }

    fn missing(label: impl Into<String>) -> Self {
        ReportRow {
            label: label.into(),
            value: CellValue::Missing,
            unit: None,
            citation: None,
        }
    }

    /// `[n]` or `-`
    pub fn citation_text(&self) -> String {
        match self.citation {
            Some(number) => format!("[{}]", number),
            None => MISSING.to_string(),
        }
    }
}

/// A titled table of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub heading: String,
    /// Header of the label column ("Property", "Element", ...)
    pub label_header: String,
    /// Header of the value column
    pub value_header: String,
    pub rows: Vec<ReportRow>,
}

/// Structured report content, independent of output format.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub material_name: String,
    pub notes: String,
    pub tables: Vec<ReportTable>,
    pub references: ReferenceList,
}

impl Report {
    /// Emit the report as Markdown
    pub fn to_markdown(&self) -> String {
        let mut out = format!("# Material Properties: {}\n\n", self.material_name);

        for table in &self.tables {
            out.push_str(&format!("## {}\n", table.heading));
            out.push_str(&format!(
                "|{} | {} | Units | Data Source |\n",
                table.label_header, table.value_header
            ));
            out.push_str("|---------| ----- | ----- | ----------- |\n");
            for row in &table.rows {
                let unit = match &row.unit {
                    Some(unit) => format!("${}$", unit),
                    None => MISSING.to_string(),
                };
                out.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    row.label,
                    row.value.to_markdown(),
                    unit,
                    row.citation_text()
                ));
            }
            out.push('\n');
        }

        out.push_str("## Notes\n");
        out.push_str(&self.notes);
        out.push_str("\n\n");

        out.push_str("## References\n");
        for (number, reference) in self.references.iter() {
            out.push_str(&format!("[{}] {}\n\n", number, reference));
        }

        out
    }
}

/// Build the structured report for the requested sections.
///
/// Sections are emitted in [`ReportSection::ALL`] order regardless of the
/// order requested; duplicates are ignored.
pub fn build_report(material: &MaterialInformation, sections: &[ReportSection]) -> Report {
    let mut references = ReferenceList::new();
    let mut tables = Vec::new();

    for section in ReportSection::ALL {
        if !sections.contains(&section) {
            continue;
        }
        match section {
            ReportSection::Composition => tables.push(composition_table(material, &mut references)),
            ReportSection::Properties => tables.push(properties_table(material, &mut references)),
            ReportSection::Phases => tables.extend(phase_tables(material, &mut references)),
            ReportSection::Solidification => tables.extend(solidification_tables(material, &mut references)),
        }
    }

    Report {
        material_name: material.name().to_string(),
        notes: material.notes().to_string(),
        tables,
        references,
    }
}

/// Render the requested sections as Markdown.
pub fn render(material: &MaterialInformation, sections: &[ReportSection]) -> String {
    build_report(material, sections).to_markdown()
}

fn composition_table(material: &MaterialInformation, references: &mut ReferenceList) -> ReportTable {
    let composition = material.composition();
    let rows = composition
        .elements()
        .map(|element| match composition.concentration(element) {
            Some(concentration) => ReportRow::from_property(element, concentration, references),
            None => ReportRow::missing(element),
        })
        .collect();

    ReportTable {
        heading: "Composition".to_string(),
        label_header: "Element".to_string(),
        value_header: "Concentration".to_string(),
        rows,
    }
}

fn properties_table(material: &MaterialInformation, references: &mut ReferenceList) -> ReportTable {
    let rows = material
        .properties()
        .map(|(_, property)| ReportRow::from_property(property.print_name(), property, references))
        .collect();

    ReportTable {
        heading: "Thermophysical Properties".to_string(),
        label_header: "Property".to_string(),
        value_header: "Value".to_string(),
        rows,
    }
}

fn phase_tables(material: &MaterialInformation, references: &mut ReferenceList) -> Vec<ReportTable> {
    material
        .phases()
        .iter()
        .map(|phase| {
            let mut rows = Vec::new();
            for (key, entry) in phase.entries() {
                match entry {
                    PhaseEntry::Single(property) => {
                        rows.push(ReportRow::from_property(property.print_name(), property, references));
                    }
                    PhaseEntry::PerSolute(by_element) => {
                        for (element, property) in by_element.iter() {
                            let label = format!("{} ({})", key.key(), element);
                            rows.push(match property {
                                Some(property) => ReportRow::from_property(label, property, references),
                                None => ReportRow::missing(label),
                            });
                        }
                    }
                }
            }

            ReportTable {
                heading: format!("Phase Properties: {}", phase.print_name()),
                label_header: "Property".to_string(),
                value_header: "Value".to_string(),
                rows,
            }
        })
        .collect()
}

fn solidification_tables(material: &MaterialInformation, references: &mut ReferenceList) -> Vec<ReportTable> {
    let conditions = material
        .solidification_conditions()
        .map(|(_, property)| ReportRow::from_property(property.print_name(), property, references))
        .collect();

    let microstructure = material.solidification_microstructure();
    let mut features: Vec<ReportRow> = microstructure
        .features()
        .map(|(_, property)| ReportRow::from_property(property.print_name(), property, references))
        .collect();
    for (phase, property) in microstructure.phase_fractions().iter() {
        let label = format!("phase_fraction ({})", phase);
        features.push(match property {
            Some(property) => ReportRow::from_property(label, property, references),
            None => ReportRow::missing(label),
        });
    }

    vec![
        ReportTable {
            heading: "Solidification Conditions".to_string(),
            label_header: "Condition".to_string(),
            value_header: "Value".to_string(),
            rows: conditions,
        },
        ReportTable {
            heading: "Solidification Microstructure".to_string(),
            label_header: "Feature".to_string(),
            value_header: "Value".to_string(),
            rows: features,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load;
    use crate::material::{Composition, MaterialBuilder};
    use crate::property::DependentVariable;
    use crate::schema::ThermophysicalProperty;
    use serde_json::json;

    #[test]
    fn test_reference_list_numbering() {
        let mut references = ReferenceList::new();
        assert_eq!(references.cite(Some("Kim 1975")), Some(1));
        assert_eq!(references.cite(None), None);
        assert_eq!(references.cite(Some("Mills 2002")), Some(2));
        assert_eq!(references.cite(Some("Kim 1975")), Some(1));
        assert_eq!(references.cite(Some("kim 1975")), Some(3));
        assert_eq!(references.len(), 3);

        let listed: Vec<(usize, &str)> = references.iter().collect();
        assert_eq!(listed, vec![(1, "Kim 1975"), (2, "Mills 2002"), (3, "kim 1975")]);
    }

    #[test]
    fn test_shared_references_share_an_index() {
        let material = MaterialBuilder::new("SS316L", "")
            .property(
                ThermophysicalProperty::Density,
                Property::scalar("density", 7955.0).with_reference("Kim 1975"),
            )
            .property(
                ThermophysicalProperty::SpecificHeatSolid,
                Property::scalar("specific_heat_solid", 500.0).with_reference("Mills 2002"),
            )
            .property(
                ThermophysicalProperty::LiquidusTemperature,
                Property::scalar("liquidus_temperature", 1730.0).with_reference("Kim 1975"),
            )
            .property(ThermophysicalProperty::Emissivity, Property::scalar("emissivity", 0.4))
            .build();

        let report = build_report(&material, &[ReportSection::Properties]);
        let citations: Vec<Option<usize>> = report.tables[0].rows.iter().map(|row| row.citation).collect();
        assert_eq!(citations, vec![Some(1), Some(2), None, Some(1)]);

        let markdown = report.to_markdown();
        assert!(markdown.contains("| emissivity | 0.4 | - | - |"));
        assert!(markdown.contains("[1] Kim 1975\n"));
        assert!(markdown.contains("[2] Mills 2002\n"));
        assert!(markdown.find("[1] Kim").unwrap() < markdown.find("[2] Mills").unwrap());
    }

    #[test]
    fn test_polynomial_formatting() {
        let value = CellValue::Polynomial {
            terms: vec![
                LaurentTerm::new(600.0, 0),
                LaurentTerm::new(0.05, 1),
                LaurentTerm::new(2.5, 2),
                LaurentTerm::new(3.0, -1),
            ],
            symbol: "T".to_string(),
        };
        assert_eq!(value.to_markdown(), "600 + 0.05 $T$ + 2.5 $T^{2}$ + 3 $T^{-1}$");
    }

    #[test]
    fn test_polynomial_symbol_from_dependent_variable() {
        let property = Property::laurent("specific_heat_solid", vec![(600.0, 0), (0.05, 1)])
            .with_dependent_variable(DependentVariable {
                print_symbol: Some("T".to_string()),
                ..Default::default()
            });
        assert_eq!(CellValue::from_property(&property).to_markdown(), "600 + 0.05 $T$");

        let anonymous = Property::laurent("specific_heat_solid", vec![(0.05, 1)]);
        assert_eq!(CellValue::from_property(&anonymous).to_markdown(), "0.05 $x$");
    }

    #[test]
    fn test_value_formatting_switches_to_exponent() {
        assert_eq!(format_value(7955.0), "7955");
        assert_eq!(format_value(0.05), "0.05");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(1.2e-15), "1.2e-15");
        assert_eq!(format_value(-3.0e-9), "-3e-9");
        assert_eq!(format_value(2.5e17), "2.5e17");

        let value = CellValue::Polynomial {
            terms: vec![LaurentTerm::new(9.248, 0), LaurentTerm::new(1.5e-6, 2)],
            symbol: "T".to_string(),
        };
        assert_eq!(value.to_markdown(), "9.248 + 1.5e-6 $T^{2}$");
    }

    #[test]
    fn test_tiny_scalar_row() {
        let material = MaterialBuilder::new("SS316L", "")
            .property(
                ThermophysicalProperty::ThermalExpansion,
                Property::scalar("thermal_expansion", 1.2e-15),
            )
            .build();
        let markdown = render(&material, &[ReportSection::Properties]);
        assert!(markdown.contains("| thermal_expansion | 1.2e-15 | - | - |"));
    }

    #[test]
    fn test_sentinel_property_renders_dash_row() {
        let document = json!({
            "name": "SS316L",
            "note": "",
            "thermophysical_properties": {
                "density": { "value": 7955 },
                "molecular_mass": "None"
            }
        });
        let markdown = render(&load(&document).unwrap(), &[ReportSection::Properties]);
        assert!(markdown.contains("| density | 7955 | - | - |"));
        assert!(markdown.contains("| molecular_mass | - | - | - |"));
    }

    #[test]
    fn test_notes_heading_always_written() {
        let markdown = render(&MaterialBuilder::new("SS316L", "").build(), &[ReportSection::Properties]);
        assert!(markdown.contains("## Notes\n\n\n## References\n"));
    }

    #[test]
    fn test_unset_value_renders_dash() {
        assert_eq!(CellValue::from_property(&Property::unset("emissivity")).to_markdown(), "-");
    }

    #[test]
    fn test_default_section_excludes_composition() {
        let material = MaterialBuilder::new("SS316L", "Annealed plate.")
            .composition(
                Composition::new(Some("Fe".to_string()), vec!["Cr".to_string()])
                    .with_concentration("Cr", Property::scalar("Cr", 17.0).with_unit("wt%")),
            )
            .build();

        let markdown = render(&material, &[ReportSection::Properties]);
        assert!(markdown.starts_with("# Material Properties: SS316L\n"));
        assert!(!markdown.contains("## Composition"));
        assert!(markdown.contains("## Notes\nAnnealed plate.\n"));
        assert!(markdown.contains("## References\n"));
    }

    #[test]
    fn test_composition_rows() {
        let material = MaterialBuilder::new("SS316L", "")
            .composition(
                Composition::new(Some("Fe".to_string()), vec!["Cr".to_string()])
                    .with_concentration("Cr", Property::scalar("Cr", 17.0).with_unit("wt%").with_reference("Mill cert")),
            )
            .build();

        let markdown = render(&material, &[ReportSection::Properties, ReportSection::Composition]);
        let composition_at = markdown.find("## Composition").unwrap();
        let properties_at = markdown.find("## Thermophysical Properties").unwrap();
        assert!(composition_at < properties_at);
        assert!(markdown.contains("| Fe | - | - | - |"));
        assert!(markdown.contains("| Cr | 17 | $wt%$ | [1] |"));
    }

    #[test]
    fn test_phase_and_solidification_tables() {
        let document = json!({
            "name": "AlCu",
            "note": "",
            "composition": { "base_element": "Al", "solute_elements": ["Cu"] },
            "single_phase_properties": {
                "phases": ["liquid"],
                "liquid": {
                    "print_name": "Liquid",
                    "liquidus_slope": { "value": -3.4, "reference": "Ref A" },
                    "solute_diffusivities": { "Cu": { "value": 3e-9, "reference": "Ref B" } }
                }
            },
            "solidification_conditions": {
                "cooling_rate": { "value": 100000.0, "unit": "K/s", "reference": "Ref A" }
            },
            "solidification_microstructure": {
                "phase_fractions": { "liquid": { "value": 0.0 } }
            }
        });
        let material = load(&document).unwrap();

        let report = build_report(&material, &ReportSection::ALL);
        let headings: Vec<&str> = report.tables.iter().map(|t| t.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec![
                "Composition",
                "Thermophysical Properties",
                "Phase Properties: Liquid",
                "Solidification Conditions",
                "Solidification Microstructure",
            ]
        );

        let phase_rows = &report.tables[2].rows;
        assert_eq!(phase_rows[0].label, "liquidus_slope");
        assert_eq!(phase_rows[0].citation, Some(1));
        assert_eq!(phase_rows[1].label, "solute_diffusivities (Cu)");
        assert_eq!(phase_rows[1].citation, Some(2));
        assert_eq!(report.tables[3].rows[0].citation, Some(1));
        assert_eq!(report.tables[4].rows[0].label, "phase_fraction (liquid)");
        assert_eq!(report.references.len(), 2);
    }
}
