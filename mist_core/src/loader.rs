//! # Schema Loader
//!
//! Builds a [`MaterialInformation`] from a JSON material document.
//!
//! ## Document Layout
//!
//! ```json
//! {
//!   "name": "SS316L",
//!   "note": "",
//!   "composition": { "base_element": "Fe", "solute_elements": ["Cr"], "Cr": { "value": 17.0 } },
//!   "single_phase_properties": { "phases": ["liquid"], "liquid": { "print_name": "Liquid" } },
//!   "thermophysical_properties": { "density": { "value": 7955, "unit": "kg/m^3" } },
//!   "solidification_conditions": { "cooling_rate": { "value": 1.0e5 } },
//!   "solidification_microstructure": { "phase_fractions": { "liquid": { "value": 0.0 } } }
//! }
//! ```
//!
//! Only `name` and `note` are mandatory. Every other section, and every field
//! of a leaf property object, may be omitted. Keys outside the known
//! vocabularies are ignored.
//!
//! ## Example
//!
//! ```rust
//! use mist_core::loader::load;
//! use mist_core::schema::ThermophysicalProperty;
//!
//! let document = serde_json::json!({
//!     "name": "SS316L",
//!     "note": "",
//!     "thermophysical_properties": {
//!         "density": { "value": 7955, "unit": "kg/m^3" }
//!     }
//! });
//!
//! let material = load(&document).unwrap();
//! let density = material.property(ThermophysicalProperty::Density).unwrap();
//! assert_eq!(density.numeric_value_at(1730.0).unwrap(), 7955.0);
//! ```

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{MistError, MistResult};
use crate::file_io::read_document;
use crate::material::{Composition, MaterialBuilder, MaterialInformation, SolidificationMicrostructure};
use crate::phase::{PhaseEntry, SinglePhase};
use crate::property::{DependentVariable, KeyedProperties, LaurentTerm, Property, PropertyFields};
use crate::schema::{
    MicrostructureFeature, PhaseProperty, SolidificationCondition, ThermophysicalProperty,
    COMPOSITION_SECTION, CONDITIONS_SECTION, MICROSTRUCTURE_SECTION, PHASES_SECTION,
    PHASE_FRACTIONS_KEY, PROPERTY_FIELDS, THERMOPHYSICAL_SECTION,
};

/// Document string that stands for "no value"
const NONE_SENTINEL: &str = "None";

/// Load a material record from a parsed JSON document.
///
/// # Errors
///
/// * `Schema` - `name`/`note` missing, or a field has the wrong JSON type
/// * `ConflictingValueDefinition` / `UnsupportedValueType` - from property construction
pub fn load(document: &Value) -> MistResult<MaterialInformation> {
    let root = as_object(document, "$")?;

    let name = required_string(root, "name")?;
    let notes = required_string(root, "note")?;
    debug!(material = %name, "loading material document");

    let mut builder = MaterialBuilder::new(name, notes);

    let composition = match optional_field(root, COMPOSITION_SECTION) {
        Some(section) => load_composition(as_object(section, COMPOSITION_SECTION)?)?,
        None => Composition::default(),
    };

    let phases = match optional_field(root, PHASES_SECTION) {
        Some(section) => load_phases(as_object(section, PHASES_SECTION)?, &composition)?,
        None => Vec::new(),
    };

    if let Some(section) = optional_field(root, THERMOPHYSICAL_SECTION) {
        let section = as_object(section, THERMOPHYSICAL_SECTION)?;
        log_unrecognized(section, THERMOPHYSICAL_SECTION, |key| {
            ThermophysicalProperty::from_key(key).is_some()
        });
        for key in ThermophysicalProperty::ALL {
            if section.contains_key(key.key()) {
                builder = builder.property(key, property_from_blob(section, key.key(), THERMOPHYSICAL_SECTION)?);
            }
        }
    }

    if let Some(section) = optional_field(root, CONDITIONS_SECTION) {
        let section = as_object(section, CONDITIONS_SECTION)?;
        log_unrecognized(section, CONDITIONS_SECTION, |key| {
            SolidificationCondition::from_key(key).is_some()
        });
        for key in SolidificationCondition::ALL {
            if section.contains_key(key.key()) {
                builder = builder.solidification_condition(
                    key,
                    property_from_blob(section, key.key(), CONDITIONS_SECTION)?,
                );
            }
        }
    }

    if let Some(section) = optional_field(root, MICROSTRUCTURE_SECTION) {
        let section = as_object(section, MICROSTRUCTURE_SECTION)?;
        builder = builder.solidification_microstructure(load_microstructure(section, &phases)?);
    }

    builder = builder.composition(composition);
    for phase in phases {
        builder = builder.phase(phase);
    }

    Ok(builder.build())
}

/// Parse JSON text and load it.
pub fn load_str(json: &str) -> MistResult<MaterialInformation> {
    let document: Value = serde_json::from_str(json).map_err(|e| MistError::SerializationError {
        reason: e.to_string(),
    })?;
    load(&document)
}

/// Read a JSON material file and load it.
///
/// # Example
///
/// ```rust,no_run
/// use mist_core::loader::load_file;
/// use std::path::Path;
///
/// let material = load_file(Path::new("SS316L.json"))?;
/// println!("Loaded {}", material.name());
/// # Ok::<(), mist_core::errors::MistError>(())
/// ```
pub fn load_file(path: &Path) -> MistResult<MaterialInformation> {
    let document = read_document(path)?;
    load(&document)
}

fn load_composition(section: &Map<String, Value>) -> MistResult<Composition> {
    let base_element = optional_string(section, "base_element", COMPOSITION_SECTION)?;
    let solute_elements = optional_string_list(section, "solute_elements", COMPOSITION_SECTION)?;

    let mut composition = Composition::new(base_element, solute_elements);
    let elements: Vec<String> = composition.elements().map(str::to_string).collect();
    for element in elements {
        if section.contains_key(&element) {
            let concentration = property_from_blob(section, &element, COMPOSITION_SECTION)?;
            composition = composition.with_concentration(element, concentration);
        }
    }

    Ok(composition)
}

fn load_phases(section: &Map<String, Value>, composition: &Composition) -> MistResult<Vec<SinglePhase>> {
    let phase_names = optional_string_list(section, "phases", PHASES_SECTION)?;
    let mut phases = Vec::with_capacity(phase_names.len());

    for phase_name in phase_names {
        let path = format!("{PHASES_SECTION}.{phase_name}");
        let data = optional_field(section, &phase_name)
            .ok_or_else(|| MistError::schema(&path, "phase is listed in 'phases' but has no entry"))?;
        let data = as_object(data, &path)?;

        log_unrecognized(data, &path, |key| {
            key == "print_name" || PhaseProperty::from_key(key).is_some()
        });

        let print_name = optional_string(data, "print_name", &path)?;
        let mut phase = SinglePhase::new(phase_name.as_str(), print_name);

        for key in PhaseProperty::ALL {
            if !data.contains_key(key.key()) {
                continue;
            }

            let entry = if key.is_solute_indexed() {
                let nested_path = format!("{path}.{}", key.key());
                let nested = match optional_field(data, key.key()) {
                    Some(raw) => Some(as_object(raw, &nested_path)?),
                    None => None,
                };
                let mut by_element = KeyedProperties::new();
                for element in composition.solute_elements() {
                    let property = match nested {
                        Some(nested) if nested.contains_key(element) => {
                            Some(property_from_blob(nested, element, &nested_path)?)
                        }
                        _ => None,
                    };
                    by_element.insert(element.as_str(), property);
                }
                PhaseEntry::PerSolute(by_element)
            } else {
                PhaseEntry::Single(property_from_blob(data, key.key(), &path)?)
            };

            phase = phase.with_entry(key, entry);
        }

        phases.push(phase);
    }

    Ok(phases)
}

fn load_microstructure(
    section: &Map<String, Value>,
    phases: &[SinglePhase],
) -> MistResult<SolidificationMicrostructure> {
    log_unrecognized(section, MICROSTRUCTURE_SECTION, |key| {
        key == PHASE_FRACTIONS_KEY || MicrostructureFeature::from_key(key).is_some()
    });

    let mut microstructure = SolidificationMicrostructure::new();
    for key in MicrostructureFeature::ALL {
        if section.contains_key(key.key()) {
            microstructure = microstructure.with_feature(
                key,
                property_from_blob(section, key.key(), MICROSTRUCTURE_SECTION)?,
            );
        }
    }

    if let Some(raw) = optional_field(section, PHASE_FRACTIONS_KEY) {
        let path = format!("{MICROSTRUCTURE_SECTION}.{PHASE_FRACTIONS_KEY}");
        let fractions = as_object(raw, &path)?;

        let mut by_phase = KeyedProperties::new();
        for phase in phases {
            let property = if fractions.contains_key(phase.name()) {
                Some(property_from_blob(fractions, phase.name(), &path)?)
            } else {
                None
            };
            by_phase.insert(phase.name(), property);
        }
        // Fractions for phases the document never declared are still kept.
        for key in fractions.keys() {
            if !by_phase.contains_key(key) {
                by_phase.insert(key.as_str(), Some(property_from_blob(fractions, key, &path)?));
            }
        }

        microstructure = microstructure.with_phase_fractions(by_phase);
    }

    Ok(microstructure)
}

/// Build a [`Property`] from the object stored under `key` in `parent`.
///
/// The property's name is `key`. Every recognized field is optional, and an
/// entry that is itself `"None"` or `null` loads as an unset property.
fn property_from_blob(parent: &Map<String, Value>, key: &str, section: &str) -> MistResult<Property> {
    let path = format!("{section}.{key}");
    if !parent.contains_key(key) {
        return Err(MistError::schema(&path, "property entry is missing"));
    }
    let tree = match optional_field(parent, key) {
        Some(value) => as_object(value, &path)?,
        None => return Ok(Property::unset(key)),
    };

    log_unrecognized(tree, &path, |field| PROPERTY_FIELDS.contains(&field));

    let fields = PropertyFields {
        unit: optional_string(tree, "unit", &path)?,
        value: optional_number(tree, "value", &path)?,
        value_laurent_poly: optional_polynomial(tree, "value_laurent_poly", &path)?,
        value_table: optional_field(tree, "value_table").cloned(),
        dependent_variable: DependentVariable {
            print_name: optional_string(tree, "dependent_variable_print_name", &path)?,
            print_symbol: optional_string(tree, "dependent_variable_print_symbol", &path)?,
            unit: optional_string(tree, "dependent_variable_unit", &path)?,
        },
        print_name: optional_string(tree, "print_name", &path)?,
        reference: optional_string(tree, "reference", &path)?,
        uncertainty: optional_number(tree, "uncertainty", &path)?,
        print_symbol: optional_string(tree, "print_symbol", &path)?,
    };

    Property::new(key, fields)
}

/// The value under `key`, treating a missing key, `null`, and the string
/// `"None"` alike as absent.
fn optional_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match object.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s == NONE_SENTINEL => None,
        Some(value) => Some(value),
    }
}

fn required_string(object: &Map<String, Value>, key: &str) -> MistResult<String> {
    match object.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(MistError::schema(key, format!("expected a string, found {}", json_type(other)))),
        None => Err(MistError::schema(key, "mandatory top-level field is missing")),
    }
}

fn optional_string(object: &Map<String, Value>, key: &str, path: &str) -> MistResult<Option<String>> {
    match optional_field(object, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(MistError::schema(
            format!("{path}.{key}"),
            format!("expected a string, found {}", json_type(other)),
        )),
    }
}

fn optional_number(object: &Map<String, Value>, key: &str, path: &str) -> MistResult<Option<f64>> {
    match optional_field(object, key) {
        None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| {
            MistError::schema(
                format!("{path}.{key}"),
                format!("expected a number, found {}", json_type(value)),
            )
        }),
    }
}

fn optional_string_list(object: &Map<String, Value>, key: &str, path: &str) -> MistResult<Vec<String>> {
    match optional_field(object, key) {
        None => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            MistError::schema(format!("{path}.{key}"), format!("expected a list of strings: {e}"))
        }),
    }
}

/// Polynomials are written as `[[coefficient, exponent], ...]`.
fn optional_polynomial(object: &Map<String, Value>, key: &str, path: &str) -> MistResult<Option<Vec<LaurentTerm>>> {
    match optional_field(object, key) {
        None => Ok(None),
        Some(value) => {
            let pairs: Vec<(f64, i32)> = serde_json::from_value(value.clone()).map_err(|e| {
                MistError::schema(
                    format!("{path}.{key}"),
                    format!("expected [[coefficient, integer exponent], ...]: {e}"),
                )
            })?;
            Ok(Some(pairs.into_iter().map(LaurentTerm::from).collect()))
        }
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> MistResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| MistError::schema(path, format!("expected an object, found {}", json_type(value))))
}

fn log_unrecognized(object: &Map<String, Value>, path: &str, known: impl Fn(&str) -> bool) {
    for key in object.keys().filter(|key| !known(key)) {
        debug!(section = %path, key = %key, "ignoring unrecognized key");
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
