//! # Material Records
//!
//! [`MaterialInformation`] is the aggregate record for one material. It is
//! assembled once (by the loader, or by [`MaterialBuilder`]) and is read-only
//! afterwards; reports and exporters only borrow it.
//!
//! ## Structure
//!
//! ```text
//! MaterialInformation
//! ├── name, notes
//! ├── composition: base element, solutes, element → concentration
//! ├── phases: [SinglePhase] (ordered as listed in the document)
//! ├── properties: ThermophysicalProperty → Property
//! ├── solidification_conditions: SolidificationCondition → Property
//! └── solidification_microstructure: features + phase fractions
//! ```
//!
//! ## Example
//!
//! ```rust
//! use mist_core::material::MaterialBuilder;
//! use mist_core::property::Property;
//! use mist_core::schema::ThermophysicalProperty;
//!
//! let material = MaterialBuilder::new("SS316L", "")
//!     .property(ThermophysicalProperty::Density, Property::scalar("density", 7955.0))
//!     .build();
//!
//! let density = material.property(ThermophysicalProperty::Density).unwrap();
//! assert_eq!(density.numeric_value_at(300.0).unwrap(), 7955.0);
//! ```

use std::collections::BTreeMap;

use crate::errors::{MistError, MistResult};
use crate::phase::SinglePhase;
use crate::property::{KeyedProperties, Property};
use crate::schema::{MicrostructureFeature, SolidificationCondition, ThermophysicalProperty};

/// Elemental composition of the material.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composition {
    base_element: Option<String>,
    solute_elements: Vec<String>,
    concentrations: BTreeMap<String, Property>,
}

impl Composition {
    pub fn new(base_element: Option<String>, solute_elements: Vec<String>) -> Self {
        Composition {
            base_element,
            solute_elements,
            concentrations: BTreeMap::new(),
        }
    }

    pub fn with_concentration(mut self, element: impl Into<String>, concentration: Property) -> Self {
        self.concentrations.insert(element.into(), concentration);
        self
    }

    pub fn base_element(&self) -> Option<&str> {
        self.base_element.as_deref()
    }

    pub fn solute_elements(&self) -> &[String] {
        &self.solute_elements
    }

    /// Base element followed by the solutes, in document order
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.base_element
            .as_deref()
            .into_iter()
            .chain(self.solute_elements.iter().map(String::as_str))
    }

    pub fn concentration(&self, element: &str) -> Option<&Property> {
        self.concentrations.get(element)
    }

    pub fn is_empty(&self) -> bool {
        self.base_element.is_none() && self.solute_elements.is_empty()
    }
}

/// Measured or predicted features of the solidified microstructure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolidificationMicrostructure {
    features: BTreeMap<MicrostructureFeature, Property>,
    phase_fractions: KeyedProperties,
}

impl SolidificationMicrostructure {
    pub fn new() -> Self {
        SolidificationMicrostructure::default()
    }

    pub fn with_feature(mut self, key: MicrostructureFeature, property: Property) -> Self {
        self.features.insert(key, property);
        self
    }

    pub fn with_phase_fractions(mut self, phase_fractions: KeyedProperties) -> Self {
        self.phase_fractions = phase_fractions;
        self
    }

    pub fn feature(&self, key: MicrostructureFeature) -> Option<&Property> {
        self.features.get(&key)
    }

    pub fn features(&self) -> impl Iterator<Item = (MicrostructureFeature, &Property)> {
        self.features.iter().map(|(key, property)| (*key, property))
    }

    /// Phase fraction entries keyed by phase name
    pub fn phase_fractions(&self) -> &KeyedProperties {
        &self.phase_fractions
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.phase_fractions.is_empty()
    }
}

/// The canonical record of one material's properties.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialInformation {
    name: String,
    notes: String,
    composition: Composition,
    phases: Vec<SinglePhase>,
    properties: BTreeMap<ThermophysicalProperty, Property>,
    solidification_conditions: BTreeMap<SolidificationCondition, Property>,
    solidification_microstructure: SolidificationMicrostructure,
}

impl MaterialInformation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Phases in the order the document lists them
    pub fn phases(&self) -> &[SinglePhase] {
        &self.phases
    }

    pub fn phase(&self, name: &str) -> Option<&SinglePhase> {
        self.phases.iter().find(|phase| phase.name() == name)
    }

    pub fn property(&self, key: ThermophysicalProperty) -> Option<&Property> {
        self.properties.get(&key)
    }

    /// Thermophysical properties in canonical order
    pub fn properties(&self) -> impl Iterator<Item = (ThermophysicalProperty, &Property)> {
        self.properties.iter().map(|(key, property)| (*key, property))
    }

    /// A thermophysical property that `consumer` cannot do without.
    ///
    /// # Errors
    ///
    /// `MissingProperty` naming both the property and the consumer.
    pub fn require(&self, key: ThermophysicalProperty, consumer: &str) -> MistResult<&Property> {
        self.property(key)
            .ok_or_else(|| MistError::missing_property(key.key(), consumer))
    }

    /// Temperature at which temperature-dependent properties are evaluated for export.
    ///
    /// By convention this is the scalar solidus/eutectic temperature.
    pub fn reference_temperature(&self) -> MistResult<f64> {
        self.require(ThermophysicalProperty::SolidusEutecticTemperature, "reference temperature")?
            .scalar_value()
    }

    pub fn solidification_condition(&self, key: SolidificationCondition) -> Option<&Property> {
        self.solidification_conditions.get(&key)
    }

    pub fn solidification_conditions(&self) -> impl Iterator<Item = (SolidificationCondition, &Property)> {
        self.solidification_conditions
            .iter()
            .map(|(key, property)| (*key, property))
    }

    pub fn solidification_microstructure(&self) -> &SolidificationMicrostructure {
        &self.solidification_microstructure
    }
}

/// Assembles a [`MaterialInformation`] top-down.
///
/// The builder is consumed by [`MaterialBuilder::build`]; the resulting record
/// has no mutation API.
#[derive(Debug, Clone)]
pub struct MaterialBuilder {
    record: MaterialInformation,
}

impl MaterialBuilder {
    pub fn new(name: impl Into<String>, notes: impl Into<String>) -> Self {
        MaterialBuilder {
            record: MaterialInformation {
                name: name.into(),
                notes: notes.into(),
                composition: Composition::default(),
                phases: Vec::new(),
                properties: BTreeMap::new(),
                solidification_conditions: BTreeMap::new(),
                solidification_microstructure: SolidificationMicrostructure::default(),
            },
        }
    }

    pub fn composition(mut self, composition: Composition) -> Self {
        self.record.composition = composition;
        self
    }

    /// Add a phase; a phase with the same name is replaced in place
    pub fn phase(mut self, phase: SinglePhase) -> Self {
        match self.record.phases.iter_mut().find(|p| p.name() == phase.name()) {
            Some(existing) => *existing = phase,
            None => self.record.phases.push(phase),
        }
        self
    }

    pub fn property(mut self, key: ThermophysicalProperty, property: Property) -> Self {
        self.record.properties.insert(key, property);
        self
    }

    pub fn solidification_condition(mut self, key: SolidificationCondition, property: Property) -> Self {
        self.record.solidification_conditions.insert(key, property);
        self
    }

    pub fn solidification_microstructure(mut self, microstructure: SolidificationMicrostructure) -> Self {
        self.record.solidification_microstructure = microstructure;
        self
    }

    pub fn build(self) -> MaterialInformation {
        self.record
    }
}
