//! Single-phase property records.

use std::collections::BTreeMap;

use crate::property::{KeyedProperties, Property};
use crate::schema::PhaseProperty;

/// Value stored under a phase property key.
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseEntry {
    Single(Property),
    /// One entry per solute element, in composition order
    PerSolute(KeyedProperties),
}

/// A named phase and its phase-specific properties.
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePhase {
    name: String,
    print_name: Option<String>,
    properties: BTreeMap<PhaseProperty, PhaseEntry>,
}

impl SinglePhase {
    pub fn new(name: impl Into<String>, print_name: Option<String>) -> Self {
        SinglePhase {
            name: name.into(),
            print_name,
            properties: BTreeMap::new(),
        }
    }

    /// Add a property entry, replacing any previous entry for the key
    pub fn with_entry(mut self, key: PhaseProperty, entry: PhaseEntry) -> Self {
        self.properties.insert(key, entry);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name, falling back to the phase key
    pub fn print_name(&self) -> &str {
        self.print_name.as_deref().unwrap_or(&self.name)
    }

    pub fn entry(&self, key: PhaseProperty) -> Option<&PhaseEntry> {
        self.properties.get(&key)
    }

    /// A non-indexed property of this phase
    pub fn property(&self, key: PhaseProperty) -> Option<&Property> {
        match self.properties.get(&key) {
            Some(PhaseEntry::Single(property)) => Some(property),
            _ => None,
        }
    }

    /// A solute-indexed property for one element
    pub fn solute_property(&self, key: PhaseProperty, element: &str) -> Option<&Property> {
        match self.properties.get(&key) {
            Some(PhaseEntry::PerSolute(by_element)) => by_element.get(element),
            _ => None,
        }
    }

    /// Entries in canonical vocabulary order
    pub fn entries(&self) -> impl Iterator<Item = (PhaseProperty, &PhaseEntry)> {
        self.properties.iter().map(|(key, entry)| (*key, entry))
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
