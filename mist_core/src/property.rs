//! # Typed Property Values
//!
//! A [`Property`] is one curated material quantity: its display metadata, its
//! citation, and exactly one value representation.
//!
//! ## Value Representations
//!
//! - **Scalar**: a single number, independent of any state variable
//! - **Laurent polynomial**: `Σ cᵢ·xᵉⁱ` with integer (possibly negative) exponents,
//!   usually in temperature
//! - **Table**: accepted by the document format but not supported; the variant
//!   wraps an uninhabited type so no table value can ever exist
//!
//! ## Example
//!
//! ```rust
//! use mist_core::property::Property;
//!
//! let cp = Property::laurent("specific_heat_solid", vec![(600.0, 0), (0.05, 1)])
//!     .with_unit("J/kg-K");
//!
//! let at_solidus = cp.numeric_value_at(1730.0).unwrap();
//! assert!((at_solidus - 686.5).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{MistError, MistResult};

/// One `coefficient · x^exponent` term of a Laurent polynomial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaurentTerm {
    pub coefficient: f64,
    pub exponent: i32,
}

impl LaurentTerm {
    pub fn new(coefficient: f64, exponent: i32) -> Self {
        LaurentTerm { coefficient, exponent }
    }

    /// Value of this term at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficient * x.powi(self.exponent)
    }
}

impl From<(f64, i32)> for LaurentTerm {
    fn from((coefficient, exponent): (f64, i32)) -> Self {
        LaurentTerm::new(coefficient, exponent)
    }
}

/// Tabular property data.
///
/// Has no values: tables are part of the document vocabulary but cannot be
/// represented, so `PropertyValue::Table` is unreachable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableValue {}

/// The value representation of a property.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PropertyValue {
    /// No representation was supplied (placeholder)
    #[default]
    Unset,
    Scalar(f64),
    /// Terms in document order; order matters for rendering only
    LaurentPolynomial(Vec<LaurentTerm>),
    Table(TableValue),
}

impl PropertyValue {
    /// Short name of the representation, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Unset => "unset",
            PropertyValue::Scalar(_) => "scalar",
            PropertyValue::LaurentPolynomial(_) => "Laurent polynomial",
            PropertyValue::Table(table) => match *table {},
        }
    }
}

/// Display metadata for the independent variable of a non-scalar value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DependentVariable {
    pub print_name: Option<String>,
    pub print_symbol: Option<String>,
    pub unit: Option<String>,
}

impl DependentVariable {
    pub fn is_empty(&self) -> bool {
        self.print_name.is_none() && self.print_symbol.is_none() && self.unit.is_none()
    }
}

/// Raw, optional inputs for [`Property::new`].
///
/// Mirrors the recognized fields of a property entry in the source document.
/// At most one of `value`, `value_laurent_poly` and `value_table` may be set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyFields {
    pub unit: Option<String>,
    pub value: Option<f64>,
    pub value_laurent_poly: Option<Vec<LaurentTerm>>,
    pub value_table: Option<serde_json::Value>,
    pub dependent_variable: DependentVariable,
    pub print_name: Option<String>,
    pub reference: Option<String>,
    pub uncertainty: Option<f64>,
    pub print_symbol: Option<String>,
}

/// A single typed material property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    unit: Option<String>,
    value: PropertyValue,
    dependent_variable: DependentVariable,
    print_name: String,
    print_symbol: Option<String>,
    reference: Option<String>,
    uncertainty: Option<f64>,
}

impl Property {
    /// Build a property from raw fields, enforcing the single-representation rule.
    ///
    /// # Errors
    ///
    /// * `ConflictingValueDefinition` - more than one value representation given
    /// * `UnsupportedValueType` - a table value was given
    pub fn new(name: impl Into<String>, fields: PropertyFields) -> MistResult<Self> {
        let name = name.into();

        let supplied = [
            fields.value.is_some(),
            fields.value_laurent_poly.is_some(),
            fields.value_table.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();

        if supplied > 1 {
            return Err(MistError::ConflictingValueDefinition { property: name });
        }
        if fields.value_table.is_some() {
            return Err(MistError::UnsupportedValueType { property: name });
        }

        let value = match (fields.value, fields.value_laurent_poly) {
            (Some(scalar), _) => PropertyValue::Scalar(scalar),
            (None, Some(terms)) => PropertyValue::LaurentPolynomial(terms),
            (None, None) => PropertyValue::Unset,
        };

        Ok(Property {
            print_name: fields.print_name.unwrap_or_else(|| name.clone()),
            name,
            unit: fields.unit,
            value,
            dependent_variable: fields.dependent_variable,
            print_symbol: fields.print_symbol,
            reference: fields.reference,
            uncertainty: fields.uncertainty,
        })
    }

    /// A property with no value representation
    pub fn unset(name: impl Into<String>) -> Self {
        let name = name.into();
        Property {
            print_name: name.clone(),
            name,
            unit: None,
            value: PropertyValue::Unset,
            dependent_variable: DependentVariable::default(),
            print_symbol: None,
            reference: None,
            uncertainty: None,
        }
    }

    /// A scalar-valued property
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Property {
            value: PropertyValue::Scalar(value),
            ..Property::unset(name)
        }
    }

    /// A Laurent-polynomial-valued property from `(coefficient, exponent)` pairs
    pub fn laurent<T: Into<LaurentTerm>>(name: impl Into<String>, terms: impl IntoIterator<Item = T>) -> Self {
        Property {
            value: PropertyValue::LaurentPolynomial(terms.into_iter().map(Into::into).collect()),
            ..Property::unset(name)
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_print_name(mut self, print_name: impl Into<String>) -> Self {
        self.print_name = print_name.into();
        self
    }

    pub fn with_print_symbol(mut self, print_symbol: impl Into<String>) -> Self {
        self.print_symbol = Some(print_symbol.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_uncertainty(mut self, uncertainty: f64) -> Self {
        self.uncertainty = Some(uncertainty);
        self
    }

    pub fn with_dependent_variable(mut self, dependent_variable: DependentVariable) -> Self {
        self.dependent_variable = dependent_variable;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn dependent_variable(&self) -> &DependentVariable {
        &self.dependent_variable
    }

    pub fn print_name(&self) -> &str {
        &self.print_name
    }

    pub fn print_symbol(&self) -> Option<&str> {
        self.print_symbol.as_deref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn uncertainty(&self) -> Option<f64> {
        self.uncertainty
    }

    /// Evaluate the Laurent polynomial at `x`.
    ///
    /// # Errors
    ///
    /// `WrongVariant` if the value is not a Laurent polynomial.
    pub fn evaluate_at(&self, x: f64) -> MistResult<f64> {
        let terms = self.coefficients()?;
        Ok(terms.iter().map(|term| term.evaluate(x)).sum())
    }

    /// Numeric value at the given independent-variable value.
    ///
    /// Scalars are returned as-is; polynomials are evaluated at `x`. This is
    /// the only place exporters turn a property into a number.
    ///
    /// # Errors
    ///
    /// `UnsupportedForNumericEvaluation` for unset (or table) values.
    pub fn numeric_value_at(&self, x: f64) -> MistResult<f64> {
        match &self.value {
            PropertyValue::Scalar(value) => Ok(*value),
            PropertyValue::LaurentPolynomial(_) => self.evaluate_at(x),
            PropertyValue::Unset => Err(MistError::UnsupportedForNumericEvaluation {
                property: self.name.clone(),
                found: self.value.kind().to_string(),
            }),
            PropertyValue::Table(table) => match *table {},
        }
    }

    /// The scalar value.
    ///
    /// # Errors
    ///
    /// `WrongVariant` if the value is not a scalar.
    pub fn scalar_value(&self) -> MistResult<f64> {
        match &self.value {
            PropertyValue::Scalar(value) => Ok(*value),
            other => Err(MistError::wrong_variant(&self.name, "scalar", other.kind())),
        }
    }

    /// The polynomial terms in document order.
    ///
    /// # Errors
    ///
    /// `WrongVariant` if the value is not a Laurent polynomial.
    pub fn coefficients(&self) -> MistResult<&[LaurentTerm]> {
        match &self.value {
            PropertyValue::LaurentPolynomial(terms) => Ok(terms),
            other => Err(MistError::wrong_variant(&self.name, "Laurent polynomial", other.kind())),
        }
    }
}

/// An ordered mapping from a string key (solute element or phase name) to an
/// optional property.
///
/// Keys with no entry in the source document are kept as `None` so that
/// reports still list them in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyedProperties {
    entries: Vec<(String, Option<Property>)>,
}

impl KeyedProperties {
    pub fn new() -> Self {
        KeyedProperties::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, property: Option<Property>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = property,
            None => self.entries.push((key, property)),
        }
    }

    /// Property for `key`, if the key is known and set
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .and_then(|(_, property)| property.as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Property>)> {
        self.entries
            .iter()
            .map(|(key, property)| (key.as_str(), property.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
