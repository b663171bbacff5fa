//! # Error Types
//!
//! Structured error types for mist_core. Every variant names the property,
//! section, or path that caused it so a failed load or export can be traced
//! back to the offending entry in the source document.
//!
//! ## Example
//!
//! ```rust
//! use mist_core::errors::{MistError, MistResult};
//!
//! fn require_name(name: Option<&str>) -> MistResult<String> {
//!     name.map(str::to_string)
//!         .ok_or_else(|| MistError::schema("name", "mandatory top-level field is missing"))
//! }
//!
//! assert_eq!(require_name(None).unwrap_err().error_code(), "SCHEMA_ERROR");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for mist_core operations
pub type MistResult<T> = Result<T, MistError>;

/// Structured error type for loading, rendering and exporting material records.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum MistError {
    /// More than one of {scalar, polynomial, table} was supplied for a property
    #[error("Conflicting value definition for '{property}': only one of value, value_laurent_poly, value_table may be given")]
    ConflictingValueDefinition { property: String },

    /// Tabular values are declared in the document format but not supported
    #[error("Unsupported value type for '{property}': tabular values are not supported")]
    UnsupportedValueType { property: String },

    /// The source document does not match the expected structure
    #[error("Schema error at '{path}': {reason}")]
    Schema { path: String, reason: String },

    /// A variant-specific accessor was used on the wrong value representation
    #[error("Wrong value variant for '{property}': expected {expected}, found {found}")]
    WrongVariant {
        property: String,
        expected: String,
        found: String,
    },

    /// A numeric value was requested from a table or unset property
    #[error("Property '{property}' has no numeric representation ({found})")]
    UnsupportedForNumericEvaluation { property: String, found: String },

    /// A polynomial does not have the shape an exporter requires
    #[error("Invalid polynomial for '{property}' in {format}: {reason}")]
    InvalidPolynomialDegree {
        property: String,
        format: String,
        reason: String,
    },

    /// An exporter needs a property the material record does not define
    #[error("Missing property '{property}' required by {format}")]
    MissingProperty { property: String, format: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// The document renderer failed to produce output
    #[error("Render failed: {message}")]
    RenderFailed { message: String },
}

impl MistError {
    /// Create a Schema error
    pub fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        MistError::Schema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a WrongVariant error
    pub fn wrong_variant(
        property: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        MistError::WrongVariant {
            property: property.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an InvalidPolynomialDegree error
    pub fn invalid_polynomial(
        property: impl Into<String>,
        format: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        MistError::InvalidPolynomialDegree {
            property: property.into(),
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingProperty error
    pub fn missing_property(property: impl Into<String>, format: impl Into<String>) -> Self {
        MistError::MissingProperty {
            property: property.into(),
            format: format.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        MistError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            MistError::ConflictingValueDefinition { .. } => "CONFLICTING_VALUE_DEFINITION",
            MistError::UnsupportedValueType { .. } => "UNSUPPORTED_VALUE_TYPE",
            MistError::Schema { .. } => "SCHEMA_ERROR",
            MistError::WrongVariant { .. } => "WRONG_VARIANT",
            MistError::UnsupportedForNumericEvaluation { .. } => "UNSUPPORTED_FOR_NUMERIC_EVALUATION",
            MistError::InvalidPolynomialDegree { .. } => "INVALID_POLYNOMIAL_DEGREE",
            MistError::MissingProperty { .. } => "MISSING_PROPERTY",
            MistError::FileError { .. } => "FILE_ERROR",
            MistError::SerializationError { .. } => "SERIALIZATION_ERROR",
            MistError::RenderFailed { .. } => "RENDER_FAILED",
        }
    }
}
