//! # mist_core - Material Information for Simulation
//!
//! `mist_core` loads a material's property record from a JSON document,
//! renders it as a cited property report (Markdown or PDF), and exports the
//! derived numbers as input files for several solidification and heat
//! transfer simulation codes.
//!
//! ## Design Philosophy
//!
//! - **Typed Values**: a property is unset, a scalar or a Laurent polynomial,
//!   never a bag of optional fields
//! - **Fixed Vocabularies**: property keys are enums; reports iterate them in
//!   declaration order
//! - **Rich Errors**: every failure is a structured [`MistError`]
//!
//! ## Quick Start
//!
//! ```rust
//! use mist_core::loader::load_str;
//! use mist_core::report::{render, ReportSection};
//!
//! let material = load_str(r#"{
//!     "name": "SS316L",
//!     "note": "",
//!     "thermophysical_properties": {
//!         "density": { "unit": "kg/m^3", "value": 7955, "reference": "Kim 1975" }
//!     }
//! }"#).unwrap();
//!
//! let markdown = render(&material, &[ReportSection::Properties]);
//! assert!(markdown.contains("| density | 7955 | $kg/m^3$ | [1] |"));
//! ```
//!
//! ## Modules
//!
//! - [`property`] - Typed property values and Laurent polynomials
//! - [`schema`] - Document field names and property vocabularies
//! - [`phase`] / [`material`] - The in-memory material record
//! - [`loader`] - JSON document to [`MaterialInformation`]
//! - [`report`] - Report tables with deduplicated references
//! - [`pdf`] - Typst-based PDF rendering of reports
//! - [`export`] - Simulation input files
//! - [`settings`] - Export and report options
//! - [`file_io`] - Document reading and atomic writes
//! - [`errors`] - Structured error types

pub mod errors;
pub mod export;
pub mod file_io;
pub mod loader;
pub mod material;
pub mod pdf;
pub mod phase;
pub mod property;
pub mod report;
pub mod schema;
pub mod settings;

// Re-export commonly used types at crate root for convenience
pub use errors::{MistError, MistResult};
pub use export::{render_export, write_export, ExportFormat};
pub use loader::{load, load_file, load_str};
pub use material::{Composition, MaterialBuilder, MaterialInformation, SolidificationMicrostructure};
pub use pdf::{DocumentRenderer, TypstRenderer};
pub use phase::{PhaseEntry, SinglePhase};
pub use property::{KeyedProperties, LaurentTerm, Property, PropertyValue};
pub use report::{build_report, Report, ReportSection};
pub use settings::{ExportSettings, ReportSettings};
