//! # PDF Generation Module
//!
//! Renders a material [`Report`] to PDF using Typst.
//!
//! ## Architecture
//!
//! - [`DocumentRenderer`] is the seam: report in, document bytes out
//! - [`TypstRenderer`] builds Typst source from the report tables and compiles
//!   it in-process against fonts bundled by `typst-assets`
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use mist_core::loader::load_file;
//! use mist_core::pdf::{DocumentRenderer, TypstRenderer};
//! use mist_core::report::{build_report, ReportSection};
//! use std::path::Path;
//!
//! let material = load_file(Path::new("SS316L.json")).unwrap();
//! let report = build_report(&material, &[ReportSection::Properties]);
//! let pdf_bytes = TypstRenderer::default().render(&report).unwrap();
//! std::fs::write("SS316L.pdf", pdf_bytes).unwrap();
//! ```

use chrono::Utc;
use once_cell::sync::Lazy;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{MistError, MistResult};
use crate::report::{format_value, CellValue, Report, MISSING};

/// Turns a report into a binary document.
pub trait DocumentRenderer {
    fn render(&self, report: &Report) -> MistResult<Vec<u8>>;
}

// ============================================================================
// Typst World Implementation
// ============================================================================

/// Fonts bundled with typst-assets, parsed once per process
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    typst_assets::fonts()
        .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
        .collect()
});

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(FontBook::from_fonts(FONTS.iter())),
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Typst Source
// ============================================================================

const PAGE_SETUP: &str = r##"
#set page(
  paper: "us-letter",
  margin: (top: 1in, bottom: 1in, left: 1in, right: 1in),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(size: 11pt)
"##;

/// Renders reports through an in-process Typst compiler.
#[derive(Debug, Clone, Default)]
pub struct TypstRenderer;

impl TypstRenderer {
    /// Typst source for `report`
    pub fn source(&self, report: &Report) -> String {
        let mut source = PAGE_SETUP.replace("{{DATE}}", &Utc::now().format("%Y-%m-%d").to_string());

        source.push_str(&format!(
            "\n= Material Properties: {}\n\n",
            escape_typst(&report.material_name)
        ));

        for table in &report.tables {
            source.push_str(&format!("== {}\n\n", escape_typst(&table.heading)));
            source.push_str(
                "#table(\n  columns: (1fr, auto, auto, auto),\n  inset: 6pt,\n  stroke: 0.5pt,\n  align: (left, right, left, center),\n",
            );
            source.push_str(&format!(
                "  table.header([*{}*], [*{}*], [*Units*], [*Data Source*]),\n",
                escape_typst(&table.label_header),
                escape_typst(&table.value_header)
            ));
            for row in &table.rows {
                source.push_str(&format!(
                    "  [{}], [{}], [{}], [{}],\n",
                    escape_typst(&row.label),
                    typst_value(&row.value),
                    row.unit.as_deref().map(escape_typst).unwrap_or_else(|| escape_typst(MISSING)),
                    escape_typst(&row.citation_text())
                ));
            }
            source.push_str(")\n\n");
        }

        source.push_str(&format!("== Notes\n\n{}\n\n", escape_typst(&report.notes)));

        source.push_str("== References\n\n");
        for (number, reference) in report.references.iter() {
            source.push_str(&format!("\\[{}\\] {}\n\n", number, escape_typst(reference)));
        }

        source
    }
}

impl DocumentRenderer for TypstRenderer {
    fn render(&self, report: &Report) -> MistResult<Vec<u8>> {
        let world = PdfWorld::new(self.source(report));
        let warned = typst::compile(&world);

        let document = warned.output.map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
            MistError::RenderFailed {
                message: format!("Typst compilation failed: {}", error_msgs.join("; ")),
            }
        })?;

        typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
            MistError::RenderFailed {
                message: format!("PDF rendering failed: {}", error_msgs.join("; ")),
            }
        })
    }
}

/// Polynomial terms as markup: `600 + 0.05 _T_ + 2.5 _T_#super[2]`
fn typst_value(value: &CellValue) -> String {
    match value {
        CellValue::Missing => escape_typst(MISSING),
        CellValue::Number(number) => escape_typst(&format_value(*number)),
        CellValue::Polynomial { terms, symbol } => {
            let symbol = escape_typst(symbol);
            terms
                .iter()
                .map(|term| {
                    let coefficient = escape_typst(&format_value(term.coefficient));
                    match term.exponent {
                        0 => coefficient,
                        1 => format!("{} _{}_", coefficient, symbol),
                        exponent => format!("{} _{}_#super[{}]", coefficient, symbol, exponent),
                    }
                })
                .collect::<Vec<_>>()
                .join(" + ")
        }
    }
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '^' => "\\^".to_string(),
            '-' => "\\-".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialBuilder;
    use crate::property::Property;
    use crate::report::{build_report, ReportSection};
    use crate::schema::ThermophysicalProperty;

    fn sample_report() -> Report {
        let material = MaterialBuilder::new("SS316L", "Notes_with_underscores")
            .property(
                ThermophysicalProperty::Density,
                Property::scalar("density", 7955.0)
                    .with_unit("kg/m^3")
                    .with_reference("C.S. Kim, 1975."),
            )
            .property(
                ThermophysicalProperty::SpecificHeatSolid,
                Property::laurent("specific_heat_solid", vec![(600.0, 0), (0.05, 1)]),
            )
            .build();
        build_report(&material, &[ReportSection::Properties])
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("kg/m^3"), "kg/m\\^3");
        assert_eq!(escape_typst("#1 *bold*"), "\\#1 \\*bold\\*");
        assert_eq!(escape_typst("[1]"), "\\[1\\]");
    }

    #[test]
    fn test_typst_source_contains_tables() {
        let source = TypstRenderer.source(&sample_report());
        assert!(source.contains("= Material Properties: SS316L"));
        assert!(source.contains("== Thermophysical Properties"));
        assert!(source.contains("[density], [7955], [kg/m\\^3], [\\[1\\]],"));
        assert!(source.contains("[600 + 0.05 _x_]"));
        assert!(source.contains("Notes\\_with\\_underscores"));
        assert!(source.contains("\\[1\\] C.S. Kim, 1975."));
    }

    #[test]
    fn test_pdf_generation() {
        let pdf = TypstRenderer.render(&sample_report());
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
