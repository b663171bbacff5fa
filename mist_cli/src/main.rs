//! # Mist CLI Application
//!
//! Command line front end for `mist_core`.
//!
//! ```text
//! mist report SS316L.json --out SS316L.md --pdf SS316L.pdf --section composition --section properties
//! mist export SS316L.json --format exaca --out-dir build/
//! mist export SS316L.json --format three-d-thesis --initial-temperature 300
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG=debug` to see ignored document keys
//! and written files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use mist_core::errors::MistResult;
use mist_core::export::{render_export, ExportFormat};
use mist_core::file_io::write_atomic;
use mist_core::loader::load_file;
use mist_core::pdf::{DocumentRenderer, TypstRenderer};
use mist_core::report::{build_report, ReportSection};
use mist_core::settings::{ExportSettings, ReportSettings};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mist")]
#[command(about = "Material property reports and simulation input files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a property report as Markdown and/or PDF
    Report {
        /// Material JSON document
        input: PathBuf,

        /// Markdown output path (printed to stdout when neither --out nor --pdf is given)
        #[arg(long)]
        out: Option<PathBuf>,

        /// PDF output path
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Sections to include (repeatable; default: properties)
        #[arg(long = "section", value_enum)]
        sections: Vec<SectionArg>,

        /// Include every section
        #[arg(long, conflicts_with = "sections")]
        all_sections: bool,
    },

    /// Write input files for a simulation code
    Export {
        /// Material JSON document
        input: PathBuf,

        /// Target simulation code
        #[arg(long, value_enum)]
        format: FormatArg,

        /// Directory for files written under their default names
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Path for the primary artifact, overriding its default name
        #[arg(long)]
        out: Option<PathBuf>,

        /// Path for the AdditiveFOAM thermoPath file (additive-foam only)
        #[arg(long)]
        thermo_out: Option<PathBuf>,

        /// Evaluate temperature-dependent properties here instead of at the solidus
        #[arg(long)]
        reference_temperature: Option<f64>,

        /// 3DThesis initial temperature (T_0)
        #[arg(long)]
        initial_temperature: Option<f64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SectionArg {
    Composition,
    Properties,
    Phases,
    Solidification,
}

impl From<SectionArg> for ReportSection {
    fn from(arg: SectionArg) -> Self {
        match arg {
            SectionArg::Composition => ReportSection::Composition,
            SectionArg::Properties => ReportSection::Properties,
            SectionArg::Phases => ReportSection::Phases,
            SectionArg::Solidification => ReportSection::Solidification,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Adamantine,
    AdditiveFoam,
    ThreeDThesis,
    Exaca,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Adamantine => ExportFormat::Adamantine,
            FormatArg::AdditiveFoam => ExportFormat::AdditiveFoam,
            FormatArg::ThreeDThesis => ExportFormat::ThreeDThesis,
            FormatArg::Exaca => ExportFormat::Exaca,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Report {
            input,
            out,
            pdf,
            sections,
            all_sections,
        } => {
            let settings = if all_sections {
                ReportSettings::all_sections()
            } else if sections.is_empty() {
                ReportSettings::default()
            } else {
                ReportSettings {
                    sections: sections.into_iter().map(ReportSection::from).collect(),
                }
            };
            run_report(&input, out.as_deref(), pdf.as_deref(), &settings)
        }
        Command::Export {
            input,
            format,
            out_dir,
            out,
            thermo_out,
            reference_temperature,
            initial_temperature,
        } => {
            let settings = ExportSettings {
                reference_temperature,
                initial_temperature,
            };
            let format = ExportFormat::from(format);
            let paths = match artifact_paths(format, &out_dir, out, thermo_out) {
                Ok(paths) => paths,
                Err(message) => Cli::command().error(ErrorKind::ArgumentConflict, message).exit(),
            };
            run_export(&input, format, &paths, &settings)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run_report(input: &Path, out: Option<&Path>, pdf: Option<&Path>, settings: &ReportSettings) -> MistResult<()> {
    let material = load_file(input)?;
    let report = build_report(&material, &settings.sections);

    if out.is_none() && pdf.is_none() {
        print!("{}", report.to_markdown());
        return Ok(());
    }

    if let Some(path) = out {
        write_atomic(path, report.to_markdown().as_bytes())?;
        info!("Wrote report {}", path.display());
    }

    if let Some(path) = pdf {
        let bytes = TypstRenderer.render(&report)?;
        write_atomic(path, &bytes)?;
        info!("Wrote PDF {}", path.display());
    }

    Ok(())
}

/// Output path for each artifact of `format`, in artifact order.
///
/// `out` replaces the first artifact's path and `thermo_out` the second;
/// the rest land in `out_dir` under their default names.
fn artifact_paths(
    format: ExportFormat,
    out_dir: &Path,
    out: Option<PathBuf>,
    thermo_out: Option<PathBuf>,
) -> Result<Vec<PathBuf>, String> {
    let names = format.default_file_names();
    if thermo_out.is_some() && names.len() < 2 {
        return Err(format!(
            "--thermo-out only applies to additive-foam, not {}",
            format.code_name()
        ));
    }

    let overrides = [out, thermo_out];
    Ok(names
        .iter()
        .zip(overrides)
        .map(|(name, path)| path.unwrap_or_else(|| out_dir.join(name)))
        .collect())
}

fn run_export(input: &Path, format: ExportFormat, paths: &[PathBuf], settings: &ExportSettings) -> MistResult<()> {
    let material = load_file(input)?;
    let artifacts = render_export(&material, format, settings)?;

    for ((_, contents), path) in artifacts.iter().zip(paths) {
        write_atomic(path, contents.as_bytes())?;
        info!("Wrote {} input {}", format.code_name(), path.display());
    }

    Ok(())
}
