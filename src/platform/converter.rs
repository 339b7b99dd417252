// eps2svg - platform/converter.rs
//
// External converter discovery and invocation.
//
// The converter is an opaque, synchronous, single-shot process: one
// invocation per file, no retry, no timeout. Its stdout/stderr are inherited
// so its own diagnostics reach the user unchanged.

use crate::core::model::ConversionJob;
use crate::util::constants;
use crate::util::error::ConverterError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

// =============================================================================
// Converter seam
// =============================================================================

/// Something that turns one EPS file into one SVG file.
///
/// The app layer only talks to this trait so the run loop can be tested
/// without a real converter installed.
pub trait Converter {
    /// Binary (or identifier) used for reporting.
    fn program(&self) -> &Path;

    /// Convert `job.input` into `job.output`. The output's parent directory
    /// already exists when this is called.
    fn convert(&self, job: &ConversionJob) -> Result<(), ConverterError>;
}

// =============================================================================
// Location
// =============================================================================

/// Where the converter path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterOrigin {
    CliFlag,
    Environment,
    ConfigFile,
    SearchPath,
    WellKnownLocation,
}

impl ConverterOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            ConverterOrigin::CliFlag => "--converter",
            ConverterOrigin::Environment => constants::CONVERTER_ENV_VAR,
            ConverterOrigin::ConfigFile => "[converter] path",
            ConverterOrigin::SearchPath => "PATH",
            ConverterOrigin::WellKnownLocation => "well-known location",
        }
    }
}

/// A converter binary that exists and is executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedConverter {
    pub path: PathBuf,
    pub origin: ConverterOrigin,
}

/// Inputs to converter location, gathered by the caller so this stays pure
/// with respect to process environment.
#[derive(Debug, Default, Clone)]
pub struct ConverterSearch {
    /// `--converter` value.
    pub cli: Option<PathBuf>,
    /// `EPS2SVG_CONVERTER` value.
    pub env: Option<OsString>,
    /// `[converter] path` value.
    pub config: Option<PathBuf>,
    /// `PATH` value.
    pub search_path: Option<OsString>,
    /// Install locations probed last.
    pub well_known: Vec<PathBuf>,
}

impl ConverterSearch {
    /// Populate from the process environment and the platform's well-known
    /// install locations.
    pub fn from_env(cli: Option<PathBuf>, config: Option<PathBuf>) -> Self {
        Self {
            cli,
            env: std::env::var_os(constants::CONVERTER_ENV_VAR).filter(|v| !v.is_empty()),
            config,
            search_path: std::env::var_os("PATH"),
            well_known: constants::CONVERTER_WELL_KNOWN_PATHS
                .iter()
                .map(PathBuf::from)
                .collect(),
        }
    }
}

/// Resolve the converter binary.
///
/// Order: CLI flag, environment variable, config file, `PATH`, well-known
/// install locations. The first explicit choice wins outright: if it does not
/// resolve to an executable the search stops with `ExplicitNotFound`.
pub fn locate_converter(search: &ConverterSearch) -> Result<LocatedConverter, ConverterError> {
    let explicit = [
        (search.cli.clone(), ConverterOrigin::CliFlag),
        (
            search.env.clone().map(PathBuf::from),
            ConverterOrigin::Environment,
        ),
        (search.config.clone(), ConverterOrigin::ConfigFile),
    ];

    if let Some((candidate, origin)) = explicit
        .into_iter()
        .find_map(|(p, origin)| p.map(|p| (p, origin)))
    {
        return resolve_explicit(&candidate, search.search_path.as_deref())
            .map(|path| {
                tracing::debug!(path = %path.display(), origin = origin.label(), "Converter resolved");
                LocatedConverter { path, origin }
            })
            .ok_or(ConverterError::ExplicitNotFound {
                path: candidate,
                origin: origin.label(),
            });
    }

    let mut searched = Vec::new();

    if let Some(path) = find_on_path(
        constants::CONVERTER_BINARY,
        search.search_path.as_deref(),
        &mut searched,
    ) {
        tracing::debug!(path = %path.display(), "Converter found on PATH");
        return Ok(LocatedConverter {
            path,
            origin: ConverterOrigin::SearchPath,
        });
    }

    for candidate in &search.well_known {
        searched.push(candidate.clone());
        if is_executable(candidate) {
            tracing::debug!(path = %candidate.display(), "Converter found at well-known location");
            return Ok(LocatedConverter {
                path: candidate.clone(),
                origin: ConverterOrigin::WellKnownLocation,
            });
        }
    }

    tracing::debug!(searched = ?searched, "Converter not found");
    Err(ConverterError::NotFound { searched })
}

/// An explicit value with a directory separator is used as-is; a bare name
/// (e.g. `inkscape-1.3`) is looked up on `PATH`.
fn resolve_explicit(candidate: &Path, search_path: Option<&std::ffi::OsStr>) -> Option<PathBuf> {
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    let name = candidate.to_str()?;
    find_on_path(name, search_path, &mut Vec::new())
        .or_else(|| is_executable(candidate).then(|| candidate.to_path_buf()))
}

fn find_on_path(
    binary: &str,
    search_path: Option<&std::ffi::OsStr>,
    searched: &mut Vec<PathBuf>,
) -> Option<PathBuf> {
    let dirs = search_path?;
    for dir in std::env::split_paths(dirs) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let candidate = dir.join(binary);
        searched.push(candidate.clone());
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

// =============================================================================
// Inkscape
// =============================================================================

/// Runs Inkscape (1.x command line) once per job.
#[derive(Debug, Clone)]
pub struct InkscapeConverter {
    program: PathBuf,
    text_to_path: bool,
}

impl InkscapeConverter {
    pub fn new(program: PathBuf, text_to_path: bool) -> Self {
        Self {
            program,
            text_to_path,
        }
    }
}

/// Arguments for one conversion:
/// `<input> --export-filename=<output> --export-plain-svg [--export-text-to-path]`.
pub fn build_args(job: &ConversionJob, text_to_path: bool) -> Vec<OsString> {
    let mut export_filename = OsString::from(format!("{}=", constants::EXPORT_FILENAME_FLAG));
    export_filename.push(job.output.as_os_str());

    let mut args = vec![
        job.input.clone().into_os_string(),
        export_filename,
        OsString::from(constants::EXPORT_PLAIN_SVG_FLAG),
    ];
    if text_to_path {
        args.push(OsString::from(constants::EXPORT_TEXT_TO_PATH_FLAG));
    }
    args
}

impl Converter for InkscapeConverter {
    fn program(&self) -> &Path {
        &self.program
    }

    fn convert(&self, job: &ConversionJob) -> Result<(), ConverterError> {
        let args = build_args(job, self.text_to_path);
        tracing::debug!(program = %self.program.display(), args = ?args, "Invoking converter");

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| ConverterError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            tracing::debug!(input = %job.input.display(), %status, "Converter exited unsuccessfully");
            Err(ConverterError::Failed {
                input: job.input.clone(),
                status,
            })
        }
    }
}
