// eps2svg - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use crate::util::constants;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Top-level error type for all eps2svg operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum Eps2SvgError {
    /// File discovery failed.
    Discovery(DiscoveryError),

    /// Output path derivation failed.
    Mapping(MappingError),

    /// Locating or running the external converter failed.
    Converter(ConverterError),

    /// Configuration loading failed.
    Config(ConfigError),

    /// Writing the JSON run report failed.
    Report(ReportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl Eps2SvgError {
    /// Process exit code for this error.
    ///
    /// A failed conversion propagates the converter's own exit code, the way
    /// a fail-fast shell loop would. A converter that itself exits with 127
    /// is reported as 1 so it never reads as "converter not found".
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Converter(ConverterError::NotFound { .. })
            | Self::Converter(ConverterError::ExplicitNotFound { .. }) => {
                constants::EXIT_CONVERTER_NOT_FOUND
            }
            Self::Converter(ConverterError::Failed { status, .. }) => status
                .code()
                .and_then(|c| u8::try_from(c).ok())
                .filter(|c| *c != 0 && *c != constants::EXIT_CONVERTER_NOT_FOUND)
                .unwrap_or(constants::EXIT_FAILURE),
            _ => constants::EXIT_FAILURE,
        }
    }
}

impl fmt::Display for Eps2SvgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Mapping(e) => write!(f, "Path mapping error: {e}"),
            Self::Converter(e) => write!(f, "Converter error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Report(e) => write!(f, "Report error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for Eps2SvgError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Discovery(e) => Some(e),
            Self::Mapping(e) => Some(e),
            Self::Converter(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Report(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to EPS file discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The source root does not exist or is not accessible.
    RootNotFound { path: PathBuf },

    /// The source root is not a directory.
    NotADirectory { path: PathBuf },

    /// Permission denied accessing the source root.
    PermissionDenied { path: PathBuf, source: io::Error },

    /// Maximum file count exceeded during the walk.
    MaxFilesExceeded { max: usize },

    /// An EPS file sits below the configured `max_depth`.
    DepthLimitExceeded { dir: PathBuf, max: usize },

    /// Walkdir traversal error below the root. Fatal: a run never continues
    /// past an unreadable directory.
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Source directory '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Source path '{}' is not a directory", path.display())
            }
            Self::PermissionDenied { path, source } => {
                write!(
                    f,
                    "Permission denied accessing '{}': {source}",
                    path.display()
                )
            }
            Self::MaxFilesExceeded { max } => {
                write!(
                    f,
                    "Discovery stopped: exceeded maximum of {max} files. \
                     Increase [discovery] max_files in config or narrow the source directory."
                )
            }
            Self::DepthLimitExceeded { dir, max } => {
                write!(
                    f,
                    "EPS files in '{}' are deeper than max_depth = {max}. \
                     Raise or remove [discovery] max_depth in config.",
                    dir.display()
                )
            }
            Self::Traversal { path, source } => {
                write!(f, "Error traversing '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PermissionDenied { source, .. } => Some(source),
            Self::Traversal { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for Eps2SvgError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Mapping errors
// ---------------------------------------------------------------------------

/// Errors deriving an output path from an input path.
#[derive(Debug)]
pub enum MappingError {
    /// The input file does not live under the source root.
    OutsideSourceRoot { input: PathBuf, root: PathBuf },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsideSourceRoot { input, root } => write!(
                f,
                "'{}' is not inside source directory '{}'",
                input.display(),
                root.display()
            ),
        }
    }
}

impl std::error::Error for MappingError {}

impl From<MappingError> for Eps2SvgError {
    fn from(e: MappingError) -> Self {
        Self::Mapping(e)
    }
}

// ---------------------------------------------------------------------------
// Converter errors
// ---------------------------------------------------------------------------

/// Errors related to the external converter.
#[derive(Debug)]
pub enum ConverterError {
    /// No converter was named and none was found on PATH or in the
    /// well-known install locations.
    NotFound { searched: Vec<PathBuf> },

    /// A converter was named explicitly but the path is not an executable file.
    ExplicitNotFound { path: PathBuf, origin: &'static str },

    /// The converter process could not be started.
    Spawn { program: PathBuf, source: io::Error },

    /// The converter exited unsuccessfully for one input.
    Failed { input: PathBuf, status: ExitStatus },
}

impl fmt::Display for ConverterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { searched } => {
                write!(
                    f,
                    "Inkscape not found on PATH or in {} known location(s). \
                     Install it, or pass --converter / set {}",
                    searched.len(),
                    constants::CONVERTER_ENV_VAR
                )
            }
            Self::ExplicitNotFound { path, origin } => write!(
                f,
                "Converter '{}' (from {origin}) does not exist or is not executable",
                path.display()
            ),
            Self::Spawn { program, source } => {
                write!(f, "Failed to start '{}': {source}", program.display())
            }
            Self::Failed { input, status } => {
                write!(f, "Conversion of '{}' failed ({status})", input.display())
            }
        }
    }
}

impl std::error::Error for ConverterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConverterError> for Eps2SvgError {
    fn from(e: ConverterError) -> Self {
        Self::Converter(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Config '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for Eps2SvgError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

/// Errors writing the JSON run report.
#[derive(Debug)]
pub enum ReportError {
    /// I/O error creating or writing the report file.
    Io { path: PathBuf, source: io::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Report I/O error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON report error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ReportError> for Eps2SvgError {
    fn from(e: ReportError) -> Self {
        Self::Report(e)
    }
}

/// Convenience type alias for eps2svg results.
pub type Result<T> = std::result::Result<T, Eps2SvgError>;
