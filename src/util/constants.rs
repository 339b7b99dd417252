// eps2svg - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "eps2svg";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "eps2svg";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// File extensions and output layout
// =============================================================================

/// Extension (without dot) of the files picked up by discovery.
/// Matched case-insensitively.
pub const SOURCE_EXTENSION: &str = "eps";

/// Extension (without dot) given to every converted file.
pub const TARGET_EXTENSION: &str = "svg";

/// Include glob used by discovery. Kept in step with `SOURCE_EXTENSION`.
pub const SOURCE_GLOB: &str = "*.eps";

/// Name of the output directory created under the source root when no
/// output directory is given.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "SVG";

// =============================================================================
// Discovery limits
// =============================================================================

/// Smallest accepted `[discovery] max_depth`. The walk is unbounded unless
/// a depth is configured, and an EPS file below a configured depth is an
/// error rather than a silent skip.
pub const MIN_MAX_DEPTH: usize = 1;

/// Default maximum number of EPS files accepted in a single run.
pub const DEFAULT_MAX_FILES: usize = 100_000;

/// Minimum sensible value for the max-files limit.
pub const MIN_MAX_FILES: usize = 1;

/// Hard upper bound on max files (prevents configuration mistakes).
pub const ABSOLUTE_MAX_FILES: usize = 1_000_000;

/// Default exclude glob patterns: none, every directory is searched.
/// Literal entries added in config prune whole directories.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[];

// =============================================================================
// External converter
// =============================================================================

/// Binary name searched for on `PATH`.
#[cfg(windows)]
pub const CONVERTER_BINARY: &str = "inkscape.exe";

/// Binary name searched for on `PATH`.
#[cfg(not(windows))]
pub const CONVERTER_BINARY: &str = "inkscape";

/// Install locations probed after `PATH` comes up empty.
#[cfg(target_os = "macos")]
pub const CONVERTER_WELL_KNOWN_PATHS: &[&str] = &[
    "/Applications/Inkscape.app/Contents/MacOS/inkscape",
    "/opt/homebrew/bin/inkscape",
    "/usr/local/bin/inkscape",
];

/// Install locations probed after `PATH` comes up empty.
#[cfg(windows)]
pub const CONVERTER_WELL_KNOWN_PATHS: &[&str] = &[
    r"C:\Program Files\Inkscape\bin\inkscape.exe",
    r"C:\Program Files (x86)\Inkscape\bin\inkscape.exe",
];

/// Install locations probed after `PATH` comes up empty.
#[cfg(not(any(target_os = "macos", windows)))]
pub const CONVERTER_WELL_KNOWN_PATHS: &[&str] = &[
    "/usr/bin/inkscape",
    "/usr/local/bin/inkscape",
    "/snap/bin/inkscape",
];

/// Environment variable naming the converter binary explicitly.
pub const CONVERTER_ENV_VAR: &str = "EPS2SVG_CONVERTER";

/// Converter option carrying the output file path (`--export-filename=<path>`).
pub const EXPORT_FILENAME_FLAG: &str = "--export-filename";

/// Converter flag requesting plain SVG without editor-specific metadata.
pub const EXPORT_PLAIN_SVG_FLAG: &str = "--export-plain-svg";

/// Converter flag turning text objects into paths.
pub const EXPORT_TEXT_TO_PATH_FLAG: &str = "--export-text-to-path";

// =============================================================================
// Exit codes
// =============================================================================

/// Generic failure.
pub const EXIT_FAILURE: u8 = 1;

/// The converter binary could not be located (shell "command not found").
pub const EXIT_CONVERTER_NOT_FOUND: u8 = 127;

// =============================================================================
// Logging
// =============================================================================

/// Default log level. Kept quiet because stdout carries the progress report.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Maximum size of config.toml in bytes.
pub const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024; // 64 KB
