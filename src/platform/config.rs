// eps2svg - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for eps2svg configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Full path of the default config file, inside the platform config
    /// directory (e.g. ~/.config/eps2svg/ or %APPDATA%\eps2svg\config\).
    pub config_file: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let config_file = config_dir.join(constants::CONFIG_FILE_NAME);

            tracing::debug!(
                config = %config_dir.display(),
                "Platform paths resolved"
            );

            Self { config_file }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_file: PathBuf::from(".").join(constants::CONFIG_FILE_NAME),
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[converter]` section.
    pub converter: ConverterSection,
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[output]` section.
    pub output: OutputSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[converter]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ConverterSection {
    /// Explicit converter binary.
    pub path: Option<String>,
    /// Convert text objects to paths.
    pub text_to_path: Option<bool>,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Maximum directory recursion depth.
    pub max_depth: Option<usize>,
    /// Maximum files per run.
    pub max_files: Option<usize>,
    /// Exclude glob patterns.
    pub exclude_patterns: Option<Vec<String>>,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Name of the default output directory under the source root.
    pub dir_name: Option<String>,
    /// Skip targets that already exist.
    pub skip_existing: Option<bool>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Converter --
    pub converter_path: Option<PathBuf>,
    pub text_to_path: bool,

    // -- Discovery --
    /// Unlimited unless set in config.
    pub max_depth: Option<usize>,
    pub max_files: usize,
    pub exclude_patterns: Vec<String>,

    // -- Output --
    pub output_dir_name: String,
    pub skip_existing: bool,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            converter_path: None,
            text_to_path: false,
            max_depth: None,
            max_files: constants::DEFAULT_MAX_FILES,
            exclude_patterns: constants::DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            output_dir_name: constants::DEFAULT_OUTPUT_DIR_NAME.to_string(),
            skip_existing: false,
            log_level: None,
        }
    }
}

/// Load the config file at `path`.
///
/// `required` is true when the user named the file with `--config`; then a
/// missing or unreadable file is an error. Otherwise a missing file means
/// defaults (first run) and read/parse problems become warnings.
///
/// Returns the validated config plus non-fatal warnings. Logging is not yet
/// initialised when this runs, so callers must surface the warnings.
pub fn load_config(path: &Path, required: bool) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let mut warnings: Vec<String> = Vec::new();

    if !required && !path.exists() {
        return Ok((AppConfig::default(), warnings));
    }

    let content = match read_bounded(path) {
        Ok(c) => c,
        Err(e) if required => return Err(e),
        Err(e) => {
            warnings.push(format!("{e}. Using defaults."));
            return Ok((AppConfig::default(), warnings));
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) if required => {
            return Err(ConfigError::TomlParse {
                path: path.to_path_buf(),
                source: e,
            })
        }
        Err(e) => {
            warnings.push(format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                path.display()
            ));
            return Ok((AppConfig::default(), warnings));
        }
    };

    let config = validate(raw, &mut warnings);
    Ok((config, warnings))
}

fn read_bounded(path: &Path) -> Result<String, ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > constants::MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: constants::MAX_CONFIG_FILE_SIZE,
        });
    }
    std::fs::read_to_string(path).map_err(io_err)
}

/// Validate each field against named constants, accumulating all warnings.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Converter --
    if let Some(path) = raw.converter.path {
        if !path.trim().is_empty() {
            config.converter_path = Some(PathBuf::from(path));
        }
    }
    if let Some(flag) = raw.converter.text_to_path {
        config.text_to_path = flag;
    }

    // -- Discovery: max_depth --
    if let Some(depth) = raw.discovery.max_depth {
        if depth >= constants::MIN_MAX_DEPTH {
            config.max_depth = Some(depth);
        } else {
            warnings.push(format!(
                "[discovery] max_depth = {depth} is below {}. Searching without a depth limit.",
                constants::MIN_MAX_DEPTH,
            ));
        }
    }

    // -- Discovery: max_files --
    if let Some(files) = raw.discovery.max_files {
        if (constants::MIN_MAX_FILES..=constants::ABSOLUTE_MAX_FILES).contains(&files) {
            config.max_files = files;
        } else {
            warnings.push(format!(
                "[discovery] max_files = {files} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_FILES,
                constants::ABSOLUTE_MAX_FILES,
                constants::DEFAULT_MAX_FILES,
            ));
        }
    }

    // -- Discovery: exclude_patterns --
    if let Some(patterns) = raw.discovery.exclude_patterns {
        let (good, bad): (Vec<_>, Vec<_>) = patterns
            .into_iter()
            .partition(|p| glob::Pattern::new(p).is_ok());
        for p in bad {
            warnings.push(format!(
                "[discovery] exclude pattern \"{p}\" is not a valid glob. Ignored."
            ));
        }
        config.exclude_patterns = good;
    }

    // -- Output: dir_name --
    if let Some(name) = raw.output.dir_name {
        let is_single_component = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if is_single_component {
            config.output_dir_name = name;
        } else {
            warnings.push(format!(
                "[output] dir_name = \"{name}\" must be a single directory name. Using default ({}).",
                constants::DEFAULT_OUTPUT_DIR_NAME,
            ));
        }
    }

    if let Some(flag) = raw.output.skip_existing {
        config.skip_existing = flag;
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    config
}
