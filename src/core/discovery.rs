// eps2svg - core/discovery.rs
//
// Recursive directory traversal and EPS file discovery.
//
// Architecture note: this module uses `walkdir` for directory traversal as an
// OS abstraction (similar to using std::path::Path). It reads only file
// *metadata*, never file *contents*.
//
// Failure policy:
//   - Any traversal error is fatal. A batch run never silently skips a
//     directory it could not read.
//   - max_files is enforced with an explicit named-constant upper bound.
//   - Exclude patterns short-circuit directory descent via filter_entry so
//     excluded subtrees (e.g. .git/) are never traversed at all.
//   - The walk is sorted by file name so the conversion order is stable
//     across platforms and runs.

use crate::core::model::DiscoveredFile;
use crate::util::constants;
use crate::util::error::DiscoveryError;
use glob::MatchOptions;
use std::path::{Path, PathBuf};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a discovery operation.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Deepest level an EPS file may sit at (1 = directly under the root).
    /// `None` walks the whole tree; with a limit, a matching file below it
    /// fails discovery instead of being skipped.
    pub max_depth: Option<usize>,

    /// Maximum number of matching files before discovery fails.
    pub max_files: usize,

    /// Glob patterns (filename-only) that a file MUST match to be included.
    /// Matched case-insensitively.
    pub include_patterns: Vec<String>,

    /// Glob patterns matched against filenames AND directory component names.
    /// Matching files are skipped; matching directories are not descended into.
    pub exclude_patterns: Vec<String>,

    /// A directory below the root that must not be descended into, expressed
    /// in the same form the walker produces (root joined with a relative
    /// path). Used to keep a nested output tree out of its own input.
    pub prune_dir: Option<PathBuf>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            max_files: constants::DEFAULT_MAX_FILES,
            include_patterns: vec![constants::SOURCE_GLOB.to_string()],
            exclude_patterns: constants::DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            prune_dir: None,
        }
    }
}

/// Glob options shared by include and exclude matching: `*.eps` must match
/// `FIGURE.EPS` as well.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

// =============================================================================
// Discovery
// =============================================================================

/// Discover EPS files under `root`, applying include/exclude glob patterns.
///
/// `on_file_found` is called once per accepted file with the running count.
///
/// Returns files in walk order, which is sorted by file name at every level.
/// Returns `Err` if the root is invalid, if any entry below it cannot be
/// read, or if more than `max_files` files match.
pub fn discover_eps_files<F>(
    root: &Path,
    config: &DiscoveryConfig,
    mut on_file_found: F,
) -> Result<Vec<DiscoveredFile>, DiscoveryError>
where
    F: FnMut(&DiscoveredFile, usize),
{
    // --- Pre-flight validation ---
    // fs::metadata rather than Path::is_dir so PermissionDenied is not
    // reported as "does not exist".
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(DiscoveryError::NotADirectory {
                path: root.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(DiscoveryError::PermissionDenied {
                path: root.to_path_buf(),
                source: e,
            })
        }
        Err(_) => {
            return Err(DiscoveryError::RootNotFound {
                path: root.to_path_buf(),
            })
        }
    }

    // Clamp config limits to absolute bounds.
    let max_files = config.max_files.min(constants::ABSOLUTE_MAX_FILES);
    let max_depth = config.max_depth;

    tracing::debug!(
        root = %root.display(),
        max_depth = ?max_depth,
        max_files,
        include = ?config.include_patterns,
        exclude = ?config.exclude_patterns,
        prune = ?config.prune_dir,
        "Discovery starting"
    );

    let include_pats = compile_patterns(&config.include_patterns, "include");
    let exclude_pats = compile_patterns(&config.exclude_patterns, "exclude");

    let mut files: Vec<DiscoveredFile> = Vec::new();

    let walker = walkdir::WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if !e.file_type().is_dir() || e.depth() == 0 {
                return true;
            }
            if config.prune_dir.as_deref() == Some(e.path()) {
                tracing::debug!(dir = %e.path().display(), "Pruned output directory");
                return false;
            }
            let name = e.file_name().to_string_lossy();
            if is_excluded_component(&name, &exclude_pats) {
                tracing::info!(dir = %e.path().display(), "Skipping excluded directory");
                return false;
            }
            true
        });

    for entry_result in walker {
        let entry = entry_result.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            DiscoveryError::Traversal { path, source: e }
        })?;

        let path = entry.path();
        let file_type = entry.file_type();

        // Symlinks count when they point at a regular file, as `find` does.
        let is_file =
            file_type.is_file() || (file_type.is_symlink() && path.is_file());
        if !is_file {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();

        if is_excluded_filename(&file_name, &exclude_pats) {
            tracing::trace!(file = %file_name, "Excluded by pattern");
            continue;
        }

        if !is_included(&file_name, &include_pats) {
            tracing::trace!(file = %file_name, "Not matched by include patterns");
            continue;
        }

        // Depth counts as walkdir does: files directly under the root are 1.
        if let Some(max) = max_depth {
            if entry.depth() > max {
                let dir = path.parent().unwrap_or(root).to_path_buf();
                return Err(DiscoveryError::DepthLimitExceeded { dir, max });
            }
        }

        if files.len() >= max_files {
            return Err(DiscoveryError::MaxFilesExceeded { max: max_files });
        }

        let discovered = DiscoveredFile {
            path: path.to_path_buf(),
        };

        let count = files.len() + 1;
        on_file_found(&discovered, count);
        files.push(discovered);
    }

    tracing::debug!(files = files.len(), "Discovery complete");

    Ok(files)
}

// =============================================================================
// Glob helpers
// =============================================================================

/// Compile a list of glob pattern strings into `glob::Pattern` objects.
/// Patterns that fail to compile are logged as warnings and skipped.
fn compile_patterns(patterns: &[String], kind: &str) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, kind, error = %e, "Invalid glob pattern, skipping");
                None
            }
        })
        .collect()
}

/// Returns true if `dir_name` matches any exclude pattern that contains no
/// wildcard characters. These are treated as directory component exclusions
/// (e.g. ".git") rather than filename glob patterns.
fn is_excluded_component(dir_name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats.iter().any(|p| {
        let s = p.as_str();
        !s.contains('*')
            && !s.contains('?')
            && !s.contains('[')
            && p.matches_with(dir_name, MATCH_OPTIONS)
    })
}

/// Returns true if `file_name` matches any exclude pattern (wildcard or literal).
fn is_excluded_filename(file_name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats
        .iter()
        .any(|p| p.matches_with(file_name, MATCH_OPTIONS))
}

/// Returns true if `file_name` matches at least one include pattern.
/// An empty include list means "include all" (returns true).
fn is_included(file_name: &str, include_pats: &[glob::Pattern]) -> bool {
    if include_pats.is_empty() {
        return true;
    }
    include_pats
        .iter()
        .any(|p| p.matches_with(file_name, MATCH_OPTIONS))
}

// =============================================================================
// Tests
// =============================================================================
