// eps2svg - core/mapping.rs
//
// Source-to-output path mapping. Every EPS file keeps its position relative
// to the source root; only the root and the extension change.

use crate::core::model::{ConversionJob, ConversionPlan, DiscoveredFile};
use crate::util::constants;
use crate::util::error::MappingError;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Default output root: `<source>/<dir_name>`.
pub fn default_output_root(source_root: &Path, dir_name: &str) -> PathBuf {
    source_root.join(dir_name)
}

/// Map a single input file to its output location.
pub fn map_job(
    source_root: &Path,
    output_root: &Path,
    input: &Path,
) -> Result<ConversionJob, MappingError> {
    let relative = input
        .strip_prefix(source_root)
        .map_err(|_| MappingError::OutsideSourceRoot {
            input: input.to_path_buf(),
            root: source_root.to_path_buf(),
        })?
        .to_path_buf();

    let file_name = relative
        .file_name()
        .ok_or_else(|| MappingError::OutsideSourceRoot {
            input: input.to_path_buf(),
            root: source_root.to_path_buf(),
        })?;

    let mut output = output_root.join(&relative);
    output.set_file_name(target_file_name(file_name));

    Ok(ConversionJob {
        input: input.to_path_buf(),
        relative,
        output,
    })
}

/// Map every discovered file, preserving discovery order.
pub fn plan_conversions(
    source_root: &Path,
    output_root: &Path,
    files: &[DiscoveredFile],
) -> Result<ConversionPlan, MappingError> {
    let jobs = files
        .iter()
        .map(|f| map_job(source_root, output_root, &f.path))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ConversionPlan {
        source_root: source_root.to_path_buf(),
        output_root: output_root.to_path_buf(),
        jobs,
    })
}

/// If `output_root` already exists strictly inside `source_root`, return it
/// re-expressed under `source_root` the way the walker will produce it, so
/// discovery can prune it.
///
/// Returns `None` when the output root does not exist yet (nothing to prune)
/// or lies elsewhere.
pub fn nested_output_dir(source_root: &Path, output_root: &Path) -> Option<PathBuf> {
    let src = std::fs::canonicalize(source_root).ok()?;
    let out = std::fs::canonicalize(output_root).ok()?;
    if out == src {
        return None;
    }
    let rel = out.strip_prefix(&src).ok()?;
    Some(source_root.join(rel))
}

/// `figure.EPS` -> `figure.svg`. The source extension is matched without
/// regard to case; anything else just gets its last extension replaced.
fn target_file_name(name: &OsStr) -> OsString {
    let suffix_len = constants::SOURCE_EXTENSION.len() + 1;
    if let Some(s) = name.to_str() {
        if let Some(tail) = s.len().checked_sub(suffix_len).and_then(|i| s.get(i..)) {
            let dotted = format!(".{}", constants::SOURCE_EXTENSION);
            if tail.eq_ignore_ascii_case(&dotted) {
                let stem = &s[..s.len() - suffix_len];
                return OsString::from(format!("{stem}.{}", constants::TARGET_EXTENSION));
            }
        }
    }
    Path::new(name)
        .with_extension(constants::TARGET_EXTENSION)
        .into_os_string()
}
