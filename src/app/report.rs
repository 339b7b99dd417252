// eps2svg - app/report.rs
//
// JSON run report: the `RunSummary` of a finished run, written to a file
// the user names with --report.

use crate::core::model::RunSummary;
use crate::util::error::ReportError;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serialise `summary` as pretty JSON into `writer`.
pub fn write_summary<W: Write>(
    summary: &RunSummary,
    writer: W,
    report_path: &Path,
) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(writer, summary).map_err(|e| ReportError::Json {
        path: report_path.to_path_buf(),
        source: e,
    })
}

/// Write `summary` to `path`, replacing any existing file.
pub fn save_report(summary: &RunSummary, path: &Path) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write_summary(summary, &mut writer, path)?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    tracing::debug!(path = %path.display(), "Run report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ConversionJob, ConversionPlan, JobOutcome};
    use std::path::PathBuf;

    fn summary() -> RunSummary {
        let job = ConversionJob {
            input: PathBuf::from("src/logo.eps"),
            relative: PathBuf::from("logo.eps"),
            output: PathBuf::from("src/SVG/logo.svg"),
        };
        let plan = ConversionPlan {
            source_root: PathBuf::from("src"),
            output_root: PathBuf::from("src/SVG"),
            jobs: vec![job.clone()],
        };
        let mut s = RunSummary::begin(&plan, PathBuf::from("/usr/bin/inkscape"), false);
        s.record(&job, JobOutcome::Converted, 42);
        s.finish();
        s
    }

    #[test]
    fn test_summary_json_shape() {
        let mut buf = Vec::new();
        write_summary(&summary(), &mut buf, Path::new("report.json")).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["converted"], 1);
        assert_eq!(value["discovered"], 1);
        assert_eq!(value["converter"], "/usr/bin/inkscape");
        assert_eq!(value["jobs"][0]["outcome"], "converted");
        assert_eq!(value["jobs"][0]["elapsed_ms"], 42);
        assert!(value["started_at"].is_string());
    }

    #[test]
    fn test_save_report_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        save_report(&summary(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("logo.svg"), "got: {text}");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_save_report_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("report.json");
        assert!(matches!(
            save_report(&summary(), &path),
            Err(ReportError::Io { .. })
        ));
    }
}
