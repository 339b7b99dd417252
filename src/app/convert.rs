// eps2svg - app/convert.rs
//
// Run orchestration: discovery -> path mapping -> one converter call per
// file.
//
// Execution model:
//   - Single-threaded and sequential. Files are handled in discovery order
//     and each conversion blocks until the converter exits.
//   - Fail-fast. The first error of any kind ends the run; files after it
//     are not attempted and nothing is rolled back.
//   - Output directories are created on demand with create_dir_all, so
//     repeated runs and sibling files are safe.

use crate::core::discovery::{self, DiscoveryConfig};
use crate::core::mapping;
use crate::core::model::{ConversionPlan, JobOutcome, ProgressEvent, RunSummary};
use crate::platform::converter::Converter;
use crate::util::error::{Eps2SvgError, Result};
use std::path::Path;
use std::time::Instant;

/// Per-run switches that change what happens to each job.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Leave targets that already exist untouched.
    pub skip_existing: bool,
    /// Report what would be converted without creating anything.
    pub dry_run: bool,
}

/// Discover EPS files under `source_root` and map each one under
/// `output_root`.
///
/// An existing output root nested inside the source root is pruned from the
/// walk so a re-run never picks up its own output tree.
pub fn plan_run(
    source_root: &Path,
    output_root: &Path,
    config: &DiscoveryConfig,
) -> Result<ConversionPlan> {
    let config = DiscoveryConfig {
        prune_dir: config
            .prune_dir
            .clone()
            .or_else(|| mapping::nested_output_dir(source_root, output_root)),
        ..config.clone()
    };

    let files = discovery::discover_eps_files(source_root, &config, |file, count| {
        tracing::trace!(file = %file.path.display(), count, "EPS file found");
    })?;

    let plan = mapping::plan_conversions(source_root, output_root, &files)?;

    tracing::info!(
        source = %source_root.display(),
        output = %output_root.display(),
        files = plan.len(),
        "Conversion plan ready"
    );

    Ok(plan)
}

/// Execute `plan` with `converter`.
///
/// `on_progress` is called before and after every job on the caller's thread.
/// Returns the run summary on full success, or the first error encountered.
pub fn run_conversion<C, F>(
    plan: &ConversionPlan,
    converter: &C,
    options: RunOptions,
    mut on_progress: F,
) -> Result<RunSummary>
where
    C: Converter + ?Sized,
    F: FnMut(ProgressEvent<'_>),
{
    let mut summary =
        RunSummary::begin(plan, converter.program().to_path_buf(), options.dry_run);
    let total = plan.len();

    for (i, job) in plan.jobs.iter().enumerate() {
        let index = i + 1;
        on_progress(ProgressEvent::Starting { index, total, job });

        let started = Instant::now();
        let outcome = if options.dry_run {
            JobOutcome::Planned
        } else if options.skip_existing && job.output.exists() {
            tracing::debug!(output = %job.output.display(), "Target exists, skipping");
            JobOutcome::SkippedExisting
        } else {
            if let Some(parent) = job.output.parent() {
                std::fs::create_dir_all(parent).map_err(|source| Eps2SvgError::Io {
                    path: parent.to_path_buf(),
                    operation: "create output directory",
                    source,
                })?;
            }

            converter.convert(job)?;

            if !job.output.exists() {
                tracing::warn!(
                    output = %job.output.display(),
                    "Converter reported success but produced no output file"
                );
            }
            JobOutcome::Converted
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::debug!(
            input = %job.input.display(),
            output = %job.output.display(),
            outcome = %outcome,
            elapsed_ms,
            "Job finished"
        );

        summary.record(job, outcome, elapsed_ms);
        on_progress(ProgressEvent::Finished {
            index,
            total,
            job,
            outcome,
        });
    }

    summary.finish();

    tracing::info!(
        converted = summary.converted,
        skipped = summary.skipped,
        planned = summary.planned,
        "Run complete"
    );

    Ok(summary)
}
