// eps2svg - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no platform
// dependencies. These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

// =============================================================================
// Discovery output
// =============================================================================

/// An EPS file found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Path as produced by the walk (source root joined with the relative path).
    pub path: PathBuf,
}

// =============================================================================
// Conversion plan
// =============================================================================

/// One input/output pair handed to the converter.
///
/// `input == source_root.join(&relative)` and
/// `output == output_root.join(&relative).with_extension("svg")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionJob {
    /// EPS file to read.
    pub input: PathBuf,

    /// Input path relative to the source root, extension intact.
    pub relative: PathBuf,

    /// SVG file to write.
    pub output: PathBuf,
}

/// The full ordered list of jobs for a run, plus the roots they were mapped
/// between.
#[derive(Debug, Clone)]
pub struct ConversionPlan {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
    pub jobs: Vec<ConversionJob>,
}

impl ConversionPlan {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}

// =============================================================================
// Outcomes and progress
// =============================================================================

/// What happened to a single job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOutcome {
    /// The converter ran and exited successfully.
    Converted,
    /// The target already existed and `skip_existing` was set.
    SkippedExisting,
    /// Dry run: the converter would have been invoked.
    Planned,
}

impl JobOutcome {
    /// Short verb for progress lines.
    pub fn label(&self) -> &'static str {
        match self {
            JobOutcome::Converted => "converted",
            JobOutcome::SkippedExisting => "skipped (exists)",
            JobOutcome::Planned => "would convert",
        }
    }
}

impl std::fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Progress messages sent from the run loop to the reporter.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    /// About to handle job `index` (1-based) of `total`.
    Starting {
        index: usize,
        total: usize,
        job: &'a ConversionJob,
    },
    /// Job `index` of `total` is done.
    Finished {
        index: usize,
        total: usize,
        job: &'a ConversionJob,
        outcome: JobOutcome,
    },
}

/// Per-job entry recorded in the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub input: PathBuf,
    pub output: PathBuf,
    pub outcome: JobOutcome,
    /// Wall-clock time spent in the converter, in milliseconds.
    pub elapsed_ms: u64,
}

/// Summary of a completed run. Serialised as the JSON run report.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
    pub converter: PathBuf,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub discovered: usize,
    pub converted: usize,
    pub skipped: usize,
    pub planned: usize,
    pub jobs: Vec<JobRecord>,
}

impl RunSummary {
    /// Start an empty summary for `plan`; counters are filled in by the run loop.
    pub fn begin(plan: &ConversionPlan, converter: PathBuf, dry_run: bool) -> Self {
        let now = Utc::now();
        Self {
            source_root: plan.source_root.clone(),
            output_root: plan.output_root.clone(),
            converter,
            dry_run,
            started_at: now,
            finished_at: now,
            discovered: plan.len(),
            converted: 0,
            skipped: 0,
            planned: 0,
            jobs: Vec::with_capacity(plan.len()),
        }
    }

    /// Record one finished job and bump the matching counter.
    pub fn record(&mut self, job: &ConversionJob, outcome: JobOutcome, elapsed_ms: u64) {
        match outcome {
            JobOutcome::Converted => self.converted += 1,
            JobOutcome::SkippedExisting => self.skipped += 1,
            JobOutcome::Planned => self.planned += 1,
        }
        self.jobs.push(JobRecord {
            input: job.input.clone(),
            output: job.output.clone(),
            outcome,
            elapsed_ms,
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Utc::now();
    }
}
