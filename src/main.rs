// eps2svg - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Converter resolution (before any filesystem work)
// 4. Discovery, conversion, and progress reporting on stdout

use eps2svg::app::convert::{self, RunOptions};
use eps2svg::app::report;
use eps2svg::core::discovery::DiscoveryConfig;
use eps2svg::core::mapping;
use eps2svg::core::model::{ProgressEvent, RunSummary};
use eps2svg::platform::config::{self, AppConfig, PlatformPaths};
use eps2svg::platform::converter::{self, ConverterSearch, InkscapeConverter};
use eps2svg::util::{self, error::Eps2SvgError};

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// eps2svg - Convert every EPS file under a directory to SVG.
///
/// Walks SOURCE recursively, converts each `.eps` file (any letter case)
/// with Inkscape, and writes the result to the same relative path under
/// OUTPUT with a `.svg` extension.
#[derive(Parser, Debug)]
#[command(name = "eps2svg", version, about)]
struct Cli {
    /// Directory to search for EPS files.
    #[arg(default_value = ".")]
    source: PathBuf,

    /// Directory to write SVG files to [default: <SOURCE>/SVG].
    output: Option<PathBuf>,

    /// Converter binary to use instead of searching for Inkscape.
    #[arg(short = 'c', long = "converter", value_name = "PATH")]
    converter: Option<PathBuf>,

    /// Config file to load instead of the platform default.
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Do not reconvert files whose SVG already exists.
    #[arg(short = 's', long = "skip-existing")]
    skip_existing: bool,

    /// Ask the converter to turn text into paths.
    #[arg(long = "text-to-path")]
    text_to_path: bool,

    /// Print what would be converted without running the converter.
    #[arg(short = 'n', long = "dry-run")]
    dry_run: bool,

    /// Write a JSON summary of the run to this file.
    #[arg(long = "report", value_name = "FILE")]
    report: Option<PathBuf>,

    /// Suppress per-file progress lines.
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config is needed before logging (it may set the level), so its
    // warnings are held back until the subscriber exists.
    let (config_path, required) = match cli.config.clone() {
        Some(path) => (path, true),
        None => (PlatformPaths::resolve().config_file, false),
    };
    let (app_config, config_warnings) = match config::load_config(&config_path, required) {
        Ok(loaded) => loaded,
        Err(e) => {
            util::logging::init(cli.debug, None);
            return fail(&Eps2SvgError::from(e));
        }
    };

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        config = %config_path.display(),
        "eps2svg starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    match run(&cli, &app_config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(e: &Eps2SvgError) -> ExitCode {
    tracing::error!(error = %e, "Run aborted");
    eprintln!("Error: {e}");
    ExitCode::from(e.exit_code())
}

fn run(cli: &Cli, app_config: &AppConfig) -> util::error::Result<RunSummary> {
    // Missing converter aborts before anything is read or written.
    let search = ConverterSearch::from_env(
        cli.converter.clone(),
        app_config.converter_path.clone(),
    );
    let located = converter::locate_converter(&search)?;
    let inkscape = InkscapeConverter::new(
        located.path.clone(),
        cli.text_to_path || app_config.text_to_path,
    );

    let source_root = cli.source.as_path();
    let output_root = cli.output.clone().unwrap_or_else(|| {
        mapping::default_output_root(source_root, &app_config.output_dir_name)
    });

    let discovery_config = DiscoveryConfig {
        max_depth: app_config.max_depth,
        max_files: app_config.max_files,
        exclude_patterns: app_config.exclude_patterns.clone(),
        ..Default::default()
    };
    let plan = convert::plan_run(source_root, &output_root, &discovery_config)?;

    let options = RunOptions {
        skip_existing: cli.skip_existing || app_config.skip_existing,
        dry_run: cli.dry_run,
    };

    if !cli.quiet {
        println!(
            "Converting {} EPS file(s) from '{}' to '{}' with '{}'",
            plan.len(),
            source_root.display(),
            output_root.display(),
            located.path.display(),
        );
    }

    let summary = convert::run_conversion(&plan, &inkscape, options, |event| {
        if !cli.quiet {
            print_progress(&event);
        }
    })?;

    if let Some(report_path) = &cli.report {
        report::save_report(&summary, report_path)?;
    }

    if !cli.quiet {
        if summary.dry_run {
            println!("Dry run: {} file(s) would be converted", summary.planned);
        } else {
            println!(
                "Done: {} converted, {} skipped",
                summary.converted, summary.skipped
            );
        }
    }

    Ok(summary)
}

/// One stdout line per finished job.
fn print_progress(event: &ProgressEvent<'_>) {
    if let ProgressEvent::Finished {
        index,
        total,
        job,
        outcome,
    } = event
    {
        println!(
            "[{index}/{total}] {outcome}: {} -> {}",
            job.relative.display(),
            job.output.display()
        );
    }
}
