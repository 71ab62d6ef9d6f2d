//! `mariner-convert` run orchestration.
//!
//! Validates the two roots, resolves the query mappings, runs the pipeline and
//! prints the report. Per-file failures are reported but do not fail the run;
//! with `--strict` the first failure aborts it.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::{Cli, OutputFormat};
use crate::path_guard::{ensure_input_dir, ensure_output_outside_input};
use mariner_convert::job::{ConversionJob, ConvertOptions};
use mariner_convert::pipeline::convert;
use mariner_convert::query_mappings::{default_query_mappings, load_query_mappings};
use mariner_convert::report::{render_summary, render_text};

pub fn run_convert(cli: Cli) -> Result<()> {
    ensure_input_dir(&cli.input)?;
    ensure_output_outside_input(&cli.output, &cli.input)?;

    let mappings = match &cli.mappings_file {
        Some(path) => load_query_mappings(path)
            .with_context(|| format!("failed to load query mappings {}", path.display()))?,
        None => default_query_mappings(),
    };

    if cli.old_home.is_empty() {
        warn!("old home path is empty; baseDirectory values will not be rewritten");
    }

    let job = ConversionJob::new(&cli.input, &cli.output, &cli.old_home, &cli.new_home);
    let options = ConvertOptions {
        strict: cli.strict,
        uppercase_list_ids: cli.uppercase_list_ids,
        dry_run: cli.dry_run,
    };

    let report = convert(&job, options, &mappings)
        .with_context(|| format!("conversion of {} aborted", cli.input.display()))?;

    let summary = report.summary();
    info!("{}", render_summary(summary));
    if report.has_failures() {
        warn!("{} file(s) could not be converted", summary.failed);
    }

    if cli.quiet {
        println!("{}", render_summary(summary));
    } else {
        match cli.format {
            OutputFormat::Text => println!("{}", render_text(&report)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }
    }
    Ok(())
}
