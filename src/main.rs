//! BeeWell - #BeeWell wellbeing survey analysis
//!
//! A CLI tool that calculates topic scores from pupil survey responses,
//! aggregates them by school (or area) and pupil subgroup, rates each
//! school against its peers and writes a results report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad input, config, unknown school, etc.)

mod analysis;
mod cli;
mod config;
mod ingest;
mod labels;
mod models;
mod report;
mod topics;

use analysis::AnalysisOptions;
use anyhow::{bail, Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use report::ReportOptions;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so the file can turn on verbose output
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(config.log_level(&args));

    info!("BeeWell v{}", env!("CARGO_PKG_VERSION"));
    match source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }
    debug!("Arguments: {:?}", args);

    match run_analysis(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .beewell.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to choose the survey, school, breakdown and more.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Step bar over the pipeline stages, hidden in quiet mode.
fn step_progress(hidden: bool, steps: u64) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(steps);
    match ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        Ok(style) => pb.set_style(style.progress_chars("#>-")),
        Err(e) => debug!("Falling back to default progress style: {}", e),
    }
    pb
}

/// Run the complete analysis workflow. Returns the exit code.
fn run_analysis(args: Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    let input = args
        .input
        .as_deref()
        .context("No input file given (use --input)")?;

    let progress = step_progress(args.quiet || args.list_sites, 3);

    // Step 1: Read the responses
    progress.set_message("Reading responses");
    let dataset = ingest::load_responses(input, config.survey.kind)
        .with_context(|| format!("Failed to read responses from {}", input.display()))?;
    info!(
        "Read {} pupils ({} survey)",
        dataset.pupils.len(),
        config.survey.kind
    );
    progress.inc(1);

    if args.list_sites {
        return handle_list_sites(&dataset, config.survey.site);
    }

    // Step 2: Score and aggregate
    progress.set_message("Analysing");
    let options = AnalysisOptions {
        site_kind: config.survey.site,
        min_count: config.aggregation.min_count,
        hide_low_response: config.aggregation.hide_low_response,
    };
    let results = analysis::analyse(dataset, &options, &input.display().to_string());
    progress.inc(1);

    // Step 3: Write the output
    progress.set_message("Writing output");
    let output = config.output_path();
    match config.report.format {
        OutputFormat::Markdown => {
            let Some(school) = config.report.school.clone() else {
                progress.abandon();
                bail!(
                    "Choose a {} with --school (use --list-sites to see the names)",
                    config.survey.site.noun()
                );
            };
            let report_options = ReportOptions {
                site: school,
                breakdown: config.report.breakdown,
                include_responses: config.report.include_responses,
                include_demographics: config.report.include_demographics,
                region: config.report.region.clone(),
            };
            let content = report::generate_markdown_report(&results, &report_options)?;
            report::write_report(&content, &output)
                .with_context(|| format!("Failed to write report to {}", output.display()))?;
        }
        OutputFormat::Json => {
            let content = report::generate_json_report(&results)?;
            report::write_report(&content, &output)
                .with_context(|| format!("Failed to write report to {}", output.display()))?;
        }
        OutputFormat::Csv => {
            let files = report::write_csv_tables(&results, &output)?;
            for file in &files {
                debug!("Wrote {}", file.display());
            }
        }
    }
    progress.inc(1);
    progress.finish_and_clear();

    // Print summary
    let duration = start_time.elapsed().as_secs_f64();
    let rated = results.scores_rag.iter().filter(|r| r.rag.is_some()).count();
    if !args.quiet {
        println!("\n📊 Analysis Summary:");
        println!("   Survey: {}", results.metadata.survey);
        println!(
            "   Pupils: {} across {} {}",
            results.metadata.pupils,
            results.metadata.sites,
            config.survey.site.plural()
        );
        println!("   Rated scores: {} of {}", rated, results.scores_rag.len());
        println!("   Duration: {:.1}s", duration);
        println!("\n✅ Done! Output saved to: {}", output.display());
    }

    Ok(0)
}

/// Handle --list-sites: print each site with its pupil count.
fn handle_list_sites(dataset: &ingest::Dataset, site_kind: models::SiteKind) -> Result<i32> {
    let sites = dataset.sites(site_kind);

    if sites.is_empty() {
        warn!("No {} found in the input", site_kind.plural());
        return Ok(0);
    }

    println!("Found {} {}:\n", sites.len(), site_kind.plural());
    for site in &sites {
        let count = dataset
            .pupils
            .iter()
            .filter(|p| p.site(site_kind) == Some(site.as_str()))
            .count();
        println!("  {} ({} pupils)", site, count);
    }

    Ok(0)
}

/// Load configuration from file or use defaults, with the file it came from.
///
/// A config file that exists but cannot be parsed is an error.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Ok((Config::load(config_path)?, Some(config_path.clone())));
    }

    // Try default location
    Ok(match Config::load_default()? {
        Some(config) => (config, Some(PathBuf::from(CONFIG_FILE))),
        None => (Config::default(), None),
    })
}
