//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::analysis::Breakdown;
use crate::models::{SiteKind, SurveyKind};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// BeeWell - wellbeing survey results for schools
///
/// Calculate topic scores from #BeeWell survey responses, compare each
/// school with its peers and write a results report. Markdown/JSON/CSV.
///
/// Examples:
///   beewell --input responses.csv --list-sites
///   beewell --input responses.csv --school "School A"
///   beewell --input responses.csv --school "School A" --breakdown year-group
///   beewell --input responses.csv --format csv --output tables/
///   beewell --input symbol.csv --survey symbol --school "School A"
///   beewell --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// CSV file of pupil survey responses
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "BEEWELL_INPUT",
        required_unless_present = "init_config"
    )]
    pub input: Option<PathBuf>,

    /// School (or area) to write the report for
    ///
    /// Required for the markdown format. Use --list-sites to see the names.
    #[arg(short, long, value_name = "NAME")]
    pub school: Option<String>,

    /// Pupil groups to show in the report
    #[arg(short, long, value_name = "GROUP")]
    pub breakdown: Option<Breakdown>,

    /// Unit to aggregate results over
    #[arg(long, value_name = "KIND")]
    pub site: Option<SiteKind>,

    /// Which survey the responses came from
    #[arg(long, value_name = "SURVEY")]
    pub survey: Option<SurveyKind>,

    /// Hide any result based on fewer pupils than this
    #[arg(long, value_name = "COUNT")]
    pub min_count: Option<usize>,

    /// Also hide individual answer options with fewer responses than --min-count
    #[arg(long)]
    pub hide_low_response: bool,

    /// Output format (markdown, json, csv)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output file path, or directory for the csv format
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Name of the wider area used in the report text
    #[arg(long, value_name = "NAME")]
    pub region: Option<String>,

    /// Leave the per-question response charts out of the report
    #[arg(long)]
    pub no_responses: bool,

    /// Leave the "who took part" section out of the report
    #[arg(long)]
    pub no_demographics: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .beewell.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// List the schools (or areas) in the input and exit
    #[arg(long)]
    pub list_sites: bool,

    /// Generate a default .beewell.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the results.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown report for one school (default)
    #[default]
    Markdown,
    /// JSON dump of the full analysis
    Json,
    /// Directory of CSV tables
    Csv,
}

impl OutputFormat {
    /// Output path used when none is given.
    pub fn default_output(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "beewell_report.md",
            OutputFormat::Json => "beewell_report.json",
            OutputFormat::Csv => "beewell_tables",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.min_count == Some(0) {
            return Err("Min count must be at least 1".to_string());
        }

        if let Some(ref school) = self.school {
            if school.trim().is_empty() {
                return Err("School name cannot be empty".to_string());
            }
        }

        if let Some(ref region) = self.region {
            if region.trim().is_empty() {
                return Err("Region name cannot be empty".to_string());
            }
        }

        // Validate input file if provided
        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
            if !input.is_file() {
                return Err(format!("Input path is not a file: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn make_args() -> Args {
        Args {
            input: None,
            school: Some("School A".to_string()),
            breakdown: None,
            site: None,
            survey: None,
            min_count: None,
            hide_low_response: false,
            format: None,
            output: None,
            region: None,
            no_responses: false,
            no_demographics: false,
            config: None,
            verbose: false,
            quiet: false,
            list_sites: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_ok() {
        let file = NamedTempFile::new().unwrap();
        let mut args = make_args();
        args.input = Some(file.path().to_path_buf());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_missing_input() {
        let mut args = make_args();
        args.input = Some(PathBuf::from("/definitely/not/here.csv"));
        let err = args.validate().unwrap_err();
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_min_count() {
        let mut args = make_args();
        args.min_count = Some(0);
        assert!(args.validate().is_err());

        args.min_count = Some(5);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_skipped_for_init_config() {
        let mut args = make_args();
        args.init_config = true;
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "beewell",
            "--input",
            "responses.csv",
            "--school",
            "School A",
            "--breakdown",
            "year-group",
            "--site",
            "msoa",
            "--format",
            "csv",
        ])
        .unwrap();
        assert_eq!(args.school.as_deref(), Some("School A"));
        assert_eq!(args.breakdown, Some(Breakdown::YearGroup));
        assert_eq!(args.site, Some(SiteKind::Msoa));
        assert_eq!(args.format, Some(OutputFormat::Csv));
    }

    #[test]
    fn test_default_output() {
        assert_eq!(OutputFormat::Markdown.default_output(), "beewell_report.md");
        assert_eq!(OutputFormat::Csv.default_output(), "beewell_tables");
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
