//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.beewell.toml` files.

use crate::analysis::{Breakdown, DEFAULT_MIN_COUNT};
use crate::cli::{Args, OutputFormat};
use crate::models::{SiteKind, SurveyKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the current directory.
pub const CONFIG_FILE: &str = ".beewell.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Survey input settings.
    #[serde(default)]
    pub survey: SurveyConfig,

    /// Aggregation settings.
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Output path. Defaults per format when unset.
    #[serde(default)]
    pub output: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Which survey is read and what it is aggregated over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(default)]
    pub kind: SurveyKind,

    #[serde(default)]
    pub site: SiteKind,
}

/// Suppression settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Results based on fewer pupils than this are hidden.
    #[serde(default = "default_min_count")]
    pub min_count: usize,

    /// Also hide individual answer options below `min_count`.
    #[serde(default)]
    pub hide_low_response: bool,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            min_count: default_min_count(),
            hide_low_response: false,
        }
    }
}

fn default_min_count() -> usize {
    DEFAULT_MIN_COUNT
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// School (or area) the Markdown report is for.
    #[serde(default)]
    pub school: Option<String>,

    #[serde(default)]
    pub breakdown: Breakdown,

    /// Include per-question response charts.
    #[serde(default = "default_true")]
    pub include_responses: bool,

    /// Include the "who took part" section.
    #[serde(default = "default_true")]
    pub include_demographics: bool,

    /// Name of the wider area used in the report text.
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            school: None,
            breakdown: Breakdown::default(),
            include_responses: true,
            include_demographics: true,
            region: default_region(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_region() -> String {
    "Northern Devon".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_if_exists(Path::new(CONFIG_FILE))
    }

    /// Load configuration from `path` if the file is there.
    pub fn load_if_exists(path: &Path) -> Result<Option<Self>> {
        if path.exists() {
            Ok(Some(Self::load(path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when given explicitly.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }
        if args.verbose {
            self.general.verbose = true;
        }

        if let Some(kind) = args.survey {
            self.survey.kind = kind;
        }
        if let Some(site) = args.site {
            self.survey.site = site;
        }

        if let Some(min_count) = args.min_count {
            self.aggregation.min_count = min_count;
        }
        if args.hide_low_response {
            self.aggregation.hide_low_response = true;
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(ref school) = args.school {
            self.report.school = Some(school.clone());
        }
        if let Some(breakdown) = args.breakdown {
            self.report.breakdown = breakdown;
        }
        if let Some(ref region) = args.region {
            self.report.region = region.clone();
        }
        if args.no_responses {
            self.report.include_responses = false;
        }
        if args.no_demographics {
            self.report.include_demographics = false;
        }
    }

    /// Log level once merged with the CLI. `--quiet` wins over a verbose
    /// config file.
    pub fn log_level(&self, args: &Args) -> tracing::Level {
        if self.general.verbose && !args.quiet {
            tracing::Level::DEBUG
        } else {
            args.log_level()
        }
    }

    /// Where output is written for the configured format.
    pub fn output_path(&self) -> PathBuf {
        match self.general.output {
            Some(ref output) => PathBuf::from(output),
            None => PathBuf::from(self.report.format.default_output()),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.aggregation.min_count, 10);
        assert_eq!(config.survey.kind, SurveyKind::Standard);
        assert_eq!(config.survey.site, SiteKind::School);
        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert!(config.report.include_responses);
        assert_eq!(config.output_path(), PathBuf::from("beewell_report.md"));
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_report.md"
verbose = true

[survey]
kind = "symbol"

[aggregation]
min_count = 5

[report]
school = "School B"
breakdown = "year-group"
include_demographics = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output.as_deref(), Some("custom_report.md"));
        assert!(config.general.verbose);
        assert_eq!(config.survey.kind, SurveyKind::Symbol);
        assert_eq!(config.survey.site, SiteKind::School);
        assert_eq!(config.aggregation.min_count, 5);
        assert!(!config.aggregation.hide_low_response);
        assert_eq!(config.report.school.as_deref(), Some("School B"));
        assert_eq!(config.report.breakdown, Breakdown::YearGroup);
        assert!(config.report.include_responses);
        assert!(!config.report.include_demographics);
        assert_eq!(config.report.region, "Northern Devon");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[survey]\nsite = \"msoa\"\n\n[report]\nformat = \"csv\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.survey.site, SiteKind::Msoa);
        assert_eq!(config.output_path(), PathBuf::from("beewell_tables"));
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[aggregation]\nmin_count = \"lots\"").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        config.report.school = Some("School B".to_string());
        config.aggregation.min_count = 5;

        let args = Args::try_parse_from([
            "beewell",
            "--input",
            "responses.csv",
            "--school",
            "School A",
            "--format",
            "json",
            "--no-responses",
        ])
        .unwrap();
        config.merge_with_args(&args);

        assert_eq!(config.report.school.as_deref(), Some("School A"));
        assert_eq!(config.report.format, OutputFormat::Json);
        assert!(!config.report.include_responses);
        // Not given on the command line, so the file's value stays
        assert_eq!(config.aggregation.min_count, 5);
        assert_eq!(config.output_path(), PathBuf::from("beewell_report.json"));
    }

    #[test]
    fn test_verbose_config_sets_log_level() {
        let mut config: Config = toml::from_str("[general]\nverbose = true").unwrap();
        let args = Args::try_parse_from(["beewell", "--input", "x.csv"]).unwrap();
        config.merge_with_args(&args);
        assert_eq!(config.log_level(&args), tracing::Level::DEBUG);

        let quiet = Args::try_parse_from(["beewell", "--input", "x.csv", "--quiet"]).unwrap();
        assert_eq!(config.log_level(&quiet), tracing::Level::ERROR);

        let config = Config::default();
        assert_eq!(config.log_level(&args), tracing::Level::INFO);
    }

    #[test]
    fn test_load_if_exists() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert!(Config::load_if_exists(&path).unwrap().is_none());

        std::fs::write(&path, "[aggregation]\nmin_count = 3\n").unwrap();
        let config = Config::load_if_exists(&path).unwrap().unwrap();
        assert_eq!(config.aggregation.min_count, 3);

        std::fs::write(&path, "[aggregation\nmin_count = 3\n").unwrap();
        assert!(Config::load_if_exists(&path).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[aggregation]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.aggregation.min_count, 10);
    }
}
