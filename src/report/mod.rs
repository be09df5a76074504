//! Report output: Markdown, JSON and CSV tables.

pub mod charts;
pub mod export;
pub mod generator;

pub use export::write_csv_tables;
pub use generator::{generate_json_report, generate_markdown_report, write_report, ReportOptions};
