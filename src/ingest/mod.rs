//! Reading pupil-level survey responses from CSV.
//!
//! Every column is numeric apart from the site columns and the `_lab`
//! label columns. Missing answers are left out of the pupil's responses.

use crate::labels::ResponseLabels;
use crate::models::{Dimension, Pupil, SiteKind, SurveyKind};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Literals treated as a missing value.
const MISSING: &[&str] = &["", "nan", "NaN", "NA", "null"];

/// Errors raised while reading responses.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Responses file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read responses: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}, column '{column}': '{value}' is not a number")]
    BadValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Responses file has no data rows")]
    Empty,

    #[error("No site column found (expected one of school_lab, school, msoa)")]
    NoSiteColumn,
}

/// Pupils read from a responses file.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub survey: SurveyKind,
    pub pupils: Vec<Pupil>,
    /// Numeric columns in file order.
    pub response_columns: Vec<String>,
}

impl Dataset {
    /// Sorted distinct sites for the given site kind.
    pub fn sites(&self, kind: SiteKind) -> Vec<String> {
        let mut sites: Vec<String> = self
            .pupils
            .iter()
            .filter_map(|p| p.site(kind).map(str::to_string))
            .collect();
        sites.sort();
        sites.dedup();
        sites
    }
}

/// Reads responses from a CSV file.
pub fn load_responses(path: &Path, survey: SurveyKind) -> Result<Dataset, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }

    info!("Reading responses from {}", path.display());
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_responses(file, survey)
}

/// Reads responses from any CSV source.
pub fn read_responses<R: io::Read>(reader: R, survey: SurveyKind) -> Result<Dataset, IngestError> {
    let labels = ResponseLabels::for_survey(survey);
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let has = |name: &str| headers.iter().any(|h| h == name);
    if !has("school_lab") && !has("school") && !has("msoa") {
        return Err(IngestError::NoSiteColumn);
    }

    let text_columns: HashSet<&str> = headers
        .iter()
        .map(String::as_str)
        .filter(|h| is_text_column(h))
        .collect();
    let response_columns: Vec<String> = headers
        .iter()
        .filter(|h| !text_columns.contains(h.as_str()))
        .cloned()
        .collect();
    debug!(
        "{} columns, {} numeric",
        headers.len(),
        response_columns.len()
    );

    let mut pupils = Vec::new();
    let mut unknown_codes: HashSet<(String, String)> = HashSet::new();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let row = index + 1;
        let mut pupil = Pupil::default();

        for (column, raw) in headers.iter().zip(record.iter()) {
            if text_columns.contains(column.as_str()) {
                let text = (!is_missing(raw)).then(|| raw.to_string());
                match column.as_str() {
                    "school_lab" => pupil.school = text,
                    "msoa" => pupil.msoa = text,
                    other => {
                        if let Some(dim) = Dimension::ALL.iter().find(|d| d.label_column() == other)
                        {
                            pupil.set_demographic(*dim, text);
                        }
                    }
                }
                continue;
            }

            if let Some(value) = parse_value(raw).ok_or_else(|| IngestError::BadValue {
                row,
                column: column.clone(),
                value: raw.to_string(),
            })? {
                pupil.responses.insert(column.clone(), value);
            }
        }

        if pupil.school.is_none() {
            if let Some(code) = pupil.response("school") {
                pupil.school = labels.label_value("school", code).map(str::to_string);
                if pupil.school.is_none() {
                    unknown_codes.insert(("school".to_string(), code.to_string()));
                }
            }
        }

        for dim in Dimension::ALL {
            if pupil.demographic(dim).is_some() {
                continue;
            }
            let Some(code) = pupil.response(dim.code_column()) else {
                continue;
            };
            match labels.label_value(dim.code_column(), code) {
                Some(label) => pupil.set_demographic(dim, Some(label.to_string())),
                None => {
                    unknown_codes.insert((dim.code_column().to_string(), code.to_string()));
                }
            }
        }

        pupils.push(pupil);
    }

    for (column, code) in &unknown_codes {
        warn!("Unknown code {} in column '{}'", code, column);
    }

    if pupils.is_empty() {
        return Err(IngestError::Empty);
    }

    info!("Read {} pupils", pupils.len());

    Ok(Dataset {
        survey,
        pupils,
        response_columns,
    })
}

fn is_text_column(name: &str) -> bool {
    name == "msoa" || name.ends_with("_lab")
}

fn is_missing(raw: &str) -> bool {
    MISSING.contains(&raw)
}

/// `Some(None)` for a missing value, `None` if the value is not a number.
fn parse_value(raw: &str) -> Option<Option<f64>> {
    if is_missing(raw) {
        return Some(None);
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite()).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_labels_and_codes() {
        let data = "\
school_lab,year_group,gender,fsm,sen,lonely,sleep
School A,8,1,0,1,2,1
School B,10,2,1,0,,0
";
        let dataset = read_responses(data.as_bytes(), SurveyKind::Standard).unwrap();
        assert_eq!(dataset.pupils.len(), 2);
        assert_eq!(
            dataset.response_columns,
            vec!["year_group", "gender", "fsm", "sen", "lonely", "sleep"]
        );

        let first = &dataset.pupils[0];
        assert_eq!(first.school.as_deref(), Some("School A"));
        assert_eq!(first.year_group.as_deref(), Some("Year 8"));
        assert_eq!(first.gender.as_deref(), Some("Girl"));
        assert_eq!(first.fsm.as_deref(), Some("Non-FSM"));
        assert_eq!(first.sen.as_deref(), Some("SEN"));
        assert_eq!(first.response("lonely"), Some(2.0));

        let second = &dataset.pupils[1];
        assert_eq!(second.response("lonely"), None);
        assert_eq!(second.year_group.as_deref(), Some("Year 10"));
    }

    #[test]
    fn test_label_columns_take_precedence() {
        let data = "\
school_lab,gender,gender_lab,lonely
School A,1,Boy,3
";
        let dataset = read_responses(data.as_bytes(), SurveyKind::Standard).unwrap();
        assert_eq!(dataset.pupils[0].gender.as_deref(), Some("Boy"));
        assert!(!dataset.response_columns.contains(&"gender_lab".to_string()));
    }

    #[test]
    fn test_school_code_is_labelled() {
        let data = "school,msoa,lonely\n2,Area 1,3\n";
        let dataset = read_responses(data.as_bytes(), SurveyKind::Standard).unwrap();
        let pupil = &dataset.pupils[0];
        assert_eq!(pupil.school.as_deref(), Some("School B"));
        assert_eq!(pupil.msoa.as_deref(), Some("Area 1"));
    }

    #[test]
    fn test_missing_literals() {
        let data = "school_lab,a,b,c,d,e\nSchool A,nan,NaN,NA,null, \n";
        let dataset = read_responses(data.as_bytes(), SurveyKind::Standard).unwrap();
        assert!(dataset.pupils[0].responses.is_empty());
    }

    #[test]
    fn test_bad_value_names_row_and_column() {
        let data = "school_lab,lonely\nSchool A,1\nSchool A,often\n";
        let err = read_responses(data.as_bytes(), SurveyKind::Standard).unwrap_err();
        match err {
            IngestError::BadValue { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "lonely");
                assert_eq!(value, "often");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        let data = "school_lab,lonely\n";
        let err = read_responses(data.as_bytes(), SurveyKind::Standard).unwrap_err();
        assert!(matches!(err, IngestError::Empty));
    }

    #[test]
    fn test_no_site_column() {
        let data = "lonely,sleep\n1,0\n";
        let err = read_responses(data.as_bytes(), SurveyKind::Standard).unwrap_err();
        assert!(matches!(err, IngestError::NoSiteColumn));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "school_lab,symbol_life,year_group").unwrap();
        writeln!(file, "School A,1,7").unwrap();
        writeln!(file, "School B,3,11").unwrap();

        let dataset = load_responses(file.path(), SurveyKind::Symbol).unwrap();
        assert_eq!(dataset.sites(SiteKind::School), vec!["School A", "School B"]);
        assert_eq!(dataset.pupils[1].year_group.as_deref(), Some("Year 11"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_responses(Path::new("/nonexistent/responses.csv"), SurveyKind::Standard)
            .unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
    }

    #[test]
    fn test_fixture_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/sample_responses.csv");
        let dataset = load_responses(&path, SurveyKind::Standard).unwrap();
        assert_eq!(dataset.sites(SiteKind::School).len(), 3);
        assert!(dataset.pupils.iter().all(|p| p.year_group.is_some()));
    }
}
