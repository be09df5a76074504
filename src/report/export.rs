//! CSV export of the aggregated tables.
//!
//! Each table is written in long format with one column per grouping
//! dimension (none when results are not broken down). Hidden values are
//! written as empty cells.

use crate::analysis::group_type_for;
use crate::models::{Analysis, Dimension, ResponseDistribution, SiteKind, Subgroup};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes every non-empty table into `dir`, returning the files written.
pub fn write_csv_tables(analysis: &Analysis, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let meta = &analysis.metadata;
    let groups = Groups {
        site_kind: meta.site_kind,
        dimensions: group_type_for(meta.survey, meta.site_kind).dimensions(),
    };
    let mut written = Vec::new();

    let path = dir.join("overall_counts.csv");
    write_counts(analysis, &groups, &path)?;
    written.push(path);

    if !analysis.scores.is_empty() {
        let path = dir.join("aggregate_scores.csv");
        write_scores(analysis, &groups, &path)?;
        written.push(path);

        let path = dir.join("aggregate_scores_rag.csv");
        write_scores_rag(analysis, &groups, &path)?;
        written.push(path);
    }

    let path = dir.join("aggregate_responses.csv");
    write_responses(analysis, &groups, &path)?;
    written.push(path);

    if !analysis.demographic.is_empty() {
        let path = dir.join("aggregate_demographic.csv");
        write_demographic(analysis, &path)?;
        written.push(path);
    }

    debug!("Wrote {} tables to {}", written.len(), dir.display());
    Ok(written)
}

/// Grouping columns of the exported tables.
struct Groups {
    site_kind: SiteKind,
    dimensions: &'static [Dimension],
}

impl Groups {
    /// Site column followed by one label column per dimension.
    fn header(&self) -> Vec<&'static str> {
        let mut header = vec![self.site_kind.column()];
        header.extend(self.dimensions.iter().map(|d| d.label_column()));
        header
    }

    fn fields(&self, site: &str, subgroup: &Subgroup) -> Vec<String> {
        let mut fields = vec![site.to_string()];
        fields.extend(
            self.dimensions
                .iter()
                .map(|d| subgroup.label_for(*d).to_string()),
        );
        fields
    }
}

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_counts(analysis: &Analysis, groups: &Groups, path: &Path) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;

    let mut header = groups.header();
    header.push("count");
    w.write_record(&header)?;

    for row in &analysis.counts {
        let mut record = groups.fields(&row.site, &row.subgroup);
        record.push(row.count.to_string());
        w.write_record(&record)?;
    }

    w.flush()?;
    Ok(())
}

fn write_scores(analysis: &Analysis, groups: &Groups, path: &Path) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;

    let mut header = groups.header();
    header.extend(["variable", "mean", "count"]);
    w.write_record(&header)?;

    for row in &analysis.scores {
        let mut record = groups.fields(&row.site, &row.subgroup);
        record.push(row.variable.clone());
        record.push(cell(row.mean));
        record.push(cell(row.count));
        w.write_record(&record)?;
    }

    w.flush()?;
    Ok(())
}

fn write_scores_rag(analysis: &Analysis, groups: &Groups, path: &Path) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;

    let mut header = groups.header();
    header.extend([
        "variable",
        "mean",
        "count",
        "total_pupils",
        "group_n",
        "group_wt_mean",
        "group_wt_std",
        "lower",
        "upper",
        "rag",
    ]);
    w.write_record(&header)?;

    for row in &analysis.scores_rag {
        let d = row.descriptives;
        let mut record = groups.fields(&row.score.site, &row.score.subgroup);
        record.push(row.score.variable.clone());
        record.push(cell(row.score.mean));
        record.push(cell(row.score.count));
        record.push(cell(d.map(|d| d.total_pupils)));
        record.push(cell(d.map(|d| d.group_n)));
        record.push(cell(d.map(|d| d.group_wt_mean)));
        record.push(cell(d.map(|d| d.group_wt_std)));
        record.push(cell(row.lower));
        record.push(cell(row.upper));
        record.push(cell(row.rag));
        w.write_record(&record)?;
    }

    w.flush()?;
    Ok(())
}

const CATEGORY_COLUMNS: [&str; 6] = [
    "measure",
    "cat",
    "cat_lab",
    "count",
    "percentage",
    "n_responses",
];

/// One record per answer option.
fn category_records(distribution: &ResponseDistribution) -> Vec<Vec<String>> {
    distribution
        .categories
        .iter()
        .map(|c| {
            vec![
                distribution.measure.clone(),
                cell(c.code),
                c.label.clone(),
                cell(c.count),
                cell(c.percentage),
                cell(distribution.n_responses),
            ]
        })
        .collect()
}

fn write_responses(analysis: &Analysis, groups: &Groups, path: &Path) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;

    let mut header = groups.header();
    header.extend(CATEGORY_COLUMNS);
    w.write_record(&header)?;

    for row in &analysis.responses {
        let group = groups.fields(&row.site, &row.subgroup);
        for fields in category_records(&row.distribution) {
            let mut record = group.clone();
            record.extend(fields);
            w.write_record(&record)?;
        }
    }

    w.flush()?;
    Ok(())
}

fn write_demographic(analysis: &Analysis, path: &Path) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;

    let mut header = vec![SiteKind::School.column(), "school_group"];
    header.extend(CATEGORY_COLUMNS);
    w.write_record(&header)?;

    for row in &analysis.demographic {
        for fields in category_records(&row.distribution) {
            let mut record = vec![row.school.clone(), row.school_group.flag().to_string()];
            record.extend(fields);
            w.write_record(&record)?;
        }
    }

    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyse, AnalysisOptions};
    use crate::ingest::load_responses;
    use crate::models::SurveyKind;
    use tempfile::TempDir;

    fn create_test_analysis(site_kind: SiteKind) -> Analysis {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/sample_responses.csv");
        let dataset = load_responses(&path, SurveyKind::Standard).unwrap();
        let options = AnalysisOptions {
            site_kind,
            ..Default::default()
        };
        analyse(dataset, &options, "sample_responses.csv")
    }

    fn read_rows(path: &Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let header = reader.headers().unwrap().clone();
        let rows = reader.records().map(|r| r.unwrap()).collect();
        (header, rows)
    }

    #[test]
    fn test_write_csv_tables() {
        let analysis = create_test_analysis(SiteKind::School);
        let dir = TempDir::new().unwrap();
        let written = write_csv_tables(&analysis, dir.path()).unwrap();

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "overall_counts.csv",
                "aggregate_scores.csv",
                "aggregate_scores_rag.csv",
                "aggregate_responses.csv",
                "aggregate_demographic.csv",
            ]
        );
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_counts_table() {
        let analysis = create_test_analysis(SiteKind::School);
        let dir = TempDir::new().unwrap();
        write_csv_tables(&analysis, dir.path()).unwrap();

        let (header, rows) = read_rows(&dir.path().join("overall_counts.csv"));
        assert_eq!(
            header.iter().collect::<Vec<_>>(),
            vec![
                "school_lab",
                "year_group_lab",
                "gender_lab",
                "fsm_lab",
                "sen_lab",
                "count"
            ]
        );
        assert_eq!(rows.len(), analysis.counts.len());
        let school_a = rows
            .iter()
            .find(|r| &r[0] == "School A" && r.iter().skip(1).take(4).all(|f| f == "All"))
            .unwrap();
        assert_eq!(&school_a[5], "14");
    }

    #[test]
    fn test_hidden_values_are_empty() {
        let analysis = create_test_analysis(SiteKind::School);
        let dir = TempDir::new().unwrap();
        write_csv_tables(&analysis, dir.path()).unwrap();

        let (_, rows) = read_rows(&dir.path().join("aggregate_scores_rag.csv"));
        let school_c: Vec<_> = rows.iter().filter(|r| &r[0] == "School C").collect();
        assert!(!school_c.is_empty());
        // mean, count and rag are blank for a school below the threshold
        assert!(school_c.iter().all(|r| r[6].is_empty() && r[7].is_empty()));
        assert!(school_c.iter().all(|r| r[14].is_empty()));
    }

    #[test]
    fn test_area_tables_skip_demographics() {
        let analysis = create_test_analysis(SiteKind::Msoa);
        let dir = TempDir::new().unwrap();
        let written = write_csv_tables(&analysis, dir.path()).unwrap();

        assert!(!dir.path().join("aggregate_demographic.csv").exists());
        assert_eq!(written.len(), 4);
        let (header, rows) = read_rows(&dir.path().join("aggregate_scores.csv"));
        assert_eq!(
            header.iter().collect::<Vec<_>>(),
            vec!["msoa", "variable", "mean", "count"]
        );
        assert!(rows.iter().all(|r| r.len() == 4));
    }
}
