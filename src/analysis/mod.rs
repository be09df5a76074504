//! Analysis pipeline.
//!
//! Scores pupils, aggregates by site and subgroup and rates each site
//! against its peers.

pub mod aggregator;
pub mod rag;
pub mod scores;

pub use aggregator::*;
pub use rag::*;
pub use scores::*;

use crate::ingest::Dataset;
use crate::labels::ResponseLabels;
use crate::models::{Analysis, AnalysisMetadata, Dimension, SiteKind, Subgroup, SurveyKind};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Settings for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub site_kind: SiteKind,
    pub min_count: usize,
    /// Hide individual answer options with too few responses.
    pub hide_low_response: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            site_kind: SiteKind::School,
            min_count: DEFAULT_MIN_COUNT,
            hide_low_response: false,
        }
    }
}

/// Which pupil groups a report compares.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Breakdown {
    /// For all pupils
    #[default]
    All,
    /// By year group
    YearGroup,
    /// By gender
    Gender,
    /// By free school meal eligibility
    Fsm,
    /// By special educational needs
    Sen,
}

impl Breakdown {
    fn dimension(&self) -> Option<Dimension> {
        match self {
            Breakdown::All => None,
            Breakdown::YearGroup => Some(Dimension::YearGroup),
            Breakdown::Gender => Some(Dimension::Gender),
            Breakdown::Fsm => Some(Dimension::Fsm),
            Breakdown::Sen => Some(Dimension::Sen),
        }
    }

    /// Subgroups to show, in order. Empty if the breakdown is not available
    /// for the group type (e.g. SEN for the symbol survey).
    pub fn subgroups(&self, group_type: GroupType) -> Vec<Subgroup> {
        match self.dimension() {
            None => vec![Subgroup::All],
            Some(dim) => group_type
                .subgroups()
                .into_iter()
                .filter(|s| matches!(s, Subgroup::Filtered { dimension, .. } if *dimension == dim))
                .collect(),
        }
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Breakdown::All => write!(f, "For all pupils"),
            Breakdown::YearGroup => write!(f, "By year group"),
            Breakdown::Gender => write!(f, "By gender"),
            Breakdown::Fsm => write!(f, "By FSM"),
            Breakdown::Sen => write!(f, "By SEN"),
        }
    }
}

/// Breakdown used for a survey and site kind. Areas are never broken down.
pub fn group_type_for(survey: SurveyKind, site_kind: SiteKind) -> GroupType {
    match site_kind {
        SiteKind::School => GroupType::for_survey(survey),
        SiteKind::Msoa => GroupType::None,
    }
}

/// Runs the full analysis over a dataset.
///
/// The symbol survey has no topic scores, so its score tables are empty.
/// Demographics are only compared between schools.
pub fn analyse(mut dataset: Dataset, options: &AnalysisOptions, input: &str) -> Analysis {
    let survey = dataset.survey;
    let site_kind = options.site_kind;
    let group_type = group_type_for(survey, site_kind);
    let labels = ResponseLabels::for_survey(survey);

    let sites = dataset.sites(site_kind).len();
    info!(
        "Analysing {} pupils across {} {}",
        dataset.pupils.len(),
        sites,
        site_kind.plural()
    );
    if sites == 0 {
        warn!(
            "No pupil has a {} value, so every table will be empty",
            site_kind.column()
        );
    }

    let counts = count_rows(&dataset.pupils, site_kind, group_type);

    let (scores, scores_rag) = match survey {
        SurveyKind::Standard => {
            apply_scores(&mut dataset.pupils);
            let scores = score_rows(&dataset.pupils, site_kind, group_type, options.min_count);
            let rated = create_rag_ratings(&scores);
            info!("Rated {} score cells", rated.iter().filter(|r| r.rag.is_some()).count());
            (scores, rated)
        }
        SurveyKind::Symbol => (Vec::new(), Vec::new()),
    };

    let questions = response_questions(&dataset.response_columns, &labels, survey);
    info!("Aggregating responses to {} questions", questions.len());
    let responses = response_rows(
        &dataset.pupils,
        site_kind,
        group_type,
        &questions,
        &labels,
        options.hide_low_response,
        options.min_count,
    );

    let demographic = match site_kind {
        SiteKind::School => {
            let measures = demographic_questions(&dataset.response_columns, &labels, survey);
            aggregate_demographic(&dataset.pupils, &measures, &labels, options.min_count)
        }
        SiteKind::Msoa => Vec::new(),
    };

    Analysis {
        metadata: AnalysisMetadata {
            input: input.to_string(),
            generated_at: Utc::now(),
            survey,
            site_kind,
            min_count: options.min_count,
            pupils: dataset.pupils.len(),
            sites,
        },
        counts,
        scores,
        scores_rag,
        responses,
        demographic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::load_responses;
    use crate::models::Rag;
    use std::path::Path;

    fn fixture() -> Dataset {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/sample_responses.csv");
        load_responses(&path, SurveyKind::Standard).unwrap()
    }

    #[test]
    fn test_breakdown_subgroups() {
        assert_eq!(Breakdown::All.subgroups(GroupType::Standard), vec![Subgroup::All]);
        assert_eq!(
            Breakdown::YearGroup.subgroups(GroupType::Standard),
            vec![
                Subgroup::filtered(Dimension::YearGroup, "Year 8"),
                Subgroup::filtered(Dimension::YearGroup, "Year 10"),
            ]
        );
        assert_eq!(Breakdown::YearGroup.subgroups(GroupType::Symbol).len(), 5);
        assert!(Breakdown::Sen.subgroups(GroupType::Symbol).is_empty());
    }

    #[test]
    fn test_analyse_fixture_by_school() {
        let analysis = analyse(fixture(), &AnalysisOptions::default(), "sample.csv");

        assert_eq!(analysis.metadata.sites, 3);
        assert_eq!(analysis.metadata.pupils, 32);
        assert_eq!(analysis.counts.len(), 3 * 9);
        assert_eq!(analysis.site_size("School A"), Some(14));
        assert_eq!(analysis.scores.len(), 3 * 9 * SCORE_NAMES.len());
        assert_eq!(analysis.scores_rag.len(), analysis.scores.len());

        // School C has six pupils so every cell is hidden
        assert!(analysis
            .scores_rag
            .iter()
            .filter(|r| r.score.site == "School C")
            .all(|r| r.rag.is_none() && r.score.mean.is_none()));

        assert!(!analysis.responses.is_empty());
        assert!(!analysis.demographic.is_empty());
    }

    #[test]
    fn test_analyse_by_area() {
        let options = AnalysisOptions {
            site_kind: SiteKind::Msoa,
            min_count: 1,
            ..Default::default()
        };
        let analysis = analyse(fixture(), &options, "sample.csv");

        assert_eq!(analysis.metadata.sites, 2);
        assert_eq!(analysis.counts.len(), 2);
        assert!(analysis.counts.iter().all(|c| c.subgroup == Subgroup::All));
        assert!(analysis.demographic.is_empty());
        assert!(analysis
            .scores_rag
            .iter()
            .filter(|r| r.score.variable == "lonely_score")
            .all(|r| matches!(r.rag, Some(Rag::Below | Rag::Average | Rag::Above))));
    }

    #[test]
    fn test_analyse_without_sites() {
        let data = "school_lab,msoa,lonely\nSchool A,,1\nSchool B,,2\n";
        let dataset = crate::ingest::read_responses(data.as_bytes(), SurveyKind::Standard).unwrap();
        let options = AnalysisOptions {
            site_kind: SiteKind::Msoa,
            ..Default::default()
        };
        let analysis = analyse(dataset, &options, "no_areas.csv");

        assert_eq!(analysis.metadata.sites, 0);
        assert_eq!(analysis.metadata.pupils, 2);
        assert!(analysis.counts.is_empty());
        assert!(analysis.scores_rag.is_empty());
    }

    #[test]
    fn test_analyse_symbol_has_no_scores() {
        let data = "school_lab,year_group,gender,fsm,symbol_life\n\
                    School A,7,0,1,1\n\
                    School A,9,1,0,2\n";
        let dataset = crate::ingest::read_responses(data.as_bytes(), SurveyKind::Symbol).unwrap();
        let analysis = analyse(dataset, &AnalysisOptions::default(), "symbol.csv");

        assert!(analysis.scores.is_empty());
        assert_eq!(analysis.counts.len(), 10);
        let questions: Vec<&str> = analysis
            .responses
            .iter()
            .map(|r| r.distribution.measure.as_str())
            .collect();
        assert!(questions.iter().all(|q| *q == "symbol_life"));
    }
}
