//! Data models for the survey analysis.
//!
//! This module contains the core data structures used throughout the
//! application: pupil records, subgroups, aggregated rows and RAG ratings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single numeric answer or score. `None` means missing.
pub type Value = Option<f64>;

/// Label used for the whole-population subgroup.
pub const ALL: &str = "All";

/// Which survey the responses came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SurveyKind {
    /// Standard #BeeWell survey (Year 8 and Year 10)
    #[default]
    Standard,
    /// Symbol survey (Year 7 to Year 11)
    Symbol,
}

impl fmt::Display for SurveyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveyKind::Standard => write!(f, "standard"),
            SurveyKind::Symbol => write!(f, "symbol"),
        }
    }
}

/// The unit results are aggregated over.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    /// Schools (`school_lab` column)
    #[default]
    School,
    /// Middle layer super output areas (`msoa` column)
    Msoa,
}

impl SiteKind {
    /// Name of the site column in the exported tables.
    pub fn column(&self) -> &'static str {
        match self {
            SiteKind::School => "school_lab",
            SiteKind::Msoa => "msoa",
        }
    }

    /// Noun used in narrative text.
    pub fn noun(&self) -> &'static str {
        match self {
            SiteKind::School => "school",
            SiteKind::Msoa => "area",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            SiteKind::School => "schools",
            SiteKind::Msoa => "areas",
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteKind::School => write!(f, "school"),
            SiteKind::Msoa => write!(f, "msoa"),
        }
    }
}

/// Demographic characteristic a subgroup can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    YearGroup,
    Gender,
    Fsm,
    Sen,
}

impl Dimension {
    /// All dimensions, in export column order.
    pub const ALL: [Dimension; 4] = [
        Dimension::YearGroup,
        Dimension::Gender,
        Dimension::Fsm,
        Dimension::Sen,
    ];

    /// Name of the numeric code column.
    pub fn code_column(&self) -> &'static str {
        match self {
            Dimension::YearGroup => "year_group",
            Dimension::Gender => "gender",
            Dimension::Fsm => "fsm",
            Dimension::Sen => "sen",
        }
    }

    /// Name of the label column.
    pub fn label_column(&self) -> &'static str {
        match self {
            Dimension::YearGroup => "year_group_lab",
            Dimension::Gender => "gender_lab",
            Dimension::Fsm => "fsm_lab",
            Dimension::Sen => "sen_lab",
        }
    }
}

/// A pupil subgroup within a site: everyone, or pupils with one
/// demographic characteristic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subgroup {
    All,
    Filtered { dimension: Dimension, value: String },
}

impl Subgroup {
    /// Creates a filtered subgroup.
    pub fn filtered(dimension: Dimension, value: &str) -> Self {
        Subgroup::Filtered {
            dimension,
            value: value.to_string(),
        }
    }

    /// Whether a pupil belongs to this subgroup.
    pub fn contains(&self, pupil: &Pupil) -> bool {
        match self {
            Subgroup::All => true,
            Subgroup::Filtered { dimension, value } => {
                pupil.demographic(*dimension) == Some(value.as_str())
            }
        }
    }

    /// Value of the given dimension for this subgroup ("All" when the
    /// subgroup is not filtered on it).
    pub fn label_for(&self, dim: Dimension) -> &str {
        match self {
            Subgroup::Filtered { dimension, value } if *dimension == dim => value,
            _ => ALL,
        }
    }
}

impl fmt::Display for Subgroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subgroup::All => write!(f, "{}", ALL),
            Subgroup::Filtered { value, .. } => write!(f, "{}", value),
        }
    }
}

/// One pupil's survey record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Pupil {
    /// School name.
    pub school: Option<String>,
    /// Area (MSOA) name.
    pub msoa: Option<String>,
    /// Year group label (e.g. "Year 8").
    pub year_group: Option<String>,
    /// Gender label (e.g. "Girl").
    pub gender: Option<String>,
    /// Free school meals label ("FSM" / "Non-FSM").
    pub fsm: Option<String>,
    /// Special educational needs label ("SEN" / "Non-SEN").
    pub sen: Option<String>,
    /// Raw numeric answers keyed by question. Missing answers are absent.
    pub responses: BTreeMap<String, f64>,
    /// Topic scores, filled in by the score calculator.
    pub scores: BTreeMap<&'static str, Value>,
}

impl Pupil {
    /// Returns the raw answer to a question.
    pub fn response(&self, question: &str) -> Value {
        self.responses.get(question).copied()
    }

    /// Returns a computed topic score.
    pub fn score(&self, name: &str) -> Value {
        self.scores.get(name).copied().flatten()
    }

    /// Returns the pupil's site for the given site kind.
    pub fn site(&self, kind: SiteKind) -> Option<&str> {
        match kind {
            SiteKind::School => self.school.as_deref(),
            SiteKind::Msoa => self.msoa.as_deref(),
        }
    }

    /// Returns the pupil's label for a demographic dimension.
    pub fn demographic(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::YearGroup => self.year_group.as_deref(),
            Dimension::Gender => self.gender.as_deref(),
            Dimension::Fsm => self.fsm.as_deref(),
            Dimension::Sen => self.sen.as_deref(),
        }
    }

    /// Sets the pupil's label for a demographic dimension.
    pub fn set_demographic(&mut self, dimension: Dimension, label: Option<String>) {
        match dimension {
            Dimension::YearGroup => self.year_group = label,
            Dimension::Gender => self.gender = label,
            Dimension::Fsm => self.fsm = label,
            Dimension::Sen => self.sen = label,
        }
    }
}

/// Mean and count of one score within a site and subgroup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub site: String,
    pub subgroup: Subgroup,
    /// Score name, e.g. `autonomy_score`.
    pub variable: String,
    /// Mean over pupils with a score. `None` when suppressed.
    pub mean: Option<f64>,
    /// Pupils with a score. `None` when suppressed.
    pub count: Option<usize>,
}

/// One answer option of a question and how many chose it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseCategory {
    /// Numeric code, `None` for the "No response" category.
    pub code: Option<i64>,
    pub label: String,
    pub count: Option<usize>,
    pub percentage: Option<f64>,
}

/// Distribution of answers to a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDistribution {
    pub measure: String,
    pub categories: Vec<ResponseCategory>,
    /// Total visible responses (non-response included). `None` when hidden.
    pub n_responses: Option<usize>,
}

impl ResponseDistribution {
    /// Hides every count and percentage in the row.
    pub fn suppress(&mut self) {
        for category in &mut self.categories {
            category.count = None;
            category.percentage = None;
        }
        self.n_responses = None;
    }

    /// Whether the row has been suppressed.
    pub fn is_suppressed(&self) -> bool {
        self.n_responses.is_none()
    }
}

/// Response distribution for a site and subgroup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRow {
    pub site: String,
    pub subgroup: Subgroup,
    #[serde(flatten)]
    pub distribution: ResponseDistribution,
}

/// Number of pupils in a site and subgroup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    pub site: String,
    pub subgroup: Subgroup,
    pub count: usize,
}

/// Side of the school-versus-rest comparison for demographics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolGroup {
    YourSchool,
    OtherSchools,
}

impl SchoolGroup {
    /// Numeric flag used in the exported table (1 = the school itself).
    pub fn flag(&self) -> u8 {
        match self {
            SchoolGroup::YourSchool => 1,
            SchoolGroup::OtherSchools => 0,
        }
    }
}

impl fmt::Display for SchoolGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchoolGroup::YourSchool => write!(f, "Your school"),
            SchoolGroup::OtherSchools => write!(f, "Other schools"),
        }
    }
}

/// Demographic distribution for a school or for all other schools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicRow {
    pub school: String,
    pub school_group: SchoolGroup,
    #[serde(flatten)]
    pub distribution: ResponseDistribution,
}

/// Weighted distribution of site means for one score and subgroup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Descriptives {
    /// Pupils across all contributing sites.
    pub total_pupils: usize,
    /// Number of contributing sites.
    pub group_n: usize,
    pub group_wt_mean: f64,
    pub group_wt_std: f64,
}

/// RAG rating of a site's mean against its peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rag {
    Below,
    Average,
    Above,
}

impl fmt::Display for Rag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rag::Below => write!(f, "below"),
            Rag::Average => write!(f, "average"),
            Rag::Above => write!(f, "above"),
        }
    }
}

impl Rag {
    /// Text shown in a result box.
    pub fn label(&self) -> &'static str {
        match self {
            Rag::Below => "Below average",
            Rag::Average => "Average",
            Rag::Above => "Above average",
        }
    }

    /// Returns an emoji representation of the rating.
    pub fn emoji(&self) -> &'static str {
        match self {
            Rag::Below => "🔴",
            Rag::Average => "🟡",
            Rag::Above => "🟢",
        }
    }
}

/// A score row with the peer distribution and its RAG rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedScore {
    #[serde(flatten)]
    pub score: ScoreRow,
    pub descriptives: Option<Descriptives>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub rag: Option<Rag>,
}

/// Metadata about an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Path of the responses file.
    pub input: String,
    pub generated_at: DateTime<Utc>,
    pub survey: SurveyKind,
    pub site_kind: SiteKind,
    /// Suppression threshold used.
    pub min_count: usize,
    /// Pupils read from the input.
    pub pupils: usize,
    /// Distinct sites found.
    pub sites: usize,
}

/// All aggregated outputs of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub metadata: AnalysisMetadata,
    pub counts: Vec<CountRow>,
    pub scores: Vec<ScoreRow>,
    pub scores_rag: Vec<RatedScore>,
    pub responses: Vec<ResponseRow>,
    pub demographic: Vec<DemographicRow>,
}

impl Analysis {
    /// Total pupils at a site (the "All" subgroup count).
    pub fn site_size(&self, site: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|c| c.site == site && c.subgroup == Subgroup::All)
            .map(|c| c.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pupil(year: &str, gender: &str) -> Pupil {
        Pupil {
            school: Some("School A".to_string()),
            year_group: Some(year.to_string()),
            gender: Some(gender.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_subgroup_contains() {
        let p = pupil("Year 8", "Girl");
        assert!(Subgroup::All.contains(&p));
        assert!(Subgroup::filtered(Dimension::YearGroup, "Year 8").contains(&p));
        assert!(!Subgroup::filtered(Dimension::YearGroup, "Year 10").contains(&p));
        assert!(!Subgroup::filtered(Dimension::Fsm, "FSM").contains(&p));
    }

    #[test]
    fn test_subgroup_label_for() {
        let group = Subgroup::filtered(Dimension::Gender, "Boy");
        assert_eq!(group.label_for(Dimension::Gender), "Boy");
        assert_eq!(group.label_for(Dimension::YearGroup), "All");
        assert_eq!(Subgroup::All.label_for(Dimension::Sen), "All");
    }

    #[test]
    fn test_pupil_site() {
        let mut p = pupil("Year 8", "Girl");
        p.msoa = Some("Area 1".to_string());
        assert_eq!(p.site(SiteKind::School), Some("School A"));
        assert_eq!(p.site(SiteKind::Msoa), Some("Area 1"));
    }

    #[test]
    fn test_rag_labels() {
        assert_eq!(Rag::Below.label(), "Below average");
        assert_eq!(Rag::Above.to_string(), "above");
    }

    #[test]
    fn test_suppress_distribution() {
        let mut dist = ResponseDistribution {
            measure: "lonely".to_string(),
            categories: vec![ResponseCategory {
                code: Some(1),
                label: "Often or always".to_string(),
                count: Some(3),
                percentage: Some(100.0),
            }],
            n_responses: Some(3),
        };
        dist.suppress();
        assert!(dist.is_suppressed());
        assert_eq!(dist.categories[0].count, None);
        assert_eq!(dist.categories[0].percentage, None);
    }

    #[test]
    fn test_site_size() {
        let analysis = Analysis {
            metadata: AnalysisMetadata {
                input: "x.csv".to_string(),
                generated_at: Utc::now(),
                survey: SurveyKind::Standard,
                site_kind: SiteKind::School,
                min_count: 10,
                pupils: 12,
                sites: 2,
            },
            counts: vec![
                CountRow {
                    site: "School B".to_string(),
                    subgroup: Subgroup::All,
                    count: 5,
                },
                CountRow {
                    site: "School A".to_string(),
                    subgroup: Subgroup::All,
                    count: 7,
                },
                CountRow {
                    site: "School A".to_string(),
                    subgroup: Subgroup::filtered(Dimension::Fsm, "FSM"),
                    count: 2,
                },
            ],
            scores: Vec::new(),
            scores_rag: Vec::new(),
            responses: Vec::new(),
            demographic: Vec::new(),
        };
        assert_eq!(analysis.site_size("School A"), Some(7));
        assert_eq!(analysis.site_size("School C"), None);
    }
}
