//! Chart data for the report.
//!
//! The report draws its charts as Markdown tables, but the data is built
//! here so ordering, axis range and suppression are decided in one place.

use crate::labels::{question_text, NO_RESPONSE};
use crate::models::{Rag, RatedScore, ResponseDistribution, Subgroup};
use std::cmp::Ordering;

/// Padding added above and below the bars, as a share of their range.
const AXIS_PADDING: f64 = 0.15;

/// One site's bar in the comparison chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonBar {
    pub site: String,
    pub mean: f64,
    /// Whether this is the site the report is for.
    pub highlighted: bool,
}

/// Shaded region behind the comparison bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub rag: Rag,
    pub from: f64,
    pub to: f64,
}

/// Site means for one score and subgroup, lowest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonChart {
    pub bars: Vec<ComparisonBar>,
    pub y_min: f64,
    pub y_max: f64,
    pub bands: Vec<Band>,
}

/// Builds the comparison chart for a score and subgroup. Sites without a
/// mean are left out. Returns `None` if no site has a mean.
pub fn comparison_chart(
    rated: &[RatedScore],
    variable: &str,
    subgroup: &Subgroup,
    site: &str,
) -> Option<ComparisonChart> {
    let rows: Vec<&RatedScore> = rated
        .iter()
        .filter(|r| r.score.variable == variable && &r.score.subgroup == subgroup)
        .filter(|r| r.score.mean.is_some())
        .collect();

    let mut bars: Vec<ComparisonBar> = rows
        .iter()
        .filter_map(|r| {
            r.score.mean.map(|mean| ComparisonBar {
                site: r.score.site.clone(),
                mean,
                highlighted: r.score.site == site,
            })
        })
        .collect();
    if bars.is_empty() {
        return None;
    }
    bars.sort_by(|a, b| {
        a.mean
            .partial_cmp(&b.mean)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.site.cmp(&b.site))
    });

    let min = bars.iter().map(|b| b.mean).fold(f64::INFINITY, f64::min);
    let max = bars.iter().map(|b| b.mean).fold(f64::NEG_INFINITY, f64::max);
    let (y_min, y_max) = padded_range(min, max);

    let bands = match rows.first().and_then(|r| r.lower.zip(r.upper)) {
        Some((lower, upper)) => vec![
            Band {
                rag: Rag::Below,
                from: y_min,
                to: lower,
            },
            Band {
                rag: Rag::Average,
                from: lower,
                to: upper,
            },
            Band {
                rag: Rag::Above,
                from: upper,
                to: y_max,
            },
        ],
        None => Vec::new(),
    };

    Some(ComparisonChart {
        bars,
        y_min,
        y_max,
        bands,
    })
}

/// Axis range padded by a share of the data range, never below zero.
pub fn padded_range(min: f64, max: f64) -> (f64, f64) {
    let pad = (max - min) * AXIS_PADDING;
    ((min - pad).max(0.0), max + pad)
}

/// One answer option in a response chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseBar {
    pub label: String,
    pub count: Option<usize>,
    pub percentage: Option<f64>,
}

/// Answers to one question, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseChart {
    pub measure: String,
    pub question: String,
    pub bars: Vec<ResponseBar>,
    pub n_responses: Option<usize>,
}

/// Builds the chart for a response distribution.
///
/// Options are drawn from the highest code down with "No response" kept
/// last. A suppressed distribution becomes a single placeholder bar.
pub fn response_chart(distribution: &ResponseDistribution, min_count: usize) -> ResponseChart {
    let question = question_text(&distribution.measure)
        .unwrap_or(distribution.measure.as_str())
        .to_string();

    let bars = if distribution.is_suppressed() {
        vec![ResponseBar {
            label: format!("Less than {} responses", min_count),
            count: None,
            percentage: None,
        }]
    } else {
        reverse_categories(distribution)
    };

    ResponseChart {
        measure: distribution.measure.clone(),
        question,
        bars,
        n_responses: distribution.n_responses,
    }
}

/// Categories in reverse order, with non-response still at the end.
fn reverse_categories(distribution: &ResponseDistribution) -> Vec<ResponseBar> {
    let (missing, answered): (Vec<_>, Vec<_>) = distribution
        .categories
        .iter()
        .partition(|c| c.code.is_none() && c.label == NO_RESPONSE);

    answered
        .into_iter()
        .rev()
        .chain(missing)
        .map(|c| ResponseBar {
            label: c.label.clone(),
            count: c.count,
            percentage: c.percentage,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Descriptives, ResponseCategory, ScoreRow};

    fn rated(site: &str, mean: Option<f64>) -> RatedScore {
        RatedScore {
            score: ScoreRow {
                site: site.to_string(),
                subgroup: Subgroup::All,
                variable: "lonely_score".to_string(),
                mean,
                count: mean.map(|_| 10),
            },
            descriptives: Some(Descriptives {
                total_pupils: 30,
                group_n: 3,
                group_wt_mean: 3.0,
                group_wt_std: 1.0,
            }),
            lower: Some(2.0),
            upper: Some(4.0),
            rag: None,
        }
    }

    fn category(code: Option<i64>, label: &str, count: usize) -> ResponseCategory {
        ResponseCategory {
            code,
            label: label.to_string(),
            count: Some(count),
            percentage: Some(count as f64 * 10.0),
        }
    }

    #[test]
    fn test_comparison_chart_order_and_range() {
        let rows = vec![
            rated("School A", Some(4.0)),
            rated("School B", Some(2.0)),
            rated("School C", None),
            rated("School D", Some(3.0)),
        ];
        let chart = comparison_chart(&rows, "lonely_score", &Subgroup::All, "School D").unwrap();

        let sites: Vec<&str> = chart.bars.iter().map(|b| b.site.as_str()).collect();
        assert_eq!(sites, vec!["School B", "School D", "School A"]);
        assert!(chart.bars[1].highlighted);
        assert!(!chart.bars[0].highlighted);

        assert!((chart.y_min - 1.7).abs() < 1e-9);
        assert!((chart.y_max - 4.3).abs() < 1e-9);
        assert_eq!(chart.bands.len(), 3);
        assert_eq!(chart.bands[1].from, 2.0);
        assert_eq!(chart.bands[1].to, 4.0);
        assert_eq!(chart.bands[2].to, chart.y_max);
    }

    #[test]
    fn test_comparison_chart_without_means() {
        let rows = vec![rated("School A", None)];
        assert!(comparison_chart(&rows, "lonely_score", &Subgroup::All, "School A").is_none());
    }

    #[test]
    fn test_padded_range_floors_at_zero() {
        assert_eq!(padded_range(0.0, 10.0), (0.0, 11.5));
        let (lo, hi) = padded_range(5.0, 5.0);
        assert_eq!((lo, hi), (5.0, 5.0));
    }

    #[test]
    fn test_response_chart_reverses_categories() {
        let dist = ResponseDistribution {
            measure: "sleep".to_string(),
            categories: vec![
                category(Some(0), "No", 4),
                category(Some(1), "Yes", 5),
                category(None, NO_RESPONSE, 1),
            ],
            n_responses: Some(10),
        };
        let chart = response_chart(&dist, 10);
        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Yes", "No", NO_RESPONSE]);
        assert!(chart.question.starts_with("Is the amount of sleep"));
    }

    #[test]
    fn test_response_chart_suppressed() {
        let mut dist = ResponseDistribution {
            measure: "sleep".to_string(),
            categories: vec![category(Some(0), "No", 1), category(None, NO_RESPONSE, 0)],
            n_responses: Some(1),
        };
        dist.suppress();
        let chart = response_chart(&dist, 10);
        assert_eq!(chart.bars.len(), 1);
        assert_eq!(chart.bars[0].label, "Less than 10 responses");
        assert_eq!(chart.n_responses, None);
    }
}
