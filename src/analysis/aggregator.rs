//! Aggregation of pupil records by site and subgroup.
//!
//! This module provides the grouping driver and the aggregate functions
//! used with it: score means, answer distributions, pupil counts and the
//! school-versus-rest demographic comparison.

use crate::labels::{self, ResponseLabels, NO_RESPONSE};
use crate::models::{
    CountRow, DemographicRow, Dimension, Pupil, ResponseCategory, ResponseDistribution,
    ResponseRow, SchoolGroup, ScoreRow, SiteKind, Subgroup, SurveyKind,
};
use crate::analysis::scores::SCORE_NAMES;
use tracing::debug;

/// Default minimum number of responses for a result to be shown.
pub const DEFAULT_MIN_COUNT: usize = 10;

/// Set of subgroups results are broken down into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupType {
    /// Year 8 / Year 10, gender, FSM and SEN.
    Standard,
    /// Year 7 to Year 11, gender and FSM.
    Symbol,
    /// All pupils only.
    None,
}

impl GroupType {
    /// Breakdown used for a survey's site-level results.
    pub fn for_survey(kind: SurveyKind) -> Self {
        match kind {
            SurveyKind::Standard => GroupType::Standard,
            SurveyKind::Symbol => GroupType::Symbol,
        }
    }

    /// Dimensions the subgroups are filtered on, in column order.
    pub fn dimensions(&self) -> &'static [Dimension] {
        match self {
            GroupType::Standard => &Dimension::ALL,
            GroupType::Symbol => &[Dimension::YearGroup, Dimension::Gender, Dimension::Fsm],
            GroupType::None => &[],
        }
    }

    /// Subgroups in output order, starting with "All".
    pub fn subgroups(&self) -> Vec<Subgroup> {
        let filtered: &[(Dimension, &str)] = match self {
            GroupType::Standard => &[
                (Dimension::YearGroup, "Year 8"),
                (Dimension::YearGroup, "Year 10"),
                (Dimension::Gender, "Girl"),
                (Dimension::Gender, "Boy"),
                (Dimension::Fsm, "FSM"),
                (Dimension::Fsm, "Non-FSM"),
                (Dimension::Sen, "SEN"),
                (Dimension::Sen, "Non-SEN"),
            ],
            GroupType::Symbol => &[
                (Dimension::YearGroup, "Year 7"),
                (Dimension::YearGroup, "Year 8"),
                (Dimension::YearGroup, "Year 9"),
                (Dimension::YearGroup, "Year 10"),
                (Dimension::YearGroup, "Year 11"),
                (Dimension::Gender, "Girl"),
                (Dimension::Gender, "Boy"),
                (Dimension::Fsm, "FSM"),
                (Dimension::Fsm, "Non-FSM"),
            ],
            GroupType::None => &[],
        };

        std::iter::once(Subgroup::All)
            .chain(filtered.iter().map(|(dim, value)| Subgroup::filtered(*dim, value)))
            .collect()
    }
}

/// Runs `agg` for every site and subgroup.
///
/// Sites are taken from the pupils themselves (sorted, pupils without a
/// site are left out). A subgroup with no pupils is still aggregated, over
/// an empty slice, so every site has a result for every subgroup.
pub fn results_by_site_and_group<T, F>(
    pupils: &[Pupil],
    site_kind: SiteKind,
    group_type: GroupType,
    mut agg: F,
) -> Vec<(String, Subgroup, T)>
where
    F: FnMut(&[&Pupil]) -> T,
{
    let mut sites: Vec<&str> = pupils.iter().filter_map(|p| p.site(site_kind)).collect();
    sites.sort_unstable();
    sites.dedup();

    let subgroups = group_type.subgroups();
    let mut results = Vec::with_capacity(sites.len() * subgroups.len());

    for site in sites {
        let at_site: Vec<&Pupil> = pupils
            .iter()
            .filter(|p| p.site(site_kind) == Some(site))
            .collect();

        for subgroup in &subgroups {
            let members: Vec<&Pupil> = at_site
                .iter()
                .copied()
                .filter(|p| subgroup.contains(p))
                .collect();
            debug!("{} / {}: {} pupils", site, subgroup, members.len());
            results.push((site.to_string(), subgroup.clone(), agg(&members)));
        }
    }

    results
}

/// Mean and count of one score over a set of pupils.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub variable: &'static str,
    /// `None` when no pupil has the score.
    pub mean: Option<f64>,
    pub count: usize,
}

/// Mean and number of non-missing values for every score.
pub fn aggregate_scores(pupils: &[&Pupil]) -> Vec<ScoreSummary> {
    SCORE_NAMES
        .iter()
        .map(|&variable| {
            let values: Vec<f64> = pupils.iter().filter_map(|p| p.score(variable)).collect();
            let count = values.len();
            let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
            ScoreSummary {
                variable,
                mean,
                count,
            }
        })
        .collect()
}

/// Score means for every site and subgroup, with cells below `min_count`
/// hidden.
pub fn score_rows(
    pupils: &[Pupil],
    site_kind: SiteKind,
    group_type: GroupType,
    min_count: usize,
) -> Vec<ScoreRow> {
    let mut rows = Vec::new();
    let mut suppressed = 0;

    for (site, subgroup, summaries) in
        results_by_site_and_group(pupils, site_kind, group_type, aggregate_scores)
    {
        for summary in summaries {
            let visible = summary.count >= min_count;
            if !visible {
                suppressed += 1;
            }
            rows.push(ScoreRow {
                site: site.clone(),
                subgroup: subgroup.clone(),
                variable: summary.variable.to_string(),
                mean: summary.mean.filter(|_| visible),
                count: visible.then_some(summary.count),
            });
        }
    }

    debug!("{} of {} score cells suppressed", suppressed, rows.len());
    rows
}

/// Pupils who were asked a question. Follow-ups about talking to someone
/// only go to pupils who answered the branching question the right way.
fn asked<'a>(pupils: &[&'a Pupil], question: &str) -> Vec<&'a Pupil> {
    let branch = if let Some(prefix) = question
        .strip_suffix("_talk_listen")
        .or_else(|| question.strip_suffix("_talk_helpful"))
    {
        Some((prefix, 1.0))
    } else {
        question.strip_suffix("_talk_if").map(|prefix| (prefix, 0.0))
    };

    match branch {
        Some((prefix, answer)) => {
            let talk = format!("{}_talk", prefix);
            pupils
                .iter()
                .copied()
                .filter(|p| p.response(&talk) == Some(answer))
                .collect()
        }
        None => pupils.to_vec(),
    }
}

/// Distribution of answers to each question.
///
/// Every labelled option is listed, whether chosen or not, followed by a
/// "No response" category. With `hide_low_response`, options chosen by
/// fewer than `min_count` pupils are hidden, and non-response is hidden
/// as well whenever any option is.
pub fn aggregate_proportions(
    pupils: &[&Pupil],
    questions: &[String],
    labels: &ResponseLabels,
    hide_low_response: bool,
    min_count: usize,
) -> Vec<ResponseDistribution> {
    let mut rows = Vec::with_capacity(questions.len());

    for question in questions {
        let Some(options) = labels.categories(question) else {
            continue;
        };
        let pool = asked(pupils, question);

        let mut codes: Vec<Option<i64>> = options.iter().map(|(code, _)| Some(*code)).collect();
        codes.push(None);
        let mut names: Vec<&str> = options.iter().map(|(_, label)| label.as_str()).collect();
        names.push(NO_RESPONSE);

        let mut counts: Vec<usize> = options
            .iter()
            .map(|(code, _)| {
                pool.iter()
                    .filter(|p| p.response(question) == Some(*code as f64))
                    .count()
            })
            .collect();
        counts.push(pool.iter().filter(|p| p.response(question).is_none()).count());

        let total: usize = counts.iter().sum();
        let mut visible = vec![true; counts.len()];
        if hide_low_response {
            let last = counts.len() - 1;
            for (flag, count) in visible.iter_mut().zip(&counts).take(last) {
                *flag = *count >= min_count;
            }
            let all_shown = visible[..last].iter().all(|v| *v);
            visible[last] = all_shown;
        }

        let categories: Vec<ResponseCategory> = codes
            .into_iter()
            .zip(names)
            .zip(counts.iter().zip(&visible))
            .map(|((code, label), (count, shown))| ResponseCategory {
                code,
                label: label.to_string(),
                count: shown.then_some(*count),
                percentage: if *shown && total > 0 {
                    Some(*count as f64 / total as f64 * 100.0)
                } else {
                    None
                },
            })
            .collect();
        let n_responses = categories.iter().filter_map(|c| c.count).sum();

        rows.push(ResponseDistribution {
            measure: question.clone(),
            categories,
            n_responses: Some(n_responses),
        });
    }

    rows
}

/// Answer distributions for every site and subgroup. Rows with fewer than
/// `min_count` responses are suppressed.
pub fn response_rows(
    pupils: &[Pupil],
    site_kind: SiteKind,
    group_type: GroupType,
    questions: &[String],
    labels: &ResponseLabels,
    hide_low_response: bool,
    min_count: usize,
) -> Vec<ResponseRow> {
    let mut rows = Vec::new();

    for (site, subgroup, distributions) in
        results_by_site_and_group(pupils, site_kind, group_type, |group| {
            aggregate_proportions(group, questions, labels, hide_low_response, min_count)
        })
    {
        for mut distribution in distributions {
            if distribution.n_responses.unwrap_or(0) < min_count {
                distribution.suppress();
            }
            rows.push(ResponseRow {
                site: site.clone(),
                subgroup: subgroup.clone(),
                distribution,
            });
        }
    }

    rows
}

/// Number of pupils in the group.
pub fn aggregate_counts(pupils: &[&Pupil]) -> usize {
    pupils.len()
}

/// Pupil counts for every site and subgroup.
pub fn count_rows(pupils: &[Pupil], site_kind: SiteKind, group_type: GroupType) -> Vec<CountRow> {
    results_by_site_and_group(pupils, site_kind, group_type, aggregate_counts)
        .into_iter()
        .map(|(site, subgroup, count)| CountRow {
            site,
            subgroup,
            count,
        })
        .collect()
}

/// Demographic distributions for each school compared with all other
/// schools combined.
///
/// Options chosen by fewer than `min_count` pupils are always hidden, and
/// rows with fewer than `min_count` responses are suppressed.
pub fn aggregate_demographic(
    pupils: &[Pupil],
    measures: &[String],
    labels: &ResponseLabels,
    min_count: usize,
) -> Vec<DemographicRow> {
    let mut schools: Vec<&str> = pupils.iter().filter_map(|p| p.school.as_deref()).collect();
    schools.sort_unstable();
    schools.dedup();

    let mut rows = Vec::new();
    for school in schools {
        for group in [SchoolGroup::YourSchool, SchoolGroup::OtherSchools] {
            let own = group == SchoolGroup::YourSchool;
            let members: Vec<&Pupil> = pupils
                .iter()
                .filter(|p| (p.school.as_deref() == Some(school)) == own)
                .collect();

            let distributions = aggregate_proportions(&members, measures, labels, true, min_count);
            for mut distribution in distributions {
                if distribution.n_responses.unwrap_or(0) < min_count {
                    distribution.suppress();
                }
                rows.push(DemographicRow {
                    school: school.to_string(),
                    school_group: group,
                    distribution,
                });
            }
        }
    }

    rows
}

/// Labelled questions present in the data that belong to a topic, in
/// column order.
pub fn response_questions(
    columns: &[String],
    labels: &ResponseLabels,
    survey: SurveyKind,
) -> Vec<String> {
    let demographics = labels::demographic_columns(survey);
    columns
        .iter()
        .filter(|c| labels.contains(c) && !demographics.contains(&c.as_str()))
        .cloned()
        .collect()
}

/// Demographic measures present in the data, in display order.
pub fn demographic_questions(
    columns: &[String],
    labels: &ResponseLabels,
    survey: SurveyKind,
) -> Vec<String> {
    labels::demographic_measures(survey)
        .iter()
        .filter(|m| labels.contains(m) && columns.iter().any(|c| c == *m))
        .map(|m| m.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scores::apply_scores;

    fn pupil(school: &str, year: &str, answers: &[(&str, f64)]) -> Pupil {
        let mut p = Pupil {
            school: Some(school.to_string()),
            year_group: Some(year.to_string()),
            ..Default::default()
        };
        for (q, v) in answers {
            p.responses.insert(q.to_string(), *v);
        }
        p
    }

    fn refs(pupils: &[Pupil]) -> Vec<&Pupil> {
        pupils.iter().collect()
    }

    #[test]
    fn test_group_type_subgroups() {
        assert_eq!(GroupType::Standard.subgroups().len(), 9);
        assert_eq!(GroupType::Symbol.subgroups().len(), 10);
        assert_eq!(GroupType::None.subgroups(), vec![Subgroup::All]);
        assert_eq!(GroupType::Standard.subgroups()[0], Subgroup::All);
    }

    #[test]
    fn test_results_cover_every_site_and_subgroup() {
        let mut pupils = vec![
            pupil("School B", "Year 8", &[]),
            pupil("School A", "Year 8", &[]),
            pupil("School A", "Year 10", &[]),
        ];
        pupils.push(Pupil::default());

        let results =
            results_by_site_and_group(&pupils, SiteKind::School, GroupType::Standard, aggregate_counts);
        assert_eq!(results.len(), 18);
        assert_eq!(results[0].0, "School A");
        assert_eq!(results[0].2, 2);
        assert_eq!(results[9].0, "School B");

        let year10_b = results
            .iter()
            .find(|(site, group, _)| {
                site == "School B" && *group == Subgroup::filtered(Dimension::YearGroup, "Year 10")
            })
            .unwrap();
        assert_eq!(year10_b.2, 0);
    }

    #[test]
    fn test_aggregate_scores_skips_missing() {
        let mut pupils = vec![
            pupil("School A", "Year 8", &[("lonely", 2.0)]),
            pupil("School A", "Year 8", &[("lonely", 5.0)]),
            pupil("School A", "Year 8", &[]),
        ];
        apply_scores(&mut pupils);
        let summaries = aggregate_scores(&refs(&pupils));
        let lonely = summaries.iter().find(|s| s.variable == "lonely_score").unwrap();
        assert_eq!(lonely.count, 2);
        assert_eq!(lonely.mean, Some(3.5));

        let sleep = summaries.iter().find(|s| s.variable == "sleep_score").unwrap();
        assert_eq!(sleep.count, 0);
        assert_eq!(sleep.mean, None);
    }

    #[test]
    fn test_score_rows_suppress_small_cells() {
        let mut pupils: Vec<Pupil> = (0..12)
            .map(|i| pupil("School A", if i < 3 { "Year 10" } else { "Year 8" }, &[("lonely", 3.0)]))
            .collect();
        apply_scores(&mut pupils);

        let rows = score_rows(&pupils, SiteKind::School, GroupType::Standard, 10);
        let find = |group: &Subgroup| {
            rows.iter()
                .find(|r| r.variable == "lonely_score" && &r.subgroup == group)
                .unwrap()
        };
        let all = find(&Subgroup::All);
        assert_eq!(all.mean, Some(3.0));
        assert_eq!(all.count, Some(12));

        let year10 = find(&Subgroup::filtered(Dimension::YearGroup, "Year 10"));
        assert_eq!(year10.mean, None);
        assert_eq!(year10.count, None);
    }

    #[test]
    fn test_aggregate_proportions_counts_every_option() {
        let pupils = vec![
            pupil("School A", "Year 8", &[("sleep", 1.0)]),
            pupil("School A", "Year 8", &[("sleep", 1.0)]),
            pupil("School A", "Year 8", &[("sleep", 1.0)]),
            pupil("School A", "Year 8", &[]),
        ];
        let labels = ResponseLabels::standard();
        let rows = aggregate_proportions(&refs(&pupils), &["sleep".to_string()], &labels, false, 10);
        let row = &rows[0];

        let labels: Vec<&str> = row.categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["No", "Yes", "No response"]);
        let counts: Vec<Option<usize>> = row.categories.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![Some(0), Some(3), Some(1)]);
        assert_eq!(row.categories[1].percentage, Some(75.0));
        assert_eq!(row.n_responses, Some(4));
    }

    #[test]
    fn test_branching_questions_use_subset() {
        let pupils = vec![
            pupil("School A", "Year 8", &[("staff_talk", 1.0), ("staff_talk_listen", 4.0)]),
            pupil("School A", "Year 8", &[("staff_talk", 1.0)]),
            pupil("School A", "Year 8", &[("staff_talk", 0.0), ("staff_talk_if", 2.0)]),
            pupil("School A", "Year 8", &[]),
        ];
        let labels = ResponseLabels::standard();
        let questions = vec!["staff_talk_listen".to_string(), "staff_talk_if".to_string()];
        let rows = aggregate_proportions(&refs(&pupils), &questions, &labels, false, 10);

        // Two pupils talked to staff, one of whom skipped the follow-up
        assert_eq!(rows[0].n_responses, Some(2));
        assert_eq!(rows[0].categories.last().unwrap().count, Some(1));
        // One pupil did not talk to staff
        assert_eq!(rows[1].n_responses, Some(1));
    }

    #[test]
    fn test_hide_low_response() {
        let mut pupils: Vec<Pupil> = (0..12)
            .map(|_| pupil("School A", "Year 8", &[("sleep", 1.0)]))
            .collect();
        pupils.extend((0..10).map(|_| pupil("School A", "Year 8", &[("sleep", 0.0)])));
        pupils.push(pupil("School A", "Year 8", &[]));
        let labels = ResponseLabels::standard();
        let questions = vec!["sleep".to_string()];

        let rows = aggregate_proportions(&refs(&pupils), &questions, &labels, true, 10);
        let counts: Vec<Option<usize>> = rows[0].categories.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![Some(10), Some(12), Some(1)]);

        pupils.truncate(15);
        let rows = aggregate_proportions(&refs(&pupils), &questions, &labels, true, 10);
        let counts: Vec<Option<usize>> = rows[0].categories.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![None, Some(12), None]);
        assert_eq!(rows[0].n_responses, Some(12));
    }

    #[test]
    fn test_response_rows_suppress_small_groups() {
        let pupils: Vec<Pupil> = (0..11)
            .map(|i| pupil("School A", if i == 0 { "Year 10" } else { "Year 8" }, &[("sleep", 1.0)]))
            .collect();
        let labels = ResponseLabels::standard();
        let rows = response_rows(
            &pupils,
            SiteKind::School,
            GroupType::Standard,
            &["sleep".to_string()],
            &labels,
            false,
            10,
        );
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0].distribution.n_responses, Some(11));
        let year10 = rows
            .iter()
            .find(|r| r.subgroup == Subgroup::filtered(Dimension::YearGroup, "Year 10"))
            .unwrap();
        assert!(year10.distribution.is_suppressed());
    }

    #[test]
    fn test_aggregate_demographic() {
        let mut pupils: Vec<Pupil> = (0..10)
            .map(|_| pupil("School A", "Year 8", &[("fsm", 1.0)]))
            .collect();
        pupils.extend((0..14).map(|_| pupil("School B", "Year 8", &[("fsm", 0.0)])));
        let labels = ResponseLabels::standard();
        let rows = aggregate_demographic(&pupils, &["fsm".to_string()], &labels, 10);

        assert_eq!(rows.len(), 4);
        let own = &rows[0];
        assert_eq!(own.school, "School A");
        assert_eq!(own.school_group, SchoolGroup::YourSchool);
        // Non-FSM has no pupils so both it and non-response are hidden
        let counts: Vec<Option<usize>> = own.distribution.categories.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![None, Some(10), None]);
        assert_eq!(own.distribution.n_responses, Some(10));
    }

    #[test]
    fn test_response_questions_exclude_demographics() {
        let columns: Vec<String> = ["school", "gender", "lonely", "unknown", "sleep"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let labels = ResponseLabels::standard();
        assert_eq!(
            response_questions(&columns, &labels, SurveyKind::Standard),
            vec!["lonely", "sleep"]
        );
        assert_eq!(
            demographic_questions(&columns, &labels, SurveyKind::Standard),
            vec!["gender"]
        );
    }
}
