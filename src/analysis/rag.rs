//! RAG ratings of site means against their peers.
//!
//! For each score and subgroup the site means are combined into a mean and
//! standard deviation weighted by each site's pupil count. A site is
//! "below" if its mean is at or under one standard deviation below that
//! weighted mean, "above" if at or over one standard deviation above it,
//! and "average" otherwise.

use crate::models::{Descriptives, Rag, RatedScore, ScoreRow, Subgroup};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from [`score_descriptives`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptivesError {
    #[error("There must be no missing values in the {0} column")]
    Missing(&'static str),

    #[error("Got {values} values but {counts} counts")]
    LengthMismatch { values: usize, counts: usize },

    #[error("No sites to describe")]
    Empty,

    #[error("Counts sum to zero")]
    ZeroWeight,
}

/// Weighted mean and weighted (population) standard deviation of site
/// means, with the total pupils and number of sites behind them.
pub fn score_descriptives(
    values: &[Option<f64>],
    counts: &[Option<usize>],
) -> Result<Descriptives, DescriptivesError> {
    if values.iter().any(Option::is_none) {
        return Err(DescriptivesError::Missing("values"));
    }
    if counts.iter().any(Option::is_none) {
        return Err(DescriptivesError::Missing("counts"));
    }
    if values.len() != counts.len() {
        return Err(DescriptivesError::LengthMismatch {
            values: values.len(),
            counts: counts.len(),
        });
    }
    if values.is_empty() {
        return Err(DescriptivesError::Empty);
    }

    let pairs: Vec<(f64, f64)> = values
        .iter()
        .flatten()
        .zip(counts.iter().flatten())
        .map(|(v, c)| (*v, *c as f64))
        .collect();

    let total_pupils: usize = counts.iter().flatten().sum();
    if total_pupils == 0 {
        return Err(DescriptivesError::ZeroWeight);
    }
    let weight = total_pupils as f64;

    let mean = pairs.iter().map(|(v, w)| v * w).sum::<f64>() / weight;
    let variance = pairs
        .iter()
        .map(|(v, w)| (v - mean).powi(2) * w)
        .sum::<f64>()
        / weight;

    Ok(Descriptives {
        total_pupils,
        group_n: pairs.len(),
        group_wt_mean: mean,
        group_wt_std: variance.sqrt(),
    })
}

/// Rates a site mean against the lower and upper bounds.
///
/// "Below" is checked first, so when the bounds coincide (every site has
/// the same mean) the rating is "below".
pub fn classify(mean: f64, lower: f64, upper: f64) -> Option<Rag> {
    if mean <= lower {
        Some(Rag::Below)
    } else if mean < upper {
        Some(Rag::Average)
    } else if mean >= upper {
        Some(Rag::Above)
    } else {
        None
    }
}

/// Attaches the peer distribution and a RAG rating to every score row.
///
/// Rows are grouped by variable and subgroup. Only visible rows (with a
/// mean and a count) contribute to the distribution, but every row gets
/// the group's descriptives. Rows without a mean get no rating.
pub fn create_rag_ratings(rows: &[ScoreRow]) -> Vec<RatedScore> {
    let mut grouped: HashMap<(&str, &Subgroup), (Vec<Option<f64>>, Vec<Option<usize>>)> =
        HashMap::new();

    for row in rows {
        if row.mean.is_none() || row.count.is_none() {
            continue;
        }
        let entry = grouped
            .entry((row.variable.as_str(), &row.subgroup))
            .or_default();
        entry.0.push(row.mean);
        entry.1.push(row.count);
    }

    let mut descriptives: HashMap<(&str, &Subgroup), Descriptives> = HashMap::new();
    for (key, (values, counts)) in &grouped {
        match score_descriptives(values, counts) {
            Ok(d) => {
                descriptives.insert(*key, d);
            }
            Err(e) => warn!("Skipping {} / {}: {}", key.0, key.1, e),
        }
    }
    debug!("Computed descriptives for {} groups", descriptives.len());

    rows.iter()
        .map(|row| {
            let d = descriptives
                .get(&(row.variable.as_str(), &row.subgroup))
                .copied();
            let lower = d.map(|d| d.group_wt_mean - d.group_wt_std);
            let upper = d.map(|d| d.group_wt_mean + d.group_wt_std);
            let rag = match (row.mean, lower, upper) {
                (Some(mean), Some(lower), Some(upper)) => classify(mean, lower, upper),
                _ => None,
            };

            RatedScore {
                score: row.clone(),
                descriptives: d,
                lower,
                upper,
                rag,
            }
        })
        .collect()
}
