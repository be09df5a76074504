//! Per-pupil topic scores.
//!
//! Every score is oriented so that a higher value is the more positive
//! outcome. A score is missing whenever one of the items it needs is
//! missing, unless stated otherwise.

use crate::models::{Pupil, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Score variables in the order they are calculated.
pub const SCORE_NAMES: &[&str] = &[
    "autonomy_score",
    "life_satisfaction_score",
    "optimism_score",
    "wellbeing_score",
    "esteem_score",
    "stress_score",
    "appearance_score",
    "negative_score",
    "lonely_score",
    "support_score",
    "sleep_score",
    "physical_score",
    "free_like_score",
    "media_score",
    "places_score",
    "staff_talk_score",
    "home_talk_score",
    "peer_talk_score",
    "talk_score",
    "accept_score",
    "school_belong_score",
    "staff_relationship_score",
    "home_relationship_score",
    "home_happy_score",
    "local_env_score",
    "discrim_score",
    "belong_local_score",
    "wealth_score",
    "future_score",
    "climate_score",
    "social_score",
    "bully_score",
];

const TALK_PROVIDERS: [&str; 3] = ["staff", "home", "peer"];

const DISCRIM_ITEMS: [&str; 5] = [
    "discrim_race",
    "discrim_gender",
    "discrim_orientation",
    "discrim_disability",
    "discrim_faith",
];

/// Sum of the values, or missing if any value is missing.
pub fn sum_score(values: &[Value]) -> Value {
    values.iter().copied().sum()
}

/// Reverses a value on a scale, so `min` becomes `max` and vice versa.
pub fn reverse_score(value: Value, min: f64, max: f64) -> Value {
    value.map(|v| max + min - v)
}

/// Recodes a value. Codes not listed become missing.
fn recode(value: Value, mapping: &[(f64, Value)]) -> Value {
    let v = value?;
    mapping
        .iter()
        .find(|(code, _)| *code == v)
        .and_then(|(_, out)| *out)
}

/// Sets a single code to missing.
fn drop_code(value: Value, code: f64) -> Value {
    value.filter(|v| *v != code)
}

fn minus_one(value: Value) -> Value {
    value.map(|v| v - 1.0)
}

/// Computes every topic score for one pupil.
pub fn calculate_scores(pupil: &Pupil) -> BTreeMap<&'static str, Value> {
    let r = |q: &str| pupil.response(q);
    let items = |qs: &[&str]| -> Vec<Value> { qs.iter().map(|&q| r(q)).collect() };
    let mut scores = BTreeMap::new();

    scores.insert(
        "autonomy_score",
        sum_score(&[
            reverse_score(r("autonomy_pressure"), 1.0, 5.0),
            r("autonomy_express"),
            r("autonomy_decide"),
            reverse_score(r("autonomy_told"), 1.0, 5.0),
            r("autonomy_myself"),
            r("autonomy_choice"),
        ]),
    );

    scores.insert("life_satisfaction_score", r("life_satisfaction"));

    scores.insert(
        "optimism_score",
        sum_score(&items(&[
            "optimism_future",
            "optimism_best",
            "optimism_good",
            "optimism_work",
        ])),
    );

    scores.insert(
        "wellbeing_score",
        sum_score(&items(&[
            "wellbeing_optimistic",
            "wellbeing_useful",
            "wellbeing_relaxed",
            "wellbeing_problems",
            "wellbeing_thinking",
            "wellbeing_close",
            "wellbeing_mind",
        ])),
    );

    let esteem: Vec<Value> = items(&[
        "esteem_satisfied",
        "esteem_qualities",
        "esteem_well",
        "esteem_value",
        "esteem_good",
    ])
    .into_iter()
    .map(|v| reverse_score(v, 1.0, 4.0))
    .collect();
    scores.insert("esteem_score", sum_score(&esteem));

    // Summed in the negative direction first, then flipped
    let stress = sum_score(&[
        minus_one(r("stress_control")),
        minus_one(r("stress_overcome")),
        minus_one(reverse_score(r("stress_confident"), 1.0, 5.0)),
        minus_one(reverse_score(r("stress_way"), 1.0, 5.0)),
    ]);
    scores.insert("stress_score", reverse_score(stress, 0.0, 16.0));

    // 11 is "prefer not to say"
    scores.insert("appearance_score", drop_code(r("appearance_happy"), 11.0));

    let negative: Vec<Value> = items(&[
        "negative_lonely",
        "negative_unhappy",
        "negative_like",
        "negative_cry",
        "negative_school",
        "negative_worry",
        "negative_sleep",
        "negative_wake",
        "negative_shy",
        "negative_scared",
    ])
    .into_iter()
    .map(minus_one)
    .collect();
    scores.insert(
        "negative_score",
        reverse_score(sum_score(&negative), 0.0, 20.0),
    );

    scores.insert("lonely_score", r("lonely"));

    scores.insert(
        "support_score",
        reverse_score(
            sum_score(&items(&["support_ways", "support_look"])),
            2.0,
            8.0,
        ),
    );

    scores.insert("sleep_score", r("sleep"));

    scores.insert(
        "physical_score",
        r("physical_days").zip(r("physical_hours")).map(|(d, h)| d * h),
    );

    scores.insert("free_like_score", reverse_score(r("free_like"), 1.0, 5.0));

    scores.insert(
        "media_score",
        reverse_score(minus_one(r("media_hours")), 0.0, 8.0),
    );

    scores.insert("places_score", r("places_freq"));

    let mut talk = Vec::with_capacity(TALK_PROVIDERS.len());
    for (provider, name) in TALK_PROVIDERS.iter().zip([
        "staff_talk_score",
        "home_talk_score",
        "peer_talk_score",
    ]) {
        let score = talk_score(pupil, provider);
        talk.push(score);
        scores.insert(name, score);
    }
    scores.insert("talk_score", sum_score(&talk));

    scores.insert(
        "accept_score",
        sum_score(&items(&[
            "accept_staff",
            "accept_home",
            "accept_local",
            "accept_peer",
        ])),
    );

    scores.insert("school_belong_score", r("school_belong"));

    scores.insert(
        "staff_relationship_score",
        sum_score(&items(&[
            "staff_interest",
            "staff_believe",
            "staff_best",
            "staff_listen",
        ])),
    );

    scores.insert(
        "home_relationship_score",
        sum_score(&items(&[
            "home_interest",
            "home_believe",
            "home_best",
            "home_listen",
        ])),
    );

    scores.insert("home_happy_score", r("home_happy"));

    // local_safe has four answers plus "don't know", stretched onto 1 to 5
    let local_safe = recode(
        r("local_safe"),
        &[
            (1.0, Some(1.0)),
            (2.0, Some(2.0 + 1.0 / 3.0)),
            (3.0, Some(3.0 + 2.0 / 3.0)),
            (4.0, Some(5.0)),
            (5.0, None),
        ],
    );
    let local_env = sum_score(&[
        local_safe,
        r("local_support"),
        r("local_trust"),
        r("local_neighbours"),
        r("local_places"),
    ]);
    scores.insert("local_env_score", reverse_score(local_env, 5.0, 25.0));

    scores.insert("discrim_score", discrim_score(pupil));

    scores.insert(
        "belong_local_score",
        reverse_score(r("belong_local"), 1.0, 4.0),
    );

    scores.insert(
        "wealth_score",
        recode(
            r("wealth"),
            &[(1.0, Some(0.0)), (2.0, Some(0.0)), (3.0, Some(1.0)), (4.0, None)],
        ),
    );

    let options = recode(
        r("future_options"),
        &[(1.0, Some(1.0)), (2.0, Some(2.5)), (3.0, Some(4.0)), (4.0, None)],
    );
    scores.insert(
        "future_score",
        sum_score(&[
            options,
            drop_code(r("future_interest"), 5.0),
            drop_code(r("future_support"), 5.0),
        ]),
    );

    scores.insert("climate_score", r("climate"));

    scores.insert(
        "social_score",
        sum_score(&items(&[
            "social_along",
            "social_time",
            "social_support",
            "social_hard",
        ])),
    );

    scores.insert(
        "bully_score",
        reverse_score(
            sum_score(&items(&["bully_physical", "bully_other", "bully_cyber"])),
            3.0,
            12.0,
        ),
    );

    scores
}

/// Talking-about-feelings score for one provider (staff, home or peer).
///
/// Pupils who talked to the provider score the mean of how listened to
/// they felt and how helpful it was (helpful stretched from 1-3 to 1-4).
/// Everyone else scores how comfortable they would feel talking.
fn talk_score(pupil: &Pupil, provider: &str) -> Value {
    let talked = pupil.response(&format!("{}_talk", provider)) == Some(1.0);
    if talked {
        let listen = pupil.response(&format!("{}_talk_listen", provider));
        let helpful = recode(
            pupil.response(&format!("{}_talk_helpful", provider)),
            &[(1.0, Some(1.0)), (2.0, Some(2.5)), (3.0, Some(4.0))],
        );
        sum_score(&[listen, helpful]).map(|total| total / 2.0)
    } else {
        pupil.response(&format!("{}_talk_if", provider))
    }
}

/// 1 if any discrimination item was answered "often or always", "some of
/// the time" or "occasionally", otherwise 2. Missing only if all five
/// items are missing.
fn discrim_score(pupil: &Pupil) -> Value {
    let answers: Vec<f64> = DISCRIM_ITEMS
        .iter()
        .filter_map(|q| pupil.response(q))
        .collect();
    if answers.is_empty() {
        return None;
    }
    if answers.iter().any(|a| (1.0..=3.0).contains(a) && a.fract() == 0.0) {
        Some(1.0)
    } else {
        Some(2.0)
    }
}

/// Fills in the scores of every pupil.
pub fn apply_scores(pupils: &mut [Pupil]) {
    for pupil in pupils.iter_mut() {
        pupil.scores = calculate_scores(pupil);
    }
    debug!("Calculated {} scores for {} pupils", SCORE_NAMES.len(), pupils.len());
}
