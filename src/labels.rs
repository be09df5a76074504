//! Response labels for each survey question.
//!
//! Maps the numeric codes stored in the survey data to the answer text
//! shown to pupils, and records which topic each question belongs to.

use crate::models::SurveyKind;
use std::collections::HashMap;

/// Label of the trailing category that counts missing answers.
pub const NO_RESPONSE: &str = "No response";

/// Columns of the standard survey that describe the pupil rather than
/// answer a topic question.
pub const STANDARD_DEMOGRAPHICS: &[&str] = &[
    "school",
    "gender",
    "transgender",
    "sexual_orientation",
    "neurodivergent",
    "birth_parent1",
    "birth_parent2",
    "birth_you",
    "birth_you_age",
    "young_carer",
    "care_experience",
    "year_group",
    "fsm",
    "sen",
    "ethnicity",
    "english_additional",
];

/// Demographic columns of the symbol survey.
pub const SYMBOL_DEMOGRAPHICS: &[&str] = &[
    "gender",
    "year_group",
    "fsm",
    "sen",
    "ethnicity",
    "english_additional",
    "school",
];

/// Ordered answer options per question.
#[derive(Debug, Clone, Default)]
pub struct ResponseLabels {
    scales: HashMap<String, Vec<(i64, String)>>,
}

impl ResponseLabels {
    /// Labels for the given survey.
    pub fn for_survey(kind: SurveyKind) -> Self {
        match kind {
            SurveyKind::Standard => Self::standard(),
            SurveyKind::Symbol => Self::symbol(),
        }
    }

    /// Ordered `(code, label)` pairs for a question.
    pub fn categories(&self, question: &str) -> Option<&[(i64, String)]> {
        self.scales.get(question).map(Vec::as_slice)
    }

    /// Whether the question has labels.
    pub fn contains(&self, question: &str) -> bool {
        self.scales.contains_key(question)
    }

    /// Label for a code, if the code is known.
    pub fn label(&self, question: &str, code: i64) -> Option<&str> {
        self.categories(question)?
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| label.as_str())
    }

    /// Label for a raw numeric value. Non-integral values never match.
    pub fn label_value(&self, question: &str, value: f64) -> Option<&str> {
        if value.fract() != 0.0 {
            return None;
        }
        self.label(question, value as i64)
    }

    fn insert(&mut self, question: &str, options: &[(i64, &str)]) {
        self.scales.insert(
            question.to_string(),
            options
                .iter()
                .map(|(code, label)| (*code, label.to_string()))
                .collect(),
        );
    }

    /// Gives every question in `questions` the options of `scale`.
    fn share(&mut self, questions: &[&str], scale: &str) {
        let Some(options) = self.scales.get(scale).cloned() else {
            return;
        };
        for question in questions {
            self.scales.insert(question.to_string(), options.clone());
        }
    }

    /// Labels for the standard #BeeWell survey.
    pub fn standard() -> Self {
        let mut labels = Self::default();

        labels.insert("year_group", &[(8, "Year 8"), (10, "Year 10")]);
        labels.insert("fsm", &[(0, "Non-FSM"), (1, "FSM")]);
        labels.insert("sen", &[(0, "Non-SEN"), (1, "SEN")]);
        labels.insert("ethnicity", &[(1, "Ethnic minority"), (2, "White British")]);
        labels.insert("english_additional", &[(0, "No"), (1, "Yes")]);
        labels.insert(
            "school",
            &[
                (1, "School A"),
                (2, "School B"),
                (3, "School C"),
                (4, "School D"),
                (5, "School E"),
                (6, "School F"),
                (7, "School G"),
            ],
        );
        labels.insert(
            "gender",
            &[
                (1, "Girl"),
                (2, "Boy"),
                (3, "Non-binary"),
                (4, "I describe myself in another way"),
                (5, "Currently unsure"),
                (6, "Prefer not to say"),
            ],
        );
        labels.insert(
            "transgender",
            &[
                (1, "Yes"),
                (2, "No"),
                (3, "Prefer not to say"),
                (4, "I describe myself in another way"),
                (5, "Not sure"),
            ],
        );
        labels.insert(
            "sexual_orientation",
            &[
                (1, "Bi/pansexual"),
                (2, "Gay/lesbian"),
                (3, "Heterosexual/straight"),
                (4, "I describe myself in another way"),
                (5, "Currently unsure"),
                (6, "Prefer not to say"),
            ],
        );
        labels.insert("neurodivergent", &[(1, "Yes"), (2, "No"), (3, "Unsure")]);
        labels.insert("birth", &[(1, "Yes"), (2, "No"), (3, "I don't know")]);
        labels.insert(
            "birth_you_age",
            &[
                (1, "Under 1 year old"),
                (2, "1 year old"),
                (3, "2 years old"),
                (4, "3 years old"),
                (5, "4 years old"),
                (6, "5 years old"),
                (7, "6 years old"),
                (8, "7 years old"),
                (9, "8 years old"),
                (10, "9 years old"),
                (11, "10 years old"),
                (12, "11 years old"),
                (13, "12 years old"),
                (14, "13 years old"),
                (15, "14 years old"),
                (16, "15 years old"),
            ],
        );
        labels.insert(
            "autonomy",
            &[
                (1, "1 - Completely not true"),
                (2, "2"),
                (3, "3"),
                (4, "4"),
                (5, "5 - Completely true"),
            ],
        );
        labels.insert(
            "life_satisfaction",
            &[
                (0, "0 - not at all"),
                (1, "1"),
                (2, "2"),
                (3, "3"),
                (4, "4"),
                (5, "5"),
                (6, "6"),
                (7, "7"),
                (8, "8"),
                (9, "9"),
                (10, "10 - completely"),
            ],
        );
        labels.insert(
            "optimism_future",
            &[
                (1, "Almost never"),
                (2, "Sometimes"),
                (3, "Often"),
                (4, "Very often"),
                (5, "Always"),
            ],
        );
        labels.insert(
            "optimism_other",
            &[
                (1, "Not at all like me"),
                (2, "A little like me"),
                (3, "Somewhat like me"),
                (4, "Mostly like me"),
                (5, "Very much like me"),
            ],
        );
        labels.insert(
            "wellbeing",
            &[
                (1, "None of the time"),
                (2, "Rarely"),
                (3, "Some of the time"),
                (4, "Often"),
                (5, "All of the time"),
            ],
        );
        labels.insert(
            "esteem",
            &[
                (1, "Strongly agree"),
                (2, "Agree"),
                (3, "Disagree"),
                (4, "Strongly disagree"),
            ],
        );
        labels.insert(
            "stress",
            &[
                (1, "Never"),
                (2, "Almost Never"),
                (3, "Sometimes"),
                (4, "Fairly Often"),
                (5, "Very Often"),
            ],
        );
        labels.insert(
            "appearance_happy",
            &[
                (0, "0 - Very unhappy"),
                (1, "1"),
                (2, "2"),
                (3, "3"),
                (4, "4"),
                (5, "5 - Not happy or unhappy"),
                (6, "6"),
                (7, "7"),
                (8, "8"),
                (9, "9"),
                (10, "10 - Very happy"),
                (11, "Prefer not to say"),
            ],
        );
        labels.insert(
            "appearance_feel",
            &[
                (1, "Strongly agree"),
                (2, "Agree"),
                (3, "Disagree"),
                (4, "Strongly disagree"),
                (5, "Prefer not to say"),
            ],
        );
        labels.insert("negative", &[(1, "Never"), (2, "Sometimes"), (3, "Always")]);
        labels.insert(
            "lonely",
            &[
                (1, "Often or always"),
                (2, "Some of the time"),
                (3, "Occasionally"),
                (4, "Hardly ever"),
                (5, "Never"),
            ],
        );
        labels.insert(
            "support",
            &[
                (1, "Strongly agree"),
                (2, "Agree"),
                (3, "Disagree"),
                (4, "Strongly disagree"),
            ],
        );
        labels.insert(
            "physical_days",
            &[
                (0, "0 days"),
                (1, "1 day"),
                (2, "2 days"),
                (3, "3 days"),
                (4, "4 days"),
                (5, "5 days"),
                (6, "6 days"),
                (7, "7 days"),
            ],
        );
        labels.insert(
            "physical_hours",
            &[
                (30, "Around 30 minutes"),
                (60, "Around 1 hour"),
                (90, "Around 1.5 hours"),
                (120, "Around 2 hours or more"),
            ],
        );
        labels.insert(
            "free_like",
            &[
                (1, "Almost always"),
                (2, "Often"),
                (3, "Sometimes"),
                (4, "Not often"),
                (5, "Almost never"),
            ],
        );
        // Simplified from the survey wording (e.g. "1 to less than 2 hours")
        labels.insert(
            "media_hours",
            &[
                (1, "None"),
                (2, "Less than 1 hour"),
                (3, "1 to 2 hours"),
                (4, "2 to 3 hours"),
                (5, "3 to 4 hours"),
                (6, "4 to 5 hours"),
                (7, "5 to 6 hours"),
                (8, "6 to 7 hours"),
                (9, "7 hours or more"),
            ],
        );
        labels.insert("sleep", &[(0, "No"), (1, "Yes")]);
        labels.insert(
            "places_freq",
            &[(1, "None"), (2, "Limited"), (3, "Several"), (4, "Lots")],
        );
        labels.insert("places_barriers", &[(0, "No"), (1, "Yes")]);
        labels.insert(
            "school_belong",
            &[
                (1, "Not at all"),
                (2, "A little"),
                (3, "Somewhat"),
                (4, "Quite a bit"),
                (5, "A lot"),
            ],
        );
        labels.insert(
            "relationships",
            &[
                (1, "1 - Never"),
                (2, "2"),
                (3, "3"),
                (4, "4"),
                (5, "5 - Always"),
            ],
        );
        labels.insert("talk", &[(0, "No"), (1, "Yes")]);
        labels.insert(
            "talk_listen",
            &[
                (1, "Not at all"),
                (2, "Slightly"),
                (3, "Mostly"),
                (4, "Fully"),
            ],
        );
        labels.insert(
            "talk_helpful",
            &[
                (1, "Not helpful"),
                (2, "Somewhat helpful"),
                (3, "Very helpful"),
            ],
        );
        labels.insert(
            "talk_if",
            &[
                (1, "Very uncomfortable"),
                (2, "Uncomfortable"),
                (3, "Comfortable"),
                (4, "Very comfortable"),
            ],
        );
        labels.insert(
            "accept",
            &[
                (1, "Not at all"),
                (2, "Slightly"),
                (3, "Mostly"),
                (4, "Fully"),
            ],
        );
        labels.insert(
            "home_happy",
            &[
                (0, "0 - Very unhappy"),
                (1, "1"),
                (2, "2"),
                (3, "3"),
                (4, "4"),
                (5, "5 - Not happy or unhappy"),
                (6, "6"),
                (7, "7"),
                (8, "8"),
                (9, "9"),
                (10, "10 - Very happy"),
            ],
        );
        labels.insert("care_experience", &[(1, "Yes"), (0, "No"), (2, "Unsure")]);
        labels.insert("young_carer", &[(0, "No"), (1, "Yes")]);
        labels.insert(
            "local_safe",
            &[
                (1, "Very safe"),
                (2, "Fairly safe"),
                (3, "Fairly unsafe"),
                (4, "Very unsafe"),
                (5, "Don't know"),
            ],
        );
        labels.insert(
            "local_other",
            &[
                (1, "Strongly agree"),
                (2, "Agree"),
                (3, "Neither agree nor disagree"),
                (4, "Disagree"),
                (5, "Strongly disagree"),
            ],
        );
        labels.insert(
            "discrim",
            &[
                (1, "Often or always"),
                (2, "Some of the time"),
                (3, "Occasionally"),
                (4, "Hardly ever"),
                (5, "Never"),
            ],
        );
        labels.insert(
            "belong_local",
            &[
                (1, "Strongly agree"),
                (2, "Agree"),
                (3, "Disagree"),
                (4, "Strongly disagree"),
            ],
        );
        labels.insert(
            "wealth",
            &[
                (1, "Richer"),
                (2, "Poorer"),
                (3, "About the same"),
                (4, "Don't know"),
            ],
        );
        labels.insert(
            "future_options",
            &[(1, "Not many"), (2, "Quite a few"), (3, "A lot"), (4, "Unsure")],
        );
        labels.insert(
            "future_interest",
            &[
                (1, "Not interested"),
                (2, "A little interested"),
                (3, "Quite interested"),
                (4, "Very interested"),
                (5, "Unsure"),
            ],
        );
        labels.insert(
            "future_support",
            &[
                (1, "Not at all"),
                (2, "Slightly"),
                (3, "Mostly"),
                (4, "Fully"),
                (5, "Unsure"),
            ],
        );
        labels.insert(
            "climate",
            &[(1, "Often"), (2, "Sometimes"), (3, "Rarely"), (4, "Never")],
        );
        labels.insert(
            "social",
            &[
                (1, "Not at all"),
                (2, "A little"),
                (3, "Somewhat"),
                (4, "Quite a bit"),
                (5, "A lot"),
            ],
        );
        labels.insert(
            "bully",
            &[
                (1, "Not at all"),
                (2, "1-3 times in last 6 months"),
                (3, "4+ times in last 6 months"),
                (4, "A few times a week"),
            ],
        );

        labels.share(&["birth_parent1", "birth_parent2", "birth_you"], "birth");
        labels.share(
            &[
                "autonomy_pressure",
                "autonomy_express",
                "autonomy_decide",
                "autonomy_told",
                "autonomy_myself",
                "autonomy_choice",
            ],
            "autonomy",
        );
        labels.share(
            &["optimism_best", "optimism_good", "optimism_work"],
            "optimism_other",
        );
        labels.share(
            &[
                "wellbeing_optimistic",
                "wellbeing_useful",
                "wellbeing_relaxed",
                "wellbeing_problems",
                "wellbeing_thinking",
                "wellbeing_close",
                "wellbeing_mind",
            ],
            "wellbeing",
        );
        labels.share(
            &[
                "esteem_satisfied",
                "esteem_qualities",
                "esteem_well",
                "esteem_value",
                "esteem_good",
            ],
            "esteem",
        );
        labels.share(
            &[
                "stress_control",
                "stress_overcome",
                "stress_confident",
                "stress_way",
            ],
            "stress",
        );
        labels.share(
            &[
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
            ],
            "negative",
        );
        labels.share(&["support_ways", "support_look"], "support");
        labels.share(
            &[
                "places_barriers___1",
                "places_barriers___2",
                "places_barriers___3",
                "places_barriers___4",
                "places_barriers___5",
                "places_barriers___6",
                "places_barriers___7",
                "places_barriers___8",
                "places_barriers___9",
            ],
            "places_barriers",
        );
        labels.share(
            &[
                "staff_interest",
                "staff_believe",
                "staff_best",
                "staff_listen",
                "home_interest",
                "home_believe",
                "home_best",
                "home_listen",
            ],
            "relationships",
        );
        labels.share(&["staff_talk", "home_talk", "peer_talk"], "talk");
        labels.share(
            &["staff_talk_listen", "home_talk_listen", "peer_talk_listen"],
            "talk_listen",
        );
        labels.share(
            &["staff_talk_helpful", "home_talk_helpful", "peer_talk_helpful"],
            "talk_helpful",
        );
        labels.share(
            &["staff_talk_if", "home_talk_if", "peer_talk_if"],
            "talk_if",
        );
        labels.share(
            &["accept_staff", "accept_home", "accept_local", "accept_peer"],
            "accept",
        );
        labels.share(
            &[
                "local_support",
                "local_trust",
                "local_neighbours",
                "local_places",
            ],
            "local_other",
        );
        labels.share(
            &[
                "discrim_race",
                "discrim_gender",
                "discrim_orientation",
                "discrim_disability",
                "discrim_faith",
            ],
            "discrim",
        );
        labels.share(
            &["social_along", "social_time", "social_support", "social_hard"],
            "social",
        );
        labels.share(&["bully_physical", "bully_other", "bully_cyber"], "bully");

        labels
    }

    /// Labels for the symbol #BeeWell survey.
    pub fn symbol() -> Self {
        let mut labels = Self::default();

        labels.insert("symbol", &[(1, "Happy"), (2, "Ok"), (3, "Sad")]);
        labels.insert("gender", &[(0, "Boy"), (1, "Girl")]);
        labels.insert(
            "year_group",
            &[
                (7, "Year 7"),
                (8, "Year 8"),
                (9, "Year 9"),
                (10, "Year 10"),
                (11, "Year 11"),
            ],
        );
        labels.insert("fsm", &[(0, "Non-FSM"), (1, "FSM")]);
        labels.insert("sen", &[(0, "Non-SEN"), (1, "SEN")]);
        labels.insert("ethnicity", &[(1, "Ethnic minority"), (2, "White British")]);
        labels.insert("english_additional", &[(0, "No"), (1, "Yes")]);
        labels.insert("school", &[(1, "School A"), (2, "School B")]);

        labels.share(
            &[
                "symbol_family",
                "symbol_home",
                "symbol_friends",
                "symbol_choice",
                "symbol_things",
                "symbol_health",
                "symbol_future",
                "symbol_school",
                "symbol_free",
                "symbol_life",
            ],
            "symbol",
        );

        labels
    }
}

/// Demographic columns for a survey.
pub fn demographic_columns(kind: SurveyKind) -> &'static [&'static str] {
    match kind {
        SurveyKind::Standard => STANDARD_DEMOGRAPHICS,
        SurveyKind::Symbol => SYMBOL_DEMOGRAPHICS,
    }
}

/// Demographic measures shown on the "who took part" section, in order.
pub fn demographic_measures(kind: SurveyKind) -> &'static [&'static str] {
    match kind {
        SurveyKind::Standard => &[
            "year_group",
            "fsm",
            "ethnicity",
            "english_additional",
            "gender",
            "transgender",
            "care_experience",
            "young_carer",
            "sen",
            "neurodivergent",
            "birth_parent1",
            "birth_parent2",
            "birth_you",
            "birth_you_age",
            "sexual_orientation",
        ],
        SurveyKind::Symbol => &[
            "year_group",
            "gender",
            "fsm",
            "sen",
            "ethnicity",
            "english_additional",
        ],
    }
}

const TOPIC_GROUPS: &[(&str, &[&str])] = &[
    (
        "autonomy",
        &[
            "autonomy_pressure",
            "autonomy_express",
            "autonomy_decide",
            "autonomy_told",
            "autonomy_myself",
            "autonomy_choice",
        ],
    ),
    ("life_satisfaction", &["life_satisfaction"]),
    (
        "optimism",
        &[
            "optimism_future",
            "optimism_best",
            "optimism_good",
            "optimism_work",
        ],
    ),
    (
        "wellbeing",
        &[
            "wellbeing_optimistic",
            "wellbeing_useful",
            "wellbeing_relaxed",
            "wellbeing_problems",
            "wellbeing_thinking",
            "wellbeing_close",
            "wellbeing_mind",
        ],
    ),
    (
        "esteem",
        &[
            "esteem_satisfied",
            "esteem_qualities",
            "esteem_well",
            "esteem_value",
            "esteem_good",
        ],
    ),
    (
        "stress",
        &[
            "stress_control",
            "stress_overcome",
            "stress_confident",
            "stress_way",
        ],
    ),
    ("appearance", &["appearance_happy", "appearance_feel"]),
    (
        "negative",
        &[
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
        ],
    ),
    ("lonely", &["lonely"]),
    ("support", &["support_ways", "support_look"]),
    ("sleep", &["sleep"]),
    ("physical", &["physical_days", "physical_hours"]),
    ("free_like", &["free_like"]),
    ("media", &["media_hours"]),
    (
        "places",
        &[
            "places_freq",
            "places_barriers___1",
            "places_barriers___2",
            "places_barriers___3",
            "places_barriers___4",
            "places_barriers___5",
            "places_barriers___6",
            "places_barriers___7",
            "places_barriers___8",
            "places_barriers___9",
        ],
    ),
    (
        "talk",
        &[
            "staff_talk",
            "staff_talk_listen",
            "staff_talk_helpful",
            "staff_talk_if",
            "home_talk",
            "home_talk_listen",
            "home_talk_helpful",
            "home_talk_if",
            "peer_talk",
            "peer_talk_listen",
            "peer_talk_helpful",
            "peer_talk_if",
        ],
    ),
    (
        "accept",
        &["accept_staff", "accept_home", "accept_local", "accept_peer"],
    ),
    ("school_belong", &["school_belong"]),
    (
        "staff_relationship",
        &["staff_interest", "staff_believe", "staff_best", "staff_listen"],
    ),
    (
        "home_relationship",
        &["home_interest", "home_believe", "home_best", "home_listen"],
    ),
    ("home_happy", &["home_happy"]),
    (
        "local_env",
        &[
            "local_safe",
            "local_support",
            "local_trust",
            "local_neighbours",
            "local_places",
        ],
    ),
    (
        "discrim",
        &[
            "discrim_race",
            "discrim_gender",
            "discrim_orientation",
            "discrim_disability",
            "discrim_faith",
        ],
    ),
    ("belong_local", &["belong_local"]),
    ("wealth", &["wealth"]),
    (
        "future",
        &["future_options", "future_interest", "future_support"],
    ),
    ("climate", &["climate"]),
    (
        "social",
        &["social_along", "social_time", "social_support", "social_hard"],
    ),
    ("bully", &["bully_physical", "bully_other", "bully_cyber"]),
];

/// Questions belonging to a topic, in survey order.
pub fn topic_measures(topic: &str) -> &'static [&'static str] {
    TOPIC_GROUPS
        .iter()
        .find(|(t, _)| *t == topic)
        .map(|(_, measures)| *measures)
        .unwrap_or(&[])
}

/// Chart group of a demographic measure (e.g. `transgender` -> `gender`).
pub fn demographic_group(measure: &str) -> Option<&'static str> {
    let group = match measure {
        "year_group" => "year_group",
        "fsm" => "fsm",
        "ethnicity" => "ethnicity",
        "english_additional" => "english_additional",
        "gender" | "transgender" => "gender",
        "care_experience" => "care_experience",
        "young_carer" => "young_carer",
        "sen" | "neurodivergent" => "neuro",
        "birth_parent1" | "birth_parent2" | "birth_you" | "birth_you_age" => "birth",
        "sexual_orientation" => "sexual_orientation",
        _ => return None,
    };
    Some(group)
}

/// Question wording shown alongside a measure's results.
pub fn question_text(measure: &str) -> Option<&'static str> {
    let text = match measure {
        "autonomy_pressure" => "I feel pressured in my life",
        "autonomy_express" => "I generally feel free to express my ideas and opinions",
        "autonomy_decide" => "I feel like I am free to decide for myself how to live my life",
        "autonomy_told" => "In my daily life I often have to do what I am told",
        "autonomy_myself" => "I feel I can pretty much be myself in daily situations",
        "autonomy_choice" => "I have enough choice about how I spend my time",
        "life_satisfaction" => "Overall, how satisfied are you with your life nowadays?",
        "optimism_future" => "I am optimistic about my future",
        "optimism_best" => "In uncertain times, I expect the best",
        "optimism_good" => "I think good things are going to happen to me",
        "optimism_work" => "I believe that things will work out, no matter how difficult they seem",
        "wellbeing_optimistic" => "I've been feeling optimistic about the future",
        "wellbeing_useful" => "I've been feeling useful",
        "wellbeing_relaxed" => "I've been feeling relaxed",
        "wellbeing_problems" => "I've been dealing with problems well",
        "wellbeing_thinking" => "I've been thinking clearly",
        "wellbeing_close" => "I've been feeling close to other people",
        "wellbeing_mind" => "I've been able to make up my own mind about things",
        "esteem_satisfied" => "On the whole, I am satisfied with myself",
        "esteem_qualities" => "I feel that I have a number of good qualities",
        "esteem_well" => "I am able to do things as well as most other people",
        "esteem_value" => "I am a person of value",
        "esteem_good" => "I feel good about myself",
        "stress_control" => "Felt you were unable to control the important things in your life",
        "stress_overcome" => {
            "Felt that difficulties were piling up so high that you could not overcome them"
        }
        "stress_confident" => "Felt confident about your ability to handle your personal problems",
        "stress_way" => "Felt that things were going your way",
        "appearance_happy" => "How happy are you with your appearance (the way that you look)?",
        "appearance_feel" => "My appearance affects how I feel about myself",
        "negative_lonely" => "I feel lonely",
        "negative_unhappy" => "I am unhappy",
        "negative_like" => "Nobody likes me",
        "negative_cry" => "I cry a lot",
        "negative_school" => "I worry when I am at school",
        "negative_worry" => "I worry a lot",
        "negative_sleep" => "I have problems sleeping",
        "negative_wake" => "I wake up in the night",
        "negative_shy" => "I am shy",
        "negative_scared" => "I feel scared",
        "lonely" => "How often do you feel lonely?",
        "support_ways" => {
            "I have ways to support myself (e.g. to cope, or help myself feel better)"
        }
        "support_look" => "I know where to look for advice on how to support myself",
        "sleep" => {
            "Is the amount of sleep you normally get enough for you to feel awake and \
             concentrate on your school work during the day?"
        }
        "physical_days" => "How many days in a usual week are you physically active?",
        "physical_hours" => "How long on average do you spend being physically active?",
        "free_like" => "How often can you do things that you like in your free time?",
        "media_hours" => {
            "On a normal weekday during term time, how much time do you spend on social media?"
        }
        "places_freq" => {
            "How many activities/places are there in your local area, that you choose to or \
             would want to go to in your free time?"
        }
        "places_barriers___1" => "There's nothing to do",
        "places_barriers___2" => "I'm unable to get there and back",
        "places_barriers___3" => "It's too expensive (to get there or take part)",
        "places_barriers___4" => "Poor weather",
        "places_barriers___5" => "I have no-one to go with",
        "places_barriers___6" => "It's too busy",
        "places_barriers___7" => {
            "I feel uncomfortable/anxious about other people who might be there"
        }
        "places_barriers___8" => "My parents/carers don't allow me to go",
        "places_barriers___9" => "Other",
        "school_belong" => "I feel that I belong/belonged at my school",
        "staff_interest" => "At school there is an adult who... is interested in my schoolwork",
        "staff_believe" => "At school there is an adult who... believes that I will be a success",
        "staff_best" => "At school there is an adult who... wants me to do my best",
        "staff_listen" => {
            "At school there is an adult who... listens to me when I have something to say"
        }
        "staff_talk" => "Talked about feeling down with... an adult at school",
        "staff_talk_listen" => "Did you feel listened to when you spoke with... an adult at school",
        "staff_talk_helpful" => {
            "Did you receive advice that you found helpful from... an adult at school"
        }
        "staff_talk_if" => "How would you feel about speaking with... an adult at school",
        "accept_staff" => "Adults at your school",
        "home_interest" => "At home there is an adult who... is interested in my schoolwork",
        "home_believe" => "At home there is an adult who... believes that I will be a success",
        "home_best" => "At home there is an adult who... wants me to do my best",
        "home_listen" => {
            "At home there is an adult who... listens to me when I have something to say"
        }
        "home_talk" => "Talked about feeling down with... one of your parents/carers",
        "home_talk_listen" => {
            "Did you feel listened to when you spoke with... one of your parents/carers"
        }
        "home_talk_helpful" => {
            "Did you receive advice that you found helpful from... one of your parents/carers"
        }
        "home_talk_if" => "How would you feel about speaking with... one of your parents/carers",
        "accept_home" => "Your parents/carers",
        "home_happy" => "How happy are you with the home that you live in?",
        "local_safe" => "How safe do you feel when in your local area?",
        "local_support" => "People around here support each other with their wellbeing",
        "local_trust" => "You can trust people around here",
        "local_neighbours" => "I could ask for help or a favour from neighbours",
        "local_places" => {
            "There are good places to spend your free time (e.g., leisure centres, parks, shops)"
        }
        "discrim_race" => {
            "How often do people make you feel bad because of... your race, skin colour or \
             where you were born?"
        }
        "discrim_gender" => "How often do people make you feel bad because of... your gender?",
        "discrim_orientation" => {
            "How often do people make you feel bad because of... your sexual orientation?"
        }
        "discrim_disability" => "How often do people make you feel bad because of... disability?",
        "discrim_faith" => {
            "How often do people make you feel bad because of... your religion/faith?"
        }
        "belong_local" => "I feel like I belong in my local area",
        "accept_local" => "People in your local area",
        "wealth" => "Compared to your friends, is your family richer, poorer or about the same?",
        "future_options" => "How many options are available?",
        "future_interest" => "How do you feel about the options available?",
        "future_support" => {
            "Do you feel (or think you would feel) supported to explore options that interest \
             you, even if no-one else around you has done them before?"
        }
        "climate" => "How often do you worry about the impact of climate change on your future?",
        "social_along" => "I get along with people around me",
        "social_time" => "People like to spend time with me",
        "social_support" => "I feel supported by my friends",
        "social_hard" => {
            "My friends care about me when times are hard (for example if I am sick or have \
             done something wrong)"
        }
        "bully_physical" => {
            "How often do you get physically bullied at school? By this we mean getting hit, \
             pushed around, threatened, or having belongings stolen."
        }
        "bully_other" => {
            "How often do you get bullied in other ways at school? By this we mean insults, \
             slurs, name calling, threats, getting left out or excluded by others, or having \
             rumours spread about you on purpose."
        }
        "bully_cyber" => {
            "How often do you get cyber-bullied? By this we mean someone sending mean text or \
             online messages about you, creating a website making fun of you, posting pictures \
             that make you look bad online, or sharing them with others."
        }
        "peer_talk" => "Talked about feeling down with... another person your age",
        "peer_talk_listen" => {
            "Did you feel listened to when you spoke with... another person your age"
        }
        "peer_talk_helpful" => {
            "Did you receive advice that you found helpful from... another person your age"
        }
        "peer_talk_if" => "How would you feel about speaking with... another person your age",
        "accept_peer" => "Other people your age",

        "symbol_family" => "How do you feel about your family?",
        "symbol_home" => "How do you feel about your home?",
        "symbol_friends" => "How do you feel about your friends?",
        "symbol_choice" => "How do you feel about how much choice you have in life?",
        "symbol_things" => "How do you feel about the things that you have?",
        "symbol_health" => "How do you feel about your health?",
        "symbol_future" => "How do you feel about your future?",
        "symbol_school" => "How do you feel about your school?",
        "symbol_free" => "How do you feel about your free time?",
        "symbol_life" => "How do you feel about your life?",

        "gender" => "Gender",
        "transgender" => "Do you consider yourself to be transgender?",
        "sexual_orientation" => "Sexual orientation",
        "neurodivergent" => "Do you identify as neurodivergent?",
        "young_carer" => {
            "In the last year, have you regularly taken on caring responsibilities for a \
             family member - e.g. due to illness, disability, mental health condition or \
             drug/alcohol dependency?"
        }
        "care_experience" => {
            "Are you or have you ever been in care (living in a foster placement, residential \
             placement, or private/kinship care)?"
        }
        "birth_parent1" => "Was birth parent 1 born outside the UK?",
        "birth_parent2" => "Was birth parent 2 born outside the UK?",
        "birth_you" => "Were you born outside the UK?",
        "birth_you_age" => "How old were you when you came to the UK?",
        "year_group" => "Year group",
        "fsm" => "Free school meals",
        "sen" => "Special educational needs",
        "ethnicity" => "Ethnicity",
        "english_additional" => "English as an additional language",
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_scales() {
        let labels = ResponseLabels::standard();
        assert_eq!(
            labels.label("autonomy_told", 5),
            Some("5 - Completely true")
        );
        assert_eq!(labels.label("peer_talk_helpful", 3), Some("Very helpful"));
        assert_eq!(labels.label("places_barriers___9", 1), Some("Yes"));
        assert_eq!(labels.label("bully_cyber", 5), None);
    }

    #[test]
    fn test_category_order_is_preserved() {
        let labels = ResponseLabels::standard();
        let codes: Vec<i64> = labels
            .categories("care_experience")
            .unwrap()
            .iter()
            .map(|(code, _)| *code)
            .collect();
        assert_eq!(codes, vec![1, 0, 2]);
    }

    #[test]
    fn test_label_value_rejects_fractions() {
        let labels = ResponseLabels::standard();
        assert_eq!(labels.label_value("fsm", 1.0), Some("FSM"));
        assert_eq!(labels.label_value("fsm", 0.5), None);
    }

    #[test]
    fn test_symbol_labels() {
        let labels = ResponseLabels::symbol();
        assert_eq!(labels.label("symbol_life", 1), Some("Happy"));
        assert_eq!(labels.label("year_group", 11), Some("Year 11"));
        assert!(!labels.contains("autonomy_told"));
    }

    #[test]
    fn test_topic_measures() {
        assert!(topic_measures("stress").contains(&"stress_way"));
        assert!(topic_measures("talk").contains(&"peer_talk_if"));
        assert!(topic_measures("unknown").is_empty());
        assert_eq!(topic_measures("future").len(), 3);
    }

    #[test]
    fn test_demographic_group() {
        assert_eq!(demographic_group("transgender"), Some("gender"));
        assert_eq!(demographic_group("neurodivergent"), Some("neuro"));
        assert_eq!(demographic_group("birth_you_age"), Some("birth"));
        assert_eq!(demographic_group("lonely"), None);
    }

    #[test]
    fn test_every_labelled_response_has_question_text() {
        let labels = ResponseLabels::standard();
        for (_, measures) in TOPIC_GROUPS {
            for measure in *measures {
                assert!(labels.contains(measure), "no labels for {}", measure);
                assert!(question_text(measure).is_some(), "no text for {}", measure);
            }
        }
    }
}
