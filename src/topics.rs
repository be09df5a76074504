//! Names and descriptions of the survey topics.

/// Display information for one topic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topic {
    /// Score variable, e.g. `autonomy_score`.
    pub variable: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Possible range of the score, e.g. "6 to 20".
    pub range: &'static str,
    /// What a higher score means.
    pub higher_means: &'static str,
}

impl Topic {
    /// Topic key without the `_score` suffix (e.g. `autonomy`).
    pub fn key(&self) -> &'static str {
        self.variable
            .strip_suffix("_score")
            .unwrap_or(self.variable)
    }

    /// Sentence used to help interpret the score.
    pub fn interpretation(&self) -> String {
        format!(
            "Scores range from {}, and higher scores indicate {}.",
            self.range, self.higher_means
        )
    }
}

/// Topics in the order they appear in the survey and report.
pub const TOPICS: &[Topic] = &[
    Topic {
        variable: "autonomy_score",
        name: "Autonomy",
        description: "How 'in control' young people feel of their life",
        range: "6 to 30",
        higher_means: "higher levels of autonomy",
    },
    Topic {
        variable: "life_satisfaction_score",
        name: "Life satisfaction",
        description: "How satisfied young people feel with their life",
        range: "0 to 10",
        higher_means: "higher levels of life satisfaction",
    },
    Topic {
        variable: "optimism_score",
        name: "Optimism",
        description: "Young people's hopefulness and confidence for the future",
        range: "4 to 20",
        higher_means: "higher levels of optimism",
    },
    Topic {
        variable: "wellbeing_score",
        name: "Psychological wellbeing",
        description: "How positive and generally happy young people feel regarding their life",
        range: "7 to 35",
        higher_means: "higher levels of psychological wellbeing",
    },
    Topic {
        variable: "esteem_score",
        name: "Self-esteem",
        description: "How much young people value themselves",
        range: "5 to 20",
        higher_means: "higher levels of self-esteem",
    },
    Topic {
        variable: "stress_score",
        name: "Stress and coping",
        description: "Managing stress levels and coping with difficulties",
        range: "0 to 16",
        higher_means: "that pupils are feeling lower levels of stress, and better able to \
                       cope with stress",
    },
    Topic {
        variable: "appearance_score",
        name: "Feelings around appearance",
        description: "Young people's feelings around the way that they look",
        range: "0 to 10",
        higher_means: "pupils feel happier about their appearance",
    },
    Topic {
        variable: "negative_score",
        name: "Negative affect",
        description: "The frequency with which young people experience emotional difficulties",
        range: "0 to 20",
        higher_means: "less negative affect",
    },
    Topic {
        variable: "lonely_score",
        name: "Loneliness",
        description: "How often young people feel lonely",
        range: "1 to 5",
        higher_means: "lower levels of loneliness",
    },
    Topic {
        variable: "support_score",
        name: "Supporting own wellbeing",
        description: "Young people's knowledge on supporting themselves and looking for advice",
        range: "2 to 8",
        higher_means: "pupils feel more able to support themselves when feeling down",
    },
    Topic {
        variable: "sleep_score",
        name: "Sleep",
        description: "How much sleep young people get",
        range: "0 to 1",
        higher_means: "pupils feel they get enough sleep",
    },
    Topic {
        variable: "physical_score",
        name: "Physical activity",
        description: "How physically active young people are",
        range: "0 to 840",
        higher_means: "higher levels of physical activity",
    },
    Topic {
        variable: "free_like_score",
        name: "Free time",
        description: "How often young people can do things that they like in their free time",
        range: "1 to 5",
        higher_means: "pupils feel that they are more often able to do things that they like \
                       in their free time",
    },
    Topic {
        variable: "media_score",
        name: "Social media use",
        description: "How much time young people spend on social media",
        range: "0 to 8",
        higher_means: "less time spent on social media",
    },
    Topic {
        variable: "places_score",
        name: "Places to go and things to do",
        description: "Whether young people feel there are places to go and things to do in \
                      their free time",
        range: "1 to 4",
        higher_means: "pupils feel there are activities/places in their local area that they \
                       would choose to or want to go to",
    },
    Topic {
        variable: "talk_score",
        name: "Talking about feelings",
        description: "How positively/negatively young people feel about talking with others \
                      about feeling down",
        range: "3 to 12",
        higher_means: "pupils feel more positively about talking with others when feeling down",
    },
    Topic {
        variable: "accept_score",
        name: "Acceptance",
        description: "Whether young people feel accepted by different groups of people in \
                      their life",
        range: "4 to 16",
        higher_means: "higher levels of perceived acceptance by others",
    },
    Topic {
        variable: "school_belong_score",
        name: "School connection",
        description: "Feelings of belonging at school",
        range: "1 to 5",
        higher_means: "higher levels of school connection",
    },
    Topic {
        variable: "staff_relationship_score",
        name: "Support from staff",
        description: "The support received from adults at school",
        range: "4 to 20",
        higher_means: "higher levels of perceived support from staff",
    },
    Topic {
        variable: "home_relationship_score",
        name: "Support from parents/carers",
        description: "The support received from adults at home",
        range: "4 to 20",
        higher_means: "higher levels of perceived support at home",
    },
    Topic {
        variable: "home_happy_score",
        name: "Home environment",
        description: "Young people's feelings regarding the home that they live in",
        range: "0 to 10",
        higher_means: "higher levels of happiness with the home environment",
    },
    Topic {
        variable: "local_env_score",
        name: "Local environment",
        description: "How young people feel regarding the area where they live",
        range: "5 to 25",
        higher_means: "pupils feel more positively about their local area",
    },
    Topic {
        variable: "discrim_score",
        name: "Discrimination",
        description: "Whether young people feel discriminated against",
        range: "1 to 2",
        higher_means: "fewer experiences of discrimination",
    },
    Topic {
        variable: "belong_local_score",
        name: "Local connection",
        description: "Young people's feelings of belonging in their local area",
        range: "1 to 4",
        higher_means: "greater feelings of belonging in the local area",
    },
    Topic {
        variable: "wealth_score",
        name: "Relative wealth",
        description: "Whether young people feel their family is richer, poorer or the same \
                      as their friends",
        range: "0 to 1",
        higher_means: "pupils feel their family has similar wealth as their friends (as \
                       opposed to feeling they are richer or poorer)",
    },
    Topic {
        variable: "future_score",
        name: "Future opportunities",
        description: "How young people feel regarding the future options for work, education \
                      or training in their local area",
        range: "3 to 12",
        higher_means: "pupils feel more positively about future work, education and/or \
                       training opportunities in their local area",
    },
    Topic {
        variable: "climate_score",
        name: "Climate change",
        description: "Worries regarding climate change",
        range: "1 to 4",
        higher_means: "lower levels of worrying about the impact of climate change on their \
                       future",
    },
    Topic {
        variable: "social_score",
        name: "Support from friends",
        description: "The support young people receive from their peers",
        range: "4 to 20",
        higher_means: "higher levels of perceived social support",
    },
    Topic {
        variable: "bully_score",
        name: "Bullying",
        description: "The frequency with which young people experience different types of \
                      bullying",
        range: "3 to 12",
        higher_means: "there to be less bullying",
    },
];

/// Variables that are aggregated but never shown as a topic.
pub const EXCLUDED_FROM_SUMMARY: &[&str] = &[
    "staff_talk_score",
    "home_talk_score",
    "peer_talk_score",
    "birth_you_age_score",
    "overall_count",
];

/// Lower-cases the first letter unless the whole string is upper case
/// (so "FSM" stays as it is but "Year 8" becomes "year 8").
pub fn lower_first(s: &str) -> String {
    let has_cased = s.chars().any(|c| c.is_alphabetic());
    if has_cased && !s.chars().any(|c| c.is_lowercase()) {
        return s.to_string();
    }

    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(variable: &str) -> Option<&'static Topic> {
        TOPICS.iter().find(|t| t.variable == variable)
    }

    #[test]
    fn test_topic_lookup() {
        let t = topic("bully_score").unwrap();
        assert_eq!(t.name, "Bullying");
        assert_eq!(t.key(), "bully");
        assert!(topic("staff_talk_score").is_none());
    }

    #[test]
    fn test_interpretation() {
        let t = topic("sleep_score").unwrap();
        assert_eq!(
            t.interpretation(),
            "Scores range from 0 to 1, and higher scores indicate pupils feel they get \
             enough sleep."
        );
    }

    #[test]
    fn test_topics_are_unique() {
        let mut variables: Vec<&str> = TOPICS.iter().map(|t| t.variable).collect();
        variables.sort_unstable();
        variables.dedup();
        assert_eq!(variables.len(), TOPICS.len());
    }

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("Year 8"), "year 8");
        assert_eq!(lower_first("FSM"), "FSM");
        assert_eq!(lower_first("Non-FSM"), "non-FSM");
        assert_eq!(lower_first(""), "");
    }
}
