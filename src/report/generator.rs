//! Markdown report generation.
//!
//! This module generates the static results report for one school (or
//! area) from the analysis results.

use super::charts::{comparison_chart, response_chart, ComparisonChart, ResponseChart};
use crate::analysis::{classify, group_type_for, Breakdown};
use crate::labels::{demographic_group, question_text, topic_measures};
use crate::models::{
    Analysis, AnalysisMetadata, DemographicRow, Rag, ResponseDistribution, SchoolGroup,
    Subgroup, SurveyKind,
};
use crate::topics::{lower_first, Topic, EXCLUDED_FROM_SUMMARY, TOPICS};
use anyhow::{bail, Result};
use std::io::Write;
use std::path::Path;

/// What the Markdown report covers.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// School (or area) the report is for.
    pub site: String,
    pub breakdown: Breakdown,
    pub include_responses: bool,
    pub include_demographics: bool,
    /// Name of the wider area the sites belong to.
    pub region: String,
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(analysis: &Analysis, options: &ReportOptions) -> Result<String> {
    let meta = &analysis.metadata;
    let noun = meta.site_kind.noun();

    let Some(site_size) = analysis.site_size(&options.site) else {
        bail!(
            "No pupils found for {} '{}' (use --list-sites to see what is available)",
            noun,
            options.site
        );
    };

    let subgroups = options
        .breakdown
        .subgroups(group_type_for(meta.survey, meta.site_kind));
    if subgroups.is_empty() {
        bail!(
            "Breakdown '{}' is not available for the {} survey",
            options.breakdown,
            meta.survey
        );
    }

    let ctx = Context {
        analysis,
        options,
        subgroups: &subgroups,
        site_size,
    };
    let mut output = String::new();

    // Title
    output.push_str(&format!("# #BeeWell survey results: {}\n\n", options.site));

    output.push_str(&generate_metadata_section(meta, &ctx));
    output.push_str(&generate_table_of_contents(&ctx));

    match meta.survey {
        SurveyKind::Standard => {
            output.push_str(&generate_summary_section(&ctx));
            output.push_str(&generate_explore_section(&ctx));
        }
        SurveyKind::Symbol => {
            output.push_str(&generate_symbol_section(&ctx));
        }
    }

    if ctx.show_demographics() {
        output.push_str(&generate_demographic_section(&ctx));
    }

    output.push_str(&generate_caution_section(&ctx));
    output.push_str(&generate_footer());

    Ok(output)
}

/// Shared state for the report sections.
struct Context<'a> {
    analysis: &'a Analysis,
    options: &'a ReportOptions,
    subgroups: &'a [Subgroup],
    site_size: usize,
}

impl<'a> Context<'a> {
    fn noun(&self) -> &'static str {
        self.analysis.metadata.site_kind.noun()
    }

    fn plural(&self) -> &'static str {
        self.analysis.metadata.site_kind.plural()
    }

    fn min_count(&self) -> usize {
        self.analysis.metadata.min_count
    }

    fn show_demographics(&self) -> bool {
        self.options.include_demographics && !self.analysis.demographic.is_empty()
    }

    /// Topics with at least one score row.
    fn topics(&self) -> Vec<&'static Topic> {
        TOPICS
            .iter()
            .filter(|t| !EXCLUDED_FROM_SUMMARY.contains(&t.variable))
            .filter(|t| {
                self.analysis
                    .scores_rag
                    .iter()
                    .any(|r| r.score.variable == t.variable)
            })
            .collect()
    }

    fn response(&self, subgroup: &Subgroup, measure: &str) -> Option<&'a ResponseDistribution> {
        self.analysis
            .responses
            .iter()
            .find(|r| {
                r.site == self.options.site
                    && &r.subgroup == subgroup
                    && r.distribution.measure == measure
            })
            .map(|r| &r.distribution)
    }
}

/// Heading used for a subgroup column or block.
fn subgroup_heading(subgroup: &Subgroup) -> String {
    match subgroup {
        Subgroup::All => "All pupils".to_string(),
        other => other.to_string(),
    }
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &AnalysisMetadata, ctx: &Context) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Input:** `{}`\n", metadata.input));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Survey:** {}\n", metadata.survey));
    section.push_str(&format!(
        "- **Pupils at this {}:** {}\n",
        ctx.noun(),
        ctx.site_size
    ));
    section.push_str(&format!(
        "- **Pupils overall:** {} across {} {}\n",
        metadata.pupils,
        metadata.sites,
        ctx.plural()
    ));
    section.push_str(&format!("- **Results shown:** {}\n", ctx.options.breakdown));
    section.push_str(&format!(
        "- **Minimum responses shown:** {}\n",
        metadata.min_count
    ));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(ctx: &Context) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");

    match ctx.analysis.metadata.survey {
        SurveyKind::Standard => {
            toc.push_str(&format!(
                "- [Summary of your {}'s results](#summary-of-your-{}s-results)\n",
                ctx.noun(),
                ctx.noun()
            ));
            toc.push_str("- [Explore results](#explore-results)\n");
            for topic in ctx.topics() {
                let anchor = topic
                    .name
                    .to_lowercase()
                    .replace(' ', "-")
                    .replace('/', "");
                toc.push_str(&format!("  - [{}](#{})\n", topic.name, anchor));
            }
        }
        SurveyKind::Symbol => {
            toc.push_str("- [Responses](#responses)\n");
        }
    }

    if ctx.show_demographics() {
        toc.push_str("- [Who took part?](#who-took-part)\n");
    }
    toc.push_str("- [Comparing results](#comparing-results)\n");
    toc.push('\n');

    toc
}

/// Generate the summary section with the RAG table.
fn generate_summary_section(ctx: &Context) -> String {
    let mut section = String::new();
    let noun = ctx.noun();

    section.push_str(&format!("## Summary of your {}'s results\n\n", noun));
    section.push_str(&format!(
        "At your {}, a total of {} pupils took part in the #BeeWell survey. This section \
         shows how the answers of pupils at your {} compare with pupils from other {} in {}.\n\n",
        noun,
        ctx.site_size,
        noun,
        ctx.plural(),
        ctx.options.region
    ));

    // RAG legend
    section.push_str("| Result | Meaning |\n");
    section.push_str("|:---|:---|\n");
    for (rag, word) in [
        (Rag::Below, "worse than"),
        (Rag::Average, "similar to"),
        (Rag::Above, "better than"),
    ] {
        section.push_str(&format!(
            "| {} {} | Average scores for pupils at your {} are **{}** average scores for \
             pupils at other {}. |\n",
            rag.emoji(),
            rag.label(),
            noun,
            word,
            ctx.plural()
        ));
    }
    section.push_str(&format!(
        "| ⚪ n < {} | **Less than {}** pupils at your {} completed the questions for this \
         topic, so the results cannot be shown. |\n\n",
        ctx.min_count(),
        ctx.min_count(),
        noun
    ));

    section.push_str(&format!(
        "*Please note that although a total of {} pupils took part, the topic summaries below \
         are based only on responses from pupils who completed all the questions of a given \
         topic. The count of pupils who completed a topic is shown with each topic's results. \
         The response charts use data from all pupils who took part.*\n\n",
        ctx.site_size
    ));

    // Summary table
    let mut header = String::from("| Topic |");
    let mut divider = String::from("|:---|");
    for subgroup in ctx.subgroups {
        header.push_str(&format!(" {} |", subgroup_heading(subgroup)));
        divider.push_str(":---:|");
    }
    section.push_str(&header);
    section.push('\n');
    section.push_str(&divider);
    section.push('\n');

    for topic in ctx.topics() {
        let mut row = format!("| **{}**<br>{} |", topic.name, topic.description);
        for subgroup in ctx.subgroups {
            let rag = ctx
                .analysis
                .scores_rag
                .iter()
                .find(|r| {
                    r.score.site == ctx.options.site
                        && r.score.variable == topic.variable
                        && &r.score.subgroup == subgroup
                })
                .and_then(|r| r.rag);
            match rag {
                Some(rag) => row.push_str(&format!(" {} {} |", rag.emoji(), rag.label())),
                None => row.push_str(&format!(" n < {} |", ctx.min_count())),
            }
        }
        section.push_str(&row);
        section.push('\n');
    }
    section.push('\n');

    section
}

/// Generate the per-topic results section.
fn generate_explore_section(ctx: &Context) -> String {
    let mut section = String::new();

    section.push_str("## Explore results\n\n");

    for topic in ctx.topics() {
        section.push_str(&format!("### {}\n\n", topic.name));
        section.push_str(&format!("{}.\n\n", topic.description));

        if ctx.options.include_responses {
            section.push_str(&generate_topic_responses(ctx, topic));
        }
        section.push_str(&generate_comparison(ctx, topic));
    }

    section
}

/// Generate the response charts for the questions of one topic.
fn generate_topic_responses(ctx: &Context, topic: &Topic) -> String {
    let measures = topic_measures(topic.key());
    let mut section = String::new();

    section.push_str(&format!(
        "#### Responses from pupils at your {}\n\n",
        ctx.noun()
    ));
    section.push_str(&format!(
        "In this section, you can see how pupils at your {} responded to survey questions \
         that relate to the topic of '{}'.\n\n",
        ctx.noun(),
        lower_first(topic.name)
    ));

    for subgroup in ctx.subgroups {
        if *subgroup != Subgroup::All {
            section.push_str(&format!("**{}**\n\n", subgroup_heading(subgroup)));
        }

        let charts: Vec<ResponseChart> = measures
            .iter()
            .filter_map(|m| ctx.response(subgroup, m))
            .map(|d| response_chart(d, ctx.min_count()))
            .collect();
        if charts.is_empty() {
            section.push_str("*No responses were recorded for these questions.*\n\n");
            continue;
        }
        for chart in &charts {
            section.push_str(&render_response_chart(chart));
        }
    }

    section
}

/// Draw a response chart as a table of percentages.
fn render_response_chart(chart: &ResponseChart) -> String {
    let mut block = String::new();

    block.push_str(&format!("**{}**\n\n", chart.question));
    block.push_str("| Response | Percentage | |\n");
    block.push_str("|:---|---:|:---|\n");
    for bar in &chart.bars {
        match bar.percentage {
            Some(pct) => block.push_str(&format!(
                "| {} | {:.1}% | {} |\n",
                bar.label,
                pct,
                text_bar(pct)
            )),
            None => block.push_str(&format!("| {} | - | |\n", bar.label)),
        }
    }
    if let Some(n) = chart.n_responses {
        block.push_str(&format!("\n*Based on {} responses.*\n", n));
    }
    block.push('\n');

    block
}

/// Horizontal bar for a percentage, one block per 5%.
fn text_bar(percentage: f64) -> String {
    "█".repeat((percentage / 5.0).round().max(0.0) as usize)
}

/// Generate the comparison with other sites for one topic.
fn generate_comparison(ctx: &Context, topic: &Topic) -> String {
    let mut section = String::new();
    let noun = ctx.noun();
    let plural = ctx.plural();

    section.push_str(&format!("#### Comparison with other {}\n\n", plural));
    section.push_str(&format!(
        "In this section, an overall score for the topic of '{}' has been calculated for each \
         pupil with complete responses on this question. {} The mean score of the pupils at \
         your {} is compared with pupils who completed the same survey questions at other {}. \
         This allows you to see whether the typical score for pupils at your {} is average, \
         below average or above average.\n\n",
        topic.name.to_lowercase(),
        topic.interpretation(),
        noun,
        plural,
        noun
    ));

    for subgroup in ctx.subgroups {
        if *subgroup != Subgroup::All {
            section.push_str(&format!("**{}**\n\n", subgroup_heading(subgroup)));
        }

        let own = ctx.analysis.scores_rag.iter().find(|r| {
            r.score.site == ctx.options.site
                && r.score.variable == topic.variable
                && &r.score.subgroup == subgroup
        });

        let (Some(own), Some(chart)) = (
            own.filter(|r| r.score.mean.is_some()),
            comparison_chart(
                &ctx.analysis.scores_rag,
                topic.variable,
                subgroup,
                &ctx.options.site,
            ),
        ) else {
            section.push_str(&format!(
                "There were less than {} complete responses from these pupils at your {}, so \
                 the results are not shown.\n\n",
                ctx.min_count(),
                noun
            ));
            continue;
        };

        let (total, sites) = own
            .descriptives
            .map(|d| (d.total_pupils, d.group_n))
            .unwrap_or((0, 0));
        section.push_str(&format!(
            "Your {} had {} complete responses. Across {}, there were {} complete responses \
             from {} {}. The average score for the pupils at your {}, compared to other {} in \
             {}, was:\n\n",
            noun,
            own.score.count.unwrap_or(0),
            ctx.options.region,
            total,
            sites,
            plural,
            noun,
            plural,
            ctx.options.region
        ));
        if let Some(rag) = own.rag {
            section.push_str(&format!("> {} **{}**\n\n", rag.emoji(), rag.label()));
        }

        section.push_str(&render_comparison_chart(&chart, noun));
    }

    section
}

/// Draw the ordered site means as a table. Other sites are not named.
fn render_comparison_chart(chart: &ComparisonChart, noun: &str) -> String {
    let mut block = String::new();

    block.push_str(&format!("| | {} | Mean score | |\n", capitalise(noun)));
    block.push_str("|---:|:---|---:|:---|\n");
    for (rank, bar) in chart.bars.iter().enumerate() {
        let who = if bar.highlighted {
            format!("**Your {}**", noun)
        } else {
            format!("Other {}", noun)
        };
        let band = band_for(chart, bar.mean)
            .map(|rag| rag.emoji())
            .unwrap_or("");
        block.push_str(&format!(
            "| {} | {} | {:.2} | {} |\n",
            rank + 1,
            who,
            bar.mean,
            band
        ));
    }
    block.push('\n');

    if !chart.bands.is_empty() {
        let bands: Vec<String> = chart
            .bands
            .iter()
            .map(|b| format!("{} {:.2} to {:.2}", b.rag.label(), b.from, b.to))
            .collect();
        block.push_str(&format!(
            "*Ordered by mean score, on a scale from {:.2} to {:.2}. {}.*\n\n",
            chart.y_min,
            chart.y_max,
            bands.join("; ")
        ));
    }

    block
}

fn band_for(chart: &ComparisonChart, mean: f64) -> Option<Rag> {
    let lower = chart.bands.first()?.to;
    let upper = chart.bands.last()?.from;
    classify(mean, lower, upper)
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Generate the results section for the symbol survey.
fn generate_symbol_section(ctx: &Context) -> String {
    let mut section = String::new();

    section.push_str("## Responses\n\n");
    section.push_str(&format!(
        "In this section, you can see how pupils at your {} responded to each question of \
         the symbol survey.\n\n",
        ctx.noun()
    ));

    for subgroup in ctx.subgroups {
        if *subgroup != Subgroup::All {
            section.push_str(&format!("### {}\n\n", subgroup_heading(subgroup)));
        }
        let charts: Vec<ResponseChart> = ctx
            .analysis
            .responses
            .iter()
            .filter(|r| r.site == ctx.options.site && &r.subgroup == subgroup)
            .map(|r| response_chart(&r.distribution, ctx.min_count()))
            .collect();
        for chart in &charts {
            section.push_str(&render_response_chart(chart));
        }
    }

    section
}

/// Headings of the demographic groups, in display order.
fn demographic_headers(survey: SurveyKind) -> &'static [(&'static str, &'static str)] {
    match survey {
        SurveyKind::Standard => &[
            ("year_group", "Year group"),
            ("fsm", "Eligible for free school meals (FSM)"),
            ("gender", "Gender and transgender"),
            ("sexual_orientation", "Sexual orientation"),
            ("care_experience", "Care experience"),
            ("young_carer", "Young carers"),
            ("neuro", "Special educational needs and neurodivergence"),
            ("ethnicity", "Ethnicity"),
            ("english_additional", "English as an additional language"),
            ("birth", "Background"),
        ],
        SurveyKind::Symbol => &[
            ("gender", "Gender"),
            ("year_group", "Year group"),
            ("fsm", "Eligible for free school meals (FSM)"),
            ("ethnicity", "Ethnicity"),
            ("english_additional", "English as an additional language"),
        ],
    }
}

/// Generate the "who took part" section.
fn generate_demographic_section(ctx: &Context) -> String {
    let mut section = String::new();
    let site = ctx.options.site.as_str();

    section.push_str("## Who took part?\n\n");
    section.push_str(&format!(
        "There were {} pupils at your {} who took part in the #BeeWell survey. This section \
         describes the sample of pupils who completed the survey.\n\n",
        ctx.site_size,
        ctx.noun()
    ));

    let rows: Vec<&DemographicRow> = ctx
        .analysis
        .demographic
        .iter()
        .filter(|r| r.school == site)
        .collect();

    for (group, heading) in demographic_headers(ctx.analysis.metadata.survey) {
        let own: Vec<&DemographicRow> = rows
            .iter()
            .copied()
            .filter(|r| r.school_group == SchoolGroup::YourSchool)
            .filter(|r| demographic_group(&r.distribution.measure) == Some(*group))
            .collect();
        if own.is_empty() {
            continue;
        }

        section.push_str(&format!("### {}\n\n", heading));
        for row in own {
            let measure = row.distribution.measure.as_str();
            let other = rows.iter().copied().find(|r| {
                r.school_group == SchoolGroup::OtherSchools && r.distribution.measure == measure
            });
            section.push_str(&render_demographic_table(
                &row.distribution,
                other.map(|r| &r.distribution),
                ctx,
            ));
        }
    }

    section
}

/// Table comparing one demographic measure with all other schools.
fn render_demographic_table(
    own: &ResponseDistribution,
    other: Option<&ResponseDistribution>,
    ctx: &Context,
) -> String {
    let mut block = String::new();
    let question = question_text(&own.measure).unwrap_or(own.measure.as_str());

    block.push_str(&format!("**{}**\n\n", question));
    if own.is_suppressed() {
        block.push_str(&format!(
            "*There were less than {} responses to this question at your {}, so the results \
             are not shown.*\n\n",
            ctx.min_count(),
            ctx.noun()
        ));
        return block;
    }

    block.push_str(&format!(
        "| Response | {} | {} |\n",
        SchoolGroup::YourSchool,
        SchoolGroup::OtherSchools
    ));
    block.push_str("|:---|---:|---:|\n");
    for (i, category) in own.categories.iter().enumerate() {
        let other_pct = other.and_then(|o| o.categories.get(i)).and_then(|c| c.percentage);
        block.push_str(&format!(
            "| {} | {} | {} |\n",
            category.label,
            format_percentage(category.percentage),
            format_percentage(other_pct)
        ));
    }
    block.push_str(&format!(
        "\n*Responses with fewer than {} pupils are hidden.*\n\n",
        ctx.min_count()
    ));

    block
}

fn format_percentage(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{:.1}%", p),
        None => "-".to_string(),
    }
}

/// Generate the caution about comparing sites.
fn generate_caution_section(ctx: &Context) -> String {
    let mut section = String::new();
    let plural = ctx.plural();

    section.push_str("## Comparing results\n\n");
    section.push_str(&format!(
        "Always be mindful when making comparisons between different {}. There are a number \
         of factors that could explain differences in scores (whether you are above average, \
         average, or below average). These include:\n\n",
        plural
    ));
    section.push_str("- Random chance ('one-off' findings).\n");
    section.push_str(
        "- Differences in the socio-economic characteristics of pupils and the areas where \
         they live (e.g. income, education, ethnicity, access to services and amenities).\n",
    );
    section.push_str(&format!(
        "- The number of pupils taking part. {} that are much smaller are more likely to have \
         more \"extreme\" results (i.e. above or below average), whilst {} with a larger \
         number of pupils who took part are more likely to see average results.\n\n",
        capitalise(plural),
        plural
    ));
    section.push_str(
        "It's also worth noting that the score will only include results from pupils who \
         completed each of the questions used to calculate that topic, so does not include any \
         reflection of results from pupils who did not complete some or all of the questions \
         for that topic.\n\n",
    );

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by beewell v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Write report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// Generate a JSON report of the full analysis.
pub fn generate_json_report(analysis: &Analysis) -> Result<String> {
    serde_json::to_string_pretty(analysis).map_err(Into::into)
}
