//! Context, prompts and response shaping for page summaries.

use crate::dto::{AiSummaryResponse, ContentAnalysis, FollowerAnalysis, PageInsight};
use chrono::Utc;
use insights_core::{Employee, Page, Post};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::collections::{BTreeMap, HashMap};

/// System message for single-page summaries.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert LinkedIn analytics consultant. \
Analyze the provided company page data and generate insightful, actionable business intelligence. \
Focus on:
1. Company positioning and brand identity
2. Content strategy effectiveness
3. Audience engagement patterns
4. Industry benchmarking
5. Growth opportunities

Provide your analysis in a structured JSON format.";

/// System message for page comparisons.
pub const COMPARE_SYSTEM_PROMPT: &str =
    "You are a LinkedIn analytics expert. Compare company pages objectively.";

/// Recommendations returned when the model could not be asked.
pub const DEFAULT_RECOMMENDATIONS: [&str; 3] = [
    "Consider posting more regularly to increase engagement",
    "Engage with your audience by responding to comments",
    "Share industry insights to establish thought leadership",
];

const SAMPLE_TEXT_CHARS: usize = 200;
const TOP_HASHTAGS: usize = 10;
const TOP_VALUES: usize = 5;
const SAMPLE_POSTS: usize = 5;

const RESPONSE_SHAPE: &str = r#"{
    "summary": "A 2-3 sentence executive summary of the company's LinkedIn presence",
    "page_type": "The type of company (startup/enterprise/agency/etc)",
    "industry_classification": "Refined industry classification",
    "key_insights": [
        {"category": "Branding", "insight": "...", "confidence": 0.9},
        {"category": "Content", "insight": "...", "confidence": 0.85},
        {"category": "Engagement", "insight": "...", "confidence": 0.8}
    ],
    "follower_analysis": {
        "growth_trend": "growing/stable/declining",
        "engagement_rate": 0.05,
        "top_industries": ["tech", "finance"],
        "top_locations": ["USA", "India"]
    },
    "content_analysis": {
        "posting_frequency": "daily/weekly/monthly",
        "best_performing_topics": ["innovation", "culture"],
        "best_posting_times": ["Tuesday 10am", "Thursday 2pm"],
        "content_mix_recommendation": "..."
    },
    "recommendations": [
        "Specific actionable recommendation 1",
        "Specific actionable recommendation 2",
        "Specific actionable recommendation 3"
    ]
}"#;

/// Page facts handed to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageFacts {
    pub name: String,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub follower_count: i64,
    pub employee_count: i64,
    pub company_size: Option<String>,
    pub specialties: Vec<String>,
    pub headquarters: Option<String>,
    pub founded_year: Option<i32>,
    pub company_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplePost {
    pub text: String,
    /// Likes of the post.
    pub engagement: i64,
}

/// Aggregates over the analysed posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentContext {
    pub total_posts_analyzed: usize,
    /// Likes, comments and shares summed.
    pub total_engagement: i64,
    pub avg_likes: f64,
    pub avg_comments: f64,
    pub avg_shares: f64,
    pub content_types: BTreeMap<String, usize>,
    pub top_hashtags: Vec<String>,
    pub sample_posts: Vec<SamplePost>,
}

/// Aggregates over the analysed people.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeContext {
    pub total_analyzed: usize,
    pub top_titles: Vec<String>,
    pub locations: Vec<String>,
    pub industries: Vec<String>,
}

/// Everything the summary prompt is built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryContext {
    pub page: PageFacts,
    pub content: Option<ContentContext>,
    pub employees: Option<EmployeeContext>,
}

/// Most frequent values, ties broken by first appearance.
fn top_values<'a>(values: impl IntoIterator<Item = &'a str>, limit: usize) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for value in values.into_iter().filter(|v| !v.is_empty()) {
        if let Some(&i) = index.get(value) {
            counts[i].1 += 1;
        } else {
            index.insert(value, counts.len());
            counts.push((value, 1));
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(v, _)| v.to_string())
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn average(total: i64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

impl ContentContext {
    fn from_posts(posts: &[Post]) -> Option<Self> {
        if posts.is_empty() {
            return None;
        }
        let likes: i64 = posts.iter().map(|p| p.like_count).sum();
        let comments: i64 = posts.iter().map(|p| p.comment_count).sum();
        let shares: i64 = posts.iter().map(|p| p.share_count).sum();

        let mut content_types = BTreeMap::new();
        for post in posts {
            let kind = post.content_type.clone().unwrap_or_else(|| "text".to_string());
            *content_types.entry(kind).or_insert(0) += 1;
        }

        let mut by_likes: Vec<&Post> = posts.iter().collect();
        by_likes.sort_by(|a, b| b.like_count.cmp(&a.like_count));
        let sample_posts = by_likes
            .into_iter()
            .take(SAMPLE_POSTS)
            .map(|p| SamplePost {
                text: p
                    .text
                    .as_deref()
                    .unwrap_or("")
                    .chars()
                    .take(SAMPLE_TEXT_CHARS)
                    .collect(),
                engagement: p.like_count,
            })
            .collect();

        Some(Self {
            total_posts_analyzed: posts.len(),
            total_engagement: likes + comments + shares,
            avg_likes: average(likes, posts.len()),
            avg_comments: average(comments, posts.len()),
            avg_shares: average(shares, posts.len()),
            content_types,
            top_hashtags: top_values(
                posts
                    .iter()
                    .flat_map(|p| p.hashtags.iter().flatten())
                    .map(String::as_str),
                TOP_HASHTAGS,
            ),
            sample_posts,
        })
    }
}

impl EmployeeContext {
    fn from_employees(employees: &[Employee]) -> Option<Self> {
        if employees.is_empty() {
            return None;
        }
        Some(Self {
            total_analyzed: employees.len(),
            top_titles: top_values(
                employees.iter().filter_map(|e| e.current_title.as_deref()),
                TOP_VALUES,
            ),
            locations: top_values(employees.iter().filter_map(|e| e.location.as_deref()), TOP_VALUES),
            industries: top_values(employees.iter().filter_map(|e| e.industry.as_deref()), TOP_VALUES),
        })
    }
}

impl SummaryContext {
    /// Aggregates a page and its (possibly empty) posts and people.
    #[must_use]
    pub fn build(page: &Page, posts: &[Post], employees: &[Employee]) -> Self {
        Self {
            page: PageFacts {
                name: page.name.clone(),
                industry: page.industry.clone(),
                description: page.description.clone(),
                follower_count: page.follower_count,
                employee_count: page.employee_count,
                company_size: page.company_size.clone(),
                specialties: page.specialties.clone().unwrap_or_default(),
                headquarters: page.headquarters.clone(),
                founded_year: page.founded_year,
                company_type: page.company_type.clone(),
            },
            content: ContentContext::from_posts(posts),
            employees: EmployeeContext::from_employees(employees),
        }
    }

    /// User message asking for the summary in [`RESPONSE_SHAPE`].
    #[must_use]
    pub fn prompt(&self) -> String {
        let pretty = |value: JsonValue| serde_json::to_string_pretty(&value).unwrap_or_default();
        let content = self.content.as_ref().map_or_else(|| json!({}), |c| json!(c));
        let employees = self.employees.as_ref().map_or_else(|| json!({}), |e| json!(e));

        format!(
            "Analyze this LinkedIn company page data and provide insights:\n\n\
             Company Information:\n{}\n\n\
             Content Performance (if available):\n{}\n\n\
             Employee/Follower Data (if available):\n{}\n\n\
             Please provide your analysis in the following JSON structure:\n{}",
            pretty(json!(self.page)),
            pretty(content),
            pretty(employees),
            RESPONSE_SHAPE
        )
    }

    fn content_analysis(&self) -> ContentAnalysis {
        self.content
            .as_ref()
            .map(|c| ContentAnalysis {
                total_posts: c.total_posts_analyzed,
                avg_likes: c.avg_likes,
                avg_comments: c.avg_comments,
                avg_shares: c.avg_shares,
                ..Default::default()
            })
            .unwrap_or_default()
    }
}

fn text_at(value: &JsonValue, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(JsonValue::as_str)
        .map(str::to_string)
}

fn strings_at(value: &JsonValue, pointer: &str) -> Vec<String> {
    value
        .pointer(pointer)
        .and_then(JsonValue::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(JsonValue::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Shapes the model's answer. Missing fields fall back to page data or
/// neutral defaults.
#[must_use]
pub fn summary_from_analysis(
    page: &Page,
    context: &SummaryContext,
    analysis: &JsonValue,
) -> AiSummaryResponse {
    let key_insights = analysis
        .get("key_insights")
        .and_then(JsonValue::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value::<PageInsight>(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    AiSummaryResponse {
        page_id: page.page_id.clone(),
        page_name: page.name.clone(),
        summary: text_at(analysis, "/summary").unwrap_or_default(),
        page_type: text_at(analysis, "/page_type").unwrap_or_else(|| "unknown".to_string()),
        industry_classification: text_at(analysis, "/industry_classification")
            .or_else(|| page.industry.clone())
            .unwrap_or_default(),
        key_insights,
        follower_analysis: FollowerAnalysis {
            total_count: page.follower_count,
            growth_trend: text_at(analysis, "/follower_analysis/growth_trend"),
            top_industries: strings_at(analysis, "/follower_analysis/top_industries"),
            top_locations: strings_at(analysis, "/follower_analysis/top_locations"),
            engagement_rate: analysis
                .pointer("/follower_analysis/engagement_rate")
                .and_then(JsonValue::as_f64),
        },
        content_analysis: ContentAnalysis {
            top_performing_topics: strings_at(analysis, "/content_analysis/best_performing_topics"),
            posting_frequency: text_at(analysis, "/content_analysis/posting_frequency"),
            best_posting_times: strings_at(analysis, "/content_analysis/best_posting_times"),
            ..context.content_analysis()
        },
        recommendations: strings_at(analysis, "/recommendations"),
        generated_at: Utc::now(),
    }
}

/// Summary built from stored data alone.
#[must_use]
pub fn fallback_summary(page: &Page, context: &SummaryContext) -> AiSummaryResponse {
    AiSummaryResponse {
        page_id: page.page_id.clone(),
        page_name: page.name.clone(),
        summary: format!(
            "{} is a {} with {} followers on LinkedIn.",
            page.name,
            page.industry_or_default(),
            format_thousands(page.follower_count)
        ),
        page_type: "company".to_string(),
        industry_classification: page.industry.clone().unwrap_or_default(),
        key_insights: Vec::new(),
        follower_analysis: FollowerAnalysis {
            total_count: page.follower_count,
            ..Default::default()
        },
        content_analysis: context.content_analysis(),
        recommendations: DEFAULT_RECOMMENDATIONS.iter().map(|r| (*r).to_string()).collect(),
        generated_at: Utc::now(),
    }
}

/// User message for a page comparison.
#[must_use]
pub fn compare_prompt(pages: &[Page]) -> String {
    let entries: Vec<JsonValue> = pages
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "industry": p.industry,
                "followers": p.follower_count,
                "employees": p.employee_count,
                "description": p.description.as_deref().unwrap_or("")
                    .chars().take(SAMPLE_TEXT_CHARS).collect::<String>(),
            })
        })
        .collect();

    format!(
        "Compare these LinkedIn company pages and provide insights:\n\n\
         Pages:\n{}\n\n\
         Provide comparison in JSON format with:\n\
         - winner_by_followers\n\
         - winner_by_engagement\n\
         - key_differences: list of notable differences\n\
         - similarities: list of common traits\n\
         - recommendations: specific advice for each company\n",
        serde_json::to_string_pretty(&entries).unwrap_or_default()
    )
}

/// Analysis returned when the comparison call fails.
#[must_use]
pub fn compare_fallback(pages: &[Page]) -> JsonValue {
    let leader = pages
        .iter()
        .fold(None::<&Page>, |best, p| match best {
            Some(b) if b.follower_count >= p.follower_count => Some(b),
            _ => Some(p),
        })
        .map(|p| p.name.clone());

    json!({
        "error": "Could not generate comparison",
        "basic_comparison": { "by_followers": leader },
    })
}

/// Formats an integer with `,` thousands separators.
#[must_use]
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
