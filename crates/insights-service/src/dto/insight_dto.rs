//! AI summary, quick summary and comparison DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// One observation about a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageInsight {
    pub category: String,
    pub insight: String,
    /// 0.0 to 1.0.
    pub confidence: f64,
}

/// Audience figures of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FollowerAnalysis {
    pub total_count: i64,
    pub growth_trend: Option<String>,
    pub top_industries: Vec<String>,
    pub top_locations: Vec<String>,
    pub engagement_rate: Option<f64>,
}

/// Publishing figures of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContentAnalysis {
    pub total_posts: usize,
    pub avg_likes: f64,
    pub avg_comments: f64,
    pub avg_shares: f64,
    pub top_performing_topics: Vec<String>,
    pub posting_frequency: Option<String>,
    pub best_posting_times: Vec<String>,
}

/// Generated summary of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AiSummaryResponse {
    pub page_id: String,
    pub page_name: String,
    pub summary: String,
    pub page_type: String,
    pub industry_classification: String,
    pub key_insights: Vec<PageInsight>,
    pub follower_analysis: FollowerAnalysis,
    pub content_analysis: ContentAnalysis,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Headline numbers of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct KeyStats {
    pub follower_count: i64,
    pub employee_count: i64,
    pub total_posts: i64,
    /// Sum of likes over every post.
    pub total_engagement: i64,
    pub avg_likes_per_post: f64,
    pub avg_comments_per_post: f64,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub headquarters: Option<String>,
}

/// Statistics-only summary of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuickSummaryResponse {
    pub page_id: String,
    pub summary: String,
    pub key_stats: KeyStats,
    pub generated_at: DateTime<Utc>,
}

/// Side-by-side analysis of several pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompareResponse {
    /// Names of the pages that were found, in request order.
    pub pages_compared: Vec<String>,
    /// Free-form analysis as returned by the model.
    #[schema(value_type = Object)]
    pub analysis: JsonValue,
    pub generated_at: DateTime<Utc>,
}
