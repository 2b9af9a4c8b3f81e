//! Client for the external page-data API.
//!
//! [`PageSource`] is the seam the sync flow depends on. [`LinkedInClient`]
//! implements it over the LinkedIn REST API; tests substitute canned data.

mod linkedin_client;
mod parse;

pub use linkedin_client::{LinkedInClient, LinkedInClientParameters, DEFAULT_REQUESTS_PER_SECOND};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use insights_core::{InsightsResult, Interface};
use serde_json::Value as JsonValue;

/// Company page as reported by the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceOrganization {
    /// Numeric organization id.
    pub linkedin_id: String,
    /// URL slug.
    pub vanity_name: String,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub headquarters: Option<String>,
    pub founded_year: Option<i32>,
    pub company_type: Option<String>,
    pub specialties: Vec<String>,
    pub locations: Vec<JsonValue>,
    pub logo_url: Option<String>,
    pub follower_count: i64,
}

/// Post as reported by the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcePost {
    /// Post URN, e.g. `urn:li:ugcPost:123`.
    pub post_id: String,
    pub text: Option<String>,
    pub content_type: String,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub like_count: i64,
    pub comment_count: i64,
    pub share_count: i64,
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
}

/// Comment as reported by the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceComment {
    pub comment_id: String,
    /// External id of the comment this one replies to.
    pub parent_comment_id: Option<String>,
    pub text: Option<String>,
    /// Actor URN of the author.
    pub author_id: Option<String>,
    pub like_count: i64,
    pub commented_at: Option<DateTime<Utc>>,
}

/// Person as reported by the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceEmployee {
    pub linkedin_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub headline: Option<String>,
    pub profile_url: Option<String>,
    pub profile_picture_url: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
}

/// Read access to the external page-data API.
///
/// Only the organization lookup reports errors. The list fetches are best
/// effort: a failure is logged and reads as an empty list so one missing
/// permission does not abort a whole sync.
#[async_trait]
pub trait PageSource: Interface + Send + Sync {
    /// Looks up a page by its URL slug. `None` if the source does not know it.
    async fn fetch_organization(&self, vanity_name: &str)
        -> InsightsResult<Option<SourceOrganization>>;

    /// Newest posts authored by the organization.
    async fn fetch_posts(&self, org_id: &str, count: u32) -> Vec<SourcePost>;

    /// Comments on a post.
    async fn fetch_comments(&self, post_urn: &str, count: u32) -> Vec<SourceComment>;

    /// People whose current company is the organization.
    async fn fetch_employees(&self, org_id: &str, count: u32) -> Vec<SourceEmployee>;
}
