//! Page-related DTOs.

use super::{EmployeeResponse, PostResponse};
use chrono::{DateTime, Utc};
use insights_core::{Page, PageId};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// Page response DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageResponse {
    pub id: PageId,
    /// URL slug.
    pub page_id: String,
    pub linkedin_id: Option<String>,
    pub name: String,
    pub url: Option<String>,
    /// Mirrored copy when one exists, otherwise the source URL.
    pub profile_picture_url: Option<String>,
    pub description: Option<String>,
    pub tagline: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub headquarters: Option<String>,
    pub founded_year: Option<i32>,
    pub company_type: Option<String>,
    pub follower_count: i64,
    pub employee_count: i64,
    pub specialties: Option<Vec<String>>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub locations: Option<Vec<JsonValue>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_scraped_at: Option<DateTime<Utc>>,
}

impl From<Page> for PageResponse {
    fn from(page: Page) -> Self {
        Self {
            profile_picture_url: page.display_picture_url().map(str::to_string),
            id: page.id,
            page_id: page.page_id,
            linkedin_id: page.linkedin_id,
            name: page.name,
            url: page.url,
            description: page.description,
            tagline: page.tagline,
            website: page.website,
            industry: page.industry,
            company_size: page.company_size,
            headquarters: page.headquarters,
            founded_year: page.founded_year,
            company_type: page.company_type,
            follower_count: page.follower_count,
            employee_count: page.employee_count,
            specialties: page.specialties,
            locations: page.locations,
            created_at: page.created_at,
            updated_at: page.updated_at,
            last_scraped_at: page.last_scraped_at,
        }
    }
}

/// A page with its post count and newest posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageDetailResponse {
    #[serde(flatten)]
    pub page: PageResponse,
    pub posts_count: i64,
    pub recent_posts: Vec<PostResponse>,
}

/// Followers and followed accounts of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FollowersResponse {
    pub followers: Vec<EmployeeResponse>,
    pub following: Vec<EmployeeResponse>,
    pub total_followers: i64,
    pub total_following: i64,
    pub page: u32,
    pub page_size: u32,
}
