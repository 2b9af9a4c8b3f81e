//! Repository trait definitions and write models.
//!
//! Reads return domain entities from `insights-core`. Writes take a `New*`
//! struct describing one upsert keyed on the row's external identifier.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use insights_core::{
    Comment, CommentId, Employee, InsightsResult, Interface, Page, PageId, PageRequest, Paginated,
    Post, PostId,
};
use serde_json::Value as JsonValue;

// ============================================================================
// Filters and aggregates
// ============================================================================

/// Filters for listing pages. Every field is optional and combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFilter {
    /// Case-insensitive partial match on the page name.
    pub name: Option<String>,
    /// Case-insensitive partial match on the industry.
    pub industry: Option<String>,
    pub min_followers: Option<i64>,
    pub max_followers: Option<i64>,
}

/// Filters for listing posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub page: Option<PageId>,
    /// Exact match on `content_type`.
    pub content_type: Option<String>,
    pub min_likes: Option<i64>,
}

/// Engagement aggregates over all posts of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PostStats {
    pub total_posts: i64,
    pub avg_likes: f64,
    pub avg_comments: f64,
    pub avg_shares: f64,
    pub total_likes: i64,
}

// ============================================================================
// Write models
// ============================================================================

/// Incoming page data for an upsert keyed on `page_id`.
///
/// On conflict only the `Some` fields overwrite stored values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPage {
    pub page_id: String,
    pub linkedin_id: Option<String>,
    pub name: String,
    pub url: Option<String>,
    pub profile_picture_url: Option<String>,
    pub profile_picture_s3_url: Option<String>,
    pub description: Option<String>,
    pub tagline: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub headquarters: Option<String>,
    pub founded_year: Option<i32>,
    pub company_type: Option<String>,
    pub follower_count: Option<i64>,
    pub employee_count: Option<i64>,
    pub specialties: Option<Vec<String>>,
    pub locations: Option<Vec<JsonValue>>,
    pub extra_data: Option<JsonValue>,
}

/// Incoming post data for an upsert keyed on `post_id`.
///
/// Engagement counters always take the incoming value; nullable columns keep
/// their stored value when the incoming one is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub post_id: String,
    pub page_id: PageId,
    pub text: Option<String>,
    pub content_type: Option<String>,
    pub media_url: Option<String>,
    pub media_s3_url: Option<String>,
    pub media_type: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub share_count: i64,
    pub view_count: i64,
    pub posted_at: Option<DateTime<Utc>>,
    pub author_name: Option<String>,
    pub author_title: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub mentions: Option<Vec<String>>,
    pub extra_data: Option<JsonValue>,
}

impl NewPost {
    /// Creates a post with zero counters and no content.
    #[must_use]
    pub fn new(post_id: impl Into<String>, page_id: PageId) -> Self {
        Self {
            post_id: post_id.into(),
            page_id,
            text: None,
            content_type: None,
            media_url: None,
            media_s3_url: None,
            media_type: None,
            like_count: 0,
            comment_count: 0,
            share_count: 0,
            view_count: 0,
            posted_at: None,
            author_name: None,
            author_title: None,
            hashtags: None,
            mentions: None,
            extra_data: None,
        }
    }
}

/// Incoming comment data for an upsert keyed on `comment_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub comment_id: String,
    pub post_id: PostId,
    pub parent_comment_id: Option<CommentId>,
    pub text: Option<String>,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub author_title: Option<String>,
    pub author_profile_url: Option<String>,
    pub author_profile_picture: Option<String>,
    pub like_count: i64,
    pub reply_count: i64,
    pub commented_at: Option<DateTime<Utc>>,
    pub extra_data: Option<JsonValue>,
}

impl NewComment {
    /// Creates a top-level comment with zero counters.
    #[must_use]
    pub fn new(comment_id: impl Into<String>, post_id: PostId) -> Self {
        Self {
            comment_id: comment_id.into(),
            post_id,
            parent_comment_id: None,
            text: None,
            author_id: None,
            author_name: None,
            author_title: None,
            author_profile_url: None,
            author_profile_picture: None,
            like_count: 0,
            reply_count: 0,
            commented_at: None,
            extra_data: None,
        }
    }
}

/// Incoming person data for an upsert keyed on `linkedin_id`.
///
/// Relationship flags are merged with OR so that a person synced once as an
/// employee and once as a follower keeps both flags.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub linkedin_id: String,
    pub page_id: PageId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub profile_url: Option<String>,
    pub profile_picture_url: Option<String>,
    pub profile_picture_s3_url: Option<String>,
    pub current_title: Option<String>,
    pub current_company: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub industry: Option<String>,
    pub connections_count: Option<i64>,
    pub is_following: bool,
    pub is_follower: bool,
    pub is_employee: bool,
    pub experience_summary: Option<JsonValue>,
    pub education_summary: Option<JsonValue>,
    pub skills: Option<Vec<String>>,
    pub extra_data: Option<JsonValue>,
}

impl NewEmployee {
    /// Creates an employee record with no profile data.
    #[must_use]
    pub fn new(linkedin_id: impl Into<String>, page_id: PageId) -> Self {
        Self {
            linkedin_id: linkedin_id.into(),
            page_id,
            first_name: None,
            last_name: None,
            full_name: None,
            headline: None,
            profile_url: None,
            profile_picture_url: None,
            profile_picture_s3_url: None,
            current_title: None,
            current_company: None,
            location: None,
            country: None,
            industry: None,
            connections_count: None,
            is_following: false,
            is_follower: false,
            is_employee: true,
            experience_summary: None,
            education_summary: None,
            skills: None,
            extra_data: None,
        }
    }
}

// ============================================================================
// Repositories
// ============================================================================

/// Page repository trait.
#[async_trait]
pub trait PageRepository: Interface + Send + Sync {
    /// Finds a page by its URL slug.
    async fn find_by_page_id(&self, page_id: &str) -> InsightsResult<Option<Page>>;

    /// Finds every page whose slug is in `page_ids`. Unknown slugs are skipped.
    async fn find_by_page_ids(&self, page_ids: &[String]) -> InsightsResult<Vec<Page>>;

    /// Lists pages matching `filter`, most followed first.
    async fn find_all(&self, filter: &PageFilter, page: PageRequest)
        -> InsightsResult<Paginated<Page>>;

    /// Inserts or updates a page and returns the stored row.
    async fn upsert(&self, page: &NewPage) -> InsightsResult<Page>;

    /// Deletes a page and, through cascades, all of its children.
    async fn delete(&self, page_id: &str) -> InsightsResult<bool>;
}

/// Post repository trait.
#[async_trait]
pub trait PostRepository: Interface + Send + Sync {
    /// Finds a post by its external id.
    async fn find_by_post_id(&self, post_id: &str) -> InsightsResult<Option<Post>>;

    /// Lists posts matching `filter`, newest first.
    async fn find_all(&self, filter: &PostFilter, page: PageRequest)
        -> InsightsResult<Paginated<Post>>;

    /// Lists posts of one page, newest first.
    async fn find_by_page(&self, page_id: PageId, page: PageRequest)
        -> InsightsResult<Paginated<Post>>;

    /// Returns the `limit` newest posts of a page.
    async fn find_recent(&self, page_id: PageId, limit: u32) -> InsightsResult<Vec<Post>>;

    /// Counts the posts of a page.
    async fn count_by_page(&self, page_id: PageId) -> InsightsResult<i64>;

    /// Computes engagement aggregates over all posts of a page.
    async fn stats_by_page(&self, page_id: PageId) -> InsightsResult<PostStats>;

    /// Inserts or updates a post and returns the stored row.
    async fn upsert(&self, post: &NewPost) -> InsightsResult<Post>;
}

/// Comment repository trait.
#[async_trait]
pub trait CommentRepository: Interface + Send + Sync {
    /// Lists comments of a post, newest first.
    async fn find_by_post(&self, post_id: PostId, page: PageRequest)
        -> InsightsResult<Paginated<Comment>>;

    /// Returns the `limit` newest comments of a post.
    async fn find_recent_by_post(&self, post_id: PostId, limit: u32)
        -> InsightsResult<Vec<Comment>>;

    /// Finds a comment by its external id.
    async fn find_by_comment_id(&self, comment_id: &str) -> InsightsResult<Option<Comment>>;

    /// Inserts or updates a comment and returns the stored row.
    async fn upsert(&self, comment: &NewComment) -> InsightsResult<Comment>;
}

/// Employee repository trait.
#[async_trait]
pub trait EmployeeRepository: Interface + Send + Sync {
    /// Lists everyone associated with a page.
    async fn find_by_page(&self, page_id: PageId, page: PageRequest)
        -> InsightsResult<Paginated<Employee>>;

    /// Returns up to `limit` people of a page.
    async fn find_limited_by_page(&self, page_id: PageId, limit: u32)
        -> InsightsResult<Vec<Employee>>;

    /// Lists people flagged as followers of the page.
    async fn find_followers(&self, page_id: PageId, page: PageRequest)
        -> InsightsResult<Vec<Employee>>;

    /// Lists people the page follows.
    async fn find_following(&self, page_id: PageId, page: PageRequest)
        -> InsightsResult<Vec<Employee>>;

    /// Counts everyone associated with a page.
    async fn count_by_page(&self, page_id: PageId) -> InsightsResult<i64>;

    /// Counts followers of a page.
    async fn count_followers(&self, page_id: PageId) -> InsightsResult<i64>;

    /// Counts people the page follows.
    async fn count_following(&self, page_id: PageId) -> InsightsResult<i64>;

    /// Inserts or updates a person and returns the stored row.
    async fn upsert(&self, employee: &NewEmployee) -> InsightsResult<Employee>;
}
