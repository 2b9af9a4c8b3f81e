//! OpenAPI documentation configuration.

use crate::controllers::health_controller::{ComponentHealth, HealthResponse, RootResponse};
use insights_core::{CommentId, EmployeeId, ErrorResponse, FieldError, PageId, PostId};
use insights_service::{
    AiSummaryResponse, CommentResponse, CompareResponse, ContentAnalysis, EmployeeResponse,
    FollowerAnalysis, FollowersResponse, KeyStats, PageDetailResponse, PageInsight, PageResponse,
    PostDetailResponse, PostResponse, QuickSummaryResponse, RecentPostsResponse,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the LinkedIn Insights API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LinkedIn Insights API",
        version = "1.0.0",
        description = "Company page insights: stored pages, posts, comments and people, synced from LinkedIn, with AI summaries"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Pages
        crate::controllers::page_controller::list_pages,
        crate::controllers::page_controller::get_page,
        crate::controllers::page_controller::refresh_page,
        crate::controllers::page_controller::page_posts,
        crate::controllers::page_controller::page_followers,
        crate::controllers::page_controller::page_employees,
        // Posts
        crate::controllers::post_controller::list_posts,
        crate::controllers::post_controller::get_post,
        crate::controllers::post_controller::list_comments,
        crate::controllers::post_controller::recent_posts,
        // AI
        crate::controllers::ai_controller::generate_summary,
        crate::controllers::ai_controller::quick_summary,
        crate::controllers::ai_controller::compare_pages,
        // Health
        crate::controllers::health_controller::root,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
        crate::controllers::health_controller::metrics,
    ),
    components(
        schemas(
            // Core types
            PageId,
            PostId,
            CommentId,
            EmployeeId,
            ErrorResponse,
            FieldError,
            // Page DTOs
            PageResponse,
            PageDetailResponse,
            FollowersResponse,
            EmployeeResponse,
            // Post DTOs
            PostResponse,
            PostDetailResponse,
            CommentResponse,
            RecentPostsResponse,
            // AI DTOs
            AiSummaryResponse,
            PageInsight,
            FollowerAnalysis,
            ContentAnalysis,
            QuickSummaryResponse,
            KeyStats,
            CompareResponse,
            // Health
            RootResponse,
            HealthResponse,
            ComponentHealth,
        )
    ),
    tags(
        (name = "pages", description = "Company pages"),
        (name = "posts", description = "Posts and comments"),
        (name = "ai", description = "AI summaries and comparisons"),
        (name = "health", description = "Health, readiness and metrics")
    )
)]
pub struct ApiDoc;
