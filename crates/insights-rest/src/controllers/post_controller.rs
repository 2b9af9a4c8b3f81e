//! Post controller.

use crate::{
    extractors::{default_page, page_request, PageSlug, ValidatedQuery},
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use insights_core::Paginated;
use insights_service::{CommentResponse, PostDetailResponse, PostQuery, PostResponse, RecentPostsResponse};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;
use validator::Validate;

/// Comments per page when the client does not ask for a size.
const COMMENTS_PAGE_SIZE: u32 = 20;

/// Creates the post router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts))
        .route("/recent/:page_id", get(recent_posts))
        .route("/:post_id", get(get_post))
        .route("/:post_id/comments", get(list_comments))
}

/// Filters and paging for the post list.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostListQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[validate(range(min = 1, max = 50, message = "page_size must be between 1 and 50"))]
    pub page_size: Option<u32>,
    /// Slug of the page the posts belong to.
    pub page_id: Option<String>,
    pub content_type: Option<String>,
    #[validate(range(min = 0, message = "min_likes must not be negative"))]
    pub min_likes: Option<i64>,
}

/// Options for the post detail.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostDetailQuery {
    #[serde(default = "include_comments_default")]
    pub include_comments: bool,
}

const fn include_comments_default() -> bool {
    true
}

/// Paging for comments.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CommentsQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: Option<u32>,
}

/// How many recent posts to return.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentPostsQuery {
    #[serde(default = "recent_limit_default")]
    #[validate(range(min = 1, max = 25, message = "limit must be between 1 and 25"))]
    pub limit: u32,
}

const fn recent_limit_default() -> u32 {
    15
}

/// List posts across pages, newest first.
#[utoipa::path(
    get,
    path = "/posts",
    tag = "posts",
    params(PostListQuery),
    responses(
        (status = 200, description = "Posts matching the filters", body = Paginated<PostResponse>),
        (status = 422, description = "Invalid query parameters")
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PostListQuery>,
) -> ApiResult<Paginated<PostResponse>> {
    debug!("List posts request: {:?}", query);

    let request = page_request(query.page, query.page_size, &state.pagination);
    let filter = PostQuery {
        page_id: query.page_id,
        content_type: query.content_type,
        min_likes: query.min_likes,
    };

    let response = state.post_service.list_posts(filter, request).await?;
    ok(response)
}

/// Get a post with its newest comments.
#[utoipa::path(
    get,
    path = "/posts/{post_id}",
    tag = "posts",
    params(("post_id" = String, Path, description = "LinkedIn post id"), PostDetailQuery),
    responses(
        (status = 200, description = "Post detail", body = PostDetailResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    ValidatedQuery(query): ValidatedQuery<PostDetailQuery>,
) -> ApiResult<PostDetailResponse> {
    debug!("Get post request: {}", post_id);

    let response = state
        .post_service
        .get_post(&post_id, query.include_comments)
        .await?;
    ok(response)
}

/// List the comments of a post, newest first.
#[utoipa::path(
    get,
    path = "/posts/{post_id}/comments",
    tag = "posts",
    params(("post_id" = String, Path, description = "LinkedIn post id"), CommentsQuery),
    responses(
        (status = 200, description = "Comments of the post", body = Paginated<CommentResponse>),
        (status = 404, description = "Post not found")
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    ValidatedQuery(query): ValidatedQuery<CommentsQuery>,
) -> ApiResult<Paginated<CommentResponse>> {
    let size = query.page_size.unwrap_or(COMMENTS_PAGE_SIZE);
    let request = page_request(query.page, Some(size), &state.pagination);
    let response = state.post_service.list_comments(&post_id, request).await?;
    ok(response)
}

/// Get the newest posts of a page.
#[utoipa::path(
    get,
    path = "/posts/recent/{page_id}",
    tag = "posts",
    params(("page_id" = String, Path, description = "Page slug"), RecentPostsQuery),
    responses(
        (status = 200, description = "Newest posts", body = RecentPostsResponse),
        (status = 404, description = "Page not found")
    )
)]
pub async fn recent_posts(
    State(state): State<AppState>,
    PageSlug(slug): PageSlug,
    ValidatedQuery(query): ValidatedQuery<RecentPostsQuery>,
) -> ApiResult<RecentPostsResponse> {
    let response = state.post_service.recent_posts(&slug, query.limit).await?;
    ok(response)
}
