//! Page controller.

use crate::{
    extractors::{default_page, page_request, PageSlug, ValidatedQuery},
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use insights_core::Paginated;
use insights_repository::PageFilter;
use insights_service::{EmployeeResponse, FollowersResponse, PageDetailResponse, PageResponse, PostResponse};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;
use validator::Validate;

/// Creates the router for page reads served from the database.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pages))
        .route("/:page_id/posts", get(page_posts))
        .route("/:page_id/followers", get(page_followers))
        .route("/:page_id/employees", get(page_employees))
}

/// Creates the router for page routes that may sync from LinkedIn inline.
pub fn sync_router() -> Router<AppState> {
    Router::new()
        .route("/:page_id", get(get_page))
        .route("/:page_id/refresh", post(refresh_page))
}

/// Filters and paging for the page list.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageListQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: Option<u32>,
    /// Partial, case-insensitive match on the name.
    pub name: Option<String>,
    /// Partial, case-insensitive match on the industry.
    pub industry: Option<String>,
    #[validate(range(min = 0, message = "min_followers must not be negative"))]
    pub min_followers: Option<i64>,
    #[validate(range(min = 0, message = "max_followers must not be negative"))]
    pub max_followers: Option<i64>,
}

/// Options for the page detail.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageDetailQuery {
    /// Sync the page from LinkedIn when it is not stored yet.
    #[serde(default = "fetch_if_missing_default")]
    pub fetch_if_missing: bool,
}

const fn fetch_if_missing_default() -> bool {
    true
}

/// Paging for the posts of a page.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PagePostsQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[validate(range(min = 1, max = 25, message = "page_size must be between 1 and 25"))]
    pub page_size: Option<u32>,
}

/// Paging for followers and following.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FollowersQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[validate(range(min = 1, max = 50, message = "page_size must be between 1 and 50"))]
    pub page_size: Option<u32>,
}

/// Paging for the employees of a page.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmployeesQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: Option<u32>,
}

/// List stored pages, most followed first.
#[utoipa::path(
    get,
    path = "/pages",
    tag = "pages",
    params(PageListQuery),
    responses(
        (status = 200, description = "Pages matching the filters", body = Paginated<PageResponse>),
        (status = 422, description = "Invalid query parameters")
    )
)]
pub async fn list_pages(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PageListQuery>,
) -> ApiResult<Paginated<PageResponse>> {
    debug!("List pages request: {:?}", query);

    let request = page_request(query.page, query.page_size, &state.pagination);
    let filter = PageFilter {
        name: query.name,
        industry: query.industry,
        min_followers: query.min_followers,
        max_followers: query.max_followers,
    };

    let response = state.page_service.list_pages(filter, request).await?;
    ok(response)
}

/// Get a page with its newest posts.
#[utoipa::path(
    get,
    path = "/pages/{page_id}",
    tag = "pages",
    params(("page_id" = String, Path, description = "Page slug"), PageDetailQuery),
    responses(
        (status = 200, description = "Page detail", body = PageDetailResponse),
        (status = 400, description = "Malformed page id"),
        (status = 404, description = "Page not found")
    )
)]
pub async fn get_page(
    State(state): State<AppState>,
    PageSlug(slug): PageSlug,
    ValidatedQuery(query): ValidatedQuery<PageDetailQuery>,
) -> ApiResult<PageDetailResponse> {
    debug!("Get page request: {}", slug);

    let response = state
        .page_service
        .get_page(&slug, query.fetch_if_missing)
        .await?;
    ok(response)
}

/// Re-sync a page from LinkedIn.
#[utoipa::path(
    post,
    path = "/pages/{page_id}/refresh",
    tag = "pages",
    params(("page_id" = String, Path, description = "Page slug")),
    responses(
        (status = 200, description = "Refreshed page", body = PageResponse),
        (status = 404, description = "LinkedIn does not know the page"),
        (status = 502, description = "LinkedIn request failed")
    )
)]
pub async fn refresh_page(
    State(state): State<AppState>,
    PageSlug(slug): PageSlug,
) -> ApiResult<PageResponse> {
    debug!("Refresh page request: {}", slug);

    let response = state.page_service.refresh_page(&slug).await?;
    ok(response)
}

/// List the posts of a page, newest first.
#[utoipa::path(
    get,
    path = "/pages/{page_id}/posts",
    tag = "pages",
    params(("page_id" = String, Path, description = "Page slug"), PagePostsQuery),
    responses(
        (status = 200, description = "Posts of the page", body = Paginated<PostResponse>),
        (status = 404, description = "Page not found")
    )
)]
pub async fn page_posts(
    State(state): State<AppState>,
    PageSlug(slug): PageSlug,
    ValidatedQuery(query): ValidatedQuery<PagePostsQuery>,
) -> ApiResult<Paginated<PostResponse>> {
    let request = page_request(query.page, query.page_size, &state.pagination);
    let response = state.page_service.page_posts(&slug, request).await?;
    ok(response)
}

/// List followers and followed accounts of a page.
#[utoipa::path(
    get,
    path = "/pages/{page_id}/followers",
    tag = "pages",
    params(("page_id" = String, Path, description = "Page slug"), FollowersQuery),
    responses(
        (status = 200, description = "Followers of the page", body = FollowersResponse),
        (status = 404, description = "Page not found")
    )
)]
pub async fn page_followers(
    State(state): State<AppState>,
    PageSlug(slug): PageSlug,
    ValidatedQuery(query): ValidatedQuery<FollowersQuery>,
) -> ApiResult<FollowersResponse> {
    let request = page_request(query.page, query.page_size, &state.pagination);
    let response = state.page_service.followers(&slug, request).await?;
    ok(response)
}

/// List the employees of a page.
#[utoipa::path(
    get,
    path = "/pages/{page_id}/employees",
    tag = "pages",
    params(("page_id" = String, Path, description = "Page slug"), EmployeesQuery),
    responses(
        (status = 200, description = "Employees of the page", body = Paginated<EmployeeResponse>),
        (status = 404, description = "Page not found")
    )
)]
pub async fn page_employees(
    State(state): State<AppState>,
    PageSlug(slug): PageSlug,
    ValidatedQuery(query): ValidatedQuery<EmployeesQuery>,
) -> ApiResult<Paginated<EmployeeResponse>> {
    let request = page_request(query.page, query.page_size, &state.pagination);
    let response = state.page_service.employees(&slug, request).await?;
    ok(response)
}
