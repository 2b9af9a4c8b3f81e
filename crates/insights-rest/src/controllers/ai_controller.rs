//! AI insight controller.

use crate::{
    extractors::{PageSlug, ValidatedQuery},
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use insights_service::{AiSummaryResponse, CompareResponse, QuickSummaryResponse, SummaryOptions};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;
use validator::Validate;

/// Creates the AI router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary/:page_id", post(generate_summary))
        .route("/quick-summary/:page_id", get(quick_summary))
        .route("/compare", post(compare_pages))
}

/// What goes into a generated summary.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    #[serde(default = "enabled")]
    pub include_posts: bool,
    #[serde(default = "enabled")]
    pub include_employees: bool,
    /// Ignore a cached summary.
    #[serde(default)]
    pub force_refresh: bool,
}

const fn enabled() -> bool {
    true
}

impl From<SummaryQuery> for SummaryOptions {
    fn from(query: SummaryQuery) -> Self {
        Self {
            include_posts: query.include_posts,
            include_employees: query.include_employees,
            force_refresh: query.force_refresh,
        }
    }
}

/// Generate an AI summary of a page.
#[utoipa::path(
    post,
    path = "/ai/summary/{page_id}",
    tag = "ai",
    params(("page_id" = String, Path, description = "Page slug"), SummaryQuery),
    responses(
        (status = 200, description = "Generated or fallback summary", body = AiSummaryResponse),
        (status = 404, description = "Page not found")
    )
)]
pub async fn generate_summary(
    State(state): State<AppState>,
    PageSlug(slug): PageSlug,
    ValidatedQuery(query): ValidatedQuery<SummaryQuery>,
) -> ApiResult<AiSummaryResponse> {
    debug!("Summary request: {} {:?}", slug, query);

    let response = state
        .insight_service
        .generate_summary(&slug, query.into())
        .await?;
    ok(response)
}

/// Summarise a page from stored statistics.
#[utoipa::path(
    get,
    path = "/ai/quick-summary/{page_id}",
    tag = "ai",
    params(("page_id" = String, Path, description = "Page slug")),
    responses(
        (status = 200, description = "Statistics summary", body = QuickSummaryResponse),
        (status = 404, description = "Page not found")
    )
)]
pub async fn quick_summary(
    State(state): State<AppState>,
    PageSlug(slug): PageSlug,
) -> ApiResult<QuickSummaryResponse> {
    let response = state.insight_service.quick_summary(&slug).await?;
    ok(response)
}

/// Compare two to five pages.
#[utoipa::path(
    post,
    path = "/ai/compare",
    tag = "ai",
    request_body(content = Vec<String>, description = "Page slugs to compare"),
    responses(
        (status = 200, description = "Comparison", body = CompareResponse),
        (status = 400, description = "Fewer than 2 or more than 5 slugs"),
        (status = 404, description = "Fewer than 2 pages found")
    )
)]
pub async fn compare_pages(
    State(state): State<AppState>,
    Json(slugs): Json<Vec<String>>,
) -> ApiResult<CompareResponse> {
    debug!("Compare request: {:?}", slugs);

    let response = state.insight_service.compare(&slugs).await?;
    ok(response)
}
