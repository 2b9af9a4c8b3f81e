//! Router-level tests with in-memory service doubles.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use insights_config::ServerConfig;
use insights_core::{
    HealthCheck, HealthStatus, InsightsError, InsightsResult, Page, PageId, PageRequest, Paginated,
};
use insights_repository::PageFilter;
use insights_rest::{create_router, AppState, ServiceInfo};
use insights_service::{
    AiSummaryResponse, CommentResponse, CompareResponse, EmployeeResponse, FollowersResponse,
    InsightService, PageDetailResponse, PageResponse, PageService, PostDetailResponse, PostQuery,
    PostResponse, PostService, QuickSummaryResponse, RecentPostsResponse, SummaryOptions,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

const KNOWN_SLUG: &str = "acme";

fn acme() -> PageResponse {
    PageResponse::from(Page {
        id: PageId(1),
        page_id: KNOWN_SLUG.to_string(),
        linkedin_id: Some("1234".to_string()),
        name: "Acme".to_string(),
        url: None,
        profile_picture_url: None,
        profile_picture_s3_url: None,
        description: None,
        tagline: None,
        website: None,
        industry: Some("Software".to_string()),
        company_size: None,
        headquarters: None,
        founded_year: None,
        company_type: None,
        follower_count: 1200,
        employee_count: 40,
        specialties: None,
        locations: None,
        extra_data: None,
        created_at: Utc::now(),
        updated_at: None,
        last_scraped_at: None,
    })
}

fn require_known(slug: &str) -> InsightsResult<()> {
    if slug == KNOWN_SLUG {
        Ok(())
    } else {
        Err(InsightsError::not_found("Page", slug))
    }
}

#[derive(Default)]
struct StubPages {
    last_list: Mutex<Option<(PageFilter, PageRequest)>>,
    last_employees: Mutex<Option<PageRequest>>,
    /// Simulated LinkedIn latency for refresh and followers.
    latency: Duration,
}

#[async_trait]
impl PageService for StubPages {
    async fn list_pages(&self, filter: PageFilter, page: PageRequest)
        -> InsightsResult<Paginated<PageResponse>> {
        *self.last_list.lock().unwrap() = Some((filter, page));
        Ok(Paginated::from_request(vec![acme()], page, 1))
    }

    async fn get_page(&self, slug: &str, _fetch_if_missing: bool) -> InsightsResult<PageDetailResponse> {
        require_known(slug)?;
        Ok(PageDetailResponse {
            page: acme(),
            posts_count: 0,
            recent_posts: Vec::new(),
        })
    }

    async fn refresh_page(&self, slug: &str) -> InsightsResult<PageResponse> {
        require_known(slug)?;
        tokio::time::sleep(self.latency).await;
        Ok(acme())
    }

    async fn page_posts(&self, slug: &str, page: PageRequest) -> InsightsResult<Paginated<PostResponse>> {
        require_known(slug)?;
        Ok(Paginated::empty(page))
    }

    async fn followers(&self, slug: &str, page: PageRequest) -> InsightsResult<FollowersResponse> {
        require_known(slug)?;
        tokio::time::sleep(self.latency).await;
        Ok(FollowersResponse {
            followers: Vec::new(),
            following: Vec::new(),
            total_followers: 0,
            total_following: 0,
            page: page.page,
            page_size: page.page_size,
        })
    }

    async fn employees(&self, slug: &str, page: PageRequest)
        -> InsightsResult<Paginated<EmployeeResponse>> {
        require_known(slug)?;
        *self.last_employees.lock().unwrap() = Some(page);
        Ok(Paginated::empty(page))
    }
}

#[derive(Default)]
struct StubPosts {
    last_query: Mutex<Option<(PostQuery, PageRequest)>>,
    last_limit: Mutex<Option<u32>>,
    last_comments: Mutex<Option<(String, PageRequest)>>,
}

#[async_trait]
impl PostService for StubPosts {
    async fn list_posts(&self, query: PostQuery, page: PageRequest)
        -> InsightsResult<Paginated<PostResponse>> {
        *self.last_query.lock().unwrap() = Some((query, page));
        Ok(Paginated::empty(page))
    }

    async fn get_post(&self, post_id: &str, _include_comments: bool) -> InsightsResult<PostDetailResponse> {
        Err(InsightsError::not_found("Post", post_id))
    }

    async fn list_comments(&self, post_id: &str, page: PageRequest)
        -> InsightsResult<Paginated<CommentResponse>> {
        *self.last_comments.lock().unwrap() = Some((post_id.to_string(), page));
        Err(InsightsError::not_found("Post", post_id))
    }

    async fn recent_posts(&self, slug: &str, limit: u32) -> InsightsResult<RecentPostsResponse> {
        require_known(slug)?;
        *self.last_limit.lock().unwrap() = Some(limit);
        Ok(RecentPostsResponse {
            page_id: slug.to_string(),
            page_name: "Acme".to_string(),
            posts: Vec::new(),
            count: 0,
        })
    }
}

struct StubInsights;

#[async_trait]
impl InsightService for StubInsights {
    async fn generate_summary(&self, slug: &str, _options: SummaryOptions)
        -> InsightsResult<AiSummaryResponse> {
        Err(InsightsError::not_found("Page", slug))
    }

    async fn quick_summary(&self, slug: &str) -> InsightsResult<QuickSummaryResponse> {
        Err(InsightsError::not_found("Page", slug))
    }

    async fn compare(&self, slugs: &[String]) -> InsightsResult<CompareResponse> {
        if !(2..=5).contains(&slugs.len()) {
            return Err(InsightsError::bad_request("Provide between 2 and 5 page ids"));
        }
        Ok(CompareResponse {
            pages_compared: slugs.to_vec(),
            analysis: json!({}),
            generated_at: Utc::now(),
        })
    }
}

struct StubCheck(&'static str, HealthStatus);

#[async_trait]
impl HealthCheck for StubCheck {
    fn name(&self) -> &str {
        self.0
    }

    async fn check(&self) -> HealthStatus {
        self.1.clone()
    }
}

struct TestApp {
    router: Router,
    pages: Arc<StubPages>,
    posts: Arc<StubPosts>,
}

impl TestApp {
    fn new(checks: Vec<Arc<dyn HealthCheck>>) -> Self {
        Self::with_latency(checks, Duration::ZERO, &ServerConfig::default())
    }

    fn with_latency(checks: Vec<Arc<dyn HealthCheck>>, latency: Duration, server: &ServerConfig) -> Self {
        let pages = Arc::new(StubPages {
            latency,
            ..StubPages::default()
        });
        let posts = Arc::new(StubPosts::default());
        let state = AppState::new(
            pages.clone(),
            posts.clone(),
            Arc::new(StubInsights),
            checks,
            ServiceInfo {
                name: "linkedin-insights".to_string(),
                version: "1.0.0".to_string(),
                environment: "test".to_string(),
            },
        );
        Self {
            router: create_router(state, server),
            pages,
            posts,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }
}

fn healthy() -> Vec<Arc<dyn HealthCheck>> {
    vec![Arc::new(StubCheck("database", HealthStatus::Healthy))]
}

#[tokio::test]
async fn test_list_pages_passes_filters_and_paging() {
    let app = TestApp::new(healthy());

    let (status, body) = app
        .get("/api/v1/pages?page=2&page_size=5&industry=soft&min_followers=100")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["page"], 2);

    let (filter, request) = app.pages.last_list.lock().unwrap().clone().unwrap();
    assert_eq!(request, PageRequest::new(2, 5));
    assert_eq!(filter.industry.as_deref(), Some("soft"));
    assert_eq!(filter.min_followers, Some(100));
    assert_eq!(filter.name, None);
}

#[tokio::test]
async fn test_list_pages_defaults_page_size() {
    let app = TestApp::new(healthy());

    let (status, _) = app.get("/api/v1/pages").await;

    assert_eq!(status, StatusCode::OK);
    let (_, request) = app.pages.last_list.lock().unwrap().clone().unwrap();
    assert_eq!(request, PageRequest::new(1, 10));
}

#[tokio::test]
async fn test_out_of_range_page_size_is_rejected_with_details() {
    let app = TestApp::new(healthy());

    let (status, body) = app.get("/api/v1/pages?page_size=500").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"][0]["field"], "page_size");
    assert!(app.pages.last_list.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_page_posts_limit_is_per_endpoint() {
    let app = TestApp::new(healthy());

    let (status, _) = app.get("/api/v1/pages/acme/posts?page_size=25").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/v1/pages/acme/posts?page_size=26").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_employees_page_size_bounds() {
    let app = TestApp::new(healthy());

    let (status, _) = app.get("/api/v1/pages/acme/employees").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(*app.pages.last_employees.lock().unwrap(), Some(PageRequest::new(1, 10)));

    let (status, _) = app.get("/api/v1/pages/acme/employees?page_size=100").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(*app.pages.last_employees.lock().unwrap(), Some(PageRequest::new(1, 100)));

    let (status, body) = app.get("/api/v1/pages/acme/employees?page_size=101").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"][0]["field"], "page_size");

    let (status, _) = app.get("/api/v1/pages/acme/employees?page_size=0").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_page_is_not_found_envelope() {
    let app = TestApp::new(healthy());

    let (status, body) = app.get("/api/v1/pages/globex").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_slug_is_bad_request() {
    let app = TestApp::new(healthy());

    let (status, body) = app.get("/api/v1/pages/acme%21corp").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_refresh_returns_page() {
    let app = TestApp::new(healthy());

    let request = Request::post("/api/v1/pages/acme/refresh")
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page_id"], "acme");
    assert_eq!(body["data"]["follower_count"], 1200);
}

#[tokio::test]
async fn test_recent_posts_default_limit() {
    let app = TestApp::new(healthy());

    let (status, body) = app.get("/api/v1/posts/recent/acme").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page_name"], "Acme");
    assert_eq!(*app.posts.last_limit.lock().unwrap(), Some(15));
}

#[tokio::test]
async fn test_list_posts_forwards_filters() {
    let app = TestApp::new(healthy());

    let (status, _) = app
        .get("/api/v1/posts?page_id=acme&content_type=image&min_likes=3")
        .await;

    assert_eq!(status, StatusCode::OK);
    let (query, request) = app.posts.last_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.page_id.as_deref(), Some("acme"));
    assert_eq!(query.content_type.as_deref(), Some("image"));
    assert_eq!(query.min_likes, Some(3));
    assert_eq!(request, PageRequest::new(1, 10));
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let app = TestApp::new(healthy());

    let (status, _) = app.get("/api/v1/posts/urn-li-1/comments").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments_default_page_size_is_twenty() {
    let app = TestApp::new(healthy());

    app.get("/api/v1/posts/x/comments").await;
    let (post_id, request) = app.posts.last_comments.lock().unwrap().clone().unwrap();
    assert_eq!(post_id, "x");
    assert_eq!(request, PageRequest::new(1, 20));
}

#[tokio::test]
async fn test_comments_page_size_above_limit_is_rejected() {
    let app = TestApp::new(healthy());

    let (status, body) = app.get("/api/v1/posts/x/comments?page_size=101").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(app.posts.last_comments.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_compare_rejects_single_page() {
    let app = TestApp::new(healthy());

    let request = Request::post("/api/v1/ai/compare")
        .header("content-type", "application/json")
        .body(Body::from(r#"["acme"]"#))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_compare_rejects_six_pages() {
    let app = TestApp::new(healthy());

    let request = Request::post("/api/v1/ai/compare")
        .header("content-type", "application/json")
        .body(Body::from(r#"["a", "b", "c", "d", "e", "f"]"#))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_compare_returns_analysis() {
    let app = TestApp::new(healthy());

    let request = Request::post("/api/v1/ai/compare")
        .header("content-type", "application/json")
        .body(Body::from(r#"["acme", "globex"]"#))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pages_compared"], json!(["acme", "globex"]));
}

#[tokio::test]
async fn test_root_reports_service() {
    let app = TestApp::new(healthy());

    let (status, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "healthy", "service": "linkedin-insights", "version": "1.0.0"})
    );
}

#[tokio::test]
async fn test_health_reports_worst_status() {
    let app = TestApp::new(vec![
        Arc::new(StubCheck("database", HealthStatus::Healthy)),
        Arc::new(StubCheck("cache", HealthStatus::Degraded("disabled".to_string()))),
    ]);

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["database"]["status"], "healthy");
    assert_eq!(body["checks"]["cache"]["message"], "disabled");

    // A degraded cache does not make the service unready.
    let (status, _) = app.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_ready_fails_when_a_dependency_is_down() {
    let app = TestApp::new(vec![Arc::new(StubCheck(
        "database",
        HealthStatus::Unhealthy("database unreachable".to_string()),
    ))]);

    let (status, _) = app.get("/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = app.get("/live").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_absent_without_recorder() {
    let app = TestApp::new(healthy());

    let (status, _) = app.get("/metrics").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::new(healthy());

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/live").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test(start_paused = true)]
async fn test_refresh_outlives_read_timeout() {
    let server = ServerConfig {
        request_timeout_secs: 1,
        sync_timeout_secs: 5,
        ..ServerConfig::default()
    };
    let app = TestApp::with_latency(healthy(), Duration::from_secs(2), &server);

    let (status, _) = app.get("/api/v1/pages/acme/followers").await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

    let request = Request::post("/api/v1/pages/acme/refresh")
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page_id"], "acme");
}
