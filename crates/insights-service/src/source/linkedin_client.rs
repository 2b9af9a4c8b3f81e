//! LinkedIn REST client.

use super::parse::{
    follower_count, parse_comment, parse_elements, parse_employee, parse_organization, parse_post,
};
use super::{PageSource, SourceComment, SourceEmployee, SourceOrganization, SourcePost};
use async_trait::async_trait;
use insights_config::LinkedInConfig;
use insights_core::{InsightsError, InsightsResult};
use insights_resilience::{RateLimiter, RetryPolicy};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value as JsonValue;
use shaku::Component;
use tracing::{debug, info, warn};

/// Outbound request budget per second.
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 10;

const SERVICE: &str = "linkedin";

const ORGANIZATION_PROJECTION: &str = "(id,name,vanityName,localizedName,description,\
localizedDescription,website,industries,staffCountRange,locations,logoV2(cropped~:playableStreams),\
coverPhotoV2,foundedOn,specialties,organizationType)";

/// LinkedIn API client.
///
/// Every request passes the shared rate limiter and is retried on transport
/// errors with the configured retry budget.
#[derive(Component)]
#[shaku(interface = PageSource)]
pub struct LinkedInClient {
    http: Client,
    config: LinkedInConfig,
    retry: RetryPolicy,
    #[shaku(default = RateLimiter::new(DEFAULT_REQUESTS_PER_SECOND))]
    limiter: RateLimiter,
}

impl LinkedInClient {
    /// Creates a client with its own connection pool.
    pub fn new(config: LinkedInConfig) -> InsightsResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .map_err(|e| InsightsError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            retry: RetryPolicy::for_retries(config.max_retries),
            config,
            limiter: RateLimiter::new(DEFAULT_REQUESTS_PER_SECOND),
        })
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.config.access_token)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .header("LinkedIn-Version", &self.config.api_version)
    }

    /// GETs a JSON document. `Ok(None)` for any non-200 answer.
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> InsightsResult<Option<JsonValue>> {
        let url = &self.url(path);

        self.retry
            .execute_retriable(move || async move {
                self.limiter.acquire().await;

                let response = self
                    .authorized(self.http.get(url.as_str()).query(query))
                    .send()
                    .await
                    .map_err(|e| InsightsError::external(SERVICE, format!("GET {path}: {e}")))?;

                let status = response.status();
                if status != StatusCode::OK {
                    debug!("LinkedIn GET {} answered {}", path, status);
                    return Ok(None);
                }

                let body = response.json::<JsonValue>().await.map_err(|e| {
                    InsightsError::external(SERVICE, format!("GET {path}: invalid body: {e}"))
                })?;
                Ok(Some(body))
            })
            .await
    }

    /// GETs a list endpoint and parses its elements, logging failures.
    async fn get_elements<T>(&self, path: &str, what: &str, parse: fn(&JsonValue) -> Option<T>) -> Vec<T> {
        match self.get_json(path, &[]).await {
            Ok(Some(payload)) => parse_elements(&payload, parse),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to fetch {} from LinkedIn: {}", what, e);
                Vec::new()
            }
        }
    }

    async fn fetch_follower_count(&self, org_id: &str) -> i64 {
        let path = format!(
            "/organizationalEntityFollowerStatistics?q=organizationalEntity\
             &organizationalEntity=urn:li:organization:{org_id}"
        );
        match self.get_json(&path, &[]).await {
            Ok(Some(stats)) => follower_count(&stats),
            Ok(None) => 0,
            Err(e) => {
                warn!("Failed to fetch follower count for {}: {}", org_id, e);
                0
            }
        }
    }
}

impl From<LinkedInClient> for LinkedInClientParameters {
    fn from(client: LinkedInClient) -> Self {
        Self {
            http: client.http,
            config: client.config,
            retry: client.retry,
            limiter: client.limiter,
        }
    }
}

#[async_trait]
impl PageSource for LinkedInClient {
    async fn fetch_organization(&self, vanity_name: &str) -> InsightsResult<Option<SourceOrganization>> {
        debug!("Looking up LinkedIn organization '{}'", vanity_name);

        let Some(lookup) = self
            .get_json("/organizations", &[("q", "vanityName"), ("vanityName", vanity_name)])
            .await?
        else {
            return Ok(None);
        };

        let Some(org_id) = lookup
            .pointer("/elements/0/id")
            .and_then(|id| match id {
                JsonValue::String(s) => Some(s.clone()),
                JsonValue::Number(n) => Some(n.to_string()),
                _ => None,
            })
        else {
            info!("LinkedIn has no organization named '{}'", vanity_name);
            return Ok(None);
        };

        let Some(details) = self
            .get_json(
                &format!("/organizations/{org_id}"),
                &[("projection", ORGANIZATION_PROJECTION)],
            )
            .await?
        else {
            return Ok(None);
        };

        let followers = self.fetch_follower_count(&org_id).await;
        Ok(parse_organization(&details, vanity_name, followers))
    }

    async fn fetch_posts(&self, org_id: &str, count: u32) -> Vec<SourcePost> {
        let path = format!(
            "/ugcPosts?q=authors&authors=List(urn:li:organization:{org_id})&count={count}&start=0"
        );
        self.get_elements(&path, "posts", parse_post).await
    }

    async fn fetch_comments(&self, post_urn: &str, count: u32) -> Vec<SourceComment> {
        let path = format!("/socialActions/{post_urn}/comments?count={count}");
        self.get_elements(&path, "comments", parse_comment).await
    }

    async fn fetch_employees(&self, org_id: &str, count: u32) -> Vec<SourceEmployee> {
        let path = format!(
            "/people?q=currentCompany&currentCompany=urn:li:organization:{org_id}&count={count}&start=0"
        );
        self.get_elements(&path, "employees", parse_employee).await
    }
}

impl std::fmt::Debug for LinkedInClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedInClient")
            .field("base_url", &self.config.base_url)
            .field("api_version", &self.config.api_version)
            .finish_non_exhaustive()
    }
}
