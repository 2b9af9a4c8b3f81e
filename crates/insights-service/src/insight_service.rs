//! AI summaries, statistics summaries and page comparison.

use crate::ai::analysis::{
    compare_fallback, compare_prompt, fallback_summary, format_thousands, summary_from_analysis,
    SummaryContext, COMPARE_SYSTEM_PROMPT, SUMMARY_SYSTEM_PROMPT,
};
use crate::ai::SummaryGenerator;
use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{AiSummaryResponse, CompareResponse, KeyStats, QuickSummaryResponse};
use crate::metrics::ServiceMetrics;
use async_trait::async_trait;
use chrono::Utc;
use insights_config::{AiConfig, CacheConfig};
use insights_core::{InsightsError, InsightsResult, Interface, Page};
use insights_repository::{EmployeeRepository, PageRepository, PostRepository};
use serde_json::Value as JsonValue;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Posts fed into a summary.
pub const SUMMARY_POSTS: u32 = 25;
/// People fed into a summary.
pub const SUMMARY_EMPLOYEES: u32 = 50;
/// Smallest number of pages a comparison accepts.
pub const COMPARE_MIN_PAGES: usize = 2;
/// Largest number of pages a comparison accepts.
pub const COMPARE_MAX_PAGES: usize = 5;

/// What goes into an AI summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    pub include_posts: bool,
    pub include_employees: bool,
    /// Skip the cached summary.
    pub force_refresh: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            include_posts: true,
            include_employees: true,
            force_refresh: false,
        }
    }
}

/// Insight service trait.
#[async_trait]
pub trait InsightService: Interface + Send + Sync {
    /// Generates a model-written summary of a page. Falls back to a summary
    /// built from stored data when the model cannot be used.
    async fn generate_summary(&self, slug: &str, options: SummaryOptions)
        -> InsightsResult<AiSummaryResponse>;

    /// Summarises a page from stored statistics alone.
    async fn quick_summary(&self, slug: &str) -> InsightsResult<QuickSummaryResponse>;

    /// Compares two to five pages.
    async fn compare(&self, slugs: &[String]) -> InsightsResult<CompareResponse>;
}

/// Insight service implementation.
#[derive(Component)]
#[shaku(interface = InsightService)]
pub struct InsightServiceComponent {
    #[shaku(inject)]
    page_repository: Arc<dyn PageRepository>,
    #[shaku(inject)]
    post_repository: Arc<dyn PostRepository>,
    #[shaku(inject)]
    employee_repository: Arc<dyn EmployeeRepository>,
    #[shaku(inject)]
    generator: Arc<dyn SummaryGenerator>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    ai_config: AiConfig,
    cache_config: CacheConfig,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl InsightServiceComponent {
    async fn require_page(&self, slug: &str) -> InsightsResult<Page> {
        self.page_repository
            .find_by_page_id(slug)
            .await?
            .ok_or_else(|| InsightsError::not_found("Page", slug))
    }

    /// Asks the model, or returns why it could not be asked.
    async fn ask(&self, system: &str, prompt: &str) -> InsightsResult<JsonValue> {
        if !self.generator.is_configured() {
            return Err(InsightsError::Configuration(
                "AI API key is not configured".to_string(),
            ));
        }
        self.generator.complete_json(system, prompt).await
    }
}

#[async_trait]
impl InsightService for InsightServiceComponent {
    async fn generate_summary(
        &self,
        slug: &str,
        options: SummaryOptions,
    ) -> InsightsResult<AiSummaryResponse> {
        let cache_key = cache_keys::ai_summary(slug);

        if !options.force_refresh {
            if let Some(cached) = self.cache.lookup::<AiSummaryResponse>(&cache_key).await {
                debug!("Cache hit for AI summary: {}", slug);
                return Ok(cached);
            }
        }

        let page = self.require_page(slug).await?;

        let posts = if options.include_posts {
            self.post_repository.find_recent(page.id, SUMMARY_POSTS).await?
        } else {
            Vec::new()
        };
        let employees = if options.include_employees {
            self.employee_repository
                .find_limited_by_page(page.id, SUMMARY_EMPLOYEES)
                .await?
        } else {
            Vec::new()
        };

        let context = SummaryContext::build(&page, &posts, &employees);

        let summary = match self.ask(SUMMARY_SYSTEM_PROMPT, &context.prompt()).await {
            Ok(analysis) => {
                info!("Generated AI summary for page: {}", slug);
                ServiceMetrics::summary_generated(false);
                summary_from_analysis(&page, &context, &analysis)
            }
            Err(e) => {
                warn!("AI summary for page '{}' unavailable, using fallback: {}", slug, e);
                ServiceMetrics::summary_generated(true);
                fallback_summary(&page, &context)
            }
        };

        self.cache
            .store(&cache_key, &summary, self.ai_config.summary_cache_ttl())
            .await;

        Ok(summary)
    }

    #[allow(clippy::cast_possible_truncation)]
    async fn quick_summary(&self, slug: &str) -> InsightsResult<QuickSummaryResponse> {
        let cache_key = cache_keys::quick_summary(slug);

        if let Some(cached) = self.cache.lookup::<QuickSummaryResponse>(&cache_key).await {
            debug!("Cache hit for quick summary: {}", slug);
            return Ok(cached);
        }

        let page = self.require_page(slug).await?;
        let stats = self.post_repository.stats_by_page(page.id).await?;
        let employee_count = if page.employee_count > 0 {
            page.employee_count
        } else {
            self.employee_repository.count_by_page(page.id).await?
        };

        let summary = format!(
            "{} is a {} with {} followers. They have published {} posts with an average of {} likes per post.",
            page.name,
            page.industry_or_default(),
            format_thousands(page.follower_count),
            stats.total_posts,
            stats.avg_likes.floor() as i64
        );

        let response = QuickSummaryResponse {
            page_id: page.page_id.clone(),
            summary,
            key_stats: KeyStats {
                follower_count: page.follower_count,
                employee_count,
                total_posts: stats.total_posts,
                total_engagement: stats.total_likes,
                avg_likes_per_post: round1(stats.avg_likes),
                avg_comments_per_post: round1(stats.avg_comments),
                industry: page.industry,
                company_size: page.company_size,
                headquarters: page.headquarters,
            },
            generated_at: Utc::now(),
        };

        self.cache
            .store(&cache_key, &response, self.cache_config.default_ttl())
            .await;

        Ok(response)
    }

    async fn compare(&self, slugs: &[String]) -> InsightsResult<CompareResponse> {
        if !(COMPARE_MIN_PAGES..=COMPARE_MAX_PAGES).contains(&slugs.len()) {
            return Err(InsightsError::bad_request(format!(
                "Provide between {COMPARE_MIN_PAGES} and {COMPARE_MAX_PAGES} page ids to compare, got {}",
                slugs.len()
            )));
        }

        let found = self.page_repository.find_by_page_ids(slugs).await?;

        // Requested order is kept, duplicates included.
        let pages: Vec<Page> = slugs
            .iter()
            .filter_map(|slug| found.iter().find(|p| &p.page_id == slug).cloned())
            .collect();

        if pages.len() < COMPARE_MIN_PAGES {
            let mut missing: Vec<&str> = Vec::new();
            for slug in slugs {
                if !found.iter().any(|p| &p.page_id == slug) && !missing.contains(&slug.as_str()) {
                    missing.push(slug.as_str());
                }
            }
            if missing.is_empty() {
                missing = slugs.iter().map(String::as_str).collect();
            }
            return Err(InsightsError::not_found("Page", missing.join(", ")));
        }

        let analysis = match self.ask(COMPARE_SYSTEM_PROMPT, &compare_prompt(&pages)).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("AI comparison unavailable, using fallback: {}", e);
                compare_fallback(&pages)
            }
        };

        Ok(CompareResponse {
            pages_compared: pages.into_iter().map(|p| p.name).collect(),
            analysis,
            generated_at: Utc::now(),
        })
    }
}

impl std::fmt::Debug for InsightServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightServiceComponent")
            .field("model", &self.ai_config.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::analysis::DEFAULT_RECOMMENDATIONS;
    use crate::cache::memory::MemoryCache;
    use crate::testing::{
        sample_employee, sample_page, sample_post, FakeGenerator, MemoryEmployeeRepository,
        MemoryPageRepository, MemoryPostRepository,
    };
    use insights_core::{Employee, PageId, Post};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    struct Setup {
        service: InsightServiceComponent,
        generator: Arc<FakeGenerator>,
        cache: Arc<MemoryCache>,
    }

    fn page(id: i64, slug: &str, name: &str, followers: i64) -> Page {
        Page {
            id: PageId(id),
            name: name.to_string(),
            follower_count: followers,
            ..sample_page(slug)
        }
    }

    fn engaging_post(id: i64, likes: i64, comments: i64) -> Post {
        Post {
            like_count: likes,
            comment_count: comments,
            text: Some(format!("Post {id} #growth")),
            content_type: Some("text".to_string()),
            ..sample_post(id, &format!("p{id}"))
        }
    }

    fn setup_with(generator: FakeGenerator, posts: Vec<Post>, employees: Vec<Employee>) -> Setup {
        let mut acme = page(1, "acme", "Acme", 1_234_567);
        acme.industry = Some("Software".to_string());

        let generator = Arc::new(generator);
        let cache = Arc::new(MemoryCache::default());
        let service = InsightServiceComponent {
            page_repository: Arc::new(MemoryPageRepository::with_pages(vec![
                acme,
                page(2, "globex", "Globex", 900),
                page(3, "initech", "Initech", 5_000),
            ])),
            post_repository: Arc::new(MemoryPostRepository::with_posts(posts)),
            employee_repository: Arc::new(MemoryEmployeeRepository::with_employees(employees)),
            generator: generator.clone(),
            cache: cache.clone(),
            ai_config: AiConfig::default(),
            cache_config: CacheConfig::default(),
        };
        Setup { service, generator, cache }
    }

    fn setup(generator: FakeGenerator) -> Setup {
        setup_with(
            generator,
            vec![engaging_post(1, 10, 2), engaging_post(2, 25, 3)],
            vec![sample_employee(1, "e1"), sample_employee(2, "e2")],
        )
    }

    fn model_answer() -> JsonValue {
        json!({
            "summary": "Acme leads its niche.",
            "page_type": "enterprise",
            "key_insights": [{"category": "Content", "insight": "Steady", "confidence": 0.8}],
            "follower_analysis": {"growth_trend": "growing", "engagement_rate": 0.04},
            "content_analysis": {"posting_frequency": "weekly", "best_performing_topics": ["growth"]},
            "recommendations": ["Post more video"]
        })
    }

    #[tokio::test]
    async fn test_generate_summary_uses_model_answer() {
        let setup = setup(FakeGenerator::answering(model_answer()));

        let summary = setup
            .service
            .generate_summary("acme", SummaryOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.summary, "Acme leads its niche.");
        assert_eq!(summary.page_type, "enterprise");
        assert_eq!(summary.industry_classification, "Software");
        assert_eq!(summary.follower_analysis.total_count, 1_234_567);
        assert_eq!(summary.content_analysis.total_posts, 2);
        assert!((summary.content_analysis.avg_likes - 17.5).abs() < f64::EPSILON);
        assert_eq!(summary.recommendations, vec!["Post more video".to_string()]);
        assert_eq!(setup.cache.keys(), vec!["ai_summary:acme".to_string()]);
    }

    #[tokio::test]
    async fn test_generate_summary_served_from_cache_unless_forced() {
        let setup = setup(FakeGenerator::answering(model_answer()));

        setup.service.generate_summary("acme", SummaryOptions::default()).await.unwrap();
        setup.service.generate_summary("acme", SummaryOptions::default()).await.unwrap();
        assert_eq!(setup.generator.calls.load(Ordering::SeqCst), 1);

        let forced = SummaryOptions {
            force_refresh: true,
            ..Default::default()
        };
        setup.service.generate_summary("acme", forced).await.unwrap();
        assert_eq!(setup.generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_generate_summary_falls_back_on_model_failure() {
        let setup = setup(FakeGenerator::failing());

        let summary = setup
            .service
            .generate_summary("acme", SummaryOptions::default())
            .await
            .unwrap();

        assert_eq!(
            summary.summary,
            "Acme is a Software with 1,234,567 followers on LinkedIn."
        );
        assert_eq!(summary.page_type, "company");
        assert_eq!(summary.recommendations.len(), DEFAULT_RECOMMENDATIONS.len());
        assert_eq!(summary.content_analysis.total_posts, 2);
    }

    #[tokio::test]
    async fn test_unconfigured_generator_is_never_called() {
        let setup = setup(FakeGenerator::unconfigured());

        let summary = setup
            .service
            .generate_summary("acme", SummaryOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.page_type, "company");
        assert_eq!(setup.generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_summary_without_posts_or_employees() {
        let setup = setup(FakeGenerator::answering(model_answer()));
        let options = SummaryOptions {
            include_posts: false,
            include_employees: false,
            force_refresh: false,
        };

        let summary = setup.service.generate_summary("acme", options).await.unwrap();

        assert_eq!(summary.content_analysis.total_posts, 0);
        let prompts = setup.generator.prompts.lock().unwrap();
        assert!(!prompts[0].contains("#growth"));
    }

    #[tokio::test]
    async fn test_summary_unknown_page() {
        let setup = setup(FakeGenerator::answering(model_answer()));

        let err = setup
            .service
            .generate_summary("nope", SummaryOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, InsightsError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_quick_summary() {
        let setup = setup(FakeGenerator::unconfigured());

        let quick = setup.service.quick_summary("acme").await.unwrap();

        assert_eq!(
            quick.summary,
            "Acme is a Software with 1,234,567 followers. \
             They have published 2 posts with an average of 17 likes per post."
        );
        assert_eq!(quick.key_stats.total_posts, 2);
        assert_eq!(quick.key_stats.total_engagement, 35);
        assert_eq!(quick.key_stats.employee_count, 2);
        assert!((quick.key_stats.avg_likes_per_post - 17.5).abs() < f64::EPSILON);
        assert!((quick.key_stats.avg_comments_per_post - 2.5).abs() < f64::EPSILON);
        assert_eq!(setup.cache.keys(), vec!["quick_summary:acme".to_string()]);
    }

    #[tokio::test]
    async fn test_quick_summary_rounds_to_one_decimal() {
        let setup = setup_with(
            FakeGenerator::unconfigured(),
            vec![engaging_post(1, 1, 1), engaging_post(2, 1, 0), engaging_post(3, 2, 0)],
            Vec::new(),
        );

        let quick = setup.service.quick_summary("acme").await.unwrap();

        assert!((quick.key_stats.avg_likes_per_post - 1.3).abs() < 1e-9);
        assert!((quick.key_stats.avg_comments_per_post - 0.3).abs() < 1e-9);
        assert!(quick.summary.ends_with("an average of 1 likes per post."));
    }

    #[tokio::test]
    async fn test_quick_summary_without_industry() {
        let setup = setup(FakeGenerator::unconfigured());

        let quick = setup.service.quick_summary("globex").await.unwrap();
        assert!(quick.summary.starts_with("Globex is a company with 900 followers."));
    }

    #[tokio::test]
    async fn test_compare_rejects_bad_counts() {
        let setup = setup(FakeGenerator::unconfigured());

        let one = vec!["acme".to_string()];
        let err = setup.service.compare(&one).await.unwrap_err();
        assert_eq!(err.status_code(), 400);

        let six: Vec<String> = (0..6).map(|i| format!("p{i}")).collect();
        let err = setup.service.compare(&six).await.unwrap_err();
        assert!(matches!(err, InsightsError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_compare_needs_two_known_pages() {
        let setup = setup(FakeGenerator::unconfigured());

        let slugs = vec!["acme".to_string(), "nope".to_string()];
        let err = setup.service.compare(&slugs).await.unwrap_err();
        assert!(matches!(err, InsightsError::NotFound { .. }));
        assert!(err.to_string().contains("nope"));
        assert!(!err.to_string().contains("acme"));
    }

    #[tokio::test]
    async fn test_compare_keeps_repeated_page() {
        let setup = setup(FakeGenerator::failing());

        let slugs = vec!["acme".to_string(), "acme".to_string()];
        let result = setup.service.compare(&slugs).await.unwrap();

        assert_eq!(result.pages_compared, vec!["Acme".to_string(), "Acme".to_string()]);
        assert_eq!(result.analysis["basic_comparison"]["by_followers"], "Acme");
    }

    #[tokio::test]
    async fn test_compare_falls_back_when_model_unavailable() {
        let setup = setup(FakeGenerator::failing());

        let slugs = vec!["globex".to_string(), "nope".to_string(), "initech".to_string()];
        let result = setup.service.compare(&slugs).await.unwrap();

        assert_eq!(result.pages_compared, vec!["Globex".to_string(), "Initech".to_string()]);
        assert_eq!(result.analysis["basic_comparison"]["by_followers"], "Initech");
        assert!(result.analysis.get("error").is_some());
    }

    #[tokio::test]
    async fn test_compare_returns_model_analysis() {
        let setup = setup(FakeGenerator::answering(json!({"winner_by_followers": "Acme"})));

        let slugs = vec!["acme".to_string(), "globex".to_string()];
        let result = setup.service.compare(&slugs).await.unwrap();

        assert_eq!(result.analysis["winner_by_followers"], "Acme");
        assert_eq!(result.pages_compared, vec!["Acme".to_string(), "Globex".to_string()]);
    }
}
