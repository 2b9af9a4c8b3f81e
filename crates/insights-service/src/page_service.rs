//! Page reads and the refresh entry point.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{EmployeeResponse, FollowersResponse, PageDetailResponse, PageResponse, PostResponse};
use crate::sync_service::SyncService;
use async_trait::async_trait;
use insights_config::CacheConfig;
use insights_core::{InsightsError, InsightsResult, Interface, Page, PageRequest, Paginated};
use insights_repository::{EmployeeRepository, PageFilter, PageRepository, PostRepository};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Number of newest posts embedded in a page detail.
pub const DETAIL_RECENT_POSTS: u32 = 10;

/// Page service trait.
#[async_trait]
pub trait PageService: Interface + Send + Sync {
    /// Lists stored pages matching `filter`, most followed first.
    async fn list_pages(&self, filter: PageFilter, page: PageRequest)
        -> InsightsResult<Paginated<PageResponse>>;

    /// Gets a page with its post count and newest posts.
    ///
    /// With `fetch_if_missing`, a page absent from the database is synced
    /// from the source first.
    async fn get_page(&self, slug: &str, fetch_if_missing: bool) -> InsightsResult<PageDetailResponse>;

    /// Re-syncs a page from the source.
    async fn refresh_page(&self, slug: &str) -> InsightsResult<PageResponse>;

    /// Lists posts of a page, newest first.
    async fn page_posts(&self, slug: &str, page: PageRequest) -> InsightsResult<Paginated<PostResponse>>;

    /// Lists followers and followed accounts of a page.
    async fn followers(&self, slug: &str, page: PageRequest) -> InsightsResult<FollowersResponse>;

    /// Lists everyone associated with a page.
    async fn employees(&self, slug: &str, page: PageRequest)
        -> InsightsResult<Paginated<EmployeeResponse>>;
}

/// Page service implementation.
#[derive(Component)]
#[shaku(interface = PageService)]
pub struct PageServiceComponent {
    #[shaku(inject)]
    page_repository: Arc<dyn PageRepository>,
    #[shaku(inject)]
    post_repository: Arc<dyn PostRepository>,
    #[shaku(inject)]
    employee_repository: Arc<dyn EmployeeRepository>,
    #[shaku(inject)]
    sync_service: Arc<dyn SyncService>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    cache_config: CacheConfig,
}

impl PageServiceComponent {
    async fn require_page(&self, slug: &str) -> InsightsResult<Page> {
        self.page_repository
            .find_by_page_id(slug)
            .await?
            .ok_or_else(|| InsightsError::not_found("Page", slug))
    }
}

#[async_trait]
impl PageService for PageServiceComponent {
    async fn list_pages(
        &self,
        filter: PageFilter,
        page: PageRequest,
    ) -> InsightsResult<Paginated<PageResponse>> {
        debug!("Listing pages, page: {}, size: {}, filter: {:?}", page.page, page.page_size, filter);

        let pages = self.page_repository.find_all(&filter, page).await?;
        Ok(pages.map(PageResponse::from))
    }

    async fn get_page(&self, slug: &str, fetch_if_missing: bool) -> InsightsResult<PageDetailResponse> {
        let cache_key = cache_keys::page_detail(slug);

        if let Some(cached) = self.cache.lookup::<PageDetailResponse>(&cache_key).await {
            debug!("Cache hit for page: {}", slug);
            return Ok(cached);
        }

        let page = match self.page_repository.find_by_page_id(slug).await? {
            Some(page) => Some(page),
            None if fetch_if_missing => {
                info!("Page '{}' not stored, fetching from source", slug);
                self.sync_service.fetch_and_store(slug, false).await?
            }
            None => None,
        };
        let page = page.ok_or_else(|| InsightsError::not_found("Page", slug))?;

        let posts_count = self.post_repository.count_by_page(page.id).await?;
        let recent_posts = self
            .post_repository
            .find_recent(page.id, DETAIL_RECENT_POSTS)
            .await?
            .into_iter()
            .map(PostResponse::from)
            .collect();

        let response = PageDetailResponse {
            page: PageResponse::from(page),
            posts_count,
            recent_posts,
        };

        self.cache
            .store(&cache_key, &response, self.cache_config.default_ttl())
            .await;

        Ok(response)
    }

    async fn refresh_page(&self, slug: &str) -> InsightsResult<PageResponse> {
        info!("Refreshing page: {}", slug);

        let page = self.sync_service.refresh(slug).await?;
        Ok(PageResponse::from(page))
    }

    async fn page_posts(&self, slug: &str, page: PageRequest) -> InsightsResult<Paginated<PostResponse>> {
        debug!("Listing posts of page: {}", slug);

        let stored = self.require_page(slug).await?;
        let posts = self.post_repository.find_by_page(stored.id, page).await?;
        Ok(posts.map(PostResponse::from))
    }

    async fn followers(&self, slug: &str, page: PageRequest) -> InsightsResult<FollowersResponse> {
        debug!("Listing followers of page: {}", slug);

        let stored = self.require_page(slug).await?;
        let followers = self.employee_repository.find_followers(stored.id, page).await?;
        let following = self.employee_repository.find_following(stored.id, page).await?;

        Ok(FollowersResponse {
            followers: followers.into_iter().map(EmployeeResponse::from).collect(),
            following: following.into_iter().map(EmployeeResponse::from).collect(),
            total_followers: self.employee_repository.count_followers(stored.id).await?,
            total_following: self.employee_repository.count_following(stored.id).await?,
            page: page.page,
            page_size: page.page_size,
        })
    }

    async fn employees(
        &self,
        slug: &str,
        page: PageRequest,
    ) -> InsightsResult<Paginated<EmployeeResponse>> {
        debug!("Listing employees of page: {}", slug);

        let stored = self.require_page(slug).await?;
        let employees = self.employee_repository.find_by_page(stored.id, page).await?;
        Ok(employees.map(EmployeeResponse::from))
    }
}

impl std::fmt::Debug for PageServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageServiceComponent").finish_non_exhaustive()
    }
}
