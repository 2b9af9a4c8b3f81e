//! Post and comment reads.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{CommentResponse, PostDetailResponse, PostResponse, RecentPostsResponse};
use async_trait::async_trait;
use insights_config::CacheConfig;
use insights_core::{InsightsError, InsightsResult, Interface, PageRequest, Paginated, Post};
use insights_repository::{CommentRepository, PageRepository, PostFilter, PostRepository};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// Number of newest comments embedded in a post detail.
pub const DETAIL_COMMENTS: u32 = 50;

/// Filters accepted by [`PostService::list_posts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Slug of the page the posts belong to.
    pub page_id: Option<String>,
    pub content_type: Option<String>,
    pub min_likes: Option<i64>,
}

/// Post service trait.
#[async_trait]
pub trait PostService: Interface + Send + Sync {
    /// Lists posts, newest first. A slug that matches no page is ignored.
    async fn list_posts(&self, query: PostQuery, page: PageRequest)
        -> InsightsResult<Paginated<PostResponse>>;

    /// Gets a post, optionally with its newest comments.
    async fn get_post(&self, post_id: &str, include_comments: bool) -> InsightsResult<PostDetailResponse>;

    /// Lists comments of a post, newest first.
    async fn list_comments(&self, post_id: &str, page: PageRequest)
        -> InsightsResult<Paginated<CommentResponse>>;

    /// Returns the `limit` newest posts of a page.
    async fn recent_posts(&self, slug: &str, limit: u32) -> InsightsResult<RecentPostsResponse>;
}

/// Post service implementation.
#[derive(Component)]
#[shaku(interface = PostService)]
pub struct PostServiceComponent {
    #[shaku(inject)]
    page_repository: Arc<dyn PageRepository>,
    #[shaku(inject)]
    post_repository: Arc<dyn PostRepository>,
    #[shaku(inject)]
    comment_repository: Arc<dyn CommentRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    cache_config: CacheConfig,
}

impl PostServiceComponent {
    async fn require_post(&self, post_id: &str) -> InsightsResult<Post> {
        self.post_repository
            .find_by_post_id(post_id)
            .await?
            .ok_or_else(|| InsightsError::not_found("Post", post_id))
    }
}

#[async_trait]
impl PostService for PostServiceComponent {
    async fn list_posts(
        &self,
        query: PostQuery,
        page: PageRequest,
    ) -> InsightsResult<Paginated<PostResponse>> {
        debug!("Listing posts, page: {}, size: {}, query: {:?}", page.page, page.page_size, query);

        let page_filter = match query.page_id.as_deref() {
            Some(slug) => self.page_repository.find_by_page_id(slug).await?.map(|p| p.id),
            None => None,
        };

        let filter = PostFilter {
            page: page_filter,
            content_type: query.content_type,
            min_likes: query.min_likes,
        };
        let posts = self.post_repository.find_all(&filter, page).await?;
        Ok(posts.map(PostResponse::from))
    }

    async fn get_post(&self, post_id: &str, include_comments: bool) -> InsightsResult<PostDetailResponse> {
        let cache_key = cache_keys::post_detail(post_id, include_comments);

        if let Some(cached) = self.cache.lookup::<PostDetailResponse>(&cache_key).await {
            debug!("Cache hit for post: {}", post_id);
            return Ok(cached);
        }

        let post = self.require_post(post_id).await?;

        let comments = if include_comments {
            self.comment_repository
                .find_recent_by_post(post.id, DETAIL_COMMENTS)
                .await?
                .into_iter()
                .map(CommentResponse::from)
                .collect()
        } else {
            Vec::new()
        };

        let response = PostDetailResponse {
            post: PostResponse::from(post),
            comments,
        };

        self.cache
            .store(&cache_key, &response, self.cache_config.default_ttl())
            .await;

        Ok(response)
    }

    async fn list_comments(
        &self,
        post_id: &str,
        page: PageRequest,
    ) -> InsightsResult<Paginated<CommentResponse>> {
        debug!("Listing comments of post: {}", post_id);

        let post = self.require_post(post_id).await?;
        let comments = self.comment_repository.find_by_post(post.id, page).await?;
        Ok(comments.map(CommentResponse::from))
    }

    async fn recent_posts(&self, slug: &str, limit: u32) -> InsightsResult<RecentPostsResponse> {
        let cache_key = cache_keys::recent_posts(slug, limit);

        if let Some(cached) = self.cache.lookup::<RecentPostsResponse>(&cache_key).await {
            debug!("Cache hit for recent posts: {}", slug);
            return Ok(cached);
        }

        let page = self
            .page_repository
            .find_by_page_id(slug)
            .await?
            .ok_or_else(|| InsightsError::not_found("Page", slug))?;

        let posts: Vec<PostResponse> = self
            .post_repository
            .find_recent(page.id, limit)
            .await?
            .into_iter()
            .map(PostResponse::from)
            .collect();

        let response = RecentPostsResponse {
            page_id: page.page_id,
            page_name: page.name,
            count: posts.len(),
            posts,
        };

        self.cache
            .store(&cache_key, &response, self.cache_config.default_ttl())
            .await;

        Ok(response)
    }
}

impl std::fmt::Debug for PostServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostServiceComponent").finish_non_exhaustive()
    }
}
