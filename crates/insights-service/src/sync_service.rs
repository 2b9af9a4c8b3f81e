//! Pulls a page and its children from the source into the database.

use crate::cache::{CacheExt, CacheInterface};
use crate::metrics::ServiceMetrics;
use crate::source::{PageSource, SourceComment, SourceEmployee, SourceOrganization, SourcePost};
use async_trait::async_trait;
use insights_config::LinkedInConfig;
use insights_core::{Employee, InsightsError, InsightsResult, Interface, Page, PageId, Post};
use insights_repository::{
    CommentRepository, EmployeeRepository, NewComment, NewEmployee, NewPage, NewPost,
    PageRepository, PostRepository,
};
use shaku::Component;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Page synchronisation trait.
#[async_trait]
pub trait SyncService: Interface + Send + Sync {
    /// Returns the stored page, fetching it from the source when it is
    /// missing or `force` is set. `None` when the source does not know it.
    async fn fetch_and_store(&self, slug: &str, force: bool) -> InsightsResult<Option<Page>>;

    /// Drops every cached entry for the page and re-syncs it.
    async fn refresh(&self, slug: &str) -> InsightsResult<Page>;
}

/// Rows written by one sync.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct SyncCounts {
    posts: u64,
    comments: u64,
    employees: u64,
}

/// Sync service backed by a [`PageSource`].
#[derive(Component)]
#[shaku(interface = SyncService)]
pub struct SyncServiceComponent {
    #[shaku(inject)]
    page_repository: Arc<dyn PageRepository>,
    #[shaku(inject)]
    post_repository: Arc<dyn PostRepository>,
    #[shaku(inject)]
    comment_repository: Arc<dyn CommentRepository>,
    #[shaku(inject)]
    employee_repository: Arc<dyn EmployeeRepository>,
    #[shaku(inject)]
    source: Arc<dyn PageSource>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    limits: LinkedInConfig,
}

fn new_page(org: SourceOrganization) -> NewPage {
    NewPage {
        page_id: org.vanity_name,
        linkedin_id: Some(org.linkedin_id),
        name: org.name,
        url: Some(org.url),
        profile_picture_url: org.logo_url,
        description: org.description,
        website: org.website,
        industry: org.industry,
        company_size: org.company_size,
        headquarters: org.headquarters,
        founded_year: org.founded_year,
        company_type: org.company_type,
        follower_count: Some(org.follower_count),
        specialties: Some(org.specialties),
        locations: Some(org.locations),
        ..NewPage::default()
    }
}

fn new_post(page: PageId, post: SourcePost) -> NewPost {
    NewPost {
        text: post.text,
        content_type: Some(post.content_type),
        media_url: post.media_url,
        media_type: post.media_type,
        like_count: post.like_count,
        comment_count: post.comment_count,
        share_count: post.share_count,
        posted_at: post.posted_at,
        hashtags: Some(post.hashtags),
        mentions: Some(post.mentions),
        ..NewPost::new(post.post_id, page)
    }
}

fn new_employee(page: PageId, person: SourceEmployee) -> NewEmployee {
    NewEmployee {
        full_name: Employee::compose_full_name(person.first_name.as_deref(), person.last_name.as_deref()),
        first_name: person.first_name,
        last_name: person.last_name,
        current_title: person.headline.clone(),
        headline: person.headline,
        profile_url: person.profile_url,
        profile_picture_url: person.profile_picture_url,
        location: person.location,
        industry: person.industry,
        ..NewEmployee::new(person.linkedin_id, page)
    }
}

impl SyncServiceComponent {
    async fn store_comments(&self, post: &Post, comments: Vec<SourceComment>) -> InsightsResult<u64> {
        let mut stored = 0;
        for comment in comments {
            let parent = match comment.parent_comment_id.as_deref() {
                Some(parent) => self
                    .comment_repository
                    .find_by_comment_id(parent)
                    .await?
                    .map(|c| c.id),
                None => None,
            };

            let new = NewComment {
                parent_comment_id: parent,
                text: comment.text,
                author_id: comment.author_id,
                like_count: comment.like_count,
                commented_at: comment.commented_at,
                ..NewComment::new(comment.comment_id, post.id)
            };
            self.comment_repository.upsert(&new).await?;
            stored += 1;
        }
        Ok(stored)
    }

    async fn store_children(&self, page: &Page, org_id: &str) -> InsightsResult<SyncCounts> {
        let mut counts = SyncCounts::default();

        for source_post in self.source.fetch_posts(org_id, self.limits.posts_per_sync).await {
            let post = self.post_repository.upsert(&new_post(page.id, source_post)).await?;
            counts.posts += 1;

            let comments = self
                .source
                .fetch_comments(&post.post_id, self.limits.comments_per_post)
                .await;
            counts.comments += self.store_comments(&post, comments).await?;
        }

        for person in self.source.fetch_employees(org_id, self.limits.employees_per_sync).await {
            self.employee_repository.upsert(&new_employee(page.id, person)).await?;
            counts.employees += 1;
        }

        Ok(counts)
    }
}

#[async_trait]
impl SyncService for SyncServiceComponent {
    async fn fetch_and_store(&self, slug: &str, force: bool) -> InsightsResult<Option<Page>> {
        if !force {
            if let Some(page) = self.page_repository.find_by_page_id(slug).await? {
                debug!("Page '{}' already stored, skipping sync", slug);
                return Ok(Some(page));
            }
        }

        let started = Instant::now();
        info!("Syncing page '{}' from source", slug);

        let Some(org) = self.source.fetch_organization(slug).await? else {
            warn!("Source has no page '{}'", slug);
            return Ok(None);
        };

        let org_id = org.linkedin_id.clone();
        let page = self.page_repository.upsert(&new_page(org)).await?;
        let counts = self.store_children(&page, &org_id).await?;

        ServiceMetrics::page_synced(counts.posts, counts.comments, counts.employees, started.elapsed());
        info!(
            "Synced page '{}': {} posts, {} comments, {} employees in {:?}",
            slug,
            counts.posts,
            counts.comments,
            counts.employees,
            started.elapsed()
        );
        Ok(Some(page))
    }

    async fn refresh(&self, slug: &str) -> InsightsResult<Page> {
        let dropped = self.cache.invalidate_page(slug).await;
        debug!("Dropped {} cached entries for page '{}'", dropped, slug);

        self.fetch_and_store(slug, true)
            .await?
            .ok_or_else(|| InsightsError::not_found("Page", slug))
    }
}

impl std::fmt::Debug for SyncServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncServiceComponent")
            .field("posts_per_sync", &self.limits.posts_per_sync)
            .field("employees_per_sync", &self.limits.employees_per_sync)
            .finish_non_exhaustive()
    }
}
