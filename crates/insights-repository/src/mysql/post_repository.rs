//! MySQL post repository implementation.

use super::paginated;
use crate::{DatabasePoolInterface, NewPost, PostFilter, PostRepository, PostStats};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use insights_core::{InsightsError, InsightsResult, PageId, PageRequest, Paginated, Post, PostId};
use serde_json::Value as JsonValue;
use shaku::Component;
use sqlx::types::Json;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// MySQL post repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = PostRepository)]
pub struct MySqlPostRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlPostRepository {
    /// Creates a new MySQL post repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str = r"
    id, post_id, page_id, text, content_type, media_url, media_s3_url, media_type,
    like_count, comment_count, share_count, view_count, posted_at, author_name,
    author_title, hashtags, mentions, extra_data, created_at, updated_at
";

const POST_FILTER: &str = r"
    (? IS NULL OR page_id = ?)
    AND (? IS NULL OR content_type = ?)
    AND (? IS NULL OR like_count >= ?)
";

#[derive(Debug, FromRow)]
struct PostRow {
    id: i64,
    post_id: String,
    page_id: i64,
    text: Option<String>,
    content_type: Option<String>,
    media_url: Option<String>,
    media_s3_url: Option<String>,
    media_type: Option<String>,
    like_count: i64,
    comment_count: i64,
    share_count: i64,
    view_count: i64,
    posted_at: Option<DateTime<Utc>>,
    author_name: Option<String>,
    author_title: Option<String>,
    hashtags: Option<Json<Vec<String>>>,
    mentions: Option<Json<Vec<String>>>,
    extra_data: Option<Json<JsonValue>>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: PostId(row.id),
            post_id: row.post_id,
            page_id: PageId(row.page_id),
            text: row.text,
            content_type: row.content_type,
            media_url: row.media_url,
            media_s3_url: row.media_s3_url,
            media_type: row.media_type,
            like_count: row.like_count,
            comment_count: row.comment_count,
            share_count: row.share_count,
            view_count: row.view_count,
            posted_at: row.posted_at,
            author_name: row.author_name,
            author_title: row.author_title,
            hashtags: row.hashtags.map(|j| j.0),
            mentions: row.mentions.map(|j| j.0),
            extra_data: row.extra_data.map(|j| j.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PostStatsRow {
    total_posts: i64,
    avg_likes: f64,
    avg_comments: f64,
    avg_shares: f64,
    total_likes: i64,
}

#[async_trait]
impl PostRepository for MySqlPostRepository {
    async fn find_by_post_id(&self, post_id: &str) -> InsightsResult<Option<Post>> {
        debug!("Finding post by post_id: {}", post_id);

        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE post_id = ?");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post_id)
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(Post::from))
    }

    async fn find_all(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> InsightsResult<Paginated<Post>> {
        debug!(
            "Finding posts, filter: {:?}, page: {}, size: {}",
            filter, page.page, page.page_size
        );

        let page_id = filter.page.map(PageId::into_inner);

        let count_sql = format!("SELECT COUNT(*) FROM posts WHERE {POST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(page_id)
            .bind(page_id)
            .bind(&filter.content_type)
            .bind(&filter.content_type)
            .bind(filter.min_likes)
            .bind(filter.min_likes)
            .fetch_one(self.pool.inner())
            .await?;

        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE {POST_FILTER} \
             ORDER BY posted_at DESC, id DESC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(page_id)
            .bind(page_id)
            .bind(&filter.content_type)
            .bind(&filter.content_type)
            .bind(filter.min_likes)
            .bind(filter.min_likes)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool.inner())
            .await?;

        Ok(paginated(rows.into_iter().map(Post::from).collect(), page, total))
    }

    async fn find_by_page(
        &self,
        page_id: PageId,
        page: PageRequest,
    ) -> InsightsResult<Paginated<Post>> {
        let filter = PostFilter {
            page: Some(page_id),
            ..PostFilter::default()
        };
        self.find_all(&filter, page).await
    }

    async fn find_recent(&self, page_id: PageId, limit: u32) -> InsightsResult<Vec<Post>> {
        debug!("Finding {} recent posts for page {}", limit, page_id);

        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE page_id = ? \
             ORDER BY posted_at DESC, id DESC LIMIT ?"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(page_id)
            .bind(limit)
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn count_by_page(&self, page_id: PageId) -> InsightsResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE page_id = ?")
            .bind(page_id)
            .fetch_one(self.pool.inner())
            .await?;

        Ok(count)
    }

    async fn stats_by_page(&self, page_id: PageId) -> InsightsResult<PostStats> {
        debug!("Computing post stats for page {}", page_id);

        let row = sqlx::query_as::<_, PostStatsRow>(
            r"
            SELECT
                COUNT(*) AS total_posts,
                CAST(COALESCE(AVG(like_count), 0) AS DOUBLE) AS avg_likes,
                CAST(COALESCE(AVG(comment_count), 0) AS DOUBLE) AS avg_comments,
                CAST(COALESCE(AVG(share_count), 0) AS DOUBLE) AS avg_shares,
                CAST(COALESCE(SUM(like_count), 0) AS SIGNED) AS total_likes
            FROM posts
            WHERE page_id = ?
            ",
        )
        .bind(page_id)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(PostStats {
            total_posts: row.total_posts,
            avg_likes: row.avg_likes,
            avg_comments: row.avg_comments,
            avg_shares: row.avg_shares,
            total_likes: row.total_likes,
        })
    }

    async fn upsert(&self, post: &NewPost) -> InsightsResult<Post> {
        debug!("Upserting post: {}", post.post_id);

        sqlx::query(
            r"
            INSERT INTO posts (
                post_id, page_id, text, content_type, media_url, media_s3_url, media_type,
                like_count, comment_count, share_count, view_count, posted_at,
                author_name, author_title, hashtags, mentions, extra_data
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                text = COALESCE(VALUES(text), text),
                content_type = COALESCE(VALUES(content_type), content_type),
                media_url = COALESCE(VALUES(media_url), media_url),
                media_s3_url = COALESCE(VALUES(media_s3_url), media_s3_url),
                media_type = COALESCE(VALUES(media_type), media_type),
                like_count = VALUES(like_count),
                comment_count = VALUES(comment_count),
                share_count = VALUES(share_count),
                view_count = VALUES(view_count),
                posted_at = COALESCE(VALUES(posted_at), posted_at),
                author_name = COALESCE(VALUES(author_name), author_name),
                author_title = COALESCE(VALUES(author_title), author_title),
                hashtags = COALESCE(VALUES(hashtags), hashtags),
                mentions = COALESCE(VALUES(mentions), mentions),
                extra_data = COALESCE(VALUES(extra_data), extra_data)
            ",
        )
        .bind(&post.post_id)
        .bind(post.page_id)
        .bind(&post.text)
        .bind(&post.content_type)
        .bind(&post.media_url)
        .bind(&post.media_s3_url)
        .bind(&post.media_type)
        .bind(post.like_count)
        .bind(post.comment_count)
        .bind(post.share_count)
        .bind(post.view_count)
        .bind(post.posted_at)
        .bind(&post.author_name)
        .bind(&post.author_title)
        .bind(post.hashtags.as_ref().map(Json))
        .bind(post.mentions.as_ref().map(Json))
        .bind(post.extra_data.as_ref().map(Json))
        .execute(self.pool.inner())
        .await?;

        self.find_by_post_id(&post.post_id)
            .await?
            .ok_or_else(|| InsightsError::internal(format!("Post {} vanished after upsert", post.post_id)))
    }
}
