//! MySQL comment repository implementation.

use super::paginated;
use crate::{CommentRepository, DatabasePoolInterface, NewComment};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use insights_core::{
    Comment, CommentId, InsightsError, InsightsResult, PageRequest, Paginated, PostId,
};
use serde_json::Value as JsonValue;
use shaku::Component;
use sqlx::types::Json;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// MySQL comment repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = CommentRepository)]
pub struct MySqlCommentRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlCommentRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

const COMMENT_COLUMNS: &str = r"
    id, comment_id, post_id, parent_comment_id, text, author_id, author_name,
    author_title, author_profile_url, author_profile_picture, like_count,
    reply_count, commented_at, created_at, extra_data
";

#[derive(Debug, FromRow)]
struct CommentRow {
    id: i64,
    comment_id: String,
    post_id: i64,
    parent_comment_id: Option<i64>,
    text: Option<String>,
    author_id: Option<String>,
    author_name: Option<String>,
    author_title: Option<String>,
    author_profile_url: Option<String>,
    author_profile_picture: Option<String>,
    like_count: i64,
    reply_count: i64,
    commented_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    extra_data: Option<Json<JsonValue>>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: CommentId(row.id),
            comment_id: row.comment_id,
            post_id: PostId(row.post_id),
            parent_comment_id: row.parent_comment_id.map(CommentId),
            text: row.text,
            author_id: row.author_id,
            author_name: row.author_name,
            author_title: row.author_title,
            author_profile_url: row.author_profile_url,
            author_profile_picture: row.author_profile_picture,
            like_count: row.like_count,
            reply_count: row.reply_count,
            commented_at: row.commented_at,
            created_at: row.created_at,
            extra_data: row.extra_data.map(|j| j.0),
        }
    }
}

#[async_trait]
impl CommentRepository for MySqlCommentRepository {
    async fn find_by_post(
        &self,
        post_id: PostId,
        page: PageRequest,
    ) -> InsightsResult<Paginated<Comment>> {
        debug!(
            "Finding comments for post {}, page: {}, size: {}",
            post_id, page.page, page.page_size
        );

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(self.pool.inner())
            .await?;

        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ? \
             ORDER BY commented_at DESC, id DESC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(post_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool.inner())
            .await?;

        Ok(paginated(rows.into_iter().map(Comment::from).collect(), page, total))
    }

    async fn find_recent_by_post(
        &self,
        post_id: PostId,
        limit: u32,
    ) -> InsightsResult<Vec<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ? \
             ORDER BY commented_at DESC, id DESC LIMIT ?"
        );
        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(post_id)
            .bind(limit)
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn find_by_comment_id(&self, comment_id: &str) -> InsightsResult<Option<Comment>> {
        debug!("Finding comment by comment_id: {}", comment_id);

        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE comment_id = ?");
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(comment_id)
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(Comment::from))
    }

    async fn upsert(&self, comment: &NewComment) -> InsightsResult<Comment> {
        debug!("Upserting comment: {}", comment.comment_id);

        sqlx::query(
            r"
            INSERT INTO comments (
                comment_id, post_id, parent_comment_id, text, author_id, author_name,
                author_title, author_profile_url, author_profile_picture, like_count,
                reply_count, commented_at, extra_data
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                parent_comment_id = COALESCE(VALUES(parent_comment_id), parent_comment_id),
                text = COALESCE(VALUES(text), text),
                author_id = COALESCE(VALUES(author_id), author_id),
                author_name = COALESCE(VALUES(author_name), author_name),
                author_title = COALESCE(VALUES(author_title), author_title),
                author_profile_url = COALESCE(VALUES(author_profile_url), author_profile_url),
                author_profile_picture = COALESCE(VALUES(author_profile_picture), author_profile_picture),
                like_count = VALUES(like_count),
                reply_count = VALUES(reply_count),
                commented_at = COALESCE(VALUES(commented_at), commented_at),
                extra_data = COALESCE(VALUES(extra_data), extra_data)
            ",
        )
        .bind(&comment.comment_id)
        .bind(comment.post_id)
        .bind(comment.parent_comment_id)
        .bind(&comment.text)
        .bind(&comment.author_id)
        .bind(&comment.author_name)
        .bind(&comment.author_title)
        .bind(&comment.author_profile_url)
        .bind(&comment.author_profile_picture)
        .bind(comment.like_count)
        .bind(comment.reply_count)
        .bind(comment.commented_at)
        .bind(comment.extra_data.as_ref().map(Json))
        .execute(self.pool.inner())
        .await?;

        self.find_by_comment_id(&comment.comment_id)
            .await?
            .ok_or_else(|| {
                InsightsError::internal(format!(
                    "Comment {} vanished after upsert",
                    comment.comment_id
                ))
            })
    }
}
