//! Post and comment DTOs.

use chrono::{DateTime, Utc};
use insights_core::{Comment, CommentId, PageId, Post, PostId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Post response DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: PostId,
    pub post_id: String,
    pub page_id: PageId,
    pub text: Option<String>,
    pub content_type: Option<String>,
    /// Mirrored copy when one exists, otherwise the source URL.
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub share_count: i64,
    pub view_count: i64,
    pub posted_at: Option<DateTime<Utc>>,
    pub author_name: Option<String>,
    pub author_title: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub mentions: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            media_url: post.display_media_url().map(str::to_string),
            id: post.id,
            post_id: post.post_id,
            page_id: post.page_id,
            text: post.text,
            content_type: post.content_type,
            media_type: post.media_type,
            like_count: post.like_count,
            comment_count: post.comment_count,
            share_count: post.share_count,
            view_count: post.view_count,
            posted_at: post.posted_at,
            author_name: post.author_name,
            author_title: post.author_title,
            hashtags: post.hashtags,
            mentions: post.mentions,
            created_at: post.created_at,
        }
    }
}

/// Comment response DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub id: CommentId,
    pub comment_id: String,
    pub post_id: PostId,
    pub parent_comment_id: Option<CommentId>,
    pub text: Option<String>,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub author_title: Option<String>,
    pub author_profile_url: Option<String>,
    pub author_profile_picture: Option<String>,
    pub like_count: i64,
    pub reply_count: i64,
    pub commented_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            comment_id: comment.comment_id,
            post_id: comment.post_id,
            parent_comment_id: comment.parent_comment_id,
            text: comment.text,
            author_id: comment.author_id,
            author_name: comment.author_name,
            author_title: comment.author_title,
            author_profile_url: comment.author_profile_url,
            author_profile_picture: comment.author_profile_picture,
            like_count: comment.like_count,
            reply_count: comment.reply_count,
            commented_at: comment.commented_at,
            created_at: comment.created_at,
        }
    }
}

/// A post together with its newest comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

/// Newest posts of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecentPostsResponse {
    pub page_id: String,
    pub page_name: String,
    pub posts: Vec<PostResponse>,
    pub count: usize,
}
