//! Comment entity.

use crate::{CommentId, PostId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A comment on a post. Replies point at their parent through
/// `parent_comment_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
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
    pub extra_data: Option<JsonValue>,
}

impl Comment {
    /// Returns true if this comment answers another comment.
    #[must_use]
    pub const fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }
}
