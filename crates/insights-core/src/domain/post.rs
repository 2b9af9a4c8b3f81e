//! Post entity.

use crate::{PageId, PostId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A post published by a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    /// External identifier, e.g. `urn:li:ugcPost:123`.
    pub post_id: String,
    pub page_id: PageId,

    pub text: Option<String>,
    /// `text`, `image`, `video`, `article`, ...
    pub content_type: Option<String>,
    pub media_url: Option<String>,
    pub media_s3_url: Option<String>,
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
    pub extra_data: Option<JsonValue>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Media URL shown to clients. The S3 mirror wins when present.
    #[must_use]
    pub fn display_media_url(&self) -> Option<&str> {
        self.media_s3_url.as_deref().or(self.media_url.as_deref())
    }
}
