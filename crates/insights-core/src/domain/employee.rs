//! Employee entity.

use crate::{EmployeeId, PageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A person associated with a page: employee, follower or followed account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub linkedin_id: String,
    pub page_id: PageId,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub headline: Option<String>,

    pub profile_url: Option<String>,
    pub profile_picture_url: Option<String>,
    pub profile_picture_s3_url: Option<String>,

    pub current_title: Option<String>,
    pub current_company: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub industry: Option<String>,
    pub connections_count: Option<i64>,

    pub is_following: bool,
    pub is_follower: bool,
    pub is_employee: bool,

    pub experience_summary: Option<JsonValue>,
    pub education_summary: Option<JsonValue>,
    pub skills: Option<Vec<String>>,
    pub extra_data: Option<JsonValue>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Employee {
    /// Picture URL shown to clients. The S3 mirror wins when present.
    #[must_use]
    pub fn display_picture_url(&self) -> Option<&str> {
        self.profile_picture_s3_url
            .as_deref()
            .or(self.profile_picture_url.as_deref())
    }

    /// Joins first and last name with a single space and trims the result.
    ///
    /// Returns `None` when both parts are missing or blank.
    #[must_use]
    pub fn compose_full_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
        let joined = format!("{} {}", first.unwrap_or(""), last.unwrap_or(""));
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
