//! Page entity.

use crate::PageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A company page ingested from the source API.
///
/// `page_id` is the public URL slug (for example `deepsolv`) and is what every
/// API path addresses. `id` is the surrogate key children reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub page_id: String,
    pub linkedin_id: Option<String>,

    pub name: String,
    pub url: Option<String>,
    pub profile_picture_url: Option<String>,
    pub profile_picture_s3_url: Option<String>,
    pub description: Option<String>,
    pub tagline: Option<String>,

    pub website: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub headquarters: Option<String>,
    pub founded_year: Option<i32>,
    pub company_type: Option<String>,

    pub follower_count: i64,
    pub employee_count: i64,

    pub specialties: Option<Vec<String>>,
    pub locations: Option<Vec<JsonValue>>,
    pub extra_data: Option<JsonValue>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_scraped_at: Option<DateTime<Utc>>,
}

impl Page {
    /// Picture URL shown to clients. The S3 mirror wins when present.
    #[must_use]
    pub fn display_picture_url(&self) -> Option<&str> {
        self.profile_picture_s3_url
            .as_deref()
            .or(self.profile_picture_url.as_deref())
    }

    /// Industry for prose, falling back to the generic word "company".
    #[must_use]
    pub fn industry_or_default(&self) -> &str {
        self.industry.as_deref().unwrap_or("company")
    }
}

#[cfg(test)]
pub(crate) fn sample_page(slug: &str) -> Page {
    Page {
        id: PageId(1),
        page_id: slug.to_string(),
        linkedin_id: Some("1234".to_string()),
        name: "Acme".to_string(),
        url: Some(format!("https://www.linkedin.com/company/{slug}")),
        profile_picture_url: None,
        profile_picture_s3_url: None,
        description: None,
        tagline: None,
        website: None,
        industry: None,
        company_size: None,
        headquarters: None,
        founded_year: None,
        company_type: None,
        follower_count: 0,
        employee_count: 0,
        specialties: None,
        locations: None,
        extra_data: None,
        created_at: Utc::now(),
        updated_at: None,
        last_scraped_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_picture_prefers_mirror() {
        let mut page = sample_page("acme");
        assert_eq!(page.display_picture_url(), None);

        page.profile_picture_url = Some("https://media.licdn.com/logo.png".to_string());
        assert_eq!(page.display_picture_url(), Some("https://media.licdn.com/logo.png"));

        page.profile_picture_s3_url = Some("https://bucket.s3.amazonaws.com/logo.png".to_string());
        assert_eq!(page.display_picture_url(), Some("https://bucket.s3.amazonaws.com/logo.png"));
    }

    #[test]
    fn test_industry_or_default() {
        let mut page = sample_page("acme");
        assert_eq!(page.industry_or_default(), "company");
        page.industry = Some("Software Development".to_string());
        assert_eq!(page.industry_or_default(), "Software Development");
    }
}
