//! MySQL page repository implementation.

use super::{contains_pattern, paginated};
use crate::{DatabasePoolInterface, NewPage, PageFilter, PageRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use insights_core::{InsightsError, InsightsResult, Page, PageId, PageRequest, Paginated};
use serde_json::Value as JsonValue;
use shaku::Component;
use sqlx::types::Json;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// MySQL page repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = PageRepository)]
pub struct MySqlPageRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlPageRepository {
    /// Creates a new MySQL page repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

const PAGE_COLUMNS: &str = r"
    id, page_id, linkedin_id, name, url, profile_picture_url, profile_picture_s3_url,
    description, tagline, website, industry, company_size, headquarters, founded_year,
    company_type, follower_count, employee_count, specialties, locations, extra_data,
    created_at, updated_at, last_scraped_at
";

// `? IS NULL OR ...` lets one statement serve every filter combination.
const PAGE_FILTER: &str = r"
    (? IS NULL OR LOWER(name) LIKE ?)
    AND (? IS NULL OR LOWER(industry) LIKE ?)
    AND (? IS NULL OR follower_count >= ?)
    AND (? IS NULL OR follower_count <= ?)
";

/// Database row representation of a page.
#[derive(Debug, FromRow)]
struct PageRow {
    id: i64,
    page_id: String,
    linkedin_id: Option<String>,
    name: String,
    url: Option<String>,
    profile_picture_url: Option<String>,
    profile_picture_s3_url: Option<String>,
    description: Option<String>,
    tagline: Option<String>,
    website: Option<String>,
    industry: Option<String>,
    company_size: Option<String>,
    headquarters: Option<String>,
    founded_year: Option<i32>,
    company_type: Option<String>,
    follower_count: i64,
    employee_count: i64,
    specialties: Option<Json<Vec<String>>>,
    locations: Option<Json<Vec<JsonValue>>>,
    extra_data: Option<Json<JsonValue>>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    last_scraped_at: Option<DateTime<Utc>>,
}

impl From<PageRow> for Page {
    fn from(row: PageRow) -> Self {
        Page {
            id: PageId(row.id),
            page_id: row.page_id,
            linkedin_id: row.linkedin_id,
            name: row.name,
            url: row.url,
            profile_picture_url: row.profile_picture_url,
            profile_picture_s3_url: row.profile_picture_s3_url,
            description: row.description,
            tagline: row.tagline,
            website: row.website,
            industry: row.industry,
            company_size: row.company_size,
            headquarters: row.headquarters,
            founded_year: row.founded_year,
            company_type: row.company_type,
            follower_count: row.follower_count,
            employee_count: row.employee_count,
            specialties: row.specialties.map(|j| j.0),
            locations: row.locations.map(|j| j.0),
            extra_data: row.extra_data.map(|j| j.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_scraped_at: row.last_scraped_at,
        }
    }
}

#[async_trait]
impl PageRepository for MySqlPageRepository {
    async fn find_by_page_id(&self, page_id: &str) -> InsightsResult<Option<Page>> {
        debug!("Finding page by page_id: {}", page_id);

        let sql = format!("SELECT {PAGE_COLUMNS} FROM pages WHERE page_id = ?");
        let row = sqlx::query_as::<_, PageRow>(&sql)
            .bind(page_id)
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(Page::from))
    }

    async fn find_by_page_ids(&self, page_ids: &[String]) -> InsightsResult<Vec<Page>> {
        if page_ids.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Finding pages by page_ids: {:?}", page_ids);

        let placeholders = vec!["?"; page_ids.len()].join(", ");
        let sql = format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE page_id IN ({placeholders}) ORDER BY follower_count DESC"
        );
        let mut query = sqlx::query_as::<_, PageRow>(&sql);
        for page_id in page_ids {
            query = query.bind(page_id);
        }
        let rows = query.fetch_all(self.pool.inner()).await?;

        Ok(rows.into_iter().map(Page::from).collect())
    }

    async fn find_all(
        &self,
        filter: &PageFilter,
        page: PageRequest,
    ) -> InsightsResult<Paginated<Page>> {
        debug!(
            "Finding pages, filter: {:?}, page: {}, size: {}",
            filter, page.page, page.page_size
        );

        let name = filter.name.as_deref().map(contains_pattern);
        let industry = filter.industry.as_deref().map(contains_pattern);

        let count_sql = format!("SELECT COUNT(*) FROM pages WHERE {PAGE_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&name)
            .bind(&name)
            .bind(&industry)
            .bind(&industry)
            .bind(filter.min_followers)
            .bind(filter.min_followers)
            .bind(filter.max_followers)
            .bind(filter.max_followers)
            .fetch_one(self.pool.inner())
            .await?;

        let sql = format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE {PAGE_FILTER} \
             ORDER BY follower_count DESC, id ASC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, PageRow>(&sql)
            .bind(&name)
            .bind(&name)
            .bind(&industry)
            .bind(&industry)
            .bind(filter.min_followers)
            .bind(filter.min_followers)
            .bind(filter.max_followers)
            .bind(filter.max_followers)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool.inner())
            .await?;

        Ok(paginated(rows.into_iter().map(Page::from).collect(), page, total))
    }

    async fn upsert(&self, page: &NewPage) -> InsightsResult<Page> {
        debug!("Upserting page: {}", page.page_id);

        sqlx::query(
            r"
            INSERT INTO pages (
                page_id, linkedin_id, name, url, profile_picture_url, profile_picture_s3_url,
                description, tagline, website, industry, company_size, headquarters,
                founded_year, company_type, follower_count, employee_count,
                specialties, locations, extra_data, last_scraped_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, COALESCE(?, 0), COALESCE(?, 0), ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                page_id = VALUES(page_id),
                linkedin_id = COALESCE(VALUES(linkedin_id), linkedin_id),
                name = VALUES(name),
                url = COALESCE(VALUES(url), url),
                profile_picture_url = COALESCE(VALUES(profile_picture_url), profile_picture_url),
                profile_picture_s3_url = COALESCE(VALUES(profile_picture_s3_url), profile_picture_s3_url),
                description = COALESCE(VALUES(description), description),
                tagline = COALESCE(VALUES(tagline), tagline),
                website = COALESCE(VALUES(website), website),
                industry = COALESCE(VALUES(industry), industry),
                company_size = COALESCE(VALUES(company_size), company_size),
                headquarters = COALESCE(VALUES(headquarters), headquarters),
                founded_year = COALESCE(VALUES(founded_year), founded_year),
                company_type = COALESCE(VALUES(company_type), company_type),
                follower_count = COALESCE(?, follower_count),
                employee_count = COALESCE(?, employee_count),
                specialties = COALESCE(VALUES(specialties), specialties),
                locations = COALESCE(VALUES(locations), locations),
                extra_data = COALESCE(VALUES(extra_data), extra_data),
                last_scraped_at = VALUES(last_scraped_at)
            ",
        )
        .bind(&page.page_id)
        .bind(&page.linkedin_id)
        .bind(&page.name)
        .bind(&page.url)
        .bind(&page.profile_picture_url)
        .bind(&page.profile_picture_s3_url)
        .bind(&page.description)
        .bind(&page.tagline)
        .bind(&page.website)
        .bind(&page.industry)
        .bind(&page.company_size)
        .bind(&page.headquarters)
        .bind(page.founded_year)
        .bind(&page.company_type)
        .bind(page.follower_count)
        .bind(page.employee_count)
        .bind(page.specialties.as_ref().map(Json))
        .bind(page.locations.as_ref().map(Json))
        .bind(page.extra_data.as_ref().map(Json))
        .bind(Utc::now())
        .bind(page.follower_count)
        .bind(page.employee_count)
        .execute(self.pool.inner())
        .await?;

        self.find_by_page_id(&page.page_id)
            .await?
            .ok_or_else(|| InsightsError::internal(format!("Page {} vanished after upsert", page.page_id)))
    }

    async fn delete(&self, page_id: &str) -> InsightsResult<bool> {
        debug!("Deleting page: {}", page_id);

        let result = sqlx::query("DELETE FROM pages WHERE page_id = ?")
            .bind(page_id)
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
