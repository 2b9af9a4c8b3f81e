//! MySQL employee repository implementation.
//!
//! Followers and followed people share the `employees` table with actual
//! employees; the boolean flags tell them apart.

use super::paginated;
use crate::{DatabasePoolInterface, EmployeeRepository, NewEmployee};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use insights_core::{Employee, EmployeeId, InsightsError, InsightsResult, PageId, PageRequest, Paginated};
use serde_json::Value as JsonValue;
use shaku::Component;
use sqlx::types::Json;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// MySQL employee repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = EmployeeRepository)]
pub struct MySqlEmployeeRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlEmployeeRepository {
    /// Creates a new MySQL employee repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn count_where(&self, page_id: PageId, predicate: &str) -> InsightsResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM employees WHERE page_id = ? AND {predicate}");
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(page_id)
            .fetch_one(self.pool.inner())
            .await?;
        Ok(count)
    }

    async fn list_where(
        &self,
        page_id: PageId,
        predicate: &str,
        page: PageRequest,
    ) -> InsightsResult<Vec<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE page_id = ? AND {predicate} \
             ORDER BY id ASC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(page_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool.inner())
            .await?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }
}

const EMPLOYEE_COLUMNS: &str = r"
    id, linkedin_id, page_id, first_name, last_name, full_name, headline,
    profile_url, profile_picture_url, profile_picture_s3_url, current_title,
    current_company, location, country, industry, connections_count,
    is_following, is_follower, is_employee, experience_summary,
    education_summary, skills, extra_data, created_at, updated_at
";

#[derive(Debug, FromRow)]
struct EmployeeRow {
    id: i64,
    linkedin_id: String,
    page_id: i64,
    first_name: Option<String>,
    last_name: Option<String>,
    full_name: Option<String>,
    headline: Option<String>,
    profile_url: Option<String>,
    profile_picture_url: Option<String>,
    profile_picture_s3_url: Option<String>,
    current_title: Option<String>,
    current_company: Option<String>,
    location: Option<String>,
    country: Option<String>,
    industry: Option<String>,
    connections_count: Option<i64>,
    is_following: bool,
    is_follower: bool,
    is_employee: bool,
    experience_summary: Option<Json<JsonValue>>,
    education_summary: Option<Json<JsonValue>>,
    skills: Option<Json<Vec<String>>>,
    extra_data: Option<Json<JsonValue>>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: EmployeeId(row.id),
            linkedin_id: row.linkedin_id,
            page_id: PageId(row.page_id),
            first_name: row.first_name,
            last_name: row.last_name,
            full_name: row.full_name,
            headline: row.headline,
            profile_url: row.profile_url,
            profile_picture_url: row.profile_picture_url,
            profile_picture_s3_url: row.profile_picture_s3_url,
            current_title: row.current_title,
            current_company: row.current_company,
            location: row.location,
            country: row.country,
            industry: row.industry,
            connections_count: row.connections_count,
            is_following: row.is_following,
            is_follower: row.is_follower,
            is_employee: row.is_employee,
            experience_summary: row.experience_summary.map(|j| j.0),
            education_summary: row.education_summary.map(|j| j.0),
            skills: row.skills.map(|j| j.0),
            extra_data: row.extra_data.map(|j| j.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl EmployeeRepository for MySqlEmployeeRepository {
    async fn find_by_page(
        &self,
        page_id: PageId,
        page: PageRequest,
    ) -> InsightsResult<Paginated<Employee>> {
        debug!(
            "Finding employees for page {}, page: {}, size: {}",
            page_id, page.page, page.page_size
        );

        let total = self.count_by_page(page_id).await?;
        let items = self.list_where(page_id, "TRUE", page).await?;

        Ok(paginated(items, page, total))
    }

    async fn find_limited_by_page(
        &self,
        page_id: PageId,
        limit: u32,
    ) -> InsightsResult<Vec<Employee>> {
        self.list_where(page_id, "TRUE", PageRequest::new(1, limit)).await
    }

    async fn find_followers(
        &self,
        page_id: PageId,
        page: PageRequest,
    ) -> InsightsResult<Vec<Employee>> {
        debug!("Finding followers for page {}", page_id);
        self.list_where(page_id, "is_follower = TRUE", page).await
    }

    async fn find_following(
        &self,
        page_id: PageId,
        page: PageRequest,
    ) -> InsightsResult<Vec<Employee>> {
        debug!("Finding followed people for page {}", page_id);
        self.list_where(page_id, "is_following = TRUE", page).await
    }

    async fn count_by_page(&self, page_id: PageId) -> InsightsResult<i64> {
        self.count_where(page_id, "TRUE").await
    }

    async fn count_followers(&self, page_id: PageId) -> InsightsResult<i64> {
        self.count_where(page_id, "is_follower = TRUE").await
    }

    async fn count_following(&self, page_id: PageId) -> InsightsResult<i64> {
        self.count_where(page_id, "is_following = TRUE").await
    }

    async fn upsert(&self, employee: &NewEmployee) -> InsightsResult<Employee> {
        debug!("Upserting employee: {}", employee.linkedin_id);

        sqlx::query(
            r"
            INSERT INTO employees (
                linkedin_id, page_id, first_name, last_name, full_name, headline,
                profile_url, profile_picture_url, profile_picture_s3_url, current_title,
                current_company, location, country, industry, connections_count,
                is_following, is_follower, is_employee, experience_summary,
                education_summary, skills, extra_data
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                page_id = VALUES(page_id),
                first_name = COALESCE(VALUES(first_name), first_name),
                last_name = COALESCE(VALUES(last_name), last_name),
                full_name = COALESCE(VALUES(full_name), full_name),
                headline = COALESCE(VALUES(headline), headline),
                profile_url = COALESCE(VALUES(profile_url), profile_url),
                profile_picture_url = COALESCE(VALUES(profile_picture_url), profile_picture_url),
                profile_picture_s3_url = COALESCE(VALUES(profile_picture_s3_url), profile_picture_s3_url),
                current_title = COALESCE(VALUES(current_title), current_title),
                current_company = COALESCE(VALUES(current_company), current_company),
                location = COALESCE(VALUES(location), location),
                country = COALESCE(VALUES(country), country),
                industry = COALESCE(VALUES(industry), industry),
                connections_count = COALESCE(VALUES(connections_count), connections_count),
                is_following = is_following OR VALUES(is_following),
                is_follower = is_follower OR VALUES(is_follower),
                is_employee = is_employee OR VALUES(is_employee),
                experience_summary = COALESCE(VALUES(experience_summary), experience_summary),
                education_summary = COALESCE(VALUES(education_summary), education_summary),
                skills = COALESCE(VALUES(skills), skills),
                extra_data = COALESCE(VALUES(extra_data), extra_data)
            ",
        )
        .bind(&employee.linkedin_id)
        .bind(employee.page_id)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.full_name)
        .bind(&employee.headline)
        .bind(&employee.profile_url)
        .bind(&employee.profile_picture_url)
        .bind(&employee.profile_picture_s3_url)
        .bind(&employee.current_title)
        .bind(&employee.current_company)
        .bind(&employee.location)
        .bind(&employee.country)
        .bind(&employee.industry)
        .bind(employee.connections_count)
        .bind(employee.is_following)
        .bind(employee.is_follower)
        .bind(employee.is_employee)
        .bind(employee.experience_summary.as_ref().map(Json))
        .bind(employee.education_summary.as_ref().map(Json))
        .bind(employee.skills.as_ref().map(Json))
        .bind(employee.extra_data.as_ref().map(Json))
        .execute(self.pool.inner())
        .await?;

        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE linkedin_id = ?");
        let row = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(&employee.linkedin_id)
            .fetch_optional(self.pool.inner())
            .await?;

        row.map(Employee::from).ok_or_else(|| {
            InsightsError::internal(format!(
                "Employee {} vanished after upsert",
                employee.linkedin_id
            ))
        })
    }
}
