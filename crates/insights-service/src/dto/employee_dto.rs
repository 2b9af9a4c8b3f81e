//! Employee DTOs.

use chrono::{DateTime, Utc};
use insights_core::{Employee, EmployeeId, PageId};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// A person associated with a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponse {
    pub id: EmployeeId,
    pub linkedin_id: String,
    pub page_id: PageId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub profile_url: Option<String>,
    /// Mirrored copy when one exists, otherwise the source URL.
    pub profile_picture_url: Option<String>,
    pub current_title: Option<String>,
    pub current_company: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub industry: Option<String>,
    pub connections_count: Option<i64>,
    pub is_following: bool,
    pub is_follower: bool,
    pub is_employee: bool,
    #[schema(value_type = Option<Object>)]
    pub experience_summary: Option<JsonValue>,
    #[schema(value_type = Option<Object>)]
    pub education_summary: Option<JsonValue>,
    pub skills: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            profile_picture_url: employee.display_picture_url().map(str::to_string),
            id: employee.id,
            linkedin_id: employee.linkedin_id,
            page_id: employee.page_id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            full_name: employee.full_name,
            headline: employee.headline,
            profile_url: employee.profile_url,
            current_title: employee.current_title,
            current_company: employee.current_company,
            location: employee.location,
            country: employee.country,
            industry: employee.industry,
            connections_count: employee.connections_count,
            is_following: employee.is_following,
            is_follower: employee.is_follower,
            is_employee: employee.is_employee,
            experience_summary: employee.experience_summary,
            education_summary: employee.education_summary,
            skills: employee.skills,
            created_at: employee.created_at,
        }
    }
}
