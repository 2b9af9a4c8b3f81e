//! Validated query and path extractors.
//!
//! `ValidatedQuery<T>` deserializes the query string and validates it using
//! the `validator` crate. Validation errors are returned as 422 Unprocessable
//! Entity with field-level error details.

use crate::responses::error_response;
use axum::{
    async_trait,
    extract::{rejection::PathRejection, rejection::QueryRejection, FromRequestParts, Path, Query},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use insights_core::{field_errors, rules::valid_page_slug, ErrorResponse};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// Query extractor that validates the deserialized value.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct RecentQuery {
///     #[validate(range(min = 1, max = 25))]
///     limit: u32,
/// }
///
/// async fn recent(ValidatedQuery(query): ValidatedQuery<RecentQuery>) {
///     // query.limit is within 1..=25 here
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T> std::ops::Deref for ValidatedQuery<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated query extraction.
#[derive(Debug)]
pub enum ValidatedQueryRejection {
    /// The query string could not be deserialized.
    QueryError(QueryRejection),
    /// Validation error with field-level details.
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedQueryRejection {
    fn into_response(self) -> Response {
        match self {
            Self::QueryError(rejection) => error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    code: "INVALID_QUERY".to_string(),
                    message: format!("Invalid query parameters: {rejection}"),
                    details: None,
                },
            ),
            Self::ValidationError(errors) => error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    code: "VALIDATION_ERROR".to_string(),
                    message: "Request validation failed".to_string(),
                    details: Some(field_errors(&errors)),
                },
            ),
        }
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedQueryRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(ValidatedQueryRejection::QueryError)?;

        value
            .validate()
            .map_err(ValidatedQueryRejection::ValidationError)?;

        Ok(ValidatedQuery(value))
    }
}

/// The `{page_id}` path segment, checked to be a well-formed page slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlug(pub String);

/// Rejection type for [`PageSlug`].
#[derive(Debug)]
pub enum PageSlugRejection {
    Path(PathRejection),
    Invalid(String),
}

impl IntoResponse for PageSlugRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Path(rejection) => rejection.into_response(),
            Self::Invalid(code) => error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    code: "VALIDATION_ERROR".to_string(),
                    message: format!("Invalid page id: {code}"),
                    details: None,
                },
            ),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PageSlug
where
    S: Send + Sync,
{
    type Rejection = PageSlugRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(slug) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(PageSlugRejection::Path)?;

        valid_page_slug(&slug).map_err(|e| PageSlugRejection::Invalid(e.code.to_string()))?;
        Ok(PageSlug(slug))
    }
}
