//! Validation utilities.

use crate::FieldError;
use validator::ValidationErrors;

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect();
    // HashMap iteration order is unstable; keep responses deterministic.
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates a page slug: 1 to 255 chars of letters, digits, `-` or `_`.
    pub fn valid_page_slug(slug: &str) -> Result<(), ValidationError> {
        if slug.is_empty() || slug.len() > 255 {
            return Err(ValidationError::new("page_id_length"));
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::new("page_id_invalid_characters"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Query {
        #[validate(range(min = 1, message = "must be at least 1"))]
        page: u32,
        #[validate(range(min = 1, max = 25))]
        page_size: u32,
    }

    #[test]
    fn test_valid_page_slug() {
        assert!(valid_page_slug("deepsolv").is_ok());
        assert!(valid_page_slug("acme-corp_2").is_ok());
        assert!(valid_page_slug("").is_err());
        assert!(valid_page_slug("acme corp").is_err());
        assert!(valid_page_slug("../etc").is_err());
    }

    #[test]
    fn test_field_errors_are_sorted_and_carry_messages() {
        let query = Query { page: 0, page_size: 99 };
        let errors = query.validate().unwrap_err();
        let fields = field_errors(&errors);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field, "page");
        assert_eq!(fields[0].message, "must be at least 1");
        assert_eq!(fields[1].field, "page_size");
        assert_eq!(fields[1].code, "range");
    }
}
