//! Normalization of user-authored text

use blog_core::DomainError;

/// Trim `raw` and check it against a character limit
///
/// Empty after trimming is a validation error; lengths count characters,
/// not bytes.
pub fn normalize(raw: &str, field: &str, max: usize) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::ValidationError(format!("{field} is required")));
    }
    if trimmed.chars().count() > max {
        return Err(DomainError::ContentTooLong { max });
    }
    Ok(trimmed.to_string())
}
