//! Field validation shared by registration and the project/task/comment inputs.
//!
//! Every check returns [`CoreError::Validation`] naming the offending field.

use validator::ValidateEmail;

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length of a username.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum length of an email address.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length of a project name or task title.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length of a comment body.
pub const MAX_COMMENT_LENGTH: usize = 10_000;

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Reject missing (empty or whitespace-only) values.
pub fn validate_required(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("Field '{field}' is required")));
    }
    Ok(())
}

/// Usernames: letters, digits and `@ . + - _`, at most 150 characters.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    validate_required("username", username)?;
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Username exceeds maximum length of {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(CoreError::Validation(format!(
            "Invalid username '{username}'. Only letters, digits and @ . + - _ are allowed"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    validate_required("email", email)?;
    if email.len() > MAX_EMAIL_LENGTH || !email.validate_email() {
        return Err(CoreError::Validation(format!(
            "Invalid email address '{email}'"
        )));
    }
    Ok(())
}

fn validate_bounded(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    validate_required(field, value)?;
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "Field '{field}' exceeds maximum length of {max} characters"
        )));
    }
    Ok(())
}

/// Project names are required and at most 255 characters.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    validate_bounded("name", name, MAX_NAME_LENGTH)
}

/// Task titles are required and at most 255 characters.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    validate_bounded("title", title, MAX_NAME_LENGTH)
}

pub fn validate_comment_text(text: &str) -> Result<(), CoreError> {
    validate_bounded("text", text, MAX_COMMENT_LENGTH)
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank() {
        assert!(validate_required("username", "alice").is_ok());
        let err = validate_required("username", "   ").unwrap_err();
        assert!(err.to_string().contains("'username' is required"));
    }

    #[test]
    fn username_charset() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a.l+i-c_e@x").is_ok());
        assert!(validate_username("alice smith").is_err());
        assert!(validate_username("alice/../").is_err());
        assert!(validate_username(&"a".repeat(151)).is_err());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@").is_err());
    }

    #[test]
    fn name_and_title_bounds() {
        assert!(validate_name("P1").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_title(&"t".repeat(255)).is_ok());
        assert!(validate_title(&"t".repeat(256)).is_err());
    }

    #[test]
    fn comment_text_bounds() {
        assert!(validate_comment_text("looks good").is_ok());
        assert!(validate_comment_text(" ").is_err());
        assert!(validate_comment_text(&"x".repeat(MAX_COMMENT_LENGTH + 1)).is_err());
    }
}
