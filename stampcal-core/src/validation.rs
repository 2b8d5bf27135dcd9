//! Input checks applied before anything is sent to the remote store.

use crate::error::ValidationError;

pub const DEFAULT_STAMP_EMOJI: &str = "📅";

/// Shortest password accepted when creating an account.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Trimmed, non-empty calendar title.
pub fn calendar_title(title: &str) -> Result<&str, ValidationError> {
    non_empty(title).ok_or(ValidationError::EmptyTitle)
}

/// Trimmed, non-empty stamp name and emoji.
pub fn stamp<'a>(name: &'a str, emoji: &'a str) -> Result<(&'a str, &'a str), ValidationError> {
    let name = non_empty(name).ok_or(ValidationError::EmptyStampName)?;
    let emoji = non_empty(emoji).ok_or(ValidationError::EmptyEmoji)?;
    Ok((name, emoji))
}

/// Email is trimmed; the password is kept as typed but must not be blank.
pub fn credentials<'a>(
    email: &'a str,
    password: &'a str,
) -> Result<(&'a str, &'a str), ValidationError> {
    let email = non_empty(email).ok_or(ValidationError::EmptyCredentials)?;
    if password.trim().is_empty() {
        return Err(ValidationError::EmptyCredentials);
    }
    Ok((email, password))
}

/// Credentials for a new account: as [`credentials`], and the password
/// must be at least [`MIN_PASSWORD_LEN`] characters.
pub fn new_credentials<'a>(
    email: &'a str,
    password: &'a str,
) -> Result<(&'a str, &'a str), ValidationError> {
    let (email, password) = credentials(email, password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::ShortPassword(MIN_PASSWORD_LEN));
    }
    Ok((email, password))
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
