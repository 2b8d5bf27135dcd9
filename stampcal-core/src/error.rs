//! Error types for stampcal.

use thiserror::Error;

/// Failures reported by a [`RemoteStore`](crate::remote::RemoteStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Document not found")]
    NotFound,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Input rejected before any remote call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a calendar title")]
    EmptyTitle,

    #[error("Please enter a stamp name")]
    EmptyStampName,

    #[error("Please select an emoji")]
    EmptyEmoji,

    #[error("'{0}' is not a color theme (expected #RRGGBB)")]
    UnknownTheme(String),

    #[error("Email and password are required")]
    EmptyCredentials,

    #[error("Passwords must be at least {0} characters long")]
    ShortPassword(usize),
}

/// Errors that can occur in stampcal operations.
#[derive(Error, Debug)]
pub enum StampcalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Remote store error: {0}")]
    Store(#[from] StoreError),

    #[error("Could not decode {collection} document: {message}")]
    Decode {
        collection: &'static str,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StampcalError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StampcalError::Store(StoreError::NotFound))
    }
}

/// Result type alias for stampcal operations.
pub type StampcalResult<T> = Result<T, StampcalError>;
