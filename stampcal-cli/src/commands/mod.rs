pub mod auth;
pub mod calendars;
pub mod event;
pub mod show;
pub mod stamp;
pub mod stamps;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use stampcal_appwrite::{AppwriteStore, StoredSession};
use stampcal_core::config::StoreConfig;
use stampcal_core::{CalendarSummary, EventStamp, Session, StampcalError};

/// Store handle plus where its session cookie is kept between runs.
pub struct Context {
    store: Arc<AppwriteStore>,
    session_path: PathBuf,
}

impl Context {
    pub fn load() -> Result<Self> {
        let store = AppwriteStore::new(StoreConfig::load()?)?;
        let session_path = StoredSession::default_path()?;

        if let Some(stored) = StoredSession::load(&session_path)? {
            store.restore_session(Some(stored.cookie));
        }

        Ok(Context {
            store: Arc::new(store),
            session_path,
        })
    }

    pub fn store(&self) -> Arc<AppwriteStore> {
        Arc::clone(&self.store)
    }

    /// Resume the stored session.
    pub async fn session(&self) -> Result<Session> {
        match Session::resume(self.store()).await {
            Ok(session) => Ok(session),
            Err(StampcalError::NotSignedIn) => anyhow::bail!(
                "Not signed in.\n\n\
                Sign in with:\n  \
                stampcal login\n\n\
                Or create an account with:\n  \
                stampcal signup"
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the store's current cookie, or remove the file if there is none.
    pub fn save_session(&self) -> Result<()> {
        match self.store.session_cookie() {
            Some(cookie) => StoredSession::new(&cookie).save(&self.session_path)?,
            None => StoredSession::clear(&self.session_path)?,
        }
        Ok(())
    }

    /// Drop the cookie locally without contacting the store.
    pub fn forget_session(&self) -> Result<()> {
        self.store.restore_session(None);
        self.save_session()
    }
}

/// Find a calendar by id or by title (case-insensitive).
pub fn find_calendar<'a>(
    calendars: &'a [CalendarSummary],
    key: &str,
) -> Result<&'a CalendarSummary> {
    calendars
        .iter()
        .find(|c| c.id == key)
        .or_else(|| calendars.iter().find(|c| c.title.eq_ignore_ascii_case(key.trim())))
        .ok_or_else(|| {
            let available: Vec<_> = calendars.iter().map(|c| c.title.as_str()).collect();
            if available.is_empty() {
                anyhow::anyhow!(
                    "Calendar '{}' not found. Create one with:\n  stampcal new-calendar",
                    key
                )
            } else {
                anyhow::anyhow!(
                    "Calendar '{}' not found. Available: {}",
                    key,
                    available.join(", ")
                )
            }
        })
}

/// Find a stamp by id, name (case-insensitive) or emoji.
pub fn find_stamp<'a>(stamps: &'a [EventStamp], key: &str) -> Result<&'a EventStamp> {
    let key = key.trim();
    stamps
        .iter()
        .find(|s| s.id == key)
        .or_else(|| stamps.iter().find(|s| s.name.eq_ignore_ascii_case(key)))
        .or_else(|| stamps.iter().find(|s| s.emoji == key))
        .ok_or_else(|| {
            let available: Vec<_> = stamps
                .iter()
                .map(|s| format!("{} {}", s.emoji, s.name))
                .collect();
            if available.is_empty() {
                anyhow::anyhow!(
                    "Stamp '{}' not found. Create one with:\n  \
                    stampcal new-stamp <name> --emoji <emoji>",
                    key
                )
            } else {
                anyhow::anyhow!(
                    "Stamp '{}' not found. Available: {}",
                    key,
                    available.join(", ")
                )
            }
        })
}
