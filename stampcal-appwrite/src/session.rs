//! Session cookie kept between runs at ~/.config/stampcal/session.toml

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stampcal_core::config::StoreConfig;
use stampcal_core::error::{StampcalError, StampcalResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Raw `X-Fallback-Cookies` value returned when the session was created.
    pub cookie: String,
    pub created_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(cookie: &str) -> Self {
        StoredSession {
            cookie: cookie.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn default_path() -> StampcalResult<PathBuf> {
        Ok(StoreConfig::config_dir()?.join("session.toml"))
    }

    pub fn load(path: &Path) -> StampcalResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let session = toml::from_str(&content)
            .map_err(|e| StampcalError::Config(format!("Invalid session file: {e}")))?;
        Ok(Some(session))
    }

    pub fn save(&self, path: &Path) -> StampcalResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| StampcalError::Config(e.to_string()))?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path)?;

        // `mode` only applies on creation; tighten a file left by older runs.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(content.as_bytes())?;
        Ok(())
    }

    pub fn clear(path: &Path) -> StampcalResult<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");

        assert_eq!(StoredSession::load(&path).unwrap(), None);
        StoredSession::clear(&path).unwrap();
    }

    #[test]
    fn saved_session_is_loaded_back_then_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stampcal").join("session.toml");
        let session = StoredSession::new(r#"{"a_session_proj":"secret"}"#);

        session.save(&path).unwrap();
        assert_eq!(StoredSession::load(&path).unwrap(), Some(session));

        StoredSession::clear(&path).unwrap();
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private_to_the_user() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "stale").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        StoredSession::new("cookie").save(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(
            StoredSession::load(&path).unwrap().map(|s| s.cookie).as_deref(),
            Some("cookie")
        );
    }
}
