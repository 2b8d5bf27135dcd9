//! Remote store configuration at ~/.config/stampcal/config.toml
//!
//! Every value can be overridden from the environment with a `STAMPCAL_`
//! prefix; nested keys use `__`, e.g. `STAMPCAL_COLLECTIONS__STAMPS`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{StampcalError, StampcalResult};
use crate::remote::Collection;

/// Collection ids for each kind of document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionIds {
    pub calendars: String,
    pub events: String,
    pub stamps: String,
}

impl CollectionIds {
    pub fn id_for(&self, collection: Collection) -> &str {
        match collection {
            Collection::Calendars => &self.calendars,
            Collection::Events => &self.events,
            Collection::Stamps => &self.stamps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base API url, e.g. `https://cloud.appwrite.io/v1`
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collections: CollectionIds,
}

impl StoreConfig {
    pub fn config_dir() -> StampcalResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| StampcalError::Config("Could not determine config directory".into()))?
            .join("stampcal"))
    }

    pub fn config_path() -> StampcalResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load from the default location, creating a commented template if
    /// the file does not exist yet.
    pub fn load() -> StampcalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (optional) overlaid with `STAMPCAL_*` variables.
    pub fn load_from(path: &Path) -> StampcalResult<Self> {
        let config: StoreConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("STAMPCAL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| StampcalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| {
                StampcalError::Config(format!("{e} (edit {} to set it)", path.display()))
            })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> StampcalResult<()> {
        let required = [
            ("endpoint", &self.endpoint),
            ("project_id", &self.project_id),
            ("database_id", &self.database_id),
            ("collections.calendars", &self.collections.calendars),
            ("collections.events", &self.collections.events),
            ("collections.stamps", &self.collections.stamps),
        ];

        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((key, _)) => Err(StampcalError::Config(format!("'{key}' must not be empty"))),
            None => Ok(()),
        }
    }

    /// Create a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> StampcalResult<()> {
        let contents = "\
# stampcal configuration

# Remote store API:
# endpoint = \"https://cloud.appwrite.io/v1\"
# project_id = \"\"
# database_id = \"\"

# [collections]
# calendars = \"\"
# events = \"\"
# stamps = \"\"
";

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StampcalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| StampcalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
endpoint = "https://store.example.com/v1"
project_id = "proj"
database_id = "db"

[collections]
calendars = "cal"
events = "evt"
stamps = "stp"
"#;

    #[test]
    fn loads_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, FULL).unwrap();

        let config = StoreConfig::load_from(&path).unwrap();

        assert_eq!(config.endpoint, "https://store.example.com/v1");
        assert_eq!(config.collections.id_for(Collection::Events), "evt");
        assert_eq!(config.collections.id_for(Collection::Stamps), "stp");
    }

    #[test]
    fn default_template_is_rejected_until_filled_in() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        StoreConfig::create_default_config(&path).unwrap();
        assert!(path.exists());

        let err = StoreConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, StampcalError::Config(_)));
    }

    #[test]
    fn blank_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, FULL.replace("\"db\"", "\"  \"")).unwrap();

        let err = StoreConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("database_id"));
    }
}
