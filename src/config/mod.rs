use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::TrackerError,
    storage::DEFAULT_STORAGE_KEY,
    utils::paths::{app_data_dir, config_file_in, write_atomic},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_storage_key")]
    pub storage_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
}

impl Config {
    fn default_storage_key() -> String {
        DEFAULT_STORAGE_KEY.into()
    }

    pub const KEYS: [&'static str; 4] = ["locale", "currency", "storage_key", "page_title"];

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "locale" => Some(self.locale.clone()),
            "currency" => Some(self.currency.clone()),
            "storage_key" => Some(self.storage_key.clone()),
            "page_title" => self.page_title.clone(),
            _ => None,
        }
    }

    /// Updates one setting by name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), TrackerError> {
        let value = value.trim();
        match key {
            "locale" => self.locale = value.to_string(),
            "currency" => self.currency = value.to_uppercase(),
            "storage_key" => {
                if value.is_empty() {
                    return Err(TrackerError::Config("storage_key must not be empty".into()));
                }
                self.storage_key = value.to_string();
            }
            "page_title" => {
                self.page_title = (!value.is_empty()).then(|| value.to_string());
            }
            other => {
                return Err(TrackerError::Config(format!(
                    "unknown setting `{}` (known: {})",
                    other,
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-IN".into(),
            currency: "INR".into(),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            page_title: None,
        }
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, TrackerError> {
        Self::with_base_dir(app_data_dir())
    }

    /// The directory is created on the first save.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, TrackerError> {
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config, TrackerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), TrackerError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_and_reload() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().join("home")).unwrap();
        let mut config = Config::default();
        config.set("currency", "usd").unwrap();
        config.set("locale", "en-US").unwrap();
        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.currency, "USD");
        assert_eq!(loaded.locale, "en-US");
        assert_eq!(loaded.storage_key, "transactions");
    }

    #[test]
    fn unknown_and_empty_settings_are_rejected() {
        let mut config = Config::default();
        assert!(config.set("theme", "dark").is_err());
        assert!(config.set("storage_key", "  ").is_err());
        config.set("page_title", "Home budget").unwrap();
        assert_eq!(config.get("page_title").as_deref(), Some("Home budget"));
    }
}
