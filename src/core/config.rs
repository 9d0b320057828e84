/*
 * Manages persisted application settings: the search settings (file patterns,
 * depth guard, fallback text encoding, progress batch size) stored as JSON, and
 * the last site directory the user opened, stored as plain text.
 *
 * A trait (`ConfigManagerOperations`) abstracts the storage so callers can be
 * tested with other backends. `CoreConfigManager` stores files in the directory
 * given by `path_utils::get_base_app_config_local_dir`, or in an explicit
 * directory when constructed with `with_config_dir`.
 */
use crate::core::path_utils;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SEARCH_SETTINGS_FILENAME: &str = "search_settings.json";
const LAST_SITE_DIR_FILENAME: &str = "last_site_dir.txt";

pub const DEFAULT_FILE_PATTERNS: [&str; 2] = ["*.html", "*.htm"];
pub const DEFAULT_MAX_DEPTH: usize = 64;
pub const DEFAULT_FALLBACK_ENCODING: &str = "windows-1252";
pub const DEFAULT_PROGRESS_BATCH_SIZE: usize = 16;

/*
 * Tunables for the site search engine. Missing fields in a stored file take
 * their default values, so older settings files keep loading.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub file_patterns: Vec<String>,
    pub max_depth: usize,
    pub fallback_encoding: String,
    pub progress_batch_size: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            file_patterns: DEFAULT_FILE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
            fallback_encoding: DEFAULT_FALLBACK_ENCODING.to_string(),
            progress_batch_size: DEFAULT_PROGRESS_BATCH_SIZE,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Json(serde_json::Error),
    NoProjectDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Json(e) => write!(f, "Configuration JSON error: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine directory for configuration")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub trait ConfigManagerOperations: Send + Sync {
    fn load_search_settings(&self, app_name: &str) -> Result<SearchSettings>;
    fn save_search_settings(&self, app_name: &str, settings: &SearchSettings) -> Result<()>;
    fn load_last_site_dir(&self, app_name: &str) -> Result<Option<PathBuf>>;
    fn save_last_site_dir(&self, app_name: &str, site_dir: Option<&Path>) -> Result<()>;
}

pub struct CoreConfigManager {
    config_dir_override: Option<PathBuf>,
}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {
            config_dir_override: None,
        }
    }

    /*
     * Stores all configuration files in `config_dir` instead of the platform
     * config location. The directory is created on first save.
     */
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        CoreConfigManager {
            config_dir_override: Some(config_dir),
        }
    }

    fn config_dir(&self, app_name: &str) -> Result<PathBuf> {
        match &self.config_dir_override {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                Ok(dir.clone())
            }
            None => path_utils::get_base_app_config_local_dir(app_name)
                .ok_or(ConfigError::NoProjectDirectory),
        }
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    /*
     * Loads the search settings for `app_name`. A missing settings file is not an
     * error: defaults are returned so a fresh installation works out of the box.
     */
    fn load_search_settings(&self, app_name: &str) -> Result<SearchSettings> {
        let file_path = self.config_dir(app_name)?.join(SEARCH_SETTINGS_FILENAME);
        if !file_path.exists() {
            log::debug!("CoreConfigManager: {file_path:?} does not exist, using default settings.");
            return Ok(SearchSettings::default());
        }

        let contents = fs::read_to_string(&file_path)?;
        let settings: SearchSettings = serde_json::from_str(&contents)?;
        log::debug!("CoreConfigManager: Loaded search settings from {file_path:?}: {settings:?}");
        Ok(settings)
    }

    fn save_search_settings(&self, app_name: &str, settings: &SearchSettings) -> Result<()> {
        let file_path = self.config_dir(app_name)?.join(SEARCH_SETTINGS_FILENAME);
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&file_path, json)?;
        log::debug!("CoreConfigManager: Saved search settings to {file_path:?}.");
        Ok(())
    }

    /*
     * Loads the site directory remembered from a previous session.
     * Returns `Ok(None)` if nothing was stored or the stored value is blank.
     */
    fn load_last_site_dir(&self, app_name: &str) -> Result<Option<PathBuf>> {
        log::trace!("CoreConfigManager: Loading last site dir for app '{app_name}'");
        let file_path = self.config_dir(app_name)?.join(LAST_SITE_DIR_FILENAME);

        if !file_path.exists() {
            log::debug!("CoreConfigManager: Last site dir file {file_path:?} does not exist.");
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path)?;
        let path_text = contents.trim();
        if path_text.is_empty() {
            log::debug!("CoreConfigManager: Last site dir file {file_path:?} is empty.");
            Ok(None)
        } else {
            log::debug!("CoreConfigManager: Loaded last site dir '{path_text}' from {file_path:?}.");
            Ok(Some(PathBuf::from(path_text)))
        }
    }

    /*
     * Saves the site directory for the next session. Passing `None` clears it.
     */
    fn save_last_site_dir(&self, app_name: &str, site_dir: Option<&Path>) -> Result<()> {
        let file_path = self.config_dir(app_name)?.join(LAST_SITE_DIR_FILENAME);
        let contents = site_dir
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        fs::write(&file_path, contents)?;
        log::debug!("CoreConfigManager: Saved last site dir {site_dir:?} to {file_path:?}.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const APP_NAME: &str = "AnyApp";

    #[test]
    fn test_load_search_settings_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());

        let settings = manager.load_search_settings(APP_NAME).unwrap();

        assert_eq!(settings, SearchSettings::default());
        assert_eq!(settings.file_patterns, vec!["*.html", "*.htm"]);
    }

    #[test]
    fn test_save_and_load_search_settings() {
        let dir = tempdir().unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());
        let settings = SearchSettings {
            file_patterns: vec!["*.xhtml".to_string()],
            max_depth: 3,
            fallback_encoding: "utf-16le".to_string(),
            progress_batch_size: 2,
        };

        manager.save_search_settings(APP_NAME, &settings).unwrap();
        let loaded = manager.load_search_settings(APP_NAME).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_settings_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(SEARCH_SETTINGS_FILENAME),
            r#"{ "max_depth": 5 }"#,
        )
        .unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());

        let loaded = manager.load_search_settings(APP_NAME).unwrap();

        assert_eq!(loaded.max_depth, 5);
        assert_eq!(loaded.fallback_encoding, DEFAULT_FALLBACK_ENCODING);
        assert_eq!(loaded.progress_batch_size, DEFAULT_PROGRESS_BATCH_SIZE);
    }

    #[test]
    fn test_malformed_settings_file_is_json_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SEARCH_SETTINGS_FILENAME), "{ not json").unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());

        let result = manager.load_search_settings(APP_NAME);

        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_last_site_dir_round_trip_and_clear() {
        let dir = tempdir().unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());
        let site = PathBuf::from("/tmp/my_site");

        assert_eq!(manager.load_last_site_dir(APP_NAME).unwrap(), None);

        manager.save_last_site_dir(APP_NAME, Some(&site)).unwrap();
        assert_eq!(manager.load_last_site_dir(APP_NAME).unwrap(), Some(site));

        manager.save_last_site_dir(APP_NAME, None).unwrap();
        assert_eq!(manager.load_last_site_dir(APP_NAME).unwrap(), None);
    }

    #[test]
    fn test_core_config_manager_uses_platform_dir() {
        let unique_app_name = format!("TestApp_SiteSearchConfig_{}", rand::random::<u64>());
        let manager = CoreConfigManager::new();
        let site = PathBuf::from(format!("/tmp/{unique_app_name}"));

        manager
            .save_last_site_dir(&unique_app_name, Some(&site))
            .expect("Saving last site dir should succeed.");
        let loaded = manager.load_last_site_dir(&unique_app_name).unwrap();
        assert_eq!(loaded, Some(site));

        let config_dir = path_utils::get_base_app_config_local_dir(&unique_app_name)
            .expect("config dir should exist after save");
        assert!(config_dir.join(LAST_SITE_DIR_FILENAME).exists());
        if let Err(e) = fs::remove_dir_all(&config_dir) {
            eprintln!("Test cleanup failed for {config_dir:?}: {e}");
        }
    }
}
