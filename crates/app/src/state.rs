use std::{fs, path::PathBuf};

use common::fs::ManagerConfig;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "vfs";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default log level, overridable through RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Names used by the file system manager
    #[serde(default)]
    pub manager: ManagerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            manager: ManagerConfig::default(),
        }
    }
}

impl AppConfig {
    /// The configured level, falling back to INFO if it does not parse
    pub fn level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the vfs directory (~/.vfs)
    pub vfs_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the vfs directory path (custom or default ~/.vfs)
    pub fn vfs_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new vfs state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let vfs_dir = Self::vfs_dir(custom_path)?;

        if vfs_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&vfs_dir)?;

        let config = config.unwrap_or_default();
        let config_path = vfs_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            vfs_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the vfs directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let vfs_dir = Self::vfs_dir(custom_path)?;

        if !vfs_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = vfs_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            vfs_dir,
            config_path,
            config,
        })
    }

    /// Load the config if the directory was initialised, defaults otherwise.
    ///  A config file that exists but does not parse is still an error.
    pub fn load_config(custom_path: Option<PathBuf>) -> Result<AppConfig, StateError> {
        match Self::load(custom_path) {
            Ok(state) => Ok(state.config),
            Err(StateError::NotInitialized) | Err(StateError::NoHomeDirectory) => {
                Ok(AppConfig::default())
            }
            Err(err) => Err(err),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("vfs directory not initialized. Run 'vfs init' first")]
    NotInitialized,

    #[error("vfs directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("vfs");

        let mut config = AppConfig::default();
        config.manager.root_name = "home".to_string();
        let state = AppState::init(Some(dir.clone()), Some(config.clone())).unwrap();
        assert!(state.config_path.exists());

        let loaded = AppState::load(Some(dir.clone())).unwrap();
        assert_eq!(loaded.config, config);

        assert!(matches!(
            AppState::init(Some(dir), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_config_defaults_when_missing() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = AppState::load_config(Some(temp.path().join("absent"))).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_config_file() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "log_level = \"debug\"\n[manager]\ndefault_file_name = \"untitled\"\n",
        )
        .unwrap();

        let config = AppState::load_config(Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(config.level(), tracing::Level::DEBUG);
        assert_eq!(config.manager.default_file_name, "untitled");
        assert_eq!(config.manager.root_name, "root");
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "log_level = [").unwrap();
        assert!(matches!(
            AppState::load_config(Some(temp.path().to_path_buf())),
            Err(StateError::TomlDe(_))
        ));
    }
}
