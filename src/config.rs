use crate::storage::{create_store, Storable, StorageError, StoreType};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

const VALID_STORE_TYPES: &[&str] = &["json", "sqlite"];
const APP_DIR: &str = "todo-storage";

pub const KEYS: &[&str] = &["store.type", "store.path"];

fn validate_store_path(path: &str) -> Result<PathBuf, ConfigError> {
    // Check for null bytes and other invalid characters
    if path.contains('\0') {
        return Err(ConfigError::InvalidConfig(
            "Path contains invalid characters".to_string(),
        ));
    }

    if path.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(
            "Path cannot be empty".to_string(),
        ));
    }

    let path = PathBuf::from(shellexpand::tilde(path).as_ref());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(ConfigError::InvalidConfig(format!(
                "Parent directory does not exist: {}",
                parent.display()
            )));
        }
    }

    Ok(path)
}

fn validate_store_type(value: &str) -> Result<StoreType, ConfigError> {
    StoreType::from_name(value).ok_or_else(|| {
        ConfigError::InvalidConfig(format!(
            "store.type must be one of: {}",
            VALID_STORE_TYPES.join(", ")
        ))
    })
}

fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".config").join(APP_DIR))
        .ok_or_else(|| ConfigError::InvalidConfig("Could not determine home directory".to_string()))
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub store_type: Option<String>,
    #[serde(default)]
    pub store_path: Option<String>,
}

fn default_store_type() -> String {
    StoreType::Json.name().to_string()
}

fn default_store_path() -> Result<String, ConfigError> {
    Ok(config_dir()?.join("data.json").to_string_lossy().to_string())
}

/// Reads and writes the configuration file and builds the configured store.
pub struct ConfigManager {
    path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Loads the config at `config_path`, or `~/.config/todo-storage/config.json`.
    /// A missing file yields an empty config; defaults fill in on `get`.
    pub fn new(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => config_dir()?.join("config.json"),
        };

        let config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                Config::default()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            Config::default()
        };

        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        // Create parent directories if they don't exist
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.config)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Effective value for `key`, falling back to the built-in default.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "store.type" => Ok(self
                .config
                .store_type
                .clone()
                .unwrap_or_else(default_store_type)),
            "store.path" => match self.config.store_path.clone() {
                Some(path) => Ok(path),
                None => default_store_path(),
            },
            _ => Err(ConfigError::InvalidKey(key.to_string())),
        }
    }

    /// Validates and stores one key. Other keys are written back as they are.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut config = self.config.clone();

        match key {
            "store.type" => {
                validate_store_type(value)?;
                if config.store_type.as_deref().unwrap_or("json") != value {
                    warn!(
                        from = config.store_type.as_deref().unwrap_or("json"),
                        to = value,
                        "store type changed; existing items are not copied to the new store"
                    );
                }
                config.store_type = Some(value.to_string());
            }
            "store.path" => {
                let path = validate_store_path(value)?;
                config.store_path = Some(path.to_string_lossy().to_string());
            }
            _ => {
                return Err(ConfigError::InvalidKey(key.to_string()));
            }
        }

        self.config = config;
        self.save()
    }

    pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "store.type" => self.config.store_type = None,
            "store.path" => self.config.store_path = None,
            _ => return Err(ConfigError::InvalidKey(key.to_string())),
        }
        self.save()
    }

    /// Every key with its effective value and whether that value is a default.
    pub fn list(&self) -> Result<Vec<(String, String, bool)>, ConfigError> {
        let explicit = [
            ("store.type", self.config.store_type.is_none()),
            ("store.path", self.config.store_path.is_none()),
        ];

        explicit
            .iter()
            .map(|(key, is_default)| Ok((key.to_string(), self.get(key)?, *is_default)))
            .collect()
    }

    pub fn create_store(&self) -> Result<Box<dyn Storable>, ConfigError> {
        let store_type = validate_store_type(&self.get("store.type")?)?;
        let path = PathBuf::from(shellexpand::tilde(&self.get("store.path")?).to_string());
        Ok(create_store(store_type, &path)?)
    }
}
