use crate::error::ConfigError;
use serde::Deserialize;
use std::{fs, path::{Path, PathBuf}};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// TorchScript model file.
    pub model_path: PathBuf,
    /// Optional `meta.json` with the column list the model was exported with.
    pub meta_path: Option<PathBuf>,
    /// Reference CSV the dropdown options come from.
    pub data_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Log every transformed feature row.
    pub log_features: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model.pt"),
            meta_path: None,
            data_path: PathBuf::from("featured_data.csv"),
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_features: false,
        }
    }
}

impl AppConfig {
    /// Defaults, then the JSON file named by `CONFIG_PATH`, then env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `MODEL_PATH`, `META_PATH`, `DATA_PATH`, `HOST`, `PORT` and
    /// `LOG_PRED` from `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MODEL_PATH") {
            self.model_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("META_PATH") {
            self.meta_path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("DATA_PATH") {
            self.data_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("HOST") {
            self.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.port = v
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { var: "PORT", value: v })?;
        }
        if let Some(v) = lookup("LOG_PRED") {
            match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => self.log_features = true,
                "0" | "false" => self.log_features = false,
                _ => tracing::warn!("ignoring LOG_PRED={:?}; expected 0, 1, true or false", v),
            }
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
