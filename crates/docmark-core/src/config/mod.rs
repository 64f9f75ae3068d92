//! Configuration system for docmark.
//!
//! [`EmptyLineConfig`] and [`ChunkSettings`] are validated value objects.
//! [`AppConfig`] is the application-level file that carries them together
//! with the batch settings; its section validation is lenient so one bad
//! section never prevents a run.

mod chunk;
mod empty_line;

pub use chunk::{ChunkSettings, MAX_CHUNK_LENGTH};
pub use empty_line::EmptyLineConfig;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DocmarkError, DocmarkResult};

/// Extensions processed when the configuration does not list any.
pub const DEFAULT_FILE_EXTENSIONS: [&str; 10] = [
    ".md", ".txt", ".docx", ".xlsx", ".pdf", ".pptx", ".ppt", ".xls", ".doc", ".xlsm",
];

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    /// Folder scanned for input documents.
    pub input_folder: PathBuf,
    /// Knowledge base API URL.
    pub dify_url: String,
    /// Knowledge base API key.
    pub api_key: String,
    /// Target dataset identifier.
    pub dataset_id: String,
    /// Log directory.
    pub log_dir: PathBuf,
    /// Root of the Markdown backup tree.
    pub backup_folder: PathBuf,
    /// Chunking parameters for the uploader (absent when not configured).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_settings: Option<ChunkSettings>,
    /// Blank line handling.
    pub empty_line_handling: EmptyLineConfig,
    /// Extensions to process, with leading dot.
    pub file_extensions: Vec<String>,
    /// External command used when no native extractor applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_command: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_folder: PathBuf::from("./data"),
            dify_url: String::new(),
            api_key: String::new(),
            dataset_id: String::new(),
            log_dir: PathBuf::from("./log"),
            backup_folder: PathBuf::from("./backup"),
            chunk_settings: None,
            empty_line_handling: EmptyLineConfig::DEFAULT,
            file_extensions: DEFAULT_FILE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            fallback_command: None,
        }
    }
}

/// File shape before section validation.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawAppConfig {
    input_folder: PathBuf,
    dify_url: String,
    api_key: String,
    dataset_id: String,
    log_dir: PathBuf,
    backup_folder: PathBuf,
    chunk_settings: Value,
    empty_line_handling: Value,
    file_extensions: Option<Vec<String>>,
    fallback_command: Option<String>,
}

impl Default for RawAppConfig {
    fn default() -> Self {
        let defaults = AppConfig::default();
        Self {
            input_folder: defaults.input_folder,
            dify_url: defaults.dify_url,
            api_key: defaults.api_key,
            dataset_id: defaults.dataset_id,
            log_dir: defaults.log_dir,
            backup_folder: defaults.backup_folder,
            chunk_settings: Value::Null,
            empty_line_handling: Value::Null,
            file_extensions: None,
            fallback_command: None,
        }
    }
}

/// `null`, `{}` and missing sections are treated the same.
fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

impl AppConfig {
    /// Load configuration from a file (JSON, YAML, or TOML).
    pub fn from_file(path: impl AsRef<Path>) -> DocmarkResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DocmarkError::ConfigFile(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let value: Value = match ext.as_deref() {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| DocmarkError::ConfigFile(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| DocmarkError::ConfigFile(e.to_string()))?,
            Some("toml") => {
                toml::from_str(&content).map_err(|e| DocmarkError::ConfigFile(e.to_string()))?
            }
            _ => {
                return Err(DocmarkError::ConfigFile(format!(
                    "Unsupported config file format: {}. Use .json, .yaml, or .toml",
                    path.display()
                )))
            }
        };

        let config = Self::from_value(value)?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Build from an already-parsed document.
    ///
    /// An invalid `chunk_settings` section falls back to the default chunk
    /// settings and an invalid `empty_line_handling` section to the default
    /// switches; both log a warning.
    pub fn from_value(value: Value) -> DocmarkResult<Self> {
        let value = match value {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        let raw: RawAppConfig = serde_json::from_value(value)
            .map_err(|e| DocmarkError::ConfigFile(e.to_string()))?;

        let chunk_settings = if is_unset(&raw.chunk_settings) {
            None
        } else {
            match ChunkSettings::from_value(&raw.chunk_settings) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid chunk_settings, using defaults");
                    Some(ChunkSettings::DEFAULT)
                }
            }
        };

        let empty_line_handling = if is_unset(&raw.empty_line_handling) {
            EmptyLineConfig::DEFAULT
        } else {
            EmptyLineConfig::from_value(&raw.empty_line_handling).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Invalid empty_line_handling settings, using defaults");
                EmptyLineConfig::DEFAULT
            })
        };

        Ok(Self {
            input_folder: raw.input_folder,
            dify_url: raw.dify_url,
            api_key: raw.api_key,
            dataset_id: raw.dataset_id,
            log_dir: raw.log_dir,
            backup_folder: raw.backup_folder,
            chunk_settings,
            empty_line_handling,
            file_extensions: raw
                .file_extensions
                .unwrap_or_else(|| AppConfig::default().file_extensions),
            fallback_command: raw.fallback_command.filter(|c| !c.trim().is_empty()),
        })
    }

    /// Override connection settings from `DOCMARK_*` environment variables.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("DOCMARK_DIFY_URL") {
            self.dify_url = url;
        }
        if let Ok(api_key) = std::env::var("DOCMARK_API_KEY") {
            self.api_key = api_key;
        }
        if let Ok(dataset_id) = std::env::var("DOCMARK_DATASET_ID") {
            self.dataset_id = dataset_id;
        }
        if let Ok(folder) = std::env::var("DOCMARK_INPUT_FOLDER") {
            self.input_folder = PathBuf::from(folder);
        }
        self
    }

    /// Whether `path` has one of the configured extensions (case-insensitive).
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.file_extensions
            .iter()
            .any(|configured| configured.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    /// Serializable map projection.
    pub fn as_dict(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
