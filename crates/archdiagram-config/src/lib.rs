// archdiagram-config - Runtime configuration for all entry points
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Config file path from ARCHDIAGRAM_CONFIG env var
// 3. Config file contents from ARCHDIAGRAM_CONFIG_CONTENT env var
// 4. Default config file location (./archdiagram.toml)
// 5. Platform-specific defaults (lowest priority)

use anyhow::Result;
use archdiagram_core::HandlerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod env_overrides;
mod platform;
mod sources;
mod validation;

pub use env_overrides::{apply_env_overrides, EnvSource, ENV_PREFIX};
pub use platform::Platform;

pub use archdiagram_core::DEFAULT_VIEWER_BASE_URL;

/// Main runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub viewer: ViewerConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Destination bucket; absence is reported per invocation, not at load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,

    #[serde(default = "default_region")]
    pub region: String,

    /// Custom S3 endpoint (LocalStack, MinIO)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs: Option<FsConfig>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            bucket: None,
            region: default_region(),
            endpoint: None,
            fs: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Fs,
    S3,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Fs => write!(f, "fs"),
            StorageBackend::S3 => write!(f, "s3"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fs" | "filesystem" => Ok(StorageBackend::Fs),
            "s3" | "aws" => Ok(StorageBackend::S3),
            _ => anyhow::bail!("Unsupported storage backend: {}. Supported: fs, s3", s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsConfig {
    pub path: String,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            path: "./data".to_string(),
        }
    }
}

/// Viewer link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub base_url: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_VIEWER_BASE_URL.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

impl RuntimeConfig {
    /// Platform defaults before any file or environment overrides
    pub fn from_platform_defaults(platform: Platform) -> Self {
        let defaults = platform.defaults();
        let fs = match defaults.storage_backend {
            StorageBackend::Fs => Some(FsConfig::default()),
            StorageBackend::S3 => None,
        };
        Self {
            storage: StorageConfig {
                backend: defaults.storage_backend,
                fs,
                ..StorageConfig::default()
            },
            viewer: ViewerConfig::default(),
            log: LogConfig {
                level: "info".to_string(),
                format: defaults.log_format,
            },
        }
    }

    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        sources::load_config(Platform::detect())
    }

    /// Load configuration for a specific platform (useful for testing)
    pub fn load_for_platform(platform: Platform) -> Result<Self> {
        sources::load_config(platform)
    }

    /// Load from an explicit file, then apply environment overrides
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Non-fatal problems, for the caller to log once tracing is up
    pub fn warnings(&self) -> Vec<String> {
        validation::config_warnings(self)
    }

    /// Bucket name, treating an empty string as unset
    pub fn bucket(&self) -> Option<&str> {
        self.storage.bucket.as_deref().filter(|b| !b.is_empty())
    }

    /// Settings for the diagram handler
    pub fn handler_config(&self) -> HandlerConfig {
        HandlerConfig::new(self.bucket().map(str::to_string))
            .with_viewer_base_url(self.viewer.base_url.clone())
    }
}
