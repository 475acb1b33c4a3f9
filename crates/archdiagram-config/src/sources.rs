// Configuration source loading.
//
// Priority order:
// 1. Environment variables (ARCHDIAGRAM_* prefix plus BUCKET_NAME/AWS_*)
// 2. Config file path from ARCHDIAGRAM_CONFIG
// 3. Inline config content from ARCHDIAGRAM_CONFIG_CONTENT
// 4. Default config file (./archdiagram.toml)
// 5. Platform defaults (based on auto-detected Platform)

use crate::env_overrides::{self, EnvSource, ENV_PREFIX};
use crate::platform::Platform;
use crate::{FsConfig, LogFormat, RuntimeConfig, StorageBackend};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "./archdiagram.toml";

/// File-level config where every field is optional, so that a file only
/// overrides what it names.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FileConfig {
    storage: FileStorageConfig,
    viewer: FileViewerConfig,
    log: FileLogConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileStorageConfig {
    backend: Option<StorageBackend>,
    bucket: Option<String>,
    region: Option<String>,
    endpoint: Option<String>,
    fs: Option<FsConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileViewerConfig {
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileLogConfig {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl RuntimeConfig {
    pub(crate) fn merge(&mut self, file: FileConfig) {
        let storage = file.storage;
        if let Some(backend) = storage.backend {
            self.storage.backend = backend;
        }
        if storage.bucket.is_some() {
            self.storage.bucket = storage.bucket;
        }
        if let Some(region) = storage.region {
            self.storage.region = region;
        }
        if storage.endpoint.is_some() {
            self.storage.endpoint = storage.endpoint;
        }
        if storage.fs.is_some() {
            self.storage.fs = storage.fs;
        }
        if let Some(base_url) = file.viewer.base_url {
            self.viewer.base_url = base_url;
        }
        if let Some(level) = file.log.level {
            self.log.level = level;
        }
        if let Some(format) = file.log.format {
            self.log.format = format;
        }
    }
}

pub(crate) fn parse_file_config(content: &str) -> Result<FileConfig> {
    Ok(toml::from_str(content)?)
}

/// Load configuration for the detected platform using native environment/file access.
pub fn load_config(platform: Platform) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::from_platform_defaults(platform);

    if let Some(file_config) = load_from_file()? {
        config.merge(file_config);
    }

    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

fn load_from_file() -> Result<Option<FileConfig>> {
    if let Ok(path) = env::var(format!("{}CONFIG", ENV_PREFIX)) {
        return read_file_config(Path::new(&path)).map(Some);
    }

    if let Ok(content) = env::var(format!("{}CONFIG_CONTENT", ENV_PREFIX)) {
        let config = parse_file_config(&content)
            .context("Failed to parse inline config from ARCHDIAGRAM_CONFIG_CONTENT")?;
        return Ok(Some(config));
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        return read_file_config(default_path).map(Some);
    }

    Ok(None)
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_file_config(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Load configuration from a specific file path (for CLI --config flag).
/// Returns error if file doesn't exist or can't be parsed.
pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<RuntimeConfig> {
    let file_config = read_file_config(path.as_ref())?;

    let mut config = RuntimeConfig::from_platform_defaults(Platform::detect());
    config.merge(file_config);

    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}
