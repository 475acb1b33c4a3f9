use super::{FsConfig, LogFormat, RuntimeConfig, StorageBackend};
use anyhow::{Context, Result};

pub const ENV_PREFIX: &str = "ARCHDIAGRAM_";

/// Abstraction over environment-variable lookups so tests (and any runtime
/// without `std::env`) can supply their own source of overrides.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the ARCHDIAGRAM_ prefix.
    /// Used for platform variables (BUCKET_NAME, AWS_REGION, ...)
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the runtime config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Bucket: prefixed name wins over the plain Lambda variable
    if let Some(bucket) = get_env_string(env, "BUCKET") {
        config.storage.bucket = Some(bucket);
    } else if let Some(bucket) = get_raw_env_string(env, "BUCKET_NAME") {
        config.storage.bucket = Some(bucket);
    }

    if let Some(backend) = get_env_string(env, "STORAGE_BACKEND") {
        config.storage.backend = backend
            .parse::<StorageBackend>()
            .context("Invalid ARCHDIAGRAM_STORAGE_BACKEND value")?;
    }

    if let Some(path) = get_env_string(env, "STORAGE_PATH") {
        config.storage.fs.get_or_insert_with(FsConfig::default).path = path;
    }

    if let Some(region) = get_env_string(env, "S3_REGION") {
        config.storage.region = region;
    } else if let Some(region) = get_raw_env_string(env, "AWS_REGION") {
        config.storage.region = region;
    }

    if let Some(endpoint) = get_env_string(env, "S3_ENDPOINT") {
        config.storage.endpoint = Some(endpoint);
    } else if let Some(endpoint) = get_raw_env_string(env, "AWS_ENDPOINT_URL") {
        config.storage.endpoint = Some(endpoint);
    }

    if let Some(base_url) = get_env_string(env, "VIEWER_BASE_URL") {
        config.viewer.base_url = base_url;
    }

    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.log.format = format
            .parse::<LogFormat>()
            .context("Invalid ARCHDIAGRAM_LOG_FORMAT value")?;
    }

    Ok(())
}

// Blank values are treated as unset so `FOO=` does not clobber defaults.
fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn get_raw_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get_raw(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
