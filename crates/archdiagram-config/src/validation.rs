// Configuration validation
//
// A missing bucket is only a warning; the store reports it on each invocation.
// Warnings go back to the caller, which logs them once tracing is initialized.

use crate::{RuntimeConfig, StorageBackend};
use anyhow::{bail, Result};

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_storage_config(config)?;
    validate_viewer_config(config)?;
    Ok(())
}

fn validate_storage_config(config: &RuntimeConfig) -> Result<()> {
    let storage = &config.storage;
    match storage.backend {
        StorageBackend::S3 => {
            if storage.region.trim().is_empty() {
                bail!("storage.region must not be empty for the s3 backend");
            }
            if let Some(endpoint) = &storage.endpoint {
                if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                    bail!(
                        "storage.endpoint must be an http(s) URL, got '{}'",
                        endpoint
                    );
                }
            }
        }
        StorageBackend::Fs => match &storage.fs {
            Some(fs) if !fs.path.trim().is_empty() => {}
            _ => bail!("storage.fs.path is required for the fs backend"),
        },
    }

    Ok(())
}

pub fn config_warnings(config: &RuntimeConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if config.bucket().is_none() {
        warnings.push(
            "No bucket configured; diagram uploads will fail until BUCKET_NAME is set".to_string(),
        );
    }
    warnings
}

fn validate_viewer_config(config: &RuntimeConfig) -> Result<()> {
    if config.viewer.base_url.trim().is_empty() {
        bail!("viewer.base_url must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FsConfig, Platform};

    #[test]
    fn defaults_are_valid_without_bucket() {
        for platform in [Platform::Lambda, Platform::Local] {
            let config = RuntimeConfig::from_platform_defaults(platform);
            assert!(validate_config(&config).is_ok());
        }
    }

    #[test]
    fn missing_bucket_is_reported_as_warning() {
        let mut config = RuntimeConfig::from_platform_defaults(Platform::Lambda);
        let warnings = config_warnings(&config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("BUCKET_NAME"));

        config.storage.bucket = Some("review-files".to_string());
        assert!(config_warnings(&config).is_empty());
    }

    #[test]
    fn rejects_empty_region() {
        let mut config = RuntimeConfig::from_platform_defaults(Platform::Lambda);
        config.storage.region = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let mut config = RuntimeConfig::from_platform_defaults(Platform::Lambda);
        config.storage.endpoint = Some("localhost:4566".to_string());
        assert!(validate_config(&config).is_err());

        config.storage.endpoint = Some("http://localhost:4566".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn fs_backend_needs_a_path() {
        let mut config = RuntimeConfig::from_platform_defaults(Platform::Local);
        config.storage.fs = None;
        assert!(validate_config(&config).is_err());

        config.storage.fs = Some(FsConfig {
            path: "/var/tmp/diagrams".to_string(),
        });
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_empty_viewer_base_url() {
        let mut config = RuntimeConfig::from_platform_defaults(Platform::Local);
        config.viewer.base_url = " ".to_string();
        assert!(validate_config(&config).is_err());
    }
}
