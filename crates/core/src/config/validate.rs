use super::{types::Config, ConfigError, StorageBackend};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Timeouts are positive
/// - Imgur backend has a client id and an http(s) upload URL
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.retriever.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "retriever.timeout_secs must be greater than 0".to_string(),
        ));
    }

    if config.storage.backend == StorageBackend::Imgur {
        let imgur = config.storage.imgur.as_ref().ok_or_else(|| {
            ConfigError::ValidationError(
                "storage.imgur section is required when storage.backend = \"imgur\"".to_string(),
            )
        })?;

        if imgur.client_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.imgur.client_id cannot be empty".to_string(),
            ));
        }

        if !(imgur.upload_url.starts_with("http://") || imgur.upload_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "storage.imgur.upload_url must be an http(s) URL, got {}",
                imgur.upload_url
            )));
        }

        if imgur.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "storage.imgur.timeout_secs must be greater than 0".to_string(),
            ));
        }
    }

    Ok(())
}
