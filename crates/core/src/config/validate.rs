use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Metadata host is an http(s) URL
/// - Request timeout is not 0
/// - Listing page size is not 0
///
/// Project identity is checked when a request is built, so a config used
/// only for one command does not need every field.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let host = config.service.metadata_host.trim();
    if !(host.starts_with("http://") || host.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "service.metadata_host must be an http(s) URL, got {:?}",
            config.service.metadata_host
        )));
    }

    if config.service.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "service.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.batch.list_page_size == 0 {
        return Err(ConfigError::ValidationError(
            "batch.list_page_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_timeout_zero_fails() {
        let config = Config {
            service: ServiceConfig {
                timeout_secs: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_bad_host_fails() {
        let config = Config {
            service: ServiceConfig {
                metadata_host: "metadata.sequence.app".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_page_size_zero_fails() {
        let mut config = Config::default();
        config.batch.list_page_size = 0;
        assert!(validate_config(&config).is_err());
    }
}
