use crate::config::types::{BrowserConfig, Config, CrawlerConfig, HttpConfig, MirrorConfig, OutputConfig};
use crate::url::{page_key, parse_http_url, OriginScope};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    validate_browser_config(&config.browser)?;
    validate_mirror_config(&config.mirror)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let seed = parse_http_url(&config.seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed '{}': {}", config.seed, e)))?;

    let prefix = config.origin_prefix();
    if prefix.trim().is_empty() {
        return Err(ConfigError::Validation(
            "origin_prefix cannot be empty".to_string(),
        ));
    }
    parse_http_url(prefix).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid origin_prefix '{}': {}", prefix, e))
    })?;

    let scope = OriginScope::new(prefix);
    if !scope.contains(&page_key(&seed)) {
        return Err(ConfigError::Validation(format!(
            "Seed '{}' lies outside origin_prefix '{}'",
            config.seed, prefix
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.html_dir.is_empty() {
        return Err(ConfigError::Validation(
            "html_dir cannot be empty".to_string(),
        ));
    }

    if config.image_dir.is_empty() {
        return Err(ConfigError::Validation(
            "image_dir cannot be empty".to_string(),
        ));
    }

    if matches!(config.image_links_file.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "image_links_file cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates headless browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.max_scrolls < 1 {
        return Err(ConfigError::Validation(format!(
            "max_scrolls must be >= 1, got {}",
            config.max_scrolls
        )));
    }

    if config.load_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "load_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates mirroring tool configuration
fn validate_mirror_config(config: &MirrorConfig) -> Result<(), ConfigError> {
    if config.wget_path.is_empty() {
        return Err(ConfigError::Validation(
            "wget_path cannot be empty".to_string(),
        ));
    }

    if config.directory_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "directory_prefix cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        Config::for_seed(
            "https://web.archive.org/web/20240911141314/https://apueducation.us/",
            None,
        )
    }

    #[test]
    fn test_valid_config() {
        let config = create_test_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_seed_with_trailing_slash_inside_its_own_prefix() {
        let config = Config::for_seed(
            "http://example.test/site/",
            Some("http://example.test/site/"),
        );
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_seed() {
        let mut config = create_test_config();
        config.crawler.seed = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_non_http_seed() {
        let mut config = create_test_config();
        config.crawler.seed = "ftp://example.com/".to_string();
        config.crawler.origin_prefix = Some("ftp://example.com/".to_string());
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_seed_outside_prefix() {
        let mut config = create_test_config();
        config.crawler.origin_prefix = Some("https://example.com/".to_string());
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_user_agent() {
        let mut config = create_test_config();
        config.http.user_agent = "  ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = create_test_config();
        config.http.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_output_dirs() {
        let mut config = create_test_config();
        config.output.html_dir = String::new();
        assert!(validate(&config).is_err());

        let mut config = create_test_config();
        config.output.image_dir = String::new();
        assert!(validate(&config).is_err());

        let mut config = create_test_config();
        config.output.image_links_file = Some(String::new());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_scrolls() {
        let mut config = create_test_config();
        config.browser.max_scrolls = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_wget_path() {
        let mut config = create_test_config();
        config.mirror.wget_path = String::new();
        assert!(validate(&config).is_err());
    }
}
