use crate::config::types::Config;
use crate::ConfigError;

/// Validates a parsed configuration before any crawling starts
///
/// # Rules
///
/// * Unbounded depth (`max-depth < 0`) requires `deduplicate = true`;
///   without a visited set an unbounded crawl cannot terminate on any
///   cyclic link graph.
/// * Timeouts must be nonzero.
/// * The repository root must be nonempty.
/// * The user-agent must be nonempty.
/// * Custom policy patterns must compile.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.crawler.max_depth < 0 && !config.crawler.deduplicate {
        return Err(ConfigError::Validation(
            "max-depth < 0 (unbounded) requires deduplicate = true".to_string(),
        ));
    }

    if config.crawler.fetch_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch-timeout-secs must be greater than zero".to_string(),
        ));
    }

    if config.crawler.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be greater than zero".to_string(),
        ));
    }

    if config.repository.root.trim().is_empty() {
        return Err(ConfigError::Validation(
            "repository root must not be empty".to_string(),
        ));
    }

    if config.crawler.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent must not be empty".to_string(),
        ));
    }

    // Surface bad patterns at load time rather than at engine construction.
    config.policy.build()?;

    Ok(())
}
