use crate::policy::{Disposition, Policy};
use crate::ConfigError;
use serde::Deserialize;

/// Main configuration structure for kudzu
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub repository: RepositoryConfig,
    pub policy: PolicyConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from seed addresses; zero fetches the seeds
    /// only, a negative value crawls without a depth bound
    #[serde(rename = "max-depth")]
    pub max_depth: i64,

    /// Maximum matches taken per policy matcher on each page; negative for
    /// unlimited
    #[serde(rename = "max-follow-through")]
    pub max_follow_through: i64,

    /// Per-request timeout in seconds
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Whether to keep a visited set and fetch each address at most once.
    /// Off by default: the crawler may revisit addresses, cycles included.
    pub deduplicate: bool,

    /// User-agent header sent with every fetch
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_follow_through: -1,
            fetch_timeout_secs: 30,
            connect_timeout_secs: 10,
            deduplicate: false,
            user_agent: concat!("kudzu/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Storage location for the filesystem mirror treatment
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Root directory pages are mirrored under
    pub root: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            root: "./repository".to_string(),
        }
    }
}

/// Engine-default policy selection
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Disposition applied to every match of the configured matchers
    pub disposition: DispositionSetting,

    /// Custom link patterns; empty means the default address matcher
    pub patterns: Vec<String>,
}

impl PolicyConfig {
    /// Compiles this configuration into a [`Policy`]
    pub fn build(&self) -> Result<Policy, ConfigError> {
        Policy::from_patterns(&self.patterns, self.disposition.into())
    }
}

/// Serialized form of a policy disposition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispositionSetting {
    #[default]
    Follow,
    Skip,
}

impl From<DispositionSetting> for Disposition {
    fn from(setting: DispositionSetting) -> Self {
        match setting {
            DispositionSetting::Follow => Disposition::Follow,
            DispositionSetting::Skip => Disposition::Skip,
        }
    }
}
