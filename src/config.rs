use std::net::IpAddr;
use std::time::Duration;

use ipnet::IpNet;

pub const DEFAULT_NOTION_API_URL: &str = "https://api.notion.com/v1/pages";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
pub const DEFAULT_SOURCE_LABEL: &str = "📬 New lead · kei.gethanjo.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub max_body_size: usize,
    pub outbound_timeout: Duration,
    pub cors_origins: Vec<String>,
    pub trusted_proxies: Vec<IpNet>,
    pub notion: NotionConfig,
    pub slack: SlackConfig,
}

#[derive(Clone)]
pub struct NotionConfig {
    pub token: String,
    pub database_id: String,
    pub api_url: String,
    pub version: String,
}

#[derive(Clone)]
pub struct SlackConfig {
    pub webhook_url: String,
    pub source_label: String,
}

// Credentials stay out of logs.
impl std::fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionConfig")
            .field("database_id", &self.database_id)
            .field("api_url", &self.api_url)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("source_label", &self.source_label)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Integration credentials are taken as-is, even when empty: a missing
    /// token or webhook URL only shows up as a failed downstream call.
    /// Server settings are parsed strictly.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host: IpAddr = env_or("LEADS_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid LEADS_HOST: {e}"))?;

        let port: u16 = env_or("LEADS_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid LEADS_PORT: {e}"))?;

        let log_level = env_or("LEADS_LOG_LEVEL", "info");

        let max_body_size: usize = env_or("LEADS_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid LEADS_MAX_BODY_SIZE: {e}"))?;

        let timeout_secs: u64 = env_or("LEADS_OUTBOUND_TIMEOUT_SECS", "10")
            .parse()
            .map_err(|e| format!("Invalid LEADS_OUTBOUND_TIMEOUT_SECS: {e}"))?;
        if timeout_secs == 0 {
            return Err("LEADS_OUTBOUND_TIMEOUT_SECS must be greater than 0".to_string());
        }

        let cors_origins: Vec<String> = env_or("LEADS_CORS_ORIGINS", "")
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        let trusted_proxies: Vec<IpNet> = env_or("LEADS_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid LEADS_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let notion = NotionConfig {
            token: env_or("NOTION_TOKEN", ""),
            database_id: env_or("NOTION_DATABASE_ID", ""),
            api_url: env_or("NOTION_API_URL", DEFAULT_NOTION_API_URL),
            version: env_or("NOTION_VERSION", DEFAULT_NOTION_VERSION),
        };

        let slack = SlackConfig {
            webhook_url: env_or("SLACK_WEBHOOK_URL", ""),
            source_label: env_or("LEADS_SOURCE_LABEL", DEFAULT_SOURCE_LABEL),
        };

        Ok(Config {
            host,
            port,
            log_level,
            max_body_size,
            outbound_timeout: Duration::from_secs(timeout_secs),
            cors_origins,
            trusted_proxies,
            notion,
            slack,
        })
    }
}
