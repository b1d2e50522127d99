use serde::{Deserialize, Serialize};
use std::{collections::HashMap, env, fs, net::SocketAddr, str::FromStr};

use crate::resolver::TieBreak;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub http: Http,
    #[serde(default)]
    pub auth: Auth,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub provider: Provider,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub webhook: Webhook,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Http {
    #[serde(default = "default_http_listen")]
    pub listen: SocketAddr,
    #[serde(default)]
    pub cors: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Auth {
    /// HS256 key shared with the identity provider
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl Auth {
    pub fn token_map(&self) -> HashMap<String, String> {
        self.tokens
            .iter()
            .map(|t| (t.token.clone(), t.user.clone()))
            .collect()
    }
}

/// Static bearer token. `user = "*"` grants administrator access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
    pub user: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds
    #[serde(default = "default_database_connect_timeout")]
    pub connect_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    #[serde(default = "default_provider_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    /// Base for playable URLs when the provider does not return one
    #[serde(default)]
    pub stream_base_url: Option<String>,
    /// Milliseconds, applies to the whole call
    #[serde(default = "default_provider_timeout")]
    pub timeout: u64,
    #[serde(default = "default_provider_connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,
    /// Bearer token the provider must present on inbound webhooks
    #[serde(default)]
    pub webhook_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub tie_break: TieBreak,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Webhook {
    #[serde(default)]
    pub url: Option<String>,
}

fn default_http_listen() -> SocketAddr {
    SocketAddr::from_str(&format!(
        "0.0.0.0:{}",
        env::var("PORT").unwrap_or(String::from("8080"))
    ))
    .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8080)))
}

impl Default for Http {
    fn default() -> Self {
        Self {
            listen: default_http_listen(),
            cors: Default::default(),
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    env::var("LOG_LEVEL").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug".to_string()
        } else {
            "info".to_string()
        }
    })
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connect_timeout: default_database_connect_timeout(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://airtime.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_database_connect_timeout() -> u64 {
    30
}

impl Default for Provider {
    fn default() -> Self {
        Self {
            api_url: default_provider_api_url(),
            api_key: Default::default(),
            stream_base_url: None,
            timeout: default_provider_timeout(),
            connect_timeout: default_provider_connect_timeout(),
            output_prefix: default_output_prefix(),
            webhook_secret: None,
        }
    }
}

fn default_provider_api_url() -> String {
    "http://127.0.0.1:9000".to_string()
}

fn default_provider_timeout() -> u64 {
    10_000
}

fn default_provider_connect_timeout() -> u64 {
    3_000
}

fn default_output_prefix() -> String {
    "streams".to_string()
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            window_size: default_window_size(),
        }
    }
}

fn default_window_size() -> usize {
    10
}

impl Config {
    /// Reads `path`, then `airtime.toml`, then `/etc/airtime/airtime.toml`.
    /// Falls back to defaults when none of them exist.
    pub fn load(path: Option<String>) -> anyhow::Result<Self> {
        let result = fs::read_to_string(path.unwrap_or(String::from("airtime.toml")))
            .or(fs::read_to_string("/etc/airtime/airtime.toml"))
            .unwrap_or_default();
        let cfg: Self = toml::from_str(result.as_str())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.schedule.window_size == 0 {
            return Err(anyhow::anyhow!("schedule.window_size must be at least 1"));
        }
        if self.provider.timeout == 0 {
            return Err(anyhow::anyhow!("provider.timeout must be greater than 0"));
        }
        Ok(())
    }
}
