use serde::Deserialize;

use crate::services::SelectionPolicy;

/// Which backend serves the catalog, history and content stores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
    Rest,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Backend choice together with the settings it needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreSettings<'a> {
    Memory { seed_path: Option<&'a str> },
    Postgres { database_url: &'a str },
    Rest { url: &'a str, api_key: &'a str },
}

/// Application configuration loaded from `MIXER_*` environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub store_backend: StoreBackend,

    /// PostgreSQL connection URL, required for the `postgres` backend
    pub database_url: Option<String>,

    /// PostgREST base URL (e.g. a Supabase project URL), required for the `rest` backend
    pub rest_url: Option<String>,

    /// API key sent to the PostgREST endpoint
    pub rest_api_key: Option<String>,

    /// Redis URL; when set, catalog reads are cached
    pub redis_url: Option<String>,

    #[serde(default = "default_catalog_cache_ttl_secs")]
    pub catalog_cache_ttl_secs: u64,

    /// Mixer sessions older than this are pruned when new ones are opened
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    #[serde(default)]
    pub selection_policy: SelectionPolicy,

    /// JSON seed file for the `memory` backend
    pub seed_path: Option<String>,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_catalog_cache_ttl_secs() -> u64 {
    300
}

fn default_session_ttl_secs() -> u64 {
    3600
}

impl Config {
    /// Load configuration from the environment (and `.env`, if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::prefixed("MIXER_")
            .from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the chosen backend has the settings it needs
    pub fn validate(&self) -> anyhow::Result<()> {
        self.store_settings().map(|_| ())
    }

    /// Settings of the chosen backend, or an error naming the missing variables
    pub fn store_settings(&self) -> anyhow::Result<StoreSettings<'_>> {
        match self.store_backend {
            StoreBackend::Memory => Ok(StoreSettings::Memory {
                seed_path: self.seed_path.as_deref(),
            }),
            StoreBackend::Postgres => match self.database_url.as_deref() {
                Some(database_url) => Ok(StoreSettings::Postgres { database_url }),
                None => anyhow::bail!("MIXER_DATABASE_URL is required for the postgres backend"),
            },
            StoreBackend::Rest => match (self.rest_url.as_deref(), self.rest_api_key.as_deref()) {
                (Some(url), Some(api_key)) => Ok(StoreSettings::Rest { url, api_key }),
                _ => anyhow::bail!(
                    "MIXER_REST_URL and MIXER_REST_API_KEY are required for the rest backend"
                ),
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
