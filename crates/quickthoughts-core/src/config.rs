use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_CLOUDFLARE_API_URL: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_NOTE_FILE: &str = "Quick Thoughts.md";

/// Environment variable prefix; `__` separates nested keys
/// (`QUICKTHOUGHTS_TELEGRAM__BOT_TOKEN`).
pub const ENV_PREFIX: &str = "QUICKTHOUGHTS_";

/// Top-level config (quickthoughts.toml + QUICKTHOUGHTS_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QuickThoughtsConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Public base URL (`https://relay.example.com`). When unset, the setup
    /// endpoint derives it from the incoming request's host.
    pub public_url: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            public_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Numeric Telegram user ID of the only sender allowed to capture.
    /// `0` means unconfigured and denies everyone.
    #[serde(default)]
    pub allowed_user_id: i64,
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            allowed_user_id: 0,
            api_url: default_telegram_api_url(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
    Cloudflare,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// SQLite file, used by the `sqlite` backend.
    #[serde(default = "default_db_path")]
    pub path: String,
    pub cloudflare: Option<CloudflareKvConfig>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_db_path(),
            cloudflare: None,
        }
    }
}

/// Workers KV namespace reached through the Cloudflare REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudflareKvConfig {
    pub account_id: String,
    pub namespace_id: String,
    pub api_token: String,
    #[serde(default = "default_cloudflare_api_url")]
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncConfig {
    /// Pins the sync credential. Takes precedence over the stored
    /// `SYNC_SECRET`, and setup never writes one while it is set.
    pub secret: Option<String>,
}

/// Settings for the `quickthoughts-sync` pull client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub relay_url: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub vault_path: String,
    #[serde(default = "default_note_file")]
    pub file_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: String::new(),
            secret: String::new(),
            vault_path: String::new(),
            file_name: default_note_file(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_telegram_api_url() -> String {
    DEFAULT_TELEGRAM_API_URL.to_string()
}
fn default_cloudflare_api_url() -> String {
    DEFAULT_CLOUDFLARE_API_URL.to_string()
}
fn default_note_file() -> String {
    DEFAULT_NOTE_FILE.to_string()
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.quickthoughts/quickthoughts.db", home)
}

impl QuickThoughtsConfig {
    /// Load config from a TOML file with QUICKTHOUGHTS_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.quickthoughts/quickthoughts.toml
    ///
    /// A missing file is not an error; every section has defaults.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        Self::figment(&path)
            .extract()
            .map_err(|e| crate::error::RelayError::Config(e.to_string()))
    }

    fn figment(path: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject configurations the gateway cannot run with.
    pub fn validate_gateway(&self) -> crate::error::Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(crate::error::RelayError::Config(
                "telegram.bot_token is required".into(),
            ));
        }
        if self.store.backend == StoreBackend::Cloudflare && self.store.cloudflare.is_none() {
            return Err(crate::error::RelayError::Config(
                "store.backend = \"cloudflare\" needs a [store.cloudflare] section".into(),
            ));
        }
        if self.telegram.allowed_user_id == 0 {
            tracing::warn!("telegram.allowed_user_id is unset; every sender will be rejected");
        }
        Ok(())
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.quickthoughts/quickthoughts.toml", home)
}
