//! Application configuration.
//!
//! Built once at startup and handed to the `Session`; nothing reads the
//! environment after that.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.faustocintra.com.br";
pub const DEFAULT_NOTIFICATION_MS: u64 = 6000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

/// Palette shared by every screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub mode: ThemeMode,
    pub primary: String,
    pub secondary: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Dark,
            // yellow 500 / red 500
            primary: "#ffeb3b".to_string(),
            secondary: "#f44336".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    #[serde(with = "millis")]
    pub notification_timeout: Duration,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            notification_timeout: Duration::from_millis(DEFAULT_NOTIFICATION_MS),
            theme: Theme::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `KARANGOS_API_URL` and `KARANGOS_NOTIFICATION_MS`,
    /// after loading a `.env` file if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("no .env loaded: {e}");
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("KARANGOS_API_URL") {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    var: "KARANGOS_API_URL",
                    value: url.to_string(),
                });
            }
            config.api_base_url = url.to_string();
        }

        if let Some(ms) = lookup("KARANGOS_NOTIFICATION_MS") {
            let parsed = ms.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                var: "KARANGOS_NOTIFICATION_MS",
                value: ms.clone(),
            })?;
            config.notification_timeout = Duration::from_millis(parsed);
        }

        tracing::info!(api = %config.api_base_url, "configuration loaded");
        Ok(config)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
