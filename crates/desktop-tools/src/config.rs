//! Configuration for the desktop actuation layer.
//!
//! [`DesktopSettings`] is the raw, partially filled form read from a TOML
//! file and the environment. [`DesktopConfig`] is the validated, immutable
//! result every client is built from.
//!
//! Environment variables:
//! - `DESKTOP_BASE_URL`: base URL of the desktop service (required)
//! - `DESKTOP_SCREENSHOT_DELAY_MS`: settle delay before the confirmation screenshot (default: 750)
//! - `DESKTOP_FETCH_TIMEOUT_MS`: timeout for one remote call (default: 30000)

use std::path::Path;
use std::time::Duration;

use desktop_core::ConfigError;
use serde::{Deserialize, Serialize};

pub const BASE_URL_ENV: &str = "DESKTOP_BASE_URL";
pub const SCREENSHOT_DELAY_ENV: &str = "DESKTOP_SCREENSHOT_DELAY_MS";
pub const FETCH_TIMEOUT_ENV: &str = "DESKTOP_FETCH_TIMEOUT_MS";

pub const DEFAULT_SCREENSHOT_DELAY: Duration = Duration::from_millis(750);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(30_000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopConfig {
    base_url: String,
    screenshot_delay: Duration,
    fetch_timeout: Duration,
}

impl DesktopConfig {
    /// Validates `base_url` and applies default timings.
    ///
    /// Surrounding whitespace and trailing slashes are stripped. The result
    /// must be a non-empty absolute `http`/`https` URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let sanitized = base_url.trim().trim_end_matches('/');
        if sanitized.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        let parsed = url::Url::parse(sanitized).map_err(|e| ConfigError::InvalidBaseUrl {
            url: sanitized.to_string(),
            reason: e.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ConfigError::InvalidBaseUrl {
                    url: sanitized.to_string(),
                    reason: format!("unsupported scheme '{}'", scheme),
                })
            }
        }

        Ok(Self {
            base_url: sanitized.to_string(),
            screenshot_delay: DEFAULT_SCREENSHOT_DELAY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        })
    }

    pub fn with_screenshot_delay(mut self, delay: Duration) -> Self {
        self.screenshot_delay = delay;
        self
    }

    /// A zero timeout is rejected when a client is built from this config.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn screenshot_delay(&self) -> Duration {
        self.screenshot_delay
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
}

/// Unvalidated configuration values, each optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopSettings {
    #[serde(alias = "baseUrl")]
    pub base_url: Option<String>,
    #[serde(alias = "screenshotDelayMs")]
    pub screenshot_delay_ms: Option<u64>,
    #[serde(alias = "fetchTimeoutMs")]
    pub fetch_timeout_ms: Option<u64>,
}

impl DesktopSettings {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            base_url: lookup(BASE_URL_ENV),
            screenshot_delay_ms: parse_millis(SCREENSHOT_DELAY_ENV, lookup(SCREENSHOT_DELAY_ENV))?,
            fetch_timeout_ms: parse_millis(FETCH_TIMEOUT_ENV, lookup(FETCH_TIMEOUT_ENV))?,
        })
    }

    /// Overlays `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: DesktopSettings) -> Self {
        Self {
            base_url: other.base_url.or(self.base_url),
            screenshot_delay_ms: other.screenshot_delay_ms.or(self.screenshot_delay_ms),
            fetch_timeout_ms: other.fetch_timeout_ms.or(self.fetch_timeout_ms),
        }
    }

    pub fn into_config(self) -> Result<DesktopConfig, ConfigError> {
        let base_url = self.base_url.ok_or(ConfigError::MissingBaseUrl)?;
        let mut config = DesktopConfig::new(&base_url)?;

        if let Some(delay) = self.screenshot_delay_ms {
            config = config.with_screenshot_delay(Duration::from_millis(delay));
        }
        if let Some(timeout) = self.fetch_timeout_ms {
            if timeout == 0 {
                return Err(ConfigError::InvalidValue {
                    name: "fetch timeout".to_string(),
                    value: timeout.to_string(),
                });
            }
            config = config.with_fetch_timeout(Duration::from_millis(timeout));
        }
        Ok(config)
    }
}

fn parse_millis(name: &str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value: raw,
            }),
    }
}
