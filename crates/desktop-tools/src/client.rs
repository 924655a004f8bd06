//! HTTP client for the remote desktop command endpoint.
//!
//! Every action is a single `POST <base_url>/computer-use` with a JSON body
//! of the form `{"action": <command>, ...fields}`. The client never retries:
//! one call yields at most one network attempt, bounded by the configured
//! fetch timeout.

use std::time::Duration;

use desktop_core::{ActuationError, ActuationResult, ConfigError};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::DesktopConfig;

pub const COMMAND_PATH: &str = "/computer-use";

/// A successful (2xx) reply from the desktop service.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    command: String,
    status: u16,
    body: String,
}

impl RemoteResponse {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Decodes the body, reporting a malformed payload as
    /// [`ActuationError::InvalidResponse`].
    pub fn json<T: DeserializeOwned>(&self) -> ActuationResult<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            ActuationError::invalid_response(&self.command, format!("malformed JSON body: {}", e))
        })
    }
}

/// Sends actuation commands to one desktop service.
///
/// Cheap to clone and safe to share: the underlying connection pool holds no
/// per-request state.
#[derive(Debug, Clone)]
pub struct ActuationClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl ActuationClient {
    /// Fails when the configured fetch timeout is zero.
    pub fn new(config: &DesktopConfig) -> Result<Self, ConfigError> {
        if config.fetch_timeout().is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "fetch timeout".to_string(),
                value: "0ms".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("desktop-tools/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}{}", config.base_url(), COMMAND_PATH),
            timeout: config.fetch_timeout(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends `command` with the fields of `payload`.
    ///
    /// `payload` must serialize to a JSON object (or unit, for commands
    /// without fields). The whole exchange, including reading the body, is
    /// cancelled once the fetch timeout elapses.
    pub async fn send<P>(&self, command: &str, payload: &P) -> ActuationResult<RemoteResponse>
    where
        P: Serialize + ?Sized,
    {
        let body = command_body(command, payload)?;
        debug!("Sending desktop action \"{}\" to {}", command, self.endpoint);

        match tokio::time::timeout(self.timeout, self.post(command, &body)).await {
            Ok(result) => result,
            Err(_) => Err(ActuationError::Timeout {
                command: command.to_string(),
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    async fn post(&self, command: &str, body: &Value) -> ActuationResult<RemoteResponse> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| ActuationError::transport(command, e))?;

        let status = response.status();
        if !status.is_success() {
            // The body is diagnostic only; a failed read leaves it out.
            let body = response.text().await.ok();
            return Err(ActuationError::Remote {
                command: command.to_string(),
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ActuationError::transport(command, e))?;

        Ok(RemoteResponse {
            command: command.to_string(),
            status: status.as_u16(),
            body: text,
        })
    }
}

fn command_body<P>(command: &str, payload: &P) -> ActuationResult<Value>
where
    P: Serialize + ?Sized,
{
    let mut fields = match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Null) => Map::new(),
        Ok(other) => {
            return Err(ActuationError::invalid_input(format!(
                "payload for \"{}\" must be an object, got {}",
                command, other
            )))
        }
        Err(e) => {
            return Err(ActuationError::invalid_input(format!(
                "payload for \"{}\" could not be encoded: {}",
                command, e
            )))
        }
    };
    fields.insert("action".to_string(), Value::String(command.to_string()));
    Ok(Value::Object(fields))
}
