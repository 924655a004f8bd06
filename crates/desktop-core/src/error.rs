use std::error::Error as StdError;

use thiserror::Error;

pub type ActuationResult<T> = std::result::Result<T, ActuationError>;

/// Failure of a single actuation call.
///
/// Every variant except `InvalidInput` names the remote command it belongs
/// to, so the message is traceable without the surrounding log context.
#[derive(Error, Debug)]
pub enum ActuationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Desktop action \"{command}\" timed out after {timeout_ms}ms")]
    Timeout { command: String, timeout_ms: u64 },

    #[error(
        "Desktop action \"{command}\" failed with status {status} {status_text}{}",
        body_suffix(.body)
    )]
    Remote {
        command: String,
        status: u16,
        status_text: String,
        body: Option<String>,
    },

    #[error("Desktop action \"{command}\" failed: {source}")]
    Transport {
        command: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Desktop action \"{command}\" returned an invalid response: {reason}")]
    InvalidResponse { command: String, reason: String },
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(text) if !text.is_empty() => format!(" - {}", text),
        _ => String::new(),
    }
}

impl ActuationError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        ActuationError::InvalidInput(reason.into())
    }

    pub fn transport<E>(command: &str, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        ActuationError::Transport {
            command: command.to_string(),
            source: Box::new(source),
        }
    }

    pub fn invalid_response(command: &str, reason: impl Into<String>) -> Self {
        ActuationError::InvalidResponse {
            command: command.to_string(),
            reason: reason.into(),
        }
    }

    /// The remote command this failure belongs to, if the call got that far.
    pub fn command(&self) -> Option<&str> {
        match self {
            ActuationError::InvalidInput(_) => None,
            ActuationError::Timeout { command, .. }
            | ActuationError::Remote { command, .. }
            | ActuationError::Transport { command, .. }
            | ActuationError::InvalidResponse { command, .. } => Some(command),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ActuationError::Timeout { .. })
    }
}

/// Fatal configuration problems, raised while building a client.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("desktop base URL is not configured")]
    MissingBaseUrl,

    #[error("desktop base URL is empty after trimming")]
    EmptyBaseUrl,

    #[error("desktop base URL '{url}' is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
