//! Remote desktop actuation for computer-use agents.
//!
//! [`ComputerUseDispatcher`] is the single entry point: it takes a typed
//! [`ActionRequest`](desktop_core::ActionRequest), validates it, sends the
//! matching command to the desktop service through [`ActuationClient`], and
//! normalizes whatever happens into a
//! [`ResultEnvelope`](desktop_core::ResultEnvelope).

mod actions;
pub mod client;
pub mod config;
mod dispatcher;
pub mod files;

pub use client::{ActuationClient, RemoteResponse, COMMAND_PATH};
pub use config::{
    DesktopConfig, DesktopSettings, BASE_URL_ENV, DEFAULT_FETCH_TIMEOUT,
    DEFAULT_SCREENSHOT_DELAY, FETCH_TIMEOUT_ENV, SCREENSHOT_DELAY_ENV,
};
pub use dispatcher::{
    ComputerUseDispatcher, CURSOR_FAILED_TEXT, SCREENSHOT_FAILED_TEXT, SUCCESS_TEXT,
};
pub use files::{FileTransfer, ReadFileOutcome, WriteFileOutcome};

// Re-export the core types callers need alongside the dispatcher
pub use desktop_core::{
    action_schemas, Action, ActionExecutor, ActionKind, ActionRequest, ActuationError,
    ActuationResult, ConfigError, ContentBlock, ResultEnvelope, ToolSchema, ToolUseBlock,
};
