//! Core types for remote desktop actuation.
//!
//! This crate defines the closed set of computer-use actions an agent may
//! request, the validation applied to them before anything leaves the
//! process, and the uniform result envelope handed back to the agent loop.
//! It performs no I/O; the network side lives in `desktop-tools`.

pub mod action;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod schema;
pub mod validate;

pub use action::{
    Action, ActionKind, ActionParseError, ActionRequest, ApplicationInput, Button,
    ClickMouseInput, Coordinates, DragMouseInput, MoveMouseInput, PasteTextInput, Press,
    PressKeysInput, PressMouseInput, ReadFileInput, ScrollDirection, ScrollInput,
    ToolUseBlock, TraceMouseInput, TypeKeysInput, TypeTextInput, WaitInput, WriteFileInput,
    TOOL_NAME_PREFIX,
};
pub use envelope::{ContentBlock, ResultEnvelope, DEFAULT_MEDIA_TYPE, PNG_MEDIA_TYPE};
pub use error::{ActuationError, ActuationResult, ConfigError};
pub use executor::ActionExecutor;
pub use schema::{action_schemas, FunctionSchema, ToolSchema};
pub use validate::{validate_coordinates, validate_file_path, Validate};
