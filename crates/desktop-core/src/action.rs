//! The closed set of computer-use actions and their typed inputs.
//!
//! Each [`ActionKind`] maps 1:1 to the command name understood by the remote
//! desktop service (`"move_mouse"`, `"screenshot"`, ...). Agents address the
//! same actions as tools named `computer_<action>`.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Prefix agents put in front of action names when exposing them as tools.
pub const TOOL_NAME_PREFIX: &str = "computer_";

/// A screen position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Left,
    Right,
    Middle,
}

impl Button {
    pub fn as_str(self) -> &'static str {
        match self {
            Button::Left => "left",
            Button::Right => "right",
            Button::Middle => "middle",
        }
    }
}

/// Whether a mouse button or key goes down or comes back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Press {
    Up,
    Down,
}

impl Press {
    pub fn as_str(self) -> &'static str {
        match self {
            Press::Up => "up",
            Press::Down => "down",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
            ScrollDirection::Left => "left",
            ScrollDirection::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveMouseInput {
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceMouseInput {
    pub path: Vec<Coordinates>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hold_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickMouseInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub button: Button,
    pub click_count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hold_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PressMouseInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub button: Button,
    pub press: Press,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragMouseInput {
    pub path: Vec<Coordinates>,
    pub button: Button,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hold_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub direction: ScrollDirection,
    pub scroll_count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hold_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeKeysInput {
    pub keys: Vec<String>,
    /// Milliseconds between keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PressKeysInput {
    pub keys: Vec<String>,
    pub press: Press,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeTextInput {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteTextInput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitInput {
    /// Milliseconds.
    pub duration: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInput {
    pub application: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadFileInput {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteFileInput {
    pub path: String,
    /// Raw text; encoded to base64 before it is sent.
    pub content: String,
}

/// One recognized action together with its typed input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    MoveMouse(MoveMouseInput),
    TraceMouse(TraceMouseInput),
    ClickMouse(ClickMouseInput),
    PressMouse(PressMouseInput),
    DragMouse(DragMouseInput),
    Scroll(ScrollInput),
    TypeKeys(TypeKeysInput),
    PressKeys(PressKeysInput),
    TypeText(TypeTextInput),
    PasteText(PasteTextInput),
    Wait(WaitInput),
    Application(ApplicationInput),
    ReadFile(ReadFileInput),
    WriteFile(WriteFileInput),
    Screenshot,
    CursorPosition,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::MoveMouse(_) => ActionKind::MoveMouse,
            Action::TraceMouse(_) => ActionKind::TraceMouse,
            Action::ClickMouse(_) => ActionKind::ClickMouse,
            Action::PressMouse(_) => ActionKind::PressMouse,
            Action::DragMouse(_) => ActionKind::DragMouse,
            Action::Scroll(_) => ActionKind::Scroll,
            Action::TypeKeys(_) => ActionKind::TypeKeys,
            Action::PressKeys(_) => ActionKind::PressKeys,
            Action::TypeText(_) => ActionKind::TypeText,
            Action::PasteText(_) => ActionKind::PasteText,
            Action::Wait(_) => ActionKind::Wait,
            Action::Application(_) => ActionKind::Application,
            Action::ReadFile(_) => ActionKind::ReadFile,
            Action::WriteFile(_) => ActionKind::WriteFile,
            Action::Screenshot => ActionKind::Screenshot,
            Action::CursorPosition => ActionKind::CursorPosition,
        }
    }

    /// Builds the action of the given kind from an untyped input object.
    ///
    /// Fields are checked against `kind` only; a `null` input is treated as
    /// an empty object.
    pub fn from_input(kind: ActionKind, input: &Value) -> Result<Self, serde_json::Error> {
        match kind {
            ActionKind::Screenshot => return Ok(Action::Screenshot),
            ActionKind::CursorPosition => return Ok(Action::CursorPosition),
            _ => {}
        }

        let mut fields = match input {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            other => {
                return Err(serde_json::Error::custom(format!(
                    "expected an object, got {}",
                    other
                )))
            }
        };
        fields.insert(
            "action".to_string(),
            Value::String(kind.as_str().to_string()),
        );
        serde_json::from_value(Value::Object(fields))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    MoveMouse,
    TraceMouse,
    ClickMouse,
    PressMouse,
    DragMouse,
    Scroll,
    TypeKeys,
    PressKeys,
    TypeText,
    PasteText,
    Wait,
    Application,
    ReadFile,
    WriteFile,
    Screenshot,
    CursorPosition,
}

impl ActionKind {
    pub const ALL: [ActionKind; 16] = [
        ActionKind::MoveMouse,
        ActionKind::TraceMouse,
        ActionKind::ClickMouse,
        ActionKind::PressMouse,
        ActionKind::DragMouse,
        ActionKind::Scroll,
        ActionKind::TypeKeys,
        ActionKind::PressKeys,
        ActionKind::TypeText,
        ActionKind::PasteText,
        ActionKind::Wait,
        ActionKind::Application,
        ActionKind::ReadFile,
        ActionKind::WriteFile,
        ActionKind::Screenshot,
        ActionKind::CursorPosition,
    ];

    /// The remote command name.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::MoveMouse => "move_mouse",
            ActionKind::TraceMouse => "trace_mouse",
            ActionKind::ClickMouse => "click_mouse",
            ActionKind::PressMouse => "press_mouse",
            ActionKind::DragMouse => "drag_mouse",
            ActionKind::Scroll => "scroll",
            ActionKind::TypeKeys => "type_keys",
            ActionKind::PressKeys => "press_keys",
            ActionKind::TypeText => "type_text",
            ActionKind::PasteText => "paste_text",
            ActionKind::Wait => "wait",
            ActionKind::Application => "application",
            ActionKind::ReadFile => "read_file",
            ActionKind::WriteFile => "write_file",
            ActionKind::Screenshot => "screenshot",
            ActionKind::CursorPosition => "cursor_position",
        }
    }

    pub fn tool_name(self) -> String {
        format!("{}{}", TOOL_NAME_PREFIX, self.as_str())
    }

    /// Resolves a tool or command name to an action kind.
    ///
    /// Accepts bare command names (`move_mouse`), tool names
    /// (`computer_move_mouse`) and namespaced references
    /// (`desktop::computer_move_mouse`). Returns `None` for anything else.
    pub fn from_name(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        let raw = trimmed.rsplit("::").next().unwrap_or(trimmed);
        let name = raw.strip_prefix(TOOL_NAME_PREFIX).unwrap_or(raw);
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }

    /// Informational actions whose result is returned directly, with no
    /// confirmation screenshot.
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            ActionKind::Screenshot | ActionKind::CursorPosition | ActionKind::ReadFile
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tool invocation as emitted by the agent loop, before its input
/// has been checked against the action schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUseBlock {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub input: Value,
}

impl ToolUseBlock {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}

#[derive(Debug, Error)]
pub enum ActionParseError {
    #[error("Unrecognized action: {0}")]
    Unrecognized(String),

    #[error("Invalid input for {name}: {source}")]
    InvalidInput {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A typed action paired with the id the agent uses to correlate the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub request_id: String,
    #[serde(flatten)]
    pub action: Action,
}

impl ActionRequest {
    pub fn new(request_id: impl Into<String>, action: Action) -> Self {
        Self {
            request_id: request_id.into(),
            action,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }

    pub fn from_tool_use(block: &ToolUseBlock) -> Result<Self, ActionParseError> {
        let kind = ActionKind::from_name(&block.name)
            .ok_or_else(|| ActionParseError::Unrecognized(block.name.clone()))?;
        let action = Action::from_input(kind, &block.input).map_err(|source| {
            ActionParseError::InvalidInput {
                name: block.name.clone(),
                source,
            }
        })?;
        Ok(Self::new(block.id.clone(), action))
    }
}
