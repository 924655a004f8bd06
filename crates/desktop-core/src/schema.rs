//! Tool definitions handed to the model so it can emit computer-use calls.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::action::ActionKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub function: FunctionSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// One schema per recognized action, in action-table order.
pub fn action_schemas() -> Vec<ToolSchema> {
    ActionKind::ALL.iter().map(|kind| kind.to_schema()).collect()
}

fn coordinates_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "description": description,
        "properties": {
            "x": { "type": "number", "minimum": 0, "description": "Horizontal position in pixels" },
            "y": { "type": "number", "minimum": 0, "description": "Vertical position in pixels" }
        },
        "required": ["x", "y"]
    })
}

fn path_schema() -> Value {
    json!({
        "type": "array",
        "minItems": 1,
        "items": coordinates_schema("A point along the path"),
        "description": "Ordered points the cursor travels through"
    })
}

fn hold_keys_schema() -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "description": "Keys held down for the duration of the action, e.g. [\"shift\"]"
    })
}

fn button_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["left", "right", "middle"],
        "description": "Mouse button"
    })
}

fn press_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["up", "down"],
        "description": "Whether to press down or release"
    })
}

fn keys_schema() -> Value {
    json!({
        "type": "array",
        "minItems": 1,
        "items": { "type": "string" },
        "description": "Key names in order, e.g. [\"ctrl\", \"c\"]"
    })
}

impl ActionKind {
    pub fn description(self) -> &'static str {
        match self {
            ActionKind::MoveMouse => "Move the mouse cursor to the given screen coordinates.",
            ActionKind::TraceMouse => {
                "Move the mouse cursor along a path of coordinates, optionally holding keys."
            }
            ActionKind::ClickMouse => {
                "Click a mouse button one or more times, optionally at given coordinates and while holding keys."
            }
            ActionKind::PressMouse => {
                "Press or release a mouse button, optionally at given coordinates."
            }
            ActionKind::DragMouse => "Drag along a path of coordinates with a mouse button held.",
            ActionKind::Scroll => {
                "Scroll up, down, left or right a number of times, optionally at given coordinates."
            }
            ActionKind::TypeKeys => "Type a sequence of keys, one after another.",
            ActionKind::PressKeys => "Press or release a set of keys.",
            ActionKind::TypeText => "Type a string of text as keyboard input.",
            ActionKind::PasteText => "Paste a string of text through the clipboard.",
            ActionKind::Wait => "Wait for the given number of milliseconds.",
            ActionKind::Application => "Open or focus an application by name.",
            ActionKind::ReadFile => "Read a file from the desktop and return it as a document.",
            ActionKind::WriteFile => "Write text content to a file on the desktop.",
            ActionKind::Screenshot => "Take a screenshot of the desktop.",
            ActionKind::CursorPosition => "Get the current position of the mouse cursor.",
        }
    }

    pub fn parameters_schema(self) -> Value {
        match self {
            ActionKind::MoveMouse => json!({
                "type": "object",
                "properties": {
                    "coordinates": coordinates_schema("Target position")
                },
                "required": ["coordinates"]
            }),
            ActionKind::TraceMouse => json!({
                "type": "object",
                "properties": {
                    "path": path_schema(),
                    "holdKeys": hold_keys_schema()
                },
                "required": ["path"]
            }),
            ActionKind::ClickMouse => json!({
                "type": "object",
                "properties": {
                    "coordinates": coordinates_schema("Where to click; the current position when omitted"),
                    "button": button_schema(),
                    "clickCount": { "type": "integer", "minimum": 1, "description": "Number of clicks" },
                    "holdKeys": hold_keys_schema()
                },
                "required": ["button", "clickCount"]
            }),
            ActionKind::PressMouse => json!({
                "type": "object",
                "properties": {
                    "coordinates": coordinates_schema("Where to press; the current position when omitted"),
                    "button": button_schema(),
                    "press": press_schema()
                },
                "required": ["button", "press"]
            }),
            ActionKind::DragMouse => json!({
                "type": "object",
                "properties": {
                    "path": path_schema(),
                    "button": button_schema(),
                    "holdKeys": hold_keys_schema()
                },
                "required": ["path", "button"]
            }),
            ActionKind::Scroll => json!({
                "type": "object",
                "properties": {
                    "coordinates": coordinates_schema("Where to scroll; the current position when omitted"),
                    "direction": {
                        "type": "string",
                        "enum": ["up", "down", "left", "right"],
                        "description": "Scroll direction"
                    },
                    "scrollCount": { "type": "integer", "minimum": 1, "description": "Number of scroll steps" },
                    "holdKeys": hold_keys_schema()
                },
                "required": ["direction", "scrollCount"]
            }),
            ActionKind::TypeKeys => json!({
                "type": "object",
                "properties": {
                    "keys": keys_schema(),
                    "delay": { "type": "integer", "minimum": 0, "description": "Milliseconds between keys" }
                },
                "required": ["keys"]
            }),
            ActionKind::PressKeys => json!({
                "type": "object",
                "properties": {
                    "keys": keys_schema(),
                    "press": press_schema()
                },
                "required": ["keys", "press"]
            }),
            ActionKind::TypeText => json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string", "description": "Text to type" },
                    "delay": { "type": "integer", "minimum": 0, "description": "Milliseconds between characters" }
                },
                "required": ["text"]
            }),
            ActionKind::PasteText => json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string", "description": "Text to paste" }
                },
                "required": ["text"]
            }),
            ActionKind::Wait => json!({
                "type": "object",
                "properties": {
                    "duration": { "type": "integer", "minimum": 0, "description": "Milliseconds to wait" }
                },
                "required": ["duration"]
            }),
            ActionKind::Application => json!({
                "type": "object",
                "properties": {
                    "application": { "type": "string", "description": "Application name, e.g. \"firefox\"" }
                },
                "required": ["application"]
            }),
            ActionKind::ReadFile => json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "description": "Absolute path of the file on the desktop" }
                },
                "required": ["path"]
            }),
            ActionKind::WriteFile => json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "description": "Absolute path of the file on the desktop" },
                    "content": { "type": "string", "description": "Text content to write" }
                },
                "required": ["path", "content"]
            }),
            ActionKind::Screenshot | ActionKind::CursorPosition => json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    pub fn to_schema(self) -> ToolSchema {
        ToolSchema {
            schema_type: "function".to_string(),
            function: FunctionSchema {
                name: self.tool_name(),
                description: self.description().to_string(),
                parameters: self.parameters_schema(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_schema_per_action() {
        let schemas = action_schemas();
        assert_eq!(schemas.len(), ActionKind::ALL.len());
        assert_eq!(schemas[0].function.name, "computer_move_mouse");
        assert!(schemas.iter().all(|schema| schema.schema_type == "function"));
    }

    #[test]
    fn schema_names_resolve_back_to_kinds() {
        for schema in action_schemas() {
            assert!(ActionKind::from_name(&schema.function.name).is_some());
        }
    }

    #[test]
    fn required_fields_match_action_table() {
        let click = ActionKind::ClickMouse.parameters_schema();
        assert_eq!(click["required"], json!(["button", "clickCount"]));

        let write = ActionKind::WriteFile.parameters_schema();
        assert_eq!(write["required"], json!(["path", "content"]));

        let screenshot = ActionKind::Screenshot.parameters_schema();
        assert!(screenshot.get("required").is_none());
    }
}
