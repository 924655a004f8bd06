//! One method per remote command.
//!
//! Each call validates its input first, so malformed coordinates never reach
//! the network. Failures are logged with the command name and returned.

use desktop_core::{
    ActionKind, ActuationError, ActuationResult, ApplicationInput, ClickMouseInput, Coordinates,
    DragMouseInput, MoveMouseInput, PasteTextInput, PressKeysInput, PressMouseInput, ScrollInput,
    TraceMouseInput, TypeKeysInput, TypeTextInput, Validate, WaitInput,
};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::client::ActuationClient;

#[derive(Debug, Deserialize)]
struct ScreenshotResponse {
    #[serde(default)]
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CursorPositionResponse {
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
}

fn log_failure(kind: ActionKind, error: ActuationError) -> ActuationError {
    error!("Error in {} action: {}", kind, error);
    error
}

fn describe_at(coordinates: Option<&Coordinates>) -> String {
    coordinates
        .map(|c| format!(" at coordinates: {}", c))
        .unwrap_or_default()
}

fn describe_hold_keys(keys: &[String]) -> String {
    if keys.is_empty() {
        String::new()
    } else {
        format!(" with holdKeys: {}", keys.join(","))
    }
}

impl ActuationClient {
    async fn perform<P>(&self, kind: ActionKind, input: &P) -> ActuationResult<()>
    where
        P: Serialize + Validate,
    {
        let result = match input.validate() {
            Ok(()) => self.send(kind.as_str(), input).await.map(drop),
            Err(e) => Err(e),
        };
        result.map_err(|e| log_failure(kind, e))
    }

    pub async fn move_mouse(&self, input: &MoveMouseInput) -> ActuationResult<()> {
        debug!("Moving mouse to coordinates: {}", input.coordinates);
        self.perform(ActionKind::MoveMouse, input).await
    }

    pub async fn trace_mouse(&self, input: &TraceMouseInput) -> ActuationResult<()> {
        debug!(
            "Tracing mouse along {} points{}",
            input.path.len(),
            describe_hold_keys(&input.hold_keys)
        );
        self.perform(ActionKind::TraceMouse, input).await
    }

    pub async fn click_mouse(&self, input: &ClickMouseInput) -> ActuationResult<()> {
        debug!(
            "Clicking mouse {} {} times{}{}",
            input.button.as_str(),
            input.click_count,
            describe_at(input.coordinates.as_ref()),
            describe_hold_keys(&input.hold_keys)
        );
        self.perform(ActionKind::ClickMouse, input).await
    }

    pub async fn press_mouse(&self, input: &PressMouseInput) -> ActuationResult<()> {
        debug!(
            "Pressing mouse {} {}{}",
            input.button.as_str(),
            input.press.as_str(),
            describe_at(input.coordinates.as_ref())
        );
        self.perform(ActionKind::PressMouse, input).await
    }

    pub async fn drag_mouse(&self, input: &DragMouseInput) -> ActuationResult<()> {
        debug!(
            "Dragging mouse {} along {} points{}",
            input.button.as_str(),
            input.path.len(),
            describe_hold_keys(&input.hold_keys)
        );
        self.perform(ActionKind::DragMouse, input).await
    }

    pub async fn scroll(&self, input: &ScrollInput) -> ActuationResult<()> {
        debug!(
            "Scrolling {} {} times{}",
            input.direction.as_str(),
            input.scroll_count,
            describe_at(input.coordinates.as_ref())
        );
        self.perform(ActionKind::Scroll, input).await
    }

    pub async fn type_keys(&self, input: &TypeKeysInput) -> ActuationResult<()> {
        debug!("Typing keys: {}", input.keys.join(","));
        self.perform(ActionKind::TypeKeys, input).await
    }

    pub async fn press_keys(&self, input: &PressKeysInput) -> ActuationResult<()> {
        debug!(
            "Pressing keys {}: {}",
            input.press.as_str(),
            input.keys.join(",")
        );
        self.perform(ActionKind::PressKeys, input).await
    }

    pub async fn type_text(&self, input: &TypeTextInput) -> ActuationResult<()> {
        debug!("Typing {} characters", input.text.chars().count());
        self.perform(ActionKind::TypeText, input).await
    }

    pub async fn paste_text(&self, input: &PasteTextInput) -> ActuationResult<()> {
        debug!("Pasting {} characters", input.text.chars().count());
        self.perform(ActionKind::PasteText, input).await
    }

    pub async fn wait(&self, input: &WaitInput) -> ActuationResult<()> {
        debug!("Waiting for {}ms", input.duration);
        self.perform(ActionKind::Wait, input).await
    }

    pub async fn application(&self, input: &ApplicationInput) -> ActuationResult<()> {
        debug!("Opening application: {}", input.application);
        self.perform(ActionKind::Application, input).await
    }

    /// Returns the screenshot as base64-encoded PNG.
    pub async fn screenshot(&self) -> ActuationResult<String> {
        debug!("Taking screenshot");
        self.fetch_screenshot()
            .await
            .map_err(|e| log_failure(ActionKind::Screenshot, e))
    }

    pub async fn cursor_position(&self) -> ActuationResult<Coordinates> {
        debug!("Getting cursor position");
        self.fetch_cursor_position()
            .await
            .map_err(|e| log_failure(ActionKind::CursorPosition, e))
    }

    async fn fetch_screenshot(&self) -> ActuationResult<String> {
        let command = ActionKind::Screenshot.as_str();
        let response: ScreenshotResponse = self.send(command, &()).await?.json()?;
        match response.image {
            Some(image) if !image.is_empty() => Ok(image),
            _ => Err(ActuationError::invalid_response(
                command,
                "no image data received",
            )),
        }
    }

    async fn fetch_cursor_position(&self) -> ActuationResult<Coordinates> {
        let command = ActionKind::CursorPosition.as_str();
        let response: CursorPositionResponse = self.send(command, &()).await?.json()?;
        match (response.x, response.y) {
            (Some(x), Some(y)) => Ok(Coordinates::new(x, y)),
            _ => Err(ActuationError::invalid_response(
                command,
                "invalid cursor position response received from desktop",
            )),
        }
    }
}
