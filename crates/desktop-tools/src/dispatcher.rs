//! Routes computer-use actions to the desktop and normalizes their outcome.
//!
//! Read-only actions return their result directly. Mutating actions are
//! followed by a settle delay and one confirmation screenshot so the agent
//! can see what changed. Nothing escapes [`ComputerUseDispatcher::handle`]:
//! every failure becomes an error envelope.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use desktop_core::{
    action_schemas, Action, ActionExecutor, ActionParseError, ActionRequest, ActuationResult,
    ConfigError, ContentBlock, ReadFileInput, ResultEnvelope, ToolSchema, ToolUseBlock,
};
use log::{debug, error, warn};

use crate::client::ActuationClient;
use crate::config::DesktopConfig;
use crate::files::FileTransfer;

pub const SUCCESS_TEXT: &str = "Tool executed successfully";
pub const SCREENSHOT_FAILED_TEXT: &str = "ERROR: Failed to take screenshot";
pub const CURSOR_FAILED_TEXT: &str = "ERROR: Failed to get cursor position";
const READ_FILE_FAILED_TEXT: &str = "Error reading file";
const WRITE_FILE_FAILED_TEXT: &str = "Error writing file";

fn tool_error(name: impl std::fmt::Display, cause: impl std::fmt::Display) -> String {
    format!("Error executing {} tool: {}", name, cause)
}

/// Outcome of the side-effecting part of a mutating action.
enum Performed {
    Done,
    Failed(String),
}

impl From<ActuationResult<()>> for Performed {
    fn from(result: ActuationResult<()>) -> Self {
        match result {
            Ok(()) => Performed::Done,
            Err(e) => Performed::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComputerUseDispatcher {
    client: Arc<ActuationClient>,
    files: FileTransfer,
    screenshot_delay: Duration,
}

impl ComputerUseDispatcher {
    pub fn new(config: &DesktopConfig) -> Result<Self, ConfigError> {
        let client = Arc::new(ActuationClient::new(config)?);
        Ok(Self::with_client(client, config.screenshot_delay()))
    }

    pub fn with_client(client: Arc<ActuationClient>, screenshot_delay: Duration) -> Self {
        Self {
            files: FileTransfer::new(client.clone()),
            client,
            screenshot_delay,
        }
    }

    pub fn client(&self) -> &ActuationClient {
        &self.client
    }

    pub fn files(&self) -> &FileTransfer {
        &self.files
    }

    pub fn screenshot_delay(&self) -> Duration {
        self.screenshot_delay
    }

    /// Handles a typed request. Failures name the action by its tool name
    /// (`computer_<action>`).
    pub async fn handle(&self, request: &ActionRequest) -> ResultEnvelope {
        self.dispatch(request, &request.kind().tool_name()).await
    }

    /// Parses a raw tool invocation and handles it. Failures name the action
    /// exactly as the block did.
    ///
    /// Unrecognized tool names are not rejected: they are logged and answered
    /// with the generic confirmation screenshot.
    pub async fn handle_tool_use(&self, block: &ToolUseBlock) -> ResultEnvelope {
        match ActionRequest::from_tool_use(block) {
            Ok(request) => self.dispatch(&request, &block.name).await,
            Err(ActionParseError::Unrecognized(name)) => {
                warn!("Unknown computer-use action: {}", name);
                self.confirm(&block.id).await
            }
            Err(ActionParseError::InvalidInput { name, source }) => {
                error!("Error in {} action: invalid input: {}", name, source);
                let cause = format!("Invalid input: {}", source);
                ResultEnvelope::error(&block.id, tool_error(name, cause))
            }
        }
    }

    async fn dispatch(&self, request: &ActionRequest, tool_name: &str) -> ResultEnvelope {
        let id = request.request_id.as_str();
        debug!("Dispatching {} (request {})", tool_name, id);

        let performed: Performed = match &request.action {
            Action::Screenshot => return self.take_screenshot(id).await,
            Action::CursorPosition => return self.get_cursor_position(id).await,
            Action::ReadFile(input) => return self.read_file(id, input).await,
            Action::WriteFile(input) => {
                let outcome = self.files.write(input).await;
                if outcome.success {
                    Performed::Done
                } else {
                    Performed::Failed(
                        outcome
                            .message
                            .unwrap_or_else(|| WRITE_FILE_FAILED_TEXT.to_string()),
                    )
                }
            }
            Action::MoveMouse(input) => self.client.move_mouse(input).await.into(),
            Action::TraceMouse(input) => self.client.trace_mouse(input).await.into(),
            Action::ClickMouse(input) => self.client.click_mouse(input).await.into(),
            Action::PressMouse(input) => self.client.press_mouse(input).await.into(),
            Action::DragMouse(input) => self.client.drag_mouse(input).await.into(),
            Action::Scroll(input) => self.client.scroll(input).await.into(),
            Action::TypeKeys(input) => self.client.type_keys(input).await.into(),
            Action::PressKeys(input) => self.client.press_keys(input).await.into(),
            Action::TypeText(input) => self.client.type_text(input).await.into(),
            Action::PasteText(input) => self.client.paste_text(input).await.into(),
            Action::Wait(input) => self.client.wait(input).await.into(),
            Action::Application(input) => self.client.application(input).await.into(),
        };

        match performed {
            Performed::Done => self.confirm(id).await,
            Performed::Failed(cause) => ResultEnvelope::error(id, tool_error(tool_name, cause)),
        }
    }

    /// Waits for the UI to settle, then attaches one screenshot if it can
    /// be taken.
    async fn confirm(&self, id: &str) -> ResultEnvelope {
        if !self.screenshot_delay.is_zero() {
            tokio::time::sleep(self.screenshot_delay).await;
        }

        let mut content = vec![ContentBlock::text(SUCCESS_TEXT)];
        match self.client.screenshot().await {
            Ok(image) => content.push(ContentBlock::png(image)),
            Err(e) => error!("Confirmation screenshot failed: {}", e),
        }
        ResultEnvelope::success(id, content)
    }

    async fn take_screenshot(&self, id: &str) -> ResultEnvelope {
        match self.client.screenshot().await {
            Ok(image) => ResultEnvelope::success(id, vec![ContentBlock::png(image)]),
            Err(_) => ResultEnvelope::error(id, SCREENSHOT_FAILED_TEXT),
        }
    }

    async fn get_cursor_position(&self, id: &str) -> ResultEnvelope {
        match self.client.cursor_position().await {
            Ok(position) => ResultEnvelope::success(
                id,
                vec![ContentBlock::text(format!(
                    "Cursor position: {}, {}",
                    position.x, position.y
                ))],
            ),
            Err(_) => ResultEnvelope::error(id, CURSOR_FAILED_TEXT),
        }
    }

    async fn read_file(&self, id: &str, input: &ReadFileInput) -> ResultEnvelope {
        let outcome = self.files.read(input).await;
        match outcome.to_document(&input.path) {
            Some(document) => ResultEnvelope::success(id, vec![document]),
            None => ResultEnvelope::error(
                id,
                outcome
                    .message
                    .unwrap_or_else(|| READ_FILE_FAILED_TEXT.to_string()),
            ),
        }
    }
}

#[async_trait]
impl ActionExecutor for ComputerUseDispatcher {
    async fn execute(&self, request: &ActionRequest) -> ResultEnvelope {
        self.handle(request).await
    }

    fn list_actions(&self) -> Vec<ToolSchema> {
        action_schemas()
    }
}

#[cfg(test)]
mod tests {
    use desktop_core::{ActionKind, Coordinates, MoveMouseInput, WaitInput};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn dispatcher(server: &MockServer) -> ComputerUseDispatcher {
        let config = DesktopConfig::new(&server.uri())
            .unwrap()
            .with_screenshot_delay(Duration::ZERO)
            .with_fetch_timeout(Duration::from_secs(5));
        ComputerUseDispatcher::new(&config).unwrap()
    }

    #[test]
    fn tool_error_names_the_action() {
        assert_eq!(
            tool_error(ActionKind::Scroll.tool_name(), "boom"),
            "Error executing computer_scroll tool: boom"
        );
    }

    #[tokio::test]
    async fn wait_is_followed_by_confirmation_screenshot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/computer-use"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"image": "abc"})))
            .expect(2)
            .mount(&server)
            .await;

        let request = ActionRequest::new("req-1", Action::Wait(WaitInput { duration: 10 }));
        let envelope = dispatcher(&server).handle(&request).await;

        assert!(!envelope.is_error());
        assert_eq!(envelope.request_id(), "req-1");
        assert_eq!(
            envelope.content(),
            &[ContentBlock::text(SUCCESS_TEXT), ContentBlock::png("abc")]
        );
    }

    #[tokio::test]
    async fn cursor_position_is_reported_as_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"x": 640, "y": 480})))
            .expect(1)
            .mount(&server)
            .await;

        let request = ActionRequest::new("req-2", Action::CursorPosition);
        let envelope = dispatcher(&server).handle(&request).await;

        assert!(!envelope.is_error());
        assert_eq!(envelope.text(), Some("Cursor position: 640, 480"));
    }

    #[tokio::test]
    async fn cursor_failure_hides_the_cause() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway detail"))
            .mount(&server)
            .await;

        let request = ActionRequest::new("req-3", Action::CursorPosition);
        let envelope = dispatcher(&server).handle(&request).await;

        assert!(envelope.is_error());
        assert_eq!(envelope.content(), &[ContentBlock::text(CURSOR_FAILED_TEXT)]);
    }

    #[tokio::test]
    async fn malformed_tool_input_is_an_error_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let block = ToolUseBlock::new(
            "toolu_1",
            "computer_move_mouse",
            json!({"coordinates": "top left"}),
        );
        let envelope = dispatcher(&server).handle_tool_use(&block).await;

        assert!(envelope.is_error());
        assert_eq!(envelope.request_id(), "toolu_1");
        assert!(envelope
            .text()
            .unwrap()
            .starts_with("Error executing computer_move_mouse tool: Invalid input:"));
    }

    #[test]
    fn lists_every_action() {
        let config = DesktopConfig::new("http://localhost:9990").unwrap();
        let dispatcher = ComputerUseDispatcher::new(&config).unwrap();
        assert_eq!(dispatcher.list_actions().len(), ActionKind::ALL.len());
        assert_eq!(dispatcher.screenshot_delay(), Duration::from_millis(750));
    }

    #[tokio::test]
    async fn invalid_coordinates_skip_confirmation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let request = ActionRequest::new(
            "req-4",
            Action::MoveMouse(MoveMouseInput {
                coordinates: Coordinates::new(f64::NAN, 1.0),
            }),
        );
        let envelope = dispatcher(&server).handle(&request).await;

        assert!(envelope.is_error());
        assert!(envelope.text().unwrap().contains("finite"));
    }
}
