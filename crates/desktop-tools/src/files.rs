//! Moves file contents between the agent and the desktop filesystem.
//!
//! Payloads travel base64-encoded in the `data` field. Unlike the rest of
//! the client, both operations report failure as a value instead of an
//! error, since their callers need an outcome to act on.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use desktop_core::{
    validate_file_path, ActionKind, ActuationResult, ContentBlock, ReadFileInput, Validate,
    WriteFileInput, DEFAULT_MEDIA_TYPE,
};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::client::ActuationClient;

const FALLBACK_FILE_NAME: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteFileOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WriteFileOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadFileOutcome {
    pub success: bool,
    /// Base64-encoded file content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ReadFileOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Decoded file bytes, if data is present and valid base64.
    pub fn decode(&self) -> Option<Vec<u8>> {
        self.data
            .as_deref()
            .and_then(|data| STANDARD.decode(data).ok())
    }

    /// Builds a document block for a successful read with data.
    ///
    /// Missing metadata is filled in: the name from the last segment of
    /// `requested_path`, the size from the decoded data, and the media type
    /// as `application/octet-stream`.
    pub fn to_document(&self, requested_path: &str) -> Option<ContentBlock> {
        let data = match (&self.success, &self.data) {
            (true, Some(data)) if !data.is_empty() => data,
            _ => return None,
        };

        let name = self
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| file_name(requested_path))
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
        let size = self
            .size
            .or_else(|| self.decode().map(|bytes| bytes.len() as u64))
            .unwrap_or(0);
        let media_type = self
            .media_type
            .clone()
            .filter(|media_type| !media_type.is_empty())
            .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string());

        Some(ContentBlock::Document {
            base64: data.clone(),
            media_type,
            name,
            size,
        })
    }
}

fn file_name(path: &str) -> Option<String> {
    path.rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[derive(Serialize)]
struct WriteFilePayload<'a> {
    path: &'a str,
    data: String,
}

fn write_outcome(result: ActuationResult<WriteFileOutcome>) -> WriteFileOutcome {
    result.unwrap_or_else(|e| {
        error!("Error in write_file action: {}", e);
        WriteFileOutcome::failure(format!("Error writing file: {}", e))
    })
}

/// Read/write access to the desktop filesystem over the actuation client.
#[derive(Debug, Clone)]
pub struct FileTransfer {
    client: Arc<ActuationClient>,
}

impl FileTransfer {
    pub fn new(client: Arc<ActuationClient>) -> Self {
        Self { client }
    }

    /// Writes the text content of `input` to its path.
    pub async fn write(&self, input: &WriteFileInput) -> WriteFileOutcome {
        debug!(
            "Writing file: {} ({} bytes)",
            input.path,
            input.content.len()
        );
        let result = match input.validate() {
            Ok(()) => self.send_write(&input.path, input.content.as_bytes()).await,
            Err(e) => Err(e),
        };
        write_outcome(result)
    }

    pub async fn write_file(&self, path: &str, content: &str) -> WriteFileOutcome {
        self.write(&WriteFileInput {
            path: path.to_string(),
            content: content.to_string(),
        })
        .await
    }

    /// Writes arbitrary binary content to `path`.
    pub async fn write_bytes(&self, path: &str, bytes: &[u8]) -> WriteFileOutcome {
        debug!("Writing file: {} ({} bytes)", path, bytes.len());
        let result = match validate_file_path(path) {
            Ok(()) => self.send_write(path, bytes).await,
            Err(e) => Err(e),
        };
        write_outcome(result)
    }

    pub async fn read(&self, input: &ReadFileInput) -> ReadFileOutcome {
        debug!("Reading file: {}", input.path);
        match self.try_read(input).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error in read_file action: {}", e);
                ReadFileOutcome::failure(format!("Error reading file: {}", e))
            }
        }
    }

    pub async fn read_file(&self, path: &str) -> ReadFileOutcome {
        self.read(&ReadFileInput {
            path: path.to_string(),
        })
        .await
    }

    async fn send_write(&self, path: &str, bytes: &[u8]) -> ActuationResult<WriteFileOutcome> {
        let payload = WriteFilePayload {
            path,
            data: STANDARD.encode(bytes),
        };
        self.client
            .send(ActionKind::WriteFile.as_str(), &payload)
            .await?
            .json()
    }

    async fn try_read(&self, input: &ReadFileInput) -> ActuationResult<ReadFileOutcome> {
        input.validate()?;
        self.client
            .send(ActionKind::ReadFile.as_str(), input)
            .await?
            .json()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use super::*;
    use crate::config::DesktopConfig;

    fn transfer(base_url: &str) -> FileTransfer {
        let config = DesktopConfig::new(base_url)
            .unwrap()
            .with_fetch_timeout(Duration::from_secs(5));
        FileTransfer::new(Arc::new(ActuationClient::new(&config).unwrap()))
    }

    /// A desktop stub that stores written files and serves them back.
    async fn echo_server() -> MockServer {
        let server = MockServer::start().await;
        let files: Arc<Mutex<HashMap<String, String>>> = Arc::default();

        Mock::given(method("POST"))
            .and(path("/computer-use"))
            .respond_with(move |request: &Request| {
                let body: Value = serde_json::from_slice(&request.body).unwrap();
                let file_path = body["path"].as_str().unwrap_or_default().to_string();
                let mut files = files.lock().unwrap();
                match body["action"].as_str() {
                    Some("write_file") => {
                        let data = body["data"].as_str().unwrap_or_default().to_string();
                        files.insert(file_path, data);
                        ResponseTemplate::new(200).set_body_json(json!({"success": true}))
                    }
                    Some("read_file") => match files.get(&file_path) {
                        Some(data) => ResponseTemplate::new(200).set_body_json(json!({
                            "success": true,
                            "data": data,
                            "name": file_path.rsplit('/').next(),
                            "mediaType": "text/plain"
                        })),
                        None => ResponseTemplate::new(200).set_body_json(json!({
                            "success": false,
                            "message": format!("File not found: {}", file_path)
                        })),
                    },
                    _ => ResponseTemplate::new(400),
                }
            })
            .mount(&server)
            .await;

        server
    }

    #[tokio::test]
    async fn read_returns_what_was_written() {
        let server = echo_server().await;
        let files = transfer(&server.uri());

        let written = files.write_file("/tmp/notes.txt", "hello desktop").await;
        assert!(written.success, "{written:?}");

        let read = files.read_file("/tmp/notes.txt").await;
        assert!(read.success);
        assert_eq!(read.name.as_deref(), Some("notes.txt"));
        assert_eq!(read.decode().unwrap(), b"hello desktop");
    }

    #[tokio::test]
    async fn write_sends_base64_data() {
        let server = echo_server().await;
        let files = transfer(&server.uri());

        files.write_bytes("/tmp/blob.bin", &[0, 1, 2, 255]).await;

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(
            body,
            json!({"action": "write_file", "path": "/tmp/blob.bin", "data": "AAEC/w=="})
        );
    }

    #[tokio::test]
    async fn remote_value_level_failure_passes_through() {
        let server = echo_server().await;
        let read = transfer(&server.uri()).read_file("/missing.txt").await;

        assert!(!read.success);
        assert_eq!(read.message.as_deref(), Some("File not found: /missing.txt"));
        assert!(read.to_document("/missing.txt").is_none());
    }

    #[tokio::test]
    async fn transport_failures_become_values() {
        let files = transfer("http://127.0.0.1:1");

        let written = files.write_file("/tmp/a.txt", "x").await;
        assert!(!written.success);
        assert!(written
            .message
            .unwrap()
            .starts_with("Error writing file: Desktop action \"write_file\" failed"));

        let read = files.read_file("/tmp/a.txt").await;
        assert!(!read.success);
        assert!(read.message.unwrap().starts_with("Error reading file:"));
    }

    #[tokio::test]
    async fn empty_path_is_rejected_locally() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let files = transfer(&server.uri());
        let read = files.read_file(" ").await;
        assert!(!read.success);
        assert!(read.message.unwrap().contains("file path cannot be empty"));

        let written = files
            .write(&WriteFileInput {
                path: String::new(),
                content: "ignored".to_string(),
            })
            .await;
        assert!(!written.success);
        assert_eq!(
            written.message.as_deref(),
            Some("Error writing file: Invalid input: file path cannot be empty")
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn document_fills_in_missing_metadata() {
        let outcome = ReadFileOutcome {
            success: true,
            data: Some("aGVsbG8=".to_string()),
            ..Default::default()
        };

        let block = outcome.to_document("C:\\Users\\me\\report.pdf").unwrap();
        assert_eq!(
            block,
            ContentBlock::Document {
                base64: "aGVsbG8=".to_string(),
                media_type: DEFAULT_MEDIA_TYPE.to_string(),
                name: "report.pdf".to_string(),
                size: 5,
            }
        );
    }

    #[test]
    fn document_falls_back_to_generic_name() {
        let outcome = ReadFileOutcome {
            success: true,
            data: Some("aGVsbG8=".to_string()),
            size: Some(42),
            media_type: Some("text/plain".to_string()),
            ..Default::default()
        };

        match outcome.to_document("/").unwrap() {
            ContentBlock::Document {
                name, size, media_type, ..
            } => {
                assert_eq!(name, "file");
                assert_eq!(size, 42);
                assert_eq!(media_type, "text/plain");
            }
            other => panic!("unexpected block {other:?}"),
        }
    }

    #[test]
    fn success_without_data_has_no_document() {
        let outcome = ReadFileOutcome {
            success: true,
            data: Some(String::new()),
            ..Default::default()
        };
        assert!(outcome.to_document("/tmp/empty").is_none());
    }
}
