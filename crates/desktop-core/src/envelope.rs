use serde::{Deserialize, Serialize};

pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";
pub const PNG_MEDIA_TYPE: &str = "image/png";

/// One piece of content in a result envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Image { base64: String, media_type: String },
    #[serde(rename_all = "camelCase")]
    Document {
        base64: String,
        media_type: String,
        name: String,
        size: u64,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn png(base64: impl Into<String>) -> Self {
        ContentBlock::Image {
            base64: base64.into(),
            media_type: PNG_MEDIA_TYPE.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, ContentBlock::Image { .. })
    }
}

/// The uniform outcome returned to the agent loop for every request.
///
/// An error envelope always carries exactly one text block describing the
/// failure and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    request_id: String,
    is_error: bool,
    content: Vec<ContentBlock>,
}

impl ResultEnvelope {
    pub fn success(request_id: impl Into<String>, content: Vec<ContentBlock>) -> Self {
        Self {
            request_id: request_id.into(),
            is_error: false,
            content,
        }
    }

    pub fn error(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            is_error: true,
            content: vec![ContentBlock::text(message)],
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn content(&self) -> &[ContentBlock] {
        &self.content
    }

    /// Text of the first text block, if any.
    pub fn text(&self) -> Option<&str> {
        self.content.iter().find_map(ContentBlock::as_text)
    }

    pub fn has_image(&self) -> bool {
        self.content.iter().any(ContentBlock::is_image)
    }
}
