use super::ArgumentBag;
use rmcp::model::{CallToolResult, Content};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Request to call a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<ArgumentBag>,
}

/// Uniform reply for every tool call, successful or not.
///
/// Callers tell the outcome apart by the serialized payload only: a failure
/// carries `{"error": "<message>"}`, a success carries the raw upstream result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub content: Vec<EnvelopeContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EnvelopeContent {
    Text { text: String },
}

impl ResponseEnvelope {
    pub fn success(result: &Value) -> Self {
        Self::from_text(result.to_string())
    }

    pub fn failure(message: impl std::fmt::Display) -> Self {
        Self::from_text(json!({ "error": message.to_string() }).to_string())
    }

    fn from_text(text: String) -> Self {
        Self {
            content: vec![EnvelopeContent::Text { text }],
        }
    }

    /// The serialized payload of the single text item
    pub fn text(&self) -> &str {
        match self.content.first() {
            Some(EnvelopeContent::Text { text }) => text,
            None => "",
        }
    }

    /// Parsed payload, mostly useful to callers inspecting for an `error` key
    pub fn payload(&self) -> serde_json::Result<Value> {
        serde_json::from_str(self.text())
    }

    pub fn error_message(&self) -> Option<String> {
        self.payload()
            .ok()?
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

impl From<ResponseEnvelope> for CallToolResult {
    fn from(envelope: ResponseEnvelope) -> Self {
        let content = envelope
            .content
            .into_iter()
            .map(|c| match c {
                EnvelopeContent::Text { text } => Content::text(text),
            })
            .collect();

        // Failures are reported in the payload, never through `is_error`
        CallToolResult::success(content)
    }
}
