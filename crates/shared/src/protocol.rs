use serde::{Deserialize, Serialize};

use crate::{domain::PageNumber, error::ProtocolError};

/// Multipart field carrying the user's question text.
pub const QUESTION_FIELD: &str = "question";
/// Multipart field carrying the document bytes.
pub const FILE_FIELD: &str = "file";

pub const DEFAULT_SERVICE_PORT: u16 = 5001;
pub const DEFAULT_ASK_PATH: &str = "chatbot";
pub const DEFAULT_DOCUMENT_MIME: &str = "application/pdf";

/// Shown in place of an answer whenever the round-trip fails for any reason.
pub const FALLBACK_ANSWER: &str = "No answer found";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_pdf_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i64>,
}

impl AnswerResponse {
    pub fn decode(body: &[u8]) -> Result<Self, ProtocolError> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        if value.get("answer").map_or(true, serde_json::Value::is_null) {
            return Err(ProtocolError::MissingField("answer"));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Highlight path, with empty strings treated as absent.
    pub fn highlight_path(&self) -> Option<&str> {
        self.highlighted_pdf_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }

    pub fn page(&self) -> PageNumber {
        PageNumber::from_wire(self.page_number)
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
