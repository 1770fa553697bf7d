use std::{fmt, path::Path, sync::Arc};

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::protocol::{AnswerResponse, DEFAULT_DOCUMENT_MIME, FILE_FIELD, QUESTION_FIELD};
use tracing::{debug, error};

use crate::{endpoint::ServiceEndpoint, error::AskError};

/// The document a question is asked about.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_raw()
            .map(str::to_string);
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn mime_type(&self) -> &str {
        self.mime_type.as_deref().unwrap_or(DEFAULT_DOCUMENT_MIME)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub question: String,
    pub document: Arc<Document>,
}

#[async_trait]
pub trait AnsweringService: Send + Sync {
    async fn ask(&self, submission: &Submission) -> Result<AnswerResponse, AskError>;
}

pub struct HttpAnsweringService {
    http: Client,
    endpoint: ServiceEndpoint,
}

impl HttpAnsweringService {
    pub fn new(endpoint: ServiceEndpoint) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: ServiceEndpoint) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl AnsweringService for HttpAnsweringService {
    async fn ask(&self, submission: &Submission) -> Result<AnswerResponse, AskError> {
        let document = &submission.document;
        let file_part = Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str(document.mime_type())?;
        let form = Form::new()
            .text(QUESTION_FIELD, submission.question.clone())
            .part(FILE_FIELD, file_part);

        let url = self.endpoint.ask_url();
        debug!(%url, file = %document.file_name, bytes = document.len(), "posting question");
        let response = self.http.post(url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!(
                status = status.as_u16(),
                reason = status.canonical_reason().unwrap_or("unknown"),
                "answering service rejected question"
            );
            return Err(AskError::Status { status });
        }

        let body = response.bytes().await?;
        Ok(AnswerResponse::decode(&body)?)
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
