use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use crate::error::ExtractError;
use crate::source::ImageFile;

/// A file the remote service has accepted and can be referenced by URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub uri: String,
    pub mime_type: String,
    pub display_name: String,
}

/// One transcription call: every uploaded page in order, then the instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub files: Vec<UploadedFile>,
    pub instruction: String,
    pub response_schema: Option<Value>,
}

/// Abstraction over a remote document-understanding service.
#[async_trait]
pub trait DocumentModel: Send + Sync {
    async fn upload(&self, image: &ImageFile) -> Result<UploadedFile, ExtractError>;

    /// Returns the response body text as produced by the model.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ExtractError>;
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Accepts every upload and answers with a preset text. Records what it was
/// asked so tests can check ordering and request shape.
#[derive(Debug)]
pub struct MockModel {
    response: Result<String, String>,
    uploads: Mutex<Vec<String>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockModel {
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_response(Ok(response.into()))
    }

    /// A model whose generate call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_response(Err(message.into()))
    }

    fn with_response(response: Result<String, String>) -> Self {
        Self {
            response,
            uploads: Mutex::default(),
            requests: Mutex::default(),
        }
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().map(|u| u.clone()).unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DocumentModel for MockModel {
    async fn upload(&self, image: &ImageFile) -> Result<UploadedFile, ExtractError> {
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(image.file_name.clone());
        }
        Ok(UploadedFile {
            uri: format!("mock://files/{}", image.file_name),
            mime_type: image.mime_type.to_string(),
            display_name: image.file_name.clone(),
        })
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, ExtractError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.response.clone().map_err(ExtractError::RemoteService)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn page(name: &str) -> ImageFile {
        ImageFile {
            path: PathBuf::from(name),
            file_name: name.to_string(),
            mime_type: "image/jpeg",
            bytes: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn mock_records_uploads_and_returns_preset_text() {
        let m = MockModel::new("{\"Name\": \"Jan\"}");
        let f = m.upload(&page("p1.jpg")).await.unwrap();
        assert_eq!(f.uri, "mock://files/p1.jpg");
        let req = GenerateRequest {
            files: vec![f],
            instruction: "go".into(),
            response_schema: None,
        };
        assert_eq!(m.generate(&req).await.unwrap(), "{\"Name\": \"Jan\"}");
        assert_eq!(m.uploads(), vec!["p1.jpg"]);
        assert_eq!(m.requests(), vec![req]);
    }

    #[tokio::test]
    async fn failing_mock_reports_remote_failure() {
        let m = MockModel::failing("quota exceeded");
        let req = GenerateRequest {
            files: vec![],
            instruction: "go".into(),
            response_schema: None,
        };
        let err = m.generate(&req).await.unwrap_err();
        assert!(matches!(err, ExtractError::RemoteService(ref msg) if msg == "quota exceeded"));
    }
}
