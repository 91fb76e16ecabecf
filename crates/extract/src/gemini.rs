//! Gemini REST client: resumable file upload plus `generateContent`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::credential::Credential;
use crate::error::ExtractError;
use crate::model::{DocumentModel, GenerateRequest, UploadedFile};
use crate::source::ImageFile;

const API_KEY_HEADER: &str = "x-goog-api-key";
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

pub struct GeminiClient {
    client: reqwest::Client,
    credential: Credential,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        credential: Credential,
        api_base: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractError::RemoteService(format!("cannot create HTTP client: {e}")))?;
        Ok(Self {
            client,
            credential,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn upload_start_url(&self) -> String {
        format!("{}/upload/v1beta/files", self.api_base)
    }

    fn generate_url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct StartUpload<'a> {
    file: FileMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct FileMetadata<'a> {
    display_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: RemoteFile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteFile {
    uri: String,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    File {
        #[serde(rename = "fileData")]
        file_data: FileData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData<'a> {
    mime_type: &'a str,
    file_uri: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Image parts first, in upload order, then the instruction text.
fn generate_body(request: &GenerateRequest) -> GenerateContentBody<'_> {
    let mut parts: Vec<Part<'_>> = request
        .files
        .iter()
        .map(|f| Part::File {
            file_data: FileData {
                mime_type: &f.mime_type,
                file_uri: &f.uri,
            },
        })
        .collect();
    parts.push(Part::Text {
        text: &request.instruction,
    });

    GenerateContentBody {
        contents: vec![Content { role: "user", parts }],
        generation_config: request.response_schema.as_ref().map(|schema| GenerationConfig {
            response_mime_type: "application/json",
            response_schema: schema,
        }),
    }
}

/// Concatenated text of the first candidate.
fn response_text(response: GenerateContentResponse) -> Result<String, ExtractError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(ExtractError::RemoteService(format!("empty response: {reason}")));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(ExtractError::RemoteService(format!(
            "response has no text (finish reason: {reason})"
        )));
    }
    Ok(text)
}

async fn check_status(
    response: reqwest::Response,
    what: &str,
) -> Result<reqwest::Response, ExtractError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ExtractError::RemoteService(format!("{what} failed with {status}: {body}")))
}

fn transport(what: &str) -> impl FnOnce(reqwest::Error) -> ExtractError + '_ {
    move |e| ExtractError::RemoteService(format!("{what}: {e}"))
}

#[async_trait]
impl DocumentModel for GeminiClient {
    async fn upload(&self, image: &ImageFile) -> Result<UploadedFile, ExtractError> {
        tracing::debug!("Starting upload of {} ({} bytes)", image.file_name, image.bytes.len());

        let start = self
            .client
            .post(self.upload_start_url())
            .header(API_KEY_HEADER, self.credential.expose())
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", image.bytes.len())
            .header("X-Goog-Upload-Header-Content-Type", image.mime_type)
            .json(&StartUpload {
                file: FileMetadata {
                    display_name: &image.file_name,
                },
            })
            .send()
            .await
            .map_err(transport("upload start"))?;
        let start = check_status(start, "upload start").await?;

        let session_url = start
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                ExtractError::RemoteService("upload start returned no session URL".into())
            })?;

        let finished = self
            .client
            .post(session_url)
            .header(API_KEY_HEADER, self.credential.expose())
            .header("X-Goog-Upload-Offset", 0)
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(image.bytes.clone())
            .send()
            .await
            .map_err(transport("upload"))?;
        let finished = check_status(finished, "upload").await?;

        let uploaded: UploadResponse = finished
            .json()
            .await
            .map_err(transport("upload response"))?;

        tracing::info!("Uploaded {} as {}", image.file_name, uploaded.file.uri);
        Ok(UploadedFile {
            uri: uploaded.file.uri,
            mime_type: uploaded
                .file
                .mime_type
                .unwrap_or_else(|| image.mime_type.to_string()),
            display_name: uploaded
                .file
                .display_name
                .unwrap_or_else(|| image.file_name.clone()),
        })
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, ExtractError> {
        tracing::info!(
            "Requesting transcription from {} ({} pages, schema: {})",
            self.model,
            request.files.len(),
            request.response_schema.is_some()
        );

        let response = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, self.credential.expose())
            .json(&generate_body(request))
            .send()
            .await
            .map_err(transport("generateContent"))?;
        let response = check_status(response, "generateContent").await?;

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(transport("generateContent response"))?;
        response_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(schema: Option<Value>) -> GenerateRequest {
        GenerateRequest {
            files: vec![
                UploadedFile {
                    uri: "https://files/a".into(),
                    mime_type: "image/png".into(),
                    display_name: "a.png".into(),
                },
                UploadedFile {
                    uri: "https://files/b".into(),
                    mime_type: "image/jpeg".into(),
                    display_name: "b.jpg".into(),
                },
            ],
            instruction: "Transcribe".into(),
            response_schema: schema,
        }
    }

    #[test]
    fn body_lists_files_then_text() {
        let req = request(None);
        let body = serde_json::to_value(generate_body(&req)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"fileData": {"mimeType": "image/png", "fileUri": "https://files/a"}},
                        {"fileData": {"mimeType": "image/jpeg", "fileUri": "https://files/b"}},
                        {"text": "Transcribe"}
                    ]
                }]
            })
        );
    }

    #[test]
    fn body_carries_schema_when_given() {
        let req = request(Some(json!({"type": "OBJECT"})));
        let body = serde_json::to_value(generate_body(&req)).unwrap();
        assert_eq!(
            body["generationConfig"],
            json!({"responseMimeType": "application/json", "responseSchema": {"type": "OBJECT"}})
        );
    }

    #[test]
    fn response_text_joins_parts() {
        let r: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"Name\":"}, {"text": "\"Jan\"}"}]}}]
        }))
        .unwrap();
        assert_eq!(response_text(r).unwrap(), "{\"Name\":\"Jan\"}");
    }

    #[test]
    fn blocked_prompt_is_remote_failure() {
        let r: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        let err = response_text(r).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn candidate_without_text_is_remote_failure() {
        let r: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "MAX_TOKENS"}]
        }))
        .unwrap();
        let err = response_text(r).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn upload_response_shape() {
        let r: UploadResponse = serde_json::from_value(json!({
            "file": {
                "name": "files/abc",
                "uri": "https://files/abc",
                "mimeType": "image/png",
                "state": "ACTIVE"
            }
        }))
        .unwrap();
        assert_eq!(r.file.uri, "https://files/abc");
        assert_eq!(r.file.mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn urls_trim_trailing_slash() {
        let c = GeminiClient::new(
            Credential::from_value("K", Some("k".into())).unwrap(),
            "http://localhost:9000/",
            "gemini-2.5-pro",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(c.upload_start_url(), "http://localhost:9000/upload/v1beta/files");
        assert_eq!(
            c.generate_url(),
            "http://localhost:9000/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }
}
