pub mod credential;
pub mod error;
pub mod gemini;
pub mod hash;
pub mod model;
pub mod prompt;
pub mod requestor;
pub mod source;

pub use credential::Credential;
pub use error::ExtractError;
pub use gemini::GeminiClient;
pub use hash::{dedupe, sha256_bytes, to_hex};
pub use model::{DocumentModel, GenerateRequest, MockModel, UploadedFile};
pub use prompt::{freeform_prompt, response_schema, Instruction, SCHEMA_PROMPT};
pub use requestor::{Extraction, ExtractionRequestor};
pub use source::{collect_images, mime_for_extension, ImageFile};
