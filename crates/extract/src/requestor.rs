use memorie_core::write_atomic;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ExtractError;
use crate::hash;
use crate::model::{DocumentModel, GenerateRequest};
use crate::prompt::Instruction;
use crate::source;

/// The result of a single extraction run.
#[derive(Debug)]
pub struct Extraction {
    pub output_path: PathBuf,
    /// Pages sent to the service, in request order.
    pub images: Vec<PathBuf>,
    /// Pages skipped because an identical file was already sent.
    pub duplicates: Vec<PathBuf>,
    pub response_bytes: usize,
}

/// Orchestrates: collect → dedupe → upload each page → one generate call → write.
pub struct ExtractionRequestor<M: DocumentModel> {
    model: M,
    instruction: Instruction,
}

impl<M: DocumentModel> ExtractionRequestor<M> {
    pub fn new(model: M, instruction: Instruction) -> Self {
        Self { model, instruction }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Transcribe the images in `image_dir` and write the raw response to
    /// `output`. Nothing is written unless the service answered.
    pub async fn run(&self, image_dir: &Path, output: &Path) -> Result<Extraction, ExtractError> {
        // 1. Collect pages in file-name order.
        let images = source::collect_images(image_dir).await?;

        // 2. Drop byte-identical copies.
        let (images, duplicates) = hash::dedupe(images);
        tracing::info!(
            "Sending {} page(s) from {}",
            images.len(),
            image_dir.display()
        );

        // 3. Upload sequentially so the request order matches the page order.
        let mut files = Vec::with_capacity(images.len());
        for image in &images {
            files.push(self.model.upload(image).await?);
        }

        // 4. One transcription call.
        let request = GenerateRequest {
            files,
            instruction: self.instruction.text.clone(),
            response_schema: self.instruction.response_schema.clone(),
        };
        let text = self.model.generate(&request).await?;

        // 5. Persist the raw body.
        let response_bytes = write_response(output, &text)?;
        tracing::info!("Response written to {}", output.display());

        Ok(Extraction {
            output_path: output.to_path_buf(),
            images: images.into_iter().map(|i| i.path).collect(),
            duplicates,
            response_bytes,
        })
    }
}

/// Replace `path` with `text` plus a trailing newline, via a temp file beside it.
fn write_response(path: &Path, text: &str) -> Result<usize, ExtractError> {
    write_atomic(path, |file| writeln!(file, "{text}")).map_err(|source| ExtractError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.len() + 1)
}
