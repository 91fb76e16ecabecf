use anyhow::{anyhow, Context, Result};
use memorie_core::Settings;
use memorie_extract::{Credential, ExtractionRequestor, GeminiClient, Instruction};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{ExtractArgs, NormalizeArgs};

const API_KEY_HINT: &str = "Get a key from https://aistudio.google.com/app/apikey";

pub async fn extract(args: ExtractArgs) -> Result<()> {
    load_env_file(&args.env_file);
    let settings = Settings::resolve(args.config.as_deref())?;

    let mut opts = settings.extract;
    if let Some(model) = args.model {
        opts.model = model;
    }
    if let Some(mode) = args.mode {
        opts.mode = mode;
    }
    if args.prompt.is_some() {
        opts.prompt = args.prompt;
    }

    // Checked before anything touches the network.
    let credential =
        Credential::from_env(&opts.api_key_env).map_err(|e| anyhow!("{e}. {API_KEY_HINT}"))?;

    let client = GeminiClient::new(
        credential,
        &opts.api_base,
        &opts.model,
        Duration::from_secs(opts.timeout_secs),
    )?;
    let instruction = Instruction::for_mode(opts.mode, &settings.fields, opts.prompt.as_deref());
    tracing::info!("Extracting with {} in {} mode", opts.model, opts.mode);

    let result = ExtractionRequestor::new(client, instruction)
        .run(&args.image_dir, &args.output_file)
        .await
        .context("Extraction failed")?;

    if let Some(line) = duplicates_line(&result.duplicates) {
        println!("{line}");
    }
    println!(
        "Transcription of {} page(s) written to '{}'.",
        result.images.len(),
        result.output_path.display()
    );
    Ok(())
}

pub fn normalize(args: NormalizeArgs) -> Result<()> {
    let settings = Settings::resolve(args.config.as_deref())?;
    let output = args
        .output_file
        .unwrap_or_else(|| memorie_normalize::default_output_path(&args.input_file));

    let result = memorie_normalize::normalize_with(&args.input_file, &output, &settings.fields)?;

    println!(
        "Combined data exported to '{}' ({} row(s)).",
        result.output_path.display(),
        result.row_count
    );
    Ok(())
}

fn duplicates_line(duplicates: &[PathBuf]) -> Option<String> {
    if duplicates.is_empty() {
        return None;
    }
    let names: Vec<String> = duplicates
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string())
        })
        .collect();
    Some(format!(
        "Skipped {} duplicate page(s): {}.",
        names.len(),
        names.join(", ")
    ))
}

/// A missing env file is fine; a malformed one is reported and skipped.
fn load_env_file(path: &Path) {
    match dotenvy::from_path(path) {
        Ok(()) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring env file {}: {e}", path.display()),
    }
}
