pub mod error;
pub mod fence;
pub mod table;
pub mod writer;

pub use error::NormalizeError;
pub use fence::strip_fences;
pub use table::{flatten, render_cell, Table};
pub use writer::{write_csv, write_csv_atomic};

use memorie_core::{EstateRecord, FieldAliases, RecordWarning};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Outcome of a successful run.
#[derive(Debug)]
pub struct Normalized {
    pub output_path: PathBuf,
    pub row_count: usize,
    pub columns: Vec<String>,
    pub warnings: Vec<RecordWarning>,
}

/// `input.json` → `input.csv`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("csv")
}

/// Flatten the transcription at `input` into a CSV at `output` using the
/// default field aliases.
pub fn normalize(input: &Path, output: &Path) -> Result<Normalized, NormalizeError> {
    normalize_with(input, output, &FieldAliases::default())
}

pub fn normalize_with(
    input: &Path,
    output: &Path,
    aliases: &FieldAliases,
) -> Result<Normalized, NormalizeError> {
    let text = std::fs::read_to_string(input).map_err(|source| match source.kind() {
        ErrorKind::NotFound => NormalizeError::NotFound {
            path: input.to_path_buf(),
        },
        _ => NormalizeError::Unexpected {
            path: input.to_path_buf(),
            source,
        },
    })?;

    let (table, warnings) =
        flatten_text(&text, aliases).map_err(|message| NormalizeError::Parse {
            path: input.to_path_buf(),
            message,
        })?;

    for w in &warnings {
        tracing::warn!("{}: {w}", input.display());
    }

    write_csv_atomic(&table, output)?;
    tracing::info!("Wrote {} rows to {}", table.len(), output.display());

    Ok(Normalized {
        output_path: output.to_path_buf(),
        row_count: table.len(),
        columns: table.columns,
        warnings,
    })
}

/// Parse fenced or bare JSON text and flatten it. The error is a parse message.
pub fn flatten_text(
    text: &str,
    aliases: &FieldAliases,
) -> Result<(Table, Vec<RecordWarning>), String> {
    let root = parse_object(&strip_fences(text))?;
    let (record, mut warnings) = EstateRecord::from_object(&root, aliases);
    let (table, flatten_warnings) = flatten(&record, aliases);
    warnings.extend(flatten_warnings);
    Ok((table, warnings))
}

fn parse_object(json: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(json).map_err(|e| e.to_string())? {
        Value::Object(map) => Ok(map),
        other => Err(format!("expected a JSON object, found {}", json_kind(&other))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
