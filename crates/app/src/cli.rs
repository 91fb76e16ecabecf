use clap::{Args, Parser, Subcommand};
use memorie_core::ExtractionMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "memorie",
    version,
    about = "Transcribe scanned estate inventories and flatten them to CSV."
)]
pub struct Cli {
    /// Show debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload scanned pages to the document model and save its JSON transcription.
    Extract(ExtractArgs),
    /// Flatten a JSON transcription into one CSV row per asset or liability.
    Normalize(NormalizeArgs),
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Directory holding the scanned pages
    pub image_dir: PathBuf,

    /// Where to write the raw response
    #[arg(short = 'o', long = "output_file", default_value = "response.txt")]
    pub output_file: PathBuf,

    /// schema (default) or freeform
    #[arg(long)]
    pub mode: Option<ExtractionMode>,

    /// Model id, e.g. gemini-2.5-pro
    #[arg(long)]
    pub model: Option<String>,

    /// Replace the built-in instruction text
    #[arg(long)]
    pub prompt: Option<String>,

    /// Env file to load the API key from, if it exists
    #[arg(long, default_value = "environ.env")]
    pub env_file: PathBuf,

    /// Settings file (default: ./memorie.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct NormalizeArgs {
    /// JSON or fenced-JSON transcription
    pub input_file: PathBuf,

    /// Output CSV (default: input path with a .csv extension)
    #[arg(short = 'o', long = "output_file")]
    pub output_file: Option<PathBuf>,

    /// Settings file (default: ./memorie.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
