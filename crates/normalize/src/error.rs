use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Input file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Cannot parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unexpected error on {}: {source}", path.display())]
    Unexpected {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
