use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fields::FieldAliases;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_SETTINGS_FILE: &str = "memorie.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Cannot read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// How the transcription request constrains the model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// A response schema is sent; the service must return matching JSON.
    #[default]
    Schema,
    /// Legacy: the JSON template is spelled out in the prompt only.
    Freeform,
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionMode::Schema => write!(f, "schema"),
            ExtractionMode::Freeform => write!(f, "freeform"),
        }
    }
}

impl std::str::FromStr for ExtractionMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "schema" => Ok(ExtractionMode::Schema),
            "freeform" | "free-form" => Ok(ExtractionMode::Freeform),
            other => Err(format!("Unknown extraction mode: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractSettings {
    pub model: String,
    pub api_base: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub mode: ExtractionMode,
    pub timeout_secs: u64,
    /// Overrides the built-in instruction for the selected mode.
    pub prompt: Option<String>,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-pro".to_string(),
            api_base: "https://generativelanguage.googleapis.com".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            mode: ExtractionMode::default(),
            timeout_secs: 300,
            prompt: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub extract: ExtractSettings,
    pub fields: FieldAliases,
}

impl Settings {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, SettingsError> {
        toml::from_str(content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// An explicit path must exist; otherwise `memorie.toml` is used if present
    /// and the built-in defaults if not.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_SETTINGS_FILE);
                if path.is_file() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::EstateField;

    #[test]
    fn empty_file_gives_defaults() {
        let s = Settings::from_toml("", Path::new("x.toml")).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.extract.model, "gemini-2.5-pro");
        assert_eq!(s.extract.mode, ExtractionMode::Schema);
    }

    #[test]
    fn sections_merge_with_defaults() {
        let s = Settings::from_toml(
            r#"
            [extract]
            mode = "freeform"
            timeout_secs = 60

            [fields]
            net_wealth = "Saldo"
            "#,
            Path::new("x.toml"),
        )
        .unwrap();
        assert_eq!(s.extract.mode, ExtractionMode::Freeform);
        assert_eq!(s.extract.timeout_secs, 60);
        assert_eq!(s.extract.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(s.fields.key(EstateField::NetWealth), "Saldo");
        assert_eq!(s.fields.key(EstateField::Name), "Name");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err =
            Settings::from_toml("[extract]\nmodle = \"x\"\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memorie.toml");
        std::fs::write(&path, "[extract]\nmodel = \"gemini-2.5-flash\"\n").unwrap();
        let s = Settings::resolve(Some(&path)).unwrap();
        assert_eq!(s.extract.model, "gemini-2.5-flash");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::resolve(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn mode_from_str() {
        use std::str::FromStr;
        assert_eq!(ExtractionMode::from_str("Schema").unwrap(), ExtractionMode::Schema);
        assert_eq!(ExtractionMode::from_str("free-form").unwrap(), ExtractionMode::Freeform);
        assert!(ExtractionMode::from_str("loose").is_err());
    }
}
