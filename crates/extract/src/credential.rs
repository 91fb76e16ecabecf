use std::fmt;

use crate::error::ExtractError;

/// An API key. Holding one is the precondition for building a remote client,
/// so a missing key is reported before any request is attempted.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn from_env(var: &str) -> Result<Self, ExtractError> {
        Self::from_value(var, std::env::var(var).ok())
    }

    /// Blank values count as missing.
    pub fn from_value(var: &str, value: Option<String>) -> Result<Self, ExtractError> {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => Ok(Self(v)),
            _ => Err(ExtractError::MissingCredential { var: var.to_string() }),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_value_is_accepted() {
        let c = Credential::from_value("GOOGLE_API_KEY", Some(" abc123 \n".into())).unwrap();
        assert_eq!(c.expose(), "abc123");
    }

    #[test]
    fn absent_or_blank_is_missing() {
        for value in [None, Some(String::new()), Some("   ".into())] {
            let err = Credential::from_value("GOOGLE_API_KEY", value).unwrap_err();
            assert!(matches!(
                err,
                ExtractError::MissingCredential { ref var } if var == "GOOGLE_API_KEY"
            ));
        }
    }

    #[test]
    fn debug_does_not_leak_key() {
        let c = Credential::from_value("K", Some("secret".into())).unwrap();
        assert!(!format!("{c:?}").contains("secret"));
    }
}
