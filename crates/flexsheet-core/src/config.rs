use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::FlexsheetError;
use crate::parsing::DEFAULT_COMPANY_NAME;

/// Height in points of the stamped signature image.
pub const DEFAULT_SIGNATURE_HEIGHT: f32 = 50.0;

/// User settings for signing runs, read from a JSON file.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Company line written into the document record and output file names.
    pub company_name: String,
    /// Name printed next to the signature date.
    pub manager: String,
    /// Folder receiving the signed PDF and the Excel export.
    pub output_folder: PathBuf,
    /// Signature image (PNG or JPEG).
    pub signature: Option<PathBuf>,
    pub signature_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            manager: String::new(),
            output_folder: PathBuf::from("."),
            signature: None,
            signature_height: DEFAULT_SIGNATURE_HEIGHT,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Settings, FlexsheetError> {
        let content = std::fs::read_to_string(path).map_err(|e| FlexsheetError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    /// Parse settings from a JSON string; `source` is only used in errors.
    pub fn parse(json: &str, source: &Path) -> Result<Settings, FlexsheetError> {
        let settings: Settings = serde_json::from_str(json).map_err(|e| FlexsheetError::Config {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
        settings.validate(source)?;
        Ok(settings)
    }

    fn validate(&self, source: &Path) -> Result<(), FlexsheetError> {
        if !(self.signature_height.is_finite() && self.signature_height > 0.0) {
            return Err(FlexsheetError::Config {
                path: source.to_path_buf(),
                reason: format!(
                    "signature_height must be a positive number, got {}",
                    self.signature_height
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let s = Settings::parse("{}", Path::new("settings.json")).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.company_name, DEFAULT_COMPANY_NAME);
    }

    #[test]
    fn test_partial_settings() {
        let s = Settings::parse(
            r#"{"manager": "Ann Lee", "output_folder": "/tmp/out"}"#,
            Path::new("settings.json"),
        )
        .unwrap();
        assert_eq!(s.manager, "Ann Lee");
        assert_eq!(s.output_folder, PathBuf::from("/tmp/out"));
        assert_eq!(s.signature_height, DEFAULT_SIGNATURE_HEIGHT);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Settings::parse(r#"{"manger": "typo"}"#, Path::new("s.json")).unwrap_err();
        assert!(matches!(err, FlexsheetError::Config { .. }));
    }

    #[test]
    fn test_non_positive_height_rejected() {
        assert!(Settings::parse(r#"{"signature_height": 0}"#, Path::new("s.json")).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, FlexsheetError::Config { .. }));
    }
}
