//! Site settings file loading.

use std::path::Path;

use pbk_model::ConversionSettings;
use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// Loads conversion settings from a TOML file, or defaults when `path` is `None`.
pub fn load_settings(path: Option<&Path>) -> Result<ConversionSettings> {
    let Some(path) = path else {
        debug!("no settings file given, using defaults");
        return Ok(ConversionSettings::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = parse_settings(&text, path)?;
    info!(path = %path.display(), "loaded settings");
    Ok(settings)
}

fn parse_settings(text: &str, path: &Path) -> Result<ConversionSettings> {
    let settings: ConversionSettings =
        toml::from_str(text).map_err(|source| IngestError::SettingsParse {
            path: path.to_path_buf(),
            source,
        })?;
    settings
        .validate()
        .map_err(|source| IngestError::SettingsInvalid {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbk_model::SliceMatchTolerance;
    use tempfile::TempDir;

    #[test]
    fn missing_path_gives_defaults() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings, ConversionSettings::default());
    }

    #[test]
    fn partial_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site.toml");
        std::fs::write(
            &path,
            "institution_name = \"Radiation Oncology\"\n\n[slice_match]\nmode = \"absolute\"\ncm = 0.1\n",
        )
        .unwrap();
        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.institution_name, "Radiation Oncology");
        assert_eq!(settings.slice_match, SliceMatchTolerance::Absolute { cm: 0.1 });
        assert_eq!(settings.window_width, 400.0);
    }

    #[test]
    fn invalid_values_are_reported() {
        let path = Path::new("site.toml");
        assert!(matches!(
            parse_settings("dose_grid_scaling = 0.0", path),
            Err(IngestError::SettingsInvalid { .. })
        ));
        assert!(matches!(
            parse_settings("window_width = \"wide\"", path),
            Err(IngestError::SettingsParse { .. })
        ));
    }
}
