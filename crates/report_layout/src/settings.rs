//! Report layout settings
//!
//! Page size, margins, and the fallback heights used for the first render
//! pass, persisted as JSON next to the rest of the application data.

use crate::{
    PageGeometry, PageSize, Result, RowHeights, UnmeasuredRowPolicy, DEFAULT_FOOTER_HEIGHT,
    DEFAULT_HEADER_HEIGHT, DEFAULT_MARGINS, DEFAULT_ROW_HEIGHT, DEFAULT_SUMMARY_HEIGHT,
    DEFAULT_TABLE_HEADER_HEIGHT,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "report-settings.json";

/// Main report settings container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportSettings {
    /// Page size and margins
    pub page: PageSettings,
    /// Heights assumed before anything has been measured
    pub fallback: FallbackHeights,
    /// Measurement pass settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeasurementSettings {
    /// Estimate for rows past the measured ones
    pub unmeasured_policy: UnmeasuredRowPolicy,
}

impl ReportSettings {
    /// Geometry for the first (unmeasured) pagination pass
    pub fn fallback_geometry(&self) -> PageGeometry {
        PageGeometry {
            page_height: self.page.page_size.height(),
            margins: self.page.margins,
            header_height: self.fallback.header,
            footer_height: self.fallback.footer,
            table_header_height: self.fallback.table_header,
            summary_height: self.fallback.summary,
            row_heights: RowHeights::new(),
            fallback_row_height: self.fallback.row,
            unmeasured_policy: self.measurement.unmeasured_policy,
        }
    }
}

/// Reads report settings from a data directory
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Settings from the last load
    current: ReportSettings,
}

impl SettingsManager {
    /// Create a manager reading `report-settings.json` in `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            settings_path: data_dir.as_ref().join(SETTINGS_FILE_NAME),
            current: ReportSettings::default(),
        }
    }

    /// Get the path to the settings file
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk.
    ///
    /// A missing file yields defaults; so does a file that fails to parse,
    /// after a warning. Read errors are returned.
    pub fn load_sync(&mut self) -> Result<&ReportSettings> {
        self.current = if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            serde_json::from_str::<ReportSettings>(&content).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %self.settings_path.display(),
                    "Failed to parse report settings, using defaults: {}",
                    e
                );
                ReportSettings::default()
            })
        } else {
            tracing::debug!(path = %self.settings_path.display(), "no report settings file, using defaults");
            ReportSettings::default()
        };
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_settings(dir: &Path, settings: &ReportSettings) {
        let content = serde_json::to_string_pretty(settings).unwrap();
        std::fs::write(dir.join(SETTINGS_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_default_settings() {
        let settings = ReportSettings::default();

        assert_eq!(settings.page.page_size, PageSize::A4);
        assert_eq!(settings.page.margins, DEFAULT_MARGINS);
        assert_eq!(settings.fallback.row, DEFAULT_ROW_HEIGHT);
        assert_eq!(settings.measurement.unmeasured_policy, UnmeasuredRowPolicy::LastMeasured);
    }

    #[test]
    fn test_fallback_geometry_matches_constants() {
        let geometry = ReportSettings::default().fallback_geometry();
        assert_eq!(geometry, PageGeometry::fallback(PageSize::A4));
    }

    #[test]
    fn test_partial_settings_file_fills_defaults() {
        let json = r#"{ "page": { "page_size": "letter" }, "fallback": { "row": 28.0 } }"#;
        let settings: ReportSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.page.page_size, PageSize::Letter);
        assert_eq!(settings.page.margins, DEFAULT_MARGINS);
        assert_eq!(settings.fallback.row, 28.0);
        assert_eq!(settings.fallback.header, DEFAULT_HEADER_HEIGHT);
        assert_eq!(settings.fallback_geometry().page_height, 1056.0);
    }

    #[test]
    fn test_custom_page_size_serialization() {
        let json = serde_json::to_string(&PageSize::Custom { width: 600.0, height: 900.0 }).unwrap();
        let parsed: PageSize = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, PageSize::Custom { width: 600.0, height: 900.0 });
    }

    #[test]
    fn test_settings_manager_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path());

        assert!(!manager.settings_path().exists());
        let settings = manager.load_sync().unwrap();
        assert_eq!(settings, &ReportSettings::default());
    }

    #[test]
    fn test_settings_manager_loads_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut stored = ReportSettings::default();
        stored.fallback.summary = 220.0;
        stored.measurement.unmeasured_policy = UnmeasuredRowPolicy::MaxMeasured;
        write_settings(temp_dir.path(), &stored);

        let mut manager = SettingsManager::new(temp_dir.path());
        let loaded = manager.load_sync().unwrap();

        assert_eq!(loaded.fallback.summary, 220.0);
        assert_eq!(
            loaded.fallback_geometry().unmeasured_policy,
            UnmeasuredRowPolicy::MaxMeasured
        );
    }

    #[test]
    fn test_settings_manager_corrupt_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path());
        std::fs::write(manager.settings_path(), "{ not json").unwrap();

        let settings = manager.load_sync().unwrap();
        assert_eq!(settings, &ReportSettings::default());
    }

    #[test]
    fn test_settings_manager_reload_replaces_previous() {
        let temp_dir = TempDir::new().unwrap();
        let mut stored = ReportSettings::default();
        stored.page.margins = 10.0;
        write_settings(temp_dir.path(), &stored);

        let mut manager = SettingsManager::new(temp_dir.path());
        assert_eq!(manager.load_sync().unwrap().page.margins, 10.0);

        std::fs::remove_file(manager.settings_path()).unwrap();
        assert_eq!(manager.load_sync().unwrap().page.margins, DEFAULT_MARGINS);
    }
}
