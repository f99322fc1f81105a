use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThemeMode {
    Light,
    Dark,
    SystemDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FontChoice {
    ScreenBold,
    Courier,
    HelveticaMono,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_line_numbers")]
    pub line_numbers_enabled: bool,

    #[serde(default = "default_word_wrap")]
    pub word_wrap_enabled: bool,

    #[serde(default = "default_highlighting")]
    pub highlighting_enabled: bool,

    #[serde(default = "default_theme_mode")]
    pub theme_mode: ThemeMode,

    #[serde(default = "default_font")]
    pub font: FontChoice,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    #[serde(default = "default_extraction_enabled")]
    pub extraction_enabled: bool,

    #[serde(default = "default_extraction_server_url")]
    pub extraction_server_url: String,

    /// Minimum seconds between extraction dispatches per document.
    #[serde(default = "default_extraction_interval")]
    pub extraction_interval_secs: u64,

    #[serde(default = "default_extraction_timeout")]
    pub extraction_timeout_secs: u64,
}

fn default_line_numbers() -> bool {
    true
}

fn default_word_wrap() -> bool {
    true
}

fn default_highlighting() -> bool {
    true
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::SystemDefault
}

fn default_font() -> FontChoice {
    FontChoice::Courier
}

fn default_font_size() -> u32 {
    16
}

fn default_extraction_enabled() -> bool {
    true
}

fn default_extraction_server_url() -> String {
    "http://localhost:19953".to_string()
}

fn default_extraction_interval() -> u64 {
    10
}

fn default_extraction_timeout() -> u64 {
    30
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            line_numbers_enabled: default_line_numbers(),
            word_wrap_enabled: default_word_wrap(),
            highlighting_enabled: default_highlighting(),
            theme_mode: default_theme_mode(),
            font: default_font(),
            font_size: default_font_size(),
            extraction_enabled: default_extraction_enabled(),
            extraction_server_url: default_extraction_server_url(),
            extraction_interval_secs: default_extraction_interval(),
            extraction_timeout_secs: default_extraction_timeout(),
        }
    }
}

impl AppSettings {
    /// Load settings from disk, or fall back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Failed to parse settings: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist yet; persist defaults for next time.
                let default = Self::default();
                let _ = default.save_to(path);
                default
            }
        }
    }

    /// Save settings to disk.
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_config_path())
    }

    fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Config file path (cross-platform).
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("taskflow");
        path.push("settings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.font_size, 16);
        assert!(settings.line_numbers_enabled);
        assert!(settings.word_wrap_enabled);
        assert!(settings.highlighting_enabled);
        assert_eq!(settings.theme_mode, ThemeMode::SystemDefault);
        assert_eq!(settings.font, FontChoice::Courier);
        assert!(settings.extraction_enabled);
        assert_eq!(settings.extraction_server_url, "http://localhost:19953");
        assert_eq!(settings.extraction_interval_secs, 10);
        assert_eq!(settings.extraction_timeout_secs, 30);
    }

    #[test]
    fn test_serialize_deserialize() {
        let settings = AppSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_partial_config() {
        // Simulate an old config missing new fields
        let json = r#"{"line_numbers_enabled": false}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.font_size, 16); // Should use default
        assert!(!settings.line_numbers_enabled); // Should use file value
        assert!(settings.extraction_enabled);
    }

    #[test]
    fn test_backward_compatibility() {
        // A config written before the extraction settings existed
        let json = r#"{
            "line_numbers_enabled": false,
            "word_wrap_enabled": true,
            "theme_mode": "Dark",
            "font": "Courier",
            "font_size": 14
        }"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();

        assert!(!settings.line_numbers_enabled);
        assert_eq!(settings.font_size, 14);

        assert!(settings.extraction_enabled);
        assert_eq!(settings.extraction_server_url, "http://localhost:19953");
        assert_eq!(settings.extraction_interval_secs, 10);
    }

    #[test]
    fn test_theme_mode_serialization() {
        let settings = AppSettings {
            theme_mode: ThemeMode::Dark,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"Dark\""));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = AppSettings {
            extraction_server_url: "http://127.0.0.1:9000".to_string(),
            extraction_interval_secs: 5,
            font_size: 20,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();

        let loaded = AppSettings::load_from(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let loaded = AppSettings::load_from(&path);
        assert_eq!(loaded, AppSettings::default());
        assert!(path.exists());
    }
}
