use crate::playback::{AutoplayConfig, AutoplayDelay};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Persistent autoplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Delay used by the `p` command and when no delay flag is given
    pub default_delay_ms: u64,
    /// Delay inside variations and for moves without a recorded time
    pub fallback_delay_ms: u64,
    /// Milliseconds per recorded move time unit
    pub move_time_unit_ms: u64,
    /// Floor for fixed delays; zero keeps back-to-back stepping possible
    pub min_delay_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_delay_ms: 1000,
            fallback_delay_ms: 2000,
            move_time_unit_ms: 100,
            min_delay_ms: 0,
        }
    }
}

impl AppSettings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("review-autoplay").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(contents) = fs::read_to_string(path) {
                if let Ok(settings) = serde_json::from_str(&contents) {
                    return settings;
                }
                tracing::warn!("Ignoring malformed settings at {}", path.display());
            }
        }
        Self::default()
    }

    /// Write a settings file for the user to edit, unless one already exists.
    ///
    /// An existing file is never touched, even when it failed to parse.
    pub fn save_if_missing(&self) {
        if let Some(path) = Self::config_path() {
            self.save_if_missing_at(&path);
        }
    }

    fn save_if_missing_at(&self, path: &Path) -> bool {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let Ok(json) = serde_json::to_string_pretty(self) else {
            return false;
        };
        match fs::OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut file) => file.write_all(json.as_bytes()).is_ok(),
            Err(_) => false,
        }
    }

    pub fn default_delay(&self) -> AutoplayDelay {
        AutoplayDelay::fixed_ms(self.default_delay_ms)
    }

    pub fn autoplay_config(&self) -> AutoplayConfig {
        AutoplayConfig {
            fallback_delay: Duration::from_millis(self.fallback_delay_ms),
            move_time_unit: Duration::from_millis(self.move_time_unit_ms),
            min_delay: Duration::from_millis(self.min_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_autoplay_config() {
        let config = AppSettings::default().autoplay_config();
        let expected = AutoplayConfig::default();
        assert_eq!(config.fallback_delay, expected.fallback_delay);
        assert_eq!(config.move_time_unit, expected.move_time_unit);
        assert_eq!(config.min_delay, expected.min_delay);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"min_delay_ms": 250}"#).unwrap();
        assert_eq!(settings.min_delay_ms, 250);
        assert_eq!(settings.fallback_delay_ms, 2000);
        assert_eq!(settings.default_delay(), AutoplayDelay::fixed_ms(1000));
    }

    fn temp_settings_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("review-autoplay-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_malformed_settings_file_is_left_untouched() {
        let dir = temp_settings_dir("malformed");
        let path = dir.join("settings.json");
        fs::create_dir_all(&dir).unwrap();
        let original = "{ \"min_delay_ms\": 250, }";
        fs::write(&path, original).unwrap();

        let settings = AppSettings::load_from(&path);
        assert_eq!(settings, AppSettings::default());
        assert!(!settings.save_if_missing_at(&path));

        let contents = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_dir_all(&dir);
        assert_eq!(contents, original);
    }

    #[test]
    fn test_missing_settings_file_is_created_with_defaults() {
        let dir = temp_settings_dir("missing");
        let path = dir.join("nested").join("settings.json");

        let settings = AppSettings::load_from(&path);
        assert!(settings.save_if_missing_at(&path));
        let reloaded = AppSettings::load_from(&path);
        // a second save finds the file and leaves it alone
        assert!(!reloaded.save_if_missing_at(&path));

        let _ = fs::remove_dir_all(&dir);
        assert_eq!(reloaded, AppSettings::default());
    }

    #[test]
    fn test_valid_settings_file_is_loaded() {
        let dir = temp_settings_dir("valid");
        let path = dir.join("settings.json");
        fs::create_dir_all(&dir).unwrap();
        fs::write(&path, r#"{"default_delay_ms": 400}"#).unwrap();

        let settings = AppSettings::load_from(&path);
        let _ = fs::remove_dir_all(&dir);
        assert_eq!(settings.default_delay_ms, 400);
        assert_eq!(settings.move_time_unit_ms, 100);
    }
}
