use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Application settings
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Directory holding the `.cook` recipe files
    #[serde(default = "default_recipes_dir")]
    pub recipes_dir: PathBuf,
    /// Synonym groups file, relative paths resolve against `recipes_dir`
    #[serde(default = "default_synonyms_file")]
    pub synonyms_file: PathBuf,
    /// Default log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recipes_dir: default_recipes_dir(),
            synonyms_file: default_synonyms_file(),
            log_level: default_log_level(),
        }
    }
}

// Default value functions
fn default_recipes_dir() -> PathBuf {
    PathBuf::from("./rezepte")
}

fn default_synonyms_file() -> PathBuf {
    PathBuf::from("synonyme.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with KOCHBUCH__ prefix
    /// 2. kochbuch.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: KOCHBUCH__RECIPES_DIR
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Location of the synonym file
    pub fn synonyms_path(&self) -> PathBuf {
        if self.synonyms_file.is_absolute() {
            self.synonyms_file.clone()
        } else {
            self.recipes_dir.join(&self.synonyms_file)
        }
    }
}

/// Load configuration from file and environment variables
///
/// See [`Settings::load`] for the precedence rules.
pub fn load_config() -> Result<Settings, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("kochbuch").required(false))
        .add_source(
            Environment::with_prefix("KOCHBUCH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.recipes_dir, PathBuf::from("./rezepte"));
        assert_eq!(settings.log_level, "info");
        assert_eq!(
            settings.synonyms_path(),
            PathBuf::from("./rezepte/synonyme.json")
        );
    }

    #[test]
    fn test_absolute_synonyms_path() {
        let settings = Settings {
            synonyms_file: PathBuf::from("/etc/kochbuch/synonyme.json"),
            ..Settings::default()
        };
        assert_eq!(
            settings.synonyms_path(),
            PathBuf::from("/etc/kochbuch/synonyme.json")
        );
    }

    #[test]
    fn test_deserialize_partial_settings() {
        let settings: Settings = Config::builder()
            .set_override("recipes_dir", "/srv/rezepte")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.recipes_dir, PathBuf::from("/srv/rezepte"));
        assert_eq!(settings.synonyms_file, PathBuf::from("synonyme.json"));
        assert_eq!(settings.log_level, "info");
    }
}
