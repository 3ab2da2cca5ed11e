//! Configuration management for list callouts.
//!
//! Parses `list-callouts.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [callouts]
//! insert_default_css = true
//!
//! [callouts.symbols]
//! "!" = "warning"
//! "~" = "bookmark"
//! ```
//!
//! A `symbols` table replaces the built-in symbol set. Mapping a symbol to an
//! empty string disables it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use list_callouts::symbols::DEFAULT_SYMBOLS;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the default CSS injection flag.
    pub insert_default_css: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "list-callouts.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Callout configuration.
    pub callouts: CalloutsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Callout configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CalloutsConfig {
    /// Whether to add the default stylesheet to rendered documents.
    pub insert_default_css: bool,
    /// Marker symbol to class suffix mapping.
    pub symbols: BTreeMap<String, String>,
}

impl Default for CalloutsConfig {
    fn default() -> Self {
        Self {
            insert_default_css: true,
            symbols: DEFAULT_SYMBOLS
                .iter()
                .map(|&(symbol, suffix)| (symbol.to_string(), suffix.to_owned()))
                .collect(),
        }
    }
}

impl CalloutsConfig {
    /// Validate callout configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a symbol is not a single
    /// non-whitespace character or a class suffix contains characters other
    /// than ASCII alphanumerics, `-` and `_`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (symbol, suffix) in &self.symbols {
            require_single_char(symbol)?;
            require_class_suffix(suffix, symbol)?;
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a symbol key to be exactly one non-whitespace character.
fn require_single_char(symbol: &str) -> Result<(), ConfigError> {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "callouts.symbols: {symbol:?} must be a single non-whitespace character"
        ))),
    }
}

/// Require a class suffix to be usable in a CSS class name.
fn require_class_suffix(suffix: &str, symbol: &str) -> Result<(), ConfigError> {
    let valid = suffix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ConfigError::Validation(format!(
            "callouts.symbols.{symbol:?}: class suffix {suffix:?} may only contain ASCII letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `list-callouts.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(insert_default_css) = settings.insert_default_css {
            self.callouts.insert_default_css = insert_default_css;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_config_from(current)
    }

    fn discover_config_from(mut current: PathBuf) -> Option<PathBuf> {
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.callouts.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.callouts.insert_default_css);
        assert_eq!(config.callouts.symbols.len(), 7);
        assert_eq!(config.callouts.symbols["!"], "warning");
        assert_eq!(config.callouts.symbols["%"], "quote");
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_default_symbols_match_builtin_map() {
        let config = Config::default();
        let symbols = list_callouts::SymbolMap::from_strings(&config.callouts.symbols).unwrap();

        assert_eq!(symbols, list_callouts::SymbolMap::builtin());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.callouts.insert_default_css);
        assert_eq!(config.callouts.symbols.len(), 7);
    }

    #[test]
    fn test_parse_css_flag_keeps_default_symbols() {
        let toml = r"
[callouts]
insert_default_css = false
";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.callouts.insert_default_css);
        assert_eq!(config.callouts.symbols.len(), 7);
    }

    #[test]
    fn test_parse_symbols_replace_defaults() {
        let toml = r#"
[callouts.symbols]
"!" = "danger"
"^" = "up"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.callouts.symbols.len(), 2);
        assert_eq!(config.callouts.symbols["!"], "danger");
        assert_eq!(config.callouts.symbols["^"], "up");
        assert!(config.callouts.insert_default_css);
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_multi_char_symbol() {
        let toml = r#"
[callouts.symbols]
"!!" = "warning"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("single non-whitespace character"));
    }

    #[test]
    fn test_validate_rejects_whitespace_symbol() {
        let toml = r#"
[callouts.symbols]
" " = "space"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_class_suffix() {
        let toml = r#"
[callouts.symbols]
"!" = "warn ing"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("class suffix"));
    }

    #[test]
    fn test_validate_allows_empty_suffix() {
        let toml = r#"
[callouts.symbols]
"!" = ""
"#;
        let config: Config = toml::from_str(toml).unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_apply_cli_settings_css() {
        let mut config = Config::default();
        let overrides = CliSettings {
            insert_default_css: Some(false),
        };

        config.apply_cli_settings(&overrides);

        assert!(!config.callouts.insert_default_css);
        assert_eq!(config.callouts.symbols.len(), 7); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_none_keeps_file_value() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert!(config.callouts.insert_default_css);
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[callouts]\ninsert_default_css = false\n\n[callouts.symbols]\n\"@\" = \"tip\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert!(!config.callouts.insert_default_css);
        assert_eq!(config.callouts.symbols.len(), 1);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_cli_settings_override_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("list-callouts.toml");
        std::fs::write(&path, "[callouts]\ninsert_default_css = false\n").unwrap();

        let settings = CliSettings {
            insert_default_css: Some(true),
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert!(config.callouts.insert_default_css);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("list-callouts.toml");
        std::fs::write(&path, "[callouts\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_validates_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("list-callouts.toml");
        std::fs::write(&path, "[callouts.symbols]\n\"ab\" = \"x\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&config_path, "").unwrap();
        let nested = temp_dir.path().join("docs").join("guide");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(Config::discover_config_from(nested), Some(config_path));
    }
}
