//! Configuration loader for the Geodata Quality Engine (YAML/TOML).
//!
//! Parses [`RuleConfig`] override files. Every field is optional: a file
//! only names what it changes, and untouched settings keep their built-in
//! defaults.
//!
//! # Example
//!
//! ```rust
//! use quality_config::parse_yaml;
//!
//! let yaml = r#"
//! earliest_year: 2010
//! whitelists:
//!   status:
//!     - "Sin iniciar"
//!     - "En ejecución"
//!     - "Terminado"
//! "#;
//!
//! let config = parse_yaml(yaml).expect("failed to parse config");
//! assert_eq!(config.earliest_year, 2010);
//! ```

use quality_core::RuleConfig;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a rule configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Parsed configuration is internally inconsistent
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Invalid or missing file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

fn check(config: RuleConfig) -> Result<RuleConfig> {
    config
        .validate()
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    Ok(config)
}

/// Parses a rule configuration from a YAML string.
pub fn parse_yaml(content: &str) -> Result<RuleConfig> {
    check(serde_yaml_ng::from_str(content)?)
}

/// Parses a rule configuration from a TOML string.
pub fn parse_toml(content: &str) -> Result<RuleConfig> {
    check(toml::from_str(content).map_err(|e| ConfigError::TomlError(e.to_string()))?)
}

/// Detects the configuration format from a file extension.
pub fn detect_format(path: &Path) -> Result<ConfigFormat> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("yml") | Some("yaml") => Ok(ConfigFormat::Yaml),
        Some("toml") => Ok(ConfigFormat::Toml),
        _ => Err(ConfigError::InvalidExtension),
    }
}

/// Loads a rule configuration from a YAML or TOML file.
pub fn parse_file(path: &Path) -> Result<RuleConfig> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    match format {
        ConfigFormat::Yaml => parse_yaml(&content),
        ConfigFormat::Toml => parse_toml(&content),
    }
}

/// Loads a configuration, degrading instead of failing.
///
/// `None` yields the built-in defaults. An unreadable or unparsable file is
/// logged once and yields the defaults with every thematic catalog removed,
/// so thematic-accuracy coverage degrades rather than the validator
/// aborting.
pub fn load_or_degraded(path: Option<&Path>) -> RuleConfig {
    match path {
        None => RuleConfig::default(),
        Some(path) => match parse_file(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "rule configuration unreadable, continuing with empty whitelists"
                );
                RuleConfig::with_empty_whitelists()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quality_core::config::fields;
    use std::io::Write;

    #[test]
    fn test_parse_yaml_partial_override() {
        let yaml = r#"
earliest_year: 2012
similarity_threshold: 0.7
whitelists:
  status: ["A", "B"]
"#;
        let config = parse_yaml(yaml).unwrap();
        assert_eq!(config.earliest_year, 2012);
        assert_eq!(config.similarity_threshold, 0.7);
        assert_eq!(config.whitelists.get(fields::STATUS).unwrap(), &["A", "B"]);
        // Untouched settings keep their defaults
        assert_eq!(config.latest_year, 2040);
        assert_eq!(config.group_fallback, "Unassigned");
    }

    #[test]
    fn test_parse_yaml_empty_document_is_defaults() {
        let config = parse_yaml("{}").unwrap();
        assert_eq!(config, RuleConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
max_duration_days = 1825
group_field = "department"
group_fallback = "None"
"#;
        let config = parse_toml(toml).unwrap();
        assert_eq!(config.max_duration_days, 1825);
        assert_eq!(config.group_field, "department");
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(parse_yaml("earliest_year: [not a number").is_err());
    }

    #[test]
    fn test_inconsistent_config_is_rejected() {
        let err = parse_yaml("similarity_threshold: 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(Path::new("rules.yaml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("rules.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(detect_format(Path::new("rules.txt")).is_err());
        assert!(detect_format(Path::new("rules")).is_err());
    }

    #[test]
    fn test_parse_file_roundtrip() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "earliest_year: 2015").unwrap();

        let config = parse_file(file.path()).unwrap();
        assert_eq!(config.earliest_year, 2015);
    }

    #[test]
    fn test_load_or_degraded_missing_file() {
        let config = load_or_degraded(Some(Path::new("/nonexistent/rules.yaml")));
        assert!(config.whitelists.is_empty());
        // Non-thematic settings survive the degradation
        assert_eq!(config.earliest_year, RuleConfig::default().earliest_year);
    }

    #[test]
    fn test_load_or_degraded_no_path() {
        let config = load_or_degraded(None);
        assert_eq!(config, RuleConfig::default());
    }
}
