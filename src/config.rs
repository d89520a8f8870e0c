//! Configuration file schema for yamlcheck.
//!
//! A configuration selects which files are linted and tunes the rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::issue::Severity;

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["yamlcheck.yaml", ".yamlcheck.yaml", ".yamlcheck.yml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// File extensions to lint, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Glob patterns for paths to exclude from analysis (e.g., "**/charts/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Per-rule settings, keyed by rule key
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
    /// Lowest severity that fails the run (default: error)
    #[serde(default = "default_fail_on")]
    pub fail_on: Severity,
}

fn default_extensions() -> Vec<String> {
    vec!["yaml".to_string(), "yml".to_string()]
}

fn default_fail_on() -> Severity {
    Severity::Error
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            excluded_paths: Vec::new(),
            rules: BTreeMap::new(),
            fail_on: default_fail_on(),
        }
    }
}

/// Settings for a single rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Whether the rule runs (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Severity to report instead of the rule's own
    #[serde(default)]
    pub severity: Option<Severity>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: None,
        }
    }
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Whether a rule is enabled. Rules not listed are enabled.
    pub fn is_rule_enabled(&self, rule: &str) -> bool {
        self.rules.get(rule).map(|r| r.enabled).unwrap_or(true)
    }

    /// Severity override for a rule, if configured.
    pub fn severity_for(&self, rule: &str) -> Option<Severity> {
        self.rules.get(rule).and_then(|r| r.severity)
    }

    /// Whether a file has one of the configured extensions.
    pub fn has_yaml_extension(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    /// Uses globset for matching, which supports `**` for recursive directory matching.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();

        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }
}

/// Validate a configuration for correctness.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    for ext in &config.extensions {
        if ext.is_empty() || ext.starts_with('.') {
            return Err(ConfigError::Extension(ext.clone()));
        }
    }

    if config.rules.keys().any(|k| k.trim().is_empty()) {
        return Err(ConfigError::EmptyRuleKey);
    }

    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern).map_err(|source| ConfigError::ExcludedPath {
            pattern: pattern.clone(),
            source,
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
extensions: [yaml, yml, eyaml]
excluded_paths:
  - "**/templates/**"
rules:
  parsing-error:
    severity: warning
  trailing-spaces:
    enabled: false
fail_on: warning
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.extensions.len(), 3);
        assert_eq!(config.fail_on, Severity::Warning);
        assert!(config.is_rule_enabled("parsing-error"));
        assert!(!config.is_rule_enabled("trailing-spaces"));
        assert!(config.is_rule_enabled("indentation"));
        assert_eq!(config.severity_for("parsing-error"), Some(Severity::Warning));
        assert_eq!(config.severity_for("indentation"), None);
    }

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.extensions, vec!["yaml", "yml"]);
        assert_eq!(config.fail_on, Severity::Error);
        assert!(config.has_yaml_extension(&PathBuf::from("a/b.YML")));
        assert!(!config.has_yaml_extension(&PathBuf::from("a/b.json")));
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_excluded_paths() {
        let config = Config {
            excluded_paths: vec!["**/templates/**".to_string()],
            ..Default::default()
        };
        assert!(config.is_path_excluded(&PathBuf::from("chart/templates/deploy.yaml")));
        assert!(!config.is_path_excluded(&PathBuf::from("chart/values.yaml")));
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let config = Config {
            excluded_paths: vec!["[unclosed".to_string()],
            ..Default::default()
        };
        assert!(matches!(validate(&config), Err(ConfigError::ExcludedPath { .. })));

        let config = Config {
            extensions: vec![".yaml".to_string()],
            ..Default::default()
        };
        assert!(matches!(validate(&config), Err(ConfigError::Extension(_))));

        let mut config = Config::default();
        config.rules.insert(" ".to_string(), RuleConfig::default());
        assert!(matches!(validate(&config), Err(ConfigError::EmptyRuleKey)));
    }
}
