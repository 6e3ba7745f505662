//! Default configuration values

use super::types::Config;

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "herald.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "herald.yaml";

/// Directory under the user config dir searched last
pub const USER_CONFIG_DIR: &str = "herald";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".herald.toml",
        ".herald.yaml",
    ]
}

/// Generate default configuration YAML
pub fn default_config_yaml() -> String {
    let config = Config::default();
    serde_yaml::to_string(&config).unwrap_or_else(|_| DEFAULT_CONFIG_TEMPLATE.to_string())
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Herald Configuration

changelog:
  output_unreleased: false
  include_hashes: true
  include_body: false
  group_by_scope: false
  tag_prefix: v
  note_keywords:
    - BREAKING CHANGE
    - BREAKING CHANGES
  types:
    feat:
      section: Features
      order: 0
    fix:
      section: Bug Fixes
      order: 1
    perf:
      section: Performance Improvements
      order: 2
    revert:
      section: Reverts
      order: 3
    docs:
      section: Documentation
      order: 4
      hidden: true
    style:
      section: Styles
      order: 5
      hidden: true
    refactor:
      section: Code Refactoring
      order: 6
      hidden: true
    test:
      section: Tests
      order: 7
      hidden: true
    chore:
      section: Chores
      order: 8
      hidden: true

repository: {}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validate_config;

    #[test]
    fn test_template_parses_to_defaults() {
        let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        let defaults = Config::default();
        assert_eq!(config.changelog.types, defaults.changelog.types);
        assert_eq!(config.changelog.note_keywords, defaults.changelog.note_keywords);
        assert!(config.repository.is_unknown());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_generated_yaml_round_trips() {
        let yaml = default_config_yaml();
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.changelog.tag_prefix, "v");
    }
}
