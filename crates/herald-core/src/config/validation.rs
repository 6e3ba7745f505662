//! Configuration validation
//!
//! Runs once when a pipeline is built. Nothing here is consulted per commit.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::types::RepositoryContext;

use super::types::{ChangelogConfig, Config};

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_changelog(&config.changelog)?;
    validate_repository(&config.repository)?;
    debug!("configuration validation passed");
    Ok(())
}

/// Validate the changelog section on its own
pub fn validate_changelog(config: &ChangelogConfig) -> Result<()> {
    validate_types(config)?;
    validate_note_keywords(config)?;

    if config.tag_prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::invalid(
            "changelog.tag_prefix",
            "must not contain whitespace",
        )
        .into());
    }

    Ok(())
}

fn validate_types(config: &ChangelogConfig) -> Result<()> {
    // section title -> (order, hidden, first type that declared it)
    let mut sections: HashMap<&str, (u32, bool, &str)> = HashMap::new();
    // order -> section title
    let mut orders: HashMap<u32, &str> = HashMap::new();

    // Sorted so the reported conflict does not depend on map iteration order
    let mut types: Vec<_> = config.types.iter().collect();
    types.sort_by(|a, b| a.0.cmp(b.0));

    for (commit_type, type_config) in types {
        let field = format!("changelog.types.{}", commit_type);

        if commit_type.is_empty() || !commit_type.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(ConfigError::invalid(
                field,
                "commit type must be a lowercase ASCII word",
            )
            .into());
        }

        let title = type_config.section.trim();
        if title.is_empty() {
            return Err(ConfigError::invalid(
                format!("{}.section", field),
                "section title cannot be empty",
            )
            .into());
        }

        match sections.get(title) {
            Some(&(order, hidden, owner)) => {
                if order != type_config.order || hidden != type_config.hidden {
                    return Err(ConfigError::conflict(
                        field,
                        format!(
                            "section '{}' is also declared by '{}' with a different order or visibility",
                            title, owner
                        ),
                    )
                    .into());
                }
            }
            None => {
                if let Some(other) = orders.get(&type_config.order) {
                    return Err(ConfigError::conflict(
                        format!("{}.order", field),
                        format!(
                            "order {} is already used by section '{}'",
                            type_config.order, other
                        ),
                    )
                    .into());
                }
                sections.insert(
                    title,
                    (type_config.order, type_config.hidden, commit_type.as_str()),
                );
                orders.insert(type_config.order, title);
            }
        }
    }

    debug!(
        types = config.types.len(),
        sections = sections.len(),
        "commit type mapping validated"
    );
    Ok(())
}

fn validate_note_keywords(config: &ChangelogConfig) -> Result<()> {
    if config.note_keywords.is_empty() {
        return Err(ConfigError::MissingField("changelog.note_keywords".to_string()).into());
    }

    for (i, keyword) in config.note_keywords.iter().enumerate() {
        if keyword.trim().is_empty() || keyword.contains(':') || keyword.contains('\n') {
            return Err(ConfigError::invalid(
                format!("changelog.note_keywords[{}]", i),
                "note marker must be non-empty and must not contain ':' or newlines",
            )
            .into());
        }
    }

    Ok(())
}

/// Validate a repository context.
///
/// The unknown host is always valid. A known host must be a parseable URL
/// and must name both owner and repository; configured link segments must
/// not be blank.
pub fn validate_repository(context: &RepositoryContext) -> Result<()> {
    if context.is_unknown() {
        debug!("repository host unknown, links use fallback form");
        return Ok(());
    }

    let host_url = context.host_url();
    if let Err(e) = url::Url::parse(&host_url) {
        return Err(ConfigError::invalid("repository.host", format!("{}: {}", host_url, e)).into());
    }

    for (field, value) in [
        ("repository.owner", &context.owner),
        ("repository.repository", &context.repository),
    ] {
        if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
            return Err(ConfigError::MissingField(field.to_string()).into());
        }
    }

    for (field, value) in [
        ("repository.commit_path", &context.commit_path),
        ("repository.issue_path", &context.issue_path),
        ("repository.compare_path", &context.compare_path),
        ("repository.user_path", &context.user_path),
    ] {
        if value.as_deref().is_some_and(|v| v.trim_matches('/').trim().is_empty()) {
            return Err(ConfigError::invalid(field, "link template cannot be empty").into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommitTypeConfig;
    use crate::error::HeraldError;

    fn type_config(section: &str, order: u32, hidden: bool) -> CommitTypeConfig {
        CommitTypeConfig {
            section: section.to_string(),
            order,
            hidden,
        }
    }

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_two_types_may_share_a_section() {
        let mut config = ChangelogConfig::default();
        config
            .types
            .insert("feature".to_string(), type_config("Features", 0, false));
        assert!(validate_changelog(&config).is_ok());
    }

    #[test]
    fn test_conflicting_section_order() {
        let mut config = ChangelogConfig::default();
        config
            .types
            .insert("feature".to_string(), type_config("Features", 42, false));
        let err = validate_changelog(&config).unwrap_err();
        assert!(matches!(
            err,
            HeraldError::Config(ConfigError::Conflict { .. })
        ));
    }

    #[test]
    fn test_conflicting_section_visibility() {
        let mut config = ChangelogConfig::default();
        config
            .types
            .insert("feature".to_string(), type_config("Features", 0, true));
        assert!(validate_changelog(&config).is_err());
    }

    #[test]
    fn test_duplicate_order_across_sections() {
        let mut config = ChangelogConfig::default();
        config
            .types
            .insert("build".to_string(), type_config("Build System", 1, false));
        let err = validate_changelog(&config).unwrap_err();
        assert!(err.to_string().contains("order 1"));
    }

    #[test]
    fn test_invalid_type_name() {
        let mut config = ChangelogConfig::default();
        config
            .types
            .insert("Feat".to_string(), type_config("Feats", 20, false));
        assert!(validate_changelog(&config).is_err());
    }

    #[test]
    fn test_empty_section_title() {
        let mut config = ChangelogConfig::default();
        config
            .types
            .insert("build".to_string(), type_config("  ", 20, false));
        assert!(validate_changelog(&config).is_err());
    }

    #[test]
    fn test_note_keywords_required() {
        let mut config = ChangelogConfig::default();
        config.note_keywords.clear();
        assert!(matches!(
            validate_changelog(&config).unwrap_err(),
            HeraldError::Config(ConfigError::MissingField(_))
        ));

        config.note_keywords = vec!["BREAKING CHANGE:".to_string()];
        assert!(validate_changelog(&config).is_err());
    }

    #[test]
    fn test_unknown_repository_is_valid() {
        assert!(validate_repository(&RepositoryContext::unknown()).is_ok());
    }

    #[test]
    fn test_known_host_requires_owner_and_repo() {
        let mut context = RepositoryContext::github("o", "r");
        assert!(validate_repository(&context).is_ok());

        context.owner = None;
        let err = validate_repository(&context).unwrap_err();
        assert!(err.to_string().contains("repository.owner"));
    }

    #[test]
    fn test_blank_link_template_rejected() {
        let context = RepositoryContext::github("o", "r").with_issue_path("/");
        assert!(validate_repository(&context).is_err());

        let context = RepositoryContext::github("o", "r").with_user_path(" ");
        let err = validate_repository(&context).unwrap_err();
        assert!(err.to_string().contains("repository.user_path"));

        let context = RepositoryContext::github("o", "r").with_user_path("u");
        assert!(validate_repository(&context).is_ok());
    }

    #[test]
    fn test_unparseable_host_rejected() {
        let context = RepositoryContext::hosted("https://exa mple.com", "o", "r");
        assert!(validate_repository(&context).is_err());
    }
}
