// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty tokens and unique app ids.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::InletConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &InletConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.facebook.graph_base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "facebook.graph_base_url must not be empty".to_string(),
        });
    }

    let mut seen_app_ids = HashSet::new();
    for (idx, app) in config.facebook.apps.iter().enumerate() {
        if app.id.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("facebook.apps[{idx}].id must not be empty"),
            });
        } else if !seen_app_ids.insert(app.id.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("facebook.apps[{idx}].id `{}` is declared twice", app.id),
            });
        }

        if app.access_token.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("facebook.apps[{idx}].access_token must not be empty"),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FacebookAppConfig, InletConfig};

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&InletConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_is_rejected() {
        let mut config = InletConfig::default();
        config.storage.database_path = "  ".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("database_path")));
    }

    #[test]
    fn duplicate_app_ids_are_rejected() {
        let mut config = InletConfig::default();
        config.facebook.apps = vec![
            FacebookAppConfig {
                id: "42".into(),
                access_token: "t1".into(),
                verify_token: None,
            },
            FacebookAppConfig {
                id: "42".into(),
                access_token: "t2".into(),
                verify_token: None,
            },
        ];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("declared twice")));
    }

    #[test]
    fn empty_access_token_is_rejected() {
        let mut config = InletConfig::default();
        config.facebook.apps = vec![FacebookAppConfig {
            id: "42".into(),
            access_token: "".into(),
            verify_token: None,
        }];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("access_token")));
    }

    #[test]
    fn collects_all_errors_at_once() {
        let mut config = InletConfig::default();
        config.storage.database_path = "".into();
        config.gateway.host = "".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
