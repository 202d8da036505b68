// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! "did you mean?" suggestions using Jaro-Winkler string similarity.

use miette::Diagnostic;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// 0.75 catches common typos like `naem` -> `name` while filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with diagnostic context.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(inlet::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Suggested correction via fuzzy matching, if any.
        suggestion: Option<String>,
        /// List of valid keys for the section.
        valid_keys: String,
    },

    /// A configuration value failed to deserialize.
    #[error("configuration parse error at `{path}`: {detail}")]
    #[diagnostic(code(inlet::config::parse))]
    Parse {
        /// Dotted path to the offending key, or `<root>`.
        path: String,
        /// Figment's description of the failure.
        detail: String,
    },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(inlet::config::validation))]
    Validation {
        /// Description of the constraint violation.
        message: String,
    },
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a figment error (which may aggregate several failures) into
/// a list of [`ConfigError`] diagnostics.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    let mut out = Vec::new();

    for e in err {
        let path = if e.path.is_empty() {
            "<root>".to_string()
        } else {
            e.path.join(".")
        };

        match &e.kind {
            figment::error::Kind::UnknownField(actual, expected) => {
                out.push(ConfigError::UnknownKey {
                    key: actual.clone(),
                    suggestion: suggest(actual, expected),
                    valid_keys: expected.join(", "),
                });
            }
            kind => {
                out.push(ConfigError::Parse {
                    path,
                    detail: kind.to_string(),
                });
            }
        }
    }

    out
}

/// Find the closest valid key by Jaro-Winkler similarity, if close enough.
fn suggest(actual: &str, valid: &[&str]) -> Option<String> {
    valid
        .iter()
        .map(|v| (*v, strsim::jaro_winkler(actual, v)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(v, _)| v.to_string())
}

/// Render a list of config errors to stderr with codes and help text.
pub fn render_errors(errors: &[ConfigError]) {
    for err in errors {
        eprintln!("error: {err}");
        if let Some(help) = err.help() {
            eprintln!("  help: {help}");
        }
    }
}
