//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum NavError {
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Registry errors (NAV-010 to NAV-013)
    // ─────────────────────────────────────────────────────────────

    #[error("NAV-010: Registry '{source_name}' is invalid ({error_count} error(s)): {summary}")]
    InvalidRegistry {
        source_name: String,
        error_count: usize,
        summary: String,
    },

    #[error("NAV-011: Invalid schema: expected '{expected}', got '{found}'")]
    SchemaMismatch { expected: String, found: String },

    #[error("NAV-012: Registry does not match the registry schema: {details}")]
    SchemaViolation { details: String },

    #[error("NAV-013: Invalid screen id '{id}': {reason}")]
    InvalidScreenId { id: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Navigation errors (NAV-020 to NAV-021)
    // ─────────────────────────────────────────────────────────────

    #[error("NAV-020: Unknown tab '{tab_id}'")]
    UnknownTab { tab_id: String },

    #[error("NAV-021: Unknown screen '{screen_id}'")]
    UnknownScreen { screen_id: String },

    // ─────────────────────────────────────────────────────────────
    // Action errors (NAV-030 to NAV-031)
    // ─────────────────────────────────────────────────────────────

    #[error("NAV-030: Invalid action '{input}': {reason}")]
    InvalidAction { input: String, reason: String },

    #[error("NAV-031: Screen params must be a JSON object, got {found}")]
    InvalidParams { found: String },
}

impl NavError {
    /// Short, stable error code (`NAV-0xx`), if the variant carries one
    pub fn code(&self) -> Option<&'static str> {
        match self {
            NavError::InvalidRegistry { .. } => Some("NAV-010"),
            NavError::SchemaMismatch { .. } => Some("NAV-011"),
            NavError::SchemaViolation { .. } => Some("NAV-012"),
            NavError::InvalidScreenId { .. } => Some("NAV-013"),
            NavError::UnknownTab { .. } => Some("NAV-020"),
            NavError::UnknownScreen { .. } => Some("NAV-021"),
            NavError::InvalidAction { .. } => Some("NAV-030"),
            NavError::InvalidParams { .. } => Some("NAV-031"),
            NavError::YamlParse(_) | NavError::Json(_) | NavError::Io(_) => None,
        }
    }
}

impl FixSuggestion for NavError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            NavError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            NavError::Json(_) => Some("Check the JSON params: keys and strings need double quotes"),
            NavError::Io(_) => Some("Check file path and permissions"),
            NavError::InvalidRegistry { .. } => {
                Some("Run `tabstack validate <file>` to list every issue")
            }
            NavError::SchemaMismatch { .. } => Some("Set `schema: tabstack/registry@0.1`"),
            NavError::SchemaViolation { .. } => {
                Some("Every screen needs id, label and icon; details need a parent, onboarding a page")
            }
            NavError::InvalidScreenId { .. } => {
                Some("Use letters, digits, '-', '_' or '.' and start with a letter or digit")
            }
            NavError::UnknownTab { .. } => Some("Use one of the ids declared under tabs:"),
            NavError::UnknownScreen { .. } => {
                Some("Use an id declared under tabs:, details:, onboarding: or utility:")
            }
            NavError::InvalidAction { .. } => {
                Some("Use verb[:target[:params]], e.g. switch-tab:home or navigate:item-detail:{\"id\":\"x\"}")
            }
            NavError::InvalidParams { .. } => Some("Pass params as a JSON object, e.g. {\"id\":\"x\"}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_embedded_in_messages() {
        let err = NavError::UnknownTab {
            tab_id: "nonexistent".into(),
        };
        assert_eq!(err.code(), Some("NAV-020"));
        assert!(err.to_string().starts_with("NAV-020"));
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn every_coded_error_has_a_suggestion() {
        let errors = [
            NavError::SchemaMismatch {
                expected: "a".into(),
                found: "b".into(),
            },
            NavError::UnknownScreen {
                screen_id: "x".into(),
            },
            NavError::InvalidParams {
                found: "a number".into(),
            },
        ];
        for err in errors {
            assert!(err.fix_suggestion().is_some(), "{err} lacks a fix");
        }
    }

    #[test]
    fn wrapped_errors_have_no_code() {
        let err: NavError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), None);
        assert!(err.fix_suggestion().is_some());
    }
}
