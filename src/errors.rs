//! Validation error types
//!
//! Structured issues for each registry validation layer, designed for
//! helpful messages with suggestions.

use serde_json::{json, Value};
use thiserror::Error;

use crate::registry::Category;

/// Validation layer (1-4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLayer {
    Schema = 1,
    Ids = 2,
    Structure = 3,
    Hints = 4,
}

impl std::fmt::Display for ValidationLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationLayer::Schema => write!(f, "Schema"),
            ValidationLayer::Ids => write!(f, "Ids"),
            ValidationLayer::Structure => write!(f, "Structure"),
            ValidationLayer::Hints => write!(f, "Hints"),
        }
    }
}

/// Severity of validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation issue with context
#[derive(Debug, Error)]
pub enum ValidationError {
    // Layer 1: Schema
    #[error("Schema violation at '{path}': {message}")]
    SchemaViolation {
        layer: ValidationLayer,
        path: String,
        message: String,
    },

    // Layer 2: Ids
    #[error("Invalid screen ID format: '{id}' ({category})")]
    InvalidIdFormat {
        layer: ValidationLayer,
        id: String,
        category: Category,
        reason: String,
    },

    #[error("Duplicate screen ID: '{id}' declared in {first} and {second}")]
    DuplicateScreenId {
        layer: ValidationLayer,
        id: String,
        first: Category,
        second: Category,
    },

    // Layer 3: Structure
    #[error("Registry declares no tabs")]
    NoTabs { layer: ValidationLayer },

    #[error("Detail '{detail}' has unknown parent tab '{parent}'")]
    UnknownParent {
        layer: ValidationLayer,
        detail: String,
        parent: String,
        available_tabs: Vec<String>,
    },

    #[error("Default tab '{tab}' is not a declared tab")]
    UnknownDefaultTab {
        layer: ValidationLayer,
        tab: String,
        available_tabs: Vec<String>,
    },

    #[error("Onboarding screen '{id}' has page {page} (pages start at 1)")]
    InvalidOnboardingPage {
        layer: ValidationLayer,
        id: String,
        page: i64,
    },

    // Layer 4: Hints (warnings)
    #[error("Onboarding page {page} is used by both '{first}' and '{second}'")]
    DuplicateOnboardingPage {
        layer: ValidationLayer,
        page: i64,
        first: String,
        second: String,
        severity: Severity,
    },

    #[error("Onboarding pages are not contiguous from 1: missing {}", page_range(.first_missing, .last_missing))]
    OnboardingGap {
        layer: ValidationLayer,
        first_missing: i64,
        last_missing: i64,
        severity: Severity,
    },

    #[error("Accessibility id '{accessibility_id}' is shared by tabs '{first}' and '{second}'")]
    DuplicateAccessibilityId {
        layer: ValidationLayer,
        accessibility_id: String,
        first: String,
        second: String,
        severity: Severity,
    },
}

fn page_range(first: &i64, last: &i64) -> String {
    if first == last {
        format!("page {first}")
    } else {
        format!("pages {first}-{last}")
    }
}

impl ValidationError {
    /// Get the validation layer for this issue
    pub fn layer(&self) -> ValidationLayer {
        match self {
            ValidationError::SchemaViolation { layer, .. } => *layer,
            ValidationError::InvalidIdFormat { layer, .. } => *layer,
            ValidationError::DuplicateScreenId { layer, .. } => *layer,
            ValidationError::NoTabs { layer } => *layer,
            ValidationError::UnknownParent { layer, .. } => *layer,
            ValidationError::UnknownDefaultTab { layer, .. } => *layer,
            ValidationError::InvalidOnboardingPage { layer, .. } => *layer,
            ValidationError::DuplicateOnboardingPage { layer, .. } => *layer,
            ValidationError::OnboardingGap { layer, .. } => *layer,
            ValidationError::DuplicateAccessibilityId { layer, .. } => *layer,
        }
    }

    /// Get severity (error vs warning)
    pub fn severity(&self) -> Severity {
        match self {
            ValidationError::DuplicateOnboardingPage { severity, .. } => *severity,
            ValidationError::OnboardingGap { severity, .. } => *severity,
            ValidationError::DuplicateAccessibilityId { severity, .. } => *severity,
            _ => Severity::Error,
        }
    }

    /// Get suggestion for fixing this issue
    pub fn suggestion(&self) -> Option<String> {
        match self {
            ValidationError::InvalidIdFormat { reason, .. } => Some(reason.clone()),
            ValidationError::DuplicateScreenId { .. } => {
                Some("Screen ids are looked up flat across all categories; rename one".to_string())
            }
            ValidationError::NoTabs { .. } => {
                Some("Declare at least one entry under tabs:".to_string())
            }
            ValidationError::UnknownParent { available_tabs, .. }
            | ValidationError::UnknownDefaultTab { available_tabs, .. } => {
                if available_tabs.is_empty() {
                    Some("No tabs available in registry".to_string())
                } else if available_tabs.len() <= 5 {
                    Some(format!("Available tabs: {}", available_tabs.join(", ")))
                } else {
                    Some(format!(
                        "Available tabs: {} (and {} more)",
                        available_tabs[..3].join(", "),
                        available_tabs.len() - 3
                    ))
                }
            }
            ValidationError::InvalidOnboardingPage { .. } => {
                Some("Number onboarding pages 1, 2, 3, ...".to_string())
            }
            ValidationError::OnboardingGap { .. } => {
                Some("Next/Back buttons skip missing pages; renumber to close the gap".to_string())
            }
            _ => None,
        }
    }

    /// JSON form used by `tabstack validate --format json`
    pub fn to_json(&self) -> Value {
        json!({
            "layer": self.layer().to_string(),
            "severity": self.severity().to_string(),
            "message": self.to_string(),
            "suggestion": self.suggestion(),
        })
    }
}

/// Result of validating a registry
#[derive(Debug)]
pub struct ValidationResult {
    pub file_path: String,
    pub tab_count: usize,
    pub screen_count: usize,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            tab_count: 0,
            screen_count: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        if error.severity() == Severity::Warning {
            self.warnings.push(error);
        } else {
            self.errors.push(error);
        }
    }

    /// One-line summary of the errors, for `NavError::InvalidRegistry`
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn to_json(&self) -> Value {
        json!({
            "file": self.file_path,
            "valid": self.is_valid(),
            "tabs": self.tab_count,
            "screens": self.screen_count,
            "errors": self.errors.iter().map(ValidationError::to_json).collect::<Vec<_>>(),
            "warnings": self.warnings.iter().map(ValidationError::to_json).collect::<Vec<_>>(),
        })
    }
}
