//! Registry validation layers
//!
//! Each layer validates one aspect of the registry:
//! - Layer 1: Schema - document shape (see schema.rs, runs before serde)
//! - Layer 2: Ids - id format and global uniqueness
//! - Layer 3: Structure - tabs exist, parents and default tab resolve
//! - Layer 4: Hints - onboarding numbering, accessibility ids (warnings)

use std::collections::HashMap;

use crate::errors::{Severity, ValidationError, ValidationLayer, ValidationResult};
use crate::types::ScreenId;

use super::{Category, ScreenRegistry};

/// Run layers 2-4 and collect every issue
pub fn validate_registry(
    registry: &ScreenRegistry,
    default_tab: Option<&str>,
    file_path: &str,
) -> ValidationResult {
    let mut result = ValidationResult::new(file_path);
    result.tab_count = registry.tabs.len();
    result.screen_count = registry.len();

    for error in validate_ids(registry) {
        result.add_error(error);
    }

    for error in validate_structure(registry, default_tab) {
        result.add_error(error);
    }

    for warning in validate_hints(registry) {
        result.add_error(warning); // add_error handles severity
    }

    result
}

/// Layer 2: id format and uniqueness across all four categories
pub fn validate_ids(registry: &ScreenRegistry) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut seen: HashMap<&str, Category> = HashMap::new();
    for entry in registry.entries() {
        if let Err(e) = ScreenId::new(entry.id()) {
            errors.push(ValidationError::InvalidIdFormat {
                layer: ValidationLayer::Ids,
                id: entry.id().to_string(),
                category: entry.category(),
                reason: e.to_string(),
            });
        }

        if let Some(first) = seen.get(entry.id()) {
            errors.push(ValidationError::DuplicateScreenId {
                layer: ValidationLayer::Ids,
                id: entry.id().to_string(),
                first: *first,
                second: entry.category(),
            });
        } else {
            seen.insert(entry.id(), entry.category());
        }
    }

    errors
}

/// Layer 3: tabs exist, detail parents and the default tab resolve to tabs
pub fn validate_structure(
    registry: &ScreenRegistry,
    default_tab: Option<&str>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let available_tabs = || registry.tab_ids().map(String::from).collect::<Vec<_>>();

    if registry.tabs.is_empty() {
        errors.push(ValidationError::NoTabs {
            layer: ValidationLayer::Structure,
        });
    }

    for detail in &registry.details {
        if registry.tab(&detail.parent).is_none() {
            errors.push(ValidationError::UnknownParent {
                layer: ValidationLayer::Structure,
                detail: detail.id.clone(),
                parent: detail.parent.clone(),
                available_tabs: available_tabs(),
            });
        }
    }

    if let Some(tab) = default_tab {
        if registry.tab(tab).is_none() {
            errors.push(ValidationError::UnknownDefaultTab {
                layer: ValidationLayer::Structure,
                tab: tab.to_string(),
                available_tabs: available_tabs(),
            });
        }
    }

    for page in &registry.onboarding {
        if page.page < 1 {
            errors.push(ValidationError::InvalidOnboardingPage {
                layer: ValidationLayer::Structure,
                id: page.id.clone(),
                page: page.page,
            });
        }
    }

    errors
}

/// Layer 4: non-fatal hints
pub fn validate_hints(registry: &ScreenRegistry) -> Vec<ValidationError> {
    let mut warnings = Vec::new();

    let mut pages: HashMap<i64, &str> = HashMap::new();
    for entry in registry.onboarding.iter().filter(|o| o.page >= 1) {
        if let Some(first) = pages.get(&entry.page) {
            warnings.push(ValidationError::DuplicateOnboardingPage {
                layer: ValidationLayer::Hints,
                page: entry.page,
                first: first.to_string(),
                second: entry.id.clone(),
                severity: Severity::Warning,
            });
        } else {
            pages.insert(entry.page, &entry.id);
        }
    }

    // One warning per gap between neighbouring declared pages
    let mut previous = 0;
    for entry in registry.onboarding_sequence() {
        if entry.page > previous + 1 {
            warnings.push(ValidationError::OnboardingGap {
                layer: ValidationLayer::Hints,
                first_missing: previous + 1,
                last_missing: entry.page - 1,
                severity: Severity::Warning,
            });
        }
        previous = entry.page;
    }

    let mut accessibility: HashMap<&str, &str> = HashMap::new();
    for tab in &registry.tabs {
        let Some(a11y) = tab.accessibility_id.as_deref() else {
            continue;
        };
        if let Some(first) = accessibility.get(a11y) {
            warnings.push(ValidationError::DuplicateAccessibilityId {
                layer: ValidationLayer::Hints,
                accessibility_id: a11y.to_string(),
                first: first.to_string(),
                second: tab.id.clone(),
                severity: Severity::Warning,
            });
        } else {
            accessibility.insert(a11y, &tab.id);
        }
    }

    warnings
}
