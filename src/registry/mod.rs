//! Screen registry - the static declaration of every reachable screen
//!
//! Parsed once from a `*.screens.yaml` file (or built in code) and never
//! mutated afterwards. Lookups are flat by id across the four categories.

pub mod schema;
pub mod validate;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::NavError;
use crate::errors::ValidationResult;

/// Schema tag every registry file must carry
pub const REGISTRY_SCHEMA: &str = "tabstack/registry@0.1";

// ─────────────────────────────────────────────────────────────────────────────
// Entries
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level tab (shown in the tab bar, owns a navigation stack)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabScreen {
    pub id: String,
    pub label: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_id: Option<String>,
}

/// Screen pushed onto its parent tab's stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailScreen {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub parent: String,
}

/// One page of the onboarding sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingScreen {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub page: i64,
    /// Headline for the built-in onboarding renderer (falls back to `label`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Full-screen utility view (loading, modal-style screens)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilityScreen {
    pub id: String,
    pub label: String,
    pub icon: String,
}

/// Registry category, in lookup order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tab,
    Detail,
    Onboarding,
    Utility,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Matches the YAML section names
        match self {
            Category::Tab => write!(f, "tabs"),
            Category::Detail => write!(f, "details"),
            Category::Onboarding => write!(f, "onboarding"),
            Category::Utility => write!(f, "utility"),
        }
    }
}

/// Borrowed view of any registry entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScreenEntry<'a> {
    Tab(&'a TabScreen),
    Detail(&'a DetailScreen),
    Onboarding(&'a OnboardingScreen),
    Utility(&'a UtilityScreen),
}

impl<'a> ScreenEntry<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            ScreenEntry::Tab(s) => &s.id,
            ScreenEntry::Detail(s) => &s.id,
            ScreenEntry::Onboarding(s) => &s.id,
            ScreenEntry::Utility(s) => &s.id,
        }
    }

    pub fn label(&self) -> &'a str {
        match self {
            ScreenEntry::Tab(s) => &s.label,
            ScreenEntry::Detail(s) => &s.label,
            ScreenEntry::Onboarding(s) => &s.label,
            ScreenEntry::Utility(s) => &s.label,
        }
    }

    pub fn icon(&self) -> &'a str {
        match self {
            ScreenEntry::Tab(s) => &s.icon,
            ScreenEntry::Detail(s) => &s.icon,
            ScreenEntry::Onboarding(s) => &s.icon,
            ScreenEntry::Utility(s) => &s.icon,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            ScreenEntry::Tab(_) => Category::Tab,
            ScreenEntry::Detail(_) => Category::Detail,
            ScreenEntry::Onboarding(_) => Category::Onboarding,
            ScreenEntry::Utility(_) => Category::Utility,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenRegistry {
    #[serde(default)]
    pub tabs: Vec<TabScreen>,
    #[serde(default)]
    pub details: Vec<DetailScreen>,
    #[serde(default)]
    pub onboarding: Vec<OnboardingScreen>,
    #[serde(default)]
    pub utility: Vec<UtilityScreen>,
}

impl ScreenRegistry {
    pub fn tab(&self, id: &str) -> Option<&TabScreen> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn detail(&self, id: &str) -> Option<&DetailScreen> {
        self.details.iter().find(|d| d.id == id)
    }

    pub fn onboarding_screen(&self, id: &str) -> Option<&OnboardingScreen> {
        self.onboarding.iter().find(|o| o.id == id)
    }

    pub fn utility_screen(&self, id: &str) -> Option<&UtilityScreen> {
        self.utility.iter().find(|u| u.id == id)
    }

    /// Onboarding entry for a given page number
    pub fn onboarding_page(&self, page: i64) -> Option<&OnboardingScreen> {
        self.onboarding.iter().find(|o| o.page == page)
    }

    /// Highest onboarding page number (0 when there is no onboarding)
    pub fn last_onboarding_page(&self) -> i64 {
        self.onboarding.iter().map(|o| o.page).max().unwrap_or(0)
    }

    /// Declared onboarding pages (page ≥ 1) in page order, one entry per page
    ///
    /// When two entries share a page the first declared wins, as in
    /// [`onboarding_page`](Self::onboarding_page).
    pub fn onboarding_sequence(&self) -> Vec<&OnboardingScreen> {
        let mut sequence: Vec<&OnboardingScreen> =
            self.onboarding.iter().filter(|o| o.page >= 1).collect();
        sequence.sort_by_key(|o| o.page);
        sequence.dedup_by_key(|o| o.page);
        sequence
    }

    /// Flat lookup, checked in category order: tab → detail → onboarding → utility
    pub fn find(&self, id: &str) -> Option<ScreenEntry<'_>> {
        if let Some(tab) = self.tab(id) {
            return Some(ScreenEntry::Tab(tab));
        }
        if let Some(detail) = self.detail(id) {
            return Some(ScreenEntry::Detail(detail));
        }
        if let Some(page) = self.onboarding_screen(id) {
            return Some(ScreenEntry::Onboarding(page));
        }
        self.utility_screen(id).map(ScreenEntry::Utility)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn tab_ids(&self) -> impl Iterator<Item = &str> {
        self.tabs.iter().map(|t| t.id.as_str())
    }

    pub fn all_ids(&self) -> impl Iterator<Item = &str> {
        self.entries().map(|e| e.id())
    }

    /// Every entry in declaration order, category by category
    pub fn entries(&self) -> impl Iterator<Item = ScreenEntry<'_>> {
        self.tabs
            .iter()
            .map(ScreenEntry::Tab)
            .chain(self.details.iter().map(ScreenEntry::Detail))
            .chain(self.onboarding.iter().map(ScreenEntry::Onboarding))
            .chain(self.utility.iter().map(ScreenEntry::Utility))
    }

    pub fn len(&self) -> usize {
        self.tabs.len() + self.details.len() + self.onboarding.len() + self.utility.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry file
// ─────────────────────────────────────────────────────────────────────────────

/// Registry file parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryFile {
    pub schema: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tab: Option<String>,
    #[serde(flatten)]
    pub screens: ScreenRegistry,
}

impl RegistryFile {
    /// Parse, schema-check and deserialize a registry document
    pub fn from_yaml(yaml: &str) -> Result<Self, NavError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;

        let violations = schema::check(&value);
        if !violations.is_empty() {
            let details = violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(NavError::SchemaViolation { details });
        }

        let file: RegistryFile = serde_json::from_value(value)?;
        if file.schema != REGISTRY_SCHEMA {
            return Err(NavError::SchemaMismatch {
                expected: REGISTRY_SCHEMA.to_string(),
                found: file.schema,
            });
        }

        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self, NavError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Display name: explicit `name:` or the file stem
    pub fn display_name(&self, path: &Path) -> String {
        self.name.clone().unwrap_or_else(|| {
            path.file_name()
                .and_then(|s| s.to_str())
                .map(|s| s.trim_end_matches(".yaml").trim_end_matches(".screens"))
                .unwrap_or("registry")
                .to_string()
        })
    }

    /// Run every validation layer past the schema
    pub fn validate(&self, file_path: &str) -> ValidationResult {
        validate::validate_registry(&self.screens, self.default_tab.as_deref(), file_path)
    }
}
