//! Test Fixtures for tabstack
//!
//! Bundled demo registries and id constants shared by unit and integration
//! tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tabstack::test_fixtures::*;
//!
//! let router = Router::configure(example_registry(), Some(TAB_HOME)).unwrap();
//! ```

use crate::registry::{RegistryFile, ScreenRegistry};

// ═══════════════════════════════════════════════════════════════════════════
// REGISTRY DOCUMENTS
// ═══════════════════════════════════════════════════════════════════════════

/// Three tabs, one detail, two onboarding pages, one utility screen
pub const EXAMPLE_SCREENS_YAML: &str = include_str!("../demos/example.screens.yaml");

/// Six tabs with accessibility ids, four details, five onboarding pages
pub const NARRATIV_SCREENS_YAML: &str = include_str!("../demos/narrativ.screens.yaml");

// ═══════════════════════════════════════════════════════════════════════════
// IDS (example registry)
// ═══════════════════════════════════════════════════════════════════════════

pub const TAB_HOME: &str = "home";
pub const TAB_LIST: &str = "list";
pub const TAB_SETTINGS: &str = "settings";
pub const DETAIL_ITEM: &str = "item-detail";
pub const ONBOARDING_FIRST: &str = "welcome-1";
pub const UTILITY_LOADING: &str = "loading";

// ═══════════════════════════════════════════════════════════════════════════
// REGISTRIES
// ═══════════════════════════════════════════════════════════════════════════

fn parse(yaml: &str) -> ScreenRegistry {
    RegistryFile::from_yaml(yaml)
        .map(|file| file.screens)
        .unwrap_or_else(|e| panic!("bundled demo registry must parse: {e}"))
}

pub fn example_registry() -> ScreenRegistry {
    parse(EXAMPLE_SCREENS_YAML)
}

pub fn narrativ_registry() -> ScreenRegistry {
    parse(NARRATIV_SCREENS_YAML)
}
