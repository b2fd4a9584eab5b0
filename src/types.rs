//! NewType wrappers for screen identifiers
//!
//! Registry entries keep plain strings so that a malformed id surfaces as a
//! validation issue instead of a parse failure. Everything past configuration
//! (actions, stack entries) carries a checked `ScreenId`.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SCREEN_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());

// ============================================================================
// SCREEN ID
// ============================================================================

/// Strongly-typed screen identifier
///
/// Guarantees:
/// - Non-empty
/// - Starts with an ASCII letter or digit
/// - Only ASCII alphanumerics, dash, underscore or dot afterwards
/// - Maximum 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScreenId(String);

impl ScreenId {
    /// Maximum allowed length
    pub const MAX_LENGTH: usize = 64;

    /// Create a new ScreenId with validation
    pub fn new(id: impl AsRef<str>) -> Result<Self, ScreenIdError> {
        let id = id.as_ref();

        if id.is_empty() {
            return Err(ScreenIdError::Empty);
        }
        if id.len() > Self::MAX_LENGTH {
            return Err(ScreenIdError::TooLong(id.len()));
        }
        if !SCREEN_ID_PATTERN.is_match(id) {
            return Err(ScreenIdError::InvalidCharacters(id.to_string()));
        }

        Ok(ScreenId(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for ScreenId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ScreenId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScreenId {
    type Err = ScreenIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScreenId::new(s)
    }
}

impl TryFrom<String> for ScreenId {
    type Error = ScreenIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ScreenId::new(value)
    }
}

impl From<ScreenId> for String {
    fn from(id: ScreenId) -> Self {
        id.0
    }
}

impl PartialEq<str> for ScreenId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ScreenId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScreenIdError {
    #[error("Screen ID cannot be empty")]
    Empty,
    #[error("Screen ID too long ({0} > {})", ScreenId::MAX_LENGTH)]
    TooLong(usize),
    #[error("Screen ID contains invalid characters: {0}")]
    InvalidCharacters(String),
}
