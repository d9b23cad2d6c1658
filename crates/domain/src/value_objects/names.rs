//! Validated name newtype for world entities
//!
//! Names are valid by construction:
//! - Non-empty
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for entity names
const MAX_NAME_LENGTH: usize = 200;

/// A validated entity name (non-empty, <=200 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityName(String);

impl EntityName {
    /// Create a new validated entity name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - The name exceeds 200 characters after trimming
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Entity name cannot be empty"));
        }
        if trimmed.len() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Entity name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive equality, used by target resolution.
    pub fn matches(&self, query: &str) -> bool {
        self.0.eq_ignore_ascii_case(query.trim())
    }

    /// Case-insensitive prefix match.
    pub fn starts_with(&self, query: &str) -> bool {
        let query = query.trim();
        !query.is_empty()
            && self
                .0
                .get(..query.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(query))
    }

    /// Case-insensitive prefix match on any word, so "pit" finds
    /// "Bottomless Pit".
    pub fn has_word_starting_with(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }
        let mut word_starts = std::iter::once(0).chain(
            self.0
                .char_indices()
                .filter(|(_, c)| c.is_whitespace())
                .map(|(i, c)| i + c.len_utf8()),
        );
        word_starts.any(|start| {
            self.0
                .get(start..start + query.len())
                .is_some_and(|word| word.eq_ignore_ascii_case(query))
        })
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EntityName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<EntityName> for String {
    fn from(name: EntityName) -> String {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        let name = EntityName::new("  Combat Dummy  ").unwrap();
        assert_eq!(name.as_str(), "Combat Dummy");
    }

    #[test]
    fn rejects_empty() {
        assert!(EntityName::new("   ").is_err());
    }

    #[test]
    fn rejects_overlong() {
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            EntityName::new(long),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn matching_ignores_case() {
        let name = EntityName::new("Bottomless Pit").unwrap();
        assert!(name.matches("bottomless pit"));
        assert!(name.starts_with("bottom"));
        assert!(!name.starts_with(""));
        assert!(!name.starts_with("pit"));
    }

    #[test]
    fn word_prefixes_match_any_word() {
        let name = EntityName::new("Bottomless Pit").unwrap();
        assert!(name.has_word_starting_with("pit"));
        assert!(name.has_word_starting_with("BOTTOM"));
        assert!(!name.has_word_starting_with("less"));
        assert!(!name.has_word_starting_with("pitfall"));
        assert!(!name.has_word_starting_with(" "));
    }

    #[test]
    fn serde_rejects_invalid_names() {
        let result: Result<EntityName, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
