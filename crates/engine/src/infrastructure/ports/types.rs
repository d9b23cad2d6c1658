//! Value types shared across ports.

/// A target as typed by a player, normalized.
///
/// Surrounding whitespace and a leading `in ` are dropped, so `jump in pit`
/// and `jump pit` name the same thing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec(String);

impl TargetSpec {
    /// `None` when nothing is left after normalizing.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let stripped = match trimmed.get(..3) {
            Some(prefix) if prefix.eq_ignore_ascii_case("in ") => trimmed[3..].trim_start(),
            _ => trimmed,
        };
        if stripped.is_empty() {
            None
        } else {
            Some(Self(stripped.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_strips_in() {
        assert_eq!(TargetSpec::parse("  dummy ").unwrap().as_str(), "dummy");
        assert_eq!(TargetSpec::parse("in pit").unwrap().as_str(), "pit");
        assert_eq!(TargetSpec::parse("IN   pit").unwrap().as_str(), "pit");
    }

    #[test]
    fn keeps_names_that_merely_start_with_in() {
        assert_eq!(TargetSpec::parse("inkwell").unwrap().as_str(), "inkwell");
    }

    #[test]
    fn bare_in_is_a_name() {
        assert_eq!(TargetSpec::parse("in   ").unwrap().as_str(), "in");
    }

    #[test]
    fn empty_is_none() {
        assert!(TargetSpec::parse("").is_none());
        assert!(TargetSpec::parse("   ").is_none());
    }
}
