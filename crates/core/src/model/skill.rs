use thiserror::Error;

/// Upper bound on skill names; they end up in URLs and cache keys.
pub const MAX_SKILL_NAME_LEN: usize = 80;

/// Validated skill name (trimmed, non-empty) that scopes a roadmap and its progress.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SkillName(String);

impl SkillName {
    /// Create a validated skill name.
    ///
    /// # Errors
    ///
    /// Returns `SkillNameError::Empty` if the name is empty after trimming,
    /// or `SkillNameError::TooLong` if it exceeds `MAX_SKILL_NAME_LEN` characters.
    pub fn new(value: impl Into<String>) -> Result<Self, SkillNameError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SkillNameError::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_SKILL_NAME_LEN {
            return Err(SkillNameError::TooLong { len });
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SkillName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SkillNameError {
    #[error("skill name cannot be empty")]
    Empty,
    #[error("skill name is too long ({len} characters)")]
    TooLong { len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_rejects_blank_names() {
        assert_eq!(SkillName::new("  Rust ").unwrap().as_str(), "Rust");
        assert_eq!(SkillName::new("   "), Err(SkillNameError::Empty));
    }

    #[test]
    fn rejects_overlong_names() {
        let long = "x".repeat(MAX_SKILL_NAME_LEN + 1);
        assert_eq!(
            SkillName::new(long),
            Err(SkillNameError::TooLong {
                len: MAX_SKILL_NAME_LEN + 1
            })
        );
    }
}
