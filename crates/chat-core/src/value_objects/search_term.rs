//! Validated search term and occurrence scoring

use crate::error::DomainError;

/// A case-insensitive substring query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// Minimum query length in characters
    pub const MIN_LEN: usize = 3;

    /// Validate and normalize a raw query
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < Self::MIN_LEN {
            return Err(DomainError::QueryTooShort { min: Self::MIN_LEN });
        }
        Ok(Self {
            raw: trimmed.to_string(),
            folded: trimmed.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of non-overlapping, case-insensitive occurrences in `content`
    pub fn occurrences(&self, content: &str) -> usize {
        content.to_lowercase().matches(self.folded.as_str()).count()
    }

    pub fn matches(&self, content: &str) -> bool {
        content.to_lowercase().contains(self.folded.as_str())
    }

    /// `ILIKE` pattern with `%`, `_` and `\` escaped
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.raw.len() + 2);
        pattern.push('%');
        for c in self.raw.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}
