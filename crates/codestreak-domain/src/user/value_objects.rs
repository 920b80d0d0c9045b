use serde::{Deserialize, Serialize};

use crate::shared::DomainError;

const MAX_HANDLE_LEN: usize = 64;

/// Username on the external problem-solving platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalHandle(String);

impl ExternalHandle {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let handle = raw.trim();

        if handle.is_empty() {
            return Err(DomainError::Validation(
                "LeetCode username is required".to_string(),
            ));
        }

        if handle.len() > MAX_HANDLE_LEN {
            return Err(DomainError::Validation(format!(
                "LeetCode username must be at most {} characters",
                MAX_HANDLE_LEN
            )));
        }

        if handle.chars().any(char::is_whitespace) {
            return Err(DomainError::Validation(
                "LeetCode username must not contain whitespace".to_string(),
            ));
        }

        Ok(Self(handle.to_string()))
    }

    /// Decode a stored column. A NULL or blank value means no handle is linked.
    pub fn from_stored(raw: Option<&str>) -> Result<Option<Self>, DomainError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(handle) => Self::parse(handle).map(Some),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ExternalHandle {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ExternalHandle> for String {
    fn from(handle: ExternalHandle) -> Self {
        handle.0
    }
}

impl std::fmt::Display for ExternalHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_input() {
        let handle = ExternalHandle::parse("  alice_01 ").unwrap();
        assert_eq!(handle.as_str(), "alice_01");
    }

    #[test]
    fn test_parse_rejects_blank_and_spaced_handles() {
        assert!(ExternalHandle::parse("   ").is_err());
        assert!(ExternalHandle::parse("").is_err());
        assert!(ExternalHandle::parse("ali ce").is_err());
        assert!(ExternalHandle::parse(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_from_stored_treats_blank_as_unlinked() {
        assert_eq!(ExternalHandle::from_stored(None).unwrap(), None);
        assert_eq!(ExternalHandle::from_stored(Some("")).unwrap(), None);
        assert_eq!(ExternalHandle::from_stored(Some("  ")).unwrap(), None);
        assert_eq!(
            ExternalHandle::from_stored(Some("bob")).unwrap(),
            Some(ExternalHandle::parse("bob").unwrap())
        );
        assert!(ExternalHandle::from_stored(Some(&"a".repeat(65))).is_err());
    }
}
