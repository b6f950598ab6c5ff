//! Admin username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum UsernameError {
    /// The input string is empty.
    #[error("username cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character that is not allowed.
    #[error("username contains a character that is not allowed: {0:?}")]
    InvalidCharacter(char),
}

/// An admin account username.
///
/// Usernames double as document-store keys, so the character set is
/// restricted to what a key path can safely carry.
///
/// ## Constraints
///
/// - Length: 1-64 characters
/// - No whitespace or control characters
/// - None of `. $ # [ ] /` (reserved in store key paths)
/// - Case-sensitive; no normalization is applied
///
/// ## Examples
///
/// ```
/// use careline_core::Username;
///
/// assert!(Username::parse("alice").is_ok());
/// assert!(Username::parse("night-shift_2").is_ok());
///
/// assert!(Username::parse("").is_err());         // empty
/// assert!(Username::parse("a/b").is_err());      // path separator
/// assert!(Username::parse("dr. jones").is_err()); // dot and space
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 64;

    /// Characters rejected because they are reserved in store key paths.
    const FORBIDDEN: [char; 6] = ['.', '$', '#', '[', ']', '/'];

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is longer than 64 characters
    /// - Contains whitespace, control characters, or any of `. $ # [ ] /`
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if s.is_empty() {
            return Err(UsernameError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || Self::FORBIDDEN.contains(c))
        {
            return Err(UsernameError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the username as a byte slice.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_usernames() {
        assert!(Username::parse("admin").is_ok());
        assert!(Username::parse("Alice").is_ok());
        assert!(Username::parse("night-shift_2").is_ok());
        assert!(Username::parse("a").is_ok());
        assert!(Username::parse(&"x".repeat(64)).is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Username::parse(""), Err(UsernameError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            Username::parse(&"x".repeat(65)),
            Err(UsernameError::TooLong { max: 64 })
        ));
    }

    #[test]
    fn test_parse_rejects_key_path_characters() {
        for c in ['.', '$', '#', '[', ']', '/'] {
            let input = format!("user{c}name");
            assert!(
                matches!(
                    Username::parse(&input),
                    Err(UsernameError::InvalidCharacter(found)) if found == c
                ),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_whitespace_and_control() {
        assert!(matches!(
            Username::parse("dr jones"),
            Err(UsernameError::InvalidCharacter(' '))
        ));
        assert!(Username::parse("tab\tname").is_err());
        assert!(Username::parse("line\nname").is_err());
    }

    #[test]
    fn test_case_sensitive() {
        let lower = Username::parse("alice").unwrap();
        let upper = Username::parse("Alice").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_serde_transparent() {
        let username = Username::parse("alice").unwrap();
        let json = serde_json::to_string(&username).unwrap();
        assert_eq!(json, "\"alice\"");

        let back: Username = serde_json::from_str(&json).unwrap();
        assert_eq!(back, username);
    }
}
