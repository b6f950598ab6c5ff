//! Complaint tracking identifier.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ComplaintId`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum ComplaintIdError {
    /// The input does not start with the `CMP-` prefix.
    #[error("complaint id must start with \"CMP-\"")]
    MissingPrefix,
    /// The numeric part is not a four-digit number in range.
    #[error("complaint id must end in a number between 1000 and 9999")]
    InvalidNumber,
}

/// A patient-facing complaint tracking id, e.g. `CMP-4821`.
///
/// Ids are handed to patients on submission and typed back in to look up
/// status, so the format stays short and unambiguous: the fixed `CMP-`
/// prefix followed by four digits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ComplaintId(String);

impl ComplaintId {
    /// Prefix shared by all complaint ids.
    pub const PREFIX: &'static str = "CMP-";

    /// Smallest valid numeric suffix.
    pub const MIN_NUMBER: u16 = 1000;

    /// Largest valid numeric suffix.
    pub const MAX_NUMBER: u16 = 9999;

    /// Build a `ComplaintId` from a numeric suffix.
    ///
    /// # Errors
    ///
    /// Returns [`ComplaintIdError::InvalidNumber`] if `number` is outside
    /// the 1000-9999 range.
    pub fn from_number(number: u16) -> Result<Self, ComplaintIdError> {
        if !(Self::MIN_NUMBER..=Self::MAX_NUMBER).contains(&number) {
            return Err(ComplaintIdError::InvalidNumber);
        }
        Ok(Self(format!("{}{number}", Self::PREFIX)))
    }

    /// Parse a `ComplaintId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input lacks the `CMP-` prefix or the suffix
    /// is not a four-digit number between 1000 and 9999.
    pub fn parse(s: &str) -> Result<Self, ComplaintIdError> {
        let digits = s
            .strip_prefix(Self::PREFIX)
            .ok_or(ComplaintIdError::MissingPrefix)?;

        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ComplaintIdError::InvalidNumber);
        }

        let number: u16 = digits
            .parse()
            .map_err(|_| ComplaintIdError::InvalidNumber)?;

        Self::from_number(number)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ComplaintId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ComplaintId {
    type Err = ComplaintIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ComplaintId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
