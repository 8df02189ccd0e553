//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone cannot be empty")]
    Empty,
    /// The input contains something other than ASCII digits.
    #[error("phone must contain only digits")]
    NonDigit,
    /// The digit count is outside the accepted range.
    #[error("phone must have {min} or {max} digits (got {len})")]
    InvalidLength {
        /// Number of digits supplied.
        len: usize,
        /// Minimum accepted digit count.
        min: usize,
        /// Maximum accepted digit count.
        max: usize,
    },
}

/// A contact phone number: area code plus subscriber number, digits only.
///
/// ```
/// use delivery_core::Phone;
///
/// assert!(Phone::parse("1198888777").is_ok());
/// assert!(Phone::parse("11988887777").is_ok());
/// assert!(Phone::parse("(11) 98888-7777").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum number of digits (landline with area code).
    pub const MIN_DIGITS: usize = 10;
    /// Maximum number of digits (mobile with area code).
    pub const MAX_DIGITS: usize = 11;

    /// Parse a `Phone` from a string of 10 or 11 ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns a [`PhoneError`] if the input is empty, contains non-digits or
    /// has the wrong number of digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::NonDigit);
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&s.len()) {
            return Err(PhoneError::InvalidLength {
                len: s.len(),
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
