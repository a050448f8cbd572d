//! Customer phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input is empty or only whitespace.
    #[error("phone cannot be blank")]
    Blank,
}

/// A customer's phone number, as typed at the counter.
///
/// The counter does not impose a numbering plan; the backend deduplicates
/// customers on the exact (name, phone) pair, so the value is only trimmed.
///
/// ## Examples
///
/// ```
/// use store_counter_core::Phone;
///
/// assert_eq!(Phone::parse(" 9990001111 ").unwrap().as_str(), "9990001111");
/// assert!(Phone::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from clerk input.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Blank);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let phone = Phone::parse("  9990001111\t").unwrap();
        assert_eq!(phone.as_str(), "9990001111");
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Blank));
        assert_eq!(Phone::parse("   "), Err(PhoneError::Blank));
    }

    #[test]
    fn test_parse_has_no_length_cap() {
        let long = format!("+91 {} ext. 42", "9".repeat(40));
        assert_eq!(Phone::parse(&long).unwrap().as_str(), long);
    }

    #[test]
    fn test_formatting_is_preserved() {
        let phone: Phone = "+91 99900-01111".parse().unwrap();
        assert_eq!(phone.to_string(), "+91 99900-01111");
    }

    #[test]
    fn test_serde_transparent() {
        let phone = Phone::parse("12345").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"12345\"");
    }
}
