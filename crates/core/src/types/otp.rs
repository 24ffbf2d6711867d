//! One-time password code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`OtpCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum OtpCodeError {
    /// The code is not exactly six characters long.
    #[error("code must be exactly {expected} digits")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
    },
    /// The code contains a non-digit character.
    #[error("code must contain only digits")]
    NonDigit,
}

/// A six-digit one-time password, as entered by the farmer.
///
/// The raw code only ever exists in memory while a send or verify request
/// is in flight; storage and comparison happen on its SHA-256 digest.
/// `Display` renders a masked value so a code can never leak through a
/// log line or an error message.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OtpCode(String);

impl OtpCode {
    /// Number of digits in a code.
    pub const LENGTH: usize = 6;

    /// Parse an `OtpCode` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly six ASCII digits.
    pub fn parse(s: &str) -> Result<Self, OtpCodeError> {
        let s = s.trim();

        if s.len() != Self::LENGTH {
            return Err(OtpCodeError::WrongLength {
                expected: Self::LENGTH,
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OtpCodeError::NonDigit);
        }

        Ok(Self(s.to_owned()))
    }

    /// Build a code from a number in `0..1_000_000`, zero-padded to six digits.
    #[must_use]
    pub fn from_number(n: u32) -> Self {
        Self(format!("{:06}", n % 1_000_000))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "******")
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OtpCode").field(&"******").finish()
    }
}

impl std::str::FromStr for OtpCode {
    type Err = OtpCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let code = OtpCode::parse("012345").unwrap();
        assert_eq!(code.as_str(), "012345");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let code = OtpCode::parse(" 654321 ").unwrap();
        assert_eq!(code.as_str(), "654321");
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            OtpCode::parse("12345"),
            Err(OtpCodeError::WrongLength { .. })
        ));
        assert!(matches!(
            OtpCode::parse("1234567"),
            Err(OtpCodeError::WrongLength { .. })
        ));
    }

    #[test]
    fn test_parse_non_digit() {
        assert!(matches!(
            OtpCode::parse("12a456"),
            Err(OtpCodeError::NonDigit)
        ));
    }

    #[test]
    fn test_from_number_zero_pads() {
        assert_eq!(OtpCode::from_number(7).as_str(), "000007");
        assert_eq!(OtpCode::from_number(1_234_567).as_str(), "234567");
    }

    #[test]
    fn test_display_masks_code() {
        let code = OtpCode::parse("123456").unwrap();
        assert_eq!(code.to_string(), "******");
        assert!(!format!("{code:?}").contains("123456"));
    }
}
