//! Phone number type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Accepted phone formats: an international number (`+` optional, 10-15
/// digits) or a grouped local number (`ddd-ddd-dddd`).
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+?\d{10,15}|\d{3}-\d{3}-\d{4})$").expect("valid phone pattern")
});

/// Error returned when a string is not a recognized phone format.
#[derive(thiserror::Error, Debug, Clone)]
#[error("phone number must be 10-15 digits (optionally +-prefixed) or formatted as ddd-ddd-dddd")]
pub struct PhoneError;

/// A customer phone number.
///
/// Phone numbers are optional on customer records; this type only exists for
/// present values. Callers treat an absent phone as valid.
///
/// ## Examples
///
/// ```
/// use coral_core::Phone;
///
/// assert!(Phone::parse("+12025550147").is_ok());
/// assert!(Phone::parse("202-555-0147").is_ok());
/// assert!(Phone::parse("555-0147").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError`] if the input matches neither the international
    /// nor the grouped local format.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if PHONE_PATTERN.is_match(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(PhoneError)
        }
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
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

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

// GraphQL scalar (with graphql feature)
#[cfg(feature = "graphql")]
#[async_graphql::Scalar]
impl async_graphql::ScalarType for Phone {
    fn parse(value: async_graphql::Value) -> async_graphql::InputValueResult<Self> {
        match value {
            async_graphql::Value::String(ref s) => {
                Self::parse(s).map_err(async_graphql::InputValueError::custom)
            }
            other => Err(async_graphql::InputValueError::expected_type(other)),
        }
    }

    fn to_value(&self) -> async_graphql::Value {
        async_graphql::Value::String(self.0.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_international() {
        assert!(Phone::parse("+12025550147").is_ok());
        assert!(Phone::parse("12025550147").is_ok());
        assert!(Phone::parse("+123456789012345").is_ok());
    }

    #[test]
    fn test_parse_grouped_local() {
        assert!(Phone::parse("202-555-0147").is_ok());
    }

    #[test]
    fn test_parse_too_short() {
        assert!(Phone::parse("123456789").is_err());
        assert!(Phone::parse("+123").is_err());
    }

    #[test]
    fn test_parse_too_long() {
        assert!(Phone::parse("+1234567890123456").is_err());
    }

    #[test]
    fn test_parse_bad_grouping() {
        assert!(Phone::parse("20-555-0147").is_err());
        assert!(Phone::parse("202-55-0147").is_err());
        assert!(Phone::parse("202-555-014").is_err());
    }

    #[test]
    fn test_parse_rejects_letters_and_spaces() {
        assert!(Phone::parse("202 555 0147").is_err());
        assert!(Phone::parse("CALL-ME-NOW").is_err());
        assert!(Phone::parse("").is_err());
    }

    #[test]
    fn test_display() {
        let phone = Phone::parse("202-555-0147").unwrap();
        assert_eq!(format!("{phone}"), "202-555-0147");
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = Phone::parse("+12025550147").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+12025550147\"");

        let parsed: Phone = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }
}
