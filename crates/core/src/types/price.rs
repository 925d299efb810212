//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as `NUMERIC(10,2)` in Postgres and travel as decimal
//! strings in JSON (`"19.99"`), so no float rounding ever reaches a price.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a decimal number")]
    Unparseable,
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// More than two decimal places.
    #[error("price cannot have more than two decimal places")]
    TooPrecise,
    /// Above [`Price::MAX`].
    #[error("price cannot exceed 99999999.99")]
    TooLarge,
}

/// A non-negative amount in the store currency.
///
/// ```
/// use shopwright_core::Price;
///
/// let price = Price::parse("19.99").unwrap();
/// assert_eq!(price.to_string(), "$19.99");
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest price a `NUMERIC(10,2)` column holds.
    pub const MAX: Self = Self(Decimal::from_parts(1_410_065_407, 2, 0, false, 2));

    /// Parse a price from user input such as `"19.99"` or `" 5 "`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Unparseable`] if the input is not a decimal and
    /// [`PriceError::Negative`] if it is below zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Unparseable)?;
        Self::try_from(amount)
    }

    /// Build a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Add two prices, `None` on decimal overflow.
    ///
    /// Sums are not bounded by [`Price::MAX`]; a cart total may exceed what
    /// a single product can cost.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(amount))
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::try_from(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_keeps_scale() {
        let price = Price::parse(" 19.99 ").unwrap();
        assert_eq!(price.amount(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_parse_rejects_garbage_and_negative() {
        assert_eq!(Price::parse("nineteen"), Err(PriceError::Unparseable));
        assert_eq!(Price::parse(""), Err(PriceError::Unparseable));
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
        assert!(Price::parse("0").is_ok());
    }

    #[test]
    fn test_parse_enforces_column_range() {
        assert_eq!(Price::MAX.amount(), Decimal::new(9_999_999_999, 2));
        assert_eq!(Price::parse("99999999.99"), Ok(Price::MAX));
        assert_eq!(Price::parse("100000000"), Err(PriceError::TooLarge));
        assert_eq!(
            Price::parse("79228162514264337593543950335"),
            Err(PriceError::TooLarge)
        );
        assert_eq!(Price::parse("19.999"), Err(PriceError::TooPrecise));
        assert_eq!(Price::parse("19.990").unwrap(), Price::from_cents(1999));
    }

    #[test]
    fn test_checked_add_can_exceed_max() {
        let sum = Price::MAX.checked_add(Price::from_cents(1)).unwrap();
        assert_eq!(sum.amount(), Decimal::new(10_000_000_000, 2));
    }

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Price::parse("5").unwrap().to_string(), "$5.00");
        assert_eq!(Price::from_cents(1999).to_string(), "$19.99");
    }

    #[test]
    fn test_deserialize_accepts_string_and_number() {
        let from_str: Price = serde_json::from_str("\"25\"").unwrap();
        let from_num: Price = serde_json::from_str("25").unwrap();
        assert_eq!(from_str, from_num);
        assert!(serde_json::from_str::<Price>("\"-3\"").is_err());
        assert!(serde_json::from_str::<Price>("\"1.005\"").is_err());
    }

    #[test]
    fn test_serializes_as_decimal_string() {
        let json = serde_json::to_string(&Price::from_cents(1999)).unwrap();
        assert_eq!(json, "\"19.99\"");
    }
}
