//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored remotely as plain JSON numbers: whole amounts as
//! integers, fractional amounts through `rust_decimal`'s float adapter.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price {0:?}: expected a decimal number")]
    Invalid(String),
    /// The input is a negative number.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A monetary amount in the store currency's standard unit.
///
/// ## Examples
///
/// ```
/// use storefront_settings_core::Price;
///
/// let price: Price = "300".parse().unwrap();
/// assert_eq!(price, Price::from_units(300));
/// assert!("-1".parse::<Price>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display in the given currency (e.g., "Rs. 5000").
    #[must_use]
    pub fn display(&self, currency: Currency) -> String {
        format!("{} {}", currency.symbol, self.0.normalize())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Whole amounts stay integers on the wire: `300`, not `300.0`.
        match self.0.normalize().to_i64() {
            Some(units) if self.0.fract().is_zero() => serializer.serialize_i64(units),
            _ => rust_decimal::serde::float::serialize(&self.0, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Self)
    }
}

/// Display information for a currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency {
    /// ISO 4217 currency code.
    pub code: &'static str,
    /// Symbol shown in front of amounts.
    pub symbol: &'static str,
}

/// The currency every storefront price is expressed in.
pub const STORE_CURRENCY: Currency = Currency {
    code: "PKR",
    symbol: "Rs.",
};
