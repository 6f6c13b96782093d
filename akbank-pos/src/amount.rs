//! Monetary amounts and the gateway currency table.
//!
//! The gateway expects every monetary field with exactly two fractional
//! digits, in the JSON body as well as in the 3-D Secure form. [`Amount`]
//! owns that rule: values are rounded half away from zero to two places when
//! constructed and always render with two decimals.
//!
//! ```
//! use akbank_pos::amount::{Amount, currency_code, currency_iso};
//!
//! let amount: Amount = "10.5".parse().unwrap();
//! assert_eq!(amount.to_string(), "10.50");
//! assert_eq!("10.005".parse::<Amount>().unwrap().to_string(), "10.01");
//!
//! assert_eq!(currency_code("USD"), 840);
//! assert_eq!(currency_iso(949), Some("TRY"));
//! ```

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use tracing::warn;

use crate::error::{PosError, Result};

/// Number of fractional digits the gateway expects.
pub const AMOUNT_SCALE: u32 = 2;

/// A monetary amount with exactly two fractional digits.
///
/// Serializes to a JSON string (`"10.50"`) and deserializes from either a
/// JSON string or a JSON number, since the gateway answers with numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates an amount, rounding half away from zero to two places.
    ///
    /// # Examples
    ///
    /// ```
    /// use akbank_pos::amount::Amount;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Amount::new(Decimal::new(10, 0)).to_string(), "10.00");
    /// assert_eq!(Amount::new(Decimal::new(12_345, 3)).to_string(), "12.35");
    /// ```
    #[must_use]
    pub fn new(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(AMOUNT_SCALE);
        Self(rounded)
    }

    /// Creates an amount from a floating point value.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::InvalidInput`] for NaN, infinities and values outside
    /// the decimal range.
    pub fn from_f64(value: f64) -> Result<Self> {
        Decimal::try_from(value)
            .map(Self::new)
            .map_err(|e| {
                PosError::InvalidInput(format!("amount {value} is not representable: {e}"))
            })
    }

    /// Returns the rounded decimal value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // scale is fixed by `new`, Decimal's Display keeps trailing zeros
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = PosError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Decimal::from_str(trimmed)
            .map(Self::new)
            .map_err(|e| PosError::InvalidInput(format!("amount '{trimmed}' is not a number: {e}")))
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::new(Decimal::ZERO)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Self::new(Decimal::from(value))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl de::Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as a number or a string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Amount, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Amount, E> {
        Amount::from_f64(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Amount, E> {
        Ok(Amount::new(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Amount, E> {
        Ok(Amount::new(Decimal::from(v)))
    }
}

/// Currencies the gateway accepts, with their numeric identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    /// Turkish lira (949). Also known by the legacy codes YTL, TRL and TL.
    Try,
    /// US dollar (840).
    Usd,
    /// Euro (978).
    Eur,
    /// Pound sterling (826).
    Gbp,
    /// Japanese yen (392).
    Jpy,
}

impl Currency {
    /// Returns the gateway's numeric currency identifier.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Try => 949,
            Self::Usd => 840,
            Self::Eur => 978,
            Self::Gbp => 826,
            Self::Jpy => 392,
        }
    }

    /// Returns the ISO 4217 alphabetic code.
    #[must_use]
    pub const fn iso(self) -> &'static str {
        match self {
            Self::Try => "TRY",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
        }
    }

    /// Resolves an alphabetic code, accepting the legacy lira aliases.
    #[must_use]
    pub fn from_iso(iso: &str) -> Option<Self> {
        match iso.trim() {
            "TRY" | "YTL" | "TRL" | "TL" => Some(Self::Try),
            "USD" => Some(Self::Usd),
            "EUR" => Some(Self::Eur),
            "GBP" => Some(Self::Gbp),
            "JPY" => Some(Self::Jpy),
            _ => None,
        }
    }

    /// Resolves a numeric identifier received from the gateway.
    #[must_use]
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            949 => Some(Self::Try),
            840 => Some(Self::Usd),
            978 => Some(Self::Eur),
            826 => Some(Self::Gbp),
            392 => Some(Self::Jpy),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iso())
    }
}

/// Maps an alphabetic currency code to the gateway's numeric identifier.
///
/// Unknown codes map to `0`. The request is still sent and the gateway
/// rejects it, which keeps a typo in a currency code from aborting request
/// construction.
#[must_use]
pub fn currency_code(iso: &str) -> u16 {
    Currency::from_iso(iso).map_or_else(
        || {
            warn!(currency = iso, "unknown currency code, sending 0");
            0
        },
        Currency::code,
    )
}

/// Maps a numeric currency identifier back to its alphabetic code.
#[must_use]
pub fn currency_iso(code: u16) -> Option<&'static str> {
    Currency::from_code(code).map(Currency::iso)
}
