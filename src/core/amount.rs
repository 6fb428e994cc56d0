//! Asset amounts.
//!
//! Amounts are always expressed in the asset's smallest indivisible unit
//! (wei for the native currency, base units for tokens).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::utils::constants::{WEI_PER_ETHER, WEI_PER_GWEI};

/// Strongly-typed amount in smallest units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u128);

// Encoded as a decimal string: 128-bit integers are not portable in JSON.
impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Amount {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Create from smallest units
    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    /// Create from gwei (native currency convenience)
    pub fn from_gwei(gwei: u64) -> Self {
        Self(gwei as u128 * WEI_PER_GWEI)
    }

    /// Create from whole native coins
    pub fn from_ether(ether: u64) -> Self {
        Self(ether as u128 * WEI_PER_ETHER)
    }

    /// Raw smallest-unit value
    pub fn units(&self) -> u128 {
        self.0
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Render with a decimal point, e.g. `format_units(18)` for wei.
    ///
    /// `u128` holds at most 38 decimal digits, so larger scales are rejected.
    pub fn format_units(&self, decimals: u8) -> Result<String> {
        let scale = 10u128
            .checked_pow(u32::from(decimals))
            .ok_or_else(|| Error::InvalidParameter {
                name: "decimals".into(),
                reason: format!("{} exceeds the u128 range", decimals),
            })?;
        let whole = self.0 / scale;
        let frac = self.0 % scale;
        if frac == 0 {
            return Ok(whole.to_string());
        }
        let frac = format!("{:0width$}", frac, width = decimals as usize);
        Ok(format!("{}.{}", whole, frac.trim_end_matches('0')))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .replace('_', "")
            .parse::<u128>()
            .map(Self)
            .map_err(|e| Error::InvalidParameter {
                name: "amount".into(),
                reason: e.to_string(),
            })
    }
}

impl From<u128> for Amount {
    fn from(units: u128) -> Self {
        Self(units)
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Self(units as u128)
    }
}

impl From<Amount> for u128 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}
