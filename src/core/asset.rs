//! Asset identifiers.
//!
//! An asset is either the chain's native currency or a token contract.
//! The native currency is conventionally addressed by the sentinel
//! `0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE`. Parsing that address yields
//! [`AssetId::Native`], and every registry and ledger entry point passes its
//! input through [`AssetId::normalized`], so a `Token` carrying the sentinel is
//! treated as `Native` everywhere.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::utils::address::Address;
use crate::utils::constants::{NATIVE_ASSET_SENTINEL, NATIVE_ASSET_SENTINEL_STR};

/// Identifier of a sweepable or protectable asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetId {
    /// The chain's base currency
    Native,
    /// A token contract
    Token(Address),
}

impl AssetId {
    /// Interpret an address as an asset, mapping the sentinel to `Native`
    pub fn from_address(address: Address) -> Self {
        if address.as_bytes() == &NATIVE_ASSET_SENTINEL {
            AssetId::Native
        } else {
            AssetId::Token(address)
        }
    }

    /// Collapse a `Token` holding the native sentinel into `Native`
    pub fn normalized(self) -> Self {
        match self {
            AssetId::Token(address) => AssetId::from_address(address),
            AssetId::Native => AssetId::Native,
        }
    }

    /// Address form of this asset (the sentinel for `Native`)
    pub fn to_address(&self) -> Address {
        match self {
            AssetId::Native => Address::new(NATIVE_ASSET_SENTINEL),
            AssetId::Token(address) => *address,
        }
    }

    /// Check if this is the native currency
    pub fn is_native(&self) -> bool {
        matches!(self, AssetId::Native)
    }

    /// Canonical string form used in serialized state
    pub fn to_canonical(&self) -> String {
        match self {
            AssetId::Native => NATIVE_ASSET_SENTINEL_STR.to_string(),
            AssetId::Token(address) => address.to_hex(),
        }
    }
}

impl From<Address> for AssetId {
    fn from(address: Address) -> Self {
        Self::from_address(address)
    }
}

impl FromStr for AssetId {
    type Err = Error;

    /// Accepts `native`/`eth`, the sentinel address, or any token address
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "eth" => Ok(AssetId::Native),
            _ => Address::from_hex(s).map(AssetId::from_address),
        }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetId::Native => write!(f, "native"),
            AssetId::Token(address) => write!(f, "token {}", address),
        }
    }
}

impl Serialize for AssetId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_canonical())
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
