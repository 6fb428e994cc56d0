//! Protocol constants.
//!
//! All crate-wide constants are defined here for easy auditing.

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Address length in bytes (EVM-style 160-bit address)
pub const ADDRESS_LENGTH: usize = 20;

/// Hash length in bytes (SHA256)
pub const HASH_LENGTH: usize = 32;

/// Distinguished address used to denote the chain's native currency
/// wherever an asset identifier is expected
pub const NATIVE_ASSET_SENTINEL: [u8; ADDRESS_LENGTH] = [0xEE; ADDRESS_LENGTH];

/// Checksummed textual form of the native currency sentinel
pub const NATIVE_ASSET_SENTINEL_STR: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

// ═══════════════════════════════════════════════════════════════════════════════
// NATIVE CURRENCY CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Native currency decimals (wei)
pub const NATIVE_DECIMALS: u8 = 18;

/// Smallest units per gwei
pub const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Smallest units per whole native coin
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

// ═══════════════════════════════════════════════════════════════════════════════
// EVENT LOG CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum audit events retained in memory before the oldest are pruned
pub const MAX_EVENTS: usize = 1000;

// ═══════════════════════════════════════════════════════════════════════════════
// STORAGE CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Current on-disk state format version
pub const STATE_FORMAT_VERSION: u32 = 1;

/// Default state file name inside the data directory
pub const STATE_FILE_NAME: &str = "bonding-state.json";

/// Default configuration file name inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.json";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_string_matches_bytes() {
        let decoded = hex::decode(&NATIVE_ASSET_SENTINEL_STR[2..]).unwrap();
        assert_eq!(decoded.as_slice(), &NATIVE_ASSET_SENTINEL[..]);
    }

    #[test]
    fn test_unit_ratios() {
        assert_eq!(WEI_PER_ETHER / WEI_PER_GWEI, 1_000_000_000);
        assert_eq!(10u128.pow(NATIVE_DECIMALS as u32), WEI_PER_ETHER);
    }
}
