//! Protected asset registry and guarded dust sweeping.
//!
//! Assets in the protected set are the ones the system depends on; the sweep
//! refuses to move them regardless of amount or destination. Everything else
//! held by the holding account is dust and may be sent out by the administrator.
//!
//! Membership per asset:
//!
//! ```text
//! Unprotected --add-------> Protected
//! Protected   --remove----> Unprotected
//! Unprotected --send_dust-> Unprotected (balance decreases)
//! Protected   --send_dust-> rejected (AssetIsProtected, no state change)
//! ```
//!
//! The set is a `BTreeSet`: O(log n) insert, remove and lookup, no size cap,
//! and a deterministic iteration order for listings and state hashes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::amount::Amount;
use crate::core::asset::AssetId;
use crate::core::ledger::AssetLedger;
use crate::error::{Error, Result};
use crate::utils::address::Address;

// ═══════════════════════════════════════════════════════════════════════════════
// DUST TRANSFER
// ═══════════════════════════════════════════════════════════════════════════════

/// A sweep request, evaluated against the registry at call time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DustTransfer {
    /// Asset to move
    pub asset: AssetId,
    /// Recipient; not validated beyond shape, zero is allowed
    pub destination: Address,
    /// Amount in smallest units
    pub amount: Amount,
}

impl DustTransfer {
    /// Create a new request
    pub fn new(asset: AssetId, destination: Address, amount: Amount) -> Self {
        Self {
            asset,
            destination,
            amount,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// Set of assets that can never be swept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedAssetRegistry {
    protected: BTreeSet<AssetId>,
}

impl ProtectedAssetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Membership query
    pub fn is_protected(&self, asset: &AssetId) -> bool {
        self.protected.contains(&asset.normalized())
    }

    /// Protected assets in canonical order
    pub fn protected_assets(&self) -> Vec<AssetId> {
        self.protected.iter().copied().collect()
    }

    /// Number of protected assets
    pub fn len(&self) -> usize {
        self.protected.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.protected.is_empty()
    }

    pub(crate) fn add(&mut self, asset: AssetId) -> Result<()> {
        let asset = asset.normalized();
        if !self.protected.insert(asset) {
            return Err(Error::AlreadyProtected(asset));
        }
        Ok(())
    }

    pub(crate) fn remove(&mut self, asset: &AssetId) -> Result<()> {
        let asset = asset.normalized();
        if !self.protected.remove(&asset) {
            return Err(Error::NotProtected(asset));
        }
        Ok(())
    }

    /// Move dust out of `holding`.
    ///
    /// The membership check runs before the ledger is touched. Authorization
    /// is enforced by the caller (`Bonding::send_dust`).
    pub(crate) fn send_dust<L>(
        &self,
        ledger: &mut L,
        holding: &Address,
        request: &DustTransfer,
    ) -> Result<()>
    where
        L: AssetLedger + ?Sized,
    {
        let asset = request.asset.normalized();
        if self.is_protected(&asset) {
            return Err(Error::AssetIsProtected(asset));
        }
        if request.amount.is_zero() {
            return Err(Error::ZeroAmount);
        }
        ledger.transfer(&asset, holding, &request.destination, request.amount)
    }
}
