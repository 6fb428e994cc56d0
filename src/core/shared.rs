//! Thread-safe handle over a [`Bonding`] instance.
//!
//! Each operation holds the lock for its whole duration, so the authorization
//! check, the precondition checks and the effects of one call are never
//! interleaved with another call. Operations are applied in lock-acquisition
//! order.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::amount::Amount;
use crate::core::asset::AssetId;
use crate::core::bonding::Bonding;
use crate::core::ledger::{AssetLedger, InMemoryLedger};
use crate::core::registry::DustTransfer;
use crate::error::{Error, Result};
use crate::utils::address::Address;

/// Cloneable, shareable handle to a bonding instance
#[derive(Debug)]
pub struct SharedBonding<L = InMemoryLedger> {
    inner: Arc<RwLock<Bonding<L>>>,
}

impl<L> Clone for SharedBonding<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: AssetLedger> SharedBonding<L> {
    /// Wrap an existing instance
    pub fn new(bonding: Bonding<L>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(bonding)),
        }
    }

    /// Shared read access
    pub fn read(&self) -> Result<RwLockReadGuard<'_, Bonding<L>>> {
        self.inner.read().map_err(|_| Error::Lock)
    }

    /// Exclusive write access
    pub fn write(&self) -> Result<RwLockWriteGuard<'_, Bonding<L>>> {
        self.inner.write().map_err(|_| Error::Lock)
    }

    /// Current administrator
    pub fn administrator(&self) -> Result<Address> {
        Ok(self.read()?.administrator())
    }

    /// Current service address
    pub fn service_address(&self) -> Result<Address> {
        Ok(self.read()?.service_address())
    }

    /// Membership query
    pub fn is_protected(&self, asset: &AssetId) -> Result<bool> {
        Ok(self.read()?.is_protected(asset))
    }

    /// See [`Bonding::set_service_address`]
    pub fn set_service_address(&self, caller: &Address, address: Address) -> Result<()> {
        self.write()?.set_service_address(caller, address)
    }

    /// See [`Bonding::add_protected_asset`]
    pub fn add_protected_asset(&self, caller: &Address, asset: AssetId) -> Result<()> {
        self.write()?.add_protected_asset(caller, asset)
    }

    /// See [`Bonding::remove_protected_asset`]
    pub fn remove_protected_asset(&self, caller: &Address, asset: AssetId) -> Result<()> {
        self.write()?.remove_protected_asset(caller, asset)
    }

    /// See [`Bonding::send_dust`]
    pub fn send_dust(
        &self,
        caller: &Address,
        asset: AssetId,
        destination: Address,
        amount: Amount,
    ) -> Result<DustTransfer> {
        self.write()?.send_dust(caller, asset, destination, amount)
    }

    /// See [`Bonding::transfer_administrator`]
    pub fn transfer_administrator(&self, caller: &Address, new_administrator: Address) -> Result<()> {
        self.write()?.transfer_administrator(caller, new_administrator)
    }
}

impl<L: AssetLedger> From<Bonding<L>> for SharedBonding<L> {
    fn from(bonding: Bonding<L>) -> Self {
        Self::new(bonding)
    }
}
