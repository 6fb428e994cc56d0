//! The bonding state object.
//!
//! [`Bonding`] owns the administrator, the service reference, the protected
//! asset registry, the ledger view of the holding account and the audit log.
//! Every entry point takes the caller explicitly; mutating ones check
//! authorization first, then their own preconditions, then commit and record
//! exactly one event. A failed call leaves every field untouched.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::core::access::AccessGuard;
use crate::core::amount::Amount;
use crate::core::asset::AssetId;
use crate::core::ledger::{AssetLedger, InMemoryLedger};
use crate::core::registry::{DustTransfer, ProtectedAssetRegistry};
use crate::core::service::ServiceReference;
use crate::error::{Error, Result};
use crate::events::{
    now_secs, AdministratorTransferredEvent, BondingEvent, DustSentEvent, EventLog,
    ProtectedAssetEvent, ServiceAddressChangedEvent,
};
use crate::utils::address::Address;
use crate::utils::crypto::Hash;

/// Custodial policy state for one holding account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonding<L = InMemoryLedger> {
    /// Account whose balances the sweep moves
    holding: Address,
    access: AccessGuard,
    service: ServiceReference,
    registry: ProtectedAssetRegistry,
    ledger: L,
    events: EventLog,
}

impl Bonding<InMemoryLedger> {
    /// Deploy with an empty in-memory ledger. `deployer` becomes administrator.
    pub fn new(deployer: Address, holding: Address, initial_service: Address) -> Self {
        Self::with_ledger(deployer, holding, initial_service, InMemoryLedger::new())
    }
}

impl<L: AssetLedger> Bonding<L> {
    /// Deploy on top of an existing ledger
    pub fn with_ledger(
        deployer: Address,
        holding: Address,
        initial_service: Address,
        ledger: L,
    ) -> Self {
        tracing::info!(
            administrator = %deployer,
            holding = %holding,
            service = %initial_service,
            "bonding initialized"
        );
        Self {
            holding,
            access: AccessGuard::new(deployer),
            service: ServiceReference::new(initial_service),
            registry: ProtectedAssetRegistry::new(),
            ledger,
            events: EventLog::new(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // QUERIES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Current administrator
    pub fn administrator(&self) -> Address {
        self.access.administrator()
    }

    /// Current service address
    pub fn service_address(&self) -> Address {
        self.service.address()
    }

    /// `false` when the service address is zero
    pub fn is_service_enabled(&self) -> bool {
        self.service.is_enabled()
    }

    /// Whether `asset` is protected from sweeping
    pub fn is_protected(&self, asset: &AssetId) -> bool {
        self.registry.is_protected(asset)
    }

    /// Protected assets in canonical order
    pub fn protected_assets(&self) -> Vec<AssetId> {
        self.registry.protected_assets()
    }

    /// Holding account address
    pub fn holding_address(&self) -> Address {
        self.holding
    }

    /// Holding account balance of `asset`
    pub fn holding_balance(&self, asset: &AssetId) -> Amount {
        self.ledger.balance_of(asset, &self.holding)
    }

    /// Read access to the ledger
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Write access to the ledger for deposits arriving from outside.
    ///
    /// Incoming funds are not governed by this policy; the sweep remains the
    /// only path out of the holding account that the policy controls.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Audit log
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ADMINISTRATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Hand administration to `new_administrator`
    pub fn transfer_administrator(
        &mut self,
        caller: &Address,
        new_administrator: Address,
    ) -> Result<()> {
        let previous = self.access.transfer_administrator(caller, new_administrator)?;

        tracing::info!(previous = %previous, current = %new_administrator, "administrator transferred");
        self.record(|sequence, timestamp| {
            BondingEvent::AdministratorTransferred(AdministratorTransferredEvent {
                previous,
                current: new_administrator,
                sequence,
                timestamp,
            })
        });
        Ok(())
    }

    /// Rewrite the service address. The zero address disables the service.
    pub fn set_service_address(&mut self, caller: &Address, address: Address) -> Result<()> {
        self.access.require_administrator(caller)?;
        let previous = self.service.replace(address);

        tracing::info!(previous = %previous, current = %address, "service address updated");
        self.record(|sequence, timestamp| {
            BondingEvent::ServiceAddressChanged(ServiceAddressChangedEvent {
                previous,
                current: address,
                sequence,
                timestamp,
            })
        });
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PROTECTED ASSETS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Add `asset` to the protected set
    pub fn add_protected_asset(&mut self, caller: &Address, asset: AssetId) -> Result<()> {
        self.access.require_administrator(caller)?;
        let asset = asset.normalized();
        self.registry.add(asset)?;

        tracing::info!(asset = %asset, "asset protected");
        self.record(|sequence, timestamp| {
            BondingEvent::ProtectedAssetAdded(ProtectedAssetEvent {
                asset,
                sequence,
                timestamp,
            })
        });
        Ok(())
    }

    /// Remove `asset` from the protected set
    pub fn remove_protected_asset(&mut self, caller: &Address, asset: AssetId) -> Result<()> {
        self.access.require_administrator(caller)?;
        let asset = asset.normalized();
        self.registry.remove(&asset)?;

        tracing::info!(asset = %asset, "asset unprotected");
        self.record(|sequence, timestamp| {
            BondingEvent::ProtectedAssetRemoved(ProtectedAssetEvent {
                asset,
                sequence,
                timestamp,
            })
        });
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SWEEP
    // ═══════════════════════════════════════════════════════════════════════════

    /// Send `amount` of an unprotected `asset` from the holding account to `destination`
    pub fn send_dust(
        &mut self,
        caller: &Address,
        asset: AssetId,
        destination: Address,
        amount: Amount,
    ) -> Result<DustTransfer> {
        self.access.require_administrator(caller)?;
        let asset = asset.normalized();

        let request = DustTransfer::new(asset, destination, amount);
        if let Err(e) = self.registry.send_dust(&mut self.ledger, &self.holding, &request) {
            if matches!(e, Error::AssetIsProtected(_)) {
                tracing::warn!(asset = %asset, "sweep of protected asset refused");
            }
            return Err(e);
        }

        tracing::info!(asset = %asset, destination = %destination, amount = %amount, "dust sent");
        self.record(|sequence, timestamp| {
            BondingEvent::DustSent(DustSentEvent {
                asset,
                destination,
                amount,
                sequence,
                timestamp,
            })
        });
        Ok(request)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE
    // ═══════════════════════════════════════════════════════════════════════════

    /// Hash of the policy state: administrator, service address and protected set
    pub fn state_hash(&self) -> Hash {
        let mut data = Vec::new();
        data.extend_from_slice(self.holding.as_bytes());
        data.extend_from_slice(self.access.administrator().as_bytes());
        data.extend_from_slice(self.service.address().as_bytes());
        for asset in self.registry.protected_assets() {
            match asset {
                AssetId::Native => data.push(0),
                AssetId::Token(token) => {
                    data.push(1);
                    data.extend_from_slice(token.as_bytes());
                }
            }
        }
        Hash::sha256(&data)
    }

    fn record<F>(&mut self, build: F)
    where
        F: FnOnce(u64, u64) -> BondingEvent,
    {
        let event = build(self.events.next_sequence(), now_secs());
        self.events.push(event);
    }
}

impl<L> Bonding<L>
where
    L: AssetLedger + Serialize + DeserializeOwned,
{
    /// Serialize to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Hash over the full encoding: policy, ledger and audit log
    pub fn content_hash(&self) -> Result<Hash> {
        Ok(Hash::sha256(&self.to_bytes()?))
    }
}
