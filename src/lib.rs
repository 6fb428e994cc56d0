//! # Bonding
//!
//! Custodial policy for a holding account that may receive stray funds.
//!
//! A single administrator controls:
//!
//! - **Service reference**: the address of an external streaming service,
//!   swappable at any time (zero disables it)
//! - **Protected assets**: assets the system depends on, which the sweep can
//!   never move
//! - **Dust sweep**: recovery of any other native currency or token balance
//!   from the holding account
//!
//! ## Example
//!
//! ```rust
//! use bonding::prelude::*;
//!
//! let treasury = Address::repeat_byte(0x01);
//! let holding = Address::repeat_byte(0x02);
//! let usdc = AssetId::Token(Address::repeat_byte(0x03));
//!
//! let mut bonding = Bonding::new(treasury, holding, Address::ZERO);
//! bonding.add_protected_asset(&treasury, usdc).unwrap();
//!
//! bonding.ledger_mut().deposit_native(holding, Amount::from_gwei(100)).unwrap();
//! bonding
//!     .send_dust(&treasury, AssetId::Native, treasury, Amount::from_gwei(100))
//!     .unwrap();
//!
//! assert!(bonding.send_dust(&treasury, usdc, treasury, Amount::new(1)).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    unused_lifetimes,
    unused_qualifications
)]

pub mod cli;
pub mod core;
pub mod error;
pub mod events;
pub mod storage;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        access::AccessGuard,
        amount::Amount,
        asset::AssetId,
        bonding::Bonding,
        ledger::{AssetLedger, InMemoryLedger},
        registry::{DustTransfer, ProtectedAssetRegistry},
        service::ServiceReference,
        shared::SharedBonding,
    };
    pub use crate::error::{Error, Result};
    pub use crate::events::{BondingEvent, EventLog};
    pub use crate::utils::{address::Address, crypto::Hash};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
