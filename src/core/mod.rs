//! Core custodial policy.
//!
//! - Asset identifiers and amounts
//! - Single-owner access control
//! - Service reference
//! - Protected asset registry and guarded sweep
//! - Ledger abstraction for moving assets
//! - The `Bonding` state object tying them together

pub mod access;
pub mod amount;
pub mod asset;
pub mod bonding;
pub mod ledger;
pub mod registry;
pub mod service;
pub mod shared;

pub use access::*;
pub use amount::*;
pub use asset::*;
pub use bonding::*;
pub use ledger::*;
pub use registry::*;
pub use service::*;
pub use shared::*;
