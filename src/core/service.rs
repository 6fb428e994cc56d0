//! External service reference.
//!
//! A single address pointing at the downstream streaming service. The zero
//! address means no service is active. The value is opaque to this crate.

use serde::{Deserialize, Serialize};

use crate::utils::address::Address;

/// Owner-configurable endpoint reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceReference {
    address: Address,
}

impl ServiceReference {
    /// Create with the initial address
    pub fn new(initial: Address) -> Self {
        Self { address: initial }
    }

    /// Last-written address (or the initial one)
    pub fn address(&self) -> Address {
        self.address
    }

    /// `false` when the reference has been set to the zero address
    pub fn is_enabled(&self) -> bool {
        !self.address.is_zero()
    }

    /// Overwrite unconditionally, returning the previous value.
    ///
    /// Authorization is the caller's responsibility; see `Bonding::set_service_address`.
    pub(crate) fn replace(&mut self, address: Address) -> Address {
        std::mem::replace(&mut self.address, address)
    }
}
