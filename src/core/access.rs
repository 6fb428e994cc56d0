//! Single-owner access control.
//!
//! Exactly one administrator exists at any time. Every mutating entry point
//! calls [`AccessGuard::require_administrator`] before touching state.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::address::Address;

/// Holds the identity of the sole administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGuard {
    administrator: Address,
}

impl AccessGuard {
    /// Create a guard owned by `administrator`
    pub fn new(administrator: Address) -> Self {
        Self { administrator }
    }

    /// Current administrator
    pub fn administrator(&self) -> Address {
        self.administrator
    }

    /// Check whether `caller` is the administrator
    pub fn is_administrator(&self, caller: &Address) -> bool {
        *caller == self.administrator
    }

    /// Fail with `Unauthorized` unless `caller` is the administrator
    pub fn require_administrator(&self, caller: &Address) -> Result<()> {
        if self.is_administrator(caller) {
            Ok(())
        } else {
            tracing::warn!(caller = %caller.short(), "rejected privileged call");
            Err(Error::Unauthorized { caller: *caller })
        }
    }

    /// Hand administration to `new_administrator`. Returns the previous one.
    pub fn transfer_administrator(
        &mut self,
        caller: &Address,
        new_administrator: Address,
    ) -> Result<Address> {
        self.require_administrator(caller)?;
        let previous = std::mem::replace(&mut self.administrator, new_administrator);
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_administrator_query() {
        let admin = Address::repeat_byte(1);
        let guard = AccessGuard::new(admin);
        assert_eq!(guard.administrator(), admin);
        assert!(guard.is_administrator(&admin));
        assert!(!guard.is_administrator(&Address::repeat_byte(2)));
    }

    #[test]
    fn test_require_administrator() {
        let admin = Address::repeat_byte(1);
        let other = Address::repeat_byte(2);
        let guard = AccessGuard::new(admin);

        assert!(guard.require_administrator(&admin).is_ok());
        assert_eq!(
            guard.require_administrator(&other),
            Err(Error::Unauthorized { caller: other })
        );
    }

    #[test]
    fn test_transfer_administrator() {
        let alice = Address::repeat_byte(1);
        let bob = Address::repeat_byte(2);
        let mut guard = AccessGuard::new(alice);

        let previous = guard.transfer_administrator(&alice, bob).unwrap();
        assert_eq!(previous, alice);
        assert_eq!(guard.administrator(), bob);
        assert!(guard.require_administrator(&alice).is_err());
        assert!(guard.require_administrator(&bob).is_ok());
    }

    #[test]
    fn test_non_admin_cannot_transfer() {
        let alice = Address::repeat_byte(1);
        let mallory = Address::repeat_byte(9);
        let mut guard = AccessGuard::new(alice);

        let result = guard.transfer_administrator(&mallory, mallory);
        assert!(matches!(result, Err(Error::Unauthorized { .. })));
        assert_eq!(guard.administrator(), alice);
    }
}
