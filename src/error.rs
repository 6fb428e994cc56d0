//! Error types for the bonding crate.
//!
//! Every distinct rejection is its own variant so callers can branch on the
//! kind of failure: authorization, registry precondition, or asset movement.

use thiserror::Error;

use crate::core::asset::AssetId;
use crate::utils::address::Address;

/// Result type alias for bonding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the bonding crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════════════
    // Registry Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Asset is already in the protected set
    #[error("Asset {0} is already protected")]
    AlreadyProtected(AssetId),

    /// Asset is not in the protected set
    #[error("Asset {0} is not protected")]
    NotProtected(AssetId),

    /// Sweep attempted on a protected asset
    #[error("Asset {0} is protected and cannot be swept")]
    AssetIsProtected(AssetId),

    // ═══════════════════════════════════════════════════════════════════
    // Transfer Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Underlying asset movement did not complete
    #[error("Transfer of {asset} failed: {reason}")]
    TransferFailed {
        /// Asset that failed to move
        asset: AssetId,
        /// Why the movement failed
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Authorization Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Caller is not the administrator
    #[error("Unauthorized: {caller} is not the administrator")]
    Unauthorized {
        /// The rejected caller
        caller: Address,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Invalid input parameter
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Amount is zero
    #[error("Amount cannot be zero")]
    ZeroAmount,

    /// Overflow in calculation
    #[error("Arithmetic overflow in {operation}")]
    Overflow {
        /// Operation that overflowed
        operation: String,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Serialization Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ═══════════════════════════════════════════════════════════════════
    // Internal Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Lock acquisition failed
    #[error("Failed to acquire lock")]
    Lock,

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Returns true for rejections of privileged calls by non-administrators
    pub fn is_authorization(&self) -> bool {
        matches!(self, Error::Unauthorized { .. })
    }

    /// Returns true if this error is a registry precondition failure
    pub fn is_registry_precondition(&self) -> bool {
        matches!(
            self,
            Error::AlreadyProtected(_) | Error::NotProtected(_) | Error::AssetIsProtected(_)
        )
    }

    /// Returns true if this is a critical error requiring immediate attention
    pub fn is_critical(&self) -> bool {
        matches!(self, Error::Overflow { .. } | Error::Lock | Error::Storage(_))
    }

    /// Returns the error code for external systems
    pub fn code(&self) -> u32 {
        match self {
            // Registry errors: 1xxx
            Error::AlreadyProtected(_) => 1001,
            Error::NotProtected(_) => 1002,
            Error::AssetIsProtected(_) => 1003,

            // Transfer errors: 2xxx
            Error::TransferFailed { .. } => 2001,

            // Authorization errors: 4xxx
            Error::Unauthorized { .. } => 4001,

            // Validation errors: 5xxx
            Error::InvalidParameter { .. } => 5001,
            Error::ZeroAmount => 5002,
            Error::Overflow { .. } => 5003,

            // Serialization errors: 7xxx
            Error::Serialization(_) => 7001,
            Error::Deserialization(_) => 7002,

            // Internal errors: 9xxx
            Error::Lock => 9002,
            Error::Storage(_) => 9003,
        }
    }
}
