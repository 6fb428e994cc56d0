//! Utility modules shared across the crate.
//!
//! - Constants
//! - Address type
//! - Hashing primitives

pub mod address;
pub mod constants;
pub mod crypto;

pub use address::*;
pub use constants::*;
pub use crypto::*;
