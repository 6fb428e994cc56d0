//! Bonding Command Line Interface support.
//!
//! Configuration and output formatting shared by the `bonding` binary.

pub mod config;
pub mod output;

pub use config::*;
pub use output::*;
