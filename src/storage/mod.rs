//! Persistence for bonding state.
//!
//! The policy itself is an in-memory object; the CLI keeps it between
//! invocations as a versioned JSON snapshot.
//!
//! ```rust,ignore
//! use bonding::storage::StateFile;
//!
//! let file = StateFile::new("/var/lib/bonding/bonding-state.json");
//! let mut bonding = file.load()?;
//! bonding.set_service_address(&admin, new_service)?;
//! file.save(&bonding)?;
//! ```

pub mod state_file;

pub use state_file::*;
