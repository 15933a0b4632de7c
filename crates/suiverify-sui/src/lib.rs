//! Sui, Seal and Walrus implementations of the SuiVerify adapters.
pub mod allowlist;
pub mod attest;
pub mod config;
pub mod context;
#[cfg(test)]
pub(crate) mod data;
pub mod identity;
pub mod rpc;
pub mod seal;
pub mod transaction;
pub mod walrus;

pub use config::{SuiConfig, SuiSettings};
pub use context::SuiContext;
pub use identity::{RoleIdentities, SigningIdentity};

/// Default shared clock object on Sui.
pub const SUI_CLOCK_OBJECT_ID: &str = "0x6";

/// Service identifier recorded in encryption attestations.
pub const SEAL_SERVICE_ID: &str = "seal";
