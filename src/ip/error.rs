//! Errors raised while carving a parent network into subnets.

use super::capacity::AddressCount;

/// Reasons a network's allocation is refused.
///
/// Every variant is detected before any output is produced for the
/// network, so a failed network never yields a partial allocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("Invalid network '{literal}': {reason}")]
    InvalidNetwork { literal: String, reason: String },

    #[error("Cannot create a /{size} network for '{subnet}' from {network} (allowed sizes are /{min} to /{max})")]
    SizeExceedsAddressSpace {
        subnet: String,
        size: u32,
        network: String,
        min: u8,
        max: u8,
    },

    #[error("Can't fit subnets into network. Tried to fit {requested} addresses into {network} ({available} addresses)")]
    InsufficientAddressSpace {
        network: String,
        requested: AddressCount,
        available: AddressCount,
    },

    #[error("Ran out of /{tier} blocks in {network} with {pending} subnet(s) still unassigned")]
    FragmentationFailure {
        network: String,
        tier: u8,
        pending: usize,
    },

    #[error("Subnet label '{label}' is used more than once in {network}")]
    DuplicateLabel { label: String, network: String },
}
