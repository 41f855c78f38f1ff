//! Aggregate address demand check.
//!
//! Runs before any splitting: a request set that needs more addresses than
//! the parent holds is refused outright. Passing this check is necessary but
//! not sufficient; the allocator still reports a tiling failure on its own.

use super::block::AddressBlock;
use super::error::AllocationError;
use super::request::validate_size;
use crate::config::SubnetSpec;
use std::fmt;

/// Exact number of addresses.
///
/// Counts are kept in two `u128` words since the whole IPv6 space, and
/// demand beyond it, does not fit in one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddressCount {
    high: u128,
    low: u128,
}

impl AddressCount {
    /// `count` blocks of `2^host_bits` addresses each
    pub fn blocks(count: u128, host_bits: u32) -> Self {
        match host_bits {
            0 => Self::from(count),
            bits if bits >= 128 => Self { high: count, low: 0 },
            bits => Self {
                high: count >> (128 - bits),
                low: count << bits,
            },
        }
    }

    fn saturating_add(self, other: Self) -> Self {
        let (low, carry) = self.low.overflowing_add(other.low);
        Self {
            high: self.high.saturating_add(other.high).saturating_add(u128::from(carry)),
            low,
        }
    }
}

impl From<u128> for AddressCount {
    fn from(low: u128) -> Self {
        Self { high: 0, low }
    }
}

impl fmt::Display for AddressCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.high, self.low) {
            (0, low) => write!(f, "{}", low),
            (1, 0) => write!(f, "2^128"),
            _ => write!(f, "more than 2^128"),
        }
    }
}

/// Outcome of a successful capacity check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityReport {
    pub requested: AddressCount,
    pub available: AddressCount,
}

/// Addresses one specification asks for: block size × number × per-row.
///
/// `per-row` counts even when `number == 1`, although such an entry only
/// produces a single subnet.
fn demand(parent: &AddressBlock, subnet: &SubnetSpec) -> Result<AddressCount, AllocationError> {
    if subnet.number == 0 {
        return Ok(AddressCount::default());
    }
    let size = validate_size(parent, subnet)?;
    let count = u128::from(subnet.number) * u128::from(subnet.per_row);

    Ok(AddressCount::blocks(count, u32::from(parent.width() - size)))
}

/// Refuse the request set if its total demand exceeds the parent's size.
pub fn check(parent: &AddressBlock, subnets: &[SubnetSpec]) -> Result<CapacityReport, AllocationError> {
    let mut requested = AddressCount::default();
    for subnet in subnets {
        requested = requested.saturating_add(demand(parent, subnet)?);
    }
    let available = AddressCount::blocks(1, parent.host_bits());

    if requested > available {
        return Err(AllocationError::InsufficientAddressSpace {
            network: parent.to_string(),
            requested,
            available,
        });
    }

    log::debug!("{} addresses requested out of {} available in {}", requested, available, parent);
    Ok(CapacityReport { requested, available })
}
