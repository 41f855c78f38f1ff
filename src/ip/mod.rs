//! Subnet allocation engine.
//!
//! This module carves a parent network into the subnets a network
//! description asks for: requests are expanded, checked against the
//! parent's capacity, assigned by buddy splitting, and whatever is left
//! over is coalesced back into minimal CIDR form.

pub mod allocator;
pub mod block;
pub mod capacity;
pub mod coalesce;
pub mod error;
pub mod ordering;
pub mod request;

// Re-export commonly used types
pub use allocator::{BuddyAllocator, FreeQueue};
pub use block::{AddressBlock, Family};
pub use capacity::{AddressCount, CapacityReport};
pub use error::AllocationError;
pub use ordering::{by_base_address, order_allocations, OrderedAllocation};
pub use request::{expand_requests, AllocationRequest, RequestState};
