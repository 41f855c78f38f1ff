//! Expansion of subnet specifications into individual allocation requests.
//!
//! Every concrete subnet gets its own [`AllocationRequest`] with a unique
//! label. The order requests are emitted in is the tie-break the allocator
//! uses between requests of the same size.

use super::block::AddressBlock;
use super::error::AllocationError;
use crate::config::SubnetSpec;
use std::collections::HashSet;

/// Assignment state of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Pending,
    Assigned(AddressBlock),
}

/// A request for one block of a given prefix length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRequest {
    label: String,
    prefix_len: u8,
    state: RequestState,
}

impl AllocationRequest {
    pub fn new(label: impl Into<String>, prefix_len: u8) -> Self {
        Self {
            label: label.into(),
            prefix_len,
            state: RequestState::Pending,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, RequestState::Pending)
    }

    /// The assigned block, if any
    pub fn block(&self) -> Option<AddressBlock> {
        match self.state {
            RequestState::Assigned(block) => Some(block),
            RequestState::Pending => None,
        }
    }

    pub(crate) fn assign(&mut self, block: AddressBlock) {
        debug_assert!(self.is_pending(), "request {} assigned twice", self.label);
        debug_assert_eq!(block.prefix_len(), self.prefix_len);
        self.state = RequestState::Assigned(block);
    }
}

/// Check that a subnet's size can be carved out of `parent`.
///
/// The size must be no coarser than the parent itself and no finer than a
/// single address.
pub fn validate_size(parent: &AddressBlock, subnet: &SubnetSpec) -> Result<u8, AllocationError> {
    let min = parent.prefix_len();
    let max = parent.width();

    if subnet.size < u32::from(min) || subnet.size > u32::from(max) {
        return Err(AllocationError::SizeExceedsAddressSpace {
            subnet: subnet.name.clone(),
            size: subnet.size,
            network: parent.to_string(),
            min,
            max,
        });
    }

    Ok(subnet.size as u8)
}

/// Labels a specification expands to, in emission order
fn labels_for(subnet: &SubnetSpec) -> Vec<String> {
    match subnet.number {
        0 => Vec::new(),
        1 => vec![subnet.name.clone()],
        number if subnet.per_row > 1 => (1..=number)
            .flat_map(|i| (1..=subnet.per_row).map(move |j| format!("{}-{}-{}", subnet.name, i, j)))
            .collect(),
        number => (1..=number).map(|i| format!("{}-{}", subnet.name, i)).collect(),
    }
}

/// Expand subnet specifications into one request per concrete subnet.
///
/// Specifications with `number == 0` are dropped. Output order follows the
/// declaration order, then the item index, then the row index.
pub fn expand_requests(
    parent: &AddressBlock,
    subnets: &[SubnetSpec],
) -> Result<Vec<AllocationRequest>, AllocationError> {
    let mut requests = Vec::new();
    let mut seen = HashSet::new();

    for subnet in subnets.iter().filter(|s| s.number > 0) {
        let prefix_len = validate_size(parent, subnet)?;

        for label in labels_for(subnet) {
            if !seen.insert(label.clone()) {
                return Err(AllocationError::DuplicateLabel {
                    label,
                    network: parent.to_string(),
                });
            }
            requests.push(AllocationRequest::new(label, prefix_len));
        }
    }

    log::debug!("Expanded {} subnet entries into {} requests for {}", subnets.len(), requests.len(), parent);
    Ok(requests)
}
