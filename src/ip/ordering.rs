//! Presentation order for completed allocations.
//!
//! Allocation serves requests by size and declaration order; output is
//! listed by address instead, each entry numbered from 1.

use super::block::{AddressBlock, Family};
use super::request::AllocationRequest;

/// A completed allocation with its presentation ordinal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedAllocation {
    pub ordinal: usize,
    pub label: String,
    pub block: AddressBlock,
}

/// Sort key placing blocks in ascending address order.
pub fn by_base_address(block: &AddressBlock) -> (Family, u128) {
    (block.family(), block.base())
}

/// Order assigned requests by block address and number them from 1.
///
/// Requests that are still pending are skipped.
pub fn order_allocations(requests: &[AllocationRequest]) -> Vec<OrderedAllocation> {
    let mut assigned: Vec<(&str, AddressBlock)> = requests
        .iter()
        .filter_map(|r| r.block().map(|block| (r.label(), block)))
        .collect();
    assigned.sort_by_key(|(_, block)| by_base_address(block));

    assigned
        .into_iter()
        .enumerate()
        .map(|(i, (label, block))| OrderedAllocation {
            ordinal: i + 1,
            label: label.to_string(),
            block,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_follow_address_order() {
        let mut late = AllocationRequest::new("late", 26);
        late.assign(AddressBlock::parse("10.0.0.192/26").unwrap());
        let mut early = AllocationRequest::new("early", 28);
        early.assign(AddressBlock::parse("10.0.0.0/28").unwrap());
        let pending = AllocationRequest::new("pending", 30);

        let ordered = order_allocations(&[late, pending, early]);
        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[0].ordinal, 1);
        assert_eq!(ordered[0].label, "early");
        assert_eq!(ordered[1].ordinal, 2);
        assert_eq!(ordered[1].label, "late");
    }

    #[test]
    fn test_empty_input() {
        assert!(order_allocations(&[]).is_empty());
    }
}
