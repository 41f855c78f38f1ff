//! Buddy allocation of subnets.
//!
//! The parent network is split once into blocks of the coarsest requested
//! size. Requests of that size take blocks from the front of the free queue
//! in declaration order, then every free block is split in two and the next
//! finer size is served, until no request is left pending.
//!
//! Since blocks only ever leave the queue from the front and the queue is
//! always split as a whole, the free blocks form one contiguous suffix of
//! the parent. [`FreeQueue`] stores that suffix instead of the blocks
//! themselves and hands blocks out on demand.

use super::block::{AddressBlock, Family};
use super::error::AllocationError;
use super::request::AllocationRequest;
use std::collections::BTreeMap;

/// FIFO of free blocks that all share one prefix length (the tier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeQueue {
    family: Family,
    tier: u8,
    /// Base of the block at the front, `None` once the queue is drained
    front: Option<u128>,
    /// Last address covered by the queue
    last: u128,
}

impl FreeQueue {
    /// Queue holding `parent` split into `/tier` blocks in address order.
    ///
    /// `tier` is clamped to the range the parent allows.
    pub fn new(parent: &AddressBlock, tier: u8) -> Self {
        Self {
            family: parent.family(),
            tier: tier.clamp(parent.prefix_len(), parent.width()),
            front: Some(parent.base()),
            last: parent.last(),
        }
    }

    pub fn tier(&self) -> u8 {
        self.tier
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_none()
    }

    /// Block at the front of the queue, without removing it
    pub fn peek(&self) -> Option<AddressBlock> {
        self.front
            .and_then(|base| AddressBlock::aligned(self.family, base, self.tier))
    }

    pub fn pop_front(&mut self) -> Option<AddressBlock> {
        let block = self.peek()?;
        let block_last = block.last();
        self.front = if block_last >= self.last {
            None
        } else {
            Some(block_last + 1)
        };
        Some(block)
    }

    /// Replace every block with its two buddies one prefix length finer.
    ///
    /// Returns `false` when the tier is already a single address.
    pub fn split(&mut self) -> bool {
        if self.tier >= self.family.width() {
            return false;
        }
        self.tier += 1;
        true
    }

    /// First and last address still covered by the queue
    pub fn remaining_range(&self) -> Option<(u128, u128)> {
        self.front.map(|front| (front, self.last))
    }

    pub fn family(&self) -> Family {
        self.family
    }
}

/// Assigns blocks of one parent network to allocation requests.
#[derive(Debug)]
pub struct BuddyAllocator {
    parent: AddressBlock,
    queue: FreeQueue,
}

impl BuddyAllocator {
    /// Start with the parent split at the coarsest size any request needs.
    pub fn new(parent: AddressBlock, requests: &[AllocationRequest]) -> Self {
        let coarsest = requests
            .iter()
            .map(AllocationRequest::prefix_len)
            .min()
            .unwrap_or_else(|| parent.prefix_len());
        log::debug!("Splitting {} into /{} blocks", parent, coarsest);

        Self {
            queue: FreeQueue::new(&parent, coarsest),
            parent,
        }
    }

    /// Assign a block to every pending request.
    ///
    /// Within a tier, requests are served in the order given, each taking
    /// the lowest free block. A request finer than the current tier waits
    /// for the queue to be split down to its size.
    pub fn assign_all(&mut self, requests: &mut [AllocationRequest]) -> Result<(), AllocationError> {
        let mut by_tier: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
        for (index, request) in requests.iter().enumerate().filter(|(_, r)| r.is_pending()) {
            by_tier.entry(request.prefix_len()).or_default().push(index);
        }
        let mut pending: usize = by_tier.values().map(Vec::len).sum();

        if let Some((&coarsest_needed, _)) = by_tier.iter().next() {
            if coarsest_needed < self.queue.tier() {
                return Err(self.fragmentation(coarsest_needed, pending));
            }
        }

        while pending > 0 {
            let tier = self.queue.tier();

            for index in by_tier.remove(&tier).unwrap_or_default() {
                let block = match self.queue.pop_front() {
                    Some(block) => block,
                    None => return Err(self.fragmentation(tier, pending)),
                };
                log::debug!("Assigned {} to {}", block, requests[index].label());
                requests[index].assign(block);
                pending -= 1;
            }

            if pending == 0 {
                break;
            }
            if self.queue.is_empty() || !self.queue.split() {
                return Err(self.fragmentation(tier, pending));
            }
        }

        Ok(())
    }

    /// Consume the allocator, leaving the blocks nobody asked for.
    pub fn into_free_queue(self) -> FreeQueue {
        self.queue
    }

    fn fragmentation(&self, tier: u8, pending: usize) -> AllocationError {
        AllocationError::FragmentationFailure {
            network: self.parent.to_string(),
            tier,
            pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(literal: &str) -> AddressBlock {
        AddressBlock::parse(literal).unwrap()
    }

    fn blocks(mut queue: FreeQueue) -> Vec<String> {
        std::iter::from_fn(|| queue.pop_front())
            .map(|b| b.to_string())
            .collect()
    }

    #[test]
    fn test_queue_enumerates_in_address_order() {
        let queue = FreeQueue::new(&block("10.0.0.0/24"), 26);
        assert_eq!(queue.peek(), Some(block("10.0.0.0/26")));
        assert_eq!(
            blocks(queue),
            vec!["10.0.0.0/26", "10.0.0.64/26", "10.0.0.128/26", "10.0.0.192/26"]
        );
    }

    #[test]
    fn test_queue_split_keeps_order() {
        let mut queue = FreeQueue::new(&block("10.0.0.0/24"), 25);
        assert_eq!(queue.pop_front(), Some(block("10.0.0.0/25")));
        assert!(queue.split());
        assert_eq!(queue.tier(), 26);
        assert_eq!(blocks(queue), vec!["10.0.0.128/26", "10.0.0.192/26"]);
    }

    #[test]
    fn test_queue_bottoms_out_at_single_address() {
        let mut queue = FreeQueue::new(&block("10.0.0.0/31"), 32);
        assert!(!queue.split());
        assert_eq!(queue.pop_front(), Some(block("10.0.0.0/32")));
        assert_eq!(queue.pop_front(), Some(block("10.0.0.1/32")));
        assert_eq!(queue.pop_front(), None);
        assert!(queue.is_empty());
        assert_eq!(queue.peek(), None);
        assert_eq!(queue.remaining_range(), None);
    }

    #[test]
    fn test_queue_covers_whole_ipv6_space() {
        let mut queue = FreeQueue::new(&block("::/0"), 0);
        assert_eq!(queue.peek(), Some(block("::/0")));
        assert!(queue.split());
        assert_eq!(queue.pop_front(), Some(block("::/1")));
        assert_eq!(queue.pop_front(), Some(block("8000::/1")));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_declaration_order_within_tier() {
        let parent = block("10.0.0.0/24");
        let mut requests = vec![
            AllocationRequest::new("small", 28),
            AllocationRequest::new("a-1", 26),
            AllocationRequest::new("a-2", 26),
        ];
        let mut allocator = BuddyAllocator::new(parent, &requests);
        allocator.assign_all(&mut requests).unwrap();

        assert_eq!(requests[1].block(), Some(block("10.0.0.0/26")));
        assert_eq!(requests[2].block(), Some(block("10.0.0.64/26")));
        assert_eq!(requests[0].block(), Some(block("10.0.0.128/28")));

        let rest = allocator.into_free_queue();
        assert_eq!(rest.tier(), 28);
        assert_eq!(rest.remaining_range(), Some((0x0a00_0090, 0x0a00_00ff)));
    }

    #[test]
    fn test_no_requests_leaves_parent_free() {
        let parent = block("192.168.0.0/16");
        let mut requests = Vec::new();
        let mut allocator = BuddyAllocator::new(parent, &requests);
        allocator.assign_all(&mut requests).unwrap();
        assert_eq!(blocks(allocator.into_free_queue()), vec!["192.168.0.0/16"]);
    }

    #[test]
    fn test_exhausted_queue_is_a_fragmentation_failure() {
        let parent = block("10.0.0.0/30");
        let mut requests = vec![
            AllocationRequest::new("a", 31),
            AllocationRequest::new("b", 31),
            AllocationRequest::new("c", 32),
        ];
        let mut allocator = BuddyAllocator::new(parent, &requests);
        let err = allocator.assign_all(&mut requests).unwrap_err();
        assert_eq!(
            err,
            AllocationError::FragmentationFailure {
                network: "10.0.0.0/30".to_string(),
                tier: 31,
                pending: 1,
            }
        );
    }

    #[test]
    fn test_too_many_requests_at_one_tier() {
        let parent = block("10.0.0.0/30");
        let mut requests: Vec<_> = (1..=3)
            .map(|i| AllocationRequest::new(format!("p-{}", i), 31))
            .collect();
        let mut allocator = BuddyAllocator::new(parent, &requests);
        assert!(matches!(
            allocator.assign_all(&mut requests),
            Err(AllocationError::FragmentationFailure { tier: 31, pending: 1, .. })
        ));
    }

    #[test]
    fn test_large_ipv6_split_is_lazy() {
        let parent = block("2001:db8::/32");
        let mut requests = vec![
            AllocationRequest::new("site", 48),
            AllocationRequest::new("lan", 64),
        ];
        let mut allocator = BuddyAllocator::new(parent, &requests);
        allocator.assign_all(&mut requests).unwrap();

        assert_eq!(requests[0].block(), Some(block("2001:db8::/48")));
        assert_eq!(requests[1].block(), Some(block("2001:db8:1::/64")));

        let rest = allocator.into_free_queue();
        assert_eq!(rest.tier(), 64);
        assert_eq!(rest.peek(), Some(block("2001:db8:1:1::/64")));
        assert_eq!(rest.remaining_range(), Some((block("2001:db8:1:1::/64").base(), parent.last())));
    }
}
