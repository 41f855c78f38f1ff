//! Coalescing of leftover blocks into minimal CIDR form.

use super::allocator::FreeQueue;
use super::block::AddressBlock;

/// Coalesced form of whatever is left in an allocator's free queue.
///
/// The queue's blocks are merged with their buddies back up the split
/// tree, lowest address first. A block only absorbs its buddy when it is
/// the lower half and the upper half is still queued, so every merge
/// undoes one split and the result is the smallest set of CIDR blocks
/// covering the same addresses, in ascending order.
pub fn remainder(queue: &FreeQueue) -> Vec<AddressBlock> {
    let mut blocks = Vec::new();
    let Some((mut front, last)) = queue.remaining_range() else {
        return blocks;
    };

    while let Some(mut block) = AddressBlock::aligned(queue.family(), front, queue.tier()) {
        while let Some(parent) = block.supernet() {
            if parent.base() != block.base() || parent.last() > last {
                break;
            }
            block = parent;
        }
        blocks.push(block);

        if block.last() >= last {
            break;
        }
        front = block.last() + 1;
    }

    blocks
}
