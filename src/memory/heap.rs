//! Heap implementation for the pointer walk
//!
//! This module provides heap memory management with:
//! - Explicit allocation/deallocation (malloc/free)
//! - Tombstone tracking for freed blocks (enables reverse execution)
//! - Per-byte initialization tracking
//! - Use-after-free, double-free and out-of-bounds detection
//! - Leak listing for blocks still live at exit
//!
//! # Error Handling
//!
//! Methods return [`HeapError`]. The driver wraps these into
//! `RuntimeError::Memory` together with the step that triggered them.

use super::value::{Address, Value};
use super::INT_SIZE;
use crate::driver::constants::{DEFAULT_HEAP_LIMIT, HEAP_ADDRESS_START};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors raised by the heap
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("out of memory: requested {requested} bytes, {allocated} already allocated, limit is {limit}")]
    OutOfMemory {
        requested: usize,
        allocated: usize,
        limit: usize,
    },

    #[error("null pointer dereference")]
    NullDereference,

    #[error("address 0x{address:x} ({len} bytes) is outside every allocated block")]
    OutOfBounds { address: Address, len: usize },

    #[error("use-after-free: address 0x{0:x} has been freed")]
    UseAfterFree(Address),

    #[error("double free detected at address 0x{0:x}")]
    DoubleFree(Address),

    #[error("invalid free: address 0x{0:x} is not the start of an allocation")]
    InvalidFree(Address),
}

/// State of a heap block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    Allocated,
    Tombstone, // Freed but kept for reverse execution
}

/// A block of heap memory
#[derive(Debug, Clone)]
pub struct HeapBlock {
    pub data: Vec<u8>, // Raw bytes
    pub size: usize,
    pub state: BlockState,
    pub init_map: Vec<bool>, // Per-byte initialization tracking
}

impl HeapBlock {
    pub fn new(size: usize) -> Self {
        HeapBlock {
            data: vec![0; size],
            size,
            state: BlockState::Allocated,
            init_map: vec![false; size],
        }
    }

    /// Check if a byte range is initialized
    pub fn is_initialized(&self, offset: usize, size: usize) -> bool {
        if offset + size > self.size {
            return false;
        }
        self.init_map[offset..offset + size].iter().all(|&b| b)
    }

    /// Read bytes from the block
    pub fn read_bytes(&self, offset: usize, size: usize) -> Option<&[u8]> {
        if offset + size <= self.size {
            Some(&self.data[offset..offset + size])
        } else {
            None
        }
    }

    /// Write bytes to the block and mark them initialized
    fn write_bytes(&mut self, offset: usize, bytes: &[u8]) {
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self.init_map[offset..offset + bytes.len()].fill(true);
    }
}

/// A block that was still allocated when the program finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeakedBlock {
    pub address: Address,
    pub size: usize,
}

/// The heap
#[derive(Debug, Clone)]
pub struct Heap {
    allocations: FxHashMap<Address, HeapBlock>,
    next_address: Address,
    live_bytes: usize,
    max_heap_size: usize,
}

impl Heap {
    /// Create a new heap with a maximum size limit
    pub fn new(max_heap_size: usize) -> Self {
        Heap {
            allocations: FxHashMap::default(),
            next_address: HEAP_ADDRESS_START,
            live_bytes: 0,
            max_heap_size,
        }
    }

    /// Allocate a block of memory. Contents start uninitialized.
    pub fn allocate(&mut self, size: usize) -> Result<Address, HeapError> {
        let fits = self
            .live_bytes
            .checked_add(size)
            .is_some_and(|total| total <= self.max_heap_size);
        if !fits {
            return Err(HeapError::OutOfMemory {
                requested: size,
                allocated: self.live_bytes,
                limit: self.max_heap_size,
            });
        }

        let addr = self.next_address;
        self.next_address += size as u64;
        self.allocations.insert(addr, HeapBlock::new(size));
        self.live_bytes += size;

        Ok(addr)
    }

    /// Free a block of memory (mark as tombstone). Freeing NULL is a no-op.
    pub fn free(&mut self, addr: Address) -> Result<(), HeapError> {
        if addr == 0 {
            return Ok(());
        }
        match self.allocations.get_mut(&addr) {
            Some(block) if block.state == BlockState::Allocated => {
                block.state = BlockState::Tombstone;
                self.live_bytes -= block.size;
                Ok(())
            }
            Some(_) => Err(HeapError::DoubleFree(addr)),
            None => Err(HeapError::InvalidFree(addr)),
        }
    }

    /// Find the live block holding `len` bytes at `addr`.
    /// Returns the block base and the offset of `addr` inside it.
    fn locate(&self, addr: Address, len: usize) -> Result<(Address, usize), HeapError> {
        if addr == 0 {
            return Err(HeapError::NullDereference);
        }

        let (&base, block) = self
            .allocations
            .iter()
            .find(|&(&base, block)| addr >= base && addr < base + block.size as u64)
            .ok_or(HeapError::OutOfBounds { address: addr, len })?;

        if block.state == BlockState::Tombstone {
            return Err(HeapError::UseAfterFree(addr));
        }

        let offset = (addr - base) as usize;
        if offset + len > block.size {
            return Err(HeapError::OutOfBounds { address: addr, len });
        }
        Ok((base, offset))
    }

    /// Write an `int` at an address
    pub fn write_int(&mut self, addr: Address, value: i32) -> Result<(), HeapError> {
        let (base, offset) = self.locate(addr, INT_SIZE)?;
        let block = self
            .allocations
            .get_mut(&base)
            .ok_or(HeapError::OutOfBounds {
                address: addr,
                len: INT_SIZE,
            })?;
        block.write_bytes(offset, &value.to_le_bytes());
        Ok(())
    }

    /// Read an `int` at an address.
    /// Yields [`Value::Uninitialized`] if any of its bytes was never written.
    pub fn read_int(&self, addr: Address) -> Result<Value, HeapError> {
        let (base, offset) = self.locate(addr, INT_SIZE)?;
        let block = &self.allocations[&base];
        if !block.is_initialized(offset, INT_SIZE) {
            return Ok(Value::Uninitialized);
        }
        Ok(Value::Int(Self::decode_int(block, offset)))
    }

    /// Read the backing bytes of an `int` whether or not they were written
    pub fn peek_int(&self, addr: Address) -> Result<i32, HeapError> {
        let (base, offset) = self.locate(addr, INT_SIZE)?;
        Ok(Self::decode_int(&self.allocations[&base], offset))
    }

    fn decode_int(block: &HeapBlock, offset: usize) -> i32 {
        let mut bytes = [0u8; INT_SIZE];
        bytes.copy_from_slice(&block.data[offset..offset + INT_SIZE]);
        i32::from_le_bytes(bytes)
    }

    /// Get all allocations (for UI display, includes tombstones)
    pub fn allocations(&self) -> &FxHashMap<Address, HeapBlock> {
        &self.allocations
    }

    /// Live blocks sorted by address
    pub fn live_blocks(&self) -> Vec<(Address, &HeapBlock)> {
        let mut blocks: Vec<_> = self
            .allocations
            .iter()
            .filter(|(_, block)| block.state == BlockState::Allocated)
            .map(|(&addr, block)| (addr, block))
            .collect();
        blocks.sort_by_key(|(addr, _)| *addr);
        blocks
    }

    /// Blocks that were allocated and never freed
    pub fn leaks(&self) -> Vec<LeakedBlock> {
        self.live_blocks()
            .into_iter()
            .map(|(address, block)| LeakedBlock {
                address,
                size: block.size,
            })
            .collect()
    }

    /// Bytes currently allocated (tombstones excluded)
    pub fn total_allocated(&self) -> usize {
        self.live_bytes
    }

    /// Get max heap size
    pub fn max_size(&self) -> usize {
        self.max_heap_size
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(DEFAULT_HEAP_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_starts_uninitialized() {
        let mut heap = Heap::default();
        let addr = heap.allocate(8).unwrap();
        assert_eq!(addr, HEAP_ADDRESS_START);
        assert_eq!(heap.read_int(addr), Ok(Value::Uninitialized));
        assert_eq!(heap.peek_int(addr), Ok(0));
    }

    #[test]
    fn allocations_do_not_overlap() {
        let mut heap = Heap::default();
        let a = heap.allocate(400).unwrap();
        let b = heap.allocate(4).unwrap();
        assert_eq!(b, a + 400);
        assert_eq!(heap.total_allocated(), 404);
    }

    #[test]
    fn write_then_read_int() {
        let mut heap = Heap::default();
        let addr = heap.allocate(8).unwrap();
        heap.write_int(addr + 4, -42).unwrap();
        assert_eq!(heap.read_int(addr + 4), Ok(Value::Int(-42)));
        assert_eq!(heap.read_int(addr), Ok(Value::Uninitialized));
    }

    #[test]
    fn partially_written_int_is_uninitialized() {
        let mut heap = Heap::default();
        let addr = heap.allocate(8).unwrap();
        heap.write_int(addr, 7).unwrap();
        // Straddles the written int and the untouched one
        assert_eq!(heap.read_int(addr + 2), Ok(Value::Uninitialized));
    }

    #[test]
    fn out_of_bounds_access_is_detected() {
        let mut heap = Heap::default();
        let addr = heap.allocate(4).unwrap();
        assert_eq!(
            heap.read_int(addr + 4),
            Err(HeapError::OutOfBounds {
                address: addr + 4,
                len: INT_SIZE
            })
        );
        assert_eq!(
            heap.write_int(addr + 2, 1),
            Err(HeapError::OutOfBounds {
                address: addr + 2,
                len: INT_SIZE
            })
        );
    }

    #[test]
    fn null_access_is_detected() {
        let mut heap = Heap::default();
        assert_eq!(heap.write_int(0, 1), Err(HeapError::NullDereference));
        assert_eq!(heap.read_int(0), Err(HeapError::NullDereference));
    }

    #[test]
    fn out_of_memory() {
        let mut heap = Heap::new(16);
        heap.allocate(12).unwrap();
        assert_eq!(
            heap.allocate(8),
            Err(HeapError::OutOfMemory {
                requested: 8,
                allocated: 12,
                limit: 16
            })
        );
    }

    #[test]
    fn huge_request_is_out_of_memory() {
        let mut heap = Heap::default();
        heap.allocate(1).unwrap();
        assert!(matches!(
            heap.allocate(usize::MAX),
            Err(HeapError::OutOfMemory {
                requested: usize::MAX,
                allocated: 1,
                ..
            })
        ));
    }

    #[test]
    fn free_releases_budget_and_leaves_tombstone() {
        let mut heap = Heap::new(16);
        let addr = heap.allocate(16).unwrap();
        heap.free(addr).unwrap();
        assert_eq!(heap.total_allocated(), 0);
        assert_eq!(heap.allocations()[&addr].state, BlockState::Tombstone);
        assert!(heap.allocate(16).is_ok());
    }

    #[test]
    fn double_and_invalid_free() {
        let mut heap = Heap::default();
        let addr = heap.allocate(8).unwrap();
        assert_eq!(heap.free(addr + 4), Err(HeapError::InvalidFree(addr + 4)));
        heap.free(addr).unwrap();
        assert_eq!(heap.free(addr), Err(HeapError::DoubleFree(addr)));
        assert_eq!(heap.free(0), Ok(()));
    }

    #[test]
    fn use_after_free() {
        let mut heap = Heap::default();
        let addr = heap.allocate(8).unwrap();
        heap.write_int(addr, 5).unwrap();
        heap.free(addr).unwrap();
        assert_eq!(heap.read_int(addr + 4), Err(HeapError::UseAfterFree(addr + 4)));
        assert_eq!(heap.write_int(addr, 1), Err(HeapError::UseAfterFree(addr)));
    }

    #[test]
    fn leaks_lists_live_blocks_in_address_order() {
        let mut heap = Heap::default();
        let a = heap.allocate(400).unwrap();
        let b = heap.allocate(4).unwrap();
        let c = heap.allocate(4).unwrap();
        heap.free(b).unwrap();
        assert_eq!(
            heap.leaks(),
            vec![
                LeakedBlock { address: a, size: 400 },
                LeakedBlock { address: c, size: 4 },
            ]
        );
    }
}
