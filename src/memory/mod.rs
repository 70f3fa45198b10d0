//! Memory model for the pointer walk
//!
//! This module provides the core memory abstractions:
//! - [`value`]: Runtime value representation (Int, Pointer, Null, Uninitialized)
//! - [`heap`]: Heap allocation with malloc/free, tombstone tracking and leak listing
//!
//! # Type Sizes
//!
//! The simulation uses fixed, platform-independent sizes:
//! - `int`: 4 bytes, little-endian
//! - `pointer`: 8 bytes
//!
//! # Pointer Arithmetic
//!
//! Pointer arithmetic is scaled by pointee size:
//! ```text
//! ptr + n  →  ptr + (n * sizeof(*ptr))
//! ```
//!
//! [`pointer_add`] and [`pointer_diff`] handle this scaling.

pub mod heap;
pub mod value;

use value::Address;

/// Size of a simulated `int` in bytes
pub const INT_SIZE: usize = 4;

/// Size of a simulated pointer in bytes
pub const POINTER_SIZE: usize = 8;

/// Perform pointer arithmetic: addr + offset (scaled by pointee size)
pub fn pointer_add(addr: Address, offset: i64, pointee_size: usize) -> Address {
    let byte_offset = offset * pointee_size as i64;
    (addr as i64 + byte_offset) as Address
}

/// Calculate the difference between two pointers (in elements, not bytes)
pub fn pointer_diff(addr1: Address, addr2: Address, pointee_size: usize) -> i64 {
    (addr1 as i64 - addr2 as i64) / pointee_size as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_add_scales_by_element_size() {
        assert_eq!(pointer_add(0x1000_0000, 1, INT_SIZE), 0x1000_0004);
        assert_eq!(pointer_add(0x1000_0000, 10, INT_SIZE), 0x1000_0028);
        assert_eq!(pointer_add(0x1000_0028, -10, INT_SIZE), 0x1000_0000);
    }

    #[test]
    fn pointer_diff_counts_elements() {
        assert_eq!(pointer_diff(0x1000_0028, 0x1000_0000, INT_SIZE), 10);
        assert_eq!(pointer_diff(0x1000_0000, 0x1000_0028, INT_SIZE), -10);
    }
}
