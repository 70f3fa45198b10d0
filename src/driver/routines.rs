//! The two helper routines the driver calls
//!
//! - [`modifier`]: writes a value derived from the loop index through a pointer
//! - [`foo`]: allocates one int, stores the scalar constant, hands the pointer back
//!
//! Both work on the simulated [`Heap`], so a NULL or dangling pointer comes
//! back as a [`HeapError`] instead of corrupting anything.

use super::constants::MUTATOR_SCALE;
use crate::memory::heap::{Heap, HeapError};
use crate::memory::value::Address;
use crate::memory::INT_SIZE;

/// Value the mutator stores for a loop index
pub fn mutated_value(index: u32) -> i32 {
    (index as i32).wrapping_mul(MUTATOR_SCALE)
}

/// Write `mutated_value(index)` into the int at `target`
pub fn modifier(heap: &mut Heap, target: Address, index: u32) -> Result<(), HeapError> {
    heap.write_int(target, mutated_value(index))
}

/// Allocate a single int holding `value`. The caller owns the block.
pub fn foo(heap: &mut Heap, value: i32) -> Result<Address, HeapError> {
    let addr = heap.allocate(INT_SIZE)?;
    heap.write_int(addr, value)?;
    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::value::Value;

    #[test]
    fn modifier_writes_scaled_index() {
        let mut heap = Heap::default();
        let addr = heap.allocate(INT_SIZE).unwrap();
        modifier(&mut heap, addr, 7).unwrap();
        assert_eq!(heap.read_int(addr), Ok(Value::Int(70)));
    }

    #[test]
    fn modifier_rejects_null() {
        let mut heap = Heap::default();
        assert_eq!(modifier(&mut heap, 0, 1), Err(HeapError::NullDereference));
    }

    #[test]
    fn foo_returns_owned_initialized_int() {
        let mut heap = Heap::default();
        let addr = foo(&mut heap, 123).unwrap();
        assert_eq!(heap.read_int(addr), Ok(Value::Int(123)));
        assert_eq!(heap.allocations()[&addr].size, INT_SIZE);
    }

    #[test]
    fn foo_reports_exhausted_heap() {
        let mut heap = Heap::new(2);
        assert!(matches!(
            foo(&mut heap, 123),
            Err(HeapError::OutOfMemory { requested: 4, .. })
        ));
    }

    #[test]
    fn mutated_value_wraps() {
        assert_eq!(mutated_value(1), 10);
        assert_eq!(mutated_value(u32::MAX), (-1i32).wrapping_mul(10));
    }
}
