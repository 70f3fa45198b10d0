//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents the values the
//! driver holds in its locals and reads back out of the heap. Unlike raw
//! memory, values are tagged.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 32-bit signed integer
//! - [`Value::Pointer`]: 64-bit heap address
//! - [`Value::Null`]: Null pointer (address 0)
//! - [`Value::Uninitialized`]: Marker for uninitialized memory
//!
//! # Initialization Tracking
//!
//! The `Uninitialized` variant lets a read from never-written memory be
//! observed instead of silently producing garbage.

use std::fmt;

/// Runtime values in the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Value {
    Int(i32),
    Pointer(Address),
    Null,
    #[default]
    Uninitialized, // Special marker for uninitialized memory
}

/// Memory address type (64-bit)
pub type Address = u64;

impl Value {
    /// Get the pointer value, returns None if not a Pointer or Null
    pub fn as_pointer(&self) -> Option<Address> {
        match self {
            Value::Pointer(addr) => Some(*addr),
            Value::Null => Some(0),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Pointer(addr) => write!(f, "0x{:08x}", addr),
            Value::Null => write!(f, "NULL"),
            Value::Uninitialized => write!(f, "<uninit>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_reads_as_address_zero() {
        assert_eq!(Value::Null.as_pointer(), Some(0));
        assert_eq!(Value::Pointer(0x1000_0000).as_pointer(), Some(0x1000_0000));
        assert_eq!(Value::Int(3).as_pointer(), None);
    }

    #[test]
    fn uninitialized_is_the_default() {
        let v = Value::default();
        assert_eq!(v, Value::Uninitialized);
        assert_eq!(v.as_pointer(), None);
        assert_eq!(v.to_string(), "<uninit>");
    }

    #[test]
    fn display_formats_pointers_as_hex() {
        assert_eq!(Value::Pointer(0x1000_0190).to_string(), "0x10000190");
        assert_eq!(Value::Int(-7).to_string(), "-7");
    }
}
