// Constants for the pointer walk

/// Starting address for heap allocations
/// Heap addresses start at 0x10000000 so they are never mistaken for NULL
pub const HEAP_ADDRESS_START: u64 = 0x1000_0000;

/// Default heap size limit: 10 MB
pub const DEFAULT_HEAP_LIMIT: usize = 10 * 1024 * 1024;

/// Default snapshot history limit: 64 MB
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 64 * 1024 * 1024;

/// Number of ints in the buffer
pub const BUFFER_LEN: usize = 100;

/// Number of mutate/advance iterations
pub const ITERATIONS: u32 = 10;

/// Value the allocator routine stores in the scalar
pub const SCALAR_VALUE: i32 = 123;

/// The mutator writes `index * MUTATOR_SCALE`
pub const MUTATOR_SCALE: i32 = 10;
