/// Memory addresses.
///
/// One wider than a [`Byte`]: the program counter legitimately reaches 256
/// right after a halt at the last cell.
pub type Address = u16;

/// The machine is 8-bit: every memory and register cell holds one byte.
pub type Byte = u8;

/// Total size of the machine memory
pub const MEMORY_SIZE: Address = 256;

/// Number of general-purpose registers
pub const REGISTER_COUNT: usize = 8;

/// Register reserved by convention for the stack pointer
pub const STACK_POINTER_REGISTER: usize = 7;

/// Initial value of the stack pointer register
pub const STACK_POINTER_INIT: Byte = 0xF4;
