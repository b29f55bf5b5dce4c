use thiserror::Error;

use crate::constants::{Address, Byte, MEMORY_SIZE};
use crate::parser::Program;

/// Represents errors related to memory manipulations
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// The given address was out of bounds
    #[error("invalid address {0}")]
    InvalidAddress(Address),

    /// The program image does not fit in memory
    #[error("program of {0} bytes does not fit in memory")]
    ProgramTooLarge(usize),
}

/// Holds the memory cells of the machine.
///
/// It has 256 byte-sized cells, all zeroed at construction.
pub struct Memory {
    inner: Box<[Byte; MEMORY_SIZE as usize]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            inner: Box::new([0; MEMORY_SIZE as usize]),
        }
    }
}

impl Memory {
    /// Get the byte at an address
    ///
    /// # Errors
    ///
    /// It fails if the address is out of bounds.
    pub fn get(&self, address: Address) -> Result<Byte, MemoryError> {
        self.inner
            .get(usize::from(address))
            .copied()
            .ok_or(MemoryError::InvalidAddress(address))
    }

    /// Set the byte at an address
    ///
    /// # Errors
    ///
    /// It fails if the address is out of bounds.
    pub fn set(&mut self, address: Address, value: Byte) -> Result<(), MemoryError> {
        let cell = self
            .inner
            .get_mut(usize::from(address))
            .ok_or(MemoryError::InvalidAddress(address))?;
        *cell = value;
        Ok(())
    }

    /// Write a program image into memory, one byte per cell from address 0.
    ///
    /// # Errors
    ///
    /// It fails if the program is bigger than the memory.
    pub fn load(&mut self, program: &Program) -> Result<(), MemoryError> {
        if program.len() > self.inner.len() {
            return Err(MemoryError::ProgramTooLarge(program.len()));
        }

        self.inner[..program.len()].copy_from_slice(program.bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn get_set_test() {
        let mut memory = Memory::default();
        assert_eq!(memory.get(0), Ok(0));
        assert_eq!(memory.get(255), Ok(0));
        assert_eq!(memory.get(256), Err(MemoryError::InvalidAddress(256)));

        memory.set(42, 0xF4).unwrap();
        assert_eq!(memory.get(42), Ok(0xF4));
        assert_eq!(
            memory.set(256, 0),
            Err(MemoryError::InvalidAddress(256))
        );
    }

    #[test]
    fn load_test() {
        let mut memory = Memory::default();
        let program = Program::from(vec![0b1000_0010, 0, 42]);
        memory.load(&program).unwrap();

        assert_eq!(memory.get(0), Ok(0b1000_0010));
        assert_eq!(memory.get(1), Ok(0));
        assert_eq!(memory.get(2), Ok(42));
        assert_eq!(memory.get(3), Ok(0)); // Rest of memory untouched
    }

    #[test]
    fn load_too_large_test() {
        let mut memory = Memory::default();
        let program = Program::from(vec![0; 257]);
        assert_eq!(
            memory.load(&program),
            Err(MemoryError::ProgramTooLarge(257))
        );
    }
}
