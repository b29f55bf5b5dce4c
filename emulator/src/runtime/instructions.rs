use parse_display::Display;
use thiserror::Error;
use tracing::debug;

use crate::constants::{Address, Byte};

use super::{Machine, ProcessorError};

/// Raw opcode byte values.
///
/// Instruction layout is `AABCDDDD`: the `AA` bits carry the operand count,
/// `B` flags ALU instructions, `DDDD` is the instruction identifier.
pub(crate) mod opcodes {
    use crate::constants::Byte;

    pub const HLT: Byte = 0b0000_0001;
    pub const LDI: Byte = 0b1000_0010;
    pub const PRN: Byte = 0b0100_0111;
    pub const MUL: Byte = 0b1010_0010;
}

/// Number of operand bytes encoded in the top two bits of an opcode.
///
/// Defined for every byte, decodable or not: the program counter advances by
/// `1 + operand_count` even over invalid instructions.
pub(crate) fn operand_count(opcode: Byte) -> Address {
    Address::from((opcode >> 6) & 0b11)
}

/// Total width of an instruction in bytes: the opcode plus its operands.
pub(crate) fn width_of(opcode: Byte) -> Address {
    1 + operand_count(opcode)
}

/// The opcode byte did not decode to any known instruction
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid instruction {opcode:#010b}")]
pub struct DecodeError {
    pub opcode: Byte,
}

/// Operations supported by the ALU.
///
/// One shared tag for both the decode stage and the ALU itself; dispatch is
/// exhaustive, so there is no "unsupported operation" failure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(style = "lowercase")]
pub enum AluOp {
    Add,
    Mul,
}

/// A decoded LS-8 instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Instruction {
    /// Stop the machine
    #[display("hlt")]
    Halt,

    /// Load an immediate value into a register
    #[display("ldi  %r{0}, {1}")]
    Ldi(Byte, Byte),

    /// Print a register value as a decimal integer
    #[display("prn  %r{0}")]
    Prn(Byte),

    /// Multiply two registers, storing into the first
    #[display("mul  %r{0}, %r{1}")]
    Mul(Byte, Byte),
}

impl Instruction {
    /// Decode an instruction from its opcode and operand bytes.
    ///
    /// # Errors
    ///
    /// It fails if the opcode byte is not a documented instruction.
    pub fn decode(opcode: Byte, operand_a: Byte, operand_b: Byte) -> Result<Self, DecodeError> {
        match opcode {
            opcodes::HLT => Ok(Self::Halt),
            opcodes::LDI => Ok(Self::Ldi(operand_a, operand_b)),
            opcodes::PRN => Ok(Self::Prn(operand_a)),
            opcodes::MUL => Ok(Self::Mul(operand_a, operand_b)),
            opcode => Err(DecodeError { opcode }),
        }
    }

    /// Total width of the instruction in bytes
    pub(crate) fn width(self) -> Address {
        match self {
            Self::Halt => 1,
            Self::Prn(_) => 2,
            Self::Ldi(_, _) | Self::Mul(_, _) => 3,
        }
    }

    /// Execute the instruction
    pub(crate) fn execute(self, machine: &mut Machine) -> Result<(), ProcessorError> {
        match self {
            Self::Halt => {
                debug!("halting");
                machine.halted = true;
            }

            Self::Ldi(reg, value) => {
                machine.set_register(reg, value)?;
            }

            Self::Prn(reg) => {
                let value = machine.register(reg)?;
                machine.print(value)?;
            }

            Self::Mul(reg_a, reg_b) => {
                machine.alu(AluOp::Mul, reg_a, reg_b)?;
            }
        }

        Ok(())
    }
}
