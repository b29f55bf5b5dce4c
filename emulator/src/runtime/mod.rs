use std::io::Write;

use thiserror::Error;
use tracing::debug;

use crate::constants::{Address, Byte};
use crate::parser::Program;

mod instructions;
mod memory;
mod registers;

pub use self::instructions::{AluOp, DecodeError, Instruction};
pub use self::memory::{Memory, MemoryError};
pub use self::registers::{RegisterError, Registers};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("invalid instruction {opcode:#010b} at address {address}")]
    InvalidInstruction { opcode: Byte, address: Address },

    #[error("memory fault: {0}")]
    Memory(#[from] MemoryError),

    #[error("register fault: {0}")]
    Register(#[from] RegisterError),

    #[error("output fault: {0:?}")]
    Output(std::io::ErrorKind),
}

type Result<T> = std::result::Result<T, ProcessorError>;

/// The LS-8 machine: memory, register file, program counter and halt flag.
///
/// Lifecycle is construct, [`load`][Machine::load] a program, [`run`][Machine::run]
/// it to completion, then inspect the final state.
pub struct Machine {
    pub registers: Registers,
    pub memory: Memory,

    /// Treat undecodable opcode bytes as fatal instead of reporting and
    /// continuing.
    pub halt_on_invalid: bool,

    pc: Address,
    halted: bool,
    cycles: usize,
    output: Box<dyn Write>,
}

impl Default for Machine {
    fn default() -> Self {
        Self {
            registers: Registers::default(),
            memory: Memory::default(),
            halt_on_invalid: false,
            pc: 0,
            halted: false,
            cycles: 0,
            output: Box::new(std::io::stdout()),
        }
    }
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Machine {{ pc: {}, halted: {}, registers: {:?}, memory: [...] }}",
            self.pc, self.halted, self.registers
        )
    }
}

impl Machine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a program image into memory, starting at address 0.
    ///
    /// # Errors
    ///
    /// It fails if the program is bigger than the memory.
    pub fn load(&mut self, program: &Program) -> std::result::Result<(), MemoryError> {
        self.memory.load(program)
    }

    /// Address of the next instruction byte to fetch
    #[must_use]
    pub fn pc(&self) -> Address {
        self.pc
    }

    #[must_use]
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Number of fetch-decode-execute cycles performed so far
    #[must_use]
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// Redirect machine output to the given writer.
    ///
    /// Both the decimal prints and the invalid-instruction diagnostics go
    /// through it; the default is standard output.
    pub fn set_output(&mut self, output: Box<dyn Write>) {
        self.output = output;
    }

    fn print(&mut self, value: Byte) -> Result<()> {
        writeln!(self.output, "{value}").map_err(|e| ProcessorError::Output(e.kind()))
    }

    fn register(&self, index: Byte) -> std::result::Result<Byte, RegisterError> {
        self.registers.get(index)
    }

    fn set_register(&mut self, index: Byte, value: Byte) -> std::result::Result<(), RegisterError> {
        self.registers.set(index, value)
    }

    /// Perform an ALU operation on two registers, storing into the first.
    ///
    /// Results wrap to 8 bits, as on the real machine.
    fn alu(&mut self, op: AluOp, reg_a: Byte, reg_b: Byte) -> Result<()> {
        let a = self.register(reg_a)?;
        let b = self.register(reg_b)?;

        let (res, overflow) = match op {
            AluOp::Add => a.overflowing_add(b),
            AluOp::Mul => a.overflowing_mul(b),
        };

        debug!("{op}({a}, {b}) = {res} (wrapped: {overflow})");
        self.set_register(reg_a, res)?;
        Ok(())
    }

    /// Run one fetch-decode-execute cycle.
    ///
    /// The program counter advances by the decoded instruction width on every
    /// branch, including halts and invalid instructions.
    ///
    /// # Errors
    ///
    /// It fails on out-of-bounds fetches, invalid register operands, output
    /// write failures, and, if [`halt_on_invalid`][Machine::halt_on_invalid]
    /// is set, undecodable opcode bytes.
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn step(&mut self) -> Result<()> {
        let opcode = self.memory.get(self.pc)?;
        let width = instructions::width_of(opcode);

        // Operands are only fetched up to the decoded width, so a trailing
        // zero-operand instruction in the last cell does not fault.
        let operand_a = if width > 1 { self.memory.get(self.pc + 1)? } else { 0 };
        let operand_b = if width > 2 { self.memory.get(self.pc + 2)? } else { 0 };

        match Instruction::decode(opcode, operand_a, operand_b) {
            Ok(instruction) => {
                debug!(pc = self.pc, "executing \"{instruction}\"");
                instruction.execute(self)?;
                self.pc += instruction.width();
            }
            Err(DecodeError { opcode }) if self.halt_on_invalid => {
                return Err(ProcessorError::InvalidInstruction {
                    opcode,
                    address: self.pc,
                });
            }
            Err(DecodeError { opcode }) => {
                // Report and keep going. The program counter still advances,
                // so a stream of garbage bytes loops until it runs off the
                // end of memory or stumbles on a halt.
                let address = self.pc;
                writeln!(
                    self.output,
                    "invalid instruction {opcode:#010b} at address {address}"
                )
                .map_err(|e| ProcessorError::Output(e.kind()))?;
                self.pc += width;
            }
        }

        self.cycles += 1;
        debug!("register state {:?}", self.registers);
        Ok(())
    }

    /// Run cycles until the machine halts.
    ///
    /// # Errors
    ///
    /// It fails when a cycle fails; see [`Machine::step`].
    #[tracing::instrument(skip(self))]
    pub fn run(&mut self) -> Result<()> {
        while !self.halted {
            self.step()?;
        }
        Ok(())
    }

    /// One line of debug trace: program counter, the next three memory bytes
    /// and the register file, in hexadecimal.
    #[must_use]
    pub fn trace_line(&self) -> String {
        let next: Vec<String> = (0..3)
            .map(|offset| {
                self.memory
                    .get(self.pc + offset)
                    .map_or_else(|_| "--".into(), |byte| format!("{byte:02X}"))
            })
            .collect();

        format!(
            "TRACE: {:02X} | {} | {}",
            self.pc,
            next.join(" "),
            self.registers
        )
    }
}
