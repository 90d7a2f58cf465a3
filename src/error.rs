//! Defines the [`Error`] type of the crate.

use std::io;
use std::path::PathBuf;

use crate::opcode::Opcode;

/// An error that occurred while loading or executing a program
///
/// Every variant is fatal: the machine stops at the failing instruction and
/// never tries to resynchronise.
#[derive(thiserror::Error, Debug)]
pub enum Error {
  /// The program file could not be read.
  #[error("failed to load program from `{}`", path.display())]
  Load {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// A line held a binary literal that does not fit in a byte.
  #[error("line {line}: binary literal `{text}` does not fit in 8 bits")]
  LiteralOverflow { line: usize, text: String },

  /// The program image would reach into the stack.
  #[error("program of {len} bytes overlaps the stack starting at {floor:#04x}")]
  ProgramOverlapsStack { len: usize, floor: u8 },

  /// The ALU was asked to perform something that is not an ALU operation.
  #[error("unsupported ALU operation `{0:?}`")]
  UnsupportedOperation(Opcode),

  /// The byte under the program counter is not an assigned opcode.
  #[error("unknown instruction {opcode:#010b} at address {address:#04x}")]
  UnknownInstruction { opcode: u8, address: usize },

  /// An address fell outside of memory.
  #[error("address {address:#x} is out of bounds")]
  OutOfBounds { address: usize },

  /// A register operand named a register that does not exist.
  #[error("register index {index} out of bounds")]
  InvalidRegister { index: u8 },

  /// The stack range is empty or inverted.
  #[error("stack floor {floor:#04x} must lie below stack top {top:#04x}")]
  InvalidConfig { floor: u8, top: u8 },

  #[error("machine is halted")]
  MachineHalted,

  /// Writing `PRN` output failed.
  #[error("failed to write output")]
  Output(#[from] io::Error),
}
