//! Bare-bones emulator for the LS8, an 8-bit register machine
//!
//! Programs are text files of binary literals, one byte per line, which get
//! copied into a 256 byte memory and executed from address 0 until `HLT`.

pub mod alu;
pub mod config;
pub mod error;
pub mod memory;
pub mod opcode;
pub mod region;
pub mod registers;
pub mod vm;

pub use error::Error;
