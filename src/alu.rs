//! Arithmetic and logic over the register file.
//!
//! Every operation reads `r[a]` and `r[b]` and, apart from `Cmp`, writes its
//! result into `r[a]`. Arithmetic wraps modulo 256.

use std::cmp::Ordering;

use crate::error::Error;
use crate::opcode::Opcode;
use crate::registers::{Flags, Registers};

/// Operations the ALU knows how to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
  Add,
  Mul,
  Cmp,
  And,
  Or,
  Xor,
  Not,
  /// Zeroes `r[a]`
  Clear,
}

impl TryFrom<Opcode> for AluOp {
  type Error = Error;

  fn try_from(op: Opcode) -> Result<Self, Self::Error> {
    match op {
      Opcode::Add => Ok(Self::Add),
      Opcode::Mul => Ok(Self::Mul),
      Opcode::Cmp => Ok(Self::Cmp),
      Opcode::And => Ok(Self::And),
      Opcode::Or => Ok(Self::Or),
      Opcode::Xor => Ok(Self::Xor),
      Opcode::Not => Ok(Self::Not),
      _ => Err(Error::UnsupportedOperation(op)),
    }
  }
}

/// Perform `op` on registers `a` and `b`
pub fn execute(op: AluOp, registers: &mut Registers, a: u8, b: u8) -> Result<(), Error> {
  let ra = registers.get(a)?;
  let rb = registers.get(b)?;
  let result = match op {
    AluOp::Add => ra.wrapping_add(rb),
    AluOp::Mul => ra.wrapping_mul(rb),
    AluOp::Cmp => {
      registers.set_flags(compare(ra, rb));
      return Ok(());
    }
    AluOp::And => ra & rb,
    AluOp::Or => ra | rb,
    AluOp::Xor => ra ^ rb,
    AluOp::Not => u8::MAX - rb,
    AluOp::Clear => 0,
  };
  registers.set(a, result)
}

fn compare(ra: u8, rb: u8) -> Flags {
  match ra.cmp(&rb) {
    Ordering::Equal => Flags::EQUAL,
    Ordering::Greater => Flags::GREATER,
    Ordering::Less => Flags::LESS,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn with(ra: u8, rb: u8) -> Registers {
    let mut registers = Registers::new();
    registers.set(0, ra).unwrap();
    registers.set(1, rb).unwrap();
    registers
  }

  #[test]
  fn add_mul_wrap_for_all_pairs() {
    for x in 0..=u8::MAX {
      for y in 0..=u8::MAX {
        let mut registers = with(x, y);
        execute(AluOp::Add, &mut registers, 0, 1).unwrap();
        assert_eq!(registers.get(0).unwrap() as u16, (x as u16 + y as u16) % 256);

        let mut registers = with(x, y);
        execute(AluOp::Mul, &mut registers, 0, 1).unwrap();
        assert_eq!(registers.get(0).unwrap() as u16, (x as u16 * y as u16) % 256);
        assert_eq!(registers.get(1).unwrap(), y);
      }
    }
  }

  #[test]
  fn cmp_sets_exactly_one_flag() {
    for x in 0..=u8::MAX {
      for y in 0..=u8::MAX {
        let mut registers = with(x, y);
        execute(AluOp::Cmp, &mut registers, 0, 1).unwrap();
        let flags = registers.flags();
        assert_eq!(flags.bits().count_ones(), 1);
        assert_eq!(flags.contains(Flags::EQUAL), x == y);
        assert_eq!(flags.contains(Flags::GREATER), x > y);
        assert_eq!(flags.contains(Flags::LESS), x < y);
        // registers are untouched
        assert_eq!(registers.as_slice()[..2], [x, y]);
      }
    }
  }

  #[test]
  fn cmp_boundaries() {
    let mut registers = with(0, 255);
    execute(AluOp::Cmp, &mut registers, 0, 1).unwrap();
    assert_eq!(registers.flags(), Flags::LESS);
    execute(AluOp::Cmp, &mut registers, 1, 0).unwrap();
    assert_eq!(registers.flags(), Flags::GREATER);
    execute(AluOp::Cmp, &mut registers, 1, 1).unwrap();
    assert_eq!(registers.flags(), Flags::EQUAL);
  }

  #[test]
  fn not_complements() {
    for y in 0..=u8::MAX {
      let mut registers = with(7, y);
      execute(AluOp::Not, &mut registers, 0, 1).unwrap();
      assert_eq!(registers.get(0).unwrap(), 255 - y);
    }
  }

  #[test]
  fn bitwise() {
    let mut registers = with(0b1100, 0b1010);
    execute(AluOp::And, &mut registers, 0, 1).unwrap();
    assert_eq!(registers.get(0).unwrap(), 0b1000);

    let mut registers = with(0b1100, 0b1010);
    execute(AluOp::Or, &mut registers, 0, 1).unwrap();
    assert_eq!(registers.get(0).unwrap(), 0b1110);

    let mut registers = with(0b1100, 0b1010);
    execute(AluOp::Xor, &mut registers, 0, 1).unwrap();
    assert_eq!(registers.get(0).unwrap(), 0b0110);
  }

  #[test]
  fn clear() {
    let mut registers = with(99, 3);
    execute(AluOp::Clear, &mut registers, 0, 1).unwrap();
    assert_eq!(registers.get(0).unwrap(), 0);
    assert_eq!(registers.get(1).unwrap(), 3);
  }

  #[test]
  fn invalid_register() {
    let mut registers = Registers::new();
    assert!(matches!(
      execute(AluOp::Add, &mut registers, 0, 9),
      Err(Error::InvalidRegister { index: 9 })
    ));
  }

  #[test]
  fn unsupported_operation() {
    assert_eq!(AluOp::try_from(Opcode::Mul).unwrap(), AluOp::Mul);
    assert!(matches!(
      AluOp::try_from(Opcode::Jmp),
      Err(Error::UnsupportedOperation(Opcode::Jmp))
    ));
  }
}
