use crate::error::Error;

/// Number of general purpose registers
pub const REGISTER_COUNT: usize = 8;

bitflags::bitflags! {
  /// Condition flags, laid out like the LS8 `FL` register: `0b00000LGE`
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
  pub struct Flags: u8 {
    const EQUAL = 0b0000_0001;
    const GREATER = 0b0000_0010;
    const LESS = 0b0000_0100;
  }
}

/// The register file, `R0` through `R7` plus the condition flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers {
  values: [u8; REGISTER_COUNT],
  flags: Flags,
}

impl Registers {
  /// Create a register file with every register and flag cleared
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, index: u8) -> Result<u8, Error> {
    self
      .values
      .get(index as usize)
      .copied()
      .ok_or(Error::InvalidRegister { index })
  }

  pub fn set(&mut self, index: u8, value: u8) -> Result<(), Error> {
    let register = self
      .values
      .get_mut(index as usize)
      .ok_or(Error::InvalidRegister { index })?;
    *register = value;
    Ok(())
  }

  pub fn flags(&self) -> Flags {
    self.flags
  }

  pub fn set_flags(&mut self, flags: Flags) {
    self.flags = flags;
  }

  pub fn as_slice(&self) -> &[u8] {
    &self.values
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new() {
    let registers = Registers::new();
    assert!(registers.as_slice().iter().all(|&r| r == 0));
    assert!(registers.flags().is_empty());
  }

  #[test]
  fn get_set() {
    let mut registers = Registers::new();
    registers.set(7, 0xAB).unwrap();
    assert_eq!(registers.get(7).unwrap(), 0xAB);
  }

  #[test]
  fn invalid_register() {
    let mut registers = Registers::new();
    assert!(matches!(
      registers.get(8),
      Err(Error::InvalidRegister { index: 8 })
    ));
    assert!(registers.set(255, 1).is_err());
  }

  #[test]
  fn flags_layout() {
    assert_eq!((Flags::LESS | Flags::EQUAL).bits(), 0b101);
  }
}
