use crate::error::Error;

/// Number of addressable bytes
pub const MEMORY_SIZE: usize = 256;

/// Flat, byte addressed memory of the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
  cells: [u8; MEMORY_SIZE],
}

impl Memory {
  /// Create a new, zeroed memory
  pub fn new() -> Self {
    Self {
      cells: [0; MEMORY_SIZE],
    }
  }

  pub fn read(&self, address: usize) -> Result<u8, Error> {
    self
      .cells
      .get(address)
      .copied()
      .ok_or(Error::OutOfBounds { address })
  }

  pub fn write(&mut self, address: usize, value: u8) -> Result<(), Error> {
    let cell = self
      .cells
      .get_mut(address)
      .ok_or(Error::OutOfBounds { address })?;
    *cell = value;
    Ok(())
  }

  /// Copy `bytes` into memory starting at address 0
  ///
  /// Cells past the image keep whatever they held before.
  pub fn fill(&mut self, bytes: &[u8]) -> Result<(), Error> {
    for (address, &byte) in bytes.iter().enumerate() {
      self.write(address, byte)?;
    }
    Ok(())
  }

  pub fn as_slice(&self) -> &[u8] {
    &self.cells
  }
}

impl Default for Memory {
  fn default() -> Self {
    Self::new()
  }
}
