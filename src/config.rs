use crate::error::Error;

/// Default top of the stack, the LS8 leaves `0xF5..=0xFF` for its own use.
pub const DEFAULT_STACK_TOP: u8 = 0xF4;

/// Default lowest address the stack may grow down to.
pub const DEFAULT_STACK_FLOOR: u8 = 0x80;

/// Geometry of a machine
///
/// The stack pointer always stays inside `stack_floor..=stack_top`, wrapping
/// around at either end, and programs may only occupy memory below
/// `stack_floor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
  stack_floor: u8,
  stack_top: u8,
}

impl Config {
  /// Create a configuration, rejecting an empty or inverted stack range
  pub fn new(stack_floor: u8, stack_top: u8) -> Result<Self, Error> {
    if stack_floor >= stack_top {
      return Err(Error::InvalidConfig {
        floor: stack_floor,
        top: stack_top,
      });
    }
    Ok(Self {
      stack_floor,
      stack_top,
    })
  }

  pub fn stack_floor(&self) -> u8 {
    self.stack_floor
  }

  pub fn stack_top(&self) -> u8 {
    self.stack_top
  }

  /// Number of addresses the stack pointer can take
  pub fn stack_span(&self) -> usize {
    (self.stack_top - self.stack_floor) as usize + 1
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      stack_floor: DEFAULT_STACK_FLOOR,
      stack_top: DEFAULT_STACK_TOP,
    }
  }
}
