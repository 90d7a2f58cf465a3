/// Every instruction the LS8 understands.
///
/// The encoding packs some metadata into the byte itself, `AABCDDDD`:
///
/// - `AA` is the number of operands that follow (0 to 2)
/// - `B` is set for instructions handled by the ALU
/// - `C` is set for instructions that assign the program counter
/// - `DDDD` identifies the instruction
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
  /// | Operation | Semantics/RTL      | Assembly |
  /// |-----------|--------------------|----------|
  /// | Halt      | `(stop execution)` | `HLT`    |
  Hlt = 0b0000_0001,

  /// | Operation | Semantics/RTL                 | Assembly |
  /// |-----------|-------------------------------|----------|
  /// | Return    | `pc ← m[sp]`, `sp ← sp + 1`   | `RET`    |
  Ret = 0b0001_0001,

  /// | Operation | Semantics/RTL                 | Assembly  |
  /// |-----------|-------------------------------|-----------|
  /// | Push      | `sp ← sp − 1`, `m[sp] ← r[a]` | `PUSH ra` |
  Push = 0b0100_0101,

  /// | Operation | Semantics/RTL                 | Assembly |
  /// |-----------|-------------------------------|----------|
  /// | Pop       | `r[a] ← m[sp]`, `sp ← sp + 1` | `POP ra` |
  Pop = 0b0100_0110,

  /// Writes the register as a decimal number followed by a newline.
  ///
  /// | Operation | Semantics/RTL   | Assembly |
  /// |-----------|-----------------|----------|
  /// | Print     | `out ← r[a]`    | `PRN ra` |
  Prn = 0b0100_0111,

  /// | Operation | Semantics/RTL                                 | Assembly  |
  /// |-----------|-----------------------------------------------|-----------|
  /// | Call      | `sp ← sp − 1`, `m[sp] ← pc + 2`, `pc ← r[a]`  | `CALL ra` |
  Call = 0b0101_0000,

  /// | Operation | Semantics/RTL | Assembly |
  /// |-----------|---------------|----------|
  /// | Jump      | `pc ← r[a]`   | `JMP ra` |
  Jmp = 0b0101_0100,

  /// | Operation     | Semantics/RTL     | Assembly |
  /// |---------------|-------------------|----------|
  /// | Jump If Equal | `if E: pc ← r[a]` | `JEQ ra` |
  Jeq = 0b0101_0101,

  /// | Operation         | Semantics/RTL      | Assembly |
  /// |-------------------|--------------------|----------|
  /// | Jump If Not Equal | `if !E: pc ← r[a]` | `JNE ra` |
  Jne = 0b0101_0110,

  /// | Operation   | Semantics/RTL        | Assembly |
  /// |-------------|----------------------|----------|
  /// | Logical NOT | `r[a] ← 255 − r[a]`  | `NOT ra` |
  Not = 0b0110_1001,

  /// | Operation      | Semantics/RTL | Assembly       |
  /// |----------------|---------------|----------------|
  /// | Load Immediate | `r[a] ← b`    | `LDI ra, $b`   |
  Ldi = 0b1000_0010,

  /// | Operation | Semantics/RTL              | Assembly     |
  /// |-----------|----------------------------|--------------|
  /// | Add       | `r[a] ← r[a] + r[b]`       | `ADD ra, rb` |
  Add = 0b1010_0000,

  /// | Operation | Semantics/RTL              | Assembly     |
  /// |-----------|----------------------------|--------------|
  /// | Multiply  | `r[a] ← r[a] × r[b]`       | `MUL ra, rb` |
  Mul = 0b1010_0010,

  /// Sets exactly one of the `E`, `G` and `L` flags.
  ///
  /// | Operation | Semantics/RTL                      | Assembly     |
  /// |-----------|------------------------------------|--------------|
  /// | Compare   | `fl ← r[a] <=> r[b]`               | `CMP ra, rb` |
  Cmp = 0b1010_0111,

  /// | Operation   | Semantics/RTL        | Assembly     |
  /// |-------------|----------------------|--------------|
  /// | Logical AND | `r[a] ← r[a] & r[b]` | `AND ra, rb` |
  And = 0b1010_1000,

  /// | Operation  | Semantics/RTL         | Assembly    |
  /// |------------|-----------------------|-------------|
  /// | Logical OR | `r[a] ← r[a] \| r[b]` | `OR ra, rb` |
  Or = 0b1010_1010,

  /// | Operation   | Semantics/RTL        | Assembly     |
  /// |-------------|----------------------|--------------|
  /// | Logical XOR | `r[a] ← r[a] ^ r[b]` | `XOR ra, rb` |
  Xor = 0b1010_1011,
}

impl Opcode {
  /// Number of operand bytes following the opcode
  pub fn operands(self) -> usize {
    (self as u8 >> 6) as usize
  }

  /// Full length of the instruction in bytes
  pub fn size(self) -> usize {
    1 + self.operands()
  }
}

impl TryFrom<u8> for Opcode {
  /// The unassigned byte is handed back
  type Error = u8;

  fn try_from(byte: u8) -> Result<Self, Self::Error> {
    let op = match byte {
      0b0000_0001 => Self::Hlt,
      0b0001_0001 => Self::Ret,
      0b0100_0101 => Self::Push,
      0b0100_0110 => Self::Pop,
      0b0100_0111 => Self::Prn,
      0b0101_0000 => Self::Call,
      0b0101_0100 => Self::Jmp,
      0b0101_0101 => Self::Jeq,
      0b0101_0110 => Self::Jne,
      0b0110_1001 => Self::Not,
      0b1000_0010 => Self::Ldi,
      0b1010_0000 => Self::Add,
      0b1010_0010 => Self::Mul,
      0b1010_0111 => Self::Cmp,
      0b1010_1000 => Self::And,
      0b1010_1010 => Self::Or,
      0b1010_1011 => Self::Xor,
      _ => return Err(byte),
    };
    Ok(op)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALL: [Opcode; 17] = [
    Opcode::Hlt,
    Opcode::Ret,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Prn,
    Opcode::Call,
    Opcode::Jmp,
    Opcode::Jeq,
    Opcode::Jne,
    Opcode::Not,
    Opcode::Ldi,
    Opcode::Add,
    Opcode::Mul,
    Opcode::Cmp,
    Opcode::And,
    Opcode::Or,
    Opcode::Xor,
  ];

  #[test]
  fn decode_matches_discriminant() {
    for op in ALL {
      assert_eq!(Opcode::try_from(op as u8), Ok(op));
    }
  }

  #[test]
  fn decode_unassigned() {
    assert_eq!(Opcode::try_from(0b1111_1111), Err(0b1111_1111));
    assert_eq!(Opcode::try_from(0), Err(0));
  }

  #[test]
  fn operands() {
    assert_eq!(Opcode::Hlt.operands(), 0);
    assert_eq!(Opcode::Ret.size(), 1);
    assert_eq!(Opcode::Prn.size(), 2);
    assert_eq!(Opcode::Ldi.size(), 3);
    assert_eq!(Opcode::Not.size(), 2);
  }
}
