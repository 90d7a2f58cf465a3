use std::fs;
use std::path::Path;

use crate::error::Error;

/// A region of instructions
pub trait Region {
  fn instructions(&self) -> &[u8];
}

/// A `Chunk` is a single program image that our virtual machine may load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
  instructions: Vec<u8>,
}

impl Chunk {
  /// Parse the textual program format
  ///
  /// Everything after a `#` is a comment. What is left of a line, once
  /// trimmed, is either a binary literal of `0`s and `1`s or skipped.
  pub fn parse(source: &str) -> Result<Self, Error> {
    let mut instructions = Vec::new();
    for (number, line) in source.lines().enumerate() {
      let code = line.split('#').next().unwrap_or_default().trim();
      if code.is_empty() {
        continue;
      }
      if !code.bytes().all(|b| b == b'0' || b == b'1') {
        log::debug!("skipping line {}: `{}`", number + 1, code);
        continue;
      }
      let byte = u8::from_str_radix(code, 2).map_err(|_| Error::LiteralOverflow {
        line: number + 1,
        text: code.to_owned(),
      })?;
      instructions.push(byte);
    }
    Ok(Self { instructions })
  }

  /// Read and parse a program file
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| Error::Load {
      path: path.to_owned(),
      source,
    })?;
    let chunk = Self::parse(&source)?;
    log::debug!(
      "loaded {} bytes from `{}`",
      chunk.instructions.len(),
      path.display()
    );
    Ok(chunk)
  }
}

impl From<Vec<u8>> for Chunk {
  fn from(instructions: Vec<u8>) -> Self {
    Self { instructions }
  }
}

impl Region for Chunk {
  fn instructions(&self) -> &[u8] {
    &self.instructions
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_print8() {
    let chunk = Chunk::parse(include_str!("../demos/print8.ls8")).unwrap();
    assert_eq!(
      chunk.instructions(),
      &[0b10000010, 0, 8, 0b01000111, 0, 0b00000001]
    );
  }

  #[test]
  fn parse_skips_comments_and_junk() {
    let source = "\
# full line comment

  00000001   # trailing comment
LDI R0,8
0b101
10000010#no space
";
    let chunk = Chunk::parse(source).unwrap();
    assert_eq!(chunk.instructions(), &[0b00000001, 0b10000010]);
  }

  #[test]
  fn parse_short_literals() {
    let chunk = Chunk::parse("1\n101\n").unwrap();
    assert_eq!(chunk.instructions(), &[1, 5]);
  }

  #[test]
  fn parse_leading_zeros() {
    let chunk = Chunk::parse("0000000011111111\n").unwrap();
    assert_eq!(chunk.instructions(), &[255]);
  }

  #[test]
  fn parse_overflow() {
    let err = Chunk::parse("00000001\n100000000\n").unwrap_err();
    assert!(matches!(
      err,
      Error::LiteralOverflow { line: 2, ref text } if text == "100000000"
    ));
  }

  #[test]
  fn from_file_missing() {
    let err = Chunk::from_file("does/not/exist.ls8").unwrap_err();
    assert!(matches!(err, Error::Load { .. }));
  }

  #[test]
  fn from_file_is_deterministic() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/call.ls8");
    let first = Chunk::from_file(path).unwrap();
    let second = Chunk::from_file(path).unwrap();
    assert_eq!(first, second);
    assert!(!first.instructions().is_empty());
  }
}
