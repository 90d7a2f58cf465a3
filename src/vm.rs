use std::fmt;
use std::io::Write;

use crate::alu::{self, AluOp};
use crate::config::Config;
use crate::error::Error;
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::region::Region;
use crate::registers::{Flags, Registers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
  Running,
  Halted,
}

/// A virtual machine for the LS8 architecture.
///
/// The stack grows down from [`Config::stack_top`] and wraps around inside
/// `stack_floor..=stack_top`, so it can never run into the loaded program.
#[derive(Debug)]
pub struct Vm {
  // address of the next byte to fetch
  pc: usize,
  sp: u8,
  memory: Memory,
  registers: Registers,
  state: State,
  config: Config,
}

impl Vm {
  /// Create a new, empty virtual machine
  pub fn new() -> Self {
    Self::with_config(Config::default())
  }

  pub fn with_config(config: Config) -> Self {
    Self {
      pc: 0,
      sp: config.stack_top(),
      memory: Memory::new(),
      registers: Registers::new(),
      state: State::Running,
      config,
    }
  }

  /// Copy a program image into memory, starting at address 0
  pub fn load<R>(&mut self, region: &R) -> Result<(), Error>
  where
    R: Region,
  {
    let image = region.instructions();
    let mut memory = self.memory.clone();
    memory.fill(image)?;
    let floor = self.config.stack_floor();
    if image.len() > floor as usize {
      return Err(Error::ProgramOverlapsStack {
        len: image.len(),
        floor,
      });
    }
    self.memory = memory;
    log::debug!("loaded {} byte image", image.len());
    Ok(())
  }

  /// Step through a single instruction
  ///
  /// Any error halts the machine for good.
  pub fn step<W>(&mut self, out: &mut W) -> Result<State, Error>
  where
    W: Write,
  {
    if self.state == State::Halted {
      return Err(Error::MachineHalted);
    }
    let mut task = Task::new(self, out);
    if let Err(err) = task.run() {
      self.state = State::Halted;
      return Err(err);
    }
    Ok(self.state)
  }

  /// Run until the machine halts, returning how many instructions it executed
  pub fn run<W>(&mut self, out: &mut W) -> Result<usize, Error>
  where
    W: Write,
  {
    let mut steps = 0;
    while self.state == State::Running {
      log::trace!("{}", self.trace());
      self.step(out)?;
      steps += 1;
    }
    log::debug!("halted after {steps} instructions");
    Ok(steps)
  }

  /// Push register `index` onto the stack
  pub fn push(&mut self, index: u8) -> Result<(), Error> {
    let value = self.registers.get(index)?;
    self.push_byte(value)
  }

  /// Pop the top of the stack into register `index`, returning the new stack
  /// pointer
  ///
  /// Popping an empty stack reads whatever sits above it.
  pub fn pop(&mut self, index: u8) -> Result<u8, Error> {
    // validate before moving the stack pointer
    self.registers.get(index)?;
    let value = self.pop_byte()?;
    self.registers.set(index, value)?;
    Ok(self.sp)
  }

  pub fn load_immediate(&mut self, index: u8, value: u8) -> Result<(), Error> {
    self.registers.set(index, value)
  }

  fn push_byte(&mut self, value: u8) -> Result<(), Error> {
    self.sp = self.wrap_sp(-1);
    self.memory.write(self.sp as usize, value)
  }

  fn pop_byte(&mut self) -> Result<u8, Error> {
    let value = self.memory.read(self.sp as usize)?;
    self.sp = self.wrap_sp(1);
    Ok(value)
  }

  fn wrap_sp(&self, delta: isize) -> u8 {
    let floor = self.config.stack_floor() as isize;
    let span = self.config.stack_span() as isize;
    let offset = (self.sp as isize - floor + delta).rem_euclid(span);
    (floor + offset) as u8
  }

  pub fn pc(&self) -> usize {
    self.pc
  }

  pub fn sp(&self) -> u8 {
    self.sp
  }

  pub fn state(&self) -> State {
    self.state
  }

  pub fn flags(&self) -> Flags {
    self.registers.flags()
  }

  pub fn registers(&self) -> &Registers {
    &self.registers
  }

  pub fn memory(&self) -> &Memory {
    &self.memory
  }

  /// A one line dump of the machine, for debugging
  pub fn trace(&self) -> Trace<'_> {
    Trace { vm: self }
  }
}

impl Default for Vm {
  fn default() -> Self {
    Self::new()
  }
}

/// Renders as `TRACE: PC | M[PC] M[PC+1] M[PC+2] | R0 .. R7`, all in hex
pub struct Trace<'vm> {
  vm: &'vm Vm,
}

impl fmt::Display for Trace<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TRACE: {:02X} |", self.vm.pc)?;
    for address in self.vm.pc..self.vm.pc + 3 {
      match self.vm.memory.read(address) {
        Ok(byte) => write!(f, " {byte:02X}")?,
        Err(_) => write!(f, " --")?,
      }
    }
    write!(f, " |")?;
    for register in self.vm.registers.as_slice() {
      write!(f, " {register:02X}")?;
    }
    Ok(())
  }
}

struct Task<'vm, 'out, W> {
  vm: &'vm mut Vm,
  out: &'out mut W,
}

impl<'vm, 'out, W> Task<'vm, 'out, W>
where
  W: Write,
{
  fn new(vm: &'vm mut Vm, out: &'out mut W) -> Self {
    Self { vm, out }
  }

  #[inline]
  fn eat(&mut self) -> Result<u8, Error> {
    let byte = self.vm.memory.read(self.vm.pc)?;
    self.vm.pc += 1;
    Ok(byte)
  }

  fn run(&mut self) -> Result<(), Error> {
    let pc = self.vm.pc;
    let op = Opcode::try_from(self.eat()?)
      .map_err(|opcode| Error::UnknownInstruction { opcode, address: pc })?;
    match op {
      Opcode::Hlt => halt(self),
      Opcode::Ret => ret(self)?,
      Opcode::Push => push(self)?,
      Opcode::Pop => pop(self)?,
      Opcode::Prn => print(self)?,
      Opcode::Call => call(self)?,
      Opcode::Jmp => jump(self)?,
      Opcode::Jeq => jump_if(self, true)?,
      Opcode::Jne => jump_if(self, false)?,
      Opcode::Ldi => load_immediate(self)?,
      Opcode::Not
      | Opcode::Add
      | Opcode::Mul
      | Opcode::Cmp
      | Opcode::And
      | Opcode::Or
      | Opcode::Xor => arithmetic(self, op)?,
    }
    Ok(())
  }
}

// (stop execution)
fn halt<W>(task: &mut Task<'_, '_, W>)
where
  W: Write,
{
  task.vm.state = State::Halted;
}

// pc ← m[sp], sp ← sp + 1
fn ret<W>(task: &mut Task<'_, '_, W>) -> Result<(), Error>
where
  W: Write,
{
  task.vm.pc = task.vm.pop_byte()? as usize;
  Ok(())
}

// sp ← sp − 1, m[sp] ← r[a]
fn push<W>(task: &mut Task<'_, '_, W>) -> Result<(), Error>
where
  W: Write,
{
  let a = task.eat()?;
  task.vm.push(a)
}

// r[a] ← m[sp], sp ← sp + 1
fn pop<W>(task: &mut Task<'_, '_, W>) -> Result<(), Error>
where
  W: Write,
{
  let a = task.eat()?;
  task.vm.pop(a)?;
  Ok(())
}

// out ← r[a]
fn print<W>(task: &mut Task<'_, '_, W>) -> Result<(), Error>
where
  W: Write,
{
  let a = task.eat()?;
  let value = task.vm.registers.get(a)?;
  writeln!(task.out, "{value}")?;
  Ok(())
}

// sp ← sp − 1, m[sp] ← pc + 2, pc ← r[a]
fn call<W>(task: &mut Task<'_, '_, W>) -> Result<(), Error>
where
  W: Write,
{
  let a = task.eat()?;
  let target = task.vm.registers.get(a)?;
  // pc already points past the operand
  let return_address = u8::try_from(task.vm.pc).map_err(|_| Error::OutOfBounds {
    address: task.vm.pc,
  })?;
  task.vm.push_byte(return_address)?;
  task.vm.pc = target as usize;
  Ok(())
}

// pc ← r[a]
fn jump<W>(task: &mut Task<'_, '_, W>) -> Result<(), Error>
where
  W: Write,
{
  let a = task.eat()?;
  task.vm.pc = task.vm.registers.get(a)? as usize;
  Ok(())
}

// if E == equal : pc ← r[a]
fn jump_if<W>(task: &mut Task<'_, '_, W>, equal: bool) -> Result<(), Error>
where
  W: Write,
{
  let a = task.eat()?;
  let target = task.vm.registers.get(a)?;
  if task.vm.registers.flags().contains(Flags::EQUAL) == equal {
    task.vm.pc = target as usize;
  }
  Ok(())
}

// r[a] ← b
fn load_immediate<W>(task: &mut Task<'_, '_, W>) -> Result<(), Error>
where
  W: Write,
{
  let a = task.eat()?;
  let b = task.eat()?;
  task.vm.load_immediate(a, b)
}

// r[a] ← r[a] op r[b], single operand forms use r[a] for both
fn arithmetic<W>(task: &mut Task<'_, '_, W>, op: Opcode) -> Result<(), Error>
where
  W: Write,
{
  let alu_op = AluOp::try_from(op)?;
  let a = task.eat()?;
  let b = if op.operands() == 2 { task.eat()? } else { a };
  alu::execute(alu_op, &mut task.vm.registers, a, b)
}
