use std::env;
use std::io;
use std::path::PathBuf;

use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use ls8::config::{Config, DEFAULT_STACK_FLOOR, DEFAULT_STACK_TOP};
use ls8::region::Chunk;
use ls8::vm::Vm;

struct Args {
  program: PathBuf,
  trace: bool,
  config: Config,
}

fn print_usage() {
  eprintln!("ls8 - emulator for the LS8 8-bit machine");
  eprintln!();
  eprintln!("Usage: ls8 [options] <program.ls8>");
  eprintln!();
  eprintln!("Options:");
  eprintln!("  --trace            Log the machine state before every instruction");
  eprintln!("  --stack-floor <n>  Lowest stack address (default: {DEFAULT_STACK_FLOOR:#04x})");
  eprintln!("  --stack-top <n>    Initial stack pointer (default: {DEFAULT_STACK_TOP:#04x})");
  eprintln!("  -h, --help         Show this help");
}

fn parse_address(flag: &str, value: Option<String>) -> Result<u8> {
  let value = value.ok_or_else(|| eyre!("`{flag}` expects an address"))?;
  let parsed = match value.strip_prefix("0x") {
    Some(hex) => u8::from_str_radix(hex, 16),
    None => value.parse(),
  };
  parsed.wrap_err_with(|| format!("invalid address `{value}` for `{flag}`"))
}

/// `None` when only help was requested
fn parse_args() -> Result<Option<Args>> {
  let mut program = None;
  let mut trace = false;
  let mut floor = DEFAULT_STACK_FLOOR;
  let mut top = DEFAULT_STACK_TOP;

  let mut args = env::args().skip(1);
  while let Some(arg) = args.next() {
    match arg.as_str() {
      "-h" | "--help" => return Ok(None),
      "--trace" => trace = true,
      "--stack-floor" => floor = parse_address(&arg, args.next())?,
      "--stack-top" => top = parse_address(&arg, args.next())?,
      flag if flag.starts_with('-') => bail!("unknown option `{flag}`"),
      _ if program.is_some() => bail!("unexpected argument `{arg}`"),
      _ => program = Some(PathBuf::from(arg)),
    }
  }

  let Some(program) = program else {
    print_usage();
    bail!("no program given");
  };
  Ok(Some(Args {
    program,
    trace,
    config: Config::new(floor, top)?,
  }))
}

fn main() -> Result<()> {
  color_eyre::install()?; // rust error handling

  let Some(args) = parse_args()? else {
    print_usage();
    return Ok(());
  };

  let level = if args.trace {
    LevelFilter::Trace
  } else {
    LevelFilter::Warn
  };
  SimpleLogger::new().with_level(level).init()?; // logging

  let chunk = Chunk::from_file(&args.program)?;
  let mut vm = Vm::with_config(args.config);
  vm.load(&chunk)
    .wrap_err_with(|| format!("cannot load `{}`", args.program.display()))?;

  let stdout = io::stdout();
  vm.run(&mut stdout.lock())
    .wrap_err_with(|| format!("{} halted abnormally", args.program.display()))?;

  Ok(())
}
