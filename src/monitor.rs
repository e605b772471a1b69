//! # Monitor Console
//!
//! A small line-oriented command console for stepping, running and inspecting a CPU.
//! It parses text commands into `Command` values and executes them against a
//! `Monitor`, writing replies to any `io::Write`.
//!
//! ## Commands
//!
//! | Command | Action |
//! |---------|--------|
//! | `v` | show registers |
//! | `r` | faithful reset |
//! | `r aaaa` | read the byte at `aaaa` |
//! | `w aaaa dd` | write `dd` to `aaaa` |
//! | `s aaaa` | set PC |
//! | `b aaaa` | set the breakpoint |
//! | `x` | execute one instruction |
//! | `x nnnn` | execute `nnnn` (hex) instructions, stopping at the breakpoint |
//! | `f` | free-run until the breakpoint, STP or an error |
//! | `l path` | load an Intel-HEX file |
//! | `d aaaa [nn]` | disassemble `nn` (hex, default 10) instructions from `aaaa` |
//! | `q` | quit |
//!
//! Numbers are hexadecimal, with an optional leading `$`. Command letters are
//! case-insensitive.
//!
//! ## Example
//!
//! ```
//! use lib65c02::monitor::{Flow, Monitor};
//! use lib65c02::{CPU, FlatMemory};
//!
//! let mut monitor = Monitor::new(CPU::new(FlatMemory::new()));
//! let mut out = Vec::new();
//!
//! monitor.run_line("w 0200 a9", &mut out).unwrap();
//! monitor.run_line("r 0200", &mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().contains("$0200: $A9"));
//!
//! let flow = monitor.run_line("q", &mut Vec::new()).unwrap();
//! assert_eq!(flow, Flow::Quit);
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use log::info;

use crate::disassembler::{decode_instruction, format_line, DisassemblyOptions, Instruction};
use crate::hex::{load_hex, HexError};
use crate::interrupts::PowerState;
use crate::memory::MemoryBus;
use crate::{ExecutionError, CPU};

/// Default number of instructions shown by `d aaaa`.
const DEFAULT_DISASSEMBLY_COUNT: u16 = 0x10;

/// A parsed monitor command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `v`
    ShowRegisters,
    /// `r`
    Reset,
    /// `r aaaa`
    Read(u16),
    /// `w aaaa dd`
    Write(u16, u8),
    /// `s aaaa`
    SetPc(u16),
    /// `b aaaa`
    SetBreakpoint(u16),
    /// `x`
    Step,
    /// `x nnnn`
    Run(u16),
    /// `f`
    FreeRun,
    /// `l path`
    Load(PathBuf),
    /// `d aaaa [nn]`
    Disassemble {
        /// First address
        address: u16,
        /// Number of instructions
        count: u16,
    },
    /// `q`
    Quit,
}

/// Errors reported by the monitor. None of them end the session.
#[derive(Debug)]
pub enum MonitorError {
    /// The line was empty.
    Empty,
    /// The command letter is not recognized, or the argument count does not fit it.
    UnknownCommand(String),
    /// An argument is not a valid hexadecimal number of the right width.
    InvalidNumber(String),
    /// A command is missing a required argument.
    MissingArgument(&'static str),
    /// The CPU stopped with an error.
    Execution(ExecutionError),
    /// Loading a hex file failed.
    Hex(HexError),
    /// Opening a file or writing output failed.
    Io(io::Error),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MonitorError::Empty => write!(f, "Doing nothing"),
            MonitorError::UnknownCommand(cmd) => write!(f, "Unrecognized command: {}", cmd),
            MonitorError::InvalidNumber(text) => write!(f, "Invalid hex number: {}", text),
            MonitorError::MissingArgument(what) => write!(f, "Missing argument: {}", what),
            MonitorError::Execution(err) => write!(f, "Execution stopped: {}", err),
            MonitorError::Hex(err) => write!(f, "Hex load failed: {}", err),
            MonitorError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::Execution(err) => Some(err),
            MonitorError::Hex(err) => Some(err),
            MonitorError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ExecutionError> for MonitorError {
    fn from(err: ExecutionError) -> Self {
        MonitorError::Execution(err)
    }
}

impl From<HexError> for MonitorError {
    fn from(err: HexError) -> Self {
        MonitorError::Hex(err)
    }
}

impl From<io::Error> for MonitorError {
    fn from(err: io::Error) -> Self {
        MonitorError::Io(err)
    }
}

fn parse_u16(text: &str) -> Result<u16, MonitorError> {
    let digits = text.strip_prefix('$').unwrap_or(text);
    u16::from_str_radix(digits, 16).map_err(|_| MonitorError::InvalidNumber(text.to_string()))
}

fn parse_u8(text: &str) -> Result<u8, MonitorError> {
    let digits = text.strip_prefix('$').unwrap_or(text);
    u8::from_str_radix(digits, 16).map_err(|_| MonitorError::InvalidNumber(text.to_string()))
}

impl Command {
    /// Parses one command line.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::monitor::Command;
    ///
    /// assert_eq!(Command::parse("W 0200 $FF").unwrap(), Command::Write(0x0200, 0xFF));
    /// assert_eq!(Command::parse("x 10").unwrap(), Command::Run(0x10));
    /// assert!(Command::parse("z").is_err());
    /// ```
    pub fn parse(line: &str) -> Result<Command, MonitorError> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        if name.is_empty() {
            return Err(MonitorError::Empty);
        }

        // The path argument of `l` may contain spaces
        if name.eq_ignore_ascii_case("l") {
            if rest.is_empty() {
                return Err(MonitorError::MissingArgument("file name"));
            }
            return Ok(Command::Load(PathBuf::from(rest)));
        }

        let args: Vec<&str> = rest.split_whitespace().collect();
        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("v", []) => Command::ShowRegisters,
            ("r", []) => Command::Reset,
            ("r", [addr]) => Command::Read(parse_u16(addr)?),
            ("w", [addr, value]) => Command::Write(parse_u16(addr)?, parse_u8(value)?),
            ("w", [_]) => return Err(MonitorError::MissingArgument("data byte")),
            ("s", [addr]) => Command::SetPc(parse_u16(addr)?),
            ("b", [addr]) => Command::SetBreakpoint(parse_u16(addr)?),
            ("x", []) => Command::Step,
            ("x", [count]) => Command::Run(parse_u16(count)?),
            ("f", []) => Command::FreeRun,
            ("d", [addr]) => Command::Disassemble {
                address: parse_u16(addr)?,
                count: DEFAULT_DISASSEMBLY_COUNT,
            },
            ("d", [addr, count]) => Command::Disassemble {
                address: parse_u16(addr)?,
                count: parse_u16(count)?,
            },
            ("q", []) => Command::Quit,
            ("w" | "s" | "b" | "d", []) => return Err(MonitorError::MissingArgument("address")),
            _ => return Err(MonitorError::UnknownCommand(line.to_string())),
        };
        Ok(command)
    }
}

/// Whether the session should continue after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Why a run stopped before its instruction count ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Breakpoint,
    Halted,
    Limit,
}

/// A CPU plus the debugging state the console needs.
pub struct Monitor<M: MemoryBus> {
    cpu: CPU<M>,
    breakpoint: Option<u16>,
    free_run_limit: Option<u64>,
}

impl<M: MemoryBus> Monitor<M> {
    /// Wraps `cpu` with no breakpoint and no free-run limit.
    pub fn new(cpu: CPU<M>) -> Self {
        Self {
            cpu,
            breakpoint: None,
            free_run_limit: None,
        }
    }

    /// Caps the number of instructions a single `f` command may execute.
    pub fn set_free_run_limit(&mut self, limit: Option<u64>) {
        self.free_run_limit = limit;
    }

    pub fn breakpoint(&self) -> Option<u16> {
        self.breakpoint
    }

    pub fn cpu(&self) -> &CPU<M> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CPU<M> {
        &mut self.cpu
    }

    pub fn into_cpu(self) -> CPU<M> {
        self.cpu
    }

    /// Parses and executes one line.
    pub fn run_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow, MonitorError> {
        let command = Command::parse(line)?;
        self.execute(&command, out)
    }

    /// Executes one command, writing any reply to `out`.
    pub fn execute<W: Write>(
        &mut self,
        command: &Command,
        out: &mut W,
    ) -> Result<Flow, MonitorError> {
        match command {
            Command::ShowRegisters => self.print_registers(out)?,
            Command::Reset => {
                self.cpu.reset(true);
                writeln!(out, "Reset, PC = ${:04X}", self.cpu.pc())?;
            }
            Command::Read(addr) => {
                let value = self.cpu.memory_mut().read(*addr);
                writeln!(out, "${:04X}: ${:02X}", addr, value)?;
            }
            Command::Write(addr, value) => self.cpu.memory_mut().write(*addr, *value),
            Command::SetPc(addr) => self.cpu.set_pc(*addr),
            Command::SetBreakpoint(addr) => {
                self.breakpoint = Some(*addr);
                writeln!(out, "Set breakpoint at address ${:04X}", addr)?;
            }
            Command::Step => {
                self.cpu.step()?;
                self.print_registers(out)?;
            }
            Command::Run(count) => {
                writeln!(out, "Executing ${:X}({}) instructions", count, count)?;
                match self.run(Some(*count as u64))? {
                    Stop::Limit => {}
                    stop => self.report_stop(stop, out)?,
                }
                self.print_registers(out)?;
            }
            Command::FreeRun => {
                let stop = self.run(self.free_run_limit)?;
                self.report_stop(stop, out)?;
                self.print_registers(out)?;
            }
            Command::Load(path) => self.load(path, out)?,
            Command::Disassemble { address, count } => self.disassemble(*address, *count, out)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Steps until the breakpoint, STP, or `limit` instructions.
    fn run(&mut self, limit: Option<u64>) -> Result<Stop, ExecutionError> {
        let mut executed = 0u64;
        loop {
            if limit.is_some_and(|limit| executed >= limit) {
                return Ok(Stop::Limit);
            }
            self.cpu.step()?;
            executed += 1;

            if self.cpu.power_state() == PowerState::Halted {
                return Ok(Stop::Halted);
            }
            if Some(self.cpu.pc()) == self.breakpoint {
                return Ok(Stop::Breakpoint);
            }
        }
    }

    fn report_stop<W: Write>(&self, stop: Stop, out: &mut W) -> io::Result<()> {
        match stop {
            Stop::Breakpoint => writeln!(out, "Breakpoint hit!"),
            Stop::Halted => writeln!(out, "Processor halted (STP)"),
            Stop::Limit => writeln!(out, "Free-run limit reached"),
        }
    }

    fn print_registers<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let cpu = &self.cpu;
        let flag = |set: bool, upper: char| {
            if set {
                upper
            } else {
                upper.to_ascii_lowercase()
            }
        };

        writeln!(
            out,
            "A = ${:02X}\tX = ${:02X}\tY = ${:02X}",
            cpu.a(),
            cpu.x(),
            cpu.y()
        )?;
        writeln!(out, "PC = ${:04X}\tSP = ${:02X}", cpu.pc(), cpu.sp())?;
        writeln!(
            out,
            "Status register: {}{}-{}{}{}{}{}",
            flag(cpu.flag_n(), 'N'),
            flag(cpu.flag_v(), 'V'),
            flag(cpu.flag_b(), 'B'),
            flag(cpu.flag_d(), 'D'),
            flag(cpu.flag_i(), 'I'),
            flag(cpu.flag_z(), 'Z'),
            flag(cpu.flag_c(), 'C')
        )?;
        match cpu.power_state() {
            PowerState::Running => Ok(()),
            PowerState::Suspended => writeln!(out, "Waiting for interrupt (WAI)"),
            PowerState::Halted => writeln!(out, "Stopped (STP)"),
        }
    }

    fn load<W: Write>(&mut self, path: &PathBuf, out: &mut W) -> Result<(), MonitorError> {
        let file = File::open(path)?;
        let report = load_hex(BufReader::new(file), self.cpu.memory_mut())?;

        for mismatch in &report.checksum_mismatches {
            writeln!(
                out,
                "Checksum error on line {}! Stored checksum: {:02X}. Calculated checksum: {:02X}.",
                mismatch.line, mismatch.stored, mismatch.computed
            )?;
        }
        writeln!(
            out,
            "{} records loaded ({} bytes)",
            report.records, report.bytes_written
        )?;
        info!("loaded {} bytes from {}", report.bytes_written, path.display());
        Ok(())
    }

    /// Disassembles through the bus, so reads of I/O devices have their usual effect.
    fn disassemble<W: Write>(
        &mut self,
        start: u16,
        count: u16,
        out: &mut W,
    ) -> Result<(), MonitorError> {
        let options = DisassemblyOptions {
            start_address: start,
            hex_dump: true,
        };
        let mut address = start;
        for _ in 0..count {
            let memory = self.cpu.memory_mut();
            let bytes = [
                memory.read(address),
                memory.read(address.wrapping_add(1)),
                memory.read(address.wrapping_add(2)),
            ];
            let instr = decode_instruction(&bytes, address)
                .unwrap_or_else(|| Instruction::data_byte(address, bytes[0]));
            writeln!(out, "{}", format_line(&instr, &options))?;
            address = address.wrapping_add(instr.size_bytes as u16);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("v").unwrap(), Command::ShowRegisters);
        assert_eq!(Command::parse("R").unwrap(), Command::Reset);
        assert_eq!(Command::parse("r 7fff").unwrap(), Command::Read(0x7FFF));
        assert_eq!(Command::parse("s $8000").unwrap(), Command::SetPc(0x8000));
        assert_eq!(Command::parse("b 1234").unwrap(), Command::SetBreakpoint(0x1234));
        assert_eq!(Command::parse("x").unwrap(), Command::Step);
        assert_eq!(Command::parse("f").unwrap(), Command::FreeRun);
        assert_eq!(
            Command::parse("l my program.hex").unwrap(),
            Command::Load(PathBuf::from("my program.hex"))
        );
        assert_eq!(
            Command::parse("d 8000").unwrap(),
            Command::Disassemble {
                address: 0x8000,
                count: DEFAULT_DISASSEMBLY_COUNT
            }
        );
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Command::parse("   "), Err(MonitorError::Empty)));
        assert!(matches!(
            Command::parse("w 0200 100"),
            Err(MonitorError::InvalidNumber(_))
        ));
        assert!(matches!(
            Command::parse("w 0200"),
            Err(MonitorError::MissingArgument(_))
        ));
        assert!(matches!(
            Command::parse("s"),
            Err(MonitorError::MissingArgument(_))
        ));
        assert!(matches!(
            Command::parse("v 12"),
            Err(MonitorError::UnknownCommand(_))
        ));
        assert!(matches!(
            Command::parse("l"),
            Err(MonitorError::MissingArgument(_))
        ));
    }
}
