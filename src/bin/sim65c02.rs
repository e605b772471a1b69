//! Interactive 65C02 simulator.
//!
//! Memory map: RAM at $0000-$7FFE, a console port at $7FFF and RAM at $8000-$FFFF.
//! Writing the port prints a character. Reading it prompts with `>` and takes one
//! byte from stdin.
//!
//! Usage: `sim65c02 [-v] [program.hex]`

use std::io::{self, BufRead, Read, Write};
use std::process::ExitCode;

use lib65c02::monitor::{Flow, Monitor};
use lib65c02::{ConsoleDevice, MappedMemory, RamDevice, CPU};
use log::{LevelFilter, Log, Metadata, Record};

const CONSOLE_PORT: u16 = 0x7FFF;

/// Writes log records to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        eprintln!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn build_memory() -> Result<MappedMemory, lib65c02::DeviceError> {
    let mut console = ConsoleDevice::new();
    console.set_output_callback(|byte| {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(&[byte]);
        let _ = stdout.flush();
    });
    console.set_input_callback(|| {
        print!(">");
        let _ = io::stdout().flush();
        let mut byte = [0u8; 1];
        match io::stdin().read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    });

    let mut memory = MappedMemory::new();
    memory.add_device(0x0000, Box::new(RamDevice::new(CONSOLE_PORT)))?;
    memory.add_device(CONSOLE_PORT, Box::new(console))?;
    memory.add_device(0x8000, Box::new(RamDevice::new(0x8000)))?;
    Ok(memory)
}

fn main() -> ExitCode {
    let mut program = None;
    let mut level = LevelFilter::Warn;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" => level = LevelFilter::Trace,
            _ => program = Some(arg),
        }
    }
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }

    let memory = match build_memory() {
        Ok(memory) => memory,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    let mut monitor = Monitor::new(CPU::new(memory));
    let mut stdout = io::stdout();

    if let Some(path) = program {
        // Load, then reset so PC comes from the freshly loaded vector
        for line in [format!("l {}", path), "r".to_string()] {
            if let Err(err) = monitor.run_line(&line, &mut stdout) {
                eprintln!("{}", err);
                return ExitCode::FAILURE;
            }
        }
    }

    let stdin = io::stdin();
    loop {
        print!("]>");
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                eprintln!("{}", err);
                return ExitCode::FAILURE;
            }
        }

        match monitor.run_line(&line, &mut stdout) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => println!("]{}", err),
        }
    }
    ExitCode::SUCCESS
}
