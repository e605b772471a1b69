//! # 65C02 CPU Emulator Core
//!
//! An instruction-accurate WDC 65C02 CPU model designed to be embedded in a larger
//! host: an emulator, a debugger, or a test rig that supplies memory and I/O.
//!
//! This crate provides the decode-execute engine, the addressing-mode resolvers,
//! the arithmetic/logic operation library (including decimal mode), the stack and
//! status engine, and the reset/interrupt/power-state controller. Memory is never
//! owned by the core; every access goes through the `MemoryBus` trait.
//!
//! ## Quick Start
//!
//! ```rust
//! use lib65c02::{CPU, FlatMemory, MemoryBus};
//!
//! // Create 64KB flat memory
//! let mut memory = FlatMemory::new();
//!
//! // Set reset vector to point to program start at 0x8000
//! memory.write(0xFFFC, 0x00); // Low byte
//! memory.write(0xFFFD, 0x80); // High byte
//!
//! // LDA #$42
//! memory.write(0x8000, 0xA9);
//! memory.write(0x8001, 0x42);
//!
//! // Initialize CPU - it performs a non-faithful reset and loads PC from the reset vector
//! let mut cpu = CPU::new(memory);
//! assert_eq!(cpu.pc(), 0x8000);
//! assert_eq!(cpu.sp(), 0xFF);
//! assert!(cpu.flag_i());
//!
//! cpu.step().unwrap();
//! assert_eq!(cpu.a(), 0x42);
//! ```
//!
//! ## Architecture
//!
//! - **Modularity**: CPU state is separated from memory via the `MemoryBus` trait
//! - **Table-Driven Design**: every opcode maps to an `{operation, addressing mode}`
//!   pair in `OPCODE_TABLE`, which also drives the disassembler
//! - **Explicit State**: registers, flags and latches live in one value owned by the CPU,
//!   so any number of independent processors can coexist
//! - **Interrupt Lines**: IRQ/NMI/SO can be driven from another thread through an
//!   `InterruptHandle`; they are sampled only at instruction boundaries
//!
//! ## Modules
//!
//! - `cpu` - Instruction dispatcher and public core API
//! - `registers` - Register and flag state
//! - `memory` - MemoryBus trait and flat memory
//! - `addressing` - Addressing modes and effective address resolution
//! - `opcodes` - Opcode table
//! - `stack` - Stack and status push/pull
//! - `interrupts` - Interrupt lines and power states
//! - `config` - CPU configuration
//! - `disassembler` - Table-driven disassembly
//! - `devices` - Memory-mapped host devices
//! - `hex` - Intel-HEX loader
//! - `monitor` - Command console for stepping and inspecting a CPU

pub mod addressing;
pub mod config;
pub mod cpu;
pub mod devices;
pub mod disassembler;
pub mod hex;
pub mod interrupts;
pub mod memory;
pub mod monitor;
pub mod opcodes;
pub mod registers;
pub mod stack;

// Internal instruction implementations (not part of public API)
mod instructions;

// Re-export public API
pub use addressing::AddressingMode;
pub use config::{CpuConfig, UndefinedOpcodePolicy};
pub use cpu::CPU;
pub use devices::{ConsoleDevice, Device, DeviceError, MappedMemory, RamDevice};
pub use disassembler::{
    decode_instruction, disassemble, format_instruction, format_line, DisassemblyOptions,
    Instruction,
};
pub use hex::{load_hex, parse_record, HexError, HexRecord, LoadReport, RecordError};
pub use interrupts::{InterruptHandle, PowerState};
pub use memory::{FlatMemory, MemoryBus};
pub use monitor::{Command, Monitor, MonitorError};
pub use opcodes::{OpcodeMetadata, Operation, OPCODE_TABLE};
pub use registers::{Registers, StatusFlags};

/// Address of the non-maskable interrupt vector (little-endian word).
pub const NMI_VECTOR: u16 = 0xFFFA;

/// Address of the reset vector (little-endian word).
pub const RESET_VECTOR: u16 = 0xFFFC;

/// Address of the IRQ/BRK vector (little-endian word).
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// A reserved opcode was fetched while the CPU is configured to trap on them.
    ///
    /// `address` is where the opcode byte was fetched from.
    UndefinedOpcode {
        /// The opcode byte value
        opcode: u8,
        /// Address of the opcode byte
        address: u16,
    },
}

impl std::fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ExecutionError::UndefinedOpcode { opcode, address } => {
                write!(
                    f,
                    "Undefined opcode 0x{:02X} at address 0x{:04X}",
                    opcode, address
                )
            }
        }
    }
}

impl std::error::Error for ExecutionError {}
