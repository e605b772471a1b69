//! # Memory Bus Abstraction
//!
//! This module provides the `MemoryBus` trait that decouples the CPU from specific
//! memory implementations. The core never owns or allocates memory; it only reads
//! and writes through the bus supplied by the host. This enables:
//!
//! - Flat 64KB RAM (FlatMemory implementation provided)
//! - Memory-mapped I/O with side effects on read or write
//! - ROM/RAM splits and banked memory systems
//! - Mock buses for unit testing
//!
//! ## Design Principles
//!
//! - No bus errors - reads/writes always succeed from the core's point of view
//! - Reads are not assumed idempotent: `read` takes `&mut self` so a device may
//!   consume input or clear a status latch when it is read
//! - Multi-byte values are little-endian

/// Memory bus trait for CPU to read/write bytes.
///
/// Implementations of this trait provide the memory backend for the CPU.
/// The CPU accesses all memory (RAM, ROM, I/O) through this abstraction.
///
/// # Examples
///
/// ```
/// use lib65c02::{MemoryBus, FlatMemory};
///
/// let mut mem = FlatMemory::new();
///
/// // Write a value
/// mem.write(0x1234, 0x42);
///
/// // Read it back
/// assert_eq!(mem.read(0x1234), 0x42);
/// ```
///
/// ## Implementing Custom Memory
///
/// ```
/// use lib65c02::MemoryBus;
///
/// struct RomRamMemory {
///     ram: [u8; 0x8000],  // 32KB RAM (0x0000-0x7FFF)
///     rom: [u8; 0x8000],  // 32KB ROM (0x8000-0xFFFF)
/// }
///
/// impl MemoryBus for RomRamMemory {
///     fn read(&mut self, addr: u16) -> u8 {
///         if addr < 0x8000 {
///             self.ram[addr as usize]
///         } else {
///             self.rom[(addr - 0x8000) as usize]
///         }
///     }
///
///     fn write(&mut self, addr: u16, value: u8) {
///         if addr < 0x8000 {
///             self.ram[addr as usize] = value;
///         }
///         // Writes to ROM (0x8000+) are silently ignored
///     }
/// }
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified 16-bit address.
    ///
    /// This method must never panic. Reads may have side effects on
    /// memory-mapped devices.
    fn read(&mut self, addr: u16) -> u8;

    /// Writes a byte to the specified 16-bit address.
    ///
    /// This method must never panic. If the address is read-only or unmapped,
    /// implementations may ignore the write.
    fn write(&mut self, addr: u16, value: u8);
}

/// Reads a little-endian 16-bit word: low byte at `addr`, high byte at `addr + 1`.
///
/// The second address wraps at 0xFFFF. No zero-page or page wrap is applied.
pub fn read_word<M: MemoryBus + ?Sized>(bus: &mut M, addr: u16) -> u16 {
    let lo = bus.read(addr) as u16;
    let hi = bus.read(addr.wrapping_add(1)) as u16;
    (hi << 8) | lo
}

/// Simple 64KB flat memory implementation.
///
/// All 65536 addresses (0x0000-0xFFFF) are mapped to a single contiguous RAM array
/// initialized to 0x00. Useful for tests and simple programs.
///
/// # Examples
///
/// ```
/// use lib65c02::{CPU, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00); // Reset vector low byte
/// memory.write(0xFFFD, 0x80); // Reset vector high byte (PC = 0x8000)
/// memory.write(0x8000, 0xEA); // NOP
///
/// let cpu = CPU::new(memory);
/// assert_eq!(cpu.pc(), 0x8000);
/// ```
pub struct FlatMemory {
    /// 64KB contiguous memory array
    data: Box<[u8; 65536]>,
}

impl FlatMemory {
    /// Creates a new FlatMemory instance with all bytes initialized to zero.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; 65536]),
        }
    }

    /// Copies `bytes` into memory starting at `start`, wrapping at 0xFFFF.
    pub fn load(&mut self, start: u16, bytes: &[u8]) {
        let mut addr = start;
        for &byte in bytes {
            self.data[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }

    /// Returns the byte at `addr` without going through the bus.
    pub fn peek(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&mut self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}
