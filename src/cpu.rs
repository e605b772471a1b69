//! # CPU State and Execution
//!
//! This module contains the CPU struct and the fetch-decode-execute loop.
//!
//! ## CPU State
//!
//! The CPU owns:
//! - **Registers**: A, X, Y, SP, PC and the seven status flags (`Registers`)
//! - **Power state**: Running, Suspended (after WAI) or Halted (after STP)
//! - **Interrupt lines**: IRQ, NMI and SO, shareable through an `InterruptHandle`
//! - **Memory bus**: supplied by the host; the CPU never allocates memory itself
//!
//! ## Execution Model
//!
//! Each call to `step()`:
//! 1. Does nothing at all if the CPU is Halted
//! 2. Applies a pending SO request to the V flag
//! 3. Fetches one opcode, resolves its operand and executes it
//! 4. Services a pending NMI, or else an asserted IRQ when I is clear
//!
//! Steps 3 and 4 also run while Suspended, so PC advances on every call that is
//! not Halted. Interrupt service leaves the Suspended state. An interrupt pending
//! when STP executes is still serviced in that call, but the CPU stays Halted.

use std::sync::Arc;

use log::{debug, trace, warn};

use crate::addressing::{fetch_byte, resolve};
use crate::config::{CpuConfig, UndefinedOpcodePolicy};
use crate::instructions;
use crate::interrupts::{enter_interrupt, InterruptHandle, InterruptLines, PowerState};
use crate::memory::{read_word, MemoryBus};
use crate::registers::Registers;
use crate::{ExecutionError, IRQ_VECTOR, NMI_VECTOR, OPCODE_TABLE, RESET_VECTOR};

/// 65C02 CPU state and execution context.
///
/// Generic over the memory implementation via the `MemoryBus` trait. Every CPU
/// owns its own state, so independent processors can coexist in one process.
///
/// # Type Parameters
///
/// * `M` - Memory bus implementation (must implement `MemoryBus` trait)
///
/// # Examples
///
/// ```
/// use lib65c02::{CPU, FlatMemory, MemoryBus, PowerState};
///
/// // Create memory and set reset vector
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00); // Low byte
/// memory.write(0xFFFD, 0x80); // High byte (PC = 0x8000)
///
/// // Initialize CPU - loads PC from reset vector
/// let cpu = CPU::new(memory);
///
/// // Inspect initial state
/// assert_eq!(cpu.pc(), 0x8000);
/// assert_eq!(cpu.sp(), 0xFF);
/// assert!(cpu.flag_i());
/// assert!(cpu.flag_z());
/// assert_eq!(cpu.power_state(), PowerState::Running);
/// ```
pub struct CPU<M: MemoryBus> {
    /// Register and flag state
    pub(crate) regs: Registers,

    /// Running, Suspended or Halted
    pub(crate) power: PowerState,

    /// IRQ/NMI/SO inputs, shared with any `InterruptHandle`
    pub(crate) lines: Arc<InterruptLines>,

    /// Construction-time options
    pub(crate) config: CpuConfig,

    /// Memory bus implementation
    pub(crate) memory: M,
}

impl<M: MemoryBus> CPU<M> {
    /// Creates a new CPU with the default configuration and performs `reset(false)`.
    ///
    /// # Arguments
    ///
    /// * `memory` - A MemoryBus implementation that provides the reset vector
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::{CPU, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0xFFFC, 0x00);
    /// mem.write(0xFFFD, 0x80);
    ///
    /// let cpu = CPU::new(mem);
    /// assert_eq!(cpu.pc(), 0x8000);
    /// ```
    pub fn new(memory: M) -> Self {
        Self::with_config(memory, CpuConfig::default())
    }

    /// Creates a new CPU with an explicit configuration and performs `reset(false)`.
    pub fn with_config(memory: M, config: CpuConfig) -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            power: PowerState::Running,
            lines: Arc::new(InterruptLines::default()),
            config,
            memory,
        };
        cpu.reset(false);
        cpu
    }

    /// Resets the processor.
    ///
    /// A faithful reset leaves A, X, Y, SP and the N, V, B, Z, C flags untouched, as
    /// real hardware does. A non-faithful reset initializes them to A=X=Y=0, SP=0xFF,
    /// N=V=B=C=0 and Z=1. Both forms clear D, set I, leave the Suspended and Halted
    /// states, and load PC from the reset vector at 0xFFFC/0xFFFD.
    ///
    /// Interrupt lines are not affected.
    pub fn reset(&mut self, faithful: bool) {
        if !faithful {
            self.regs.a = 0x00;
            self.regs.x = 0x00;
            self.regs.y = 0x00;
            self.regs.sp = 0xFF;
            self.regs.flag_n = false;
            self.regs.flag_v = false;
            self.regs.flag_b = false;
            self.regs.flag_z = true;
            self.regs.flag_c = false;
        }

        self.regs.flag_d = false;
        self.regs.flag_i = true;
        self.power = PowerState::Running;
        self.regs.pc = read_word(&mut self.memory, RESET_VECTOR);

        debug!(
            "reset (faithful: {}), PC = 0x{:04X}",
            faithful, self.regs.pc
        );
    }

    /// Executes one instruction and then services a pending interrupt.
    ///
    /// # Returns
    ///
    /// - `Ok(())` after one instruction and any interrupt entry (nothing at all
    ///   while Halted)
    /// - `Err(ExecutionError::UndefinedOpcode { .. })` if a reserved opcode was fetched
    ///   under `UndefinedOpcodePolicy::Trap`. Only the opcode byte has been consumed
    ///   and no interrupt is serviced in that call.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::{CPU, CpuConfig, ExecutionError, FlatMemory, MemoryBus, UndefinedOpcodePolicy};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0xFFFC, 0x00);
    /// mem.write(0xFFFD, 0x80);
    /// mem.write(0x8000, 0x03); // reserved opcode
    ///
    /// let config = CpuConfig::default().undefined_opcodes(UndefinedOpcodePolicy::Trap);
    /// let mut cpu = CPU::with_config(mem, config);
    ///
    /// assert_eq!(
    ///     cpu.step(),
    ///     Err(ExecutionError::UndefinedOpcode { opcode: 0x03, address: 0x8000 })
    /// );
    /// assert_eq!(cpu.pc(), 0x8001);
    /// ```
    pub fn step(&mut self) -> Result<(), ExecutionError> {
        if self.power == PowerState::Halted {
            return Ok(());
        }

        if self.lines.take_overflow() {
            self.regs.flag_v = true;
        }

        self.execute_instruction()?;
        self.service_interrupts();

        Ok(())
    }

    fn execute_instruction(&mut self) -> Result<(), ExecutionError> {
        let address = self.regs.pc;
        let opcode = fetch_byte(&mut self.regs, &mut self.memory);
        let metadata = &OPCODE_TABLE[opcode as usize];

        trace!(
            "{:04X}  {:02X}  {:<4} A={:02X} X={:02X} Y={:02X} SP={:02X} P={:02X}",
            address,
            opcode,
            metadata.mnemonic,
            self.regs.a,
            self.regs.x,
            self.regs.y,
            self.regs.sp,
            self.regs.status()
        );

        if metadata.is_undefined() {
            return match self.config.undefined_opcodes {
                UndefinedOpcodePolicy::Trap => {
                    warn!(
                        "undefined opcode 0x{:02X} at 0x{:04X}",
                        opcode, address
                    );
                    Err(ExecutionError::UndefinedOpcode { opcode, address })
                }
                UndefinedOpcodePolicy::Nop => {
                    debug!(
                        "undefined opcode 0x{:02X} at 0x{:04X} executed as {}-byte NOP",
                        opcode, address, metadata.size_bytes
                    );
                    let skip = metadata.addressing_mode.operand_bytes() as u16;
                    self.regs.pc = self.regs.pc.wrapping_add(skip);
                    Ok(())
                }
            };
        }

        let operand = resolve(metadata.addressing_mode, &mut self.regs, &mut self.memory);
        instructions::execute(
            metadata,
            operand,
            &mut self.regs,
            &mut self.power,
            &mut self.memory,
        );
        Ok(())
    }

    /// NMI first (consuming the edge), then IRQ if I is clear.
    fn service_interrupts(&mut self) {
        if self.lines.take_nmi() {
            debug!("servicing NMI, return address 0x{:04X}", self.regs.pc);
            enter_interrupt(&mut self.regs, &mut self.power, &mut self.memory, NMI_VECTOR);
        } else if self.lines.irq_asserted() && !self.regs.flag_i {
            debug!("servicing IRQ, return address 0x{:04X}", self.regs.pc);
            enter_interrupt(&mut self.regs, &mut self.power, &mut self.memory, IRQ_VECTOR);
        }
    }

    /// Runs up to `count` steps, stopping early once the CPU is Halted.
    ///
    /// # Returns
    ///
    /// - `Ok(steps)` with the number of `step()` calls made
    /// - `Err(ExecutionError)` from the first failing step
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::{CPU, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0xFFFC, 0x00);
    /// mem.write(0xFFFD, 0x80);
    /// mem.write(0x8000, 0xEA); // NOP
    /// mem.write(0x8001, 0xDB); // STP
    ///
    /// let mut cpu = CPU::new(mem);
    /// assert_eq!(cpu.run_for_instructions(100).unwrap(), 2);
    /// ```
    pub fn run_for_instructions(&mut self, count: u64) -> Result<u64, ExecutionError> {
        let mut executed = 0;
        while executed < count && self.power != PowerState::Halted {
            self.step()?;
            executed += 1;
        }
        Ok(executed)
    }

    // ========== Interrupt Inputs ==========

    /// Returns a thread-safe handle driving this CPU's interrupt lines.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle::new(Arc::clone(&self.lines))
    }

    /// Asserts the level-sensitive IRQ line.
    pub fn raise_irq(&mut self) {
        self.lines.raise_irq();
    }

    /// Releases the IRQ line.
    pub fn lower_irq(&mut self) {
        self.lines.lower_irq();
    }

    /// Latches an NMI edge, serviced at the next instruction boundary.
    pub fn raise_nmi(&mut self) {
        self.lines.raise_nmi();
    }

    /// Sets the V flag immediately, as the SO pin does.
    pub fn set_overflow(&mut self) {
        self.regs.flag_v = true;
    }

    /// Returns true while an NMI edge is latched and not yet serviced.
    pub fn nmi_pending(&self) -> bool {
        self.lines.nmi_pending()
    }

    /// Returns true while the IRQ line is asserted.
    pub fn irq_asserted(&self) -> bool {
        self.lines.irq_asserted()
    }

    /// Returns the current power state.
    pub fn power_state(&self) -> PowerState {
        self.power
    }

    /// Returns the configuration the CPU was built with.
    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    // ========== Register Getters ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.regs.a
    }

    pub fn x(&self) -> u8 {
        self.regs.x
    }

    pub fn y(&self) -> u8 {
        self.regs.y
    }

    /// Returns the program counter.
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    /// Returns the stack pointer (offset into page 0x0100).
    pub fn sp(&self) -> u8 {
        self.regs.sp
    }

    /// Returns the status register as a packed byte (NV1BDIZC).
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::{CPU, FlatMemory};
    ///
    /// let cpu = CPU::new(FlatMemory::new());
    /// // After reset: unused bit, I and Z set
    /// assert_eq!(cpu.status(), 0b0010_0110);
    /// ```
    pub fn status(&self) -> u8 {
        self.regs.status()
    }

    pub fn flag_n(&self) -> bool {
        self.regs.flag_n
    }

    pub fn flag_v(&self) -> bool {
        self.regs.flag_v
    }

    pub fn flag_b(&self) -> bool {
        self.regs.flag_b
    }

    pub fn flag_d(&self) -> bool {
        self.regs.flag_d
    }

    pub fn flag_i(&self) -> bool {
        self.regs.flag_i
    }

    pub fn flag_z(&self) -> bool {
        self.regs.flag_z
    }

    pub fn flag_c(&self) -> bool {
        self.regs.flag_c
    }

    /// Returns the full register state.
    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    /// Returns mutable access to the register state for debuggers and tests.
    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    // ========== Register Setters ==========

    pub fn set_a(&mut self, value: u8) {
        self.regs.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.regs.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.regs.y = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.regs.pc = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.regs.sp = value;
    }

    /// Replaces all flags from a packed status byte (bit 5 is ignored).
    pub fn set_status(&mut self, value: u8) {
        self.regs.set_status(value);
    }

    pub fn set_flag_n(&mut self, value: bool) {
        self.regs.flag_n = value;
    }

    pub fn set_flag_v(&mut self, value: bool) {
        self.regs.flag_v = value;
    }

    pub fn set_flag_b(&mut self, value: bool) {
        self.regs.flag_b = value;
    }

    pub fn set_flag_d(&mut self, value: bool) {
        self.regs.flag_d = value;
    }

    pub fn set_flag_i(&mut self, value: bool) {
        self.regs.flag_i = value;
    }

    pub fn set_flag_z(&mut self, value: bool) {
        self.regs.flag_z = value;
    }

    pub fn set_flag_c(&mut self, value: bool) {
        self.regs.flag_c = value;
    }

    // ========== Memory Access ==========

    /// Returns a reference to the memory bus.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Returns a mutable reference to the memory bus.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::{CPU, FlatMemory, MemoryBus};
    ///
    /// let mut cpu = CPU::new(FlatMemory::new());
    /// cpu.memory_mut().write(0x0200, 0x42);
    /// assert_eq!(cpu.memory_mut().read(0x0200), 0x42);
    /// ```
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Consumes the CPU and returns its memory bus.
    pub fn into_memory(self) -> M {
        self.memory
    }
}
