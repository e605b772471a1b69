//! # Interrupt Lines and Power States
//!
//! The 65C02 samples its interrupt inputs only at instruction boundaries:
//!
//! - **IRQ** is level-sensitive. It stays asserted until the source lowers it and is
//!   serviced at every boundary where the I flag is clear.
//! - **NMI** is edge-sensitive. Raising it latches one request, which is consumed
//!   exactly once when serviced. Raising it again while pending has no effect.
//! - **SO** (set overflow) sets the V flag at the next boundary.
//!
//! Lines are atomics behind an `Arc`, so a host can drive them from a device thread
//! through an `InterruptHandle` while another thread calls `CPU::step()`.
//!
//! ## Example
//!
//! ```
//! use lib65c02::{CPU, FlatMemory, MemoryBus};
//! use std::thread;
//!
//! let mut memory = FlatMemory::new();
//! memory.write(0xFFFC, 0x00);
//! memory.write(0xFFFD, 0x80);
//! memory.write(0xFFFA, 0x00); // NMI vector -> 0x9000
//! memory.write(0xFFFB, 0x90);
//! memory.write(0x8000, 0xEA); // NOP
//!
//! let mut cpu = CPU::new(memory);
//! let handle = cpu.interrupt_handle();
//!
//! thread::spawn(move || handle.raise_nmi()).join().unwrap();
//!
//! cpu.step().unwrap();
//! assert_eq!(cpu.pc(), 0x9000);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::memory::{read_word, MemoryBus};
use crate::registers::Registers;
use crate::stack;

/// Execution state of the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerState {
    /// Fetching and executing instructions.
    #[default]
    Running,
    /// Waiting for an interrupt after WAI. No instructions are fetched.
    Suspended,
    /// Stopped by STP. Only a reset resumes execution.
    Halted,
}

/// Shared interrupt inputs sampled by the CPU at instruction boundaries.
#[derive(Debug, Default)]
pub(crate) struct InterruptLines {
    irq: AtomicBool,
    nmi: AtomicBool,
    so: AtomicBool,
}

impl InterruptLines {
    pub(crate) fn raise_irq(&self) {
        self.irq.store(true, Ordering::Release);
    }

    pub(crate) fn lower_irq(&self) {
        self.irq.store(false, Ordering::Release);
    }

    pub(crate) fn raise_nmi(&self) {
        self.nmi.store(true, Ordering::Release);
    }

    pub(crate) fn request_overflow(&self) {
        self.so.store(true, Ordering::Release);
    }

    pub(crate) fn irq_asserted(&self) -> bool {
        self.irq.load(Ordering::Acquire)
    }

    pub(crate) fn nmi_pending(&self) -> bool {
        self.nmi.load(Ordering::Acquire)
    }

    /// Consumes the latched NMI edge, returning whether one was pending.
    pub(crate) fn take_nmi(&self) -> bool {
        self.nmi.swap(false, Ordering::AcqRel)
    }

    /// Consumes a pending SO request.
    pub(crate) fn take_overflow(&self) -> bool {
        self.so.swap(false, Ordering::AcqRel)
    }
}

/// Cloneable, thread-safe handle for driving a CPU's interrupt inputs.
///
/// Obtained from `CPU::interrupt_handle()`. All clones drive the same lines.
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    lines: Arc<InterruptLines>,
}

impl InterruptHandle {
    pub(crate) fn new(lines: Arc<InterruptLines>) -> Self {
        Self { lines }
    }

    /// Asserts the level-sensitive IRQ line.
    pub fn raise_irq(&self) {
        self.lines.raise_irq();
    }

    /// Releases the IRQ line.
    pub fn lower_irq(&self) {
        self.lines.lower_irq();
    }

    /// Latches an NMI edge. Idempotent while a request is already pending.
    pub fn raise_nmi(&self) {
        self.lines.raise_nmi();
    }

    /// Requests that the V flag be set at the next instruction boundary.
    pub fn set_overflow(&self) {
        self.lines.request_overflow();
    }

    /// Returns true while the IRQ line is asserted.
    pub fn irq_asserted(&self) -> bool {
        self.lines.irq_asserted()
    }

    /// Returns true while an NMI edge is latched and not yet serviced.
    pub fn nmi_pending(&self) -> bool {
        self.lines.nmi_pending()
    }
}

/// Performs the interrupt entry sequence.
///
/// Leaves the Suspended state, pushes PC and status (Break and unused forced set on
/// the stack), clears D, sets I and loads PC from `vector`.
pub(crate) fn enter_interrupt<M: MemoryBus>(
    regs: &mut Registers,
    power: &mut PowerState,
    bus: &mut M,
    vector: u16,
) {
    if *power == PowerState::Suspended {
        *power = PowerState::Running;
    }
    let return_address = regs.pc;
    stack::push_word(regs, bus, return_address);
    stack::push_status(regs, bus);
    regs.flag_d = false;
    regs.flag_i = true;
    regs.pc = read_word(bus, vector);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::FlatMemory;

    #[test]
    fn test_nmi_is_consumed_once() {
        let lines = Arc::new(InterruptLines::default());
        let handle = InterruptHandle::new(Arc::clone(&lines));
        handle.raise_nmi();
        handle.raise_nmi();
        assert!(lines.take_nmi());
        assert!(!lines.take_nmi());
    }

    #[test]
    fn test_irq_is_level_sensitive() {
        let lines = Arc::new(InterruptLines::default());
        let handle = InterruptHandle::new(Arc::clone(&lines));
        handle.raise_irq();
        assert!(lines.irq_asserted());
        assert!(lines.irq_asserted());
        handle.lower_irq();
        assert!(!lines.irq_asserted());
    }

    #[test]
    fn test_lines_and_handle_share_state() {
        let lines = Arc::new(InterruptLines::default());
        let handle = InterruptHandle::new(Arc::clone(&lines));
        lines.raise_irq();
        lines.raise_nmi();
        assert!(handle.irq_asserted());
        assert!(handle.nmi_pending());
        lines.lower_irq();
        assert!(!handle.irq_asserted());
        lines.request_overflow();
        assert!(lines.take_overflow());
        assert!(!lines.take_overflow());
    }

    #[test]
    fn test_handle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InterruptHandle>();
    }

    #[test]
    fn test_enter_interrupt_sequence() {
        let mut mem = FlatMemory::new();
        mem.write(0xFFFE, 0x00);
        mem.write(0xFFFF, 0x20);
        let mut regs = Registers {
            pc: 0x1234,
            sp: 0xFF,
            flag_d: true,
            ..Registers::default()
        };
        let mut power = PowerState::Suspended;

        enter_interrupt(&mut regs, &mut power, &mut mem, 0xFFFE);

        assert_eq!(power, PowerState::Running);
        assert_eq!(regs.pc, 0x2000);
        assert_eq!(regs.sp, 0xFC);
        assert_eq!(mem.peek(0x01FF), 0x12);
        assert_eq!(mem.peek(0x01FE), 0x34);
        assert_eq!(mem.peek(0x01FD), 0x38);
        assert!(!regs.flag_d);
        assert!(regs.flag_i);
    }
}
