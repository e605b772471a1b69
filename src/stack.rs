//! # Stack and Status Engine
//!
//! Push/pull of bytes, 16-bit addresses and the packed status byte. Every access
//! lands in page 1 (0x0100-0x01FF); the 8-bit stack pointer wraps silently in both
//! directions, so overflow and underflow are never signalled.

use crate::memory::MemoryBus;
use crate::registers::{Registers, StatusFlags};

/// Base address of the hardware stack page.
pub const STACK_BASE: u16 = 0x0100;

/// Writes `value` at the current stack slot, then decrements SP.
pub fn push_byte<M: MemoryBus + ?Sized>(regs: &mut Registers, bus: &mut M, value: u8) {
    bus.write(STACK_BASE | regs.sp as u16, value);
    regs.sp = regs.sp.wrapping_sub(1);
}

/// Increments SP, then reads the byte at the new stack slot.
pub fn pull_byte<M: MemoryBus + ?Sized>(regs: &mut Registers, bus: &mut M) -> u8 {
    regs.sp = regs.sp.wrapping_add(1);
    bus.read(STACK_BASE | regs.sp as u16)
}

/// Pushes a 16-bit value high byte first, so it pulls back low then high.
pub fn push_word<M: MemoryBus + ?Sized>(regs: &mut Registers, bus: &mut M, value: u16) {
    push_byte(regs, bus, (value >> 8) as u8);
    push_byte(regs, bus, value as u8);
}

pub fn pull_word<M: MemoryBus + ?Sized>(regs: &mut Registers, bus: &mut M) -> u16 {
    let lo = pull_byte(regs, bus) as u16;
    let hi = pull_byte(regs, bus) as u16;
    (hi << 8) | lo
}

/// Pushes the packed status with the Break and unused bits forced set.
pub fn push_status<M: MemoryBus + ?Sized>(regs: &mut Registers, bus: &mut M) {
    let status = regs.status_flags() | StatusFlags::BREAK | StatusFlags::UNUSED;
    push_byte(regs, bus, status.bits());
}

/// Pulls a status byte and replaces every flag from it.
pub fn pull_status<M: MemoryBus + ?Sized>(regs: &mut Registers, bus: &mut M) {
    let value = pull_byte(regs, bus);
    regs.set_status(value);
}
