//! # Control Flow Instructions
//!
//! This module implements control flow operations:
//! - BRK: Software interrupt through the IRQ vector
//! - JMP: Jump (absolute, indirect, indexed indirect)
//! - JSR / RTS: Subroutine call and return
//! - RTI: Return from interrupt
//!
//! JSR pushes the address of its own last byte, and RTS adds one to the pulled
//! address. BRK skips a signature byte, so the stacked return address is the BRK
//! address plus two.

use crate::interrupts::{enter_interrupt, PowerState};
use crate::memory::MemoryBus;
use crate::registers::Registers;
use crate::stack;
use crate::IRQ_VECTOR;

/// Executes BRK.
///
/// Skips the signature byte, sets the Break indicator and vectors through the
/// IRQ vector like a hardware interrupt. Not subject to the I flag.
///
/// # Arguments
///
/// * `regs` - Register state, PC pointing just past the BRK opcode
/// * `power` - Power state
/// * `bus` - Memory bus used for the stack and the vector
pub(crate) fn brk<M: MemoryBus>(regs: &mut Registers, power: &mut PowerState, bus: &mut M) {
    regs.pc = regs.pc.wrapping_add(1);
    regs.flag_b = true;
    enter_interrupt(regs, power, bus, IRQ_VECTOR);
}

/// Executes JSR to `target`. PC already points past the operand.
pub(crate) fn jsr<M: MemoryBus>(regs: &mut Registers, bus: &mut M, target: u16) {
    let last_byte = regs.pc.wrapping_sub(1);
    stack::push_word(regs, bus, last_byte);
    regs.pc = target;
}

pub(crate) fn rts<M: MemoryBus>(regs: &mut Registers, bus: &mut M) {
    regs.pc = stack::pull_word(regs, bus).wrapping_add(1);
}

/// Executes RTI: status first (including the Break bit), then PC.
pub(crate) fn rti<M: MemoryBus>(regs: &mut Registers, bus: &mut M) {
    stack::pull_status(regs, bus);
    regs.pc = stack::pull_word(regs, bus);
}

pub(crate) fn jmp(regs: &mut Registers, target: u16) {
    regs.pc = target;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::FlatMemory;

    #[test]
    fn test_jsr_rts_round_trip() {
        let mut mem = FlatMemory::new();
        // JSR at 0x0600 leaves PC at 0x0603 after operand fetch
        let mut regs = Registers {
            pc: 0x0603,
            sp: 0xFF,
            ..Registers::default()
        };
        jsr(&mut regs, &mut mem, 0x1000);
        assert_eq!(regs.pc, 0x1000);
        assert_eq!(mem.peek(0x01FF), 0x06);
        assert_eq!(mem.peek(0x01FE), 0x02);

        rts(&mut regs, &mut mem);
        assert_eq!(regs.pc, 0x0603);
        assert_eq!(regs.sp, 0xFF);
    }

    #[test]
    fn test_rti_restores_status_then_pc() {
        let mut mem = FlatMemory::new();
        let mut regs = Registers {
            sp: 0xFC,
            ..Registers::default()
        };
        mem.write(0x01FD, 0xD3);
        mem.write(0x01FE, 0x34);
        mem.write(0x01FF, 0x12);

        rti(&mut regs, &mut mem);
        assert_eq!(regs.pc, 0x1234);
        assert_eq!(regs.sp, 0xFF);
        assert!(regs.flag_n);
        assert!(regs.flag_v);
        assert!(regs.flag_b);
        assert!(regs.flag_z);
        assert!(regs.flag_c);
        assert!(!regs.flag_i);
    }
}
