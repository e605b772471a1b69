//! # Load and Store Instructions
//!
//! LDA, LDX, LDY copy the operand into a register and update N and Z (never C or V).
//! STA, STX, STY, STZ write a register (or zero) to memory and affect no flags.

use crate::opcodes::Operation;
use crate::registers::Registers;

pub(crate) fn execute_load(operation: Operation, regs: &mut Registers, value: u8) {
    match operation {
        Operation::Lda => regs.a = regs.set_nz(value),
        Operation::Ldx => regs.x = regs.set_nz(value),
        Operation::Ldy => regs.y = regs.set_nz(value),
        _ => {}
    }
}

/// Returns the byte a store operation writes.
pub(crate) fn store_value(operation: Operation, regs: &Registers) -> u8 {
    match operation {
        Operation::Sta => regs.a,
        Operation::Stx => regs.x,
        Operation::Sty => regs.y,
        _ => 0x00,
    }
}
