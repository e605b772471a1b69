//! # Branch Instructions
//!
//! This module implements the relative branches:
//! - BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS: branch on a flag
//! - BRA: branch always
//!
//! The resolver has already read the displacement and advanced PC past it, so a
//! taken branch simply replaces PC with the computed target.

use crate::opcodes::Operation;
use crate::registers::Registers;

/// Returns whether the branch `operation` is taken with the current flags.
///
/// Non-branch operations are never taken.
pub(crate) fn condition(operation: Operation, regs: &Registers) -> bool {
    match operation {
        Operation::Bcc => !regs.flag_c,
        Operation::Bcs => regs.flag_c,
        Operation::Beq => regs.flag_z,
        Operation::Bne => !regs.flag_z,
        Operation::Bmi => regs.flag_n,
        Operation::Bpl => !regs.flag_n,
        Operation::Bvc => !regs.flag_v,
        Operation::Bvs => regs.flag_v,
        Operation::Bra => true,
        _ => false,
    }
}

/// Moves PC to `target` when `taken`. No flags are affected.
pub(crate) fn branch(regs: &mut Registers, target: u16, taken: bool) {
    if taken {
        regs.pc = target;
    }
}
