//! # Shift and Rotate Instructions
//!
//! ASL, LSR, ROL and ROR on either the accumulator or a memory byte. Each function
//! returns the shifted value and leaves storing it to the caller. The bit shifted
//! out becomes C; N and Z come from the result.

use crate::registers::Registers;

pub(crate) fn asl(regs: &mut Registers, value: u8) -> u8 {
    regs.flag_c = value & 0x80 != 0;
    regs.set_nz(value << 1)
}

/// Logical shift right. Bit 7 is always cleared, so N ends up false.
pub(crate) fn lsr(regs: &mut Registers, value: u8) -> u8 {
    regs.flag_c = value & 0x01 != 0;
    regs.set_nz(value >> 1)
}

pub(crate) fn rol(regs: &mut Registers, value: u8) -> u8 {
    let carry_in = regs.flag_c as u8;
    regs.flag_c = value & 0x80 != 0;
    regs.set_nz((value << 1) | carry_in)
}

pub(crate) fn ror(regs: &mut Registers, value: u8) -> u8 {
    let carry_in = (regs.flag_c as u8) << 7;
    regs.flag_c = value & 0x01 != 0;
    regs.set_nz((value >> 1) | carry_in)
}
