//! # Bit Manipulation Instructions
//!
//! - TRB / TSB: test and reset/set memory bits against A
//! - RMBn / SMBn: reset/set bit n of a zero page byte (no flags)
//! - BBRn / BBSn: branch on bit n of a zero page byte reset/set

use crate::registers::Registers;

/// TRB: Z from `A & memory`, returns memory with A's bits cleared.
pub(crate) fn trb(regs: &mut Registers, value: u8) -> u8 {
    regs.flag_z = regs.a & value == 0;
    value & !regs.a
}

/// TSB: Z from `A & memory`, returns memory with A's bits set.
pub(crate) fn tsb(regs: &mut Registers, value: u8) -> u8 {
    regs.flag_z = regs.a & value == 0;
    value | regs.a
}

pub(crate) const fn reset_bit(value: u8, bit: u8) -> u8 {
    value & !(1 << bit)
}

pub(crate) const fn set_bit(value: u8, bit: u8) -> u8 {
    value | (1 << bit)
}

pub(crate) const fn bit_is_set(value: u8, bit: u8) -> bool {
    value & (1 << bit) != 0
}
