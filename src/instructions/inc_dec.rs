//! # Increment and Decrement Instructions
//!
//! INC/DEC (accumulator or memory) and INX/INY/DEX/DEY. All wrap modulo 256 and
//! update only N and Z.

use crate::registers::Registers;

pub(crate) fn increment(regs: &mut Registers, value: u8) -> u8 {
    regs.set_nz(value.wrapping_add(1))
}

pub(crate) fn decrement(regs: &mut Registers, value: u8) -> u8 {
    regs.set_nz(value.wrapping_sub(1))
}

pub(crate) fn inx(regs: &mut Registers) {
    let value = regs.x;
    regs.x = increment(regs, value);
}

pub(crate) fn iny(regs: &mut Registers) {
    let value = regs.y;
    regs.y = increment(regs, value);
}

pub(crate) fn dex(regs: &mut Registers) {
    let value = regs.x;
    regs.x = decrement(regs, value);
}

pub(crate) fn dey(regs: &mut Registers) {
    let value = regs.y;
    regs.y = decrement(regs, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_wraps_to_zero() {
        let mut regs = Registers {
            x: 0xFF,
            ..Registers::default()
        };
        inx(&mut regs);
        assert_eq!(regs.x, 0x00);
        assert!(regs.flag_z);
    }

    #[test]
    fn test_decrement_wraps_to_ff() {
        let mut regs = Registers::default();
        dey(&mut regs);
        assert_eq!(regs.y, 0xFF);
        assert!(regs.flag_n);
        assert!(!regs.flag_z);
    }
}
