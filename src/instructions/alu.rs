//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic and logical operations:
//! - ADC: Add with Carry (binary and decimal)
//! - SBC: Subtract with Carry (binary and decimal)
//! - AND, ORA, EOR: Logical operations on the accumulator
//! - CMP, CPX, CPY: Register comparison
//! - BIT: Bit test
//!
//! Decimal mode uses nibble correction: a low nibble above 9 is adjusted by 6 before
//! the high nibbles are combined, and a combined value above 0x9F is adjusted by 0x60,
//! which produces the carry. On the 65C02, N and Z reflect the corrected result.

use crate::registers::Registers;

/// Executes ADC, dispatching on the Decimal flag.
///
/// # Arguments
///
/// * `regs` - Register state; A, N, V, Z and C are updated
/// * `value` - The resolved operand byte
pub(crate) fn adc(regs: &mut Registers, value: u8) {
    if regs.flag_d {
        adc_decimal(regs, value);
    } else {
        adc_binary(regs, value);
    }
}

/// Executes SBC, dispatching on the Decimal flag.
pub(crate) fn sbc(regs: &mut Registers, value: u8) {
    if regs.flag_d {
        sbc_decimal(regs, value);
    } else {
        // Binary subtraction is addition of the one's complement
        adc_binary(regs, !value);
    }
}

fn adc_binary(regs: &mut Registers, value: u8) {
    let a = regs.a;
    let sum = a as u16 + value as u16 + regs.flag_c as u16;
    let result = sum as u8;

    regs.flag_c = sum > 0xFF;
    // Both operands share a sign that the result does not
    regs.flag_v = ((a ^ result) & (value ^ result) & 0x80) != 0;
    regs.a = regs.set_nz(result);
}

fn adc_decimal(regs: &mut Registers, value: u8) {
    let a = regs.a as u16;
    let v = value as u16;

    let mut lo = (a & 0x0F) + (v & 0x0F) + regs.flag_c as u16;
    if lo > 0x09 {
        lo += 0x06;
    }
    let mut sum = (a & 0xF0) + (v & 0xF0) + lo;

    // Overflow is taken before the high-nibble correction
    regs.flag_v = (!(a ^ v) & (a ^ sum) & 0x80) != 0;

    if sum > 0x9F {
        sum += 0x60;
    }
    regs.flag_c = sum > 0xFF;
    regs.a = regs.set_nz(sum as u8);
}

fn sbc_decimal(regs: &mut Registers, value: u8) {
    let a = regs.a as i16;
    let v = value as i16;
    let borrow = 1 - regs.flag_c as i16;

    let lo = (a & 0x0F) - (v & 0x0F) - borrow;
    let binary = a - v - borrow;

    let mut result = binary;
    if binary < 0 {
        result -= 0x60;
    }
    if lo < 0 {
        result -= 0x06;
    }

    // C and V follow the binary subtraction
    regs.flag_c = binary >= 0;
    regs.flag_v = ((a ^ v) & (a ^ binary) & 0x80) != 0;
    regs.a = regs.set_nz(result as u8);
}

/// Compares `register` against `value` (CMP/CPX/CPY).
///
/// C is set when `register >= value`; N and Z come from the truncated difference.
/// No register is modified.
pub(crate) fn compare(regs: &mut Registers, register: u8, value: u8) {
    regs.flag_c = register >= value;
    regs.set_nz(register.wrapping_sub(value));
}

pub(crate) fn and(regs: &mut Registers, value: u8) {
    regs.a = regs.set_nz(regs.a & value);
}

pub(crate) fn ora(regs: &mut Registers, value: u8) {
    regs.a = regs.set_nz(regs.a | value);
}

pub(crate) fn eor(regs: &mut Registers, value: u8) {
    regs.a = regs.set_nz(regs.a ^ value);
}

/// Executes BIT.
///
/// Z is set from `A & value`. Except in the immediate form, bits 7 and 6 of the
/// operand are also copied into N and V.
pub(crate) fn bit(regs: &mut Registers, value: u8, immediate: bool) {
    regs.flag_z = regs.a & value == 0;
    if !immediate {
        regs.flag_n = value & 0x80 != 0;
        regs.flag_v = value & 0x40 != 0;
    }
}
