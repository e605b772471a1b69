//! Formatting functions for disassembled instructions

use std::fmt::Write;

use crate::addressing::AddressingMode;
use crate::disassembler::{DisassemblyOptions, Instruction};

/// Format a single instruction as assembly text
///
/// # Arguments
///
/// * `instr` - The instruction to format
///
/// # Returns
///
/// A string containing the formatted assembly instruction, e.g. `"LDA ($40),Y"`
pub fn format_instruction(instr: &Instruction) -> String {
    let operand = format_operand(instr);

    if operand.is_empty() {
        instr.mnemonic.to_string()
    } else {
        format!("{} {}", instr.mnemonic, operand)
    }
}

/// Format an instruction as a listing line.
///
/// With `hex_dump` set the line is prefixed with the address and raw bytes:
/// `8000  A9 42     LDA #$42`.
pub fn format_line(instr: &Instruction, options: &DisassemblyOptions) -> String {
    let text = format_instruction(instr);
    if !options.hex_dump {
        return text;
    }

    let mut bytes = format!("{:02X}", instr.opcode);
    for byte in &instr.operand_bytes {
        // Writing to a String cannot fail
        let _ = write!(bytes, " {:02X}", byte);
    }
    format!("{:04X}  {:<8}  {}", instr.address, bytes, text)
}

fn byte_operand(instr: &Instruction) -> u8 {
    instr.operand_bytes.first().copied().unwrap_or(0)
}

fn word_operand(instr: &Instruction) -> u16 {
    match instr.operand_bytes.as_slice() {
        [lo, hi, ..] => u16::from_le_bytes([*lo, *hi]),
        [lo] => *lo as u16,
        [] => 0,
    }
}

/// Branch target for a displacement that follows an instruction of `size` bytes.
fn branch_target(instr: &Instruction, displacement: u8) -> u16 {
    instr
        .address
        .wrapping_add(instr.size_bytes as u16)
        .wrapping_add_signed(displacement as i8 as i16)
}

/// Format the operand based on addressing mode
fn format_operand(instr: &Instruction) -> String {
    use AddressingMode::*;

    // Data directive for reserved opcodes
    if instr.mnemonic == ".byte" {
        return format!("${:02X}", instr.opcode);
    }

    match instr.addressing_mode {
        Implicit => String::new(),
        Accumulator => "A".to_string(),
        Immediate => format!("#${:02X}", byte_operand(instr)),
        Relative => format!("${:04X}", branch_target(instr, byte_operand(instr))),
        ZeroPageRelative => {
            let displacement = instr.operand_bytes.get(1).copied().unwrap_or(0);
            format!(
                "${:02X},${:04X}",
                byte_operand(instr),
                branch_target(instr, displacement)
            )
        }
        ZeroPage => format!("${:02X}", byte_operand(instr)),
        ZeroPageX => format!("${:02X},X", byte_operand(instr)),
        ZeroPageY => format!("${:02X},Y", byte_operand(instr)),
        ZeroPageIndirect => format!("(${:02X})", byte_operand(instr)),
        ZeroPageIndirectX => format!("(${:02X},X)", byte_operand(instr)),
        ZeroPageIndirectY => format!("(${:02X}),Y", byte_operand(instr)),
        Absolute => format!("${:04X}", word_operand(instr)),
        AbsoluteX => format!("${:04X},X", word_operand(instr)),
        AbsoluteY => format!("${:04X},Y", word_operand(instr)),
        AbsoluteIndirect => format!("(${:04X})", word_operand(instr)),
        AbsoluteIndirectX => format!("(${:04X},X)", word_operand(instr)),
    }
}
