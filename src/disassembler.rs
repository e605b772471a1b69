//! 65C02 Disassembler Module
//!
//! Converts machine code into W65C02 assembly text. Decoding is driven entirely by
//! `OPCODE_TABLE`, so the disassembler and the CPU always agree on instruction widths.

pub mod decoder;
pub mod formatter;

pub use decoder::decode_instruction;
pub use formatter::{format_instruction, format_line};

use crate::addressing::AddressingMode;
use crate::opcodes::Operation;

/// A single disassembled instruction
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Memory address where this instruction starts
    pub address: u16,

    /// The opcode byte value (0x00-0xFF)
    pub opcode: u8,

    /// Instruction mnemonic (e.g., "LDA", "BBS3"), or ".byte" for data
    pub mnemonic: &'static str,

    /// Operation performed, `Operation::Undefined` for data bytes
    pub operation: Operation,

    /// Addressing mode used by this instruction
    pub addressing_mode: AddressingMode,

    /// Operand bytes (0-2 bytes depending on addressing mode)
    pub operand_bytes: Vec<u8>,

    /// Total size in bytes (1-3 bytes: opcode + operands)
    pub size_bytes: u8,
}

impl Instruction {
    /// A one-byte `.byte` directive for a reserved or truncated opcode.
    pub(crate) fn data_byte(address: u16, byte: u8) -> Self {
        Self {
            address,
            opcode: byte,
            mnemonic: ".byte",
            operation: Operation::Undefined,
            addressing_mode: AddressingMode::Implicit,
            operand_bytes: Vec::new(),
            size_bytes: 1,
        }
    }
}

/// Options controlling disassembly output
#[derive(Debug, Clone, Copy, Default)]
pub struct DisassemblyOptions {
    /// Address of the first byte (affects addresses and branch targets)
    pub start_address: u16,

    /// Whether `format_line` includes the address and raw bytes
    pub hex_dump: bool,
}

/// Disassemble a byte slice into a vector of instructions
///
/// Reserved opcodes, and instructions cut short by the end of `bytes`, become
/// one-byte `.byte` entries so that disassembly always makes progress.
///
/// # Arguments
///
/// * `bytes` - The machine code to disassemble
/// * `options` - Disassembly options
///
/// # Examples
///
/// ```
/// use lib65c02::{disassemble, format_instruction, DisassemblyOptions};
///
/// let code = [0xA9, 0x42, 0x0F, 0x12, 0xFD, 0xDB];
/// let options = DisassemblyOptions { start_address: 0x8000, ..Default::default() };
/// let text: Vec<String> = disassemble(&code, options).iter().map(format_instruction).collect();
///
/// assert_eq!(text, vec!["LDA #$42", "BBR0 $12,$8002", "STP"]);
/// ```
pub fn disassemble(bytes: &[u8], options: DisassemblyOptions) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut offset = 0;
    let mut address = options.start_address;

    while offset < bytes.len() {
        let instr = decode_instruction(&bytes[offset..], address)
            .unwrap_or_else(|| Instruction::data_byte(address, bytes[offset]));
        offset += instr.size_bytes as usize;
        address = address.wrapping_add(instr.size_bytes as u16);
        instructions.push(instr);
    }

    instructions
}
