//! Instruction decoder for the 65C02 disassembler

use crate::disassembler::Instruction;
use crate::opcodes::OPCODE_TABLE;

/// Decode a single instruction from a byte slice
///
/// # Arguments
///
/// * `bytes` - The byte slice starting at the instruction to decode
/// * `address` - The memory address of this instruction
///
/// # Returns
///
/// `None` for reserved opcodes, an empty slice, or too few bytes for the full
/// instruction.
pub fn decode_instruction(bytes: &[u8], address: u16) -> Option<Instruction> {
    let (&opcode, rest) = bytes.split_first()?;
    let metadata = &OPCODE_TABLE[opcode as usize];

    if metadata.is_undefined() {
        return None;
    }

    let operand_len = metadata.addressing_mode.operand_bytes() as usize;
    let operand_bytes = rest.get(..operand_len)?.to_vec();

    Some(Instruction {
        address,
        opcode,
        mnemonic: metadata.mnemonic,
        operation: metadata.operation,
        addressing_mode: metadata.addressing_mode,
        operand_bytes,
        size_bytes: metadata.size_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::AddressingMode;
    use crate::opcodes::Operation;

    #[test]
    fn test_decode_lda_immediate() {
        let instr = decode_instruction(&[0xA9, 0x42], 0x8000).unwrap();

        assert_eq!(instr.address, 0x8000);
        assert_eq!(instr.opcode, 0xA9);
        assert_eq!(instr.mnemonic, "LDA");
        assert_eq!(instr.addressing_mode, AddressingMode::Immediate);
        assert_eq!(instr.operand_bytes, vec![0x42]);
        assert_eq!(instr.size_bytes, 2);
    }

    #[test]
    fn test_decode_rockwell_branch() {
        let instr = decode_instruction(&[0xFF, 0x80, 0x10], 0x0400).unwrap();

        assert_eq!(instr.mnemonic, "BBS7");
        assert_eq!(instr.operation, Operation::Bbs(7));
        assert_eq!(instr.addressing_mode, AddressingMode::ZeroPageRelative);
        assert_eq!(instr.operand_bytes, vec![0x80, 0x10]);
        assert_eq!(instr.size_bytes, 3);
    }

    #[test]
    fn test_decode_reserved_and_short_input() {
        assert!(decode_instruction(&[0x03], 0).is_none());
        assert!(decode_instruction(&[0x4C, 0x00], 0).is_none());
        assert!(decode_instruction(&[], 0).is_none());
    }
}
