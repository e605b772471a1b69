//! # Opcode Metadata Table
//!
//! This module contains the complete 256-entry opcode table that serves as the
//! single source of truth for 65C02 instruction decoding.
//!
//! The table covers:
//! - **The full WDC W65C02 instruction set**, including the Rockwell bit
//!   instructions (RMBn, SMBn, BBRn, BBSn) and WAI/STP
//! - **Reserved opcodes** - marked with "???" and `Operation::Undefined`, carrying the
//!   operand width the silicon actually consumes when it treats them as NOPs
//!
//! Each entry pairs an `Operation` with an `AddressingMode`. The dispatcher and the
//! disassembler both decode from this table; neither branches on raw opcode values.

use crate::addressing::AddressingMode;

/// What an instruction does, independent of how it addresses its operand.
///
/// The bit-numbered Rockwell instructions carry their bit index (0-7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Adc,
    And,
    Asl,
    Bbr(u8),
    Bbs(u8),
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Bra,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Phx,
    Phy,
    Pla,
    Plp,
    Plx,
    Ply,
    Rmb(u8),
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Smb(u8),
    Sta,
    Stp,
    Stx,
    Sty,
    Stz,
    Tax,
    Tay,
    Trb,
    Tsb,
    Tsx,
    Txa,
    Txs,
    Tya,
    Wai,
    /// Reserved opcode; behavior is selected by `UndefinedOpcodePolicy`.
    Undefined,
}

/// Metadata for a single 65C02 opcode.
///
/// # Fields
///
/// - `mnemonic`: Instruction name (e.g., "LDA", "BBR3", "???")
/// - `operation`: The operation performed
/// - `addressing_mode`: How the instruction interprets operand bytes
/// - `size_bytes`: Total instruction size including opcode and operands (1-3 bytes)
///
/// # Examples
///
/// ```
/// use lib65c02::{OPCODE_TABLE, AddressingMode, Operation};
///
/// let lda_zpi = &OPCODE_TABLE[0xB2];
/// assert_eq!(lda_zpi.mnemonic, "LDA");
/// assert_eq!(lda_zpi.operation, Operation::Lda);
/// assert_eq!(lda_zpi.addressing_mode, AddressingMode::ZeroPageIndirect);
/// assert_eq!(lda_zpi.size_bytes, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Instruction mnemonic ("???" for reserved opcodes).
    pub mnemonic: &'static str,

    /// Operation performed by this opcode.
    pub operation: Operation,

    /// Addressing mode for this instruction.
    pub addressing_mode: AddressingMode,

    /// Total instruction size in bytes (opcode + operands).
    pub size_bytes: u8,
}

impl OpcodeMetadata {
    /// Returns true for reserved opcodes.
    pub const fn is_undefined(&self) -> bool {
        matches!(self.operation, Operation::Undefined)
    }
}

const fn op(mnemonic: &'static str, operation: Operation, mode: AddressingMode) -> OpcodeMetadata {
    OpcodeMetadata {
        mnemonic,
        operation,
        addressing_mode: mode,
        size_bytes: 1 + mode.operand_bytes(),
    }
}

const fn reserved(mode: AddressingMode) -> OpcodeMetadata {
    op("???", Operation::Undefined, mode)
}

use AddressingMode::{
    Absolute as Abs, AbsoluteIndirect as Ind, AbsoluteIndirectX as IndX, AbsoluteX as AbsX,
    AbsoluteY as AbsY, Accumulator as Acc, Immediate as Imm, Implicit as Imp, Relative as Rel,
    ZeroPage as Zp, ZeroPageIndirect as ZpInd, ZeroPageIndirectX as ZpIndX,
    ZeroPageIndirectY as ZpIndY, ZeroPageRelative as ZpRel, ZeroPageX as ZpX, ZeroPageY as ZpY,
};
use Operation::*;

/// Complete 256-entry opcode table indexed by opcode byte value.
///
/// # Examples
///
/// ```
/// use lib65c02::{OPCODE_TABLE, Operation};
///
/// assert_eq!(OPCODE_TABLE[0x0F].operation, Operation::Bbr(0));
/// assert_eq!(OPCODE_TABLE[0xDB].mnemonic, "STP");
///
/// // Reserved opcodes keep the width the hardware consumes
/// assert!(OPCODE_TABLE[0x5C].is_undefined());
/// assert_eq!(OPCODE_TABLE[0x5C].size_bytes, 3);
/// ```
pub const OPCODE_TABLE: [OpcodeMetadata; 256] = [
    op("BRK", Brk, Imp),          // 0x00
    op("ORA", Ora, ZpIndX),       // 0x01
    reserved(Imm),                // 0x02
    reserved(Imp),                // 0x03
    op("TSB", Tsb, Zp),           // 0x04
    op("ORA", Ora, Zp),           // 0x05
    op("ASL", Asl, Zp),           // 0x06
    op("RMB0", Rmb(0), Zp),       // 0x07
    op("PHP", Php, Imp),          // 0x08
    op("ORA", Ora, Imm),          // 0x09
    op("ASL", Asl, Acc),          // 0x0A
    reserved(Imp),                // 0x0B
    op("TSB", Tsb, Abs),          // 0x0C
    op("ORA", Ora, Abs),          // 0x0D
    op("ASL", Asl, Abs),          // 0x0E
    op("BBR0", Bbr(0), ZpRel),    // 0x0F
    op("BPL", Bpl, Rel),          // 0x10
    op("ORA", Ora, ZpIndY),       // 0x11
    op("ORA", Ora, ZpInd),        // 0x12
    reserved(Imp),                // 0x13
    op("TRB", Trb, Zp),           // 0x14
    op("ORA", Ora, ZpX),          // 0x15
    op("ASL", Asl, ZpX),          // 0x16
    op("RMB1", Rmb(1), Zp),       // 0x17
    op("CLC", Clc, Imp),          // 0x18
    op("ORA", Ora, AbsY),         // 0x19
    op("INC", Inc, Acc),          // 0x1A
    reserved(Imp),                // 0x1B
    op("TRB", Trb, Abs),          // 0x1C
    op("ORA", Ora, AbsX),         // 0x1D
    op("ASL", Asl, AbsX),         // 0x1E
    op("BBR1", Bbr(1), ZpRel),    // 0x1F
    op("JSR", Jsr, Abs),          // 0x20
    op("AND", And, ZpIndX),       // 0x21
    reserved(Imm),                // 0x22
    reserved(Imp),                // 0x23
    op("BIT", Bit, Zp),           // 0x24
    op("AND", And, Zp),           // 0x25
    op("ROL", Rol, Zp),           // 0x26
    op("RMB2", Rmb(2), Zp),       // 0x27
    op("PLP", Plp, Imp),          // 0x28
    op("AND", And, Imm),          // 0x29
    op("ROL", Rol, Acc),          // 0x2A
    reserved(Imp),                // 0x2B
    op("BIT", Bit, Abs),          // 0x2C
    op("AND", And, Abs),          // 0x2D
    op("ROL", Rol, Abs),          // 0x2E
    op("BBR2", Bbr(2), ZpRel),    // 0x2F
    op("BMI", Bmi, Rel),          // 0x30
    op("AND", And, ZpIndY),       // 0x31
    op("AND", And, ZpInd),        // 0x32
    reserved(Imp),                // 0x33
    op("BIT", Bit, ZpX),          // 0x34
    op("AND", And, ZpX),          // 0x35
    op("ROL", Rol, ZpX),          // 0x36
    op("RMB3", Rmb(3), Zp),       // 0x37
    op("SEC", Sec, Imp),          // 0x38
    op("AND", And, AbsY),         // 0x39
    op("DEC", Dec, Acc),          // 0x3A
    reserved(Imp),                // 0x3B
    op("BIT", Bit, AbsX),         // 0x3C
    op("AND", And, AbsX),         // 0x3D
    op("ROL", Rol, AbsX),         // 0x3E
    op("BBR3", Bbr(3), ZpRel),    // 0x3F
    op("RTI", Rti, Imp),          // 0x40
    op("EOR", Eor, ZpIndX),       // 0x41
    reserved(Imm),                // 0x42
    reserved(Imp),                // 0x43
    reserved(Zp),                 // 0x44
    op("EOR", Eor, Zp),           // 0x45
    op("LSR", Lsr, Zp),           // 0x46
    op("RMB4", Rmb(4), Zp),       // 0x47
    op("PHA", Pha, Imp),          // 0x48
    op("EOR", Eor, Imm),          // 0x49
    op("LSR", Lsr, Acc),          // 0x4A
    reserved(Imp),                // 0x4B
    op("JMP", Jmp, Abs),          // 0x4C
    op("EOR", Eor, Abs),          // 0x4D
    op("LSR", Lsr, Abs),          // 0x4E
    op("BBR4", Bbr(4), ZpRel),    // 0x4F
    op("BVC", Bvc, Rel),          // 0x50
    op("EOR", Eor, ZpIndY),       // 0x51
    op("EOR", Eor, ZpInd),        // 0x52
    reserved(Imp),                // 0x53
    reserved(ZpX),                // 0x54
    op("EOR", Eor, ZpX),          // 0x55
    op("LSR", Lsr, ZpX),          // 0x56
    op("RMB5", Rmb(5), Zp),       // 0x57
    op("CLI", Cli, Imp),          // 0x58
    op("EOR", Eor, AbsY),         // 0x59
    op("PHY", Phy, Imp),          // 0x5A
    reserved(Imp),                // 0x5B
    reserved(Abs),                // 0x5C
    op("EOR", Eor, AbsX),         // 0x5D
    op("LSR", Lsr, AbsX),         // 0x5E
    op("BBR5", Bbr(5), ZpRel),    // 0x5F
    op("RTS", Rts, Imp),          // 0x60
    op("ADC", Adc, ZpIndX),       // 0x61
    reserved(Imm),                // 0x62
    reserved(Imp),                // 0x63
    op("STZ", Stz, Zp),           // 0x64
    op("ADC", Adc, Zp),           // 0x65
    op("ROR", Ror, Zp),           // 0x66
    op("RMB6", Rmb(6), Zp),       // 0x67
    op("PLA", Pla, Imp),          // 0x68
    op("ADC", Adc, Imm),          // 0x69
    op("ROR", Ror, Acc),          // 0x6A
    reserved(Imp),                // 0x6B
    op("JMP", Jmp, Ind),          // 0x6C
    op("ADC", Adc, Abs),          // 0x6D
    op("ROR", Ror, Abs),          // 0x6E
    op("BBR6", Bbr(6), ZpRel),    // 0x6F
    op("BVS", Bvs, Rel),          // 0x70
    op("ADC", Adc, ZpIndY),       // 0x71
    op("ADC", Adc, ZpInd),        // 0x72
    reserved(Imp),                // 0x73
    op("STZ", Stz, ZpX),          // 0x74
    op("ADC", Adc, ZpX),          // 0x75
    op("ROR", Ror, ZpX),          // 0x76
    op("RMB7", Rmb(7), Zp),       // 0x77
    op("SEI", Sei, Imp),          // 0x78
    op("ADC", Adc, AbsY),         // 0x79
    op("PLY", Ply, Imp),          // 0x7A
    reserved(Imp),                // 0x7B
    op("JMP", Jmp, IndX),         // 0x7C
    op("ADC", Adc, AbsX),         // 0x7D
    op("ROR", Ror, AbsX),         // 0x7E
    op("BBR7", Bbr(7), ZpRel),    // 0x7F
    op("BRA", Bra, Rel),          // 0x80
    op("STA", Sta, ZpIndX),       // 0x81
    reserved(Imm),                // 0x82
    reserved(Imp),                // 0x83
    op("STY", Sty, Zp),           // 0x84
    op("STA", Sta, Zp),           // 0x85
    op("STX", Stx, Zp),           // 0x86
    op("SMB0", Smb(0), Zp),       // 0x87
    op("DEY", Dey, Imp),          // 0x88
    op("BIT", Bit, Imm),          // 0x89
    op("TXA", Txa, Imp),          // 0x8A
    reserved(Imp),                // 0x8B
    op("STY", Sty, Abs),          // 0x8C
    op("STA", Sta, Abs),          // 0x8D
    op("STX", Stx, Abs),          // 0x8E
    op("BBS0", Bbs(0), ZpRel),    // 0x8F
    op("BCC", Bcc, Rel),          // 0x90
    op("STA", Sta, ZpIndY),       // 0x91
    op("STA", Sta, ZpInd),        // 0x92
    reserved(Imp),                // 0x93
    op("STY", Sty, ZpX),          // 0x94
    op("STA", Sta, ZpX),          // 0x95
    op("STX", Stx, ZpY),          // 0x96
    op("SMB1", Smb(1), Zp),       // 0x97
    op("TYA", Tya, Imp),          // 0x98
    op("STA", Sta, AbsY),         // 0x99
    op("TXS", Txs, Imp),          // 0x9A
    reserved(Imp),                // 0x9B
    op("STZ", Stz, Abs),          // 0x9C
    op("STA", Sta, AbsX),         // 0x9D
    op("STZ", Stz, AbsX),         // 0x9E
    op("BBS1", Bbs(1), ZpRel),    // 0x9F
    op("LDY", Ldy, Imm),          // 0xA0
    op("LDA", Lda, ZpIndX),       // 0xA1
    op("LDX", Ldx, Imm),          // 0xA2
    reserved(Imp),                // 0xA3
    op("LDY", Ldy, Zp),           // 0xA4
    op("LDA", Lda, Zp),           // 0xA5
    op("LDX", Ldx, Zp),           // 0xA6
    op("SMB2", Smb(2), Zp),       // 0xA7
    op("TAY", Tay, Imp),          // 0xA8
    op("LDA", Lda, Imm),          // 0xA9
    op("TAX", Tax, Imp),          // 0xAA
    reserved(Imp),                // 0xAB
    op("LDY", Ldy, Abs),          // 0xAC
    op("LDA", Lda, Abs),          // 0xAD
    op("LDX", Ldx, Abs),          // 0xAE
    op("BBS2", Bbs(2), ZpRel),    // 0xAF
    op("BCS", Bcs, Rel),          // 0xB0
    op("LDA", Lda, ZpIndY),       // 0xB1
    op("LDA", Lda, ZpInd),        // 0xB2
    reserved(Imp),                // 0xB3
    op("LDY", Ldy, ZpX),          // 0xB4
    op("LDA", Lda, ZpX),          // 0xB5
    op("LDX", Ldx, ZpY),          // 0xB6
    op("SMB3", Smb(3), Zp),       // 0xB7
    op("CLV", Clv, Imp),          // 0xB8
    op("LDA", Lda, AbsY),         // 0xB9
    op("TSX", Tsx, Imp),          // 0xBA
    reserved(Imp),                // 0xBB
    op("LDY", Ldy, AbsX),         // 0xBC
    op("LDA", Lda, AbsX),         // 0xBD
    op("LDX", Ldx, AbsY),         // 0xBE
    op("BBS3", Bbs(3), ZpRel),    // 0xBF
    op("CPY", Cpy, Imm),          // 0xC0
    op("CMP", Cmp, ZpIndX),       // 0xC1
    reserved(Imm),                // 0xC2
    reserved(Imp),                // 0xC3
    op("CPY", Cpy, Zp),           // 0xC4
    op("CMP", Cmp, Zp),           // 0xC5
    op("DEC", Dec, Zp),           // 0xC6
    op("SMB4", Smb(4), Zp),       // 0xC7
    op("INY", Iny, Imp),          // 0xC8
    op("CMP", Cmp, Imm),          // 0xC9
    op("DEX", Dex, Imp),          // 0xCA
    op("WAI", Wai, Imp),          // 0xCB
    op("CPY", Cpy, Abs),          // 0xCC
    op("CMP", Cmp, Abs),          // 0xCD
    op("DEC", Dec, Abs),          // 0xCE
    op("BBS4", Bbs(4), ZpRel),    // 0xCF
    op("BNE", Bne, Rel),          // 0xD0
    op("CMP", Cmp, ZpIndY),       // 0xD1
    op("CMP", Cmp, ZpInd),        // 0xD2
    reserved(Imp),                // 0xD3
    reserved(ZpX),                // 0xD4
    op("CMP", Cmp, ZpX),          // 0xD5
    op("DEC", Dec, ZpX),          // 0xD6
    op("SMB5", Smb(5), Zp),       // 0xD7
    op("CLD", Cld, Imp),          // 0xD8
    op("CMP", Cmp, AbsY),         // 0xD9
    op("PHX", Phx, Imp),          // 0xDA
    op("STP", Stp, Imp),          // 0xDB
    reserved(Abs),                // 0xDC
    op("CMP", Cmp, AbsX),         // 0xDD
    op("DEC", Dec, AbsX),         // 0xDE
    op("BBS5", Bbs(5), ZpRel),    // 0xDF
    op("CPX", Cpx, Imm),          // 0xE0
    op("SBC", Sbc, ZpIndX),       // 0xE1
    reserved(Imm),                // 0xE2
    reserved(Imp),                // 0xE3
    op("CPX", Cpx, Zp),           // 0xE4
    op("SBC", Sbc, Zp),           // 0xE5
    op("INC", Inc, Zp),           // 0xE6
    op("SMB6", Smb(6), Zp),       // 0xE7
    op("INX", Inx, Imp),          // 0xE8
    op("SBC", Sbc, Imm),          // 0xE9
    op("NOP", Nop, Imp),          // 0xEA
    reserved(Imp),                // 0xEB
    op("CPX", Cpx, Abs),          // 0xEC
    op("SBC", Sbc, Abs),          // 0xED
    op("INC", Inc, Abs),          // 0xEE
    op("BBS6", Bbs(6), ZpRel),    // 0xEF
    op("BEQ", Beq, Rel),          // 0xF0
    op("SBC", Sbc, ZpIndY),       // 0xF1
    op("SBC", Sbc, ZpInd),        // 0xF2
    reserved(Imp),                // 0xF3
    reserved(ZpX),                // 0xF4
    op("SBC", Sbc, ZpX),          // 0xF5
    op("INC", Inc, ZpX),          // 0xF6
    op("SMB7", Smb(7), Zp),       // 0xF7
    op("SED", Sed, Imp),          // 0xF8
    op("SBC", Sbc, AbsY),         // 0xF9
    op("PLX", Plx, Imp),          // 0xFA
    reserved(Imp),                // 0xFB
    reserved(Abs),                // 0xFC
    op("SBC", Sbc, AbsX),         // 0xFD
    op("INC", Inc, AbsX),         // 0xFE
    op("BBS7", Bbs(7), ZpRel),    // 0xFF
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_matches_addressing_mode() {
        for (opcode, meta) in OPCODE_TABLE.iter().enumerate() {
            assert_eq!(
                meta.size_bytes,
                1 + meta.addressing_mode.operand_bytes(),
                "opcode 0x{:02X}",
                opcode
            );
        }
    }

    #[test]
    fn test_reserved_opcode_count() {
        let reserved = OPCODE_TABLE.iter().filter(|m| m.is_undefined()).count();
        // 256 minus the 212 defined W65C02 opcodes
        assert_eq!(reserved, 44);
    }

    #[test]
    fn test_reserved_opcodes_use_placeholder_mnemonic() {
        for meta in OPCODE_TABLE.iter() {
            assert_eq!(meta.is_undefined(), meta.mnemonic == "???");
        }
    }

    #[test]
    fn test_two_and_three_byte_reserved_opcodes() {
        for opcode in [0x02, 0x22, 0x42, 0x62, 0x82, 0xC2, 0xE2, 0x44, 0x54, 0xD4, 0xF4] {
            assert_eq!(OPCODE_TABLE[opcode].size_bytes, 2, "opcode 0x{:02X}", opcode);
        }
        for opcode in [0x5C, 0xDC, 0xFC] {
            assert_eq!(OPCODE_TABLE[opcode].size_bytes, 3, "opcode 0x{:02X}", opcode);
        }
    }

    #[test]
    fn test_rockwell_bit_numbers_follow_high_nibble() {
        for bit in 0..8u8 {
            let row = (bit as usize) << 4;
            assert_eq!(OPCODE_TABLE[row | 0x07].operation, Rmb(bit));
            assert_eq!(OPCODE_TABLE[row | 0x0F].operation, Bbr(bit));
            assert_eq!(OPCODE_TABLE[0x80 | row | 0x07].operation, Smb(bit));
            assert_eq!(OPCODE_TABLE[0x80 | row | 0x0F].operation, Bbs(bit));
        }
    }
}
