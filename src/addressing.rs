//! # Addressing Modes
//!
//! This module defines the addressing modes of the 65C02 and the resolvers that
//! turn operand bytes into effective addresses.
//!
//! Every resolver reads its operand bytes starting at the current program counter
//! and advances the counter past them. Resolvers never touch any other register
//! or flag, and never read the operand itself - only the bytes needed to form the
//! address (including the pointer read for indirect modes).

use crate::memory::{read_word, MemoryBus};
use crate::registers::Registers;

/// 65C02 addressing mode enumeration.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implicit, Accumulator
/// - **1 byte**: Immediate, Relative, ZeroPage, ZeroPageX, ZeroPageY, ZeroPageIndirect,
///   ZeroPageIndirectX, ZeroPageIndirectY
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, AbsoluteIndirect, AbsoluteIndirectX,
///   ZeroPageRelative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand, operation implied by instruction.
    ///
    /// Examples: CLC, RTS, NOP
    Implicit,

    /// Operates directly on the accumulator register.
    ///
    /// Examples: LSR A, ROL A, INC A
    Accumulator,

    /// 8-bit constant operand in instruction.
    ///
    /// Example: LDA #$10
    Immediate,

    /// Signed 8-bit displacement for branch instructions.
    ///
    /// Example: BEQ label
    Relative,

    /// Zero page operand followed by a branch displacement (BBRn/BBSn only).
    ///
    /// Example: BBR3 $12,label
    ZeroPageRelative,

    /// 8-bit address in zero page (0x00-0xFF).
    ///
    /// Example: LDA $80
    ZeroPage,

    /// Zero page address indexed by X, wrapping within zero page.
    ///
    /// Example: LDA $80,X
    ZeroPageX,

    /// Zero page address indexed by Y, wrapping within zero page.
    ///
    /// Example: LDX $80,Y
    ZeroPageY,

    /// Zero page pointer dereference.
    ///
    /// Example: LDA ($40)
    ZeroPageIndirect,

    /// Indexed indirect: (ZP + X) wrapped to zero page, then dereference.
    ///
    /// Example: LDA ($40,X)
    ZeroPageIndirectX,

    /// Indirect indexed: ZP dereference, then + Y (may cross pages).
    ///
    /// Example: LDA ($40),Y
    ZeroPageIndirectY,

    /// Full 16-bit address.
    ///
    /// Example: JMP $1234
    Absolute,

    /// 16-bit address indexed by X register.
    ///
    /// Example: LDA $1234,X
    AbsoluteX,

    /// 16-bit address indexed by Y register.
    ///
    /// Example: LDA $1234,Y
    AbsoluteY,

    /// Indirect jump through a 16-bit pointer. No page-wrap quirk on the 65C02.
    ///
    /// Example: JMP ($FFFC)
    AbsoluteIndirect,

    /// Indirect jump through a pointer at (abs + X).
    ///
    /// Example: JMP ($1234,X)
    AbsoluteIndirectX,
}

impl AddressingMode {
    /// Number of operand bytes that follow the opcode.
    pub const fn operand_bytes(self) -> u8 {
        use AddressingMode::*;
        match self {
            Implicit | Accumulator => 0,
            Immediate | Relative | ZeroPage | ZeroPageX | ZeroPageY | ZeroPageIndirect
            | ZeroPageIndirectX | ZeroPageIndirectY => 1,
            Absolute | AbsoluteX | AbsoluteY | AbsoluteIndirect | AbsoluteIndirectX
            | ZeroPageRelative => 2,
        }
    }
}

/// Where an instruction finds its operand after address resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    /// No operand (implicit instructions).
    None,
    /// The accumulator register.
    Accumulator,
    /// A memory location.
    Address(u16),
    /// BBRn/BBSn: a zero page location plus the branch target.
    ZeroPageBranch { address: u16, target: u16 },
}

/// Reads the byte at PC and advances PC by one.
pub(crate) fn fetch_byte<M: MemoryBus>(regs: &mut Registers, bus: &mut M) -> u8 {
    let value = bus.read(regs.pc);
    regs.pc = regs.pc.wrapping_add(1);
    value
}

/// Reads the little-endian word at PC and advances PC by two.
pub(crate) fn fetch_word<M: MemoryBus>(regs: &mut Registers, bus: &mut M) -> u16 {
    let lo = fetch_byte(regs, bus) as u16;
    let hi = fetch_byte(regs, bus) as u16;
    (hi << 8) | lo
}

/// Immediate: the operand is the byte at PC itself.
pub(crate) fn immediate(regs: &mut Registers) -> u16 {
    let addr = regs.pc;
    regs.pc = regs.pc.wrapping_add(1);
    addr
}

pub(crate) fn absolute<M: MemoryBus>(regs: &mut Registers, bus: &mut M) -> u16 {
    fetch_word(regs, bus)
}

pub(crate) fn absolute_x<M: MemoryBus>(regs: &mut Registers, bus: &mut M) -> u16 {
    absolute(regs, bus).wrapping_add(regs.x as u16)
}

pub(crate) fn absolute_y<M: MemoryBus>(regs: &mut Registers, bus: &mut M) -> u16 {
    absolute(regs, bus).wrapping_add(regs.y as u16)
}

pub(crate) fn absolute_indirect<M: MemoryBus>(regs: &mut Registers, bus: &mut M) -> u16 {
    let pointer = absolute(regs, bus);
    read_word(bus, pointer)
}

pub(crate) fn absolute_indirect_x<M: MemoryBus>(regs: &mut Registers, bus: &mut M) -> u16 {
    let pointer = absolute_x(regs, bus);
    read_word(bus, pointer)
}

pub(crate) fn zero_page<M: MemoryBus>(regs: &mut Registers, bus: &mut M) -> u16 {
    fetch_byte(regs, bus) as u16
}

pub(crate) fn zero_page_x<M: MemoryBus>(regs: &mut Registers, bus: &mut M) -> u16 {
    // Stays within zero page
    zero_page(regs, bus).wrapping_add(regs.x as u16) & 0x00FF
}

pub(crate) fn zero_page_y<M: MemoryBus>(regs: &mut Registers, bus: &mut M) -> u16 {
    zero_page(regs, bus).wrapping_add(regs.y as u16) & 0x00FF
}

pub(crate) fn zero_page_indirect<M: MemoryBus>(regs: &mut Registers, bus: &mut M) -> u16 {
    let pointer = zero_page(regs, bus);
    read_word(bus, pointer)
}

pub(crate) fn zero_page_indirect_x<M: MemoryBus>(regs: &mut Registers, bus: &mut M) -> u16 {
    let pointer = zero_page_x(regs, bus);
    read_word(bus, pointer)
}

pub(crate) fn zero_page_indirect_y<M: MemoryBus>(regs: &mut Registers, bus: &mut M) -> u16 {
    zero_page_indirect(regs, bus).wrapping_add(regs.y as u16)
}

/// Reads a signed displacement and returns the branch target relative to the
/// address after the displacement byte.
pub(crate) fn relative<M: MemoryBus>(regs: &mut Registers, bus: &mut M) -> u16 {
    let offset = fetch_byte(regs, bus) as i8;
    regs.pc.wrapping_add_signed(offset as i16)
}

/// Resolves the operand location for `mode`, advancing PC past the operand bytes.
pub(crate) fn resolve<M: MemoryBus>(
    mode: AddressingMode,
    regs: &mut Registers,
    bus: &mut M,
) -> Operand {
    use AddressingMode::*;
    match mode {
        Implicit => Operand::None,
        Accumulator => Operand::Accumulator,
        Immediate => Operand::Address(immediate(regs)),
        Relative => Operand::Address(relative(regs, bus)),
        ZeroPageRelative => {
            let address = zero_page(regs, bus);
            let target = relative(regs, bus);
            Operand::ZeroPageBranch { address, target }
        }
        ZeroPage => Operand::Address(zero_page(regs, bus)),
        ZeroPageX => Operand::Address(zero_page_x(regs, bus)),
        ZeroPageY => Operand::Address(zero_page_y(regs, bus)),
        ZeroPageIndirect => Operand::Address(zero_page_indirect(regs, bus)),
        ZeroPageIndirectX => Operand::Address(zero_page_indirect_x(regs, bus)),
        ZeroPageIndirectY => Operand::Address(zero_page_indirect_y(regs, bus)),
        Absolute => Operand::Address(absolute(regs, bus)),
        AbsoluteX => Operand::Address(absolute_x(regs, bus)),
        AbsoluteY => Operand::Address(absolute_y(regs, bus)),
        AbsoluteIndirect => Operand::Address(absolute_indirect(regs, bus)),
        AbsoluteIndirectX => Operand::Address(absolute_indirect_x(regs, bus)),
    }
}
