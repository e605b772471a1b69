//! # 65C02 Instruction Implementations
//!
//! This module contains the implementations of all 65C02 instructions, organized by
//! category. Each operation is a function of the register state, the resolved
//! operand and (where it needs one) the memory bus. None of them can fail.
//!
//! ## Categories
//!
//! - **alu**: Arithmetic and logic operations (ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT)
//! - **bits**: Bit operations (TRB, TSB, RMBn, SMBn, BBRn, BBSn)
//! - **branches**: Relative branches (BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS, BRA)
//! - **shifts**: Shift and rotate operations (ASL, LSR, ROL, ROR)
//! - **load_store**: Load and store instructions (LDA, LDX, LDY, STA, STX, STY, STZ)
//! - **inc_dec**: Increment and decrement operations (INC, DEC, INX, INY, DEX, DEY)
//! - **control**: Control flow instructions (JMP, JSR, RTS, RTI, BRK)
//! - **stack**: Stack operations (PHA, PHP, PHX, PHY, PLA, PLP, PLX, PLY)
//! - **flags**: Status flag manipulation (CLC, SEC, CLI, SEI, CLD, SED, CLV)
//! - **transfer**: Register transfer operations (TAX, TAY, TXA, TYA, TSX, TXS)

pub(crate) mod alu;
pub(crate) mod bits;
pub(crate) mod branches;
pub(crate) mod control;
pub(crate) mod flags;
pub(crate) mod inc_dec;
pub(crate) mod load_store;
pub(crate) mod shifts;
pub(crate) mod stack;
pub(crate) mod transfer;

use log::debug;

use crate::addressing::{AddressingMode, Operand};
use crate::interrupts::PowerState;
use crate::memory::MemoryBus;
use crate::opcodes::{OpcodeMetadata, Operation};
use crate::registers::Registers;

/// Reads the byte an instruction operates on.
fn read_operand<M: MemoryBus>(regs: &Registers, bus: &mut M, operand: Operand) -> u8 {
    match operand {
        Operand::Accumulator => regs.a,
        Operand::Address(addr) | Operand::ZeroPageBranch { address: addr, .. } => bus.read(addr),
        Operand::None => 0,
    }
}

fn write_operand<M: MemoryBus>(regs: &mut Registers, bus: &mut M, operand: Operand, value: u8) {
    match operand {
        Operand::Accumulator => regs.a = value,
        Operand::Address(addr) | Operand::ZeroPageBranch { address: addr, .. } => {
            bus.write(addr, value)
        }
        Operand::None => {}
    }
}

/// Reads the operand, applies `f` and writes the result back to the same place.
fn modify<M, F>(regs: &mut Registers, bus: &mut M, operand: Operand, f: F)
where
    M: MemoryBus,
    F: FnOnce(&mut Registers, u8) -> u8,
{
    let value = read_operand(regs, bus, operand);
    let result = f(regs, value);
    write_operand(regs, bus, operand, result);
}

fn target(operand: Operand) -> u16 {
    match operand {
        Operand::Address(addr) => addr,
        Operand::ZeroPageBranch { target, .. } => target,
        Operand::None | Operand::Accumulator => 0,
    }
}

/// Executes one decoded instruction whose operand has already been resolved.
///
/// Reserved opcodes never reach this function; the dispatcher applies the
/// configured policy to them first.
pub(crate) fn execute<M: MemoryBus>(
    metadata: &OpcodeMetadata,
    operand: Operand,
    regs: &mut Registers,
    power: &mut PowerState,
    bus: &mut M,
) {
    use Operation::*;

    match metadata.operation {
        Adc => {
            let value = read_operand(regs, bus, operand);
            alu::adc(regs, value);
        }
        Sbc => {
            let value = read_operand(regs, bus, operand);
            alu::sbc(regs, value);
        }
        And => {
            let value = read_operand(regs, bus, operand);
            alu::and(regs, value);
        }
        Ora => {
            let value = read_operand(regs, bus, operand);
            alu::ora(regs, value);
        }
        Eor => {
            let value = read_operand(regs, bus, operand);
            alu::eor(regs, value);
        }
        Cmp | Cpx | Cpy => {
            let value = read_operand(regs, bus, operand);
            let register = match metadata.operation {
                Cpx => regs.x,
                Cpy => regs.y,
                _ => regs.a,
            };
            alu::compare(regs, register, value);
        }
        Bit => {
            let value = read_operand(regs, bus, operand);
            let immediate = metadata.addressing_mode == AddressingMode::Immediate;
            alu::bit(regs, value, immediate);
        }

        Asl => modify(regs, bus, operand, shifts::asl),
        Lsr => modify(regs, bus, operand, shifts::lsr),
        Rol => modify(regs, bus, operand, shifts::rol),
        Ror => modify(regs, bus, operand, shifts::ror),

        Inc => modify(regs, bus, operand, inc_dec::increment),
        Dec => modify(regs, bus, operand, inc_dec::decrement),
        Inx => inc_dec::inx(regs),
        Iny => inc_dec::iny(regs),
        Dex => inc_dec::dex(regs),
        Dey => inc_dec::dey(regs),

        Trb => modify(regs, bus, operand, bits::trb),
        Tsb => modify(regs, bus, operand, bits::tsb),
        Rmb(bit) => modify(regs, bus, operand, |_, value| bits::reset_bit(value, bit)),
        Smb(bit) => modify(regs, bus, operand, |_, value| bits::set_bit(value, bit)),
        Bbr(bit) | Bbs(bit) => {
            let value = read_operand(regs, bus, operand);
            let taken = bits::bit_is_set(value, bit) == matches!(metadata.operation, Bbs(_));
            branches::branch(regs, target(operand), taken);
        }

        Bcc | Bcs | Beq | Bne | Bmi | Bpl | Bvc | Bvs | Bra => {
            let taken = branches::condition(metadata.operation, regs);
            branches::branch(regs, target(operand), taken);
        }

        Lda | Ldx | Ldy => {
            let value = read_operand(regs, bus, operand);
            load_store::execute_load(metadata.operation, regs, value);
        }
        Sta | Stx | Sty | Stz => {
            let value = load_store::store_value(metadata.operation, regs);
            write_operand(regs, bus, operand, value);
        }

        Tax | Tay | Txa | Tya | Tsx | Txs => transfer::execute_transfer(metadata.operation, regs),
        Pha | Phx | Phy | Php | Pla | Plx | Ply | Plp => {
            stack::execute_stack_op(metadata.operation, regs, bus)
        }
        Clc | Sec | Cli | Sei | Cld | Sed | Clv => {
            flags::execute_flag_op(metadata.operation, regs)
        }

        Brk => control::brk(regs, power, bus),
        Jmp => control::jmp(regs, target(operand)),
        Jsr => control::jsr(regs, bus, target(operand)),
        Rts => control::rts(regs, bus),
        Rti => control::rti(regs, bus),

        Wai => {
            debug!("WAI at 0x{:04X}: waiting for interrupt", regs.pc.wrapping_sub(1));
            *power = PowerState::Suspended;
        }
        Stp => {
            debug!("STP at 0x{:04X}: processor halted", regs.pc.wrapping_sub(1));
            *power = PowerState::Halted;
        }

        Nop | Undefined => {}
    }
}
