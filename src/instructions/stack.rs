//! # Stack Instructions
//!
//! PHA, PHX, PHY, PHP push a register; PLA, PLX, PLY pull one and update N and Z;
//! PLP replaces the flags from the pulled byte.

use crate::memory::MemoryBus;
use crate::opcodes::Operation;
use crate::registers::Registers;
use crate::stack::{pull_byte, pull_status, push_byte, push_status};

pub(crate) fn execute_stack_op<M: MemoryBus>(
    operation: Operation,
    regs: &mut Registers,
    bus: &mut M,
) {
    match operation {
        Operation::Pha => {
            let value = regs.a;
            push_byte(regs, bus, value);
        }
        Operation::Phx => {
            let value = regs.x;
            push_byte(regs, bus, value);
        }
        Operation::Phy => {
            let value = regs.y;
            push_byte(regs, bus, value);
        }
        Operation::Php => push_status(regs, bus),
        Operation::Pla => {
            let value = pull_byte(regs, bus);
            regs.a = regs.set_nz(value);
        }
        Operation::Plx => {
            let value = pull_byte(regs, bus);
            regs.x = regs.set_nz(value);
        }
        Operation::Ply => {
            let value = pull_byte(regs, bus);
            regs.y = regs.set_nz(value);
        }
        Operation::Plp => pull_status(regs, bus),
        _ => {}
    }
}
