//! # Status Flag Instructions
//!
//! CLC, SEC, CLI, SEI, CLD, SED and CLV. Each changes exactly one flag.

use crate::opcodes::Operation;
use crate::registers::Registers;

pub(crate) fn execute_flag_op(operation: Operation, regs: &mut Registers) {
    match operation {
        Operation::Clc => regs.flag_c = false,
        Operation::Sec => regs.flag_c = true,
        Operation::Cli => regs.flag_i = false,
        Operation::Sei => regs.flag_i = true,
        Operation::Cld => regs.flag_d = false,
        Operation::Sed => regs.flag_d = true,
        Operation::Clv => regs.flag_v = false,
        _ => {}
    }
}
