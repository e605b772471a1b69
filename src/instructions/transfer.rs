//! # Register Transfer Instructions
//!
//! TAX, TAY, TXA, TYA, TSX and TXS. Every transfer except TXS updates N and Z
//! from the copied value.

use crate::opcodes::Operation;
use crate::registers::Registers;

pub(crate) fn execute_transfer(operation: Operation, regs: &mut Registers) {
    match operation {
        Operation::Tax => regs.x = regs.set_nz(regs.a),
        Operation::Tay => regs.y = regs.set_nz(regs.a),
        Operation::Txa => regs.a = regs.set_nz(regs.x),
        Operation::Tya => regs.a = regs.set_nz(regs.y),
        Operation::Tsx => regs.x = regs.set_nz(regs.sp),
        Operation::Txs => regs.sp = regs.x,
        _ => {}
    }
}
