//! Tests for addressing-mode resolution.
//!
//! Store instructions are used as probes: they change no register or flag, so after
//! one step the only visible register change is the program counter advance.

use lib65c02::{AddressingMode, FlatMemory, MemoryBus, Operation, CPU, OPCODE_TABLE};
use proptest::prelude::*;

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    CPU::new(memory)
}

/// Every store opcode in the table
fn store_opcodes() -> Vec<u8> {
    OPCODE_TABLE
        .iter()
        .enumerate()
        .filter(|(_, m)| {
            matches!(
                m.operation,
                Operation::Sta | Operation::Stx | Operation::Sty | Operation::Stz
            )
        })
        .map(|(i, _)| i as u8)
        .collect()
}

#[test]
fn test_store_probes_cover_memory_modes() {
    let modes: Vec<AddressingMode> = store_opcodes()
        .into_iter()
        .map(|op| OPCODE_TABLE[op as usize].addressing_mode)
        .collect();

    for mode in [
        AddressingMode::ZeroPage,
        AddressingMode::ZeroPageX,
        AddressingMode::ZeroPageY,
        AddressingMode::ZeroPageIndirect,
        AddressingMode::ZeroPageIndirectX,
        AddressingMode::ZeroPageIndirectY,
        AddressingMode::Absolute,
        AddressingMode::AbsoluteX,
        AddressingMode::AbsoluteY,
    ] {
        assert!(modes.contains(&mode), "no store opcode uses {:?}", mode);
    }
}

proptest! {
    /// Resolving an operand advances PC by exactly the operand width and changes nothing else
    #[test]
    fn prop_resolver_advances_pc_only(
        opcode in prop::sample::select(store_opcodes()),
        operand in any::<[u8; 2]>(),
        a in any::<u8>(),
        x in any::<u8>(),
        y in any::<u8>(),
        status in any::<u8>(),
    ) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, opcode);
        cpu.memory_mut().write(0x8001, operand[0]);
        cpu.memory_mut().write(0x8002, operand[1]);
        cpu.set_a(a);
        cpu.set_x(x);
        cpu.set_y(y);
        cpu.set_status(status);

        let before = *cpu.registers();
        cpu.step().unwrap();

        let width = OPCODE_TABLE[opcode as usize].addressing_mode.operand_bytes() as u16;
        let mut expected = before;
        expected.pc = 0x8001 + width;
        prop_assert_eq!(*cpu.registers(), expected);
    }

    /// Zero page,X stays within the zero page
    #[test]
    fn prop_zero_page_x_wraps(base in any::<u8>(), x in any::<u8>(), value in any::<u8>()) {
        let mut cpu = setup_cpu();
        cpu.set_x(x);
        cpu.memory_mut().write(base.wrapping_add(x) as u16, value);

        // LDA $base,X
        cpu.memory_mut().write(0x8000, 0xB5);
        cpu.memory_mut().write(0x8001, base);
        cpu.step().unwrap();

        prop_assert_eq!(cpu.a(), value);
    }

    /// (zp),Y adds Y to the full 16-bit pointer, crossing pages freely
    #[test]
    fn prop_indirect_y_adds_without_masking(pointer in 0x0200u16..0x7E00, y in any::<u8>(), value in any::<u8>()) {
        let mut cpu = setup_cpu();
        cpu.set_y(y);
        cpu.memory_mut().write(0x0020, pointer as u8);
        cpu.memory_mut().write(0x0021, (pointer >> 8) as u8);
        cpu.memory_mut().write(pointer + y as u16, value);

        // LDA ($20),Y
        cpu.memory_mut().write(0x8000, 0xB1);
        cpu.memory_mut().write(0x8001, 0x20);
        cpu.step().unwrap();

        prop_assert_eq!(cpu.a(), value);
    }
}

#[test]
fn test_zero_page_x_indirect_masks_pointer() {
    let mut cpu = setup_cpu();
    cpu.set_x(0x20);
    // (0xF0 + 0x20) & 0xFF = 0x10
    cpu.memory_mut().write(0x0010, 0x00);
    cpu.memory_mut().write(0x0011, 0x30);
    cpu.memory_mut().write(0x3000, 0x77);
    // A decoy at the unmasked pointer
    cpu.memory_mut().write(0x0110, 0x00);
    cpu.memory_mut().write(0x0111, 0x40);
    cpu.memory_mut().write(0x4000, 0x11);

    // LDA ($F0,X)
    cpu.memory_mut().write(0x8000, 0xA1);
    cpu.memory_mut().write(0x8001, 0xF0);
    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x77);
    assert_eq!(cpu.pc(), 0x8002);
}

#[test]
fn test_zero_page_y() {
    let mut cpu = setup_cpu();
    cpu.set_y(0x05);
    cpu.memory_mut().write(0x0004, 0x99);

    // LDX $FF,Y wraps to 0x04
    cpu.memory_mut().write(0x8000, 0xB6);
    cpu.memory_mut().write(0x8001, 0xFF);
    cpu.step().unwrap();

    assert_eq!(cpu.x(), 0x99);
}

#[test]
fn test_zero_page_indirect_reads_plain_word() {
    let mut cpu = setup_cpu();
    // Pointer at 0xFF takes its high byte from 0x0100
    cpu.memory_mut().write(0x00FF, 0x34);
    cpu.memory_mut().write(0x0100, 0x12);
    cpu.memory_mut().write(0x1234, 0x5A);

    // LDA ($FF)
    cpu.memory_mut().write(0x8000, 0xB2);
    cpu.memory_mut().write(0x8001, 0xFF);
    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x5A);
}

#[test]
fn test_absolute_y_crosses_page() {
    let mut cpu = setup_cpu();
    cpu.set_y(0x10);
    cpu.memory_mut().write(0x2105, 0x3C);

    // LDA $20F5,Y
    cpu.memory_mut().write(0x8000, 0xB9);
    cpu.memory_mut().write(0x8001, 0xF5);
    cpu.memory_mut().write(0x8002, 0x20);
    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x3C);
    assert_eq!(cpu.pc(), 0x8003);
}

#[test]
fn test_jmp_indirect_has_no_page_wrap() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x30FF, 0x00);
    cpu.memory_mut().write(0x3100, 0x40);
    cpu.memory_mut().write(0x3000, 0x50);

    // JMP ($30FF)
    cpu.memory_mut().write(0x8000, 0x6C);
    cpu.memory_mut().write(0x8001, 0xFF);
    cpu.memory_mut().write(0x8002, 0x30);
    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x4000);
}

#[test]
fn test_jmp_absolute_x_indirect() {
    let mut cpu = setup_cpu();
    cpu.set_x(0x04);
    cpu.memory_mut().write(0x1004, 0x78);
    cpu.memory_mut().write(0x1005, 0x56);

    // JMP ($1000,X)
    cpu.memory_mut().write(0x8000, 0x7C);
    cpu.memory_mut().write(0x8001, 0x00);
    cpu.memory_mut().write(0x8002, 0x10);
    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x5678);
}

#[test]
fn test_accumulator_and_immediate_widths() {
    let mut cpu = setup_cpu();
    cpu.set_a(0x01);

    // ASL A; LDA #$00
    cpu.memory_mut().load(0x8000, &[0x0A, 0xA9, 0x00]);
    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0x02);
    assert_eq!(cpu.pc(), 0x8001);

    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x8003);
}
