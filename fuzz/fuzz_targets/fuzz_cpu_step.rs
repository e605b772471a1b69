//! Fuzz target for CPU step execution.
//!
//! Builds an arbitrary register file, memory image and interrupt line state, then
//! executes a short burst of instructions under either undefined-opcode policy.

#![no_main]

use arbitrary::Arbitrary;
use lib65c02::{CpuConfig, FlatMemory, MemoryBus, PowerState, UndefinedOpcodePolicy, CPU};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    status: u8,
}

#[derive(Debug, Arbitrary)]
struct FuzzLines {
    irq: bool,
    nmi: bool,
    so: bool,
}

#[derive(Debug, Arbitrary)]
struct FuzzMemory {
    /// Bytes at the PC location
    program: [u8; 16],
    zero_page: [u8; 256],
    stack_page: [u8; 256],
    /// Data at 0x4000 for absolute addressing
    main_memory: [u8; 256],
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    lines: FuzzLines,
    memory: FuzzMemory,
    trap: bool,
    steps: u8,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();

    // Reset to 0x8000, NMI to 0x9100, IRQ to 0x9000
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    memory.write(0xFFFA, 0x00);
    memory.write(0xFFFB, 0x91);
    memory.write(0xFFFE, 0x00);
    memory.write(0xFFFF, 0x90);

    memory.load(0x8000, &input.memory.program);
    memory.load(0x0000, &input.memory.zero_page);
    memory.load(0x0100, &input.memory.stack_page);
    memory.load(0x4000, &input.memory.main_memory);

    let policy = if input.trap {
        UndefinedOpcodePolicy::Trap
    } else {
        UndefinedOpcodePolicy::Nop
    };
    let mut cpu = CPU::with_config(memory, CpuConfig::default().undefined_opcodes(policy));

    cpu.set_a(input.cpu_state.a);
    cpu.set_x(input.cpu_state.x);
    cpu.set_y(input.cpu_state.y);
    cpu.set_sp(input.cpu_state.sp);
    cpu.set_status(input.cpu_state.status);

    if input.lines.irq {
        cpu.raise_irq();
    }
    if input.lines.nmi {
        cpu.raise_nmi();
    }
    if input.lines.so {
        cpu.set_overflow();
    }

    for _ in 0..(input.steps % 32) {
        let pc = cpu.pc();
        let result = cpu.step();

        // Only the trap policy may report an error, and it must not move PC past the opcode
        if result.is_err() {
            assert!(input.trap);
            assert_eq!(cpu.pc(), pc.wrapping_add(1));
            break;
        }
        if cpu.power_state() == PowerState::Halted {
            let snapshot = *cpu.registers();
            cpu.raise_nmi();
            cpu.step().unwrap();
            assert_eq!(*cpu.registers(), snapshot);
            break;
        }
    }
});
