//! Integration tests running the CPU against a device-mapped bus.

use lib65c02::{ConsoleDevice, Device, MappedMemory, MemoryBus, PowerState, RamDevice, CPU};
use std::cell::RefCell;
use std::rc::Rc;

const CONSOLE_PORT: u16 = 0x7FFF;

/// RAM below the console port, RAM above it, program loaded at 0x8000
fn setup_system(console: ConsoleDevice, program: &[u8]) -> CPU<MappedMemory> {
    let mut high_ram = RamDevice::new(0x8000);
    high_ram.load_bytes(0x0000, program);
    // Reset vector at 0xFFFC
    high_ram.load_bytes(0x7FFC, &[0x00, 0x80]);

    let mut memory = MappedMemory::new();
    memory
        .add_device(0x0000, Box::new(RamDevice::new(CONSOLE_PORT)))
        .unwrap();
    memory.add_device(CONSOLE_PORT, Box::new(console)).unwrap();
    memory.add_device(0x8000, Box::new(high_ram)).unwrap();
    CPU::new(memory)
}

#[test]
fn test_program_prints_through_console() {
    let output = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&output);
    let mut console = ConsoleDevice::new();
    console.set_output_callback(move |byte| sink.borrow_mut().push(byte));

    let program = [
        0xA9, b'H', // LDA #'H'
        0x8D, 0xFF, 0x7F, // STA $7FFF
        0xA9, b'i', // LDA #'i'
        0x8D, 0xFF, 0x7F, // STA $7FFF
        0xDB, // STP
    ];
    let mut cpu = setup_system(console, &program);

    let steps = cpu.run_for_instructions(100).unwrap();

    assert_eq!(steps, 5);
    assert_eq!(cpu.power_state(), PowerState::Halted);
    assert_eq!(output.borrow().as_slice(), b"Hi");
}

#[test]
fn test_echo_loop_consumes_queued_input() {
    let output = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&output);
    let mut console = ConsoleDevice::new();
    console.set_output_callback(move |byte| sink.borrow_mut().push(byte));
    console.push_input(b"ok");

    let program = [
        0xAD, 0xFF, 0x7F, // loop: LDA $7FFF
        0xF0, 0x05, // BEQ done
        0x8D, 0xFF, 0x7F, // STA $7FFF
        0x80, 0xF6, // BRA loop
        0xDB, // done: STP
    ];
    let mut cpu = setup_system(console, &program);

    cpu.run_for_instructions(100).unwrap();

    assert_eq!(output.borrow().as_slice(), b"ok");
    assert_eq!(cpu.pc(), 0x800B);
}

#[test]
fn test_ram_regions_are_independent() {
    let mut cpu = setup_system(ConsoleDevice::new(), &[]);

    cpu.memory_mut().write(0x7FFE, 0x11);
    cpu.memory_mut().write(0x8000, 0x22);

    assert_eq!(cpu.memory_mut().read(0x7FFE), 0x11);
    assert_eq!(cpu.memory_mut().read(0x8000), 0x22);
}

#[test]
fn test_custom_device_sees_offsets() {
    struct Recorder {
        writes: Rc<RefCell<Vec<(u16, u8)>>>,
    }

    impl Device for Recorder {
        fn read(&mut self, offset: u16) -> u8 {
            offset as u8
        }

        fn write(&mut self, offset: u16, value: u8) {
            self.writes.borrow_mut().push((offset, value));
        }

        fn size(&self) -> u16 {
            4
        }
    }

    let writes = Rc::new(RefCell::new(Vec::new()));
    let mut memory = MappedMemory::new();
    memory
        .add_device(
            0xD000,
            Box::new(Recorder {
                writes: Rc::clone(&writes),
            }),
        )
        .unwrap();

    memory.write(0xD002, 0x99);
    assert_eq!(memory.read(0xD003), 3);
    assert_eq!(memory.read(0xD004), 0xFF);
    assert_eq!(writes.borrow().as_slice(), &[(2, 0x99)]);
}
