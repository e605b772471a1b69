//! Fuzz target for the disassembler.
//!
//! Feeds arbitrary byte sequences to the disassembler and checks that every byte is
//! accounted for exactly once.

#![no_main]

use arbitrary::Arbitrary;
use lib65c02::{disassemble, format_line, DisassemblyOptions};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    bytes: Vec<u8>,
    start_address: u16,
    hex_dump: bool,
}

fuzz_target!(|input: FuzzInput| {
    // Limit input size to prevent OOM
    if input.bytes.len() > 65536 {
        return;
    }

    let options = DisassemblyOptions {
        start_address: input.start_address,
        hex_dump: input.hex_dump,
    };

    let instructions = disassemble(&input.bytes, options);

    let mut total_size: usize = 0;
    let mut expected_address = input.start_address;

    for instr in &instructions {
        assert_eq!(instr.address, expected_address);
        assert!(instr.size_bytes >= 1 && instr.size_bytes <= 3);
        assert_eq!(instr.operand_bytes.len() + 1, instr.size_bytes as usize);
        assert!(!format_line(instr, &options).is_empty());

        total_size += instr.size_bytes as usize;
        expected_address = expected_address.wrapping_add(instr.size_bytes as u16);
    }

    assert_eq!(total_size, input.bytes.len());
});
