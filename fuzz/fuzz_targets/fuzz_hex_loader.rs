//! Fuzz target for the Intel-HEX loader.
//!
//! Arbitrary text must either load or fail with an error, never panic, and a
//! successful load never writes more bytes than its data records carry.

#![no_main]

use lib65c02::{load_hex, FlatMemory};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut memory = FlatMemory::new();
    if let Ok(report) = load_hex(data, &mut memory) {
        assert!(report.bytes_written <= data.len());
        assert!(report.checksum_mismatches.len() <= report.records);
    }
});
