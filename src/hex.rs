//! # Intel-HEX Loader
//!
//! Loads I8HEX files into any `MemoryBus`. Each line is one record:
//!
//! ```text
//! :LLAAAATT<data>CC
//! ```
//!
//! - `LL`: number of data bytes
//! - `AAAA`: 16-bit load address (big-endian in the file)
//! - `TT`: record type (00 = data, 01 = end of file)
//! - `CC`: two's complement of the low byte of the sum of every preceding byte
//!
//! A checksum mismatch is reported in the `LoadReport` but the record is still
//! loaded. Structural problems (a missing `:`, bad hex digits, a length that does not
//! match the byte count) stop loading with a `HexError`.

use std::fmt;
use std::io::{self, BufRead};

use log::{debug, warn};

use crate::memory::MemoryBus;

/// Data record type.
pub const RECORD_DATA: u8 = 0x00;

/// End-of-file record type.
pub const RECORD_EOF: u8 = 0x01;

/// One decoded Intel-HEX record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexRecord {
    /// Load address of the first data byte
    pub address: u16,
    /// Record type
    pub record_type: u8,
    /// Data bytes (length equals the declared byte count)
    pub data: Vec<u8>,
    /// Checksum stored in the record
    pub checksum: u8,
}

impl HexRecord {
    /// Checksum computed from the record contents.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::hex::parse_record;
    ///
    /// let record = parse_record(":0300300002337A1E").unwrap();
    /// assert_eq!(record.computed_checksum(), 0x1E);
    /// assert!(record.checksum_ok());
    /// ```
    pub fn computed_checksum(&self) -> u8 {
        let [hi, lo] = self.address.to_be_bytes();
        let sum = self
            .data
            .iter()
            .fold(
                (self.data.len() as u8)
                    .wrapping_add(hi)
                    .wrapping_add(lo)
                    .wrapping_add(self.record_type),
                |acc, &byte| acc.wrapping_add(byte),
            );
        sum.wrapping_neg()
    }

    /// Returns true when the stored checksum matches the contents.
    pub fn checksum_ok(&self) -> bool {
        self.checksum == self.computed_checksum()
    }
}

/// Reasons a single line fails to parse as a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The line does not begin with ':'.
    MissingStartCode,
    /// The record is shorter than the minimum of five bytes.
    TooShort,
    /// An odd number of hex digits follows the ':'.
    OddLength,
    /// A character that is not a hex digit.
    InvalidDigit {
        /// Character offset within the line
        column: usize,
    },
    /// The declared byte count disagrees with the bytes present.
    LengthMismatch {
        /// Byte count from the record header
        declared: u8,
        /// Data bytes actually present
        actual: usize,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordError::MissingStartCode => write!(f, "record does not start with ':'"),
            RecordError::TooShort => write!(f, "record is too short"),
            RecordError::OddLength => write!(f, "record has an odd number of hex digits"),
            RecordError::InvalidDigit { column } => {
                write!(f, "invalid hex digit at column {}", column)
            }
            RecordError::LengthMismatch { declared, actual } => write!(
                f,
                "byte count is {} but the record holds {} data bytes",
                declared, actual
            ),
        }
    }
}

impl std::error::Error for RecordError {}

/// Errors that stop a hex load.
#[derive(Debug)]
pub enum HexError {
    /// Reading the input failed.
    Io(io::Error),
    /// A line could not be parsed.
    Record {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        error: RecordError,
    },
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HexError::Io(err) => write!(f, "I/O error while reading hex data: {}", err),
            HexError::Record { line, error } => write!(f, "line {}: {}", line, error),
        }
    }
}

impl std::error::Error for HexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HexError::Io(err) => Some(err),
            HexError::Record { error, .. } => Some(error),
        }
    }
}

impl From<io::Error> for HexError {
    fn from(err: io::Error) -> Self {
        HexError::Io(err)
    }
}

/// A record whose stored checksum was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumMismatch {
    /// 1-based line number
    pub line: usize,
    /// Checksum stored in the file
    pub stored: u8,
    /// Checksum computed from the record
    pub computed: u8,
}

/// Summary of a completed load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records processed, including the end-of-file record
    pub records: usize,
    /// Data bytes written to the bus
    pub bytes_written: usize,
    /// Records of a type other than data or end-of-file, which were skipped
    pub skipped_records: usize,
    /// Records loaded despite a bad checksum
    pub checksum_mismatches: Vec<ChecksumMismatch>,
    /// Whether an end-of-file record was seen
    pub end_of_file: bool,
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Parses one record line. Trailing whitespace (including `\r`) is ignored.
///
/// # Examples
///
/// ```
/// use lib65c02::hex::{parse_record, RecordError};
///
/// let record = parse_record(":02800000A94293").unwrap();
/// assert_eq!(record.address, 0x8000);
/// assert_eq!(record.data, vec![0xA9, 0x42]);
///
/// assert_eq!(parse_record("02800000A942CB"), Err(RecordError::MissingStartCode));
/// ```
pub fn parse_record(line: &str) -> Result<HexRecord, RecordError> {
    let line = line.trim_end();
    let digits = line
        .strip_prefix(':')
        .ok_or(RecordError::MissingStartCode)?
        .as_bytes();

    if digits.len() % 2 != 0 {
        return Err(RecordError::OddLength);
    }

    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for (index, pair) in digits.chunks_exact(2).enumerate() {
        let column = 1 + index * 2;
        let hi = hex_value(pair[0]).ok_or(RecordError::InvalidDigit { column })?;
        let lo = hex_value(pair[1]).ok_or(RecordError::InvalidDigit { column: column + 1 })?;
        bytes.push((hi << 4) | lo);
    }

    // count, address (2), type, checksum
    if bytes.len() < 5 {
        return Err(RecordError::TooShort);
    }

    let declared = bytes[0];
    let data = &bytes[4..bytes.len() - 1];
    if data.len() != declared as usize {
        return Err(RecordError::LengthMismatch {
            declared,
            actual: data.len(),
        });
    }

    Ok(HexRecord {
        address: u16::from_be_bytes([bytes[1], bytes[2]]),
        record_type: bytes[3],
        data: data.to_vec(),
        checksum: bytes[bytes.len() - 1],
    })
}

/// Loads Intel-HEX records from `reader` into `bus`.
///
/// Data records are written byte by byte starting at their address (wrapping at
/// 0xFFFF). Loading stops at the first end-of-file record or at the end of input.
/// Blank lines are skipped.
///
/// # Examples
///
/// ```
/// use lib65c02::{load_hex, FlatMemory};
///
/// let data = ":02800000A94293\n:028002008510E7\n:00000001FF\n";
/// let mut memory = FlatMemory::new();
///
/// let report = load_hex(data.as_bytes(), &mut memory).unwrap();
/// assert_eq!(report.bytes_written, 4);
/// assert!(report.end_of_file);
/// assert!(report.checksum_mismatches.is_empty());
/// assert_eq!(memory.peek(0x8003), 0x10);
/// ```
pub fn load_hex<R, M>(reader: R, bus: &mut M) -> Result<LoadReport, HexError>
where
    R: BufRead,
    M: MemoryBus + ?Sized,
{
    let mut report = LoadReport::default();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record = parse_record(&line).map_err(|error| HexError::Record {
            line: line_number,
            error,
        })?;
        report.records += 1;

        if !record.checksum_ok() {
            let mismatch = ChecksumMismatch {
                line: line_number,
                stored: record.checksum,
                computed: record.computed_checksum(),
            };
            warn!(
                "checksum error on line {}: stored {:02X}, calculated {:02X}",
                mismatch.line, mismatch.stored, mismatch.computed
            );
            report.checksum_mismatches.push(mismatch);
        }

        match record.record_type {
            RECORD_DATA => {
                let mut addr = record.address;
                for &byte in &record.data {
                    bus.write(addr, byte);
                    addr = addr.wrapping_add(1);
                }
                report.bytes_written += record.data.len();
            }
            RECORD_EOF => {
                report.end_of_file = true;
                break;
            }
            other => {
                debug!(
                    "skipping record type {:02X} on line {}",
                    other, line_number
                );
                report.skipped_records += 1;
            }
        }
    }

    debug!(
        "hex load complete: {} records, {} bytes",
        report.records, report.bytes_written
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::FlatMemory;

    #[test]
    fn test_parse_lowercase_and_crlf() {
        let record = parse_record(":02800000a94293\r\n").unwrap();
        assert_eq!(record.data, vec![0xA9, 0x42]);
        assert!(record.checksum_ok());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_record(":0080"), Err(RecordError::TooShort));
        assert_eq!(parse_record(":008"), Err(RecordError::OddLength));
        assert_eq!(
            parse_record(":0G00000000"),
            Err(RecordError::InvalidDigit { column: 2 })
        );
        assert_eq!(
            parse_record(":0280000000FE"),
            Err(RecordError::LengthMismatch {
                declared: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_checksum_mismatch_is_reported_and_loaded() {
        let data = ":02800000A94200\n:00000001FF\n";
        let mut mem = FlatMemory::new();
        let report = load_hex(data.as_bytes(), &mut mem).unwrap();

        assert_eq!(
            report.checksum_mismatches,
            vec![ChecksumMismatch {
                line: 1,
                stored: 0x00,
                computed: 0x93
            }]
        );
        assert_eq!(mem.peek(0x8000), 0xA9);
        assert_eq!(mem.peek(0x8001), 0x42);
    }

    #[test]
    fn test_unknown_record_type_is_skipped() {
        // Type 04 (extended linear address) then data
        let data = ":020000040000FA\n:01020000EA13\n";
        let mut mem = FlatMemory::new();
        let report = load_hex(data.as_bytes(), &mut mem).unwrap();

        assert_eq!(report.skipped_records, 1);
        assert_eq!(report.records, 2);
        assert!(!report.end_of_file);
        assert_eq!(mem.peek(0x0200), 0xEA);
    }

    #[test]
    fn test_records_after_eof_are_ignored() {
        let data = ":00000001FF\n:01020000EA13\n";
        let mut mem = FlatMemory::new();
        let report = load_hex(data.as_bytes(), &mut mem).unwrap();
        assert_eq!(report.records, 1);
        assert_eq!(mem.peek(0x0200), 0x00);
    }

    #[test]
    fn test_error_carries_line_number() {
        let data = "\ngarbage\n";
        let mut mem = FlatMemory::new();

        match load_hex(data.as_bytes(), &mut mem) {
            Err(HexError::Record { line, error }) => {
                assert_eq!(line, 2);
                assert_eq!(error, RecordError::MissingStartCode);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_data_wraps_at_top_of_memory() {
        // Two bytes at 0xFFFF
        let data = ":02FFFF00112DC2\n";
        let mut mem = FlatMemory::new();
        load_hex(data.as_bytes(), &mut mem).unwrap();
        assert_eq!(mem.peek(0xFFFF), 0x11);
        assert_eq!(mem.peek(0x0000), 0x2D);
    }
}
