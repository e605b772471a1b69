//! # Register and Flag State
//!
//! The processor-visible state of the 65C02:
//! - **Registers**: Accumulator (A), index registers (X, Y)
//! - **Program counter** (PC): 16-bit, wraps modulo 65536
//! - **Stack pointer** (SP): 8-bit offset into the stack page (0x0100-0x01FF)
//! - **Status flags**: N, V, B, D, I, Z, C (individual bool fields)
//!
//! The Break flag is a software convenience bit. It has no hardware latch behind it;
//! it is forced set whenever status is pushed and is restored by PLP/RTI.
//!
//! All arithmetic on these fields relies on Rust's `wrapping_*` operations.

use bitflags::bitflags;

bitflags! {
    /// Bit layout of the packed status register (NV-BDIZC).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u8 {
        /// Bit 7: result negative
        const NEGATIVE = 0b1000_0000;
        /// Bit 6: signed overflow
        const OVERFLOW = 0b0100_0000;
        /// Bit 5: unused, always reads as 1 when pushed
        const UNUSED = 0b0010_0000;
        /// Bit 4: break indicator
        const BREAK = 0b0001_0000;
        /// Bit 3: decimal mode
        const DECIMAL = 0b0000_1000;
        /// Bit 2: IRQ disable
        const IRQ_DISABLE = 0b0000_0100;
        /// Bit 1: result zero
        const ZERO = 0b0000_0010;
        /// Bit 0: carry / not-borrow
        const CARRY = 0b0000_0001;
    }
}

/// Register and flag state of one processor.
///
/// A plain mutable record: every component of the core takes a reference to it.
/// No invariant is enforced beyond wraparound arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    /// Accumulator register
    pub a: u8,

    /// X index register
    pub x: u8,

    /// Y index register
    pub y: u8,

    /// Stack pointer (0x0100 + sp gives full stack address)
    pub sp: u8,

    /// Program counter (address of next byte to fetch)
    pub pc: u16,

    /// Negative flag (set if bit 7 of result is 1)
    pub flag_n: bool,

    /// Overflow flag (set on signed overflow)
    pub flag_v: bool,

    /// Break indicator (software only, set by BRK)
    pub flag_b: bool,

    /// Decimal mode flag (enables BCD arithmetic)
    pub flag_d: bool,

    /// Interrupt disable flag (blocks IRQ when set)
    pub flag_i: bool,

    /// Zero flag (set if result is zero)
    pub flag_z: bool,

    /// Carry flag (set on unsigned overflow, clear on borrow)
    pub flag_c: bool,
}

impl Registers {
    /// Updates the Zero and Negative flags from `value` and returns it.
    pub fn set_nz(&mut self, value: u8) -> u8 {
        self.flag_z = value == 0;
        self.flag_n = value & 0x80 != 0;
        value
    }

    /// Returns the status register as a packed byte.
    ///
    /// The unused bit 5 always reads as 1; bit 4 reflects the Break indicator.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::Registers;
    ///
    /// let regs = Registers { flag_i: true, flag_c: true, ..Registers::default() };
    /// assert_eq!(regs.status(), 0b0010_0101);
    /// ```
    pub fn status(&self) -> u8 {
        self.status_flags().bits()
    }

    /// Returns the packed status as `StatusFlags`.
    pub fn status_flags(&self) -> StatusFlags {
        let mut flags = StatusFlags::UNUSED;
        flags.set(StatusFlags::NEGATIVE, self.flag_n);
        flags.set(StatusFlags::OVERFLOW, self.flag_v);
        flags.set(StatusFlags::BREAK, self.flag_b);
        flags.set(StatusFlags::DECIMAL, self.flag_d);
        flags.set(StatusFlags::IRQ_DISABLE, self.flag_i);
        flags.set(StatusFlags::ZERO, self.flag_z);
        flags.set(StatusFlags::CARRY, self.flag_c);
        flags
    }

    /// Replaces every flag from a packed status byte. Bit 5 is discarded.
    pub fn set_status(&mut self, value: u8) {
        let flags = StatusFlags::from_bits_truncate(value);
        self.flag_n = flags.contains(StatusFlags::NEGATIVE);
        self.flag_v = flags.contains(StatusFlags::OVERFLOW);
        self.flag_b = flags.contains(StatusFlags::BREAK);
        self.flag_d = flags.contains(StatusFlags::DECIMAL);
        self.flag_i = flags.contains(StatusFlags::IRQ_DISABLE);
        self.flag_z = flags.contains(StatusFlags::ZERO);
        self.flag_c = flags.contains(StatusFlags::CARRY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_packing_sets_unused_bit() {
        let regs = Registers::default();
        assert_eq!(regs.status(), 0b0010_0000);
    }

    #[test]
    fn test_status_packing_all_flags() {
        let regs = Registers {
            flag_n: true,
            flag_v: true,
            flag_b: true,
            flag_d: true,
            flag_i: true,
            flag_z: true,
            flag_c: true,
            ..Registers::default()
        };
        assert_eq!(regs.status(), 0xFF);
    }

    #[test]
    fn test_set_status_restores_each_flag() {
        let mut regs = Registers::default();
        regs.set_status(0b1100_0011);
        assert!(regs.flag_n);
        assert!(regs.flag_v);
        assert!(!regs.flag_b);
        assert!(!regs.flag_d);
        assert!(!regs.flag_i);
        assert!(regs.flag_z);
        assert!(regs.flag_c);
    }

    #[test]
    fn test_set_status_clears_previous_flags() {
        let mut regs = Registers {
            flag_c: true,
            flag_d: true,
            ..Registers::default()
        };
        regs.set_status(0x20);
        assert!(!regs.flag_c);
        assert!(!regs.flag_d);
    }

    #[test]
    fn test_set_nz() {
        let mut regs = Registers::default();
        regs.set_nz(0x00);
        assert!(regs.flag_z);
        assert!(!regs.flag_n);
        regs.set_nz(0x80);
        assert!(!regs.flag_z);
        assert!(regs.flag_n);
    }
}
