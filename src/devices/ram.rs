//! RAM device implementation.

use super::Device;

/// Simple RAM device with readable and writable storage.
///
/// # Examples
///
/// ```rust
/// use lib65c02::{RamDevice, Device};
///
/// let mut ram = RamDevice::new(1024); // 1KB RAM
///
/// ram.write(0x42, 0xAA);
/// assert_eq!(ram.read(0x42), 0xAA);
/// ```
pub struct RamDevice {
    data: Vec<u8>,
}

impl RamDevice {
    /// Create a new RAM device of `size` bytes, all zero.
    pub fn new(size: u16) -> Self {
        Self {
            data: vec![0; size as usize],
        }
    }

    /// Load bytes into RAM at the specified offset.
    ///
    /// Bytes that would fall past the end of the device are dropped. Returns the
    /// number of bytes actually stored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lib65c02::{RamDevice, Device};
    ///
    /// let mut ram = RamDevice::new(4);
    /// assert_eq!(ram.load_bytes(2, &[0x01, 0x02, 0x03]), 2);
    ///
    /// assert_eq!(ram.read(2), 0x01);
    /// assert_eq!(ram.read(3), 0x02);
    /// ```
    pub fn load_bytes(&mut self, offset: u16, bytes: &[u8]) -> usize {
        let start = (offset as usize).min(self.data.len());
        let count = bytes.len().min(self.data.len() - start);
        self.data[start..start + count].copy_from_slice(&bytes[..count]);
        count
    }
}

impl Device for RamDevice {
    fn read(&mut self, offset: u16) -> u8 {
        self.data.get(offset as usize).copied().unwrap_or(0xFF)
    }

    fn write(&mut self, offset: u16, value: u8) {
        if let Some(slot) = self.data.get_mut(offset as usize) {
            *slot = value;
        }
    }

    fn size(&self) -> u16 {
        self.data.len() as u16
    }
}
