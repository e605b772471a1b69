//! Memory-mapped device support.
//!
//! This module provides a memory mapping layer that lets a host attach several
//! devices (RAM, a console port, custom I/O) to the 65C02 memory bus.
//!
//! # Architecture
//!
//! - **Device trait**: Abstract interface for memory-mapped hardware components
//! - **MappedMemory**: Routes read/write operations to registered devices based on address ranges
//! - **Device implementations**: `RamDevice` and the single-byte `ConsoleDevice`
//!
//! # Example
//!
//! ```rust
//! use lib65c02::{CPU, ConsoleDevice, MappedMemory, RamDevice};
//!
//! let mut memory = MappedMemory::new();
//!
//! // 32KB RAM at 0x0000-0x7FFE, console at 0x7FFF, 32KB RAM above
//! memory.add_device(0x0000, Box::new(RamDevice::new(0x7FFF))).unwrap();
//! memory.add_device(0x7FFF, Box::new(ConsoleDevice::new())).unwrap();
//! memory.add_device(0x8000, Box::new(RamDevice::new(0x8000))).unwrap();
//!
//! let cpu = CPU::new(memory);
//! ```

use crate::MemoryBus;

pub mod console;
pub mod ram;

pub use console::ConsoleDevice;
pub use ram::RamDevice;

/// Abstract interface for memory-mapped hardware devices.
///
/// The memory mapper calls these methods with offset-based addressing (0 to size-1),
/// so a device does not need to know where it is mapped.
///
/// # Design
///
/// - **Offset-based**: Device receives offset (0 to size-1), not absolute address
/// - **No panics**: All operations must succeed
/// - **Mutable read**: Reading may consume input or update a latch
///
/// # Examples
///
/// ```rust
/// use lib65c02::Device;
///
/// struct Counter {
///     reads: u8,
/// }
///
/// impl Device for Counter {
///     fn read(&mut self, _offset: u16) -> u8 {
///         self.reads = self.reads.wrapping_add(1);
///         self.reads
///     }
///
///     fn write(&mut self, _offset: u16, value: u8) {
///         self.reads = value;
///     }
///
///     fn size(&self) -> u16 {
///         1
///     }
/// }
/// ```
pub trait Device {
    /// Read byte from device at offset relative to device base address.
    fn read(&mut self, offset: u16) -> u8;

    /// Write byte to device at offset relative to device base address.
    fn write(&mut self, offset: u16, value: u8);

    /// Size of the device's address space in bytes.
    fn size(&self) -> u16;
}

/// Internal mapping of a device to a base address.
struct DeviceMapping {
    base_addr: u16,
    device: Box<dyn Device>,
}

impl DeviceMapping {
    /// Offset of `addr` within this device, if the device covers it.
    fn offset_of(&self, addr: u16) -> Option<u16> {
        let offset = addr.wrapping_sub(self.base_addr);
        (addr >= self.base_addr && offset < self.device.size()).then_some(offset)
    }
}

/// Error returned when device registration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Address range overlaps with an existing device.
    Overlap {
        /// Base address of the new device
        new_base: u16,
        /// Size of the new device
        new_size: u16,
        /// Base address of the conflicting existing device
        existing_base: u16,
        /// Size of the conflicting existing device
        existing_size: u16,
    },
    /// The device has a size of zero.
    EmptyDevice {
        /// Base address requested for the device
        base: u16,
    },
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DeviceError::Overlap {
                new_base,
                new_size,
                existing_base,
                existing_size,
            } => {
                write!(
                    f,
                    "Device address range overlap: new device at 0x{:04X}-0x{:04X} overlaps with existing device at 0x{:04X}-0x{:04X}",
                    new_base,
                    new_base.saturating_add(new_size.saturating_sub(1)),
                    existing_base,
                    existing_base.saturating_add(existing_size.saturating_sub(1))
                )
            }
            DeviceError::EmptyDevice { base } => {
                write!(f, "Device at 0x{:04X} has zero size", base)
            }
        }
    }
}

impl std::error::Error for DeviceError {}

/// Memory mapper that routes read/write operations to registered devices.
///
/// Unmapped reads return 0xFF (floating bus) and unmapped writes are ignored.
///
/// # Examples
///
/// ```rust
/// use lib65c02::{MappedMemory, RamDevice, MemoryBus};
///
/// let mut memory = MappedMemory::new();
/// memory.add_device(0x0000, Box::new(RamDevice::new(16384))).unwrap();
///
/// memory.write(0x1234, 0x42);
/// assert_eq!(memory.read(0x1234), 0x42);
///
/// // Unmapped address returns 0xFF
/// assert_eq!(memory.read(0x8000), 0xFF);
/// ```
pub struct MappedMemory {
    devices: Vec<DeviceMapping>,
    unmapped_value: u8,
}

impl MappedMemory {
    /// Create a new empty memory mapper.
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            unmapped_value: 0xFF,
        }
    }

    /// Register a device at the specified base address.
    ///
    /// The device occupies `base_addr` to `base_addr + device.size() - 1`, clipped
    /// at 0xFFFF.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Device registered successfully
    /// * `Err(DeviceError::Overlap)` - Address range overlaps with existing device
    /// * `Err(DeviceError::EmptyDevice)` - The device reports a size of zero
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lib65c02::{DeviceError, MappedMemory, RamDevice};
    ///
    /// let mut memory = MappedMemory::new();
    /// memory.add_device(0x0000, Box::new(RamDevice::new(16384))).unwrap();
    ///
    /// let result = memory.add_device(0x1000, Box::new(RamDevice::new(1024)));
    /// assert!(matches!(result, Err(DeviceError::Overlap { .. })));
    /// ```
    pub fn add_device(
        &mut self,
        base_addr: u16,
        device: Box<dyn Device>,
    ) -> Result<(), DeviceError> {
        let new_size = device.size();
        if new_size == 0 {
            return Err(DeviceError::EmptyDevice { base: base_addr });
        }
        // Inclusive end avoids overflow for devices ending at 0xFFFF
        let new_last = base_addr.saturating_add(new_size - 1);

        for mapping in &self.devices {
            let existing_size = mapping.device.size();
            let existing_last = mapping.base_addr.saturating_add(existing_size - 1);

            if base_addr <= existing_last && mapping.base_addr <= new_last {
                return Err(DeviceError::Overlap {
                    new_base: base_addr,
                    new_size,
                    existing_base: mapping.base_addr,
                    existing_size,
                });
            }
        }

        self.devices.push(DeviceMapping { base_addr, device });
        Ok(())
    }

    /// Sets the value returned by reads of unmapped addresses.
    pub fn set_unmapped_value(&mut self, value: u8) {
        self.unmapped_value = value;
    }

    fn find_device(&mut self, addr: u16) -> Option<(&mut (dyn Device + 'static), u16)> {
        self.devices.iter_mut().find_map(|mapping| {
            let offset = mapping.offset_of(addr)?;
            Some((mapping.device.as_mut(), offset))
        })
    }
}

impl Default for MappedMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for MappedMemory {
    fn read(&mut self, addr: u16) -> u8 {
        let unmapped = self.unmapped_value;
        match self.find_device(addr) {
            Some((device, offset)) => device.read(offset),
            None => unmapped,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let Some((device, offset)) = self.find_device(addr) {
            device.write(offset, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_memory_empty() {
        let mut memory = MappedMemory::new();
        assert_eq!(memory.read(0x0000), 0xFF);
        assert_eq!(memory.read(0x1234), 0xFF);
        assert_eq!(memory.read(0xFFFF), 0xFF);
    }

    #[test]
    fn test_mapped_memory_multiple_devices() {
        let mut memory = MappedMemory::new();
        memory.add_device(0x0000, Box::new(RamDevice::new(256))).unwrap();
        memory.add_device(0x1000, Box::new(RamDevice::new(256))).unwrap();

        memory.write(0x0042, 0xAA);
        memory.write(0x1042, 0xBB);

        assert_eq!(memory.read(0x0042), 0xAA);
        assert_eq!(memory.read(0x1042), 0xBB);
        assert_eq!(memory.read(0x0500), 0xFF);
    }

    #[test]
    fn test_overlap_detection() {
        let mut memory = MappedMemory::new();
        memory.add_device(0x1000, Box::new(RamDevice::new(256))).unwrap();

        assert!(memory.add_device(0x1080, Box::new(RamDevice::new(256))).is_err());
        assert!(memory.add_device(0x0F80, Box::new(RamDevice::new(256))).is_err());

        // Exactly adjacent on either side
        assert!(memory.add_device(0x0F00, Box::new(RamDevice::new(256))).is_ok());
        assert!(memory.add_device(0x1100, Box::new(RamDevice::new(256))).is_ok());
    }

    #[test]
    fn test_device_at_top_of_memory() {
        let mut memory = MappedMemory::new();
        memory.add_device(0xFF00, Box::new(RamDevice::new(256))).unwrap();
        memory.write(0xFFFF, 0x12);
        assert_eq!(memory.read(0xFFFF), 0x12);
        assert!(memory.add_device(0xFFFF, Box::new(RamDevice::new(1))).is_err());
    }

    #[test]
    fn test_zero_sized_device_rejected() {
        let mut memory = MappedMemory::new();
        let result = memory.add_device(0x2000, Box::new(RamDevice::new(0)));
        assert_eq!(result, Err(DeviceError::EmptyDevice { base: 0x2000 }));
    }

    #[test]
    fn test_unmapped_write_ignored() {
        let mut memory = MappedMemory::new();
        memory.write(0x1234, 0x42);
        assert_eq!(memory.read(0x1234), 0xFF);

        memory.set_unmapped_value(0x00);
        assert_eq!(memory.read(0x1234), 0x00);
    }
}
