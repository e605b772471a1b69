//! Single-byte console port.
//!
//! A write to the port sends the byte to the output callback. A read takes the next
//! input byte, from the input callback if one is installed, otherwise from the
//! queue filled by `push_input`. With no input available a read returns 0x00.
//! Either access latches the byte, which `last_value` reports.

use std::collections::VecDeque;

use super::Device;

/// A one-byte memory-mapped console.
///
/// # Examples
///
/// ```rust
/// use lib65c02::{ConsoleDevice, Device};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let output = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&output);
///
/// let mut console = ConsoleDevice::new();
/// console.set_output_callback(move |byte| sink.borrow_mut().push(byte));
/// console.push_input(b"hi");
///
/// console.write(0, b'!');
/// assert_eq!(*output.borrow(), vec![b'!']);
///
/// assert_eq!(console.read(0), b'h');
/// assert_eq!(console.read(0), b'i');
/// assert_eq!(console.read(0), 0x00);
/// ```
#[derive(Default)]
pub struct ConsoleDevice {
    input: VecDeque<u8>,
    on_output: Option<Box<dyn FnMut(u8)>>,
    on_input: Option<Box<dyn FnMut() -> Option<u8>>>,
    latch: u8,
}

impl ConsoleDevice {
    /// Create a console with no callbacks and an empty input queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the function called with every byte written to the port.
    pub fn set_output_callback<F>(&mut self, callback: F)
    where
        F: FnMut(u8) + 'static,
    {
        self.on_output = Some(Box::new(callback));
    }

    /// Set the function asked for a byte on every read of the port.
    ///
    /// When it returns `None` the read falls back to the input queue.
    pub fn set_input_callback<F>(&mut self, callback: F)
    where
        F: FnMut() -> Option<u8> + 'static,
    {
        self.on_input = Some(Box::new(callback));
    }

    /// Queue bytes to be returned by subsequent reads.
    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes);
    }

    /// Number of queued input bytes.
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// The byte most recently read from or written to the port.
    pub fn last_value(&self) -> u8 {
        self.latch
    }
}

impl Device for ConsoleDevice {
    fn read(&mut self, _offset: u16) -> u8 {
        let from_callback = self.on_input.as_mut().and_then(|input| input());
        self.latch = from_callback
            .or_else(|| self.input.pop_front())
            .unwrap_or(0x00);
        self.latch
    }

    fn write(&mut self, _offset: u16, value: u8) {
        self.latch = value;
        if let Some(output) = self.on_output.as_mut() {
            output(value);
        }
    }

    fn size(&self) -> u16 {
        1
    }
}
