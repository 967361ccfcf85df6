//! OhneBS HAL - Hardware access layer shared by every OhneBS crate
//!
//! # Purpose
//! Provides the lowest layer of the console stack:
//! - [`RegisterAccess`]: uncached, unreordered 32-bit register loads/stores
//! - [`BitField`]: sub-field packing for read-modify-write updates
//! - [`CharDevice`]: the byte channel the shell talks through
//! - [`numfmt`]: allocation-free integer/text conversion
//!
//! # Testing Strategy
//! Enable the `mock` feature to get [`mock::MockRegisters`], an in-memory
//! register file that stands in for real MMIO on the host.

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

use core::fmt;

pub mod mmio;
pub mod numfmt;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use mmio::{BitField, FieldOverflow, Mmio, RegisterAccess};

/// Byte-oriented terminal channel
///
/// Implemented by the UART driver and by the console that mirrors it. The
/// shell is generic over this trait so it can run against either one, or
/// against a recording fake in tests.
pub trait CharDevice {
    /// Poll for one received byte (non-blocking)
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue one byte for transmission, blocking while the channel is full
    fn write_byte(&mut self, byte: u8);

    /// Push queued output toward the hardware
    fn flush(&mut self) {}

    /// Write text, translating `\n` into `\r\n`, then flush
    fn write_text(&mut self, text: &str) {
        for byte in text.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
        self.flush();
    }

    /// Write a signed decimal integer
    fn write_int(&mut self, value: i32) {
        let mut buf = [0u8; numfmt::I32_TEXT_LEN];
        self.write_text(numfmt::format_i32(value, &mut buf));
    }
}

impl<D: CharDevice + ?Sized> CharDevice for &mut D {
    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte)
    }

    fn flush(&mut self) {
        (**self).flush()
    }

    fn write_text(&mut self, text: &str) {
        (**self).write_text(text)
    }

    fn write_int(&mut self, value: i32) {
        (**self).write_int(value)
    }
}

/// Wrapper for using a [`CharDevice`] with `core::fmt::Write`
pub struct TextWriter<'a, D: CharDevice + ?Sized> {
    device: &'a mut D,
}

impl<'a, D: CharDevice + ?Sized> TextWriter<'a, D> {
    pub fn new(device: &'a mut D) -> Self {
        Self { device }
    }
}

impl<D: CharDevice + ?Sized> fmt::Write for TextWriter<'_, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.device.write_text(s);
        Ok(())
    }
}
