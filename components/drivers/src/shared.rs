//! Serial port shared between the shell and the logger
//!
//! The port sits behind a spin lock. [`SharedSerial`] is the shell's handle
//! and takes the lock for each call; [`SerialLogger`] queues whole records
//! through the same transmit queue. A record therefore lands after every
//! byte already queued and never splits a reply line.

use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record};
use ohnebs_hal::{CharDevice, TextWriter};
use spin::Mutex;

/// [`CharDevice`] handle onto a locked port
pub struct SharedSerial<'a, D> {
    port: &'a Mutex<D>,
}

impl<'a, D: CharDevice> SharedSerial<'a, D> {
    pub const fn new(port: &'a Mutex<D>) -> Self {
        Self { port }
    }
}

impl<D: CharDevice> CharDevice for SharedSerial<'_, D> {
    fn read_byte(&mut self) -> Option<u8> {
        self.port.lock().read_byte()
    }

    fn write_byte(&mut self, byte: u8) {
        self.port.lock().write_byte(byte);
    }

    fn flush(&mut self) {
        self.port.lock().flush();
    }

    fn write_text(&mut self, text: &str) {
        self.port.lock().write_text(text);
    }
}

/// `log` backend writing `[LEVEL] target: message` lines to a locked port
///
/// A record raised while the port is already locked is dropped; waiting
/// would deadlock on a single core.
pub struct SerialLogger<'a, D> {
    port: &'a Mutex<D>,
    level: LevelFilter,
}

impl<'a, D: CharDevice> SerialLogger<'a, D> {
    pub const fn new(port: &'a Mutex<D>, level: LevelFilter) -> Self {
        Self { port, level }
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

impl<D: CharDevice + Send> Log for SerialLogger<'_, D> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let Some(mut port) = self.port.try_lock() else {
            return;
        };
        let _ = write!(
            TextWriter::new(&mut *port),
            "[{}] {}: {}\n",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        if let Some(mut port) = self.port.try_lock() {
            port.flush();
        }
    }
}
