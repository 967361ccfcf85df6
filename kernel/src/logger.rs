//! `log` backend for the kernel
//!
//! Records are queued on the shell's own serial port (see
//! [`SerialLogger`]), behind any reply bytes already waiting, so a log line
//! always starts and ends on a line of its own. Panics bypass the queue
//! through [`RawUart`] since the port may be locked when they happen.

use ohnebs_drivers::{RawUart, SerialLogger};
use ohnebs_hal::Mmio;

use crate::{config, SerialPort, SERIAL};

static LOGGER: SerialLogger<'static, SerialPort> = SerialLogger::new(&SERIAL, config::LOG_LEVEL);

/// Unbuffered writer on the mini UART
pub fn raw_uart() -> RawUart<Mmio> {
    // SAFETY: single core; the panic path is the only other writer and never
    // returns to the shell
    RawUart::new(unsafe { Mmio::new() })
}

/// Install the logger; the UART must already be initialized
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(config::LOG_LEVEL);
    }
}
