//! OhneBS kernel image
//!
//! Brings up the mini UART, installs the logger and hands the serial line
//! to the shell, which is polled forever.

#![no_std]
#![no_main]

mod boot;
mod config;
mod logger;

use core::fmt::Write;
use core::panic::PanicInfo;

use ohnebs_console::Console;
use ohnebs_drivers::{MiniUart, SharedSerial};
use ohnebs_hal::Mmio;
use ohnebs_shell::{Shell, VariableStore};
use spin::Mutex;

pub(crate) type SerialPort = MiniUart<Mmio>;

/// The mini UART, shared by the shell and the logger
// SAFETY: the AUX and GPIO registers are valid device registers on the Pi 4
pub(crate) static SERIAL: Mutex<SerialPort> = Mutex::new(MiniUart::new(unsafe { Mmio::new() }, config::UART));

#[no_mangle]
pub extern "C" fn kernel_main() -> ! {
    let routed = SERIAL.lock().init();

    logger::init();
    match routed {
        Ok(()) => log::info!("OhneBS booting, serial at {} baud", config::UART.baud),
        Err(e) => log::error!("serial pins not routed: {}", e),
    }

    let mut console = Console::new(SharedSerial::new(&SERIAL), config::renderer(), config::CONSOLE);
    console.init();

    let mut vars = VariableStore::new();
    let mut shell = Shell::new(console, &mut vars);
    shell.greet();
    shell.run()
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    let _ = write!(logger::raw_uart(), "\n[PANIC] {}\n", info);
    loop {
        core::hint::spin_loop();
    }
}
