//! OhneBS Drivers - GPIO and serial drivers for the Raspberry Pi 4 (BCM2711)
//!
//! # Purpose
//! Routes the mini UART onto the header pins and runs it as a polled serial
//! port with a software transmit queue in front of the 8-byte hardware FIFO.
//!
//! # Integration Points
//! - Depends on: `ohnebs-hal` for register access
//! - Provides to: console and shell (`MiniUart` implements `CharDevice`),
//!   kernel logging (`SerialLogger` shares the port with the shell)
//!
//! # Architecture
//! Single thread of control, no interrupts. Every register access goes
//! through a [`RegisterAccess`](ohnebs_hal::RegisterAccess) implementation so
//! the drivers run unchanged against an in-memory register file in tests.

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod gpio;
pub mod mini_uart;
pub mod ring_buffer;
pub mod shared;

pub use gpio::{Function, Gpio, GpioError, Pull};
pub use mini_uart::{MiniUart, RawUart, UartConfig, TX_QUEUE_CAPACITY};
pub use ring_buffer::{QueueFull, TxRing};
pub use shared::{SerialLogger, SharedSerial};

/// BCM2711 peripheral base address (Pi 4, low-peripheral mode)
pub const PERIPHERAL_BASE: usize = 0xFE00_0000;
