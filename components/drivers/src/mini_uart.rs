//! BCM2711 AUX mini UART (UART1)
//!
//! Polled serial driver with a software transmit queue. Application writes
//! land in a [`TxRing`]; bytes leave the ring only in [`MiniUart::flush`],
//! which moves them into the 8-byte hardware FIFO while the line status
//! register reports the transmitter ready. Both the write and the read path
//! call it, so output keeps moving without a background task.
//!
//! Configuration: 115200 baud, 8 data bits, no parity, interrupts disabled,
//! TXD1/RXD1 on GPIO 14/15 (alternate function 5).

use core::fmt;

use bitflags::bitflags;
use ohnebs_hal::{CharDevice, RegisterAccess};
use static_assertions::const_assert;

use crate::gpio::{self, Gpio};
use crate::ring_buffer::TxRing;
use crate::PERIPHERAL_BASE;

// ============================================================================
// AUX Register Addresses
// ============================================================================

const AUX_BASE: usize = PERIPHERAL_BASE + 0x0021_5000;

pub const AUX_ENABLES: usize = AUX_BASE + 0x04;
pub const AUX_MU_IO_REG: usize = AUX_BASE + 0x40; // Data (TX write / RX read)
pub const AUX_MU_IER_REG: usize = AUX_BASE + 0x44; // Interrupt enable
pub const AUX_MU_IIR_REG: usize = AUX_BASE + 0x48; // Interrupt identify / FIFO clear
pub const AUX_MU_LCR_REG: usize = AUX_BASE + 0x4C; // Line control
pub const AUX_MU_MCR_REG: usize = AUX_BASE + 0x50; // Modem control
pub const AUX_MU_LSR_REG: usize = AUX_BASE + 0x54; // Line status
pub const AUX_MU_CNTL_REG: usize = AUX_BASE + 0x60; // Extra control
pub const AUX_MU_STAT_REG: usize = AUX_BASE + 0x64; // Extra status
pub const AUX_MU_BAUD_REG: usize = AUX_BASE + 0x68; // Baud divisor

/// Core clock feeding the mini UART on the Pi 4
pub const AUX_UART_CLOCK: u32 = 500_000_000;

/// Software transmit queue size (must be a power of two)
pub const TX_QUEUE_CAPACITY: usize = 16 * 1024;
const_assert!(TX_QUEUE_CAPACITY.is_power_of_two());

/// 8-bit data mode (both LCR bits must be set on the mini UART)
const LCR_8BIT: u32 = 0b11;

/// Clear both FIFOs, interrupts stay disabled
const IIR_CLEAR_FIFOS: u32 = 0xC6;

bitflags! {
    /// AUX_ENABLES bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AuxEnables: u32 {
        const MINI_UART = 1 << 0;
        const SPI1      = 1 << 1;
        const SPI2      = 1 << 2;
    }
}

bitflags! {
    /// AUX_MU_LSR_REG bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineStatus: u32 {
        /// Receive FIFO holds at least one byte
        const DATA_READY = 1 << 0;
        /// Receive FIFO overrun
        const RX_OVERRUN = 1 << 1;
        /// Transmit FIFO can accept at least one byte
        const TX_READY   = 1 << 5;
        /// Transmit FIFO empty and transmitter idle
        const TX_IDLE    = 1 << 6;
    }
}

bitflags! {
    /// AUX_MU_CNTL_REG bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Control: u32 {
        const RX_ENABLE = 1 << 0;
        const TX_ENABLE = 1 << 1;
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Line and pin configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    /// Clock feeding the baud generator (Hz)
    pub clock_hz: u32,
    /// Bit rate; must be non-zero and at most `clock_hz / 8`
    pub baud: u32,
    /// Transmit pin (ALT5)
    pub tx_pin: u32,
    /// Receive pin (ALT5)
    pub rx_pin: u32,
}

impl UartConfig {
    pub const DEFAULT: Self = Self {
        clock_hz: AUX_UART_CLOCK,
        baud: 115_200,
        tx_pin: 14,
        rx_pin: 15,
    };

    /// Baud divisor: `clock / (baud * 8) - 1`
    ///
    /// Out-of-range rates saturate: a zero baud gives the slowest divisor,
    /// a rate above `clock_hz / 8` gives 0.
    pub const fn divisor(&self) -> u32 {
        let Some(scaled) = self.baud.checked_mul(8) else {
            return 0;
        };
        match self.clock_hz.checked_div(scaled) {
            Some(ratio) => ratio.saturating_sub(1),
            None => u32::MAX,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ============================================================================
// Buffered Driver
// ============================================================================

/// Mini UART driver with a software transmit queue
///
/// `N` is the queue size; it must be a power of two.
pub struct MiniUart<R, const N: usize = TX_QUEUE_CAPACITY> {
    regs: R,
    config: UartConfig,
    tx_queue: TxRing<N>,
}

impl<R: RegisterAccess, const N: usize> MiniUart<R, N> {
    /// Create a driver; the hardware is untouched until [`init`](Self::init)
    pub const fn new(regs: R, config: UartConfig) -> Self {
        Self {
            regs,
            config,
            tx_queue: TxRing::new(),
        }
    }

    /// Configure the mini UART and route its pins
    ///
    /// Transmit and receive stay disabled until the line is fully
    /// configured; a pin routing failure aborts before enabling them.
    pub fn init(&mut self) -> gpio::Result<()> {
        let regs = &self.regs;
        regs.write(AUX_ENABLES, AuxEnables::MINI_UART.bits());
        regs.write(AUX_MU_IER_REG, 0);
        regs.write(AUX_MU_CNTL_REG, 0);
        regs.write(AUX_MU_LCR_REG, LCR_8BIT);
        regs.write(AUX_MU_MCR_REG, 0);
        regs.write(AUX_MU_IIR_REG, IIR_CLEAR_FIFOS);
        regs.write(AUX_MU_BAUD_REG, self.config.divisor());

        let gpio = Gpio::new(regs);
        gpio.use_as_alt5(self.config.tx_pin)?;
        gpio.use_as_alt5(self.config.rx_pin)?;

        regs.write(AUX_MU_CNTL_REG, (Control::RX_ENABLE | Control::TX_ENABLE).bits());

        log::debug!(
            "{} baud, divisor {}, pins {}/{}",
            self.config.baud,
            self.config.divisor(),
            self.config.tx_pin,
            self.config.rx_pin
        );
        Ok(())
    }

    pub fn config(&self) -> &UartConfig {
        &self.config
    }

    /// Bytes queued but not yet handed to the hardware FIFO
    pub fn pending(&self) -> usize {
        self.tx_queue.len()
    }

    fn line_status(&self) -> LineStatus {
        LineStatus::from_bits_truncate(self.regs.read(AUX_MU_LSR_REG))
    }

    fn tx_ready(&self) -> bool {
        self.line_status().contains(LineStatus::TX_READY)
    }

    /// Push one byte into the hardware FIFO, spinning until it has room
    fn write_fifo(&self, byte: u8) {
        while !self.tx_ready() {
            core::hint::spin_loop();
        }
        self.regs.write(AUX_MU_IO_REG, byte as u32);
    }

    /// Move queued bytes into the hardware FIFO while it accepts them
    ///
    /// This is the only place bytes leave the transmit queue.
    pub fn flush(&mut self) {
        while !self.tx_queue.is_empty() && self.tx_ready() {
            if let Some(byte) = self.tx_queue.peek() {
                self.write_fifo(byte);
                self.tx_queue.pop();
            }
        }
    }

    /// Queue one byte, draining to the hardware while the queue is full
    ///
    /// Spins with no timeout: a transmitter that never becomes ready blocks
    /// here forever.
    pub fn write_byte_blocking(&mut self, byte: u8) {
        while self.tx_queue.push(byte).is_err() {
            self.flush();
            core::hint::spin_loop();
        }
    }

    /// Queue text with `\n` expanded to `\r\n`, then start draining
    pub fn write_text(&mut self, text: &str) {
        for byte in text.bytes() {
            if byte == b'\n' {
                self.write_byte_blocking(b'\r');
            }
            self.write_byte_blocking(byte);
        }
        self.flush();
    }

    /// Non-blocking read of one received byte
    ///
    /// Services the transmit queue first so reads also move output along.
    pub fn try_read_byte(&mut self) -> Option<u8> {
        self.flush();

        if self.line_status().contains(LineStatus::DATA_READY) {
            Some(self.regs.read(AUX_MU_IO_REG) as u8)
        } else {
            None
        }
    }
}

impl<R: RegisterAccess, const N: usize> CharDevice for MiniUart<R, N> {
    fn read_byte(&mut self) -> Option<u8> {
        self.try_read_byte()
    }

    fn write_byte(&mut self, byte: u8) {
        self.write_byte_blocking(byte);
    }

    fn flush(&mut self) {
        MiniUart::flush(self);
    }

    fn write_text(&mut self, text: &str) {
        MiniUart::write_text(self, text);
    }
}

impl<R: RegisterAccess, const N: usize> fmt::Write for MiniUart<R, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_text(s);
        Ok(())
    }
}

// ============================================================================
// Unbuffered Writer
// ============================================================================

/// Minimal unbuffered writer for early boot and log output
///
/// Bypasses the transmit queue and writes straight into the hardware FIFO.
/// Assumes [`MiniUart::init`] has already configured the line.
pub struct RawUart<R> {
    regs: R,
}

impl<R: RegisterAccess> RawUart<R> {
    pub const fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Write a single byte, spinning until the FIFO has room
    pub fn putc(&self, byte: u8) {
        while !LineStatus::from_bits_truncate(self.regs.read(AUX_MU_LSR_REG))
            .contains(LineStatus::TX_READY)
        {
            core::hint::spin_loop();
        }
        self.regs.write(AUX_MU_IO_REG, byte as u32);
    }

    /// Write a string, CRLF for terminals
    pub fn puts(&self, s: &str) {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.putc(b'\r');
            }
            self.putc(byte);
        }
    }
}

impl<R: RegisterAccess> fmt::Write for RawUart<R> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.puts(s);
        Ok(())
    }
}
