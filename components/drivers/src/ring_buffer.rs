//! Transmit ring buffer for the UART
//!
//! Fixed-capacity circular byte queue with independent write and read
//! cursors. Capacity must be a power of two so cursors wrap with a mask.
//! One slot is always left empty to tell full from empty:
//! - `write == read` means empty
//! - `(write + 1) & mask == read` means full
//!
//! so at most `N - 1` bytes are ever buffered.

use thiserror::Error;

/// Queue had no free slot
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("transmit queue full ({buffered} bytes buffered)")]
pub struct QueueFull {
    pub buffered: usize,
}

/// Ring buffer for outgoing bytes
pub struct TxRing<const N: usize> {
    buffer: [u8; N],
    write: usize, // Producer cursor
    read: usize,  // Drain cursor
}

impl<const N: usize> TxRing<N> {
    const MASK: usize = N - 1;

    /// Create a new empty ring buffer
    ///
    /// # Panics
    /// Panics if N is not a power of two of at least 2 (at compile time when
    /// used in a const context)
    pub const fn new() -> Self {
        assert!(N >= 2 && N.is_power_of_two(), "Ring buffer size must be power of 2");
        Self {
            buffer: [0; N],
            write: 0,
            read: 0,
        }
    }

    /// Maximum number of bytes that can be buffered at once
    pub const fn usable_capacity(&self) -> usize {
        N - 1
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.write == self.read
    }

    /// Check if the buffer is full
    pub fn is_full(&self) -> bool {
        ((self.write + 1) & Self::MASK) == self.read
    }

    /// Number of buffered-but-undrained bytes
    pub fn len(&self) -> usize {
        self.write.wrapping_sub(self.read) & Self::MASK
    }

    /// Push a byte into the buffer
    pub fn push(&mut self, byte: u8) -> Result<(), QueueFull> {
        let next = (self.write + 1) & Self::MASK;
        if next == self.read {
            return Err(QueueFull {
                buffered: self.len(),
            });
        }

        self.buffer[self.write] = byte;
        self.write = next;
        Ok(())
    }

    /// Peek at the oldest byte without removing it
    pub fn peek(&self) -> Option<u8> {
        if self.is_empty() {
            None
        } else {
            Some(self.buffer[self.read])
        }
    }

    /// Pop the oldest byte
    pub fn pop(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.read = (self.read + 1) & Self::MASK;
        Some(byte)
    }

    /// Drop everything buffered
    pub fn clear(&mut self) {
        self.write = 0;
        self.read = 0;
    }
}

impl<const N: usize> Default for TxRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
