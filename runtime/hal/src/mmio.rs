//! MMIO register access
//!
//! Hardware registers live at fixed physical addresses. Every access must be
//! a real 32-bit load or store that the compiler can neither elide, merge nor
//! reorder against other register accesses: this is the only mechanism that
//! sequences configuration writes against their hardware effects.
//!
//! Drivers are written against [`RegisterAccess`] rather than raw pointers so
//! the same GPIO and UART logic runs on target ([`Mmio`]) and on the host
//! against an in-memory register file (`mock::MockRegisters`).

use core::ptr::{read_volatile, write_volatile};
use thiserror::Error;

/// 32-bit register load/store interface
pub trait RegisterAccess {
    /// Load the 32-bit register at `addr`
    fn read(&self, addr: usize) -> u32;

    /// Store `value` into the 32-bit register at `addr`
    fn write(&self, addr: usize, value: u32);

    /// Extract `field` from the register at `addr`
    fn read_field(&self, addr: usize, field: BitField) -> u32 {
        field.extract(self.read(addr))
    }

    /// Read-modify-write `field` of the register at `addr`
    ///
    /// Sibling fields are preserved. A value wider than the field is refused
    /// and the register is not touched.
    fn modify_field(&self, addr: usize, field: BitField, value: u32) -> Result<(), FieldOverflow> {
        let current = self.read(addr);
        let updated = field.insert(current, value)?;
        self.write(addr, updated);
        Ok(())
    }
}

impl<R: RegisterAccess + ?Sized> RegisterAccess for &R {
    #[inline(always)]
    fn read(&self, addr: usize) -> u32 {
        (**self).read(addr)
    }

    #[inline(always)]
    fn write(&self, addr: usize, value: u32) {
        (**self).write(addr, value)
    }
}

/// Volatile access to the physical register space
///
/// There is no validation and no error path: an invalid address is undefined
/// behavior, which is why construction is `unsafe`.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Create the register accessor
    ///
    /// # Safety
    /// The caller must ensure every address later passed to `read`/`write`
    /// is a valid, mapped, 4-byte aligned device register.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterAccess for Mmio {
    #[inline(always)]
    fn read(&self, addr: usize) -> u32 {
        // SAFETY: guaranteed by the contract of `Mmio::new`
        unsafe { read_volatile(addr as *const u32) }
    }

    #[inline(always)]
    fn write(&self, addr: usize, value: u32) {
        // SAFETY: guaranteed by the contract of `Mmio::new`
        unsafe { write_volatile(addr as *mut u32, value) }
    }
}

/// Value does not fit the bit-field it was written to
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("value {value:#x} does not fit in a {width}-bit field")]
pub struct FieldOverflow {
    pub value: u32,
    pub width: u32,
}

/// A `width`-bit field located `shift` bits into a 32-bit register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    width: u32,
    shift: u32,
}

impl BitField {
    /// # Panics
    /// Panics (at compile time in const context) if the field does not fit
    /// inside 32 bits.
    pub const fn new(width: u32, shift: u32) -> Self {
        assert!(width >= 1 && width <= 32, "field width must be 1..=32");
        assert!(shift + width <= 32, "field must fit inside the register");
        Self { width, shift }
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn shift(&self) -> u32 {
        self.shift
    }

    /// Mask of the field value, before shifting: `(1 << width) - 1`
    pub const fn mask(&self) -> u32 {
        if self.width == 32 {
            u32::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    pub const fn fits(&self, value: u32) -> bool {
        value <= self.mask()
    }

    pub const fn extract(&self, register: u32) -> u32 {
        (register >> self.shift) & self.mask()
    }

    /// Return `register` with this field replaced by `value`
    pub const fn insert(&self, register: u32, value: u32) -> Result<u32, FieldOverflow> {
        if !self.fits(value) {
            return Err(FieldOverflow {
                value,
                width: self.width,
            });
        }
        let cleared = register & !(self.mask() << self.shift);
        Ok(cleared | (value << self.shift))
    }
}
