//! GPIO pin configuration for the BCM2711
//!
//! Each pin owns a small bit-field inside a bank of shared 32-bit registers:
//! - Function select (GPFSELn): 3 bits per pin, 10 pins per register
//! - Pull up/down (GPIO_PUP_PDN_CNTRL_REGn): 2 bits per pin, 16 pins per register
//! - Output set/clear (GPSETn / GPCLRn): 1 bit per pin, 32 pins per register
//!
//! All three are updated with the same packed-field read-modify-write.

use ohnebs_hal::{BitField, FieldOverflow, RegisterAccess};
use thiserror::Error;

use crate::PERIPHERAL_BASE;

// ============================================================================
// GPIO Register Addresses
// ============================================================================

const GPIO_BASE: usize = PERIPHERAL_BASE + 0x0020_0000;

/// Function select bank (GPIO 0-53)
pub const GPFSEL0: usize = GPIO_BASE + 0x00;

/// Output set bank
pub const GPSET0: usize = GPIO_BASE + 0x1C;

/// Output clear bank
pub const GPCLR0: usize = GPIO_BASE + 0x28;

/// Pull-up/down control bank (BCM2711 only)
pub const GPPUPPDN0: usize = GPIO_BASE + 0xE4;

/// Highest pin number on the BCM2711
pub const GPIO_MAX_PIN: u32 = 53;

const FUNCTION_WIDTH: u32 = 3;
const PULL_WIDTH: u32 = 2;
const LEVEL_WIDTH: u32 = 1;

// ============================================================================
// GPIO Values
// ============================================================================

/// Pin function select values (3 bits each)
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Input = 0b000,
    Output = 0b001,
    Alt0 = 0b100,
    Alt1 = 0b101,
    Alt2 = 0b110,
    Alt3 = 0b111,
    Alt4 = 0b011,
    Alt5 = 0b010,
}

/// Pull resistor configuration (2 bits each)
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    None = 0,
    Up = 1,
    Down = 2,
}

/// GPIO error types
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    #[error("GPIO pin {pin} out of range (max {max})")]
    PinOutOfRange { pin: u32, max: u32 },

    #[error(transparent)]
    ValueTooWide(#[from] FieldOverflow),
}

pub type Result<T> = core::result::Result<T, GpioError>;

// ============================================================================
// Packed Field Access
// ============================================================================

/// Locate `pin`'s field in a bank of `width`-bit fields starting at `base`
fn locate(pin: u32, base: usize, width: u32) -> (usize, BitField) {
    let fields_per_register = 32 / width;
    let addr = base + (pin / fields_per_register) as usize * 4;
    let shift = (pin % fields_per_register) * width;
    (addr, BitField::new(width, shift))
}

/// Write `value` into `pin`'s `width`-bit field of the register bank at `base`
///
/// Refuses (without touching any register) when `pin > max_pin` or when
/// `value` does not fit in `width` bits. Sibling fields sharing the register
/// are preserved.
pub fn packed_field_write<R: RegisterAccess + ?Sized>(
    regs: &R,
    pin: u32,
    value: u32,
    base: usize,
    width: u32,
    max_pin: u32,
) -> Result<()> {
    if pin > max_pin {
        log::warn!("pin {} rejected (max {})", pin, max_pin);
        return Err(GpioError::PinOutOfRange { pin, max: max_pin });
    }

    let (addr, field) = locate(pin, base, width);
    regs.modify_field(addr, field, value).map_err(|e| {
        log::warn!("{} for pin {}", e, pin);
        GpioError::from(e)
    })
}

/// Read `pin`'s `width`-bit field of the register bank at `base`
pub fn packed_field_read<R: RegisterAccess + ?Sized>(
    regs: &R,
    pin: u32,
    base: usize,
    width: u32,
    max_pin: u32,
) -> Result<u32> {
    if pin > max_pin {
        return Err(GpioError::PinOutOfRange { pin, max: max_pin });
    }

    let (addr, field) = locate(pin, base, width);
    Ok(regs.read_field(addr, field))
}

// ============================================================================
// GPIO Controller
// ============================================================================

/// GPIO controller over a register accessor
pub struct Gpio<R> {
    regs: R,
}

impl<R: RegisterAccess> Gpio<R> {
    pub const fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Set the function of a single pin
    pub fn set_function(&self, pin: u32, function: Function) -> Result<()> {
        packed_field_write(&self.regs, pin, function as u32, GPFSEL0, FUNCTION_WIDTH, GPIO_MAX_PIN)
    }

    /// Raw function select code of a pin
    pub fn function_code(&self, pin: u32) -> Result<u32> {
        packed_field_read(&self.regs, pin, GPFSEL0, FUNCTION_WIDTH, GPIO_MAX_PIN)
    }

    /// Configure the pull resistor of a single pin
    pub fn set_pull(&self, pin: u32, pull: Pull) -> Result<()> {
        packed_field_write(&self.regs, pin, pull as u32, GPPUPPDN0, PULL_WIDTH, GPIO_MAX_PIN)
    }

    /// Raw pull code of a pin
    pub fn pull_code(&self, pin: u32) -> Result<u32> {
        packed_field_read(&self.regs, pin, GPPUPPDN0, PULL_WIDTH, GPIO_MAX_PIN)
    }

    /// Drive an output pin high or low through the set/clear banks
    pub fn set_output(&self, pin: u32, high: bool) -> Result<()> {
        let bank = if high { GPSET0 } else { GPCLR0 };
        packed_field_write(&self.regs, pin, 1, bank, LEVEL_WIDTH, GPIO_MAX_PIN)
    }

    /// Route a pin to its alternate function 5 peripheral (mini UART on 14/15)
    pub fn use_as_alt5(&self, pin: u32) -> Result<()> {
        self.set_pull(pin, Pull::None)?;
        self.set_function(pin, Function::Alt5)
    }

    /// Configure a pin as a plain output with no pull resistor
    pub fn configure_output_no_pull(&self, pin: u32) -> Result<()> {
        self.set_pull(pin, Pull::None)?;
        self.set_function(pin, Function::Output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ohnebs_hal::mock::MockRegisters;

    #[test]
    fn test_field_location() {
        assert_eq!(locate(0, GPFSEL0, 3), (GPFSEL0, BitField::new(3, 0)));
        assert_eq!(locate(14, GPFSEL0, 3), (GPFSEL0 + 4, BitField::new(3, 12)));
        assert_eq!(locate(15, GPPUPPDN0, 2), (GPPUPPDN0, BitField::new(2, 30)));
        assert_eq!(locate(53, GPSET0, 1), (GPSET0 + 4, BitField::new(1, 21)));
    }

    #[test]
    fn test_write_then_read_every_pin() {
        let regs = MockRegisters::<16>::new();
        for pin in 0..=GPIO_MAX_PIN {
            let value = pin % 8;
            packed_field_write(&regs, pin, value, GPFSEL0, 3, GPIO_MAX_PIN).unwrap();
        }
        for pin in 0..=GPIO_MAX_PIN {
            assert_eq!(packed_field_read(&regs, pin, GPFSEL0, 3, GPIO_MAX_PIN), Ok(pin % 8));
        }
    }

    #[test]
    fn test_siblings_unaffected() {
        let regs = MockRegisters::<16>::new();
        regs.write(GPFSEL0 + 4, 0x3FFF_FFFF);
        packed_field_write(&regs, 14, 0b010, GPFSEL0, 3, GPIO_MAX_PIN).unwrap();
        // Pin 14 occupies bits 12..15 of GPFSEL1
        assert_eq!(regs.read(GPFSEL0 + 4), 0x3FFF_AFFF);
    }

    #[test]
    fn test_out_of_range_pin_leaves_register() {
        let regs = MockRegisters::<16>::new();
        regs.write(GPFSEL0 + 20, 0xABCD);
        let err = packed_field_write(&regs, 54, 1, GPFSEL0, 3, GPIO_MAX_PIN);
        assert_eq!(err, Err(GpioError::PinOutOfRange { pin: 54, max: 53 }));
        assert_eq!(regs.read(GPFSEL0 + 20), 0xABCD);
        assert_eq!(regs.len(), 1);
    }

    #[test]
    fn test_too_wide_value_leaves_register() {
        let regs = MockRegisters::<16>::new();
        regs.write(GPPUPPDN0, 0x5);
        let err = packed_field_write(&regs, 0, 4, GPPUPPDN0, 2, GPIO_MAX_PIN);
        assert!(matches!(err, Err(GpioError::ValueTooWide(FieldOverflow { value: 4, width: 2 }))));
        assert_eq!(regs.read(GPPUPPDN0), 0x5);
    }

    #[test]
    fn test_alt5_routing() {
        let regs = MockRegisters::<16>::new();
        regs.write(GPPUPPDN0, 0xFFFF_FFFF);
        let gpio = Gpio::new(&regs);
        gpio.use_as_alt5(14).unwrap();
        gpio.use_as_alt5(15).unwrap();

        assert_eq!(gpio.function_code(14), Ok(Function::Alt5 as u32));
        assert_eq!(gpio.function_code(15), Ok(Function::Alt5 as u32));
        assert_eq!(gpio.pull_code(14), Ok(Pull::None as u32));
        assert_eq!(gpio.pull_code(13), Ok(0b11));
    }

    #[test]
    fn test_output_no_pull_and_levels() {
        let regs = MockRegisters::<16>::new();
        let gpio = Gpio::new(&regs);
        gpio.configure_output_no_pull(42).unwrap();
        assert_eq!(gpio.function_code(42), Ok(Function::Output as u32));

        gpio.set_output(42, true).unwrap();
        assert_eq!(regs.read(GPSET0 + 4), 1 << 10);
        gpio.set_output(42, false).unwrap();
        assert_eq!(regs.read(GPCLR0 + 4), 1 << 10);
    }

    #[test]
    fn test_controller_propagates_range_error() {
        let regs = MockRegisters::<16>::new();
        let gpio = Gpio::new(&regs);
        assert!(gpio.use_as_alt5(60).is_err());
        assert!(regs.is_empty());
    }
}
