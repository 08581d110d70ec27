//! TMP102 digital temperature sensor over I²C.
//!
//! The temperature register (pointer `0x00`) holds a 12-bit two's
//! complement value, left-justified across two bytes, 0.0625 °C per LSB:
//!
//! ```text
//!  byte 0            byte 1
//!  D11 .. D4         D3 .. D0  0 0 0 0
//! ```
//!
//! Whole degrees are returned, truncated toward zero.

use embedded_hal::i2c::I2c;
use log::trace;

use crate::app::ports::TemperaturePort;
use crate::error::SensorError;

/// Factory-default 7-bit address (ADD0 tied to GND).
pub const DEFAULT_ADDRESS: u8 = 0x48;

/// Temperature register pointer.
const TEMP_REGISTER: u8 = 0x00;

/// LSBs per degree Celsius.
const LSB_PER_DEGREE: i32 = 16;

/// Bottom of the rated range.  The register can encode down to -128 °C,
/// anything below this is a wiring or bus fault.
pub const MIN_CELSIUS: i32 = -55;

pub struct Tmp102<I2C> {
    bus: I2C,
    address: u8,
}

impl<I2C: I2c> Tmp102<I2C> {
    pub fn new(bus: I2C, address: u8) -> Self {
        Self { bus, address }
    }

    /// Raw signed 12-bit register value.
    pub fn read_raw(&mut self) -> Result<i16, SensorError> {
        let mut buf = [0u8; 2];
        self.bus
            .write_read(self.address, &[TEMP_REGISTER], &mut buf)
            .map_err(|_| SensorError::BusFailed)?;
        Ok(raw_from_bytes(buf))
    }

    /// Give the bus back, e.g. to share it with another device.
    pub fn release(self) -> I2C {
        self.bus
    }
}

impl<I2C: I2c> TemperaturePort for Tmp102<I2C> {
    fn read_celsius(&mut self) -> Result<i32, SensorError> {
        let raw = self.read_raw()?;
        let celsius = raw_to_celsius(raw);
        trace!("tmp102: raw={:#05x} -> {}C", raw, celsius);
        if celsius < MIN_CELSIUS {
            return Err(SensorError::OutOfRange);
        }
        Ok(celsius)
    }
}

/// Assemble the 12-bit register value and sign-extend it.
pub fn raw_from_bytes(bytes: [u8; 2]) -> i16 {
    // Shift the 12 bits to the top of an i16, then arithmetic-shift back.
    i16::from_be_bytes(bytes) >> 4
}

/// Whole degrees, truncated toward zero.
pub fn raw_to_celsius(raw: i16) -> i32 {
    i32::from(raw) / LSB_PER_DEGREE
}
