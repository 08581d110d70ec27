//! Hardware adapter: bundles board peripherals behind the port traits.
//!
//! Each port is implemented only when the matching part provides it, so
//! the echo loop can pass `()` for the sensor it does not have.

use crate::app::ports::{IndicatorPort, LedId, SerialPort, TemperaturePort};
use crate::error::{SensorError, TransportError};

pub struct HardwareAdapter<T, I, S> {
    sensor: T,
    leds: I,
    serial: S,
}

impl<T, I, S> HardwareAdapter<T, I, S> {
    pub fn new(sensor: T, leds: I, serial: S) -> Self {
        Self {
            sensor,
            leds,
            serial,
        }
    }

    pub fn sensor(&mut self) -> &mut T {
        &mut self.sensor
    }

    pub fn leds(&mut self) -> &mut I {
        &mut self.leds
    }

    pub fn serial(&mut self) -> &mut S {
        &mut self.serial
    }
}

// ── TemperaturePort ───────────────────────────────────────────

impl<T: TemperaturePort, I, S> TemperaturePort for HardwareAdapter<T, I, S> {
    fn read_celsius(&mut self) -> Result<i32, SensorError> {
        self.sensor.read_celsius()
    }
}

// ── IndicatorPort ─────────────────────────────────────────────

impl<T, I: IndicatorPort, S> IndicatorPort for HardwareAdapter<T, I, S> {
    fn set(&mut self, led: LedId, on: bool) {
        self.leds.set(led, on);
    }
}

// ── SerialPort ────────────────────────────────────────────────

impl<T, I, S: SerialPort> SerialPort for HardwareAdapter<T, I, S> {
    fn read_byte(&mut self) -> Result<u8, TransportError> {
        self.serial.read_byte()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.serial.write_all(data)
    }
}
