//! Port traits: the boundary between the control loops and the board.
//!
//! ```text
//!   Board adapter ──▶ Port trait ──▶ Service (domain)
//! ```
//!
//! Timers, LEDs, the serial link and the temperature sensor are all
//! reached through these traits.  Services take them as generics at the
//! call site, so every control loop runs unchanged against the ESP-IDF
//! board, the host simulation, or the recording mocks in `tests/`.

use crate::error::{InitError, SensorError, TransportError};

// ───────────────────────────────────────────────────────────────
// Tick source (driven adapter: hardware timer → scheduler)
// ───────────────────────────────────────────────────────────────

/// A single recurring timer.
pub trait TickSource {
    /// Arm the timer so `callback` runs once every `period_us`.
    ///
    /// The callback runs in timer/interrupt context for as long as the
    /// device is powered; there is no cancel.
    fn start<F>(&mut self, period_us: u64, callback: F) -> Result<(), InitError>
    where
        F: FnMut() + Send + 'static;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LEDs)
// ───────────────────────────────────────────────────────────────

/// The two board LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedId {
    Led0,
    Led1,
}

/// Write-side port for the board LEDs.
pub trait IndicatorPort {
    fn set(&mut self, led: LedId, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Serial port (driven adapter: domain ↔ UART)
// ───────────────────────────────────────────────────────────────

/// Blocking byte-oriented serial link.
pub trait SerialPort {
    /// Block until one byte arrives.
    fn read_byte(&mut self) -> Result<u8, TransportError>;

    /// Write every byte of `data`, blocking as needed.
    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Temperature port (driven adapter: sensor → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the temperature sensor.
pub trait TemperaturePort {
    /// Current temperature in whole degrees Celsius.
    fn read_celsius(&mut self) -> Result<i32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// Services emit structured [`AppEvent`](super::events::AppEvent)s here.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
