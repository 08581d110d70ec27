//! Compiled-in configuration.
//!
//! There is no configuration file and no persistence: every tunable lives
//! in a `Default` impl here.  The structs are `serde`-serializable so the
//! values can be dumped in diagnostics and checked in tests.

use serde::{Deserialize, Serialize};

use crate::app::morse::Pattern;
use crate::error::ConfigError;
use crate::scheduler::TaskSchedule;

/// Thermostat task indices into its [`TaskSchedule`].
pub mod thermostat_task {
    pub const BUTTON_CHECK: usize = 0;
    pub const TEMPERATURE_CHECK: usize = 1;
    pub const REPORT: usize = 2;
    pub const COUNT: usize = 3;
}

/// Thermostat button sources.
pub mod thermostat_button {
    pub const SETPOINT_UP: usize = 0;
    pub const SETPOINT_DOWN: usize = 1;
    pub const COUNT: usize = 2;
}

/// Thermostat control loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThermostatConfig {
    // --- Timing ---
    /// Base timer tick (milliseconds).
    pub base_tick_ms: u32,
    /// Button-check task period (milliseconds).
    pub button_check_ms: u32,
    /// Temperature-check task period (milliseconds).
    pub temperature_check_ms: u32,
    /// Status report period (milliseconds).  Also the elapsed-seconds cadence.
    pub report_ms: u32,

    // --- Control ---
    /// Temperature assumed until the first successful sensor read (C).
    pub initial_temperature_c: i32,
    /// Setpoint at power-on (C).
    pub initial_setpoint_c: i32,

    // --- Peripherals ---
    /// TMP102 7-bit bus address.
    pub sensor_address: u8,
    /// Sensor bus clock (Hz).
    pub sensor_bus_hz: u32,
    /// Serial baud rate.
    pub baud_rate: u32,
    /// Button debounce window (milliseconds).
    pub debounce_ms: u32,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            base_tick_ms: 100,
            button_check_ms: 200,
            temperature_check_ms: 500,
            report_ms: 1000,

            initial_temperature_c: 20,
            initial_setpoint_c: 22,

            sensor_address: 0x48,
            sensor_bus_hz: 400_000,
            baud_rate: 115_200,
            debounce_ms: 50,
        }
    }
}

impl ThermostatConfig {
    /// Task schedule in [`thermostat_task`] order.
    pub fn schedule(&self) -> Result<TaskSchedule<{ thermostat_task::COUNT }>, ConfigError> {
        TaskSchedule::new(
            self.base_tick_ms,
            [self.button_check_ms, self.temperature_check_ms, self.report_ms],
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schedule().map(|_| ())
    }
}

/// Morse blinker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkerConfig {
    /// Base timer tick; one blink phase lasts exactly one tick (milliseconds).
    pub tick_ms: u32,
    /// Pattern played after power-on.
    pub initial_pattern: Pattern,
    /// Button debounce window (milliseconds).
    pub debounce_ms: u32,
}

impl Default for BlinkerConfig {
    fn default() -> Self {
        Self {
            tick_ms: 500,
            initial_pattern: Pattern::Sos,
            debounce_ms: 50,
        }
    }
}

impl BlinkerConfig {
    /// Single playback task running at the base tick.
    pub fn schedule(&self) -> Result<TaskSchedule<1>, ConfigError> {
        TaskSchedule::new(self.tick_ms, [self.tick_ms])
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schedule().map(|_| ())
    }
}

/// Serial echo / command configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EchoConfig {
    pub baud_rate: u32,
    /// Greeting written once the port is open.
    pub prompt: &'static str,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            prompt: "Type ON to turn on the LED and OFF to turn off the LED:\r\n",
        }
    }
}
