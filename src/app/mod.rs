//! Application core: the three control loops and their port traits.
//!
//! | Module       | Control loop                                         |
//! |--------------|------------------------------------------------------|
//! | `thermostat` | setpoint buttons, sensor-driven heat output, reports |
//! | `morse`      | SOS / OK blink playback with button switching        |
//! | `command`    | serial echo with ON / OFF recognition                |
//!
//! Nothing here touches hardware.  Everything goes through [`ports`],
//! so each service runs unchanged against mocks, the host simulation
//! and the ESP-IDF board.

pub mod command;
pub mod events;
pub mod morse;
pub mod ports;
pub mod report;
pub mod thermostat;
