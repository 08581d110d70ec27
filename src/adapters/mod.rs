//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements                      | Connects to                 |
//! |------------|---------------------------------|-----------------------------|
//! | `hardware` | TemperaturePort, IndicatorPort, | board sensor, LEDs, serial  |
//! |            | SerialPort                      |                             |
//! | `log_sink` | EventSink                       | `log` facade                |
//! | `esp`      | Board                           | ESP32-S3 peripherals        |
//! | `sim`      | Board                           | host threads and stdio      |

pub mod hardware;
pub mod log_sink;

#[cfg(feature = "espidf")]
pub mod esp;
#[cfg(not(feature = "espidf"))]
pub mod sim;

#[cfg(feature = "espidf")]
pub use esp::Board;
#[cfg(not(feature = "espidf"))]
pub use sim::Board;
