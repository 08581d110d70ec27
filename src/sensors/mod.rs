//! Sensor drivers.  Each implements [`TemperaturePort`](crate::app::ports::TemperaturePort)
//! or a sibling port over an `embedded-hal` bus.

pub mod tmp102;

pub use tmp102::Tmp102;
