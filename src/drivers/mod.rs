//! Peripheral drivers: tick timer, debounced buttons, indicator LEDs.

pub mod button;
pub mod hw_timer;
pub mod led;
