//! GPIO assignments for the ESP32-S3 dev board.
//!
//! Single source of truth: board code references these constants rather
//! than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Indicator LEDs (active high)
// ---------------------------------------------------------------------------

/// Heat output on the thermostat, SOS on the blinker, command LED on echo.
pub const LED0_GPIO: i32 = 11;
/// OK pattern on the blinker.
pub const LED1_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Push buttons (active low, internal pull-up, falling-edge interrupt)
// ---------------------------------------------------------------------------

/// Setpoint up / pattern switch.
pub const BUTTON0_GPIO: i32 = 16;
/// Setpoint down / pattern switch.
pub const BUTTON1_GPIO: i32 = 21;

// ---------------------------------------------------------------------------
// I²C bus (TMP102)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// UART (status reports, command console)
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
