//! Error types for the tick-driven control loops.
//!
//! Three failure classes exist and they are handled very differently:
//!
//! | Class                    | Type             | Policy                        |
//! |--------------------------|------------------|-------------------------------|
//! | Peripheral setup failure | [`InitError`]    | terminal → [`Fault::Setup`]   |
//! | Serial transport failure | [`TransportError`] | terminal → [`Fault::Transport`] |
//! | Sensor read failure      | [`SensorError`]  | absorbed, last value retained |
//!
//! All variants are `Copy` so they can be carried into the halted state
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Terminal fault
// ---------------------------------------------------------------------------

/// An unrecoverable condition.  Reaching one moves the control loop into
/// its terminal `Halted` state; nothing in the crate ever leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// A peripheral could not be brought up.
    Setup(InitError),
    /// The serial link failed while running.
    Transport(TransportError),
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup(e) => write!(f, "setup: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
        }
    }
}

impl core::error::Error for Fault {}

impl From<InitError> for Fault {
    fn from(e: InitError) -> Self {
        Self::Setup(e)
    }
}

impl From<TransportError> for Fault {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<ConfigError> for Fault {
    fn from(e: ConfigError) -> Self {
        Self::Setup(InitError::Config(e))
    }
}

// ---------------------------------------------------------------------------
// Setup errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// The recurring timer could not be created or started.
    Timer,
    /// The serial port could not be opened.
    Serial,
    /// The sensor bus could not be opened.
    SensorBus,
    /// A GPIO line could not be configured or its interrupt installed.
    Gpio,
    /// A peripheral was requested twice from the board.
    AlreadyTaken(&'static str),
    /// The compiled-in schedule is inconsistent.
    Config(ConfigError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer => write!(f, "timer could not be armed"),
            Self::Serial => write!(f, "serial port could not be opened"),
            Self::SensorBus => write!(f, "sensor bus could not be opened"),
            Self::Gpio => write!(f, "GPIO configuration failed"),
            Self::AlreadyTaken(what) => write!(f, "{what} already taken"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for InitError {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// A blocking read returned an error or no data.
    Read,
    /// A write returned an error or wrote nothing.
    Write,
    /// The peer closed the link (end of input).
    Closed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "serial read failed"),
            Self::Write => write!(f, "serial write failed"),
            Self::Closed => write!(f, "serial link closed"),
        }
    }
}

impl core::error::Error for TransportError {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The register transaction on the bus failed.
    BusFailed,
    /// The reading is outside the sensor's physical range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusFailed => write!(f, "bus transaction failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl core::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The base tick period is zero.
    ZeroBasePeriod,
    /// A task period is zero.
    ZeroTaskPeriod { task: usize },
    /// A task period is not an integer multiple of the base tick.
    NotMultiple { task: usize, period_ms: u32, base_ms: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBasePeriod => write!(f, "base tick period must be non-zero"),
            Self::ZeroTaskPeriod { task } => write!(f, "task {task} has a zero period"),
            Self::NotMultiple {
                task,
                period_ms,
                base_ms,
            } => write!(
                f,
                "task {task} period {period_ms}ms is not a multiple of the {base_ms}ms tick"
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

impl From<ConfigError> for InitError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
