//! Outbound application events.
//!
//! Services emit these through the [`EventSink`](super::ports::EventSink)
//! port.  The log adapter prints them; test sinks record them.

use crate::app::command::Command;
use crate::app::morse::Pattern;
use crate::app::report::StatusReport;
use crate::error::{Fault, SensorError};

/// Which control loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKind {
    Thermostat,
    Blinker,
    Echo,
}

/// Structured events emitted by the services.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A control loop finished its setup.
    Started(AppKind),

    /// The setpoint moved by one unit.
    SetpointChanged { setpoint: i32 },

    /// The heat output flipped.
    HeatChanged { on: bool },

    /// A sensor read failed; the last good value was kept.
    SensorFallback { error: SensorError, retained: i32 },

    /// A status record was written to the serial link.
    Report(StatusReport),

    /// Pattern playback began a new cycle of `pattern`.
    PatternStarted(Pattern),

    /// Pattern playback finished a full cycle.
    PatternCompleted(Pattern),

    /// A complete serial command was recognized.
    CommandRecognized(Command),

    /// The loop entered its terminal state.
    Halted(Fault),
}
