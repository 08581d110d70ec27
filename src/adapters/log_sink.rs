//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade.  On the device that is the ESP-IDF console, on the
//! host it is `tracing-subscriber` on stderr, so it never mixes with the
//! status records on stdout.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(kind) => {
                info!("START | {:?}", kind);
            }
            AppEvent::SetpointChanged { setpoint } => {
                info!("SETPOINT | {}\u{00b0}C", setpoint);
            }
            AppEvent::HeatChanged { on } => {
                info!("HEAT | {}", if *on { "on" } else { "off" });
            }
            AppEvent::SensorFallback { error, retained } => {
                warn!("SENSOR | {} | holding {}\u{00b0}C", error, retained);
            }
            AppEvent::Report(r) => {
                info!("REPORT | {}", r.render().trim_end());
            }
            AppEvent::PatternStarted(p) => {
                info!("PATTERN | {:?} started", p);
            }
            AppEvent::PatternCompleted(p) => {
                info!("PATTERN | {:?} complete", p);
            }
            AppEvent::CommandRecognized(c) => {
                info!("COMMAND | {:?}", c);
            }
            AppEvent::Halted(fault) => {
                error!("HALT | {}", fault);
            }
        }
    }
}
