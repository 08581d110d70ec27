//! Setpoint-seeking thermostat.
//!
//! Three tasks share one base tick through the
//! [`TaskMultiplexer`](crate::scheduler::TaskMultiplexer):
//!
//! | Task              | Default period | Work                                   |
//! |-------------------|----------------|----------------------------------------|
//! | button check      | 200 ms         | apply pending setpoint up/down events  |
//! | temperature check | 500 ms         | read sensor, decide heat, drive LED0   |
//! | report            | 1000 ms        | bump seconds, write `<TT,SS,H,EEEE>`   |
//!
//! A failed sensor read keeps the last good temperature: stale data is
//! safer for the heater than a spurious jump.

use log::{info, warn};

use crate::app::events::{AppEvent, AppKind};
use crate::app::ports::{EventSink, IndicatorPort, LedId, SerialPort, TemperaturePort};
use crate::app::report::StatusReport;
use crate::config::{ThermostatConfig, thermostat_button, thermostat_task};
use crate::error::Fault;
use crate::events::EventLatch;
use crate::scheduler::TaskFlags;

/// LED that mirrors the heater relay.
pub const HEAT_LED: LedId = LedId::Led0;

/// Everything the thermostat knows about the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThermostatState {
    /// Last successfully measured temperature (C).
    pub temperature: i32,
    /// Target temperature (C).  Unbounded.
    pub setpoint: i32,
    /// Heater demand.
    pub heat: bool,
    /// Seconds since start, advanced once per report.
    pub elapsed_secs: u32,
}

impl ThermostatState {
    pub fn report(&self) -> StatusReport {
        StatusReport {
            temperature: self.temperature,
            setpoint: self.setpoint,
            heat: self.heat,
            elapsed_secs: self.elapsed_secs,
        }
    }
}

pub struct ThermostatService {
    state: ThermostatState,
}

impl ThermostatService {
    pub fn new(config: &ThermostatConfig) -> Self {
        Self {
            state: ThermostatState {
                temperature: config.initial_temperature_c,
                setpoint: config.initial_setpoint_c,
                heat: false,
                elapsed_secs: 0,
            },
        }
    }

    /// Drive the heat output to its initial (off) level.
    pub fn start(&mut self, out: &mut impl IndicatorPort, sink: &mut impl EventSink) {
        out.set(HEAT_LED, self.state.heat);
        sink.emit(&AppEvent::Started(AppKind::Thermostat));
        info!(
            "Thermostat started: T={} S={}",
            self.state.temperature, self.state.setpoint
        );
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run every task whose flag is raised.  Only the report task can fail.
    pub fn poll<H>(
        &mut self,
        flags: &TaskFlags<{ thermostat_task::COUNT }>,
        buttons: &EventLatch<{ thermostat_button::COUNT }>,
        hw: &mut H,
        sink: &mut impl EventSink,
    ) -> Result<(), Fault>
    where
        H: TemperaturePort + IndicatorPort + SerialPort,
    {
        if flags.take(thermostat_task::BUTTON_CHECK) {
            self.check_buttons(buttons, sink);
        }
        if flags.take(thermostat_task::TEMPERATURE_CHECK) {
            self.check_temperature(hw, sink);
        }
        if flags.take(thermostat_task::REPORT) {
            self.report(hw, sink)?;
        }
        Ok(())
    }

    // ── Tasks ─────────────────────────────────────────────────

    /// Apply at most one step up and one step down.
    pub fn check_buttons(
        &mut self,
        buttons: &EventLatch<{ thermostat_button::COUNT }>,
        sink: &mut impl EventSink,
    ) {
        let up = buttons.consume(thermostat_button::SETPOINT_UP);
        let down = buttons.consume(thermostat_button::SETPOINT_DOWN);
        if up {
            self.adjust_setpoint(1, sink);
        }
        if down {
            self.adjust_setpoint(-1, sink);
        }
    }

    /// Read the sensor, then recompute and apply heater demand.
    pub fn check_temperature(
        &mut self,
        hw: &mut (impl TemperaturePort + IndicatorPort),
        sink: &mut impl EventSink,
    ) {
        match hw.read_celsius() {
            Ok(t) => self.state.temperature = t,
            Err(error) => {
                warn!(
                    "Sensor read failed ({}), keeping {}C",
                    error, self.state.temperature
                );
                sink.emit(&AppEvent::SensorFallback {
                    error,
                    retained: self.state.temperature,
                });
            }
        }

        let heat = self.state.temperature < self.state.setpoint;
        if heat != self.state.heat {
            sink.emit(&AppEvent::HeatChanged { on: heat });
        }
        self.state.heat = heat;
        hw.set(HEAT_LED, heat);
    }

    /// Advance the seconds counter and write one status record.
    pub fn report(
        &mut self,
        serial: &mut impl SerialPort,
        sink: &mut impl EventSink,
    ) -> Result<(), Fault> {
        self.state.elapsed_secs = self.state.elapsed_secs.wrapping_add(1);
        let report = self.state.report();
        serial.write_all(report.render().as_bytes())?;
        sink.emit(&AppEvent::Report(report));
        Ok(())
    }

    fn adjust_setpoint(&mut self, delta: i32, sink: &mut impl EventSink) {
        self.state.setpoint = self.state.setpoint.saturating_add(delta);
        sink.emit(&AppEvent::SetpointChanged {
            setpoint: self.state.setpoint,
        });
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &ThermostatState {
        &self.state
    }
}
