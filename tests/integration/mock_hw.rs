//! Mock hardware for integration tests.
//!
//! Records every LED write and every serial byte so tests can assert on
//! the full output history.  The tick source is fired by hand.

use std::collections::VecDeque;

use tickflow::app::events::AppEvent;
use tickflow::app::ports::{
    EventSink, IndicatorPort, LedId, SerialPort, TemperaturePort, TickSource,
};
use tickflow::error::{InitError, SensorError, TransportError};
use tickflow::scheduler::TaskFlags;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Current LED levels, indexed by `LedId as usize`.
    pub leds: [bool; 2],
    pub led_calls: Vec<(LedId, bool)>,
    /// What the next sensor read returns.
    pub temperature: Result<i32, SensorError>,
    pub sensor_reads: u32,
    /// Bytes waiting to be read; empty means the link is closed.
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            leds: [false; 2],
            led_calls: Vec::new(),
            temperature: Ok(20),
            sensor_reads: 0,
            rx: VecDeque::new(),
            tx: Vec::new(),
            fail_writes: false,
        }
    }

    pub fn with_temperature(celsius: i32) -> Self {
        Self {
            temperature: Ok(celsius),
            ..Self::new()
        }
    }

    pub fn with_input(input: &[u8]) -> Self {
        Self {
            rx: input.iter().copied().collect(),
            ..Self::new()
        }
    }

    pub fn led(&self, led: LedId) -> bool {
        self.leds[led as usize]
    }

    pub fn tx_str(&self) -> &str {
        std::str::from_utf8(&self.tx).unwrap()
    }

    /// Split serial output into `<...>\n\r` records.
    pub fn records(&self) -> Vec<String> {
        self.tx_str()
            .split_inclusive('\r')
            .map(str::to_owned)
            .collect()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorPort for MockHardware {
    fn set(&mut self, led: LedId, on: bool) {
        self.leds[led as usize] = on;
        self.led_calls.push((led, on));
    }
}

impl TemperaturePort for MockHardware {
    fn read_celsius(&mut self) -> Result<i32, SensorError> {
        self.sensor_reads += 1;
        self.temperature
    }
}

impl SerialPort for MockHardware {
    fn read_byte(&mut self) -> Result<u8, TransportError> {
        self.rx.pop_front().ok_or(TransportError::Closed)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        if self.fail_writes {
            return Err(TransportError::Write);
        }
        self.tx.extend_from_slice(data);
        Ok(())
    }
}

// ── ManualTicker ──────────────────────────────────────────────

/// Tick source whose ticks are fired by the test.
pub struct ManualTicker {
    callback: Option<Box<dyn FnMut() + Send>>,
    pub period_us: Option<u64>,
}

#[allow(dead_code)]
impl ManualTicker {
    pub fn new() -> Self {
        Self {
            callback: None,
            period_us: None,
        }
    }

    pub fn fire(&mut self, ticks: u32) {
        if let Some(cb) = self.callback.as_mut() {
            for _ in 0..ticks {
                cb();
            }
        }
    }
}

impl TickSource for ManualTicker {
    fn start<F>(&mut self, period_us: u64, callback: F) -> Result<(), InitError>
    where
        F: FnMut() + Send + 'static,
    {
        if self.callback.is_some() {
            return Err(InitError::AlreadyTaken("manual ticker"));
        }
        self.period_us = Some(period_us);
        self.callback = Some(Box::new(callback));
        Ok(())
    }
}

/// Tick source that never comes up.
pub struct BrokenTicker;

impl TickSource for BrokenTicker {
    fn start<F>(&mut self, _period_us: u64, _callback: F) -> Result<(), InitError>
    where
        F: FnMut() + Send + 'static,
    {
        Err(InitError::Timer)
    }
}

/// Flags with the `'static` lifetime the tick callback needs.
pub fn leak_flags<const N: usize>() -> &'static TaskFlags<N> {
    Box::leak(Box::new(TaskFlags::new()))
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
