//! Thermostat end to end: ticks fan out to the three tasks, which read
//! the sensor, move the setpoint, drive the heat LED and write records.

use crate::mock_hw::{ManualTicker, MockHardware, RecordingSink, leak_flags};

use tickflow::app::events::AppEvent;
use tickflow::app::ports::LedId;
use tickflow::app::thermostat::ThermostatService;
use tickflow::config::{ThermostatConfig, thermostat_button, thermostat_task};
use tickflow::error::{Fault, SensorError, TransportError};
use tickflow::events::EventLatch;
use tickflow::scheduler::{self, TaskFlags, TaskMultiplexer};

struct Rig {
    service: ThermostatService,
    hw: MockHardware,
    sink: RecordingSink,
    ticker: ManualTicker,
    flags: &'static TaskFlags<{ thermostat_task::COUNT }>,
    buttons: EventLatch<{ thermostat_button::COUNT }>,
}

impl Rig {
    fn new(hw: MockHardware) -> Self {
        let config = ThermostatConfig::default();
        let flags = leak_flags();
        let mut ticker = ManualTicker::new();
        scheduler::arm(
            &mut ticker,
            TaskMultiplexer::new(config.schedule().unwrap(), flags),
        )
        .unwrap();

        let mut rig = Self {
            service: ThermostatService::new(&config),
            hw,
            sink: RecordingSink::new(),
            ticker,
            flags,
            buttons: EventLatch::new(),
        };
        rig.service.start(&mut rig.hw, &mut rig.sink);
        rig
    }

    fn poll(&mut self) -> Result<(), Fault> {
        self.service
            .poll(self.flags, &self.buttons, &mut self.hw, &mut self.sink)
    }

    /// Fire one tick and run one main-loop iteration, `ticks` times.
    fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.ticker.fire(1);
            self.poll().unwrap();
        }
    }
}

#[test]
fn timer_runs_at_the_base_tick() {
    let rig = Rig::new(MockHardware::new());
    assert_eq!(rig.ticker.period_us, Some(100_000));
}

#[test]
fn tasks_run_at_their_own_rates() {
    let mut rig = Rig::new(MockHardware::with_temperature(21));
    rig.run(30);

    // 3 s: six temperature checks, three reports.
    assert_eq!(rig.hw.sensor_reads, 6);
    assert_eq!(
        rig.hw.records(),
        vec![
            "<21,22,1,0001>\n\r",
            "<21,22,1,0002>\n\r",
            "<21,22,1,0003>\n\r",
        ]
    );
}

#[test]
fn first_second_reports_the_fresh_reading() {
    let mut rig = Rig::new(MockHardware::with_temperature(18));
    // Let ten ticks pile up, then service everything at once.
    rig.ticker.fire(10);
    rig.poll().unwrap();

    assert_eq!(rig.hw.tx_str(), "<18,22,1,0001>\n\r");
    assert!(rig.hw.led(LedId::Led0));
}

#[test]
fn heat_follows_temperature_against_setpoint() {
    let mut rig = Rig::new(MockHardware::with_temperature(24));
    rig.run(5);
    assert!(!rig.hw.led(LedId::Led0));

    rig.hw.temperature = Ok(19);
    rig.run(5);
    assert!(rig.hw.led(LedId::Led0));

    rig.hw.temperature = Ok(22);
    rig.run(5);
    assert!(!rig.hw.led(LedId::Led0));

    let changes: Vec<bool> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::HeatChanged { on } => Some(*on),
            _ => None,
        })
        .collect();
    assert_eq!(changes, vec![true, false]);
}

#[test]
fn presses_between_checks_coalesce() {
    let mut rig = Rig::new(MockHardware::new());
    for _ in 0..3 {
        rig.buttons.on_edge(thermostat_button::SETPOINT_UP);
    }
    rig.run(2);
    assert_eq!(rig.service.state().setpoint, 23);

    rig.buttons.on_edge(thermostat_button::SETPOINT_DOWN);
    rig.buttons.on_edge(thermostat_button::SETPOINT_DOWN);
    rig.run(2);
    assert_eq!(rig.service.state().setpoint, 22);
}

#[test]
fn press_waits_for_the_button_check() {
    let mut rig = Rig::new(MockHardware::new());
    rig.buttons.on_edge(thermostat_button::SETPOINT_UP);
    rig.run(1);
    assert_eq!(rig.service.state().setpoint, 22);
    rig.run(1);
    assert_eq!(rig.service.state().setpoint, 23);
}

#[test]
fn up_and_down_in_one_window_cancel_out() {
    let mut rig = Rig::new(MockHardware::new());
    rig.buttons.on_edge(thermostat_button::SETPOINT_UP);
    rig.buttons.on_edge(thermostat_button::SETPOINT_DOWN);
    rig.run(2);
    assert_eq!(rig.service.state().setpoint, 22);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::SetpointChanged { .. })),
        2
    );
}

#[test]
fn raising_the_setpoint_turns_heat_on() {
    let mut rig = Rig::new(MockHardware::with_temperature(22));
    rig.run(5);
    assert!(!rig.hw.led(LedId::Led0));

    rig.buttons.on_edge(thermostat_button::SETPOINT_UP);
    rig.run(5);
    assert!(rig.hw.led(LedId::Led0));
}

#[test]
fn sensor_failure_keeps_last_value() {
    let mut rig = Rig::new(MockHardware::with_temperature(25));
    rig.run(10);
    rig.hw.temperature = Err(SensorError::BusFailed);
    rig.run(10);

    assert_eq!(rig.service.state().temperature, 25);
    assert_eq!(rig.hw.records()[1], "<25,22,0,0002>\n\r");
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::SensorFallback { retained: 25, .. })),
        2
    );
}

#[test]
fn serial_failure_is_fatal() {
    let mut rig = Rig::new(MockHardware::new());
    rig.hw.fail_writes = true;
    rig.ticker.fire(10);
    assert_eq!(
        rig.poll(),
        Err(Fault::Transport(TransportError::Write))
    );
}
