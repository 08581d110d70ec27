//! Terminal-fault handling: setup failures and transport failures both
//! land in `Halted`, and a halted loop never runs its service again.

use crate::mock_hw::{BrokenTicker, ManualTicker, MockHardware, RecordingSink, leak_flags};

use tickflow::app::command::EchoService;
use tickflow::app::ports::TickSource;
use tickflow::app::thermostat::ThermostatService;
use tickflow::config::{EchoConfig, ThermostatConfig, thermostat_button, thermostat_task};
use tickflow::error::{ConfigError, Fault, InitError, TransportError};
use tickflow::events::EventLatch;
use tickflow::runtime::{ControlLoop, LoopState};
use tickflow::scheduler::{self, TaskFlags, TaskMultiplexer};

struct Thermostat {
    service: ThermostatService,
    hw: MockHardware,
    flags: &'static TaskFlags<{ thermostat_task::COUNT }>,
    buttons: EventLatch<{ thermostat_button::COUNT }>,
}

fn setup_thermostat(
    config: &ThermostatConfig,
    timer: &mut impl TickSource,
    sink: &mut RecordingSink,
) -> Result<Thermostat, Fault> {
    let schedule = config.schedule()?;
    let flags = leak_flags();
    scheduler::arm(timer, TaskMultiplexer::new(schedule, flags))?;

    let mut hw = MockHardware::new();
    let mut service = ThermostatService::new(config);
    service.start(&mut hw, sink);
    Ok(Thermostat {
        service,
        hw,
        flags,
        buttons: EventLatch::new(),
    })
}

#[test]
fn invalid_schedule_halts_before_running() {
    let config = ThermostatConfig {
        base_tick_ms: 0,
        ..ThermostatConfig::default()
    };
    let mut sink = RecordingSink::new();
    let control =
        ControlLoop::start(setup_thermostat(&config, &mut ManualTicker::new(), &mut sink));

    assert_eq!(
        control.fault(),
        Some(Fault::Setup(InitError::Config(ConfigError::ZeroBasePeriod)))
    );
    assert!(sink.events.is_empty());
}

#[test]
fn timer_failure_halts() {
    let mut sink = RecordingSink::new();
    let mut control = ControlLoop::start(setup_thermostat(
        &ThermostatConfig::default(),
        &mut BrokenTicker,
        &mut sink,
    ));
    assert!(control.is_halted());
    assert_eq!(
        control.step(|_| unreachable!("halted loop must not run")),
        Some(Fault::Setup(InitError::Timer))
    );
}

#[test]
fn write_failure_halts_the_thermostat() {
    let mut sink = RecordingSink::new();
    let mut ticker = ManualTicker::new();
    let mut control = ControlLoop::start(setup_thermostat(
        &ThermostatConfig::default(),
        &mut ticker,
        &mut sink,
    ));

    let mut iterations = 0;
    let fault = loop {
        ticker.fire(1);
        iterations += 1;
        if iterations == 15 {
            if let LoopState::Running(app) = control.state() {
                assert_eq!(app.hw.tx.len(), "<20,22,1,0001>\n\r".len());
            }
        }
        let outcome = control.step(|app| {
            if iterations > 15 {
                app.hw.fail_writes = true;
            }
            app.service
                .poll(app.flags, &app.buttons, &mut app.hw, &mut sink)
        });
        if let Some(fault) = outcome {
            break fault;
        }
    };

    // The second report, at 2 s, is the first write to fail.
    assert_eq!(iterations, 20);
    assert_eq!(fault, Fault::Transport(TransportError::Write));
    assert!(control.app().is_none());
}

#[test]
fn closed_console_halts_echo_after_draining_input() {
    let mut sink = RecordingSink::new();
    let setup = {
        let mut service = EchoService::new(EchoConfig::default().prompt);
        let mut hw = MockHardware::with_input(b"ON");
        service.start(&mut hw, &mut sink).map(|()| (service, hw))
    };
    let mut control = ControlLoop::start(setup);

    assert_eq!(control.step(|(s, hw)| s.poll(hw, &mut sink)), None);
    assert_eq!(control.step(|(s, hw)| s.poll(hw, &mut sink)), None);
    assert_eq!(
        control.step(|(s, hw)| s.poll(hw, &mut sink)),
        Some(Fault::Transport(TransportError::Closed))
    );
    assert!(control.is_halted());
}
