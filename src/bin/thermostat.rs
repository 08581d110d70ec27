//! Thermostat control loop.
//!
//! Two buttons step the setpoint, a TMP102 drives the heat LED, and a
//! `<TT,SS,H,EEEE>` status record goes out on the serial link every second.

use anyhow::{Context, Result};
use log::info;

use tickflow::adapters::Board;
use tickflow::adapters::hardware::HardwareAdapter;
use tickflow::adapters::log_sink::LogEventSink;
use tickflow::app::events::AppEvent;
use tickflow::app::ports::{EventSink, IndicatorPort, SerialPort, TemperaturePort};
use tickflow::app::thermostat::ThermostatService;
use tickflow::config::{ThermostatConfig, thermostat_button, thermostat_task};
use tickflow::drivers::button::{ButtonLine, DEBOUNCE_MS};
use tickflow::drivers::hw_timer::HwTimer;
use tickflow::error::Fault;
use tickflow::events::EventLatch;
use tickflow::pins;
use tickflow::runtime::ControlLoop;
use tickflow::scheduler::{self, TaskFlags, TaskMultiplexer};
use tickflow::sensors::Tmp102;

// ── Shared with the timer callback and button ISRs ────────────

static TASKS: TaskFlags<{ thermostat_task::COUNT }> = TaskFlags::new();
static BUTTONS: EventLatch<{ thermostat_button::COUNT }> = EventLatch::new();
static SETPOINT_UP: ButtonLine<'static> =
    ButtonLine::new(BUTTONS.source(thermostat_button::SETPOINT_UP), DEBOUNCE_MS);
static SETPOINT_DOWN: ButtonLine<'static> =
    ButtonLine::new(BUTTONS.source(thermostat_button::SETPOINT_DOWN), DEBOUNCE_MS);

struct Thermostat<H> {
    service: ThermostatService,
    hw: H,
    /// Dropping the timer stops the tick.
    _timer: HwTimer,
}

fn main() -> Result<()> {
    Board::init_logging()?;
    info!("thermostat v{}", env!("CARGO_PKG_VERSION"));

    let config = ThermostatConfig::default();
    let mut sink = LogEventSink::new();
    let mut board = Board::take().context("claiming board peripherals")?;

    let mut control = ControlLoop::start(setup(&mut board, &config, &mut sink));
    loop {
        let outcome = control.step(|app| app.service.poll(&TASKS, &BUTTONS, &mut app.hw, &mut sink));
        if let Some(fault) = outcome {
            sink.emit(&AppEvent::Halted(fault));
            board.halt(fault);
        }
        board.idle();
    }
}

fn setup(
    board: &mut Board,
    config: &ThermostatConfig,
    sink: &mut LogEventSink,
) -> Result<Thermostat<impl TemperaturePort + IndicatorPort + SerialPort + use<>>, Fault> {
    let schedule = config.schedule()?;
    info!("config: {:?}", config);

    let leds = board.leds()?;
    let serial = board.serial(config.baud_rate)?;
    let sensor = Tmp102::new(board.sensor_bus(config.sensor_bus_hz)?, config.sensor_address);
    let mut hw = HardwareAdapter::new(sensor, leds, serial);

    let mut service = ThermostatService::new(config);
    service.start(&mut hw, sink);

    for line in [&SETPOINT_UP, &SETPOINT_DOWN] {
        line.set_window_ms(config.debounce_ms);
    }
    board.attach_buttons(&[
        (pins::BUTTON0_GPIO, &SETPOINT_UP),
        (pins::BUTTON1_GPIO, &SETPOINT_DOWN),
    ])?;

    let mut timer = board.tick_source();
    scheduler::arm(&mut timer, TaskMultiplexer::new(schedule, &TASKS))?;

    Ok(Thermostat {
        service,
        hw,
        _timer: timer,
    })
}
