//! Morse blinker: SOS on LED0 or OK on LED1, either button switches
//! pattern at the end of the current message.

use anyhow::{Context, Result};
use log::info;

use tickflow::adapters::Board;
use tickflow::adapters::log_sink::LogEventSink;
use tickflow::app::events::AppEvent;
use tickflow::app::morse::{BlinkerService, SWITCH_BUTTON};
use tickflow::app::ports::{EventSink, IndicatorPort};
use tickflow::config::BlinkerConfig;
use tickflow::drivers::button::{ButtonLine, DEBOUNCE_MS};
use tickflow::drivers::hw_timer::HwTimer;
use tickflow::error::Fault;
use tickflow::events::EventLatch;
use tickflow::pins;
use tickflow::runtime::ControlLoop;
use tickflow::scheduler::{self, TaskFlags, TaskMultiplexer};

static TASKS: TaskFlags<1> = TaskFlags::new();
static BUTTONS: EventLatch<1> = EventLatch::new();
// Both buttons feed the same latch.
static BUTTON0: ButtonLine<'static> = ButtonLine::new(BUTTONS.source(SWITCH_BUTTON), DEBOUNCE_MS);
static BUTTON1: ButtonLine<'static> = ButtonLine::new(BUTTONS.source(SWITCH_BUTTON), DEBOUNCE_MS);

struct Blinker<L> {
    service: BlinkerService,
    leds: L,
    _timer: HwTimer,
}

fn main() -> Result<()> {
    Board::init_logging()?;
    info!("blinker v{}", env!("CARGO_PKG_VERSION"));

    let config = BlinkerConfig::default();
    let mut sink = LogEventSink::new();
    let mut board = Board::take().context("claiming board peripherals")?;

    let mut control = ControlLoop::start(setup(&mut board, &config, &mut sink));
    loop {
        let outcome = control.step(|app| {
            app.service.poll(&TASKS, &BUTTONS, &mut app.leds, &mut sink);
            Ok(())
        });
        if let Some(fault) = outcome {
            sink.emit(&AppEvent::Halted(fault));
            board.halt(fault);
        }
        board.idle();
    }
}

fn setup(
    board: &mut Board,
    config: &BlinkerConfig,
    sink: &mut LogEventSink,
) -> Result<Blinker<impl IndicatorPort + use<>>, Fault> {
    let schedule = config.schedule()?;

    let mut leds = board.leds()?;
    let mut service = BlinkerService::new(config.initial_pattern);
    service.start(&mut leds, sink);

    for line in [&BUTTON0, &BUTTON1] {
        line.set_window_ms(config.debounce_ms);
    }
    board.attach_buttons(&[(pins::BUTTON0_GPIO, &BUTTON0), (pins::BUTTON1_GPIO, &BUTTON1)])?;

    let mut timer = board.tick_source();
    scheduler::arm(&mut timer, TaskMultiplexer::new(schedule, &TASKS))?;

    Ok(Blinker {
        service,
        leds,
        _timer: timer,
    })
}
