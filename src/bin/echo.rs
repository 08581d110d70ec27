//! Serial echo console: every byte comes straight back, "ON" lights
//! LED0 and "OFF" turns it off.

use anyhow::{Context, Result};
use log::info;

use tickflow::adapters::Board;
use tickflow::adapters::hardware::HardwareAdapter;
use tickflow::adapters::log_sink::LogEventSink;
use tickflow::app::command::EchoService;
use tickflow::app::events::AppEvent;
use tickflow::app::ports::{EventSink, IndicatorPort, SerialPort};
use tickflow::config::EchoConfig;
use tickflow::error::Fault;
use tickflow::runtime::ControlLoop;

fn main() -> Result<()> {
    Board::init_logging()?;
    info!("echo v{}", env!("CARGO_PKG_VERSION"));

    let config = EchoConfig::default();
    let mut sink = LogEventSink::new();
    let mut board = Board::take().context("claiming board peripherals")?;

    let mut control = ControlLoop::start(setup(&mut board, &config, &mut sink));
    loop {
        // Blocks in the serial read; no idle needed.
        let outcome = control.step(|(service, hw)| service.poll(hw, &mut sink));
        if let Some(fault) = outcome {
            sink.emit(&AppEvent::Halted(fault));
            board.halt(fault);
        }
    }
}

fn setup(
    board: &mut Board,
    config: &EchoConfig,
    sink: &mut LogEventSink,
) -> Result<(EchoService, impl SerialPort + IndicatorPort + use<>), Fault> {
    let leds = board.leds()?;
    let serial = board.serial(config.baud_rate)?;
    let mut hw = HardwareAdapter::new((), leds, serial);

    let mut service = EchoService::new(config.prompt);
    service.start(&mut hw, sink)?;
    Ok((service, hw))
}
