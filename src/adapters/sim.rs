//! Host simulation board.
//!
//! Stands in for the ESP32 so every control loop runs on a workstation:
//!
//! | Peripheral   | Simulation                                          |
//! |--------------|-----------------------------------------------------|
//! | base timer   | named thread with a deadline sleep loop             |
//! | LEDs         | pins that log each level change                     |
//! | serial       | stdin / stdout (EOF on stdin closes the link)       |
//! | TMP102       | I²C device whose temperature sweeps 18..26 °C       |
//! | buttons      | keys `1`, `2`, ... + Enter on stdin                 |
//!
//! Logs go to stderr so stdout carries only serial traffic.

use core::convert::Infallible;
use std::io::{self, Read, Write};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use log::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::ports::SerialPort;
use crate::drivers::button::ButtonLine;
use crate::drivers::hw_timer::HwTimer;
use crate::drivers::led::PinIndicator;
use crate::error::{Fault, InitError, TransportError};
use crate::sensors::tmp102;

static TAKEN: AtomicBool = AtomicBool::new(false);
static EPOCH: OnceLock<Instant> = OnceLock::new();

// ═══════════════════════════════════════════════════════════════
//  Board
// ═══════════════════════════════════════════════════════════════

pub struct Board {
    leds_taken: bool,
    serial_taken: bool,
    bus_taken: bool,
}

impl Board {
    /// Claim the board.  Only one instance may exist per process.
    pub fn take() -> Result<Self, InitError> {
        if TAKEN.swap(true, Ordering::AcqRel) {
            return Err(InitError::AlreadyTaken("board"));
        }
        EPOCH.get_or_init(Instant::now);
        info!("board(sim): host simulation");
        Ok(Self {
            leds_taken: false,
            serial_taken: false,
            bus_taken: false,
        })
    }

    /// Route `log` records through `tracing-subscriber` on stderr.
    /// `RUST_LOG` overrides the default `info` level.
    pub fn init_logging() -> anyhow::Result<()> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))
    }

    pub fn tick_source(&mut self) -> HwTimer {
        HwTimer::new()
    }

    pub fn leds(&mut self) -> Result<PinIndicator<SimPin, SimPin>, InitError> {
        claim(&mut self.leds_taken, "leds")?;
        Ok(PinIndicator::new(SimPin::new("LED0"), SimPin::new("LED1")))
    }

    pub fn serial(&mut self, baud_rate: u32) -> Result<SimSerial, InitError> {
        claim(&mut self.serial_taken, "serial")?;
        debug!("board(sim): serial on stdio (nominal {} baud)", baud_rate);
        Ok(SimSerial::new())
    }

    pub fn sensor_bus(&mut self, bus_hz: u32) -> Result<SimTmp102, InitError> {
        claim(&mut self.bus_taken, "i2c")?;
        debug!("board(sim): TMP102 on simulated bus ({} Hz)", bus_hz);
        Ok(SimTmp102::new(tmp102::DEFAULT_ADDRESS))
    }

    /// Route keyboard input to the button lines: key `1` presses
    /// `lines[0]`, key `2` presses `lines[1]`, and so on.
    pub fn attach_buttons(
        &mut self,
        lines: &[(i32, &'static ButtonLine<'static>)],
    ) -> Result<(), InitError> {
        let lines: Vec<&'static ButtonLine<'static>> = lines.iter().map(|&(_, l)| l).collect();
        let count = lines.len();
        std::thread::Builder::new()
            .name("buttons".into())
            .spawn(move || {
                let mut stdin = io::stdin().lock();
                let mut byte = [0u8; 1];
                while let Ok(1) = stdin.read(&mut byte) {
                    let Some(index) = (byte[0] as char).to_digit(10) else {
                        continue;
                    };
                    let Some(line) = (index as usize).checked_sub(1).and_then(|i| lines.get(i))
                    else {
                        continue;
                    };
                    if line.on_edge(Self::now_ms()) {
                        debug!("board(sim): button {} pressed", index);
                    }
                }
                debug!("board(sim): button input closed");
            })
            .map_err(|e| {
                error!("board(sim): button thread spawn failed: {}", e);
                InitError::Gpio
            })?;
        info!("board(sim): {} button(s) on keys 1..={}", count, count);
        Ok(())
    }

    /// Milliseconds since the board was taken (wrapping).
    pub fn now_ms() -> u32 {
        EPOCH.get_or_init(Instant::now).elapsed().as_millis() as u32
    }

    /// Yield between main-loop iterations.
    pub fn idle(&self) {
        std::thread::sleep(Duration::from_millis(1));
    }

    /// Terminal state: the process exits with status 1.
    pub fn halt(&mut self, fault: Fault) -> ! {
        error!("board(sim): halted ({})", fault);
        std::process::exit(1)
    }
}

fn claim(taken: &mut bool, what: &'static str) -> Result<(), InitError> {
    if core::mem::replace(taken, true) {
        return Err(InitError::AlreadyTaken(what));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
//  LED pin
// ═══════════════════════════════════════════════════════════════

/// Output pin that logs level changes.
pub struct SimPin {
    name: &'static str,
    high: bool,
}

impl SimPin {
    pub fn new(name: &'static str) -> Self {
        Self { name, high: false }
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    fn drive(&mut self, high: bool) {
        if high != self.high {
            info!("{} {}", self.name, if high { "ON" } else { "off" });
        }
        self.high = high;
    }
}

impl PinErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.drive(true);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════
//  Serial
// ═══════════════════════════════════════════════════════════════

/// Serial link on the process's stdin / stdout.
pub struct SimSerial {
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl SimSerial {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        }
    }
}

impl Default for SimSerial {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialPort for SimSerial {
    fn read_byte(&mut self) -> Result<u8, TransportError> {
        let mut byte = [0u8; 1];
        loop {
            match self.stdin.lock().read(&mut byte) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(_) => return Ok(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    warn!("serial(sim): read failed: {}", e);
                    return Err(TransportError::Read);
                }
            }
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut out = self.stdout.lock();
        out.write_all(data).and_then(|()| out.flush()).map_err(|e| {
            warn!("serial(sim): write failed: {}", e);
            TransportError::Write
        })
    }
}

// ═══════════════════════════════════════════════════════════════
//  TMP102
// ═══════════════════════════════════════════════════════════════

const SWEEP_LOW_C: i16 = 18;
const SWEEP_HIGH_C: i16 = 26;
/// Raw LSBs per read: 0.25 °C.
const SWEEP_STEP: i16 = 4;

/// Simulated TMP102 answering on one address.
pub struct SimTmp102 {
    address: u8,
    pointer: u8,
    /// Temperature in TMP102 LSBs (1/16 °C).
    raw: i16,
    step: i16,
}

impl SimTmp102 {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            pointer: 0,
            raw: 20 * 16,
            step: SWEEP_STEP,
        }
    }

    fn register(&self) -> [u8; 2] {
        match self.pointer {
            0x00 => (self.raw << 4).to_be_bytes(),
            _ => [0, 0],
        }
    }

    fn drift(&mut self) {
        self.raw += self.step;
        if self.raw >= SWEEP_HIGH_C * 16 || self.raw <= SWEEP_LOW_C * 16 {
            self.step = -self.step;
        }
    }
}

impl ErrorType for SimTmp102 {
    type Error = ErrorKind;
}

impl I2c for SimTmp102 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        let mut read = false;
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if let Some(&pointer) = bytes.first() {
                        self.pointer = pointer;
                    }
                }
                Operation::Read(buf) => {
                    for (dst, src) in buf.iter_mut().zip(self.register()) {
                        *dst = src;
                    }
                    read = true;
                }
            }
        }
        if read {
            self.drift();
        }
        Ok(())
    }
}
