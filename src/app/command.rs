//! Serial echo with "ON" / "OFF" command recognition.
//!
//! ```text
//!            'O'            'N' ─▶ LED on
//!   Idle ─────────▶ SawO ─────────────────────▶ Idle
//!    ▲               │ 'F'
//!    │               ▼        'F' ─▶ LED off
//!    │             SawOF ─────────────────────▶ Idle
//!    └── any other byte in SawO / SawOF resets to Idle
//! ```
//!
//! Every byte is echoed back before it is interpreted.  A mismatch never
//! keeps a partial match, so the recognizer cannot get stuck off-grammar.

use log::{debug, info};

use crate::app::events::{AppEvent, AppKind};
use crate::app::ports::{EventSink, IndicatorPort, LedId, SerialPort};
use crate::error::Fault;

/// A recognized command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    On,
    Off,
}

/// Recognizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecognizerState {
    /// Waiting for 'O'.
    #[default]
    Idle,
    /// Saw 'O'; expecting 'N' or 'F'.
    SawO,
    /// Saw "OF"; expecting the final 'F'.
    SawOF,
}

/// Byte-at-a-time command recognizer.
#[derive(Debug, Clone, Default)]
pub struct CommandRecognizer {
    state: RecognizerState,
}

impl CommandRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one received byte; returns a command when a word completes.
    pub fn feed(&mut self, byte: u8) -> Option<Command> {
        let (next, command) = match (self.state, byte) {
            (RecognizerState::Idle, b'O') => (RecognizerState::SawO, None),
            (RecognizerState::Idle, _) => (RecognizerState::Idle, None),
            (RecognizerState::SawO, b'N') => (RecognizerState::Idle, Some(Command::On)),
            (RecognizerState::SawO, b'F') => (RecognizerState::SawOF, None),
            (RecognizerState::SawOF, b'F') => (RecognizerState::Idle, Some(Command::Off)),
            (RecognizerState::SawO | RecognizerState::SawOF, _) => (RecognizerState::Idle, None),
        };
        self.state = next;
        command
    }

    pub fn state(&self) -> RecognizerState {
        self.state
    }
}

// ───────────────────────────────────────────────────────────────
// Echo service
// ───────────────────────────────────────────────────────────────

/// Blocking echo loop driving LED0 from recognized commands.
pub struct EchoService {
    recognizer: CommandRecognizer,
    prompt: &'static str,
}

impl EchoService {
    pub fn new(prompt: &'static str) -> Self {
        Self {
            recognizer: CommandRecognizer::new(),
            prompt,
        }
    }

    /// Light LED0 to show the port is up, then print the prompt.
    pub fn start(
        &mut self,
        hw: &mut (impl SerialPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) -> Result<(), Fault> {
        hw.set(LedId::Led0, true);
        hw.write_all(self.prompt.as_bytes())?;
        sink.emit(&AppEvent::Started(AppKind::Echo));
        info!("Echo started");
        Ok(())
    }

    /// Read, echo and interpret one byte.  Blocks until a byte arrives.
    pub fn poll(
        &mut self,
        hw: &mut (impl SerialPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) -> Result<(), Fault> {
        let byte = hw.read_byte()?;
        hw.write_all(&[byte])?;

        if let Some(command) = self.recognizer.feed(byte) {
            debug!("echo: recognized {:?}", command);
            hw.set(LedId::Led0, command == Command::On);
            sink.emit(&AppEvent::CommandRecognized(command));
        }
        Ok(())
    }

    pub fn recognizer(&self) -> &CommandRecognizer {
        &self.recognizer
    }
}
