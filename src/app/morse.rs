//! Morse pattern playback.
//!
//! Each pattern is a table of Morse symbols (`1` = dot or inter-element
//! gap, `3` = dash).  Only the table length drives playback: every entry
//! is exactly one on tick followed by one off tick, so a dash blinks as
//! long as a dot.  Playback walks the table one entry per cycle:
//!
//! ```text
//! tick:    1    2    3    4    5   ...   33   34
//! phase:   ON   off  ON   off  ON  ...   ON   off ──▶ cursor == len
//! cursor:  0    1    1    2    2   ...   16   17 ──▶ complete, cursor = 0
//! ```
//!
//! A pattern switch requested mid-cycle is parked until the cycle
//! completes, so a message is never cut off half-way through.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::app::events::{AppEvent, AppKind};
use crate::app::ports::{EventSink, IndicatorPort, LedId};
use crate::events::EventLatch;
use crate::scheduler::TaskFlags;

/// Dot length in ticks.
pub const DOT: u8 = 1;
/// Dash length in ticks.
pub const DASH: u8 = 3;
/// Gap between elements in ticks.
pub const GAP: u8 = 1;

/// `... --- ...`
pub const SOS_SYMBOLS: [u8; 17] = [
    DOT, GAP, DOT, GAP, DOT, GAP, //
    DASH, GAP, DASH, GAP, DASH, GAP, //
    DOT, GAP, DOT, GAP, DOT,
];

/// `--- -.-`
pub const OK_SYMBOLS: [u8; 11] = [
    DASH, GAP, DASH, GAP, DASH, GAP, //
    DOT, GAP, DASH, GAP, DOT,
];

/// The messages the blinker can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    Sos,
    Ok,
}

impl Pattern {
    pub fn symbols(self) -> &'static [u8] {
        match self {
            Self::Sos => &SOS_SYMBOLS,
            Self::Ok => &OK_SYMBOLS,
        }
    }

    /// LED the pattern is shown on.
    pub fn led(self) -> LedId {
        match self {
            Self::Sos => LedId::Led0,
            Self::Ok => LedId::Led1,
        }
    }

    /// The pattern a button press switches to.
    pub fn other(self) -> Self {
        match self {
            Self::Sos => Self::Ok,
            Self::Ok => Self::Sos,
        }
    }

    pub fn len(self) -> usize {
        self.symbols().len()
    }

    pub fn is_empty(self) -> bool {
        self.symbols().is_empty()
    }
}

/// Blink phase of the current symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Off,
    On,
}

/// What a single [`PatternPlayer::tick`] did, beyond toggling an LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// A new cycle began (possibly after a switch).
    Started(Pattern),
    /// The LED turned on for the current symbol.
    SymbolOn,
    /// The LED turned off and the cursor moved on.
    Advanced,
    /// The last symbol finished; the cursor is back at zero.
    Completed(Pattern),
}

/// Pattern playback state machine.
#[derive(Debug, Clone)]
pub struct PatternPlayer {
    active: Pattern,
    pending: Option<Pattern>,
    cursor: usize,
    phase: Phase,
    complete: bool,
}

impl PatternPlayer {
    /// Start idle at a cycle boundary; the first tick begins `pattern`.
    pub fn new(pattern: Pattern) -> Self {
        Self {
            active: pattern,
            pending: None,
            cursor: 0,
            phase: Phase::Off,
            complete: true,
        }
    }

    /// Ask for the other pattern.  Takes effect at the next cycle boundary;
    /// repeated requests before then collapse into one.
    pub fn request_switch(&mut self) {
        if self.pending.is_none() {
            let next = self.active.other();
            debug!("morse: switch to {:?} queued", next);
            self.pending = Some(next);
        }
    }

    /// Advance one base tick, driving `out`.
    pub fn tick(&mut self, out: &mut impl IndicatorPort) -> Playback {
        match self.phase {
            Phase::Off => {
                let started = self.at_boundary();
                if started {
                    if let Some(next) = self.pending.take() {
                        self.active = next;
                    }
                    self.complete = false;
                }
                out.set(self.active.led(), true);
                self.phase = Phase::On;
                if started {
                    Playback::Started(self.active)
                } else {
                    Playback::SymbolOn
                }
            }
            Phase::On => {
                out.set(LedId::Led0, false);
                out.set(LedId::Led1, false);
                self.phase = Phase::Off;
                self.cursor += 1;
                if self.cursor >= self.active.len() {
                    self.cursor = 0;
                    self.complete = true;
                    Playback::Completed(self.active)
                } else {
                    Playback::Advanced
                }
            }
        }
    }

    fn at_boundary(&self) -> bool {
        self.cursor == 0 && self.phase == Phase::Off
    }

    pub fn active(&self) -> Pattern {
        self.active
    }

    pub fn pending(&self) -> Option<Pattern> {
        self.pending
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// `true` between the end of one cycle and the start of the next.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

// ───────────────────────────────────────────────────────────────
// Blinker service
// ───────────────────────────────────────────────────────────────

/// Playback task index in the blinker schedule.
pub const PLAYBACK_TASK: usize = 0;
/// Button source that requests a pattern switch.
pub const SWITCH_BUTTON: usize = 0;

/// Main-loop side of the blinker: consumes the tick flag and the button latch.
pub struct BlinkerService {
    player: PatternPlayer,
}

impl BlinkerService {
    pub fn new(initial: Pattern) -> Self {
        Self {
            player: PatternPlayer::new(initial),
        }
    }

    /// Put both LEDs into a known state.
    pub fn start(&mut self, out: &mut impl IndicatorPort, sink: &mut impl EventSink) {
        out.set(LedId::Led0, false);
        out.set(LedId::Led1, false);
        sink.emit(&AppEvent::Started(AppKind::Blinker));
        info!("Blinker started with {:?}", self.player.active());
    }

    /// One main-loop iteration.
    pub fn poll(
        &mut self,
        flags: &TaskFlags<1>,
        buttons: &EventLatch<1>,
        out: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        if buttons.consume(SWITCH_BUTTON) {
            self.player.request_switch();
        }
        if flags.take(PLAYBACK_TASK) {
            match self.player.tick(out) {
                Playback::Started(p) => sink.emit(&AppEvent::PatternStarted(p)),
                Playback::Completed(p) => sink.emit(&AppEvent::PatternCompleted(p)),
                Playback::SymbolOn | Playback::Advanced => {}
            }
        }
    }

    pub fn player(&self) -> &PatternPlayer {
        &self.player
    }
}
