//! Two-LED indicator over `embedded-hal` output pins.

use embedded_hal::digital::{Error as _, OutputPin, PinState};
use log::warn;

use crate::app::ports::{IndicatorPort, LedId};

pub struct PinIndicator<A, B> {
    led0: A,
    led1: B,
}

impl<A: OutputPin, B: OutputPin> PinIndicator<A, B> {
    pub fn new(led0: A, led1: B) -> Self {
        Self { led0, led1 }
    }
}

impl<A: OutputPin, B: OutputPin> IndicatorPort for PinIndicator<A, B> {
    fn set(&mut self, led: LedId, on: bool) {
        let state = PinState::from(on);
        let result = match led {
            LedId::Led0 => self.led0.set_state(state).map_err(|e| e.kind()),
            LedId::Led1 => self.led1.set_state(state).map_err(|e| e.kind()),
        };
        // A stuck LED is cosmetic; keep the loop running.
        if let Err(kind) = result {
            warn!("led: {:?} write failed: {:?}", led, kind);
        }
    }
}
