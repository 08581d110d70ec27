//! Morse blinker end to end: one playback phase per tick, pattern
//! switches deferred to the end of the current message.

use crate::mock_hw::{ManualTicker, MockHardware, RecordingSink, leak_flags};

use tickflow::app::events::AppEvent;
use tickflow::app::morse::{BlinkerService, Pattern, SWITCH_BUTTON};
use tickflow::app::ports::LedId;
use tickflow::config::BlinkerConfig;
use tickflow::events::EventLatch;
use tickflow::scheduler::{self, TaskFlags, TaskMultiplexer};

/// Ticks in one full SOS message: 17 symbols, on + off each.
const SOS_TICKS: u32 = 34;
const OK_TICKS: u32 = 22;

struct Rig {
    service: BlinkerService,
    leds: MockHardware,
    sink: RecordingSink,
    ticker: ManualTicker,
    flags: &'static TaskFlags<1>,
    buttons: EventLatch<1>,
}

impl Rig {
    fn new() -> Self {
        let config = BlinkerConfig::default();
        let flags = leak_flags();
        let mut ticker = ManualTicker::new();
        scheduler::arm(
            &mut ticker,
            TaskMultiplexer::new(config.schedule().unwrap(), flags),
        )
        .unwrap();

        let mut rig = Self {
            service: BlinkerService::new(config.initial_pattern),
            leds: MockHardware::new(),
            sink: RecordingSink::new(),
            ticker,
            flags,
            buttons: EventLatch::new(),
        };
        rig.service.start(&mut rig.leds, &mut rig.sink);
        rig
    }

    fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.ticker.fire(1);
            self.service
                .poll(self.flags, &self.buttons, &mut self.leds, &mut self.sink);
        }
    }

    fn pattern_events(&self) -> Vec<AppEvent> {
        self.sink
            .events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    AppEvent::PatternStarted(_) | AppEvent::PatternCompleted(_)
                )
            })
            .cloned()
            .collect()
    }
}

#[test]
fn one_phase_per_half_second_tick() {
    let mut rig = Rig::new();
    assert_eq!(rig.ticker.period_us, Some(500_000));
    assert_eq!(rig.leds.leds, [false, false]);

    rig.run(1);
    assert!(rig.leds.led(LedId::Led0));
    rig.run(1);
    assert!(!rig.leds.led(LedId::Led0));
    rig.run(1);
    assert!(rig.leds.led(LedId::Led0));
}

#[test]
fn sos_repeats_on_led0() {
    let mut rig = Rig::new();
    rig.run(2 * SOS_TICKS);

    assert_eq!(
        rig.pattern_events(),
        vec![
            AppEvent::PatternStarted(Pattern::Sos),
            AppEvent::PatternCompleted(Pattern::Sos),
            AppEvent::PatternStarted(Pattern::Sos),
            AppEvent::PatternCompleted(Pattern::Sos),
        ]
    );
    assert!(rig.leds.led_calls.iter().all(|&(led, on)| led == LedId::Led0 || !on));
}

#[test]
fn switch_mid_message_waits_for_the_end() {
    let mut rig = Rig::new();
    rig.run(7);
    rig.buttons.on_edge(SWITCH_BUTTON);
    rig.run(SOS_TICKS - 7);

    assert_eq!(rig.service.player().active(), Pattern::Sos);
    assert_eq!(rig.service.player().pending(), Some(Pattern::Ok));
    assert!(rig.service.player().is_complete());

    rig.run(1);
    assert!(rig.leds.led(LedId::Led1));
    assert!(!rig.leds.led(LedId::Led0));
    rig.run(OK_TICKS - 1);

    assert_eq!(
        rig.pattern_events(),
        vec![
            AppEvent::PatternStarted(Pattern::Sos),
            AppEvent::PatternCompleted(Pattern::Sos),
            AppEvent::PatternStarted(Pattern::Ok),
            AppEvent::PatternCompleted(Pattern::Ok),
        ]
    );
}

#[test]
fn burst_of_presses_switches_once() {
    let mut rig = Rig::new();
    rig.run(3);
    for _ in 0..5 {
        rig.buttons.on_edge(SWITCH_BUTTON);
        rig.run(1);
    }
    rig.run(SOS_TICKS - 8 + 1);
    assert_eq!(rig.service.player().active(), Pattern::Ok);
    assert_eq!(rig.service.player().pending(), None);
}

#[test]
fn switch_back_after_a_full_message() {
    let mut rig = Rig::new();
    rig.buttons.on_edge(SWITCH_BUTTON);
    rig.run(OK_TICKS);
    rig.buttons.on_edge(SWITCH_BUTTON);
    rig.run(1);
    assert_eq!(rig.service.player().active(), Pattern::Sos);
    assert!(rig.leds.led(LedId::Led0));
}
