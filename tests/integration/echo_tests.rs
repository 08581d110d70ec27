//! Serial echo end to end: prompt, byte-for-byte echo, LED0 commands.

use crate::mock_hw::{MockHardware, RecordingSink};

use tickflow::app::command::{Command, EchoService};
use tickflow::app::events::{AppEvent, AppKind};
use tickflow::app::ports::LedId;
use tickflow::config::EchoConfig;
use tickflow::error::{Fault, TransportError};

fn start(input: &[u8]) -> (EchoService, MockHardware, RecordingSink) {
    let mut service = EchoService::new(EchoConfig::default().prompt);
    let mut hw = MockHardware::with_input(input);
    let mut sink = RecordingSink::new();
    service.start(&mut hw, &mut sink).unwrap();
    (service, hw, sink)
}

/// Poll until the input runs dry; returns the terminating fault.
fn drain(service: &mut EchoService, hw: &mut MockHardware, sink: &mut RecordingSink) -> Fault {
    loop {
        if let Err(fault) = service.poll(hw, sink) {
            return fault;
        }
    }
}

#[test]
fn start_lights_led0_and_prompts() {
    let (_, hw, sink) = start(b"");
    assert!(hw.led(LedId::Led0));
    assert_eq!(
        hw.tx_str(),
        "Type ON to turn on the LED and OFF to turn off the LED:\r\n"
    );
    assert_eq!(sink.events, vec![AppEvent::Started(AppKind::Echo)]);
}

#[test]
fn every_byte_is_echoed() {
    let input = b"hello ON\r\n\x00\xff";
    let (mut service, mut hw, mut sink) = start(input);
    hw.tx.clear();
    drain(&mut service, &mut hw, &mut sink);
    assert_eq!(hw.tx, input);
}

#[test]
fn off_then_on_drives_led0() {
    let (mut service, mut hw, mut sink) = start(b"OFF");
    drain(&mut service, &mut hw, &mut sink);
    assert!(!hw.led(LedId::Led0));

    hw.rx.extend(b"ON".iter().copied());
    drain(&mut service, &mut hw, &mut sink);
    assert!(hw.led(LedId::Led0));

    let commands: Vec<Command> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::CommandRecognized(c) => Some(*c),
            _ => None,
        })
        .collect();
    assert_eq!(commands, vec![Command::Off, Command::On]);
}

#[test]
fn partial_word_does_not_change_led() {
    let (mut service, mut hw, mut sink) = start(b"OFX");
    let calls_before = hw.led_calls.len();
    drain(&mut service, &mut hw, &mut sink);
    assert_eq!(hw.led_calls.len(), calls_before);
    assert!(hw.led(LedId::Led0));
}

#[test]
fn closed_link_is_a_transport_fault() {
    let (mut service, mut hw, mut sink) = start(b"O");
    assert_eq!(
        drain(&mut service, &mut hw, &mut sink),
        Fault::Transport(TransportError::Closed)
    );
}
