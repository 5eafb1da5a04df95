//! Panel bring-up against a recording bus and mocked control lines.

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use embedded_hal::delay::DelayNs;
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
use firmware::bringup::{bring_up, BringUpError, INIT_SCRIPT, RESET_PULSE_MS, RESET_RECOVERY_MS};
use platform::mocks::{BusOp, RecordingBus};

/// Delay that records every requested wait in nanoseconds.
#[derive(Default)]
struct RecordingDelay {
    waits_ns: Vec<u64>,
}

impl RecordingDelay {
    fn total_ms(&self) -> u64 {
        self.waits_ns.iter().sum::<u64>() / 1_000_000
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_ns.push(u64::from(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ns.push(u64::from(ms) * 1_000_000);
    }
}

fn reset_pulse() -> PinMock {
    PinMock::new(&[
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
    ])
}

#[test]
fn reset_script_then_backlight() {
    let mut bus = RecordingBus::new();
    let mut reset = reset_pulse();
    let mut backlight = PinMock::new(&[PinTransaction::set(State::High)]);
    let mut delay = RecordingDelay::default();

    bring_up(&mut bus, &mut reset, &mut backlight, &mut delay).unwrap();

    assert_eq!(bus.commands(), vec![0x01, 0x11, 0x3A, 0x21, 0x13, 0x29, 0x36]);
    assert!(!bus.is_selected());
    assert!(!bus.is_streaming());

    let script_ms: u64 = INIT_SCRIPT.iter().map(|s| u64::from(s.delay_ms)).sum();
    assert_eq!(
        delay.total_ms(),
        u64::from(RESET_PULSE_MS + RESET_RECOVERY_MS) + script_ms
    );

    reset.done();
    backlight.done();
}

#[test]
fn every_command_is_framed_by_chip_select() {
    let mut bus = RecordingBus::new();
    let mut reset = reset_pulse();
    let mut backlight = PinMock::new(&[PinTransaction::set(State::High)]);

    bring_up(&mut bus, &mut reset, &mut backlight, &mut RecordingDelay::default()).unwrap();

    let ops = bus.ops();
    assert_eq!(
        &ops[..3],
        &[BusOp::Select, BusOp::Command(0x01), BusOp::Deselect]
    );
    let colmod = ops
        .iter()
        .position(|op| *op == BusOp::Command(0x3A))
        .unwrap();
    assert_eq!(ops[colmod + 1], BusOp::Data(0x55));
    assert_eq!(ops[colmod + 2], BusOp::Deselect);

    reset.done();
    backlight.done();
}

#[test]
fn bus_failure_leaves_backlight_off() {
    let mut bus = RecordingBus::new();
    bus.fail_after(4);
    let mut reset = reset_pulse();
    // No expectations: touching the backlight would fail the mock.
    let mut backlight = PinMock::new(&[] as &[PinTransaction]);

    let result = bring_up(&mut bus, &mut reset, &mut backlight, &mut RecordingDelay::default());

    assert_eq!(result, Err(BringUpError::Bus));
    reset.done();
    backlight.done();
}
