//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform traits
//! for use in unit and integration tests.

#![cfg(any(test, feature = "std"))]

use std::vec::Vec;

use crate::PanelBus;

/// One observable operation on a [`PanelBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    /// Chip select asserted
    Select,
    /// Chip select released
    Deselect,
    /// Command byte
    Command(u8),
    /// 8-bit parameter byte
    Data(u8),
    /// 16-bit parameter word
    Data16(u16),
    /// Switched to 16-bit pixel streaming
    BeginStream,
}

/// Error returned by [`RecordingBus`] once its failure budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

impl core::fmt::Display for MockBusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "injected bus failure")
    }
}

/// Bus that records every operation in order.
#[derive(Debug, Default)]
pub struct RecordingBus {
    ops: Vec<BusOp>,
    selected: bool,
    streaming: bool,
    fail_after: Option<usize>,
}

impl RecordingBus {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every operation after `count` more have succeeded.
    pub fn fail_after(&mut self, count: usize) {
        self.fail_after = Some(count);
    }

    /// Recorded operations, oldest first
    pub fn ops(&self) -> &[BusOp] {
        &self.ops
    }

    /// Drain the recorded operations
    pub fn take_ops(&mut self) -> Vec<BusOp> {
        core::mem::take(&mut self.ops)
    }

    /// Command bytes only, in order
    pub fn commands(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                BusOp::Command(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// Whether chip select is currently asserted
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether the bus is in 16-bit streaming mode
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn record(&mut self, op: BusOp) -> Result<(), MockBusError> {
        if let Some(budget) = self.fail_after.as_mut() {
            if *budget == 0 {
                return Err(MockBusError);
            }
            *budget = budget.saturating_sub(1);
        }
        self.ops.push(op);
        Ok(())
    }
}

impl PanelBus for RecordingBus {
    type Error = MockBusError;

    fn select(&mut self) -> Result<(), Self::Error> {
        self.record(BusOp::Select)?;
        self.selected = true;
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        self.record(BusOp::Deselect)?;
        self.selected = false;
        self.streaming = false;
        Ok(())
    }

    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.record(BusOp::Command(command))
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        data.iter().try_for_each(|b| self.record(BusOp::Data(*b)))
    }

    fn write_data16(&mut self, word: u16) -> Result<(), Self::Error> {
        self.record(BusOp::Data16(word))
    }

    fn begin_stream(&mut self) -> Result<(), Self::Error> {
        self.record(BusOp::BeginStream)?;
        self.streaming = true;
        Ok(())
    }
}
