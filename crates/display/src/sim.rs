//! Simulated ST7789 panel with an emulated DMA stream
//!
//! Host-side stand-in for the real hardware. Bus traffic is recorded through
//! a [`RecordingBus`] and decoded into a model of controller GRAM: CASET and
//! RASET set the window, RAMWR places the write cursor at its top-left corner
//! and every streamed pixel advances it in raster order, wrapping inside the
//! window like the real controller.
//!
//! Starting the stream copies the source slice, delivers the first burst and
//! then runs the genuine completion-interrupt routine
//! ([`service_interrupt`]), which re-arms or finishes exactly as it would on
//! the microcontroller. By the time `start` returns the transfer engine has
//! been driven to `Draining` and the completion notification is pending.

#![cfg(any(test, feature = "std"))]

use std::vec::Vec;

use embedded_graphics::pixelcolor::raw::RawU16;
use platform::mocks::{BusOp, MockBusError, RecordingBus};
use platform::{DmaStream, PanelBus, SourceMode};

use crate::color::Color;
use crate::geometry::Rect;
use crate::protocol::Command;
use crate::transfer::{service_interrupt, TransferEngine};

/// Columns of ST7789 controller memory
pub const GRAM_COLUMNS: u16 = 240;

/// Rows of ST7789 controller memory
pub const GRAM_ROWS: u16 = 320;

#[allow(clippy::arithmetic_side_effects)] // constant, fits usize
const GRAM_PIXELS: usize = GRAM_COLUMNS as usize * GRAM_ROWS as usize;

/// Panel model implementing both hardware traits.
pub struct SimulatedPanel<'a> {
    bus: RecordingBus,
    engine: &'a TransferEngine,

    gram: Vec<u16>,
    writes: Vec<u32>,

    command: Option<u8>,
    params: Vec<u8>,
    columns: (u16, u16),
    rows: (u16, u16),
    cursor: Option<(u16, u16)>,

    source: Vec<u16>,
    mode: SourceMode,
    pending: Option<u16>,
    enabled: bool,
    transfers: Vec<Vec<u16>>,
    streamed: u64,
    stray: u64,
}

impl<'a> SimulatedPanel<'a> {
    /// Blank (all-zero) panel whose stream interrupts drive `engine`.
    pub fn new(engine: &'a TransferEngine) -> Self {
        Self {
            bus: RecordingBus::new(),
            engine,
            gram: std::vec![0; GRAM_PIXELS],
            writes: std::vec![0; GRAM_PIXELS],
            command: None,
            params: Vec::new(),
            columns: (0, GRAM_COLUMNS.saturating_sub(1)),
            rows: (0, GRAM_ROWS.saturating_sub(1)),
            cursor: None,
            source: Vec::new(),
            mode: SourceMode::Fixed,
            pending: None,
            enabled: false,
            transfers: Vec::new(),
            streamed: 0,
            stray: 0,
        }
    }

    /// Raw GRAM word at `(x, y)`, controller coordinates.
    pub fn raw_pixel(&self, x: u16, y: u16) -> Option<u16> {
        self.gram.get(index(x, y)?).copied()
    }

    /// GRAM color at `(x, y)`, controller coordinates.
    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        self.raw_pixel(x, y).map(|raw| RawU16::new(raw).into())
    }

    /// How many times `(x, y)` has been written.
    pub fn write_count(&self, x: u16, y: u16) -> u32 {
        index(x, y)
            .and_then(|i| self.writes.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Whether every pixel of `rect` holds `color`.
    pub fn region_is(&self, rect: Rect, color: Color) -> bool {
        (rect.top()..=rect.bottom()).all(|y| {
            (rect.left()..=rect.right()).all(|x| self.pixel(x, y) == Some(color))
        })
    }

    /// Forget write counts, keeping GRAM contents.
    pub fn reset_write_counts(&mut self) {
        self.writes.iter_mut().for_each(|w| *w = 0);
    }

    /// Sum of all write counts
    pub fn total_writes(&self) -> u64 {
        self.writes.iter().map(|&w| u64::from(w)).sum()
    }

    /// Burst lengths of every transfer so far, one list per `start`.
    pub fn transfers(&self) -> &[Vec<u16>] {
        &self.transfers
    }

    /// Pixels pushed by the stream, including strays
    pub fn pixels_streamed(&self) -> u64 {
        self.streamed
    }

    /// Pixels streamed outside a selected memory write in 16-bit mode
    pub fn stray_pixels(&self) -> u64 {
        self.stray
    }

    /// Whether the stream is enabled
    pub fn dma_enabled(&self) -> bool {
        self.enabled
    }

    /// Recorded bus operations
    pub fn ops(&self) -> &[BusOp] {
        self.bus.ops()
    }

    /// Recording bus, for its state accessors
    pub fn bus(&self) -> &RecordingBus {
        &self.bus
    }

    /// Make the bus fail after `count` more operations.
    pub fn fail_bus_after(&mut self, count: usize) {
        self.bus.fail_after(count);
    }

    fn decode_params(&mut self) {
        let word = |p: &[u8], at: usize| {
            let hi = p.get(at).copied().unwrap_or(0);
            let lo = p.get(at.saturating_add(1)).copied().unwrap_or(0);
            u16::from_be_bytes([hi, lo])
        };
        if self.params.len() != 4 {
            return;
        }
        let range = (word(&self.params, 0), word(&self.params, 2));
        match self.command {
            Some(c) if c == u8::from(Command::ColumnAddressSet) => self.columns = range,
            Some(c) if c == u8::from(Command::RowAddressSet) => self.rows = range,
            _ => {}
        }
    }

    fn stream_burst(&mut self, burst: u16) {
        #[cfg(feature = "std")]
        tracing::trace!(burst, "sim: burst");
        for i in 0..usize::from(burst) {
            let value = match self.mode {
                SourceMode::Fixed => self.source.first(),
                SourceMode::Increment => self.source.get(i),
            };
            self.write_pixel(value.copied().unwrap_or(0));
        }
        if let Some(current) = self.transfers.last_mut() {
            current.push(burst);
        }
    }

    fn write_pixel(&mut self, value: u16) {
        self.streamed = self.streamed.saturating_add(1);
        let Some((x, y)) = self.cursor.filter(|_| self.bus.is_selected() && self.bus.is_streaming())
        else {
            self.stray = self.stray.saturating_add(1);
            return;
        };
        if let Some(i) = index(x, y) {
            if let Some(slot) = self.gram.get_mut(i) {
                *slot = value;
            }
            if let Some(count) = self.writes.get_mut(i) {
                *count = count.saturating_add(1);
            }
        }
        self.cursor = Some(self.advance(x, y));
    }

    fn advance(&self, x: u16, y: u16) -> (u16, u16) {
        let (left, right) = self.columns;
        let (top, bottom) = self.rows;
        if x < right {
            (x.saturating_add(1), y)
        } else if y < bottom {
            (left, y.saturating_add(1))
        } else {
            (left, top)
        }
    }
}

fn index(x: u16, y: u16) -> Option<usize> {
    if x >= GRAM_COLUMNS || y >= GRAM_ROWS {
        return None;
    }
    usize::from(y)
        .checked_mul(usize::from(GRAM_COLUMNS))?
        .checked_add(usize::from(x))
}

impl PanelBus for SimulatedPanel<'_> {
    type Error = MockBusError;

    fn select(&mut self) -> Result<(), Self::Error> {
        self.bus.select()
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        self.bus.deselect()?;
        self.cursor = None;
        Ok(())
    }

    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.bus.write_command(command)?;
        self.command = Some(command);
        self.params.clear();
        self.cursor = (command == u8::from(Command::MemoryWrite))
            .then_some((self.columns.0, self.rows.0));
        Ok(())
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.bus.write_data(data)?;
        self.params.extend_from_slice(data);
        self.decode_params();
        Ok(())
    }

    fn write_data16(&mut self, word: u16) -> Result<(), Self::Error> {
        self.bus.write_data16(word)?;
        self.params.extend_from_slice(&word.to_be_bytes());
        self.decode_params();
        Ok(())
    }

    fn begin_stream(&mut self) -> Result<(), Self::Error> {
        self.bus.begin_stream()
    }
}

impl DmaStream for SimulatedPanel<'_> {
    unsafe fn start(&mut self, source: &[u16], mode: SourceMode, burst: u16) {
        self.source = source.to_vec();
        self.mode = mode;
        self.enabled = true;
        self.transfers.push(Vec::new());
        self.pending = Some(burst);

        let engine = self.engine;
        while let Some(burst) = self.pending.take() {
            self.stream_burst(burst);
            service_interrupt(engine, self);
        }
    }

    fn rearm(&mut self, burst: u16) {
        self.pending = Some(burst);
    }

    fn stop(&mut self) {
        self.enabled = false;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests use unwrap() for readable assertions
mod tests {
    use super::*;
    use crate::protocol::{open_window, PanelConfig};
    use crate::transfer::Phase;
    use embedded_graphics::pixelcolor::RgbColor;

    #[test]
    fn window_then_stream_paints_rect() {
        let engine = TransferEngine::with_max_burst(7);
        let mut panel = SimulatedPanel::new(&engine);
        let rect = Rect::new(2, 5, 3, 6);
        let pixels = open_window(&mut panel, rect, &PanelConfig::default()).unwrap();
        let burst = engine.arm(pixels).unwrap();
        // SAFETY: the simulated stream copies the source before returning.
        unsafe { panel.start(&[0xF800], SourceMode::Fixed, burst) };

        assert!(panel.region_is(rect, Color::RED));
        assert_eq!(panel.total_writes(), 16);
        assert_eq!(panel.transfers(), &[vec![7, 7, 2]]);
        assert_eq!(engine.phase(), Phase::Draining);
        assert!(engine.is_notified());
        assert!(!panel.bus().is_selected());
        assert!(!panel.dma_enabled());
    }

    #[test]
    fn pixels_without_memory_write_are_stray() {
        let engine = TransferEngine::new();
        let mut panel = SimulatedPanel::new(&engine);
        engine.arm(3).unwrap();
        // SAFETY: the simulated stream copies the source before returning.
        unsafe { panel.start(&[1, 2, 3], SourceMode::Increment, 3) };
        assert_eq!(panel.stray_pixels(), 3);
        assert_eq!(panel.total_writes(), 0);
    }

    #[test]
    fn cursor_wraps_inside_window() {
        let engine = TransferEngine::new();
        let mut panel = SimulatedPanel::new(&engine);
        let rect = Rect::new(0, 1, 0, 0);
        open_window(&mut panel, rect, &PanelConfig::default()).unwrap();
        engine.arm(3).unwrap();
        // SAFETY: the simulated stream copies the source before returning.
        unsafe { panel.start(&[10, 20, 30], SourceMode::Increment, 3) };
        assert_eq!(panel.raw_pixel(0, 0), Some(30));
        assert_eq!(panel.raw_pixel(1, 0), Some(20));
        assert_eq!(panel.write_count(0, 0), 2);
    }
}
