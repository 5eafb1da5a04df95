//! Rendering dispatch loop
//!
//! The renderer is the only code that touches the panel bus and the DMA
//! stream from task context. It takes one command at a time off the
//! [`CommandQueue`], turns it into address windows and pixel transfers, and
//! suspends on the transfer engine until the completion interrupt reports the
//! last burst. Commands therefore never overlap, and the shared pixel buffer
//! is only written while the engine is idle.
//!
//! Failures are logged and the command is dropped. Producers never see them
//! and nothing is retried.

use platform::config::MAX_GLYPH_PIXELS;
use platform::{DmaAccessible, DmaBuffer, DmaStream, PanelBus, SourceMode};

use crate::color::{blend, to_raw, Color, TRANSPARENT};
use crate::command::DisplayCommand;
use crate::error::RenderError;
use crate::font::{Font, Glyph};
use crate::geometry::Rect;
use crate::protocol::{open_window, PanelConfig};
use crate::queue::CommandQueue;
use crate::transfer::TransferEngine;

/// Pixel storage shared between the renderer and the DMA stream.
pub type PixelBuffer = [u16; MAX_GLYPH_PIXELS];

/// Which color a strip of a bordered rectangle takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StripKind {
    /// One-pixel border
    Border,
    /// Everything inside the border
    Interior,
}

/// One solid fill of a bordered rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Strip {
    /// Area to fill
    pub rect: Rect,
    /// Border or interior color
    pub kind: StripKind,
}

/// Decompose a bordered rectangle into non-overlapping fills, in drawing
/// order: top, bottom, left, right, interior.
///
/// The border sits one pixel outside `interior`. Border sides that would fall
/// outside the coordinate range are left out.
pub fn frame_strips(interior: Rect) -> heapless::Vec<Strip, 5> {
    let outer = interior.outset();
    let border = |rect| Strip {
        rect,
        kind: StripKind::Border,
    };
    let sides = [
        interior
            .top()
            .checked_sub(1)
            .map(|row| Rect::new(outer.left(), outer.right(), row, row)),
        interior
            .bottom()
            .checked_add(1)
            .map(|row| Rect::new(outer.left(), outer.right(), row, row)),
        interior
            .left()
            .checked_sub(1)
            .map(|col| Rect::new(col, col, interior.top(), interior.bottom())),
        interior
            .right()
            .checked_add(1)
            .map(|col| Rect::new(col, col, interior.top(), interior.bottom())),
    ];

    let mut strips = heapless::Vec::new();
    for side in sides.into_iter().flatten() {
        let _ = strips.push(border(side));
    }
    let _ = strips.push(Strip {
        rect: interior,
        kind: StripKind::Interior,
    });
    strips
}

/// Single consumer of the command queue and owner of the panel hardware.
pub struct Renderer<'a, H, R: DmaAccessible> {
    hw: H,
    engine: &'a TransferEngine,
    pixels: &'a mut DmaBuffer<R, PixelBuffer>,
    panel: PanelConfig,
}

impl<'a, H, R> Renderer<'a, H, R>
where
    H: PanelBus + DmaStream,
    R: DmaAccessible,
{
    /// Renderer over `hw`, which must already be through panel bring-up.
    ///
    /// `engine` must be the instance the stream's interrupt handler passes to
    /// [`service_interrupt`](crate::transfer::service_interrupt).
    pub fn new(
        hw: H,
        engine: &'a TransferEngine,
        pixels: &'a mut DmaBuffer<R, PixelBuffer>,
        panel: PanelConfig,
    ) -> Self {
        Self {
            hw,
            engine,
            pixels,
            panel,
        }
    }

    /// Panel geometry in use
    pub fn panel(&self) -> &PanelConfig {
        &self.panel
    }

    /// Underlying hardware
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// Give the hardware back
    pub fn into_hardware(self) -> H {
        self.hw
    }

    /// Execute commands from `queue` forever.
    pub async fn run(mut self, queue: &CommandQueue) -> ! {
        #[cfg(feature = "defmt")]
        defmt::info!(
            "display: rendering {}x{} panel",
            self.panel.width,
            self.panel.height
        );
        loop {
            self.process_next(queue).await;
        }
    }

    /// Wait for the next command and execute it.
    pub async fn process_next(&mut self, queue: &CommandQueue) {
        let command = queue.receive().await;
        #[cfg(feature = "defmt")]
        defmt::trace!("display: {}", command);
        let name = command.name();
        if let Err(e) = self.execute(command).await {
            #[cfg(feature = "defmt")]
            defmt::warn!("display: {} dropped: {}", name, e.describe());
            #[cfg(not(feature = "defmt"))]
            let _ = (name, e);
        }
    }

    /// Execute one command to completion.
    pub async fn execute(&mut self, command: DisplayCommand) -> Result<(), RenderError<H::Error>> {
        match command {
            DisplayCommand::FillScreen { color } => {
                let rect = self.panel.full_rect();
                self.fill(rect, color).await
            }
            DisplayCommand::FillRect { rect, color } => self.fill(rect, color).await,
            DisplayCommand::DrawRect { rect, fore, border } => {
                for strip in frame_strips(rect) {
                    let color = match strip.kind {
                        StripKind::Border => border,
                        StripKind::Interior => fore,
                    };
                    self.fill(strip.rect, color).await?;
                }
                Ok(())
            }
            DisplayCommand::DrawText {
                font,
                x,
                y,
                fore,
                back,
                text,
            } => self.draw_text(font, x, y, fore, back, &text).await,
        }
    }

    async fn fill(&mut self, rect: Rect, color: Color) -> Result<(), RenderError<H::Error>> {
        if let Some(slot) = self.pixels.get_mut().first_mut() {
            *slot = to_raw(color);
        }
        self.transfer(rect, SourceMode::Fixed, 1).await
    }

    async fn draw_text(
        &mut self,
        font: &Font,
        x: u16,
        y: u16,
        fore: Color,
        back: Color,
        text: &[char],
    ) -> Result<(), RenderError<H::Error>> {
        let cell_pixels = font.glyph_pixels();
        if cell_pixels > MAX_GLYPH_PIXELS {
            return Err(RenderError::GlyphTooLarge);
        }

        let mut cursor = x;
        for &ch in text {
            let origin = cursor;
            cursor = cursor.saturating_add(font.width());

            let Some(glyph) = font.glyph(ch) else {
                #[cfg(feature = "defmt")]
                defmt::debug!("display: no glyph for {}", ch);
                continue;
            };
            let Some(cell) = Rect::with_size(origin, y, font.width(), font.height()) else {
                #[cfg(feature = "defmt")]
                defmt::warn!("display: glyph at ({}, {}) out of range", origin, y);
                continue;
            };

            self.composite(glyph, fore, back, cell_pixels);
            self.transfer(cell, SourceMode::Increment, cell_pixels).await?;
        }
        Ok(())
    }

    /// Blend `glyph` into the first `count` slots of the pixel buffer.
    /// Missing coverage bytes render as background.
    fn composite(&mut self, glyph: &Glyph, fore: Color, back: Color, count: usize) {
        let coverage = glyph.coverage();
        for (i, slot) in self.pixels.get_mut().iter_mut().take(count).enumerate() {
            let alpha = coverage.get(i).copied().unwrap_or(TRANSPARENT);
            *slot = to_raw(blend(fore, back, alpha));
        }
    }

    /// Address `rect` and stream `len` buffer slots into it, returning once
    /// the completion interrupt has closed the transfer.
    async fn transfer(
        &mut self,
        rect: Rect,
        mode: SourceMode,
        len: usize,
    ) -> Result<(), RenderError<H::Error>> {
        let pixels = open_window(&mut self.hw, rect, &self.panel)?;
        let burst = match self.engine.arm(pixels) {
            Ok(burst) => burst,
            Err(e) => {
                let _ = self.hw.deselect();
                return Err(e.into());
            }
        };
        if pixels > u32::from(burst) {
            #[cfg(feature = "defmt")]
            defmt::debug!("display: {=u32} pixels in bursts of {=u16}", pixels, burst);
        }

        let source = self.pixels.get().get(..len).unwrap_or_default();
        // SAFETY: `source` borrows the pixel buffer, which this renderer holds
        // exclusively and does not write again before `wait_complete` returns,
        // i.e. after the interrupt handler has stopped the stream. `R` proves
        // the buffer is DMA-reachable.
        unsafe { self.hw.start(source, mode, burst) };

        self.engine.wait_complete().await;
        Ok(())
    }
}
