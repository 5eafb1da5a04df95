//! DMA safety marker traits and burst limits for STM32F411.
//!
//! ## DMA Accessibility on STM32F4
//!
//! | Memory Region | Base Address | Size   | DMA1/2 | Use case |
//! |---------------|-------------|--------|--------|----------|
//! | SRAM1         | 0x2000_0000 | 128 KB | YES    | Glyph pixel buffer, fill color |
//! | CCM RAM†      | 0x1000_0000 | 64 KB  | NO     | CPU-only: stack, ISR scratch |
//!
//! † Present on STM32F405/407/429 only. The F411 has no CCM, but the marker
//! exists so the pixel buffer type keeps rejecting it when the board is
//! swapped for a larger part.
//!
//! ## Usage
//! ```rust
//! use platform::config::MAX_GLYPH_PIXELS;
//! use platform::dma_safety::{DmaBuffer, SramRegion};
//!
//! // SAFETY: statics without a link_section land in .bss (SRAM1).
//! static mut PIXELS: DmaBuffer<SramRegion, [u16; MAX_GLYPH_PIXELS]> =
//!     unsafe { DmaBuffer::new([0; MAX_GLYPH_PIXELS]) };
//! ```

use core::marker::PhantomData;

// ── Memory region addresses ──────────────────────────────────────────────────

/// Base address of SRAM1 (DMA1/DMA2 accessible).
pub const SRAM1_BASE: u32 = 0x2000_0000;

/// Size of SRAM1 in bytes on the STM32F411 (128 KB).
pub const SRAM1_SIZE_BYTES: usize = 128 * 1024;

/// Base address of CCM RAM on parts that have it.
pub const CCM_BASE: u32 = 0x1000_0000;

/// True: CCM RAM is NOT DMA-accessible. Place no DMA buffers here.
pub const CCM_NOT_DMA_ACCESSIBLE: bool = true;

// ── Stream limits ────────────────────────────────────────────────────────────

/// Largest element count a single stream transfer can carry.
///
/// `DMA_SxNDTR` is 16 bits wide. A 240 x 320 fill (76 800 pixels) therefore
/// needs two bursts: 65 535 + 11 265.
pub const MAX_BURST: u16 = 0xFFFF;

// ── Marker traits ────────────────────────────────────────────────────────────

/// Marker trait: memory region reachable from the DMA1/DMA2 memory port.
///
/// # Safety
/// Only implement for zero-sized types representing memory regions
/// that are physically accessible by the STM32F4 DMA controllers.
/// Implementing it for CCM RAM makes the controller read from a bus it is
/// not connected to, which raises a transfer error and sends garbage pixels.
pub unsafe trait DmaAccessible: Sized {}

// ── Region zero-sized types ──────────────────────────────────────────────────

/// Zero-sized type representing SRAM1 (DMA1/DMA2 accessible).
#[derive(Debug, Clone, Copy)]
pub struct SramRegion;

// SAFETY: SRAM1 at 0x2000_0000 sits on the AHB bus matrix and is reachable by
// both DMA memory ports (RM0383 §2.1, Figure 1).
unsafe impl DmaAccessible for SramRegion {}

/// Zero-sized type representing CCM RAM (CPU-only, NOT DMA-accessible).
#[derive(Debug, Clone, Copy)]
pub struct CcmRegion;
// CcmRegion intentionally does NOT implement DmaAccessible.

// ── Region-tagged buffer ─────────────────────────────────────────────────────

/// A value tagged with the memory region it lives in.
///
/// Streams only accept sources through this wrapper, so a buffer placed in
/// CPU-only memory is a type error instead of a silent bus fault.
#[repr(transparent)]
pub struct DmaBuffer<R: DmaAccessible, T> {
    data: T,
    _region: PhantomData<R>,
}

impl<R: DmaAccessible, T> DmaBuffer<R, T> {
    /// Tag `data` as living in region `R`.
    ///
    /// # Safety
    ///
    /// The resulting value must actually be placed in `R` (through a
    /// `link_section` or the default section that maps to `R`).
    pub const unsafe fn new(data: T) -> Self {
        Self {
            data,
            _region: PhantomData,
        }
    }

    /// Shared access to the contents.
    pub fn get(&self) -> &T {
        &self.data
    }

    /// Exclusive access to the contents.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.data
    }
}
