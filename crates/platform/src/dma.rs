//! DMA abstraction layer
//!
//! A single memory-to-peripheral stream feeding the panel bus. The length
//! register is 16 bits wide, so a transfer longer than
//! [`MAX_BURST`](crate::MAX_BURST) elements has to be re-armed from the
//! completion interrupt; that sequencing lives in the rendering core, this
//! trait only exposes the register-level steps.

/// Source address behaviour of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceMode {
    /// Re-read the same element for every transfer (solid fills).
    Fixed,
    /// Advance through the source slice (glyph bitmaps).
    Increment,
}

/// Memory-to-peripheral DMA stream.
///
/// `rearm` and `stop` are called from interrupt context and therefore cannot
/// fail; implementations that can detect errors report them through the
/// transfer-error interrupt instead.
pub trait DmaStream {
    /// Link the peripheral to the stream, program `burst` elements from
    /// `source` and enable the stream.
    ///
    /// In [`SourceMode::Fixed`] only the first element of `source` is read.
    /// Re-arming restarts at the start of `source`, so incrementing transfers
    /// must fit a single burst.
    ///
    /// # Safety
    ///
    /// The controller reads `source` concurrently with the CPU. The slice
    /// must stay valid and unmodified until the transfer's completion has
    /// been reported, and it must live in DMA-reachable memory
    /// (see [`DmaAccessible`](crate::DmaAccessible)).
    unsafe fn start(&mut self, source: &[u16], mode: SourceMode, burst: u16);

    /// Reload the length register with `burst` and re-enable the stream after
    /// a transfer-complete event.
    fn rearm(&mut self, burst: u16);

    /// Disable the stream and unlink the peripheral's DMA request.
    fn stop(&mut self);
}

impl<T: DmaStream + ?Sized> DmaStream for &mut T {
    unsafe fn start(&mut self, source: &[u16], mode: SourceMode, burst: u16) {
        // SAFETY: forwarded verbatim; the caller upholds the contract.
        unsafe { (**self).start(source, mode, burst) }
    }

    fn rearm(&mut self, burst: u16) {
        (**self).rearm(burst);
    }

    fn stop(&mut self) {
        (**self).stop();
    }
}
