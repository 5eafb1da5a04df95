//! Chunked DMA transfer engine
//!
//! The stream's length register is 16 bits wide, a full-screen fill is not.
//! The engine splits a transfer of any pixel count into bursts of at most
//! `max_burst` elements: the rendering task arms the first burst, and the
//! completion interrupt re-arms the stream until nothing is left, then stops
//! the stream, releases the bus and wakes the task.
//!
//! ```text
//!            arm()                on_burst_complete()
//!   Idle ───────────▶ Streaming ─────────────────────┐ remaining > 0
//!    ▲                    │  ▲───────────────────────┘  (rearm)
//!    │ take_remaining()   │ remaining == 0
//!    └──────────── Draining ◀┘  (stop, deselect, notify)
//! ```
//!
//! State lives in a critical-section mutex shared by exactly two contexts: the
//! rendering task and the stream's interrupt handler. `arm` is refused unless
//! the engine is `Idle`, so a second transfer can never overlap the first.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use platform::{DmaStream, PanelBus, MAX_BURST};

use crate::error::TransferError;

/// Where the engine is in the transfer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No transfer in flight; the shared buffer belongs to the task.
    Idle,
    /// A burst is running. `remaining` pixels are not yet handed to the stream.
    Streaming {
        /// Pixels still to be armed
        remaining: u32,
    },
    /// The last burst finished; waiting for the task to acknowledge.
    Draining,
}

/// What the completion interrupt has to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BurstOutcome {
    /// Re-arm the stream with this many elements.
    Continue(u16),
    /// All pixels are out: stop the stream, release the bus, notify.
    Done,
    /// No transfer was streaming; ignore.
    Spurious,
}

/// Running totals, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferStats {
    /// Bursts handed to the stream
    pub bursts: u32,
    /// Transfers that reached `Draining`
    pub transfers: u32,
    /// Completion interrupts with nothing in flight
    pub spurious: u32,
}

/// Interrupt-safe chunking state machine plus the completion notification.
pub struct TransferEngine {
    phase: Mutex<CriticalSectionRawMutex, Cell<Phase>>,
    stats: Mutex<CriticalSectionRawMutex, Cell<TransferStats>>,
    done: Signal<CriticalSectionRawMutex, ()>,
    max_burst: u16,
}

impl Default for TransferEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferEngine {
    /// Engine bounded by the hardware limit [`MAX_BURST`].
    pub const fn new() -> Self {
        Self::with_max_burst(MAX_BURST)
    }

    /// Engine with a smaller burst limit. Zero is treated as one.
    pub const fn with_max_burst(max_burst: u16) -> Self {
        Self {
            phase: Mutex::new(Cell::new(Phase::Idle)),
            stats: Mutex::new(Cell::new(TransferStats {
                bursts: 0,
                transfers: 0,
                spurious: 0,
            })),
            done: Signal::new(),
            max_burst: if max_burst == 0 { 1 } else { max_burst },
        }
    }

    /// Burst limit in elements
    pub const fn max_burst(&self) -> u16 {
        self.max_burst
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase.lock(Cell::get)
    }

    /// Totals since construction
    pub fn stats(&self) -> TransferStats {
        self.stats.lock(Cell::get)
    }

    /// Start a transfer of `pixels` elements and return the length of the
    /// first burst.
    ///
    /// Task context. Fails with [`TransferError::Busy`] unless the engine is
    /// `Idle`.
    pub fn arm(&self, pixels: u32) -> Result<u16, TransferError> {
        if pixels == 0 {
            return Err(TransferError::Empty);
        }
        let burst = self.phase.lock(|phase| match phase.get() {
            Phase::Idle => {
                let (burst, remaining) = split(pixels, self.max_burst);
                phase.set(Phase::Streaming { remaining });
                Ok(burst)
            }
            Phase::Streaming { .. } | Phase::Draining => Err(TransferError::Busy),
        })?;
        self.done.reset();
        self.count(|s| s.bursts = s.bursts.wrapping_add(1));
        Ok(burst)
    }

    /// Advance after a burst-complete event.
    ///
    /// Interrupt context. Never blocks.
    pub fn on_burst_complete(&self) -> BurstOutcome {
        let outcome = self.phase.lock(|phase| match phase.get() {
            Phase::Streaming { remaining: 0 } => {
                phase.set(Phase::Draining);
                BurstOutcome::Done
            }
            Phase::Streaming { remaining } => {
                let (burst, remaining) = split(remaining, self.max_burst);
                phase.set(Phase::Streaming { remaining });
                BurstOutcome::Continue(burst)
            }
            Phase::Idle | Phase::Draining => BurstOutcome::Spurious,
        });
        match outcome {
            BurstOutcome::Continue(_) => self.count(|s| s.bursts = s.bursts.wrapping_add(1)),
            BurstOutcome::Done => self.count(|s| s.transfers = s.transfers.wrapping_add(1)),
            BurstOutcome::Spurious => self.count(|s| s.spurious = s.spurious.wrapping_add(1)),
        }
        outcome
    }

    /// Acknowledge a finished transfer and return the pixels it left unsent.
    ///
    /// Task context, after the completion notification: moves `Draining` to
    /// `Idle`. A transfer that is still `Streaming` cannot be abandoned; the
    /// call fails with [`TransferError::Busy`] and leaves it running.
    pub fn take_remaining(&self) -> Result<u32, TransferError> {
        self.phase.lock(|phase| match phase.get() {
            Phase::Streaming { .. } => Err(TransferError::Busy),
            Phase::Draining => {
                phase.set(Phase::Idle);
                Ok(0)
            }
            Phase::Idle => Ok(0),
        })
    }

    /// Suspend until the completion interrupt reports the end of the
    /// transfer, then close it.
    pub async fn wait_complete(&self) {
        loop {
            self.done.wait().await;
            if self.take_remaining().is_ok() {
                return;
            }
        }
    }

    /// Whether a completion notification is pending
    pub fn is_notified(&self) -> bool {
        self.done.signaled()
    }

    fn notify(&self) {
        self.done.signal(());
    }

    fn count(&self, f: impl FnOnce(&mut TransferStats)) {
        self.stats.lock(|cell| {
            let mut stats = cell.get();
            f(&mut stats);
            cell.set(stats);
        });
    }
}

/// Split `pixels` into this burst and what is left after it.
fn split(pixels: u32, max_burst: u16) -> (u16, u32) {
    let burst = u16::try_from(pixels).map_or(max_burst, |p| p.min(max_burst));
    (burst, pixels.saturating_sub(u32::from(burst)))
}

/// Body of the stream's transfer-complete interrupt handler.
///
/// Re-arms the stream while pixels remain; after the last burst disables the
/// stream, releases the bus and wakes the task blocked in
/// [`TransferEngine::wait_complete`].
pub fn service_interrupt<H>(engine: &TransferEngine, hw: &mut H)
where
    H: PanelBus + DmaStream,
{
    match engine.on_burst_complete() {
        BurstOutcome::Continue(burst) => hw.rearm(burst),
        BurstOutcome::Done => {
            hw.stop();
            if hw.deselect().is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("display: bus did not release after transfer");
            }
            engine.notify();
        }
        BurstOutcome::Spurious => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests use unwrap() for readable assertions
mod tests {
    use super::*;

    #[test]
    fn single_burst_transfer() {
        let engine = TransferEngine::new();
        assert_eq!(engine.arm(100), Ok(100));
        assert_eq!(engine.phase(), Phase::Streaming { remaining: 0 });
        assert_eq!(engine.on_burst_complete(), BurstOutcome::Done);
        assert_eq!(engine.phase(), Phase::Draining);
        assert_eq!(engine.take_remaining(), Ok(0));
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn full_screen_takes_two_bursts() {
        let engine = TransferEngine::new();
        assert_eq!(engine.arm(76_800), Ok(0xFFFF));
        assert_eq!(engine.on_burst_complete(), BurstOutcome::Continue(11_265));
        assert_eq!(engine.on_burst_complete(), BurstOutcome::Done);
        assert_eq!(engine.stats().bursts, 2);
        assert_eq!(engine.stats().transfers, 1);
    }

    #[test]
    fn cannot_rearm_while_in_flight() {
        let engine = TransferEngine::with_max_burst(4);
        assert_eq!(engine.arm(10), Ok(4));
        assert_eq!(engine.arm(1), Err(TransferError::Busy));
        assert_eq!(engine.on_burst_complete(), BurstOutcome::Continue(4));
        assert_eq!(engine.on_burst_complete(), BurstOutcome::Continue(2));
        assert_eq!(engine.on_burst_complete(), BurstOutcome::Done);
        assert_eq!(engine.arm(1), Err(TransferError::Busy));
        engine.take_remaining().unwrap();
        assert_eq!(engine.arm(1), Ok(1));
    }

    #[test]
    fn zero_pixels_is_rejected() {
        let engine = TransferEngine::new();
        assert_eq!(engine.arm(0), Err(TransferError::Empty));
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn spurious_interrupt_is_ignored() {
        let engine = TransferEngine::new();
        assert_eq!(engine.on_burst_complete(), BurstOutcome::Spurious);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.stats().spurious, 1);
    }

    #[test]
    fn streaming_transfer_cannot_be_abandoned() {
        let engine = TransferEngine::with_max_burst(10);
        assert_eq!(engine.arm(35), Ok(10));
        assert_eq!(engine.take_remaining(), Err(TransferError::Busy));
        assert_eq!(engine.phase(), Phase::Streaming { remaining: 25 });
        assert_eq!(engine.arm(5), Err(TransferError::Busy));

        assert_eq!(engine.on_burst_complete(), BurstOutcome::Continue(10));
        assert_eq!(engine.on_burst_complete(), BurstOutcome::Continue(10));
        assert_eq!(engine.on_burst_complete(), BurstOutcome::Continue(5));
        assert_eq!(engine.on_burst_complete(), BurstOutcome::Done);
        assert_eq!(engine.arm(5), Err(TransferError::Busy));

        assert_eq!(engine.take_remaining(), Ok(0));
        assert_eq!(engine.arm(5), Ok(5));
    }

    #[test]
    fn wait_complete_closes_drained_transfer() {
        let engine = TransferEngine::new();
        engine.arm(3).unwrap();
        assert_eq!(engine.on_burst_complete(), BurstOutcome::Done);
        engine.notify();
        embassy_futures::block_on(engine.wait_complete());
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn zero_max_burst_is_clamped() {
        assert_eq!(TransferEngine::with_max_burst(0).max_burst(), 1);
    }

    #[test]
    fn split_handles_counts_beyond_u16() {
        assert_eq!(split(70_000, 0xFFFF), (0xFFFF, 70_000 - 0xFFFF));
        assert_eq!(split(5, 0xFFFF), (5, 0));
    }
}
