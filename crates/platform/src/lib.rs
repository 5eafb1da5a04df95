//! Hardware Abstraction Layer (HAL) for the ST7789 panel pipeline
//!
//! This crate provides the trait seams between the rendering core and the
//! microcontroller, so the whole pipeline can be exercised on a desktop host.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: bring-up, controller, ISR wiring)
//!         ↓
//! Rendering Core (display crate: queue, renderer, transfer engine)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (PAC registers)
//! ```
//!
//! # Abstractions
//!
//! - [`PanelBus`] - chip select, command/data framing, 16-bit stream mode
//! - [`DmaStream`] - memory-to-peripheral stream with a 16-bit length register
//! - [`dma_safety`] - which memory the DMA controller can reach
//! - [`config`] - panel geometry and pipeline sizing
//!
//! # Features
//!
//! - `std`: Enable standard library support (mocks for testing)
//! - `defmt`: Enable defmt logging
//!
//! # Example
//!
//! ```no_run
//! use platform::PanelBus;
//!
//! fn sleep_out<B: PanelBus>(bus: &mut B) -> Result<(), B::Error> {
//!     bus.select()?;
//!     bus.write_command(0x11)?;
//!     bus.deselect()
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod bus;
pub mod config;
pub mod dma;
pub mod dma_safety;
pub mod mocks;

pub use bus::PanelBus;
pub use dma::{DmaStream, SourceMode};
pub use dma_safety::{DmaAccessible, DmaBuffer, MAX_BURST};
