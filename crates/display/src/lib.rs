//! ST7789 display command pipeline
//!
//! Application tasks submit drawing commands; one rendering task executes
//! them against the panel, streaming pixels with a DMA engine whose 16-bit
//! length register forces large transfers to be chunked from the completion
//! interrupt.
//!
//! # Architecture
//!
//! ```text
//! producer tasks ──▶ CommandQueue ──▶ Renderer ──▶ open_window (CASET/RASET/RAMWR)
//!   (Display API)     (bounded,          │
//!                      FIFO)             └──▶ TransferEngine::arm ──▶ DmaStream::start
//!                                                  ▲                        │
//!                                  wait_complete ──┘   service_interrupt ◀──┘
//!                                                      (rearm | stop + notify)
//! ```
//!
//! # Modules
//!
//! - [`queue`] - command queue and the [`Display`](queue::Display) submission API
//! - [`renderer`] - dispatch loop
//! - [`protocol`] - panel addressing
//! - [`transfer`] - chunked DMA state machine and interrupt routine
//! - [`color`] - RGB565 alpha compositing
//! - [`font`] - glyph tables and lookup
//! - [`sim`] - simulated panel for host tests (`std`)
//!
//! # Features
//!
//! - `std`: simulated panel and mock bus
//! - `defmt`: defmt logging and `defmt::Format` derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod color;
pub mod command;
pub mod error;
pub mod font;
pub mod geometry;
pub mod protocol;
pub mod queue;
pub mod renderer;
pub mod sim;
pub mod transfer;

pub use color::{blend, Color};
pub use command::DisplayCommand;
pub use error::{RenderError, SetupError, TransferError};
pub use font::{lookup, Font, Glyph};
pub use geometry::Rect;
pub use protocol::PanelConfig;
pub use queue::{CommandQueue, Display};
pub use renderer::{PixelBuffer, Renderer};
pub use transfer::{service_interrupt, TransferEngine};
