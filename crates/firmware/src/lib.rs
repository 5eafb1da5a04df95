//! ST7789 pipeline firmware
//!
//! Board glue around the `display` crate: panel bring-up, the demo font, the
//! controller task body and, behind `hardware`, the STM32F411 backend.
//!
//! # Architecture
//!
//! ```text
//! main.rs (tasks, DMA1_STREAM4 handler)
//!         ↓
//! controller ──▶ display::Display ──▶ display::Renderer
//!                                          ↓
//! bringup (once)                    hw::Stm32Panel (SPI2 + DMA1 stream 4)
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for the STM32F411 target (embassy executor, PAC)
//! - `defmt` - defmt logging
//! - `std` - Host builds of the library for tests
//!
//! # Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::await_holding_lock)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)]
#![warn(clippy::dbg_macro)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod bringup;
pub mod controller;
pub mod fault;
pub mod fonts;

#[cfg(feature = "hardware")]
pub mod hw;

pub use bringup::{bring_up, BringUpError, INIT_SCRIPT};
pub use fonts::DEMO_FONT;
