//! Panel and pipeline configuration
//!
//! Central compile-time values shared by the rendering core and the firmware.
//! Everything that sizes a static (queue depth, text capacity, pixel buffer)
//! is defined here rather than hardcoded at the use site.

/// The application name
pub const APP_NAME: &str = "st7789-pipeline";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ── Panel geometry ───────────────────────────────────────────────────────────

/// Visible width in pixels (ST7789V, portrait).
pub const PANEL_WIDTH: u16 = 240;

/// Visible height in pixels.
pub const PANEL_HEIGHT: u16 = 320;

/// Column offset of the visible area inside controller GRAM.
///
/// Zero for 240 x 320 glass; 135 x 240 modules use 52/40 and 240 x 240
/// modules use 0/80.
pub const PANEL_OFFSET_X: u16 = 0;

/// Row offset of the visible area inside controller GRAM.
pub const PANEL_OFFSET_Y: u16 = 0;

// ── Pipeline sizing ──────────────────────────────────────────────────────────

/// Number of pending drawing commands before producers are suspended.
pub const COMMAND_QUEUE_DEPTH: usize = 16;

/// Code points carried by a single text command.
///
/// Longer strings are split into several commands by the submission API.
pub const TEXT_CAPACITY: usize = 16;

/// Largest glyph the renderer can stream, in pixels.
///
/// Sizes the shared pixel buffer: 2304 RGB565 words = 4.5 KB, enough for a
/// 48 x 48 cell.
pub const MAX_GLYPH_PIXELS: usize = 2304;

/// Name of the rendering task in logs and spawn errors.
pub const RENDER_TASK_NAME: &str = "display";

/// Name of the demo controller task in logs and spawn errors.
pub const CONTROLLER_TASK_NAME: &str = "controller";

// Incrementing streams restart at the buffer start on re-arm, so a glyph must
// fit a single burst.
const _: () = assert!(MAX_GLYPH_PIXELS <= crate::dma_safety::MAX_BURST as usize);
