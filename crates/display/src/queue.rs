//! Command queue and submission API
//!
//! Any task may draw by pushing a [`DisplayCommand`] onto the shared
//! [`CommandQueue`]; the rendering task is the only consumer. The queue is a
//! bounded `embassy_sync` channel, so producers are suspended (never dropped)
//! when it is full and all producers share one global FIFO order.
//!
//! ```no_run
//! use display::queue::{CommandQueue, Display};
//! use display::color::Color;
//! use embedded_graphics::pixelcolor::RgbColor;
//!
//! static QUEUE: CommandQueue = CommandQueue::new();
//!
//! async fn splash() {
//!     let display = Display::new(&QUEUE);
//!     display.fill_screen(Color::GREEN).await;
//! }
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use platform::config::{COMMAND_QUEUE_DEPTH, TEXT_CAPACITY};

use crate::color::Color;
use crate::command::{DisplayCommand, TextBuf};
use crate::font::Font;
use crate::geometry::Rect;

/// Bounded multi-producer, single-consumer queue of drawing commands.
pub struct CommandQueue {
    channel: Channel<CriticalSectionRawMutex, DisplayCommand, COMMAND_QUEUE_DEPTH>,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    /// Empty queue, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue, waiting for a free slot if the queue is full.
    pub async fn send(&self, command: DisplayCommand) {
        self.channel.send(command).await;
    }

    /// Enqueue without waiting. Hands the command back when the queue is full.
    pub fn try_send(&self, command: DisplayCommand) -> Result<(), DisplayCommand> {
        self.channel.try_send(command).map_err(|TrySendError::Full(c)| c)
    }

    /// Dequeue, waiting for the next command.
    pub async fn receive(&self) -> DisplayCommand {
        self.channel.receive().await
    }

    /// Dequeue without waiting.
    pub fn try_receive(&self) -> Option<DisplayCommand> {
        self.channel.try_receive().ok()
    }

    /// Commands currently waiting
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// Whether no command is waiting
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

/// Producer handle: the drawing API offered to application tasks.
///
/// Every method only enqueues. Rendering happens later on the rendering task
/// and its outcome is never reported back.
#[derive(Clone, Copy)]
pub struct Display<'q> {
    queue: &'q CommandQueue,
}

impl<'q> Display<'q> {
    /// Handle submitting to `queue`
    pub const fn new(queue: &'q CommandQueue) -> Self {
        Self { queue }
    }

    /// Enqueue a prepared command.
    pub async fn submit(&self, command: DisplayCommand) {
        self.queue.send(command).await;
    }

    /// Enqueue without waiting; the command comes back if the queue is full.
    pub fn try_submit(&self, command: DisplayCommand) -> Result<(), DisplayCommand> {
        self.queue.try_send(command)
    }

    /// Paint the whole panel with `color`.
    pub async fn fill_screen(&self, color: Color) {
        self.submit(DisplayCommand::FillScreen { color }).await;
    }

    /// Paint `rect` with `color`.
    pub async fn fill_rect(&self, color: Color, rect: Rect) {
        self.submit(DisplayCommand::FillRect { rect, color }).await;
    }

    /// Paint `rect` with a one-pixel `border` and a `fore` interior.
    ///
    /// `rect` is the outer edge of the border. A rectangle without interior
    /// (narrower or shorter than 3 pixels) is all border.
    pub async fn draw_rect(&self, fore: Color, border: Color, rect: Rect) {
        let command = match rect.inset() {
            Some(interior) => DisplayCommand::DrawRect {
                rect: interior,
                fore,
                border,
            },
            None => DisplayCommand::FillRect {
                rect,
                color: border,
            },
        };
        self.submit(command).await;
    }

    /// Draw `text` with its first cell's top-left corner at `(x, y)`.
    ///
    /// Text longer than [`TEXT_CAPACITY`] is split into several commands, each
    /// starting where the previous one ended.
    pub async fn draw_text(
        &self,
        font: &'static Font,
        fore: Color,
        back: Color,
        x: u16,
        y: u16,
        text: &str,
    ) {
        for (x, chunk) in TextChunks::new(text, x, font.width(), TEXT_CAPACITY) {
            let mut buf = TextBuf::new();
            for ch in chunk.chars() {
                if buf.push(ch).is_err() {
                    break;
                }
            }
            self.submit(DisplayCommand::DrawText {
                font,
                x,
                y,
                fore,
                back,
                text: buf,
            })
            .await;
        }
    }
}

/// Splits a string into runs of at most `capacity` characters, paired with the
/// x origin of each run.
///
/// The origin advances by `glyph_width` per character sent, saturating at
/// `u16::MAX`.
#[derive(Debug, Clone)]
pub struct TextChunks<'a> {
    rest: &'a str,
    x: u16,
    glyph_width: u16,
    capacity: usize,
}

impl<'a> TextChunks<'a> {
    /// Chunk `text` starting at column `x`. A zero capacity is treated as one.
    pub fn new(text: &'a str, x: u16, glyph_width: u16, capacity: usize) -> Self {
        Self {
            rest: text,
            x,
            glyph_width,
            capacity: capacity.max(1),
        }
    }
}

impl<'a> Iterator for TextChunks<'a> {
    type Item = (u16, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let split = self
            .rest
            .char_indices()
            .nth(self.capacity)
            .map_or(self.rest.len(), |(at, _)| at);
        let (chunk, rest) = self.rest.split_at(split);
        let origin = self.x;
        let sent = u16::try_from(chunk.chars().count()).unwrap_or(u16::MAX);
        self.x = self.x.saturating_add(sent.saturating_mul(self.glyph_width));
        self.rest = rest;
        Some((origin, chunk))
    }
}
