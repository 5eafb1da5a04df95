//! End-to-end pipeline tests: submission API → queue → renderer → simulated
//! panel with emulated DMA bursts and the real completion-interrupt routine.

#![allow(clippy::unwrap_used)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::panic)]

use display::color::{blend, Color};
use display::command::DisplayCommand;
use display::font::{Font, Glyph};
use display::geometry::Rect;
use display::protocol::PanelConfig;
use display::queue::{CommandQueue, Display};
use display::renderer::{PixelBuffer, Renderer};
use display::sim::SimulatedPanel;
use display::transfer::{Phase, TransferEngine};
use display::RenderError;
use embassy_futures::select::{select, Either};
use embedded_graphics::pixelcolor::RgbColor;
use platform::config::MAX_GLYPH_PIXELS;
use platform::dma_safety::{DmaBuffer, SramRegion};

// ── Test font: 4 x 6 cells ──────────────────────────────────────────────────

#[rustfmt::skip]
static A: [u8; 24] = [
    0,   255, 255, 0,
    255, 0,   0,   255,
    255, 255, 255, 255,
    255, 0,   0,   255,
    255, 0,   0,   255,
    0,   0,   0,   0,
];
#[rustfmt::skip]
static B: [u8; 24] = [
    255, 255, 128, 0,
    255, 0,   64,  200,
    255, 255, 128, 0,
    255, 0,   64,  200,
    255, 255, 128, 0,
    0,   0,   0,   0,
];
static GLYPHS: [Glyph; 2] = [Glyph::new('A', &A), Glyph::new('B', &B)];
static FONT: Font = Font::new(4, 6, 4, &GLYPHS);

async fn drain(panel: &mut SimulatedPanel<'_>, engine: &TransferEngine, queue: &CommandQueue) {
    // SAFETY: host memory; the simulated stream copies its source.
    let mut pixels: DmaBuffer<SramRegion, PixelBuffer> =
        unsafe { DmaBuffer::new([0; MAX_GLYPH_PIXELS]) };
    let mut renderer = Renderer::new(&mut *panel, engine, &mut pixels, PanelConfig::default());
    while !queue.is_empty() {
        renderer.process_next(queue).await;
    }
}

fn assert_glyph(panel: &SimulatedPanel<'_>, x0: u16, y0: u16, coverage: &[u8]) {
    for (i, &alpha) in coverage.iter().enumerate() {
        let x = x0 + (i % 4) as u16;
        let y = y0 + (i / 4) as u16;
        assert_eq!(
            panel.pixel(x, y),
            Some(blend(Color::WHITE, Color::BLACK, alpha)),
            "pixel ({x}, {y})"
        );
        assert_eq!(panel.write_count(x, y), 1);
    }
}

// ── Fills ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_full_screen_fill_overwrites_first() {
    let engine = TransferEngine::new();
    let queue = CommandQueue::new();
    let mut panel = SimulatedPanel::new(&engine);
    let display = Display::new(&queue);

    display.fill_screen(Color::WHITE).await;
    display.fill_screen(Color::BLACK).await;
    drain(&mut panel, &engine, &queue).await;

    assert!(panel.region_is(Rect::full(240, 320), Color::BLACK));
    assert_eq!(panel.total_writes(), 2 * 76_800);
    assert_eq!(panel.transfers(), &[vec![0xFFFF, 11_265], vec![0xFFFF, 11_265]]);
    assert_eq!(panel.stray_pixels(), 0);
    assert_eq!(engine.phase(), Phase::Idle);
    assert!(!panel.bus().is_selected());
}

#[tokio::test]
async fn fill_rect_writes_exactly_its_area() {
    let engine = TransferEngine::with_max_burst(64);
    let queue = CommandQueue::new();
    let mut panel = SimulatedPanel::new(&engine);
    let display = Display::new(&queue);

    let rects = [
        Rect::new(0, 0, 0, 0),
        Rect::new(100, 139, 200, 209),
        Rect::new(239, 230, 319, 300),
    ];
    for rect in rects {
        display.fill_rect(Color::BLUE, rect).await;
    }
    drain(&mut panel, &engine, &queue).await;

    let expected: u32 = rects.iter().map(Rect::area).sum();
    assert_eq!(panel.total_writes(), u64::from(expected));
    assert_eq!(panel.pixels_streamed(), u64::from(expected));
    for rect in rects {
        assert!(panel.region_is(rect, Color::BLUE));
    }
    assert_eq!(panel.pixel(1, 0), Some(Color::BLACK));
}

// ── Bordered rectangles ──────────────────────────────────────────────────────

#[tokio::test]
async fn draw_rect_touches_every_pixel_once() {
    let engine = TransferEngine::new();
    let queue = CommandQueue::new();
    let mut panel = SimulatedPanel::new(&engine);
    let display = Display::new(&queue);

    let outer = Rect::new(10, 19, 20, 27);
    display.draw_rect(Color::RED, Color::BLUE, outer).await;
    drain(&mut panel, &engine, &queue).await;

    assert_eq!(panel.transfers().len(), 5);
    assert_eq!(panel.total_writes(), u64::from(outer.area()));
    for y in outer.top()..=outer.bottom() {
        for x in outer.left()..=outer.right() {
            assert_eq!(panel.write_count(x, y), 1, "pixel ({x}, {y})");
            let on_border = x == outer.left()
                || x == outer.right()
                || y == outer.top()
                || y == outer.bottom();
            let expected = if on_border { Color::BLUE } else { Color::RED };
            assert_eq!(panel.pixel(x, y), Some(expected), "pixel ({x}, {y})");
        }
    }
}

#[tokio::test]
async fn thin_rect_is_all_border() {
    let queue = CommandQueue::new();
    let display = Display::new(&queue);
    display
        .draw_rect(Color::RED, Color::GREEN, Rect::new(5, 6, 5, 50))
        .await;
    assert_eq!(
        queue.try_receive(),
        Some(DisplayCommand::FillRect {
            rect: Rect::new(5, 6, 5, 50),
            color: Color::GREEN,
        })
    );
}

// ── Text ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn text_composites_each_glyph_in_its_cell() {
    let engine = TransferEngine::new();
    let queue = CommandQueue::new();
    let mut panel = SimulatedPanel::new(&engine);
    let display = Display::new(&queue);

    display
        .draw_text(&FONT, Color::WHITE, Color::BLACK, 8, 2, "AB")
        .await;
    assert_eq!(queue.len(), 1);
    drain(&mut panel, &engine, &queue).await;

    assert_glyph(&panel, 8, 2, &A);
    assert_glyph(&panel, 12, 2, &B);
    assert_eq!(panel.total_writes(), 48);
}

#[tokio::test]
async fn missing_glyph_is_skipped_and_cursor_advances() {
    let engine = TransferEngine::new();
    let queue = CommandQueue::new();
    let mut panel = SimulatedPanel::new(&engine);
    let display = Display::new(&queue);

    display
        .draw_text(&FONT, Color::WHITE, Color::BLACK, 0, 0, "AZB")
        .await;
    drain(&mut panel, &engine, &queue).await;

    assert_glyph(&panel, 0, 0, &A);
    assert_glyph(&panel, 8, 0, &B);
    for x in 4..8 {
        for y in 0..6 {
            assert_eq!(panel.write_count(x, y), 0);
        }
    }
    assert_eq!(panel.transfers().len(), 2);
}

#[tokio::test]
async fn long_text_is_split_into_commands() {
    let queue = CommandQueue::new();
    let display = Display::new(&queue);
    let text = "ABABABABABABABABABAB"; // 20 chars
    display
        .draw_text(&FONT, Color::WHITE, Color::BLACK, 3, 7, text)
        .await;

    let mut origins = Vec::new();
    let mut sent = String::new();
    while let Some(command) = queue.try_receive() {
        let DisplayCommand::DrawText { x, y, text, .. } = command else {
            panic!("unexpected {command:?}");
        };
        assert_eq!(y, 7);
        origins.push(x);
        sent.extend(text.iter());
    }
    assert_eq!(origins, vec![3, 3 + 16 * 4]);
    assert_eq!(sent, text);
}

// ── Queue ────────────────────────────────────────────────────────────────────

fn tagged(n: u16) -> DisplayCommand {
    DisplayCommand::FillRect {
        rect: Rect::new(n, n, 0, 0),
        color: Color::RED,
    }
}

#[tokio::test]
async fn producers_share_one_fifo_order() {
    let queue = CommandQueue::new();
    let first = Display::new(&queue);
    let second = Display::new(&queue);

    for n in 0..8 {
        let producer = if n % 2 == 0 { first } else { second };
        producer.submit(tagged(n)).await;
    }
    for n in 0..8 {
        assert_eq!(queue.receive().await, tagged(n));
    }
}

#[tokio::test]
async fn full_queue_suspends_producer_until_space() {
    let queue = CommandQueue::new();
    let display = Display::new(&queue);
    for n in 0..16 {
        display.try_submit(tagged(n)).unwrap();
    }
    assert_eq!(display.try_submit(tagged(99)), Err(tagged(99)));

    let blocked = select(display.submit(tagged(16)), core::future::ready(())).await;
    assert!(matches!(blocked, Either::Second(())));

    assert_eq!(queue.receive().await, tagged(0));
    display.submit(tagged(16)).await;
    assert_eq!(queue.len(), 16);
}

#[tokio::test]
async fn blocked_producer_and_consumer_preserve_order() {
    let queue = CommandQueue::new();
    let display = Display::new(&queue);

    let producer = async {
        for n in 0..40 {
            display.submit(tagged(n)).await;
        }
    };
    let consumer = async {
        let mut seen = Vec::new();
        for _ in 0..40 {
            seen.push(queue.receive().await);
        }
        seen
    };
    let ((), seen) = tokio::join!(producer, consumer);
    assert_eq!(seen, (0..40).map(tagged).collect::<Vec<_>>());
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn bus_failure_drops_command_and_leaves_engine_idle() {
    let engine = TransferEngine::new();
    let mut panel = SimulatedPanel::new(&engine);
    panel.fail_bus_after(3);
    // SAFETY: host memory; the simulated stream copies its source.
    let mut pixels: DmaBuffer<SramRegion, PixelBuffer> =
        unsafe { DmaBuffer::new([0; MAX_GLYPH_PIXELS]) };
    let mut renderer = Renderer::new(&mut panel, &engine, &mut pixels, PanelConfig::default());

    let result = renderer
        .execute(DisplayCommand::FillScreen { color: Color::RED })
        .await;
    assert!(matches!(result, Err(RenderError::Bus(_))));
    assert_eq!(engine.phase(), Phase::Idle);
    drop(renderer);
    assert_eq!(panel.pixels_streamed(), 0);
}

#[tokio::test]
async fn oversized_font_is_rejected() {
    static BIG: Font = Font::new(64, 64, 60, &GLYPHS);
    let engine = TransferEngine::new();
    let mut panel = SimulatedPanel::new(&engine);
    // SAFETY: host memory; the simulated stream copies its source.
    let mut pixels: DmaBuffer<SramRegion, PixelBuffer> =
        unsafe { DmaBuffer::new([0; MAX_GLYPH_PIXELS]) };
    let mut renderer = Renderer::new(&mut panel, &engine, &mut pixels, PanelConfig::default());

    let mut text = display::command::TextBuf::new();
    text.push('A').unwrap();
    let result = renderer
        .execute(DisplayCommand::DrawText {
            font: &BIG,
            x: 0,
            y: 0,
            fore: Color::WHITE,
            back: Color::BLACK,
            text,
        })
        .await;
    assert_eq!(result, Err(RenderError::GlyphTooLarge));
}
