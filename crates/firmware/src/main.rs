//! ST7789 pipeline firmware - hardware entry point (STM32F411).
//!
//! Boot order:
//! 1. Configure clocks, pins and SPI2 ([`Board::init`])
//! 2. Reset and initialize the panel ([`bring_up`])
//! 3. Unmask the DMA1 stream 4 interrupt
//! 4. Spawn the rendering task, then the controller task

#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;

use cortex_m::peripheral::NVIC;
use display::{CommandQueue, Display, PanelConfig, PixelBuffer, Renderer, SetupError, TransferEngine};
use embassy_executor::Spawner;
use firmware::bringup::bring_up;
use firmware::controller;
use firmware::fault::OrHalt;
use firmware::hw::{take_transfer_complete, Board, CycleDelay, Stm32Panel, SYSCLK_HZ};
use platform::config::{
    APP_NAME, APP_VERSION, CONTROLLER_TASK_NAME, MAX_GLYPH_PIXELS, RENDER_TASK_NAME,
};
use platform::{DmaBuffer, SramRegion};
use static_cell::ConstStaticCell;
use stm32f4::stm32f411::{self as pac, interrupt};

static QUEUE: CommandQueue = CommandQueue::new();
static ENGINE: TransferEngine = TransferEngine::new();

// .bss is SRAM1 on this part.
static PIXELS: ConstStaticCell<DmaBuffer<SramRegion, PixelBuffer>> =
    // SAFETY: the linker places statics in SRAM1, which DMA1 can read.
    ConstStaticCell::new(unsafe { DmaBuffer::new([0; MAX_GLYPH_PIXELS]) });

#[embassy_executor::task]
async fn render_task(renderer: Renderer<'static, Stm32Panel, SramRegion>) {
    renderer.run(&QUEUE).await
}

#[embassy_executor::task]
async fn controller_task(display: Display<'static>) {
    controller::run(display).await;
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!("{=str} v{=str}", APP_NAME, APP_VERSION);

    let dp = pac::Peripherals::take()
        .ok_or(SetupError::PeripheralsTaken)
        .or_halt();
    let Board {
        mut panel,
        mut reset,
        mut backlight,
    } = Board::init(dp);

    bring_up(
        &mut panel,
        &mut reset,
        &mut backlight,
        &mut CycleDelay::new(SYSCLK_HZ),
    )
    .map_err(|_| SetupError::PanelInit)
    .or_halt();

    // SAFETY: the handler only touches the stream after `arm` has accepted
    // a transfer, and ENGINE is initialized at compile time.
    unsafe { NVIC::unmask(pac::Interrupt::DMA1_STREAM4) };

    let pixels = PIXELS
        .try_take()
        .ok_or(SetupError::AlreadyInitialized("pixel buffer"))
        .or_halt();
    let renderer = Renderer::new(panel, &ENGINE, pixels, PanelConfig::ST7789_240X320);

    spawner
        .spawn(render_task(renderer))
        .map_err(|_| SetupError::TaskSpawn(RENDER_TASK_NAME))
        .or_halt();
    spawner
        .spawn(controller_task(Display::new(&QUEUE)))
        .map_err(|_| SetupError::TaskSpawn(CONTROLLER_TASK_NAME))
        .or_halt();

    defmt::info!("display: tasks running");
}

#[interrupt]
fn DMA1_STREAM4() {
    if take_transfer_complete() {
        // SAFETY: a transfer is streaming, so the rendering task is parked in
        // `wait_complete` and does not touch the peripherals.
        let mut panel = unsafe { Stm32Panel::steal() };
        display::service_interrupt(&ENGINE, &mut panel);
    }
}
