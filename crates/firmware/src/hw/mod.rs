//! STM32F411 backend
//!
//! Register-level implementation of the platform traits for an ST7789 module
//! on SPI2, fed by DMA1 stream 4 (channel 0, SPI2_TX).
//!
//! # Wiring
//!
//! | Signal | STM32 pin | Mode |
//! |--------|-----------|------|
//! | DC     | PA8  | GPIO output |
//! | RST    | PA9  | GPIO output |
//! | BL     | PA10 | GPIO output |
//! | CS     | PB12 | GPIO output (software select) |
//! | SCK    | PB13 | AF5 (SPI2_SCK) |
//! | MOSI   | PB15 | AF5 (SPI2_MOSI) |
//!
//! The core runs from the 16 MHz HSI; SPI2 sits on APB1 and is clocked at
//! fPCLK / 2.
//!
//! All types here are zero-sized handles onto memory-mapped registers. The
//! rendering task owns one [`Stm32Panel`]; the DMA1_STREAM4 handler conjures
//! its own with [`Stm32Panel::steal`] to re-arm or finish a transfer. The two
//! never touch the stream at the same time: the task only programs it while
//! the transfer engine is idle, the interrupt only while it is streaming.

// Register addresses are 32-bit on this part; pointer casts to u32 are exact.
#![allow(clippy::cast_possible_truncation)]

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use platform::{DmaStream, PanelBus, SourceMode};
use stm32f4::stm32f411 as pac;

/// Core clock after reset (HSI).
pub const SYSCLK_HZ: u32 = 16_000_000;

/// DMA1 stream carrying SPI2_TX.
pub const DMA_STREAM: usize = 4;

const DC_PIN: u8 = 8;
const RST_PIN: u8 = 9;
const BL_PIN: u8 = 10;
const CS_PIN: u8 = 12;

fn spi() -> &'static pac::spi1::RegisterBlock {
    // SAFETY: SPI2 is only driven through `Stm32Panel`, whose users are
    // serialized by the transfer engine (see module docs).
    unsafe { &*pac::SPI2::ptr() }
}

fn dma() -> &'static pac::dma2::RegisterBlock {
    // SAFETY: as above; stream 4 of DMA1 belongs to the panel.
    unsafe { &*pac::DMA1::ptr() }
}

fn gpioa() -> &'static pac::gpioa::RegisterBlock {
    // SAFETY: BSRR writes are atomic set/reset operations.
    unsafe { &*pac::GPIOA::ptr() }
}

fn gpiob() -> &'static pac::gpiob::RegisterBlock {
    // SAFETY: BSRR writes are atomic set/reset operations.
    unsafe { &*pac::GPIOB::ptr() }
}

// ── Control lines ────────────────────────────────────────────────────────────

/// GPIO port of a control line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    /// GPIOA
    A,
    /// GPIOB
    B,
}

/// Push-pull output driven through BSRR.
#[derive(Debug)]
pub struct OutputLine {
    port: Port,
    pin: u8,
}

impl OutputLine {
    const fn new(port: Port, pin: u8) -> Self {
        Self { port, pin }
    }

    fn write_bsrr(&self, mask: u32) {
        match self.port {
            // SAFETY: any BSRR bit pattern is valid; unset bits are ignored.
            Port::A => gpioa().bsrr.write(|w| unsafe { w.bits(mask) }),
            // SAFETY: any BSRR bit pattern is valid; unset bits are ignored.
            Port::B => gpiob().bsrr.write(|w| unsafe { w.bits(mask) }),
        }
    }

    fn high(&self) {
        self.write_bsrr(1 << self.pin);
    }

    fn low(&self) {
        self.write_bsrr(1 << (self.pin + 16));
    }
}

impl ErrorType for OutputLine {
    type Error = Infallible;
}

impl OutputPin for OutputLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high();
        Ok(())
    }
}

// ── Delay ────────────────────────────────────────────────────────────────────

/// Busy-wait delay counted in core cycles. Only used during bring-up, before
/// the executor runs anything else.
#[derive(Debug, Clone, Copy)]
pub struct CycleDelay {
    cycles_per_us: u32,
}

impl CycleDelay {
    /// Delay for a core running at `sysclk_hz`.
    pub const fn new(sysclk_hz: u32) -> Self {
        Self {
            cycles_per_us: sysclk_hz / 1_000_000,
        }
    }
}

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = u64::from(ns) * u64::from(self.cycles_per_us) / 1_000;
        cortex_m::asm::delay(u32::try_from(cycles).unwrap_or(u32::MAX).max(1));
    }

    fn delay_us(&mut self, us: u32) {
        cortex_m::asm::delay(us.saturating_mul(self.cycles_per_us).max(1));
    }
}

// ── Panel ────────────────────────────────────────────────────────────────────

/// SPI2 + DMA1 stream 4 as a panel bus and DMA stream.
#[derive(Debug)]
pub struct Stm32Panel {
    dc: OutputLine,
    cs: OutputLine,
}

impl Stm32Panel {
    /// Handle onto the already configured peripherals.
    ///
    /// # Safety
    ///
    /// At most one handle may be used from task context, and the interrupt
    /// handler may only use its handle while a transfer is streaming.
    pub unsafe fn steal() -> Self {
        Self {
            dc: OutputLine::new(Port::A, DC_PIN),
            cs: OutputLine::new(Port::B, CS_PIN),
        }
    }

    fn wait_idle() {
        let spi = spi();
        while spi.sr.read().txe().bit_is_clear() {}
        while spi.sr.read().bsy().bit_is_set() {}
    }

    fn send8(byte: u8) {
        let spi = spi();
        while spi.sr.read().txe().bit_is_clear() {}
        // SAFETY: DR accepts any 16-bit value; only the low byte is shifted in 8-bit mode.
        spi.dr.write(|w| unsafe { w.dr().bits(u16::from(byte)) });
    }

    fn set_frame_16(sixteen: bool) {
        let spi = spi();
        Self::wait_idle();
        spi.cr1.modify(|_, w| w.spe().clear_bit());
        spi.cr1.modify(|_, w| w.dff().bit(sixteen));
        spi.cr1.modify(|_, w| w.spe().set_bit());
    }
}

impl PanelBus for Stm32Panel {
    type Error = Infallible;

    fn select(&mut self) -> Result<(), Self::Error> {
        self.cs.low();
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        Self::wait_idle();
        self.cs.high();
        if spi().cr1.read().dff().bit_is_set() {
            Self::set_frame_16(false);
        }
        Ok(())
    }

    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        Self::wait_idle();
        self.dc.low();
        Self::send8(command);
        Ok(())
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        Self::wait_idle();
        self.dc.high();
        data.iter().copied().for_each(Self::send8);
        Ok(())
    }

    fn begin_stream(&mut self) -> Result<(), Self::Error> {
        Self::wait_idle();
        self.dc.high();
        Self::set_frame_16(true);
        Ok(())
    }
}

impl DmaStream for Stm32Panel {
    unsafe fn start(&mut self, source: &[u16], mode: SourceMode, burst: u16) {
        let spi = spi();
        let stream = &dma().st[DMA_STREAM];

        stream.cr.modify(|_, w| w.en().clear_bit());
        while stream.cr.read().en().bit_is_set() {}
        dma().hifcr.write(|w| {
            w.ctcif4()
                .set_bit()
                .chtif4()
                .set_bit()
                .cteif4()
                .set_bit()
                .cdmeif4()
                .set_bit()
                .cfeif4()
                .set_bit()
        });

        // SAFETY: addresses of SPI2_DR and of a slice the caller keeps alive
        // until completion; both fit the 32-bit address registers.
        stream
            .par
            .write(|w| unsafe { w.pa().bits(spi.dr.as_ptr() as u32) });
        // SAFETY: see above.
        stream
            .m0ar
            .write(|w| unsafe { w.m0a().bits(source.as_ptr() as u32) });
        stream.ndtr.write(|w| w.ndt().bits(burst));
        // SAFETY: channel 0 is SPI2_TX on DMA1 stream 4 (RM0383 Table 27).
        stream.cr.write(|w| unsafe {
            w.chsel()
                .bits(0)
                .dir()
                .memory_to_peripheral()
                .msize()
                .bits16()
                .psize()
                .bits16()
                .minc()
                .bit(mode == SourceMode::Increment)
                .pinc()
                .clear_bit()
                .circ()
                .clear_bit()
                .pl()
                .high()
                .tcie()
                .set_bit()
        });
        stream.cr.modify(|_, w| w.en().set_bit());
        spi.cr2.modify(|_, w| w.txdmaen().set_bit());
    }

    fn rearm(&mut self, burst: u16) {
        // The stream disables itself on transfer complete; M0AR and the
        // configuration survive, only the count needs reloading.
        let stream = &dma().st[DMA_STREAM];
        stream.ndtr.write(|w| w.ndt().bits(burst));
        stream.cr.modify(|_, w| w.en().set_bit());
    }

    fn stop(&mut self) {
        spi().cr2.modify(|_, w| w.txdmaen().clear_bit());
        dma().st[DMA_STREAM].cr.modify(|_, w| w.en().clear_bit());
    }
}

/// Whether the transfer-complete flag of the panel stream is set; clears it.
pub fn take_transfer_complete() -> bool {
    let dma = dma();
    if dma.hisr.read().tcif4().bit_is_set() {
        dma.hifcr.write(|w| w.ctcif4().set_bit());
        true
    } else {
        false
    }
}

// ── Board ────────────────────────────────────────────────────────────────────

/// Everything the display needs, configured and ready for bring-up.
pub struct Board {
    /// Bus and DMA stream
    pub panel: Stm32Panel,
    /// Panel reset line
    pub reset: OutputLine,
    /// Backlight enable
    pub backlight: OutputLine,
}

impl Board {
    /// Enable clocks, configure the pins, SPI2 and the interrupt line.
    ///
    /// DMA1 stream 4 is programmed per transfer by [`Stm32Panel::start`].
    pub fn init(dp: pac::Peripherals) -> Self {
        dp.RCC.ahb1enr.modify(|_, w| {
            w.gpioaen()
                .enabled()
                .gpioben()
                .enabled()
                .dma1en()
                .enabled()
        });
        dp.RCC.apb1enr.modify(|_, w| w.spi2en().enabled());

        let cs = OutputLine::new(Port::B, CS_PIN);
        cs.high();
        let backlight = OutputLine::new(Port::A, BL_PIN);
        backlight.low();

        dp.GPIOA.moder.modify(|_, w| {
            w.moder8()
                .output()
                .moder9()
                .output()
                .moder10()
                .output()
        });
        dp.GPIOA.ospeedr.modify(|_, w| {
            w.ospeedr8()
                .very_high_speed()
                .ospeedr9()
                .very_high_speed()
                .ospeedr10()
                .very_high_speed()
        });
        dp.GPIOB.moder.modify(|_, w| {
            w.moder12()
                .output()
                .moder13()
                .alternate()
                .moder15()
                .alternate()
        });
        dp.GPIOB.ospeedr.modify(|_, w| {
            w.ospeedr12()
                .very_high_speed()
                .ospeedr13()
                .very_high_speed()
                .ospeedr15()
                .very_high_speed()
        });
        dp.GPIOB.afrh.modify(|_, w| w.afrh13().af5().afrh15().af5());

        // Mode 0, MSB first, 8-bit frames, software slave select.
        dp.SPI2.cr1.write(|w| {
            w.mstr()
                .set_bit()
                .ssm()
                .set_bit()
                .ssi()
                .set_bit()
                .br()
                .div2()
                .cpol()
                .clear_bit()
                .cpha()
                .clear_bit()
                .dff()
                .clear_bit()
                .lsbfirst()
                .clear_bit()
        });
        dp.SPI2.cr1.modify(|_, w| w.spe().set_bit());

        // SAFETY: this is the only task-context handle (see `steal`).
        let panel = unsafe { Stm32Panel::steal() };
        Self {
            panel,
            reset: OutputLine::new(Port::A, RST_PIN),
            backlight,
        }
    }
}
