//! Architecture tests: DMA safety marker traits and stream limits.
//! These tests enforce compile-time guarantees about DMA buffer placement.

// Some imports are used only to verify trait/type accessibility at compile time.
#![allow(unused_imports)]
// Some assertions check documented compile-time constants for architectural correctness.
#![allow(clippy::assertions_on_constants)]

use platform::config::{MAX_GLYPH_PIXELS, PANEL_HEIGHT, PANEL_WIDTH};
use platform::dma_safety::{
    CcmRegion, DmaAccessible, DmaBuffer, SramRegion, CCM_NOT_DMA_ACCESSIBLE, MAX_BURST,
    SRAM1_BASE, SRAM1_SIZE_BYTES,
};

#[test]
fn sram_region_is_zero_sized_and_dma_accessible() {
    fn assert_dma_accessible<T: DmaAccessible>() {}
    assert_dma_accessible::<SramRegion>();
    assert_eq!(core::mem::size_of::<SramRegion>(), 0);
}

#[test]
fn ccm_region_documented_as_cpu_only() {
    assert_eq!(core::mem::size_of::<CcmRegion>(), 0);
    assert!(CCM_NOT_DMA_ACCESSIBLE);
}

#[test]
fn region_tag_adds_no_storage() {
    assert_eq!(
        core::mem::size_of::<DmaBuffer<SramRegion, [u16; MAX_GLYPH_PIXELS]>>(),
        MAX_GLYPH_PIXELS * 2
    );
}

#[test]
fn dma_buffer_gives_access_to_contents() {
    // SAFETY: host memory; the region tag is irrelevant off-target.
    let mut buffer: DmaBuffer<SramRegion, [u16; 4]> = unsafe { DmaBuffer::new([0; 4]) };
    buffer.get_mut()[2] = 0xF800;
    assert_eq!(buffer.get(), &[0, 0, 0xF800, 0]);
}

#[test]
fn max_burst_is_ndtr_width() {
    assert_eq!(MAX_BURST, u16::MAX);
}

#[test]
fn full_screen_fill_needs_two_bursts() {
    let pixels = u32::from(PANEL_WIDTH) * u32::from(PANEL_HEIGHT);
    assert_eq!(pixels, 76_800);
    assert_eq!(pixels.div_ceil(u32::from(MAX_BURST)), 2);
}

#[test]
fn glyph_buffer_fits_in_sram() {
    assert!(MAX_GLYPH_PIXELS * 2 < SRAM1_SIZE_BYTES / 4);
    assert_eq!(SRAM1_BASE, 0x2000_0000);
}
